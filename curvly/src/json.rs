use crate::error::Result;
use crate::graph::ConnectionGraph;
use crate::model::{Connection, Element};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct GraphDe {
    #[serde(default)]
    boxes: Vec<Element>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl ConnectionGraph {
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "boxes": self.boxes(),
            "connections": self.connections(),
        })
    }

    /// Imports a `{ boxes, connections }` object; both keys may be omitted.
    /// Symmetric duplicate connections are dropped.
    pub fn from_json_value(v: Value) -> Result<Self> {
        let de: GraphDe = serde_json::from_value(v)?;
        Ok(ConnectionGraph::from_parts(de.boxes, de.connections))
    }

    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let de: GraphDe = serde_json::from_str(s)?;
        Ok(ConnectionGraph::from_parts(de.boxes, de.connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_objects_import() {
        let g = ConnectionGraph::from_json_value(json!({
            "connections": [{ "boxA": "box1", "boxB": "box2" }],
            "boxes": [{ "id": "box1", "className": "box" }, { "id": "box2" }],
        }))
        .unwrap();
        assert_eq!(g.boxes()[0].class_name, "box");
        assert!(g.is_linked("box2", "box1"));
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let g = ConnectionGraph::from_json_str("{}").unwrap();
        assert_eq!(g, ConnectionGraph::new());
    }

    #[test]
    fn bad_input_is_a_json_error() {
        let err = ConnectionGraph::from_json_str(r#"{"connections":[{"boxA":1}]}"#).unwrap_err();
        assert_eq!(err.code(), "invalid_json");
    }
}
