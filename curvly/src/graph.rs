use crate::error::{CurvlyError, Result};
use crate::model::{Connection, Element};
use log::{debug, warn};
use serde::Serialize;
use std::rc::Rc;

/// Boxes in the zone and the undirected links between them.
///
/// Every operation returns a new graph and leaves `self` untouched, so a
/// snapshot handed to a renderer can never be observed half-updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionGraph {
    boxes: Vec<Element>,
    connections: Vec<Connection>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        ConnectionGraph::default()
    }

    /// Builds a graph from caller data. Symmetric duplicates among
    /// `connections` are dropped, keeping the first occurrence.
    pub fn from_parts(boxes: Vec<Element>, connections: Vec<Connection>) -> Self {
        let mut deduped: Vec<Connection> = Vec::with_capacity(connections.len());
        for c in connections {
            if deduped.contains(&c) {
                warn!("dropping duplicate connection {} <-> {}", c.box_a, c.box_b);
                continue;
            }
            deduped.push(c);
        }
        ConnectionGraph {
            boxes,
            connections: deduped,
        }
    }

    pub fn into_parts(self) -> (Vec<Element>, Vec<Connection>) {
        (self.boxes, self.connections)
    }

    pub fn boxes(&self) -> &[Element] {
        &self.boxes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn box_ids(&self) -> impl Iterator<Item = &str> {
        self.boxes.iter().filter_map(|b| b.id.as_deref())
    }

    pub fn contains_box(&self, id: &str) -> bool {
        self.boxes.iter().any(|b| b.has_id(id))
    }

    pub fn get_box(&self, id: &str) -> Option<&Element> {
        self.boxes.iter().find(|b| b.has_id(id))
    }

    pub fn connections_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(id))
    }

    pub fn is_linked(&self, a: &str, b: &str) -> bool {
        self.connections.iter().any(|c| c.links(a, b))
    }

    /// Appends `new_box`, optionally linking it to an existing box.
    pub fn add_box(&self, new_box: Element, linked_with_id: Option<&str>) -> Result<Self> {
        let mut connections = self.connections.clone();
        if let Some(linked) = linked_with_id {
            if !self.contains_box(linked) {
                return Err(CurvlyError::UnknownBox {
                    id: linked.to_string(),
                });
            }
            let id = new_box.id.clone().ok_or(CurvlyError::MissingId)?;
            let link = Connection::new(id, linked);
            if !connections.contains(&link) {
                connections.push(link);
            }
        }
        debug!("add box {:?} (linked with {:?})", new_box.id, linked_with_id);
        let mut boxes = self.boxes.clone();
        boxes.push(new_box);
        Ok(ConnectionGraph { boxes, connections })
    }

    /// Removes the box and every connection touching it.
    pub fn remove_box(&self, id: &str) -> Self {
        debug!("remove box {id}");
        ConnectionGraph {
            boxes: self.boxes.iter().filter(|b| !b.has_id(id)).cloned().collect(),
            connections: self.without_links_from(id),
        }
    }

    pub fn link_boxes(&self, a: &str, b: &str) -> Self {
        if self.is_linked(a, b) {
            return self.clone();
        }
        debug!("link {a} <-> {b}");
        let mut connections = self.connections.clone();
        connections.push(Connection::new(a, b));
        ConnectionGraph {
            boxes: self.boxes.clone(),
            connections,
        }
    }

    pub fn unlink_all(&self, id: &str) -> Self {
        debug!("unlink all from {id}");
        ConnectionGraph {
            boxes: self.boxes.clone(),
            connections: self.without_links_from(id),
        }
    }

    pub fn unlink(&self, a: &str, b: &str) -> Self {
        debug!("unlink {a} <-> {b}");
        ConnectionGraph {
            boxes: self.boxes.clone(),
            connections: self
                .connections
                .iter()
                .filter(|c| !c.links(a, b))
                .cloned()
                .collect(),
        }
    }

    fn without_links_from(&self, id: &str) -> Vec<Connection> {
        self.connections
            .iter()
            .filter(|c| !c.touches(id))
            .cloned()
            .collect()
    }
}

/// Holder for the current graph snapshot. Mutations swap in a whole new
/// snapshot; readers holding an older `Rc` keep seeing consistent data.
#[derive(Clone, Debug, Default)]
pub struct Store {
    current: Rc<ConnectionGraph>,
}

impl Store {
    pub fn new(graph: ConnectionGraph) -> Self {
        Store {
            current: Rc::new(graph),
        }
    }

    pub fn snapshot(&self) -> Rc<ConnectionGraph> {
        Rc::clone(&self.current)
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.current
    }

    pub fn replace(&mut self, graph: ConnectionGraph) {
        self.current = Rc::new(graph);
    }

    pub fn add_box(&mut self, new_box: Element, linked_with_id: Option<&str>) -> Result<()> {
        let next = self.current.add_box(new_box, linked_with_id)?;
        self.replace(next);
        Ok(())
    }

    pub fn remove_box(&mut self, id: &str) {
        let next = self.current.remove_box(id);
        self.replace(next);
    }

    pub fn link_boxes(&mut self, a: &str, b: &str) {
        if self.current.is_linked(a, b) {
            return;
        }
        let next = self.current.link_boxes(a, b);
        self.replace(next);
    }

    pub fn unlink_all(&mut self, id: &str) {
        let next = self.current.unlink_all(id);
        self.replace(next);
    }

    pub fn unlink(&mut self, a: &str, b: &str) {
        let next = self.current.unlink(a, b);
        self.replace(next);
    }
}
