use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Class every mounted box carries, ahead of its own class name.
pub const ELEMENT_CLASS: &str = "curvly-element";

/// A box living in the zone. Geometry is owned by the host and read through
/// [`crate::layout::RectLookup`]; the store only tracks identity and styling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class_name: String,
    // None inherits the zone default
    #[serde(default)]
    pub draggable: Option<bool>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Element {
            id: Some(id.into()),
            ..Element::default()
        }
    }

    pub fn anonymous() -> Self {
        Element::default()
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = Some(draggable);
        self
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Value of the `class` attribute for the mounted box.
    pub fn class_attr(&self) -> String {
        if self.class_name.is_empty() {
            ELEMENT_CLASS.to_string()
        } else {
            format!("{ELEMENT_CLASS} {}", self.class_name)
        }
    }
}

/// On-screen geometry of a box: page offset (scroll included) and client size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect { left, top, width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Undirected link between two box ids. Equality and hashing ignore the
/// order of the pair, so `(a, b)` and `(b, a)` are the same connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "boxA")]
    pub box_a: String,
    #[serde(rename = "boxB")]
    pub box_b: String,
}

impl Connection {
    pub fn new(box_a: impl Into<String>, box_b: impl Into<String>) -> Self {
        Connection {
            box_a: box_a.into(),
            box_b: box_b.into(),
        }
    }

    /// True when this connection joins `a` and `b`, in either order.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.box_a == a && self.box_b == b) || (self.box_a == b && self.box_b == a)
    }

    pub fn touches(&self, id: &str) -> bool {
        self.box_a == id || self.box_b == id
    }

    fn ordered(&self) -> (&str, &str) {
        if self.box_a <= self.box_b {
            (&self.box_a, &self.box_b)
        } else {
            (&self.box_b, &self.box_a)
        }
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.links(&other.box_a, &other.box_b)
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

/// Cubic Bézier with both endpoints and both control points resolved.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicCurve {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicCurve {
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let tt = t * t;
        let uu = u * u;
        let uuu = uu * u;
        let ttt = tt * t;
        Point {
            x: uuu * self.start.x
                + 3.0 * uu * t * self.c1.x
                + 3.0 * u * tt * self.c2.x
                + ttt * self.end.x,
            y: uuu * self.start.y
                + 3.0 * uu * t * self.c1.y
                + 3.0 * u * tt * self.c2.y
                + ttt * self.end.y,
        }
    }
}

/// One renderable curve, rebuilt wholesale on every layout pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathDescriptor {
    pub connection: Connection,
    pub curve: CubicCurve,
    pub d: String,
}
