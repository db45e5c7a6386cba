//! Connection graph and curve layout for draggable, linked boxes.
//!
//! The host owns the boxes on screen. This crate keeps the graph of which
//! boxes are linked, turns those links into cubic Bézier path data from the
//! boxes' current rectangles, and tracks the drag gesture that moves them.

pub mod drag;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod svg;
pub mod zone;
mod json;

pub use drag::{
    apply_drop, capture_drag_offset, parse_int_prefix, DragOffset, DragTarget, PositionSink,
};
pub use error::{CurvlyError, Result};
pub use graph::{ConnectionGraph, Store};
pub use layout::{compute_layout, connection_curve, LayoutOptions, RectLookup};
pub use model::{Connection, CubicCurve, Element, PathDescriptor, Point, Rect, ELEMENT_CLASS};
pub use svg::js_number;
pub use zone::{BoxState, PathRenderer, Zone, ZoneConfig};
