use crate::error::{CurvlyError, Result};
use crate::model::{Connection, CubicCurve, PathDescriptor, Point, Rect};
use crate::svg::path_data;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_PADDING: f64 = 0.0;
pub const DEFAULT_BEZIER_WEIGHT: f64 = 0.675;

/// Source of current box geometry. Read fresh on every layout pass.
pub trait RectLookup {
    fn rect(&self, id: &str) -> Option<Rect>;
}

impl<F> RectLookup for F
where
    F: Fn(&str) -> Option<Rect>,
{
    fn rect(&self, id: &str) -> Option<Rect> {
        self(id)
    }
}

impl RectLookup for HashMap<String, Rect> {
    fn rect(&self, id: &str) -> Option<Rect> {
        self.get(id).copied()
    }
}

impl RectLookup for BTreeMap<String, Rect> {
    fn rect(&self, id: &str) -> Option<Rect> {
        self.get(id).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Subtracted from both coordinates of each endpoint.
    pub padding: f64,
    /// 0 draws a straight line; larger values pull the control points
    /// further out horizontally.
    pub bezier_weight: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            padding: DEFAULT_PADDING,
            bezier_weight: DEFAULT_BEZIER_WEIGHT,
        }
    }
}

/// Curve between two resolved boxes.
///
/// Box B's center is offset by box A's half-size, not its own; rendered
/// output depends on this, so it is kept as is.
pub fn connection_curve(a: Rect, b: Rect, opts: &LayoutOptions) -> CubicCurve {
    let half_w = a.width / 2.0;
    let half_h = a.height / 2.0;
    let x1 = a.left + half_w - opts.padding;
    let y1 = a.top + half_h - opts.padding;
    let x4 = b.left + half_w - opts.padding;
    let y4 = b.top + half_h - opts.padding;
    let dx = (x4 - x1).abs() * opts.bezier_weight;
    let (x2, x3) = if x4 < x1 {
        (x1 - dx, x4 + dx)
    } else {
        (x1 + dx, x4 - dx)
    };
    CubicCurve {
        start: Point::new(x1, y1),
        c1: Point::new(x2, y1),
        c2: Point::new(x3, y4),
        end: Point::new(x4, y4),
    }
}

/// Computes one path per connection, in input order. Any unresolved id
/// aborts the whole pass; box A is resolved before box B.
pub fn compute_layout<L>(
    connections: &[Connection],
    lookup: &L,
    opts: &LayoutOptions,
) -> Result<Vec<PathDescriptor>>
where
    L: RectLookup + ?Sized,
{
    let resolve = |id: &str| {
        lookup
            .rect(id)
            .ok_or_else(|| CurvlyError::UnresolvedBox { id: id.to_string() })
    };
    let mut out = Vec::with_capacity(connections.len());
    for c in connections {
        let a = resolve(&c.box_a)?;
        let b = resolve(&c.box_b)?;
        let curve = connection_curve(a, b, opts);
        out.push(PathDescriptor {
            connection: c.clone(),
            d: path_data(&curve),
            curve,
        });
    }
    debug!("layout pass: {} paths", out.len());
    Ok(out)
}
