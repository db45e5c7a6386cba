use crate::error::{CurvlyError, Result};
use crate::svg::js_number;
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The element a drag gesture started on, as currently laid out. A `left`
/// or `top` that could not be read (e.g. `auto`) is NaN.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragTarget {
    pub id: Option<String>,
    pub left: f64,
    pub top: f64,
}

impl DragTarget {
    pub fn new(id: impl Into<String>, left: f64, top: f64) -> Self {
        DragTarget {
            id: Some(id.into()),
            left,
            top,
        }
    }
}

/// Pointer-to-corner offset captured at drag start, consumed at drop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragOffset {
    pub left: f64,
    pub top: f64,
    pub id: String,
}

/// Moves boxes on behalf of the drag helper.
pub trait PositionSink {
    /// `Ok(false)` when no element has `id`; `Err` when the move itself failed.
    fn set_position(&mut self, id: &str, left: f64, top: f64) -> Result<bool>;
}

pub fn capture_drag_offset(
    pointer_x: f64,
    pointer_y: f64,
    target: Option<&DragTarget>,
) -> Result<DragOffset> {
    let target = target.ok_or(CurvlyError::NoTarget)?;
    let id = target.id.clone().ok_or(CurvlyError::MissingId)?;
    if !target.left.is_finite() || !target.top.is_finite() {
        return Err(CurvlyError::UnpositionedTarget { id });
    }
    trace!("drag start on {id} at ({pointer_x}, {pointer_y})");
    Ok(DragOffset {
        left: target.left - pointer_x,
        top: target.top - pointer_y,
        id,
    })
}

pub fn apply_drop<S>(
    pointer_x: f64,
    pointer_y: f64,
    offset: &DragOffset,
    sink: &mut S,
) -> Result<()>
where
    S: PositionSink + ?Sized,
{
    let left = pointer_x + offset.left;
    let top = pointer_y + offset.top;
    if !sink.set_position(&offset.id, left, top)? {
        return Err(CurvlyError::MissingTarget {
            id: offset.id.clone(),
        });
    }
    trace!("dropped {} at ({left}, {top})", offset.id);
    Ok(())
}

/// Leading integer of `s`: optional sign then digits, anything after is
/// ignored (`"12px"` is 12). Used for payload numbers and CSS offsets.
pub fn parse_int_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let v: f64 = rest[..digits].parse().ok()?;
    Some(if neg { -v } else { v })
}

/// Transfer encoding: `"left,top,id"`.
impl fmt::Display for DragOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", js_number(self.left), js_number(self.top), self.id)
    }
}

impl FromStr for DragOffset {
    type Err = CurvlyError;

    fn from_str(payload: &str) -> Result<Self> {
        let malformed = || CurvlyError::MalformedTransfer {
            payload: payload.to_string(),
        };
        let mut parts = payload.splitn(3, ',');
        let left = parts.next().and_then(parse_int_prefix).ok_or_else(malformed)?;
        let top = parts.next().and_then(parse_int_prefix).ok_or_else(malformed)?;
        let id = parts.next().filter(|id| !id.is_empty()).ok_or_else(malformed)?;
        Ok(DragOffset {
            left,
            top,
            id: id.to_string(),
        })
    }
}
