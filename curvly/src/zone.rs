use crate::drag::{apply_drop, capture_drag_offset, DragOffset, DragTarget, PositionSink};
use crate::error::Result;
use crate::layout::{
    compute_layout, LayoutOptions, RectLookup, DEFAULT_BEZIER_WEIGHT, DEFAULT_PADDING,
};
use crate::model::{Connection, Element, PathDescriptor};
use crate::svg::DEFAULT_CURVE_CLASS;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_WIDTH: f64 = 750.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// Replaces the rendered curve set with exactly the given paths, in order.
pub trait PathRenderer {
    fn render_paths(&mut self, paths: &[PathDescriptor]) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoneConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub bezier_weight: f64,
    pub draggable: bool,
    pub curve_class_name: Option<String>,
    pub zone_class_name: Option<String>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
            bezier_weight: DEFAULT_BEZIER_WEIGHT,
            draggable: true,
            curve_class_name: None,
            zone_class_name: None,
        }
    }
}

impl ZoneConfig {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            padding: self.padding,
            bezier_weight: self.bezier_weight,
        }
    }

    pub fn curve_class(&self) -> &str {
        self.curve_class_name.as_deref().unwrap_or(DEFAULT_CURVE_CLASS)
    }

    pub fn is_draggable(&self, element: Option<&Element>) -> bool {
        element.and_then(|e| e.draggable).unwrap_or(self.draggable)
    }

    /// Overlays the keys of a partial config object onto this one. Keys the
    /// patch leaves out keep their current value.
    pub fn merged(&self, patch: serde_json::Value) -> Result<ZoneConfig> {
        let serde_json::Value::Object(patch) = patch else {
            return Ok(serde_json::from_value(patch)?);
        };
        let mut base = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut base {
            fields.extend(patch);
        }
        Ok(serde_json::from_value(base)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxState {
    Idle,
    Dragging,
}

/// Drag bookkeeping for the boxes of one zone. Curves are recomputed on
/// mount and whenever a drag ends; a drop only moves the box.
#[derive(Clone, Debug, Default)]
pub struct Zone {
    config: ZoneConfig,
    dragging: HashSet<String>,
}

impl Zone {
    pub fn new(config: ZoneConfig) -> Self {
        Zone {
            config,
            dragging: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ZoneConfig) {
        self.config = config;
    }

    pub fn state(&self, id: &str) -> BoxState {
        if self.dragging.contains(id) {
            BoxState::Dragging
        } else {
            BoxState::Idle
        }
    }

    pub fn mount<L, R>(
        &mut self,
        connections: &[Connection],
        lookup: &L,
        renderer: &mut R,
    ) -> Result<()>
    where
        L: RectLookup + ?Sized,
        R: PathRenderer + ?Sized,
    {
        debug!("mount zone with {} connections", connections.len());
        self.refresh(connections, lookup, renderer)
    }

    /// Full layout pass. On a layout failure the rendered set is cleared,
    /// nothing from this pass is drawn and the layout error is returned.
    /// Renderer failures are returned as they are.
    pub fn refresh<L, R>(
        &self,
        connections: &[Connection],
        lookup: &L,
        renderer: &mut R,
    ) -> Result<()>
    where
        L: RectLookup + ?Sized,
        R: PathRenderer + ?Sized,
    {
        match compute_layout(connections, lookup, &self.config.layout_options()) {
            Ok(paths) => renderer.render_paths(&paths),
            Err(e) => {
                if let Err(clear) = renderer.render_paths(&[]) {
                    warn!("could not clear curves after failed layout: {clear}");
                }
                Err(e)
            }
        }
    }

    /// Starts a drag. Returns `Ok(None)` when the element is not draggable.
    pub fn drag_start(
        &mut self,
        pointer_x: f64,
        pointer_y: f64,
        target: Option<&DragTarget>,
        element: Option<&Element>,
    ) -> Result<Option<DragOffset>> {
        if !self.config.is_draggable(element) {
            trace!("drag ignored: element not draggable");
            return Ok(None);
        }
        let offset = capture_drag_offset(pointer_x, pointer_y, target)?;
        self.dragging.insert(offset.id.clone());
        Ok(Some(offset))
    }

    pub fn drag_end<L, R>(
        &mut self,
        id: &str,
        connections: &[Connection],
        lookup: &L,
        renderer: &mut R,
    ) -> Result<()>
    where
        L: RectLookup + ?Sized,
        R: PathRenderer + ?Sized,
    {
        self.dragging.remove(id);
        trace!("drag end on {id}");
        self.refresh(connections, lookup, renderer)
    }

    /// Applies a transfer payload (`"left,top,id"`). Layout is left alone.
    pub fn drop_at<S>(
        &self,
        pointer_x: f64,
        pointer_y: f64,
        payload: &str,
        sink: &mut S,
    ) -> Result<DragOffset>
    where
        S: PositionSink + ?Sized,
    {
        let offset: DragOffset = payload.parse()?;
        apply_drop(pointer_x, pointer_y, &offset, sink)?;
        Ok(offset)
    }
}
