use crate::dom::{decorate_box, DomGeometry, Listener};
use crate::error::{self, finite, HostError};
use crate::interop;
use crate::Curvly;
use curvly::{compute_layout, BoxState, ConnectionGraph, DragOffset, Element};
use js_sys::Reflect;
use log::{debug, warn};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::DragEvent;

// Format the payload travels under in `dataTransfer`.
const TRANSFER_FORMAT: &str = "Text";

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `log` output to the browser console and installs the panic hook.
#[wasm_bindgen]
pub fn init() {
    if console_log::init_with_level(log::Level::Debug).is_ok() {
        log::info!("curvly logging initialized");
    }
    set_panic_hook();
}

fn is_absent(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

impl Curvly {
    /// Overlays a (possibly partial) config object onto the current one.
    fn apply_config(&mut self, config: JsValue) -> Result<(), HostError> {
        // JSON has no NaN/Infinity, so check the raw numbers first
        for name in ["width", "height", "padding", "bezierWeight"] {
            let raw = Reflect::get(&config, &JsValue::from_str(name)).ok();
            if let Some(v) = raw.and_then(|v| v.as_f64()) {
                finite(name, v)?;
            }
        }
        let patch: serde_json::Value = serde_wasm_bindgen::from_value(config)
            .map_err(|e| HostError::InvalidConfig(e.to_string()))?;
        let mut state = self.state.borrow_mut();
        let cfg = state
            .zone
            .config()
            .merged(patch)
            .map_err(|e| HostError::InvalidConfig(e.to_string()))?;
        state.zone.set_config(cfg);
        Ok(())
    }

    fn apply_graph(&mut self, graph: JsValue) -> Result<(), HostError> {
        let v: serde_json::Value = serde_wasm_bindgen::from_value(graph)
            .map_err(|e| HostError::InvalidJson(e.to_string()))?;
        let g = ConnectionGraph::from_json_value(v)?;
        self.state.borrow_mut().store.replace(g);
        Ok(())
    }

    /// Re-registers every listener for the current set of boxes and tags
    /// the boxes found in the page. Boxes without an element are skipped.
    fn wire(&mut self, geom: &DomGeometry) -> Result<(), HostError> {
        self.listeners.clear();
        let body = geom.document().body().ok_or(HostError::NoDocument)?;

        self.listeners.push(Listener::attach(&body, "dragover", |ev: DragEvent| {
            ev.prevent_default();
        })?);

        let state = Rc::clone(&self.state);
        self.listeners.push(Listener::attach(&body, "drop", move |ev: DragEvent| {
            ev.prevent_default();
            let Some(payload) = ev.data_transfer().and_then(|dt| dt.get_data(TRANSFER_FORMAT).ok())
            else {
                return;
            };
            let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
            if let Err(e) = state.borrow().drop_at(x, y, &payload) {
                warn!("drop failed: {e}");
            }
        })?);

        let (graph, config) = {
            let state = self.state.borrow();
            (state.store.snapshot(), state.zone.config().clone())
        };
        for b in graph.boxes() {
            let Some(id) = b.id.as_deref() else { continue };
            let Some(el) = geom.element(id) else {
                debug!("box {id} has no element yet");
                continue;
            };
            let draggable = config.is_draggable(Some(b));
            decorate_box(&el, b, draggable)?;
            if !draggable {
                continue;
            }

            let (state, box_id) = (Rc::clone(&self.state), id.to_string());
            self.listeners.push(Listener::attach(&el, "dragstart", move |ev: DragEvent| {
                let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
                let started = state.borrow_mut().drag_start(&box_id, x, y);
                match started {
                    Ok(Some(offset)) => {
                        let Some(dt) = ev.data_transfer() else { return };
                        if let Err(e) = dt.set_data(TRANSFER_FORMAT, &offset.to_string()) {
                            warn!("could not stash drag payload for {box_id}: {e:?}");
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("drag start on {box_id} failed: {e}"),
                }
            })?);

            let (state, box_id) = (Rc::clone(&self.state), id.to_string());
            self.listeners.push(Listener::attach(&el, "dragend", move |_: DragEvent| {
                if let Err(e) = state.borrow_mut().drag_end(&box_id) {
                    warn!("redraw after dragging {box_id} failed: {e}");
                }
            })?);
        }
        debug!("wired {} listeners", self.listeners.len());
        Ok(())
    }

    fn drag_start(
        &mut self,
        id: &str,
        client_x: f64,
        client_y: f64,
    ) -> Result<Option<DragOffset>, HostError> {
        let (x, y) = (finite("client_x", client_x)?, finite("client_y", client_y)?);
        self.state.borrow_mut().drag_start(id, x, y)
    }

    fn drop_at(
        &self,
        client_x: f64,
        client_y: f64,
        payload: &str,
    ) -> Result<DragOffset, HostError> {
        let (x, y) = (finite("client_x", client_x)?, finite("client_y", client_y)?);
        self.state.borrow().drop_at(x, y, payload)
    }

    fn mount_zone(&mut self) -> Result<(), HostError> {
        let geom = DomGeometry::new().ok_or(HostError::NoDocument)?;
        if self.state.borrow().svg_id.is_none() {
            return Err(HostError::NoZone);
        }
        self.wire(&geom)?;
        self.state.borrow().refresh()
    }
}

#[wasm_bindgen]
impl Curvly {
    /// Both arguments are optional; when given they are validated like
    /// `configure_res` and `load_res`, and a bad one throws.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, graph: JsValue) -> Result<Curvly, JsValue> {
        let mut c = Curvly::rs_new();
        if !is_absent(&config) {
            c.apply_config(config)?;
        }
        if !is_absent(&graph) {
            c.apply_graph(graph)?;
        }
        Ok(c)
    }

    // Config
    pub fn configure_res(&mut self, config: JsValue) -> JsValue {
        error::respond(self.apply_config(config).map(|_| JsValue::UNDEFINED))
    }
    pub fn config(&self) -> JsValue {
        interop::to_js(self.state.borrow().zone.config())
    }

    // Graph
    pub fn load_res(&mut self, graph: JsValue) -> JsValue {
        error::respond(self.apply_graph(graph).map(|_| JsValue::UNDEFINED))
    }
    pub fn to_json(&self) -> JsValue {
        interop::to_js(self.state.borrow().store.graph())
    }
    pub fn add_box_res(
        &mut self,
        id: Option<String>,
        class_name: Option<String>,
        draggable: Option<bool>,
        linked_with: Option<String>,
    ) -> JsValue {
        let el = Element { id, class_name: class_name.unwrap_or_default(), draggable };
        let mut state = self.state.borrow_mut();
        let r = state.store.add_box(el, linked_with.as_deref()).map_err(HostError::from);
        error::respond(r.map(|_| JsValue::from_f64(state.store.graph().boxes().len() as f64)))
    }
    pub fn remove_box(&mut self, id: &str) {
        self.state.borrow_mut().store.remove_box(id);
    }
    pub fn link_boxes(&mut self, a: &str, b: &str) {
        self.state.borrow_mut().store.link_boxes(a, b);
    }
    pub fn unlink_all(&mut self, id: &str) {
        self.state.borrow_mut().store.unlink_all(id);
    }
    pub fn unlink(&mut self, a: &str, b: &str) {
        self.state.borrow_mut().store.unlink(a, b);
    }
    pub fn box_count(&self) -> u32 {
        self.state.borrow().store.graph().boxes().len() as u32
    }
    pub fn connection_count(&self) -> u32 {
        self.state.borrow().store.graph().connections().len() as u32
    }

    // Layout
    pub fn mount_res(&mut self, svg_id: String) -> JsValue {
        let Some(geom) = DomGeometry::new() else { return HostError::NoDocument.envelope() };
        if geom.element(&svg_id).is_none() {
            return HostError::NoZone.envelope();
        }
        debug!("mount zone on #{svg_id}");
        self.state.borrow_mut().svg_id = Some(svg_id);
        error::respond(self.mount_zone().map(|_| JsValue::UNDEFINED))
    }
    /// Redraw after the host mutated the graph; boxes added since the last
    /// call get their listeners here.
    pub fn refresh_res(&mut self) -> JsValue {
        error::respond(self.mount_zone().map(|_| JsValue::UNDEFINED))
    }
    pub fn paths_res(&self) -> JsValue {
        let Some(geom) = DomGeometry::new() else { return HostError::NoDocument.envelope() };
        let state = self.state.borrow();
        let opts = state.zone.config().layout_options();
        let r = compute_layout(state.store.graph().connections(), &geom, &opts);
        error::respond(r.map(|paths| interop::paths_array(&paths).into()).map_err(HostError::from))
    }
    pub fn to_svg_res(&self) -> JsValue {
        let Some(geom) = DomGeometry::new() else { return HostError::NoDocument.envelope() };
        let state = self.state.borrow();
        let cfg = state.zone.config();
        let r = compute_layout(state.store.graph().connections(), &geom, &cfg.layout_options())
            .map(|paths| JsValue::from_str(&curvly::svg::to_svg_document(&paths, cfg)));
        error::respond(r.map_err(HostError::from))
    }

    // Drag and drop
    /// Returns the transfer payload to stash in `dataTransfer`, or `null`
    /// when the box is not draggable.
    pub fn drag_start_res(&mut self, id: &str, client_x: f64, client_y: f64) -> JsValue {
        error::respond(self.drag_start(id, client_x, client_y).map(|o| match o {
            Some(offset) => JsValue::from_str(&offset.to_string()),
            None => JsValue::NULL,
        }))
    }
    pub fn drag_end_res(&mut self, id: &str) -> JsValue {
        let r = self.state.borrow_mut().drag_end(id);
        error::respond(r.map(|_| JsValue::UNDEFINED))
    }
    pub fn drop_res(&mut self, client_x: f64, client_y: f64, payload: &str) -> JsValue {
        let r = self.drop_at(client_x, client_y, payload);
        error::respond(r.map(|offset| JsValue::from_str(&offset.id)))
    }
    pub fn box_state(&self, id: &str) -> String {
        match self.state.borrow().zone.state(id) {
            BoxState::Idle => "idle".into(),
            BoxState::Dragging => "dragging".into(),
        }
    }
}

impl Default for Curvly {
    fn default() -> Self {
        Curvly::rs_new()
    }
}
