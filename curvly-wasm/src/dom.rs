use crate::error::js_failure;
use curvly::{
    parse_int_prefix, DragTarget, PathDescriptor, PathRenderer, PositionSink, Rect, RectLookup,
    ZoneConfig,
};
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, DragEvent, Element, EventTarget, HtmlElement, Window};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Box geometry read straight from the live DOM on every call.
pub struct DomGeometry {
    window: Window,
    document: Document,
}

impl DomGeometry {
    pub fn new() -> Option<DomGeometry> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(DomGeometry { window, document })
    }

    pub fn document(&self) -> &Document { &self.document }

    pub fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    /// Current `left`/`top` as laid out (computed style, integer part). A
    /// value without a numeric prefix, such as `auto`, comes back as NaN.
    pub fn drag_target(&self, id: &str) -> Option<DragTarget> {
        let el = self.element(id)?;
        let style = self.window.get_computed_style(&el).ok().flatten()?;
        let px = |prop: &str| {
            style
                .get_property_value(prop)
                .ok()
                .and_then(|v| parse_int_prefix(&v))
                .unwrap_or(f64::NAN)
        };
        Some(DragTarget {
            id: Some(id.to_string()),
            left: px("left"),
            top: px("top"),
        })
    }
}

impl RectLookup for DomGeometry {
    fn rect(&self, id: &str) -> Option<Rect> {
        let el = self.element(id)?;
        let r = el.get_bounding_client_rect();
        let sx = self.window.scroll_x().unwrap_or(0.0);
        let sy = self.window.scroll_y().unwrap_or(0.0);
        Some(Rect::new(
            r.left() + sx,
            r.top() + sy,
            el.client_width() as f64,
            el.client_height() as f64,
        ))
    }
}

impl PositionSink for DomGeometry {
    fn set_position(&mut self, id: &str, left: f64, top: f64) -> curvly::Result<bool> {
        let Some(el) = self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return Ok(false);
        };
        let style = el.style();
        style
            .set_property("left", &format!("{}px", curvly::js_number(left)))
            .map_err(|e| js_failure("set style.left", e))?;
        style
            .set_property("top", &format!("{}px", curvly::js_number(top)))
            .map_err(|e| js_failure("set style.top", e))?;
        Ok(true)
    }
}

/// Tags a mounted box: zone class plus its own, and the `draggable` flag.
pub fn decorate_box(el: &Element, b: &curvly::Element, draggable: bool) -> curvly::Result<()> {
    el.set_attribute("class", &b.class_attr())
        .map_err(|e| js_failure("set box class", e))?;
    el.set_attribute("draggable", if draggable { "true" } else { "false" })
        .map_err(|e| js_failure("set box draggable", e))
}

/// A drag event handler registered on `target`; unregistered on drop.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(DragEvent)>,
}

impl Listener {
    pub fn attach<F>(target: &EventTarget, kind: &'static str, handler: F) -> curvly::Result<Self>
    where
        F: FnMut(DragEvent) + 'static,
    {
        let callback = Closure::<dyn FnMut(DragEvent)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| js_failure("addEventListener", e))?;
        Ok(Listener { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let cb = self.callback.as_ref().unchecked_ref();
        if let Err(e) = self.target.remove_event_listener_with_callback(self.kind, cb) {
            debug!("could not remove {} listener: {e:?}", self.kind);
        }
    }
}

/// Renders curves as `<path>` children of the zone's `<svg>`.
pub struct SvgRenderer {
    document: Document,
    svg: Element,
    curve_class: String,
}

impl SvgRenderer {
    pub fn new(document: &Document, svg: Element, config: &ZoneConfig) -> curvly::Result<Self> {
        let set = |name: &str, value: &str| {
            svg.set_attribute(name, value).map_err(|e| js_failure("set zone attribute", e))
        };
        set("width", &curvly::js_number(config.width))?;
        set("height", &curvly::js_number(config.height))?;
        if let Some(class) = &config.zone_class_name {
            set("class", class)?;
        }
        Ok(SvgRenderer {
            document: document.clone(),
            svg,
            curve_class: config.curve_class().to_string(),
        })
    }

    fn path_element(&self, p: &PathDescriptor) -> curvly::Result<Element> {
        let path = self
            .document
            .create_element_ns(Some(SVG_NS), "path")
            .map_err(|e| js_failure("create path", e))?;
        path.set_attribute("d", &p.d).map_err(|e| js_failure("set path data", e))?;
        path.set_attribute("class", &self.curve_class)
            .map_err(|e| js_failure("set path class", e))?;
        Ok(path)
    }
}

impl PathRenderer for SvgRenderer {
    /// Builds every new `<path>` before touching the zone, so a failure while
    /// building leaves the previous curves in place.
    fn render_paths(&mut self, paths: &[PathDescriptor]) -> curvly::Result<()> {
        let built = paths
            .iter()
            .map(|p| self.path_element(p))
            .collect::<curvly::Result<Vec<_>>>()?;
        while let Some(child) = self.svg.first_child() {
            self.svg.remove_child(&child).map_err(|e| js_failure("remove path", e))?;
        }
        for path in &built {
            self.svg.append_child(path).map_err(|e| js_failure("append path", e))?;
        }
        debug!("rendered {} curves", built.len());
        Ok(())
    }
}
