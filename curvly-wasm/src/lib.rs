use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
mod api;
mod dom;
mod error;
mod interop;

use curvly::DragOffset;
use error::HostError;

/// What the page's event listeners and the JS methods share: graph store,
/// drag state and the id of the `<svg>` element curves are drawn into.
#[derive(Default)]
pub(crate) struct State {
    pub(crate) store: curvly::Store,
    pub(crate) zone: curvly::Zone,
    pub(crate) svg_id: Option<String>,
}

impl State {
    pub(crate) fn renderer(&self, geom: &dom::DomGeometry) -> Result<dom::SvgRenderer, HostError> {
        let svg_id = self.svg_id.as_deref().ok_or(HostError::NoZone)?;
        let svg = geom.element(svg_id).ok_or(HostError::NoZone)?;
        Ok(dom::SvgRenderer::new(geom.document(), svg, self.zone.config())?)
    }

    pub(crate) fn refresh(&self) -> Result<(), HostError> {
        let geom = dom::DomGeometry::new().ok_or(HostError::NoDocument)?;
        let mut renderer = self.renderer(&geom)?;
        let graph = self.store.snapshot();
        Ok(self.zone.refresh(graph.connections(), &geom, &mut renderer)?)
    }

    pub(crate) fn drag_start(
        &mut self,
        id: &str,
        client_x: f64,
        client_y: f64,
    ) -> Result<Option<DragOffset>, HostError> {
        let geom = dom::DomGeometry::new().ok_or(HostError::NoDocument)?;
        let target = geom.drag_target(id);
        let graph = self.store.snapshot();
        Ok(self.zone.drag_start(client_x, client_y, target.as_ref(), graph.get_box(id))?)
    }

    pub(crate) fn drag_end(&mut self, id: &str) -> Result<(), HostError> {
        let geom = dom::DomGeometry::new().ok_or(HostError::NoDocument)?;
        let mut renderer = self.renderer(&geom)?;
        let graph = self.store.snapshot();
        Ok(self.zone.drag_end(id, graph.connections(), &geom, &mut renderer)?)
    }

    pub(crate) fn drop_at(
        &self,
        client_x: f64,
        client_y: f64,
        payload: &str,
    ) -> Result<DragOffset, HostError> {
        let mut geom = dom::DomGeometry::new().ok_or(HostError::NoDocument)?;
        Ok(self.zone.drop_at(client_x, client_y, payload, &mut geom)?)
    }
}

/// Browser-side zone. Once mounted, the boxes carry `dragstart`/`dragend`
/// listeners and the page body `dragover`/`drop`; dropping the `Curvly`
/// removes them.
#[wasm_bindgen]
pub struct Curvly {
    pub(crate) state: Rc<RefCell<State>>,
    pub(crate) listeners: Vec<dom::Listener>,
}

impl Curvly {
    pub fn rs_new() -> Curvly {
        Curvly { state: Rc::new(RefCell::new(State::default())), listeners: Vec::new() }
    }
}
