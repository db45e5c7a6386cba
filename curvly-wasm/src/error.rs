use crate::interop::{new_obj, set_kv};
use curvly::CurvlyError;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Failures of the browser host: core errors plus what only the page can get wrong.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Core(#[from] CurvlyError),

    #[error("no window/document available")]
    NoDocument,

    #[error("mount the zone on an <svg> element first")]
    NoZone,

    #[error("parameter '{0}' must be finite")]
    NonFinite(&'static str),

    #[error("{0}")]
    InvalidConfig(String),

    #[error("{0}")]
    InvalidJson(String),
}

impl HostError {
    pub fn code(&self) -> &'static str {
        match self {
            HostError::Core(e) => e.code(),
            HostError::NoDocument => "no_document",
            HostError::NoZone => "no_zone",
            HostError::NonFinite(_) => "non_finite",
            HostError::InvalidConfig(_) => "invalid_config",
            HostError::InvalidJson(_) => "invalid_json",
        }
    }

    /// `data.id` carries the offending box id, `data.param` the bad argument.
    fn data(&self) -> Option<JsValue> {
        let d = new_obj();
        match self {
            HostError::Core(e) => set_kv(&d, "id", &JsValue::from_str(e.id()?)),
            HostError::NonFinite(param) => set_kv(&d, "param", &JsValue::from_str(param)),
            _ => return None,
        }
        Some(d.into())
    }

    pub fn envelope(&self) -> JsValue {
        err(self.code(), self.to_string(), self.data())
    }
}

/// Thrown form, for the constructor: an `Error` with a `code` property.
impl From<HostError> for JsValue {
    fn from(e: HostError) -> JsValue {
        let thrown = js_sys::Error::new(&e.to_string());
        set_kv(&thrown, "code", &JsValue::from_str(e.code()));
        thrown.into()
    }
}

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

pub fn respond(r: Result<JsValue, HostError>) -> JsValue {
    match r {
        Ok(v) => ok(v),
        Err(e) => e.envelope(),
    }
}

#[inline]
pub fn finite(param: &'static str, v: f64) -> Result<f64, HostError> {
    if v.is_finite() { Ok(v) } else { Err(HostError::NonFinite(param)) }
}

/// A rejected DOM call, as a core error the zone can propagate.
pub fn js_failure(op: &'static str, e: JsValue) -> CurvlyError {
    let message = e
        .as_string()
        .or_else(|| e.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{e:?}"));
    CurvlyError::Host { op, message }
}
