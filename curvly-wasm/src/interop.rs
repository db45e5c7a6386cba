use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }

pub fn set_kv(obj: &Object, key: &str, val: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), val);
}

pub fn paths_array(paths: &[curvly::PathDescriptor]) -> Array {
    let arr = Array::new();
    for p in paths {
        let o = new_obj();
        set_kv(&o, "d", &JsValue::from_str(&p.d));
        set_kv(&o, "boxA", &JsValue::from_str(&p.connection.box_a));
        set_kv(&o, "boxB", &JsValue::from_str(&p.connection.box_b));
        arr.push(&o);
    }
    arr
}

/// Plain JS objects/arrays (no `Map`s, `null` for `None`).
pub fn to_js<T: serde::Serialize>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap_or(JsValue::NULL)
}
