#![cfg(target_arch = "wasm32")]

use curvly_wasm::Curvly;
use js_sys::{Array, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Document, DragEvent, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn fresh() -> Curvly {
    Curvly::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap()
}

fn is_ok(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok")).ok().and_then(|x| x.as_bool()) == Some(true)
}

fn value(v: &JsValue) -> JsValue {
    Reflect::get(v, &JsValue::from_str("value")).unwrap()
}

fn place_box(doc: &Document, id: &str, left: i32, top: i32) {
    if let Some(old) = doc.get_element_by_id(id) {
        old.remove();
    }
    let el: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    el.set_id(id);
    let style = el.style();
    style.set_property("position", "absolute").unwrap();
    style.set_property("left", &format!("{left}px")).unwrap();
    style.set_property("top", &format!("{top}px")).unwrap();
    style.set_property("width", "50px").unwrap();
    style.set_property("height", "50px").unwrap();
    doc.body().unwrap().append_child(&el).unwrap();
}

fn place_zone(doc: &Document, id: &str) {
    if let Some(old) = doc.get_element_by_id(id) {
        old.remove();
    }
    let svg = doc.create_element_ns(Some("http://www.w3.org/2000/svg"), "svg").unwrap();
    svg.set_id(id);
    doc.body().unwrap().append_child(&svg).unwrap();
}

fn path_count(doc: &Document, zone: &str) -> u32 {
    doc.get_element_by_id(zone).unwrap().child_element_count()
}

fn first_path(doc: &Document, zone: &str) -> String {
    let svg = doc.get_element_by_id(zone).unwrap();
    svg.first_element_child().unwrap().get_attribute("d").unwrap()
}

fn get(v: &JsValue, key: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(key)).unwrap()
}

fn js(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn graph_mutations_and_errors() {
    let mut c = fresh();
    assert!(is_ok(&c.add_box_res(Some("box1".into()), None, None, None)));
    assert!(is_ok(&c.add_box_res(Some("box2".into()), None, None, Some("box1".into()))));
    assert_eq!(c.connection_count(), 1);

    let r = c.add_box_res(Some("box3".into()), None, None, Some("nope".into()));
    assert!(is_err(&r, "unknown_box"));
    assert_eq!(c.box_count(), 2, "state mutated on error");

    assert!(is_err(&c.add_box_res(None, None, None, Some("box1".into())), "missing_id"));

    c.link_boxes("box2", "box1");
    assert_eq!(c.connection_count(), 1);
    c.unlink("box1", "box2");
    assert_eq!(c.connection_count(), 0);
}

#[wasm_bindgen_test]
fn mount_draws_one_path_per_connection() {
    let doc = document();
    place_box(&doc, "m1", 0, 0);
    place_box(&doc, "m2", 200, 0);
    place_zone(&doc, "mzone");

    let mut c = fresh();
    c.add_box_res(Some("m1".into()), None, None, None);
    c.add_box_res(Some("m2".into()), None, None, Some("m1".into()));
    assert!(is_ok(&c.mount_res("mzone".into())));
    assert_eq!(path_count(&doc, "mzone"), 1);

    let paths: Array = value(&c.paths_res()).dyn_into().unwrap();
    assert_eq!(paths.length(), 1);
}

#[wasm_bindgen_test]
fn unresolved_box_clears_zone() {
    let doc = document();
    place_box(&doc, "u1", 0, 0);
    place_zone(&doc, "uzone");

    let mut c = fresh();
    c.add_box_res(Some("u1".into()), None, None, None);
    assert!(is_ok(&c.mount_res("uzone".into())));
    c.link_boxes("u1", "ghost");
    assert!(is_err(&c.refresh_res(), "unresolved_box"));
    assert_eq!(path_count(&doc, "uzone"), 0);
}

#[wasm_bindgen_test]
fn drag_and_drop_moves_box_then_redraws() {
    let doc = document();
    place_box(&doc, "d1", 0, 0);
    place_box(&doc, "d2", 100, 0);
    place_zone(&doc, "dzone");

    let mut c = fresh();
    c.add_box_res(Some("d1".into()), None, None, None);
    c.add_box_res(Some("d2".into()), None, None, Some("d1".into()));
    c.mount_res("dzone".into());

    let started = c.drag_start_res("d2", 110.0, 5.0);
    assert!(is_ok(&started));
    let payload = value(&started).as_string().unwrap();
    assert_eq!(payload, "-10,-5,d2");
    assert_eq!(c.box_state("d2"), "dragging");

    assert!(is_ok(&c.drop_res(310.0, 105.0, &payload)));
    let moved: HtmlElement = doc.get_element_by_id("d2").unwrap().dyn_into().unwrap();
    assert_eq!(moved.style().get_property_value("left").unwrap(), "300px");
    assert_eq!(moved.style().get_property_value("top").unwrap(), "100px");

    assert!(is_ok(&c.drag_end_res("d2")));
    assert_eq!(c.box_state("d2"), "idle");
    assert_eq!(path_count(&doc, "dzone"), 1);
}

#[wasm_bindgen_test]
fn drop_and_drag_strict_errors() {
    let mut c = fresh();
    assert!(is_err(&c.drop_res(0.0, 0.0, "0,0,not-there"), "missing_target"));
    assert!(is_err(&c.drop_res(0.0, 0.0, "garbage"), "malformed_transfer"));
    assert!(is_err(&c.drag_start_res("not-there", 0.0, 0.0), "no_target"));
    assert!(is_err(&c.drag_start_res("x", f64::NAN, 0.0), "non_finite"));
    assert!(is_err(&c.refresh_res(), "no_zone"));
}

#[wasm_bindgen_test]
fn constructor_takes_config_and_graph() {
    let graph = js(concat!(
        r#"{"boxes":[{"id":"c1"},{"id":"c2"}],"#,
        r#""connections":[{"boxA":"c1","boxB":"c2"}]}"#
    ));
    let c = Curvly::new(js(r#"{"bezierWeight":0.25,"padding":4}"#), graph).unwrap();
    assert_eq!(c.box_count(), 2);
    assert_eq!(c.connection_count(), 1);
    let cfg = c.config();
    assert_eq!(get(&cfg, "bezierWeight").as_f64(), Some(0.25));
    assert_eq!(get(&cfg, "width").as_f64(), Some(750.0));
}

#[wasm_bindgen_test]
fn constructor_rejects_bad_input() {
    let thrown = Curvly::new(js(r#"{"width":"wide"}"#), JsValue::UNDEFINED).err().unwrap();
    assert_eq!(get(&thrown, "code").as_string().as_deref(), Some("invalid_config"));

    let cfg = js_sys::Object::new();
    Reflect::set(&cfg, &JsValue::from_str("padding"), &JsValue::from_f64(f64::NAN)).unwrap();
    let thrown = Curvly::new(cfg.into(), JsValue::UNDEFINED).err().unwrap();
    assert_eq!(get(&thrown, "code").as_string().as_deref(), Some("non_finite"));

    let thrown = Curvly::new(JsValue::NULL, js("[1,2]")).err().unwrap();
    assert_eq!(get(&thrown, "code").as_string().as_deref(), Some("invalid_json"));
}

#[wasm_bindgen_test]
fn partial_config_keeps_earlier_settings() {
    let mut c = fresh();
    assert!(is_ok(&c.configure_res(js(r#"{"padding":8,"curveClassName":"wire"}"#))));
    assert!(is_ok(&c.configure_res(js(r#"{"bezierWeight":0.3}"#))));
    let cfg = c.config();
    assert_eq!(get(&cfg, "padding").as_f64(), Some(8.0));
    assert_eq!(get(&cfg, "curveClassName").as_string().as_deref(), Some("wire"));
    assert_eq!(get(&cfg, "bezierWeight").as_f64(), Some(0.3));
    assert!(is_err(&c.configure_res(js(r#"{"draggable":"yes"}"#)), "invalid_config"));
    assert_eq!(get(&c.config(), "padding").as_f64(), Some(8.0));
}

#[wasm_bindgen_test]
fn mount_tags_boxes_with_class_and_draggable() {
    let doc = document();
    place_box(&doc, "t1", 0, 0);
    place_box(&doc, "t2", 100, 0);
    place_zone(&doc, "tzone");

    let mut c = fresh();
    c.add_box_res(Some("t1".into()), Some("box".into()), None, None);
    c.add_box_res(Some("t2".into()), None, Some(false), Some("t1".into()));
    assert!(is_ok(&c.mount_res("tzone".into())));

    let t1 = doc.get_element_by_id("t1").unwrap();
    assert_eq!(t1.get_attribute("class").as_deref(), Some("curvly-element box"));
    assert_eq!(t1.get_attribute("draggable").as_deref(), Some("true"));
    let t2 = doc.get_element_by_id("t2").unwrap();
    assert_eq!(t2.get_attribute("class").as_deref(), Some("curvly-element"));
    assert_eq!(t2.get_attribute("draggable").as_deref(), Some("false"));
}

#[wasm_bindgen_test]
fn dragend_event_redraws_through_listener() {
    let doc = document();
    place_box(&doc, "e1", 0, 0);
    place_box(&doc, "e2", 200, 0);
    place_zone(&doc, "ezone");

    let mut c = fresh();
    c.add_box_res(Some("e1".into()), None, None, None);
    c.add_box_res(Some("e2".into()), None, None, Some("e1".into()));
    assert!(is_ok(&c.mount_res("ezone".into())));
    let before = first_path(&doc, "ezone");

    let moved: HtmlElement = doc.get_element_by_id("e2").unwrap().dyn_into().unwrap();
    moved.style().set_property("top", "120px").unwrap();
    let ev = DragEvent::new("dragend").unwrap();
    moved.dispatch_event(&ev).unwrap();

    assert_eq!(path_count(&doc, "ezone"), 1);
    assert_ne!(first_path(&doc, "ezone"), before);
}

#[wasm_bindgen_test]
fn dropped_curvly_stops_listening() {
    let doc = document();
    place_box(&doc, "s1", 0, 0);
    place_box(&doc, "s2", 200, 0);
    place_zone(&doc, "szone");

    let mut c = fresh();
    c.add_box_res(Some("s1".into()), None, None, None);
    c.add_box_res(Some("s2".into()), None, None, Some("s1".into()));
    assert!(is_ok(&c.mount_res("szone".into())));
    let before = first_path(&doc, "szone");
    drop(c);

    let moved: HtmlElement = doc.get_element_by_id("s2").unwrap().dyn_into().unwrap();
    moved.style().set_property("top", "120px").unwrap();
    moved.dispatch_event(&DragEvent::new("dragend").unwrap()).unwrap();
    assert_eq!(first_path(&doc, "szone"), before);
}

#[wasm_bindgen_test]
fn auto_positioned_box_cannot_start_drag() {
    let doc = document();
    if let Some(old) = doc.get_element_by_id("static1") {
        old.remove();
    }
    let el = doc.create_element("div").unwrap();
    el.set_id("static1");
    doc.body().unwrap().append_child(&el).unwrap();

    let mut c = fresh();
    c.add_box_res(Some("static1".into()), None, None, None);
    let r = c.drag_start_res("static1", 5.0, 5.0);
    assert!(is_err(&r, "unpositioned_target"));
    assert_eq!(c.box_state("static1"), "idle");
}
