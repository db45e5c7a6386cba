use crate::model::{CubicCurve, PathDescriptor};
use crate::zone::ZoneConfig;
use std::fmt::Write;

pub const DEFAULT_CURVE_CLASS: &str = "curvly-curve";

/// Formats `v` the way a browser stringifies a number: plain decimals for
/// magnitudes in [1e-6, 1e21), exponent form (`1e+21`, `1.5e-7`) outside.
pub fn js_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    // -0 prints as 0
    let v = v + 0.0;
    let mag = v.abs();
    if mag == 0.0 || (1e-6..1e21).contains(&mag) {
        return format!("{v}");
    }
    let exp = format!("{v:e}");
    match exp.split_once('e') {
        Some((mantissa, e)) if !e.starts_with('-') => format!("{mantissa}e+{e}"),
        _ => exp,
    }
}

/// Path data for a curve whose control points share their endpoint's height.
pub fn path_data(c: &CubicCurve) -> String {
    format!(
        "M{} {} C {} {} {} {} {} {}",
        js_number(c.start.x),
        js_number(c.start.y),
        js_number(c.c1.x),
        js_number(c.start.y),
        js_number(c.c2.x),
        js_number(c.end.y),
        js_number(c.end.x),
        js_number(c.end.y)
    )
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Standalone `<svg>` zone containing one `<path>` per descriptor.
pub fn to_svg_document(paths: &[PathDescriptor], config: &ZoneConfig) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\"",
        js_number(config.width),
        js_number(config.height)
    );
    if let Some(class) = &config.zone_class_name {
        let _ = write!(out, " class=\"{}\"", escape_attr(class));
    }
    out.push('>');
    let curve_class = escape_attr(config.curve_class());
    for p in paths {
        let _ = write!(out, "<path d=\"{}\" class=\"{}\"/>", p.d, curve_class);
    }
    out.push_str("</svg>");
    out
}
