//! HP-GL encoder
//!
//! `IN;` initialises the device, `PU` travels, and each outline is drawn by
//! one `PD` command carrying every point including the closing one.

use plotkit_core::Polygon;

use super::Grammar;
use crate::options::ProtocolOptions;

/// `FS{force};VS{velocity};SP{pen};`, each only when set.
pub(crate) fn settings(options: &ProtocolOptions) -> String {
    let mut out = String::new();
    if let Some(force) = options.force {
        out.push_str(&format!("FS{};", force));
    }
    if let Some(velocity) = options.velocity {
        out.push_str(&format!("VS{};", velocity));
    }
    if let Some(pen) = options.pen {
        out.push_str(&format!("SP{};", pen));
    }
    out
}

pub(crate) const GRAMMAR: Grammar = Grammar {
    init: "IN;",
    settings,
    pen_up: "PU",
    pen_down: "PD",
    relative_pen_up: None,
    relative_pen_down: Some("PR"),
    batched: true,
    terminator: ";",
    finish: "",
};

/// Encodes polygons as HP-GL.
pub fn generate_hpgl(polygons: &[Polygon], options: &ProtocolOptions) -> String {
    GRAMMAR.encode(polygons, options)
}
