//! GP-GL encoder
//!
//! Graphtec cutters terminate every command with ETX (`0x03`). The pen
//! select command is always sent, defaulting to `J1`.

use plotkit_core::Polygon;

use super::Grammar;
use crate::options::ProtocolOptions;

pub const INIT: &str = "\x1B\x04TT\x03";

fn settings(options: &ProtocolOptions) -> String {
    let mut out = format!("J{}\x03", options.pen.unwrap_or(1));
    if let Some(force) = options.force {
        out.push_str(&format!("FX{},1\x03", force));
    }
    if let Some(velocity) = options.velocity {
        out.push_str(&format!("!{}\x03", velocity));
    }
    out
}

pub(crate) const GRAMMAR: Grammar = Grammar {
    init: INIT,
    settings,
    pen_up: "M",
    pen_down: "D",
    relative_pen_up: None,
    relative_pen_down: None,
    batched: true,
    terminator: "\x03",
    finish: "H\x03",
};

/// Encodes polygons as GP-GL.
pub fn generate_gpgl(polygons: &[Polygon], options: &ProtocolOptions) -> String {
    GRAMMAR.encode(polygons, options)
}
