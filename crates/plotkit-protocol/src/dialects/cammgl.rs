//! CAMM-GL encoders
//!
//! Roland cutters. Plain CAMM-GL shares the HP-GL settings commands but
//! travels with `M` and draws one `D` per point. The two firmware modes add
//! a fixed trailer that resets the device back to PJL.

use plotkit_core::Polygon;

use super::{hpgl, Grammar};
use crate::options::ProtocolOptions;

pub const TRAILER: &str = "EC0;!PG0;!ST1;PA;@PJL RESET;@PJL ENTER LANGUAGE = RESET;";

fn mode1_settings(options: &ProtocolOptions) -> String {
    // pen select is disabled in mode 1
    hpgl::settings(&ProtocolOptions {
        pen: None,
        ..options.clone()
    })
}

fn mode2_settings(options: &ProtocolOptions) -> String {
    options
        .pen
        .map(|pen| format!("EC{};", pen))
        .unwrap_or_default()
}

pub(crate) const GRAMMAR: Grammar = Grammar {
    init: "IN;",
    settings: hpgl::settings,
    pen_up: "M",
    pen_down: "D",
    relative_pen_up: None,
    relative_pen_down: None,
    batched: false,
    terminator: ";",
    finish: "",
};

pub(crate) const MODE1_GRAMMAR: Grammar = Grammar {
    init: "H;",
    settings: mode1_settings,
    finish: TRAILER,
    ..GRAMMAR
};

pub(crate) const MODE2_GRAMMAR: Grammar = Grammar {
    init: "IN;PA;",
    settings: mode2_settings,
    pen_up: "PU",
    pen_down: "PD",
    relative_pen_up: Some("PR"),
    relative_pen_down: Some("PR"),
    finish: TRAILER,
    ..GRAMMAR
};

/// Encodes polygons as CAMM-GL.
pub fn generate_cammgl(polygons: &[Polygon], options: &ProtocolOptions) -> String {
    GRAMMAR.encode(polygons, options)
}

/// Encodes polygons as CAMM-GL for mode 1 firmware.
pub fn generate_cammgl_mode1(polygons: &[Polygon], options: &ProtocolOptions) -> String {
    MODE1_GRAMMAR.encode(polygons, options)
}

/// Encodes polygons as CAMM-GL for mode 2 firmware.
pub fn generate_cammgl_mode2(polygons: &[Polygon], options: &ProtocolOptions) -> String {
    MODE2_GRAMMAR.encode(polygons, options)
}
