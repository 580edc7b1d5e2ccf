//! # PlotKit Preview
//!
//! Cut-preview support: parses a generated command stream back into the
//! polylines the plotter will cut, for on-screen simulation.

pub mod offload;
pub mod parser;

pub use offload::{load_preview, parse_hpgl_offloaded, should_offload, BACKGROUND_PARSE_THRESHOLD};
pub use parser::{parse_hpgl, tokenize, Instruction, PenState, PreviewBuilder};
