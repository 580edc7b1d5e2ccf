//! # PlotKit Protocol
//!
//! Converts polygon outlines into the command stream a cutting plotter
//! expects. Three entry points cover the common cases:
//!
//! 1. [`generate_protocol`] - fixed dialect selected by name
//! 2. [`generate_custom_protocol`] - data-driven dialect from command templates
//! 3. [`move_to_origin`] / [`feed_after_cut`] - single travel commands
//!
//! All functions are pure; the same input always yields the same bytes.

pub mod custom;
pub mod dialects;
pub mod dispatch;
pub mod options;
pub mod template;

pub use custom::{generate_custom_protocol, strip_init_prefix, KNOWN_INIT_PREFIXES};
pub use dialects::{
    generate_cammgl, generate_cammgl_mode1, generate_cammgl_mode2, generate_dmpl, generate_gpgl,
    generate_hpgl, Dialect, DmplMode,
};
pub use dispatch::{encode, feed_after_cut, generate_protocol, move_to_origin};
pub use options::{CustomProtocolConfig, ProtocolConfig, ProtocolOptions};
pub use template::{
    default_term, format_coordinates, parse_multi_point_command, process_delimiter_marker,
    process_escape_sequences, CommandTemplate,
};
