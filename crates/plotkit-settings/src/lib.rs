//! PlotKit Settings Crate
//!
//! Plotter profiles: loading and saving in JSON or TOML, validation, and the
//! profile-driven encode and preview pipeline.

pub mod error;
pub mod profile;

pub use error::{SettingsError, SettingsResult};
pub use profile::{default_profile_path, PlotterProfile};
