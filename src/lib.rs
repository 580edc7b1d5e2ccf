//! # PlotKit
//!
//! Command codec for cutting plotters and vinyl cutters:
//! - HPGL, DMPL (modes 1, 2, 3, 4, 6), CAMM-GL (three modes) and GP-GL encoders
//! - A template-driven engine for dialects described purely by data
//! - A cut-preview parser that turns HP-GL streams back into polylines
//!
//! ## Architecture
//!
//! PlotKit is organized as a workspace with multiple crates:
//!
//! 1. **plotkit-core** - Geometry types, rounding, preprocessing, errors
//! 2. **plotkit-protocol** - Fixed dialect encoders, dispatcher, template engine
//! 3. **plotkit-preview** - Reverse parser and background parsing
//! 4. **plotkit-settings** - Plotter profiles in JSON or TOML
//! 5. **plotkit-cli** - The `plotkit` command line binary
//! 6. **plotkit** - This crate, integrating all of the above

pub use plotkit_core::{
    bounds, preprocess, preprocess_swapped, round_half_up, sort_by_min_x, sort_by_min_y, Error,
    Path, Point, Polygon, PreviewError, ProtocolError, Result,
};

pub use plotkit_protocol::{
    encode, feed_after_cut, generate_cammgl, generate_cammgl_mode1, generate_cammgl_mode2,
    generate_custom_protocol, generate_dmpl, generate_gpgl, generate_hpgl, generate_protocol,
    move_to_origin, CustomProtocolConfig, Dialect, DmplMode, ProtocolConfig, ProtocolOptions,
};

pub use plotkit_preview::{
    load_preview, parse_hpgl, parse_hpgl_offloaded, BACKGROUND_PARSE_THRESHOLD,
};

pub use plotkit_settings::{default_profile_path, PlotterProfile, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Honours `RUST_LOG` and defaults to INFO. Output goes to stderr so a
/// command stream written to stdout is never interleaved with log lines.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
