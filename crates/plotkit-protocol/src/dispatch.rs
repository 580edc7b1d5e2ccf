//! Dialect dispatch by name

use plotkit_core::{Point, Polygon, ProtocolError};
use tracing::debug;

use crate::dialects::Dialect;
use crate::options::{ProtocolConfig, ProtocolOptions};

/// Encodes `polygons` in `dialect`.
pub fn encode(dialect: Dialect, polygons: &[Polygon], options: &ProtocolOptions) -> String {
    dialect.encode(polygons, options)
}

/// Encodes `polygons` in the dialect named by `config.protocol`.
///
/// A requested origin move follows the init and settings commands so the
/// device is already listening; a requested material feed follows the last
/// outline and precedes the finish sequence.
pub fn generate_protocol(
    polygons: &[Polygon],
    config: &ProtocolConfig,
) -> Result<String, ProtocolError> {
    let dialect: Dialect = config.protocol.parse()?;
    let out = dialect.encode_job(polygons, &config.options);

    debug!(
        "Generated {} output for {} polygons ({} bytes)",
        dialect,
        polygons.len(),
        out.len()
    );
    Ok(out)
}

/// Travel command to `point` in the named dialect.
pub fn move_to_origin(protocol: &str, point: Point) -> Result<String, ProtocolError> {
    let dialect: Dialect = protocol.parse()?;
    Ok(dialect.move_to_origin(point))
}

/// Material feed command of `distance` in the named dialect.
pub fn feed_after_cut(protocol: &str, distance: f64) -> Result<String, ProtocolError> {
    let dialect: Dialect = protocol.parse()?;
    Ok(dialect.feed_after_cut(distance))
}
