//! Background parsing for large command streams
//!
//! Parsing is CPU bound and all-or-nothing. Streams above
//! [`BACKGROUND_PARSE_THRESHOLD`] run on tokio's blocking pool so an async
//! front end keeps servicing events; smaller ones parse inline. Dropping the
//! returned future discards the result.

use plotkit_core::{Error, Path, PreviewError};
use tracing::debug;

use crate::parser::parse_hpgl;

/// Stream size in bytes from which parsing moves off the calling task.
pub const BACKGROUND_PARSE_THRESHOLD: usize = 256 * 1024;

/// True when a stream of this size should be parsed in the background.
pub fn should_offload(hpgl: &str) -> bool {
    hpgl.len() >= BACKGROUND_PARSE_THRESHOLD
}

/// Parses `hpgl`, on the blocking pool when it is large.
pub async fn parse_hpgl_offloaded(
    hpgl: String,
    ratio: f64,
    surface_height: f64,
) -> Result<Vec<Path>, PreviewError> {
    if !should_offload(&hpgl) {
        return Ok(parse_hpgl(&hpgl, ratio, surface_height));
    }

    debug!("Offloading preview parse of {} bytes", hpgl.len());
    tokio::task::spawn_blocking(move || parse_hpgl(&hpgl, ratio, surface_height))
        .await
        .map_err(|e| PreviewError::WorkerFailed {
            reason: e.to_string(),
        })
}

/// Reads a command stream from `path` and parses it, in the background when large.
pub async fn load_preview(
    path: impl AsRef<std::path::Path>,
    ratio: f64,
    surface_height: f64,
) -> plotkit_core::Result<Vec<Path>> {
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(Error::other(format!("ratio must be > 0, got {}", ratio)));
    }
    let hpgl = tokio::fs::read_to_string(path).await?;
    Ok(parse_hpgl_offloaded(hpgl, ratio, surface_height).await?)
}
