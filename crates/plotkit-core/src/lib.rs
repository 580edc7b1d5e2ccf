//! # PlotKit Core
//!
//! Core types and utilities for PlotKit.
//! Provides the geometry model shared by the protocol encoders and the
//! cut-preview parser, the rounding rule every dialect emits with, the
//! geometry preprocessor, and the error taxonomy.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, PreviewError, ProtocolError, Result};

pub use geometry::{preprocess, preprocess_swapped, sort_by_min_x, sort_by_min_y};

pub use types::{bounds, round_half_up, Path, Point, Polygon};
