//! Encoder options and dialect configurations
//!
//! Field names follow the camelCase used by integrator configuration files,
//! so a profile written for the web front end deserializes unchanged.

use plotkit_core::Point;
use serde::{Deserialize, Serialize};

/// Settings shared by every dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolOptions {
    /// Blade pressure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<f64>,
    /// Head velocity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    /// Tool / pen index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen: Option<u32>,
    /// Absolute (`true`) or relative coordinate mode
    pub absolute: bool,
    /// Point visited before cutting starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_to_origin: Option<Point>,
    /// Distance to advance the material after cutting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_after_cut: Option<f64>,
}

impl Default for ProtocolOptions {
    fn default() -> Self {
        Self {
            force: None,
            velocity: None,
            pen: None,
            absolute: true,
            move_to_origin: None,
            feed_after_cut: None,
        }
    }
}

/// A fixed dialect selected by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConfig {
    /// Dialect name, e.g. `HPGL` or `GPGL`
    pub protocol: String,
    #[serde(flatten)]
    pub options: ProtocolOptions,
}

impl ProtocolConfig {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            options: ProtocolOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProtocolOptions) -> Self {
        self.options = options;
        self
    }
}

/// A data-driven dialect description rendered by the template engine.
///
/// Templates use `{0:0}` / `{1:0}` for the rounded X / Y, may wrap the
/// coordinate pair in `HEAD({0:0},{1:0},)` to batch several points into one
/// command, and may end in `$` to suppress the delimiter after that command.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProtocolConfig {
    /// Dialect name; picks the default delimiter and the fallback encoder
    pub protocol: String,
    /// Command delimiter, defaults per dialect family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen_down: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_down: Option<String>,
    #[serde(flatten)]
    pub options: ProtocolOptions,
}

impl CustomProtocolConfig {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            ..Self::default()
        }
    }

    /// True when at least one command template is set.
    pub fn has_templates(&self) -> bool {
        [
            &self.start,
            &self.finish,
            &self.pen_up,
            &self.pen_down,
            &self.move_up,
            &self.move_down,
        ]
        .iter()
        .any(|t| t.is_some())
    }

    /// True when both move templates are present, so no fixed encoder is needed.
    pub fn has_move_templates(&self) -> bool {
        self.move_up.is_some() && self.move_down.is_some()
    }

    /// The fixed-dialect view of this configuration.
    pub fn as_protocol_config(&self) -> ProtocolConfig {
        ProtocolConfig {
            protocol: self.protocol.clone(),
            options: self.options.clone(),
        }
    }
}
