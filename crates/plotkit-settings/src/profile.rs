//! Plotter profiles
//!
//! A profile bundles everything needed to turn design-space polygons into a
//! device command stream: the scale ratio, the surface height used to flip
//! the Y axis, whether the device is mounted rotated, and the dialect
//! description (a fixed dialect name, optionally with command templates).
//!
//! Profiles are stored as JSON or TOML, chosen by file extension.

use std::path::{Path, PathBuf};

use plotkit_core::{preprocess, preprocess_swapped, Polygon, ProtocolError};
use plotkit_preview::parse_hpgl;
use plotkit_protocol::{generate_custom_protocol, generate_protocol, CustomProtocolConfig, Dialect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

fn default_ratio() -> f64 {
    1.0
}

/// Complete description of one cutting device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotterProfile {
    /// Display name
    pub name: String,
    /// Design units to device units
    #[serde(default = "default_ratio")]
    pub ratio: f64,
    /// Device-space height used to flip the Y axis
    #[serde(default)]
    pub surface_height: f64,
    /// Device mounted rotated 90°
    #[serde(default)]
    pub swap_axes: bool,
    /// Dialect name, templates and encoder options
    #[serde(flatten)]
    pub protocol: CustomProtocolConfig,
}

impl PlotterProfile {
    /// Creates a profile for a fixed dialect with unit ratio.
    pub fn new(name: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            name: name.into(),
            ratio: default_ratio(),
            surface_height: 0.0,
            swap_axes: false,
            protocol: CustomProtocolConfig::new(dialect.to_string()),
        }
    }

    /// Load a profile from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let profile: Self = match extension(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        profile.validate()?;
        info!("Loaded plotter profile {:?} from {}", profile.name, path.display());
        Ok(profile)
    }

    /// Save the profile to file (JSON or TOML), creating missing parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate the profile
    pub fn validate(&self) -> SettingsResult<()> {
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "ratio".to_string(),
                reason: format!("must be > 0, got {}", self.ratio),
            });
        }

        if !self.surface_height.is_finite() || self.surface_height < 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "surfaceHeight".to_string(),
                reason: format!("must be >= 0, got {}", self.surface_height),
            });
        }

        if self.protocol.protocol.trim().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "protocol".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        match (&self.protocol.move_up, &self.protocol.move_down) {
            (Some(_), Some(_)) => {}
            // the fixed encoder does the drawing
            (None, None) => {
                self.protocol.protocol.parse::<Dialect>()?;
            }
            (Some(_), None) => {
                return Err(ProtocolError::IncompleteTemplates {
                    missing: "moveDown".to_string(),
                }
                .into())
            }
            (None, Some(_)) => {
                return Err(ProtocolError::IncompleteTemplates {
                    missing: "moveUp".to_string(),
                }
                .into())
            }
        }

        Ok(())
    }

    /// Orders and transforms design-space polygons into device space.
    pub fn prepare(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        if self.swap_axes {
            preprocess_swapped(polygons, self.ratio)
        } else {
            preprocess(polygons, self.surface_height, self.ratio)
        }
    }

    /// Generates the complete command stream for design-space polygons.
    pub fn generate(&self, polygons: &[Polygon]) -> SettingsResult<String> {
        let device = self.prepare(polygons);
        let out = if self.protocol.has_templates() {
            generate_custom_protocol(&device, &self.protocol)?
        } else {
            generate_protocol(&device, &self.protocol.as_protocol_config())?
        };
        debug!(
            "Profile {:?} generated {} bytes for {} polygons",
            self.name,
            out.len(),
            polygons.len()
        );
        Ok(out)
    }

    /// Parses a command stream back into display polylines.
    pub fn preview(&self, stream: &str) -> Vec<plotkit_core::Path> {
        parse_hpgl(stream, self.ratio, self.surface_height)
    }
}

enum Format {
    Json,
    Toml,
}

fn extension(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

/// Default profile location, `<config dir>/plotkit/profile.toml`.
pub fn default_profile_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("plotkit").join("profile.toml"))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
        })
}
