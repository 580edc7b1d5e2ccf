//! DM/PL encoder
//!
//! Houston Instrument plotters speak one of several modes, each with its own
//! init prefix. Mode 6 is HP-GL compatible and uses `PU` / `PD`; the other
//! modes use `U` / `D`. Points are never batched.

use plotkit_core::{Polygon, ProtocolError};

use super::Grammar;
use crate::options::ProtocolOptions;

/// Supported DM/PL modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DmplMode {
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode6,
}

impl DmplMode {
    pub fn number(&self) -> u8 {
        match self {
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
            Self::Mode4 => 4,
            Self::Mode6 => 6,
        }
    }

    fn init(&self) -> &'static str {
        match self {
            Self::Mode1 => ";:HAEC1",
            Self::Mode2 | Self::Mode4 => " ;:ECN A L0 ",
            Self::Mode3 => " ;:H A L0 ",
            Self::Mode6 => "IN;PA;",
        }
    }
}

impl TryFrom<u8> for DmplMode {
    type Error = ProtocolError;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            1 => Ok(Self::Mode1),
            2 => Ok(Self::Mode2),
            3 => Ok(Self::Mode3),
            4 => Ok(Self::Mode4),
            6 => Ok(Self::Mode6),
            _ => Err(ProtocolError::InvalidMode { mode }),
        }
    }
}

/// `V{velocity} BP{force} EC{pen} `, each only when set.
fn settings(options: &ProtocolOptions) -> String {
    let mut out = String::new();
    if let Some(velocity) = options.velocity {
        out.push_str(&format!("V{} ", velocity));
    }
    if let Some(force) = options.force {
        out.push_str(&format!("BP{} ", force));
    }
    if let Some(pen) = options.pen {
        out.push_str(&format!("EC{} ", pen));
    }
    out
}

pub(crate) fn grammar(mode: DmplMode) -> Grammar {
    let hpgl_tokens = mode == DmplMode::Mode6;
    Grammar {
        init: mode.init(),
        settings,
        pen_up: if hpgl_tokens { "PU" } else { "U" },
        pen_down: if hpgl_tokens { "PD" } else { "D" },
        relative_pen_up: None,
        relative_pen_down: hpgl_tokens.then_some("PR"),
        batched: false,
        terminator: ";",
        finish: "",
    }
}

/// Encodes polygons as DM/PL in the given mode (1, 2, 3, 4 or 6).
pub fn generate_dmpl(
    polygons: &[Polygon],
    mode: u8,
    options: &ProtocolOptions,
) -> Result<String, ProtocolError> {
    let mode = DmplMode::try_from(mode)?;
    Ok(grammar(mode).encode(polygons, options))
}
