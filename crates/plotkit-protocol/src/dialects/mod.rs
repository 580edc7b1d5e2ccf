//! Fixed dialect encoders for known plotter families
//!
//! Supported dialects:
//! - HPGL: pen plotter language with batched pen-down coordinates
//! - DMPL: Houston Instrument language, modes 1, 2, 3, 4 and 6
//! - CAMM-GL: Roland cutters, plain and the two firmware modes
//! - GP-GL: Graphtec / Silhouette cutters, ETX-terminated
//!
//! Each dialect is described by a [`Grammar`]; one encoding loop renders
//! all of them.

pub mod cammgl;
pub mod dmpl;
pub mod gpgl;
pub mod hpgl;

use std::fmt;
use std::str::FromStr;

use plotkit_core::{Point, Polygon, ProtocolError};
use tracing::{debug, trace, warn};

use crate::options::ProtocolOptions;

pub use cammgl::{generate_cammgl, generate_cammgl_mode1, generate_cammgl_mode2};
pub use dmpl::{generate_dmpl, DmplMode};
pub use gpgl::generate_gpgl;
pub use hpgl::generate_hpgl;

/// Token table for one dialect.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grammar {
    /// Emitted once before anything else
    pub init: &'static str,
    /// Renders force / velocity / pen commands
    pub settings: fn(&ProtocolOptions) -> String,
    /// Travel move token
    pub pen_up: &'static str,
    /// Draw / cut token
    pub pen_down: &'static str,
    /// Travel token in relative mode, when the dialect has one
    pub relative_pen_up: Option<&'static str>,
    /// Draw token in relative mode, when the dialect has one
    pub relative_pen_down: Option<&'static str>,
    /// One pen-down command for the whole outline instead of one per point
    pub batched: bool,
    /// Command terminator
    pub terminator: &'static str,
    /// Emitted once after the last polygon
    pub finish: &'static str,
}

impl Grammar {
    fn coords(p: &Point) -> String {
        let (x, y) = p.rounded();
        format!("{},{}", x, y)
    }

    fn tokens(&self, absolute: bool) -> (&'static str, &'static str) {
        if absolute {
            return (self.pen_up, self.pen_down);
        }
        if self.relative_pen_up.is_none() && self.relative_pen_down.is_none() {
            warn!(
                "Relative mode requested but dialect starting {:?} has no relative token",
                self.init
            );
        }
        (
            self.relative_pen_up.unwrap_or(self.pen_up),
            self.relative_pen_down.unwrap_or(self.pen_down),
        )
    }

    /// Travel command to a single point, always absolute.
    pub fn travel(&self, p: &Point) -> String {
        format!("{}{}{}", self.pen_up, Self::coords(p), self.terminator)
    }

    /// Renders init, settings, every closed outline, finish.
    pub fn encode(&self, polygons: &[Polygon], options: &ProtocolOptions) -> String {
        self.render(polygons, options, None, None)
    }

    /// Like [`Grammar::encode`], with the requested origin move after the
    /// settings and the material feed after the last outline.
    pub fn encode_job(&self, polygons: &[Polygon], options: &ProtocolOptions) -> String {
        self.render(
            polygons,
            options,
            options.move_to_origin,
            options.feed_after_cut,
        )
    }

    fn render(
        &self,
        polygons: &[Polygon],
        options: &ProtocolOptions,
        origin: Option<Point>,
        feed: Option<f64>,
    ) -> String {
        let (up, down) = self.tokens(options.absolute);
        let mut out = String::from(self.init);
        out.push_str(&(self.settings)(options));
        if let Some(origin) = origin {
            out.push_str(&self.travel(&origin));
        }

        let mut skipped = 0usize;
        for polygon in polygons {
            let Some(first) = polygon.first() else {
                skipped += 1;
                continue;
            };

            out.push_str(up);
            out.push_str(&Self::coords(first));
            out.push_str(self.terminator);

            // remaining points, then back to the start to close the outline
            let outline = polygon[1..].iter().chain(std::iter::once(first));
            if self.batched {
                let payload: Vec<String> = outline.map(Self::coords).collect();
                out.push_str(down);
                out.push_str(&payload.join(","));
                out.push_str(self.terminator);
            } else {
                for p in outline {
                    out.push_str(down);
                    out.push_str(&Self::coords(p));
                    out.push_str(self.terminator);
                }
            }
        }

        if skipped > 0 {
            trace!("Skipped {} empty polygons", skipped);
        }

        // the finish sequence may reset the device, so the feed goes first
        if let Some(distance) = feed {
            out.push_str(&self.travel(&Point::new(distance, 0.0)));
        }
        out.push_str(self.finish);
        out
    }
}

/// A known plotter dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// HP-GL
    Hpgl,
    /// DM/PL in the given mode
    Dmpl(DmplMode),
    /// Roland CAMM-GL
    Cammgl,
    /// Roland CAMM-GL, mode 1 firmware
    CammglMode1,
    /// Roland CAMM-GL, mode 2 firmware
    CammglMode2,
    /// Graphtec GP-GL
    Gpgl,
}

impl Dialect {
    /// Canonical names accepted by [`Dialect::from_str`].
    pub const ALL_NAMES: [&'static str; 10] = [
        "HPGL",
        "DMPL1",
        "DMPL2",
        "DMPL3",
        "DMPL4",
        "DMPL6",
        "CAMMGL",
        "CAMMGLMode1",
        "CAMMGLMode2",
        "GPGL",
    ];

    pub(crate) fn grammar(&self) -> Grammar {
        match self {
            Self::Hpgl => hpgl::GRAMMAR,
            Self::Dmpl(mode) => dmpl::grammar(*mode),
            Self::Cammgl => cammgl::GRAMMAR,
            Self::CammglMode1 => cammgl::MODE1_GRAMMAR,
            Self::CammglMode2 => cammgl::MODE2_GRAMMAR,
            Self::Gpgl => gpgl::GRAMMAR,
        }
    }

    /// Encodes the polygons in this dialect.
    pub fn encode(&self, polygons: &[Polygon], options: &ProtocolOptions) -> String {
        let out = self.grammar().encode(polygons, options);
        debug!(
            "Encoded {} polygons as {} ({} bytes)",
            polygons.len(),
            self,
            out.len()
        );
        out
    }

    /// Encodes a complete job, honouring `move_to_origin` and `feed_after_cut`.
    pub fn encode_job(&self, polygons: &[Polygon], options: &ProtocolOptions) -> String {
        self.grammar().encode_job(polygons, options)
    }

    /// Single travel command to `point`.
    pub fn move_to_origin(&self, point: Point) -> String {
        self.grammar().travel(&point)
    }

    /// Single travel command advancing the material by `distance` along X.
    pub fn feed_after_cut(&self, distance: f64) -> String {
        self.grammar().travel(&Point::new(distance, 0.0))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hpgl => write!(f, "HPGL"),
            Self::Dmpl(mode) => write!(f, "DMPL{}", mode.number()),
            Self::Cammgl => write!(f, "CAMMGL"),
            Self::CammglMode1 => write!(f, "CAMMGLMode1"),
            Self::CammglMode2 => write!(f, "CAMMGLMode2"),
            Self::Gpgl => write!(f, "GPGL"),
        }
    }
}

impl FromStr for Dialect {
    type Err = ProtocolError;

    /// Case-insensitive; `-`, `_` and spaces are ignored. Bare `DMPL` is mode 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        let dialect = match normalized.as_str() {
            "HPGL" => Self::Hpgl,
            "CAMMGL" => Self::Cammgl,
            "CAMMGLMODE1" => Self::CammglMode1,
            "CAMMGLMODE2" => Self::CammglMode2,
            "GPGL" => Self::Gpgl,
            other => match other.strip_prefix("DMPL") {
                Some(rest) => {
                    let digits = rest.strip_prefix("MODE").unwrap_or(rest);
                    if digits.is_empty() {
                        Self::Dmpl(DmplMode::Mode1)
                    } else {
                        let mode = digits.parse::<u8>().map_err(|_| {
                            ProtocolError::UnsupportedProtocol {
                                name: s.to_string(),
                            }
                        })?;
                        Self::Dmpl(DmplMode::try_from(mode)?)
                    }
                }
                None => {
                    return Err(ProtocolError::UnsupportedProtocol {
                        name: s.to_string(),
                    })
                }
            },
        };
        Ok(dialect)
    }
}
