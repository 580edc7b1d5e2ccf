//! HP-GL cut-preview parser
//!
//! Splits a command stream on `;`, classifies each command into an
//! [`Instruction`], and feeds the instructions through a two-state pen
//! machine that collects the cut polylines. Commands other than `PU`, `PD`
//! and `PA` are ignored so streams with extra setup commands still parse.

use std::sync::OnceLock;

use plotkit_core::{Path, Point};
use regex::Regex;
use tracing::debug;

/// One classified command from the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `PU` with its (possibly empty) coordinate pairs
    PenUp(Vec<Point>),
    /// `PD` with its coordinate pairs
    PenDown(Vec<Point>),
    /// `PA` absolute move with its coordinate pairs
    PlotAbsolute(Vec<Point>),
    /// Anything else, kept only for diagnostics
    Other(String),
}

/// Pen state of the plotter head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenState {
    #[default]
    Up,
    Down,
}

fn parse_pairs(params: &str) -> Vec<Point> {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("invalid regex pattern")
    });

    let numbers: Vec<f64> = regex
        .find_iter(params)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    // an unpaired trailing value is dropped
    numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

impl Instruction {
    /// Classifies a single command (without its `;`).
    pub fn parse(command: &str) -> Self {
        let command = command.trim();
        let (Some(mnemonic), Some(params)) = (command.get(..2), command.get(2..)) else {
            return Self::Other(command.to_string());
        };

        match mnemonic.to_ascii_uppercase().as_str() {
            "PU" => Self::PenUp(parse_pairs(params)),
            "PD" => Self::PenDown(parse_pairs(params)),
            "PA" => Self::PlotAbsolute(parse_pairs(params)),
            _ => Self::Other(command.to_string()),
        }
    }
}

/// Splits a stream into instructions, skipping blank commands.
pub fn tokenize(hpgl: &str) -> impl Iterator<Item = Instruction> + '_ {
    hpgl.split(';')
        .filter(|c| !c.trim().is_empty())
        .map(Instruction::parse)
}

/// Pen state machine that accumulates polylines.
#[derive(Debug)]
pub struct PreviewBuilder {
    ratio: f64,
    surface_height: f64,
    pen: PenState,
    current: Option<Path>,
    paths: Vec<Path>,
}

impl PreviewBuilder {
    /// `ratio` and `surface_height` undo the device-space transform.
    pub fn new(ratio: f64, surface_height: f64) -> Self {
        Self {
            ratio,
            surface_height,
            pen: PenState::Up,
            current: None,
            paths: Vec::new(),
        }
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    fn denormalize(&self, p: &Point) -> Point {
        Point::new(p.x / self.ratio, (self.surface_height - p.y) / self.ratio)
    }

    /// Stores the current path when it has at least two points.
    fn close_current(&mut self) {
        if let Some(path) = self.current.take() {
            if path.len() >= 2 {
                self.paths.push(path);
            }
        }
    }

    fn start_at(&mut self, p: &Point) {
        self.close_current();
        self.current = Some(vec![self.denormalize(p)]);
    }

    /// Applies one instruction.
    pub fn apply(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::PenUp(points) => {
                self.pen = PenState::Up;
                if let Some(last) = points.last() {
                    self.start_at(last);
                }
            }
            Instruction::PenDown(points) => {
                self.pen = PenState::Down;
                let decoded: Vec<Point> = points.iter().map(|p| self.denormalize(p)).collect();
                self.current.get_or_insert_with(Vec::new).extend(decoded);
            }
            Instruction::PlotAbsolute(points) => match self.pen {
                PenState::Down => {
                    if points.is_empty() {
                        return;
                    }
                    let seed = self
                        .paths
                        .last()
                        .and_then(|path| path.last())
                        .copied();
                    let decoded: Vec<Point> =
                        points.iter().map(|p| self.denormalize(p)).collect();
                    let current = self.current.get_or_insert_with(Vec::new);
                    if current.is_empty() {
                        current.extend(seed);
                    }
                    current.extend(decoded);
                }
                PenState::Up => {
                    if let Some(last) = points.last() {
                        self.start_at(last);
                    }
                }
            },
            Instruction::Other(_) => {}
        }
    }

    /// Stores the pending path and rotates every path 90° for canvas display.
    pub fn finish(mut self) -> Vec<Path> {
        self.close_current();
        self.paths
            .into_iter()
            .map(|path| path.into_iter().map(|p| Point::new(p.y, -p.x)).collect())
            .collect()
    }
}

/// Parses an HP-GL stream back into display polylines.
///
/// Each coordinate is mapped to `(x / ratio, (surface_height - y) / ratio)`
/// and then rotated with `(x, y) -> (y, -x)`. Paths with fewer than two
/// points are dropped.
pub fn parse_hpgl(hpgl: &str, ratio: f64, surface_height: f64) -> Vec<Path> {
    let mut builder = PreviewBuilder::new(ratio, surface_height);
    for instruction in tokenize(hpgl) {
        builder.apply(&instruction);
    }
    let paths = builder.finish();
    debug!(
        "Parsed {} bytes of HP-GL into {} paths",
        hpgl.len(),
        paths.len()
    );
    paths
}
