//! Template-driven dialect engine
//!
//! Renders a [`CustomProtocolConfig`] without a dedicated encoder. When the
//! description has no move templates at all, the matching fixed encoder
//! produces the body and only `start` / `finish` are spliced around it.
//! Setting only one of `moveUp` / `moveDown` is an error.

use plotkit_core::{bounds, Point, Polygon, ProtocolError};
use tracing::{debug, warn};

use crate::dialects::{gpgl, Dialect};
use crate::options::CustomProtocolConfig;
use crate::template::{
    default_term, format_coordinates, parse_multi_point_command, process_delimiter_marker,
    process_escape_sequences, push_command, CommandTemplate,
};

/// Init sequences stripped from a fixed encoder's output before a custom
/// `start` is spliced in. Longer prefixes come first.
pub const KNOWN_INIT_PREFIXES: [&str; 8] = [
    "IN;PA;",
    "IN;",
    "H;",
    gpgl::INIT,
    ";:HAEC1",
    " ;:ECN A L0 ",
    " ;:H A L0 ",
    "H\x03",
];

/// How outlines are drawn after the move-up command.
enum DrawPlan {
    Batched {
        command: CommandTemplate,
        append_term: bool,
    },
    PerPoint {
        template: String,
        append_term: bool,
    },
}

impl DrawPlan {
    fn new(template: &str) -> Self {
        let (body, append_term) = process_delimiter_marker(template);
        match parse_multi_point_command(body) {
            Ok(command) if command.batched => Self::Batched {
                command,
                append_term,
            },
            Ok(_) => Self::PerPoint {
                template: body.to_string(),
                append_term,
            },
            Err(e) => {
                warn!("{}; drawing one command per point", e);
                Self::PerPoint {
                    template: body.to_string(),
                    append_term,
                }
            }
        }
    }

    fn render(&self, out: &mut String, points: &[Point], term: &str) {
        match self {
            Self::Batched {
                command,
                append_term,
            } => {
                out.push_str(&command.render_batch(points));
                if *append_term {
                    out.push_str(term);
                }
            }
            Self::PerPoint {
                template,
                append_term,
            } => {
                for p in points {
                    out.push_str(&format_coordinates(template, *p));
                    if *append_term {
                        out.push_str(term);
                    }
                }
            }
        }
    }
}

/// Pen-up move template, also used for the origin and feed moves.
struct Travel<'a> {
    body: &'a str,
    append_term: bool,
}

impl<'a> Travel<'a> {
    fn new(template: &'a str) -> Result<Self, ProtocolError> {
        let (body, append_term) = process_delimiter_marker(template);
        if !body.contains('{') || !body.contains('}') {
            return Err(ProtocolError::MalformedTemplate {
                template: template.to_string(),
            });
        }
        Ok(Self { body, append_term })
    }

    fn render(&self, out: &mut String, point: Point, term: &str) {
        out.push_str(&format_coordinates(self.body, point));
        if self.append_term {
            out.push_str(term);
        }
    }
}

/// Running maximum of every coordinate sent to the device.
#[derive(Debug, Default)]
struct Extent {
    max: Option<Point>,
}

impl Extent {
    fn include(&mut self, p: &Point) {
        self.max = Some(match self.max {
            None => *p,
            Some(m) => Point::new(m.x.max(p.x), m.y.max(p.y)),
        });
    }

    /// Falls back to the bounds of all input points when nothing was drawn.
    fn resolve(&self, polygons: &[Polygon]) -> Point {
        self.max
            .or_else(|| bounds(polygons.iter().flatten()).map(|(_, max)| max))
            .unwrap_or_default()
    }
}

fn decode(template: &Option<String>) -> Option<String> {
    template.as_deref().map(process_escape_sequences)
}

fn push_finish(out: &mut String, finish: Option<&str>, extent: Point, term: &str) {
    if let Some(finish) = finish {
        push_command(out, &format_coordinates(finish, extent), term);
    }
}

/// Strips the first matching entry of [`KNOWN_INIT_PREFIXES`].
pub fn strip_init_prefix(body: &str) -> &str {
    KNOWN_INIT_PREFIXES
        .iter()
        .find_map(|prefix| body.strip_prefix(prefix))
        .unwrap_or(body)
}

/// Renders polygons with a data-driven dialect description.
pub fn generate_custom_protocol(
    polygons: &[Polygon],
    config: &CustomProtocolConfig,
) -> Result<String, ProtocolError> {
    let term = process_escape_sequences(
        config
            .term
            .as_deref()
            .unwrap_or_else(|| default_term(&config.protocol)),
    );
    let start = decode(&config.start);
    let finish = decode(&config.finish);
    let pen_up = decode(&config.pen_up);
    let pen_down = decode(&config.pen_down);
    let move_up = decode(&config.move_up);
    let move_down = decode(&config.move_down);

    let (move_up, move_down) = match (move_up, move_down) {
        (None, None) => return generate_with_fallback(polygons, config, start, finish, &term),
        (Some(up), Some(down)) => (up, down),
        (Some(_), None) => {
            return Err(ProtocolError::IncompleteTemplates {
                missing: "moveDown".to_string(),
            })
        }
        (None, Some(_)) => {
            return Err(ProtocolError::IncompleteTemplates {
                missing: "moveUp".to_string(),
            })
        }
    };

    let travel = Travel::new(&move_up)?;
    let draw_plan = DrawPlan::new(&move_down);
    let options = &config.options;
    let mut extent = Extent::default();
    let mut out = String::new();

    if let Some(start) = &start {
        push_command(&mut out, start, &term);
    }
    if let Some(origin) = options.move_to_origin {
        travel.render(&mut out, origin, &term);
    }

    for polygon in polygons {
        let Some(first) = polygon.first() else {
            continue;
        };

        if let Some(pen_up) = &pen_up {
            push_command(&mut out, pen_up, &term);
        }

        travel.render(&mut out, *first, &term);
        extent.include(first);

        if let Some(pen_down) = &pen_down {
            push_command(&mut out, pen_down, &term);
        }

        let outline: Vec<Point> = polygon[1..]
            .iter()
            .chain(std::iter::once(first))
            .copied()
            .collect();
        draw_plan.render(&mut out, &outline, &term);
        outline.iter().for_each(|p| extent.include(p));
    }

    if let Some(distance) = options.feed_after_cut {
        travel.render(&mut out, Point::new(distance, 0.0), &term);
    }
    push_finish(&mut out, finish.as_deref(), extent.resolve(polygons), &term);

    debug!(
        "Rendered {} polygons with custom dialect {:?} ({} bytes)",
        polygons.len(),
        config.protocol,
        out.len()
    );
    Ok(out)
}

/// Body from the fixed encoder; custom `start` replaces its init sequence.
fn generate_with_fallback(
    polygons: &[Polygon],
    config: &CustomProtocolConfig,
    start: Option<String>,
    finish: Option<String>,
    term: &str,
) -> Result<String, ProtocolError> {
    let dialect: Dialect = config.protocol.parse()?;
    debug!(
        "Custom dialect {:?} has no move templates, using the {} encoder",
        config.protocol, dialect
    );
    let body = dialect.encode_job(polygons, &config.options);

    let mut out = String::new();
    match &start {
        Some(start) => {
            push_command(&mut out, start, term);
            out.push_str(strip_init_prefix(&body));
        }
        None => out.push_str(&body),
    }

    let extent = Extent::default().resolve(polygons);
    push_finish(&mut out, finish.as_deref(), extent, term);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ProtocolOptions;

    fn square() -> Polygon {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    fn hpgl_like() -> CustomProtocolConfig {
        CustomProtocolConfig {
            term: Some(";".to_string()),
            start: Some("IN".to_string()),
            move_up: Some("PU{0:0},{1:0}".to_string()),
            move_down: Some("PD{0:0},{1:0}".to_string()),
            ..CustomProtocolConfig::new("MyPlotter")
        }
    }

    #[test]
    fn test_per_point_rendering() {
        let out = generate_custom_protocol(&[square()], &hpgl_like()).unwrap();
        assert_eq!(out, "IN;PU0,0;PD10,0;PD10,10;PD0,10;PD0,0;");
    }

    #[test]
    fn test_batched_rendering() {
        let config = CustomProtocolConfig {
            move_down: Some("PD({0:0},{1:0},)".to_string()),
            ..hpgl_like()
        };
        let out = generate_custom_protocol(&[square()], &config).unwrap();
        assert_eq!(out, "IN;PU0,0;PD10,0,10,10,0,10,0,0;");
    }

    #[test]
    fn test_pen_commands_and_default_term() {
        let config = CustomProtocolConfig {
            pen_up: Some("U".to_string()),
            pen_down: Some("D$".to_string()),
            move_up: Some("M{0:0},{1:0}".to_string()),
            move_down: Some("L{0:0},{1:0}".to_string()),
            ..CustomProtocolConfig::new("GPGL-clone")
        };
        let tri = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let out = generate_custom_protocol(&[tri], &config).unwrap();
        assert_eq!(
            out,
            "U\x03M0,0\x03DL1,0\x03L1,1\x03L0,0\x03"
        );
    }

    #[test]
    fn test_finish_uses_maximum_extent() {
        let config = CustomProtocolConfig {
            finish: Some("PU{0:0},{1:0};$".to_string()),
            ..hpgl_like()
        };
        let shifted: Polygon = square()
            .into_iter()
            .map(|p| Point::new(p.x + 20.4, p.y + 5.5))
            .collect();
        let out = generate_custom_protocol(&[square(), shifted], &config).unwrap();
        assert!(out.ends_with("PU30,16;"), "{out}");
    }

    #[test]
    fn test_escaped_templates_are_decoded() {
        let config = CustomProtocolConfig {
            term: Some(r"\u0003".to_string()),
            start: Some(r"\u001B\u0004TT".to_string()),
            ..hpgl_like()
        };
        let out = generate_custom_protocol(&[], &config).unwrap();
        assert_eq!(out, "\x1B\x04TT\x03");
    }

    #[test]
    fn test_malformed_move_down_falls_back_per_point() {
        let config = CustomProtocolConfig {
            move_down: Some("CUT".to_string()),
            ..hpgl_like()
        };
        let tri = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let out = generate_custom_protocol(&[tri], &config).unwrap();
        assert_eq!(out, "IN;PU0,0;CUT;CUT;CUT;");
    }

    #[test]
    fn test_malformed_move_up_is_fatal() {
        let config = CustomProtocolConfig {
            move_up: Some("PU".to_string()),
            ..hpgl_like()
        };
        let err = generate_custom_protocol(&[square()], &config).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_fallback_strips_init_prefix() {
        let config = CustomProtocolConfig {
            term: Some(";".to_string()),
            start: Some("IN;SP1".to_string()),
            finish: Some("PU{0:0},{1:0}".to_string()),
            ..CustomProtocolConfig::new("HPGL")
        };
        let tri = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let out = generate_custom_protocol(&[tri], &config).unwrap();
        assert_eq!(out, "IN;SP1;PU0,0;PD10,0,10,10,0,0;PU10,10;");
    }

    #[test]
    fn test_fallback_without_start_keeps_init() {
        let config = CustomProtocolConfig {
            options: ProtocolOptions {
                pen: Some(1),
                ..ProtocolOptions::default()
            },
            ..CustomProtocolConfig::new("GPGL")
        };
        let out = generate_custom_protocol(&[], &config).unwrap();
        assert_eq!(out, "\x1B\x04TT\x03J1\x03H\x03");
    }

    #[test]
    fn test_fallback_unknown_protocol() {
        let config = CustomProtocolConfig::new("MysteryCutter");
        let err = generate_custom_protocol(&[square()], &config).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedProtocol { .. }));
    }

    #[test]
    fn test_lone_move_template_rejected() {
        let config = CustomProtocolConfig {
            move_up: Some("PU{0:0},{1:0}".to_string()),
            ..CustomProtocolConfig::new("HPGL")
        };
        let err = generate_custom_protocol(&[square()], &config).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::IncompleteTemplates {
                missing: "moveDown".to_string()
            }
        );

        let config = CustomProtocolConfig {
            move_down: Some("PD{0:0},{1:0}".to_string()),
            ..CustomProtocolConfig::new("HPGL")
        };
        let err = generate_custom_protocol(&[square()], &config).unwrap_err();
        assert!(err.to_string().contains("moveUp"));
    }

    #[test]
    fn test_templates_render_origin_and_feed() {
        let config = CustomProtocolConfig {
            options: ProtocolOptions {
                move_to_origin: Some(Point::new(1.0, 2.0)),
                feed_after_cut: Some(500.0),
                ..ProtocolOptions::default()
            },
            finish: Some("SP0".to_string()),
            ..hpgl_like()
        };
        let out = generate_custom_protocol(&[square()], &config).unwrap();
        assert_eq!(
            out,
            "IN;PU1,2;PU0,0;PD10,0;PD10,10;PD0,10;PD0,0;PU500,0;SP0;"
        );
    }

    #[test]
    fn test_fallback_keeps_origin_and_feed() {
        let config = CustomProtocolConfig {
            term: Some(";".to_string()),
            start: Some("IN;SP1$".to_string()),
            options: ProtocolOptions {
                move_to_origin: Some(Point::new(0.0, 0.0)),
                feed_after_cut: Some(500.0),
                ..ProtocolOptions::default()
            },
            ..CustomProtocolConfig::new("HPGL")
        };
        let tri = vec![Point::new(0.0, 10.0), Point::new(10.0, 10.0), Point::new(10.0, 0.0)];
        let out = generate_custom_protocol(&[tri], &config).unwrap();
        assert_eq!(out, "IN;SP1PU0,0;PU0,10;PD10,10,10,0,0,10;PU500,0;");
    }

    #[test]
    fn test_strip_init_prefix() {
        assert_eq!(strip_init_prefix("IN;PA;PU0,0;"), "PU0,0;");
        assert_eq!(strip_init_prefix("IN;PU0,0;"), "PU0,0;");
        assert_eq!(strip_init_prefix("\x1B\x04TT\x03J1\x03"), "J1\x03");
        assert_eq!(strip_init_prefix(" ;:H A L0 U0,0;"), "U0,0;");
        assert_eq!(strip_init_prefix("XYZ"), "XYZ");
    }
}
