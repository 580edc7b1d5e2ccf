//! Command template mini-language
//!
//! A template is plain command text with two placeholders, `{0:0}` for the
//! rounded X and `{1:0}` for the rounded Y. Two extensions exist:
//!
//! - Batching: `HEAD({0:0},{1:0},)TAIL` wraps one coordinate pair plus a
//!   trailing delimiter in parentheses. The pair is repeated for every point
//!   and the delimiter joins them, so one command carries a whole outline.
//! - Delimiter suppression: a trailing `$` is stripped and tells the engine
//!   not to append the dialect delimiter after that command.
//!
//! Templates are parsed once into a [`CommandTemplate`] and rendered per
//! point or per outline.

use std::sync::OnceLock;

use plotkit_core::{Point, ProtocolError};
use regex::{Captures, Regex};

const X_PLACEHOLDER: &str = "{0:0}";
const Y_PLACEHOLDER: &str = "{1:0}";
const SUPPRESS_MARKER: char = '$';

/// Substitutes `{0:0}` / `{1:0}` with the rounded coordinates of `point`.
pub fn format_coordinates(template: &str, point: Point) -> String {
    let (x, y) = point.rounded();
    template
        .replace(X_PLACEHOLDER, &x.to_string())
        .replace(Y_PLACEHOLDER, &y.to_string())
}

/// Strips a trailing `$`. Returns the command and whether the delimiter
/// should still be appended after it.
pub fn process_delimiter_marker(command: &str) -> (&str, bool) {
    match command.strip_suffix(SUPPRESS_MARKER) {
        Some(stripped) => (stripped, false),
        None => (command, true),
    }
}

/// Appends `template` to `out`, honouring the `$` marker.
pub(crate) fn push_command(out: &mut String, template: &str, term: &str) {
    let (body, append_term) = process_delimiter_marker(template);
    out.push_str(body);
    if append_term {
        out.push_str(term);
    }
}

/// Parsed form of a coordinate command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    /// Text before the batch block; the whole template when not batched
    pub head: String,
    /// The coordinate pair inside the batch block, without its delimiter
    pub coords_template: String,
    /// Character joining consecutive pairs in a batch
    pub delimiter: Option<char>,
    /// Text after the batch block
    pub tail: String,
    /// True when one command carries many points
    pub batched: bool,
}

impl CommandTemplate {
    fn single(template: &str) -> Self {
        Self {
            head: template.to_string(),
            coords_template: String::new(),
            delimiter: None,
            tail: String::new(),
            batched: false,
        }
    }

    /// Renders one command for a single point.
    pub fn render_point(&self, point: Point) -> String {
        if self.batched {
            self.render_batch(std::slice::from_ref(&point))
        } else {
            format_coordinates(&self.head, point)
        }
    }

    /// Renders one command carrying all `points`.
    ///
    /// Only meaningful for batched templates; a single-point template
    /// renders the first point.
    pub fn render_batch(&self, points: &[Point]) -> String {
        if !self.batched {
            return points
                .first()
                .map(|p| format_coordinates(&self.head, *p))
                .unwrap_or_default();
        }
        let separator = self.delimiter.map(String::from).unwrap_or_default();
        let pairs: Vec<String> = points
            .iter()
            .map(|p| format_coordinates(&self.coords_template, *p))
            .collect();
        format!("{}{}{}", self.head, pairs.join(&separator), self.tail)
    }
}

/// Detects `HEAD({0:0}D{1:0}D)TAIL` batch syntax.
///
/// Templates without the block, or with a malformed or nested one, come
/// back as single-point commands. A template with no `{` or no `}` at all is an
/// error.
pub fn parse_multi_point_command(template: &str) -> Result<CommandTemplate, ProtocolError> {
    if !template.contains('{') || !template.contains('}') {
        return Err(ProtocolError::MalformedTemplate {
            template: template.to_string(),
        });
    }

    let (Some(open), Some(close)) = (template.find('('), template.rfind(')')) else {
        return Ok(CommandTemplate::single(template));
    };
    if close < open {
        return Ok(CommandTemplate::single(template));
    }

    let inner = &template[open + 1..close];
    if inner.contains(['(', ')']) {
        return Ok(CommandTemplate::single(template));
    }
    let Some(delimiter) = inner.chars().last() else {
        return Ok(CommandTemplate::single(template));
    };
    if delimiter == '}' {
        return Ok(CommandTemplate::single(template));
    }
    let coords = &inner[..inner.len() - delimiter.len_utf8()];
    if coords.matches(X_PLACEHOLDER).count() != 1 || coords.matches(Y_PLACEHOLDER).count() != 1 {
        return Ok(CommandTemplate::single(template));
    }

    Ok(CommandTemplate {
        head: template[..open].to_string(),
        coords_template: coords.to_string(),
        delimiter: Some(delimiter),
        tail: template[close + 1..].to_string(),
        batched: true,
    })
}

/// Decodes `\r`, `\n`, `\t` and `\uXXXX` written as literal text.
///
/// Text that already holds control characters is taken as decoded and
/// returned unchanged.
pub fn process_escape_sequences(text: &str) -> String {
    if text.chars().any(|c| c.is_ascii_control()) {
        return text.to_string();
    }

    static ESCAPE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ESCAPE_REGEX
        .get_or_init(|| Regex::new(r"\\(r|n|t|u([0-9a-fA-F]{4}))").expect("invalid regex pattern"));

    regex
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "r" => "\r".to_string(),
            "n" => "\n".to_string(),
            "t" => "\t".to_string(),
            _ => u32::from_str_radix(&caps[2], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string()),
        })
        .into_owned()
}

/// Default command delimiter for a dialect name.
///
/// GP-GL family names get ETX, DM/PL family names a space, everything else
/// (HP-GL, CAMM-GL, custom names) `;\r\n`.
pub fn default_term(protocol: &str) -> &'static str {
    let upper = protocol.to_ascii_uppercase();
    if upper.contains("GPGL") {
        "\x03"
    } else if upper.contains("DMPL") {
        " "
    } else {
        ";\r\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let out = format_coordinates("PU{0:0},{1:0}", Point::new(12.5, -3.5));
        assert_eq!(out, "PU13,-3");
    }

    #[test]
    fn test_format_without_placeholders_is_literal() {
        assert_eq!(format_coordinates("IN", Point::new(1.0, 2.0)), "IN");
    }

    #[test]
    fn test_delimiter_marker() {
        assert_eq!(process_delimiter_marker("H\x03$"), ("H\x03", false));
        assert_eq!(process_delimiter_marker("IN"), ("IN", true));
        assert_eq!(process_delimiter_marker("$"), ("", false));
    }

    #[test]
    fn test_push_command() {
        let mut out = String::new();
        push_command(&mut out, "IN", ";");
        push_command(&mut out, "PA;$", ";");
        assert_eq!(out, "IN;PA;");
    }

    #[test]
    fn test_parse_batched() {
        let cmd = parse_multi_point_command("PD({0:0},{1:0},)").unwrap();
        assert!(cmd.batched);
        assert_eq!(cmd.head, "PD");
        assert_eq!(cmd.coords_template, "{0:0},{1:0}");
        assert_eq!(cmd.delimiter, Some(','));
        assert_eq!(cmd.tail, "");
    }

    #[test]
    fn test_parse_batched_with_tail() {
        let cmd = parse_multi_point_command("D({0:0} {1:0} )E").unwrap();
        assert!(cmd.batched);
        let out = cmd.render_batch(&[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(out, "D1 2 3 4E");
    }

    #[test]
    fn test_parse_single_point() {
        let cmd = parse_multi_point_command("PD{0:0},{1:0}").unwrap();
        assert!(!cmd.batched);
        assert_eq!(cmd.render_point(Point::new(4.0, 5.0)), "PD4,5");
    }

    #[test]
    fn test_parse_malformed_parentheses_is_single() {
        for template in [
            "PD){0:0},{1:0}(",
            "PD({0:0},{1:0})",
            "PD({0:0},)",
            "PD({0:0},{1:0},{0:0},{1:0},)",
            "PD(),{0:0},{1:0}",
        ] {
            let cmd = parse_multi_point_command(template).unwrap();
            assert!(!cmd.batched, "{template} should not batch");
            assert_eq!(cmd.head, template);
        }
    }

    #[test]
    fn test_parse_nested_parentheses_is_single() {
        for template in ["PD(a)({0:0},{1:0},)", "PD(({0:0},{1:0},))", "PD({0:0},({1:0}),)"] {
            let cmd = parse_multi_point_command(template).unwrap();
            assert!(!cmd.batched, "{template} should not batch");
            assert!(cmd.coords_template.is_empty());
        }
    }

    #[test]
    fn test_parse_missing_braces() {
        let err = parse_multi_point_command("PD(x,y,)").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedTemplate { .. }));
        assert!(parse_multi_point_command("PD{0:0").is_err());
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(process_escape_sequences(r"IN;\r\n"), "IN;\r\n");
        assert_eq!(process_escape_sequences(r"\u001B\u0004TT\u0003"), "\x1B\x04TT\x03");
        assert_eq!(process_escape_sequences(r"A\tB"), "A\tB");
    }

    #[test]
    fn test_escape_sequences_already_decoded() {
        let raw = "\x03 literal \\n stays";
        assert_eq!(process_escape_sequences(raw), raw);
    }

    #[test]
    fn test_escape_sequences_invalid_codepoint_kept() {
        assert_eq!(process_escape_sequences(r"\uD800"), r"\uD800");
        assert_eq!(process_escape_sequences(r"\q"), r"\q");
    }

    #[test]
    fn test_default_term() {
        assert_eq!(default_term("GPGL"), "\x03");
        assert_eq!(default_term("silhouette-gpgl"), "\x03");
        assert_eq!(default_term("DMPL6"), " ");
        assert_eq!(default_term("HPGL"), ";\r\n");
        assert_eq!(default_term("CAMMGL"), ";\r\n");
        assert_eq!(default_term("anything"), ";\r\n");
    }
}
