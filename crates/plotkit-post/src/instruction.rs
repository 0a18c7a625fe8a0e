//! G-code instruction model.
//!
//! Parses one line of text into an op code plus optional X/Y/Z/F words by
//! simple token scanning. Only the minimal subset needed for draw-move
//! classification is interpreted; everything else keeps its raw text and is
//! passed through untouched by the rest of the pipeline.

use regex::Regex;
use std::sync::OnceLock;

/// Op code of a single G-code line.
///
/// Only the motion and timing commands the classifier cares about are
/// distinguished; any other command word maps to [`OpCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Rapid positioning (G0 / G00)
    Rapid,
    /// Linear interpolation (G1 / G01)
    Linear,
    /// Dwell (G4 / G04)
    Dwell,
    /// Comment line (`;` or `(` prefix)
    Comment,
    /// Blank line
    Blank,
    /// Any other command, passed through verbatim
    Other,
}

/// One parsed G-code line. Immutable once parsed; the raw text is always
/// retained for exact pass-through.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Original line text, untrimmed.
    pub raw: String,
    /// Parsed op code.
    pub op: OpCode,
    /// X word, if present.
    pub x: Option<f64>,
    /// Y word, if present.
    pub y: Option<f64>,
    /// Z word, if present.
    pub z: Option<f64>,
    /// F word (feed rate), if present.
    pub feed: Option<f64>,
    /// True for a comment line whose trimmed text exactly equals the
    /// configured marker token.
    pub is_marker: bool,
}

fn axis_regex() -> &'static Regex {
    static AXIS_REGEX: OnceLock<Regex> = OnceLock::new();
    AXIS_REGEX.get_or_init(|| {
        Regex::new(r"(?i)([XYZF])\s*(-?\d+(?:\.\d+)?)").expect("invalid regex pattern")
    })
}

impl Instruction {
    /// Parse a single line. `marker_token` is the exact comment line that
    /// triggers a manual ink insertion under the marker policy; pass `None`
    /// when no marker detection is wanted.
    pub fn parse(line: &str, marker_token: Option<&str>) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Self {
                raw: line.to_string(),
                op: OpCode::Blank,
                x: None,
                y: None,
                z: None,
                feed: None,
                is_marker: false,
            };
        }

        if trimmed.starts_with(';') || trimmed.starts_with('(') {
            let is_marker = marker_token
                .map(|token| !token.trim().is_empty() && trimmed == token.trim())
                .unwrap_or(false);
            return Self {
                raw: line.to_string(),
                op: OpCode::Comment,
                x: None,
                y: None,
                z: None,
                feed: None,
                is_marker,
            };
        }

        let command = trimmed
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_uppercase();
        let op = match command.as_str() {
            "G0" | "G00" => OpCode::Rapid,
            "G1" | "G01" => OpCode::Linear,
            "G4" | "G04" => OpCode::Dwell,
            _ => OpCode::Other,
        };

        let mut x = None;
        let mut y = None;
        let mut z = None;
        let mut feed = None;
        for capture in axis_regex().captures_iter(trimmed) {
            let value: f64 = match capture[2].parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            match capture[1].to_uppercase().as_str() {
                "X" => x = Some(value),
                "Y" => y = Some(value),
                "Z" => z = Some(value),
                "F" => feed = Some(value),
                _ => {}
            }
        }

        Self {
            raw: line.to_string(),
            op,
            x,
            y,
            z,
            feed,
            is_marker: false,
        }
    }

    /// True for comment lines (including marker lines).
    pub fn is_comment(&self) -> bool {
        self.op == OpCode::Comment
    }

    /// True for blank lines.
    pub fn is_blank(&self) -> bool {
        self.op == OpCode::Blank
    }

    /// True when both X and Y words are present.
    pub fn has_xy(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_motion_commands() {
        let instr = Instruction::parse("G0 X10 Y-10", None);
        assert_eq!(instr.op, OpCode::Rapid);
        assert_eq!(instr.x, Some(10.0));
        assert_eq!(instr.y, Some(-10.0));
        assert!(instr.has_xy());

        let instr = Instruction::parse("G01 X1.5 Y2.25 F800", None);
        assert_eq!(instr.op, OpCode::Linear);
        assert_eq!(instr.x, Some(1.5));
        assert_eq!(instr.y, Some(2.25));
        assert_eq!(instr.feed, Some(800.0));

        let instr = Instruction::parse("G4 P0.5", None);
        assert_eq!(instr.op, OpCode::Dwell);
        assert!(!instr.has_xy());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let instr = Instruction::parse("g1 x3 y4 z8 f1200", None);
        assert_eq!(instr.op, OpCode::Linear);
        assert_eq!(instr.x, Some(3.0));
        assert_eq!(instr.y, Some(4.0));
        assert_eq!(instr.z, Some(8.0));
        assert_eq!(instr.feed, Some(1200.0));
    }

    #[test]
    fn test_parse_comment_and_blank() {
        let instr = Instruction::parse("; travel to origin", None);
        assert_eq!(instr.op, OpCode::Comment);
        assert!(instr.is_comment());
        assert_eq!(instr.x, None);

        let instr = Instruction::parse("(setup block)", None);
        assert!(instr.is_comment());

        let instr = Instruction::parse("   ", None);
        assert!(instr.is_blank());
    }

    #[test]
    fn test_comment_carries_no_words() {
        // X/Y inside a comment must not leak into classification.
        let instr = Instruction::parse("; G1 X5 Y5", None);
        assert!(instr.is_comment());
        assert!(!instr.has_xy());
        assert_eq!(instr.z, None);
    }

    #[test]
    fn test_marker_detection() {
        let token = ";#AUTO_INK#";
        let instr = Instruction::parse(";#AUTO_INK#", Some(token));
        assert!(instr.is_marker);
        assert!(instr.is_comment());

        // Leading whitespace is tolerated, the trimmed text must match.
        let instr = Instruction::parse("  ;#AUTO_INK#", Some(token));
        assert!(instr.is_marker);

        let instr = Instruction::parse("; AUTO_INK", Some(token));
        assert!(!instr.is_marker);

        let instr = Instruction::parse(";#AUTO_INK#", None);
        assert!(!instr.is_marker);

        // An all-whitespace token never matches.
        let instr = Instruction::parse(";", Some("  "));
        assert!(!instr.is_marker);
    }

    #[test]
    fn test_unrecognized_command_keeps_raw_text() {
        let instr = Instruction::parse("M3 S1000", None);
        assert_eq!(instr.op, OpCode::Other);
        assert_eq!(instr.raw, "M3 S1000");

        // Z/F words still tracked on unrecognized commands.
        let instr = Instruction::parse("G2 X5 Y5 Z0 F600", None);
        assert_eq!(instr.op, OpCode::Other);
        assert_eq!(instr.z, Some(0.0));
        assert_eq!(instr.feed, Some(600.0));
    }
}
