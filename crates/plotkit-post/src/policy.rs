//! Ink insertion policies.
//!
//! One policy instance per stream role decides, per instruction, whether an
//! ink macro fires now. The three variants form a closed set so the
//! per-instruction decision stays a single pure function instead of
//! conditionals scattered through the scan loop.

use crate::error::{PostError, PostResult};
use crate::instruction::Instruction;

/// Per-pass counters. One owned instance per stream pass; never shared
/// across invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    /// Draw moves since the last ink insertion. Reset to 0 when the stroke
    /// policy fires.
    pub move_counter: u32,
    /// Successful ink-macro emissions. Monotonic within a pass.
    pub ink_insertions: u32,
    /// Paper-macro emissions (cadence-based). Monotonic within a pass.
    pub paper_insertions: u32,
}

/// Ink insertion policy for one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InkPolicy {
    /// Never insert ink macros; marker lines pass through as ordinary
    /// comments.
    Disabled,
    /// Fire the instant a marker-tagged comment line is encountered; the
    /// marker line is consumed and replaced by the macro.
    Marker { token: String },
    /// Fire when `move_counter` reaches the interval, counted strictly over
    /// real draw moves.
    Stroke { interval: u32 },
}

/// Outcome of a per-instruction policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecision {
    /// Render an ink macro immediately after handling this line.
    pub fire: bool,
    /// Drop the line itself instead of copying it to the output.
    pub consume_line: bool,
}

impl PolicyDecision {
    const PASS: Self = Self {
        fire: false,
        consume_line: false,
    };
}

impl InkPolicy {
    /// Check the policy parameters before any output is produced.
    pub fn validate(&self) -> PostResult<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Marker { token } => {
                if token.trim().is_empty() {
                    Err(PostError::EmptyMarkerToken)
                } else {
                    Ok(())
                }
            }
            Self::Stroke { interval } => {
                if *interval == 0 {
                    Err(PostError::InvalidStrokeInterval)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// True when this policy can insert ink macros at all.
    pub fn can_fire(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Marker token to tag comment lines with during parsing, if any.
    pub fn marker_token(&self) -> Option<&str> {
        match self {
            Self::Marker { token } => Some(token),
            _ => None,
        }
    }

    /// Per-instruction decision. `is_draw_move` is the classifier verdict
    /// for this line; qualifying moves advance `counters.move_counter` here
    /// so the counter can never move for incidental motion.
    pub fn decide(
        &self,
        instruction: &Instruction,
        is_draw_move: bool,
        counters: &mut Counters,
    ) -> PolicyDecision {
        if is_draw_move {
            counters.move_counter += 1;
        }

        match self {
            Self::Disabled => PolicyDecision::PASS,
            Self::Marker { .. } => {
                if instruction.is_marker {
                    PolicyDecision {
                        fire: true,
                        consume_line: true,
                    }
                } else {
                    PolicyDecision::PASS
                }
            }
            Self::Stroke { interval } => {
                if is_draw_move && counters.move_counter >= *interval {
                    counters.move_counter = 0;
                    PolicyDecision {
                        fire: true,
                        consume_line: false,
                    }
                } else {
                    PolicyDecision::PASS
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_line() -> Instruction {
        Instruction::parse("G1 X5 Y5", None)
    }

    #[test]
    fn test_disabled_never_fires() {
        let policy = InkPolicy::Disabled;
        let mut counters = Counters::default();
        for _ in 0..100 {
            let decision = policy.decide(&draw_line(), true, &mut counters);
            assert!(!decision.fire);
            assert!(!decision.consume_line);
        }
        // Draw moves are still counted, they just trigger nothing.
        assert_eq!(counters.move_counter, 100);
    }

    #[test]
    fn test_marker_fires_and_consumes() {
        let policy = InkPolicy::Marker {
            token: ";#AUTO_INK#".to_string(),
        };
        let mut counters = Counters::default();

        let marker = Instruction::parse(";#AUTO_INK#", Some(";#AUTO_INK#"));
        let decision = policy.decide(&marker, false, &mut counters);
        assert!(decision.fire);
        assert!(decision.consume_line);

        // Ordinary lines pass untouched, whatever the move counter says.
        counters.move_counter = 1000;
        let decision = policy.decide(&draw_line(), true, &mut counters);
        assert!(!decision.fire);
    }

    #[test]
    fn test_stroke_fires_at_interval_and_resets() {
        let policy = InkPolicy::Stroke { interval: 3 };
        let mut counters = Counters::default();

        for expected in [false, false, true, false, false, true] {
            let decision = policy.decide(&draw_line(), true, &mut counters);
            assert_eq!(decision.fire, expected);
            assert!(!decision.consume_line);
        }
        assert_eq!(counters.move_counter, 0);
    }

    #[test]
    fn test_stroke_ignores_non_draw_lines() {
        let policy = InkPolicy::Stroke { interval: 1 };
        let mut counters = Counters::default();

        let travel = Instruction::parse("G0 X5 Y5", None);
        let decision = policy.decide(&travel, false, &mut counters);
        assert!(!decision.fire);
        assert_eq!(counters.move_counter, 0);
    }

    #[test]
    fn test_validate() {
        assert!(InkPolicy::Disabled.validate().is_ok());
        assert!(InkPolicy::Stroke { interval: 40 }.validate().is_ok());
        assert!(matches!(
            InkPolicy::Stroke { interval: 0 }.validate(),
            Err(PostError::InvalidStrokeInterval)
        ));
        assert!(matches!(
            InkPolicy::Marker {
                token: "   ".to_string()
            }
            .validate(),
            Err(PostError::EmptyMarkerToken)
        ));
    }
}
