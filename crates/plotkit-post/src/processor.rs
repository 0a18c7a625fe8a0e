//! Single-stream post-processing pass.
//!
//! Raw text goes through the instruction model, the one-shot feed-rate
//! normalizer, and a fold that classifies draw moves, applies the stream's
//! ink policy, and brackets every macro emission with the safe-position
//! guard. The pass is a pure function of (lines, parameters); all counters
//! and machine state are owned by the pass and never shared.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PostError, PostResult};
use crate::instruction::Instruction;
use crate::policy::{Counters, InkPolicy};
use crate::state::{is_draw_move, MachineState};
use crate::template::{format_number, render_line, MacroContext};

/// Plotter geometry and defaults shared by every pass of a run.
#[derive(Debug, Clone, Copy)]
pub struct PlotterProfile {
    /// Z height with the pen lifted.
    pub pen_up_z: f64,
    /// Z height at which the pen touches the page.
    pub pen_down_z: f64,
    /// Feed rate synthesized when a stream establishes none.
    pub default_feedrate: f64,
}

/// The two macro templates plus their placeholder context.
#[derive(Debug, Clone, Default)]
pub struct MacroSet {
    /// Ink-replenishment macro, one template line per entry.
    pub ink: Vec<String>,
    /// Paper-change macro, one template line per entry.
    pub paper: Vec<String>,
    /// Placeholder values, built once per run.
    pub context: MacroContext,
}

/// Per-stream parameters: the ink policy and the paper-change cadence.
#[derive(Debug, Clone)]
pub struct PassParams {
    /// Ink insertion policy for this stream.
    pub policy: InkPolicy,
    /// Insert a paper macro after every N successful ink insertions;
    /// 0 disables cadence-based paper insertion.
    pub insert_every_n_ink: u32,
}

/// Counters reported by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PassSummary {
    /// Ink macros emitted.
    pub ink_insertions: u32,
    /// Cadence-based paper macros emitted.
    pub paper_insertions: u32,
    /// Placeholders left unresolved in rendered macro lines.
    pub unresolved_placeholders: usize,
    /// Real draw moves seen by the classifier.
    pub draw_moves: u32,
}

/// Output of one pass: the processed lines plus its summary.
#[derive(Debug, Clone)]
pub struct PassOutput {
    /// Processed instruction lines, in emission order.
    pub lines: Vec<String>,
    /// Counters for reporting.
    pub summary: PassSummary,
    /// Tracked Z after the last emitted line. The merger's boundary guard
    /// starts from here.
    pub final_z: f64,
}

/// Output accumulator shared by the pass loop and the merger's boundary
/// step. Owns the tracked machine state so every emitted line, original or
/// synthesized, updates it in order.
pub(crate) struct Emitter<'a> {
    pen_up_z: f64,
    context: &'a MacroContext,
    pub(crate) state: MachineState,
    pub(crate) lines: Vec<String>,
    pub(crate) unresolved: usize,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(pen_up_z: f64, initial_z: f64, context: &'a MacroContext) -> Self {
        Self {
            pen_up_z,
            context,
            state: MachineState::new(initial_z),
            lines: Vec::new(),
            unresolved: 0,
        }
    }

    /// Emit an already-parsed original line verbatim.
    fn push_instruction(&mut self, instruction: &Instruction) {
        self.state.observe(instruction);
        self.lines.push(instruction.raw.clone());
    }

    /// Emit a synthesized line, tracking any Z/F words it carries.
    fn push_synthesized(&mut self, line: String) {
        let instruction = Instruction::parse(&line, None);
        self.state.observe(&instruction);
        self.lines.push(line);
    }

    /// Render a macro through the safe-position guard: lift to `pen_up_z`
    /// before the macro if needed, and correct once afterwards if the macro
    /// left the pen anywhere else. The annotation comment names the macro
    /// occurrence in the output.
    pub(crate) fn inject_macro(&mut self, template: &[String], annotation: &str) {
        if !self.state.at_pen_up(self.pen_up_z) {
            self.push_synthesized(format!("G0 Z{}", format_number(self.pen_up_z)));
        }
        self.lines.push(format!("; ---- {} ----", annotation));
        for line_template in template {
            let (line, unresolved) = render_line(line_template, self.context);
            self.unresolved += unresolved;
            self.push_synthesized(line);
        }
        if !self.state.at_pen_up(self.pen_up_z) {
            self.push_synthesized(format!("G0 Z{}", format_number(self.pen_up_z)));
        }
        debug!(annotation, lines = template.len(), "macro injected");
    }
}

/// One-shot feed-rate normalization.
///
/// Inspects the first two effective instructions (blank lines skipped,
/// comments included). If neither carries an F word, a `G1 F<default>` line
/// is inserted immediately after the first effective instruction. The
/// synthesized line has no X/Y, so it can never classify as a draw move.
pub fn ensure_feedrate(lines: &[String], default_feedrate: f64) -> Vec<String> {
    let mut effective = Vec::with_capacity(2);
    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        effective.push(index);
        if effective.len() == 2 {
            break;
        }
    }

    let has_feed = effective
        .iter()
        .any(|&index| Instruction::parse(&lines[index], None).feed.is_some());
    if has_feed || effective.is_empty() {
        return lines.to_vec();
    }

    let insert_at = effective[0] + 1;
    let injection = format!("G1 F{}", format_number(default_feedrate));
    debug!(line = insert_at + 1, %injection, "no feed rate in leading instructions, normalizing");

    let mut normalized = Vec::with_capacity(lines.len() + 1);
    normalized.extend_from_slice(&lines[..insert_at]);
    normalized.push(injection);
    normalized.extend_from_slice(&lines[insert_at..]);
    normalized
}

/// Validate everything that must hold before a pass may emit output.
pub(crate) fn validate_pass(
    profile: &PlotterProfile,
    macros: &MacroSet,
    params: &PassParams,
) -> PostResult<()> {
    if profile.pen_down_z <= profile.pen_up_z {
        return Err(PostError::InvalidHeights {
            pen_up_z: profile.pen_up_z,
            pen_down_z: profile.pen_down_z,
        });
    }
    params.policy.validate()?;
    if params.policy.can_fire() && macros.ink.is_empty() {
        return Err(PostError::EmptyMacro("ink_macro"));
    }
    if params.insert_every_n_ink > 0 && macros.paper.is_empty() {
        return Err(PostError::EmptyMacro("paper_macro"));
    }
    Ok(())
}

/// Run one stream pass: normalize the feed rate, then fold over the
/// instructions applying the ink policy, the paper cadence, and the
/// safe-position guard.
pub fn process_stream(
    input: &[String],
    profile: &PlotterProfile,
    macros: &MacroSet,
    params: &PassParams,
) -> PostResult<PassOutput> {
    validate_pass(profile, macros, params)?;

    let lines = ensure_feedrate(input, profile.default_feedrate);
    let mut emitter = Emitter::new(profile.pen_up_z, profile.pen_up_z, &macros.context);
    let mut counters = Counters::default();
    let mut draw_moves = 0u32;

    for raw in &lines {
        let instruction = Instruction::parse(raw, params.policy.marker_token());
        let draw = is_draw_move(&instruction, &emitter.state, profile.pen_down_z);
        if draw {
            draw_moves += 1;
        }

        let decision = params.policy.decide(&instruction, draw, &mut counters);
        if !decision.consume_line {
            emitter.push_instruction(&instruction);
        }
        if decision.fire {
            counters.ink_insertions += 1;
            emitter.inject_macro(
                &macros.ink,
                &format!("ink change #{}", counters.ink_insertions),
            );
            if params.insert_every_n_ink > 0
                && counters.ink_insertions % params.insert_every_n_ink == 0
            {
                counters.paper_insertions += 1;
                emitter.inject_macro(
                    &macros.paper,
                    &format!("paper change #{}", counters.paper_insertions),
                );
            }
        }
    }

    let summary = PassSummary {
        ink_insertions: counters.ink_insertions,
        paper_insertions: counters.paper_insertions,
        unresolved_placeholders: emitter.unresolved,
        draw_moves,
    };
    info!(
        ink = summary.ink_insertions,
        paper = summary.paper_insertions,
        draw_moves = summary.draw_moves,
        lines = emitter.lines.len(),
        "stream pass complete"
    );

    Ok(PassOutput {
        final_z: emitter.state.current_z,
        lines: emitter.lines,
        summary,
    })
}
