//! Two-phase stream merge.
//!
//! The writing stream and the drawing stream are processed as two
//! independent passes with their own policies and counters, joined by
//! exactly one mandatory paper-change macro at the writing→drawing
//! boundary. The boundary macro is unconditional: it fires regardless of
//! the cadence state either stream reached on its own.

use serde::Serialize;
use tracing::info;

use crate::error::{PostError, PostResult};
use crate::processor::{
    process_stream, validate_pass, Emitter, MacroSet, PassParams, PassSummary, PlotterProfile,
};

/// Annotation carried by the mandatory boundary paper macro so the
/// transition is visible in the output stream.
pub const BOUNDARY_ANNOTATION: &str = "paper change: writing -> drawing";

/// Parameters for a full writing + drawing merge.
#[derive(Debug, Clone)]
pub struct MergeParams {
    /// Plotter geometry and defaults, shared by both passes.
    pub profile: PlotterProfile,
    /// Macro templates and placeholder context, shared by both passes.
    pub macros: MacroSet,
    /// Writing-stream policy and cadence.
    pub writing: PassParams,
    /// Drawing-stream policy and cadence. The drawing stream always runs a
    /// stroke policy.
    pub drawing: PassParams,
}

/// Counters for a completed merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MergeSummary {
    /// Writing-pass counters.
    pub writing: PassSummary,
    /// Drawing-pass counters.
    pub drawing: PassSummary,
    /// Paper macros emitted at the boundary (always 1 for a merge).
    pub boundary_paper_insertions: u32,
    /// Placeholders left unresolved by the boundary macro itself.
    pub boundary_unresolved_placeholders: usize,
    /// Total lines in the merged output.
    pub total_lines: usize,
}

impl MergeSummary {
    /// Total ink insertions across both passes.
    pub fn ink_insertions(&self) -> u32 {
        self.writing.ink_insertions + self.drawing.ink_insertions
    }

    /// Total paper insertions: cadence-based plus the mandatory boundary.
    pub fn paper_insertions(&self) -> u32 {
        self.writing.paper_insertions + self.drawing.paper_insertions
            + self.boundary_paper_insertions
    }

    /// Total unresolved placeholder occurrences in the merged output.
    pub fn unresolved_placeholders(&self) -> usize {
        self.writing.unresolved_placeholders
            + self.drawing.unresolved_placeholders
            + self.boundary_unresolved_placeholders
    }
}

/// Output of a merge: the joined program plus its summary.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// Writing output, boundary paper macro, drawing output — in order.
    pub lines: Vec<String>,
    /// Counters for reporting.
    pub summary: MergeSummary,
}

/// Merge a writing stream and a drawing stream into one continuous job.
///
/// Both passes are validated before any output is produced, so a
/// misconfigured run never yields a partial program. The drawing pass
/// starts from fresh counters and a lifted pen, which the boundary guard
/// guarantees.
pub fn merge_streams(
    writing_input: &[String],
    drawing_input: &[String],
    params: &MergeParams,
) -> PostResult<MergeOutput> {
    validate_pass(&params.profile, &params.macros, &params.writing)?;
    validate_pass(&params.profile, &params.macros, &params.drawing)?;
    // The boundary macro always fires, whatever the cadences say.
    if params.macros.paper.is_empty() {
        return Err(PostError::EmptyMacro("paper_macro"));
    }

    let writing = process_stream(
        writing_input,
        &params.profile,
        &params.macros,
        &params.writing,
    )?;

    let mut boundary = Emitter::new(
        params.profile.pen_up_z,
        writing.final_z,
        &params.macros.context,
    );
    boundary.inject_macro(&params.macros.paper, BOUNDARY_ANNOTATION);

    let drawing = process_stream(
        drawing_input,
        &params.profile,
        &params.macros,
        &params.drawing,
    )?;

    let mut lines = writing.lines;
    lines.extend(boundary.lines);
    lines.extend(drawing.lines);

    let summary = MergeSummary {
        writing: writing.summary,
        drawing: drawing.summary,
        boundary_paper_insertions: 1,
        boundary_unresolved_placeholders: boundary.unresolved,
        total_lines: lines.len(),
    };
    info!(
        ink = summary.ink_insertions(),
        paper = summary.paper_insertions(),
        total_lines = summary.total_lines,
        "merge complete"
    );

    Ok(MergeOutput { lines, summary })
}
