//! # Plotkit Post
//!
//! G-code post-processing engine for pen-plotting writing machines.
//!
//! The engine normalizes missing feed-rate directives and injects
//! ink-replenishment and paper-change macros at computed points in the
//! instruction stream, so that an independently produced writing program
//! and drawing program can be concatenated into one continuous job:
//!
//! - **Instruction model**: minimal G-code line parsing (op code, X/Y/Z/F
//!   words, comment and marker tagging) with exact raw-text pass-through
//! - **Draw-move classification**: pen-down linear XY moves drive the ink
//!   cadence; travel moves and comments never do
//! - **Insertion policies**: disabled, marker-triggered, or
//!   stroke-count-triggered, selected per stream
//! - **Safe-position guard**: every macro emission is bracketed by pen-lift
//!   correction
//! - **Stream merging**: two independent passes joined by one mandatory
//!   paper-change boundary
//!
//! The crate is a pure library: no file I/O, no hardware communication, and
//! every pass is a deterministic function of its input lines and parameters.

pub mod error;
pub mod instruction;
pub mod merge;
pub mod policy;
pub mod processor;
pub mod state;
pub mod template;

pub use error::{PostError, PostResult};
pub use instruction::{Instruction, OpCode};
pub use merge::{merge_streams, MergeOutput, MergeParams, MergeSummary, BOUNDARY_ANNOTATION};
pub use policy::{Counters, InkPolicy, PolicyDecision};
pub use processor::{
    ensure_feedrate, process_stream, MacroSet, PassOutput, PassParams, PassSummary, PlotterProfile,
};
pub use state::{is_draw_move, MachineState, FLOAT_EPS};
pub use template::{format_number, render_line, MacroContext};
