//! Machine state tracking and draw-move classification.
//!
//! The tracker holds the last-known Z height and feed rate as instructions
//! are emitted, in emission order (inserted lines included). Classification
//! always consults the state as updated by the most recently emitted
//! instruction, never by lookahead.

use crate::instruction::{Instruction, OpCode};

/// Comparison tolerance for Z heights. The plotter firmware echoes heights
/// with limited precision, so exact float equality is never used.
pub const FLOAT_EPS: f64 = 1e-4;

/// Tracked machine state for one processing pass.
#[derive(Debug, Clone, Copy)]
pub struct MachineState {
    /// Last-known Z height.
    pub current_z: f64,
    /// Last-known feed rate, unset until an F word is seen.
    pub feed_rate: Option<f64>,
}

impl MachineState {
    /// Create a fresh state with the pen at the given height.
    pub fn new(initial_z: f64) -> Self {
        Self {
            current_z: initial_z,
            feed_rate: None,
        }
    }

    /// Update the state from an instruction that has just been emitted.
    pub fn observe(&mut self, instruction: &Instruction) {
        if let Some(z) = instruction.z {
            self.current_z = z;
        }
        if let Some(feed) = instruction.feed {
            self.feed_rate = Some(feed);
        }
    }

    /// Pen-down flag: the tool touches the page once Z reaches the
    /// configured pen-down height.
    pub fn pen_down(&self, pen_down_z: f64) -> bool {
        self.current_z >= pen_down_z - FLOAT_EPS
    }

    /// True when the tracked Z equals the pen-up height.
    pub fn at_pen_up(&self, pen_up_z: f64) -> bool {
        (self.current_z - pen_up_z).abs() <= FLOAT_EPS
    }
}

/// Draw-move classifier.
///
/// An instruction counts as a real draw move iff it is a linear move with
/// both X and Y present, issued while the pen is down. Rapid moves, dwells,
/// Z-only moves, and any motion with the pen lifted never count, so travel
/// moves cannot advance the ink cadence.
pub fn is_draw_move(instruction: &Instruction, state: &MachineState, pen_down_z: f64) -> bool {
    instruction.op == OpCode::Linear && instruction.has_xy() && state.pen_down(pen_down_z)
}
