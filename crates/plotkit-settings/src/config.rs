//! Configuration schema shared by the CLI and any future front end.
//!
//! The configuration is organized into logical sections:
//! - Plotter heights (pen-up, pen-down, safe travel)
//! - Ink and paper positions on the machine bed
//! - The two macro templates (ink replenishment, paper change)
//! - G-code processing defaults (feed rate, policies, cadences)
//!
//! Every section carries field-level serde defaults, so a partial
//! configuration file is filled up from the built-in values instead of
//! failing to load.

use plotkit_post::{InkPolicy, MacroContext, MacroSet, MergeParams, PassParams, PlotterProfile};
use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

/// Plotter Z heights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterSettings {
    /// Z height with the pen lifted.
    pub pen_up_z: f64,
    /// Z height at which the pen touches the page.
    pub pen_down_z: f64,
    /// Z height for long travel moves inside macros.
    pub safe_z: f64,
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self {
            pen_up_z: 0.0,
            pen_down_z: 8.0,
            safe_z: 1.0,
        }
    }
}

/// An XY position on the machine bed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BedPosition {
    pub x: f64,
    pub y: f64,
}

/// Positions of the ink well and the paper-change park point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSettings {
    /// Ink well position.
    pub ink: BedPosition,
    /// Park position for paper changes.
    pub paper: BedPosition,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            ink: BedPosition { x: 10.0, y: -10.0 },
            paper: BedPosition { x: 0.0, y: 0.0 },
        }
    }
}

/// The two macro templates. Each entry is one line template using `{name}`
/// placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSettings {
    /// Ink-replenishment macro.
    pub ink_macro: Vec<String>,
    /// Paper-change macro.
    pub paper_macro: Vec<String>,
}

impl Default for MacroSettings {
    fn default() -> Self {
        Self {
            ink_macro: vec![
                "G0 Z{pen_up_z}".to_string(),
                "G0 X{ink_x} Y{ink_y}".to_string(),
                "G1 Z{pen_down_z}".to_string(),
                "G4 P0.5".to_string(),
                "G0 Z{pen_up_z}".to_string(),
            ],
            paper_macro: vec![
                "G0 Z{pen_up_z}".to_string(),
                "G0 X{paper_x} Y{paper_y}".to_string(),
                "G4 P1.0".to_string(),
            ],
        }
    }
}

/// Ink insertion mode for the writing stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkMode {
    /// Never insert ink macros.
    Off,
    /// Insert on the configured marker comment line.
    Marker,
    /// Insert every N draw moves.
    Stroke,
}

impl Default for InkMode {
    fn default() -> Self {
        Self::Marker
    }
}

impl std::fmt::Display for InkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Marker => write!(f, "marker"),
            Self::Stroke => write!(f, "stroke"),
        }
    }
}

/// Writing-stream policy selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingSettings {
    /// Selected ink mode.
    pub ink_mode: InkMode,
    /// Draw moves between insertions when `ink_mode` is `stroke`.
    pub stroke_interval: u32,
}

impl Default for WritingSettings {
    fn default() -> Self {
        Self {
            ink_mode: InkMode::Marker,
            stroke_interval: 40,
        }
    }
}

/// Drawing-stream policy selection. The drawing stream always uses the
/// stroke policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Draw moves between insertions.
    pub stroke_interval: u32,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            stroke_interval: 80,
        }
    }
}

/// G-code processing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    /// Feed rate synthesized when a stream establishes none.
    pub default_feedrate: f64,
    /// Exact comment line that triggers a manual ink insertion.
    pub marker_token: String,
    /// Writing-stream policy.
    pub writing: WritingSettings,
    /// Drawing-stream policy.
    pub drawing: DrawingSettings,
    /// Insert a paper macro after every N ink insertions; 0 disables the
    /// cadence (the mandatory merge boundary is unaffected).
    pub insert_every_n_ink: u32,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            default_feedrate: 1000.0,
            marker_token: ";#AUTO_INK#".to_string(),
            writing: WritingSettings::default(),
            drawing: DrawingSettings::default(),
            insert_every_n_ink: 0,
        }
    }
}

/// Complete Plotkit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plotter: PlotterSettings,
    pub positions: PositionSettings,
    pub macros: MacroSettings,
    pub gcode: GcodeSettings,
}

impl Config {
    /// Validate the configuration. Fatal defects are reported here, before
    /// any G-code output is produced.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.plotter.pen_down_z <= self.plotter.pen_up_z {
            return Err(SettingsError::InvalidSetting {
                key: "plotter.pen_down_z".to_string(),
                reason: format!(
                    "must be greater than pen_up_z ({})",
                    self.plotter.pen_up_z
                ),
            });
        }

        match self.gcode.writing.ink_mode {
            InkMode::Off => {}
            InkMode::Marker => {
                if self.gcode.marker_token.trim().is_empty() {
                    return Err(SettingsError::InvalidSetting {
                        key: "gcode.marker_token".to_string(),
                        reason: "must not be empty when writing ink_mode is 'marker'".to_string(),
                    });
                }
            }
            InkMode::Stroke => {
                if self.gcode.writing.stroke_interval == 0 {
                    return Err(SettingsError::InvalidSetting {
                        key: "gcode.writing.stroke_interval".to_string(),
                        reason: "must be positive when writing ink_mode is 'stroke'".to_string(),
                    });
                }
            }
        }

        if self.gcode.drawing.stroke_interval == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "gcode.drawing.stroke_interval".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        // The drawing stream always runs the stroke policy, so the ink
        // macro can always fire.
        if self.macros.ink_macro.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "macros.ink_macro".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.gcode.insert_every_n_ink > 0 && self.macros.paper_macro.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "macros.paper_macro".to_string(),
                reason: "must not be empty when insert_every_n_ink is set".to_string(),
            });
        }

        Ok(())
    }

    /// Plotter geometry and defaults for the post-processing engine.
    pub fn plotter_profile(&self) -> PlotterProfile {
        PlotterProfile {
            pen_up_z: self.plotter.pen_up_z,
            pen_down_z: self.plotter.pen_down_z,
            default_feedrate: self.gcode.default_feedrate,
        }
    }

    /// Placeholder context for macro rendering, built once per run.
    pub fn macro_context(&self) -> MacroContext {
        let mut context = MacroContext::new();
        context.set("pen_up_z", self.plotter.pen_up_z);
        context.set("pen_down_z", self.plotter.pen_down_z);
        context.set("safe_z", self.plotter.safe_z);
        context.set("ink_x", self.positions.ink.x);
        context.set("ink_y", self.positions.ink.y);
        context.set("paper_x", self.positions.paper.x);
        context.set("paper_y", self.positions.paper.y);
        context
    }

    /// Macro templates plus their context.
    pub fn macro_set(&self) -> MacroSet {
        MacroSet {
            ink: self.macros.ink_macro.clone(),
            paper: self.macros.paper_macro.clone(),
            context: self.macro_context(),
        }
    }

    /// Writing-stream ink policy.
    pub fn writing_policy(&self) -> InkPolicy {
        match self.gcode.writing.ink_mode {
            InkMode::Off => InkPolicy::Disabled,
            InkMode::Marker => InkPolicy::Marker {
                token: self.gcode.marker_token.clone(),
            },
            InkMode::Stroke => InkPolicy::Stroke {
                interval: self.gcode.writing.stroke_interval,
            },
        }
    }

    /// Drawing-stream ink policy (always stroke-triggered).
    pub fn drawing_policy(&self) -> InkPolicy {
        InkPolicy::Stroke {
            interval: self.gcode.drawing.stroke_interval,
        }
    }

    /// Full parameter set for a writing + drawing merge.
    pub fn merge_params(&self) -> MergeParams {
        MergeParams {
            profile: self.plotter_profile(),
            macros: self.macro_set(),
            writing: PassParams {
                policy: self.writing_policy(),
                insert_every_n_ink: self.gcode.insert_every_n_ink,
            },
            drawing: PassParams {
                policy: self.drawing_policy(),
                insert_every_n_ink: self.gcode.insert_every_n_ink,
            },
        }
    }
}
