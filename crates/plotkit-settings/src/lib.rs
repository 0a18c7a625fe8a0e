//! Plotkit Settings Crate
//!
//! Handles the shared configuration schema, validation, and JSON
//! persistence. The CLI and the post-processing engine both consume
//! configuration through this crate.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    BedPosition, Config, DrawingSettings, GcodeSettings, InkMode, MacroSettings,
    PlotterSettings, PositionSettings, WritingSettings,
};
pub use error::{SettingsError, SettingsResult};
pub use persistence::DEFAULT_CONFIG_FILE;
