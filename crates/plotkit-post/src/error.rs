//! Error types for the post-processing engine.
//!
//! Configuration defects are fatal and reported before any output line is
//! produced; data defects (unknown commands, unresolved placeholders) are
//! handled leniently inside the pipeline and never surface here.

use thiserror::Error;

/// Errors that can occur while preparing or running a post-processing pass.
#[derive(Error, Debug)]
pub enum PostError {
    /// The pen-down height does not clear the pen-up height.
    #[error("Invalid plotter heights: pen_down_z ({pen_down_z}) must be greater than pen_up_z ({pen_up_z})")]
    InvalidHeights { pen_up_z: f64, pen_down_z: f64 },

    /// The stroke policy was selected with a zero interval.
    #[error("Stroke policy requires a positive stroke interval")]
    InvalidStrokeInterval,

    /// The marker policy was selected with an empty marker token.
    #[error("Marker policy requires a non-empty marker token")]
    EmptyMarkerToken,

    /// A macro that can fire under the current configuration has no lines.
    #[error("Macro template '{0}' is empty but can fire in this configuration")]
    EmptyMacro(&'static str),
}

/// Result type alias for post-processing operations.
pub type PostResult<T> = Result<T, PostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_error_display() {
        let err = PostError::InvalidHeights {
            pen_up_z: 5.0,
            pen_down_z: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid plotter heights: pen_down_z (1) must be greater than pen_up_z (5)"
        );

        let err = PostError::InvalidStrokeInterval;
        assert_eq!(
            err.to_string(),
            "Stroke policy requires a positive stroke interval"
        );

        let err = PostError::EmptyMarkerToken;
        assert_eq!(
            err.to_string(),
            "Marker policy requires a non-empty marker token"
        );

        let err = PostError::EmptyMacro("ink_macro");
        assert_eq!(
            err.to_string(),
            "Macro template 'ink_macro' is empty but can fire in this configuration"
        );
    }
}
