//! Error types for scan point generation.
//!
//! This module defines [`ScanError`], the single error type shared by the
//! model layer and the generator engine. It is built with `thiserror` and
//! separates failures into the two kinds a caller has to react to:
//!
//! - **`Validation`**: the model is misconfigured (duplicate axis names, a
//!   region naming an axis no component declares, incompatible shapes,
//!   alternating components inside a concurrent group). These are always
//!   raised eagerly at construction time, never during iteration.
//! - **`Generation`**: the parameters are individually valid but cannot be
//!   combined into points (a step pointing away from its stop value, a mask
//!   that excludes every point, a join gap in a continuous sequence).
//!
//! Neither kind is retried internally. Composition and generation are pure
//! functions of their inputs, so the caller has to correct the model.
//!
//! The remaining variants cover configuration loading, export serialization
//! and programmer errors such as reading past the end of an iterator.

use thiserror::Error;

/// Convenience alias for results using the scan error type.
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Primary error type for point generation.
///
/// # Example
///
/// ```rust,ignore
/// use scan_core::error::{ScanError, ScanResult};
///
/// fn check_points(points: usize) -> ScanResult<()> {
///     if points == 0 {
///         return Err(ScanError::validation("point count must be at least 1"));
///     }
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ScanError {
    /// The model is misconfigured.
    ///
    /// **Error Type**: Permanent - the model must be corrected.
    #[error("Model validation failed: {message}")]
    Validation {
        /// Human readable diagnosis.
        message: String,
    },

    /// Points cannot be generated from otherwise valid parameters.
    ///
    /// **Error Type**: Permanent - the bounds or steps must be corrected.
    #[error("Point generation failed: {message}")]
    Generation {
        /// Human readable diagnosis.
        message: String,
    },

    /// A position was requested past the end of the generator.
    ///
    /// This is a programmer error: the size of every generator is known up
    /// front, so callers never need to search for the end.
    #[error("Position index {index} out of range for generator of size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Size of the generator.
        size: usize,
    },

    /// Calculating a size overflowed usize.
    #[error("Size overflow while computing {context}")]
    SizeOverflow {
        /// What was being computed.
        context: &'static str,
    },

    /// Configuration file parsing failed.
    ///
    /// **Source**: Wraps `figment::Error`.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration values parsed but failed semantic validation.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Export dictionary could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Build a [`ScanError::Validation`] from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a [`ScanError::Generation`] from a message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Returns true for model misconfiguration failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true for failures raised while combining bounds and steps.
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}

impl From<figment::Error> for ScanError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = ScanError::validation("duplicate axis 'x'");
        assert!(err.is_validation());
        assert!(!err.is_generation());
        assert_eq!(err.to_string(), "Model validation failed: duplicate axis 'x'");

        let err = ScanError::generation("step points away from stop");
        assert!(err.is_generation());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_out_of_range_message() {
        let err = ScanError::IndexOutOfRange { index: 11, size: 11 };
        assert_eq!(
            err.to_string(),
            "Position index 11 out of range for generator of size 11"
        );
    }
}
