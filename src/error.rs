//! Error types and result utilities for filter design operations.

use crate::types::SymmetryType;
use std::time::Duration;
use thiserror::Error;

/// Convenience type alias for results that may contain a [`DesignError`].
pub type DesignResult<T> = Result<T, DesignError>;

/// Error types that can occur while specifying, synthesizing or optimizing a filter.
#[derive(Error, Debug)]
pub enum DesignError {
    /// The number of taps contradicts the parity required by the symmetry type.
    ///
    /// Odd-length symmetry types require an odd tap count and even-length
    /// types require an even one.
    #[error("{symmetry} FIR cannot have {parity} length (num_taps = {num_taps})", parity = parity_name(.num_taps))]
    ParityMismatch {
        /// Symmetry type that was requested
        symmetry: SymmetryType,
        /// Offending number of taps
        num_taps: usize,
    },

    /// Error that occurs when the filter specification is inconsistent.
    ///
    /// This includes band edges out of order or out of range, and tap counts
    /// too small to hold a passband and a stopband.
    #[error("Invalid filter configuration: {0}")]
    InvalidConfig(String),

    /// Error that occurs when invalid parameters are provided to an operation.
    ///
    /// This includes non-positive tolerances, empty search domains and tweak
    /// factors outside `(0, 1)`.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// The two line minima used to derive a search direction coincide.
    ///
    /// The slope of the new line is `y_base * (1 - tweak) / (x1 - x2)`, so a
    /// vanishing denominator leaves the direction undefined.
    #[error("Degenerate search line: line minima x1 = {x1} and x2 = {x2} are too close to define a direction")]
    DegenerateLine {
        /// Minimizer of the unperturbed line
        x1: f64,
        /// Minimizer of the perturbed line
        x2: f64,
    },

    /// The response or objective cannot be evaluated meaningfully.
    #[error("Degenerate response: {0}")]
    DegenerateResponse(String),

    /// The requested design needs a feature outside the optimizer's reach.
    #[error("Unsupported design: {0}")]
    Unsupported(String),

    /// The search was cancelled through its stop signal.
    #[error("Search cancelled")]
    Cancelled,

    /// The search ran past its deadline.
    #[error("Search deadline exceeded after {}ms", .elapsed.as_millis())]
    DeadlineExceeded {
        /// Time spent before the deadline check tripped
        elapsed: Duration,
    },

    /// Writing a dump failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const fn parity_name(num_taps: &usize) -> &'static str {
    if *num_taps % 2 == 0 { "even" } else { "odd" }
}

impl DesignError {
    /// Create an invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(details: impl Into<String>) -> Self {
        Self::InvalidParameter(details.into())
    }

    /// Create a degenerate response error
    pub fn degenerate_response(details: impl Into<String>) -> Self {
        Self::DegenerateResponse(details.into())
    }

    /// Create an unsupported design error
    pub fn unsupported(details: impl Into<String>) -> Self {
        Self::Unsupported(details.into())
    }

    /// Check if this error stems from the filter specification itself.
    ///
    /// Configuration errors cannot be fixed by retrying the search with other
    /// optimizer parameters.
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ParityMismatch { .. } | Self::InvalidConfig(_) | Self::Unsupported(_)
        )
    }

    /// Check if this error ended a search early rather than reporting a fault.
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded { .. })
    }
}
