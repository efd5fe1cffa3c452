// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![cfg_attr(not(test), warn(clippy::unwrap_used))] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # fsamp_fir
//!
//! Frequency-sampling design of linear-phase FIR filters with optimized
//! transition samples.
//!
//! ## Overview
//!
//! A frequency-sampling design fixes the desired magnitude response at the
//! `N/2 + 1` frequencies `2*pi*k/N` and obtains the `N` coefficients by a
//! closed-form inverse DFT. Passband samples are 1.0 and stopband samples
//! 0.0. The one or two samples in between (the transition band) decide how
//! much attenuation the stopband gets, so this crate searches for the values
//! that minimize the stopband peak of the normalized dB response:
//!
//! - one transition sample: golden-section line search over `[0, 1]`
//! - two transition samples: a direction search that fits lines through
//!   pairs of line minima in the plane of both samples
//!
//! All four band configurations (low-pass, high-pass, band-pass, band-stop)
//! and all four linear-phase symmetry types are supported.
//!
//! ## Quick Start
//!
//! ```rust
//! use fsamp_fir::{
//!     BandConfiguration, BandEdges, DesignConfig, FilterSpec, SearchContext, SymmetryType,
//!     TransitionPlacement, design,
//! };
//!
//! # fn main() -> Result<(), fsamp_fir::DesignError> {
//! let spec = FilterSpec::new(
//!     21,
//!     BandConfiguration::Lowpass,
//!     SymmetryType::EvenSymOddLen,
//!     BandEdges::two_band(6, 8),
//! )?;
//! let outcome = design(
//!     spec,
//!     &DesignConfig::default(),
//!     TransitionPlacement::Optimal,
//!     &SearchContext::default(),
//! )?;
//! println!(
//!     "transition sample {:?}: stopband peak {:.2} dB",
//!     outcome.transition_values, outcome.stopband_peak
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! - [`FilterSpec`]: desired half-spectrum samples plus band geometry
//! - [`synthesize`]: closed-form coefficients for each [`SymmetryType`]
//! - [`ResponseEvaluator`]: magnitude response sampled on `[0, pi)`, in
//!   linear or dB scale, via trigonometric sums or an FFT
//! - [`optimize`]: golden-section and direction searches with cancellation,
//!   deadlines and an injected [`SearchObserver`]
//! - [`design()`]: the end-to-end driver
//!
//! ## Error Handling
//!
//! Fallible operations return [`DesignResult`]. Configuration problems
//! (parity mismatches, bad band edges) are distinguished from optimizer
//! faults and from interrupted searches:
//!
//! ```rust
//! use fsamp_fir::{BandConfiguration, BandEdges, FilterSpec, SymmetryType};
//!
//! let err = FilterSpec::new(
//!     20,
//!     BandConfiguration::Lowpass,
//!     SymmetryType::EvenSymOddLen,
//!     BandEdges::two_band(4, 6),
//! ).unwrap_err();
//! assert!(err.is_config_error());
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events: `trace` per objective evaluation,
//! `debug` per line search, `info` per finished design and `warn` when a
//! search stops at an iteration cap. Install any `tracing` subscriber to see
//! them.

#[cfg(test)]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right): (f64, f64) = ($left, $right);
        assert!(
            (left - right).abs() < $tolerance,
            "assertion failed: `{} ≈ {}` (tolerance: {})",
            left,
            right,
            $tolerance
        );
    }};
}

pub mod config;
pub mod design;
pub mod dump;
pub mod error;
pub mod optimize;
pub mod response;
pub mod spec;
pub mod synthesis;
pub mod types;

pub use config::{DesignConfig, DirectionSearchConfig, LineSearchConfig};
pub use design::{DesignOutcome, TransitionPlacement, design};
pub use dump::{write_coefficients, write_magnitude_response};
pub use error::{DesignError, DesignResult};
pub use optimize::{
    DirectionSearch, GoldenSectionSearch, LineMinimum, RecordingObserver, SearchContext,
    SearchObserver, StopSignal, StopbandObjective, TracingObserver, Trial, TwoParamResult,
    minimize_line, optimize_two_param,
};
pub use response::{
    MagnitudeResponse, ResponseEvaluator, compute_mag_resp, stopband_peak, stopband_ranges,
};
pub use spec::{CutoffPlacement, FilterSpec, TransitionLine};
pub use synthesis::{Coefficients, synthesize};
pub use types::{
    BandConfiguration, BandEdges, CutoffKind, CutoffSpec, ResponseMethod, ResponseScale,
    SymmetryType,
};
