//! Tests for the transition-sample optimizer.

use crate::spec::FilterSpec;
use crate::types::{BandConfiguration, BandEdges, SymmetryType};


/// 21-tap type 1 lowpass with one transition sample at index 7.
pub(crate) fn lowpass_one_sample() -> FilterSpec {
    FilterSpec::new(
        21,
        BandConfiguration::Lowpass,
        SymmetryType::EvenSymOddLen,
        BandEdges::two_band(6, 8),
    )
    .expect("valid lowpass spec")
}

/// 21-tap type 1 lowpass with transition samples at indices 7 and 6.
pub(crate) fn lowpass_two_samples() -> FilterSpec {
    FilterSpec::new(
        21,
        BandConfiguration::Lowpass,
        SymmetryType::EvenSymOddLen,
        BandEdges::two_band(5, 8),
    )
    .expect("valid lowpass spec")
}
