//! Supporting types and enums for frequency-sampling filter design.
//!
//! This module contains the band and symmetry classifications, band-edge
//! geometry and the scale/method selectors used by the response evaluator.

use crate::{DesignError, DesignResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Band configuration of the filter.
///
/// Selects which half-spectrum samples form the passband(s) and the
/// stopband(s), which transition slots hold the free parameters, and which
/// response ranges make up the stopband-peak objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandConfiguration {
    /// Low-pass filter - passband `[0, n1]`, stopband `[n2, fold]`.
    Lowpass,
    /// High-pass filter - stopband `[0, n1]`, passband `[n2, fold]`.
    Highpass,
    /// Band-pass filter - stopbands `[0, n1]` and `[n4, fold]`, passband `[n2, n3]`.
    Bandpass,
    /// Band-stop filter - passbands `[0, n1]` and `[n4, fold]`, stopband `[n2, n3]`.
    Bandstop,
}

impl BandConfiguration {
    /// Whether the configuration uses all four band edges.
    pub const fn uses_four_edges(self) -> bool {
        matches!(self, Self::Bandpass | Self::Bandstop)
    }

    /// Desired magnitude of the band that starts at sample 0.
    ///
    /// The remaining bands alternate between this value and its complement.
    pub const fn lowest_band_level(self) -> f64 {
        match self {
            Self::Lowpass | Self::Bandstop => 1.0,
            Self::Highpass | Self::Bandpass => 0.0,
        }
    }
}

impl fmt::Display for BandConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lowpass => "lowpass",
            Self::Highpass => "highpass",
            Self::Bandpass => "bandpass",
            Self::Bandstop => "bandstop",
        };
        f.write_str(name)
    }
}

/// Linear-phase symmetry type of the FIR impulse response.
///
/// Fixes which synthesis formula applies and the parity of the tap count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetryType {
    /// Even symmetry, odd length (type 1).
    EvenSymOddLen,
    /// Even symmetry, even length (type 2).
    EvenSymEvenLen,
    /// Odd symmetry, odd length (type 3).
    OddSymOddLen,
    /// Odd symmetry, even length (type 4).
    OddSymEvenLen,
}

impl SymmetryType {
    /// Whether the type requires an odd number of taps.
    pub const fn requires_odd_length(self) -> bool {
        matches!(self, Self::EvenSymOddLen | Self::OddSymOddLen)
    }

    /// Whether `h[n] == h[N-1-n]` (as opposed to `h[n] == -h[N-1-n]`).
    pub const fn is_even_symmetric(self) -> bool {
        matches!(self, Self::EvenSymOddLen | Self::EvenSymEvenLen)
    }

    /// Sign relating mirrored coefficients, `h[N-1-n] == sign * h[n]`.
    pub const fn mirror_sign(self) -> f64 {
        if self.is_even_symmetric() { 1.0 } else { -1.0 }
    }

    /// Verify that `num_taps` has the parity this type requires.
    pub fn check_num_taps(self, num_taps: usize) -> DesignResult<()> {
        if (num_taps % 2 == 1) == self.requires_odd_length() {
            Ok(())
        } else {
            Err(DesignError::ParityMismatch {
                symmetry: self,
                num_taps,
            })
        }
    }
}

impl fmt::Display for SymmetryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EvenSymOddLen => "type 1 (even symmetry, odd length)",
            Self::EvenSymEvenLen => "type 2 (even symmetry, even length)",
            Self::OddSymOddLen => "type 3 (odd symmetry, odd length)",
            Self::OddSymEvenLen => "type 4 (odd symmetry, even length)",
        };
        f.write_str(name)
    }
}

/// Band-edge sample indices.
///
/// `n1` is the last sample of the lowest band and `n2` the first sample of
/// the next one; the samples strictly between them are transition samples.
/// `n3`/`n4` play the same roles for the upper transition band of band-pass
/// and band-stop filters and are zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BandEdges {
    /// Last sample of the lowest band
    pub n1: usize,
    /// First sample of the second band
    pub n2: usize,
    /// Last sample of the second band (band-pass/band-stop only)
    pub n3: usize,
    /// First sample of the third band (band-pass/band-stop only)
    pub n4: usize,
}

impl BandEdges {
    /// Edges for a low-pass or high-pass filter.
    pub const fn two_band(n1: usize, n2: usize) -> Self {
        Self { n1, n2, n3: 0, n4: 0 }
    }

    /// Edges for a band-pass or band-stop filter.
    pub const fn four_band(n1: usize, n2: usize, n3: usize, n4: usize) -> Self {
        Self { n1, n2, n3, n4 }
    }
}

/// Magnitude scale of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseScale {
    /// Linear magnitude.
    Linear,
    /// `20*log10(|A|)` in decibels.
    #[default]
    Decibel,
}

impl ResponseScale {
    /// Whether values are in decibels.
    pub const fn is_db(self) -> bool {
        matches!(self, Self::Decibel)
    }
}

/// How the magnitude response is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseMethod {
    /// Closed-form amplitude sums per symmetry type.
    #[default]
    Trigonometric,
    /// Zero-padded FFT over `2 * num_resp_pts` points.
    Fft,
}

/// Definition of a cutoff frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutoffKind {
    /// Half-amplitude (6 dB) point.
    HalfAmplitude,
    /// Half-power (3 dB) point.
    HalfPower,
}

/// A cutoff frequency expressed as a fraction of the folding frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffSpec {
    /// Cutoff as a fraction of the folding frequency (pi rad/sample), in `(0, 1)`
    pub fraction: f64,
    /// Which response level defines the cutoff
    pub kind: CutoffKind,
}

impl CutoffSpec {
    /// Cutoff given directly as a fraction of the folding frequency.
    pub const fn normalized(fraction: f64, kind: CutoffKind) -> Self {
        Self { fraction, kind }
    }

    /// Cutoff given as the ratio `numerator / denominator` of pi.
    pub fn ratio(numerator: f64, denominator: f64, kind: CutoffKind) -> DesignResult<Self> {
        if denominator == 0.0 {
            return Err(DesignError::invalid_parameter(
                "cutoff denominator must be non-zero",
            ));
        }
        Self::normalized(numerator / denominator, kind).validated()
    }

    /// Cutoff given in Hz for a sampling rate in Hz.
    pub fn from_hz(cutoff_hz: f64, sample_rate: f64, kind: CutoffKind) -> DesignResult<Self> {
        if sample_rate.is_nan() || sample_rate <= 0.0 {
            return Err(DesignError::invalid_parameter(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        Self::normalized(2.0 * cutoff_hz / sample_rate, kind).validated()
    }

    fn validated(self) -> DesignResult<Self> {
        if self.fraction > 0.0 && self.fraction < 1.0 {
            Ok(self)
        } else {
            Err(DesignError::invalid_parameter(format!(
                "cutoff must lie strictly between 0 and the folding frequency, got {} * pi",
                self.fraction
            )))
        }
    }
}
