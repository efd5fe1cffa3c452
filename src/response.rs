//! Magnitude response evaluation and the stopband-peak objective.
//!
//! Responses are sampled at `lambda_L = L * pi / num_resp_pts` for
//! `L = 0..num_resp_pts`, i.e. over `[0, pi)`. The stopband peak of a
//! normalized dB response is the quantity the transition-sample optimizer
//! minimizes.

use crate::spec::FilterSpec;
use crate::synthesis::{Coefficients, synthesize};
use crate::types::{BandConfiguration, BandEdges, ResponseMethod, ResponseScale, SymmetryType};
use crate::{DesignError, DesignResult};
use ndarray::{Array1, s};
use num_complex::Complex;
use rustfft::FftPlanner;
use serde::Serialize;
use std::f64::consts::PI;
use std::ops::Range;

/// Starting value of interval peak searches; any real sample exceeds it.
pub const PEAK_FLOOR: f64 = -9999.0;

/// Starting value of the dB peak search during normalization.
const DB_NORMALIZE_FLOOR: f64 = -100.0;

/// A sampled magnitude response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeResponse {
    values: Array1<f64>,
    scale: ResponseScale,
}

impl MagnitudeResponse {
    /// Wrap precomputed magnitude samples.
    pub const fn new(values: Array1<f64>, scale: ResponseScale) -> Self {
        Self { values, scale }
    }

    /// The magnitude samples.
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of response points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the response holds no points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scale of the samples.
    pub const fn scale(&self) -> ResponseScale {
        self.scale
    }

    /// Frequency of point `index` as a fraction of the folding frequency.
    pub fn frequency(&self, index: usize) -> f64 {
        index as f64 / self.values.len() as f64
    }

    /// Largest sample of the whole response.
    pub fn peak(&self) -> f64 {
        self.values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    }

    /// Largest sample in `range`, starting from [`PEAK_FLOOR`].
    ///
    /// The range is clamped to the response length.
    pub fn interval_peak(&self, range: Range<usize>) -> f64 {
        let end = range.end.min(self.values.len());
        let start = range.start.min(end);
        self.values
            .slice(s![start..end])
            .fold(PEAK_FLOOR, |acc, &v| if v > acc { v } else { acc })
    }

    /// Rescale so the response peak is 1.0 (linear) or 0 dB.
    ///
    /// # Errors
    /// `DegenerateResponse` if a linear response has no positive sample.
    pub fn normalize(&mut self) -> DesignResult<()> {
        match self.scale {
            ResponseScale::Decibel => {
                let biggest = self.values.fold(DB_NORMALIZE_FLOOR, |acc, &v| acc.max(v));
                self.values.mapv_inplace(|v| v - biggest);
            }
            ResponseScale::Linear => {
                let biggest = self.values.fold(0.0_f64, |acc, &v| acc.max(v));
                if biggest <= 0.0 {
                    return Err(DesignError::degenerate_response(
                        "cannot normalize a linear response without a positive sample",
                    ));
                }
                self.values.mapv_inplace(|v| v / biggest);
            }
        }
        Ok(())
    }
}

/// Evaluates magnitude responses on a fixed grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseEvaluator {
    num_resp_pts: usize,
    scale: ResponseScale,
    method: ResponseMethod,
}

impl ResponseEvaluator {
    /// Create an evaluator using the trigonometric amplitude formulas.
    pub const fn new(num_resp_pts: usize, scale: ResponseScale) -> Self {
        Self {
            num_resp_pts,
            scale,
            method: ResponseMethod::Trigonometric,
        }
    }

    /// Select how the response is sampled.
    pub const fn with_method(mut self, method: ResponseMethod) -> Self {
        self.method = method;
        self
    }

    /// Number of response points.
    pub const fn num_resp_pts(&self) -> usize {
        self.num_resp_pts
    }

    /// Output scale.
    pub const fn scale(&self) -> ResponseScale {
        self.scale
    }

    /// Sampling method.
    pub const fn method(&self) -> ResponseMethod {
        self.method
    }

    /// Compute the magnitude response of `coeffs`.
    ///
    /// # Errors
    /// `InvalidParameter` if the evaluator has no response points.
    pub fn compute_mag_resp(&self, coeffs: &Coefficients) -> DesignResult<MagnitudeResponse> {
        if self.num_resp_pts == 0 {
            return Err(DesignError::invalid_parameter(
                "number of response points must be positive",
            ));
        }
        let amplitude = match self.method {
            ResponseMethod::Trigonometric => amplitude_response(coeffs, self.num_resp_pts),
            ResponseMethod::Fft => fft_magnitude(coeffs, self.num_resp_pts),
        };
        let values = match self.scale {
            ResponseScale::Decibel => amplitude.mapv(|a| 20.0 * a.abs().log10()),
            ResponseScale::Linear => amplitude.mapv(f64::abs),
        };
        Ok(MagnitudeResponse::new(values, self.scale))
    }

    /// Synthesize `spec`, evaluate and normalize its response, and return the stopband peak.
    ///
    /// This is one full evaluation of the optimizer objective.
    ///
    /// # Errors
    /// * `DegenerateResponse` if the stopband covers no response point
    /// * any error of synthesis, evaluation or normalization
    pub fn stopband_objective(&self, spec: &FilterSpec) -> DesignResult<f64> {
        let ranges = stopband_ranges(spec, self.num_resp_pts);
        if ranges.iter().all(Range::is_empty) {
            return Err(DesignError::degenerate_response(format!(
                "{} stopband maps to no response points (edges {:?}, {} points)",
                spec.band_config(),
                spec.edges(),
                self.num_resp_pts
            )));
        }
        let coeffs = synthesize(spec)?;
        let mut response = self.compute_mag_resp(&coeffs)?;
        response.normalize()?;
        Ok(ranges
            .into_iter()
            .map(|range| response.interval_peak(range))
            .fold(PEAK_FLOOR, f64::max))
    }
}

/// Compute the magnitude response of `coeffs` at `num_resp_pts` points.
///
/// # Errors
/// `InvalidParameter` if `num_resp_pts` is zero.
pub fn compute_mag_resp(
    coeffs: &Coefficients,
    num_resp_pts: usize,
    scale: ResponseScale,
) -> DesignResult<MagnitudeResponse> {
    ResponseEvaluator::new(num_resp_pts, scale).compute_mag_resp(coeffs)
}

/// Response index ranges that make up the stopband of `spec`.
///
/// Band edges map to response indices as `2 * num_resp_pts * n / num_taps`,
/// clamped to the response length.
///
/// * Lowpass: `[N2, end)`
/// * Highpass and Bandpass: `[0, N1)`
/// * Bandstop: `[N2, N3)` and `[N4, end)`
pub fn stopband_ranges(spec: &FilterSpec, num_resp_pts: usize) -> Vec<Range<usize>> {
    let num_taps = spec.num_taps();
    let scaled = |n: usize| (2 * num_resp_pts * n / num_taps).min(num_resp_pts);
    let BandEdges { n1, n2, n3, n4 } = spec.edges();
    match spec.band_config() {
        BandConfiguration::Lowpass => vec![scaled(n2)..num_resp_pts],
        BandConfiguration::Highpass | BandConfiguration::Bandpass => vec![0..scaled(n1)],
        BandConfiguration::Bandstop => vec![scaled(n2)..scaled(n3), scaled(n4)..num_resp_pts],
    }
}

/// Worst-case magnitude over the stopband range(s) of `spec`.
///
/// Returns [`PEAK_FLOOR`] if every range is empty.
pub fn stopband_peak(response: &MagnitudeResponse, spec: &FilterSpec) -> f64 {
    stopband_ranges(spec, response.len())
        .into_iter()
        .map(|range| response.interval_peak(range))
        .fold(PEAK_FLOOR, f64::max)
}

/// Real amplitude function `A(lambda)` of a linear-phase filter.
fn amplitude_response(coeffs: &Coefficients, num_resp_pts: usize) -> Array1<f64> {
    let h = coeffs.taps();
    let num_taps = h.len();
    let half = num_taps / 2;
    let mid = (num_taps - 1) / 2;

    Array1::from_shape_fn(num_resp_pts, |l| {
        let lambda = l as f64 * PI / num_resp_pts as f64;
        match coeffs.symmetry() {
            SymmetryType::EvenSymOddLen => (1..=mid).fold(h[mid], |acc, n| {
                acc + 2.0 * h[mid - n] * (n as f64 * lambda).cos()
            }),
            SymmetryType::EvenSymEvenLen => (1..=half).fold(0.0, |acc, n| {
                acc + 2.0 * h[half - n] * ((n as f64 - 0.5) * lambda).cos()
            }),
            SymmetryType::OddSymOddLen => (1..=mid).fold(0.0, |acc, n| {
                acc + 2.0 * h[mid - n] * (n as f64 * lambda).sin()
            }),
            SymmetryType::OddSymEvenLen => (1..=half).fold(0.0, |acc, n| {
                acc + 2.0 * h[half - n] * ((n as f64 - 0.5) * lambda).sin()
            }),
        }
    })
}

/// `|H(e^{j lambda})|` from a zero-padded FFT of `2 * num_resp_pts` points.
///
/// Taps beyond the FFT length are folded modulo its length, which samples the
/// DTFT exactly on the same grid as [`amplitude_response`].
fn fft_magnitude(coeffs: &Coefficients, num_resp_pts: usize) -> Array1<f64> {
    let fft_len = 2 * num_resp_pts;
    let mut buffer = vec![Complex::new(0.0, 0.0); fft_len];
    for (n, &tap) in coeffs.taps().iter().enumerate() {
        buffer[n % fft_len].re += tap;
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_len);
    fft.process(&mut buffer);

    buffer[..num_resp_pts].iter().map(|bin| bin.norm()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowpass_21(transition: f64) -> FilterSpec {
        let mut spec = FilterSpec::new(
            21,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(6, 8),
        )
        .unwrap();
        spec.set_trans_scalar(transition).unwrap();
        spec
    }

    #[test]
    fn test_normalize_linear_peak_is_one() {
        let coeffs = synthesize(&lowpass_21(0.4)).unwrap();
        let mut response = compute_mag_resp(&coeffs, 256, ResponseScale::Linear).unwrap();
        response.normalize().unwrap();
        assert_approx_eq!(response.peak(), 1.0, 1e-9);
    }

    #[test]
    fn test_normalize_db_peak_is_zero() {
        let coeffs = synthesize(&lowpass_21(0.4)).unwrap();
        let mut response = compute_mag_resp(&coeffs, 256, ResponseScale::Decibel).unwrap();
        response.normalize().unwrap();
        assert_approx_eq!(response.peak(), 0.0, 1e-9);
    }

    #[test]
    fn test_normalize_rejects_silent_linear_response() {
        let mut response = MagnitudeResponse::new(Array1::zeros(8), ResponseScale::Linear);
        assert!(matches!(
            response.normalize(),
            Err(DesignError::DegenerateResponse(_))
        ));
    }

    #[test]
    fn test_passband_close_to_unity() {
        let coeffs = synthesize(&lowpass_21(0.4)).unwrap();
        let response = compute_mag_resp(&coeffs, 256, ResponseScale::Linear).unwrap();
        // the response interpolates the desired samples at lambda = 2 pi k / N
        assert_approx_eq!(response.values()[0], 1.0, 1e-9);
    }

    #[test]
    fn test_fft_matches_trigonometric() {
        for (symmetry, taps) in [
            (SymmetryType::EvenSymOddLen, 21),
            (SymmetryType::EvenSymEvenLen, 20),
            (SymmetryType::OddSymOddLen, 21),
            (SymmetryType::OddSymEvenLen, 20),
        ] {
            let mut spec = FilterSpec::new(
                taps,
                BandConfiguration::Highpass,
                symmetry,
                BandEdges::two_band(3, 5),
            )
            .unwrap();
            spec.set_trans_scalar(0.5).unwrap();
            let coeffs = synthesize(&spec).unwrap();
            // 8 points fold the taps modulo 16
            for num_resp_pts in [64, 8] {
                let trig = ResponseEvaluator::new(num_resp_pts, ResponseScale::Linear)
                    .compute_mag_resp(&coeffs)
                    .unwrap();
                let fft = ResponseEvaluator::new(num_resp_pts, ResponseScale::Linear)
                    .with_method(ResponseMethod::Fft)
                    .compute_mag_resp(&coeffs)
                    .unwrap();
                assert_eq!(fft.len(), num_resp_pts);
                for (a, b) in trig.values().iter().zip(fft.values()) {
                    assert_approx_eq!(*a, *b, 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_zero_response_points_rejected() {
        let coeffs = synthesize(&lowpass_21(0.4)).unwrap();
        assert!(compute_mag_resp(&coeffs, 0, ResponseScale::Decibel).is_err());
    }

    #[test]
    fn test_stopband_ranges_per_band() {
        let lowpass = lowpass_21(0.0);
        // 2 * 105 * 8 / 21 = 80
        assert_eq!(stopband_ranges(&lowpass, 105), vec![80..105]);

        let highpass = FilterSpec::new(
            21,
            BandConfiguration::Highpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(3, 5),
        )
        .unwrap();
        assert_eq!(stopband_ranges(&highpass, 105), vec![0..30]);

        let bandstop = FilterSpec::new(
            21,
            BandConfiguration::Bandstop,
            SymmetryType::EvenSymOddLen,
            BandEdges::four_band(2, 4, 6, 8),
        )
        .unwrap();
        assert_eq!(stopband_ranges(&bandstop, 105), vec![40..60, 80..105]);
    }

    #[test]
    fn test_stopband_peak_bandstop_takes_max_of_both_ranges() {
        let bandstop = FilterSpec::new(
            21,
            BandConfiguration::Bandstop,
            SymmetryType::EvenSymOddLen,
            BandEdges::four_band(2, 4, 6, 8),
        )
        .unwrap();
        let mut values = Array1::from_elem(105, -80.0);
        values[50] = -40.0;
        values[95] = -30.0;
        values[10] = 5.0; // outside both ranges
        let response = MagnitudeResponse::new(values, ResponseScale::Decibel);
        assert_approx_eq!(stopband_peak(&response, &bandstop), -30.0, 1e-12);
    }

    #[test]
    fn test_interval_peak_floor_and_clamping() {
        let response = MagnitudeResponse::new(Array1::from(vec![1.0, 3.0, 2.0]), ResponseScale::Linear);
        assert_eq!(response.interval_peak(0..0), PEAK_FLOOR);
        assert_eq!(response.interval_peak(1..10), 3.0);
        assert_eq!(response.interval_peak(5..10), PEAK_FLOOR);
    }

    #[test]
    fn test_stopband_objective_is_attenuation() {
        let evaluator = ResponseEvaluator::new(512, ResponseScale::Decibel);
        let peak = evaluator.stopband_objective(&lowpass_21(0.4)).unwrap();
        assert!(peak < -30.0, "stopband peak {peak} dB");
    }

    #[test]
    fn test_stopband_objective_rejects_empty_stopband() {
        // n1 = 0 leaves the high-pass stopband range [0, 0)
        let spec = FilterSpec::new(
            21,
            BandConfiguration::Highpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(0, 2),
        )
        .unwrap();
        assert!(stopband_ranges(&spec, 512).iter().all(Range::is_empty));
        let result = ResponseEvaluator::new(512, ResponseScale::Decibel).stopband_objective(&spec);
        assert!(matches!(result, Err(DesignError::DegenerateResponse(_))));
    }
}
