//! Coefficient synthesis by closed-form inverse DFT.
//!
//! Each symmetry type has its own real-valued inverse transform of the
//! desired half-spectrum. All four are written against the midpoint
//! `mid = (N - 1) / 2` so the resulting impulse response is centred and
//! linear phase.

use crate::response::ResponseEvaluator;
use crate::spec::FilterSpec;
use crate::types::{ResponseScale, SymmetryType};
use crate::{DesignError, DesignResult};
use ndarray::Array1;
use serde::Serialize;
use std::f64::consts::PI;

/// Number of response points used when scaling coefficients to unity gain.
const UNITY_GAIN_RESP_PTS: usize = 500;

/// FIR impulse-response coefficients and the symmetry they were built with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficients {
    taps: Array1<f64>,
    symmetry: SymmetryType,
}

impl Coefficients {
    /// Wrap existing taps.
    ///
    /// # Errors
    /// `ParityMismatch` if the tap count contradicts `symmetry`.
    pub fn new(taps: Array1<f64>, symmetry: SymmetryType) -> DesignResult<Self> {
        symmetry.check_num_taps(taps.len())?;
        Ok(Self { taps, symmetry })
    }

    /// Number of taps.
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Symmetry type of the taps.
    pub const fn symmetry(&self) -> SymmetryType {
        self.symmetry
    }

    /// The taps.
    pub const fn taps(&self) -> &Array1<f64> {
        &self.taps
    }

    /// Consume and return the taps.
    pub fn into_taps(self) -> Array1<f64> {
        self.taps
    }

    /// Multiply every tap by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.taps.mapv_inplace(|tap| tap * factor);
    }

    /// Scale the taps so the linear magnitude response peaks at 1.0.
    ///
    /// # Errors
    /// `DegenerateResponse` if the response is identically zero.
    pub fn normalized_to_unity_gain(&self) -> DesignResult<Self> {
        let evaluator = ResponseEvaluator::new(UNITY_GAIN_RESP_PTS, ResponseScale::Linear);
        let response = evaluator.compute_mag_resp(self)?;
        let peak = response.peak();
        if peak.is_nan() || peak <= 0.0 {
            return Err(DesignError::degenerate_response(
                "cannot scale coefficients with an all-zero response to unity gain",
            ));
        }
        let mut scaled = self.clone();
        scaled.scale(1.0 / peak);
        Ok(scaled)
    }
}

/// Synthesize FIR coefficients from a frequency-sampling specification.
///
/// With `H` the desired magnitude samples, `N` the tap count and
/// `mid = (N-1)/2`:
///
/// * Type 1: `h[n] = (H[0] + 2 sum_{k=1}^{(N-1)/2} H[k] cos(xk)) / N`, `x = 2pi(n-mid)/N`
/// * Type 2: as type 1 with upper limit `N/2 - 1`
/// * Type 3: `h[n] = (2 sum_{k=1}^{(N-1)/2} H[k] sin(xk)) / N`, `x = 2pi(mid-n)/N`
/// * Type 4: `h[n] = (H[N/2] sin(pi(mid-n)) + 2 sum_{k=1}^{N/2-1} H[k] sin(xk)) / N`, `x = 2pi(mid-n)/N`
///
/// # Errors
/// `ParityMismatch` if the tap count contradicts the symmetry type.
pub fn synthesize(spec: &FilterSpec) -> DesignResult<Coefficients> {
    let num_taps = spec.num_taps();
    let symmetry = spec.symmetry();
    symmetry.check_num_taps(num_taps)?;

    let h = spec.desired_magnitude();
    let taps_f = num_taps as f64;
    let mid = (taps_f - 1.0) / 2.0;

    let taps = Array1::from_shape_fn(num_taps, |n| {
        let offset = n as f64 - mid;
        let sum = match symmetry {
            SymmetryType::EvenSymOddLen => cosine_sum(h, 2.0 * PI * offset / taps_f, (num_taps - 1) / 2),
            SymmetryType::EvenSymEvenLen => cosine_sum(h, 2.0 * PI * offset / taps_f, num_taps / 2 - 1),
            SymmetryType::OddSymOddLen => sine_sum(h, -2.0 * PI * offset / taps_f, (num_taps - 1) / 2),
            SymmetryType::OddSymEvenLen => {
                let nyquist = (-PI * offset).sin() * h[num_taps / 2];
                nyquist + sine_sum(h, -2.0 * PI * offset / taps_f, num_taps / 2 - 1)
            }
        };
        sum / taps_f
    });

    Ok(Coefficients { taps, symmetry })
}

fn cosine_sum(h: &[f64], x: f64, upper: usize) -> f64 {
    (1..=upper).fold(h[0], |acc, k| acc + 2.0 * (x * k as f64).cos() * h[k])
}

fn sine_sum(h: &[f64], x: f64, upper: usize) -> f64 {
    (1..=upper).fold(0.0, |acc, k| acc + 2.0 * (x * k as f64).sin() * h[k])
}
