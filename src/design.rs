//! End-to-end filter design.
//!
//! [`design`] fills in the transition samples of a [`FilterSpec`], either
//! from explicit values or by running the optimizer that matches the number
//! of free samples, then synthesizes the final coefficients and evaluates
//! their response.
//!
//! ```rust
//! use fsamp_fir::{
//!     BandConfiguration, BandEdges, DesignConfig, FilterSpec, SearchContext, SymmetryType,
//!     TransitionPlacement, design,
//! };
//!
//! let spec = FilterSpec::new(
//!     21,
//!     BandConfiguration::Lowpass,
//!     SymmetryType::EvenSymOddLen,
//!     BandEdges::two_band(6, 8),
//! ).unwrap();
//! let outcome = design(
//!     spec,
//!     &DesignConfig::default(),
//!     TransitionPlacement::Optimal,
//!     &SearchContext::default(),
//! ).unwrap();
//! assert_eq!(outcome.coefficients.num_taps(), 21);
//! assert!(outcome.stopband_peak < -40.0);
//! ```

use crate::config::DesignConfig;
use crate::optimize::{DirectionSearch, GoldenSectionSearch, SearchContext, StopbandObjective};
use crate::response::{MagnitudeResponse, ResponseEvaluator};
use crate::spec::FilterSpec;
use crate::synthesis::{Coefficients, synthesize};
use crate::types::ResponseScale;
use crate::{DesignError, DesignResult};
use serde::Serialize;

/// How the transition samples of a design are chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TransitionPlacement {
    /// Use these values, one per transition slot.
    Manual(Vec<f64>),
    /// Minimize the stopband peak (up to two transition samples).
    Optimal,
}

/// Result of a design run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignOutcome {
    /// The specification with its final transition samples
    pub spec: FilterSpec,
    /// Synthesized coefficients
    pub coefficients: Coefficients,
    /// Response in the configured scale and normalization
    pub response: MagnitudeResponse,
    /// Stopband peak of the normalized dB response
    pub stopband_peak: f64,
    /// Final transition sample values, in slot order
    pub transition_values: Vec<f64>,
    /// Whether the optimizer converged (always true without optimization)
    pub converged: bool,
    /// Objective evaluations spent by the optimizer
    pub evaluations: usize,
}

/// Design a filter from `spec`.
///
/// With [`TransitionPlacement::Optimal`] the number of transition samples
/// selects the method: none are synthesized directly, one is found by
/// golden-section search and two by direction search.
///
/// # Errors
/// * `Unsupported` for optimal placement of more than two transition samples
/// * `InvalidParameter` for an invalid configuration or manual values that do
///   not match the transition slots
/// * any error of the optimizer, synthesis or response evaluation
pub fn design(
    mut spec: FilterSpec,
    config: &DesignConfig,
    placement: TransitionPlacement,
    ctx: &SearchContext,
) -> DesignResult<DesignOutcome> {
    config.validate()?;
    let num_trans_samps = spec.num_trans_samps();

    let (converged, evaluations) = match placement {
        TransitionPlacement::Manual(values) => {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(DesignError::invalid_parameter(format!(
                    "transition values must be finite, got {bad}"
                )));
            }
            spec.set_transition_values(&values)?;
            (true, 0)
        }
        TransitionPlacement::Optimal => optimize_in_place(&mut spec, config, ctx)?,
    };

    let coefficients = synthesize(&spec)?;
    let mut response = ResponseEvaluator::new(config.num_resp_pts, config.scale)
        .with_method(config.method)
        .compute_mag_resp(&coefficients)?;
    if config.normalize {
        response.normalize()?;
    }
    let stopband_peak = ResponseEvaluator::new(config.num_resp_pts, ResponseScale::Decibel)
        .with_method(config.method)
        .stopband_objective(&spec)?;
    let transition_values = spec.transition_values();

    tracing::info!(
        band = %spec.band_config(),
        num_taps = spec.num_taps(),
        num_trans_samps,
        ?transition_values,
        stopband_peak,
        converged,
        evaluations,
        "filter design finished"
    );

    Ok(DesignOutcome {
        spec,
        coefficients,
        response,
        stopband_peak,
        transition_values,
        converged,
        evaluations,
    })
}

fn optimize_in_place(
    spec: &mut FilterSpec,
    config: &DesignConfig,
    ctx: &SearchContext,
) -> DesignResult<(bool, usize)> {
    let num_trans_samps = spec.num_trans_samps();
    let mut objective =
        StopbandObjective::new(spec, config.num_resp_pts, ctx).with_method(config.method);
    match num_trans_samps {
        0 => Ok((true, 0)),
        1 => {
            let minimum = GoldenSectionSearch::new(config.line).minimize_scalar(&mut objective)?;
            Ok((minimum.converged, objective.evaluations()))
        }
        2 => {
            let result = DirectionSearch::new(config.line, config.direction).run(&mut objective)?;
            Ok((result.converged, result.evaluations))
        }
        n => Err(DesignError::unsupported(format!(
            "optimal placement handles at most 2 transition samples, spec has {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::StopSignal;
    use crate::types::{BandConfiguration, BandEdges, ResponseMethod, SymmetryType};

    fn spec(band: BandConfiguration, edges: BandEdges) -> FilterSpec {
        FilterSpec::new(31, band, SymmetryType::EvenSymOddLen, edges).unwrap()
    }

    #[test]
    fn test_no_transition_samples_synthesizes_directly() {
        let outcome = design(
            spec(BandConfiguration::Lowpass, BandEdges::two_band(7, 8)),
            &DesignConfig::default(),
            TransitionPlacement::Optimal,
            &SearchContext::default(),
        )
        .unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.evaluations, 0);
        assert!(outcome.transition_values.is_empty());
        assert_approx_eq!(outcome.response.peak(), 0.0, 1e-9);
    }

    #[test]
    fn test_single_sample_bandpass_is_optimized() {
        let outcome = design(
            spec(BandConfiguration::Bandpass, BandEdges::four_band(4, 6, 9, 11)),
            &DesignConfig::default(),
            TransitionPlacement::Optimal,
            &SearchContext::default(),
        )
        .unwrap();
        assert!(outcome.evaluations > 0);
        let t = outcome.transition_values[0];
        assert!(t > 0.0 && t < 1.0);
        // both transition bands share the value
        assert_eq!(outcome.spec.mag_resp_samp(5), Some(t));
        assert_eq!(outcome.spec.mag_resp_samp(10), Some(t));

        let bare = design(
            spec(BandConfiguration::Bandpass, BandEdges::four_band(4, 6, 9, 11)),
            &DesignConfig::default(),
            TransitionPlacement::Manual(vec![0.0]),
            &SearchContext::default(),
        )
        .unwrap();
        assert!(outcome.stopband_peak < bare.stopband_peak);
    }

    #[test]
    fn test_manual_placement_and_linear_output() {
        let config = DesignConfig::default()
            .with_num_resp_pts(256)
            .with_output(ResponseScale::Linear, false)
            .with_method(ResponseMethod::Fft);
        let outcome = design(
            spec(BandConfiguration::Highpass, BandEdges::two_band(5, 8)),
            &config,
            TransitionPlacement::Manual(vec![0.3, 0.7]),
            &SearchContext::default(),
        )
        .unwrap();
        assert_eq!(outcome.transition_values, vec![0.3, 0.7]);
        assert_eq!(outcome.spec.mag_resp_samp(6), Some(0.3));
        assert_eq!(outcome.spec.mag_resp_samp(7), Some(0.7));
        assert_eq!(outcome.response.scale(), ResponseScale::Linear);
        assert_eq!(outcome.response.len(), 256);
        assert!(outcome.response.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_manual_placement_errors() {
        let wrong_count = design(
            spec(BandConfiguration::Lowpass, BandEdges::two_band(5, 8)),
            &DesignConfig::default(),
            TransitionPlacement::Manual(vec![0.5]),
            &SearchContext::default(),
        );
        assert!(matches!(wrong_count, Err(DesignError::InvalidParameter(_))));

        let not_finite = design(
            spec(BandConfiguration::Lowpass, BandEdges::two_band(6, 8)),
            &DesignConfig::default(),
            TransitionPlacement::Manual(vec![f64::NAN]),
            &SearchContext::default(),
        );
        assert!(matches!(not_finite, Err(DesignError::InvalidParameter(_))));
    }

    #[test]
    fn test_three_samples_unsupported() {
        let result = design(
            spec(BandConfiguration::Lowpass, BandEdges::two_band(4, 8)),
            &DesignConfig::default(),
            TransitionPlacement::Optimal,
            &SearchContext::default(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, DesignError::Unsupported(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_cancelled_design() {
        let stop = StopSignal::new();
        stop.cancel();
        let result = design(
            spec(BandConfiguration::Lowpass, BandEdges::two_band(6, 8)),
            &DesignConfig::default(),
            TransitionPlacement::Optimal,
            &SearchContext::default().with_stop_signal(stop),
        );
        assert!(matches!(result, Err(DesignError::Cancelled)));
    }

    #[test]
    fn test_empty_stopband_is_rejected() {
        let result = design(
            FilterSpec::new(
                21,
                BandConfiguration::Highpass,
                SymmetryType::EvenSymOddLen,
                BandEdges::two_band(0, 2),
            )
            .unwrap(),
            &DesignConfig::default(),
            TransitionPlacement::Optimal,
            &SearchContext::default(),
        );
        assert!(matches!(result, Err(DesignError::DegenerateResponse(_))));
    }
}
