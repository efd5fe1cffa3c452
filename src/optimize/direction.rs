//! Two-parameter direction search.
//!
//! With two free transition samples the objective is a function of the
//! plane `(x, y)`, `x` being the sample next to the stopband. Each outer
//! iteration runs two axis-parallel line searches over `x` with `y` held at
//! `y_base` and at `y_base * tweak_factor`, fits the line through the two
//! minima, and runs a third line search along it. The third minimum becomes
//! the next `y_base` until the objective stops moving. The iterates may
//! cycle, so the lowest third minimum seen is the one returned.

use super::line_search::GoldenSectionSearch;
use super::{SearchContext, StopbandObjective};
use crate::config::{DesignConfig, DirectionSearchConfig, LineSearchConfig};
use crate::spec::{FilterSpec, TransitionLine};
use crate::{DesignError, DesignResult};
use serde::Serialize;

/// Initial "previous minimum" of the outer loop; no real objective is close to it.
const OLD_MIN_START: f64 = 9999.0;

/// Result of a two-parameter search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwoParamResult {
    /// Transition sample next to the stopband
    pub x: f64,
    /// Transition sample next to the passband
    pub y: f64,
    /// Stopband peak at `(x, y)` in dB
    pub objective: f64,
    /// Whether successive minima settled within the ripple tolerance
    pub converged: bool,
    /// Outer iterations performed
    pub outer_iterations: usize,
    /// Objective evaluations performed
    pub evaluations: usize,
}

/// Direction search over two transition samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionSearch {
    line: LineSearchConfig,
    config: DirectionSearchConfig,
}

impl DirectionSearch {
    /// Create a search from line and direction parameters.
    pub const fn new(line: LineSearchConfig, config: DirectionSearchConfig) -> Self {
        Self { line, config }
    }

    /// The direction parameters.
    pub const fn config(&self) -> &DirectionSearchConfig {
        &self.config
    }

    /// Run the search. The working spec is left at the returned point, the
    /// lowest fitted-line minimum over all outer iterations.
    ///
    /// # Errors
    /// * `InvalidParameter` for invalid parameters or a spec without exactly
    ///   two transition samples
    /// * `DegenerateLine` if the two axis-parallel minima coincide or the fitted line
    ///   leaves no room inside the unit square
    /// * any error of the objective (`Cancelled`, `DeadlineExceeded`, ...)
    pub fn run(&self, objective: &mut StopbandObjective<'_>) -> DesignResult<TwoParamResult> {
        self.config.validate()?;
        self.line.validate()?;
        let num_trans_samps = objective.spec().num_trans_samps();
        if num_trans_samps != 2 {
            return Err(DesignError::invalid_parameter(format!(
                "direction search needs exactly two transition samples, spec has {num_trans_samps}"
            )));
        }

        let golden = GoldenSectionSearch::new(self.line);
        let tweak = self.config.tweak_factor;
        let ripple_tol = self.config.effective_ripple_tol(self.line.tol);
        let min_separation = self.config.min_line_separation;
        let start_evaluations = objective.evaluations();

        let mut y_base = self.config.y_base_init;
        let mut previous = OLD_MIN_START;
        let mut best: Option<TwoParamResult> = None;
        let mut converged = false;
        let mut outer_iterations = 0;

        for outer in 1..=self.config.max_outer_iterations {
            outer_iterations = outer;
            let axis = TransitionLine::new(vec![0.0, y_base], vec![1.0, 0.0])?;
            let x1 = golden.minimize_along(objective, &axis, 0.0, 1.0)?.x;

            let tweaked = TransitionLine::new(vec![0.0, y_base * tweak], vec![1.0, 0.0])?;
            let x2 = golden.minimize_along(objective, &tweaked, 0.0, 1.0)?.x;

            if (x1 - x2).abs() < min_separation {
                return Err(DesignError::DegenerateLine { x1, x2 });
            }
            let slope = y_base * (1.0 - tweak) / (x1 - x2);
            let origin = y_base - slope * x1;
            let line = TransitionLine::new(vec![0.0, origin], vec![1.0, slope])?;

            let (rho_min, rho_max) = match line.unit_interval_domain() {
                Some((lo, hi)) if hi - lo > min_separation => (lo, hi),
                _ => return Err(DesignError::DegenerateLine { x1, x2 }),
            };
            if rho_min > 0.0 || rho_max < 1.0 {
                tracing::debug!(rho_min, rho_max, slope, origin, "search line clipped to the unit square");
            }

            let third = golden.minimize_along(objective, &line, rho_min, rho_max)?;
            let x3 = third.x;
            let y3 = line.value(1, x3);
            let m3 = third.f;
            tracing::debug!(outer, x1, x2, slope, x3, y3, m3, "direction search iteration");

            // the outer iterates can cycle; keep the lowest one seen
            if best.as_ref().is_none_or(|b| m3 < b.objective) {
                best = Some(TwoParamResult {
                    x: x3,
                    y: y3,
                    objective: m3,
                    converged: false,
                    outer_iterations: outer,
                    evaluations: 0,
                });
            }
            if (previous - m3).abs() < ripple_tol {
                converged = true;
                break;
            }
            previous = m3;
            y_base = y3;
        }

        let mut result = best.ok_or_else(|| {
            DesignError::invalid_parameter("direction search ran no outer iterations")
        })?;
        result.converged = converged;
        result.outer_iterations = outer_iterations;
        result.evaluations = objective.evaluations() - start_evaluations;
        if !converged {
            tracing::warn!(
                outer_iterations,
                ripple_tol,
                best_objective = result.objective,
                "direction search stopped at its iteration cap"
            );
        }
        objective.apply(&[result.x, result.y])?;
        Ok(result)
    }
}

impl Default for DirectionSearch {
    fn default() -> Self {
        Self::new(LineSearchConfig::default(), DirectionSearchConfig::default())
    }
}

/// Optimize the two transition samples of `spec` in place.
///
/// Uses the default response grid and caps, with the outer-loop threshold
/// equal to `tol`.
///
/// # Errors
/// See [`DirectionSearch::run`].
pub fn optimize_two_param(
    spec: &mut FilterSpec,
    y_base_init: f64,
    tol: f64,
    tweak_factor: f64,
) -> DesignResult<TwoParamResult> {
    let defaults = DesignConfig::default();
    let search = DirectionSearch::new(
        defaults.line.with_tol(tol),
        defaults
            .direction
            .with_y_base_init(y_base_init)
            .with_tweak_factor(tweak_factor),
    );
    let ctx = SearchContext::default();
    let mut objective = StopbandObjective::new(spec, defaults.num_resp_pts, &ctx);
    search.run(&mut objective)
}
