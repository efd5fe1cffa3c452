//! Golden-section line search.

use super::StopbandObjective;
use crate::config::LineSearchConfig;
use crate::spec::TransitionLine;
use crate::{DesignError, DesignResult};
use serde::Serialize;

/// `(3 - sqrt(5)) / 2`, the smaller golden-section fraction.
pub const GOLD3: f64 = 0.381966011;
/// `(sqrt(5) - 1) / 2`, the larger golden-section fraction.
pub const GOLD6: f64 = 0.618033989;

/// Result of a line search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineMinimum {
    /// Location of the best point found
    pub x: f64,
    /// Objective value at `x`
    pub f: f64,
    /// Whether the bracket shrank below the tolerance before the iteration cap
    pub converged: bool,
    /// Narrowing iterations performed
    pub iterations: usize,
    /// Objective evaluations performed, including bracketing
    pub evaluations: usize,
}

/// Golden-section search for the minimum of a unimodal function on an interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSectionSearch {
    config: LineSearchConfig,
}

impl GoldenSectionSearch {
    /// Create a search with the given parameters.
    pub const fn new(config: LineSearchConfig) -> Self {
        Self { config }
    }

    /// The search parameters.
    pub const fn config(&self) -> &LineSearchConfig {
        &self.config
    }

    /// Minimize `objective` over `[domain_min, domain_max]`.
    ///
    /// The endpoint values decide the bracketing direction: trial points
    /// approach the lower endpoint geometrically from the other side until one
    /// beats it. The bracket `x0 < x1 < x2 < x3` is then narrowed until
    /// `|x3 - x0| <= tol`.
    ///
    /// # Errors
    /// * `InvalidParameter` for an invalid configuration or an empty or non-finite domain
    /// * any error returned by `objective`
    pub fn minimize<F>(&self, mut objective: F, domain_min: f64, domain_max: f64) -> DesignResult<LineMinimum>
    where
        F: FnMut(f64) -> DesignResult<f64>,
    {
        self.config.validate()?;
        if !domain_min.is_finite() || !domain_max.is_finite() || domain_min >= domain_max {
            return Err(DesignError::invalid_parameter(format!(
                "line search domain [{domain_min}, {domain_max}] is empty"
            )));
        }

        let span = domain_max - domain_min;
        let left = objective(domain_min)?;
        let right = objective(domain_max)?;
        let mut evaluations = 2;

        let from_left = left < right;
        let target = if from_left { left } else { right };
        let mut step = span;
        let mut xb = domain_min;
        let mut fb = left;
        let mut bracketed = false;
        for _ in 0..self.config.max_bracket_steps {
            step *= GOLD3;
            xb = if from_left {
                domain_min + step
            } else {
                domain_max - step
            };
            fb = objective(xb)?;
            evaluations += 1;
            if fb < target {
                bracketed = true;
                break;
            }
        }
        if !bracketed {
            tracing::warn!(
                domain_min,
                domain_max,
                steps = self.config.max_bracket_steps,
                "bracketing exhausted, continuing from the last trial point"
            );
        }

        let [mut x0, mut x1, mut x2, mut x3] = initial_frame(xb, domain_min, domain_max);
        let mut f1 = fb;
        let mut f2 = objective(x2)?;
        evaluations += 1;

        let tol = self.config.tol;
        let mut iterations = 0;
        let mut converged = (x3 - x0).abs() <= tol;
        while !converged && iterations < self.config.max_iterations {
            if f1 <= f2 {
                x3 = x2;
                x2 = x1;
                f2 = f1;
                x1 = GOLD6 * x2 + GOLD3 * x0;
                f1 = objective(x1)?;
            } else {
                x0 = x1;
                x1 = x2;
                f1 = f2;
                x2 = GOLD6 * x1 + GOLD3 * x3;
                f2 = objective(x2)?;
            }
            evaluations += 1;
            iterations += 1;
            converged = (x3 - x0).abs() <= tol;
        }

        if !converged {
            tracing::warn!(
                width = (x3 - x0).abs(),
                tol,
                iterations,
                "line search hit its iteration cap"
            );
        }

        let (x, f) = if f1 < f2 { (x1, f1) } else { (x2, f2) };
        Ok(LineMinimum {
            x,
            f,
            converged,
            iterations,
            evaluations,
        })
    }

    /// Minimize the stopband peak over the single transition value in `[0, 1]`.
    ///
    /// The working spec is left holding the best value found.
    ///
    /// # Errors
    /// `InvalidParameter` unless the spec has exactly one transition sample.
    pub fn minimize_scalar(&self, objective: &mut StopbandObjective<'_>) -> DesignResult<LineMinimum> {
        let num_trans_samps = objective.spec().num_trans_samps();
        if num_trans_samps != 1 {
            return Err(DesignError::invalid_parameter(format!(
                "scalar search needs exactly one transition sample, spec has {num_trans_samps}"
            )));
        }
        let minimum = self.minimize(|t| objective.eval_scalar(t), 0.0, 1.0)?;
        objective.apply(&[minimum.x])?;
        objective.context().observer().on_line_search(&minimum);
        Ok(minimum)
    }

    /// Minimize the stopband peak along `line` for `rho` in `[rho_min, rho_max]`.
    ///
    /// The working spec is left at the last trial point.
    pub fn minimize_along(
        &self,
        objective: &mut StopbandObjective<'_>,
        line: &TransitionLine,
        rho_min: f64,
        rho_max: f64,
    ) -> DesignResult<LineMinimum> {
        let minimum = self.minimize(|rho| objective.eval_line(line, rho), rho_min, rho_max)?;
        objective.context().observer().on_line_search(&minimum);
        Ok(minimum)
    }
}

impl Default for GoldenSectionSearch {
    fn default() -> Self {
        Self::new(LineSearchConfig::default())
    }
}

/// Minimize `objective` over `[domain_min, domain_max]` with default caps and tolerance `tol`.
///
/// # Errors
/// See [`GoldenSectionSearch::minimize`].
pub fn minimize_line<F>(objective: F, domain_min: f64, domain_max: f64, tol: f64) -> DesignResult<LineMinimum>
where
    F: FnMut(f64) -> DesignResult<f64>,
{
    GoldenSectionSearch::new(LineSearchConfig::new().with_tol(tol)).minimize(objective, domain_min, domain_max)
}

/// Initial four-point frame `[x0, x1, x2, x3]` around the bracketing point `xb`.
pub(crate) const fn initial_frame(xb: f64, domain_min: f64, domain_max: f64) -> [f64; 4] {
    [domain_min, xb, xb + GOLD3 * (domain_max - xb), domain_max]
}
