//! Transition-sample optimization.
//!
//! The optimizer minimizes the stopband peak of the normalized dB response
//! over the free transition samples of a [`FilterSpec`]:
//!
//! - one free sample: golden-section search over `[0, 1]`
//!   ([`GoldenSectionSearch::minimize_scalar`])
//! - two free samples: repeated golden-section searches along fitted lines
//!   ([`DirectionSearch`])
//!
//! Every objective evaluation goes through a [`StopbandObjective`], which
//! checks the run's [`StopSignal`] first and reports the trial to the
//! injected [`SearchObserver`].
//!
//! # Example
//!
//! ```rust
//! use fsamp_fir::optimize::{GoldenSectionSearch, SearchContext, StopbandObjective};
//! use fsamp_fir::{BandConfiguration, BandEdges, FilterSpec, LineSearchConfig, SymmetryType};
//!
//! let mut spec = FilterSpec::new(
//!     21,
//!     BandConfiguration::Lowpass,
//!     SymmetryType::EvenSymOddLen,
//!     BandEdges::two_band(6, 8),
//! ).unwrap();
//! let ctx = SearchContext::default();
//! let mut objective = StopbandObjective::new(&mut spec, 512, &ctx);
//! let search = GoldenSectionSearch::new(LineSearchConfig::new().with_tol(0.001));
//! let minimum = search.minimize_scalar(&mut objective).unwrap();
//! assert!(minimum.x > 0.0 && minimum.x < 1.0);
//! ```

mod direction;
mod line_search;

#[cfg(test)]
mod tests;

pub use direction::{DirectionSearch, TwoParamResult, optimize_two_param};
pub use line_search::{GOLD3, GOLD6, GoldenSectionSearch, LineMinimum, minimize_line};

use crate::response::ResponseEvaluator;
use crate::spec::{FilterSpec, TransitionLine};
use crate::types::{ResponseMethod, ResponseScale};
use crate::{DesignError, DesignResult};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cooperative cancellation flag with an optional deadline.
///
/// Clones share the same flag, so one clone can cancel a search running
/// with another.
#[derive(Debug, Clone)]
pub struct StopSignal {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Duration>,
    started: Instant,
}

impl StopSignal {
    /// Create a signal with no deadline.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            started: Instant::now(),
        }
    }

    /// Create a signal that trips once `deadline` has elapsed from now.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::new()
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Time since the signal was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail if the signal was cancelled or its deadline has passed.
    ///
    /// # Errors
    /// `Cancelled` or `DeadlineExceeded`.
    pub fn check(&self) -> DesignResult<()> {
        if self.is_cancelled() {
            return Err(DesignError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let elapsed = self.elapsed();
            if elapsed >= deadline {
                return Err(DesignError::DeadlineExceeded { elapsed });
            }
        }
        Ok(())
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One evaluation of the stopband objective.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    /// Search coordinate: the transition value for scalar searches, `rho` along a line
    pub x: f64,
    /// Transition slot values the objective was evaluated at
    pub transition_values: Vec<f64>,
    /// Normalized stopband peak in dB
    pub objective: f64,
}

/// Receives the trace of an optimization run.
pub trait SearchObserver: Send + Sync {
    /// Called after every objective evaluation.
    fn on_trial(&self, trial: &Trial);

    /// Called when a line search finishes.
    fn on_line_search(&self, _minimum: &LineMinimum) {}
}

/// Observer that forwards the trace to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_trial(&self, trial: &Trial) {
        tracing::trace!(
            x = trial.x,
            objective = trial.objective,
            transition = ?trial.transition_values,
            "objective evaluated"
        );
    }

    fn on_line_search(&self, minimum: &LineMinimum) {
        tracing::debug!(
            x = minimum.x,
            f = minimum.f,
            converged = minimum.converged,
            iterations = minimum.iterations,
            evaluations = minimum.evaluations,
            "line search finished"
        );
    }
}

/// Observer that keeps the full trace in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    trials: Mutex<Vec<Trial>>,
    line_searches: Mutex<Vec<LineMinimum>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded trials, in evaluation order.
    pub fn trials(&self) -> Vec<Trial> {
        self.trials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded line search results, in completion order.
    pub fn line_searches(&self) -> Vec<LineMinimum> {
        self.line_searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SearchObserver for RecordingObserver {
    fn on_trial(&self, trial: &Trial) {
        self.trials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(trial.clone());
    }

    fn on_line_search(&self, minimum: &LineMinimum) {
        self.line_searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*minimum);
    }
}

/// Observer and stop signal shared by every search of one run.
#[derive(Clone)]
pub struct SearchContext {
    observer: Arc<dyn SearchObserver>,
    stop: StopSignal,
}

impl SearchContext {
    /// Context with the given observer and a fresh stop signal.
    pub fn new(observer: Arc<dyn SearchObserver>) -> Self {
        Self {
            observer,
            stop: StopSignal::new(),
        }
    }

    /// Replace the stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// The observer.
    pub fn observer(&self) -> &dyn SearchObserver {
        self.observer.as_ref()
    }

    /// The stop signal.
    pub const fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl std::fmt::Debug for SearchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchContext")
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}

/// Stopband-peak objective over the transition samples of a working spec.
///
/// Each evaluation writes the trial point into the spec, synthesizes the
/// coefficients and returns the stopband peak of the normalized dB response.
/// Only the transition slots of the spec are ever modified.
pub struct StopbandObjective<'a> {
    spec: &'a mut FilterSpec,
    evaluator: ResponseEvaluator,
    ctx: &'a SearchContext,
    evaluations: usize,
}

impl<'a> StopbandObjective<'a> {
    /// Objective over `spec` sampled at `num_resp_pts` points.
    pub fn new(spec: &'a mut FilterSpec, num_resp_pts: usize, ctx: &'a SearchContext) -> Self {
        Self {
            spec,
            evaluator: ResponseEvaluator::new(num_resp_pts, ResponseScale::Decibel),
            ctx,
            evaluations: 0,
        }
    }

    /// Select how responses are sampled.
    pub fn with_method(mut self, method: ResponseMethod) -> Self {
        self.evaluator = self.evaluator.with_method(method);
        self
    }

    /// The working spec.
    pub fn spec(&self) -> &FilterSpec {
        &*self.spec
    }

    /// Number of objective evaluations so far.
    pub const fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// The run's context.
    pub const fn context(&self) -> &'a SearchContext {
        self.ctx
    }

    /// Evaluate with the single transition value `value`.
    pub fn eval_scalar(&mut self, value: f64) -> DesignResult<f64> {
        self.ctx.stop_signal().check()?;
        self.spec.set_trans_scalar(value)?;
        self.evaluate(value)
    }

    /// Evaluate at the point `rho` of `line`.
    pub fn eval_line(&mut self, line: &TransitionLine, rho: f64) -> DesignResult<f64> {
        self.ctx.stop_signal().check()?;
        self.spec.set_trans_line(line, rho)?;
        self.evaluate(rho)
    }

    /// Leave the working spec at explicit transition values without evaluating.
    pub fn apply(&mut self, values: &[f64]) -> DesignResult<()> {
        self.spec.set_transition_values(values)
    }

    fn evaluate(&mut self, x: f64) -> DesignResult<f64> {
        let objective = self.evaluator.stopband_objective(&*self.spec)?;
        if !objective.is_finite() {
            return Err(DesignError::degenerate_response(format!(
                "stopband peak is {objective} at x = {x}"
            )));
        }
        self.evaluations += 1;
        self.ctx.observer().on_trial(&Trial {
            x,
            transition_values: self.spec.transition_values(),
            objective,
        });
        Ok(objective)
    }
}
