//! Optimizer and design configuration.
//!
//! All configuration structs derive serde traits so a complete
//! [`DesignConfig`] can be loaded from JSON:
//!
//! ```rust
//! use fsamp_fir::DesignConfig;
//!
//! let config = DesignConfig::from_json_str(
//!     r#"{ "line": { "tol": 0.001 }, "num_resp_pts": 1024 }"#,
//! ).unwrap();
//! assert_eq!(config.num_resp_pts, 1024);
//! assert_eq!(config.line.max_iterations, 100);
//! ```

use crate::types::{ResponseMethod, ResponseScale};
use crate::{DesignError, DesignResult};
use serde::{Deserialize, Serialize};

/// Golden-section line search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSearchConfig {
    /// Final bracket width at which the search stops
    pub tol: f64,
    /// Cap on narrowing iterations
    pub max_iterations: usize,
    /// Cap on bracketing trials before the last trial is accepted
    pub max_bracket_steps: usize,
}

impl LineSearchConfig {
    /// Default parameters with a tolerance of 0.001.
    pub const fn new() -> Self {
        Self {
            tol: 0.001,
            max_iterations: 100,
            max_bracket_steps: 100,
        }
    }

    /// Set the stopping tolerance.
    pub const fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the narrowing iteration cap.
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the bracketing trial cap.
    pub const fn with_max_bracket_steps(mut self, max_bracket_steps: usize) -> Self {
        self.max_bracket_steps = max_bracket_steps;
        self
    }

    /// Validate line search parameters.
    pub fn validate(&self) -> DesignResult<()> {
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(DesignError::invalid_parameter(format!(
                "line search tolerance must be positive, got {}",
                self.tol
            )));
        }
        if self.max_iterations == 0 {
            return Err(DesignError::invalid_parameter(
                "line search needs at least one iteration",
            ));
        }
        if self.max_bracket_steps == 0 {
            return Err(DesignError::invalid_parameter(
                "bracketing needs at least one trial",
            ));
        }
        Ok(())
    }
}

impl Default for LineSearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-parameter direction search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionSearchConfig {
    /// Factor applied to `y_base` to obtain the second axis-parallel line, in `(0, 1)`
    pub tweak_factor: f64,
    /// Starting value of the second transition sample
    pub y_base_init: f64,
    /// Outer-loop stopping threshold on the change in the objective.
    /// `None` uses the line search tolerance.
    pub ripple_tol: Option<f64>,
    /// Cap on outer iterations
    pub max_outer_iterations: usize,
    /// Smallest `|x1 - x2|` accepted when fitting the search line
    pub min_line_separation: f64,
}

impl DirectionSearchConfig {
    /// Default parameters.
    pub const fn new() -> Self {
        Self {
            tweak_factor: 0.9,
            y_base_init: 1.0,
            ripple_tol: None,
            max_outer_iterations: 50,
            min_line_separation: 1e-9,
        }
    }

    /// Set the tweak factor.
    pub const fn with_tweak_factor(mut self, tweak_factor: f64) -> Self {
        self.tweak_factor = tweak_factor;
        self
    }

    /// Set the starting value of the second transition sample.
    pub const fn with_y_base_init(mut self, y_base_init: f64) -> Self {
        self.y_base_init = y_base_init;
        self
    }

    /// Set an explicit outer-loop stopping threshold.
    pub const fn with_ripple_tol(mut self, ripple_tol: f64) -> Self {
        self.ripple_tol = Some(ripple_tol);
        self
    }

    /// Set the outer iteration cap.
    pub const fn with_max_outer_iterations(mut self, max_outer_iterations: usize) -> Self {
        self.max_outer_iterations = max_outer_iterations;
        self
    }

    /// Outer-loop threshold, falling back to `line_tol`.
    pub fn effective_ripple_tol(&self, line_tol: f64) -> f64 {
        self.ripple_tol.unwrap_or(line_tol)
    }

    /// Validate direction search parameters.
    pub fn validate(&self) -> DesignResult<()> {
        if self.tweak_factor.is_nan() || self.tweak_factor <= 0.0 || self.tweak_factor >= 1.0 {
            return Err(DesignError::invalid_parameter(format!(
                "tweak factor must lie in (0, 1), got {}",
                self.tweak_factor
            )));
        }
        if self.y_base_init.is_nan() || self.y_base_init <= 0.0 || self.y_base_init > 1.0 {
            return Err(DesignError::invalid_parameter(format!(
                "y_base_init must lie in (0, 1], got {}",
                self.y_base_init
            )));
        }
        if let Some(ripple_tol) = self.ripple_tol {
            if !ripple_tol.is_finite() || ripple_tol <= 0.0 {
                return Err(DesignError::invalid_parameter(format!(
                    "ripple tolerance must be positive, got {ripple_tol}"
                )));
            }
        }
        if self.max_outer_iterations == 0 {
            return Err(DesignError::invalid_parameter(
                "direction search needs at least one outer iteration",
            ));
        }
        if self.min_line_separation.is_nan() || self.min_line_separation < 0.0 {
            return Err(DesignError::invalid_parameter(
                "minimum line separation must be non-negative",
            ));
        }
        Ok(())
    }
}

impl Default for DirectionSearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete configuration of a filter design run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Line search parameters
    pub line: LineSearchConfig,
    /// Direction search parameters
    pub direction: DirectionSearchConfig,
    /// Number of response points on `[0, pi)`
    pub num_resp_pts: usize,
    /// Scale of the reported response
    pub scale: ResponseScale,
    /// Whether the reported response is normalized
    pub normalize: bool,
    /// How responses are sampled
    pub method: ResponseMethod,
}

impl DesignConfig {
    /// Default configuration: 512 response points, normalized dB output.
    pub const fn new() -> Self {
        Self {
            line: LineSearchConfig::new(),
            direction: DirectionSearchConfig::new(),
            num_resp_pts: 512,
            scale: ResponseScale::Decibel,
            normalize: true,
            method: ResponseMethod::Trigonometric,
        }
    }

    /// Set the line search parameters.
    pub const fn with_line(mut self, line: LineSearchConfig) -> Self {
        self.line = line;
        self
    }

    /// Set the direction search parameters.
    pub const fn with_direction(mut self, direction: DirectionSearchConfig) -> Self {
        self.direction = direction;
        self
    }

    /// Set the number of response points.
    pub const fn with_num_resp_pts(mut self, num_resp_pts: usize) -> Self {
        self.num_resp_pts = num_resp_pts;
        self
    }

    /// Set the scale and normalization of the reported response.
    pub const fn with_output(mut self, scale: ResponseScale, normalize: bool) -> Self {
        self.scale = scale;
        self.normalize = normalize;
        self
    }

    /// Set the response sampling method.
    pub const fn with_method(mut self, method: ResponseMethod) -> Self {
        self.method = method;
        self
    }

    /// Parse and validate a configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    /// `InvalidConfig` if the JSON is malformed, any error of [`DesignConfig::validate`].
    pub fn from_json_str(json: &str) -> DesignResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DesignError::invalid_config(format!("failed to parse design config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> DesignResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DesignError::invalid_config(format!("failed to serialize design config: {e}")))
    }

    /// Validate every section.
    pub fn validate(&self) -> DesignResult<()> {
        self.line.validate()?;
        self.direction.validate()?;
        if self.num_resp_pts == 0 {
            return Err(DesignError::invalid_parameter(
                "number of response points must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self::new()
    }
}
