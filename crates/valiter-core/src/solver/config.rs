use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::solver::error::SolveError;

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../../config/solver.default.yaml");

/// Parameters of a value-iteration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Discount factor applied to future value, in `[0, 1)`.
    pub gamma: f64,
    /// Upper bound on the number of Bellman sweeps.
    pub max_iterations: usize,
    /// Stop once the largest per-state change of a sweep drops below this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    /// Compute each sweep with a data-parallel map over states.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            gamma: 0.9,
            max_iterations: 1000,
            theta: None,
            parallel: false,
        }
    }
}

impl SolverConfig {
    /// Build a config with the given discount and budget and no threshold.
    pub fn new(gamma: f64, max_iterations: usize) -> Self {
        SolverConfig {
            gamma,
            max_iterations,
            ..SolverConfig::default()
        }
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = Some(theta);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolverConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml).map_err(SolverConfigError::Yaml)?;
        config.validate().map_err(SolverConfigError::Invalid)?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolverConfigError> {
        let yaml = fs::read_to_string(path).map_err(SolverConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolverConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Check the run parameters.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.max_iterations == 0 {
            return Err(SolveError::ZeroIterations);
        }
        if !self.gamma.is_finite() || !(0.0..1.0).contains(&self.gamma) {
            return Err(SolveError::InvalidDiscount { gamma: self.gamma });
        }
        if let Some(theta) = self.theta {
            if !theta.is_finite() || theta < 0.0 {
                return Err(SolveError::InvalidThreshold { theta });
            }
        }
        Ok(())
    }

    /// Whether a sweep with this delta ends the run early.
    pub(crate) fn has_converged(&self, delta: f64) -> bool {
        self.theta.is_some_and(|theta| delta < theta)
    }
}

/// Error type for loading and validating `SolverConfig`.
#[derive(Debug)]
pub enum SolverConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(SolveError),
}

impl fmt::Display for SolverConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            SolverConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            SolverConfigError::Invalid(err) => write!(f, "invalid solver config: {err}"),
        }
    }
}

impl std::error::Error for SolverConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverConfigError::Io(err) => Some(err),
            SolverConfigError::Yaml(err) => Some(err),
            SolverConfigError::Invalid(err) => Some(err),
        }
    }
}
