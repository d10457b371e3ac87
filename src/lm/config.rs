//! Configuration options for the solver.
//!
//! Defaults follow mpfit: 200 iterations, tolerances of 1e-10 and a
//! finite-difference precision of machine epsilon.

use crate::error::{Result, SpecFitError};
use crate::kwargs::Kwargs;

/// Configuration options for [`LevenbergMarquardt`](super::LevenbergMarquardt)
/// and any other [`Solver`](super::Solver).
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Maximum number of iterations. Default: 200
    pub max_iterations: usize,

    /// Relative reduction in chi-square regarded as converged. Default: 1e-10
    pub ftol: f64,

    /// Relative parameter change regarded as converged. Default: 1e-10
    pub xtol: f64,

    /// Cosine between residuals and Jacobian columns regarded as
    /// orthogonal. Default: 1e-10
    pub gtol: f64,

    /// Relative precision of the model evaluation, sets the automatic
    /// finite-difference step. Default: f64::EPSILON
    pub epsfcn: f64,

    /// Initial value for the damping parameter. Default: 1e-3
    pub initial_lambda: f64,

    /// Factor by which to increase lambda. Default: 10.0
    pub lambda_up_factor: f64,

    /// Factor by which to decrease lambda. Default: 0.1
    pub lambda_down_factor: f64,

    /// Minimum value for lambda. Default: 1e-12
    pub min_lambda: f64,

    /// Maximum value for lambda. Default: 1e10
    pub max_lambda: f64,

    /// Suppress per-iteration progress logging. Default: true
    pub quiet: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-10,
            xtol: 1e-10,
            gtol: 1e-10,
            epsfcn: f64::EPSILON,
            initial_lambda: 1e-3,
            lambda_up_factor: 10.0,
            lambda_down_factor: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e10,
            quiet: true,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance for the relative reduction in chi-square.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    /// Set the tolerance for the relative change in parameter values.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    /// Set the orthogonality tolerance.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    pub fn with_epsfcn(mut self, epsfcn: f64) -> Self {
        self.epsfcn = epsfcn;
        self
    }

    /// Set the initial value for the damping parameter.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.initial_lambda = lambda;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Read solver keywords left over after parameter construction.
    ///
    /// Recognized keys are `maxiter`, `ftol`, `xtol`, `gtol` and `epsfcn`.
    /// Any other key is rejected with `InvalidKeyword`.
    pub fn apply_kwargs(&mut self, kwargs: Kwargs) -> Result<()> {
        for (key, value) in kwargs.iter() {
            match key {
                "maxiter" => self.max_iterations = value.as_count(key)?,
                "ftol" => self.ftol = value.as_f64(key)?,
                "xtol" => self.xtol = value.as_f64(key)?,
                "gtol" => self.gtol = value.as_f64(key)?,
                "epsfcn" => self.epsfcn = value.as_f64(key)?,
                _ => {
                    return Err(SpecFitError::keyword(
                        key,
                        "one of maxiter, ftol, xtol, gtol, epsfcn",
                    ))
                }
            }
        }
        Ok(())
    }
}
