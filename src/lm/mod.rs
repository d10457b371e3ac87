//! Bounded least-squares solving.
//!
//! The fit driver talks to its minimizer through the [`Solver`] trait: it
//! hands over a residual [`Problem`](crate::problem::Problem), the parameter
//! descriptor table and a [`SolverConfig`], and receives a [`SolverOutcome`]
//! whose status codes follow the MINPACK/mpfit convention. The default
//! implementation is [`LevenbergMarquardt`].

pub mod algorithm;
pub mod config;
pub mod finite_difference;
pub mod linalg;
pub mod ties;

pub use algorithm::LevenbergMarquardt;
pub use config::SolverConfig;
pub use ties::TieSet;

use ndarray::Array1;
use std::fmt;

use crate::error::Result;
use crate::parameters::ParInfoTable;
use crate::problem::Problem;

/// Termination status of a solver run.
///
/// The integer codes are those of MINPACK's `lmdif` as extended by mpfit;
/// only [`FitStatus::ImproperInput`] (code 0) is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    ImproperInput,
    ChiSquareConvergence,
    ParameterConvergence,
    BothConvergence,
    Orthogonality,
    MaxIterations,
    FtolTooSmall,
    XtolTooSmall,
    GtolTooSmall,
}

impl FitStatus {
    pub fn code(self) -> i32 {
        match self {
            FitStatus::ImproperInput => 0,
            FitStatus::ChiSquareConvergence => 1,
            FitStatus::ParameterConvergence => 2,
            FitStatus::BothConvergence => 3,
            FitStatus::Orthogonality => 4,
            FitStatus::MaxIterations => 5,
            FitStatus::FtolTooSmall => 6,
            FitStatus::XtolTooSmall => 7,
            FitStatus::GtolTooSmall => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => FitStatus::ImproperInput,
            1 => FitStatus::ChiSquareConvergence,
            2 => FitStatus::ParameterConvergence,
            3 => FitStatus::BothConvergence,
            4 => FitStatus::Orthogonality,
            5 => FitStatus::MaxIterations,
            6 => FitStatus::FtolTooSmall,
            7 => FitStatus::XtolTooSmall,
            8 => FitStatus::GtolTooSmall,
            _ => return None,
        })
    }

    /// Human-readable meaning of the status code.
    pub fn message(self) -> &'static str {
        match self {
            FitStatus::ImproperInput => "Improper input parameters.",
            FitStatus::ChiSquareConvergence => "Convergence in chi-square value.",
            FitStatus::ParameterConvergence => "Convergence in parameter value.",
            FitStatus::BothConvergence => "Convergence in chi-square and parameter value.",
            FitStatus::Orthogonality => "Convergence in orthogonality.",
            FitStatus::MaxIterations => "Maximum number of iterations reached.",
            FitStatus::FtolTooSmall => {
                "ftol is too small; no further improvement in chi-square possible."
            }
            FitStatus::XtolTooSmall => {
                "xtol is too small; no further improvement in parameters possible."
            }
            FitStatus::GtolTooSmall => {
                "gtol is too small; no further improvement in parameters possible."
            }
        }
    }

    pub fn is_failure(self) -> bool {
        self == FitStatus::ImproperInput
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.message())
    }
}

/// Everything a solver reports back to the fit driver.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    /// Full parameter vector, fixed and tied entries included
    pub params: Array1<f64>,

    /// One-sigma uncertainties; `None` when the solver could not estimate them
    pub perror: Option<Array1<f64>>,

    pub status: FitStatus,

    /// Diagnostic text, non-empty when `status` is a failure
    pub errmsg: String,

    /// Sum of squared weighted residuals at `params`
    pub fnorm: f64,

    pub niter: usize,
    pub nfev: usize,
}

impl SolverOutcome {
    /// Outcome for input rejected before any iteration.
    pub fn improper(params: Array1<f64>, errmsg: impl Into<String>) -> Self {
        Self {
            params,
            perror: None,
            status: FitStatus::ImproperInput,
            errmsg: errmsg.into(),
            fnorm: f64::NAN,
            niter: 0,
            nfev: 0,
        }
    }
}

/// A bounded nonlinear least-squares minimizer.
///
/// Implementations must honor every field of the descriptor table: initial
/// values, enabled limits, fixed flags, minimum steps and tie expressions.
/// Problems with the input are reported as [`FitStatus::ImproperInput`] in the
/// outcome; `Err` is reserved for failures raised by the problem itself.
pub trait Solver: Send + Sync + fmt::Debug {
    fn minimize(
        &self,
        problem: &dyn Problem,
        parinfo: &ParInfoTable,
        config: &SolverConfig,
    ) -> Result<SolverOutcome>;
}
