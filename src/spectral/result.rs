//! Fit outputs.

use ndarray::Array1;
use std::fmt;

use crate::axis::SpectralAxis;
use crate::lm::FitStatus;

/// Non-fatal problems detected after a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitWarning {
    /// The solver returned a NaN chi-square.
    NanChiSquare,
}

impl fmt::Display for FitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitWarning::NanChiSquare => write!(f, "chi^2 is nan"),
        }
    }
}

/// What a fit call returns.
#[derive(Debug, Clone)]
pub struct FitOutput {
    /// Fitted parameter vector, peak-major
    pub params: Array1<f64>,

    /// Best-fit composite model sampled on the fit axis
    pub model: Array1<f64>,

    /// One-sigma uncertainties, zero where the solver gave none
    pub errors: Array1<f64>,

    pub chi2: f64,

    pub warnings: Vec<FitWarning>,
}

/// State kept after a successful fit, read by the result accessors.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub params: Array1<f64>,
    pub errors: Array1<f64>,
    pub status: FitStatus,
    pub chi2: f64,
    pub model: Array1<f64>,

    /// The axis as supplied by the caller, before any unit conversion
    pub xax: SpectralAxis,

    /// Parameters per peak in the fitted model
    pub npars: usize,
    pub npeaks: usize,

    /// Display names (`AMP0`, ...) in parameter order
    pub parnames: Vec<String>,
    pub shortvarnames: Vec<String>,

    pub niter: usize,
    pub nfev: usize,

    /// Solver diagnostic text
    pub message: String,
}

impl FitResult {
    /// Degrees of freedom: data points minus parameters.
    pub fn dof(&self) -> i64 {
        self.model.len() as i64 - self.params.len() as i64
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fit Result:")?;
        writeln!(f, "  Status: {}", self.status)?;
        writeln!(f, "  Chi2: {:.6e}", self.chi2)?;
        writeln!(f, "  Iterations: {}", self.niter)?;
        writeln!(f, "  Function evaluations: {}", self.nfev)?;
        for ((name, value), error) in self
            .parnames
            .iter()
            .zip(self.params.iter())
            .zip(self.errors.iter())
        {
            writeln!(f, "  {} = {} +/- {}", name, value, error)?;
        }
        Ok(())
    }
}
