//! Problem definition trait and the spectrum residual problem.
//!
//! A [`Problem`] maps a full parameter vector to a vector of weighted
//! residuals; solvers minimize their sum of squares.

use ndarray::Array1;

use crate::error::{Result, SpecFitError};
use crate::models::NPeakModel;

/// A nonlinear least-squares problem.
pub trait Problem {
    /// Evaluate the residuals at the given parameters.
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}

/// Weighted residuals `(data - model) / err` of a composite model against a
/// spectrum. Without an error array the residuals are unweighted.
pub struct SpectrumProblem<'a> {
    model: &'a NPeakModel,
    x: &'a Array1<f64>,
    data: &'a Array1<f64>,
    err: Option<&'a Array1<f64>>,
}

impl<'a> SpectrumProblem<'a> {
    pub fn new(
        model: &'a NPeakModel,
        x: &'a Array1<f64>,
        data: &'a Array1<f64>,
        err: Option<&'a Array1<f64>>,
    ) -> Result<Self> {
        if x.len() != data.len() {
            return Err(SpecFitError::DimensionMismatch(format!(
                "axis has {} samples but data has {}",
                x.len(),
                data.len()
            )));
        }
        if let Some(err) = err {
            if err.len() != data.len() {
                return Err(SpecFitError::DimensionMismatch(format!(
                    "error array has {} samples but data has {}",
                    err.len(),
                    data.len()
                )));
            }
        }
        Ok(Self {
            model,
            x,
            data,
            err,
        })
    }
}

impl Problem for SpectrumProblem<'_> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let model = self.model.evaluate(self.x, &params.to_vec())?;
        let residuals = self.data - &model;
        Ok(match self.err {
            Some(err) => residuals / err,
            None => residuals,
        })
    }

    fn residual_count(&self) -> usize {
        self.data.len()
    }
}

/// Neutralize non-finite samples before fitting.
///
/// Every NaN or infinite data value is set to 0 and its error to infinity, so
/// the sample contributes nothing to chi-square. Without an error array there
/// is nothing to down-weight with, and non-finite data is rejected.
pub fn sanitize(data: &mut Array1<f64>, err: Option<&mut Array1<f64>>) -> Result<usize> {
    let bad: Vec<usize> = data
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_finite())
        .map(|(i, _)| i)
        .collect();
    if bad.is_empty() {
        return Ok(0);
    }

    let Some(err) = err else {
        return Err(SpecFitError::InvalidInput(format!(
            "{} non-finite data values and no error array to down-weight them",
            bad.len()
        )));
    };
    if err.len() != data.len() {
        return Err(SpecFitError::DimensionMismatch(format!(
            "error array has {} samples but data has {}",
            err.len(),
            data.len()
        )));
    }
    for &i in &bad {
        err[i] = f64::INFINITY;
        data[i] = 0.0;
    }
    Ok(bad.len())
}
