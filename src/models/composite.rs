//! N-peak composition.
//!
//! Replicates a single-peak model into a sum of independent peaks. The peak
//! count is inferred from the length of the parameter vector rather than
//! stored, so the same composer evaluates any number of peaks.

use ndarray::{Array1, Array2};
use std::sync::Arc;

use crate::error::{Result, SpecFitError};
use crate::kwargs::Kwargs;
use crate::model::ModelFunction;

/// Sum of `pars.len() / npars` copies of a single-peak model.
#[derive(Clone)]
pub struct NPeakModel {
    model: Arc<dyn ModelFunction>,
    npars: usize,
    options: Kwargs,
}

impl std::fmt::Debug for NPeakModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NPeakModel")
            .field("npars", &self.npars)
            .field("options", &self.options)
            .finish()
    }
}

impl NPeakModel {
    pub fn new(model: Arc<dyn ModelFunction>, npars: usize, options: Kwargs) -> Self {
        Self {
            model,
            npars,
            options,
        }
    }

    pub fn npars(&self) -> usize {
        self.npars
    }

    /// Number of peaks described by `pars`.
    pub fn peak_count(&self, pars: &[f64]) -> Result<usize> {
        if self.npars == 0 || pars.len() % self.npars != 0 {
            return Err(SpecFitError::DimensionMismatch(format!(
                "{} parameters is not a multiple of {} parameters per peak",
                pars.len(),
                self.npars
            )));
        }
        Ok(pars.len() / self.npars)
    }

    /// Sum the model over every contiguous `npars` slice of `pars`.
    ///
    /// An empty parameter vector gives a zero curve.
    pub fn evaluate(&self, x: &Array1<f64>, pars: &[f64]) -> Result<Array1<f64>> {
        self.peak_count(pars)?;
        let mut total = Array1::zeros(x.len());
        for peak in pars.chunks(self.npars) {
            let curve = self.model.evaluate(x, peak, &self.options)?;
            if curve.len() != x.len() {
                return Err(SpecFitError::DimensionMismatch(format!(
                    "model returned {} values for an axis of {} samples",
                    curve.len(),
                    x.len()
                )));
            }
            total += &curve;
        }
        Ok(total)
    }

    /// Per-peak sub-curves, in peak order.
    pub fn components(&self, x: &Array1<f64>, pars: &[f64]) -> Result<Vec<Array2<f64>>> {
        self.peak_count(pars)?;
        pars.chunks(self.npars)
            .map(|peak| self.model.components(x, peak, &self.options))
            .collect()
    }
}
