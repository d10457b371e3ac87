//! Variable-height adapter.
//!
//! Wraps a single-peak model `f(x, p...)` as `height + f(x, p...)`, prepending
//! a constant background parameter.

use ndarray::{Array1, Array2};
use std::sync::Arc;

use crate::error::{Result, SpecFitError};
use crate::kwargs::Kwargs;
use crate::model::ModelFunction;

/// `height + f(x, p...)`, taking `npars + 1` parameters with the height first.
#[derive(Clone)]
pub struct VariableHeight {
    inner: Arc<dyn ModelFunction>,
}

impl std::fmt::Debug for VariableHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VariableHeight")
    }
}

impl VariableHeight {
    pub fn new(inner: Arc<dyn ModelFunction>) -> Self {
        Self { inner }
    }

    fn split(params: &[f64]) -> Result<(f64, &[f64])> {
        params.split_first().map(|(h, rest)| (*h, rest)).ok_or_else(|| {
            SpecFitError::DimensionMismatch("variable-height model needs a height parameter".into())
        })
    }
}

impl ModelFunction for VariableHeight {
    fn evaluate(&self, x: &Array1<f64>, params: &[f64], options: &Kwargs) -> Result<Array1<f64>> {
        let (height, rest) = Self::split(params)?;
        Ok(self.inner.evaluate(x, rest, options)? + height)
    }

    /// The background as the first row, followed by the wrapped model's
    /// components.
    fn components(
        &self,
        x: &Array1<f64>,
        params: &[f64],
        options: &Kwargs,
    ) -> Result<Array2<f64>> {
        let (height, rest) = Self::split(params)?;
        let parts = self.inner.components(x, rest, options)?;
        let mut rows = Array2::from_elem((parts.nrows() + 1, x.len()), height);
        rows.slice_mut(ndarray::s![1.., ..]).assign(&parts);
        Ok(rows)
    }
}
