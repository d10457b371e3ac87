//! Model function trait and closure adapter.
//!
//! A [`ModelFunction`] describes a single peak: it maps a spectral axis and one
//! peak's worth of parameters to a curve sampled on that axis. Multi-peak
//! composition, constraints and fitting are layered on top of it by
//! [`NPeakModel`](crate::models::NPeakModel) and
//! [`SpectralModel`](crate::SpectralModel).

use ndarray::{Array1, Array2, Axis};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SpecFitError};
use crate::kwargs::Kwargs;

/// A single-peak spectral line model.
///
/// `params` holds exactly one peak's parameters. `options` carries the model
/// keywords given when the wrapper was constructed.
pub trait ModelFunction: Send + Sync {
    /// Evaluate the model on `x`. The result must have the same length as `x`.
    fn evaluate(&self, x: &Array1<f64>, params: &[f64], options: &Kwargs) -> Result<Array1<f64>>;

    /// Sub-curves of the model, one row per component.
    ///
    /// Models without internal structure return the evaluated curve as a single
    /// row. Hyperfine-style models override this to return each line.
    fn components(
        &self,
        x: &Array1<f64>,
        params: &[f64],
        options: &Kwargs,
    ) -> Result<Array2<f64>> {
        Ok(self.evaluate(x, params, options)?.insert_axis(Axis(0)))
    }
}

impl<M: ModelFunction + ?Sized> ModelFunction for Arc<M> {
    fn evaluate(&self, x: &Array1<f64>, params: &[f64], options: &Kwargs) -> Result<Array1<f64>> {
        (**self).evaluate(x, params, options)
    }

    fn components(
        &self,
        x: &Array1<f64>,
        params: &[f64],
        options: &Kwargs,
    ) -> Result<Array2<f64>> {
        (**self).components(x, params, options)
    }
}

type EvalFn = dyn Fn(&Array1<f64>, &[f64], &Kwargs) -> Result<Array1<f64>> + Send + Sync;

/// Adapter turning a closure into a [`ModelFunction`].
///
/// ```
/// use specfit_rs::{FnModel, Kwargs, ModelFunction};
/// use ndarray::array;
///
/// let line = FnModel::new(|x, p, _| Ok(x.mapv(|x| p[0] * x + p[1])));
/// let y = line.evaluate(&array![0.0, 1.0, 2.0], &[2.0, 1.0], &Kwargs::new()).unwrap();
/// assert_eq!(y, array![1.0, 3.0, 5.0]);
/// ```
#[derive(Clone)]
pub struct FnModel {
    func: Arc<EvalFn>,
}

impl FnModel {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Array1<f64>, &[f64], &Kwargs) -> Result<Array1<f64>> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for FnModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnModel")
    }
}

impl ModelFunction for FnModel {
    fn evaluate(&self, x: &Array1<f64>, params: &[f64], options: &Kwargs) -> Result<Array1<f64>> {
        let y = (self.func)(x, params, options)?;
        if y.len() != x.len() {
            return Err(SpecFitError::DimensionMismatch(format!(
                "model returned {} values for an axis of {} samples",
                y.len(),
                x.len()
            )));
        }
        Ok(y)
    }
}
