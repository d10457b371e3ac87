//! Forward-difference Jacobian over the free parameters.

use ndarray::{Array1, Array2};

use crate::error::{Result, SpecFitError};
use crate::parameters::ParInfoTable;
use crate::problem::Problem;

/// Step for parameter `index` at value `x`.
///
/// A positive descriptor `step` is used as given; otherwise the step is
/// `sqrt(epsfcn) * |x|`, or `sqrt(epsfcn)` at zero. The step is reversed when
/// the forward point would cross an enabled upper limit.
pub fn step_size(parinfo: &ParInfoTable, index: usize, x: f64, epsfcn: f64) -> f64 {
    let eps = epsfcn.max(f64::EPSILON).sqrt();
    let mut h = match parinfo.get(index) {
        Some(p) if p.step > 0.0 => p.step,
        _ => eps * x.abs(),
    };
    if h == 0.0 {
        h = eps;
    }
    if let Some(p) = parinfo.get(index) {
        if p.limited.1 && x + h > p.limits.1 {
            h = -h;
        }
    }
    h
}

/// Compute the Jacobian of the residuals with respect to the free parameters.
///
/// Column `k` holds `∂residual / ∂params[free[k]]`; `residuals` must be the
/// residual vector at `params`.
pub fn jacobian(
    problem: &dyn Problem,
    params: &Array1<f64>,
    residuals: &Array1<f64>,
    free: &[usize],
    parinfo: &ParInfoTable,
    epsfcn: f64,
) -> Result<Array2<f64>> {
    let m = residuals.len();
    let mut jac = Array2::zeros((m, free.len()));

    for (col, &index) in free.iter().enumerate() {
        let h = step_size(parinfo, index, params[index], epsfcn);
        let mut perturbed = params.clone();
        perturbed[index] += h;

        let shifted = problem.eval(&perturbed)?;
        if shifted.len() != m {
            return Err(SpecFitError::DimensionMismatch(format!(
                "Expected {} residuals, got {}",
                m,
                shifted.len()
            )));
        }

        for i in 0..m {
            jac[[i, col]] = (shifted[i] - residuals[i]) / h;
        }
    }

    Ok(jac)
}
