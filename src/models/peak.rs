//! Reference line profiles.
//!
//! Both profiles take three parameters per peak, in order: amplitude, shift
//! (line center) and width.

use ndarray::Array1;

use crate::error::{Result, SpecFitError};
use crate::kwargs::Kwargs;
use crate::model::ModelFunction;

fn three(params: &[f64], model: &str) -> Result<(f64, f64, f64)> {
    match params {
        [amplitude, shift, width] => Ok((*amplitude, *shift, *width)),
        _ => Err(SpecFitError::DimensionMismatch(format!(
            "{} takes 3 parameters per peak, got {}",
            model,
            params.len()
        ))),
    }
}

/// A Gaussian line.
///
/// f(x) = amplitude * exp(-(x - shift)² / (2 * width²))
///
/// `width` is the standard deviation; FWHM = 2 * sqrt(2 * ln(2)) * width.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gaussian;

impl Gaussian {
    pub const PARNAMES: [&'static str; 3] = ["amplitude", "shift", "width"];
}

impl ModelFunction for Gaussian {
    fn evaluate(&self, x: &Array1<f64>, params: &[f64], _options: &Kwargs) -> Result<Array1<f64>> {
        let (amplitude, shift, width) = three(params, "Gaussian")?;
        Ok(x.mapv(|x| {
            let arg = (x - shift) / width;
            amplitude * (-0.5 * arg * arg).exp()
        }))
    }
}

/// A Lorentzian line with peak height `amplitude`.
///
/// f(x) = amplitude * width² / ((x - shift)² + width²)
///
/// `width` is the half width at half maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lorentzian;

impl Lorentzian {
    pub const PARNAMES: [&'static str; 3] = ["amplitude", "shift", "width"];
}

impl ModelFunction for Lorentzian {
    fn evaluate(&self, x: &Array1<f64>, params: &[f64], _options: &Kwargs) -> Result<Array1<f64>> {
        let (amplitude, shift, width) = three(params, "Lorentzian")?;
        let w2 = width * width;
        Ok(x.mapv(|x| {
            let dx = x - shift;
            amplitude * w2 / (dx * dx + w2)
        }))
    }
}
