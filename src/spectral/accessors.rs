//! Post-fit queries.

use ndarray::{s, Array1, Array2};

use super::format::annotation;
use super::{FitMode, FitResult, SpectralModel};
use crate::error::{Result, SpecFitError};

impl SpectralModel {
    fn fitted(&self) -> Result<&FitResult> {
        self.result.as_ref().ok_or(SpecFitError::NoFitResult)
    }

    /// Local slope of the best-fit model at `x`.
    ///
    /// `x` is mapped to the nearest sample of the axis passed to the last
    /// fit, and the first difference of the model is averaged over the two
    /// differences `[pix - 1, pix + 1)`. A non-finite result, including an
    /// empty window at the first sample, gives 0.
    pub fn slope(&self, x: f64) -> Result<f64> {
        let result = self.fitted()?;
        let Some(pix) = result.xax.x_to_pix(x) else {
            return Ok(0.0);
        };

        let model = &result.model;
        if model.len() < 2 || pix == 0 {
            return Ok(0.0);
        }
        let diff = &model.slice(s![1..]) - &model.slice(s![..-1]);
        let hi = (pix + 1).min(diff.len());
        let lo = pix - 1;
        if lo >= hi {
            return Ok(0.0);
        }

        let slope = diff.slice(s![lo..hi]).mean().unwrap_or(f64::NAN);
        Ok(if slope.is_finite() { slope } else { 0.0 })
    }

    /// One label per (peak, parameter) pair, peak-major.
    ///
    /// Short names default to those of the last fit (falling back to the
    /// display names when none were given) and are recycled when shorter than
    /// the parameter vector.
    pub fn annotations(&self, shortvarnames: Option<&[&str]>) -> Result<Vec<String>> {
        let result = self.fitted()?;
        let names: Vec<&str> = match shortvarnames {
            Some(names) if !names.is_empty() => names.to_vec(),
            _ if !result.shortvarnames.is_empty() => {
                result.shortvarnames.iter().map(String::as_str).collect()
            }
            _ => result.parnames.iter().map(String::as_str).collect(),
        };
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let npars = result.npars.max(1);
        Ok(result
            .params
            .iter()
            .zip(result.errors.iter())
            .enumerate()
            .map(|(i, (&value, &error))| annotation(names[i % names.len()], i / npars, value, error))
            .collect())
    }

    /// Per-peak component curves of `pars` evaluated on `xarr`.
    pub fn components(&self, xarr: &Array1<f64>, pars: &[f64]) -> Result<Vec<Array2<f64>>> {
        match self.mode {
            FitMode::Multi => self.n_modelfunc().components(xarr, pars),
            FitMode::Single => self.vheight_modelfunc().components(xarr, pars),
        }
    }

    /// Sum of the best-fit model samples.
    ///
    /// This is not a numerical integral: axis spacing is ignored.
    pub fn integral(&self) -> Result<f64> {
        Ok(self.fitted()?.model.sum())
    }
}
