//! # Spectral model wrapper
//!
//! [`SpectralModel`] turns a single-peak [`ModelFunction`] into a constrained
//! multi-peak fitter for one-dimensional spectra. It owns the parameter
//! naming and shape ([`ParameterSpec`]), the current descriptor table, the
//! model keywords and the solver, and keeps the outcome of the last fit for
//! the result accessors.
//!
//! ## Example Usage
//!
//! ```rust
//! use ndarray::Array1;
//! use specfit_rs::{FitOptions, Kwargs, SpectralAxis, SpectralModel};
//!
//! let x = Array1::linspace(-10.0, 10.0, 201);
//! let data = x.mapv(|x: f64| 2.0 * (-0.5 * ((x - 1.0) / 1.5).powi(2)).exp());
//!
//! let mut model = SpectralModel::gaussian(Kwargs::new()).unwrap();
//! let output = model
//!     .fit(
//!         &SpectralAxis::from(x),
//!         &data,
//!         None,
//!         &FitOptions::default(),
//!         Kwargs::new().with("params", vec![1.0, 0.0, 1.0]),
//!     )
//!     .unwrap();
//!
//! assert!((output.params[0] - 2.0).abs() < 1e-6);
//! assert!((output.params[1] - 1.0).abs() < 1e-6);
//! ```

mod accessors;
mod fit;
pub mod format;
mod options;
mod result;

pub use options::FitOptions;
pub use result::{FitOutput, FitResult, FitWarning};

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::kwargs::Kwargs;
use crate::lm::{LevenbergMarquardt, Solver};
use crate::model::ModelFunction;
use crate::models::{Gaussian, NPeakModel, VariableHeight};
use crate::parameters::{make_parinfo, ParInfoTable, ParameterSpec};

/// How peaks are fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Any number of peaks, no background.
    #[default]
    Multi,

    /// One peak on top of a fitted constant background (`height`).
    Single,
}

/// Name and short label of the background parameter in single mode.
const HEIGHT_NAME: &str = "height";
const HEIGHT_SHORT_NAME: &str = "B";

/// A multi-peak spectral line fitter built around one model function.
pub struct SpectralModel {
    modelfunc: Arc<dyn ModelFunction>,
    npars: usize,
    mode: FitMode,
    spec: ParameterSpec,
    parinfo: ParInfoTable,
    modelfunc_kwargs: Kwargs,
    solver: Box<dyn Solver>,
    result: Option<FitResult>,
}

impl fmt::Debug for SpectralModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralModel")
            .field("npars", &self.npars)
            .field("mode", &self.mode)
            .field("spec", &self.spec)
            .field("parinfo", &self.parinfo)
            .field("modelfunc_kwargs", &self.modelfunc_kwargs)
            .field("solver", &self.solver)
            .field("fitted", &self.result.is_some())
            .finish()
    }
}

impl SpectralModel {
    /// Wrap `modelfunc`, which takes `npars` parameters per peak.
    ///
    /// `kwargs` may hold any parameter keyword accepted by
    /// [`make_parinfo`]; `parnames` is required. Keywords not consumed there
    /// are kept and passed to every model evaluation.
    pub fn new<M>(modelfunc: M, npars: usize, mode: FitMode, kwargs: Kwargs) -> Result<Self>
    where
        M: ModelFunction + 'static,
    {
        let build = make_parinfo(npars, None, kwargs)?;
        Ok(Self {
            modelfunc: Arc::new(modelfunc),
            npars,
            mode,
            spec: build.spec,
            parinfo: build.parinfo,
            modelfunc_kwargs: build.remaining,
            solver: Box::new(LevenbergMarquardt::new()),
            result: None,
        })
    }

    /// A multi-peak Gaussian fitter with parameters amplitude, shift, width.
    pub fn gaussian(mut kwargs: Kwargs) -> Result<Self> {
        if !kwargs.contains("parnames") && !kwargs.contains("names") {
            kwargs.insert("parnames", Gaussian::PARNAMES.to_vec());
        }
        Self::new(Gaussian, 3, FitMode::Multi, kwargs)
    }

    /// Replace the default Levenberg-Marquardt solver.
    pub fn with_solver<S: Solver + 'static>(mut self, solver: S) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn npars(&self) -> usize {
        self.npars
    }

    pub fn mode(&self) -> FitMode {
        self.mode
    }

    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    /// Descriptor table of the most recent build, with fitted values and
    /// errors once a fit has succeeded.
    pub fn parinfo(&self) -> &ParInfoTable {
        &self.parinfo
    }

    /// Model keywords forwarded to every evaluation.
    pub fn modelfunc_kwargs(&self) -> &Kwargs {
        &self.modelfunc_kwargs
    }

    /// Outcome of the last successful fit.
    pub fn result(&self) -> Option<&FitResult> {
        self.result.as_ref()
    }

    /// Composer summing the model over any number of peaks.
    pub fn n_modelfunc(&self) -> NPeakModel {
        NPeakModel::new(
            self.modelfunc.clone(),
            self.npars,
            self.modelfunc_kwargs.clone(),
        )
    }

    /// Single-mode composer: `height + f(x, p...)`, one peak.
    fn vheight_modelfunc(&self) -> NPeakModel {
        NPeakModel::new(
            Arc::new(VariableHeight::new(self.modelfunc.clone())),
            self.npars + 1,
            self.modelfunc_kwargs.clone(),
        )
    }

    /// Specification of the single-mode parameter vector.
    fn vheight_spec(&self) -> ParameterSpec {
        ParameterSpec {
            parnames: std::iter::once(HEIGHT_NAME.to_string())
                .chain(self.spec.parnames.iter().cloned())
                .collect(),
            shortvarnames: std::iter::once(HEIGHT_SHORT_NAME.to_string())
                .chain(self.spec.shortvarnames.iter().cloned())
                .collect(),
            fitunits: self.spec.fitunits.clone(),
            npeaks: 1,
        }
    }
}
