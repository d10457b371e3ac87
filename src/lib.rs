//! # specfit-rs
//!
//! `specfit-rs` turns a single-peak spectral line model into a constrained,
//! multi-component nonlinear least-squares fitter for one-dimensional
//! spectra.
//!
//! The library provides:
//! - A parameter descriptor builder accepting values, limits, fixed flags,
//!   minimum steps and tie expressions in several equivalent forms
//! - N-peak composition of any [`ModelFunction`], with an optional fitted
//!   constant background
//! - A bounded Levenberg-Marquardt solver behind the [`Solver`] trait
//! - Post-fit accessors for slope, annotations, component curves and integral
//!
//! ## Basic Usage
//!
//! ```
//! use ndarray::Array1;
//! use specfit_rs::{FitOptions, Kwargs, SpectralAxis, SpectralModel};
//!
//! let x = Array1::linspace(-10.0, 10.0, 201);
//! let data = x.mapv(|x: f64| {
//!     (-0.5 * ((x + 3.0) / 1.0).powi(2)).exp() + 0.5 * (-0.5 * ((x - 4.0) / 2.0).powi(2)).exp()
//! });
//!
//! let mut model = SpectralModel::gaussian(Kwargs::new())?;
//! let output = model.fit(
//!     &SpectralAxis::from(x),
//!     &data,
//!     None,
//!     &FitOptions::default(),
//!     Kwargs::new()
//!         .with("npeaks", 2)
//!         .with("params", vec![0.8, -2.5, 1.5, 0.4, 3.5, 1.5]),
//! )?;
//!
//! assert_eq!(output.params.len(), 6);
//! assert!((output.params[4] - 4.0).abs() < 1e-6);
//! # Ok::<(), specfit_rs::SpecFitError>(())
//! ```

pub mod axis;
pub mod error;
pub mod kwargs;
pub mod lm;
pub mod model;
pub mod models;
pub mod parameters;
pub mod problem;
pub mod spectral;

// Re-exports for convenience
pub use axis::{ScaleConverter, SpectralAxis, UnitAxis, UnitConverter};
pub use error::{Result, SpecFitError};
pub use kwargs::{KwValue, Kwargs};
pub use lm::{FitStatus, LevenbergMarquardt, Solver, SolverConfig, SolverOutcome};
pub use model::{FnModel, ModelFunction};
pub use models::{Gaussian, Lorentzian, NPeakModel};
pub use parameters::{ParInfo, ParInfoTable};
pub use problem::Problem;
pub use spectral::{FitMode, FitOptions, FitOutput, FitResult, FitWarning, SpectralModel};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
