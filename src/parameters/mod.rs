//! # Parameter descriptors
//!
//! Fitting a spectral model means handing the solver one constraint record per
//! element of the flat parameter vector: a starting value, optional lower and
//! upper limits, a fixed flag, a minimum step and an optional tie expression.
//!
//! ## Core Components
//!
//! - [`ParInfo`] and [`ParInfoTable`]: the descriptor records, peak-major
//! - [`make_parinfo`]: builds a table from keyword input
//! - [`ParameterSpec`]: names, unit and peak count carried between builds
//! - [`Expression`]: tie expressions such as `p[0] * 2` or `SHIFT0 + 1.5`
//!
//! ## Example Usage
//!
//! ```rust
//! use specfit_rs::parameters::make_parinfo;
//! use specfit_rs::Kwargs;
//!
//! let kwargs = Kwargs::new()
//!     .with("parnames", vec!["amplitude", "shift", "width"])
//!     .with("npeaks", 2)
//!     .with("params", vec![1.0, -2.0, 0.5, 0.8, 2.0, 0.7])
//!     .with("negamp", false);
//!
//! let build = make_parinfo(3, None, kwargs).unwrap();
//! assert_eq!(build.parinfo.len(), 6);
//! assert_eq!(build.parinfo[3].parname, "AMPLITUDE1");
//! assert_eq!(build.parinfo[3].limited, (true, false));
//! ```

pub mod builder;
pub mod descriptor;
pub mod expression;


pub use builder::{make_parinfo, ParInfoBuild, ParameterSpec, DEFAULT_SHORT_NAMES};
pub use descriptor::{ParInfo, ParInfoTable, AMPLITUDE_MARKER};
pub use expression::{EvaluationContext, Expression, ExpressionError, ParameterContext};
