//! Built-in line profiles and model adapters.
//!
//! [`Gaussian`] and [`Lorentzian`] are reference single-peak profiles.
//! [`NPeakModel`] sums any single-peak model over several peaks, and
//! [`VariableHeight`] adds a constant background parameter in front of one.

mod composite;
mod peak;
mod vheight;

pub use composite::NPeakModel;
pub use peak::{Gaussian, Lorentzian};
pub use vheight::VariableHeight;
