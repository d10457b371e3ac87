//! Fitting tests
//!
//! End-to-end fits through `SpectralModel`, covering multi-peak composition,
//! constraints, data sanitization, single-peak mode and unit conversion.

pub mod multi_peak;
pub mod single_peak;
