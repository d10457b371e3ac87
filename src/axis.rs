//! Spectroscopic axes.
//!
//! The fit driver accepts either a bare coordinate array or an axis that
//! knows its unit and can be converted. Unit arithmetic itself is supplied by
//! the caller through [`UnitConverter`].

use ndarray::Array1;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SpecFitError};

/// Converts axis coordinates between units.
pub trait UnitConverter: Send + Sync + fmt::Debug {
    fn convert(&self, values: &Array1<f64>, from: &str, to: &str) -> Result<Array1<f64>>;
}

/// Converter for axes whose units differ only by a constant factor.
///
/// Each unit is registered with its size in a common base unit, e.g. `Hz` =
/// 1, `kHz` = 1e3, `GHz` = 1e9.
#[derive(Debug, Clone, Default)]
pub struct ScaleConverter {
    scales: Vec<(String, f64)>,
}

impl ScaleConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: &str, scale: f64) -> Self {
        self.scales.push((unit.to_string(), scale));
        self
    }

    fn scale(&self, unit: &str) -> Result<f64> {
        self.scales
            .iter()
            .find(|(name, _)| name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| SpecFitError::UnitConversion(format!("unknown unit '{}'", unit)))
    }
}

impl UnitConverter for ScaleConverter {
    fn convert(&self, values: &Array1<f64>, from: &str, to: &str) -> Result<Array1<f64>> {
        let factor = self.scale(from)? / self.scale(to)?;
        Ok(values * factor)
    }
}

/// Coordinates tagged with a unit and a converter.
#[derive(Debug, Clone)]
pub struct UnitAxis {
    pub values: Array1<f64>,
    pub unit: String,
    converter: Arc<dyn UnitConverter>,
}

impl UnitAxis {
    pub fn new(values: Array1<f64>, unit: &str, converter: Arc<dyn UnitConverter>) -> Self {
        Self {
            values,
            unit: unit.to_string(),
            converter,
        }
    }

    /// Convert in place to `unit`. A no-op when already in that unit.
    pub fn convert_to_unit(&mut self, unit: &str, quiet: bool) -> Result<()> {
        if unit == self.unit {
            return Ok(());
        }
        self.values = self.converter.convert(&self.values, &self.unit, unit)?;
        if !quiet {
            tracing::info!("Converted spectral axis from {} to {}", self.unit, unit);
        }
        self.unit = unit.to_string();
        Ok(())
    }
}

/// The x-axis of a spectrum.
#[derive(Debug, Clone)]
pub enum SpectralAxis {
    Plain(Array1<f64>),
    WithUnits(UnitAxis),
}

impl SpectralAxis {
    pub fn values(&self) -> &Array1<f64> {
        match self {
            SpectralAxis::Plain(values) => values,
            SpectralAxis::WithUnits(axis) => &axis.values,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            SpectralAxis::Plain(_) => None,
            SpectralAxis::WithUnits(axis) => Some(&axis.unit),
        }
    }

    /// A copy of the axis in `unit`, if the axis can convert; otherwise a
    /// plain copy.
    pub fn converted(&self, unit: &str, quiet: bool) -> Result<SpectralAxis> {
        let mut copy = self.clone();
        if let SpectralAxis::WithUnits(axis) = &mut copy {
            axis.convert_to_unit(unit, quiet)?;
        }
        Ok(copy)
    }

    /// Index of the sample nearest to `x`; `None` for an empty axis.
    pub fn x_to_pix(&self, x: f64) -> Option<usize> {
        self.values()
            .iter()
            .enumerate()
            .map(|(i, v)| (i, (v - x).abs()))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}

impl From<Array1<f64>> for SpectralAxis {
    fn from(values: Array1<f64>) -> Self {
        SpectralAxis::Plain(values)
    }
}

impl From<UnitAxis> for SpectralAxis {
    fn from(axis: UnitAxis) -> Self {
        SpectralAxis::WithUnits(axis)
    }
}
