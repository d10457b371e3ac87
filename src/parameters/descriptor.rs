//! Parameter descriptor table.
//!
//! One [`ParInfo`] per (peak, parameter) pair, stored peak-major so that entry
//! `n` describes element `n` of the flat parameter vector handed to the model
//! composer and returned by the solver.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::error::Result;

/// Marker identifying amplitude parameters for the `negamp` switch.
pub const AMPLITUDE_MARKER: &str = "AMP";

/// Constraint and value record for one element of the parameter vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParInfo {
    /// Flat position: `peak * npars + param`
    pub n: usize,

    /// Initial guess; holds the fitted value after a fit
    pub value: f64,

    /// Minimum step size used by the solver (0 = automatic)
    pub step: f64,

    /// (lower, upper) bound values, meaningful only where `limited` is set
    pub limits: (f64, f64),

    /// Whether the lower/upper bound is enforced
    pub limited: (bool, bool),

    /// Hold the value constant during fitting
    pub fixed: bool,

    /// Upper-cased base name followed by the peak index, e.g. `AMP0`
    pub parname: String,

    /// Post-fit uncertainty
    pub error: f64,

    /// Tie expression, empty when the parameter is untied
    pub tied: String,
}

impl ParInfo {
    pub fn new(n: usize, parname: &str, value: f64) -> Self {
        Self {
            n,
            value,
            step: 0.0,
            limits: (0.0, 0.0),
            limited: (false, false),
            fixed: false,
            parname: parname.to_string(),
            error: 0.0,
            tied: String::new(),
        }
    }

    pub fn is_tied(&self) -> bool {
        !self.tied.trim().is_empty()
    }

    /// Varied by the solver: neither fixed nor tied.
    pub fn is_free(&self) -> bool {
        !self.fixed && !self.is_tied()
    }

    pub fn is_amplitude(&self) -> bool {
        self.parname.contains(AMPLITUDE_MARKER)
    }

    /// Clamp `value` into the enabled limits.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut v = value;
        if self.limited.0 && v < self.limits.0 {
            v = self.limits.0;
        }
        if self.limited.1 && v > self.limits.1 {
            v = self.limits.1;
        }
        v
    }

    /// Whether `value` satisfies the enabled limits.
    pub fn within_limits(&self, value: f64) -> bool {
        !(self.limited.0 && value < self.limits.0) && !(self.limited.1 && value > self.limits.1)
    }
}

/// Ordered descriptor table, one entry per (peak, parameter) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParInfoTable(Vec<ParInfo>);

impl ParInfoTable {
    pub fn new(entries: Vec<ParInfo>) -> Self {
        Self(entries)
    }

    pub fn into_inner(self) -> Vec<ParInfo> {
        self.0
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.value).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.error).collect()
    }

    /// Map from display name to flat index.
    pub fn name_index(&self) -> HashMap<String, usize> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, p)| (p.parname.clone(), i))
            .collect()
    }

    /// Sign constraint for amplitude parameters.
    ///
    /// `Some(true)` (absorption) pins every amplitude's upper bound to 0,
    /// `Some(false)` (emission) pins the lower bound to 0. Only the affected
    /// bound and its flag change. `None` leaves the table untouched.
    pub fn apply_negamp(&mut self, negamp: Option<bool>) {
        let Some(negative) = negamp else {
            return;
        };
        for p in self.0.iter_mut().filter(|p| p.is_amplitude()) {
            if negative {
                p.limited.1 = true;
                p.limits.1 = 0.0;
            } else {
                p.limited.0 = true;
                p.limits.0 = 0.0;
            }
        }
    }

    /// Copy fitted values and uncertainties back into the table.
    pub fn update_from_fit(&mut self, values: &[f64], errors: &[f64]) -> bool {
        if values.len() != self.0.len() || errors.len() != self.0.len() {
            return false;
        }
        for ((p, &v), &e) in self.0.iter_mut().zip(values).zip(errors) {
            p.value = v;
            p.error = e;
        }
        true
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Deref for ParInfoTable {
    type Target = Vec<ParInfo>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ParInfoTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<ParInfo>> for ParInfoTable {
    fn from(entries: Vec<ParInfo>) -> Self {
        Self(entries)
    }
}

impl FromIterator<ParInfo> for ParInfoTable {
    fn from_iter<I: IntoIterator<Item = ParInfo>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
