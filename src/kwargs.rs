//! Keyword options.
//!
//! Parameter construction, model functions and the solver all accept loosely
//! typed keyword options. [`Kwargs`] holds them as an ordered map of
//! [`KwValue`]s; consumers take the keys they understand and pass the rest on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SpecFitError};

/// A single keyword value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KwValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Floats(Vec<f64>),
    Bools(Vec<bool>),
    Strs(Vec<String>),
    FloatPairs(Vec<(f64, f64)>),
    BoolPairs(Vec<(bool, bool)>),
}

impl KwValue {
    /// Empty sequences count as "not supplied".
    pub fn is_empty(&self) -> bool {
        match self {
            KwValue::Str(s) => s.is_empty(),
            KwValue::Floats(v) => v.is_empty(),
            KwValue::Bools(v) => v.is_empty(),
            KwValue::Strs(v) => v.is_empty(),
            KwValue::FloatPairs(v) => v.is_empty(),
            KwValue::BoolPairs(v) => v.is_empty(),
            KwValue::Bool(_) | KwValue::Int(_) | KwValue::Float(_) => false,
        }
    }

    pub(crate) fn into_floats(self, key: &str) -> Result<Vec<f64>> {
        match self {
            KwValue::Floats(v) => Ok(v),
            KwValue::Bools(v) => Ok(v.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect()),
            _ => Err(SpecFitError::keyword(key, "a sequence of numbers")),
        }
    }

    pub(crate) fn into_bools(self, key: &str) -> Result<Vec<bool>> {
        match self {
            KwValue::Bools(v) => Ok(v),
            KwValue::Floats(v) => Ok(v.into_iter().map(|x| x != 0.0).collect()),
            _ => Err(SpecFitError::keyword(key, "a sequence of booleans")),
        }
    }

    pub(crate) fn into_strings(self, key: &str) -> Result<Vec<String>> {
        match self {
            KwValue::Strs(v) => Ok(v),
            KwValue::Str(s) => Ok(vec![s]),
            _ => Err(SpecFitError::keyword(key, "a sequence of strings")),
        }
    }

    pub(crate) fn into_float_pairs(self, key: &str) -> Result<Vec<(f64, f64)>> {
        match self {
            KwValue::FloatPairs(v) => Ok(v),
            _ => Err(SpecFitError::keyword(key, "a sequence of (lower, upper) numbers")),
        }
    }

    pub(crate) fn into_bool_pairs(self, key: &str) -> Result<Vec<(bool, bool)>> {
        match self {
            KwValue::BoolPairs(v) => Ok(v),
            _ => Err(SpecFitError::keyword(key, "a sequence of (lower, upper) booleans")),
        }
    }

    pub(crate) fn as_f64(&self, key: &str) -> Result<f64> {
        match *self {
            KwValue::Float(x) => Ok(x),
            KwValue::Int(n) => Ok(n as f64),
            _ => Err(SpecFitError::keyword(key, "a number")),
        }
    }

    pub(crate) fn as_count(&self, key: &str) -> Result<usize> {
        match *self {
            KwValue::Int(n) if n >= 1 => Ok(n as usize),
            KwValue::Float(x) if x >= 1.0 && x.fract() == 0.0 => Ok(x as usize),
            _ => Err(SpecFitError::keyword(key, "a positive integer")),
        }
    }

    pub(crate) fn as_bool(&self, key: &str) -> Result<bool> {
        match *self {
            KwValue::Bool(b) => Ok(b),
            _ => Err(SpecFitError::keyword(key, "a boolean")),
        }
    }

    pub(crate) fn into_string(self, key: &str) -> Result<String> {
        match self {
            KwValue::Str(s) => Ok(s),
            _ => Err(SpecFitError::keyword(key, "a string")),
        }
    }
}

impl From<bool> for KwValue {
    fn from(v: bool) -> Self {
        KwValue::Bool(v)
    }
}

impl From<i32> for KwValue {
    fn from(v: i32) -> Self {
        KwValue::Int(v as i64)
    }
}

impl From<i64> for KwValue {
    fn from(v: i64) -> Self {
        KwValue::Int(v)
    }
}

impl From<usize> for KwValue {
    fn from(v: usize) -> Self {
        KwValue::Int(v as i64)
    }
}

impl From<f64> for KwValue {
    fn from(v: f64) -> Self {
        KwValue::Float(v)
    }
}

impl From<&str> for KwValue {
    fn from(v: &str) -> Self {
        KwValue::Str(v.to_string())
    }
}

impl From<String> for KwValue {
    fn from(v: String) -> Self {
        KwValue::Str(v)
    }
}

impl From<Vec<f64>> for KwValue {
    fn from(v: Vec<f64>) -> Self {
        KwValue::Floats(v)
    }
}

impl From<&[f64]> for KwValue {
    fn from(v: &[f64]) -> Self {
        KwValue::Floats(v.to_vec())
    }
}

impl From<Vec<bool>> for KwValue {
    fn from(v: Vec<bool>) -> Self {
        KwValue::Bools(v)
    }
}

impl From<Vec<String>> for KwValue {
    fn from(v: Vec<String>) -> Self {
        KwValue::Strs(v)
    }
}

impl From<Vec<&str>> for KwValue {
    fn from(v: Vec<&str>) -> Self {
        KwValue::Strs(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(f64, f64)>> for KwValue {
    fn from(v: Vec<(f64, f64)>) -> Self {
        KwValue::FloatPairs(v)
    }
}

impl From<Vec<(bool, bool)>> for KwValue {
    fn from(v: Vec<(bool, bool)>) -> Self {
        KwValue::BoolPairs(v)
    }
}

/// An ordered collection of keyword options.
///
/// ```
/// use specfit_rs::Kwargs;
///
/// let kwargs = Kwargs::new()
///     .with("npeaks", 2)
///     .with("parvalues", vec![1.0, 0.0, 1.0, 0.5, 3.0, 1.0]);
/// assert_eq!(kwargs.len(), 2);
/// assert!(kwargs.contains("npeaks"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kwargs(BTreeMap<String, KwValue>);

impl Kwargs {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<KwValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<KwValue>) -> Option<KwValue> {
        self.0.insert(key.to_string(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&KwValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a key, returning its value only when it is non-empty.
    pub fn take(&mut self, key: &str) -> Option<KwValue> {
        self.0.remove(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KwValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<KwValue>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
