//! Tied parameters.
//!
//! Tie expressions are parsed once per solve and applied in a single pass in
//! index order, each seeing the values produced by the ties before it.

use ndarray::Array1;
use std::collections::HashMap;

use crate::parameters::{Expression, ExpressionError, ParInfoTable, ParameterContext};

/// Parsed tie expressions of a descriptor table.
#[derive(Debug, Clone, Default)]
pub struct TieSet {
    ties: Vec<(usize, Expression)>,
    names: HashMap<String, usize>,
}

impl TieSet {
    pub fn from_parinfo(parinfo: &ParInfoTable) -> Result<Self, ExpressionError> {
        let ties = parinfo
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_tied())
            .map(|(i, p)| Ok((i, Expression::parse(&p.tied)?)))
            .collect::<Result<Vec<_>, ExpressionError>>()?;

        Ok(Self {
            ties,
            names: parinfo.name_index(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ties.len()
    }

    /// Overwrite every tied entry of `values` with its expression.
    pub fn apply(&self, values: &mut [f64]) -> Result<(), ExpressionError> {
        for (index, expr) in &self.ties {
            let value = expr.evaluate(&ParameterContext::new(values, &self.names))?;
            match values.get_mut(*index) {
                Some(slot) => *slot = value,
                None => {
                    return Err(ExpressionError::IndexOutOfRange {
                        index: *index,
                        len: values.len(),
                    })
                }
            }
        }
        Ok(())
    }

    /// [`apply`](Self::apply) on an owned array.
    pub fn applied(&self, params: &Array1<f64>) -> Result<Array1<f64>, ExpressionError> {
        if self.ties.is_empty() {
            return Ok(params.clone());
        }
        let mut values = params.to_vec();
        self.apply(&mut values)?;
        Ok(Array1::from(values))
    }
}
