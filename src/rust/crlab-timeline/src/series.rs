// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{Error, Result};

/// Measured magnitudes of one readout, indexed like the sweep axis.
///
/// The series is allocated to the full sweep length up front and every index
/// is written exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSeries {
    label: String,
    values: Vec<Option<f64>>,
}

impl ResultSeries {
    pub fn new(label: impl Into<String>, len: usize) -> Self {
        ResultSeries {
            label: label.into(),
            values: vec![None; len],
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn record(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.values.len();
        let slot = self.values.get_mut(index).ok_or_else(|| {
            Error::new(format!(
                "Sweep index {index} is outside series '{}' of length {len}.",
                self.label
            ))
        })?;
        if slot.is_some() {
            return Err(Error::AlreadyRecorded {
                label: self.label.clone(),
                index,
            });
        }
        *slot = Some(value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing() == 0
    }

    pub fn to_array(&self) -> Result<Array1<f64>> {
        let values: Option<Vec<f64>> = self.values.iter().copied().collect();
        values.map(Array1::from_vec).ok_or_else(|| Error::Incomplete {
            label: self.label.clone(),
            missing: self.missing(),
            len: self.len(),
        })
    }
}

/// Build a table with one column per labelled vector.
pub fn stack_columns(columns: &[(&str, ArrayView1<'_, f64>)]) -> Result<Array2<f64>> {
    let Some((_, first)) = columns.first() else {
        return Err(Error::EmptyInput("column"));
    };
    let expected = first.len();
    if let Some((label, column)) = columns.iter().find(|(_, c)| c.len() != expected) {
        return Err(Error::LengthMismatch {
            label: label.to_string(),
            expected,
            found: column.len(),
        });
    }
    let views: Vec<_> = columns.iter().map(|(_, c)| c.view()).collect();
    ndarray::stack(Axis(1), &views).map_err(Error::new)
}
