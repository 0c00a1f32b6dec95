// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Measured series on disk.
//!
//! A record is written as one JSON document plus one flat JSON array per
//! series (and one for the sweep axis) so single columns can be loaded
//! without parsing the whole record.

use std::path::{Path, PathBuf};

use crlab_platform::ExecutionParameters;
use crlab_timeline::normalize::normalize_pair;
use crlab_timeline::series::stack_columns;
use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::experiments::SweepParameter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub experiment: String,
    pub platform: String,
    /// What the axis values stand for.
    #[serde(default)]
    pub parameter: SweepParameter,
    pub execution: ExecutionParameters,
    pub axis: Vec<f64>,
    pub segment_lens: Vec<usize>,
    /// Axis indices repeating the last point of the previous sub-range.
    pub coincident_boundaries: Vec<usize>,
    /// Readout magnitudes keyed `<run>_q<qubit>`.
    pub series: IndexMap<String, Vec<f64>>,
}

/// Two series scaled to `[-1, 1]` by their combined extrema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPair {
    pub labels: [String; 2],
    pub min: f64,
    pub max: f64,
    pub axis: Vec<f64>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl ExperimentRecord {
    pub fn series(&self, label: &str) -> Result<ArrayView1<'_, f64>> {
        self.series
            .get(label)
            .map(|values| ArrayView1::from(values.as_slice()))
            .ok_or_else(|| {
                let known: Vec<_> = self.series.keys().map(String::as_str).collect();
                Error::Config(format!(
                    "no series '{label}' in record, expected one of: {}",
                    known.join(", ")
                ))
            })
    }

    /// The axis followed by every series as columns.
    pub fn table(&self) -> Result<Array2<f64>> {
        let mut columns = vec![("axis", ArrayView1::from(self.axis.as_slice()))];
        for (label, values) in &self.series {
            columns.push((label.as_str(), ArrayView1::from(values.as_slice())));
        }
        Ok(stack_columns(&columns)?)
    }

    pub fn normalized(&self, first: &str, second: &str) -> Result<NormalizedPair> {
        let (a, b, (min, max)) = normalize_pair(self.series(first)?, self.series(second)?)?;
        Ok(NormalizedPair {
            labels: [first.to_string(), second.to_string()],
            min,
            max,
            axis: self.axis.clone(),
            first: a.to_vec(),
            second: b.to_vec(),
        })
    }
}

/// Write `record` under `dir` and return the path of the record document.
pub fn save(record: &ExperimentRecord, dir: &Path) -> Result<PathBuf> {
    // refuse to write ragged columns
    record.table()?;
    std::fs::create_dir_all(dir)?;

    let write = |name: String, json: String| -> Result<PathBuf> {
        let path = dir.join(format!("{name}.json"));
        std::fs::write(&path, json)?;
        Ok(path)
    };
    let name = &record.experiment;
    write(format!("{name}_axis"), serde_json::to_string(&record.axis)?)?;
    for (label, values) in &record.series {
        write(format!("{name}_{label}"), serde_json::to_string(values)?)?;
    }
    write(name.clone(), serde_json::to_string_pretty(record)?)
}

pub fn load(path: &Path) -> Result<ExperimentRecord> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExperimentRecord {
        let mut series = IndexMap::new();
        series.insert("gnd_q3".to_string(), vec![60000.0, 58000.0, 59000.0]);
        series.insert("exc_q3".to_string(), vec![52000.0, 56000.0, 54000.0]);
        ExperimentRecord {
            experiment: "corrected_cross_resonance".to_string(),
            platform: "simulator".to_string(),
            parameter: SweepParameter::Duration,
            execution: ExecutionParameters::default(),
            axis: vec![0.0, 50.0, 100.0],
            segment_lens: vec![3],
            coincident_boundaries: vec![],
            series,
        }
    }

    #[test]
    fn test_table_columns() {
        let table = record().table().unwrap();
        assert_eq!(table.dim(), (3, 3));
        assert_eq!(table[[1, 0]], 50.0);
        assert_eq!(table[[2, 2]], 54000.0);
    }

    #[test]
    fn test_ragged_record_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut ragged = record();
        ragged.series.insert("exc_q2".to_string(), vec![1.0]);
        assert!(save(&ragged, dir.path()).is_err());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = save(&record(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("corrected_cross_resonance.json"));
        assert_eq!(load(&path).unwrap(), record());

        let column = std::fs::read_to_string(dir.path().join("corrected_cross_resonance_exc_q3.json"))
            .unwrap();
        let values: Vec<f64> = serde_json::from_str(&column).unwrap();
        assert_eq!(values, vec![52000.0, 56000.0, 54000.0]);
    }

    #[test]
    fn test_normalized_pair() {
        let pair = record().normalized("gnd_q3", "exc_q3").unwrap();
        assert_eq!((pair.min, pair.max), (52000.0, 60000.0));
        assert_eq!(pair.first[0], 1.0);
        assert_eq!(pair.second[0], -1.0);
        assert!(matches!(
            record().normalized("gnd_q3", "exc_q9"),
            Err(Error::Config(_))
        ));
    }
}
