// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionType {
    /// Raw traces.
    Raw,
    /// Demodulated and integrated IQ values.
    #[default]
    Integration,
    /// Thresholded state assignment.
    Discrimination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragingMode {
    /// Averaged over shots, one shot sequence after the other.
    #[default]
    Sequential,
    /// Averaged over shots, interleaving the sequence points.
    Cyclic,
    /// Every shot returned individually.
    Singleshot,
}

/// How a pulse sequence is executed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionParameters {
    pub nshots: u32,
    /// Wait between shots in nanoseconds.
    pub relaxation_time: f64,
    pub acquisition_type: AcquisitionType,
    pub averaging_mode: AveragingMode,
}

impl Default for ExecutionParameters {
    fn default() -> Self {
        ExecutionParameters {
            nshots: 1000,
            relaxation_time: 200e3,
            acquisition_type: AcquisitionType::Integration,
            averaging_mode: AveragingMode::Sequential,
        }
    }
}

impl ExecutionParameters {
    pub fn validate(&self) -> Result<()> {
        if self.nshots == 0 {
            return Err(Error::InvalidParameters(
                "at least one shot is required".to_string(),
            ));
        }
        if !(self.relaxation_time.is_finite() && self.relaxation_time >= 0.0) {
            return Err(Error::InvalidParameters(format!(
                "relaxation time must be a non-negative number of ns, got {}",
                self.relaxation_time
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let opts: ExecutionParameters = serde_json::from_str(r#"{"nshots": 200}"#).unwrap();
        assert_eq!(opts.nshots, 200);
        assert_eq!(opts.relaxation_time, 200e3);
        assert_eq!(opts.acquisition_type, AcquisitionType::Integration);
        assert_eq!(opts.averaging_mode, AveragingMode::Sequential);
    }

    #[test]
    fn test_validate() {
        assert!(ExecutionParameters::default().validate().is_ok());
        let zero_shots = ExecutionParameters {
            nshots: 0,
            ..Default::default()
        };
        assert!(zero_shots.validate().is_err());
        let negative = ExecutionParameters {
            relaxation_time: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
