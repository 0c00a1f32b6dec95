// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use crlab_platform::ExecutionParameters;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::experiments::ExperimentConfig;

const DEFAULT_SHOTS: u32 = 1000;

fn default_platform() -> String {
    "simulator".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizationChange {
    pub field: &'static str,
    pub original: String,
    pub sanitized: String,
    pub reason: String,
}

/// A lab session: where to run, how to acquire and what to sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub execution: ExecutionParameters,
    /// Readout attenuation in dB per qubit.
    #[serde(default)]
    pub readout_attenuation: IndexMap<u32, u32>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub experiment: ExperimentConfig,
}

impl LabConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Repair values that have an obvious replacement, reject the rest.
    pub fn sanitize(&mut self) -> Result<Vec<SanitizationChange>> {
        let mut changes = vec![];
        let relaxation_time = self.execution.relaxation_time;
        if !(relaxation_time.is_finite() && relaxation_time >= 0.0) {
            return Err(Error::Config(format!(
                "relaxation_time must be a non-negative number of ns, got {relaxation_time}"
            )));
        }
        if self.execution.nshots == 0 {
            changes.push(SanitizationChange {
                field: "execution.nshots",
                original: "0".to_string(),
                sanitized: DEFAULT_SHOTS.to_string(),
                reason: "At least one shot is needed.".to_string(),
            });
            self.execution.nshots = DEFAULT_SHOTS;
        }
        if self.output_dir.as_os_str().is_empty() {
            let sanitized = default_output_dir();
            changes.push(SanitizationChange {
                field: "output_dir",
                original: String::new(),
                sanitized: sanitized.display().to_string(),
                reason: "Empty output directory.".to_string(),
            });
            self.output_dir = sanitized;
        }
        Ok(changes)
    }
}
