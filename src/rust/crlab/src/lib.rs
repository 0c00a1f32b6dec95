// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Cross-resonance and pulse-reversal experiments driven through a control platform.

pub mod config;
pub mod error;
pub mod experiments;
pub mod persist;
pub mod runner;

pub use crate::config::LabConfig;
pub use crate::error::{Error, Result};
pub use crate::experiments::{ExperimentConfig, ExperimentPlan, Run, SweepParameter};
pub use crate::persist::ExperimentRecord;
pub use crate::runner::run_experiment;
