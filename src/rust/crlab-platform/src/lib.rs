// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Boundary to the quantum control platform that plays pulse sequences.

pub mod calibration;
pub mod error;
pub mod execution;
pub mod platform;
pub mod registry;
pub mod sequence;
pub mod session;
pub mod simulator;

pub use crate::calibration::QubitCalibration;
pub use crate::error::{Error, Result};
pub use crate::execution::{AcquisitionType, AveragingMode, ExecutionParameters};
pub use crate::platform::{Measurement, Platform, measurement_of};
pub use crate::registry::{available_platforms, create_platform};
pub use crate::sequence::{Pulse, PulseId, PulseKind, PulseSequence};
pub use crate::session::Session;
pub use crate::simulator::SimulatedPlatform;
