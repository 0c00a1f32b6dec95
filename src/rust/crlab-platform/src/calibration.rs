// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_timeline::AnchorDurations;
use crlab_units::{Ns, nanoseconds};
use serde::{Deserialize, Serialize};

/// Calibrated pulse parameters of one qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitCalibration {
    pub pi_duration: Ns,
    pub pi_amplitude: f64,
    /// Drive frequency in Hz.
    pub drive_frequency: f64,
    pub readout_duration: Ns,
    pub readout_amplitude: f64,
    /// Readout frequency in Hz.
    pub readout_frequency: f64,
    /// Readout line attenuation in dB.
    pub readout_attenuation: Option<u32>,
}

impl QubitCalibration {
    pub fn anchors(&self) -> AnchorDurations {
        AnchorDurations {
            pi_pulse: self.pi_duration,
            readout: self.readout_duration,
        }
    }

    /// Duration of a pi/2 rotation at the calibrated amplitude.
    pub fn half_pi_duration(&self) -> Ns {
        self.pi_duration / 2.0
    }

    /// Rotation rate in rad/ns per unit of absolute amplitude.
    pub fn rabi_rate(&self) -> f64 {
        std::f64::consts::PI / (self.pi_amplitude * self.pi_duration.value())
    }
}

impl Default for QubitCalibration {
    fn default() -> Self {
        QubitCalibration {
            pi_duration: nanoseconds(40.0),
            pi_amplitude: 0.5,
            drive_frequency: 4.5e9,
            readout_duration: nanoseconds(2000.0),
            readout_amplitude: 0.9,
            readout_frequency: 7.0e9,
            readout_attenuation: None,
        }
    }
}
