// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! A deterministic stand-in for a control stack.
//!
//! Every qubit is tracked as a rotation angle about X. Drives at a qubit's own
//! tone rotate it at its calibrated Rabi rate; a drive on a control line at a
//! target's tone rotates the target at a reduced cross-resonance rate whose
//! sign depends on whether the control is excited, plus an optional direct
//! term that does not. Only the part of a pulse
//! that plays before a readout starts affects that readout.

use std::collections::HashMap;

use crlab_log::diagnostic;
use crlab_timeline::QubitId;
use indexmap::IndexMap;

use crate::calibration::QubitCalibration;
use crate::error::{Error, Result};
use crate::execution::{AcquisitionType, ExecutionParameters};
use crate::platform::{Measurement, Platform};
use crate::sequence::{Pulse, PulseId, PulseSequence};

/// Readout levels of a simulated qubit.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedQubit {
    pub calibration: QubitCalibration,
    pub ground_magnitude: f64,
    pub excited_magnitude: f64,
    /// Angle of the IQ point in radians.
    pub iq_angle: f64,
}

impl SimulatedQubit {
    fn new(index: u32) -> Self {
        let offset = f64::from(index);
        SimulatedQubit {
            calibration: QubitCalibration {
                drive_frequency: 4.5e9 + 0.1e9 * offset,
                readout_frequency: 7.0e9 + 0.05e9 * offset,
                ..QubitCalibration::default()
            },
            ground_magnitude: 6.0e4,
            excited_magnitude: 5.2e4,
            iq_angle: 0.3 + 0.1 * offset,
        }
    }
}

pub struct SimulatedPlatform {
    name: String,
    qubits: IndexMap<QubitId, SimulatedQubit>,
    cross_resonance_factor: f64,
    direct_factor: f64,
    connected: bool,
    executions: usize,
}

impl SimulatedPlatform {
    pub fn new(name: impl Into<String>) -> Self {
        SimulatedPlatform {
            name: name.into(),
            qubits: IndexMap::new(),
            cross_resonance_factor: 0.05,
            direct_factor: 0.0,
            connected: false,
            executions: 0,
        }
    }

    pub fn with_qubits(name: impl Into<String>, qubits: impl IntoIterator<Item = u32>) -> Self {
        let mut platform = Self::new(name);
        for index in qubits {
            platform.add_qubit(QubitId(index), SimulatedQubit::new(index));
        }
        platform
    }

    pub fn add_qubit(&mut self, qubit: QubitId, simulated: SimulatedQubit) {
        self.qubits.insert(qubit, simulated);
    }

    /// Ratio of the cross-resonance rate to the direct Rabi rate of the target.
    pub fn set_cross_resonance_factor(&mut self, factor: f64) {
        self.cross_resonance_factor = factor;
    }

    /// Ratio of the control-independent part of a cross-resonance drive to the
    /// direct Rabi rate of the target.
    pub fn set_direct_factor(&mut self, factor: f64) {
        self.direct_factor = factor;
    }

    /// Number of sequences played so far.
    pub fn executions(&self) -> usize {
        self.executions
    }

    fn simulated(&self, qubit: QubitId) -> Result<&SimulatedQubit> {
        self.qubits.get(&qubit).ok_or(Error::UnknownQubit(qubit))
    }

    /// Rotation angles of all qubits just before `until`.
    fn angles_at(&self, drives: &[&Pulse], until: f64) -> Result<HashMap<QubitId, f64>> {
        let mut angles: HashMap<QubitId, f64> = HashMap::new();
        for pulse in drives {
            let start = pulse.start.value();
            let effective = pulse.finish().value().min(until) - start;
            if effective <= 0.0 {
                continue;
            }
            let rate = self.simulated(pulse.tone)?.calibration.rabi_rate();
            let rotation = rate * pulse.amplitude * effective * pulse.relative_phase.cos();
            if pulse.is_cross_resonance() {
                let control = angles.get(&pulse.qubit()).copied().unwrap_or(0.0);
                let sign = if excited_population(control) > 0.5 {
                    -1.0
                } else {
                    1.0
                };
                *angles.entry(pulse.tone).or_default() +=
                    (self.direct_factor + sign * self.cross_resonance_factor) * rotation;
            } else {
                *angles.entry(pulse.tone).or_default() += rotation;
            }
        }
        Ok(angles)
    }
}

fn excited_population(angle: f64) -> f64 {
    (angle / 2.0).sin().powi(2)
}

impl Platform for SimulatedPlatform {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::new(format!(
                "Platform '{}' is already connected.",
                self.name
            )));
        }
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn qubits(&self) -> Vec<QubitId> {
        self.qubits.keys().copied().collect()
    }

    fn qubit(&self, qubit: QubitId) -> Result<&QubitCalibration> {
        Ok(&self.simulated(qubit)?.calibration)
    }

    fn set_readout_attenuation(&mut self, qubit: QubitId, attenuation: u32) -> Result<()> {
        let simulated = self
            .qubits
            .get_mut(&qubit)
            .ok_or(Error::UnknownQubit(qubit))?;
        simulated.calibration.readout_attenuation = Some(attenuation);
        Ok(())
    }

    fn execute(
        &mut self,
        sequence: &PulseSequence,
        options: &ExecutionParameters,
    ) -> Result<IndexMap<PulseId, Measurement>> {
        if !self.connected {
            return Err(Error::NotConnected(self.name.clone()));
        }
        options.validate()?;
        let mut drives: Vec<&Pulse> = sequence.drive_pulses().collect();
        drives.sort_by(|a, b| a.start.cmp(&b.start));

        let mut results = IndexMap::new();
        for readout in sequence.readout_pulses() {
            let angles = self.angles_at(&drives, readout.start.value())?;
            let qubit = readout.qubit();
            let simulated = self.simulated(qubit)?;
            let population = excited_population(angles.get(&qubit).copied().unwrap_or(0.0));
            let measurement = match options.acquisition_type {
                AcquisitionType::Discrimination => Measurement {
                    i: population,
                    q: 0.0,
                },
                AcquisitionType::Raw | AcquisitionType::Integration => {
                    let magnitude = simulated.ground_magnitude
                        + (simulated.excited_magnitude - simulated.ground_magnitude) * population;
                    Measurement {
                        i: magnitude * simulated.iq_angle.cos(),
                        q: magnitude * simulated.iq_angle.sin(),
                    }
                }
            };
            results.insert(readout.serial, measurement);
        }
        self.executions += 1;
        diagnostic!(
            "Executed sequence of {} pulses ({} shots)",
            sequence.len(),
            options.nshots
        );
        Ok(results)
    }
}
