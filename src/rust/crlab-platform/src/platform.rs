// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_timeline::QubitId;
use indexmap::IndexMap;
use serde::Serialize;

use crate::calibration::QubitCalibration;
use crate::error::{Error, Result};
use crate::execution::ExecutionParameters;
use crate::sequence::{PulseId, PulseSequence};

/// Averaged IQ result of one readout pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub i: f64,
    pub q: f64,
}

impl Measurement {
    pub fn magnitude(&self) -> f64 {
        self.i.hypot(self.q)
    }

    pub fn phase(&self) -> f64 {
        self.q.atan2(self.i)
    }
}

/// A control stack able to play pulse sequences on qubits.
///
/// Connections are exclusive: one caller connects, executes sequentially and
/// disconnects.
pub trait Platform {
    fn name(&self) -> &str;

    fn connect(&mut self) -> Result<()>;

    fn disconnect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    fn qubits(&self) -> Vec<QubitId>;

    fn qubit(&self, qubit: QubitId) -> Result<&QubitCalibration>;

    fn set_readout_attenuation(&mut self, qubit: QubitId, attenuation: u32) -> Result<()>;

    /// Play `sequence` and return one measurement per readout pulse.
    fn execute(
        &mut self,
        sequence: &PulseSequence,
        options: &ExecutionParameters,
    ) -> Result<IndexMap<PulseId, Measurement>>;
}

/// Look up the measurement of a readout pulse.
pub fn measurement_of(
    results: &IndexMap<PulseId, Measurement>,
    serial: PulseId,
) -> Result<Measurement> {
    results
        .get(&serial)
        .copied()
        .ok_or(Error::MissingMeasurement(serial))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_magnitude() {
        let m = Measurement { i: 3.0, q: 4.0 };
        assert_eq!(m.magnitude(), 5.0);
        assert!((Measurement { i: 0.0, q: 1.0 }.phase() - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn test_missing_measurement() {
        let results = IndexMap::new();
        assert!(matches!(
            measurement_of(&results, PulseId(3)),
            Err(Error::MissingMeasurement(PulseId(3)))
        ));
    }
}
