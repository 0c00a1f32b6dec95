// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter};

use crlab_timeline::{Channel, ChannelKind, PulseRole, QubitId, Timeline};
use crlab_units::Ns;
use serde::Serialize;

use crate::error::Result;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PulseId(pub usize);

impl Display for PulseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    Drive,
    Readout,
}

/// A concrete pulse with absolute amplitude and frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pulse {
    pub serial: PulseId,
    pub kind: PulseKind,
    pub role: PulseRole,
    pub channel: Channel,
    /// Qubit whose frequency is played.
    pub tone: QubitId,
    pub start: Ns,
    pub duration: Ns,
    pub amplitude: f64,
    /// Frequency in Hz.
    pub frequency: f64,
    pub relative_phase: f64,
}

impl Pulse {
    pub fn finish(&self) -> Ns {
        self.start + self.duration
    }

    pub fn qubit(&self) -> QubitId {
        self.channel.qubit
    }

    pub fn is_cross_resonance(&self) -> bool {
        self.kind == PulseKind::Drive && self.tone != self.channel.qubit
    }
}

/// Pulses handed to the platform for one execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PulseSequence {
    pulses: Vec<Pulse>,
}

impl PulseSequence {
    /// Resolve a timeline against the platform's calibration.
    ///
    /// Idle segments produce no pulse. Drive amplitudes are relative to the pi
    /// amplitude of the qubit whose tone is played, so a cross-resonance drive
    /// at amplitude 1 plays the target's pi amplitude on the control line.
    pub fn from_timeline(timeline: &Timeline, platform: &dyn Platform) -> Result<Self> {
        let mut sequence = PulseSequence::default();
        for iv in timeline.iter().filter(|iv| iv.role.is_played()) {
            let tone = iv.tone_qubit();
            let (kind, amplitude, frequency) = match iv.channel.kind {
                ChannelKind::Drive => {
                    let cal = platform.qubit(tone)?;
                    (
                        PulseKind::Drive,
                        iv.amplitude * cal.pi_amplitude,
                        cal.drive_frequency,
                    )
                }
                ChannelKind::Readout => {
                    let cal = platform.qubit(iv.channel.qubit)?;
                    (
                        PulseKind::Readout,
                        iv.amplitude * cal.readout_amplitude,
                        cal.readout_frequency,
                    )
                }
            };
            // the channel's own qubit must exist even for cross-resonance drives
            platform.qubit(iv.channel.qubit)?;
            sequence.push(Pulse {
                serial: PulseId(0),
                kind,
                role: iv.role,
                channel: iv.channel,
                tone,
                start: iv.start,
                duration: iv.duration,
                amplitude,
                frequency,
                relative_phase: iv.relative_phase,
            });
        }
        Ok(sequence)
    }

    /// Append a pulse, assigning the next serial.
    pub fn push(&mut self, mut pulse: Pulse) -> PulseId {
        let serial = PulseId(self.pulses.len());
        pulse.serial = serial;
        self.pulses.push(pulse);
        serial
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn get(&self, serial: PulseId) -> Option<&Pulse> {
        self.pulses.get(serial.0)
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn drive_pulses(&self) -> impl Iterator<Item = &Pulse> {
        self.pulses.iter().filter(|p| p.kind == PulseKind::Drive)
    }

    pub fn readout_pulses(&self) -> impl Iterator<Item = &Pulse> {
        self.pulses.iter().filter(|p| p.kind == PulseKind::Readout)
    }

    pub fn finish(&self) -> Option<Ns> {
        self.pulses.iter().map(Pulse::finish).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatedPlatform;
    use crlab_timeline::{
        AnchorDurations, ExperimentContext, PhasePlan, PhaseSpec, build_timeline,
    };
    use crlab_units::nanoseconds;

    #[test]
    fn test_from_timeline_resolves_calibration() {
        let platform = SimulatedPlatform::with_qubits("simulator", 0..8);
        let (control, target) = (QubitId(5), QubitId(6));
        let plan = PhasePlan::starting_at(nanoseconds(0.0))
            .until(PhaseSpec::cross_resonance(control, target), 200.0)
            .until(PhaseSpec::idle(Channel::drive(target)), 400.0)
            .build()
            .unwrap();
        let anchors = AnchorDurations {
            pi_pulse: nanoseconds(40.0),
            readout: nanoseconds(2000.0),
        };
        let ctx = ExperimentContext::new(anchors, plan).read_out(Channel::readout(target));
        let timeline = build_timeline(&ctx, 300.0).unwrap();
        let sequence = PulseSequence::from_timeline(&timeline, &platform).unwrap();

        assert_eq!(sequence.len(), 2);
        let cr = &sequence.pulses()[0];
        assert!(cr.is_cross_resonance());
        assert_eq!(cr.frequency, platform.qubit(target).unwrap().drive_frequency);
        assert_eq!(cr.qubit(), control);
        let ro = sequence.readout_pulses().next().unwrap();
        assert_eq!(ro.serial, PulseId(1));
        assert_eq!(ro.start, nanoseconds(300.0));
        assert_eq!(sequence.finish(), Some(nanoseconds(2300.0)));
    }

    #[test]
    fn test_unknown_qubit_is_rejected() {
        let platform = SimulatedPlatform::with_qubits("simulator", 0..2);
        let plan = PhasePlan::starting_at(nanoseconds(0.0))
            .until(PhaseSpec::drive(Channel::drive(QubitId(7))), 40.0)
            .build()
            .unwrap();
        let anchors = AnchorDurations {
            pi_pulse: nanoseconds(40.0),
            readout: nanoseconds(2000.0),
        };
        let timeline = build_timeline(&ExperimentContext::new(anchors, plan), 20.0).unwrap();
        assert!(PulseSequence::from_timeline(&timeline, &platform).is_err());
    }
}
