// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Cross-resonance sweeps: a drive on the control's line at the target's tone,
//! swept in duration with the control in the ground (`gnd`) and excited (`exc`)
//! state.

use crlab_platform::Platform;
use crlab_timeline::{
    AnchorDurations, Channel, ConcurrentPulse, PhasePlan, PhaseSpec, QubitId, Readout,
    SegmentedAxis, SubRange,
};
use crlab_units::nanoseconds;
use serde::{Deserialize, Serialize};

use super::{Experiment, ExperimentPlan, SweepParameter, control_state_runs};
use crate::error::{Error, Result};

fn unit_amplitude() -> f64 {
    1.0
}

/// Preparation pulses play on the control, readouts on the target.
fn cross_resonance_anchors(
    platform: &dyn Platform,
    control: QubitId,
    target: QubitId,
) -> Result<AnchorDurations> {
    Ok(AnchorDurations {
        pi_pulse: platform.qubit(control)?.pi_duration,
        readout: platform.qubit(target)?.readout_duration,
    })
}

/// Cross-resonance drive interrupted by pi pulses on the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertedCrossResonance {
    pub control: u32,
    pub target: u32,
    /// Sweep coordinates at which an inversion of the target starts.
    pub inversions: Vec<f64>,
    pub stop: f64,
    pub step: f64,
    #[serde(default = "unit_amplitude")]
    pub amplitude: f64,
    /// Relative amplitude of the inversions, shortened by the same factor.
    #[serde(default = "unit_amplitude")]
    pub inversion_amplitude: f64,
}

impl Experiment for InvertedCrossResonance {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        if !(self.inversion_amplitude.is_finite() && self.inversion_amplitude > 0.0) {
            return Err(Error::Config(format!(
                "inversion_amplitude must be positive, got {}",
                self.inversion_amplitude
            )));
        }
        let (control, target) = (QubitId(self.control), QubitId(self.target));
        let anchors = cross_resonance_anchors(platform, control, target)?;
        let inversion = platform.qubit(target)?.pi_duration / self.inversion_amplitude;
        let drive = PhaseSpec::cross_resonance(control, target).amplitude(self.amplitude);
        let invert =
            PhaseSpec::inversion(Channel::drive(target)).amplitude(self.inversion_amplitude);

        let mut builder = PhasePlan::starting_at(nanoseconds(0.0));
        let mut ranges = vec![];
        let mut cursor = 0.0;
        for &start in &self.inversions {
            let finish = (nanoseconds(start) + inversion).value();
            ranges.push(SubRange::arange(cursor, start, self.step));
            ranges.push(SubRange::arange(start, finish, self.step));
            builder = builder
                .until(drive.clone(), start)
                .then(invert.clone(), inversion);
            cursor = finish;
        }
        ranges.push(SubRange::arange(cursor, self.stop, self.step));
        let plan = builder.until(drive, self.stop).build()?;

        Ok(ExperimentPlan {
            name: "inverted_cross_resonance".to_string(),
            parameter: SweepParameter::Duration,
            axis: SegmentedAxis::from_ranges(&ranges)?,
            runs: control_state_runs(
                anchors,
                plan,
                control,
                &[Readout::new(Channel::readout(target))],
            ),
        })
    }
}

/// Simultaneous cross-resonance drives from one control to several targets,
/// followed by an idle stretch.
///
/// The targets are read out as soon as the drives stop; only the control
/// readout moves through the idle stretch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossResonanceIdle {
    pub control: u32,
    pub targets: Vec<u32>,
    /// Sweep coordinate at which the drives stop.
    pub idle_start: f64,
    pub stop: f64,
    pub step: f64,
    #[serde(default = "unit_amplitude")]
    pub amplitude: f64,
}

impl Experiment for CrossResonanceIdle {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        let control = QubitId(self.control);
        let Some((first, others)) = self.targets.split_first() else {
            return Err(Error::Config(
                "cross_resonance_idle needs at least one target".to_string(),
            ));
        };
        let anchors = cross_resonance_anchors(platform, control, QubitId(*first))?;

        let mut drive =
            PhaseSpec::cross_resonance(control, QubitId(*first)).amplitude(self.amplitude);
        for target in others {
            drive = drive.with_concurrent(
                ConcurrentPulse::new(Channel::drive(control), self.amplitude)
                    .tone(QubitId(*target)),
            );
        }
        let plan = PhasePlan::starting_at(nanoseconds(0.0))
            .until(drive, self.idle_start)
            .until(PhaseSpec::idle(Channel::drive(control)), self.stop)
            .build()?;
        let axis = SegmentedAxis::from_ranges(&[
            SubRange::arange(0.0, self.idle_start, self.step),
            SubRange::arange(self.idle_start, self.stop, self.step),
        ])?;

        let mut readout = vec![Readout::new(Channel::readout(control))];
        readout.extend(
            self.targets
                .iter()
                .map(|t| Readout::new(Channel::readout(*t)).after_phase(0)),
        );
        Ok(ExperimentPlan {
            name: "cross_resonance_idle".to_string(),
            parameter: SweepParameter::Duration,
            axis,
            runs: control_state_runs(anchors, plan, control, &readout),
        })
    }
}

/// A pulse played alongside the cross-resonance drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    /// Qubit whose drive line plays the correction.
    pub qubit: u32,
    /// Qubit whose frequency is played, the line's own qubit by default.
    #[serde(default)]
    pub tone: Option<u32>,
    pub amplitude: f64,
    #[serde(default)]
    pub relative_phase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedCrossResonance {
    pub control: u32,
    pub target: u32,
    pub stop: f64,
    pub step: f64,
    #[serde(default = "unit_amplitude")]
    pub amplitude: f64,
    pub correction: Correction,
}

impl Experiment for CorrectedCrossResonance {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        let (control, target) = (QubitId(self.control), QubitId(self.target));
        let anchors = cross_resonance_anchors(platform, control, target)?;

        let mut correction = ConcurrentPulse::new(
            Channel::drive(self.correction.qubit),
            self.correction.amplitude,
        )
        .relative_phase(self.correction.relative_phase);
        if let Some(tone) = self.correction.tone {
            correction = correction.tone(QubitId(tone));
        }
        let drive = PhaseSpec::cross_resonance(control, target)
            .amplitude(self.amplitude)
            .with_concurrent(correction);
        let plan = PhasePlan::starting_at(nanoseconds(0.0))
            .until(drive, self.stop)
            .build()?;

        Ok(ExperimentPlan {
            name: "corrected_cross_resonance".to_string(),
            parameter: SweepParameter::Duration,
            axis: SegmentedAxis::from_ranges(&[SubRange::arange(0.0, self.stop, self.step)])?,
            runs: control_state_runs(
                anchors,
                plan,
                control,
                &[Readout::new(Channel::readout(target))],
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crlab_platform::SimulatedPlatform;
    use crlab_timeline::{PulseRole, build_timeline};

    fn platform() -> SimulatedPlatform {
        SimulatedPlatform::with_qubits("simulator", 0..8)
    }

    #[test]
    fn test_inverted_cross_resonance_layout() {
        let experiment = InvertedCrossResonance {
            control: 5,
            target: 6,
            inversions: vec![160.0],
            stop: 1000.0,
            step: 20.0,
            amplitude: 1.0,
            inversion_amplitude: 1.0,
        };
        let plan = experiment.plan(&platform()).unwrap();
        // [0, 160), [160, 200), [200, 1000)
        assert_eq!(plan.axis.segment_lens(), vec![8, 2, 40]);
        assert_eq!(plan.runs.len(), 2);

        let gnd = &plan.runs[0].context;
        assert_eq!(gnd.origin(), nanoseconds(45.0));
        let timeline = build_timeline(gnd, 180.0).unwrap();
        let roles: Vec<_> = timeline.iter().map(|iv| iv.role).collect();
        assert_eq!(
            roles,
            vec![PulseRole::Drive, PulseRole::Inversion, PulseRole::Readout]
        );
        let inversion = &timeline.intervals()[1];
        assert_eq!(inversion.channel, Channel::drive(6));
        assert_eq!(inversion.start, nanoseconds(205.0));
        assert_eq!(inversion.duration, nanoseconds(20.0));

        let exc = build_timeline(&plan.runs[1].context, 180.0).unwrap();
        assert_eq!(exc.intervals()[0].role, PulseRole::Inversion);
        assert_eq!(exc.intervals()[0].channel, Channel::drive(5));
        assert_eq!(exc.len(), timeline.len() + 1);
    }

    #[test]
    fn test_inversion_at_origin_is_rejected() {
        let experiment = InvertedCrossResonance {
            control: 5,
            target: 6,
            inversions: vec![0.0],
            stop: 1000.0,
            step: 20.0,
            amplitude: 1.0,
            inversion_amplitude: 1.0,
        };
        assert!(experiment.plan(&platform()).is_err());
    }

    #[test]
    fn test_idle_reads_out_every_qubit() {
        let experiment = CrossResonanceIdle {
            control: 2,
            targets: vec![0, 1],
            idle_start: 15000.0,
            stop: 25000.0,
            step: 5000.0,
            amplitude: 1.0,
        };
        let plan = experiment.plan(&platform()).unwrap();
        assert_eq!(plan.axis.segment_lens(), vec![3, 2]);
        let readout: Vec<_> = plan.runs[0].readout_qubits().collect();
        assert_eq!(readout, vec![QubitId(2), QubitId(0), QubitId(1)]);

        let timeline = build_timeline(&plan.runs[0].context, 20000.0).unwrap();
        let drives: Vec<_> = timeline.with_role(PulseRole::Drive).collect();
        assert_eq!(drives.len(), 2);
        assert!(drives.iter().all(|iv| iv.duration == nanoseconds(15000.0)));
        assert_eq!(timeline.with_role(PulseRole::Readout).count(), 3);
    }

    #[test]
    fn test_idle_keeps_target_readouts_at_drive_finish() {
        let experiment = CrossResonanceIdle {
            control: 2,
            targets: vec![0, 1],
            idle_start: 15000.0,
            stop: 25000.0,
            step: 5000.0,
            amplitude: 1.0,
        };
        let plan = experiment.plan(&platform()).unwrap();
        for run in &plan.runs {
            let timeline = build_timeline(&run.context, 20000.0).unwrap();
            let drive_finish = timeline
                .with_role(PulseRole::Drive)
                .find(|iv| !iv.concurrent)
                .unwrap()
                .finish();
            assert_eq!(drive_finish, nanoseconds(15045.0));
            for ro in timeline.with_role(PulseRole::Readout) {
                let expected = if ro.channel == Channel::readout(2) {
                    nanoseconds(20045.0)
                } else {
                    drive_finish
                };
                assert_eq!(ro.start, expected, "{}", ro.channel);
            }
        }

        // while the drives play every readout follows them
        let timeline = build_timeline(&plan.runs[1].context, 10000.0).unwrap();
        assert!(
            timeline
                .with_role(PulseRole::Readout)
                .all(|ro| ro.start == nanoseconds(10045.0))
        );
    }

    #[test]
    fn test_strong_inversion_is_shortened() {
        let experiment = InvertedCrossResonance {
            control: 5,
            target: 6,
            inversions: vec![300.0],
            stop: 1000.0,
            step: 20.0,
            amplitude: 1.0,
            inversion_amplitude: 2.0,
        };
        let plan = experiment.plan(&platform()).unwrap();
        let context = &plan.runs[0].context;
        let inversion = &context.plan.phases()[1];
        assert_eq!(inversion.amplitude, 2.0);
        assert_eq!(context.plan.phase_length(1), nanoseconds(20.0));
        // [0, 300), [300, 320), [320, 1000)
        assert_eq!(plan.axis.segment_lens(), vec![15, 1, 34]);

        let bad = InvertedCrossResonance {
            inversion_amplitude: 0.0,
            ..experiment
        };
        assert!(matches!(bad.plan(&platform()), Err(Error::Config(_))));
    }

    #[test]
    fn test_idle_needs_a_target() {
        let experiment = CrossResonanceIdle {
            control: 2,
            targets: vec![],
            idle_start: 100.0,
            stop: 200.0,
            step: 10.0,
            amplitude: 1.0,
        };
        assert!(matches!(
            experiment.plan(&platform()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_correction_follows_drive_length() {
        let experiment = CorrectedCrossResonance {
            control: 2,
            target: 3,
            stop: 5000.0,
            step: 50.0,
            amplitude: 1.0,
            correction: Correction {
                qubit: 3,
                tone: None,
                amplitude: 0.1,
                relative_phase: std::f64::consts::PI,
            },
        };
        let plan = experiment.plan(&platform()).unwrap();
        assert_eq!(plan.axis.len(), 100);
        let timeline = build_timeline(&plan.runs[1].context, 250.0).unwrap();
        let correction = timeline.iter().find(|iv| iv.concurrent).unwrap();
        assert_eq!(correction.channel, Channel::drive(3));
        assert_eq!(correction.duration, nanoseconds(250.0));
        assert_eq!(correction.amplitude, 0.1);
    }
}
