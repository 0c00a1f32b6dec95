// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-qubit sequences of drives and idles, sampled with a fixed number of
//! points per stretch so the readout walks through every pulse.

use crlab_platform::Platform;
use crlab_timeline::{Channel, ExperimentContext, PhasePlan, PhaseSpec, QubitId, SegmentedAxis, SubRange};
use crlab_units::{Ns, nanoseconds};
use serde::{Deserialize, Serialize};

use super::{Experiment, ExperimentPlan, Run, SweepParameter};
use crate::error::{Error, Result};

/// Lay phases end to end from `start`, sampling each with its own point count.
fn linspace_layout(
    start: f64,
    stretches: Vec<(PhaseSpec, Ns, usize)>,
) -> Result<(PhasePlan, SegmentedAxis)> {
    let mut builder = PhasePlan::starting_at(nanoseconds(start));
    let mut ranges = Vec::with_capacity(stretches.len());
    let mut cut = nanoseconds(start);
    for (phase, length, points) in stretches {
        let next = cut + length;
        ranges.push(SubRange::linspace(cut.value(), next.value(), points));
        builder = builder.until(phase, next.value());
        cut = next;
    }
    Ok((builder.build()?, SegmentedAxis::from_ranges(&ranges)?))
}

/// Two pi/2 drives at a scaled amplitude, separated and surrounded by idles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseReversal {
    pub qubit: u32,
    pub idle: f64,
    /// Amplitude multiplier; the drives are shortened by the same factor.
    pub amplitude_coeff: f64,
    pub idle_points: usize,
    pub pulse_points: usize,
    /// Play the second drive with negated amplitude.
    #[serde(default)]
    pub reverse: bool,
}

impl Experiment for PulseReversal {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        if !(self.amplitude_coeff.is_finite() && self.amplitude_coeff > 0.0) {
            return Err(Error::Config(format!(
                "amplitude_coeff must be positive, got {}",
                self.amplitude_coeff
            )));
        }
        let qubit = QubitId(self.qubit);
        let calibration = platform.qubit(qubit)?;
        let pulse = calibration.half_pi_duration() / self.amplitude_coeff;
        let idle = nanoseconds(self.idle);
        let line = Channel::drive(qubit);

        let drive = PhaseSpec::drive(line).amplitude(self.amplitude_coeff);
        let second = if self.reverse {
            PhaseSpec::echo(line).amplitude(-self.amplitude_coeff)
        } else {
            drive.clone()
        };
        let (plan, axis) = linspace_layout(
            0.0,
            vec![
                (PhaseSpec::idle(line), idle, self.idle_points),
                (drive, pulse, self.pulse_points),
                (PhaseSpec::idle(line), idle, self.idle_points),
                (second, pulse, self.pulse_points),
                (PhaseSpec::idle(line), idle, self.idle_points),
            ],
        )?;
        let context =
            ExperimentContext::new(calibration.anchors(), plan).read_out(Channel::readout(qubit));

        Ok(ExperimentPlan {
            name: "pulse_reversal".to_string(),
            parameter: SweepParameter::Duration,
            axis,
            runs: vec![Run::new("reversal", context)],
        })
    }
}

/// A pi/2 drive undone by its negative after an idle, watched on several qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseUndo {
    pub drive_qubit: u32,
    pub readout_qubits: Vec<u32>,
    pub idle: f64,
    pub points: usize,
}

impl Experiment for PulseUndo {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        if self.readout_qubits.is_empty() {
            return Err(Error::Config(
                "pulse_undo needs at least one readout qubit".to_string(),
            ));
        }
        let qubit = QubitId(self.drive_qubit);
        let calibration = platform.qubit(qubit)?;
        let pulse = calibration.half_pi_duration();
        let idle = nanoseconds(self.idle);
        let line = Channel::drive(qubit);

        let (undo, axis) = linspace_layout(
            0.0,
            vec![
                (PhaseSpec::drive(line), pulse, self.points),
                (PhaseSpec::idle(line), idle, self.points),
                (PhaseSpec::echo(line).amplitude(-1.0), pulse, self.points),
            ],
        )?;
        // same cut points with nothing played
        let (baseline, _) = linspace_layout(
            0.0,
            vec![
                (PhaseSpec::idle(line), pulse, self.points),
                (PhaseSpec::idle(line), idle, self.points),
                (PhaseSpec::idle(line), pulse, self.points),
            ],
        )?;

        let anchors = calibration.anchors();
        let read_out = |mut context: ExperimentContext| {
            for q in &self.readout_qubits {
                context = context.read_out(Channel::readout(*q));
            }
            context
        };
        Ok(ExperimentPlan {
            name: "pulse_undo".to_string(),
            parameter: SweepParameter::Duration,
            axis,
            runs: vec![
                Run::new("baseline", read_out(ExperimentContext::new(anchors, baseline))),
                Run::new("undo", read_out(ExperimentContext::new(anchors, undo))),
            ],
        })
    }
}

fn default_echo_start() -> f64 {
    5.0
}

/// Idle, pi, idle, pi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HahnEcho {
    pub qubit: u32,
    pub idle: f64,
    pub idle_points: usize,
    pub pulse_points: usize,
    #[serde(default = "default_echo_start")]
    pub start: f64,
}

impl Experiment for HahnEcho {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        let qubit = QubitId(self.qubit);
        let calibration = platform.qubit(qubit)?;
        let pulse = calibration.half_pi_duration() * 2.0;
        let idle = nanoseconds(self.idle);
        let line = Channel::drive(qubit);

        let (plan, axis) = linspace_layout(
            self.start,
            vec![
                (PhaseSpec::idle(line), idle, self.idle_points),
                (PhaseSpec::drive(line), pulse, self.pulse_points),
                (PhaseSpec::idle(line), idle, self.idle_points),
                (PhaseSpec::drive(line), pulse, self.pulse_points),
            ],
        )?;
        let context =
            ExperimentContext::new(calibration.anchors(), plan).read_out(Channel::readout(qubit));

        Ok(ExperimentPlan {
            name: "hahn_echo".to_string(),
            parameter: SweepParameter::Duration,
            axis,
            runs: vec![Run::new("echo", context)],
        })
    }
}

fn default_amplitude_start() -> f64 {
    0.1
}

fn default_amplitude_stop() -> f64 {
    1.1
}

fn default_amplitude_step() -> f64 {
    0.1
}

/// A drive of fixed length swept in amplitude, read out after an idle stretch.
///
/// The axis holds relative amplitudes; every point plays the whole drive and
/// the whole idle. A `baseline` run with the same cut points plays nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeSweep {
    pub drive_qubit: u32,
    pub readout_qubits: Vec<u32>,
    /// Drive length in ns, the half-pi duration of the drive qubit by default.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub idle: f64,
    #[serde(default = "default_amplitude_start")]
    pub start: f64,
    #[serde(default = "default_amplitude_stop")]
    pub stop: f64,
    #[serde(default = "default_amplitude_step")]
    pub step: f64,
}

impl Experiment for AmplitudeSweep {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        if self.readout_qubits.is_empty() {
            return Err(Error::Config(
                "amplitude_sweep needs at least one readout qubit".to_string(),
            ));
        }
        if !(self.idle.is_finite() && self.idle >= 0.0) {
            return Err(Error::Config(format!(
                "idle must not be negative, got {}",
                self.idle
            )));
        }
        let qubit = QubitId(self.drive_qubit);
        let calibration = platform.qubit(qubit)?;
        let pulse = match self.duration {
            Some(duration) if duration.is_finite() && duration > 0.0 => nanoseconds(duration),
            Some(duration) => {
                return Err(Error::Config(format!(
                    "duration must be positive, got {duration}"
                )));
            }
            None => calibration.half_pi_duration(),
        };
        let line = Channel::drive(qubit);

        let layout = |first: PhaseSpec| {
            let mut builder = PhasePlan::starting_at(nanoseconds(0.0)).then(first, pulse);
            if self.idle > 0.0 {
                builder = builder.then(PhaseSpec::idle(line), nanoseconds(self.idle));
            }
            builder.build()
        };
        let drive = layout(PhaseSpec::drive(line))?;
        let baseline = layout(PhaseSpec::idle(line))?;
        let at = drive.end().value();

        let anchors = calibration.anchors();
        let read_out = |mut context: ExperimentContext| {
            for q in &self.readout_qubits {
                context = context.read_out(Channel::readout(*q));
            }
            context
        };
        Ok(ExperimentPlan {
            name: "amplitude_sweep".to_string(),
            parameter: SweepParameter::Amplitude { phase: 0, at },
            axis: SegmentedAxis::from_ranges(&[SubRange::arange(
                self.start, self.stop, self.step,
            )])?,
            runs: vec![
                Run::new("baseline", read_out(ExperimentContext::new(anchors, baseline))),
                Run::new("drive", read_out(ExperimentContext::new(anchors, drive))),
            ],
        })
    }
}
