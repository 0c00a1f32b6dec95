// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! The experiments this crate knows how to lay out.
//!
//! An experiment turns its parameters and the platform calibration into an
//! [`ExperimentPlan`]: one segmented sweep axis shared by a number of labelled
//! runs. Each run is swept over every point of the axis.

mod cross_resonance;
mod reversal;

use crlab_platform::Platform;
use crlab_timeline::{
    AnchorDurations, Channel, ExperimentContext, PhasePlan, QubitId, Readout, SegmentedAxis,
    Timeline, build_timeline,
};
use crlab_units::nanoseconds;
use serde::{Deserialize, Serialize};

pub use self::cross_resonance::{
    CorrectedCrossResonance, Correction, CrossResonanceIdle, InvertedCrossResonance,
};
pub use self::reversal::{AmplitudeSweep, HahnEcho, PulseReversal, PulseUndo};

use crate::error::{Error, Result};

/// Start of the pi pulse that prepares an excited control qubit.
pub const PREPARATION_START: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub label: String,
    pub context: ExperimentContext,
}

impl Run {
    pub fn new(label: impl Into<String>, context: ExperimentContext) -> Self {
        Run {
            label: label.into(),
            context,
        }
    }

    pub fn readout_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.context.readout.iter().map(|readout| readout.channel.qubit)
    }
}

/// What the values of a sweep axis stand for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepParameter {
    /// Time coordinates in ns on the phase plan.
    #[default]
    Duration,
    /// Amplitudes of one phase, every point laid out at the fixed coordinate `at`.
    Amplitude { phase: usize, at: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentPlan {
    pub name: String,
    pub parameter: SweepParameter,
    pub axis: SegmentedAxis,
    pub runs: Vec<Run>,
}

impl ExperimentPlan {
    pub fn run(&self, label: &str) -> Option<&Run> {
        self.runs.iter().find(|run| run.label == label)
    }

    /// Check that every point of the axis can be laid out for `run`.
    pub fn check(&self, run: &Run) -> Result<()> {
        run.context.validate()?;
        match self.parameter {
            SweepParameter::Duration => {
                for point in self.axis.points() {
                    run.context.plan.locate(point.value)?;
                }
            }
            SweepParameter::Amplitude { phase, at } => {
                run.context.plan.locate(at)?;
                if phase >= run.context.plan.phases().len() {
                    return Err(Error::Config(format!(
                        "run '{}' has no phase {phase} to scale",
                        run.label
                    )));
                }
                if let Some(bad) = self.axis.points().find(|p| !p.value.is_finite()) {
                    return Err(Error::Config(format!(
                        "non-finite amplitude {} at index {}",
                        bad.value, bad.index
                    )));
                }
            }
        }
        Ok(())
    }

    /// Lay out `run` at the sweep value `value`.
    pub fn timeline(&self, run: &Run, value: f64) -> Result<Timeline> {
        match self.parameter {
            SweepParameter::Duration => Ok(build_timeline(&run.context, value)?),
            SweepParameter::Amplitude { phase, at } => {
                let mut context = run.context.clone();
                context.plan = context.plan.with_amplitude(phase, value)?;
                Ok(build_timeline(&context, at)?)
            }
        }
    }
}

/// Label of the series holding the readouts of `qubit` during run `run`.
pub fn series_label(run: &str, qubit: QubitId) -> String {
    format!("{run}_{qubit}")
}

trait Experiment {
    fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExperimentConfig {
    InvertedCrossResonance(InvertedCrossResonance),
    CrossResonanceIdle(CrossResonanceIdle),
    CorrectedCrossResonance(CorrectedCrossResonance),
    PulseReversal(PulseReversal),
    PulseUndo(PulseUndo),
    HahnEcho(HahnEcho),
    AmplitudeSweep(AmplitudeSweep),
}

impl ExperimentConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ExperimentConfig::InvertedCrossResonance(_) => "inverted_cross_resonance",
            ExperimentConfig::CrossResonanceIdle(_) => "cross_resonance_idle",
            ExperimentConfig::CorrectedCrossResonance(_) => "corrected_cross_resonance",
            ExperimentConfig::PulseReversal(_) => "pulse_reversal",
            ExperimentConfig::PulseUndo(_) => "pulse_undo",
            ExperimentConfig::HahnEcho(_) => "hahn_echo",
            ExperimentConfig::AmplitudeSweep(_) => "amplitude_sweep",
        }
    }

    /// Lay out the experiment against the calibration of `platform`.
    pub fn plan(&self, platform: &dyn Platform) -> Result<ExperimentPlan> {
        match self {
            ExperimentConfig::InvertedCrossResonance(e) => e.plan(platform),
            ExperimentConfig::CrossResonanceIdle(e) => e.plan(platform),
            ExperimentConfig::CorrectedCrossResonance(e) => e.plan(platform),
            ExperimentConfig::PulseReversal(e) => e.plan(platform),
            ExperimentConfig::PulseUndo(e) => e.plan(platform),
            ExperimentConfig::HahnEcho(e) => e.plan(platform),
            ExperimentConfig::AmplitudeSweep(e) => e.plan(platform),
        }
    }
}

/// The `gnd` and `exc` runs of a cross-resonance experiment.
///
/// Both runs start the plan once the preparation pulse would have finished;
/// only `exc` actually plays it on the control.
fn control_state_runs(
    anchors: AnchorDurations,
    plan: PhasePlan,
    control: QubitId,
    readout: &[Readout],
) -> Vec<Run> {
    let offset = nanoseconds(PREPARATION_START) + anchors.pi_pulse;
    let mut gnd = ExperimentContext::new(anchors, plan).offset(offset);
    for ro in readout {
        gnd = gnd.with_readout(*ro);
    }
    let exc = gnd
        .clone()
        .prepare(Channel::drive(control), nanoseconds(PREPARATION_START));
    vec![Run::new("gnd", gnd), Run::new("exc", exc)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_tagged_by_kind() {
        let config: ExperimentConfig = serde_json::from_str(
            r#"{"kind": "hahn_echo", "qubit": 0, "idle": 200.0, "idle_points": 10, "pulse_points": 20}"#,
        )
        .unwrap();
        assert_eq!(config.name(), "hahn_echo");
        assert!(matches!(config, ExperimentConfig::HahnEcho(_)));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let parsed = serde_json::from_str::<ExperimentConfig>(r#"{"kind": "rabi"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_series_label() {
        assert_eq!(series_label("exc", QubitId(6)), "exc_q6");
    }
}
