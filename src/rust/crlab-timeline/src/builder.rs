// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_log::diagnostic;
use crlab_units::{Nanosecond, Ns, nanoseconds};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::interval::{Channel, PulseRole, TimeInterval};
use crate::phase::PhasePlan;
use crate::timeline::Timeline;

/// Calibrated durations of the canonical operations of a qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnchorDurations {
    pub pi_pulse: Ns,
    pub readout: Ns,
}

/// A pi pulse played before the first phase, e.g. to excite a control qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preparation {
    pub channel: Channel,
    pub start: Ns,
}

impl Preparation {
    fn interval(&self, anchors: &AnchorDurations) -> TimeInterval {
        TimeInterval::new(PulseRole::Inversion, self.channel, self.start, anchors.pi_pulse)
    }
}

/// Where a readout starts on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadoutStart {
    /// At the finish of the last segment laid out.
    LastSegment,
    /// At the finish of the given phase, or of the last segment while that
    /// phase has not been reached.
    AfterPhase(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readout {
    pub channel: Channel,
    pub start: ReadoutStart,
}

impl Readout {
    pub fn new(channel: Channel) -> Self {
        Readout {
            channel,
            start: ReadoutStart::LastSegment,
        }
    }

    pub fn after_phase(mut self, phase: usize) -> Self {
        self.start = ReadoutStart::AfterPhase(phase);
        self
    }
}

/// Everything needed to lay out one sweep point of an experiment.
///
/// The phase plan is expressed in sweep coordinates; `offset` maps its first
/// cut point onto the absolute hardware time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentContext {
    pub anchors: AnchorDurations,
    pub plan: PhasePlan,
    pub offset: Ns,
    pub preparation: Option<Preparation>,
    pub readout: Vec<Readout>,
}

impl ExperimentContext {
    pub fn new(anchors: AnchorDurations, plan: PhasePlan) -> Self {
        ExperimentContext {
            anchors,
            plan,
            offset: Ns::zero(Nanosecond),
            preparation: None,
            readout: vec![],
        }
    }

    pub fn offset(mut self, offset: Ns) -> Self {
        self.offset = offset;
        self
    }

    pub fn prepare(mut self, channel: Channel, start: Ns) -> Self {
        self.preparation = Some(Preparation { channel, start });
        self
    }

    pub fn read_out(mut self, channel: Channel) -> Self {
        self.readout.push(Readout::new(channel));
        self
    }

    pub fn with_readout(mut self, readout: Readout) -> Self {
        self.readout.push(readout);
        self
    }

    /// Absolute time at which the first phase starts.
    pub fn origin(&self) -> Ns {
        self.plan.start() + self.offset
    }

    /// Check that the preparation pulse finishes before the first phase.
    pub fn validate(&self) -> Result<()> {
        if let Some(prep) = &self.preparation {
            let finish = prep.start + self.anchors.pi_pulse;
            if finish > self.origin() {
                return Err(Error::new(format!(
                    "Preparation on {} finishes at {}, after the first phase starts at {}.",
                    prep.channel,
                    finish,
                    self.origin()
                )));
            }
        }
        let phases = self.plan.phases().len();
        for readout in &self.readout {
            match readout.start {
                ReadoutStart::AfterPhase(phase) if phase >= phases => {
                    return Err(Error::new(format!(
                        "Readout on {} follows phase {}, the plan has {} phase(s).",
                        readout.channel, phase, phases
                    )));
                }
                _ => {}
            }
        }
        if self.anchors.readout.value() < 0.0 || self.anchors.pi_pulse.value() < 0.0 {
            return Err(Error::new("Anchor durations must not be negative."));
        }
        Ok(())
    }
}

/// Lay out the pulse segments active at sweep coordinate `t`.
///
/// Every phase before the one containing `t` is played in full, the current
/// phase is played for `t - b_k`, which is zero on its opening cut point.
/// Segments are chained: each starts at the computed finish of the previous
/// one. Readouts start at the finish of the last segment unless they follow
/// an earlier phase.
pub fn build_timeline(ctx: &ExperimentContext, t: f64) -> Result<Timeline> {
    let plan = &ctx.plan;
    let current = plan.locate(t)?;

    let mut timeline = Timeline::new();
    if let Some(prep) = &ctx.preparation {
        timeline.push(prep.interval(&ctx.anchors));
    }

    let mut cursor = ctx.origin();
    let mut finishes = Vec::with_capacity(current + 1);
    for (index, phase) in plan.phases().iter().enumerate().take(current + 1) {
        let duration = if index < current {
            plan.phase_length(index)
        } else {
            nanoseconds(t) - plan.boundaries()[index]
        };
        let mut segment = TimeInterval::new(phase.role, phase.channel, cursor, duration);
        segment.amplitude = phase.amplitude;
        segment.relative_phase = phase.relative_phase;
        segment.tone = phase.tone;
        for extra in &phase.concurrent {
            let mut correction = TimeInterval::new(phase.role, extra.channel, cursor, duration);
            correction.amplitude = extra.amplitude;
            correction.relative_phase = extra.relative_phase;
            correction.tone = extra.tone;
            correction.concurrent = true;
            timeline.push(correction);
        }
        cursor = segment.finish();
        finishes.push(cursor);
        timeline.push(segment);
    }

    for readout in &ctx.readout {
        let start = match readout.start {
            ReadoutStart::LastSegment => cursor,
            ReadoutStart::AfterPhase(phase) => finishes.get(phase).copied().unwrap_or(cursor),
        };
        timeline.push(TimeInterval::new(
            PulseRole::Readout,
            readout.channel,
            start,
            ctx.anchors.readout,
        ));
    }

    diagnostic!(
        "t = {}: phase {} of {}, readout at {}",
        t,
        current + 1,
        plan.phases().len(),
        cursor
    );
    timeline.validate()?;
    Ok(timeline)
}
