// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_units::{Ns, nanoseconds};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::interval::{Channel, PulseRole, QubitId};

/// A pulse played on top of a phase for its whole (possibly partial) length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcurrentPulse {
    pub channel: Channel,
    pub amplitude: f64,
    pub relative_phase: f64,
    pub tone: Option<QubitId>,
}

impl ConcurrentPulse {
    pub fn new(channel: Channel, amplitude: f64) -> Self {
        ConcurrentPulse {
            channel,
            amplitude,
            relative_phase: 0.0,
            tone: None,
        }
    }

    pub fn relative_phase(mut self, phase: f64) -> Self {
        self.relative_phase = phase;
        self
    }

    pub fn tone(mut self, qubit: QubitId) -> Self {
        self.tone = Some(qubit);
        self
    }
}

/// The pulse a phase plays between two cut points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSpec {
    pub role: PulseRole,
    pub channel: Channel,
    pub amplitude: f64,
    pub relative_phase: f64,
    pub tone: Option<QubitId>,
    pub concurrent: Vec<ConcurrentPulse>,
}

impl PhaseSpec {
    pub fn new(role: PulseRole, channel: Channel) -> Self {
        PhaseSpec {
            role,
            channel,
            amplitude: if role.is_played() { 1.0 } else { 0.0 },
            relative_phase: 0.0,
            tone: None,
            concurrent: vec![],
        }
    }

    pub fn idle(channel: Channel) -> Self {
        Self::new(PulseRole::Idle, channel)
    }

    pub fn drive(channel: Channel) -> Self {
        Self::new(PulseRole::Drive, channel)
    }

    pub fn inversion(channel: Channel) -> Self {
        Self::new(PulseRole::Inversion, channel)
    }

    pub fn echo(channel: Channel) -> Self {
        Self::new(PulseRole::Echo, channel)
    }

    /// A drive on the control's channel at the target's frequency.
    pub fn cross_resonance(control: QubitId, target: QubitId) -> Self {
        Self::drive(Channel::drive(control)).tone(target)
    }

    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn relative_phase(mut self, phase: f64) -> Self {
        self.relative_phase = phase;
        self
    }

    pub fn tone(mut self, qubit: QubitId) -> Self {
        self.tone = Some(qubit);
        self
    }

    pub fn with_concurrent(mut self, pulse: ConcurrentPulse) -> Self {
        self.concurrent.push(pulse);
        self
    }
}

/// Ordered phases delimited by cut points `b_0 < b_1 < ... < b_n`.
///
/// Phase `k` covers the half-open range `[b_k, b_{k+1})`; the closing cut
/// point `b_n` still belongs to the last phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhasePlan {
    boundaries: Vec<Ns>,
    phases: Vec<PhaseSpec>,
}

impl PhasePlan {
    pub fn new(boundaries: Vec<Ns>, phases: Vec<PhaseSpec>) -> Result<Self> {
        if phases.is_empty() {
            return Err(Error::EmptyInput("phase"));
        }
        if boundaries.len() != phases.len() + 1 {
            return Err(Error::InvalidSweep(format!(
                "{} phases need {} cut points, got {}",
                phases.len(),
                phases.len() + 1,
                boundaries.len()
            )));
        }
        if let Some(bad) = boundaries.iter().find(|b| !b.is_finite()) {
            return Err(Error::InvalidSweep(format!("non-finite cut point {bad}")));
        }
        if let Some(pair) = boundaries.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::InvalidSweep(format!(
                "cut points must increase strictly, got {} followed by {}",
                pair[0], pair[1]
            )));
        }
        Ok(PhasePlan { boundaries, phases })
    }

    /// Start a plan at `start`; phases are appended with [`PhasePlanBuilder::then`].
    pub fn starting_at(start: Ns) -> PhasePlanBuilder {
        PhasePlanBuilder {
            boundaries: vec![start],
            phases: vec![],
        }
    }

    pub fn boundaries(&self) -> &[Ns] {
        &self.boundaries
    }

    pub fn phases(&self) -> &[PhaseSpec] {
        &self.phases
    }

    pub fn start(&self) -> Ns {
        self.boundaries[0]
    }

    pub fn end(&self) -> Ns {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Full length of phase `index`.
    pub fn phase_length(&self, index: usize) -> Ns {
        self.boundaries[index + 1] - self.boundaries[index]
    }

    /// Index of the phase containing `t`.
    pub fn locate(&self, t: f64) -> Result<usize> {
        let (first, last) = (self.start().value(), self.end().value());
        if !t.is_finite() || t < first || t > last {
            return Err(Error::OutOfRange {
                value: t,
                first,
                last,
            });
        }
        let at_or_before = self.boundaries.partition_point(|b| b.value() <= t);
        Ok((at_or_before - 1).min(self.phases.len() - 1))
    }

    /// The same plan with phase `index` played at `amplitude`.
    pub fn with_amplitude(&self, index: usize, amplitude: f64) -> Result<Self> {
        if !amplitude.is_finite() {
            return Err(Error::InvalidSweep(format!(
                "non-finite amplitude {amplitude}"
            )));
        }
        let mut plan = self.clone();
        let phases = plan.phases.len();
        let phase = plan
            .phases
            .get_mut(index)
            .ok_or_else(|| Error::new(format!("No phase {index} in a plan of {phases}.")))?;
        phase.amplitude = amplitude;
        Ok(plan)
    }

    /// Shift every cut point by `offset`.
    pub fn shifted(&self, offset: Ns) -> Self {
        PhasePlan {
            boundaries: self.boundaries.iter().map(|b| *b + offset).collect(),
            phases: self.phases.clone(),
        }
    }
}

pub struct PhasePlanBuilder {
    boundaries: Vec<Ns>,
    phases: Vec<PhaseSpec>,
}

impl PhasePlanBuilder {
    /// Append a phase lasting `duration` after the previous one.
    pub fn then(mut self, phase: PhaseSpec, duration: Ns) -> Self {
        let last = self.boundaries[self.boundaries.len() - 1];
        self.boundaries.push(last + duration);
        self.phases.push(phase);
        self
    }

    /// Append a phase ending at the absolute cut point `until`.
    pub fn until(mut self, phase: PhaseSpec, until: f64) -> Self {
        self.boundaries.push(nanoseconds(until));
        self.phases.push(phase);
        self
    }

    pub fn build(self) -> Result<PhasePlan> {
        PhasePlan::new(self.boundaries, self.phases)
    }
}
