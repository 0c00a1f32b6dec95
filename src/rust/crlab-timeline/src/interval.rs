// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter};

use crlab_units::Ns;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl Display for QubitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(value: u32) -> Self {
        QubitId(value)
    }
}

/// What a segment of the timeline does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseRole {
    /// Free evolution, nothing is played.
    Idle,
    Drive,
    /// A pi pulse flipping a qubit.
    Inversion,
    /// A refocusing or undo pulse.
    Echo,
    Readout,
}

impl PulseRole {
    /// Whether the segment results in a hardware pulse.
    pub fn is_played(&self) -> bool {
        !matches!(self, PulseRole::Idle)
    }
}

impl Display for PulseRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            PulseRole::Idle => "idle",
            PulseRole::Drive => "drive",
            PulseRole::Inversion => "inversion",
            PulseRole::Echo => "echo",
            PulseRole::Readout => "readout",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Drive,
    Readout,
}

/// A hardware line attached to one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub qubit: QubitId,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn drive(qubit: impl Into<QubitId>) -> Self {
        Channel {
            qubit: qubit.into(),
            kind: ChannelKind::Drive,
        }
    }

    pub fn readout(qubit: impl Into<QubitId>) -> Self {
        Channel {
            qubit: qubit.into(),
            kind: ChannelKind::Readout,
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChannelKind::Drive => write!(f, "{}/drive", self.qubit),
            ChannelKind::Readout => write!(f, "{}/readout", self.qubit),
        }
    }
}

/// A single segment of a pulse timeline.
///
/// The finish time is always derived from `start + duration`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeInterval {
    pub role: PulseRole,
    pub channel: Channel,
    pub start: Ns,
    pub duration: Ns,
    /// Amplitude relative to the channel's calibrated pulse amplitude.
    pub amplitude: f64,
    /// Phase offset in radians.
    pub relative_phase: f64,
    /// Qubit whose frequency the pulse is played at. `None` plays at the
    /// channel's own qubit; a cross-resonance drive sets the target here.
    pub tone: Option<QubitId>,
    /// Played simultaneously with another segment on purpose.
    pub concurrent: bool,
}

impl TimeInterval {
    pub fn new(role: PulseRole, channel: Channel, start: Ns, duration: Ns) -> Self {
        let amplitude = if role.is_played() { 1.0 } else { 0.0 };
        TimeInterval {
            role,
            channel,
            start,
            duration,
            amplitude,
            relative_phase: 0.0,
            tone: None,
            concurrent: false,
        }
    }

    pub fn finish(&self) -> Ns {
        self.start + self.duration
    }

    /// The qubit whose frequency this segment is played at.
    pub fn tone_qubit(&self) -> QubitId {
        self.tone.unwrap_or(self.channel.qubit)
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.finish() && other.start < self.finish()
    }
}

impl Display for TimeInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} [{}, {})",
            self.role,
            self.channel,
            self.start,
            self.finish()
        )
    }
}
