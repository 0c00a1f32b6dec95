// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_units::{Nanosecond, Ns};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::interval::{Channel, PulseRole, TimeInterval};

/// Ordered pulse segments of one sweep point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    intervals: Vec<TimeInterval>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, interval: TimeInterval) {
        self.intervals.push(interval);
    }

    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeInterval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn on_channel(&self, channel: Channel) -> impl Iterator<Item = &TimeInterval> {
        self.intervals.iter().filter(move |iv| iv.channel == channel)
    }

    pub fn with_role(&self, role: PulseRole) -> impl Iterator<Item = &TimeInterval> {
        self.intervals.iter().filter(move |iv| iv.role == role)
    }

    /// Latest finish over all segments, zero for an empty timeline.
    pub fn finish(&self) -> Ns {
        self.intervals
            .iter()
            .map(TimeInterval::finish)
            .fold(Ns::zero(Nanosecond), Ns::max)
    }

    /// Check the timeline for negative durations and same-channel overlaps.
    ///
    /// Segments flagged `concurrent` may overlap anything.
    pub fn validate(&self) -> Result<()> {
        for iv in &self.intervals {
            if !iv.start.is_finite() || !iv.duration.is_finite() {
                return Err(Error::new(format!("{iv} has a non-finite timing.")));
            }
            if iv.duration.value() < 0.0 {
                return Err(Error::new(format!("{iv} has a negative duration.")));
            }
        }
        let exclusive: Vec<&TimeInterval> =
            self.intervals.iter().filter(|iv| !iv.concurrent).collect();
        for (i, a) in exclusive.iter().enumerate() {
            for b in &exclusive[i + 1..] {
                if a.channel != b.channel || !a.overlaps(b) {
                    continue;
                }
                let (earlier, later) = if a.start <= b.start { (a, b) } else { (b, a) };
                return Err(Error::Overlap {
                    channel: a.channel.to_string(),
                    earlier: earlier.to_string(),
                    later: later.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimeInterval;
    type IntoIter = std::slice::Iter<'a, TimeInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
