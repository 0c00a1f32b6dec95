// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse timeline construction for swept qubit experiments.
//!
//! An experiment is described once as an [`ExperimentContext`]: anchor
//! durations, an ordered [`PhasePlan`] and the readout channels. For every
//! point of a [`SegmentedAxis`] the pure [`build_timeline`] lays out the
//! pulse segments that are active at that point; the resulting magnitudes are
//! collected into write-once [`ResultSeries`].

pub mod builder;
pub mod error;
pub mod interval;
pub mod normalize;
pub mod phase;
pub mod series;
pub mod sweep;
pub mod timeline;

pub use crate::builder::{
    AnchorDurations, ExperimentContext, Preparation, Readout, ReadoutStart, build_timeline,
};
pub use crate::error::{Error, Result};
pub use crate::interval::{Channel, ChannelKind, PulseRole, QubitId, TimeInterval};
pub use crate::phase::{ConcurrentPulse, PhasePlan, PhasePlanBuilder, PhaseSpec};
pub use crate::series::ResultSeries;
pub use crate::sweep::{SegmentedAxis, SubRange, SweepAxis, SweepPoint};
pub use crate::timeline::Timeline;
