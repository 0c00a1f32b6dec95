// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed time quantities used when laying out pulse timelines.

pub mod duration;

pub use duration::{Duration, Nanosecond, Ns, Second, nanoseconds, seconds};
