// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cannot concatenate part {index}: expected {expected} columns, found {found}.")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Length mismatch for '{label}': expected {expected} values, found {found}.")]
    LengthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("At least one {0} must be provided.")]
    EmptyInput(&'static str),

    #[error("Sweep value {value} lies outside the phase plan [{first}, {last}].")]
    OutOfRange { value: f64, first: f64, last: f64 },

    #[error(
        "{later} overlaps {earlier} on {channel}; declare it concurrent if the overlap is intended."
    )]
    Overlap {
        channel: String,
        earlier: String,
        later: String,
    },

    #[error("Sweep index {index} of '{label}' was already recorded.")]
    AlreadyRecorded { label: String, index: usize },

    #[error("Series '{label}' is incomplete: {missing} of {len} points missing.")]
    Incomplete {
        label: String,
        missing: usize,
        len: usize,
    },

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn new<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }
}
