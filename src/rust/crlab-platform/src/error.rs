// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

use crlab_timeline::QubitId;

use crate::sequence::PulseId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Platform '{0}' is not connected.")]
    NotConnected(String),

    #[error("Unknown platform '{0}'.")]
    UnknownPlatform(String),

    #[error("Qubit {0} is not part of the platform.")]
    UnknownQubit(QubitId),

    #[error("No measurement was returned for readout pulse {0}.")]
    MissingMeasurement(PulseId),

    #[error("Invalid execution parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Timeline(#[from] crlab_timeline::Error),

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
