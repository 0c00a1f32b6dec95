// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_log::{info, warn};
use indexmap::IndexMap;

use crate::error::Result;
use crate::execution::ExecutionParameters;
use crate::platform::{Measurement, Platform};
use crate::sequence::{PulseId, PulseSequence};

/// An open connection to a platform.
///
/// The platform is connected when the session opens and disconnected by
/// [`Session::close`]. A session dropped without closing, e.g. while an error
/// propagates, still disconnects and only logs a failure to do so.
pub struct Session<'p> {
    platform: &'p mut dyn Platform,
    open: bool,
}

impl<'p> Session<'p> {
    pub fn open(platform: &'p mut dyn Platform) -> Result<Self> {
        platform.connect()?;
        info!("Connected to platform '{}'", platform.name());
        Ok(Session {
            platform,
            open: true,
        })
    }

    pub fn platform(&self) -> &dyn Platform {
        &*self.platform
    }

    pub fn execute(
        &mut self,
        sequence: &PulseSequence,
        options: &ExecutionParameters,
    ) -> Result<IndexMap<PulseId, Measurement>> {
        self.platform.execute(sequence, options)
    }

    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.platform.disconnect()?;
        info!("Disconnected from platform '{}'", self.platform.name());
        Ok(())
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = self.platform.disconnect() {
            warn!(
                "Failed to disconnect from platform '{}': {}",
                self.platform.name(),
                err
            );
        }
    }
}
