// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::simulator::SimulatedPlatform;

const SIMULATED_QUBITS: u32 = 8;

/// Names accepted by [`create_platform`].
pub fn available_platforms() -> &'static [&'static str] {
    &["simulator", "dummy"]
}

/// Create a platform by name.
pub fn create_platform(name: &str) -> Result<Box<dyn Platform>> {
    match name {
        "simulator" | "dummy" => Ok(Box::new(SimulatedPlatform::with_qubits(
            name,
            0..SIMULATED_QUBITS,
        ))),
        _ => Err(Error::UnknownPlatform(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crlab_timeline::QubitId;

    #[test]
    fn test_create_known_platforms() {
        for name in available_platforms() {
            let platform = create_platform(name).unwrap();
            assert_eq!(platform.name(), *name);
            assert!(!platform.is_connected());
            assert_eq!(platform.qubits().len(), SIMULATED_QUBITS as usize);
            assert!(platform.qubit(QubitId(7)).is_ok());
        }
    }

    #[test]
    fn test_unknown_platform() {
        assert!(matches!(
            create_platform("icarusq_iqm5q"),
            Err(Error::UnknownPlatform(_))
        ));
    }
}
