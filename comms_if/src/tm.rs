//! # Telemetry
//!
//! Snapshots of the simulation state published to the host.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A consistent snapshot of the vehicle state.
///
/// Position is in world units in `[0, 100] x [0, 100]` with y growing
/// downwards (the parking bay is at the top edge).
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimTm {
    /// Lateral position
    pub x: f64,

    /// Longitudinal position, the bay is at `y = 0`
    pub y: f64,

    /// Heading in degrees, 90 faces the bay
    pub phi_deg: f64,

    /// Number of committed iterations since the last reset
    pub iteration: u64,

    /// Current outcome of the run
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Outcome of a simulation run.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub enum Outcome {
    /// Still driving
    Running,

    /// Parked within tolerance of the bay
    ParkedSuccessfully,

    /// Left the arena
    Disabled,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Outcome {
    /// True once the run has reached a terminal outcome.
    pub fn is_finished(&self) -> bool {
        !matches!(self, Outcome::Running)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Running
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tm_json() {
        let tm = SimTm {
            x: 50.0,
            y: 49.0,
            phi_deg: 90.0,
            iteration: 1,
            outcome: Outcome::Running,
        };

        let json = serde_json::to_string(&tm).unwrap();
        assert!(json.contains("\"outcome\":\"Running\""));
        assert_eq!(serde_json::from_str::<SimTm>(&json).unwrap(), tm);

        assert!(!Outcome::Running.is_finished());
        assert!(Outcome::Disabled.is_finished());
        assert!(Outcome::ParkedSuccessfully.is_finished());
    }
}
