//! # Truck Executable Parameters
//!
//! This module provides parameters for the headless truck executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use comms_if::world::ObstacleRect;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckExecParams {
    /// Stop the run if it hasn't finished after this many iterations
    pub max_iterations: u64,

    /// Whether to record and archive the path of the truck
    pub save_trace: bool,

    /// Obstacles in view coordinates
    pub obstacles: Vec<ObstacleRect>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let p: TruckExecParams =
            util::params::from_str(include_str!("../../params/truck_exec.toml"))
                .expect("truck_exec.toml should parse");

        assert!(p.max_iterations > 0);
        assert!(p.obstacles.iter().all(|o| o.width > 0.0 && o.height > 0.0));
    }
}
