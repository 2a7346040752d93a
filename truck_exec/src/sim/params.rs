//! Simulation parameters

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Parameters of the truck simulation.
///
/// Positions are world units in the `[0, arena_size]` square, y grows downwards so the parking
/// bay lies along `y = 0`. Headings are degrees anticlockwise from +x in the y-up frame, so 90
/// faces the bay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimParams {
    /// Start lateral position
    pub start_x: f64,

    /// Start longitudinal position
    pub start_y: f64,

    /// Start heading
    pub start_phi_deg: f64,

    /// Distance driven per iteration
    pub speed: f64,

    /// Simulation rate setting, above 1 the loop sleeps `10 * (rate - 1)` ms between iterations
    pub sim_rate: u32,

    /// Record the path of the truck
    pub tracing: bool,

    /// Report the match degree of every rule after each evaluation
    pub show_rule_firings: bool,

    /// How many iterations ahead the footprint is projected when checking for obstacles
    pub lookahead: f64,

    /// Multiple of the free space displacement to back off by when avoidance starts
    pub avoid_backoff: f64,

    /// Offset added to the lateral position before mapping it into an obstacle's frame
    pub avoid_lateral_offset: f64,

    /// View units per world unit, obstacles are given in view units
    pub view_scale: f64,

    /// Length of the truck footprint
    pub truck_length: f64,

    /// Width of the truck footprint
    pub truck_width: f64,

    /// How often the paused loop wakes to check for commands
    pub paused_wake_period_ms: u64,

    /// Lateral position of the bay
    pub target_x: f64,

    /// Heading required to park
    pub target_phi_deg: f64,

    /// Largest y position counted as parked
    pub park_y_max: f64,

    /// Largest lateral error counted as parked
    pub x_tolerance: f64,

    /// Largest heading error counted as parked
    pub phi_tolerance_deg: f64,

    /// Size of the square arena
    pub arena_size: f64,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            start_x: 50.0,
            start_y: 50.0,
            start_phi_deg: 90.0,
            speed: 1.0,
            sim_rate: 1,
            tracing: false,
            show_rule_firings: false,
            lookahead: 4.0,
            avoid_backoff: 2.0,
            avoid_lateral_offset: 2.0,
            view_scale: 4.0,
            truck_length: 4.0,
            truck_width: 2.0,
            paused_wake_period_ms: 500,
            target_x: 50.0,
            target_phi_deg: 90.0,
            park_y_max: 0.3,
            x_tolerance: 1.0,
            phi_tolerance_deg: 5.0,
            arena_size: 100.0,
        }
    }
}

impl SimParams {
    /// Delay between running iterations, `None` if the loop should only yield.
    pub fn pacing(&self) -> Option<std::time::Duration> {
        if self.sim_rate > 1 {
            Some(std::time::Duration::from_millis(
                10 * (self.sim_rate as u64 - 1),
            ))
        } else {
            None
        }
    }
}
