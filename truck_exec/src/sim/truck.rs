//! # Truck simulation engine
//!
//! [`TruckSim`] holds the complete state of one simulated truck and advances it one iteration at
//! a time. It has no threading of its own, [`super::Simulation`] drives it from a worker thread.
//!
//! Each iteration:
//!
//! 1. The primary matrix gives a heading change for the current position and heading.
//! 2. The truck footprint is projected a few iterations ahead along the new heading and tested
//!    against every obstacle.
//! 3. If a contact is predicted the avoidance matrix gives the heading change instead, using the
//!    position relative to the obstacle. Successive avoidance iterations alternate between
//!    backing off and following through.
//! 4. The new state is checked against the parking and disablement conditions.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use log::{debug, info, trace};
use nalgebra::Point2;

use comms_if::{
    tc::MatrixId,
    tm::{Outcome, SimTm},
    world::ObstacleRect,
};
use util::maths::lin_map;

use crate::{
    collision,
    fuzzy::{FuzzyError, RuleFiring},
    truck_ctrl::FuzzyCtrl,
};

use super::{SimError, SimParams};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// The simulated truck and its controller.
#[derive(Debug, Clone)]
pub struct TruckSim {
    params: SimParams,
    ctrl: FuzzyCtrl,
    state: SimTm,
    obstacles: Vec<ObstacleRect>,

    /// Set by an avoidance iteration which backed off, forcing the next iteration to follow
    /// through with avoidance
    avoiding: bool,

    trace: Vec<Point2<f64>>,
}

/// Everything that happened in one iteration.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// State after the iteration
    pub tm: SimTm,

    /// Heading change applied
    pub delta_phi_deg: f64,

    /// The obstacle avoided, if avoidance was used
    pub avoided: Option<ObstacleRect>,

    /// Match degrees of every evaluated matrix, in evaluation order
    pub firings: Vec<(MatrixId, Vec<RuleFiring>)>,

    /// Status line for display
    pub status: String,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl TruckSim {
    /// Create a new simulation at the start pose given in the parameters.
    pub fn new(params: SimParams) -> Result<Self, FuzzyError> {
        let ctrl = FuzzyCtrl::new()?;
        let state = start_state(&params);

        Ok(Self {
            params,
            ctrl,
            state,
            obstacles: vec![],
            avoiding: false,
            trace: vec![],
        })
    }

    /// Current state of the truck.
    pub fn tm(&self) -> SimTm {
        self.state
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn ctrl(&self) -> &FuzzyCtrl {
        &self.ctrl
    }

    pub fn ctrl_mut(&mut self) -> &mut FuzzyCtrl {
        &mut self.ctrl
    }

    pub fn obstacles(&self) -> &[ObstacleRect] {
        &self.obstacles
    }

    /// Positions recorded while tracing was on.
    pub fn trace(&self) -> &[Point2<f64>] {
        &self.trace
    }

    /// True if the next iteration is forced to follow through with avoidance.
    pub fn is_avoiding(&self) -> bool {
        self.avoiding
    }

    /// Set the start pose.
    ///
    /// If the truck hasn't moved since the last reset it is moved to the new pose straight away.
    pub fn set_start_pose(&mut self, x: f64, y: f64, phi_deg: f64) {
        self.params.start_x = x;
        self.params.start_y = y;
        self.params.start_phi_deg = phi_deg;

        if self.state.iteration == 0 {
            self.state = start_state(&self.params);
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.params.speed = speed;
    }

    pub fn set_sim_rate(&mut self, rate: u32) {
        self.params.sim_rate = rate;
    }

    pub fn set_tracing(&mut self, enabled: bool) {
        self.params.tracing = enabled;
    }

    pub fn set_show_rule_firings(&mut self, enabled: bool) {
        self.params.show_rule_firings = enabled;
    }

    /// Replace the obstacles, which must all have a positive finite size.
    pub fn set_obstacles(&mut self, obstacles: Vec<ObstacleRect>) -> Result<(), SimError> {
        if let Some(bad) = obstacles.iter().find(|o| !is_valid_obstacle(o)) {
            return Err(SimError::InvalidObstacle(*bad));
        }

        self.obstacles = obstacles;
        Ok(())
    }

    /// Return the truck to its start pose, ready to run again.
    ///
    /// The rules and obstacles are kept.
    pub fn reset(&mut self) {
        self.state = start_state(&self.params);
        self.avoiding = false;
        self.trace.clear();

        info!(
            "Simulation reset to ({}, {}, {})",
            self.state.x, self.state.y, self.state.phi_deg
        );
    }

    /// Restore the primary rule matrix to its defaults, the truck isn't moved.
    pub fn reset_rules(&mut self) {
        self.ctrl.reset_rules();
    }

    /// Perform one iteration.
    ///
    /// Fails without changing anything if the run has already finished, or if the iteration
    /// would produce a non-finite state.
    pub fn iterate(&mut self) -> Result<IterationReport, SimError> {
        if self.state.outcome.is_finished() {
            return Err(SimError::AlreadyFinished(self.state.outcome));
        }

        let p = &self.params;
        let SimTm { x, y, phi_deg, .. } = self.state;
        let mut firings = Vec::with_capacity(2);

        // Free space steering
        let primary = self.ctrl.evaluate_primary(x, phi_deg);
        firings.push((MatrixId::Primary, primary.firings));
        let mut delta = primary.value;
        let (dx, dy) = displacement(phi_deg + delta, p.speed);

        // Look for obstacles ahead of the truck. While following through with avoidance the
        // first obstacle is used regardless of contact.
        let footprint = collision::footprint(
            Point2::new(x + p.lookahead * dx, y - p.lookahead * dy),
            phi_deg,
            p.truck_length,
            p.truck_width,
            p.view_scale,
        );

        let mut avoided = None;
        for obs in self.obstacles.iter() {
            if self.avoiding || collision::intersects(&footprint, &collision::rect_polygon(obs)) {
                let rel_x = lin_map(
                    (obs.x / p.view_scale, (obs.x + obs.width) / p.view_scale),
                    (0.0, 1.0),
                    x + p.avoid_lateral_offset,
                );
                let avoidance = self.ctrl.evaluate_avoidance(rel_x, phi_deg);

                debug!(
                    "Avoiding obstacle {:?}: relative position {:.3}, heading change {:.4}",
                    obs, rel_x, avoidance.value
                );

                delta = avoidance.value;
                firings.push((MatrixId::Avoidance, avoidance.firings));
                avoided = Some(*obs);
                break;
            }
        }

        // Compute the new state, which is only committed if it's valid
        let new_phi = phi_deg + delta;
        let (new_x, new_y, avoiding) = match avoided {
            None => (x + dx, y - dy, false),
            Some(_) => {
                let avoiding = !self.avoiding;
                let (bx, by) = displacement(new_phi, p.speed);

                if avoiding {
                    (
                        x - p.avoid_backoff * dx + bx,
                        y + p.avoid_backoff * dy - by,
                        avoiding,
                    )
                } else {
                    (x + bx, y - by, avoiding)
                }
            }
        };

        if !(new_x.is_finite() && new_y.is_finite() && new_phi.is_finite()) {
            return Err(SimError::NonFiniteState {
                x: new_x,
                y: new_y,
                phi_deg: new_phi,
            });
        }

        // Commit
        let outcome = self.check_outcome(new_x, new_y, new_phi);
        self.avoiding = avoiding;
        self.state = SimTm {
            x: new_x,
            y: new_y,
            phi_deg: new_phi,
            iteration: self.state.iteration + 1,
            outcome,
        };

        if self.params.tracing {
            self.trace.push(Point2::new(new_x, new_y));
        }

        trace!(
            "Iteration {}: ({:.3}, {:.3}, {:.3})",
            self.state.iteration,
            new_x,
            new_y,
            new_phi
        );

        if outcome.is_finished() {
            info!("{}", self.status_text());
        }

        Ok(IterationReport {
            tm: self.state,
            delta_phi_deg: delta,
            avoided,
            firings,
            status: format!(
                "Angle change = {:.4}, Iteration = {}",
                delta, self.state.iteration
            ),
        })
    }

    /// Text describing the outcome of a finished run, or the current iteration otherwise.
    pub fn status_text(&self) -> String {
        match self.state.outcome {
            Outcome::ParkedSuccessfully => format!(
                "Simulation Complete - parking successful, Iterations = {}",
                self.state.iteration
            ),
            Outcome::Disabled => format!(
                "Simulation Complete - parking unsuccessful, Iterations = {}",
                self.state.iteration
            ),
            Outcome::Running => format!("Iteration = {}", self.state.iteration),
        }
    }

    /// Parked is checked before disabled, so a parked truck on the arena edge counts as parked.
    fn check_outcome(&self, x: f64, y: f64, phi_deg: f64) -> Outcome {
        let p = &self.params;

        if y <= p.park_y_max
            && (p.target_x - x).abs() <= p.x_tolerance
            && (phi_deg - p.target_phi_deg).abs() <= p.phi_tolerance_deg
        {
            Outcome::ParkedSuccessfully
        } else if y < 0.0
            || x < 0.0
            || x > p.arena_size
            || (y > p.arena_size && (x - p.target_x).abs() > p.x_tolerance)
        {
            Outcome::Disabled
        } else {
            Outcome::Running
        }
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn start_state(params: &SimParams) -> SimTm {
    SimTm {
        x: params.start_x,
        y: params.start_y,
        phi_deg: params.start_phi_deg,
        iteration: 0,
        outcome: Outcome::Running,
    }
}

/// Displacement `(dx, dy)` in the y-up frame for a move of `speed` along `phi_deg`.
fn displacement(phi_deg: f64, speed: f64) -> (f64, f64) {
    let phi = phi_deg.to_radians();
    (speed * phi.cos(), speed * phi.sin())
}

fn is_valid_obstacle(o: &ObstacleRect) -> bool {
    o.x.is_finite()
        && o.y.is_finite()
        && o.width.is_finite()
        && o.height.is_finite()
        && o.width > 0.0
        && o.height > 0.0
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
