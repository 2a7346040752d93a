//! # Simulation
//!
//! Runs a [`TruckSim`] on a dedicated worker thread, controlled by [`SimCmd`]s from the host.
//!
//! The host owns a [`Simulation`], which shares the truck with the worker behind a lock. Commands
//! are delivered last-writer-wins: a command the worker hasn't yet picked up is replaced by any
//! newer command. While paused the worker blocks on the command channel, waking periodically.
//!
//! The worker reports back through a [`SimObserver`] given at construction. Observer methods are
//! called on the worker thread with no locks held, so they may call back into the simulation.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::{
    sync::{
        mpsc::{channel, SendError, Sender},
        Arc, PoisonError, RwLock,
    },
    thread::{self, JoinHandle},
};

use log::{debug, info, warn};
use nalgebra::Point2;

use comms_if::{
    tc::{MatrixId, SimCmd},
    tm::{Outcome, SimTm},
    world::ObstacleRect,
};
use util::params::LoadError;

use crate::fuzzy::FuzzyError;

use self::worker::worker_thread;
pub use self::worker::WorkerSignal;

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod params;
pub mod truck;
mod worker;

pub use params::SimParams;
pub use truck::{IterationReport, TruckSim};

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// Receives events from the simulation worker.
///
/// All methods default to doing nothing.
pub trait SimObserver: Send {
    /// Called after every committed iteration.
    fn on_state_changed(&mut self, _tm: &SimTm) {}

    /// Called with a human readable status line after every iteration, and with the outcome
    /// once the run finishes.
    fn on_status_text(&mut self, _text: &str) {}

    /// Called with the match degree of every rule with a consequent in each evaluated matrix,
    /// when rule firing display is enabled.
    fn on_rule_fired(&mut self, _matrix: MatrixId, _row: usize, _col: usize, _degree: f64) {}
}

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Host handle to a running simulation.
///
/// Dropping the handle stops the worker.
#[derive(Debug)]
pub struct Simulation {
    shared: Arc<Shared>,

    worker_jh: Option<JoinHandle<Result<(), SimError>>>,

    worker_sender: Sender<WorkerSignal>,
}

/// Observer which writes events to the log.
#[derive(Debug, Default)]
pub struct LogObserver;

/// Data shared between the host and the worker.
///
/// Locks are always taken in the order `truck` then `loop_state`.
#[derive(Debug)]
struct Shared {
    truck: RwLock<TruckSim>,
    loop_state: RwLock<LoopState>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

/// State of the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopState {
    /// Waiting for a command
    Paused,

    /// Performing a single iteration, after which the loop pauses
    SteppingOnce,

    /// Iterating freely
    Running,

    /// The run has ended, nothing happens until a reset
    Finished(Outcome),
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Couldn't load parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Fuzzy controller error: {0}")]
    FuzzyError(FuzzyError),

    #[error("Sync primitive is poisoned")]
    PoisonError,

    #[error("Failed to send signal {0:?} to the worker")]
    SendError(WorkerSignal),

    #[error("Couldn't spawn the worker thread: {0}")]
    WorkerSpawnError(std::io::Error),

    #[error("The worker thread panicked")]
    WorkerPanicked,

    #[error("Iteration produced a non-finite state ({x}, {y}, {phi_deg}), state left unchanged")]
    NonFiniteState { x: f64, y: f64, phi_deg: f64 },

    #[error("The simulation has already finished ({0:?}), reset it to run again")]
    AlreadyFinished(Outcome),

    #[error("Obstacle {0:?} must have a positive finite size")]
    InvalidObstacle(ObstacleRect),
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Simulation {
    /// Create a new simulation and start its worker, which begins paused.
    pub fn new(params: SimParams, observer: Box<dyn SimObserver>) -> Result<Self, SimError> {
        let truck = TruckSim::new(params)?;

        let shared = Arc::new(Shared {
            truck: RwLock::new(truck),
            loop_state: RwLock::new(LoopState::Paused),
        });
        let shared_worker = shared.clone();

        let (worker_sender, rx) = channel();

        let worker_jh = thread::Builder::new()
            .name("sim::worker".into())
            .spawn(move || worker_thread(shared_worker, rx, observer))
            .map_err(SimError::WorkerSpawnError)?;

        info!("Simulation worker started");

        Ok(Self {
            shared,
            worker_jh: Some(worker_jh),
            worker_sender,
        })
    }

    /// Send a command to the control loop, replacing any command not yet picked up.
    pub fn send_cmd(&self, cmd: SimCmd) -> Result<(), SimError> {
        debug!("Sending {:?} to the worker", cmd);
        self.worker_sender.send(WorkerSignal::Cmd(cmd))?;
        Ok(())
    }

    /// Set the start pose, applied immediately if the truck hasn't moved since the last reset.
    pub fn set_start_pose(&self, x: f64, y: f64, phi_deg: f64) -> Result<(), SimError> {
        self.shared.truck.write()?.set_start_pose(x, y, phi_deg);
        Ok(())
    }

    pub fn set_speed(&self, speed: f64) -> Result<(), SimError> {
        self.shared.truck.write()?.set_speed(speed);
        Ok(())
    }

    pub fn set_sim_rate(&self, rate: u32) -> Result<(), SimError> {
        self.shared.truck.write()?.set_sim_rate(rate);
        Ok(())
    }

    pub fn set_tracing(&self, enabled: bool) -> Result<(), SimError> {
        self.shared.truck.write()?.set_tracing(enabled);
        Ok(())
    }

    pub fn set_show_rule_firings(&self, enabled: bool) -> Result<(), SimError> {
        self.shared.truck.write()?.set_show_rule_firings(enabled);
        Ok(())
    }

    pub fn set_obstacles(&self, obstacles: Vec<ObstacleRect>) -> Result<(), SimError> {
        self.shared.truck.write()?.set_obstacles(obstacles)
    }

    /// Set or clear (`None`) the consequent of a rule, effective from the next iteration.
    pub fn set_rule_consequent(
        &self,
        matrix: MatrixId,
        row: usize,
        col: usize,
        label: Option<&str>,
    ) -> Result<(), SimError> {
        self.shared
            .truck
            .write()?
            .ctrl_mut()
            .set_consequent(matrix, row, col, label)?;
        Ok(())
    }

    /// Restore the primary rules to their defaults.
    pub fn reset_rules(&self) -> Result<(), SimError> {
        self.shared.truck.write()?.reset_rules();
        Ok(())
    }

    /// Restore either matrix to its defaults.
    pub fn reset_matrix(&self, matrix: MatrixId) -> Result<(), SimError> {
        self.shared.truck.write()?.ctrl_mut().reset_matrix(matrix);
        Ok(())
    }

    /// Return the truck to its start pose and pause the loop.
    pub fn reset(&self) -> Result<(), SimError> {
        {
            let mut truck = self.shared.truck.write()?;
            truck.reset();
            *self.shared.loop_state.write()? = LoopState::Paused;
        }

        // Replace any command which hasn't been picked up yet
        self.send_cmd(SimCmd::Pause)
    }

    /// A consistent snapshot of the truck state.
    pub fn snapshot(&self) -> Result<SimTm, SimError> {
        Ok(self.shared.truck.read()?.tm())
    }

    pub fn loop_state(&self) -> Result<LoopState, SimError> {
        Ok(*self.shared.loop_state.read()?)
    }

    pub fn params(&self) -> Result<SimParams, SimError> {
        Ok(self.shared.truck.read()?.params().clone())
    }

    pub fn obstacles(&self) -> Result<Vec<ObstacleRect>, SimError> {
        Ok(self.shared.truck.read()?.obstacles().to_vec())
    }

    /// Positions recorded while tracing was on.
    pub fn trace(&self) -> Result<Vec<Point2<f64>>, SimError> {
        Ok(self.shared.truck.read()?.trace().to_vec())
    }

    /// The label of a rule's consequent.
    pub fn consequent(
        &self,
        matrix: MatrixId,
        row: usize,
        col: usize,
    ) -> Result<Option<&'static str>, SimError> {
        Ok(self.shared.truck.read()?.ctrl().consequent(matrix, row, col)?)
    }

    /// All consequent labels of a matrix, indexed `[row][col]`.
    pub fn consequent_table(
        &self,
        matrix: MatrixId,
    ) -> Result<Vec<Vec<Option<&'static str>>>, SimError> {
        Ok(self.shared.truck.read()?.ctrl().consequent_table(matrix))
    }

    /// Row and column labels of a matrix.
    pub fn matrix_labels(
        &self,
        matrix: MatrixId,
    ) -> Result<(Vec<&'static str>, Vec<&'static str>), SimError> {
        let truck = self.shared.truck.read()?;
        Ok((truck.ctrl().row_labels(matrix), truck.ctrl().col_labels(matrix)))
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) -> Result<(), SimError> {
        self.stop_worker()
    }

    fn stop_worker(&mut self) -> Result<(), SimError> {
        let jh = match self.worker_jh.take() {
            Some(jh) => jh,
            None => return Ok(()),
        };

        // The worker may already have exited with an error, which join reports
        if self.worker_sender.send(WorkerSignal::Shutdown).is_err() {
            debug!("Worker already stopped");
        }

        match jh.join() {
            Ok(r) => {
                info!("Simulation worker stopped");
                r
            }
            Err(_) => Err(SimError::WorkerPanicked),
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if let Err(e) = self.stop_worker() {
            warn!("Simulation worker exited with an error: {}", e);
        }
    }
}

impl SimObserver for LogObserver {
    fn on_state_changed(&mut self, tm: &SimTm) {
        debug!(
            "Truck at ({:.3}, {:.3}, {:.3}), iteration {}, {:?}",
            tm.x, tm.y, tm.phi_deg, tm.iteration, tm.outcome
        );
    }

    fn on_status_text(&mut self, text: &str) {
        info!("{}", text);
    }
}

impl From<LoadError> for SimError {
    fn from(e: LoadError) -> Self {
        Self::ParamLoadError(e)
    }
}

impl From<FuzzyError> for SimError {
    fn from(e: FuzzyError) -> Self {
        Self::FuzzyError(e)
    }
}

impl<G> From<PoisonError<G>> for SimError {
    fn from(_: PoisonError<G>) -> Self {
        Self::PoisonError
    }
}

impl From<SendError<WorkerSignal>> for SimError {
    fn from(e: SendError<WorkerSignal>) -> Self {
        Self::SendError(e.0)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
