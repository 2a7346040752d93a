//! Headless truck executable entry point.
//!
//! Runs a single simulation from the configured start pose until the truck parks, leaves the
//! arena or the iteration limit is reached, then archives the result in the session directory.
//!
//! # Usage
//!
//! ```text
//! truck_exec [--x <x>] [--y <y>] [--phi <phi>] [--speed <speed>] [--firings]
//! ```
//!
//! Parameters are loaded from `truck_sim.toml` and `truck_exec.toml` in the params directory,
//! with the command line options overriding them.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use truck_lib::sim::{LogObserver, LoopState, SimParams, Simulation};

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::{
    tc::{MatrixId, SimCmd},
    tm::SimTm,
};
use params::TruckExecParams;
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// How often the main thread checks on the simulation.
const POLL_PERIOD: Duration = Duration::from_millis(20);

/// How long the worker has to pick up the run command.
const START_GRACE: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "truck_exec", about = "Run the fuzzy truck parking simulation")]
struct Opt {
    /// Start lateral position
    #[structopt(long)]
    x: Option<f64>,

    /// Start longitudinal position
    #[structopt(long)]
    y: Option<f64>,

    /// Start heading in degrees
    #[structopt(long)]
    phi: Option<f64>,

    /// Distance driven per iteration
    #[structopt(long)]
    speed: Option<f64>,

    /// Log the match degree of every rule
    #[structopt(long)]
    firings: bool,
}

/// What the poll loop should do next.
#[derive(Debug, PartialEq)]
enum RunStatus {
    Continue,
    Finished,
    IterationLimit,

    /// The loop paused itself after a failed iteration.
    Stalled,
}

/// Rule tables as archived in the session.
#[derive(Serialize)]
struct RulesArchive {
    primary: Vec<Vec<Option<&'static str>>>,
    avoidance: Vec<Vec<Option<&'static str>>>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    let opt = Opt::from_args();

    // Initialise session
    let session = Session::new("truck_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Fuzzy Truck Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut sim_params: SimParams =
        util::params::load("truck_sim.toml").wrap_err("Could not load simulation params")?;
    let exec_params: TruckExecParams =
        util::params::load("truck_exec.toml").wrap_err("Could not load exec params")?;

    if let Some(x) = opt.x {
        sim_params.start_x = x;
    }
    if let Some(y) = opt.y {
        sim_params.start_y = y;
    }
    if let Some(phi) = opt.phi {
        sim_params.start_phi_deg = phi;
    }
    if let Some(speed) = opt.speed {
        sim_params.speed = speed;
    }
    sim_params.show_rule_firings |= opt.firings;
    sim_params.tracing |= exec_params.save_trace;

    info!("Exec parameters loaded");

    // ---- RUN ----

    let sim = Simulation::new(sim_params, Box::new(LogObserver))
        .wrap_err("Failed to start the simulation")?;
    sim.set_obstacles(exec_params.obstacles.clone())
        .wrap_err("Invalid obstacle in exec params")?;

    sim.send_cmd(SimCmd::Run)
        .wrap_err("Failed to start the run")?;

    // The worker may not have taken the run command yet, it isn't stalled until it has started
    let run_start = Instant::now();
    let mut started = false;

    loop {
        thread::sleep(POLL_PERIOD);

        let tm = sim.snapshot()?;
        let state = sim.loop_state()?;
        started |= tm.iteration > 0
            || state != LoopState::Paused
            || run_start.elapsed() > START_GRACE;

        match check_run(&tm, state, started, exec_params.max_iterations) {
            RunStatus::Continue => continue,
            RunStatus::Finished => break,
            RunStatus::IterationLimit => {
                warn!(
                    "Run didn't finish within {} iterations, stopping",
                    exec_params.max_iterations
                );
                sim.send_cmd(SimCmd::Pause)?;
                break;
            }
            RunStatus::Stalled => {
                warn!("Simulation paused unexpectedly, stopping");
                break;
            }
        }
    }

    // ---- ARCHIVE ----

    let tm = sim.snapshot()?;
    info!(
        "Run ended at ({:.3}, {:.3}, {:.3}) after {} iterations: {:?}",
        tm.x, tm.y, tm.phi_deg, tm.iteration, tm.outcome
    );

    session.save("final_state.json", tm);
    session.save(
        "rules.json",
        RulesArchive {
            primary: sim.consequent_table(MatrixId::Primary)?,
            avoidance: sim.consequent_table(MatrixId::Avoidance)?,
        },
    );
    if exec_params.save_trace {
        session.save("trace.json", sim.trace()?);
    }

    sim.shutdown().wrap_err("Simulation worker failed")?;

    session.exit();

    Ok(())
}

/// Decide whether the run is over. A paused loop only counts as stalled once the run has started.
fn check_run(tm: &SimTm, state: LoopState, started: bool, max_iterations: u64) -> RunStatus {
    if tm.outcome.is_finished() {
        RunStatus::Finished
    } else if tm.iteration >= max_iterations {
        RunStatus::IterationLimit
    } else if started && state == LoopState::Paused {
        RunStatus::Stalled
    } else {
        RunStatus::Continue
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tm::Outcome;

    fn tm(iteration: u64, outcome: Outcome) -> SimTm {
        SimTm {
            x: 50.0,
            y: 50.0,
            phi_deg: 90.0,
            iteration,
            outcome,
        }
    }

    #[test]
    fn test_check_run() {
        // Run not yet picked up
        assert_eq!(
            check_run(&tm(0, Outcome::Running), LoopState::Paused, false, 100),
            RunStatus::Continue
        );
        assert_eq!(
            check_run(&tm(0, Outcome::Running), LoopState::Running, true, 100),
            RunStatus::Continue
        );

        assert_eq!(
            check_run(&tm(12, Outcome::Running), LoopState::Paused, true, 100),
            RunStatus::Stalled
        );
        assert_eq!(
            check_run(&tm(100, Outcome::Running), LoopState::Running, true, 100),
            RunStatus::IterationLimit
        );
        assert_eq!(
            check_run(
                &tm(50, Outcome::ParkedSuccessfully),
                LoopState::Finished(Outcome::ParkedSuccessfully),
                true,
                100
            ),
            RunStatus::Finished
        );
    }
}
