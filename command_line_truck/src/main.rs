//! Interactive command line for the fuzzy truck simulation.
//!
//! Reads commands from a prompt and forwards them to a running simulation, printing status
//! texts and rule firings as the simulation reports them. Type `help` for the list of commands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Report};
use rand::Rng;
use rustyline::{error::ReadlineError, DefaultEditor};
use structopt::StructOpt;

use comms_if::{
    tc::{MatrixId, SimCmd},
    world::ObstacleRect,
};
use truck_lib::sim::{SimObserver, SimParams, Simulation};
use util::params::LoadError;

mod cmd;

use cmd::{ObstacleCmd, ReplCmd};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "truck $ ";
const HISTORY_PATH: &str = "data/history.txt";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "command_line_truck", about = "Interactive fuzzy truck simulation")]
struct Opt {
    /// Start lateral position
    #[structopt(long, allow_hyphen_values = true)]
    x: Option<f64>,

    /// Start longitudinal position
    #[structopt(long, allow_hyphen_values = true)]
    y: Option<f64>,

    /// Start heading in degrees
    #[structopt(long, allow_hyphen_values = true)]
    phi: Option<f64>,

    /// Simulation rate, above 1 slows the simulation down
    #[structopt(long)]
    rate: Option<u32>,
}

/// Prints what the simulation reports to the terminal.
struct PrintObserver;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimObserver for PrintObserver {
    fn on_status_text(&mut self, text: &str) {
        println!("{}", text);
    }

    fn on_rule_fired(&mut self, matrix: MatrixId, row: usize, col: usize, degree: f64) {
        if degree > 0.0 {
            println!("  {} [{}][{}] fired at {:.4}", matrix, row, col, degree);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    let mut params = match util::params::load::<SimParams>("truck_sim.toml") {
        Ok(p) => p,
        Err(LoadError::SwRootNotSet) => {
            println!("FUZZY_TRUCK_ROOT is not set, using default parameters");
            SimParams::default()
        }
        Err(e) => return Err(e).wrap_err("Could not load simulation params"),
    };

    if let Some(x) = opt.x {
        params.start_x = x;
    }
    if let Some(y) = opt.y {
        params.start_y = y;
    }
    if let Some(phi) = opt.phi {
        params.start_phi_deg = phi;
    }
    if let Some(rate) = opt.rate {
        params.sim_rate = rate;
    }

    let sim = Simulation::new(params, Box::new(PrintObserver))
        .wrap_err("Failed to start the simulation")?;

    let mut rl = DefaultEditor::new()?;
    if rl.load_history(HISTORY_PATH).is_err() {
        println!("No history detected");
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str())?;

                let cmd = match ReplCmd::parse(&line) {
                    Ok(c) => c,
                    Err(e) => {
                        // Help and usage errors alike are printed by clap
                        println!("{}", e.message);
                        continue;
                    }
                };

                match execute(&sim, cmd) {
                    Ok(true) => (),
                    Ok(false) => break,
                    Err(e) => println!("Error: {:#}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                println!("Unhandled error: {:?}", e);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(HISTORY_PATH) {
        println!("Could not save history: {}", e);
    }

    println!("Exiting...");
    sim.shutdown().wrap_err("Simulation worker failed")?;

    Ok(())
}

/// Execute a command, returning `false` when the prompt should exit.
fn execute(sim: &Simulation, cmd: ReplCmd) -> Result<bool, Report> {
    match cmd {
        ReplCmd::Run => sim.send_cmd(SimCmd::Run)?,
        ReplCmd::Pause => sim.send_cmd(SimCmd::Pause)?,
        ReplCmd::Step => sim.send_cmd(SimCmd::Step)?,
        ReplCmd::Reset => {
            sim.reset()?;
            sim.set_obstacles(Vec::new())?;
        }
        ReplCmd::ResetRules => sim.reset_rules()?,
        ReplCmd::ResetMatrix { matrix } => sim.reset_matrix(matrix)?,
        ReplCmd::Pose { x, y, phi } => sim.set_start_pose(x, y, phi)?,
        ReplCmd::Speed { speed } => sim.set_speed(speed)?,
        ReplCmd::Rate { rate } => sim.set_sim_rate(rate)?,
        ReplCmd::Trace { enabled } => sim.set_tracing(enabled)?,
        ReplCmd::Firings { enabled } => sim.set_show_rule_firings(enabled)?,
        ReplCmd::Obstacle(ObstacleCmd::Add {
            x,
            y,
            width,
            height,
        }) => {
            let mut obstacles = sim.obstacles()?;
            obstacles.push(ObstacleRect::new(x, y, width, height));
            sim.set_obstacles(obstacles)?;
        }
        ReplCmd::Obstacle(ObstacleCmd::Random) => {
            let obstacles = random_obstacles(&mut rand::thread_rng());
            print_obstacles(&obstacles);
            sim.set_obstacles(obstacles)?;
        }
        ReplCmd::Obstacle(ObstacleCmd::Clear) => sim.set_obstacles(Vec::new())?,
        ReplCmd::Obstacle(ObstacleCmd::List) => print_obstacles(&sim.obstacles()?),
        ReplCmd::Rule {
            matrix,
            row,
            col,
            term,
        } => {
            let label = match term.as_str() {
                "-" => None,
                t => Some(t),
            };
            sim.set_rule_consequent(matrix, row, col, label)?;
        }
        ReplCmd::Rules { matrix } => print_rules(sim, matrix)?,
        ReplCmd::Status => {
            let tm = sim.snapshot()?;
            println!(
                "x = {:.3}, y = {:.3}, phi = {:.3}, iteration = {}, {:?} ({:?})",
                tm.x,
                tm.y,
                tm.phi_deg,
                tm.iteration,
                tm.outcome,
                sim.loop_state()?
            );
        }
        ReplCmd::Path => {
            let trace = sim.trace()?;
            if trace.is_empty() {
                println!("No path recorded, enable it with \"trace on\"");
            }
            for p in trace {
                println!("({:.3}, {:.3})", p.x, p.y);
            }
        }
        ReplCmd::Quit => return Ok(false),
    }

    Ok(true)
}

fn print_rules(sim: &Simulation, matrix: MatrixId) -> Result<(), Report> {
    let (rows, cols) = sim.matrix_labels(matrix)?;
    let table = sim.consequent_table(matrix)?;

    print!("{:>10}", "");
    for c in cols.iter() {
        print!("{:>10}", c);
    }
    println!();

    for (r, row) in rows.iter().zip(table.iter()) {
        print!("{:>10}", r);
        for cell in row.iter() {
            print!("{:>10}", cell.unwrap_or("-"));
        }
        println!();
    }

    Ok(())
}

fn print_obstacles(obstacles: &[ObstacleRect]) {
    if obstacles.is_empty() {
        println!("No obstacles");
    }
    for (i, o) in obstacles.iter().enumerate() {
        println!(
            "{}: x = {:.1}, y = {:.1}, width = {:.1}, height = {:.1}",
            i, o.x, o.y, o.width, o.height
        );
    }
}

/// Between one and four obstacles scattered over the arena, in view units.
fn random_obstacles<R: Rng>(rng: &mut R) -> Vec<ObstacleRect> {
    let num = rng.gen_range(1..=4);

    (0..num)
        .map(|_| {
            ObstacleRect::new(
                rng.gen_range(0..370) as f64,
                rng.gen_range(0..390) as f64,
                rng.gen_range(20..60) as f64,
                rng.gen_range(5..10) as f64,
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use truck_lib::sim::LoopState;

    #[test]
    fn test_reset_clears_obstacles() -> Result<(), Report> {
        let sim = Simulation::new(SimParams::default(), Box::new(PrintObserver))?;

        execute(&sim, ReplCmd::parse("obstacle add 180 170 40 8")?)?;
        assert_eq!(sim.obstacles()?.len(), 1);

        assert!(execute(&sim, ReplCmd::parse("reset")?)?);
        assert!(sim.obstacles()?.is_empty());
        assert_eq!(sim.loop_state()?, LoopState::Paused);

        assert!(!execute(&sim, ReplCmd::parse("quit")?)?);
        sim.shutdown()?;

        Ok(())
    }

    #[test]
    fn test_random_obstacles() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let obstacles = random_obstacles(&mut rng);
            assert!((1..=4).contains(&obstacles.len()));

            for o in obstacles {
                assert!((0.0..370.0).contains(&o.x));
                assert!((0.0..390.0).contains(&o.y));
                assert!((20.0..60.0).contains(&o.width));
                assert!((5.0..10.0).contains(&o.height));
            }
        }
    }
}
