//! # REPL commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use structopt::{clap::AppSettings, StructOpt};

use comms_if::tc::MatrixId;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command entered at the prompt.
#[derive(Debug, StructOpt)]
#[structopt(name = "truck")]
pub enum ReplCmd {
    /// Start or continue running the simulation.
    #[structopt(name = "run")]
    Run,

    /// Pause the simulation.
    #[structopt(name = "pause")]
    Pause,

    /// Perform a single iteration.
    #[structopt(name = "step")]
    Step,

    /// Return the truck to its start pose, clear the obstacles and pause.
    #[structopt(name = "reset")]
    Reset,

    /// Restore the primary rules to their defaults.
    #[structopt(name = "reset-rules")]
    ResetRules,

    /// Restore a rule matrix (primary or avoidance) to its defaults.
    #[structopt(name = "reset-matrix")]
    ResetMatrix {
        /// The matrix to reset
        matrix: MatrixId,
    },

    /// Set the start pose, applied straight away if the truck hasn't moved.
    #[structopt(name = "pose", setting = AppSettings::AllowNegativeNumbers)]
    Pose {
        /// Lateral position, 0 to 100
        #[structopt(allow_hyphen_values = true)]
        x: f64,

        /// Longitudinal position, 0 (the bay) to 100
        #[structopt(allow_hyphen_values = true)]
        y: f64,

        /// Heading in degrees, 90 faces the bay
        #[structopt(allow_hyphen_values = true)]
        phi: f64,
    },

    /// Set the distance driven per iteration.
    #[structopt(name = "speed")]
    Speed { speed: f64 },

    /// Set the simulation rate, above 1 slows the simulation down.
    #[structopt(name = "rate")]
    Rate { rate: u32 },

    /// Turn path tracing on or off.
    #[structopt(name = "trace")]
    Trace {
        #[structopt(parse(try_from_str = parse_switch))]
        enabled: bool,
    },

    /// Turn rule firing display on or off.
    #[structopt(name = "firings")]
    Firings {
        #[structopt(parse(try_from_str = parse_switch))]
        enabled: bool,
    },

    /// Manage obstacles.
    #[structopt(name = "obstacle")]
    Obstacle(ObstacleCmd),

    /// Set the consequent of a rule, use "-" to clear it.
    #[structopt(name = "rule")]
    Rule {
        /// The matrix holding the rule
        matrix: MatrixId,

        /// Row (heading term) index
        row: usize,

        /// Column (position term) index
        col: usize,

        /// Output term label, e.g. "PS"
        term: String,
    },

    /// Show the rules of a matrix.
    #[structopt(name = "rules")]
    Rules {
        /// The matrix to show
        #[structopt(default_value = "primary")]
        matrix: MatrixId,
    },

    /// Show the state of the truck.
    #[structopt(name = "status")]
    Status,

    /// Show the traced path.
    #[structopt(name = "path")]
    Path,

    /// Exit.
    #[structopt(name = "quit", alias = "exit")]
    Quit,
}

#[derive(Debug, StructOpt)]
pub enum ObstacleCmd {
    /// Add a rectangle, in view units (4 per world unit).
    #[structopt(name = "add")]
    Add {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    /// Replace the obstacles with between one and four random ones.
    #[structopt(name = "random")]
    Random,

    /// Remove all obstacles.
    #[structopt(name = "clear")]
    Clear,

    /// List the obstacles.
    #[structopt(name = "list")]
    List,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ReplCmd {
    /// Parse a line entered at the prompt.
    pub fn parse(line: &str) -> Result<Self, structopt::clap::Error> {
        Self::from_iter_safe(std::iter::once("truck").chain(line.split_whitespace()))
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn parse_switch(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected on or off, found \"{}\"", s)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(matches!(ReplCmd::parse("step"), Ok(ReplCmd::Step)));
        assert!(matches!(ReplCmd::parse("run"), Ok(ReplCmd::Run)));
        assert!(matches!(ReplCmd::parse("exit"), Ok(ReplCmd::Quit)));

        match ReplCmd::parse("pose 20 70 -10") {
            Ok(ReplCmd::Pose { x, y, phi }) => assert_eq!((x, y, phi), (20.0, 70.0, -10.0)),
            r => panic!("Unexpected {:?}", r),
        }

        match ReplCmd::parse("rule avoid 2 3 -") {
            Ok(ReplCmd::Rule {
                matrix,
                row,
                col,
                term,
            }) => {
                assert_eq!(matrix, MatrixId::Avoidance);
                assert_eq!((row, col), (2, 3));
                assert_eq!(term, "-");
            }
            r => panic!("Unexpected {:?}", r),
        }

        assert!(matches!(
            ReplCmd::parse("rules"),
            Ok(ReplCmd::Rules {
                matrix: MatrixId::Primary
            })
        ));
        assert!(matches!(
            ReplCmd::parse("trace on"),
            Ok(ReplCmd::Trace { enabled: true })
        ));
        assert!(matches!(
            ReplCmd::parse("obstacle add 10 20 30 8"),
            Ok(ReplCmd::Obstacle(ObstacleCmd::Add { .. }))
        ));

        assert!(ReplCmd::parse("trace maybe").is_err());
        assert!(ReplCmd::parse("fly").is_err());
        assert!(ReplCmd::parse("rules nowhere").is_err());
    }
}
