//! # Telecommand module
//!
//! Commands issued by a host to the simulation control loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A control message for the simulation loop.
///
/// Delivery is last-writer-wins: a new command overwrites any command the
/// loop has not yet consumed.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub enum SimCmd {
    /// Enter or continue free running.
    Run,

    /// Stop iterating until another command arrives.
    Pause,

    /// Perform exactly one iteration then pause.
    Step,
}

/// Identifies one of the two rule matrices held by the controller.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum MatrixId {
    /// Free space steering matrix (heading x lateral position).
    Primary,

    /// Obstacle avoidance matrix, used when a contact is predicted.
    Avoidance,
}

/// Possible parsing errors.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TcParseError {
    #[error("\"{0}\" is not a recognised simulation command (expected run, pause or step)")]
    InvalidSimCmd(String),

    #[error("\"{0}\" is not a recognised rule matrix (expected primary or avoidance)")]
    InvalidMatrixId(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FromStr for SimCmd {
    type Err = TcParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "run" | "go" => Ok(SimCmd::Run),
            "pause" => Ok(SimCmd::Pause),
            "step" => Ok(SimCmd::Step),
            _ => Err(TcParseError::InvalidSimCmd(s.to_string())),
        }
    }
}

impl FromStr for MatrixId {
    type Err = TcParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "p" => Ok(MatrixId::Primary),
            "avoidance" | "avoid" | "a" => Ok(MatrixId::Avoidance),
            _ => Err(TcParseError::InvalidMatrixId(s.to_string())),
        }
    }
}

impl Display for MatrixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixId::Primary => write!(f, "primary"),
            MatrixId::Avoidance => write!(f, "avoidance"),
        }
    }
}
