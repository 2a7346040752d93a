//! # Truck fuzzy controller
//!
//! The controller steers the truck towards the parking bay using two rule
//! matrices:
//!
//! - The primary matrix maps the truck's lateral position and heading onto a
//!   heading change while in free space.
//! - The avoidance matrix maps the truck's position relative to an obstacle
//!   and its heading onto a heading change which steers around the obstacle.
//!
//! Both matrices share the [`SteerTerm`] output terms and the
//! [`PositionTerm`] column terms, although their variables cover different
//! domains. Cells are addressed by `(row, col)` where rows are heading terms
//! and columns are position terms.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod design;
mod terms;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use comms_if::tc::MatrixId;

use crate::fuzzy::{self, Conclusion, FuzzyError, RuleMatrix, Term};
pub use terms::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Free space steering matrix
pub type PrimaryMatrix = RuleMatrix<HeadingTerm, PositionTerm, SteerTerm>;

/// Obstacle avoidance matrix
pub type AvoidanceMatrix = RuleMatrix<AvoidHeadingTerm, PositionTerm, SteerTerm>;

/// The pair of rule matrices making up the truck controller.
///
/// Each controller owns its own matrices, edits to one controller are never
/// seen by another.
#[derive(Debug, Clone)]
pub struct FuzzyCtrl {
    primary: PrimaryMatrix,
    avoidance: AvoidanceMatrix,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FuzzyCtrl {
    /// Build the controller with the default rule tables.
    pub fn new() -> Result<Self, FuzzyError> {
        let primary = RuleMatrix::new(
            design::heading()?,
            design::position()?,
            design::steer()?,
            design::parse_table(&design::PRIMARY_DEFAULTS)?,
        )?;

        let avoidance = RuleMatrix::new(
            design::avoid_heading()?,
            design::avoid_position()?,
            design::avoid_steer()?,
            design::parse_table(&design::AVOIDANCE_DEFAULTS)?,
        )?;

        Ok(Self { primary, avoidance })
    }

    pub fn primary(&self) -> &PrimaryMatrix {
        &self.primary
    }

    pub fn avoidance(&self) -> &AvoidanceMatrix {
        &self.avoidance
    }

    /// Evaluate the primary matrix for the truck's position and heading.
    pub fn evaluate_primary(&self, x: f64, phi_deg: f64) -> Conclusion {
        fuzzy::evaluate(&self.primary, (x, phi_deg))
    }

    /// Evaluate the avoidance matrix for the position relative to an obstacle
    /// and the truck's heading.
    pub fn evaluate_avoidance(&self, rel_x: f64, phi_deg: f64) -> Conclusion {
        fuzzy::evaluate(&self.avoidance, (rel_x, phi_deg))
    }

    /// Number of `(rows, cols)` in a matrix.
    pub fn dims(&self, id: MatrixId) -> (usize, usize) {
        match id {
            MatrixId::Primary => (self.primary.rows(), self.primary.cols()),
            MatrixId::Avoidance => (self.avoidance.rows(), self.avoidance.cols()),
        }
    }

    /// Set the consequent of a cell by its label, `None` clears the cell.
    ///
    /// Unknown labels and cells are rejected without changing the matrix.
    pub fn set_consequent(
        &mut self,
        id: MatrixId,
        row: usize,
        col: usize,
        label: Option<&str>,
    ) -> Result<(), FuzzyError> {
        let term = match label {
            Some(l) => Some(SteerTerm::from_label(l)?),
            None => None,
        };

        match id {
            MatrixId::Primary => self.primary.set_consequent(row, col, term),
            MatrixId::Avoidance => self.avoidance.set_consequent(row, col, term),
        }
    }

    /// Get the label of a cell's consequent.
    pub fn consequent(
        &self,
        id: MatrixId,
        row: usize,
        col: usize,
    ) -> Result<Option<&'static str>, FuzzyError> {
        let term = match id {
            MatrixId::Primary => self.primary.consequent(row, col)?,
            MatrixId::Avoidance => self.avoidance.consequent(row, col)?,
        };

        Ok(term.map(|t| t.label()))
    }

    /// Restore the primary matrix to its default table.
    pub fn reset_rules(&mut self) {
        self.reset_matrix(MatrixId::Primary);
    }

    /// Restore one matrix to its default table.
    pub fn reset_matrix(&mut self, id: MatrixId) {
        match id {
            MatrixId::Primary => self.primary.reset_to_defaults(),
            MatrixId::Avoidance => self.avoidance.reset_to_defaults(),
        }

        info!("{} rules reset to defaults", id);
    }

    /// The table of consequent labels of a matrix, indexed `[row][col]`.
    pub fn consequent_table(&self, id: MatrixId) -> Vec<Vec<Option<&'static str>>> {
        fn labels(table: Vec<Vec<Option<SteerTerm>>>) -> Vec<Vec<Option<&'static str>>> {
            table
                .into_iter()
                .map(|r| r.into_iter().map(|c| c.map(|t| t.label())).collect())
                .collect()
        }

        match id {
            MatrixId::Primary => labels(self.primary.consequent_table()),
            MatrixId::Avoidance => labels(self.avoidance.consequent_table()),
        }
    }

    /// Labels of the rows of a matrix.
    pub fn row_labels(&self, id: MatrixId) -> Vec<&'static str> {
        match id {
            MatrixId::Primary => HeadingTerm::ALL.iter().map(|t| t.label()).collect(),
            MatrixId::Avoidance => AvoidHeadingTerm::ALL.iter().map(|t| t.label()).collect(),
        }
    }

    /// Labels of the columns of a matrix.
    pub fn col_labels(&self, _id: MatrixId) -> Vec<&'static str> {
        PositionTerm::ALL.iter().map(|t| t.label()).collect()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
