//! # Fuzzy inference
//!
//! Evaluates a [`RuleMatrix`] for a pair of crisp inputs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use serde::Serialize;

use super::{FuzzySet, RuleMatrix, Term};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The degree to which one rule of a matrix matched its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleFiring {
    pub row: usize,
    pub col: usize,
    pub degree: f64,
}

/// The result of evaluating a rule matrix.
#[derive(Debug, Clone)]
pub struct Conclusion {
    /// The defuzzified output
    pub value: f64,

    /// The aggregated output set
    pub output: FuzzySet,

    /// Match degree of every rule with a consequent, including those which
    /// didn't fire, in row-major order
    pub firings: Vec<RuleFiring>,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Evaluate a rule matrix for crisp inputs `(col_input, row_input)`.
///
/// Each input is fuzzified as a singleton, every rule's match degree is found
/// with minimum, the consequents of rules with a non-zero degree are clipped
/// and combined with maximum, and the result is defuzzified with the centroid
/// method over the output domain. If no rule fires the output is `0.0`.
pub fn evaluate<R: Term, C: Term, O: Term>(
    matrix: &RuleMatrix<R, C, O>,
    inputs: (f64, f64),
) -> Conclusion {
    let (col_input, row_input) = inputs;
    let crisp = [
        matrix.col_var().fuzzify(col_input),
        matrix.row_var().fuzzify(row_input),
    ];

    let mut output = FuzzySet::new();
    let mut firings = Vec::with_capacity(matrix.rows() * matrix.cols());

    for (row, col, consequent) in matrix.cells() {
        let consequent = match consequent {
            Some(c) => c,
            None => continue,
        };

        // The cell is known to be valid so the rule can always be built
        let degree = match matrix.rule(row, col) {
            Ok(rule) => rule.match_degree(&crisp),
            Err(_) => continue,
        };

        firings.push(RuleFiring { row, col, degree });

        if degree > 0.0 {
            trace!(
                "Rule ({}, {}) -> {} fired with degree {}",
                row,
                col,
                consequent.label(),
                degree
            );
            output.union(matrix.output().value(consequent).implicate(degree));
        }
    }

    let value = output.defuzzify(matrix.output().domain());

    Conclusion {
        value,
        output,
        firings,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::fuzzy::{FuzzyVariable, MembershipFunction};

    crate::fuzzy_terms! {
        pub enum Side {
            Left => "L",
            Right => "R",
        }
    }

    crate::fuzzy_terms! {
        pub enum Turn {
            Neg => "N",
            Zero => "Z",
            Pos => "P",
        }
    }

    fn side(name: &str) -> FuzzyVariable<Side> {
        FuzzyVariable::new(
            name,
            (0.0, 10.0),
            "",
            &[
                (Side::Left, MembershipFunction::right_shoulder(0.0, 10.0).unwrap()),
                (Side::Right, MembershipFunction::left_shoulder(0.0, 10.0).unwrap()),
            ],
        )
        .unwrap()
    }

    fn turn() -> FuzzyVariable<Turn> {
        FuzzyVariable::new(
            "turn",
            (-10.0, 10.0),
            "",
            &[
                (Turn::Neg, MembershipFunction::triangular(-10.0, -5.0, 0.0).unwrap()),
                (Turn::Zero, MembershipFunction::triangular(-5.0, 0.0, 5.0).unwrap()),
                (Turn::Pos, MembershipFunction::triangular(0.0, 5.0, 10.0).unwrap()),
            ],
        )
        .unwrap()
    }

    fn matrix() -> RuleMatrix<Side, Side, Turn> {
        use Turn::*;
        RuleMatrix::new(
            side("heading"),
            side("position"),
            turn(),
            vec![vec![Some(Pos), Some(Zero)], vec![None, Some(Neg)]],
        )
        .unwrap()
    }

    #[test]
    fn test_single_rule() {
        // Position fully left and heading fully left, only (0, 0) fires
        let c = evaluate(&matrix(), (0.0, 0.0));
        assert!((c.value - 5.0).abs() < 1e-12);
        assert_eq!(
            c.firings,
            vec![
                RuleFiring { row: 0, col: 0, degree: 1.0 },
                RuleFiring { row: 0, col: 1, degree: 0.0 },
                RuleFiring { row: 1, col: 1, degree: 0.0 },
            ]
        );
    }

    #[test]
    fn test_balanced_rules() {
        // Position fully right, heading half way: (0, 1) -> Z and (1, 1) -> N
        // fire with equal degree, pulling the centroid below zero
        let c = evaluate(&matrix(), (10.0, 5.0));
        assert_eq!(c.firings[1].degree, 0.5);
        assert_eq!(c.firings[2].degree, 0.5);
        assert!(c.value < 0.0 && c.value > -5.0);
        assert!((c.output.max_degree() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_rule_fires() {
        // Only the empty cell (1, 0) would match
        let c = evaluate(&matrix(), (0.0, 10.0));
        assert!(c.output.is_empty());
        assert_eq!(c.value, 0.0);
        assert!(c.firings.iter().all(|f| f.degree == 0.0));
        assert_eq!(c.firings.len(), 3);
    }
}
