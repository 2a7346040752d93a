//! # Fuzzy rules and rule matrices

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use super::{FuzzyError, FuzzyValue, FuzzyVariable, Term};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rule, `IF a_1 AND ... AND a_n THEN consequent`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub antecedents: Vec<FuzzyValue>,
    pub consequent: Option<FuzzyValue>,
}

/// A two input rule base laid out as a table.
///
/// Cell `(row, col)` holds the rule
/// `IF col_var IS col_term AND row_var IS row_term THEN output IS consequent`,
/// where the consequent may be empty, in which case the rule never fires.
///
/// The defaults given at construction are kept so that the table can be
/// restored after editing.
#[derive(Debug, Clone)]
pub struct RuleMatrix<R: Term, C: Term, O: Term> {
    row_var: FuzzyVariable<R>,
    col_var: FuzzyVariable<C>,
    output: FuzzyVariable<O>,

    /// Row-major consequents
    consequents: Vec<Option<O>>,
    defaults: Vec<Option<O>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rule {
    /// The degree to which the given inputs satisfy the rule.
    ///
    /// Inputs are matched positionally against the antecedents and combined
    /// with minimum (AND). A rule with no antecedents, or with an antecedent
    /// left without an input, never matches.
    pub fn match_degree(&self, inputs: &[FuzzyValue]) -> f64 {
        if self.antecedents.is_empty() || inputs.len() < self.antecedents.len() {
            return 0.0;
        }

        self.antecedents
            .iter()
            .zip(inputs.iter())
            .map(|(a, i)| a.possibility(i))
            .fold(1.0, f64::min)
    }
}

impl<R: Term, C: Term, O: Term> RuleMatrix<R, C, O> {
    /// Create a new matrix from a table of default consequents, indexed
    /// `defaults[row][col]`.
    pub fn new(
        row_var: FuzzyVariable<R>,
        col_var: FuzzyVariable<C>,
        output: FuzzyVariable<O>,
        defaults: Vec<Vec<Option<O>>>,
    ) -> Result<Self, FuzzyError> {
        let rows = R::ALL.len();
        let cols = C::ALL.len();

        let found_cols = defaults
            .iter()
            .map(|r| r.len())
            .find(|&n| n != cols)
            .unwrap_or(cols);

        if defaults.len() != rows || found_cols != cols {
            return Err(FuzzyError::TableShape {
                rows,
                cols,
                found_rows: defaults.len(),
                found_cols,
            });
        }

        let defaults: Vec<Option<O>> = defaults.into_iter().flatten().collect();

        Ok(Self {
            row_var,
            col_var,
            output,
            consequents: defaults.clone(),
            defaults,
        })
    }

    pub fn rows(&self) -> usize {
        R::ALL.len()
    }

    pub fn cols(&self) -> usize {
        C::ALL.len()
    }

    pub fn row_var(&self) -> &FuzzyVariable<R> {
        &self.row_var
    }

    pub fn col_var(&self) -> &FuzzyVariable<C> {
        &self.col_var
    }

    pub fn output(&self) -> &FuzzyVariable<O> {
        &self.output
    }

    /// Replace the consequent of one cell, `None` clears the cell.
    pub fn set_consequent(
        &mut self,
        row: usize,
        col: usize,
        consequent: Option<O>,
    ) -> Result<(), FuzzyError> {
        let idx = self.cell_index(row, col)?;
        self.consequents[idx] = consequent;

        debug!(
            "Rule ({}, {}) of {}/{} set to {}",
            row,
            col,
            self.row_var.name(),
            self.col_var.name(),
            consequent.map(|c| c.label()).unwrap_or("-")
        );

        Ok(())
    }

    /// Get the consequent of one cell.
    pub fn consequent(&self, row: usize, col: usize) -> Result<Option<O>, FuzzyError> {
        Ok(self.consequents[self.cell_index(row, col)?])
    }

    /// Restore every cell to its default consequent.
    pub fn reset_to_defaults(&mut self) {
        self.consequents.copy_from_slice(&self.defaults);
    }

    /// Build the rule held in one cell.
    ///
    /// Antecedents are ordered `[col_var, row_var]`, matching the order of
    /// the inputs given to [`super::evaluate`].
    pub fn rule(&self, row: usize, col: usize) -> Result<Rule, FuzzyError> {
        let consequent = self.consequent(row, col)?;

        // Both are valid since cell_index checked them
        let (r, c) = match (R::from_index(row), C::from_index(col)) {
            (Some(r), Some(c)) => (r, c),
            _ => return Err(self.out_of_range(row, col)),
        };

        Ok(Rule {
            antecedents: vec![self.col_var.value(c), self.row_var.value(r)],
            consequent: consequent.map(|o| self.output.value(o)),
        })
    }

    /// Iterate over all cells in row-major order, as `(row, col, consequent)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Option<O>)> + '_ {
        let cols = self.cols();
        self.consequents
            .iter()
            .enumerate()
            .map(move |(i, c)| (i / cols, i % cols, *c))
    }

    /// The current table of consequents, indexed `[row][col]`.
    pub fn consequent_table(&self) -> Vec<Vec<Option<O>>> {
        self.consequents
            .chunks(self.cols())
            .map(|r| r.to_vec())
            .collect()
    }

    fn cell_index(&self, row: usize, col: usize) -> Result<usize, FuzzyError> {
        if row >= self.rows() || col >= self.cols() {
            return Err(self.out_of_range(row, col));
        }

        Ok(row * self.cols() + col)
    }

    fn out_of_range(&self, row: usize, col: usize) -> FuzzyError {
        FuzzyError::CellOutOfRange {
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::fuzzy::MembershipFunction;

    crate::fuzzy_terms! {
        pub enum Side {
            Left => "L",
            Right => "R",
        }
    }

    crate::fuzzy_terms! {
        pub enum Size {
            Small => "S",
            Medium => "M",
            Large => "B",
        }
    }

    fn side() -> FuzzyVariable<Side> {
        FuzzyVariable::new(
            "side",
            (0.0, 10.0),
            "",
            &[
                (Side::Left, MembershipFunction::right_shoulder(0.0, 10.0).unwrap()),
                (Side::Right, MembershipFunction::left_shoulder(0.0, 10.0).unwrap()),
            ],
        )
        .unwrap()
    }

    fn size(name: &str) -> FuzzyVariable<Size> {
        FuzzyVariable::new(
            name,
            (0.0, 10.0),
            "",
            &[
                (Size::Small, MembershipFunction::right_shoulder(0.0, 5.0).unwrap()),
                (Size::Medium, MembershipFunction::triangular(0.0, 5.0, 10.0).unwrap()),
                (Size::Large, MembershipFunction::left_shoulder(5.0, 10.0).unwrap()),
            ],
        )
        .unwrap()
    }

    fn matrix() -> RuleMatrix<Size, Side, Size> {
        use Size::*;
        RuleMatrix::new(
            size("size"),
            side(),
            size("out"),
            vec![
                vec![Some(Small), None],
                vec![Some(Medium), Some(Medium)],
                vec![Some(Large), Some(Small)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_match_degree() {
        let s = size("size");

        let one = Rule {
            antecedents: vec![s.value(Size::Medium)],
            consequent: None,
        };
        assert_eq!(one.match_degree(&[s.fuzzify(2.5)]), 0.5);

        let two = Rule {
            antecedents: vec![s.value(Size::Medium), s.value(Size::Large)],
            consequent: None,
        };
        assert_eq!(two.match_degree(&[s.fuzzify(5.0), s.fuzzify(7.5)]), 0.5);
        assert_eq!(two.match_degree(&[s.fuzzify(5.0), s.fuzzify(2.0)]), 0.0);

        // Missing inputs can't be assumed to match
        assert!(one.match_degree(&[s.fuzzify(5.0)]) > 0.0);
        assert_eq!(two.match_degree(&[s.fuzzify(5.0)]), 0.0);
        assert_eq!(two.match_degree(&[]), 0.0);

        let none = Rule {
            antecedents: vec![],
            consequent: None,
        };
        assert_eq!(none.match_degree(&[s.fuzzify(5.0)]), 0.0);
    }

    #[test]
    fn test_edit_and_reset() -> Result<(), FuzzyError> {
        let mut m = matrix();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.consequent(0, 1)?, None);
        assert_eq!(m.consequent(2, 1)?, Some(Size::Small));

        m.set_consequent(0, 1, Some(Size::Large))?;
        m.set_consequent(2, 1, None)?;
        assert_eq!(m.consequent(0, 1)?, Some(Size::Large));
        assert_eq!(m.consequent(2, 1)?, None);

        // Out of range edits are rejected and change nothing
        let before = m.consequent_table();
        assert_eq!(
            m.set_consequent(3, 0, Some(Size::Small)),
            Err(FuzzyError::CellOutOfRange {
                row: 3,
                col: 0,
                rows: 3,
                cols: 2
            })
        );
        assert!(m.set_consequent(0, 2, None).is_err());
        assert_eq!(m.consequent_table(), before);

        m.reset_to_defaults();
        assert_eq!(m.consequent(0, 1)?, None);
        assert_eq!(m.consequent(2, 1)?, Some(Size::Small));

        let cells: Vec<_> = m.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[5], (2, 1, Some(Size::Small)));

        Ok(())
    }

    #[test]
    fn test_rule_antecedent_order() -> Result<(), FuzzyError> {
        let m = matrix();
        let rule = m.rule(2, 0)?;

        assert_eq!(rule.antecedents[0].variable(), "side");
        assert_eq!(rule.antecedents[0].label(), Some("L"));
        assert_eq!(rule.antecedents[1].variable(), "size");
        assert_eq!(rule.antecedents[1].label(), Some("B"));
        assert_eq!(rule.consequent.map(|c| c.label()), Some(Some("B")));

        assert!(m.rule(0, 1)?.consequent.is_none());

        Ok(())
    }

    #[test]
    fn test_bad_table_shape() {
        let r = RuleMatrix::new(
            size("size"),
            side(),
            size("out"),
            vec![vec![None, None], vec![None]],
        );
        assert!(matches!(r, Err(FuzzyError::TableShape { .. })));
    }
}
