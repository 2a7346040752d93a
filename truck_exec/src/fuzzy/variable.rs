//! # Fuzzy variables

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::marker::PhantomData;

use super::{FuzzyError, FuzzyValue, MembershipFunction, Term};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A fuzzy variable over a closed domain, with one membership function for
/// every term of `T`.
#[derive(Debug, Clone)]
pub struct FuzzyVariable<T: Term> {
    name: String,
    min: f64,
    max: f64,
    unit: String,

    /// Membership functions indexed by `Term::index`
    functions: Vec<MembershipFunction>,

    _terms: PhantomData<T>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T: Term> FuzzyVariable<T> {
    /// Create a new variable.
    ///
    /// `terms` must contain exactly one membership function for each term of
    /// `T`, in any order.
    pub fn new(
        name: &str,
        domain: (f64, f64),
        unit: &str,
        terms: &[(T, MembershipFunction)],
    ) -> Result<Self, FuzzyError> {
        let (min, max) = domain;
        if !(min < max) {
            return Err(FuzzyError::InvalidDomain {
                variable: name.to_string(),
                min,
                max,
            });
        }

        let mut slots: Vec<Option<MembershipFunction>> = vec![None; T::ALL.len()];
        for (term, function) in terms {
            let slot = &mut slots[term.index()];
            if slot.is_some() {
                return Err(FuzzyError::DuplicateTerm {
                    variable: name.to_string(),
                    term: term.label(),
                });
            }
            *slot = Some(*function);
        }

        let functions = slots
            .into_iter()
            .zip(T::ALL.iter())
            .map(|(f, term)| {
                f.ok_or_else(|| FuzzyError::MissingTerm {
                    variable: name.to_string(),
                    term: term.label(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            min,
            max,
            unit: unit.to_string(),
            functions,
            _terms: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The closed domain `(min, max)` of the variable.
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Number of terms in the variable.
    pub fn num_terms(&self) -> usize {
        self.functions.len()
    }

    /// The membership function of a term.
    pub fn function(&self, term: T) -> &MembershipFunction {
        &self.functions[term.index()]
    }

    /// The fuzzy value of a named term.
    pub fn value(&self, term: T) -> FuzzyValue {
        FuzzyValue::new(&self.name, Some(term.label()), *self.function(term))
    }

    /// Iterate over all terms and their membership functions.
    pub fn terms(&self) -> impl Iterator<Item = (T, &MembershipFunction)> {
        T::ALL.iter().copied().zip(self.functions.iter())
    }

    /// Encode a crisp measurement as a singleton fuzzy value.
    pub fn fuzzify(&self, value: f64) -> FuzzyValue {
        FuzzyValue::new(&self.name, None, MembershipFunction::singleton(value))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    crate::fuzzy_terms! {
        pub enum Side {
            Left => "L",
            Right => "R",
        }
    }

    fn left() -> MembershipFunction {
        MembershipFunction::right_shoulder(0.0, 10.0).unwrap()
    }

    fn right() -> MembershipFunction {
        MembershipFunction::left_shoulder(0.0, 10.0).unwrap()
    }

    #[test]
    fn test_new_variable() -> Result<(), FuzzyError> {
        // Order of definition doesn't matter
        let var = FuzzyVariable::new(
            "side",
            (0.0, 10.0),
            "m",
            &[(Side::Right, right()), (Side::Left, left())],
        )?;

        assert_eq!(var.name(), "side");
        assert_eq!(var.unit(), "m");
        assert_eq!(var.domain(), (0.0, 10.0));
        assert_eq!(var.num_terms(), 2);
        assert_eq!(var.function(Side::Left), &left());
        assert_eq!(var.function(Side::Right), &right());

        let labels: Vec<_> = var.terms().map(|(t, _)| t.label()).collect();
        assert_eq!(labels, vec!["L", "R"]);

        let v = var.value(Side::Right);
        assert_eq!(v.label(), Some("R"));
        assert_eq!(v.degree(10.0), 1.0);

        let crisp = var.fuzzify(3.0);
        assert_eq!(crisp.label(), None);
        assert_eq!(crisp.degree(3.0), 1.0);
        assert_eq!(crisp.degree(3.5), 0.0);

        Ok(())
    }

    #[test]
    fn test_invalid_variables() {
        assert!(matches!(
            FuzzyVariable::new("side", (0.0, 10.0), "", &[(Side::Left, left())]),
            Err(FuzzyError::MissingTerm { term: "R", .. })
        ));
        assert!(matches!(
            FuzzyVariable::new(
                "side",
                (0.0, 10.0),
                "",
                &[(Side::Left, left()), (Side::Left, left()), (Side::Right, right())]
            ),
            Err(FuzzyError::DuplicateTerm { term: "L", .. })
        ));
        assert!(matches!(
            FuzzyVariable::new(
                "side",
                (10.0, 0.0),
                "",
                &[(Side::Left, left()), (Side::Right, right())]
            ),
            Err(FuzzyError::InvalidDomain { .. })
        ));
    }
}
