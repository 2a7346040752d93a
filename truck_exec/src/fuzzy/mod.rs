//! # Fuzzy inference module
//!
//! A small Mamdani style fuzzy inference engine. Inputs are crisp values
//! which are fuzzified into singletons, matched against the antecedents of
//! each rule (combined with minimum), the consequent of every matching rule
//! is clipped at the match degree, the clipped sets are combined with maximum,
//! and the combined set is defuzzified with the centroid (moment) method.
//!
//! Linguistic terms are identified by enumerations implementing [`Term`],
//! normally declared with the [`fuzzy_terms!`] macro. Every variable holds
//! one membership function per term of its enumeration.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod inference;
pub mod membership;
pub mod rule;
pub mod set;
pub mod variable;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use inference::{evaluate, Conclusion, RuleFiring};
pub use membership::MembershipFunction;
pub use rule::{Rule, RuleMatrix};
pub use set::{ClippedValue, FuzzySet, FuzzyValue};
pub use variable::FuzzyVariable;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// An enumerated linguistic term of a fuzzy variable.
pub trait Term: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// Every term in declaration order.
    const ALL: &'static [Self];

    /// Short display label, e.g. `"ZE"`.
    fn label(&self) -> &'static str;

    /// Position of the term within [`Term::ALL`].
    fn index(&self) -> usize;

    /// Find the term with the given label.
    fn from_label(label: &str) -> Result<Self, FuzzyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label() == label)
            .ok_or_else(|| FuzzyError::InvalidTerm(label.to_string()))
    }

    /// Get the term at the given index.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while configuring fuzzy variables and rules.
///
/// All of these are raised synchronously by the call which caused them, and
/// leave the prior configuration unchanged.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FuzzyError {
    #[error("\"{0}\" is not a declared term")]
    InvalidTerm(String),

    #[error("Invalid membership function: {0}")]
    InvalidShape(String),

    #[error("Variable {variable} has an invalid domain [{min}, {max}]")]
    InvalidDomain { variable: String, min: f64, max: f64 },

    #[error("Variable {variable} has no membership function for term {term}")]
    MissingTerm { variable: String, term: &'static str },

    #[error("Variable {variable} has more than one membership function for term {term}")]
    DuplicateTerm { variable: String, term: &'static str },

    #[error("Cell ({row}, {col}) is outside of the {rows}x{cols} rule matrix")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Default rule table is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    TableShape {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
}

// ---------------------------------------------------------------------------
// MACROS
// ---------------------------------------------------------------------------

/// Declare an enumeration of linguistic terms.
///
/// Each variant is given its display label, the declaration order is the
/// order of [`Term::ALL`].
///
/// ```
/// truck_lib::fuzzy_terms! {
///     /// Temperature terms
///     pub enum Temp {
///         Cold => "Cold",
///         Warm => "Warm",
///     }
/// }
/// ```
#[macro_export]
macro_rules! fuzzy_terms {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::fuzzy::Term for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            fn index(&self) -> usize {
                *self as usize
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::fuzzy::FuzzyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::fuzzy::Term>::from_label(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::fuzzy::Term::label(self))
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    crate::fuzzy_terms! {
        pub enum Level {
            Low => "Lo",
            Mid => "Mid",
            High => "Hi",
        }
    }

    #[test]
    fn test_terms() {
        assert_eq!(Level::ALL, &[Level::Low, Level::Mid, Level::High]);
        assert_eq!(Level::High.index(), 2);
        assert_eq!(Level::from_index(1), Some(Level::Mid));
        assert_eq!(Level::from_index(3), None);
        assert_eq!("Hi".parse::<Level>(), Ok(Level::High));
        assert_eq!(
            "High".parse::<Level>(),
            Err(FuzzyError::InvalidTerm("High".into()))
        );
        assert_eq!(Level::Low.to_string(), "Lo");
    }
}
