//! # Controller design data
//!
//! The fixed variable domains, term curves and default rule tables of the
//! truck controller. The controller is tuned against these exact values.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::fuzzy::{FuzzyError, FuzzyVariable, MembershipFunction as Mf, Term};

use super::{AvoidHeadingTerm, HeadingTerm, PositionTerm, SteerTerm};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default free space steering table, rows are [`HeadingTerm`]s and columns
/// are [`PositionTerm`]s.
pub const PRIMARY_DEFAULTS: [[&str; 5]; 7] = [
    ["PS", "PM", "PM", "PB", "PB"],
    ["NS", "PS", "PM", "PB", "PB"],
    ["NM", "NS", "PS", "PM", "PB"],
    ["NM", "NM", "ZE", "PM", "PM"],
    ["NB", "NM", "NS", "PS", "PM"],
    ["NB", "NB", "NM", "NS", "PS"],
    ["NB", "NB", "NM", "NM", "NS"],
];

/// Default avoidance table, rows are [`AvoidHeadingTerm`]s and columns are
/// [`PositionTerm`]s relative to the obstacle.
pub const AVOIDANCE_DEFAULTS: [[&str; 5]; 5] = [
    ["PB", "PB", "NS", "NS", "NS"],
    ["PM", "PM", "NM", "NS", "NS"],
    ["PS", "PM", "PB", "NM", "NS"],
    ["PS", "PS", "PM", "NM", "NM"],
    ["PS", "PS", "PS", "NB", "NB"],
];

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Lateral position of the truck in the arena.
pub fn position() -> Result<FuzzyVariable<PositionTerm>, FuzzyError> {
    use PositionTerm::*;

    FuzzyVariable::new(
        "Xpos",
        (0.0, 100.0),
        "",
        &[
            (LeftBig, Mf::right_shoulder(10.0, 35.0)?),
            (LeftMedium, Mf::triangular(30.0, 40.0, 50.0)?),
            (Centred, Mf::triangular(45.0, 50.0, 55.0)?),
            (RightMedium, Mf::triangular(50.0, 60.0, 70.0)?),
            (RightBig, Mf::left_shoulder(65.0, 90.0)?),
        ],
    )
}

/// Heading of the truck.
pub fn heading() -> Result<FuzzyVariable<HeadingTerm>, FuzzyError> {
    use HeadingTerm::*;

    FuzzyVariable::new(
        "Phi",
        (-90.0, 270.0),
        "Degrees",
        &[
            (LargeBelow90, Mf::right_shoulder(-45.0, 10.0)?),
            (MediumBelow90, Mf::triangular(-10.0, 25.0, 60.0)?),
            (SmallBelow90, Mf::triangular(50.0, 70.0, 90.0)?),
            (At90, Mf::triangular(80.0, 90.0, 100.0)?),
            (SmallAbove90, Mf::triangular(90.0, 110.0, 130.0)?),
            (MediumAbove90, Mf::triangular(120.0, 155.0, 190.0)?),
            (LargeAbove90, Mf::left_shoulder(170.0, 225.0)?),
        ],
    )
}

/// Heading change output of the free space matrix.
pub fn steer() -> Result<FuzzyVariable<SteerTerm>, FuzzyError> {
    steer_named("changePhi")
}

/// Lateral position relative to an obstacle, zero at its left edge and one at
/// its right edge.
pub fn avoid_position() -> Result<FuzzyVariable<PositionTerm>, FuzzyError> {
    use PositionTerm::*;

    FuzzyVariable::new(
        "obsXpos",
        (-0.65, 1.80),
        "",
        &[
            (LeftBig, Mf::triangular(-0.50, -0.15, 0.10)?),
            (LeftMedium, Mf::triangular(0.10, 0.25, 0.40)?),
            (Centred, Mf::triangular(0.40, 0.50, 0.65)?),
            (RightMedium, Mf::triangular(0.65, 0.80, 0.95)?),
            (RightBig, Mf::triangular(0.95, 1.30, 1.60)?),
        ],
    )
}

/// Heading of the truck when avoiding an obstacle.
pub fn avoid_heading() -> Result<FuzzyVariable<AvoidHeadingTerm>, FuzzyError> {
    use AvoidHeadingTerm::*;

    FuzzyVariable::new(
        "obsPhi",
        (0.0, 180.0),
        "Degrees",
        &[
            (MediumBelow90, Mf::triangular(0.0, 25.0, 60.0)?),
            (SmallBelow90, Mf::triangular(50.0, 70.0, 90.0)?),
            (At90, Mf::triangular(80.0, 90.0, 100.0)?),
            (SmallAbove90, Mf::triangular(90.0, 110.0, 130.0)?),
            (MediumAbove90, Mf::triangular(120.0, 155.0, 180.0)?),
        ],
    )
}

/// Heading change output of the avoidance matrix.
pub fn avoid_steer() -> Result<FuzzyVariable<SteerTerm>, FuzzyError> {
    steer_named("obschangePhi")
}

/// Parse a table of labels into a table of terms.
///
/// An empty (or blank) label is an empty cell.
pub fn parse_table<O: Term, S: AsRef<[&'static str]>>(
    table: &[S],
) -> Result<Vec<Vec<Option<O>>>, FuzzyError> {
    table
        .iter()
        .map(|row| {
            row.as_ref()
                .iter()
                .map(|label| match label.trim() {
                    "" => Ok(None),
                    l => O::from_label(l).map(Some),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn steer_named(name: &str) -> Result<FuzzyVariable<SteerTerm>, FuzzyError> {
    use SteerTerm::*;

    FuzzyVariable::new(
        name,
        (-45.0, 45.0),
        "Degrees",
        &[
            (NegativeBig, Mf::triangular(-45.0, -30.0, -15.0)?),
            (NegativeMedium, Mf::triangular(-25.0, -15.0, -5.0)?),
            (NegativeSmall, Mf::triangular(-10.0, -5.0, 0.0)?),
            (Zero, Mf::triangular(-5.0, 0.0, 5.0)?),
            (PositiveSmall, Mf::triangular(0.0, 5.0, 10.0)?),
            (PositiveMedium, Mf::triangular(5.0, 15.0, 25.0)?),
            (PositiveBig, Mf::triangular(15.0, 30.0, 45.0)?),
        ],
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_variables_build() -> Result<(), FuzzyError> {
        assert_eq!(position()?.domain(), (0.0, 100.0));
        assert_eq!(heading()?.num_terms(), 7);
        assert_eq!(heading()?.unit(), "Degrees");
        assert_eq!(steer()?.domain(), (-45.0, 45.0));
        assert_eq!(avoid_position()?.domain(), (-0.65, 1.80));
        assert_eq!(avoid_heading()?.num_terms(), 5);
        assert_eq!(avoid_steer()?.name(), "obschangePhi");
        Ok(())
    }

    #[test]
    fn test_centre_terms() -> Result<(), FuzzyError> {
        // Only Centred and At90 cover the parked pose fully
        let pos = position()?;
        let head = heading()?;

        let pos_degrees: Vec<f64> = pos.terms().map(|(_, f)| f.degree(50.0)).collect();
        assert_eq!(pos_degrees, vec![0.0, 0.0, 1.0, 0.0, 0.0]);

        let head_degrees: Vec<f64> = head.terms().map(|(_, f)| f.degree(90.0)).collect();
        assert_eq!(head_degrees, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);

        Ok(())
    }

    #[test]
    fn test_parse_table() -> Result<(), FuzzyError> {
        let table: Vec<Vec<Option<SteerTerm>>> = parse_table(&PRIMARY_DEFAULTS)?;
        assert_eq!(table.len(), 7);
        assert_eq!(table[3][2], Some(SteerTerm::Zero));
        assert_eq!(table[6][0], Some(SteerTerm::NegativeBig));

        let blank: Vec<Vec<Option<SteerTerm>>> = parse_table(&[[" ", "PS"]])?;
        assert_eq!(blank, vec![vec![None, Some(SteerTerm::PositiveSmall)]]);

        assert_eq!(
            parse_table::<SteerTerm, _>(&[["XX"]]),
            Err(FuzzyError::InvalidTerm("XX".into()))
        );

        Ok(())
    }
}
