//! # Membership functions
//!
//! Piecewise linear membership function shapes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::maths::clamp;

use super::FuzzyError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The shape of a membership function.
///
/// All shapes are continuous except for degenerate triangles, where a zero
/// width side jumps straight to the apex. A triangle `(v, v, v)` is a
/// singleton, used to encode crisp measurements.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum MembershipFunction {
    /// Zero outside `[a, c]`, rising from `a` to one at `b`, falling back to
    /// zero at `c`.
    Triangular { a: f64, b: f64, c: f64 },

    /// Shoulder with its slope on the right: one at or below `a`, falling to
    /// zero at or above `b`.
    RightShoulder { a: f64, b: f64 },

    /// Shoulder with its slope on the left: zero at or below `a`, rising to
    /// one at or above `b`.
    LeftShoulder { a: f64, b: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MembershipFunction {
    /// Create a triangular function, requires `a <= b <= c`.
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, FuzzyError> {
        if !(a <= b && b <= c) {
            return Err(FuzzyError::InvalidShape(format!(
                "triangle ({}, {}, {}) is not ordered",
                a, b, c
            )));
        }

        Ok(MembershipFunction::Triangular { a, b, c })
    }

    /// Create a right shoulder, requires `a <= b`.
    pub fn right_shoulder(a: f64, b: f64) -> Result<Self, FuzzyError> {
        if !(a <= b) {
            return Err(FuzzyError::InvalidShape(format!(
                "right shoulder ({}, {}) is not ordered",
                a, b
            )));
        }

        Ok(MembershipFunction::RightShoulder { a, b })
    }

    /// Create a left shoulder, requires `a <= b`.
    pub fn left_shoulder(a: f64, b: f64) -> Result<Self, FuzzyError> {
        if !(a <= b) {
            return Err(FuzzyError::InvalidShape(format!(
                "left shoulder ({}, {}) is not ordered",
                a, b
            )));
        }

        Ok(MembershipFunction::LeftShoulder { a, b })
    }

    /// A singleton at `value`, i.e. the degenerate triangle `(v, v, v)`.
    pub fn singleton(value: f64) -> Self {
        MembershipFunction::Triangular {
            a: value,
            b: value,
            c: value,
        }
    }

    /// The degree of membership of `x`, in `[0, 1]`.
    ///
    /// Any real input is accepted, NaN has zero membership.
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }

        let degree = match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::RightShoulder { a, b } => {
                if x <= a {
                    1.0
                } else if x >= b {
                    0.0
                } else {
                    (b - x) / (b - a)
                }
            }
            MembershipFunction::LeftShoulder { a, b } => {
                if x <= a {
                    0.0
                } else if x >= b {
                    1.0
                } else {
                    (x - a) / (b - a)
                }
            }
        };

        clamp(degree, 0.0, 1.0)
    }

    /// The x values at which the slope of the function changes.
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            MembershipFunction::Triangular { a, b, c } => vec![a, b, c],
            MembershipFunction::RightShoulder { a, b }
            | MembershipFunction::LeftShoulder { a, b } => vec![a, b],
        }
    }

    /// The x values at which the function crosses `level`.
    ///
    /// Only levels strictly between zero and one produce crossings.
    pub fn level_crossings(&self, level: f64) -> Vec<f64> {
        if !(level > 0.0 && level < 1.0) {
            return vec![];
        }

        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                vec![a + level * (b - a), c - level * (c - b)]
            }
            MembershipFunction::RightShoulder { a, b } => vec![b - level * (b - a)],
            MembershipFunction::LeftShoulder { a, b } => vec![a + level * (b - a)],
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn sweep(f: &MembershipFunction, lo: f64, hi: f64) -> Vec<(f64, f64)> {
        let n = 2000;
        (0..=n)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / n as f64;
                (x, f.degree(x))
            })
            .collect()
    }

    #[test]
    fn test_triangular() {
        let f = MembershipFunction::triangular(30.0, 40.0, 50.0).unwrap();

        assert_eq!(f.degree(20.0), 0.0);
        assert_eq!(f.degree(30.0), 0.0);
        assert_eq!(f.degree(35.0), 0.5);
        assert_eq!(f.degree(40.0), 1.0);
        assert_eq!(f.degree(45.0), 0.5);
        assert_eq!(f.degree(50.0), 0.0);
        assert_eq!(f.degree(80.0), 0.0);

        assert!(MembershipFunction::triangular(3.0, 2.0, 4.0).is_err());
    }

    #[test]
    fn test_shoulders() {
        let r = MembershipFunction::right_shoulder(10.0, 35.0).unwrap();
        assert_eq!(r.degree(-1000.0), 1.0);
        assert_eq!(r.degree(10.0), 1.0);
        assert_eq!(r.degree(22.5), 0.5);
        assert_eq!(r.degree(35.0), 0.0);
        assert_eq!(r.degree(1000.0), 0.0);

        let l = MembershipFunction::left_shoulder(65.0, 90.0).unwrap();
        assert_eq!(l.degree(-1000.0), 0.0);
        assert_eq!(l.degree(65.0), 0.0);
        assert_eq!(l.degree(77.5), 0.5);
        assert_eq!(l.degree(90.0), 1.0);
        assert_eq!(l.degree(1000.0), 1.0);

        assert!(MembershipFunction::left_shoulder(2.0, 1.0).is_err());
        assert!(MembershipFunction::right_shoulder(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_singleton() {
        let s = MembershipFunction::singleton(42.0);
        assert_eq!(s.degree(42.0), 1.0);
        assert_eq!(s.degree(41.999), 0.0);
        assert_eq!(s.degree(42.001), 0.0);
        assert_eq!(s.degree(f64::NAN), 0.0);
    }

    #[test]
    fn test_bounded_continuous_and_plateau() {
        let shapes = [
            MembershipFunction::triangular(-10.0, 25.0, 60.0).unwrap(),
            MembershipFunction::triangular(45.0, 50.0, 55.0).unwrap(),
            MembershipFunction::right_shoulder(-45.0, 10.0).unwrap(),
            MembershipFunction::left_shoulder(170.0, 225.0).unwrap(),
        ];

        for f in shapes.iter() {
            let samples = sweep(f, -100.0, 300.0);
            let step = 400.0 / 2000.0;

            for w in samples.windows(2) {
                let (x0, d0) = w[0];
                let (_, d1) = w[1];

                assert!(d0 >= 0.0 && d0 <= 1.0);

                // Largest slope in these shapes is 1/5 per unit
                assert!((d1 - d0).abs() <= step / 5.0 + 1e-12, "jump at {}", x0);

                // One only on the apex or plateau
                if d0 == 1.0 {
                    match *f {
                        MembershipFunction::Triangular { b, .. } => assert_eq!(x0, b),
                        MembershipFunction::RightShoulder { a, .. } => assert!(x0 <= a),
                        MembershipFunction::LeftShoulder { b, .. } => assert!(x0 >= b),
                    }
                }
            }
        }
    }

    #[test]
    fn test_level_crossings() {
        let f = MembershipFunction::triangular(-5.0, 0.0, 5.0).unwrap();
        assert_eq!(f.level_crossings(0.5), vec![-2.5, 2.5]);
        assert!(f.level_crossings(1.0).is_empty());
        assert!(f.level_crossings(0.0).is_empty());

        let r = MembershipFunction::right_shoulder(0.0, 10.0).unwrap();
        assert_eq!(r.level_crossings(0.25), vec![7.5]);
        assert_eq!(r.degree(7.5), 0.25);
    }
}
