//! # Fuzzy values and set algebra
//!
//! All membership functions are piecewise linear, so the operations here are
//! computed exactly by working between the points at which any of the
//! involved functions change slope or cross one another, rather than by
//! sampling the domain.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use ordered_float::OrderedFloat;

use super::MembershipFunction;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A membership function belonging to a named variable.
///
/// The function is either that of a named linguistic term (`label` is set) or
/// an ad-hoc function such as a fuzzified crisp input.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyValue {
    variable: String,
    label: Option<&'static str>,
    function: MembershipFunction,
}

/// A fuzzy value clipped at a given height, the output of implication.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedValue {
    pub value: FuzzyValue,
    pub height: f64,
}

/// The union (pointwise maximum) of a number of clipped values.
#[derive(Debug, Clone, Default)]
pub struct FuzzySet {
    members: Vec<ClippedValue>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FuzzyValue {
    pub fn new(variable: &str, label: Option<&'static str>, function: MembershipFunction) -> Self {
        Self {
            variable: variable.to_string(),
            label,
            function,
        }
    }

    /// Name of the variable this value belongs to.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Label of the term, or `None` for an ad-hoc function.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.function.degree(x)
    }

    /// The degree to which `other` matches this value, i.e. the height of
    /// their intersection, `sup_x min(self(x), other(x))`.
    ///
    /// For a singleton `other` at `v` this is simply `self(v)`.
    pub fn possibility(&self, other: &FuzzyValue) -> f64 {
        let mut points: Vec<f64> = self
            .function
            .breakpoints()
            .into_iter()
            .chain(other.function.breakpoints())
            .collect();
        sort_dedup(&mut points);

        let curves = [&self.function, &other.function];
        let crossings = crossings(&points, |i, x| curves[i].degree(x), curves.len());
        points.extend(crossings);

        points
            .iter()
            .map(|&x| self.degree(x).min(other.degree(x)))
            .fold(0.0, f64::max)
    }

    /// Mamdani implication, clip this value at `degree`.
    pub fn implicate(&self, degree: f64) -> ClippedValue {
        ClippedValue {
            value: self.clone(),
            height: util::maths::clamp(degree, 0.0, 1.0),
        }
    }
}

impl ClippedValue {
    pub fn degree(&self, x: f64) -> f64 {
        self.value.degree(x).min(self.height)
    }

    /// Points at which the clipped function changes slope.
    fn breakpoints(&self) -> Vec<f64> {
        let mut points = self.value.function().breakpoints();
        points.extend(self.value.function().level_crossings(self.height));
        points
    }
}

impl FuzzySet {
    /// An empty set, no rule has fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing has been added to the set.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The clipped values that make up the set, in the order they were added.
    pub fn members(&self) -> &[ClippedValue] {
        &self.members
    }

    /// Fuzzy union (OR) of this set with a clipped value.
    pub fn union(&mut self, value: ClippedValue) {
        // A value clipped at zero contributes nothing
        if value.height > 0.0 {
            self.members.push(value);
        }
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.members
            .iter()
            .map(|m| m.degree(x))
            .fold(0.0, f64::max)
    }

    /// Largest membership degree anywhere in the set.
    pub fn max_degree(&self) -> f64 {
        self.members.iter().map(|m| m.height).fold(0.0, f64::max)
    }

    /// Centroid (moment) defuzzification over `domain`.
    ///
    /// Returns exactly `0.0` if the set is empty or has zero area inside the
    /// domain.
    pub fn defuzzify(&self, domain: (f64, f64)) -> f64 {
        if self.is_empty() {
            return 0.0;
        }

        let (lo, hi) = domain;
        let points = self.envelope_points(lo, hi);

        let mut area = 0.0;
        let mut moment = 0.0;

        // Between consecutive envelope points the union is linear, so the
        // trapezium and Simpson rules are exact.
        for w in points.windows(2) {
            let (u, v) = (w[0], w[1]);
            let (mu, mv) = (self.degree(u), self.degree(v));
            let width = v - u;

            area += width * (mu + mv) / 2.0;
            moment += width / 6.0 * (u * (2.0 * mu + mv) + v * (mu + 2.0 * mv));
        }

        trace!(
            "Defuzzify {} members over [{}, {}]: area = {}, moment = {}",
            self.members.len(),
            lo,
            hi,
            area,
            moment
        );

        if area > 0.0 {
            moment / area
        } else {
            0.0
        }
    }

    /// Points within `[lo, hi]` between which the union is linear.
    fn envelope_points(&self, lo: f64, hi: f64) -> Vec<f64> {
        let mut points: Vec<f64> = self
            .members
            .iter()
            .flat_map(|m| m.breakpoints())
            .filter(|&x| x > lo && x < hi)
            .collect();
        points.push(lo);
        points.push(hi);
        sort_dedup(&mut points);

        let crossings = crossings(
            &points,
            |i, x| self.members[i].degree(x),
            self.members.len(),
        );
        points.extend(crossings);
        sort_dedup(&mut points);

        points
    }
}

impl std::iter::FromIterator<ClippedValue> for FuzzySet {
    /// Aggregate a number of clipped values with fuzzy union.
    fn from_iter<I: IntoIterator<Item = ClippedValue>>(iter: I) -> Self {
        let mut set = FuzzySet::new();
        for value in iter {
            set.union(value);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn sort_dedup(points: &mut Vec<f64>) {
    points.retain(|x| x.is_finite());
    points.sort_by_key(|&x| OrderedFloat(x));
    points.dedup();
}

/// Find the points where any two of `n` curves cross between consecutive
/// `points`.
///
/// `points` must contain every slope change of every curve, so that each
/// curve is linear between neighbouring points.
fn crossings<F>(points: &[f64], curve: F, n: usize) -> Vec<f64>
where
    F: Fn(usize, f64) -> f64,
{
    let mut found = vec![];

    for w in points.windows(2) {
        let (p, q) = (w[0], w[1]);

        for i in 0..n {
            for j in (i + 1)..n {
                let dp = curve(i, p) - curve(j, p);
                let dq = curve(i, q) - curve(j, q);

                if dp * dq < 0.0 {
                    found.push(p + (q - p) * dp / (dp - dq));
                }
            }
        }
    }

    found
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn tri(a: f64, b: f64, c: f64) -> FuzzyValue {
        FuzzyValue::new("out", None, MembershipFunction::triangular(a, b, c).unwrap())
    }

    /// Numerical centroid used as a reference
    fn sampled_centroid(set: &FuzzySet, lo: f64, hi: f64) -> f64 {
        let n = 200_000;
        let dx = (hi - lo) / n as f64;
        let (mut area, mut moment) = (0.0, 0.0);
        for i in 0..n {
            let x = lo + (i as f64 + 0.5) * dx;
            let d = set.degree(x);
            area += d * dx;
            moment += x * d * dx;
        }
        moment / area
    }

    #[test]
    fn test_empty_defuzzifies_to_zero() {
        let set = FuzzySet::new();
        assert!(set.is_empty());
        assert_eq!(set.defuzzify((-45.0, 45.0)), 0.0);

        // Values clipped at zero don't count as fired
        let set: FuzzySet = vec![tri(5.0, 15.0, 25.0).implicate(0.0)].into_iter().collect();
        assert!(set.is_empty());
        assert_eq!(set.defuzzify((-45.0, 45.0)), 0.0);

        let set: FuzzySet = vec![
            tri(5.0, 15.0, 25.0).implicate(0.0),
            tri(-5.0, 0.0, 5.0).implicate(0.4),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.members().len(), 1);
        assert_eq!(set.members()[0].height, 0.4);
    }

    #[test]
    fn test_symmetric_centroid() {
        let set: FuzzySet = vec![tri(-5.0, 0.0, 5.0).implicate(1.0)].into_iter().collect();
        assert_eq!(set.defuzzify((-45.0, 45.0)), 0.0);

        let set: FuzzySet = vec![tri(5.0, 15.0, 25.0).implicate(0.3)].into_iter().collect();
        assert!((set.defuzzify((-45.0, 45.0)) - 15.0).abs() < 1e-12);
        assert_eq!(set.max_degree(), 0.3);
    }

    #[test]
    fn test_union_centroid_matches_sampling() {
        let set: FuzzySet = vec![
            tri(-25.0, -15.0, -5.0).implicate(0.2),
            tri(-10.0, -5.0, 0.0).implicate(0.7),
            tri(0.0, 5.0, 10.0).implicate(0.45),
        ]
        .into_iter()
        .collect();

        let exact = set.defuzzify((-45.0, 45.0));
        let sampled = sampled_centroid(&set, -45.0, 45.0);
        assert!((exact - sampled).abs() < 1e-4, "{} vs {}", exact, sampled);
        assert!(exact < 0.0);
    }

    #[test]
    fn test_centroid_respects_domain() {
        // Only the half of the triangle inside the domain counts
        let set: FuzzySet = vec![tri(30.0, 45.0, 60.0).implicate(1.0)].into_iter().collect();
        let exact = set.defuzzify((-45.0, 45.0));
        let sampled = sampled_centroid(&set, -45.0, 45.0);
        assert!((exact - sampled).abs() < 1e-4);
        assert!((exact - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_possibility() {
        let term = tri(30.0, 40.0, 50.0);

        // A singleton input matches with the term's degree at that point
        let crisp = FuzzyValue::new("in", None, MembershipFunction::singleton(35.0));
        assert_eq!(term.possibility(&crisp), 0.5);
        assert_eq!(crisp.possibility(&term), 0.5);

        let outside = FuzzyValue::new("in", None, MembershipFunction::singleton(60.0));
        assert_eq!(term.possibility(&outside), 0.0);

        // Two overlapping triangles meet half way up their facing sides
        let other = tri(40.0, 50.0, 60.0);
        assert!((term.possibility(&other) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_implicate_clamps() {
        let v = tri(0.0, 1.0, 2.0);
        assert_eq!(v.implicate(1.5).height, 1.0);
        assert_eq!(v.implicate(-0.5).height, 0.0);
        assert_eq!(v.implicate(0.5).degree(1.0), 0.5);
        assert_eq!(v.implicate(0.5).degree(0.25), 0.25);
    }
}
