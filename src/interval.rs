//! 1-D closed real interval algebra.
//!
//! Generalizes the teacher crate's `Interval` (a 0-based, half-open,
//! integer, chromosome-scoped genomic range) into the spec's coordinate-free
//! closed interval `[lower, upper]` over `f64`, with the same operation set
//! (`overlaps`, `merge`/`union`, `subtract`/`difference`) plus the spec's
//! additions (`contains`, `encloses`, `midpoint`, `random_values`).

use crate::config;
use crate::random::RandomFn;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A closed real interval `[lower, upper]`.
///
/// Unlike the teacher's half-open `[start, end)` genomic interval, this is a
/// closed interval: touching endpoints (`a.upper == b.lower`) are a matter
/// of configuration, not of half-open-vs-closed representation (see
/// `config::touching_is_overlap` and `overlaps_strict`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// Create a new interval. Panics if `lower > upper` -- use `try_new` at
    /// any boundary where the caller cannot already guarantee the invariant.
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self::try_new(lower, upper).expect("Interval::new: lower must be <= upper")
    }

    /// Create a new interval, returning a `ShapeError` if `lower > upper`.
    pub fn try_new(lower: f64, upper: f64) -> crate::error::Result<Self> {
        if lower > upper {
            return Err(crate::error::GritError::Shape(format!(
                "interval lower ({lower}) > upper ({upper})"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// A degenerate interval containing exactly the point `v`.
    #[inline]
    pub fn degenerate(v: f64) -> Self {
        Self { lower: v, upper: v }
    }

    /// Length of the interval (`upper - lower`).
    #[inline]
    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    /// Midpoint of the interval.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        self.lower + self.length() / 2.0
    }

    /// Whether this interval has zero length.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    /// Whether `v` lies within this interval. `inc_lower`/`inc_upper`
    /// control whether the respective endpoint counts as contained.
    #[inline]
    pub fn contains(&self, v: f64, inc_lower: bool, inc_upper: bool) -> bool {
        let lower_ok = if inc_lower { v >= self.lower } else { v > self.lower };
        let upper_ok = if inc_upper { v <= self.upper } else { v < self.upper };
        lower_ok && upper_ok
    }

    /// Whether this interval fully encloses `other` (`self.lower <=
    /// other.lower && other.upper <= self.upper`).
    #[inline]
    pub fn encloses(&self, other: &Interval) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// Whether this interval overlaps `other`, using the process-global
    /// touching-as-overlap configuration (`config::touching_is_overlap`).
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        if config::touching_is_overlap() {
            self.lower <= other.upper && other.lower <= self.upper
        } else {
            self.overlaps_strict(other)
        }
    }

    /// Whether this interval overlaps `other`, ignoring the global
    /// configuration and always requiring non-degenerate overlap (touching
    /// does not count).
    #[inline]
    pub fn overlaps_strict(&self, other: &Interval) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }

    /// Whether this interval overlaps `other`, ignoring the global
    /// configuration and always counting touching endpoints as overlap.
    #[inline]
    pub fn overlaps_inclusive(&self, other: &Interval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }

    /// The intersection of this interval and `other`, or `None` if they do
    /// not overlap (touching endpoints produce a degenerate, non-`None`
    /// intersection -- only a strictly disjoint pair yields `None`).
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower <= upper {
            Some(Interval { lower, upper })
        } else {
            None
        }
    }

    /// The bounding union of this interval and `other` (the smallest
    /// interval enclosing both), regardless of whether they overlap.
    #[inline]
    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// This interval with `other` removed, split into 0, 1, or 2 pieces.
    pub fn difference(&self, other: &Interval) -> Vec<Interval> {
        if !self.overlaps_inclusive(other) {
            return vec![*self];
        }

        let mut pieces = Vec::new();
        if self.lower < other.lower {
            pieces.push(Interval {
                lower: self.lower,
                upper: other.lower,
            });
        }
        if self.upper > other.upper {
            pieces.push(Interval {
                lower: other.upper,
                upper: self.upper,
            });
        }
        pieces
    }

    /// Draw `size` random values within this interval using the injected
    /// generator.
    pub fn random_values(&self, size: usize, rand: &mut dyn RandomFn) -> Vec<f64> {
        rand(size, self.lower, self.upper)
    }

    /// Draw `size` random sub-intervals within this interval, each of
    /// length at most `max_length`.
    pub fn random_intervals(
        &self,
        size: usize,
        max_length: f64,
        rand: &mut dyn RandomFn,
    ) -> Vec<Interval> {
        let starts = rand(size, self.lower, self.upper);
        starts
            .into_iter()
            .map(|start| {
                let len = max_length.min(self.upper - start).max(0.0);
                Interval {
                    lower: start,
                    upper: start + len,
                }
            })
            .collect()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.lower
                .partial_cmp(&other.lower)
                .unwrap_or(Ordering::Equal)
                .then(
                    self.upper
                        .partial_cmp(&other.upper)
                        .unwrap_or(Ordering::Equal),
                ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_overlap_strict() {
        let a = Interval::new(100.0, 200.0);
        let b = Interval::new(150.0, 250.0);
        let c = Interval::new(200.0, 300.0);

        assert!(a.overlaps_strict(&b));
        assert!(!a.overlaps_strict(&c)); // touching, not overlapping
    }

    #[test]
    fn test_interval_overlap_inclusive() {
        let a = Interval::new(100.0, 200.0);
        let c = Interval::new(200.0, 300.0);
        assert!(a.overlaps_inclusive(&c));
    }

    #[test]
    fn test_interval_intersect() {
        let a = Interval::new(100.0, 200.0);
        let b = Interval::new(150.0, 250.0);
        let ab = a.intersect(&b).unwrap();
        assert_eq!(ab, Interval::new(150.0, 200.0));

        let c = Interval::new(300.0, 400.0);
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_interval_intersect_touching() {
        let a = Interval::new(100.0, 200.0);
        let b = Interval::new(200.0, 300.0);
        assert_eq!(a.intersect(&b), Some(Interval::new(200.0, 200.0)));
    }

    #[test]
    fn test_interval_union() {
        let a = Interval::new(100.0, 200.0);
        let b = Interval::new(150.0, 250.0);
        assert_eq!(a.union(&b), Interval::new(100.0, 250.0));
    }

    #[test]
    fn test_interval_difference() {
        let a = Interval::new(100.0, 300.0);
        let b = Interval::new(150.0, 200.0);

        let pieces = a.difference(&b);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], Interval::new(100.0, 150.0));
        assert_eq!(pieces[1], Interval::new(200.0, 300.0));
    }

    #[test]
    fn test_interval_difference_no_overlap() {
        let a = Interval::new(100.0, 200.0);
        let b = Interval::new(300.0, 400.0);
        assert_eq!(a.difference(&b), vec![a]);
    }

    #[test]
    fn test_interval_encloses() {
        let outer = Interval::new(0.0, 100.0);
        let inner = Interval::new(10.0, 20.0);
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
    }

    #[test]
    fn test_interval_contains() {
        let a = Interval::new(0.0, 10.0);
        assert!(a.contains(0.0, true, true));
        assert!(!a.contains(0.0, false, true));
        assert!(a.contains(10.0, true, true));
        assert!(!a.contains(10.0, true, false));
    }

    #[test]
    fn test_interval_midpoint_length() {
        let a = Interval::new(0.0, 10.0);
        assert_eq!(a.length(), 10.0);
        assert_eq!(a.midpoint(), 5.0);
    }

    #[test]
    fn test_interval_shape_error() {
        assert!(Interval::try_new(10.0, 5.0).is_err());
    }

    #[test]
    #[serial_test::serial(touching_config)]
    fn test_touching_config_toggle() {
        config::set_touching_is_overlap(true);
        let a = Interval::new(0.0, 5.0);
        let b = Interval::new(5.0, 10.0);
        assert!(a.overlaps(&b));
        config::set_touching_is_overlap(false);
        assert!(!a.overlaps(&b));
    }
}
