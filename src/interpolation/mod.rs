//! Piecewise-linear interpolation over sorted `(x, y)` pairs.
//!
//! Used by wavelength alignment to evaluate a spectrum at arbitrary
//! wavelengths. Queries outside the covered range clamp to the first or last
//! sample; there is no extrapolation.
//!
//! ## Key Types
//!
//! - [`SortedPairs`]: pairs sorted ascending by x, ready for lookup
//! - [`interpolate_by`]: bisection lookup with an explicit key comparator
//! - [`linspace`]: evenly spaced query grid

use std::cmp::Ordering;

/// `(x, y)` pairs sorted ascending by x.
///
/// Duplicate x values are allowed and keep their original relative order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortedPairs {
    pairs: Vec<(f64, f64)>,
}

impl SortedPairs {
    /// Sort pairs by x.
    ///
    /// The sort is stable, so ties keep their input order.
    #[must_use]
    pub fn from_unsorted(mut pairs: Vec<(f64, f64)>) -> Self {
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { pairs }
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Smallest x.
    #[must_use]
    pub fn first_x(&self) -> Option<f64> {
        self.pairs.first().map(|p| p.0)
    }

    /// Largest x.
    #[must_use]
    pub fn last_x(&self) -> Option<f64> {
        self.pairs.last().map(|p| p.0)
    }

    /// Interpolated y at `x`, or `None` when empty.
    #[must_use]
    pub fn at(&self, x: f64) -> Option<f64> {
        interpolate(&self.pairs, x)
    }

    /// The underlying pairs.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.pairs
    }
}

/// Interpolate using `f64::total_cmp` as the key order.
#[must_use]
pub fn interpolate(pairs: &[(f64, f64)], x: f64) -> Option<f64> {
    interpolate_by(pairs, x, f64::total_cmp)
}

/// Piecewise-linear interpolation with clamped ends.
///
/// `pairs` must be sorted ascending by x under `compare`. Returns `None` only
/// for empty input.
///
/// # Example
///
/// ```
/// use spectral_compare::interpolation::interpolate_by;
///
/// let pairs = [(400.0, 1.0), (500.0, 2.0), (600.0, 3.0)];
/// assert_eq!(interpolate_by(&pairs, 450.0, f64::total_cmp), Some(1.5));
/// assert_eq!(interpolate_by(&pairs, 700.0, f64::total_cmp), Some(3.0));
/// ```
pub fn interpolate_by<F>(pairs: &[(f64, f64)], x: f64, compare: F) -> Option<f64>
where
    F: Fn(&f64, &f64) -> Ordering,
{
    let first = *pairs.first()?;
    let last = *pairs.last()?;

    if compare(&x, &first.0) != Ordering::Greater {
        return Some(first.1);
    }
    if compare(&x, &last.0) != Ordering::Less {
        return Some(last.1);
    }

    // Invariant: pairs[lo].x <= x < pairs[hi].x
    let mut lo = 0;
    let mut hi = pairs.len() - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if compare(&pairs[mid].0, &x) == Ordering::Greater {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    Some(lerp(pairs[lo], pairs[hi], x))
}

/// Linear interpolation between two bracketing pairs.
///
/// A degenerate bracket (equal x) yields the lower y.
pub(crate) fn lerp(lower: (f64, f64), upper: (f64, f64), x: f64) -> f64 {
    let span = upper.0 - lower.0;
    if span == 0.0 {
        return lower.1;
    }
    let t = (x - lower.0) / span;
    lower.1 + (upper.1 - lower.1) * t
}

/// `count` evenly spaced points from `start` to `end` inclusive.
///
/// `count` below 2 yields just `start` (or nothing for 0).
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let denominator = (count - 1) as f64;
            (0..count)
                .map(|i| start + (end - start) * (i as f64 / denominator))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<(f64, f64)> {
        vec![(400.0, 1.0), (500.0, 2.0), (600.0, 3.0)]
    }

    #[test]
    fn test_clamp_below() {
        assert_eq!(interpolate(&pairs(), 100.0), Some(1.0));
        assert_eq!(interpolate(&pairs(), 400.0), Some(1.0));
    }

    #[test]
    fn test_clamp_above() {
        assert_eq!(interpolate(&pairs(), 900.0), Some(3.0));
        assert_eq!(interpolate(&pairs(), 600.0), Some(3.0));
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(interpolate(&pairs(), 500.0), Some(2.0));
    }

    #[test]
    fn test_interior() {
        let y = interpolate(&pairs(), 575.0).unwrap();
        assert!((y - 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_bracket() {
        assert_eq!(lerp((500.0, 7.0), (500.0, 9.0), 500.0), 7.0);
    }

    #[test]
    fn test_duplicates_use_later_entry() {
        // Bisection lands past every entry <= x, so the last duplicate wins.
        let sorted = SortedPairs::from_unsorted(vec![
            (3.0, 30.0),
            (2.0, 20.0),
            (1.0, 10.0),
            (2.0, 25.0),
        ]);
        assert_eq!(
            sorted.as_slice(),
            &[(1.0, 10.0), (2.0, 20.0), (2.0, 25.0), (3.0, 30.0)]
        );
        assert_eq!(sorted.at(2.0), Some(25.0));
        assert_eq!(sorted.at(2.5), Some(27.5));
    }

    #[test]
    fn test_custom_comparator() {
        // Descending x with a reversed comparator.
        let pairs = [(600.0, 3.0), (500.0, 2.0), (400.0, 1.0)];
        let y = interpolate_by(&pairs, 450.0, |a, b| b.total_cmp(a)).unwrap();
        assert!((y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        assert_eq!(interpolate(&[], 1.0), None);
        assert!(SortedPairs::default().at(1.0).is_none());
    }

    #[test]
    fn test_single_pair() {
        assert_eq!(interpolate(&[(5.0, 2.0)], 1.0), Some(2.0));
        assert_eq!(interpolate(&[(5.0, 2.0)], 9.0), Some(2.0));
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(450.0, 600.0, 2), vec![450.0, 600.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }
}
