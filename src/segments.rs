//! An ordered sequence of [Segment]s.
//!
//! [Segments] is a plain sequence: it may be unsorted and its elements may overlap.
//! The set operations in [crate::set] accept any sequence and return a new one in canonical form
//! (sorted by start, pairwise disjoint except for shared boundary points). They never modify their inputs.

use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use itertools::Itertools;
use quickcheck::Arbitrary;

use crate::{Result, Segment};

/// A sequence of segments.
///
/// Dereferences to `[Segment]`, so slice methods such as `len`, `iter` and indexing are available directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Segments(Vec<Segment>);

impl Segments {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Segments(Vec::new())
    }

    /// Creates an empty sequence with space for `capacity` segments.
    pub fn with_capacity(capacity: usize) -> Self {
        Segments(Vec::with_capacity(capacity))
    }

    /// Appends a segment at the end of the sequence.
    pub fn push(&mut self, s: Segment) {
        self.0.push(s);
    }

    /// Returns the underlying vector.
    pub fn into_vec(self) -> Vec<Segment> {
        self.0
    }

    /// Returns the start of every segment, in sequence order.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::{Segment, Segments};
    ///
    /// let ss: Segments = [(2, 3), (1, 2), (4, 5)]
    ///     .into_iter()
    ///     .map(|p| Segment::try_from(p).unwrap())
    ///     .collect();
    /// assert_eq!(ss.starts(), vec![2, 1, 4]);
    /// assert_eq!(ss.ends(), vec![3, 2, 5]);
    /// ```
    pub fn starts(&self) -> Vec<i64> {
        self.iter().map(Segment::start).collect()
    }

    /// Returns the end of every segment, in sequence order.
    pub fn ends(&self) -> Vec<i64> {
        self.iter().map(Segment::end).collect()
    }

    /// Returns the sum of the lengths of all segments.
    /// The sequence is not canonicalized first, so overlapping parts are counted once per segment.
    /// Saturates at `u64::MAX`.
    pub fn sum_deltas(&self) -> u64 {
        self.iter().fold(0, |acc, s| acc.saturating_add(s.delta()))
    }

    /// Applies [Segment::linear_transform] to every segment.
    /// Either all segments are transformed or, on error, none of them is.
    pub fn linear_transform(&mut self, a: f64, b: f64) -> Result<()> {
        let transformed = self
            .iter()
            .map(|s| s.transformed(a, b))
            .collect::<Result<Vec<_>>>()?;
        self.0 = transformed;
        Ok(())
    }
}

impl Deref for Segments {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Segments {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl AsRef<[Segment]> for Segments {
    fn as_ref(&self) -> &[Segment] {
        &self.0
    }
}

impl From<Vec<Segment>> for Segments {
    fn from(v: Vec<Segment>) -> Self {
        Segments(v)
    }
}

impl From<Segments> for Vec<Segment> {
    fn from(ss: Segments) -> Self {
        ss.0
    }
}

impl FromIterator<Segment> for Segments {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Segments(iter.into_iter().collect())
    }
}

impl Extend<Segment> for Segments {
    fn extend<T: IntoIterator<Item = Segment>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl IntoIterator for Segments {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Renders the segments in stored order, separated by `", "`.
impl Display for Segments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(", "))
    }
}

impl Arbitrary for Segments {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Segments(Vec::arbitrary(g))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Segments))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::SegmentError;

    fn segments(pairs: &[(i64, i64)]) -> Segments {
        pairs
            .iter()
            .map(|&p| Segment::try_from(p).unwrap())
            .collect()
    }

    #[test]
    fn display_keeps_stored_order() {
        let ss = segments(&[(2, 3), (1, 2), (4, 5)]);
        assert_eq!(
            ss.to_string(),
            "[start: 2, end: 3], [start: 1, end: 2], [start: 4, end: 5]"
        );
        assert_eq!(Segments::new().to_string(), "");
    }

    #[test]
    fn starts_and_ends() {
        let ss = segments(&[(2, 3), (1, 2), (4, 5)]);
        assert_eq!(ss.starts(), vec![2, 1, 4]);
        assert_eq!(ss.ends(), vec![3, 2, 5]);
        assert!(Segments::new().starts().is_empty());
    }

    #[test]
    fn sum_deltas() {
        assert_eq!(segments(&[(2, 3), (1, 2), (4, 5)]).sum_deltas(), 1 + 1 + 1);
        assert_eq!(segments(&[(0, 1), (-1, 5), (4, 6)]).sum_deltas(), 1 + 6 + 2);
        assert_eq!(segments(&[(3, 3), (4, 5)]).sum_deltas(), 1);
        assert_eq!(Segments::new().sum_deltas(), 0);
    }

    #[test]
    fn sum_deltas_saturates() {
        let full = Segment::new(i64::MIN, i64::MAX).unwrap();
        let ss: Segments = vec![full, full].into();
        assert_eq!(ss.sum_deltas(), u64::MAX);
    }

    #[test]
    fn linear_transform_all() {
        let mut ss = segments(&[(0, 2), (4, 6)]);
        ss.linear_transform(2.0, 1.0).unwrap();
        assert_eq!(ss, segments(&[(1, 5), (9, 13)]));
    }

    #[test]
    fn linear_transform_is_all_or_nothing() {
        let mut ss = segments(&[(0, 2), (4, 6)]);
        assert_eq!(
            ss.linear_transform(-1.0, 0.0),
            Err(SegmentError::InvalidCoefficient(-1.0))
        );
        assert_eq!(ss, segments(&[(0, 2), (4, 6)]));

        let mut ss = segments(&[(0, 2), (4, i64::MAX / 2)]);
        assert_eq!(ss.linear_transform(3.0, 0.0), Err(SegmentError::Overflow));
        assert_eq!(ss, segments(&[(0, 2), (4, i64::MAX / 2)]));
    }

    #[test]
    fn collect_and_extend() {
        let mut ss: Segments = vec![Segment::point(1)].into();
        ss.extend([Segment::point(2), Segment::point(3)]);
        ss.push(Segment::point(4));
        assert_eq!(ss.len(), 4);
        assert_eq!(ss[3], Segment::point(4));
        let v: Vec<Segment> = ss.clone().into();
        assert_eq!(v, ss.into_vec());
    }

    #[quickcheck]
    fn starts_ends_match_elements(ss: Segments) -> bool {
        let pairs: Vec<(i64, i64)> = ss.iter().map(|&s| s.into()).collect();
        let rebuilt: Vec<(i64, i64)> = ss.starts().into_iter().zip(ss.ends()).collect();
        pairs == rebuilt
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_a_plain_sequence() {
        let ss = segments(&[(0, 1), (3, 3)]);
        let json = serde_json::to_string(&ss).unwrap();
        assert_eq!(json, r#"[{"start":0,"end":1},{"start":3,"end":3}]"#);
        let back: Segments = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ss);
    }
}
