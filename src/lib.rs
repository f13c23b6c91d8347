//! Set algebra over closed integer segments.
//!
//! A [Segment] is a closed interval `[start, end]` of `i64` coordinates with `start <= end`.
//! A [Segments] value is an ordered sequence of segments. The functions in [set] compute unions,
//! intersections, complements and differences of such sequences and always return them in
//! canonical form: sorted by start, and pairwise disjoint except for possibly shared boundary points.
//!
//! # Example
//! ```
//! use segment_algebra::{set, Segment, Segments};
//!
//! let booked: Segments = vec![Segment::new(9, 12).unwrap(), Segment::new(11, 14).unwrap()].into();
//! let day = Segment::new(8, 18).unwrap();
//!
//! let free = set::complement(day, &booked);
//! assert_eq!(free.to_string(), "[start: 8, end: 9], [start: 14, end: 18]");
//! ```

pub mod segments;
pub mod set;

use std::fmt::Display;

use num_traits::FromPrimitive;
use quickcheck::Arbitrary;
use thiserror::Error;
use tracing::debug;

pub use segments::Segments;

/// The sentinel used as "negative infinity" by [set::remove_overlaps].
/// Segments starting exactly at this coordinate are treated as already covered and are dropped
/// from canonical output.
pub const NEG_INFINITY: i64 = i64::MIN;

/// Errors raised when constructing or mutating a [Segment].
/// A failed call never modifies the segment it was called on.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SegmentError {
    /// The requested bounds would give a segment with `end < start`.
    #[error("invalid range: end {end} < start {start}")]
    InvalidRange { start: i64, end: i64 },
    /// A linear transform with a negative (or NaN) scale would invert the order of the bounds.
    #[error("invalid coefficient: scale {0} is negative")]
    InvalidCoefficient(f64),
    /// A transformed bound does not fit in an `i64`.
    #[error("transformed bound is out of range")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, SegmentError>;

/// A closed integer interval `[start, end]`.
///
/// The bounds are private and every constructor and mutator checks `start <= end`,
/// so a `Segment` is always well-defined. A segment with `start == end` is a point segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawSegment", into = "RawSegment")
)]
pub struct Segment {
    start: i64,
    end: i64,
}

impl Segment {
    /// Creates the segment `[start, end]`.
    /// Fails with [SegmentError::InvalidRange] if `end < start`.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::{Segment, SegmentError};
    ///
    /// let s = Segment::new(0, 1).unwrap();
    /// assert_eq!((s.start(), s.end()), (0, 1));
    /// assert_eq!(
    ///     Segment::new(0, -1),
    ///     Err(SegmentError::InvalidRange { start: 0, end: -1 })
    /// );
    /// ```
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if end < start {
            return Err(SegmentError::InvalidRange { start, end });
        }
        Ok(Segment { start, end })
    }

    /// Creates the point segment `[p, p]`.
    pub fn point(p: i64) -> Self {
        Segment { start: p, end: p }
    }

    /// Replaces both bounds.
    /// If `end < start` the segment is left unchanged and [SegmentError::InvalidRange] is returned.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// let mut s = Segment::new(1, 2).unwrap();
    /// assert!(s.update(0, -1).is_err());
    /// assert_eq!(s, Segment::new(1, 2).unwrap());
    /// s.update(0, 1).unwrap();
    /// assert_eq!(s, Segment::new(0, 1).unwrap());
    /// ```
    pub fn update(&mut self, start: i64, end: i64) -> Result<()> {
        if end < start {
            debug!(start, end, segment = %self, "rejected segment update");
            return Err(SegmentError::InvalidRange { start, end });
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Sets the start, if it does not exceed the current end.
    pub fn update_start(&mut self, start: i64) -> Result<()> {
        if start > self.end {
            debug!(start, segment = %self, "rejected start update");
            return Err(SegmentError::InvalidRange {
                start,
                end: self.end,
            });
        }
        self.start = start;
        Ok(())
    }

    /// Sets the end, if it is not below the current start.
    pub fn update_end(&mut self, end: i64) -> Result<()> {
        if end < self.start {
            debug!(end, segment = %self, "rejected end update");
            return Err(SegmentError::InvalidRange {
                start: self.start,
                end,
            });
        }
        self.end = end;
        Ok(())
    }

    /// Returns the lower bound of the segment.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Returns the upper bound of the segment.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Returns the length `end - start` of the segment.
    /// The length of a point segment is zero.
    /// The result is unsigned so that `[i64::MIN, i64::MAX]` has a representable length.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// assert_eq!(Segment::new(11, 13).unwrap().delta(), 2);
    /// assert_eq!(Segment::point(313).delta(), 0);
    /// assert_eq!(Segment::new(i64::MIN, i64::MAX).unwrap().delta(), u64::MAX);
    /// ```
    pub fn delta(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    /// Checks whether the segment has a positive length, i.e. is not a point segment.
    pub fn is_delta_positive(&self) -> bool {
        self.delta() > 0
    }

    /// Checks whether this segment is contained in `other`.
    /// Containment is not strict: equal segments are sub-segments of each other.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// let inner = Segment::new(4, 6).unwrap();
    /// let outer = Segment::new(3, 10).unwrap();
    /// assert!(inner.is_sub_segment(&outer));
    /// assert!(!outer.is_sub_segment(&inner));
    /// assert!(inner.is_sub_segment(&inner));
    /// ```
    pub fn is_sub_segment(&self, other: &Segment) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// Checks whether the point `p` lies in the segment, bounds included.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// let s = Segment::new(2, 30).unwrap();
    /// assert!(s.contains(2));
    /// assert!(s.contains(30));
    /// assert!(!s.contains(31));
    /// ```
    pub fn contains(&self, p: i64) -> bool {
        self.start <= p && p <= self.end
    }

    /// Returns the overlap of two segments, or `None` if they are disjoint.
    /// Segments that only touch at a boundary overlap in a point segment.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// let s = Segment::new(2, 30).unwrap();
    /// let t = Segment::new(20, 40).unwrap();
    /// assert_eq!(s.intersection(&t), Some(Segment::new(20, 30).unwrap()));
    ///
    /// let u = Segment::new(0, 1).unwrap();
    /// let v = Segment::new(1, 2).unwrap();
    /// assert_eq!(u.intersection(&v), Some(Segment::point(1)));
    ///
    /// let w = Segment::new(200, 300).unwrap();
    /// assert_eq!(s.intersection(&w), None);
    /// ```
    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        let (s, t) = (self, other);
        if s.start <= t.start && s.end <= t.end && s.end >= t.start {
            Some(Segment {
                start: t.start,
                end: s.end,
            })
        } else if s.start >= t.start && s.end >= t.end && s.start <= t.end {
            Some(Segment {
                start: s.start,
                end: t.end,
            })
        } else if s.is_sub_segment(t) {
            Some(*s)
        } else if t.is_sub_segment(s) {
            Some(*t)
        } else {
            None
        }
    }

    /// Scales both bounds by `a`, shifts them by `b` and rounds to the nearest integer.
    ///
    /// Fails with [SegmentError::InvalidCoefficient] if `a` is negative or NaN,
    /// and with [SegmentError::Overflow] if a new bound does not fit in an `i64`.
    /// On failure the segment is not modified.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// let mut s = Segment::new(10, 20).unwrap();
    /// s.linear_transform(1.5, -0.4).unwrap();
    /// assert_eq!(s, Segment::new(15, 30).unwrap());
    /// assert!(s.linear_transform(-1.0, 0.0).is_err());
    /// ```
    pub fn linear_transform(&mut self, a: f64, b: f64) -> Result<()> {
        *self = self.transformed(a, b)?;
        Ok(())
    }

    /// Computes the result of [Segment::linear_transform] without writing it back.
    pub(crate) fn transformed(&self, a: f64, b: f64) -> Result<Segment> {
        if a.is_nan() || a < 0.0 {
            debug!(a, segment = %self, "rejected linear transform");
            return Err(SegmentError::InvalidCoefficient(a));
        }
        let map = |x: i64| i64::from_f64((x as f64 * a + b).round()).ok_or(SegmentError::Overflow);
        Segment::new(map(self.start)?, map(self.end)?)
    }
}

impl TryFrom<(i64, i64)> for Segment {
    type Error = SegmentError;

    fn try_from((start, end): (i64, i64)) -> Result<Self> {
        Segment::new(start, end)
    }
}

impl From<Segment> for (i64, i64) {
    fn from(s: Segment) -> Self {
        (s.start, s.end)
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[start: {}, end: {}]", self.start, self.end)
    }
}

/// Unchecked wire form of a [Segment]; validated when converted back.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawSegment {
    start: i64,
    end: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSegment> for Segment {
    type Error = SegmentError;

    fn try_from(raw: RawSegment) -> Result<Self> {
        Segment::new(raw.start, raw.end)
    }
}

#[cfg(feature = "serde")]
impl From<Segment> for RawSegment {
    fn from(s: Segment) -> Self {
        RawSegment {
            start: s.start,
            end: s.end,
        }
    }
}

/// Generates segments with bounds in `(-1000, 1000)` so that random segments overlap often.
impl Arbitrary for Segment {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let a = i64::arbitrary(g) % 1000;
        let b = i64::arbitrary(g) % 1000;
        Segment {
            start: a.min(b),
            end: a.max(b),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let pair = (self.start, self.end);
        Box::new(
            pair.shrink()
                .filter_map(|(start, end)| Segment::new(start, end).ok()),
        )
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    fn seg(start: i64, end: i64) -> Segment {
        Segment::new(start, end).unwrap()
    }

    #[test]
    fn display() {
        assert_eq!(seg(11, 13).to_string(), "[start: 11, end: 13]");
        assert_eq!(seg(313, 313).to_string(), "[start: 313, end: 313]");
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        assert_eq!(Segment::new(0, 1), Ok(Segment { start: 0, end: 1 }));
        assert_eq!(
            Segment::new(0, -1),
            Err(SegmentError::InvalidRange { start: 0, end: -1 })
        );
        assert!(Segment::new(5, 5).is_ok());
    }

    #[test]
    fn update() {
        let mut s = seg(1, 2);
        assert!(s.update(0, 1).is_ok());
        assert_eq!(s, seg(0, 1));

        let mut s = seg(1, 2);
        assert!(s.update(0, -1).is_err());
        assert_eq!(s, seg(1, 2));
    }

    #[test]
    fn update_start() {
        let mut s = seg(1, 2);
        assert!(s.update_start(0).is_ok());
        assert_eq!(s, seg(0, 2));

        let mut s = seg(1, 2);
        assert_eq!(
            s.update_start(3),
            Err(SegmentError::InvalidRange { start: 3, end: 2 })
        );
        assert_eq!(s, seg(1, 2));

        // collapsing to a point is allowed
        assert!(s.update_start(2).is_ok());
        assert_eq!(s, Segment::point(2));
    }

    #[test]
    fn update_end() {
        let mut s = seg(1, 2);
        assert!(s.update_end(0).is_err());
        assert_eq!(s, seg(1, 2));

        assert!(s.update_end(3).is_ok());
        assert_eq!(s, seg(1, 3));
    }

    #[test]
    fn delta() {
        assert_eq!(seg(11, 13).delta(), 2);
        assert_eq!(seg(313, 313).delta(), 0);
        assert_eq!(seg(-5, 5).delta(), 10);
        assert!(seg(1, 2).is_delta_positive());
        assert!(!seg(1, 1).is_delta_positive());
    }

    #[test]
    fn sub_segment() {
        assert!(!seg(2, 30).is_sub_segment(&seg(20, 40)));
        assert!(seg(4, 6).is_sub_segment(&seg(3, 10)));
        assert!(!seg(-10, 60).is_sub_segment(&seg(3, 10)));
    }

    #[test]
    fn point_membership() {
        assert!(seg(2, 30).contains(3));
        assert!(!seg(-10, 30).contains(-11));
        assert!(Segment::point(7).contains(7));
    }

    #[test]
    fn intersection_cases() {
        let cases = [
            (seg(2, 30), seg(20, 40), Some(seg(20, 30))),
            (seg(20, 40), seg(2, 30), Some(seg(20, 30))),
            (seg(-20, 40), seg(2, 30), Some(seg(2, 30))),
            (seg(-20, 40), seg(-200, 300), Some(seg(-20, 40))),
            (seg(-20, 10), seg(200, 300), None),
            (seg(0, 1), seg(1, 2), Some(seg(1, 1))),
        ];
        for (s, t, expected) in cases {
            assert_eq!(s.intersection(&t), expected, "{} and {}", s, t);
        }
    }

    #[quickcheck]
    fn intersection_is_symmetric(s: Segment, t: Segment) -> bool {
        s.intersection(&t) == t.intersection(&s)
    }

    #[quickcheck]
    fn intersection_correct(s: Segment, t: Segment) {
        let i = s.intersection(&t);
        for p in s.start()..=s.end() {
            let expected = t.contains(p);
            assert_eq!(i.is_some_and(|i| i.contains(p)), expected, "{}", p);
        }
        if let Some(i) = i {
            assert!(i.is_sub_segment(&s));
            assert!(i.is_sub_segment(&t));
        }
    }

    #[test]
    fn linear_transform() {
        let mut s = seg(10, 20);
        s.linear_transform(0.5, 0.0).unwrap();
        assert_eq!(s, seg(5, 10));

        s.linear_transform(1.0, 2.5).unwrap();
        assert_eq!(s, seg(8, 13));

        s.linear_transform(0.0, 3.0).unwrap();
        assert_eq!(s, Segment::point(3));
    }

    #[test]
    fn linear_transform_rejects_negative_scale() {
        let mut s = seg(10, 20);
        assert_eq!(
            s.linear_transform(-2.0, 0.0),
            Err(SegmentError::InvalidCoefficient(-2.0))
        );
        assert!(s.linear_transform(f64::NAN, 0.0).is_err());
        assert_eq!(s, seg(10, 20));
    }

    #[test]
    fn linear_transform_overflow() {
        let mut s = seg(1, i64::MAX / 2);
        assert_eq!(s.linear_transform(4.0, 0.0), Err(SegmentError::Overflow));
        assert_eq!(s, seg(1, i64::MAX / 2));
    }

    #[quickcheck]
    fn linear_transform_keeps_order(s: Segment, a: u8, b: i16) -> bool {
        let mut t = s;
        t.linear_transform(a as f64 / 8.0, b as f64).is_ok() && t.start() <= t.end()
    }

    #[test]
    fn tuple_conversions() {
        assert_eq!(Segment::try_from((1, 3)), Ok(seg(1, 3)));
        assert!(Segment::try_from((3, 1)).is_err());
        assert_eq!(<(i64, i64)>::from(seg(-4, 9)), (-4, 9));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_validates_bounds() {
        let s: Segment = serde_json::from_str(r#"{"start":1,"end":4}"#).unwrap();
        assert_eq!(s, seg(1, 4));
        assert_eq!(serde_json::to_string(&s).unwrap(), r#"{"start":1,"end":4}"#);
        assert!(serde_json::from_str::<Segment>(r#"{"start":4,"end":1}"#).is_err());
    }
}
