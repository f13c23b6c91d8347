//! Set operations over sequences of segments.
//!
//! Every operation takes its inputs by reference, never modifies them, and returns a new [Segments].
//! Apart from [segments_with_predicate], which is a plain filter, all results are canonical:
//! sorted ascending by start, and pairwise disjoint except for possibly shared boundary points.
//!
//! [remove_overlaps] is the canonicalization primitive. [union] and [get_overlaps] reduce to it,
//! [intersect] and [complement] canonicalize their inputs with it, and [set_diff] is built on [complement].

use itertools::Itertools;
use tracing::trace;

use crate::{Segment, Segments, NEG_INFINITY};

/// Merges overlapping and touching segments into a canonical sequence covering the same points.
///
/// The input is copied and sorted by start (stably), then swept from left to right while tracking the
/// right-most end seen so far. A segment starting after that end opens a new output segment,
/// a segment reaching past it extends the last output segment, and anything else is already covered.
///
/// The sweep starts with [NEG_INFINITY] as the right-most end, so segments starting exactly at
/// `i64::MIN` are treated as covered and do not appear in the output.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment, Segments};
///
/// let ss: Segments = [(2, 3), (1, 2), (4, 5)]
///     .into_iter()
///     .map(|p| Segment::try_from(p).unwrap())
///     .collect();
/// let canonical = set::remove_overlaps(&ss);
/// assert_eq!(canonical.to_string(), "[start: 1, end: 3], [start: 4, end: 5]");
/// ```
pub fn remove_overlaps(ss: &[Segment]) -> Segments {
    let mut sorted = ss.to_vec();
    sorted.sort_by_key(Segment::start);

    let mut right_most = NEG_INFINITY;
    let mut output = Segments::with_capacity(sorted.len());
    let mut dropped = 0usize;

    for s in sorted {
        if right_most < s.start {
            output.push(s);
            right_most = s.end;
        } else if let Some(last) = output.last_mut() {
            if right_most < s.end {
                last.end = s.end;
                right_most = s.end;
            }
        } else {
            // only reachable for segments starting at the sentinel
            dropped += 1;
        }
    }

    trace!(
        input = ss.len(),
        output = output.len(),
        dropped,
        "removed overlaps"
    );
    output
}

/// Returns the canonical union of any number of segment sequences.
/// The union of no sequences, or of empty ones, is empty.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment};
///
/// let a = vec![Segment::new(1, 3).unwrap(), Segment::new(2, 4).unwrap()];
/// let b = vec![Segment::new(8, 10).unwrap(), Segment::new(-2, 0).unwrap()];
/// let u = set::union([&a, &b]);
/// assert_eq!(u.to_string(), "[start: -2, end: 0], [start: 1, end: 4], [start: 8, end: 10]");
/// ```
pub fn union<I, S>(sets: I) -> Segments
where
    I: IntoIterator<Item = S>,
    S: AsRef<[Segment]>,
{
    let mut all = Vec::new();
    for set in sets {
        all.extend_from_slice(set.as_ref());
    }
    remove_overlaps(&all)
}

/// Returns the canonical intersection of two segment sequences.
///
/// Both inputs are canonicalized, then merged with one cursor per sequence.
/// After comparing the current pair, the cursor whose segment ends first advances (both if they end together).
/// This is linear in the size of the canonical inputs.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment};
///
/// let x = vec![Segment::new(1, 5).unwrap(), Segment::new(2, 10).unwrap(), Segment::new(12, 16).unwrap()];
/// let y = vec![Segment::new(3, 7).unwrap(), Segment::new(16, 17).unwrap()];
/// let i = set::intersect(&x, &y);
/// assert_eq!(i.to_string(), "[start: 3, end: 7], [start: 16, end: 16]");
/// ```
pub fn intersect(x: &[Segment], y: &[Segment]) -> Segments {
    let (x, y) = (remove_overlaps(x), remove_overlaps(y));
    let mut output = Segments::new();

    let (mut i, mut j) = (0, 0);
    while i < x.len() && j < y.len() {
        if let Some(overlap) = x[i].intersection(&y[j]) {
            output.push(overlap);
        }
        match x[i].end.cmp(&y[j].end) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    output
}

/// Returns the points covered by at least two segments of the sequence, in canonical form.
///
/// Every pair of segments is compared, so this takes quadratic time.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment};
///
/// let ss = vec![Segment::new(2, 30).unwrap(), Segment::new(10, 50).unwrap(), Segment::new(50, 80).unwrap()];
/// let overlaps = set::get_overlaps(&ss);
/// assert_eq!(overlaps.to_string(), "[start: 10, end: 30], [start: 50, end: 50]");
/// ```
pub fn get_overlaps(ss: &[Segment]) -> Segments {
    let overlaps = ss
        .iter()
        .tuple_combinations()
        .filter_map(|(s, t)| s.intersection(t))
        .collect_vec();
    remove_overlaps(&overlaps)
}

/// Returns the parts of `superset` that are not covered by `ss`.
///
/// More precisely, the result is the shortest canonical sequence `c` such that the union of `c` and `ss`,
/// restricted to `superset`, is `superset`. Since segments are closed, the pieces keep the boundary
/// points they share with `ss`.
///
/// A superset of zero length yields an empty result, as does a superset contained in one of the segments of `ss`.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment};
///
/// let superset = Segment::new(0, 3).unwrap();
/// let c = set::complement(superset, &[Segment::point(2)]);
/// assert_eq!(c.to_string(), "[start: 0, end: 2], [start: 2, end: 3]");
///
/// assert!(set::complement(Segment::point(5), &[]).is_empty());
/// ```
pub fn complement(superset: Segment, ss: &[Segment]) -> Segments {
    complement_canonical(superset, &remove_overlaps(ss))
}

/// Like [complement], but `canonical` must already be the output of [remove_overlaps].
fn complement_canonical(superset: Segment, canonical: &[Segment]) -> Segments {
    if !superset.is_delta_positive() {
        return Segments::new();
    }

    let mut output = Segments::new();
    let mut open = superset;
    for s in canonical {
        if superset.is_sub_segment(s) {
            return Segments::new();
        }
        if superset.intersection(s).is_none() {
            continue;
        }
        if s.start <= open.start {
            // covers a prefix of the open piece
            open.start = s.end;
        } else if s.end >= superset.end {
            // covers the suffix, no later segment can overlap
            open.end = s.start;
        } else {
            output.push(Segment {
                start: open.start,
                end: s.start,
            });
            open = Segment {
                start: s.end,
                end: superset.end,
            };
        }
    }
    output.push(open);
    output
}

/// Returns the parts of `x` that are not covered by `y`, in canonical form.
///
/// This generalizes [complement]: each segment of `x` is complemented against `y` and the pieces are
/// canonicalized. The result is the shortest sequence `c` such that `union(c, y) == union(x, y)`,
/// up to point segments of `x`, which have no length and are therefore never part of the difference.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment};
///
/// let x = vec![Segment::new(0, 29347).unwrap(), Segment::new(36569394, 36596094).unwrap()];
/// let y = vec![Segment::new(0, 30000).unwrap(), Segment::new(36571515, 36901489).unwrap()];
/// assert_eq!(set::set_diff(&x, &y), vec![Segment::new(36569394, 36571515).unwrap()].into());
/// ```
pub fn set_diff(x: &[Segment], y: &[Segment]) -> Segments {
    let y = remove_overlaps(y);
    let pieces = x
        .iter()
        .flat_map(|&s| complement_canonical(s, &y))
        .collect_vec();
    remove_overlaps(&pieces)
}

/// Checks whether the point `p` lies in any of the segments.
pub fn is_point_in_segments(p: i64, ss: &[Segment]) -> bool {
    ss.iter().any(|s| s.contains(p))
}

/// Returns the segments satisfying `pred`, in their original order.
/// The result is not canonicalized.
///
/// # Example
/// ```
/// use segment_algebra::{set, Segment};
///
/// let ss = vec![Segment::point(2), Segment::new(1, 2).unwrap()];
/// let long = set::segments_with_predicate(&ss, Segment::is_delta_positive);
/// assert_eq!(long, vec![Segment::new(1, 2).unwrap()].into());
/// ```
pub fn segments_with_predicate<P>(ss: &[Segment], mut pred: P) -> Segments
where
    P: FnMut(&Segment) -> bool,
{
    ss.iter().filter(|&s| pred(s)).copied().collect()
}

impl Segment {
    /// Checks whether this segment shares no point with the segments in `tt`.
    ///
    /// # Example
    /// ```
    /// use segment_algebra::Segment;
    ///
    /// let s = Segment::new(11, 13).unwrap();
    /// assert!(s.is_intersection_empty(&[Segment::new(20, 25).unwrap()]));
    /// assert!(!s.is_intersection_empty(&[Segment::new(13, 14).unwrap()]));
    /// ```
    pub fn is_intersection_empty(&self, tt: &[Segment]) -> bool {
        intersect(std::slice::from_ref(self), tt).is_empty()
    }
}
