//! The exact geometric predicates the sweep is built on: triple orientation,
//! segment intersection and point location. Nothing here is approximate; for
//! a scalar with exact arithmetic every answer is exact, including the
//! coordinates of constructed crossing points.

use std::cmp::Ordering;

use crate::data::{Contour, Point, Polygon, Segment};
use crate::BoolScalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Orientation {
  CounterClockWise,
  ClockWise,
  CoLinear,
}

impl Orientation {
  pub fn reverse(self) -> Orientation {
    match self {
      Orientation::CounterClockWise => Orientation::ClockWise,
      Orientation::ClockWise => Orientation::CounterClockWise,
      Orientation::CoLinear => Orientation::CoLinear,
    }
  }

  pub fn is_colinear(self) -> bool {
    self == Orientation::CoLinear
  }
}

fn cross<T: BoolScalar>(o: &Point<T>, p: &Point<T>, q: &Point<T>) -> T {
  (p.x.clone() - o.x.clone()) * (q.y.clone() - o.y.clone())
    - (p.y.clone() - o.y.clone()) * (q.x.clone() - o.x.clone())
}

/// How does the path p → q → r turn?
pub fn orientation<T: BoolScalar>(p: &Point<T>, q: &Point<T>, r: &Point<T>) -> Orientation {
  match cross(p, q, r).cmp(&T::zero()) {
    Ordering::Greater => Orientation::CounterClockWise,
    Ordering::Less => Orientation::ClockWise,
    Ordering::Equal => Orientation::CoLinear,
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentIntersection<T> {
  /// The segments meet in a single point: a crossing or an endpoint touch.
  Point(Point<T>),
  /// The segments are collinear and share a sub-segment.
  Overlap(Segment<T>),
}

/// Intersection of two closed segments.
///
/// Touching endpoints report the touched endpoint verbatim, with no
/// arithmetic; only proper interior crossings construct a new point, which
/// requires division and is exact for rational scalars.
pub fn segments_intersection<T: BoolScalar>(
  a: &Segment<T>,
  b: &Segment<T>,
) -> Option<SegmentIntersection<T>> {
  let (a1, a2) = (a.start(), a.end());
  let (b1, b2) = (b.start(), b.end());
  let b1_side = orientation(a1, a2, b1);
  let b2_side = orientation(a1, a2, b2);

  if b1_side == Orientation::CoLinear && b2_side == Orientation::CoLinear {
    // Shared line; the lexicographic order is the order along the line.
    let lo = a1.max(b1);
    let hi = a2.min(b2);
    return match lo.cmp(hi) {
      Ordering::Less => Some(SegmentIntersection::Overlap(Segment::new(
        lo.clone(),
        hi.clone(),
      ))),
      Ordering::Equal => Some(SegmentIntersection::Point(lo.clone())),
      Ordering::Greater => None,
    };
  }
  if b1_side == Orientation::CoLinear {
    return on_segment(a, b1).then(|| SegmentIntersection::Point(b1.clone()));
  }
  if b2_side == Orientation::CoLinear {
    return on_segment(a, b2).then(|| SegmentIntersection::Point(b2.clone()));
  }
  let a1_side = orientation(b1, b2, a1);
  let a2_side = orientation(b1, b2, a2);
  if a1_side == Orientation::CoLinear {
    return on_segment(b, a1).then(|| SegmentIntersection::Point(a1.clone()));
  }
  if a2_side == Orientation::CoLinear {
    return on_segment(b, a2).then(|| SegmentIntersection::Point(a2.clone()));
  }
  if b1_side != b2_side && a1_side != a2_side {
    return Some(SegmentIntersection::Point(crossing_point(a, b)));
  }
  None
}

// Caller guarantees pt is on the carrier line of s.
fn on_segment<T: BoolScalar>(s: &Segment<T>, pt: &Point<T>) -> bool {
  s.start() <= pt && pt <= s.end()
}

// Proper crossing of two non-parallel segments.
fn crossing_point<T: BoolScalar>(a: &Segment<T>, b: &Segment<T>) -> Point<T> {
  let rx = a.end().x.clone() - a.start().x.clone();
  let ry = a.end().y.clone() - a.start().y.clone();
  let sx = b.end().x.clone() - b.start().x.clone();
  let sy = b.end().y.clone() - b.start().y.clone();
  let denom = rx.clone() * sy.clone() - ry.clone() * sx.clone();
  let qpx = b.start().x.clone() - a.start().x.clone();
  let qpy = b.start().y.clone() - a.start().y.clone();
  let t = (qpx * sy - qpy * sx) / denom;
  Point::new(
    a.start().x.clone() + t.clone() * rx,
    a.start().y.clone() + t * ry,
  )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PointLocation {
  Inside,
  OnBoundary,
  Outside,
}

/// Ray-crossing point location against a single ring, with exact boundary
/// detection. Works for rings of either winding.
pub(crate) fn point_in_contour<T: BoolScalar>(pt: &Point<T>, contour: &Contour<T>) -> PointLocation {
  let mut inside = false;
  for edge in contour.edges() {
    if edge.contains(pt) {
      return PointLocation::OnBoundary;
    }
    // The edge oriented upward; the ray goes toward +x.
    let (lo, hi) = if edge.start().y <= edge.end().y {
      (edge.start(), edge.end())
    } else {
      (edge.end(), edge.start())
    };
    if lo.y <= pt.y && pt.y < hi.y && orientation(lo, hi, pt) == Orientation::CounterClockWise {
      inside = !inside;
    }
  }
  if inside {
    PointLocation::Inside
  } else {
    PointLocation::Outside
  }
}

/// Point location against a polygon with holes.
pub fn point_in_polygon<T: BoolScalar>(pt: &Point<T>, polygon: &Polygon<T>) -> PointLocation {
  polygon.locate(pt)
}
