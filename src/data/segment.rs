use num_bigint::BigInt;
use num_rational::BigRational;
use rand::Rng;

use crate::data::Point;
use crate::predicates::{orientation, Orientation};
use crate::BoolScalar;

/// A line segment, stored with `start <= end` in point order.
///
/// The constructor normalizes the endpoint order, so two segments over the
/// same pair of points always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Segment<T> {
  start: Point<T>,
  end: Point<T>,
}

impl<T: Ord> Segment<T> {
  pub fn new(a: Point<T>, b: Point<T>) -> Segment<T> {
    if a <= b {
      Segment { start: a, end: b }
    } else {
      Segment { start: b, end: a }
    }
  }
}

impl<T> Segment<T> {
  pub fn start(&self) -> &Point<T> {
    &self.start
  }

  pub fn end(&self) -> &Point<T> {
    &self.end
  }

  pub fn into_endpoints(self) -> (Point<T>, Point<T>) {
    (self.start, self.end)
  }
}

impl<T: BoolScalar> Segment<T> {
  pub fn is_degenerate(&self) -> bool {
    self.start == self.end
  }

  /// Closed containment: endpoints count as on the segment.
  ///
  /// For collinear points the lexicographic order agrees with the order along
  /// the segment, so the between-check needs no arithmetic.
  pub fn contains(&self, pt: &Point<T>) -> bool {
    orientation(&self.start, &self.end, pt) == Orientation::CoLinear
      && &self.start <= pt
      && pt <= &self.end
  }
}

impl<T: Ord> From<(Point<T>, Point<T>)> for Segment<T> {
  fn from(endpoints: (Point<T>, Point<T>)) -> Segment<T> {
    Segment::new(endpoints.0, endpoints.1)
  }
}

/// An unordered collection of segments. Duplicates carry no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multisegment<T> {
  segments: Vec<Segment<T>>,
}

impl<T> Multisegment<T> {
  pub fn new(segments: Vec<Segment<T>>) -> Multisegment<T> {
    Multisegment { segments }
  }

  pub fn empty() -> Multisegment<T> {
    Multisegment { segments: Vec::new() }
  }

  pub fn segments(&self) -> &[Segment<T>] {
    &self.segments
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Segment<T>> {
    self.segments.iter()
  }

  pub fn len(&self) -> usize {
    self.segments.len()
  }

  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }
}

impl<T: BoolScalar> Multisegment<T> {
  /// Sorted, deduplicated form. Output of every operation is canonical.
  pub fn canonical(mut self) -> Multisegment<T> {
    self.segments.sort();
    self.segments.dedup();
    self
  }
}

impl<T> From<Vec<Segment<T>>> for Multisegment<T> {
  fn from(segments: Vec<Segment<T>>) -> Multisegment<T> {
    Multisegment::new(segments)
  }
}

impl<T> From<Segment<T>> for Multisegment<T> {
  fn from(segment: Segment<T>) -> Multisegment<T> {
    Multisegment::new(vec![segment])
  }
}

impl Multisegment<BigRational> {
  /// Random non-degenerate segments with integer coordinates in `[-span, span]`.
  pub fn random<R>(count: usize, span: i64, rng: &mut R) -> Multisegment<BigRational>
  where
    R: Rng + ?Sized,
  {
    let rational = |v: i64| BigRational::from_integer(BigInt::from(v));
    let mut segments = Vec::with_capacity(count);
    while segments.len() < count {
      let (x1, y1) = (rng.gen_range(-span..=span), rng.gen_range(-span..=span));
      let (x2, y2) = (rng.gen_range(-span..=span), rng.gen_range(-span..=span));
      if (x1, y1) == (x2, y2) {
        continue;
      }
      segments.push(Segment::new(
        Point::new(rational(x1), rational(y1)),
        Point::new(rational(x2), rational(y2)),
      ));
    }
    Multisegment::new(segments)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalized_endpoints() {
    let s = Segment::new(Point::new(2, 1), Point::new(0, 3));
    assert_eq!(s.start(), &Point::new(0, 3));
    assert_eq!(s.end(), &Point::new(2, 1));
    assert_eq!(s, Segment::new(Point::new(0, 3), Point::new(2, 1)));
  }

  #[test]
  fn contains_interior_and_endpoints() {
    let s = Segment::new(Point::new(0, 0), Point::new(4, 4));
    assert!(s.contains(&Point::new(2, 2)));
    assert!(s.contains(&Point::new(0, 0)));
    assert!(s.contains(&Point::new(4, 4)));
    assert!(!s.contains(&Point::new(5, 5)));
    assert!(!s.contains(&Point::new(2, 3)));
  }

  #[test]
  fn canonical_sorts_and_dedups() {
    let s1 = Segment::new(Point::new(1, 0), Point::new(0, 0));
    let s2 = Segment::new(Point::new(0, 0), Point::new(1, 0));
    let ms = Multisegment::new(vec![s1, s2]).canonical();
    assert_eq!(ms.len(), 1);
  }
}
