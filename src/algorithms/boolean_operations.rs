//! Boolean set operations over multisegments and multipolygons.
//!
//! The engine is a single-pass plane sweep in the style of Martinez–Rueda:
//! segment endpoints seed an event queue; the sweep keeps the active
//! segments ordered, eagerly subdivides intersecting neighbors, labels each
//! resulting piece with in/out information for both operands, selects the
//! pieces the requested operation keeps, and reassembles the survivors into
//! output geometry. Every operation is a pure function of its operands and
//! runs in `O((n + k) log n)` for `n` input segments and `k` intersections.
//!
//! ```
//! use num::BigRational;
//! use polybool::data::{Contour, Multipolygon, Point, Polygon};
//! use polybool::BooleanOps;
//!
//! let square = |x0: i64, y0: i64, x1: i64, y1: i64| -> Polygon<BigRational> {
//!   let pt = |x, y| Point::<BigRational>::from((x, y));
//!   Polygon::new(
//!     Contour::new(vec![pt(x0, y0), pt(x1, y0), pt(x1, y1), pt(x0, y1)]).unwrap(),
//!     vec![],
//!   )
//!   .unwrap()
//! };
//! let a = Multipolygon::from(square(0, 0, 2, 2));
//! let b = Multipolygon::from(square(1, 1, 3, 3));
//! let overlap = a.intersect(&b).unwrap();
//! assert_eq!(overlap, Multipolygon::from(square(1, 1, 2, 2)));
//! ```

mod connect;
mod event;
mod sweep;

use claims::debug_assert_ok;
use log::debug;

use self::event::{EdgeKind, EventArena, EventQueue};
use self::sweep::OperandKind;
use crate::data::{Mix, Multipoint, Multipolygon, Multisegment, Point};
use crate::predicates::PointLocation;
use crate::{BoolScalar, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Intersection,
  Union,
  Difference,
  SymmetricDifference,
}

impl Operation {
  pub fn apply<T>(self, a: &Multipolygon<T>, b: &Multipolygon<T>) -> Result<Multipolygon<T>, Error>
  where
    T: BoolScalar,
  {
    areal_operation(a, b, self)
  }
}

/// The Boolean set operations, implemented for [`Multisegment`] and
/// [`Multipolygon`]. All methods validate their operands and reject
/// malformed input rather than repairing it.
pub trait BooleanOps: Sized {
  /// The mixed-dimension result of [`BooleanOps::complete_intersect`].
  type Complete;

  fn intersect(&self, other: &Self) -> Result<Self, Error>;

  /// Intersection that keeps the lower-dimensional residues: contacts that
  /// the regular intersection discards because they enclose no measure.
  fn complete_intersect(&self, other: &Self) -> Result<Self::Complete, Error>;

  fn unite(&self, other: &Self) -> Result<Self, Error>;

  fn subtract(&self, other: &Self) -> Result<Self, Error>;

  fn symmetric_subtract(&self, other: &Self) -> Result<Self, Error>;
}

impl<T: BoolScalar> BooleanOps for Multisegment<T> {
  type Complete = (Multipoint<T>, Multisegment<T>);

  fn intersect(&self, other: &Self) -> Result<Self, Error> {
    linear_operation(self, other, Operation::Intersection)
  }

  fn complete_intersect(&self, other: &Self) -> Result<Self::Complete, Error> {
    complete_intersect_linear(self, other)
  }

  fn unite(&self, other: &Self) -> Result<Self, Error> {
    linear_operation(self, other, Operation::Union)
  }

  fn subtract(&self, other: &Self) -> Result<Self, Error> {
    linear_operation(self, other, Operation::Difference)
  }

  fn symmetric_subtract(&self, other: &Self) -> Result<Self, Error> {
    linear_operation(self, other, Operation::SymmetricDifference)
  }
}

impl<T: BoolScalar> BooleanOps for Multipolygon<T> {
  type Complete = Mix<T>;

  fn intersect(&self, other: &Self) -> Result<Self, Error> {
    areal_operation(self, other, Operation::Intersection)
  }

  fn complete_intersect(&self, other: &Self) -> Result<Self::Complete, Error> {
    complete_intersect_areal(self, other)
  }

  fn unite(&self, other: &Self) -> Result<Self, Error> {
    areal_operation(self, other, Operation::Union)
  }

  fn subtract(&self, other: &Self) -> Result<Self, Error> {
    areal_operation(self, other, Operation::Difference)
  }

  fn symmetric_subtract(&self, other: &Self) -> Result<Self, Error> {
    areal_operation(self, other, Operation::SymmetricDifference)
  }
}

fn validate_multisegment<T: BoolScalar>(multisegment: &Multisegment<T>) -> Result<(), Error> {
  for segment in multisegment.iter() {
    if segment.is_degenerate() {
      return Err(Error::DegenerateSegment);
    }
  }
  Ok(())
}

fn seed_multisegments<T: BoolScalar>(
  a: &Multisegment<T>,
  b: &Multisegment<T>,
) -> (EventArena<T>, EventQueue<T>) {
  let mut arena = EventArena::new();
  let mut queue = EventQueue::new();
  for &(operand, from_left) in [(a, true), (b, false)].iter() {
    for segment in operand.iter() {
      let (start, end) =
        arena.alloc_pair(segment.start().clone(), segment.end().clone(), from_left);
      queue.push(&arena, start);
      queue.push(&arena, end);
    }
  }
  (arena, queue)
}

fn seed_multipolygons<T: BoolScalar>(
  a: &Multipolygon<T>,
  b: &Multipolygon<T>,
) -> (EventArena<T>, EventQueue<T>) {
  let mut arena = EventArena::new();
  let mut queue = EventQueue::new();
  for &(operand, from_left) in [(a, true), (b, false)].iter() {
    for polygon in operand.iter() {
      for contour in polygon.contours() {
        for edge in contour.edges() {
          let (lo, hi) = edge.into_endpoints();
          let (start, end) = arena.alloc_pair(lo, hi, from_left);
          queue.push(&arena, start);
          queue.push(&arena, end);
        }
      }
    }
  }
  (arena, queue)
}

fn linear_operation<T: BoolScalar>(
  a: &Multisegment<T>,
  b: &Multisegment<T>,
  operation: Operation,
) -> Result<Multisegment<T>, Error> {
  validate_multisegment(a)?;
  validate_multisegment(b)?;
  if a.is_empty() || b.is_empty() {
    return Ok(match operation {
      Operation::Intersection => Multisegment::empty(),
      Operation::Union | Operation::SymmetricDifference => {
        if a.is_empty() {
          b.clone().canonical()
        } else {
          a.clone().canonical()
        }
      }
      Operation::Difference => {
        if a.is_empty() {
          Multisegment::empty()
        } else {
          a.clone().canonical()
        }
      }
    });
  }
  debug!(
    "linear {:?}: {} + {} segments",
    operation,
    a.len(),
    b.len()
  );
  let (arena, queue) = seed_multisegments(a, b);
  let outcome = sweep::subdivide(arena, queue, OperandKind::Linear, operation)?;
  let mut arena = outcome.arena;
  sweep::select_linear(&mut arena, operation);
  Ok(connect::merge_pieces(connect::pieces_where(
    &arena,
    |event| event.in_result,
  )))
}

fn complete_intersect_linear<T: BoolScalar>(
  a: &Multisegment<T>,
  b: &Multisegment<T>,
) -> Result<(Multipoint<T>, Multisegment<T>), Error> {
  validate_multisegment(a)?;
  validate_multisegment(b)?;
  if a.is_empty() || b.is_empty() {
    return Ok((Multipoint::empty(), Multisegment::empty()));
  }
  let (arena, queue) = seed_multisegments(a, b);
  let outcome = sweep::subdivide(arena, queue, OperandKind::Linear, Operation::Intersection)?;
  let mut arena = outcome.arena;
  sweep::select_linear(&mut arena, Operation::Intersection);
  let segments = connect::merge_pieces(connect::pieces_where(&arena, |event| event.in_result));
  let points: Vec<Point<T>> = outcome
    .touches
    .into_iter()
    .filter(|touch| !segments.iter().any(|piece| piece.contains(touch)))
    .collect();
  Ok((Multipoint::new(points), segments))
}

fn areal_operation<T: BoolScalar>(
  a: &Multipolygon<T>,
  b: &Multipolygon<T>,
  operation: Operation,
) -> Result<Multipolygon<T>, Error> {
  a.validate()?;
  b.validate()?;
  if a.is_empty() || b.is_empty() {
    return Ok(match operation {
      Operation::Intersection => Multipolygon::empty(),
      Operation::Union | Operation::SymmetricDifference => {
        if a.is_empty() {
          b.clone().canonical()
        } else {
          a.clone().canonical()
        }
      }
      Operation::Difference => {
        if a.is_empty() {
          Multipolygon::empty()
        } else {
          a.clone().canonical()
        }
      }
    });
  }
  debug!(
    "areal {:?}: {} + {} polygons",
    operation,
    a.len(),
    b.len()
  );
  let (arena, queue) = seed_multipolygons(a, b);
  let outcome = sweep::subdivide(arena, queue, OperandKind::Areal, operation)?;
  let contours = connect::connect_edges(&outcome.arena, &outcome.processed);
  let result = connect::polygons_from_contours(contours);
  debug_assert_ok!(result.validate_weakly());
  Ok(result)
}

fn complete_intersect_areal<T: BoolScalar>(
  a: &Multipolygon<T>,
  b: &Multipolygon<T>,
) -> Result<Mix<T>, Error> {
  a.validate()?;
  b.validate()?;
  if a.is_empty() || b.is_empty() {
    return Ok(Mix::empty());
  }
  let (arena, queue) = seed_multipolygons(a, b);
  let outcome = sweep::subdivide(arena, queue, OperandKind::Areal, Operation::Intersection)?;
  let contours = connect::connect_edges(&outcome.arena, &outcome.processed);
  let polygons = connect::polygons_from_contours(contours);
  // Coincident edges with interiors on opposite sides are where the operands
  // touch without overlapping: the one-dimensional residue.
  let segments = connect::merge_pieces(connect::pieces_where(&outcome.arena, |event| {
    event.edge_kind == EdgeKind::DifferentTransition
  }));
  let points: Vec<Point<T>> = outcome
    .touches
    .into_iter()
    .filter(|touch| {
      !segments.iter().any(|piece| piece.contains(touch))
        && polygons.locate(touch) == PointLocation::Outside
    })
    .collect();
  Ok(Mix::new(Multipoint::new(points), segments, polygons))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::{Contour, Polygon, Segment};
  use num::BigRational;

  fn pt(x: i64, y: i64) -> Point<BigRational> {
    Point::from((x, y))
  }

  fn seg(a: (i64, i64), b: (i64, i64)) -> Segment<BigRational> {
    Segment::new(pt(a.0, a.1), pt(b.0, b.1))
  }

  fn multisegment(segments: &[((i64, i64), (i64, i64))]) -> Multisegment<BigRational> {
    Multisegment::new(segments.iter().map(|&(a, b)| seg(a, b)).collect())
  }

  fn contour(points: &[(i64, i64)]) -> Contour<BigRational> {
    Contour::new(points.iter().map(|&(x, y)| pt(x, y)).collect()).unwrap()
  }

  fn polygon(points: &[(i64, i64)]) -> Multipolygon<BigRational> {
    Multipolygon::from(Polygon::new(contour(points), vec![]).unwrap())
  }

  fn trident() -> Multisegment<BigRational> {
    multisegment(&[((0, 0), (0, 1)), ((0, 0), (1, 1)), ((0, 0), (1, 0))])
  }

  fn square_boundary() -> Multisegment<BigRational> {
    multisegment(&[
      ((0, 0), (1, 0)),
      ((1, 0), (1, 1)),
      ((1, 1), (0, 1)),
      ((0, 1), (0, 0)),
    ])
  }

  #[test]
  fn segments_intersect_shares_two_sides() {
    let result = trident().intersect(&square_boundary()).unwrap();
    assert_eq!(
      result,
      multisegment(&[((0, 0), (0, 1)), ((0, 0), (1, 0))]).canonical()
    );
  }

  #[test]
  fn segments_complete_intersect_adds_corner_touch() {
    let (points, segments) = trident().complete_intersect(&square_boundary()).unwrap();
    assert_eq!(points.points(), &[pt(1, 1)]);
    assert_eq!(
      segments,
      multisegment(&[((0, 0), (0, 1)), ((0, 0), (1, 0))]).canonical()
    );
  }

  #[test]
  fn segments_subtract_is_asymmetric() {
    let diagonal = trident().subtract(&square_boundary()).unwrap();
    assert_eq!(diagonal, multisegment(&[((0, 0), (1, 1))]));
    let rim = square_boundary().subtract(&trident()).unwrap();
    assert_eq!(
      rim,
      multisegment(&[((0, 1), (1, 1)), ((1, 0), (1, 1))]).canonical()
    );
  }

  #[test]
  fn segments_complete_intersect_of_identical_operands() {
    let a = trident();
    let (points, segments) = a.complete_intersect(&a).unwrap();
    assert!(points.is_empty());
    assert_eq!(segments, a.canonical());
  }

  #[test]
  fn triangles_xor_forms_square() {
    let left = polygon(&[(0, 0), (1, 0), (0, 1)]);
    let right = polygon(&[(0, 1), (1, 0), (1, 1)]);
    let result = left.symmetric_subtract(&right).unwrap();
    assert_eq!(result, polygon(&[(0, 0), (1, 0), (1, 1), (0, 1)]));
  }

  #[test]
  fn triangles_complete_intersect_is_their_shared_edge() {
    let left = polygon(&[(0, 0), (1, 0), (0, 1)]);
    let right = polygon(&[(0, 1), (1, 0), (1, 1)]);
    assert!(left.intersect(&right).unwrap().is_empty());
    let mix = left.complete_intersect(&right).unwrap();
    assert!(mix.points.is_empty());
    assert_eq!(mix.segments, multisegment(&[((0, 1), (1, 0))]));
    assert!(mix.polygons.is_empty());
  }

  #[test]
  fn checkerboard_squares_tile_under_union() {
    let a = Multipolygon::new(vec![
      Polygon::new(contour(&[(0, 0), (1, 0), (1, 1), (0, 1)]), vec![]).unwrap(),
      Polygon::new(contour(&[(1, 1), (2, 1), (2, 2), (1, 2)]), vec![]).unwrap(),
    ]);
    let b = Multipolygon::new(vec![
      Polygon::new(contour(&[(1, 0), (2, 0), (2, 1), (1, 1)]), vec![]).unwrap(),
      Polygon::new(contour(&[(0, 1), (1, 1), (1, 2), (0, 2)]), vec![]).unwrap(),
    ]);
    assert!(a.intersect(&b).unwrap().is_empty());
    assert_eq!(a.unite(&b).unwrap(), polygon(&[(0, 0), (2, 0), (2, 2), (0, 2)]));
    let mix = a.complete_intersect(&b).unwrap();
    assert!(mix.points.is_empty());
    assert!(mix.polygons.is_empty());
    assert_eq!(
      mix.segments,
      multisegment(&[
        ((1, 0), (1, 1)),
        ((0, 1), (1, 1)),
        ((1, 1), (2, 1)),
        ((1, 1), (1, 2)),
      ])
      .canonical()
    );
  }

  #[test]
  fn overlapping_squares() {
    let a = polygon(&[(0, 0), (2, 0), (2, 2), (0, 2)]);
    let b = polygon(&[(1, 1), (3, 1), (3, 3), (1, 3)]);
    assert_eq!(
      a.intersect(&b).unwrap(),
      polygon(&[(1, 1), (2, 1), (2, 2), (1, 2)])
    );
    let union = a.unite(&b).unwrap();
    assert_eq!(
      union,
      polygon(&[(0, 0), (2, 0), (2, 1), (3, 1), (3, 3), (1, 3), (1, 2), (0, 2)])
    );
    let difference = a.subtract(&b).unwrap();
    assert_eq!(
      difference,
      polygon(&[(0, 0), (2, 0), (2, 1), (1, 1), (1, 2), (0, 2)])
    );
  }

  #[test]
  fn union_of_nested_squares_fills_the_ring() {
    let outer = polygon(&[(0, 0), (4, 0), (4, 4), (0, 4)]);
    let inner = polygon(&[(1, 1), (3, 1), (3, 3), (1, 3)]);
    assert_eq!(outer.unite(&inner).unwrap(), outer);
    assert_eq!(outer.intersect(&inner).unwrap(), inner);
  }

  #[test]
  fn difference_cuts_a_hole() {
    let outer = polygon(&[(0, 0), (4, 0), (4, 4), (0, 4)]);
    let inner = polygon(&[(1, 1), (3, 1), (3, 3), (1, 3)]);
    let ring = outer.subtract(&inner).unwrap();
    assert_eq!(ring.len(), 1);
    let result = &ring.polygons()[0];
    assert_eq!(result.exterior(), outer.polygons()[0].exterior());
    assert_eq!(result.holes().len(), 1);
    assert!(!result.holes()[0].is_counter_clockwise());
    assert_eq!(ring.area_2x(), outer.area_2x() - inner.area_2x());
  }

  #[test]
  fn empty_operand_identities() {
    let a = polygon(&[(0, 0), (2, 0), (2, 2), (0, 2)]);
    let none = Multipolygon::<BigRational>::empty();
    assert_eq!(a.intersect(&none).unwrap(), none);
    assert_eq!(a.unite(&none).unwrap(), a);
    assert_eq!(none.unite(&a).unwrap(), a);
    assert_eq!(a.subtract(&none).unwrap(), a);
    assert_eq!(none.subtract(&a).unwrap(), none);
    assert_eq!(a.symmetric_subtract(&none).unwrap(), a);
  }

  #[test]
  fn self_intersecting_input_is_rejected() {
    let bowtie = Contour::new(vec![pt(0, 0), pt(2, 2), pt(2, 0), pt(0, 2)]);
    assert_eq!(bowtie.err(), Some(Error::SelfIntersections));
  }

  #[test]
  fn degenerate_segment_is_rejected() {
    let ms = Multisegment::new(vec![Segment::new(pt(1, 1), pt(1, 1))]);
    assert_eq!(
      ms.intersect(&multisegment(&[((0, 0), (1, 0))])).err(),
      Some(Error::DegenerateSegment)
    );
  }

  #[test]
  fn operation_apply_matches_methods() {
    let a = polygon(&[(0, 0), (2, 0), (2, 2), (0, 2)]);
    let b = polygon(&[(1, 1), (3, 1), (3, 3), (1, 3)]);
    assert_eq!(
      Operation::Intersection.apply(&a, &b).unwrap(),
      a.intersect(&b).unwrap()
    );
    assert_eq!(Operation::Union.apply(&a, &b).unwrap(), a.unite(&b).unwrap());
  }
}
