use num_traits::*;
use std::fmt;

pub mod algorithms;
pub mod data;
mod predicates;

pub use algorithms::boolean_operations::{BooleanOps, Operation};
pub use predicates::{
  orientation, point_in_polygon, segments_intersection, Orientation, PointLocation,
  SegmentIntersection,
};

/// Client errors for malformed operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// A contour has fewer than three vertices.
  InsufficientVertices,
  /// A contour boundary crosses or folds back onto itself.
  SelfIntersections,
  /// A segment whose endpoints coincide.
  DegenerateSegment,
  /// Two boundary edges of the same operand overlap.
  OverlappingEdges,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::InsufficientVertices => write!(f, "contour has fewer than three vertices"),
      Error::SelfIntersections => write!(f, "contour boundary intersects itself"),
      Error::DegenerateSegment => write!(f, "segment endpoints coincide"),
      Error::OverlappingEdges => write!(f, "overlapping edges within a single operand"),
    }
  }
}

impl std::error::Error for Error {}

/// Scalar requirements for the Boolean engine.
///
/// Every predicate is exact whenever the scalar's arithmetic is exact.
/// `num::BigRational` is the reference instantiation: orientation tests,
/// overlap detection and constructed crossing points are all exact with it.
/// Integer scalars keep the predicates exact but cannot represent crossing
/// points, so operations that subdivide segments require a rational scalar.
pub trait BoolScalar: Clone + fmt::Debug + Ord + Signed + Zero + One + NumOps<Self, Self> {}

impl<T> BoolScalar for T where T: Clone + fmt::Debug + Ord + Signed + Zero + One + NumOps<T, T> {}
