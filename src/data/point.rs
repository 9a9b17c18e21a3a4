use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;
use ordered_float::OrderedFloat;

/// An exact point in the plane.
///
/// Points are totally ordered lexicographically: by `x`, then by `y`. This is
/// the order the sweep advances in, so it is derived rather than hand-rolled.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Point<T> {
  pub x: T,
  pub y: T,
}

impl<T> Point<T> {
  pub const fn new(x: T, y: T) -> Point<T> {
    Point { x, y }
  }

  pub fn cast<U, F>(self, f: F) -> Point<U>
  where
    F: Fn(T) -> U,
  {
    Point::new(f(self.x), f(self.y))
  }

  /// Lossy conversion for consumers that hand coordinates to a renderer.
  pub fn to_float(&self) -> Point<OrderedFloat<f64>>
  where
    T: ToPrimitive,
  {
    Point::new(
      OrderedFloat(self.x.to_f64().unwrap_or(f64::NAN)),
      OrderedFloat(self.y.to_f64().unwrap_or(f64::NAN)),
    )
  }
}

impl<T> From<(T, T)> for Point<T> {
  fn from(point: (T, T)) -> Point<T> {
    Point::new(point.0, point.1)
  }
}

impl From<Point<i64>> for Point<BigRational> {
  fn from(point: Point<i64>) -> Point<BigRational> {
    point.cast(|v| BigRational::from_integer(BigInt::from(v)))
  }
}

impl From<(i64, i64)> for Point<BigRational> {
  fn from(point: (i64, i64)) -> Point<BigRational> {
    Point::from(Point::new(point.0, point.1))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexicographic_order() {
    let a = Point::new(0, 5);
    let b = Point::new(1, 0);
    let c = Point::new(1, 1);
    assert!(a < b);
    assert!(b < c);
  }

  #[test]
  fn rational_lift() {
    let p: Point<BigRational> = (3, -2).into();
    assert_eq!(p.to_float(), Point::new(OrderedFloat(3.0), OrderedFloat(-2.0)));
  }
}
