use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use rand::Rng;

use crate::data::{Point, Segment};
use crate::predicates::{orientation, point_in_contour, segments_intersection, Orientation};
use crate::predicates::{PointLocation, SegmentIntersection};
use crate::{BoolScalar, Error};

/// A closed ring of vertices. The ring is implicitly closed: the edge from the
/// last vertex back to the first is not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour<T> {
  points: Vec<Point<T>>,
}

impl<T: BoolScalar> Contour<T> {
  pub fn new(points: Vec<Point<T>>) -> Result<Contour<T>, Error> {
    let contour = Contour { points };
    contour.validate()?;
    Ok(contour)
  }

  pub(crate) fn new_unchecked(points: Vec<Point<T>>) -> Contour<T> {
    Contour { points }
  }

  pub fn points(&self) -> &[Point<T>] {
    &self.points
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Point<T>> {
    self.points.iter()
  }

  /// The boundary edges, in ring order.
  pub fn edges(&self) -> impl Iterator<Item = Segment<T>> + '_ {
    let pts = &self.points;
    (0..pts.len()).map(move |i| {
      let j = (i + 1) % pts.len();
      Segment::new(pts[i].clone(), pts[j].clone())
    })
  }

  /// Twice the signed area of the ring (shoelace, no division).
  /// Positive for counter-clockwise rings.
  pub fn signed_area_2x(&self) -> T {
    let n = self.points.len();
    let mut acc = T::zero();
    for i in 0..n {
      let p = &self.points[i];
      let q = &self.points[(i + 1) % n];
      acc = acc + (p.x.clone() * q.y.clone() - q.x.clone() * p.y.clone());
    }
    acc
  }

  pub fn is_counter_clockwise(&self) -> bool {
    self.signed_area_2x() > T::zero()
  }

  pub fn validate_weakly(&self) -> Result<(), Error> {
    let n = self.points.len();
    if n < 3 {
      return Err(Error::InsufficientVertices);
    }
    for i in 0..n {
      if self.points[i] == self.points[(i + 1) % n] {
        return Err(Error::DegenerateSegment);
      }
    }
    if self.signed_area_2x().is_zero() {
      return Err(Error::SelfIntersections);
    }
    Ok(())
  }

  /// Full simplicity check. Quadratic in the edge count; adjacent edges may
  /// share exactly their common vertex, everything else is a violation.
  pub fn validate(&self) -> Result<(), Error> {
    self.validate_weakly()?;
    let n = self.points.len();
    for i in 0..n {
      let ei = Segment::new(self.points[i].clone(), self.points[(i + 1) % n].clone());
      for j in (i + 1)..n {
        let adjacent = j == i + 1 || (i == 0 && j == n - 1);
        let ej = Segment::new(self.points[j].clone(), self.points[(j + 1) % n].clone());
        match segments_intersection(&ei, &ej) {
          None => {}
          Some(SegmentIntersection::Point(_)) if adjacent => {}
          Some(_) => return Err(Error::SelfIntersections),
        }
      }
    }
    Ok(())
  }

  /// Canonical ring: collinear and duplicate vertices removed, the requested
  /// winding, starting at the lexicographically smallest vertex. Returns
  /// `None` when nothing two-dimensional remains.
  pub(crate) fn canonicalized(self, counter_clockwise: bool) -> Option<Contour<T>> {
    let mut pts = self.points;
    loop {
      let n = pts.len();
      if n < 3 {
        return None;
      }
      let mut keep = Vec::with_capacity(n);
      for i in 0..n {
        let prev = &pts[(i + n - 1) % n];
        let next = &pts[(i + 1) % n];
        if orientation(prev, &pts[i], next) != Orientation::CoLinear {
          keep.push(pts[i].clone());
        }
      }
      let stable = keep.len() == n;
      pts = keep;
      if stable {
        break;
      }
    }
    let ring = Contour { points: pts };
    if ring.signed_area_2x().is_zero() {
      return None;
    }
    let ccw = ring.is_counter_clockwise();
    let mut pts = ring.points;
    if ccw != counter_clockwise {
      pts.reverse();
    }
    let min_idx = pts
      .iter()
      .enumerate()
      .min_by(|(_, a), (_, b)| a.cmp(b))
      .map(|(i, _)| i)
      .unwrap_or(0);
    pts.rotate_left(min_idx);
    Some(Contour { points: pts })
  }
}

/// A simple polygon: one exterior shell and zero or more holes.
///
/// Canonical polygons keep the shell counter-clockwise and holes clockwise;
/// input rings may come in either winding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon<T> {
  exterior: Contour<T>,
  holes: Vec<Contour<T>>,
}

impl<T: BoolScalar> Polygon<T> {
  pub fn new(exterior: Contour<T>, holes: Vec<Contour<T>>) -> Result<Polygon<T>, Error> {
    let polygon = Polygon { exterior, holes };
    polygon.validate()?;
    Ok(polygon)
  }

  pub(crate) fn new_unchecked(exterior: Contour<T>, holes: Vec<Contour<T>>) -> Polygon<T> {
    Polygon { exterior, holes }
  }

  pub fn exterior(&self) -> &Contour<T> {
    &self.exterior
  }

  pub fn holes(&self) -> &[Contour<T>] {
    &self.holes
  }

  pub fn contours(&self) -> impl Iterator<Item = &Contour<T>> {
    std::iter::once(&self.exterior).chain(self.holes.iter())
  }

  pub fn validate(&self) -> Result<(), Error> {
    for contour in self.contours() {
      contour.validate()?;
    }
    Ok(())
  }

  pub fn validate_weakly(&self) -> Result<(), Error> {
    for contour in self.contours() {
      contour.validate_weakly()?;
    }
    Ok(())
  }

  /// Twice the enclosed area: the shell's magnitude minus the holes'.
  pub fn area_2x(&self) -> T {
    let shell = self.exterior.signed_area_2x().abs();
    self
      .holes
      .iter()
      .fold(shell, |acc, hole| acc - hole.signed_area_2x().abs())
  }

  pub fn locate(&self, pt: &Point<T>) -> PointLocation {
    match point_in_contour(pt, &self.exterior) {
      PointLocation::Outside => PointLocation::Outside,
      PointLocation::OnBoundary => PointLocation::OnBoundary,
      PointLocation::Inside => {
        for hole in &self.holes {
          match point_in_contour(pt, hole) {
            PointLocation::Inside => return PointLocation::Outside,
            PointLocation::OnBoundary => return PointLocation::OnBoundary,
            PointLocation::Outside => {}
          }
        }
        PointLocation::Inside
      }
    }
  }

  pub(crate) fn canonicalized(self) -> Option<Polygon<T>> {
    let exterior = self.exterior.canonicalized(true)?;
    let mut holes: Vec<Contour<T>> = self
      .holes
      .into_iter()
      .filter_map(|hole| hole.canonicalized(false))
      .collect();
    holes.sort_by(|a, b| a.points()[0].cmp(&b.points()[0]));
    Some(Polygon { exterior, holes })
  }
}

impl Polygon<BigRational> {
  /// A random axis-aligned rectangle with integer corners in `[-span, span]`.
  pub fn random_rectangle<R>(span: i64, rng: &mut R) -> Polygon<BigRational>
  where
    R: Rng + ?Sized,
  {
    fn ordered_pair<R: Rng + ?Sized>(span: i64, rng: &mut R) -> (i64, i64) {
      loop {
        let a = rng.gen_range(-span..=span);
        let b = rng.gen_range(-span..=span);
        if a < b {
          return (a, b);
        }
      }
    }
    let rational = |v: i64| BigRational::from_integer(BigInt::from(v));
    let (x0, x1) = ordered_pair(span, rng);
    let (y0, y1) = ordered_pair(span, rng);
    let corners = vec![
      Point::new(rational(x0), rational(y0)),
      Point::new(rational(x1), rational(y0)),
      Point::new(rational(x1), rational(y1)),
      Point::new(rational(x0), rational(y1)),
    ];
    Polygon::new_unchecked(Contour::new_unchecked(corners), Vec::new())
  }
}

/// A collection of polygons with pairwise-disjoint interiors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multipolygon<T> {
  polygons: Vec<Polygon<T>>,
}

impl<T> Multipolygon<T> {
  pub fn new(polygons: Vec<Polygon<T>>) -> Multipolygon<T> {
    Multipolygon { polygons }
  }

  pub fn empty() -> Multipolygon<T> {
    Multipolygon { polygons: Vec::new() }
  }

  pub fn polygons(&self) -> &[Polygon<T>] {
    &self.polygons
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Polygon<T>> {
    self.polygons.iter()
  }

  pub fn len(&self) -> usize {
    self.polygons.len()
  }

  pub fn is_empty(&self) -> bool {
    self.polygons.is_empty()
  }
}

impl<T: BoolScalar> Multipolygon<T> {
  pub fn validate(&self) -> Result<(), Error> {
    for polygon in &self.polygons {
      polygon.validate()?;
    }
    Ok(())
  }

  pub fn validate_weakly(&self) -> Result<(), Error> {
    for polygon in &self.polygons {
      polygon.validate_weakly()?;
    }
    Ok(())
  }

  pub fn area_2x(&self) -> T {
    self
      .polygons
      .iter()
      .fold(T::zero(), |acc, p| acc + p.area_2x())
  }

  pub fn locate(&self, pt: &Point<T>) -> PointLocation {
    for polygon in &self.polygons {
      match polygon.locate(pt) {
        PointLocation::Outside => {}
        location => return location,
      }
    }
    PointLocation::Outside
  }

  /// Canonical form: every ring canonicalized, polygons ordered by the
  /// smallest vertex of their shells.
  pub fn canonical(self) -> Multipolygon<T> {
    let mut polygons: Vec<Polygon<T>> = self
      .polygons
      .into_iter()
      .filter_map(Polygon::canonicalized)
      .collect();
    polygons.sort_by(|a, b| a.exterior().points()[0].cmp(&b.exterior().points()[0]));
    Multipolygon { polygons }
  }
}

impl<T> From<Polygon<T>> for Multipolygon<T> {
  fn from(polygon: Polygon<T>) -> Multipolygon<T> {
    Multipolygon::new(vec![polygon])
  }
}

// A contour cast down to its boundary edges.
impl<T: BoolScalar> From<&Contour<T>> for crate::data::Multisegment<T> {
  fn from(contour: &Contour<T>) -> crate::data::Multisegment<T> {
    crate::data::Multisegment::new(contour.edges().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ring(pts: &[(i64, i64)]) -> Result<Contour<i64>, Error> {
    Contour::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect())
  }

  #[test]
  fn square_area() {
    let square = ring(&[(0, 0), (2, 0), (2, 2), (0, 2)]).unwrap();
    assert_eq!(square.signed_area_2x(), 8);
    assert!(square.is_counter_clockwise());
  }

  #[test]
  fn clockwise_ring_is_accepted() {
    let square = ring(&[(0, 0), (0, 2), (2, 2), (2, 0)]).unwrap();
    assert_eq!(square.signed_area_2x(), -8);
    assert!(!square.is_counter_clockwise());
  }

  #[test]
  fn too_few_vertices() {
    assert_eq!(ring(&[(0, 0), (1, 1)]).err(), Some(Error::InsufficientVertices));
  }

  #[test]
  fn repeated_vertex() {
    assert_eq!(
      ring(&[(0, 0), (1, 0), (1, 0), (1, 1)]).err(),
      Some(Error::DegenerateSegment)
    );
  }

  #[test]
  fn bowtie_rejected() {
    assert_eq!(
      ring(&[(0, 0), (2, 2), (2, 0), (0, 2)]).err(),
      Some(Error::SelfIntersections)
    );
  }

  #[test]
  fn spike_rejected() {
    assert_eq!(
      ring(&[(0, 0), (4, 0), (2, 0), (2, 2)]).err(),
      Some(Error::SelfIntersections)
    );
  }

  #[test]
  fn canonical_starts_at_min_vertex() {
    let square = ring(&[(2, 2), (0, 2), (0, 0), (2, 0)]).unwrap();
    let canonical = square.canonicalized(true).unwrap();
    assert_eq!(
      canonical.points(),
      &[
        Point::new(0, 0),
        Point::new(2, 0),
        Point::new(2, 2),
        Point::new(0, 2)
      ]
    );
  }

  #[test]
  fn canonical_drops_collinear_vertices() {
    let square = ring(&[(0, 0), (1, 0), (2, 0), (2, 2), (0, 2)]).unwrap();
    let canonical = square.canonicalized(true).unwrap();
    assert_eq!(canonical.len(), 4);
  }

  #[test]
  fn hole_subtracts_area() {
    let shell = ring(&[(0, 0), (4, 0), (4, 4), (0, 4)]).unwrap();
    let hole = ring(&[(1, 1), (1, 3), (3, 3), (3, 1)]).unwrap();
    let polygon = Polygon::new(shell, vec![hole]).unwrap();
    assert_eq!(polygon.area_2x(), 32 - 8);
  }

  #[test]
  fn locate_with_hole() {
    let shell = ring(&[(0, 0), (6, 0), (6, 6), (0, 6)]).unwrap();
    let hole = ring(&[(2, 2), (2, 4), (4, 4), (4, 2)]).unwrap();
    let polygon = Polygon::new(shell, vec![hole]).unwrap();
    assert_eq!(polygon.locate(&Point::new(1, 1)), PointLocation::Inside);
    assert_eq!(polygon.locate(&Point::new(3, 3)), PointLocation::Outside);
    assert_eq!(polygon.locate(&Point::new(2, 3)), PointLocation::OnBoundary);
    assert_eq!(polygon.locate(&Point::new(0, 3)), PointLocation::OnBoundary);
    assert_eq!(polygon.locate(&Point::new(0, 7)), PointLocation::Outside);
    assert_eq!(polygon.locate(&Point::new(7, 3)), PointLocation::Outside);
  }
}
