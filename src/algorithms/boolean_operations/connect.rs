//! Output reconstruction.
//!
//! Areal results are rebuilt by walking the selected edges, ordered by the
//! event comparator, into closed contours; the parent of each contour (and
//! with it the shell/hole role) falls out of the nearest in-result edge
//! below its starting event. Linear results are the selected pieces, merged
//! into maximal segments and deduplicated.

use std::collections::HashMap;
use std::collections::BTreeMap;

use log::trace;

use super::event::{compare_events, Event, EventArena, EventId, ResultTransition};
use crate::data::{Contour, Multipolygon, Multisegment, Point, Polygon, Segment};
use crate::predicates::{orientation, Orientation};
use crate::BoolScalar;

/// A walked contour before ring canonicalization.
#[derive(Debug)]
pub(crate) struct RawContour<T> {
  points: Vec<Point<T>>,
  hole_ids: Vec<usize>,
  hole_of: Option<usize>,
  depth: usize,
}

impl<T> RawContour<T> {
  fn new(hole_of: Option<usize>, depth: usize) -> RawContour<T> {
    RawContour {
      points: Vec::new(),
      hole_ids: Vec::new(),
      hole_of,
      depth,
    }
  }

  fn is_exterior(&self) -> bool {
    self.hole_of.is_none()
  }
}

// Selected events, both endpoints of every kept segment, in event order.
fn order_events<T: BoolScalar>(arena: &EventArena<T>, processed: &[EventId]) -> Vec<EventId> {
  let mut result: Vec<EventId> = processed
    .iter()
    .copied()
    .filter(|&id| {
      let event = &arena[id];
      (event.is_start && event.in_result) || (!event.is_start && arena[event.other].in_result)
    })
    .collect();
  result.sort_by(|&a, &b| compare_events(arena, a, b));
  result
}

// The next unconsumed event at the same point, preferring the slots above;
// falls back to scanning below, stopping at the walk's origin.
fn next_pos<T: BoolScalar>(
  pos: usize,
  arena: &EventArena<T>,
  result_events: &[EventId],
  done: &[bool],
  origin: usize,
) -> usize {
  let here = arena[result_events[pos]].point.clone();
  let len = result_events.len();
  let mut up = pos + 1;
  while up < len && arena[result_events[up]].point == here {
    if !done[up] {
      return up;
    }
    up += 1;
  }
  let mut down = pos as isize - 1;
  while down > origin as isize && done[down as usize] {
    down -= 1;
  }
  if down < origin as isize {
    origin
  } else {
    down as usize
  }
}

// The parent-contour cases: the new contour is a hole of the contour below,
// a sibling hole of it, or an exterior contour.
fn initialize_from_context<T: BoolScalar>(
  arena: &EventArena<T>,
  contour_of: &HashMap<EventId, usize>,
  contours: &mut Vec<RawContour<T>>,
  event: EventId,
  new_id: usize,
) -> RawContour<T> {
  let prev = match arena[event].prev_in_result {
    Some(prev) => prev,
    None => return RawContour::new(None, 0),
  };
  let lower_id = match contour_of.get(&prev) {
    Some(&id) => id,
    None => return RawContour::new(None, 0),
  };
  if arena[prev].result_transition == ResultTransition::OutIn {
    // The new contour starts inside the result: it bounds a hole, attached
    // either to the contour below or to that contour's own parent.
    let lower_hole_of = contours[lower_id].hole_of;
    let lower_depth = contours[lower_id].depth;
    match lower_hole_of {
      Some(parent) => {
        contours[parent].hole_ids.push(new_id);
        RawContour::new(Some(parent), lower_depth)
      }
      None => {
        contours[lower_id].hole_ids.push(new_id);
        RawContour::new(Some(lower_id), lower_depth + 1)
      }
    }
  } else {
    RawContour::new(None, contours[lower_id].depth)
  }
}

/// Walk every selected edge exactly once, emitting closed contours.
pub(crate) fn connect_edges<T: BoolScalar>(
  arena: &EventArena<T>,
  processed: &[EventId],
) -> Vec<RawContour<T>> {
  let result_events = order_events(arena, processed);

  let mut pos_of: HashMap<EventId, usize> = HashMap::new();
  for (pos, &id) in result_events.iter().enumerate() {
    pos_of.insert(id, pos);
  }
  // Cross-link the two slots of each kept segment.
  let mut other_pos: Vec<usize> = (0..result_events.len()).collect();
  for (pos, &id) in result_events.iter().enumerate() {
    if arena[id].is_start {
      if let Some(&partner) = pos_of.get(&arena[id].other) {
        other_pos[pos] = partner;
        other_pos[partner] = pos;
      }
    }
  }

  let mut contours: Vec<RawContour<T>> = Vec::new();
  let mut contour_of: HashMap<EventId, usize> = HashMap::new();
  let mut done = vec![false; result_events.len()];

  for origin in 0..result_events.len() {
    if done[origin] {
      continue;
    }
    let contour_id = contours.len();
    let mut contour =
      initialize_from_context(arena, &contour_of, &mut contours, result_events[origin], contour_id);
    let mut pos = origin;
    contour.points.push(arena[result_events[origin]].point.clone());
    loop {
      done[pos] = true;
      contour_of.insert(result_events[pos], contour_id);
      pos = other_pos[pos];
      done[pos] = true;
      contour_of.insert(result_events[pos], contour_id);
      contour.points.push(arena[result_events[pos]].point.clone());
      pos = next_pos(pos, arena, &result_events, &done, origin);
      if pos == origin {
        break;
      }
    }
    if contour.points.len() > 1 && contour.points.last() == contour.points.first() {
      contour.points.pop();
    }
    contours.push(contour);
  }
  trace!("connected {} contours", contours.len());
  contours
}

/// Canonical multipolygon from walked contours: shells counter-clockwise,
/// holes clockwise, deterministic ordering throughout.
pub(crate) fn polygons_from_contours<T: BoolScalar>(contours: Vec<RawContour<T>>) -> Multipolygon<T> {
  let mut polygons = Vec::new();
  for contour in &contours {
    if !contour.is_exterior() {
      continue;
    }
    let shell = match Contour::new_unchecked(contour.points.clone()).canonicalized(true) {
      Some(ring) => ring,
      None => continue,
    };
    let mut holes = Vec::new();
    for &hole_id in &contour.hole_ids {
      if let Some(ring) = Contour::new_unchecked(contours[hole_id].points.clone()).canonicalized(false)
      {
        holes.push(ring);
      }
    }
    holes.sort_by(|a, b| a.points()[0].cmp(&b.points()[0]));
    polygons.push(Polygon::new_unchecked(shell, holes));
  }
  polygons.sort_by(|a, b| a.exterior().points()[0].cmp(&b.exterior().points()[0]));
  Multipolygon::new(polygons)
}

/// Pieces selected by a predicate, as canonical segments.
pub(crate) fn pieces_where<T, F>(arena: &EventArena<T>, pred: F) -> Vec<Segment<T>>
where
  T: BoolScalar,
  F: Fn(&Event<T>) -> bool,
{
  let mut out = Vec::new();
  for id in 0..arena.len() {
    if arena[id].is_start && pred(&arena[id]) {
      out.push(Segment::new(
        arena[id].point.clone(),
        arena[arena[id].other].point.clone(),
      ));
    }
  }
  out
}

/// Merge collinear pieces that meet at a point touching nothing else, then
/// deduplicate and order.
pub(crate) fn merge_pieces<T: BoolScalar>(mut pieces: Vec<Segment<T>>) -> Multisegment<T> {
  pieces.sort();
  pieces.dedup();

  let mut incidence: BTreeMap<Point<T>, usize> = BTreeMap::new();
  for piece in &pieces {
    *incidence.entry(piece.start().clone()).or_insert(0) += 1;
    *incidence.entry(piece.end().clone()).or_insert(0) += 1;
  }
  let mut by_start: BTreeMap<Point<T>, Vec<usize>> = BTreeMap::new();
  for (i, piece) in pieces.iter().enumerate() {
    by_start
      .entry(piece.start().clone())
      .or_insert_with(Vec::new)
      .push(i);
  }

  let mut used = vec![false; pieces.len()];
  let mut merged = Vec::new();
  for i in 0..pieces.len() {
    if used[i] {
      continue;
    }
    used[i] = true;
    let chain_start = pieces[i].start().clone();
    let mut chain_end = pieces[i].end().clone();
    loop {
      if incidence.get(&chain_end).copied() != Some(2) {
        break;
      }
      let successor = by_start
        .get(&chain_end)
        .and_then(|slots| slots.iter().copied().find(|&j| !used[j]));
      let j = match successor {
        Some(j) => j,
        None => break,
      };
      if orientation(&chain_start, &chain_end, pieces[j].end()) != Orientation::CoLinear {
        break;
      }
      used[j] = true;
      chain_end = pieces[j].end().clone();
    }
    merged.push(Segment::new(chain_start, chain_end));
  }
  Multisegment::new(merged).canonical()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seg(a: (i64, i64), b: (i64, i64)) -> Segment<i64> {
    Segment::new(Point::new(a.0, a.1), Point::new(b.0, b.1))
  }

  #[test]
  fn merges_collinear_chain() {
    let merged = merge_pieces(vec![seg((0, 0), (1, 0)), seg((1, 0), (3, 0))]);
    assert_eq!(merged.segments(), &[seg((0, 0), (3, 0))]);
  }

  #[test]
  fn keeps_corner_pieces_apart() {
    let merged = merge_pieces(vec![seg((0, 0), (1, 0)), seg((1, 0), (1, 1))]);
    assert_eq!(merged.segments(), &[seg((0, 0), (1, 0)), seg((1, 0), (1, 1))]);
  }

  #[test]
  fn junction_blocks_merging() {
    // Three collinear-pairwise pieces meeting at one point stay separate.
    let merged = merge_pieces(vec![
      seg((0, 0), (1, 0)),
      seg((1, 0), (2, 0)),
      seg((1, 0), (1, 2)),
    ]);
    assert_eq!(merged.len(), 3);
  }

  #[test]
  fn dedups_identical_pieces() {
    let merged = merge_pieces(vec![seg((0, 0), (2, 2)), seg((0, 0), (2, 2))]);
    assert_eq!(merged.segments(), &[seg((0, 0), (2, 2))]);
  }

  #[test]
  fn merges_interleaved_chains() {
    // Two separate collinear chains whose pieces interleave in sort order.
    let merged = merge_pieces(vec![
      seg((0, 0), (1, 0)),
      seg((0, 1), (1, 1)),
      seg((1, 0), (2, 0)),
      seg((1, 1), (2, 1)),
    ]);
    assert_eq!(merged.segments(), &[seg((0, 0), (2, 0)), seg((0, 1), (2, 1))]);
  }
}
