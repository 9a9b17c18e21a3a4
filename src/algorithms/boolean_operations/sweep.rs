//! The plane sweep: the status structure of active segments, eager pairwise
//! subdivision of neighbors, and the in/out labelling that drives edge
//! selection.
//!
//! The status comparator orders two active segments by which one lies below
//! the other at their shared abscissa. Because neighbors are subdivided as
//! soon as they are discovered to intersect, active segments never cross in
//! their interiors, and the relative order of two active segments is fixed
//! for their shared lifetime. The comparator is therefore a pure function of
//! the two segments and a stateless `BTreeSet` can hold the status.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use log::trace;

use super::event::{
  compare_events, EdgeKind, EventArena, EventId, EventQueue, ResultTransition,
};
use super::Operation;
use crate::data::{Point, Segment};
use crate::predicates::{orientation, segments_intersection, Orientation, SegmentIntersection};
use crate::{BoolScalar, Error};

/// Operand family: multisegments or multipolygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperandKind {
  Linear,
  Areal,
}

#[derive(Debug, Clone)]
struct StatusKey<T> {
  point: Point<T>,
  other: Point<T>,
  from_left: bool,
  id: EventId,
}

impl<T: BoolScalar> StatusKey<T> {
  fn below(&self, pt: &Point<T>) -> bool {
    orientation(&self.point, &self.other, pt) == Orientation::CounterClockWise
  }

  // Processing order of the two start events, on snapshot data.
  fn event_order(&self, b: &StatusKey<T>) -> Ordering {
    self
      .point
      .cmp(&b.point)
      .then_with(|| match orientation(&self.point, &self.other, &b.other) {
        Orientation::CounterClockWise => Ordering::Less,
        Orientation::ClockWise => Ordering::Greater,
        Orientation::CoLinear => Ordering::Equal,
      })
      .then_with(|| match (self.from_left, b.from_left) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
      })
      .then_with(|| self.other.cmp(&b.other))
      .then_with(|| self.id.cmp(&b.id))
  }
}

// The Martinez status order: lower segment first.
impl<T: BoolScalar> Ord for StatusKey<T> {
  fn cmp(&self, b: &StatusKey<T>) -> Ordering {
    if self.id == b.id {
      return Ordering::Equal;
    }
    let b_start_side = orientation(&self.point, &self.other, &b.point);
    let b_end_side = orientation(&self.point, &self.other, &b.other);
    if b_start_side != Orientation::CoLinear || b_end_side != Orientation::CoLinear {
      // Segments on distinct lines.
      if self.point == b.point {
        // Shared start: sort by where the other segment ends.
        return if self.below(&b.other) {
          Ordering::Less
        } else {
          Ordering::Greater
        };
      }
      if self.point.x == b.point.x {
        return self.point.y.cmp(&b.point.y);
      }
      if self.event_order(b) == Ordering::Less {
        return if self.below(&b.point) {
          Ordering::Less
        } else {
          Ordering::Greater
        };
      }
      return if b.below(&self.point) {
        Ordering::Greater
      } else {
        Ordering::Less
      };
    }
    // Collinear segments: any consistent order works.
    if self.point == b.point {
      self.id.cmp(&b.id)
    } else {
      self.event_order(b)
    }
  }
}

impl<T: BoolScalar> PartialOrd for StatusKey<T> {
  fn partial_cmp(&self, other: &StatusKey<T>) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<T: BoolScalar> PartialEq for StatusKey<T> {
  fn eq(&self, other: &StatusKey<T>) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl<T: BoolScalar> Eq for StatusKey<T> {}

/// The sweep-line status: active segments ordered bottom to top.
#[derive(Debug)]
pub(crate) struct SweepLine<T> {
  set: BTreeSet<StatusKey<T>>,
  keys: HashMap<EventId, StatusKey<T>>,
}

impl<T: BoolScalar> SweepLine<T> {
  pub fn new() -> SweepLine<T> {
    SweepLine {
      set: BTreeSet::new(),
      keys: HashMap::new(),
    }
  }

  pub fn insert(&mut self, arena: &EventArena<T>, id: EventId) {
    let event = &arena[id];
    let key = StatusKey {
      point: event.point.clone(),
      other: arena[event.other].point.clone(),
      from_left: event.from_left,
      id,
    };
    self.keys.insert(id, key.clone());
    self.set.insert(key);
  }

  pub fn remove(&mut self, id: EventId) {
    if let Some(key) = self.keys.remove(&id) {
      self.set.remove(&key);
    }
  }

  pub fn contains(&self, id: EventId) -> bool {
    self.keys.contains_key(&id)
  }

  pub fn prev(&self, id: EventId) -> Option<EventId> {
    let key = self.keys.get(&id)?;
    self
      .set
      .range((Bound::Unbounded, Bound::Excluded(key)))
      .next_back()
      .map(|k| k.id)
  }

  pub fn next(&self, id: EventId) -> Option<EventId> {
    let key = self.keys.get(&id)?;
    self
      .set
      .range((Bound::Excluded(key), Bound::Unbounded))
      .next()
      .map(|k| k.id)
  }
}

/// Split the segment owned by `left_id` at interior point `p`.
///
/// The original pair keeps the outer endpoints; two fresh events around `p`
/// stitch the halves together by reassigning the `other` links.
pub(crate) fn divide_segment<T: BoolScalar>(
  arena: &mut EventArena<T>,
  queue: &mut EventQueue<T>,
  left_id: EventId,
  p: Point<T>,
) {
  let right_id = arena[left_id].other;
  let from_left = arena[left_id].from_left;
  let new_right = arena.alloc(p.clone(), left_id, false, from_left);
  let new_left = arena.alloc(p, right_id, true, from_left);
  arena[left_id].other = new_right;
  arena[right_id].other = new_left;
  queue.push(arena, new_left);
  queue.push(arena, new_right);
}

/// Test two active neighbors, subdividing on intersection. Returns `true`
/// when a left-coincident overlap was classified, which invalidates the
/// labels computed so far for the pair.
pub(crate) fn possible_intersection<T: BoolScalar>(
  arena: &mut EventArena<T>,
  queue: &mut EventQueue<T>,
  kind: OperandKind,
  e1: EventId,
  e2: EventId,
) -> Result<bool, Error> {
  let o1 = arena[e1].other;
  let o2 = arena[e2].other;
  let s1 = Segment::new(arena[e1].point.clone(), arena[o1].point.clone());
  let s2 = Segment::new(arena[e2].point.clone(), arena[o2].point.clone());
  let cross_operand = arena[e1].from_left != arena[e2].from_left;

  match segments_intersection(&s1, &s2) {
    None => Ok(false),
    Some(SegmentIntersection::Point(p)) => {
      if arena[e1].point != p && arena[o1].point != p {
        divide_segment(arena, queue, e1, p.clone());
      }
      if arena[e2].point != p && arena[o2].point != p {
        divide_segment(arena, queue, e2, p);
      }
      Ok(false)
    }
    Some(SegmentIntersection::Overlap(_)) => {
      if !cross_operand && kind == OperandKind::Areal {
        return Err(Error::OverlappingEdges);
      }
      let left_coincide = arena[e1].point == arena[e2].point;
      let right_coincide = arena[o1].point == arena[o2].point;

      if left_coincide {
        // The shared piece starts here; keep e1 as the canonical carrier.
        arena[e2].edge_kind = EdgeKind::NonContributing;
        if kind == OperandKind::Areal {
          arena[e1].edge_kind = if arena[e1].in_out == arena[e2].in_out {
            EdgeKind::SameTransition
          } else {
            EdgeKind::DifferentTransition
          };
        }
        if !right_coincide {
          // Trim the longer segment down to the shared piece.
          let (short_right, long_right) = if compare_events(arena, o1, o2) == Ordering::Less {
            (o1, o2)
          } else {
            (o2, o1)
          };
          let split_at = arena[short_right].point.clone();
          let long_left = arena[long_right].other;
          divide_segment(arena, queue, long_left, split_at);
        }
        return Ok(true);
      }

      let (first_left, second_left) = if compare_events(arena, e1, e2) == Ordering::Less {
        (e1, e2)
      } else {
        (e2, e1)
      };
      if right_coincide {
        // Shared right endpoint: cut the earlier segment at the later start.
        let split_at = arena[second_left].point.clone();
        divide_segment(arena, queue, first_left, split_at);
        return Ok(false);
      }

      let (first_right, second_right) = if compare_events(arena, o1, o2) == Ordering::Less {
        (o1, o2)
      } else {
        (o2, o1)
      };
      if arena[first_left].other == second_right {
        // One segment contains the other: two cuts on the outer segment.
        let inner_start = arena[second_left].point.clone();
        let inner_end = arena[first_right].point.clone();
        divide_segment(arena, queue, first_left, inner_start);
        let outer_tail = arena[second_right].other;
        divide_segment(arena, queue, outer_tail, inner_end);
      } else {
        // Staggered overlap: one cut on each segment.
        let second_start = arena[second_left].point.clone();
        let first_end = arena[first_right].point.clone();
        divide_segment(arena, queue, first_left, second_start);
        divide_segment(arena, queue, second_left, first_end);
      }
      Ok(false)
    }
  }
}

/// In/out labels for a freshly inserted start event, from its predecessor.
pub(crate) fn compute_fields<T: BoolScalar>(
  arena: &mut EventArena<T>,
  id: EventId,
  prev: Option<EventId>,
  operation: Operation,
) {
  match prev {
    None => {
      // Nothing below: above this edge its own operand starts, the other
      // operand is absent.
      arena[id].in_out = false;
      arena[id].other_in_out = true;
      arena[id].prev_in_result = None;
    }
    Some(p) => {
      let (in_out, other_in_out) = if arena[id].from_left == arena[p].from_left {
        (!arena[p].in_out, arena[p].other_in_out)
      } else {
        let transferred = if arena.is_vertical(p) {
          !arena[p].in_out
        } else {
          arena[p].in_out
        };
        (!arena[p].other_in_out, transferred)
      };
      arena[id].in_out = in_out;
      arena[id].other_in_out = other_in_out;
      arena[id].prev_in_result = if !arena[p].in_result || arena.is_vertical(p) {
        arena[p].prev_in_result
      } else {
        Some(p)
      };
    }
  }
  let keep = in_result(arena, id, operation);
  arena[id].in_result = keep;
  arena[id].result_transition = if keep {
    result_transition(arena, id, operation)
  } else {
    ResultTransition::None
  };
}

/// The operation selector for areal sweeps.
fn in_result<T: BoolScalar>(arena: &EventArena<T>, id: EventId, operation: Operation) -> bool {
  let event = &arena[id];
  match event.edge_kind {
    EdgeKind::Normal => match operation {
      Operation::Intersection => !event.other_in_out,
      Operation::Union => event.other_in_out,
      Operation::Difference => {
        (event.from_left && event.other_in_out) || (!event.from_left && !event.other_in_out)
      }
      Operation::SymmetricDifference => true,
    },
    EdgeKind::SameTransition => {
      operation == Operation::Intersection || operation == Operation::Union
    }
    EdgeKind::DifferentTransition => operation == Operation::Difference,
    EdgeKind::NonContributing => false,
  }
}

fn result_transition<T: BoolScalar>(
  arena: &EventArena<T>,
  id: EventId,
  operation: Operation,
) -> ResultTransition {
  let event = &arena[id];
  let this_in = !event.in_out;
  let that_in = !event.other_in_out;
  let is_in = match operation {
    Operation::Intersection => this_in && that_in,
    Operation::Union => this_in || that_in,
    Operation::SymmetricDifference => this_in != that_in,
    Operation::Difference => {
      if event.from_left {
        this_in && !that_in
      } else {
        that_in && !this_in
      }
    }
  };
  if is_in {
    ResultTransition::OutIn
  } else {
    ResultTransition::InOut
  }
}

/// Presence-bit selection for linear sweeps, applied after the sweep.
///
/// Subdivision leaves coincident pieces as byte-identical segments, so the
/// pieces sharing one geometry form an equivalence class and the class
/// membership is the union over its members. Duplicate survivors are folded
/// away by the reconstructor.
pub(crate) fn select_linear<T: BoolScalar>(arena: &mut EventArena<T>, operation: Operation) {
  let mut classes: BTreeMap<(Point<T>, Point<T>), (bool, bool)> = BTreeMap::new();
  for id in 0..arena.len() {
    if !arena[id].is_start {
      continue;
    }
    let key = (arena[id].point.clone(), arena[arena[id].other].point.clone());
    let members = classes.entry(key).or_insert((false, false));
    if arena[id].from_left {
      members.0 = true;
    } else {
      members.1 = true;
    }
  }
  for id in 0..arena.len() {
    if !arena[id].is_start {
      continue;
    }
    let key = (arena[id].point.clone(), arena[arena[id].other].point.clone());
    let (in_a, in_b) = classes[&key];
    arena[id].in_result = match operation {
      Operation::Intersection => in_a && in_b,
      Operation::Union => true,
      Operation::Difference => in_a && !in_b,
      Operation::SymmetricDifference => in_a != in_b,
    };
  }
}

pub(crate) struct SweepOutcome<T> {
  pub arena: EventArena<T>,
  /// All event ids in processing order.
  pub processed: Vec<EventId>,
  /// Cross-operand point contacts.
  pub touches: BTreeSet<Point<T>>,
}

/// Run the sweep to completion: every pairwise intersection subdivided,
/// every piece labelled (areal sweeps), coincident pieces classified.
pub(crate) fn subdivide<T: BoolScalar>(
  mut arena: EventArena<T>,
  mut queue: EventQueue<T>,
  kind: OperandKind,
  operation: Operation,
) -> Result<SweepOutcome<T>, Error> {
  let mut sweep_line = SweepLine::new();
  let mut processed = Vec::with_capacity(arena.len());

  while let Some(id) = queue.pop() {
    processed.push(id);
    if arena[id].is_start {
      sweep_line.insert(&arena, id);
      let prev = sweep_line.prev(id);
      let next = sweep_line.next(id);
      if kind == OperandKind::Areal {
        compute_fields(&mut arena, id, prev, operation);
      }
      if let Some(nx) = next {
        if possible_intersection(&mut arena, &mut queue, kind, id, nx)?
          && kind == OperandKind::Areal
        {
          compute_fields(&mut arena, id, prev, operation);
          compute_fields(&mut arena, nx, Some(id), operation);
        }
      }
      if let Some(pv) = prev {
        if possible_intersection(&mut arena, &mut queue, kind, pv, id)?
          && kind == OperandKind::Areal
        {
          let prev_prev = sweep_line.prev(pv);
          compute_fields(&mut arena, pv, prev_prev, operation);
          compute_fields(&mut arena, id, Some(pv), operation);
        }
      }
    } else {
      let left = arena[id].other;
      if sweep_line.contains(left) {
        let prev = sweep_line.prev(left);
        let next = sweep_line.next(left);
        sweep_line.remove(left);
        if let (Some(pv), Some(nx)) = (prev, next) {
          possible_intersection(&mut arena, &mut queue, kind, pv, nx)?;
        }
      }
    }
  }

  // After subdivision every cross-operand contact is a point where both
  // operands own an event: crossings and T-junctions have been split there,
  // and endpoint touches had events there from the start. This also covers
  // touches between pieces that are never simultaneously active, e.g. one
  // segment ending exactly where another begins.
  let mut left_points = BTreeSet::new();
  let mut right_points = BTreeSet::new();
  for id in 0..arena.len() {
    if arena[id].from_left {
      left_points.insert(arena[id].point.clone());
    } else {
      right_points.insert(arena[id].point.clone());
    }
  }
  let touches: BTreeSet<Point<T>> = left_points.intersection(&right_points).cloned().collect();

  trace!(
    "sweep done: {} events processed, {} touch points",
    processed.len(),
    touches.len()
  );
  Ok(SweepOutcome {
    arena,
    processed,
    touches,
  })
}
