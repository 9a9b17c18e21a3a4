//! Sweep events and the event queue.
//!
//! Every segment contributes a paired start/end event. Events live in an
//! arena and refer to each other by index, so subdividing a segment is a
//! matter of reassigning the `other` links and enqueueing the two events of
//! the freshly created interior point. The queue itself stores snapshots of
//! the data its ordering depends on: a snapshot stays valid across resplits
//! because a replacement partner is collinear with the original one, which
//! leaves every orientation-based comparison unchanged.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::ops::{Index, IndexMut};

use crate::data::Point;
use crate::predicates::{orientation, Orientation};
use crate::BoolScalar;

pub(crate) type EventId = usize;

/// Classification of coincident edges, decided during subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeKind {
  Normal,
  /// The suppressed twin of a coincident pair.
  NonContributing,
  /// Coincident pair whose operand interiors lie on the same side.
  SameTransition,
  /// Coincident pair whose operand interiors lie on opposite sides.
  DifferentTransition,
}

/// Whether crossing an in-result edge upward enters or leaves the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResultTransition {
  None,
  InOut,
  OutIn,
}

#[derive(Debug, Clone)]
pub(crate) struct Event<T> {
  pub point: Point<T>,
  /// The paired event at the segment's other endpoint.
  pub other: EventId,
  pub is_start: bool,
  /// Operand tag: `true` for the first operand.
  pub from_left: bool,
  /// Going up across this edge: does one leave this edge's own operand?
  pub in_out: bool,
  /// The same transition for the other operand's nearest edge below.
  pub other_in_out: bool,
  pub edge_kind: EdgeKind,
  pub in_result: bool,
  pub result_transition: ResultTransition,
  /// The nearest edge below that made it into the result.
  pub prev_in_result: Option<EventId>,
}

impl<T> Event<T> {
  fn new(point: Point<T>, other: EventId, is_start: bool, from_left: bool) -> Event<T> {
    Event {
      point,
      other,
      is_start,
      from_left,
      in_out: false,
      other_in_out: false,
      edge_kind: EdgeKind::Normal,
      in_result: false,
      result_transition: ResultTransition::None,
      prev_in_result: None,
    }
  }
}

#[derive(Debug)]
pub(crate) struct EventArena<T> {
  events: Vec<Event<T>>,
}

impl<T: BoolScalar> EventArena<T> {
  pub fn new() -> EventArena<T> {
    EventArena { events: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  /// Both events of a fresh segment; `a` must precede `b` in point order.
  pub fn alloc_pair(&mut self, a: Point<T>, b: Point<T>, from_left: bool) -> (EventId, EventId) {
    debug_assert!(a < b);
    let start = self.events.len();
    let end = start + 1;
    self.events.push(Event::new(a, end, true, from_left));
    self.events.push(Event::new(b, start, false, from_left));
    (start, end)
  }

  pub fn alloc(
    &mut self,
    point: Point<T>,
    other: EventId,
    is_start: bool,
    from_left: bool,
  ) -> EventId {
    let id = self.events.len();
    self.events.push(Event::new(point, other, is_start, from_left));
    id
  }

  pub fn is_vertical(&self, id: EventId) -> bool {
    self.events[id].point.x == self.events[self.events[id].other].point.x
  }
}

impl<T> Index<EventId> for EventArena<T> {
  type Output = Event<T>;
  fn index(&self, id: EventId) -> &Event<T> {
    &self.events[id]
  }
}

impl<T> IndexMut<EventId> for EventArena<T> {
  fn index_mut(&mut self, id: EventId) -> &mut Event<T> {
    &mut self.events[id]
  }
}

/// Processing order, ignoring ids: by point, then end-before-start, then the
/// event whose segment extends below first, then operand, then the partner
/// endpoint. Ties beyond this are broken by id at the call sites.
fn cmp_event_data<T: BoolScalar>(
  a_point: &Point<T>,
  a_other: &Point<T>,
  a_is_start: bool,
  a_from_left: bool,
  b_point: &Point<T>,
  b_other: &Point<T>,
  b_is_start: bool,
  b_from_left: bool,
) -> Ordering {
  a_point
    .cmp(b_point)
    .then_with(|| match (a_is_start, b_is_start) {
      (false, true) => Ordering::Less,
      (true, false) => Ordering::Greater,
      _ => Ordering::Equal,
    })
    .then_with(|| {
      let (s, e) = if a_is_start {
        (a_point, a_other)
      } else {
        (a_other, a_point)
      };
      match orientation(s, e, b_other) {
        Orientation::CounterClockWise => Ordering::Less,
        Orientation::ClockWise => Ordering::Greater,
        Orientation::CoLinear => Ordering::Equal,
      }
    })
    .then_with(|| match (a_from_left, b_from_left) {
      (true, false) => Ordering::Less,
      (false, true) => Ordering::Greater,
      _ => Ordering::Equal,
    })
    .then_with(|| a_other.cmp(b_other))
}

/// Processing order of two live events, reading the arena's current state.
pub(crate) fn compare_events<T: BoolScalar>(
  arena: &EventArena<T>,
  a: EventId,
  b: EventId,
) -> Ordering {
  if a == b {
    return Ordering::Equal;
  }
  let ea = &arena[a];
  let eb = &arena[b];
  cmp_event_data(
    &ea.point,
    &arena[ea.other].point,
    ea.is_start,
    ea.from_left,
    &eb.point,
    &arena[eb.other].point,
    eb.is_start,
    eb.from_left,
  )
  .then_with(|| a.cmp(&b))
}

#[derive(Debug, Clone)]
struct QueueKey<T> {
  point: Point<T>,
  other: Point<T>,
  is_start: bool,
  from_left: bool,
  id: EventId,
}

impl<T: BoolScalar> Ord for QueueKey<T> {
  fn cmp(&self, b: &QueueKey<T>) -> Ordering {
    if self.id == b.id {
      return Ordering::Equal;
    }
    cmp_event_data(
      &self.point,
      &self.other,
      self.is_start,
      self.from_left,
      &b.point,
      &b.other,
      b.is_start,
      b.from_left,
    )
    .then_with(|| self.id.cmp(&b.id))
  }
}

impl<T: BoolScalar> PartialOrd for QueueKey<T> {
  fn partial_cmp(&self, other: &QueueKey<T>) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<T: BoolScalar> PartialEq for QueueKey<T> {
  fn eq(&self, other: &QueueKey<T>) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl<T: BoolScalar> Eq for QueueKey<T> {}

/// Min-priority queue over events. `push` snapshots the current pairing.
#[derive(Debug)]
pub(crate) struct EventQueue<T> {
  heap: BinaryHeap<Reverse<QueueKey<T>>>,
}

impl<T: BoolScalar> EventQueue<T> {
  pub fn new() -> EventQueue<T> {
    EventQueue {
      heap: BinaryHeap::new(),
    }
  }

  pub fn push(&mut self, arena: &EventArena<T>, id: EventId) {
    let event = &arena[id];
    self.heap.push(Reverse(QueueKey {
      point: event.point.clone(),
      other: arena[event.other].point.clone(),
      is_start: event.is_start,
      from_left: event.from_left,
      id,
    }));
  }

  pub fn pop(&mut self) -> Option<EventId> {
    self.heap.pop().map(|Reverse(key)| key.id)
  }

  pub fn is_empty(&self) -> bool {
    self.heap.is_empty()
  }
}
