//! Corrections deferred to the next tick.
//!
//! Some furnace writes are ignored or unsafe while the host is still
//! delivering the notification that triggered them. Those writes are queued
//! here as commands and drained on the following tick. Each action carries
//! the generational handle of the furnace it was scheduled for and
//! re-resolves it when it runs; nothing holds a direct reference across
//! ticks. A furnace replaced at the same location gets a new handle, so
//! actions aimed at its predecessor are dropped.

use crate::id::{FurnaceId, Location};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A correction scheduled for a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Pause the furnace after a smelt used up its work.
    Pause { id: FurnaceId, at: Location },
    /// Rewrite the cook-cycle length after a smelt.
    CorrectCookTime {
        id: FurnaceId,
        at: Location,
        cook_level: i32,
    },
    /// Re-check a furnace whose inventory changed.
    ContentsChanged {
        id: FurnaceId,
        at: Location,
        cook_level: i32,
    },
}

impl DeferredAction {
    /// The furnace this action was scheduled for.
    pub fn furnace(&self) -> FurnaceId {
        match *self {
            DeferredAction::Pause { id, .. }
            | DeferredAction::CorrectCookTime { id, .. }
            | DeferredAction::ContentsChanged { id, .. } => id,
        }
    }

    /// Where that furnace's block stands.
    pub fn location(&self) -> Location {
        match *self {
            DeferredAction::Pause { at, .. }
            | DeferredAction::CorrectCookTime { at, .. }
            | DeferredAction::ContentsChanged { at, .. } => at,
        }
    }
}

// ---------------------------------------------------------------------------
// DeferredQueue
// ---------------------------------------------------------------------------

/// FIFO of actions tagged with the tick they were scheduled in.
///
/// Supports optional history tracking for debugging.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    /// Actions waiting to run: (scheduled tick, action).
    pending: Vec<(u64, DeferredAction)>,
    /// Actions already drained: (tick drained, action).
    history: Vec<(u64, DeferredAction)>,
    /// Maximum history entries to retain. 0 = no history.
    max_history: usize,
}

impl DeferredQueue {
    /// Create a new empty queue with no history tracking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new queue that retains up to `max_history` drained entries.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            max_history,
            ..Self::default()
        }
    }

    /// Schedule an action during tick `tick`.
    pub fn schedule(&mut self, tick: u64, action: DeferredAction) {
        self.pending.push((tick, action));
    }

    /// Remove and return every action scheduled strictly before `tick`, in
    /// scheduling order. Actions scheduled during `tick` stay queued.
    pub fn drain_due(&mut self, tick: u64) -> Vec<DeferredAction> {
        let (due, later): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|(scheduled, _)| *scheduled < tick);
        self.pending = later;

        let actions: Vec<DeferredAction> = due.into_iter().map(|(_, a)| a).collect();

        if self.max_history > 0 {
            self.history.extend(actions.iter().map(|a| (tick, *a)));
            let excess = self.history.len().saturating_sub(self.max_history);
            if excess > 0 {
                self.history.drain(..excess);
            }
        }

        actions
    }

    /// Number of actions waiting to run.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drained actions as (tick drained, action) pairs.
    pub fn history(&self) -> &[(u64, DeferredAction)] {
        &self.history
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::WorldId;
    use slotmap::SlotMap;

    fn at(x: i32) -> Location {
        Location::new(WorldId(0), x, 64, 0)
    }

    /// Distinct live handles, one per location.
    fn ids(n: usize) -> Vec<FurnaceId> {
        let mut arena: SlotMap<FurnaceId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    fn pause(id: FurnaceId, x: i32) -> DeferredAction {
        DeferredAction::Pause { id, at: at(x) }
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = DeferredQueue::new();
        assert_eq!(queue.pending_count(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn actions_wait_for_next_tick() {
        let id = ids(1)[0];
        let mut queue = DeferredQueue::new();
        queue.schedule(5, pause(id, 0));
        assert!(queue.drain_due(5).is_empty());
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.drain_due(6).len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_preserves_order() {
        let ids = ids(2);
        let mut queue = DeferredQueue::new();
        queue.schedule(0, pause(ids[0], 0));
        queue.schedule(
            0,
            DeferredAction::CorrectCookTime {
                id: ids[0],
                at: at(0),
                cook_level: 2,
            },
        );
        queue.schedule(
            0,
            DeferredAction::ContentsChanged {
                id: ids[1],
                at: at(1),
                cook_level: 0,
            },
        );

        let drained = queue.drain_due(1);
        assert_eq!(drained.len(), 3);
        assert!(matches!(drained[0], DeferredAction::Pause { .. }));
        assert!(matches!(drained[1], DeferredAction::CorrectCookTime { .. }));
        assert!(matches!(drained[2], DeferredAction::ContentsChanged { .. }));
        assert_eq!(drained[2].furnace(), ids[1]);
        assert_eq!(drained[2].location(), at(1));
    }

    #[test]
    fn later_actions_stay_queued_in_order() {
        let ids = ids(3);
        let mut queue = DeferredQueue::new();
        queue.schedule(1, pause(ids[0], 0));
        queue.schedule(2, pause(ids[1], 1));
        queue.schedule(2, pause(ids[2], 2));

        assert_eq!(queue.drain_due(2), vec![pause(ids[0], 0)]);
        assert_eq!(
            queue.drain_due(3),
            vec![pause(ids[1], 1), pause(ids[2], 2)]
        );
    }

    #[test]
    fn history_tracking() {
        let ids = ids(2);
        let mut queue = DeferredQueue::with_max_history(100);
        queue.schedule(41, pause(ids[0], 0));
        queue.schedule(41, pause(ids[1], 1));
        let _ = queue.drain_due(42);

        let history = queue.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], (42, pause(ids[0], 0)));
        assert_eq!(history[1].0, 42);
    }

    #[test]
    fn history_trimming() {
        let ids = ids(5);
        let mut queue = DeferredQueue::with_max_history(3);
        for x in 0..3 {
            queue.schedule(0, pause(ids[x], x as i32));
        }
        let _ = queue.drain_due(1);
        for x in 3..5 {
            queue.schedule(1, pause(ids[x], x as i32));
        }
        let _ = queue.drain_due(2);

        assert_eq!(queue.history().len(), 3);
        assert_eq!(queue.history()[2].1, pause(ids[4], 4));
    }

    #[test]
    fn no_history_by_default() {
        let mut queue = DeferredQueue::new();
        queue.schedule(0, pause(ids(1)[0], 0));
        let _ = queue.drain_due(1);
        assert!(queue.history().is_empty());
    }
}
