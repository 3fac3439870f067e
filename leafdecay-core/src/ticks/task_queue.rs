//! Priority queue of delayed tasks.

use std::collections::BinaryHeap;

use super::ScheduledTask;

/// Tasks ordered by trigger tick, FIFO within a tick.
///
/// The queue does no deduplication. Owners that need "at most one pending
/// task per key" keep their own membership set.
pub struct TaskQueue<T> {
    /// Pending tasks, earliest on top.
    queue: BinaryHeap<ScheduledTask<T>>,
    /// Counter for generating unique sub-tick order values.
    sub_tick_counter: u64,
}

impl<T> TaskQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            sub_tick_counter: 0,
        }
    }

    /// Schedules `task` to fire at `current_tick + delay`.
    ///
    /// Returns the trigger tick.
    pub fn schedule(&mut self, task: T, current_tick: u64, delay: u64) -> u64 {
        let trigger_tick = current_tick.saturating_add(delay);
        let sub_tick_order = self.sub_tick_counter;
        self.sub_tick_counter = self.sub_tick_counter.wrapping_add(1);
        self.queue
            .push(ScheduledTask::new(task, trigger_tick, sub_tick_order));
        trigger_tick
    }

    /// Removes and returns the next task due at or before `current_tick`.
    pub fn poll(&mut self, current_tick: u64) -> Option<ScheduledTask<T>> {
        if self.queue.peek()?.trigger_tick > current_tick {
            return None;
        }
        self.queue.pop()
    }

    /// Tick of the earliest pending task.
    #[must_use]
    pub fn next_trigger(&self) -> Option<u64> {
        self.queue.peek().map(|task| task.trigger_tick)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every pending task without running it.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
