//! Scheduled task type.

use std::cmp::Ordering;

/// A task that fires at a given game tick.
#[derive(Debug, Clone)]
pub struct ScheduledTask<T> {
    /// What to run.
    pub task: T,
    /// The absolute game tick when this should fire.
    pub trigger_tick: u64,
    /// Insertion order, breaks ties between tasks due on the same tick.
    /// Lower values run first.
    pub sub_tick_order: u64,
}

impl<T> ScheduledTask<T> {
    /// Creates a new scheduled task.
    pub const fn new(task: T, trigger_tick: u64, sub_tick_order: u64) -> Self {
        Self {
            task,
            trigger_tick,
            sub_tick_order,
        }
    }
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trigger_tick == other.trigger_tick && self.sub_tick_order == other.sub_tick_order
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTask<T> {
    /// `BinaryHeap` is a max-heap, so earlier ticks compare greater.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .trigger_tick
            .cmp(&self.trigger_tick)
            .then_with(|| other.sub_tick_order.cmp(&self.sub_tick_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ordering() {
        // Earlier trigger_tick should come first
        let early = ScheduledTask::new((), 100, 7);
        let late = ScheduledTask::new((), 200, 0);
        assert!(early > late);

        // Same trigger_tick, lower sub_tick_order should come first
        let first = ScheduledTask::new((), 100, 5);
        let second = ScheduledTask::new((), 100, 10);
        assert!(first > second);
    }
}
