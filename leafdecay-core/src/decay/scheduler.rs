//! Pending decay checks.
//!
//! Based on the tick scheduler's "one pending tick per key" rule: a block is
//! in the pending set exactly while one check for it is outstanding, and
//! scheduling it again in that window does nothing.
//!
//! Every pending entry and every drain step carries a generation. Timers
//! whose generation no longer matches were superseded (the block was claimed
//! directly, or the queue emptied) and are dropped when they come due.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::{config::SchedulePolicy, ticks::TaskQueue, world::BlockRef};

/// A delayed unit of work owned by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecayTask {
    /// Check a single block. Independent mode.
    Check {
        /// The block to check.
        block: BlockRef,
        /// Generation of the pending entry this timer belongs to.
        generation: u64,
    },
    /// Check the head of the queue, then rearm. Serialized mode.
    Drain {
        /// Generation of the drain step.
        generation: u64,
    },
}

/// Tracks which blocks await a decay check and when they are due.
pub struct DecayScheduler {
    policy: SchedulePolicy,
    /// Blocks with an outstanding check, and the generation of that check.
    pending: FxHashMap<BlockRef, u64>,
    /// Processing order in serialized mode. Always a subset of `pending`.
    queue: VecDeque<BlockRef>,
    /// Generation of the armed drain step, if any.
    drain: Option<u64>,
    next_generation: u64,
    /// Timers for checks and drain steps.
    tasks: TaskQueue<DecayTask>,
}

impl DecayScheduler {
    /// Creates an empty scheduler with a fixed policy.
    #[must_use]
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy,
            pending: FxHashMap::default(),
            queue: VecDeque::new(),
            drain: None,
            next_generation: 0,
            tasks: TaskQueue::new(),
        }
    }

    /// The policy chosen at construction.
    #[must_use]
    pub const fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    const fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        generation
    }

    /// Schedules a check of `block` in `delay` ticks.
    ///
    /// Returns `false` without doing anything if a check is already pending.
    pub fn schedule(&mut self, block: BlockRef, delay: u64, current_tick: u64) -> bool {
        if self.pending.contains_key(&block) {
            log::trace!("Decay check for {block} already pending");
            return false;
        }
        let generation = self.next_generation();
        self.pending.insert(block.clone(), generation);

        match self.policy {
            SchedulePolicy::Independent => {
                log::trace!("Scheduling decay check for {block} in {delay} ticks");
                self.tasks
                    .schedule(DecayTask::Check { block, generation }, current_tick, delay);
            }
            SchedulePolicy::Serialized => {
                log::trace!("Queued decay check for {block} behind {} others", self.queue.len());
                self.queue.push_back(block);
                if self.drain.is_none() {
                    self.arm_drain(current_tick, delay);
                }
            }
        }
        true
    }

    fn arm_drain(&mut self, current_tick: u64, delay: u64) {
        let generation = self.next_generation();
        self.drain = Some(generation);
        self.tasks
            .schedule(DecayTask::Drain { generation }, current_tick, delay);
    }

    /// Removes and returns the next live task due at or before `current_tick`.
    ///
    /// Superseded timers are discarded on the way.
    pub fn poll(&mut self, current_tick: u64) -> Option<DecayTask> {
        while let Some(scheduled) = self.tasks.poll(current_tick) {
            let live = match &scheduled.task {
                DecayTask::Check { block, generation } => {
                    self.pending.get(block) == Some(generation)
                }
                DecayTask::Drain { generation } => {
                    let live = self.drain == Some(*generation);
                    if live {
                        self.drain = None;
                    }
                    live
                }
            };
            if live {
                return Some(scheduled.task);
            }
            log::trace!("Dropped superseded {:?}", scheduled.task);
        }
        None
    }

    /// Claims the pending entry of `block` before it is checked.
    ///
    /// Returns `false` if no check was pending. A claimed block also leaves
    /// the serialized queue, and an emptied queue disarms its drain step.
    pub fn take_pending(&mut self, block: &BlockRef) -> bool {
        if self.pending.remove(block).is_none() {
            return false;
        }
        if self.policy == SchedulePolicy::Serialized {
            self.queue.retain(|queued| queued != block);
            if self.queue.is_empty() {
                self.drain = None;
            }
        }
        true
    }

    /// Pops the head of the serialized queue.
    pub fn pop_queued(&mut self) -> Option<BlockRef> {
        self.queue.pop_front()
    }

    /// Arms the next drain step if anything is still queued.
    ///
    /// Returns `true` if a step was armed.
    pub fn rearm_drain(&mut self, current_tick: u64, interval: u64) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        self.arm_drain(current_tick, interval.max(1));
        true
    }

    /// Whether a check for `block` is outstanding.
    #[must_use]
    pub fn is_pending(&self, block: &BlockRef) -> bool {
        self.pending.contains_key(block)
    }

    /// Number of outstanding checks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of blocks waiting in the serialized queue.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no check is outstanding.
    ///
    /// Superseded timers may still be armed, they fire as no-ops.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Tick of the earliest armed task.
    #[must_use]
    pub fn next_trigger(&self) -> Option<u64> {
        self.tasks.next_trigger()
    }

    /// Drops all pending state without running anything.
    ///
    /// Returns how many checks were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        self.queue.clear();
        self.drain = None;
        self.tasks.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use leafdecay_utils::BlockPos;

    use super::*;

    fn block(x: i32) -> BlockRef {
        BlockRef::new("overworld", BlockPos::new(x, 64, 0))
    }

    fn checked(task: Option<DecayTask>) -> BlockRef {
        match task {
            Some(DecayTask::Check { block, .. }) => block,
            other => panic!("expected a check, got {other:?}"),
        }
    }

    fn is_drain(task: Option<DecayTask>) -> bool {
        matches!(task, Some(DecayTask::Drain { .. }))
    }

    #[test]
    fn test_independent_dedup() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Independent);

        assert!(scheduler.schedule(block(1), 5, 0));
        assert!(!scheduler.schedule(block(1), 1, 0));
        assert!(!scheduler.schedule(block(1), 9, 3));
        assert!(scheduler.schedule(block(2), 1, 0));
        assert_eq!(scheduler.pending_count(), 2);

        // The first scheduling keeps its timing
        assert_eq!(checked(scheduler.poll(1)), block(2));
        assert_eq!(scheduler.poll(4), None);
        assert_eq!(checked(scheduler.poll(5)), block(1));
        assert_eq!(scheduler.poll(100), None);
    }

    #[test]
    fn test_pending_until_taken() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Independent);
        scheduler.schedule(block(1), 2, 0);
        assert!(scheduler.is_pending(&block(1)));

        assert!(scheduler.take_pending(&block(1)));
        assert!(!scheduler.is_pending(&block(1)));
        assert!(!scheduler.take_pending(&block(1)));

        // Free to schedule again once taken
        assert!(scheduler.schedule(block(1), 2, 0));
    }

    #[test]
    fn test_claimed_check_timer_superseded() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Independent);
        scheduler.schedule(block(1), 5, 0);
        assert!(scheduler.take_pending(&block(1)));
        assert!(scheduler.is_idle());

        scheduler.schedule(block(1), 100, 0);
        assert_eq!(scheduler.poll(5), None);
        assert!(scheduler.is_pending(&block(1)));
        assert_eq!(checked(scheduler.poll(100)), block(1));
    }

    #[test]
    fn test_serialized_single_drain() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Serialized);
        for x in 0..4 {
            assert!(scheduler.schedule(block(x), 5, 10));
        }
        assert!(!scheduler.schedule(block(2), 5, 10));
        assert_eq!(scheduler.queued_count(), 4);

        // Only one drain task armed for the whole burst
        assert_eq!(scheduler.next_trigger(), Some(15));
        assert!(is_drain(scheduler.poll(15)));
        assert_eq!(scheduler.poll(15), None);

        assert_eq!(scheduler.pop_queued(), Some(block(0)));
        assert!(scheduler.take_pending(&block(0)));
        assert!(scheduler.rearm_drain(15, 0));
        assert_eq!(scheduler.next_trigger(), Some(16));
    }

    #[test]
    fn test_rearm_only_when_queued() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Serialized);
        scheduler.schedule(block(0), 1, 0);
        assert!(is_drain(scheduler.poll(1)));
        assert_eq!(scheduler.pop_queued(), Some(block(0)));
        scheduler.take_pending(&block(0));

        assert!(!scheduler.rearm_drain(1, 2));
        assert!(scheduler.is_idle());

        // A new burst arms a fresh drain with its own delay
        scheduler.schedule(block(1), 4, 1);
        assert_eq!(scheduler.next_trigger(), Some(5));
    }

    #[test]
    fn test_claim_leaves_queue() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Serialized);
        scheduler.schedule(block(0), 1, 0);
        scheduler.schedule(block(1), 1, 0);

        assert!(scheduler.take_pending(&block(0)));
        assert_eq!(scheduler.queued_count(), 1);
        assert!(scheduler.schedule(block(0), 1, 0));
        assert_eq!(scheduler.queued_count(), 2);

        assert!(is_drain(scheduler.poll(1)));
        assert_eq!(scheduler.pop_queued(), Some(block(1)));
        assert_eq!(scheduler.pop_queued(), Some(block(0)));
    }

    #[test]
    fn test_emptied_queue_disarms_drain() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Serialized);
        scheduler.schedule(block(0), 5, 0);
        assert!(scheduler.take_pending(&block(0)));

        // The new burst waits its own delay instead of riding the old step
        scheduler.schedule(block(0), 5, 3);
        assert_eq!(scheduler.poll(5), None);
        assert!(is_drain(scheduler.poll(8)));
    }

    #[test]
    fn test_clear() {
        let mut scheduler = DecayScheduler::new(SchedulePolicy::Serialized);
        for x in 0..3 {
            scheduler.schedule(block(x), 1, 0);
        }
        assert_eq!(scheduler.clear(), 3);
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.queued_count(), 0);
        assert_eq!(scheduler.poll(u64::MAX), None);
    }
}
