//! The leaf decay cascade.
//!
//! A removal next to leaves schedules a delayed check for each of them. When a
//! check finds an unsupported leaf it decays it, the host reports that decay
//! as a new removal, and the next ring of leaves gets scheduled.
//!
//! # Architecture
//!
//! - [`candidates`] - Which neighbours of a removed block to check
//! - [`distance`] - How far a leaf is from the nearest support
//! - [`DecayScheduler`] - Pending set, serialized queue and timers
//! - [`DecayExecutor`] - The re-check and its side effects
//! - [`CascadeController`] - World filtering and delay selection
//! - [`LeafDecay`] - Owns all of the above and is driven by the host

pub mod candidates;
pub mod distance;

mod controller;
mod executor;
mod scheduler;

pub use controller::CascadeController;
pub use executor::{DecayExecutor, DecayOutcome};
pub use scheduler::{DecayScheduler, DecayTask};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::DecayConfig,
    events::{BlockRemoval, DecayListener, DecayListeners},
    world::{BlockRef, LeafWorld},
};

/// Accelerated leaf decay for one process.
///
/// The host calls [`LeafDecay::on_block_removed`] (or the two shorthands) for
/// every removal it observes and [`LeafDecay::tick`] once per game tick.
pub struct LeafDecay {
    config: DecayConfig,
    scheduler: DecayScheduler,
    listeners: DecayListeners,
    rng: StdRng,
    /// Last tick passed to [`LeafDecay::tick`]. Events between ticks
    /// schedule relative to it.
    current_tick: u64,
}

impl LeafDecay {
    /// Creates the cascade with an OS seeded neighbour shuffle.
    #[must_use]
    pub fn new(config: DecayConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates the cascade with a fixed shuffle seed.
    #[must_use]
    pub fn with_seed(config: DecayConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: DecayConfig, rng: StdRng) -> Self {
        Self {
            scheduler: DecayScheduler::new(config.policy()),
            config,
            listeners: DecayListeners::new(),
            rng,
            current_tick: 0,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &DecayConfig {
        &self.config
    }

    /// Read access to the pending checks.
    #[must_use]
    pub const fn scheduler(&self) -> &DecayScheduler {
        &self.scheduler
    }

    /// Last tick seen.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Adds an observer of the cancellable decay announcement.
    pub fn register_listener(&mut self, listener: impl DecayListener + 'static) {
        self.listeners.register(listener);
    }

    /// A block was broken explicitly.
    pub fn on_block_break<W: LeafWorld>(&mut self, world: &W, block: BlockRef, state: W::State) -> usize {
        self.on_block_removed(world, &BlockRemoval::broken(block, state))
    }

    /// A leaf decayed, naturally or through this cascade.
    pub fn on_leaves_decay<W: LeafWorld>(&mut self, world: &W, block: BlockRef, state: W::State) -> usize {
        self.on_block_removed(world, &BlockRemoval::decayed(block, state))
    }

    /// Schedules checks around a removed block, returns how many were added.
    pub fn on_block_removed<W: LeafWorld>(&mut self, world: &W, removal: &BlockRemoval<W::State>) -> usize {
        let scheduled = CascadeController::new(&self.config).on_block_removed(
            &mut self.scheduler,
            world,
            removal,
            &mut self.rng,
            self.current_tick,
        );
        if scheduled > 0 {
            log::debug!(
                "{:?} at {} scheduled {scheduled} decay checks",
                removal.cause,
                removal.block
            );
        }
        scheduled
    }

    /// Schedules a check of `block` in `delay` ticks, bypassing enumeration.
    pub fn schedule(&mut self, block: BlockRef, delay: u64) -> bool {
        self.scheduler.schedule(block, delay, self.current_tick)
    }

    /// Runs the check for a scheduled block right away.
    ///
    /// The block's armed timer or queue slot is released with it, so a later
    /// schedule of the same block waits its full delay.
    pub fn attempt_decay<W: LeafWorld>(&mut self, world: &mut W, block: &BlockRef) -> bool {
        DecayExecutor::new(&self.config, &self.listeners)
            .attempt_decay(&mut self.scheduler, world, block)
            .is_decayed()
    }

    /// Runs every check due at `current_tick`, returns how many leaves decayed.
    pub fn tick<W: LeafWorld>(&mut self, world: &mut W, current_tick: u64) -> usize {
        self.current_tick = current_tick;
        let executor = DecayExecutor::new(&self.config, &self.listeners);
        let mut decayed = 0;

        while let Some(task) = self.scheduler.poll(current_tick) {
            let attempt = match task {
                DecayTask::Check { block, .. } => {
                    let outcome = executor.attempt_decay(&mut self.scheduler, world, &block);
                    Some((block, outcome))
                }
                DecayTask::Drain { .. } => {
                    let attempt = self.scheduler.pop_queued().map(|block| {
                        let outcome = executor.attempt_decay(&mut self.scheduler, world, &block);
                        (block, outcome)
                    });
                    self.scheduler
                        .rearm_drain(current_tick, self.config.drain_interval());
                    attempt
                }
            };

            if let Some((block, outcome)) = attempt {
                log::trace!("Decay check for {block}: {outcome:?}");
                if outcome.is_decayed() {
                    decayed += 1;
                }
            }
        }

        decayed
    }

    /// Whether a check for `block` is outstanding.
    #[must_use]
    pub fn is_pending(&self, block: &BlockRef) -> bool {
        self.scheduler.is_pending(block)
    }

    /// Returns true if no check is outstanding.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Discards every pending check without running it.
    pub fn shutdown(&mut self) -> usize {
        let discarded = self.scheduler.clear();
        if discarded > 0 {
            log::info!("Discarded {discarded} pending leaf decay checks");
        }
        discarded
    }
}
