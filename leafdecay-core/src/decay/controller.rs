//! Entry point for removal events.

use rand::Rng;

use crate::{config::DecayConfig, events::BlockRemoval, world::LeafWorld};

use super::{candidates::enumerate, scheduler::DecayScheduler};

/// Turns removals into scheduled decay checks.
pub struct CascadeController<'a> {
    config: &'a DecayConfig,
}

impl<'a> CascadeController<'a> {
    /// Creates a controller for the given config.
    #[must_use]
    pub const fn new(config: &'a DecayConfig) -> Self {
        Self { config }
    }

    /// Schedules checks for the leaves around a removed block.
    ///
    /// Returns how many new checks were scheduled.
    pub fn on_block_removed<W, R>(
        &self,
        scheduler: &mut DecayScheduler,
        world: &W,
        removal: &BlockRemoval<W::State>,
        rng: &mut R,
        current_tick: u64,
    ) -> usize
    where
        W: LeafWorld,
        R: Rng + ?Sized,
    {
        if !self.config.is_world_enabled(&removal.block.world) {
            return 0;
        }

        let delay = self.config.delay_for(removal.cause);
        let mut scheduled = 0;
        for candidate in enumerate(world, &removal.block, removal.state, rng) {
            if scheduler.schedule(candidate, delay, current_tick) {
                scheduled += 1;
            }
        }
        scheduled
    }
}
