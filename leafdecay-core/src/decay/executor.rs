//! The decay check itself.

use crate::{
    config::DecayConfig,
    events::{DecayListeners, LeavesDecayEvent},
    feedback::{ParticleEffect, SoundEffect},
    world::{BlockRef, LeafWorld},
};

use super::{
    distance::{distance_to_support, is_supported},
    scheduler::DecayScheduler,
};

/// Result of a single decay attempt. Only [`DecayOutcome::Decayed`] changes
/// the world, every other outcome is an ordinary no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayOutcome {
    /// The leaf was removed.
    Decayed,
    /// No check was pending for the block.
    NotPending,
    /// The block's region is not loaded.
    Unloaded,
    /// The block is no longer a non-persistent leaf.
    NotDecayable,
    /// A support block is within range, at the contained distance.
    Supported(u8),
    /// A listener cancelled the decay.
    Vetoed,
}

impl DecayOutcome {
    /// Returns true if the leaf was removed.
    #[must_use]
    pub const fn is_decayed(self) -> bool {
        matches!(self, Self::Decayed)
    }
}

/// Runs decay checks for previously scheduled blocks.
pub struct DecayExecutor<'a> {
    config: &'a DecayConfig,
    listeners: &'a DecayListeners,
}

impl<'a> DecayExecutor<'a> {
    /// Creates an executor borrowing the shared decay state.
    #[must_use]
    pub const fn new(config: &'a DecayConfig, listeners: &'a DecayListeners) -> Self {
        Self { config, listeners }
    }

    /// Re-checks `block` and decays it if it is still an unsupported leaf.
    ///
    /// The pending entry is released first, whatever the outcome, so a later
    /// removal next to the block can schedule it again.
    pub fn attempt_decay<W: LeafWorld>(
        &self,
        scheduler: &mut DecayScheduler,
        world: &mut W,
        block: &BlockRef,
    ) -> DecayOutcome {
        if !scheduler.take_pending(block) {
            return DecayOutcome::NotPending;
        }
        if !world.is_loaded(&block.world, block.pos) {
            return DecayOutcome::Unloaded;
        }

        let state = world.state_of(block);
        if !world.is_decayable_leaf(state) {
            return DecayOutcome::NotDecayable;
        }

        let distance = distance_to_support(world, block, state);
        if is_supported(distance) {
            return DecayOutcome::Supported(distance);
        }

        let mut event = LeavesDecayEvent::new(block.clone());
        if !self.listeners.call(&mut event) {
            log::debug!("Decay of {block} cancelled by a listener");
            return DecayOutcome::Vetoed;
        }

        if self.config.spawn_particles
            && let Err(err) = world.spawn_particles(block, state, &ParticleEffect::leaf_decay(block))
        {
            log::debug!("{err}");
        }
        if self.config.play_sound
            && let Err(err) = world.play_sound(block, &SoundEffect::LEAF_DECAY)
        {
            log::debug!("{err}");
        }

        world.decay_naturally(block);
        DecayOutcome::Decayed
    }
}
