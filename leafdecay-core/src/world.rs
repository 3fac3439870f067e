//! The seam between the decay cascade and the host world.
//!
//! The cascade never owns world state. It reads block states, asks the
//! [`BlockClassifier`] what they are and requests natural removals. Anything
//! that depends on the host's block format lives behind these two traits.

use std::{fmt, sync::Arc};

use leafdecay_utils::{BlockPos, Direction};

use crate::feedback::{FeedbackError, ParticleEffect, SoundEffect};

/// A single block position in a single world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockRef {
    /// Name of the world the block is in.
    pub world: Arc<str>,
    /// Position of the block.
    pub pos: BlockPos,
}

impl BlockRef {
    /// Creates a new block reference.
    #[must_use]
    pub fn new(world: impl Into<Arc<str>>, pos: BlockPos) -> Self {
        Self {
            world: world.into(),
            pos,
        }
    }

    /// The block next to this one in `direction`, in the same world.
    #[must_use]
    pub fn relative(&self, direction: Direction) -> Self {
        Self {
            world: Arc::clone(&self.world),
            pos: direction.relative(self.pos),
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.world, self.pos)
    }
}

/// Tells the cascade what a block state is.
pub trait BlockClassifier {
    /// The host's block state representation.
    type State: Copy + fmt::Debug;

    /// Wood that keeps leaves alive.
    fn is_support(&self, state: Self::State) -> bool;

    /// Any leaf block, persistent or not.
    fn is_leaf(&self, state: Self::State) -> bool;

    /// A leaf that was placed on purpose and must never decay.
    fn is_persistent(&self, state: Self::State) -> bool;

    /// The host's own support distance for this state, if it tracks one.
    fn support_distance(&self, _state: Self::State) -> Option<u8> {
        None
    }

    /// A leaf that this mechanism is allowed to remove.
    fn is_decayable_leaf(&self, state: Self::State) -> bool {
        self.is_leaf(state) && !self.is_persistent(state)
    }
}

/// Read and mutation access to the host's worlds.
pub trait LeafWorld: BlockClassifier {
    /// The current block state at `pos` in `world`.
    fn block_state(&self, world: &str, pos: BlockPos) -> Self::State;

    /// Whether the region holding `pos` is loaded and ticking.
    fn is_loaded(&self, world: &str, pos: BlockPos) -> bool;

    /// Removes the block the way organic decay would, drops included.
    ///
    /// The host reports this back as a decay removal, which is how the
    /// cascade reaches the next ring of leaves.
    fn decay_naturally(&mut self, block: &BlockRef);

    /// Spawns a transient particle burst.
    fn spawn_particles(
        &mut self,
        _block: &BlockRef,
        _state: Self::State,
        _effect: &ParticleEffect,
    ) -> Result<(), FeedbackError> {
        Ok(())
    }

    /// Plays a sound at the block.
    fn play_sound(&mut self, _block: &BlockRef, _effect: &SoundEffect) -> Result<(), FeedbackError> {
        Ok(())
    }

    /// Convenience lookup by [`BlockRef`].
    fn state_of(&self, block: &BlockRef) -> Self::State {
        self.block_state(&block.world, block.pos)
    }
}
