//! In-memory world.
//!
//! A [`LeafWorld`] backed by hash maps instead of chunks. Useful for:
//! - Tests of the decay cascade
//! - The demo host in the `leafdecay` binary
//! - Benchmarks of the support distance search
//!
//! Every chunk counts as loaded until it is explicitly unloaded. Removals are
//! collected in an outbox that the host forwards back into the cascade.

use std::sync::Arc;

use leafdecay_utils::{BlockPos, ChunkPos};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    decay::LeafDecay,
    events::BlockRemoval,
    feedback::{FeedbackError, ParticleEffect, SoundEffect},
    world::{BlockClassifier, BlockRef, LeafWorld},
};

/// Block states understood by [`MemoryWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryBlock {
    /// Nothing.
    #[default]
    Air,
    /// Anything solid that is neither wood nor leaves.
    Stone,
    /// Wood, supports leaves.
    Log,
    /// Leaves.
    Leaves {
        /// Placed by a player, never decays.
        persistent: bool,
        /// Support distance tracked by the world itself, if any.
        distance: Option<u8>,
    },
}

impl MemoryBlock {
    /// Natural leaves without a tracked distance.
    pub const LEAVES: Self = Self::Leaves {
        persistent: false,
        distance: None,
    };

    /// Player placed leaves.
    pub const PERSISTENT_LEAVES: Self = Self::Leaves {
        persistent: true,
        distance: None,
    };

    /// Natural leaves carrying a precomputed distance.
    #[must_use]
    pub const fn leaves_at_distance(distance: u8) -> Self {
        Self::Leaves {
            persistent: false,
            distance: Some(distance),
        }
    }
}

#[derive(Default)]
struct MemoryLevel {
    blocks: FxHashMap<BlockPos, MemoryBlock>,
    unloaded: FxHashSet<ChunkPos>,
}

/// A RAM-only collection of named worlds.
#[derive(Default)]
pub struct MemoryWorld {
    levels: FxHashMap<Arc<str>, MemoryLevel>,
    removals: Vec<BlockRemoval<MemoryBlock>>,
    particles: Vec<BlockRef>,
    sounds: Vec<BlockRef>,
    failing_feedback: bool,
}

impl MemoryWorld {
    /// Creates an empty world set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn level_mut(&mut self, world: &str) -> &mut MemoryLevel {
        self.levels.entry(Arc::from(world)).or_default()
    }

    /// Places `block` without triggering anything.
    pub fn set_block(&mut self, world: &str, pos: BlockPos, block: MemoryBlock) {
        let level = self.level_mut(world);
        if block == MemoryBlock::Air {
            level.blocks.remove(&pos);
        } else {
            level.blocks.insert(pos, block);
        }
    }

    /// The block at `pos`, air if nothing was placed there.
    #[must_use]
    pub fn block(&self, world: &str, pos: BlockPos) -> MemoryBlock {
        self.levels
            .get(world)
            .and_then(|level| level.blocks.get(&pos))
            .copied()
            .unwrap_or_default()
    }

    /// Breaks a block the way a player would.
    ///
    /// Returns the removal to hand to [`LeafDecay::on_block_removed`], or
    /// `None` if there was nothing to break.
    pub fn break_block(&mut self, world: &str, pos: BlockPos) -> Option<BlockRemoval<MemoryBlock>> {
        let state = self.level_mut(world).blocks.remove(&pos)?;
        Some(BlockRemoval::broken(BlockRef::new(world, pos), state))
    }

    /// Marks a chunk as unloaded.
    pub fn unload_chunk(&mut self, world: &str, chunk: ChunkPos) {
        self.level_mut(world).unloaded.insert(chunk);
    }

    /// Marks a chunk as loaded again.
    pub fn load_chunk(&mut self, world: &str, chunk: ChunkPos) {
        self.level_mut(world).unloaded.remove(&chunk);
    }

    /// Makes every feedback call fail from now on.
    pub const fn set_failing_feedback(&mut self, failing: bool) {
        self.failing_feedback = failing;
    }

    /// Takes the natural removals recorded since the last call.
    pub fn take_removals(&mut self) -> Vec<BlockRemoval<MemoryBlock>> {
        std::mem::take(&mut self.removals)
    }

    /// Forwards recorded removals into the cascade, returning how many
    /// checks were scheduled.
    pub fn dispatch_removals(&mut self, decay: &mut LeafDecay) -> usize {
        let removals = self.take_removals();
        let mut scheduled = 0;
        for removal in &removals {
            scheduled += decay.on_block_removed(&*self, removal);
        }
        scheduled
    }

    /// Blocks where particles were spawned, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[BlockRef] {
        &self.particles
    }

    /// Blocks where sounds were played, oldest first.
    #[must_use]
    pub fn sounds(&self) -> &[BlockRef] {
        &self.sounds
    }

    /// Number of leaf blocks in `world`.
    #[must_use]
    pub fn leaf_count(&self, world: &str) -> usize {
        self.levels.get(world).map_or(0, |level| {
            level
                .blocks
                .values()
                .filter(|block| matches!(block, MemoryBlock::Leaves { .. }))
                .count()
        })
    }
}

impl BlockClassifier for MemoryWorld {
    type State = MemoryBlock;

    fn is_support(&self, state: MemoryBlock) -> bool {
        state == MemoryBlock::Log
    }

    fn is_leaf(&self, state: MemoryBlock) -> bool {
        matches!(state, MemoryBlock::Leaves { .. })
    }

    fn is_persistent(&self, state: MemoryBlock) -> bool {
        matches!(state, MemoryBlock::Leaves { persistent: true, .. })
    }

    fn support_distance(&self, state: MemoryBlock) -> Option<u8> {
        match state {
            MemoryBlock::Leaves { distance, .. } => distance,
            _ => None,
        }
    }
}

impl LeafWorld for MemoryWorld {
    fn block_state(&self, world: &str, pos: BlockPos) -> MemoryBlock {
        self.block(world, pos)
    }

    fn is_loaded(&self, world: &str, pos: BlockPos) -> bool {
        self.levels
            .get(world)
            .is_none_or(|level| !level.unloaded.contains(&pos.chunk_pos()))
    }

    fn decay_naturally(&mut self, block: &BlockRef) {
        if let Some(state) = self.level_mut(&block.world).blocks.remove(&block.pos) {
            self.removals
                .push(BlockRemoval::decayed(block.clone(), state));
        }
    }

    fn spawn_particles(
        &mut self,
        block: &BlockRef,
        _state: MemoryBlock,
        _effect: &ParticleEffect,
    ) -> Result<(), FeedbackError> {
        if self.failing_feedback {
            return Err(FeedbackError::Particles {
                block: block.clone(),
                reason: "particles disabled".to_string(),
            });
        }
        self.particles.push(block.clone());
        Ok(())
    }

    fn play_sound(&mut self, block: &BlockRef, effect: &SoundEffect) -> Result<(), FeedbackError> {
        if self.failing_feedback {
            return Err(FeedbackError::Sound {
                block: block.clone(),
                sound: effect.sound,
                reason: "sounds disabled".to_string(),
            });
        }
        self.sounds.push(block.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_break() {
        let mut world = MemoryWorld::new();
        let pos = BlockPos::new(1, 2, 3);
        world.set_block("overworld", pos, MemoryBlock::Log);
        assert_eq!(world.block("overworld", pos), MemoryBlock::Log);
        assert_eq!(world.block("nether", pos), MemoryBlock::Air);

        let removal = world.break_block("overworld", pos).expect("log was there");
        assert_eq!(removal.state, MemoryBlock::Log);
        assert_eq!(world.block("overworld", pos), MemoryBlock::Air);
        assert!(world.break_block("overworld", pos).is_none());
    }

    #[test]
    fn test_unload() {
        let mut world = MemoryWorld::new();
        let pos = BlockPos::new(40, 64, -3);
        assert!(world.is_loaded("overworld", pos));
        world.unload_chunk("overworld", pos.chunk_pos());
        assert!(!world.is_loaded("overworld", pos));
        assert!(world.is_loaded("overworld", BlockPos::new(0, 64, 0)));
        world.load_chunk("overworld", pos.chunk_pos());
        assert!(world.is_loaded("overworld", pos));
    }

    #[test]
    fn test_natural_decay_recorded() {
        let mut world = MemoryWorld::new();
        let block = BlockRef::new("overworld", BlockPos::new(0, 70, 0));
        world.set_block("overworld", block.pos, MemoryBlock::LEAVES);

        world.decay_naturally(&block);
        let removals = world.take_removals();
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].block, block);
        assert_eq!(removals[0].cause, crate::events::RemovalCause::Decayed);
        assert!(world.take_removals().is_empty());
    }
}
