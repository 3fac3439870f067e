//! Support distance estimation.
//!
//! A leaf is supported while some support block is fewer than
//! [`DECAY_DISTANCE`] face steps away, walking only through leaves. Hosts that
//! track the distance themselves answer in O(1). Otherwise a breadth-first
//! search bounded by the same cutoff is run.

use std::collections::VecDeque;

use leafdecay_utils::Direction;
use rustc_hash::FxHashSet;

use crate::world::{BlockRef, LeafWorld};

/// Leaves at this distance or further from any support decay.
///
/// Also the search cutoff: a result of `DECAY_DISTANCE` means "nothing found
/// in range", not "provably unsupported".
pub const DECAY_DISTANCE: u8 = 7;

/// Hop distance from `block` to the nearest support, capped at [`DECAY_DISTANCE`].
///
/// `state` is the block's current state, already read by the caller.
pub fn distance_to_support<W: LeafWorld>(world: &W, block: &BlockRef, state: W::State) -> u8 {
    if let Some(distance) = world.support_distance(state) {
        return distance.min(DECAY_DISTANCE);
    }
    search_support(world, block)
}

/// Returns true if a leaf at `distance` must stay.
#[must_use]
pub const fn is_supported(distance: u8) -> bool {
    distance < DECAY_DISTANCE
}

/// Breadth-first search for the nearest support block through connected leaves.
pub fn search_support<W: LeafWorld>(world: &W, block: &BlockRef) -> u8 {
    let mut visited = FxHashSet::default();
    visited.insert(block.pos);
    let mut frontier = VecDeque::from([(block.pos, 0u8)]);

    while let Some((pos, distance)) = frontier.pop_front() {
        let next = distance + 1;
        for direction in Direction::ALL {
            let neighbor = direction.relative(pos);
            let state = world.block_state(&block.world, neighbor);
            if world.is_support(state) {
                // BFS pops in distance order, so the first hit is the nearest
                return next;
            }
            // Leaves at the cutoff can't lead to anything closer than the cutoff
            if next < DECAY_DISTANCE && world.is_leaf(state) && visited.insert(neighbor) {
                frontier.push_back((neighbor, next));
            }
        }
    }

    DECAY_DISTANCE
}

#[cfg(test)]
mod tests {
    use leafdecay_utils::BlockPos;

    use super::*;
    use crate::memory::{MemoryBlock, MemoryWorld};

    const WORLD: &str = "overworld";

    /// A log at x = 0 followed by leaves at x = 1..=len.
    fn leaf_row(len: i32) -> MemoryWorld {
        let mut world = MemoryWorld::new();
        world.set_block(WORLD, BlockPos::new(0, 64, 0), MemoryBlock::Log);
        for x in 1..=len {
            world.set_block(WORLD, BlockPos::new(x, 64, 0), MemoryBlock::LEAVES);
        }
        world
    }

    fn distance_at(world: &MemoryWorld, x: i32) -> u8 {
        let block = BlockRef::new(WORLD, BlockPos::new(x, 64, 0));
        distance_to_support(world, &block, world.state_of(&block))
    }

    #[test]
    fn test_distance_along_row() {
        let world = leaf_row(9);
        for x in 1..=6 {
            assert_eq!(distance_at(&world, x), x as u8);
            assert!(is_supported(distance_at(&world, x)));
        }
        assert_eq!(distance_at(&world, 7), DECAY_DISTANCE);
        assert_eq!(distance_at(&world, 9), DECAY_DISTANCE);
        assert!(!is_supported(distance_at(&world, 7)));
    }

    #[test]
    fn test_shortest_path_wins() {
        let mut world = leaf_row(6);
        // Second log closer to the end of the row
        world.set_block(WORLD, BlockPos::new(6, 65, 0), MemoryBlock::Log);
        assert_eq!(distance_at(&world, 6), 1);
        assert_eq!(distance_at(&world, 4), 3);
    }

    #[test]
    fn test_search_does_not_cross_gaps() {
        let mut world = leaf_row(6);
        world.set_block(WORLD, BlockPos::new(3, 64, 0), MemoryBlock::Air);
        assert_eq!(distance_at(&world, 2), 2);
        assert_eq!(distance_at(&world, 4), DECAY_DISTANCE);
    }

    #[test]
    fn test_persistent_leaves_still_conduct() {
        let mut world = leaf_row(3);
        world.set_block(WORLD, BlockPos::new(2, 64, 0), MemoryBlock::PERSISTENT_LEAVES);
        assert_eq!(distance_at(&world, 3), 3);
    }

    #[test]
    fn test_native_distance_preferred() {
        let mut world = leaf_row(1);
        // Right next to a log, but the host claims otherwise
        world.set_block(WORLD, BlockPos::new(1, 64, 0), MemoryBlock::leaves_at_distance(7));
        assert_eq!(distance_at(&world, 1), DECAY_DISTANCE);

        world.set_block(WORLD, BlockPos::new(1, 64, 0), MemoryBlock::leaves_at_distance(200));
        assert_eq!(distance_at(&world, 1), DECAY_DISTANCE);

        world.set_block(WORLD, BlockPos::new(1, 64, 0), MemoryBlock::leaves_at_distance(2));
        assert_eq!(distance_at(&world, 1), 2);
    }

    #[test]
    fn test_search_is_bounded() {
        // Solid cube of leaves with no wood anywhere
        let mut world = MemoryWorld::new();
        for x in -12..=12 {
            for y in -12..=12 {
                for z in -12..=12 {
                    world.set_block(WORLD, BlockPos::new(x, y, z), MemoryBlock::LEAVES);
                }
            }
        }
        // A log just outside the search radius
        world.set_block(WORLD, BlockPos::new(0, 0, 8), MemoryBlock::Log);
        let block = BlockRef::new(WORLD, BlockPos::new(0, 0, 0));
        assert_eq!(search_support(&world, &block), DECAY_DISTANCE);

        world.set_block(WORLD, BlockPos::new(0, 0, 7), MemoryBlock::Log);
        assert_eq!(search_support(&world, &block), DECAY_DISTANCE);

        world.set_block(WORLD, BlockPos::new(0, 0, 6), MemoryBlock::Log);
        assert_eq!(search_support(&world, &block), 6);
    }
}
