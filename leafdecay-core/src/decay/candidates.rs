//! Neighbour enumeration after a removal.

use leafdecay_utils::Direction;
use rand::{Rng, seq::SliceRandom};
use smallvec::SmallVec;

use crate::world::{BlockRef, LeafWorld};

/// Up to six leaves next to a removed block.
pub type Candidates = SmallVec<[BlockRef; 6]>;

/// Returns the non-persistent leaves touching `removed`, in random order.
///
/// Only removals of support or leaf blocks can unsupport anything, so any
/// other `removed_state` yields no candidates. The order is shuffled on every
/// call so cascades don't spread in a visible preferred direction.
pub fn enumerate<W, R>(world: &W, removed: &BlockRef, removed_state: W::State, rng: &mut R) -> Candidates
where
    W: LeafWorld,
    R: Rng + ?Sized,
{
    if !world.is_support(removed_state) && !world.is_leaf(removed_state) {
        return Candidates::new();
    }

    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    directions
        .into_iter()
        .map(|direction| removed.relative(direction))
        .filter(|neighbor| world.is_decayable_leaf(world.state_of(neighbor)))
        .collect()
}
