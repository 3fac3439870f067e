//! A tree to fell.

use leafdecay_core::memory::{MemoryBlock, MemoryWorld};
use leafdecay_utils::BlockPos;

/// What [`plant_oak`] placed.
#[derive(Debug, Clone)]
pub struct Tree {
    /// Log positions, bottom first.
    pub trunk: Vec<BlockPos>,
    /// Number of leaves in the canopy.
    pub leaves: usize,
}

/// Plants a small oak: a straight trunk of `height` logs under a rounded
/// four layer canopy, the lower two layers wider than the upper two.
pub fn plant_oak(world: &mut MemoryWorld, name: &str, base: BlockPos, height: i32) -> Tree {
    let trunk: Vec<BlockPos> = (0..height).map(|dy| base.offset(0, dy, 0)).collect();
    for &pos in &trunk {
        world.set_block(name, pos, MemoryBlock::Log);
    }

    let mut leaves = 0;
    for dy in height - 2..=height + 1 {
        let radius: i32 = if dy < height { 2 } else { 1 };
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let corner = dx.abs() == radius && dz.abs() == radius;
                let in_trunk = dx == 0 && dz == 0 && dy < height;
                if corner || in_trunk {
                    continue;
                }
                world.set_block(name, base.offset(dx, dy, dz), MemoryBlock::LEAVES);
                leaves += 1;
            }
        }
    }

    Tree { trunk, leaves }
}
