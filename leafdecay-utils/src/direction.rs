//! The six face directions of a block.

use crate::BlockPos;

/// One of the six faces of a block.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// -Y
    Down = 0,
    /// +Y
    Up = 1,
    /// -Z
    North = 2,
    /// +Z
    South = 3,
    /// -X
    West = 4,
    /// +X
    East = 5,
}

impl Direction {
    /// All six directions in ordinal order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Gets the offset in the given direction as (dx, dy, dz).
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// Returns the position next to `pos` in this direction.
    #[must_use]
    pub const fn relative(self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_is_face_neighbor() {
        let pos = BlockPos::new(3, -7, 12);
        let mut seen = Vec::new();
        for direction in Direction::ALL {
            let moved = direction.relative(pos);
            assert!(!seen.contains(&moved));
            seen.push(moved);
            assert_eq!((moved.0 - pos.0).manhattan_length(), 1);
        }
    }
}
