//! # Leafdecay utils
//!
//! Position types shared by the leaf decay crates.

pub mod direction;
pub mod math;
pub mod types;

pub use direction::Direction;
pub use types::{BlockPos, ChunkPos};
