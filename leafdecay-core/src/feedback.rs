//! Particle and sound feedback played when leaves decay.
//!
//! Feedback is cosmetic. A failure is logged and the decay goes ahead.

use leafdecay_utils::math::Vector3;
use thiserror::Error;

use crate::world::BlockRef;

/// A feedback side effect that the host could not perform.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The particle burst could not be spawned.
    #[error("failed to spawn particles at {block}: {reason}")]
    Particles {
        /// Where the particles were meant to appear.
        block: BlockRef,
        /// Host supplied reason.
        reason: String,
    },
    /// The sound could not be played.
    #[error("failed to play sound {sound} at {block}: {reason}")]
    Sound {
        /// Where the sound was meant to play.
        block: BlockRef,
        /// The sound's resource name.
        sound: &'static str,
        /// Host supplied reason.
        reason: String,
    },
}

/// Sound category, mirrors the client's volume sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCategory {
    /// The "Blocks" slider.
    Blocks,
}

/// A burst of block-texture particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleEffect {
    /// Centre of the burst in world coordinates.
    pub center: Vector3<f64>,
    /// Number of particles.
    pub count: u32,
    /// Random offset on each axis.
    pub spread: Vector3<f64>,
    /// Particle speed.
    pub speed: f64,
}

impl ParticleEffect {
    /// The burst shown when the leaf at `block` decays.
    #[must_use]
    pub fn leaf_decay(block: &BlockRef) -> Self {
        Self {
            center: Vector3::new(
                f64::from(block.pos.x()) + 0.5,
                f64::from(block.pos.y()) + 0.5,
                f64::from(block.pos.z()) + 0.5,
            ),
            count: 8,
            spread: Vector3::new(0.2, 0.2, 0.2),
            speed: 0.0,
        }
    }
}

/// A one-shot sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEffect {
    /// Resource name of the sound.
    pub sound: &'static str,
    /// Volume slider the sound belongs to.
    pub category: SoundCategory,
    /// Volume, 1.0 is full.
    pub volume: f32,
    /// Pitch, 1.0 is unchanged.
    pub pitch: f32,
}

impl SoundEffect {
    /// The quiet rustle played when leaves decay.
    pub const LEAF_DECAY: Self = Self {
        sound: "minecraft:block.grass.break",
        category: SoundCategory::Blocks,
        volume: 0.05,
        pitch: 1.2,
    };
}
