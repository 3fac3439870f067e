//! # Leafdecay core
//!
//! Accelerated leaf decay. When wood or leaves disappear, nearby leaves that
//! lost their support are re-checked after a short delay and removed, which
//! ripples through the canopy until every unsupported leaf is gone.
//!
//! The host world is abstracted behind [`world::LeafWorld`]. [`memory`] holds
//! an in-memory implementation used by tests and the demo binary.
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::cargo_common_metadata
)]

pub mod config;
pub mod decay;
pub mod events;
pub mod feedback;
pub mod memory;
pub mod ticks;
pub mod world;

pub use config::{ConfigError, DecayConfig, SchedulePolicy};
pub use decay::{DecayOutcome, LeafDecay};
pub use events::{BlockRemoval, DecayListener, LeavesDecayEvent, RemovalCause};
pub use world::{BlockClassifier, BlockRef, LeafWorld};
