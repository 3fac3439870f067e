//! # Leafdecay
//!
//! A standalone host for the leaf decay cascade. It drives a [`MemoryWorld`]
//! at the game's tick rate and feeds every decay back into the cascade.
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
    clippy::cargo_common_metadata
)]

use std::time::Duration;

use leafdecay_core::{DecayConfig, LeafDecay, memory::MemoryWorld};
use leafdecay_utils::BlockPos;
use tokio::{
    select,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;

/// Tree planting for the demo run.
pub mod demo;
/// Log output setup.
pub mod logger;

/// Wall clock length of one game tick.
pub const TICK_DURATION: Duration = Duration::from_millis(50);

/// How a [`LeafDecayServer::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks advanced during the run.
    pub ticks: u64,
    /// Leaves decayed by the cascade.
    pub decayed: usize,
    /// Checks still pending when the run stopped.
    pub discarded: usize,
    /// `true` if the cascade ran dry, `false` if the run was cancelled.
    pub settled: bool,
}

/// Owns a world and the cascade watching it.
pub struct LeafDecayServer {
    /// The cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    world: MemoryWorld,
    decay: LeafDecay,
    tick: u64,
}

impl LeafDecayServer {
    /// Creates a server around an empty world.
    #[must_use]
    pub fn new(config: DecayConfig) -> Self {
        Self::with_decay(MemoryWorld::new(), LeafDecay::new(config))
    }

    /// Creates a server from prepared parts.
    #[must_use]
    pub fn with_decay(world: MemoryWorld, decay: LeafDecay) -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            world,
            decay,
            tick: 0,
        }
    }

    /// The hosted world.
    #[must_use]
    pub const fn world(&self) -> &MemoryWorld {
        &self.world
    }

    /// Mutable access to the hosted world, for planting.
    pub const fn world_mut(&mut self) -> &mut MemoryWorld {
        &mut self.world
    }

    /// The cascade.
    #[must_use]
    pub const fn decay(&self) -> &LeafDecay {
        &self.decay
    }

    /// Mutable access to the cascade, for registering listeners.
    pub const fn decay_mut(&mut self) -> &mut LeafDecay {
        &mut self.decay
    }

    /// Current game tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Breaks a block as a player would and reports it to the cascade.
    ///
    /// Returns how many decay checks were scheduled.
    pub fn break_block(&mut self, world: &str, pos: BlockPos) -> usize {
        let Some(removal) = self.world.break_block(world, pos) else {
            log::debug!("Nothing to break at {pos} in {world}");
            return 0;
        };
        self.decay.on_block_removed(&self.world, &removal)
    }

    /// Advances one tick. Returns how many leaves decayed.
    pub fn step(&mut self) -> usize {
        self.tick += 1;
        let decayed = self.decay.tick(&mut self.world, self.tick);
        self.world.dispatch_removals(&mut self.decay);
        decayed
    }

    /// Ticks every `tick_duration` until the cascade is idle or the server is
    /// stopped. Pending checks are discarded on the way out.
    pub async fn run(&mut self, tick_duration: Duration) -> RunSummary {
        log::info!("Started leaf decay host");

        let start = self.tick;
        let mut decayed = 0;
        let mut settled = false;
        let mut ticker = interval(tick_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            select! {
                biased;
                () = self.cancel_token.cancelled() => {
                    log::info!("Stopping leaf decay host at tick {}", self.tick);
                    break;
                }
                _ = ticker.tick() => {
                    decayed += self.step();
                    if self.decay.is_idle() {
                        settled = true;
                        log::info!("Leaf decay settled at tick {}", self.tick);
                        break;
                    }
                }
            }
        }

        RunSummary {
            ticks: self.tick - start,
            decayed,
            discarded: self.decay.shutdown(),
            settled,
        }
    }

    /// Stops a running server.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::plant_oak;

    const WORLD: &str = "overworld";
    const BASE: BlockPos = BlockPos::new(0, 64, 0);

    fn server_with_oak() -> (LeafDecayServer, demo::Tree) {
        let mut server =
            LeafDecayServer::with_decay(MemoryWorld::new(), LeafDecay::with_seed(DecayConfig::default(), 42));
        let tree = plant_oak(server.world_mut(), WORLD, BASE, 5);
        (server, tree)
    }

    fn fell(server: &mut LeafDecayServer, tree: &demo::Tree) -> usize {
        tree.trunk
            .iter()
            .map(|&pos| server.break_block(WORLD, pos))
            .sum()
    }

    #[test]
    fn test_felled_oak_loses_canopy() {
        let (mut server, tree) = server_with_oak();
        assert!(fell(&mut server, &tree) > 0);

        let decayed: usize = (0..100).map(|_| server.step()).sum();
        assert_eq!(decayed, tree.leaves);
        assert_eq!(server.world().leaf_count(WORLD), 0);
        assert!(server.decay().is_idle());
    }

    #[test]
    fn test_standing_oak_keeps_canopy() {
        let (mut server, tree) = server_with_oak();

        // Breaking a single canopy leaf leaves the rest supported by the trunk
        let top = BASE.offset(0, 6, 0);
        assert!(server.break_block(WORLD, top) > 0);
        let decayed: usize = (0..100).map(|_| server.step()).sum();

        assert_eq!(decayed, 0);
        assert_eq!(server.world().leaf_count(WORLD), tree.leaves - 1);
    }

    #[test]
    fn test_break_air() {
        let (mut server, _) = server_with_oak();
        assert_eq!(server.break_block(WORLD, BlockPos::new(100, 64, 100)), 0);
    }

    #[tokio::test]
    async fn test_run_until_settled() {
        let (mut server, tree) = server_with_oak();
        fell(&mut server, &tree);

        let summary = server.run(Duration::from_millis(1)).await;
        assert!(summary.settled);
        assert_eq!(summary.decayed, tree.leaves);
        assert_eq!(summary.discarded, 0);
        assert_eq!(summary.ticks, server.current_tick());
    }

    #[tokio::test]
    async fn test_run_cancelled() {
        let (mut server, tree) = server_with_oak();
        let scheduled = fell(&mut server, &tree);
        server.stop();

        let summary = server.run(Duration::from_millis(1)).await;
        assert!(!summary.settled);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.discarded, scheduled);
        assert_eq!(server.world().leaf_count(WORLD), tree.leaves);
    }
}
