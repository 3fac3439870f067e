//! Plants an oak in an in-memory world, fells it and watches the canopy decay.

use std::path::Path;

use anyhow::Context;
use leafdecay::{LeafDecayServer, TICK_DURATION, demo, logger};
use leafdecay_core::DecayConfig;
use leafdecay_utils::BlockPos;
use tokio::signal;

const CONFIG_PATH: &str = "config/leafdecay_config.json5";
const DEMO_WORLD: &str = "world";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init().context("failed to initialize logging")?;

    let config = DecayConfig::load_or_create(Path::new(CONFIG_PATH))
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
    let mut server = LeafDecayServer::new(config);
    let decay = server.decay();
    log::info!(
        "Decay policy {:?}, break delay {}, decay delay {}",
        decay.scheduler().policy(),
        decay.config().break_delay,
        decay.config().decay_delay
    );

    let tree = demo::plant_oak(server.world_mut(), DEMO_WORLD, BlockPos::new(0, 64, 0), 5);
    log::info!("Planted an oak with {} leaves", tree.leaves);

    let scheduled: usize = tree
        .trunk
        .iter()
        .rev()
        .map(|&pos| server.break_block(DEMO_WORLD, pos))
        .sum();
    log::info!("Felled the trunk, {scheduled} leaves scheduled for decay");

    let cancel_token = server.cancel_token.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => cancel_token.cancel(),
            Err(e) => log::warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    let summary = server.run(TICK_DURATION).await;
    log::info!(
        "Decayed {} leaves in {} ticks ({} left standing, {} checks discarded)",
        summary.decayed,
        summary.ticks,
        server.world().leaf_count(DEMO_WORLD),
        summary.discarded
    );

    Ok(())
}
