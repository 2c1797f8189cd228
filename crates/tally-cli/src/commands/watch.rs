use anyhow::Result;
use std::sync::Arc;
use tally_core::scheduler::spawn_renewal;

use super::Engine;

pub async fn watch(engine: Arc<Engine>) -> Result<()> {
    let renewal = engine.config().renewal.clone();
    let handle = spawn_renewal(engine)?;
    println!(
        "Renewing every {}s ({} month horizon). Press Ctrl-C to stop.",
        renewal.interval_secs, renewal.horizon.months
    );

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;
    println!("Stopped.");
    Ok(())
}
