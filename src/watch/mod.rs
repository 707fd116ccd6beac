use std::path::PathBuf;

use anyhow::Result;
use rollover::RolloverScheduler;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    store::{local_store::FileStore, routine_store::RoutineStore},
    utils::clock::DefaultClock,
};

pub mod rollover;
pub mod shutdown;

/// Represents the starting point for a watch session. Keeps completion state rolling
/// over at local midnight until interrupted.
pub async fn start_watch(dir: PathBuf) -> Result<()> {
    let storage = FileStore::new(dir)?;
    let store = RoutineStore::open(storage, Box::new(DefaultClock)).await;

    let shutdown_token = CancellationToken::new();
    let scheduler =
        RolloverScheduler::new(store, shutdown_token.clone(), Box::new(DefaultClock));

    println!("Watching for midnight rollover. Press ctrl-c to stop.");
    let (_, rollover_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        scheduler.run(),
    );

    if let Err(rollover_result) = rollover_result {
        error!("Rollover scheduler got an error {:?}", rollover_result);
    }

    Ok(())
}
