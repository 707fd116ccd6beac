use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    store::{local_store::LocalStore, routine_store::RoutineStore},
    utils::{clock::Clock, time::next_day_start},
};

/// Clears the completion set when local wall-clock time crosses midnight. This is the
/// only state transition not triggered by the user.
pub struct RolloverScheduler<S: LocalStore> {
    store: RoutineStore<S>,
    shutdown: CancellationToken,
    time_provider: Box<dyn Clock>,
}

impl<S: LocalStore> RolloverScheduler<S> {
    pub fn new(
        store: RoutineStore<S>,
        shutdown: CancellationToken,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            store,
            shutdown,
            time_provider,
        }
    }

    /// Executes the rollover event loop.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let now = self.time_provider.time();
            let wait = (next_day_start(now) - now).to_std().unwrap_or_default();
            let rollover_point = self.time_provider.instant() + wait;

            tokio::select! {
                // Cancelation stops the event loop. History for prior days stays as it
                // was persisted on the last mutation.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(rollover_point) => ()
            }

            match self.store.rollover().await {
                Ok(()) => {
                    info!("Rolled over to {}", self.time_provider.today())
                }
                Err(e) => {
                    error!("Encountered an error during rollover {:?}", e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::tempdir;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::{
        store::{
            local_store::{FileStore, LocalStore, COMPLETED_TASKS_KEY},
            routine_store::RoutineStore,
        },
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    use super::RolloverScheduler;

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Local>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Local> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    /// Runs the scheduler across a simulated midnight and checks that today's
    /// completions were cleared while history survived.
    #[tokio::test(start_paused = true)]
    async fn test_rollover_fires_at_midnight() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let test_clock = TestClock {
            start_time: Local.with_ymd_and_hms(2025, 3, 7, 23, 59, 30).unwrap(),
            reference: Instant::now(),
        };

        let mut store = RoutineStore::open(
            FileStore::new(dir.path().to_owned())?,
            Box::new(test_clock.clone()),
        )
        .await;
        store.toggle_completion("breakfast").await?;

        let scheduler_store = RoutineStore::open(
            FileStore::new(dir.path().to_owned())?,
            Box::new(test_clock.clone()),
        )
        .await;
        let shutdown_token = CancellationToken::new();
        let scheduler = RolloverScheduler::new(
            scheduler_store,
            shutdown_token.clone(),
            Box::new(test_clock.clone()),
        );
        let handle = tokio::spawn(scheduler.run());

        // Half a minute to midnight; a paused-clock minute is enough.
        tokio::time::sleep(Duration::from_secs(60)).await;
        shutdown_token.cancel();
        handle.await??;

        let storage = FileStore::new(dir.path().to_owned())?;
        assert_eq!(storage.get(COMPLETED_TASKS_KEY).await?, None);

        let reopened =
            RoutineStore::open(storage, Box::new(test_clock.clone())).await;
        assert!(reopened.completed().is_empty());
        assert_eq!(
            reopened
                .history()
                .get("2025-03-07")
                .map(|ids| ids.len()),
            Some(1)
        );
        Ok(())
    }
}
