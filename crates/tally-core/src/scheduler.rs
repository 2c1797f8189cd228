//! Background renewal.
//!
//! [`spawn_renewal`] starts a task that runs [`RecurringEngine::renew_all`]
//! once after the configured startup delay and then on every interval tick.
//! Each run executes in its own task, so an error or a panic inside a run is
//! logged and the schedule carries on.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::engine::RecurringEngine;
use crate::error::CoreError;
use crate::store::TransactionStore;

/// Handle to a running renewal scheduler.
///
/// Dropping it leaves the scheduler running for the life of the runtime.
pub struct RenewalHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RenewalHandle {
    /// Stops the scheduler and waits for it to exit. A run in progress is
    /// allowed to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "renewal scheduler exited abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub fn spawn_renewal<S>(engine: Arc<RecurringEngine<S>>) -> Result<RenewalHandle, CoreError>
where
    S: TransactionStore + 'static,
{
    let config = engine.config().renewal.clone();
    config.validate()?;

    let (shutdown, mut stop) = watch::channel(false);
    let task_config = config.clone();
    let task = tokio::spawn(async move {
        let config = task_config;
        tokio::select! {
            _ = time::sleep(config.startup_delay()) => {}
            Ok(()) = stop.changed() => return,
        }
        run_once(&engine).await;

        let period = config.interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => run_once(&engine).await,
                Ok(()) = stop.changed() => break,
            }
        }
        tracing::debug!("renewal scheduler stopped");
    });

    tracing::info!(
        startup_delay_secs = config.startup_delay_secs,
        interval_secs = config.interval_secs,
        horizon_months = config.horizon.months,
        "renewal scheduler started"
    );
    Ok(RenewalHandle { shutdown, task })
}

async fn run_once<S>(engine: &Arc<RecurringEngine<S>>)
where
    S: TransactionStore + 'static,
{
    let engine = engine.clone();
    let run = tokio::spawn(async move { engine.renew_all(Utc::now()).await });

    match run.await {
        Ok(Ok(summary)) if !summary.is_clean() => {
            tracing::warn!(
                errors = summary.templates_with_errors,
                write_failures = summary.write_failures,
                "renewal run finished with failures"
            );
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "renewal run failed"),
        Err(e) if e.is_panic() => tracing::error!("renewal run panicked"),
        Err(e) => tracing::error!(error = %e, "renewal run was cancelled"),
    }
}
