use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::cleanup::CleanupService;

/// Runs the cleanup sweep on a fixed cadence in a background task.
///
/// The first sweep is delayed a few seconds so startup is not blocked by
/// maintenance work. A failed sweep is logged and the next tick runs on
/// schedule; because sweeps are idempotent, missed work is simply picked up
/// then.
pub struct CleanupScheduler {
  service: Arc<CleanupService>,
  startup_delay: Duration,
  interval: Duration,
  cancel: CancellationToken,
  handle: Option<JoinHandle<()>>,
}

impl CleanupScheduler {
  pub fn new(service: Arc<CleanupService>, startup_delay: Duration, interval: Duration) -> Self {
    Self {
      service,
      startup_delay,
      interval,
      cancel: CancellationToken::new(),
      handle: None,
    }
  }

  /// Spawns the sweep loop. Calling start twice replaces nothing; the
  /// second call is ignored.
  pub fn start(&mut self) {
    if self.handle.is_some() {
      return;
    }

    let service = self.service.clone();
    let cancel = self.cancel.clone();
    let startup_delay = self.startup_delay;
    let interval = self.interval;

    self.handle = Some(tokio::spawn(async move {
      tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(startup_delay) => {}
      }

      loop {
        run_tick(&service).await;

        tokio::select! {
          _ = cancel.cancelled() => return,
          _ = tokio::time::sleep(interval) => {}
        }
      }
    }));
  }

  /// Cancels the loop and waits for the task to finish. An in-flight sweep
  /// completes before the task exits.
  pub async fn stop(&mut self) {
    self.cancel.cancel();
    if let Some(handle) = self.handle.take() {
      if let Err(e) = handle.await {
        tracing::error!(error = %e, "cleanup task panicked");
      }
    }
  }
}

async fn run_tick(service: &CleanupService) {
  match service.run_sweep().await {
    Ok(report) => {
      if report.warned > 0 || report.purged_sold > 0 || report.purged_expired > 0 {
        tracing::info!(
          warned = report.warned,
          purged_sold = report.purged_sold,
          purged_expired = report.purged_expired,
          "cleanup sweep finished"
        );
      } else {
        tracing::debug!("cleanup sweep finished, nothing to do");
      }
    }
    Err(e) => {
      tracing::error!(error = %e, "cleanup sweep failed, will retry next tick");
    }
  }
}
