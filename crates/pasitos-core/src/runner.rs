//! Headless sampling loop.
//!
//! Runs the controller's timer without a screen: sleeps until the next tick,
//! samples, logs the notices, and repeats until cancelled.

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::{MapController, TickOutcome};
use crate::traits::MapSurface;

/// Summary of a headless run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks that stored a location.
    pub recorded: u32,
    /// Ticks skipped for lack of permission or fix.
    pub skipped: u32,
    /// Ticks whose write failed.
    pub failed: u32,
}

/// Sample on the controller's timer until `cancel` fires or the timer stops.
///
/// The controller must already be started. It is stopped on return.
pub async fn run_until_cancelled<M: MapSurface>(
    controller: &mut MapController<M>,
    cancel: CancellationToken,
) -> RunStats {
    let mut stats = RunStats::default();

    loop {
        let Some(deadline) = controller.timer().next_due() else {
            debug!("Sampling timer stopped");
            break;
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep_until(deadline) => {
                match controller.poll_timer(Instant::now()) {
                    Some(TickOutcome::Recorded { .. }) => stats.recorded += 1,
                    Some(TickOutcome::Skipped(_)) => stats.skipped += 1,
                    Some(TickOutcome::StoreFailed) => stats.failed += 1,
                    None => {}
                }
                for notice in controller.drain_notices() {
                    warn!("{}", notice);
                }
            }
        }
    }

    controller.stop();
    info!(
        "Sampling finished: {} recorded, {} skipped, {} failed",
        stats.recorded, stats.skipped, stats.failed
    );
    stats
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pasitos_store::Store;
    use pasitos_types::Fix;

    use super::*;
    use crate::mock::{MockBattery, MockMap, MockPermission};
    use crate::timer::SamplingTimer;

    fn started(permission: MockPermission) -> MapController<MockMap> {
        let mut controller = MapController::new(
            Store::open_in_memory().unwrap(),
            Box::new(MockBattery::new(64)),
            Box::new(permission),
            SamplingTimer::new(Duration::from_secs(300)),
        );
        controller.start(Instant::now());
        controller
            .on_map_ready(MockMap::with_fix(Fix::new(40.0, -3.0).unwrap()))
            .unwrap();
        controller
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_one_tick_per_period() {
        let mut controller = started(MockPermission::granted());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let (stats, _) = tokio::join!(run_until_cancelled(&mut controller, cancel), async {
            // Ticks at 0s, 300s and 600s
            tokio::time::sleep(Duration::from_secs(601)).await;
            trigger.cancel();
        });

        assert_eq!(stats.recorded, 3);
        assert_eq!(controller.store().count_locations().unwrap(), 3);
        assert_eq!(controller.map().unwrap().markers.len(), 3);
        assert!(!controller.timer().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipped_ticks_are_counted() {
        let mut controller = started(MockPermission::asks_user());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let (stats, _) = tokio::join!(run_until_cancelled(&mut controller, cancel), async {
            tokio::time::sleep(Duration::from_secs(301)).await;
            trigger.cancel();
        });

        assert_eq!(stats, RunStats { recorded: 0, skipped: 2, failed: 0 });
        assert_eq!(controller.store().count_locations().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_when_timer_already_stopped() {
        let mut controller = started(MockPermission::granted());
        controller.stop();

        let stats = run_until_cancelled(&mut controller, CancellationToken::new()).await;
        assert_eq!(stats, RunStats::default());
    }
}
