//! Periodic reconciliation driver
//!
//! Runs the world's reconciliation cycle on a fixed tokio interval until a
//! shutdown future resolves, then drains every handler. Each cycle runs on the
//! blocking pool and is awaited inside the loop body, so cycles never overlap.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::World;

/// Clamp `hz` into `[freq_min, freq_max]`. Non-positive or non-finite rates
/// fall back to `freq_min`.
pub fn clamp_rate(hz: f64, freq_min: f64, freq_max: f64) -> f64 {
    let (lo, hi) = if freq_min <= freq_max {
        (freq_min, freq_max)
    } else {
        (freq_max, freq_min)
    };
    if !hz.is_finite() || hz <= 0.0 {
        return lo;
    }
    hz.clamp(lo, hi)
}

/// Drive `world` at `rate_hz` until `shutdown` completes.
///
/// Returns the number of cycles run.
pub async fn run_until<F>(world: &World, rate_hz: f64, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    let period = if rate_hz.is_finite() && rate_hz > 0.0 {
        Duration::try_from_secs_f64(1.0 / rate_hz).unwrap_or(Duration::from_secs(1))
    } else {
        Duration::from_secs(1)
    };
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut cycles = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                // the fetch and unsubscribe calls block, keep them off the runtime workers
                let reconciler = world.reconciler();
                let report = match tokio::task::spawn_blocking(move || reconciler.reconcile()).await {
                    Ok(report) => report,
                    Err(e) => {
                        error!("Reconciliation cycle aborted: {e}");
                        continue;
                    }
                };
                cycles += 1;
                if report.changed() {
                    info!(
                        added = ?report.added,
                        removed = ?report.removed,
                        "Point cloud topics changed"
                    );
                } else {
                    debug!("Cycle {cycles}: no change");
                }
            }
        }
    }

    for e in world.shutdown() {
        warn!("Teardown during shutdown failed: {e}");
    }
    info!("Reconciliation driver stopped after {cycles} cycles");
    cycles
}
