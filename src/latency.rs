use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use log::trace;
use serenity::all::{Context as SerenityContext, ShardManager};
use statcord_charts::LatencyHistory;
use statcord_config::LATENCY_SAMPLE_INTERVAL;
use statcord_utils::task::{supervise, FailurePolicy};
use tokio::sync::RwLock;

/// Record one websocket and one REST latency sample every minute.
pub fn spawn_sampler(
    ctx: SerenityContext,
    shard_manager: Arc<ShardManager>,
    ws_latency: Arc<RwLock<LatencyHistory>>,
    rtt: Arc<RwLock<LatencyHistory>>,
) {
    tokio::spawn(async move {
        supervise(
            "Latency sampler",
            LATENCY_SAMPLE_INTERVAL,
            FailurePolicy::Ignore,
            move || {
                let ctx = ctx.clone();
                let shard_manager = shard_manager.clone();
                let ws_latency = ws_latency.clone();
                let rtt = rtt.clone();

                async move {
                    let latencies = {
                        let runners = shard_manager.runners.lock().await;
                        runners.values().map(|runner| runner.latency).collect::<Vec<_>>()
                    };

                    // Shards report no latency until their first heartbeat ack
                    if let Some(millis) = average_latency(latencies) {
                        ws_latency.write().await.push(millis);
                    }

                    let started = Instant::now();
                    ctx.http
                        .get_current_user()
                        .await
                        .context("Failed to measure REST round trip")?;
                    let elapsed = started.elapsed().as_secs_f64() * 1000.0;

                    rtt.write().await.push(elapsed);
                    trace!("Recorded REST round trip of {elapsed:.2}ms");

                    Ok::<_, anyhow::Error>(())
                }
            },
        )
        .await
    });
}

/// Mean latency in milliseconds over the shards that have one.
fn average_latency(latencies: impl IntoIterator<Item = Option<Duration>>) -> Option<f64> {
    let known = latencies.into_iter().flatten().collect::<Vec<_>>();

    if known.is_empty() {
        return None;
    }

    let total = known.iter().map(Duration::as_secs_f64).sum::<f64>();
    Some(total / known.len() as f64 * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reported_latency() {
        assert_eq!(average_latency([None, None]), None);
        assert_eq!(average_latency(Vec::new()), None);
    }

    #[test]
    fn averages_reporting_shards_only() {
        let average = average_latency([
            Some(Duration::from_millis(40)),
            None,
            Some(Duration::from_millis(60)),
        ])
        .unwrap();

        assert!((average - 50.0).abs() < 1e-9);
    }
}
