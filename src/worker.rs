// Background poll worker.
// Collection runs in the worker; persistence runs in a dedicated history writer task (channel).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Duration, interval};

use crate::collector::{self, CollectorConfig, CounterCache, CounterSource};
use crate::history_repo::HistoryRepo;
use crate::models::{Equipment, HistoryEntry, InventorySnapshot};

/// Channel capacity for the history writer (backpressure if the writer falls behind).
pub fn writer_channel_capacity(flush_rate: u64) -> usize {
    (flush_rate as usize * 2).max(32)
}

/// Source, channels and shutdown for the poll worker.
pub struct WorkerDeps<S> {
    pub source: Arc<S>,
    /// Inventory as loaded at startup; replaced by each completed cycle.
    pub inventory: Vec<Equipment>,
    pub snapshot_tx: watch::Sender<Arc<InventorySnapshot>>,
    pub write_tx: mpsc::Sender<HistoryEntry>,
    pub entries_saved_total: Arc<AtomicU64>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub poll_interval_secs: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
    pub collector: CollectorConfig,
}

/// Writer config: batching for the dedicated history writer task.
pub struct HistoryWriterConfig {
    pub flush_rate: u64,
    pub flush_interval_secs: u64,
}

/// Spawns the background task that receives history entries from the worker and flushes to the DB.
/// Flushes when buffer len >= flush_rate, or every flush_interval_secs, or when channel closes.
/// When the worker drops its sender, this task flushes remaining and exits.
pub fn spawn_history_writer(
    mut write_rx: mpsc::Receiver<HistoryEntry>,
    history_repo: Arc<HistoryRepo>,
    config: HistoryWriterConfig,
    entries_saved_total: Arc<AtomicU64>,
) -> tokio::task::JoinHandle<()> {
    let flush_interval = Duration::from_secs(config.flush_interval_secs);
    tokio::spawn(async move {
        let mut buffer: Vec<HistoryEntry> = Vec::new();
        let mut flush_tick = interval(flush_interval);
        flush_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = write_rx.recv() => {
                    match result {
                        Some(entry) => {
                            buffer.push(entry);
                            if buffer.len() >= config.flush_rate as usize
                                && let Err(e) = flush_buffer(&history_repo, &mut buffer, &entries_saved_total).await
                            {
                                tracing::warn!(error = %e, "history writer: append_entries failed");
                            }
                        }
                        None => break,
                    }
                }
                _ = flush_tick.tick() => {
                    if let Err(e) = flush_buffer(&history_repo, &mut buffer, &entries_saved_total).await {
                        tracing::warn!(error = %e, "history writer: append_entries failed");
                    }
                }
            }
        }
        if let Err(e) = flush_buffer(&history_repo, &mut buffer, &entries_saved_total).await {
            tracing::warn!(error = %e, "history writer: final flush failed");
        }
        tracing::debug!("History writer shutting down");
    })
}

async fn flush_buffer(
    history_repo: &HistoryRepo,
    buffer: &mut Vec<HistoryEntry>,
    entries_saved_total: &AtomicU64,
) -> anyhow::Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    let n = buffer.len();
    history_repo.append_entries(buffer).await?;
    entries_saved_total.fetch_add(n as u64, Ordering::Relaxed);
    buffer.clear();
    tracing::debug!(
        operation = "append_entries",
        entries_count = n,
        "History entries saved"
    );
    Ok(())
}

pub fn spawn<S: CounterSource>(
    deps: WorkerDeps<S>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        source,
        inventory,
        snapshot_tx,
        write_tx,
        entries_saved_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        poll_interval_secs,
        stats_log_interval_secs,
        collector: collector_config,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(poll_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut current = inventory;
        let mut cache = CounterCache::new();
        let mut cycle: u64 = 0;
        let mut devices_polled_total: u64 = 0;
        let mut devices_failed_total: u64 = 0;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let outcome = collector::collect_cycle(
                        &source,
                        std::mem::take(&mut current),
                        &mut cache,
                        collector_config,
                    )
                    .await;
                    cycle += 1;
                    devices_polled_total += outcome.polled.len() as u64;
                    devices_failed_total += outcome.failed as u64;

                    let now = chrono::Utc::now();
                    let timestamp = now.timestamp_millis();
                    // Only interval measurements reach history; first readings are baselines.
                    for e in &outcome.equipment {
                        let Some(measured) = outcome.measured.get(&e.id) else {
                            continue;
                        };
                        let entry = HistoryEntry::from_interfaces(
                            e.id,
                            timestamp,
                            e.interfaces.iter().filter(|i| measured.contains(&i.if_index)),
                        );
                        if write_tx.send(entry).await.is_err() {
                            tracing::debug!("History writer channel closed");
                            break;
                        }
                    }

                    current = outcome.equipment;
                    snapshot_tx.send_replace(Arc::new(InventorySnapshot {
                        cycle,
                        collected_at: Some(now),
                        equipment: current.clone(),
                    }));
                    tracing::debug!(
                        cycle,
                        polled = outcome.polled.len(),
                        failed = outcome.failed,
                        "snapshot published"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        cycles_total = cycle,
                        equipment_count = current.len(),
                        devices_polled_total,
                        devices_failed_total,
                        entries_saved_total = entries_saved_total.load(Ordering::Relaxed),
                        "app stats"
                    );
                }
            }
        }
    })
}
