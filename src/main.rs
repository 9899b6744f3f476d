use anyhow::Result;
use netcapacity::*;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let analyzer = Arc::new(analyzer::CapacityAnalyzer::from_config(&app_config));

    let inventory = inventory::load_inventory(&app_config.collection.inventory_path)?;
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(models::InventorySnapshot {
        cycle: 0,
        collected_at: None,
        equipment: inventory.clone(),
    }));

    let history_repo = Arc::new(
        history_repo::HistoryRepo::connect(
            &app_config.database.path,
            app_config.database.retention_days,
        )
        .await?,
    );
    history_repo.init().await?;

    let entries_saved_total = Arc::new(AtomicU64::new(0));
    let (write_tx, write_rx) =
        mpsc::channel(worker::writer_channel_capacity(app_config.database.flush_rate));
    let writer_handle = worker::spawn_history_writer(
        write_rx,
        history_repo.clone(),
        worker::HistoryWriterConfig {
            flush_rate: app_config.database.flush_rate,
            flush_interval_secs: app_config.database.flush_interval_secs,
        },
        entries_saved_total.clone(),
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let source = Arc::new(collector::SimulatedSource::new(
        app_config.collection.poll_interval_secs as f64,
    ));
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            source,
            inventory,
            snapshot_tx,
            write_tx,
            entries_saved_total,
            shutdown_rx,
        },
        worker::WorkerConfig {
            poll_interval_secs: app_config.collection.poll_interval_secs,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            collector: collector::CollectorConfig {
                max_concurrency: app_config.collection.max_concurrency,
                device_timeout: Duration::from_millis(app_config.collection.device_timeout_ms),
            },
        },
    );

    let (maintenance_shutdown_tx, maintenance_shutdown_rx) = oneshot::channel();
    let maintenance_handle = maintenance_worker::spawn(
        history_repo.clone(),
        maintenance_worker::MaintenanceConfig {
            prune_interval_secs: app_config.database.prune_interval_secs,
            vacuum_schedule: app_config.database.vacuum_schedule.clone(),
            vacuum_interval_secs: app_config.database.vacuum_interval_secs,
        },
        maintenance_shutdown_rx,
    );

    let app = routes::app(snapshot_rx, history_repo, analyzer);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }

    // Worker exit drops the writer's sender, which makes the writer flush and return.
    let _ = shutdown_tx.send(());
    let _ = maintenance_shutdown_tx.send(());
    let _ = worker_handle.await;
    let _ = writer_handle.await;
    let _ = maintenance_handle.await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
