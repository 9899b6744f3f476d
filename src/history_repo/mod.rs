// SQLite interface history. One row per equipment per collection cycle; the interface samples
// of that cycle are stored as a versioned wincode blob.

mod blob;

use std::path::Path;
use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::models::{HistoryEntry, InterfaceSample};

pub struct HistoryRepo {
    pool: SqlitePool,
    retention_ms: i64,
}

impl HistoryRepo {
    pub async fn connect(path: &str, retention_days: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let retention_ms = i64::from(retention_days) * 24 * 60 * 60 * 1000;
        Ok(Self { pool, retention_ms })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interface_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                equipment_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                interface_data BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_interface_history_equipment_created_at ON interface_history(equipment_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_interface_history_created_at ON interface_history(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends all entries in one transaction.
    #[instrument(skip(self, entries), fields(repo = "history", operation = "append_entries", entries_count = entries.len()))]
    pub async fn append_entries(&self, entries: &[HistoryEntry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for e in entries {
            let interface_data = blob::with_version_prefix(
                blob::BLOB_VERSION_INTERFACES,
                wincode::serialize(&e.interfaces).map_err(|err| anyhow::anyhow!("wincode: {}", err))?,
            );
            let equipment_id = i64::try_from(e.equipment_id)
                .map_err(|_| anyhow::anyhow!("equipment id {} out of range", e.equipment_id))?;
            sqlx::query(
                "INSERT INTO interface_history (equipment_id, created_at, interface_data) VALUES ($1, $2, $3)",
            )
            .bind(equipment_id)
            .bind(e.timestamp)
            .bind(&interface_data)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Entries of one equipment with `created_at >= from_ts`. Order: ascending by created_at.
    #[instrument(skip(self), fields(repo = "history", operation = "entries_for_equipment"))]
    pub async fn entries_for_equipment(
        &self,
        equipment_id: u64,
        from_ts: i64,
    ) -> anyhow::Result<Vec<HistoryEntry>> {
        let Ok(equipment_id) = i64::try_from(equipment_id) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            "SELECT equipment_id, created_at, interface_data FROM interface_history
             WHERE equipment_id = $1 AND created_at >= $2 ORDER BY created_at ASC, id ASC",
        )
        .bind(equipment_id)
        .bind(from_ts)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::parse_entry_row).collect()
    }

    /// Entries of every equipment with `created_at >= from_ts`. Order: ascending by created_at.
    #[instrument(skip(self), fields(repo = "history", operation = "entries_since"))]
    pub async fn entries_since(&self, from_ts: i64) -> anyhow::Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            "SELECT equipment_id, created_at, interface_data FROM interface_history
             WHERE created_at >= $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(from_ts)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::parse_entry_row).collect()
    }

    /// Latest `limit` entries across all equipment, oldest first.
    pub async fn recent_entries(&self, limit: u32) -> anyhow::Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            "SELECT equipment_id, created_at, interface_data FROM interface_history ORDER BY id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        let mut out = rows
            .iter()
            .map(Self::parse_entry_row)
            .collect::<anyhow::Result<Vec<_>>>()?;
        out.reverse();
        Ok(out)
    }

    pub async fn count_entries(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interface_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Deletes entries older than the retention window. Returns the number of rows removed.
    #[instrument(skip(self), fields(repo = "history", operation = "prune_old_data"))]
    pub async fn prune_old_data(&self) -> anyhow::Result<u64> {
        let cutoff = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis() as i64)
            - self.retention_ms;
        self.prune_before(cutoff).await
    }

    /// Deletes entries with `created_at < cutoff_ts`.
    pub async fn prune_before(&self, cutoff_ts: i64) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM interface_history WHERE created_at < $1")
            .bind(cutoff_ts)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Reclaim space after deletes (run periodically after pruning).
    #[instrument(skip(self), fields(repo = "history", operation = "vacuum"))]
    pub async fn vacuum(&self) -> anyhow::Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    fn parse_entry_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<HistoryEntry> {
        let equipment_id: i64 = row.try_get("equipment_id")?;
        let created_at: i64 = row.try_get("created_at")?;
        let interface_data: Vec<u8> = row.try_get("interface_data")?;
        Ok(HistoryEntry {
            equipment_id: equipment_id.max(0) as u64,
            timestamp: created_at,
            interfaces: deserialize_interface_data(&interface_data),
        })
    }
}

/// Deserialize interface_data; on an unknown version or corrupt blob return empty and log.
fn deserialize_interface_data(bytes: &[u8]) -> Vec<InterfaceSample> {
    let Some(payload) = blob::blob_payload(bytes, blob::BLOB_VERSION_INTERFACES) else {
        tracing::debug!("interface_data has an unknown version prefix, using empty");
        return Vec::new();
    };
    wincode::deserialize(payload).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "wincode deserialize interfaces (corrupt), using empty");
        Vec::new()
    })
}
