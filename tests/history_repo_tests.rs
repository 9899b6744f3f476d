// HistoryRepo tests: connect, init, append, windowed reads, prune

mod common;

use common::*;
use netcapacity::history_repo::HistoryRepo;
use netcapacity::models::*;
use tempfile::TempDir;

async fn open_repo(dir: &TempDir, retention_days: u32) -> HistoryRepo {
    let path = dir.path().join("history.db");
    let repo = HistoryRepo::connect(path.to_str().unwrap(), retention_days)
        .await
        .unwrap();
    repo.init().await.unwrap();
    repo
}

fn entry(equipment_id: u64, timestamp: i64, out: f64) -> HistoryEntry {
    HistoryEntry {
        equipment_id,
        timestamp,
        interfaces: vec![InterfaceSample {
            name: "Gi0/1".into(),
            in_utilization: 1.5,
            out_utilization: out,
            status: InterfaceStatus::Up,
            speed_bps: 1_000_000_000,
        }],
    }
}

#[tokio::test]
async fn history_repo_connect_and_init() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir, 90).await;
    // Second init is no-op (IF NOT EXISTS)
    repo.init().await.unwrap();
    assert_eq!(repo.count_entries().await.unwrap(), 0);
}

#[tokio::test]
async fn history_repo_creates_missing_parent_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("history.db");
    let repo = HistoryRepo::connect(path.to_str().unwrap(), 1).await.unwrap();
    repo.init().await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn history_repo_append_and_read_back() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir, 90).await;

    let e = equipment(
        5,
        "r5",
        NetworkDomain::Backbone,
        vec![up(1, "Gi0/1", 12.5, 40.0), down(2, "Gi0/2")],
    );
    let original = HistoryEntry::from_equipment(&e, 1_000);
    repo.append_entries(std::slice::from_ref(&original))
        .await
        .unwrap();

    let back = repo.entries_for_equipment(5, 0).await.unwrap();
    assert_eq!(back, vec![original]);
}

#[tokio::test]
async fn history_repo_reads_are_sorted_and_windowed() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir, 90).await;

    // Appended out of order.
    repo.append_entries(&[
        entry(1, 3_000, 30.0),
        entry(1, 1_000, 10.0),
        entry(2, 2_500, 99.0),
        entry(1, 2_000, 20.0),
    ])
    .await
    .unwrap();

    let one = repo.entries_for_equipment(1, 1_500).await.unwrap();
    let ts: Vec<i64> = one.iter().map(|e| e.timestamp).collect();
    assert_eq!(ts, vec![2_000, 3_000]);
    assert!(one.iter().all(|e| e.equipment_id == 1));

    let all = repo.entries_since(0).await.unwrap();
    let ts: Vec<i64> = all.iter().map(|e| e.timestamp).collect();
    assert_eq!(ts, vec![1_000, 2_000, 2_500, 3_000]);

    let recent = repo.recent_entries(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[1].timestamp, 2_000);

    assert!(repo.entries_for_equipment(42, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_repo_prune_removes_old_rows() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir, 1).await;
    let now = chrono::Utc::now().timestamp_millis();

    repo.append_entries(&[
        entry(1, now - 3 * MS_PER_DAY, 10.0),
        entry(1, now - 2 * MS_PER_DAY, 20.0),
        entry(1, now - 1_000, 30.0),
    ])
    .await
    .unwrap();

    let pruned = repo.prune_old_data().await.unwrap();
    assert_eq!(pruned, 2);
    let left = repo.entries_since(0).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].interfaces[0].out_utilization, 30.0);

    repo.vacuum().await.unwrap();
}

#[tokio::test]
async fn history_repo_prune_before_cutoff() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir, 90).await;
    repo.append_entries(&[entry(1, 100, 1.0), entry(1, 200, 2.0), entry(1, 300, 3.0)])
        .await
        .unwrap();
    assert_eq!(repo.prune_before(250).await.unwrap(), 2);
    assert_eq!(repo.count_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn history_repo_append_empty_is_noop() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir, 90).await;
    repo.append_entries(&[]).await.unwrap();
    assert_eq!(repo.count_entries().await.unwrap(), 0);
}
