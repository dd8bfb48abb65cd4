//! Concurrency bound and completion barrier tests

use crate::support::fake_store::InMemoryStore;
use drive_mirror::mirror::{FailureLog, JobScheduler, MirrorDriver};
use drive_mirror::remote::RemoteStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn store_with_files(count: usize, delay: Duration) -> Arc<InMemoryStore> {
    let mut store = InMemoryStore::new();
    for i in 0..count {
        let id = format!("f-{i}");
        let name = format!("file-{i}.dat");
        store.add_file("root", &id, &name, "application/octet-stream", b"payload");
    }
    Arc::new(store.with_fetch_delay(delay))
}

async fn mirror_with_capacity(
    store: &Arc<InMemoryStore>,
    capacity: usize,
    dir: &TempDir,
) -> Arc<drive_mirror::mirror::MirrorStats> {
    let failures = Arc::new(
        FailureLog::open(
            dir.path().join("failed_folders.txt"),
            dir.path().join("failed_downloads.txt"),
        )
        .unwrap(),
    );
    let remote: Arc<dyn RemoteStore> = store.clone();
    let driver = MirrorDriver::new(remote, failures);
    let stats = driver.stats();
    let mut scheduler = JobScheduler::new(capacity);

    driver
        .mirror_tree(&mut scheduler, "root", &dir.path().join("mirror"))
        .await
        .unwrap();
    scheduler.wait_idle().await.unwrap();
    stats
}

#[tokio::test]
async fn test_in_flight_downloads_never_exceed_capacity() {
    let store = store_with_files(20, Duration::from_millis(25));
    let dir = TempDir::new().unwrap();

    mirror_with_capacity(&store, 3, &dir).await;

    let max = store.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 3, "observed {max} concurrent fetches with capacity 3");
    // The pool actually ran downloads in parallel, not one at a time.
    assert!(max >= 2, "expected overlapping fetches, observed {max}");
}

#[tokio::test]
async fn test_single_worker_serializes_downloads() {
    let store = store_with_files(6, Duration::from_millis(10));
    let dir = TempDir::new().unwrap();

    mirror_with_capacity(&store, 1, &dir).await;

    assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_barrier_guarantees_every_job_finished() {
    let store = store_with_files(12, Duration::from_millis(20));
    let dir = TempDir::new().unwrap();

    // mirror_with_capacity returns only after wait_idle; every file must
    // be at its final path by then, with no temp artifacts left behind.
    let stats = mirror_with_capacity(&store, 4, &dir).await;

    assert_eq!(stats.files_downloaded.load(Ordering::Relaxed), 12);
    let root = dir.path().join("mirror");
    for i in 0..12 {
        assert!(root.join(format!("file-{i}.dat")).exists());
        assert!(!root.join(format!("file-{i}.dat.temp")).exists());
    }
}
