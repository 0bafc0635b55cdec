use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use remuxa_store::{CacheStore, MemStore, StorageEstimate, StoreError};
use rstest::*;
use serde::Deserialize;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::default()
                .add_directive("remuxa_store=trace".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

#[fixture]
fn store() -> MemStore {
    init_tracing();
    MemStore::new()
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn missing_entry_is_none_not_error(store: MemStore) {
    assert!(store.get("nothing").await.unwrap().is_none());
    assert!(!store.has("nothing").await.unwrap());

    // delete is idempotent
    store.delete("nothing").await.unwrap();
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn append_extends_existing_entry(store: MemStore) {
    store.create("segments", Bytes::from_static(b"one,")).await.unwrap();
    store.append("segments", Bytes::from_static(b"two,")).await.unwrap();
    store.append("segments", Bytes::from_static(b"three")).await.unwrap();

    let entry = store.get("segments").await.unwrap().expect("entry");
    assert_eq!(entry.bytes().as_ref(), b"one,two,three");
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn append_to_missing_entry_fails(store: MemStore) {
    let err = store
        .append("missing", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn rename_moves_and_replaces(store: MemStore) {
    store.create("tmp.mkv", Bytes::from_static(b"muxed")).await.unwrap();
    store.create("out.mkv", Bytes::from_static(b"stale")).await.unwrap();

    store.rename("tmp.mkv", "out.mkv").await.unwrap();

    assert!(!store.has("tmp.mkv").await.unwrap());
    let entry = store.get("out.mkv").await.unwrap().expect("entry");
    assert_eq!(entry.bytes().as_ref(), b"muxed");

    let err = store.rename("tmp.mkv", "elsewhere").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn list_is_sorted_and_clear_empties(store: MemStore) {
    for name in ["b.ass", "a.flv", "c.mkv"] {
        store.create(name, Bytes::from_static(b"x")).await.unwrap();
    }
    assert_eq!(store.list().await.unwrap(), ["a.flv", "b.ass", "c.mkv"]);

    store.clear().await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn quota_tracks_usage(store: MemStore) {
    assert_eq!(
        store.quota().await.unwrap(),
        StorageEstimate { usage: 0, quota: None }
    );

    store.create("a", Bytes::from(vec![0u8; 100])).await.unwrap();
    store.create("b", Bytes::from(vec![0u8; 28])).await.unwrap();
    assert_eq!(store.quota().await.unwrap().usage, 128);

    store.delete("a").await.unwrap();
    assert_eq!(store.quota().await.unwrap().usage, 28);
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn entry_text_and_json_conversions(store: MemStore) {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Meta {
        name: String,
        duration: u64,
    }

    store
        .create("meta.json", Bytes::from_static(br#"{"name":"ep1","duration":1440}"#))
        .await
        .unwrap();

    let entry = store.get("meta.json").await.unwrap().expect("entry");
    assert_eq!(entry.text().unwrap(), r#"{"name":"ep1","duration":1440}"#);
    assert_eq!(
        entry.json::<Meta>().unwrap(),
        Meta {
            name: "ep1".into(),
            duration: 1440
        }
    );

    store
        .create("bad.bin", Bytes::from_static(&[0xff, 0xfe]))
        .await
        .unwrap();
    let entry = store.get("bad.bin").await.unwrap().expect("entry");
    assert!(matches!(entry.text().unwrap_err(), StoreError::Utf8(_)));
    assert!(matches!(
        entry.json::<Meta>().unwrap_err(),
        StoreError::Json(_)
    ));
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn entry_streams_back_its_payload(store: MemStore) {
    let payload: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    store.create("big", Bytes::from(payload.clone())).await.unwrap();

    let entry = store.get("big").await.unwrap().expect("entry");
    let mut stream = entry.stream();
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, payload);
}

/// Concurrent read-modify-write appends must not lose updates; the store
/// serializes mutations through its FIFO mutex.
#[rstest]
#[timeout(Duration::from_secs(10))]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_appends_all_retained(store: MemStore) {
    store.create("log", Bytes::new()).await.unwrap();

    let mut writers = Vec::new();
    for i in 0..32u8 {
        let store = store.clone();
        writers.push(tokio::spawn(async move {
            store.append("log", Bytes::from(vec![i; 8])).await
        }));
    }
    for writer in writers {
        writer.await.expect("task").expect("append");
    }

    let entry = store.get("log").await.unwrap().expect("entry");
    assert_eq!(entry.len(), 32 * 8);

    // Each writer's run of 8 identical bytes lands contiguously.
    let data = entry.into_bytes();
    for chunk in data.chunks(8) {
        assert!(chunk.iter().all(|byte| *byte == chunk[0]));
    }
}
