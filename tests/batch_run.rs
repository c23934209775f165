//! Full batch runs: startup checks, checkpoints and cursor persistence.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nft_bulk_minter::config::MinterConfig;
use nft_bulk_minter::health::LivenessState;
use nft_bulk_minter::lifecycle::{run_batch_with, Checkpoint, Clock, Decision};
use nft_bulk_minter::observability::MintEvent;
use nft_bulk_minter::queue::{CursorStore, SavedCursor};
use nft_bulk_minter::rpc::wallet::ops;
use nft_bulk_minter::rpc::RpcError;
use nft_bulk_minter::{MinterError, RunOutcome};

mod common;
use common::{
    defaults, metadata_csv, sync, unreachable, ManualClock, RecordingObserver, ScriptedPrompt,
    ScriptedWallet,
};

fn config(dir: &Path, rows: usize) -> MinterConfig {
    let metadata_file = dir.join("bulk_mint_metadata.csv");
    std::fs::write(&metadata_file, metadata_csv(rows)).unwrap();

    let mut config = MinterConfig::default();
    config.mint = defaults();
    config.batch.metadata_file = metadata_file;
    config
}

#[tokio::test]
async fn test_batch_passes_every_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 2);
    let wallet = ScriptedWallet::healthy();
    let prompt = ScriptedPrompt::default();
    let observer = RecordingObserver::default();

    let summary = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        prompt.clone(),
        observer.clone(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.minted.len(), 2);
    assert_eq!(
        prompt.seen(),
        vec![
            Checkpoint::BeforeQueue {
                metadata_file: config.batch.metadata_file.clone()
            },
            Checkpoint::BeforeMinting { actionable: 2 },
        ]
    );

    let events = observer.events();
    assert!(events.contains(&MintEvent::QueueBuilt {
        items: 3,
        actionable: 2,
        cursor: 1
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        MintEvent::WalletChecked { network: Some(n), .. } if n == "mainnet"
    )));
    // The network is confirmed before anything is minted.
    let calls = wallet.calls();
    assert_eq!(calls[0].0, ops::GET_SYNC_STATUS);
    assert_eq!(calls[1].0, ops::GET_NETWORK_INFO);
}

#[tokio::test]
async fn test_cancel_before_minting() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 2);
    let wallet = ScriptedWallet::healthy();

    let summary = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        ScriptedPrompt::answering([Decision::Proceed, Decision::Cancel]),
        RecordingObserver::default(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert_eq!(summary.final_cursor, 1);
    assert_eq!(wallet.count(ops::NFT_MINT_NFT), 0);
}

#[tokio::test]
async fn test_cancel_before_queue_never_reads_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 2);
    config.batch.metadata_file = dir.path().join("missing.csv");

    let summary = run_batch_with(
        &config,
        ScriptedWallet::healthy(),
        ManualClock::default(),
        ScriptedPrompt::answering([Decision::Cancel]),
        RecordingObserver::default(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Cancelled);
}

#[tokio::test]
async fn test_missing_metadata_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 2);
    config.batch.metadata_file = dir.path().join("missing.csv");
    let wallet = ScriptedWallet::healthy();

    let err = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        RecordingObserver::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MinterError::Metadata(_)));
    assert_eq!(wallet.count(ops::NFT_MINT_NFT), 0);
}

#[tokio::test]
async fn test_malformed_row_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 0);
    std::fs::write(
        &config.batch.metadata_file,
        format!("{}h1,https://img.example/1.png,,,,,three,10\n", metadata_csv(0)),
    )
    .unwrap();
    let wallet = ScriptedWallet::healthy();

    let err = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        RecordingObserver::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MinterError::Metadata(_)));
    assert_eq!(wallet.count(ops::NFT_MINT_NFT), 0);
}

#[tokio::test]
async fn test_network_mismatch_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 2);
    config.batch.expected_network = Some("testnet11".into());
    let wallet = ScriptedWallet::healthy();

    let err = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        RecordingObserver::default(),
    )
    .await
    .unwrap_err();

    match err {
        MinterError::NetworkMismatch { expected, actual } => {
            assert_eq!(expected, "testnet11");
            assert_eq!(actual, "mainnet");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(wallet.count(ops::NFT_MINT_NFT), 0);
}

#[tokio::test]
async fn test_unreachable_wallet_at_startup_is_retryable() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 1);
    let wallet = ScriptedWallet::healthy();
    wallet
        .push(ops::GET_SYNC_STATUS, Err(unreachable(ops::GET_SYNC_STATUS)))
        .push(ops::GET_SYNC_STATUS, Ok(sync(false, true)));
    let clock = ManualClock::default();

    let summary = run_batch_with(
        &config,
        wallet.clone(),
        clock.clone(),
        ScriptedPrompt::default(),
        RecordingObserver::default(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.minted.len(), 1);
    assert_eq!(clock.sleeps().len(), 2);
}

#[tokio::test]
async fn test_network_lookup_failure_is_retryable() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 1);
    config.batch.expected_network = Some("mainnet".into());
    let wallet = ScriptedWallet::healthy();
    wallet.push(ops::GET_NETWORK_INFO, Err(unreachable(ops::GET_NETWORK_INFO)));
    let clock = ManualClock::default();
    let prompt = ScriptedPrompt::default();

    let summary = run_batch_with(
        &config,
        wallet.clone(),
        clock.clone(),
        prompt.clone(),
        RecordingObserver::default(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.minted.len(), 1);
    assert_eq!(wallet.count(ops::GET_NETWORK_INFO), 2);
    // One backoff pause before the network was checked again.
    assert_eq!(clock.sleeps().len(), 1);
    assert!(matches!(
        prompt.seen()[0],
        Checkpoint::NotReady {
            index: None,
            state: LivenessState::Unreachable
        }
    ));
}

#[tokio::test]
async fn test_cursor_file_resumes_an_interrupted_batch() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 3);
    let cursor_file = dir.path().join("cursor.json");
    config.batch.cursor_file = Some(cursor_file.clone());

    // First run: the second submission fails and the automatic policy stops.
    let wallet = ScriptedWallet::healthy();
    wallet.push(ops::NFT_MINT_NFT, Ok(common::minted("nft1first"))).push(
        ops::NFT_MINT_NFT,
        Err(RpcError::Timeout {
            operation: ops::NFT_MINT_NFT.into(),
            secs: 10,
        }),
    );
    let summary = run_batch_with(
        &config,
        wallet,
        ManualClock::default(),
        ScriptedPrompt::default(),
        RecordingObserver::default(),
    )
    .await
    .unwrap();
    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert_eq!(summary.final_cursor, 2);

    let store = CursorStore::new(&cursor_file, &config.batch.metadata_file);
    assert_eq!(store.load().unwrap().map(|s| s.cursor), Some(2));

    // Second run picks up at the saved cursor.
    let observer = RecordingObserver::default();
    let summary = run_batch_with(
        &config,
        ScriptedWallet::healthy(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        observer.clone(),
    )
    .await
    .unwrap();
    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(observer.submitted_indexes(), vec![2, 3]);
    assert_eq!(store.load().unwrap().map(|s| s.cursor), Some(4));
}

/// Clock that reads the cursor file whenever the run pauses.
#[derive(Clone)]
struct CursorSnapshots {
    store: CursorStore,
    seen: Arc<Mutex<Vec<Option<SavedCursor>>>>,
}

impl Clock for CursorSnapshots {
    async fn sleep(&self, _duration: Duration) {
        let saved = self.store.load().unwrap();
        self.seen.lock().unwrap().push(saved);
    }
}

#[tokio::test]
async fn test_accepted_mint_is_saved_before_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 2);
    let cursor_file = dir.path().join("cursor.json");
    config.batch.cursor_file = Some(cursor_file.clone());
    let store = CursorStore::new(&cursor_file, &config.batch.metadata_file);

    // The first asset is not indexed on the first poll, so the run pauses
    // while item 1 is confirming.
    let wallet = ScriptedWallet::healthy();
    wallet.push(ops::NFT_GET_INFO, Err(unreachable(ops::NFT_GET_INFO)));
    let clock = CursorSnapshots {
        store: store.clone(),
        seen: Arc::default(),
    };

    let summary = run_batch_with(
        &config,
        wallet,
        clock.clone(),
        ScriptedPrompt::default(),
        RecordingObserver::default(),
    )
    .await
    .unwrap();
    assert_eq!(summary.minted.len(), 2);

    let seen = clock.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    let during = seen[0].clone().unwrap();
    assert_eq!(during.cursor, 1);
    assert_eq!(during.in_flight.as_deref(), Some("nft1minted"));

    let after = store.load().unwrap().unwrap();
    assert_eq!(after.cursor, 3);
    assert!(after.in_flight.is_none());
}

#[tokio::test]
async fn test_in_flight_mint_is_polled_not_resubmitted() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 3);
    let cursor_file = dir.path().join("cursor.json");
    config.batch.cursor_file = Some(cursor_file.clone());
    // An earlier run was killed while item 1 was confirming.
    let store = CursorStore::new(&cursor_file, &config.batch.metadata_file);
    store.save_in_flight(1, "nft1pending").unwrap();

    let wallet = ScriptedWallet::healthy();
    let observer = RecordingObserver::default();
    let summary = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        observer.clone(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.submitted, 2);
    assert_eq!(observer.submitted_indexes(), vec![2, 3]);
    assert_eq!(wallet.count(ops::NFT_MINT_NFT), 2);
    assert_eq!(
        wallet.payloads(ops::NFT_GET_INFO)[0],
        serde_json::json!({"coin_id": "nft1pending"})
    );
    assert_eq!(summary.minted[0].index, 1);
    assert_eq!(summary.minted[0].remote_id, "nft1pending");
    assert!(observer.events().contains(&MintEvent::Resumed {
        index: 1,
        remote_id: "nft1pending".into()
    }));
    assert_eq!(store.load().unwrap().map(|s| s.cursor), Some(4));
}

#[tokio::test]
async fn test_explicit_start_ignores_in_flight_mint() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 2);
    let cursor_file = dir.path().join("cursor.json");
    CursorStore::new(&cursor_file, &config.batch.metadata_file)
        .save_in_flight(1, "nft1pending")
        .unwrap();
    config.batch.cursor_file = Some(cursor_file);
    config.batch.start = Some(2);

    let wallet = ScriptedWallet::healthy();
    let observer = RecordingObserver::default();
    run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        observer.clone(),
    )
    .await
    .unwrap();

    assert_eq!(observer.submitted_indexes(), vec![2]);
    assert!(!observer
        .events()
        .iter()
        .any(|e| matches!(e, MintEvent::Resumed { .. })));
}

#[tokio::test]
async fn test_explicit_start_overrides_saved_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 3);
    let cursor_file = dir.path().join("cursor.json");
    CursorStore::new(&cursor_file, &config.batch.metadata_file)
        .save(3)
        .unwrap();
    config.batch.cursor_file = Some(cursor_file);
    config.batch.start = Some(1);

    let observer = RecordingObserver::default();
    run_batch_with(
        &config,
        ScriptedWallet::healthy(),
        ManualClock::default(),
        ScriptedPrompt::default(),
        observer.clone(),
    )
    .await
    .unwrap();

    assert_eq!(observer.submitted_indexes(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_exhausted_batch_finishes_without_minting() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), 3);
    config.batch.start = Some(7);
    let wallet = ScriptedWallet::healthy();
    let prompt = ScriptedPrompt::default();

    let summary = run_batch_with(
        &config,
        wallet.clone(),
        ManualClock::default(),
        prompt.clone(),
        RecordingObserver::default(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.final_cursor, 4);
    assert_eq!(wallet.count(ops::NFT_MINT_NFT), 0);
    // Nothing to confirm, so no BeforeMinting checkpoint.
    assert_eq!(prompt.seen().len(), 1);
}
