//! Batch startup.
//!
//! # Responsibilities
//! - Build the wallet client and the checkpoint prompt from configuration
//! - Confirm the wallet network before touching the metadata file
//! - Build the queue, resolve the start cursor, hand over to the orchestrator
//! - Hand a saved in-flight mint back to the orchestrator so it is polled,
//!   not submitted again
//!
//! # Design Decisions
//! - Fail fast: unreadable input or an unwritable cursor file stops the run
//!   before any submission
//! - Every run gets a `run_id` span so log lines of one batch can be grouped

use tracing::Instrument;
use uuid::Uuid;

use crate::config::MinterConfig;
use crate::error::{MinterError, MinterResult};
use crate::lifecycle::checkpoint::{Checkpoint, OperatorPrompt, Prompt};
use crate::lifecycle::clock::{Clock, TokioClock};
use crate::metadata::read_metadata_file;
use crate::minting::{Flow, Orchestrator, OrchestratorSettings, RunSummary};
use crate::observability::{MintEvent, MintObserver, TracingObserver};
use crate::queue::{CursorStore, MintQueue};
use crate::rpc::{RpcClient, WalletApi, WalletRpc};

/// Run a batch against the configured wallet with the console (or automatic)
/// prompt and real time.
pub async fn run_batch(config: &MinterConfig) -> MinterResult<RunSummary> {
    let rpc = RpcClient::new(&config.wallet_rpc)?;
    let prompt = Prompt::from_interactive(config.checkpoint.interactive);
    run_batch_with(config, rpc, TokioClock, prompt, TracingObserver).await
}

/// Run a batch with explicit collaborators.
pub async fn run_batch_with<R, C, P, O>(
    config: &MinterConfig,
    rpc: R,
    clock: C,
    prompt: P,
    observer: O,
) -> MinterResult<RunSummary>
where
    R: WalletRpc,
    C: Clock,
    P: OperatorPrompt,
    O: MintObserver,
{
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("mint_run", %run_id);
    execute(config, rpc, clock, prompt, observer)
        .instrument(span)
        .await
}

async fn execute<R, C, P, O>(
    config: &MinterConfig,
    rpc: R,
    clock: C,
    prompt: P,
    observer: O,
) -> MinterResult<RunSummary>
where
    R: WalletRpc,
    C: Clock,
    P: OperatorPrompt,
    O: MintObserver,
{
    let batch = &config.batch;
    tracing::info!(
        endpoint = %config.wallet_rpc.endpoint,
        metadata_file = ?batch.metadata_file,
        wallet_id = config.mint.wallet_id,
        targets = batch.targets,
        "Starting minting run"
    );

    let mut orchestrator = Orchestrator::new(
        WalletApi::new(rpc),
        clock,
        prompt,
        observer,
        OrchestratorSettings::from_config(config),
    );

    if orchestrator
        .confirm_network(batch.expected_network.as_deref())
        .await?
        == Flow::Cancelled
    {
        return Ok(cancelled(&orchestrator, 1));
    }

    let checkpoint = Checkpoint::BeforeQueue {
        metadata_file: batch.metadata_file.clone(),
    };
    if orchestrator.confirm(checkpoint).await == Flow::Cancelled {
        return Ok(cancelled(&orchestrator, 1));
    }

    let records = read_metadata_file(&batch.metadata_file, &config.mint, batch.targets)?;

    let cursor_store = batch
        .cursor_file
        .as_ref()
        .map(|path| CursorStore::new(path, &batch.metadata_file));
    let (start, in_flight) = match (batch.start, &cursor_store) {
        (Some(start), _) => (Some(start), None),
        (None, Some(store)) => match store.load().map_err(|source| cursor_error(store, source))? {
            Some(saved) => (
                Some(saved.cursor as i64),
                saved.in_flight.map(|remote_id| (saved.cursor, remote_id)),
            ),
            None => (None, None),
        },
        (None, None) => (None, None),
    };

    let mut queue = MintQueue::new(records, start);
    let in_flight = in_flight.filter(|(cursor, _)| *cursor == queue.cursor());
    orchestrator.emit(MintEvent::QueueBuilt {
        items: queue.len(),
        actionable: queue.actionable(),
        cursor: queue.cursor(),
    });

    if let Some(store) = &cursor_store {
        match &in_flight {
            Some((cursor, remote_id)) => store.save_in_flight(*cursor, remote_id),
            None => store.save(queue.cursor()),
        }
        .map_err(|source| cursor_error(store, source))?;
    }
    let mut orchestrator = orchestrator
        .with_cursor_store(cursor_store)
        .with_in_flight(in_flight);

    if queue.actionable() > 0 {
        let checkpoint = Checkpoint::BeforeMinting {
            actionable: queue.actionable(),
        };
        if orchestrator.confirm(checkpoint).await == Flow::Cancelled {
            return Ok(cancelled(&orchestrator, queue.cursor()));
        }
    }

    orchestrator.run(&mut queue).await
}

fn cancelled<R, C, P, O>(orchestrator: &Orchestrator<R, C, P, O>, cursor: usize) -> RunSummary
where
    R: WalletRpc,
    C: Clock,
    P: OperatorPrompt,
    O: MintObserver,
{
    orchestrator.emit(MintEvent::Cancelled { cursor });
    RunSummary::cancelled(cursor)
}

fn cursor_error(store: &CursorStore, source: std::io::Error) -> MinterError {
    MinterError::Cursor {
        path: store.path().display().to_string(),
        source,
    }
}
