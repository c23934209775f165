//! Operator checkpoints.
//!
//! # Checkpoints
//! ```text
//! BeforeQueue       proceed? (y/n, default n)           before reading the metadata file
//! BeforeMinting     proceed? (y/n, default n)           before the first submission
//! NotReady          proceed, wait, cancel? (y/w/n, default w)
//! SubmissionFailed  proceed, wait, cancel? (y/w/n, default w)
//! ```
//!
//! These are the only cancellation points. Once a job is submitted it is
//! polled to a terminal state without asking.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::health::LivenessState;

/// A point where the operator may stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkpoint {
    BeforeQueue { metadata_file: PathBuf },
    BeforeMinting { actionable: usize },
    NotReady {
        index: Option<usize>,
        state: LivenessState,
    },
    SubmissionFailed { index: usize, error: String },
}

impl Checkpoint {
    /// Checkpoints that offer a wait option.
    fn offers_wait(&self) -> bool {
        matches!(
            self,
            Checkpoint::NotReady { .. } | Checkpoint::SubmissionFailed { .. }
        )
    }

    fn question(&self) -> String {
        match self {
            Checkpoint::BeforeQueue { metadata_file } => format!(
                "The next step will read NFT data from {}.\nWould you like to proceed? (y/n , default n):  ",
                metadata_file.display()
            ),
            Checkpoint::BeforeMinting { actionable } => format!(
                "{} NFTs are queued. The next step will start minting.\nWould you like to proceed? (y/n , default n):  ",
                actionable
            ),
            Checkpoint::NotReady { state, .. } => format!(
                "Wallet is {}. Verify the wallet is synced.\nWould you like to proceed, cancel, or wait? (y/w/n , default w):  ",
                state
            ),
            Checkpoint::SubmissionFailed { index, error } => format!(
                "Submitting NFT #{} failed: {}\nRecheck the wallet and retry this item, cancel, or wait? (y/w/n , default w):  ",
                index, error
            ),
        }
    }
}

/// What the operator chose at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Continue immediately.
    Proceed,
    /// Pause, then check the wallet again.
    Wait,
    /// Stop the run.
    Cancel,
}

/// Source of checkpoint decisions.
pub trait OperatorPrompt {
    fn decide(&mut self, checkpoint: &Checkpoint) -> impl Future<Output = Decision> + Send;
}

/// Map a typed answer to a decision, applying the checkpoint's default.
pub fn parse_answer(checkpoint: &Checkpoint, answer: &str) -> Decision {
    let answer = answer.trim();
    if checkpoint.offers_wait() {
        match answer {
            "y" | "Y" => Decision::Proceed,
            "n" | "N" => Decision::Cancel,
            _ => Decision::Wait,
        }
    } else {
        match answer {
            "y" | "Y" => Decision::Proceed,
            _ => Decision::Cancel,
        }
    }
}

/// Interactive prompt reading answers line by line, stdin by default.
///
/// A closed or failing input cancels: no operator is there to answer.
pub struct ConsolePrompt<I = BufReader<Stdin>> {
    input: I,
}

impl ConsolePrompt {
    pub fn new() -> Self {
        Self::with_input(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> ConsolePrompt<I> {
    pub fn with_input(input: I) -> Self {
        Self { input }
    }
}

impl<I: AsyncBufRead + Unpin + Send> OperatorPrompt for ConsolePrompt<I> {
    async fn decide(&mut self, checkpoint: &Checkpoint) -> Decision {
        print!("{}", checkpoint.question());
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let decision = match self.input.read_line(&mut line).await {
            Ok(0) => {
                tracing::warn!(?checkpoint, "Operator input closed, cancelling");
                Decision::Cancel
            }
            Ok(_) => parse_answer(checkpoint, &line),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read operator answer, cancelling");
                Decision::Cancel
            }
        };
        if decision == Decision::Cancel {
            println!("\n#### CANCELED ####\nMint Canceled by User\n#### CANCELED ####");
        }
        decision
    }
}

/// Non-interactive policy: accept confirmations, wait out a wallet that is
/// not ready, and stop on a failed submission rather than resubmit it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPrompt;

impl OperatorPrompt for AutoPrompt {
    async fn decide(&mut self, checkpoint: &Checkpoint) -> Decision {
        let decision = match checkpoint {
            Checkpoint::BeforeQueue { .. } | Checkpoint::BeforeMinting { .. } => Decision::Proceed,
            Checkpoint::NotReady { .. } => Decision::Wait,
            Checkpoint::SubmissionFailed { .. } => Decision::Cancel,
        };
        tracing::debug!(?checkpoint, ?decision, "Checkpoint answered automatically");
        decision
    }
}

/// Either prompt, picked from configuration.
pub enum Prompt {
    Console(ConsolePrompt),
    Auto(AutoPrompt),
}

impl Prompt {
    pub fn from_interactive(interactive: bool) -> Self {
        if interactive {
            Prompt::Console(ConsolePrompt::new())
        } else {
            Prompt::Auto(AutoPrompt)
        }
    }
}

impl OperatorPrompt for Prompt {
    async fn decide(&mut self, checkpoint: &Checkpoint) -> Decision {
        match self {
            Prompt::Console(prompt) => prompt.decide(checkpoint).await,
            Prompt::Auto(prompt) => prompt.decide(checkpoint).await,
        }
    }
}
