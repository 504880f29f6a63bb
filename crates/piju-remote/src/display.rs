//! `xset` runner.
//!
//! ```text
//!   DisplayHandle::send(cmd) ── mpsc ──> worker task ── xset s … (one at a time)
//! ```
//!
//! Commands run strictly in the order they were queued and the caller never
//! waits on the child process.  Failures are logged and dropped; the screen
//! state machine does not care whether `xset` succeeded.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::screenblank::DisplayCommand;

const QUEUE_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum DisplayToolError {
    #[error("xset not found (set XSET_PATH or add it to PATH)")]
    NotFound,
    #[error("failed to run {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("xset {args} exited with {status}")]
    ExitStatus {
        args: String,
        status: std::process::ExitStatus,
    },
}

/// Cheaply cloneable sender side of the worker.
#[derive(Clone)]
pub struct DisplayHandle {
    tx: mpsc::Sender<DisplayCommand>,
}

impl DisplayHandle {
    /// Start the worker.  `xset` is the resolved binary, if any.
    pub fn spawn(xset: Option<PathBuf>) -> Self {
        match &xset {
            Some(path) => info!("display: using {}", path.display()),
            None => info!("display: no xset binary, screen commands will be dropped"),
        }
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        tokio::spawn(worker_task(xset, rx));
        Self { tx }
    }

    /// Queue commands without waiting for them to run.
    pub fn send(&self, commands: Vec<DisplayCommand>) {
        for command in commands {
            if let Err(e) = self.tx.try_send(command) {
                warn!("display: dropping {:?}: {}", command, e);
            }
        }
    }
}

async fn worker_task(xset: Option<PathBuf>, mut rx: mpsc::Receiver<DisplayCommand>) {
    while let Some(command) = rx.recv().await {
        match run_xset(xset.as_deref(), command).await {
            Ok(()) => debug!("display: ran {:?}", command),
            Err(e) => warn!("display: {}", e),
        }
    }
    debug!("display: worker exiting");
}

pub async fn run_xset(xset: Option<&Path>, command: DisplayCommand) -> Result<(), DisplayToolError> {
    let path = xset.ok_or(DisplayToolError::NotFound)?;
    let args = command.args();
    let status = tokio::process::Command::new(path)
        .args(&args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map_err(|source| DisplayToolError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;
    if !status.success() {
        return Err(DisplayToolError::ExitStatus {
            args: args.join(" "),
            status,
        });
    }
    Ok(())
}
