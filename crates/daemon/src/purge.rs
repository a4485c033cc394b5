// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retained-state hygiene: broker-side purge of retained messages.
//!
//! Shells out to a mosquitto_sub with retained-message removal support,
//! deleting everything under `#` except the control and options topics.
//! Best-effort: a purge failure is logged and the session continues.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Window the purge subscriber is given to sweep retained messages.
const PURGE_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("purge spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Invocation of the external purge helper.
#[derive(Debug, Clone)]
pub struct MosquittoPurge {
    bin: PathBuf,
    host: String,
}

impl MosquittoPurge {
    pub fn new(bin: impl Into<PathBuf>, host: impl Into<String>) -> Self {
        MosquittoPurge { bin: bin.into(), host: host.into() }
    }

    /// Remove every retained message except those on the `keep` topics.
    pub async fn run(&self, keep: &[String]) -> Result<(), PurgeError> {
        tracing::info!(host = %self.host, ?keep, "purging retained topics");
        let mut cmd = Command::new(&self.bin);
        cmd.arg("-h").arg(&self.host).arg("-t").arg("#");
        for topic in keep {
            cmd.arg("-T").arg(topic);
        }
        cmd.arg("--remove-retained").arg("--retained-only");
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        let mut child = cmd.spawn()?;
        // The subscriber stays attached forever on its own; give it a short
        // sweep window, then reap it.
        match tokio::time::timeout(PURGE_WINDOW, child.wait()).await {
            Ok(status) => {
                status?;
            }
            Err(_) => {
                let _ = child.kill().await;
            }
        }
        Ok(())
    }
}
