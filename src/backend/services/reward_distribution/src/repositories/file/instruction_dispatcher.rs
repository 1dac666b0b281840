use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::models::AccountName;
use crate::repositories::traits::PayoutDispatcher;

/// One transfer for an external signer to broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub from: AccountName,
    pub to: AccountName,
    pub amount: Decimal,
    pub memo: String,
}

/// Appends transfers as JSON lines instead of broadcasting them.
pub struct InstructionFileDispatcher {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl InstructionFileDispatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl PayoutDispatcher for InstructionFileDispatcher {
    async fn transfer(
        &self,
        from: &AccountName,
        to: &AccountName,
        amount: Decimal,
        memo: &str,
    ) -> Result<()> {
        let instruction = TransferInstruction {
            from: from.clone(),
            to: to.clone(),
            amount,
            memo: memo.to_string(),
        };
        let mut line = serde_json::to_string(&instruction)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
