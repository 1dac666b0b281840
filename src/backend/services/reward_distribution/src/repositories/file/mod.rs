mod balance;
mod history_feed;
mod instruction_dispatcher;

pub use balance::FixedBalance;
pub use history_feed::{JsonFileDelegationFeed, JsonFileRewardFeed};
pub use instruction_dispatcher::{InstructionFileDispatcher, TransferInstruction};

use anyhow::{Context, Result};
use std::path::Path;

/// Reads a JSON array from `path` without committing to a record shape yet.
pub(crate) async fn read_json_array(path: &Path) -> Result<Vec<serde_json::Value>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let values = serde_json::from_str::<Vec<serde_json::Value>>(&contents)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
    Ok(values)
}
