use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::models::feed::{decode_records, RawDelegationOp, RawRewardOp};
use crate::models::reward::RewardWindow;
use crate::models::AccountName;
use crate::repositories::traits::{DelegationFeed, RewardFeed};

use super::read_json_array;

/// Delegation history exported from a node as a JSON array, oldest first.
pub struct JsonFileDelegationFeed {
    path: PathBuf,
}

impl JsonFileDelegationFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DelegationFeed for JsonFileDelegationFeed {
    async fn delegation_history(&self, account: &AccountName) -> Result<Vec<RawDelegationOp>> {
        let values = read_json_array(&self.path).await?;
        let ops: Vec<RawDelegationOp> = decode_records(values);
        debug!(%account, records = ops.len(), path = %self.path.display(), "Loaded delegation history");
        Ok(ops)
    }
}

/// Curation reward history exported as a JSON array. Not pre-filtered by window.
pub struct JsonFileRewardFeed {
    path: PathBuf,
}

impl JsonFileRewardFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RewardFeed for JsonFileRewardFeed {
    async fn curation_rewards(
        &self,
        account: &AccountName,
        window: &RewardWindow,
    ) -> Result<Vec<RawRewardOp>> {
        let values = read_json_array(&self.path).await?;
        let ops: Vec<RawRewardOp> = decode_records(values);
        debug!(
            %account,
            records = ops.len(),
            window = %window.label(),
            path = %self.path.display(),
            "Loaded curation rewards"
        );
        Ok(ops)
    }
}
