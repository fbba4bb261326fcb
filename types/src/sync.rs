use serde::{Deserialize, Serialize};
use tendermint::time::Time;

use crate::hash::Hash;

/// Progress of the header syncer, as returned by `header.SyncState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// Identifier of the current sync job.
    pub id: u64,
    /// Height synced so far.
    pub height: u64,
    /// First height of the job.
    pub from_height: u64,
    /// Last height of the job.
    pub to_height: u64,
    /// Hash of the header at `from_height`.
    #[serde(with = "crate::serializers::hex_hash")]
    pub from_hash: Hash,
    /// Hash of the header at `to_height`.
    #[serde(with = "crate::serializers::hex_hash")]
    pub to_hash: Hash,
    /// When the job started.
    pub start: Time,
    /// When the job finished.
    pub end: Time,
    /// Error the job ended with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncState {
    /// Whether the syncer reached the last height of its job.
    pub fn is_finished(&self) -> bool {
        self.height >= self.to_height
    }
}
