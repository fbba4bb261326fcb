use serde::{Deserialize, Serialize};

/// Response of a transaction submitted to the node's state module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    /// Height of the block in which the transaction was committed.
    #[serde(default)]
    pub height: u64,
    /// Hash of the transaction, as an uppercase hex string.
    #[serde(default)]
    pub txhash: String,
    /// Namespace of the error code, empty if successful.
    #[serde(default)]
    pub codespace: String,
    /// Response code, `0` if successful.
    #[serde(default)]
    pub code: u32,
    /// Result bytes, hex encoded.
    #[serde(default)]
    pub data: String,
    /// Raw output of the application's logger.
    #[serde(default)]
    pub raw_log: String,
    /// Parsed logs of every message of the transaction.
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub logs: Vec<AbciMessageLog>,
    /// Additional, non-deterministic information.
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub gas_wanted: i64,
    #[serde(default)]
    pub gas_used: i64,
    /// Time of the block in which the transaction was committed.
    #[serde(default)]
    pub timestamp: String,
    /// Events emitted by the transaction execution.
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub events: Vec<Event>,
}

impl TxResponse {
    /// Whether the transaction was executed successfully.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Log of a single message of the transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbciMessageLog {
    #[serde(default)]
    pub msg_index: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub events: Vec<StringEvent>,
}

/// Event with its attributes as plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub attributes: Vec<EventAttribute>,
}

/// Event emitted during the execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    /// Whether the attribute is indexed by the node.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,
}
