//! Types of the node's `p2p` module.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use libp2p_identity::ParseError;
pub use multiaddr::Multiaddr;
use serde::{de, ser, Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

/// Identity of the peer together with its known addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddrInfo {
    #[serde(rename = "ID")]
    pub id: PeerId,
    #[serde(rename = "Addrs", default, with = "crate::serializers::null_as_default")]
    pub addrs: Vec<Multiaddr>,
}

/// Usage of the resources within a resource manager scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Stat {
    pub num_streams_inbound: i64,
    pub num_streams_outbound: i64,
    pub num_conns_inbound: i64,
    pub num_conns_outbound: i64,
    #[serde(rename = "NumFD")]
    pub num_fd: i64,
    pub memory: i64,
}

/// Usage of the resources for all the scopes of the resource manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceManagerStats {
    pub system: Stat,
    pub transient: Stat,
    #[serde(with = "crate::serializers::null_as_default")]
    pub services: HashMap<String, Stat>,
    #[serde(with = "crate::serializers::null_as_default")]
    pub protocols: HashMap<String, Stat>,
    #[serde(with = "crate::serializers::null_as_default")]
    pub peers: HashMap<String, Stat>,
}

/// Error of parsing a [`PeerId`].
#[derive(Debug, Error)]
pub enum PeerIdError {
    /// Peer id is not a valid multihash of the public key.
    #[error("invalid peer id: {0}")]
    Libp2pError(#[from] ParseError),
}

/// Identity of the peer, serialized as a base58 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub libp2p_identity::PeerId);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_base58())
    }
}

impl FromStr for PeerId {
    type Err = PeerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PeerId(s.parse()?))
    }
}

impl From<libp2p_identity::PeerId> for PeerId {
    fn from(value: libp2p_identity::PeerId) -> Self {
        PeerId(value)
    }
}

impl<'de> Deserialize<'de> for PeerId {
    fn deserialize<D>(deserializer: D) -> Result<PeerId, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl Serialize for PeerId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        s.serialize_str(&self.0.to_base58())
    }
}

/// Bandwidth usage, total in bytes and rates in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BandwidthStats {
    pub total_in: f64,
    pub total_out: f64,
    pub rate_in: f64,
    pub rate_out: f64,
}

/// State of the connection with the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Connectedness {
    NotConnected = 0,
    Connected = 1,
    CanConnect = 2,
    CannotConnect = 3,
    /// Connected only over a relayed, limited connection.
    Limited = 4,
}

/// Reachability of the node from the outside, as seen by the NAT detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Reachability {
    Unknown = 0,
    Public = 1,
    Private = 2,
}
