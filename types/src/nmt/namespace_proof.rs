use std::ops::{Deref, DerefMut};

use nmt_rs::simple_merkle::proof::Proof as NmtProof;
use serde::{Deserialize, Serialize};

use crate::nmt::{NamespacedHash, NamespacedHashExt, NamespacedSha2Hasher, NS_SIZE};
use crate::{Error, Result};

/// A proof of the inclusion or absence of a range of leaves in the [`Nmt`].
///
/// [`Nmt`]: crate::nmt::Nmt
pub type NmtNamespaceProof = nmt_rs::nmt_proof::NamespaceProof<NamespacedSha2Hasher, NS_SIZE>;

/// Merkle proof of inclusion or absence of some data in the [`Nmt`].
///
/// On the wire it is a JSON object with the `start` and `end` of the proven
/// leaf range, the base64 encoded sibling `nodes` in the in-order traversal,
/// an optional `leaf_hash` present only for absence proofs and the
/// `is_max_namespace_ignored` flag.
///
/// [`Nmt`]: crate::nmt::Nmt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNamespaceProof", into = "RawNamespaceProof")]
pub struct NamespaceProof(NmtNamespaceProof);

impl NamespaceProof {
    /// Create a presence proof of the leaf range from its sibling nodes.
    pub fn new_presence(start: u32, end: u32, nodes: Vec<NamespacedHash>) -> Self {
        NamespaceProof(NmtNamespaceProof::PresenceProof {
            proof: NmtProof {
                siblings: nodes,
                range: start..end,
            },
            ignore_max_ns: true,
        })
    }

    /// Convert the proof to the underlying [`nmt_rs`] equivalent.
    pub fn into_inner(self) -> NmtNamespaceProof {
        self.0
    }

    /// Get the hash of the leaf following the [`Namespace`] which absence is being proven.
    ///
    /// [`Namespace`]: crate::nmt::Namespace
    pub fn leaf(&self) -> Option<&NamespacedHash> {
        match &self.0 {
            NmtNamespaceProof::AbsenceProof { leaf, .. } => leaf.as_ref(),
            _ => None,
        }
    }

    /// Returns true if the proof ignores all the leaves inserted with
    /// the parity namespace when computing the maximal namespace of the nodes.
    pub fn max_ns_ignored(&self) -> bool {
        match &self.0 {
            NmtNamespaceProof::AbsenceProof { ignore_max_ns, .. }
            | NmtNamespaceProof::PresenceProof { ignore_max_ns, .. } => *ignore_max_ns,
        }
    }

    /// Amount of the leaves covered by this proof.
    pub fn leaves_count(&self) -> u32 {
        self.end_idx().saturating_sub(self.start_idx())
    }
}

impl Deref for NamespaceProof {
    type Target = NmtNamespaceProof;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for NamespaceProof {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<NamespaceProof> for NmtNamespaceProof {
    fn from(value: NamespaceProof) -> NmtNamespaceProof {
        value.0
    }
}

impl From<NmtNamespaceProof> for NamespaceProof {
    fn from(value: NmtNamespaceProof) -> NamespaceProof {
        NamespaceProof(value)
    }
}

#[derive(Serialize, Deserialize)]
struct RawNamespaceProof {
    #[serde(default)]
    start: i64,
    #[serde(default)]
    end: i64,
    #[serde(
        default,
        with = "tendermint_proto::serializers::bytes::vec_base64string"
    )]
    nodes: Vec<Vec<u8>>,
    #[serde(default, with = "tendermint_proto::serializers::bytes::base64string")]
    leaf_hash: Vec<u8>,
    #[serde(default)]
    is_max_namespace_ignored: bool,
}

impl TryFrom<RawNamespaceProof> for NamespaceProof {
    type Error = Error;

    fn try_from(value: RawNamespaceProof) -> Result<Self, Self::Error> {
        let start = u32::try_from(value.start)
            .map_err(|_| crate::error::validation_error!("invalid proof start: {}", value.start))?;
        let end = u32::try_from(value.end)
            .map_err(|_| crate::error::validation_error!("invalid proof end: {}", value.end))?;

        let siblings = value
            .nodes
            .iter()
            .map(|bytes| NamespacedHash::from_raw(bytes))
            .collect::<Result<Vec<_>>>()?;

        let mut proof = NmtNamespaceProof::PresenceProof {
            proof: NmtProof {
                siblings,
                range: start..end,
            },
            ignore_max_ns: value.is_max_namespace_ignored,
        };

        if !value.leaf_hash.is_empty() {
            proof.convert_to_absence_proof(NamespacedHash::from_raw(&value.leaf_hash)?);
        }

        Ok(NamespaceProof(proof))
    }
}

impl From<NamespaceProof> for RawNamespaceProof {
    fn from(value: NamespaceProof) -> Self {
        RawNamespaceProof {
            start: value.start_idx() as i64,
            end: value.end_idx() as i64,
            nodes: value.siblings().iter().map(|hash| hash.to_vec()).collect(),
            leaf_hash: value.leaf().map(|hash| hash.to_vec()).unwrap_or_default(),
            is_max_namespace_ignored: value.max_ns_ignored(),
        }
    }
}
