//! Fraud proofs broadcast by the nodes.
//!
//! The proofs are carried as typed, opaque envelopes. Decoding and validating
//! their content is left to the consumers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of the fraud proof, e.g. [`ProofType::BAD_ENCODING`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofType(pub String);

impl ProofType {
    /// Proof of an incorrectly erasure coded row or column.
    pub const BAD_ENCODING: &'static str = "badencoding";

    /// Type of the bad encoding fraud proof.
    pub fn bad_encoding() -> ProofType {
        ProofType(ProofType::BAD_ENCODING.to_owned())
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fraud proof of some [`ProofType`] with its binary encoded body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Type of the proof.
    pub proof_type: ProofType,
    /// The encoded proof.
    #[serde(with = "tendermint_proto::serializers::bytes::base64string")]
    pub data: Vec<u8>,
}

impl Proof {
    /// Whether this is a bad encoding fraud proof.
    pub fn is_bad_encoding(&self) -> bool {
        self.proof_type.0 == ProofType::BAD_ENCODING
    }
}
