use serde::{Deserialize, Serialize};
use tendermint_proto::serializers::bytes::base64string;

use crate::blob::{subtree_width, Blob, Commitment};
use crate::error::{bail_validation, bail_verification, verification_error};
use crate::merkle::{self, Hash};
use crate::nmt::{
    to_leaf_ranges, verify_subtree_roots_inclusion, Namespace, NamespaceProof, NamespacedHash,
    NamespacedHashExt,
};
use crate::{Error, ErrorKind, Result, RowProof};

/// A list of [`NamespaceProof`]s proving the inclusion of blob's shares in the rows they span.
pub type Proof = Vec<NamespaceProof>;

/// A proof of the inclusion of a blob's [`Commitment`] in the data root of a block.
///
/// It is built from the subtree roots which were used to compute the commitment,
/// the proofs of their inclusion in the row roots, and the proof of inclusion of
/// those row roots in the [`DataAvailabilityHeader`].
///
/// [`DataAvailabilityHeader`]: crate::DataAvailabilityHeader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCommitmentProof", into = "RawCommitmentProof")]
pub struct CommitmentProof {
    subtree_roots: Vec<NamespacedHash>,
    subtree_root_proofs: Vec<NamespaceProof>,
    namespace: Namespace,
    row_proof: RowProof,
}

impl CommitmentProof {
    /// Create a new [`CommitmentProof`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the parts don't form a structurally valid proof.
    pub fn new(
        subtree_roots: Vec<NamespacedHash>,
        subtree_root_proofs: Vec<NamespaceProof>,
        namespace: Namespace,
        row_proof: RowProof,
    ) -> Result<Self> {
        let proof = CommitmentProof {
            subtree_roots,
            subtree_root_proofs,
            namespace,
            row_proof,
        };
        proof.validate()?;
        Ok(proof)
    }

    /// Roots of the subtrees the commitment was computed from.
    pub fn subtree_roots(&self) -> &[NamespacedHash] {
        &self.subtree_roots
    }

    /// Proofs of the subtree roots inclusion, one per row.
    pub fn subtree_root_proofs(&self) -> &[NamespaceProof] {
        &self.subtree_root_proofs
    }

    /// [`Namespace`] of the blob.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Proof of the rows inclusion in the data root.
    pub fn row_proof(&self) -> &RowProof {
        &self.row_proof
    }

    /// Check the proof for structural consistency.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///  - the amount of subtree root proofs is different than the amount of proven rows
    ///  - the row proof is malformed
    ///  - there are no subtree roots or any subtree root proof is an absence proof
    pub fn validate(&self) -> Result<()> {
        self.row_proof.validate()?;

        if self.subtree_root_proofs.len() != self.row_proof.row_roots().len() {
            bail_validation!(
                "subtree root proofs length ({}) != row roots length ({})",
                self.subtree_root_proofs.len(),
                self.row_proof.row_roots().len()
            );
        }

        if self.subtree_roots.is_empty() {
            bail_validation!("no subtree roots in the proof");
        }

        for proof in &self.subtree_root_proofs {
            if proof.is_of_absence() {
                return Err(Error::UnexpectedAbsentProof);
            }
        }

        Ok(())
    }

    /// Verify that the `commitment` is included in the block with given `data_root`.
    ///
    /// `subtree_root_threshold` must be the one of the [`AppVersion`] of the block.
    ///
    /// # Errors
    ///
    /// This function will return an error with [`ErrorKind::InvalidProof`] if:
    ///  - the proof is malformed
    ///  - any of the subtree roots isn't included in its row root
    ///  - the subtree roots don't hash to the `commitment`
    ///  - the row roots aren't included in the `data_root`
    ///
    /// [`AppVersion`]: crate::consts::appconsts::AppVersion
    pub fn verify(
        &self,
        commitment: &Commitment,
        data_root: Hash,
        subtree_root_threshold: u64,
    ) -> Result<()> {
        self.verify_parts(commitment, data_root, subtree_root_threshold)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidProof => e,
                _ => verification_error!("{e}").into(),
            })
    }

    fn verify_parts(
        &self,
        commitment: &Commitment,
        data_root: Hash,
        subtree_root_threshold: u64,
    ) -> Result<()> {
        self.validate()?;

        let shares: u64 = self
            .subtree_root_proofs
            .iter()
            .map(|proof| u64::from(proof.end_idx().saturating_sub(proof.start_idx())))
            .sum();
        let width = subtree_width(shares, subtree_root_threshold).ok_or_else(|| {
            verification_error!("invalid subtree root threshold: {subtree_root_threshold}")
        })? as usize;

        // subtree roots are consumed by the rows in order
        let mut subtree_roots = self.subtree_roots.as_slice();

        for (proof, row_root) in self
            .subtree_root_proofs
            .iter()
            .zip(self.row_proof.row_roots())
        {
            let ranges = to_leaf_ranges(proof.start_idx() as usize, proof.end_idx() as usize, width)?;

            if ranges.len() > subtree_roots.len() {
                bail_verification!(
                    "not enough subtree roots: {} needed, {} left",
                    ranges.len(),
                    subtree_roots.len()
                );
            }

            let (row_subtree_roots, rest) = subtree_roots.split_at(ranges.len());
            verify_subtree_roots_inclusion(
                proof,
                row_subtree_roots,
                width,
                self.namespace,
                row_root,
            )?;
            subtree_roots = rest;
        }

        if !subtree_roots.is_empty() {
            bail_verification!("{} subtree roots not covered by proofs", subtree_roots.len());
        }

        let roots: Vec<_> = self.subtree_roots.iter().map(|root| root.to_array()).collect();
        if merkle::hash_from_byte_slices(&roots) != *commitment.hash() {
            bail_verification!("subtree roots don't hash to the commitment {commitment}");
        }

        self.row_proof.verify(data_root)
    }
}

#[derive(Serialize, Deserialize)]
struct RawCommitmentProof {
    #[serde(with = "crate::serializers::vec_base64_namespaced_hash")]
    subtree_roots: Vec<NamespacedHash>,
    subtree_root_proofs: Vec<NamespaceProof>,
    #[serde(with = "base64string")]
    namespace_id: Vec<u8>,
    row_proof: RowProof,
    namespace_version: u8,
}

impl TryFrom<RawCommitmentProof> for CommitmentProof {
    type Error = Error;

    fn try_from(value: RawCommitmentProof) -> Result<Self> {
        let namespace = Namespace::new(value.namespace_version, &value.namespace_id)?;

        Ok(CommitmentProof {
            subtree_roots: value.subtree_roots,
            subtree_root_proofs: value.subtree_root_proofs,
            namespace,
            row_proof: value.row_proof,
        })
    }
}

impl From<CommitmentProof> for RawCommitmentProof {
    fn from(value: CommitmentProof) -> Self {
        RawCommitmentProof {
            subtree_roots: value.subtree_roots,
            subtree_root_proofs: value.subtree_root_proofs,
            namespace_id: value.namespace.id().to_vec(),
            row_proof: value.row_proof,
            namespace_version: value.namespace.version(),
        }
    }
}

/// A response of the blob subscription, all blobs of the namespace at given height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Blobs published at the height.
    #[serde(
        rename = "Blobs",
        alias = "blobs",
        default,
        with = "crate::serializers::null_as_default"
    )]
    pub blobs: Vec<Blob>,
    /// Height of the block.
    #[serde(rename = "Height", alias = "height")]
    pub height: u64,
}
