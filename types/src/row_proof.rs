use serde::{Deserialize, Serialize};

use crate::error::{bail_validation, bail_verification};
use crate::merkle::Hash;
use crate::nmt::{NamespacedHash, NamespacedHashExt};
use crate::{MerkleProof, Result};

/// A proof of inclusion of a range of row roots in a [`DataAvailabilityHeader`].
///
/// The row roots are the leaves of the merkle tree over all the row and column
/// roots whose root is the [`DataAvailabilityHeader::hash`].
///
/// [`DataAvailabilityHeader`]: crate::DataAvailabilityHeader
/// [`DataAvailabilityHeader::hash`]: crate::DataAvailabilityHeader::hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowProof {
    #[serde(with = "crate::serializers::vec_hex_namespaced_hash")]
    row_roots: Vec<NamespacedHash>,
    proofs: Vec<MerkleProof>,
    start_row: u32,
    end_row: u32,
}

impl RowProof {
    /// Create a new [`RowProof`] for the row roots in range `start_row..=end_row`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the amount of row roots or proofs
    /// doesn't match the range.
    pub fn new(
        row_roots: Vec<NamespacedHash>,
        proofs: Vec<MerkleProof>,
        start_row: u32,
        end_row: u32,
    ) -> Result<Self> {
        let proof = RowProof {
            row_roots,
            proofs,
            start_row,
            end_row,
        };
        proof.validate()?;
        Ok(proof)
    }

    /// Get the list of row roots this proof proves.
    pub fn row_roots(&self) -> &[NamespacedHash] {
        &self.row_roots
    }

    /// Get the inclusion proofs of the row roots.
    pub fn proofs(&self) -> &[MerkleProof] {
        &self.proofs
    }

    /// Index of the first proven row.
    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// Index of the last proven row, inclusive.
    pub fn end_row(&self) -> u32 {
        self.end_row
    }

    /// Check that the amounts of rows, row roots and proofs agree.
    ///
    /// # Errors
    ///
    /// This function will return an error if the range is inverted or if the
    /// number of row roots or proofs is different than the amount of rows in it.
    pub fn validate(&self) -> Result<()> {
        if self.end_row < self.start_row {
            bail_validation!(
                "end_row ({}) < start_row ({})",
                self.end_row,
                self.start_row
            );
        }

        let rows = (self.end_row - self.start_row) as usize + 1;

        if self.row_roots.len() != rows {
            bail_validation!(
                "row roots length ({}) != rows in range ({rows})",
                self.row_roots.len()
            );
        }

        if self.proofs.len() != rows {
            bail_validation!(
                "proofs length ({}) != rows in range ({rows})",
                self.proofs.len()
            );
        }

        Ok(())
    }

    /// Verify the proof against the hash of [`DataAvailabilityHeader`], proving
    /// the inclusion of rows.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///  - the proof is malformed. Number of proofs, row roots and the span of
    ///    row indexes must match
    ///  - any of the proofs is for a different row than expected
    ///  - the verification of any inner merkle proof fails
    ///
    /// [`DataAvailabilityHeader`]: crate::DataAvailabilityHeader
    pub fn verify(&self, root: Hash) -> Result<()> {
        if let Err(e) = self.validate() {
            bail_verification!("malformed row proof: {e}");
        }

        for ((row, row_root), proof) in (self.start_row..=self.end_row)
            .zip(&self.row_roots)
            .zip(&self.proofs)
        {
            if proof.index() != row as usize {
                bail_verification!(
                    "proof index ({}) != row ({row})",
                    proof.index()
                );
            }

            proof.verify(row_root.to_array(), root)?;
        }

        Ok(())
    }
}
