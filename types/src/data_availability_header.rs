use std::ops::RangeInclusive;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::consts::appconsts::AppVersion;
use crate::consts::data_availability_header::{
    max_extended_square_width, MIN_EXTENDED_SQUARE_WIDTH,
};
use crate::error::{bail_validation, validation_error};
use crate::merkle::{self, Hash};
use crate::nmt::{NamespacedHash, NamespacedHashExt};
use crate::{
    MerkleProof, Result, RowProof, ValidateBasicWithAppVersion, ValidationError,
};

/// Header with commitments of the data availability.
///
/// It consists of the root hashes of the merkle trees created from each
/// row and column of the [`ExtendedDataSquare`]. Those are used to prove
/// the inclusion of the data in a block.
///
/// The hash of this header is a hash of all rows and columns and thus a
/// data commitment of the block. It is computed once and memoised.
///
/// # Example
///
/// ```no_run
/// # use celestia_openrpc_types::ExtendedHeader;
/// # use celestia_openrpc_types::nmt::Namespace;
/// # use celestia_openrpc_types::share::Share;
/// # use celestia_openrpc_types::nmt::NamespaceProof;
/// # fn extended_header() -> ExtendedHeader {
/// #     unimplemented!();
/// # }
/// # fn shares_with_proof(_: u64, _: &Namespace) -> (Vec<Share>, NamespaceProof) {
/// #     unimplemented!();
/// # }
/// // fetch the block header and data for your namespace
/// let namespace = Namespace::new_v0(&[1, 2, 3, 4]).unwrap();
/// let eh = extended_header();
/// let (shares, proof) = shares_with_proof(eh.height().value(), &namespace);
///
/// // get the data commitment for a given row
/// let dah = eh.dah;
/// let root = dah.row_root(0).unwrap();
///
/// // verify a proof of the inclusion of the shares
/// assert!(proof.verify_complete_namespace(&root, &shares, *namespace).is_ok());
/// ```
///
/// [`ExtendedDataSquare`]: crate::ExtendedDataSquare
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "RawDataAvailabilityHeader",
    into = "RawDataAvailabilityHeader"
)]
pub struct DataAvailabilityHeader {
    /// Merkle roots of the [`ExtendedDataSquare`] rows.
    ///
    /// [`ExtendedDataSquare`]: crate::ExtendedDataSquare
    row_roots: Vec<NamespacedHash>,
    /// Merkle roots of the [`ExtendedDataSquare`] columns.
    ///
    /// [`ExtendedDataSquare`]: crate::ExtendedDataSquare
    column_roots: Vec<NamespacedHash>,
    hash: OnceLock<Hash>,
}

impl DataAvailabilityHeader {
    /// Create new [`DataAvailabilityHeader`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the amount of row and column roots differ.
    pub fn new(row_roots: Vec<NamespacedHash>, column_roots: Vec<NamespacedHash>) -> Result<Self> {
        if row_roots.len() != column_roots.len() {
            bail_validation!(
                "column_roots len ({}) != row_roots len ({})",
                column_roots.len(),
                row_roots.len(),
            )
        }

        Ok(Self::new_unchecked(row_roots, column_roots))
    }

    /// Create new non-validated [`DataAvailabilityHeader`].
    ///
    /// [`DataAvailabilityHeader::validate_basic`] can be used to check the validity later on.
    ///
    /// [`DataAvailabilityHeader::validate_basic`]: ValidateBasicWithAppVersion::validate_basic
    pub fn new_unchecked(
        row_roots: Vec<NamespacedHash>,
        column_roots: Vec<NamespacedHash>,
    ) -> Self {
        DataAvailabilityHeader {
            row_roots,
            column_roots,
            hash: OnceLock::new(),
        }
    }

    /// Merkle roots of the rows.
    pub fn row_roots(&self) -> &[NamespacedHash] {
        &self.row_roots
    }

    /// Merkle roots of the columns.
    pub fn column_roots(&self) -> &[NamespacedHash] {
        &self.column_roots
    }

    /// Get a root of the row with the given index.
    pub fn row_root(&self, row: usize) -> Option<NamespacedHash> {
        self.row_roots.get(row).cloned()
    }

    /// Get the a root of the column with the given index.
    pub fn column_root(&self, column: usize) -> Option<NamespacedHash> {
        self.column_roots.get(column).cloned()
    }

    /// Compute the combined hash of all rows and columns.
    ///
    /// This is the data commitment for the block.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::DataAvailabilityHeader;
    /// use celestia_openrpc_types::nmt::{NamespacedHash, NamespacedHashExt};
    ///
    /// let root = NamespacedHash::empty_root();
    /// let dah = DataAvailabilityHeader::new(vec![root.clone(); 2], vec![root; 2]).unwrap();
    ///
    /// // computed on the first call
    /// let hash = dah.hash();
    /// assert_eq!(dah.hash(), hash);
    /// ```
    pub fn hash(&self) -> Hash {
        *self.hash.get_or_init(|| {
            let all_roots: Vec<_> = self
                .row_roots
                .iter()
                .chain(self.column_roots.iter())
                .map(|root| root.to_array())
                .collect();

            merkle::hash_from_byte_slices(&all_roots)
        })
    }

    /// Get the width of the [`ExtendedDataSquare`] for which this header was built.
    ///
    /// [`ExtendedDataSquare`]: crate::ExtendedDataSquare
    pub fn square_width(&self) -> u16 {
        // `validate_basic` checks that rows num = cols num
        self.row_roots.len() as u16
    }

    /// Get a proof of inclusion of the rows in the given range in this header.
    ///
    /// # Errors
    ///
    /// This function will return an error if the range is empty or out of the square bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::DataAvailabilityHeader;
    /// use celestia_openrpc_types::nmt::{NamespacedHash, NamespacedHashExt};
    ///
    /// let root = NamespacedHash::empty_root();
    /// let dah = DataAvailabilityHeader::new(vec![root.clone(); 4], vec![root; 4]).unwrap();
    ///
    /// let proof = dah.row_proof(1..=2).unwrap();
    /// assert!(proof.verify(dah.hash()).is_ok());
    /// ```
    pub fn row_proof(&self, rows: RangeInclusive<usize>) -> Result<RowProof> {
        let (start_row, end_row) = rows.into_inner();

        if start_row > end_row || end_row >= self.row_roots.len() {
            bail_validation!(
                "rows {start_row}..={end_row} out of range ({})",
                self.row_roots.len()
            );
        }

        let all_roots: Vec<_> = self
            .row_roots
            .iter()
            .chain(self.column_roots.iter())
            .map(|root| root.to_array())
            .collect();

        let mut row_roots = Vec::with_capacity(end_row - start_row + 1);
        let mut proofs = Vec::with_capacity(end_row - start_row + 1);

        for row in start_row..=end_row {
            let (proof, _) = MerkleProof::new(row, &all_roots)?;
            row_roots.push(self.row_roots[row].clone());
            proofs.push(proof);
        }

        let start_row = u32::try_from(start_row)
            .map_err(|_| validation_error!("start row {start_row} too big"))?;
        let end_row =
            u32::try_from(end_row).map_err(|_| validation_error!("end row {end_row} too big"))?;

        RowProof::new(row_roots, proofs, start_row, end_row)
    }
}

impl PartialEq for DataAvailabilityHeader {
    fn eq(&self, other: &Self) -> bool {
        self.row_roots == other.row_roots && self.column_roots == other.column_roots
    }
}

impl Eq for DataAvailabilityHeader {}

impl ValidateBasicWithAppVersion for DataAvailabilityHeader {
    fn validate_basic(&self, app_version: AppVersion) -> Result<(), ValidationError> {
        let max_extended_square_width = max_extended_square_width(app_version);

        if self.column_roots.len() != self.row_roots.len() {
            bail_validation!(
                "column_roots len ({}) != row_roots len ({})",
                self.column_roots.len(),
                self.row_roots.len(),
            )
        }

        if self.row_roots.len() < MIN_EXTENDED_SQUARE_WIDTH {
            bail_validation!(
                "row_roots len ({}) < minimum ({})",
                self.row_roots.len(),
                MIN_EXTENDED_SQUARE_WIDTH,
            )
        }

        if self.row_roots.len() > max_extended_square_width {
            bail_validation!(
                "row_roots len ({}) > maximum ({})",
                self.row_roots.len(),
                max_extended_square_width,
            )
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct RawDataAvailabilityHeader {
    #[serde(with = "crate::serializers::vec_base64_namespaced_hash")]
    row_roots: Vec<NamespacedHash>,
    #[serde(with = "crate::serializers::vec_base64_namespaced_hash")]
    column_roots: Vec<NamespacedHash>,
}

impl TryFrom<RawDataAvailabilityHeader> for DataAvailabilityHeader {
    type Error = ValidationError;

    fn try_from(value: RawDataAvailabilityHeader) -> Result<Self, Self::Error> {
        if value.row_roots.len() != value.column_roots.len() {
            bail_validation!(
                "column_roots len ({}) != row_roots len ({})",
                value.column_roots.len(),
                value.row_roots.len(),
            )
        }

        Ok(DataAvailabilityHeader::new_unchecked(
            value.row_roots,
            value.column_roots,
        ))
    }
}

impl From<DataAvailabilityHeader> for RawDataAvailabilityHeader {
    fn from(value: DataAvailabilityHeader) -> RawDataAvailabilityHeader {
        RawDataAvailabilityHeader {
            row_roots: value.row_roots,
            column_roots: value.column_roots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmt::{Namespace, Nmt, NmtExt};

    fn sample_dah() -> DataAvailabilityHeader {
        serde_json::from_str(r#"{
          "row_roots": [
            "//////////////////////////////////////7//////////////////////////////////////huZWOTTDmD36N1F75A9BshxNlRasCnNpQiWqIhdVHcU",
            "/////////////////////////////////////////////////////////////////////////////5iieeroHBMfF+sER3JpvROIeEJZjbY+TRE0ntADQLL3"
          ],
          "column_roots": [
            "//////////////////////////////////////7//////////////////////////////////////huZWOTTDmD36N1F75A9BshxNlRasCnNpQiWqIhdVHcU",
            "/////////////////////////////////////////////////////////////////////////////5iieeroHBMfF+sER3JpvROIeEJZjbY+TRE0ntADQLL3"
          ]
        }"#).unwrap()
    }

    fn cycled(dah: &DataAvailabilityHeader, len: usize) -> DataAvailabilityHeader {
        DataAvailabilityHeader::new_unchecked(
            dah.row_roots.iter().cloned().cycle().take(len).collect(),
            dah.column_roots.iter().cloned().cycle().take(len).collect(),
        )
    }

    #[test]
    fn validate_correct() {
        let dah = sample_dah();

        dah.validate_basic(AppVersion::V2).unwrap();
    }

    #[test]
    fn validate_rows_and_cols_len_mismatch() {
        let dah = sample_dah();
        let mut row_roots = dah.row_roots().to_vec();
        row_roots.pop();

        DataAvailabilityHeader::new(row_roots.clone(), dah.column_roots().to_vec()).unwrap_err();
        DataAvailabilityHeader::new_unchecked(row_roots, dah.column_roots().to_vec())
            .validate_basic(AppVersion::V2)
            .unwrap_err();
    }

    #[test]
    fn validate_too_little_square() {
        let dah = sample_dah();

        cycled(&dah, MIN_EXTENDED_SQUARE_WIDTH)
            .validate_basic(AppVersion::V2)
            .unwrap();
        cycled(&dah, MIN_EXTENDED_SQUARE_WIDTH - 1)
            .validate_basic(AppVersion::V2)
            .unwrap_err();
    }

    #[test]
    fn validate_too_big_square() {
        let dah = sample_dah();
        let max = max_extended_square_width(AppVersion::V2);

        cycled(&dah, max).validate_basic(AppVersion::V2).unwrap();
        cycled(&dah, max + 1)
            .validate_basic(AppVersion::V2)
            .unwrap_err();
    }

    #[test]
    fn hash_is_merkle_root_of_all_roots() {
        let dah = sample_dah();
        let leaves: Vec<_> = dah
            .row_roots()
            .iter()
            .chain(dah.column_roots())
            .map(|root| root.to_vec())
            .collect();

        assert_eq!(dah.hash(), merkle::hash_from_byte_slices(&leaves));
        // memoised value is reused
        assert_eq!(dah.hash(), dah.clone().hash());
    }

    #[test]
    fn equality_ignores_memo() {
        let dah = sample_dah();
        let other = sample_dah();
        let _ = dah.hash();

        assert_eq!(dah, other);
    }

    #[test]
    fn serde_roundtrip() {
        let dah = sample_dah();
        let json = serde_json::to_string(&dah).unwrap();
        let decoded: DataAvailabilityHeader = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, dah);
        assert_eq!(decoded.square_width(), 2);
        assert_eq!(decoded.row_root(1), dah.row_root(1));
        assert_eq!(decoded.column_root(2), None);
    }

    #[test]
    fn row_proofs() {
        let roots: Vec<_> = (0..8u8)
            .map(|n| {
                let ns = Namespace::new_v0(&[0xbb, n]).unwrap();
                let mut tree = <Nmt as NmtExt>::default();
                tree.push_leaf(&[n; 512], *ns).unwrap();
                tree.root()
            })
            .collect();
        let dah = DataAvailabilityHeader::new(roots.clone(), roots).unwrap();

        for start in 0..8 {
            for end in start..8 {
                let proof = dah.row_proof(start..=end).unwrap();
                assert_eq!(proof.row_roots(), &dah.row_roots()[start..=end]);
                proof.verify(dah.hash()).unwrap();
            }
        }

        dah.row_proof(3..=8).unwrap_err();
        let (start, end) = (3, 2);
        dah.row_proof(start..=end).unwrap_err();
    }
}
