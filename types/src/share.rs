//! Shares, the fixed-size chunks of the data square.

use serde::{Deserialize, Serialize};

use crate::consts::appconsts;
use crate::nmt::{Namespace, NamespaceProof, NamespacedHash, NS_SIZE};
use crate::{DataAvailabilityHeader, Error, Result};

mod builder;
mod info_byte;
mod padding;
mod splitter;

pub use builder::{new_reserved_bytes, parse_reserved_bytes, ShareBuilder};
pub use info_byte::InfoByte;
pub use padding::{
    namespace_padding_share, namespace_padding_shares, reserved_padding_shares,
    tail_padding_shares,
};
pub use splitter::{split_blobs, SparseShareSplitter};

/// A collection of rows of [`Share`]s from a particular [`Namespace`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNamespacedShares", into = "RawNamespacedShares")]
pub struct NamespacedShares {
    /// All rows containing shares within some namespace.
    pub rows: Vec<NamespacedRow>,
}

impl NamespacedShares {
    /// Verify all the rows against the row roots of the [`DataAvailabilityHeader`].
    ///
    /// Rows are matched in order with the row roots whose namespace range
    /// contains the `namespace`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the amount of rows differs from the
    /// amount of matching row roots, or if any of the row proofs is invalid.
    pub fn verify(&self, namespace: Namespace, dah: &DataAvailabilityHeader) -> Result<()> {
        let roots: Vec<_> = dah
            .row_roots()
            .iter()
            .filter(|root| !namespace.is_outside_range(root, root))
            .collect();

        if roots.len() != self.rows.len() {
            return Err(Error::UnexpectedSequence(format!(
                "expected {} rows within the namespace, got {}",
                roots.len(),
                self.rows.len()
            )));
        }

        for (row, root) in self.rows.iter().zip(roots) {
            row.verify(namespace, root)?;
        }

        Ok(())
    }

    /// Iterate over all the shares of all the rows.
    pub fn shares(&self) -> impl Iterator<Item = &Share> {
        self.rows.iter().flat_map(|row| row.shares.iter())
    }
}

/// [`Share`]s from a particular [`Namespace`] with proof in the data square row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNamespacedRow", into = "RawNamespacedRow")]
pub struct NamespacedRow {
    /// All shares within some namespace in the given row.
    pub shares: Vec<Share>,
    /// A merkle proof of inclusion or absence of the shares in this row.
    pub proof: NamespaceProof,
}

impl NamespacedRow {
    /// Verify that the shares are the complete namespace data of the row with the given root.
    pub fn verify(&self, namespace: Namespace, row_root: &NamespacedHash) -> Result<()> {
        if (self.shares.is_empty() && !self.proof.is_of_absence())
            || (!self.shares.is_empty() && self.proof.is_of_absence())
        {
            return Err(Error::WrongProofType);
        }

        self.proof
            .verify_complete_namespace(row_root, &self.shares, *namespace)
            .map_err(Error::RangeProofError)
    }
}

/// A single fixed-size chunk of data which is used to form the data square.
///
/// All data in Celestia is split into the [`Share`]s before being put into the
/// block's data square. See [`Blob::to_shares`].
///
/// All shares have the fixed size of 512 bytes and the following structure:
///
/// ```text
/// | Namespace | InfoByte | (optional) sequence length | (optional) reserved bytes | data |
/// ```
///
/// The `sequence length` field indicates the byte length of the data split into shares.
/// If the data split into shares cannot fit into a single share, then each following
/// share doesn't have this field set. The `reserved bytes` are present only in
/// the compact shares, the ones of transactions and pay for blob transactions.
///
/// [`Blob::to_shares`]: crate::Blob::to_shares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShare", into = "RawShare")]
pub struct Share {
    data: [u8; appconsts::SHARE_SIZE],
}

impl Share {
    /// Create a new [`Share`] from the raw bytes.
    ///
    /// # Errors
    ///
    /// This function will return an error if the slice length is different than
    /// [`SHARE_SIZE`] or if the namespace is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::Share;
    ///
    /// let raw = [0; 512];
    /// let share = Share::from_raw(&raw).unwrap();
    /// ```
    ///
    /// [`SHARE_SIZE`]: crate::consts::appconsts::SHARE_SIZE
    pub fn from_raw(data: &[u8]) -> Result<Self> {
        if data.len() != appconsts::SHARE_SIZE {
            return Err(Error::InvalidShareSize(data.len()));
        }

        // validate the namespace to later return it
        // with the `new_unchecked`
        Namespace::from_raw(&data[..NS_SIZE])?;

        let mut share = Share {
            data: [0; appconsts::SHARE_SIZE],
        };
        share.data.copy_from_slice(data);

        Ok(share)
    }

    pub(crate) fn from_array_unchecked(data: [u8; appconsts::SHARE_SIZE]) -> Self {
        Share { data }
    }

    /// Get the [`Namespace`] the [`Share`] belongs to.
    pub fn namespace(&self) -> Namespace {
        let mut ns = [0; NS_SIZE];
        ns.copy_from_slice(&self.data[..NS_SIZE]);
        Namespace::new_unchecked(ns)
    }

    /// Get the [`InfoByte`] of the [`Share`].
    pub fn info_byte(&self) -> InfoByte {
        InfoByte::from_raw_unchecked(self.data[NS_SIZE])
    }

    /// Returns true if this share starts a new sequence.
    pub fn is_sequence_start(&self) -> bool {
        self.info_byte().is_sequence_start()
    }

    /// Returns true if this share belongs to the transactions or pay for blob namespace.
    ///
    /// Such shares carry the reserved bytes after the info byte and the sequence length.
    pub fn is_compact(&self) -> bool {
        is_compact_namespace(&self.namespace())
    }

    /// Get the `sequence length` of the [`Share`].
    ///
    /// Returns `None` if this share doesn't start a sequence.
    pub fn sequence_length(&self) -> Option<u32> {
        if !self.is_sequence_start() {
            return None;
        }

        let start = NS_SIZE + appconsts::SHARE_INFO_BYTES;
        let mut len = [0; appconsts::SEQUENCE_LEN_BYTES];
        len.copy_from_slice(&self.data[start..start + appconsts::SEQUENCE_LEN_BYTES]);

        Some(u32::from_be_bytes(len))
    }

    /// Get the index of the first unit starting in this compact share.
    ///
    /// Returns `None` for sparse shares.
    pub fn reserved_bytes(&self) -> Option<u32> {
        if !self.is_compact() {
            return None;
        }

        let start = reserved_bytes_index(self.is_sequence_start());
        let bytes = &self.data[start..start + appconsts::COMPACT_SHARE_RESERVED_BYTES];
        parse_reserved_bytes(bytes).ok()
    }

    /// Get the payload of the [`Share`], following all the headers.
    ///
    /// The payload includes the zero padding of the last share of a sequence.
    pub fn payload(&self) -> &[u8] {
        let mut start = NS_SIZE + appconsts::SHARE_INFO_BYTES;

        if self.is_sequence_start() {
            start += appconsts::SEQUENCE_LEN_BYTES;
        }
        if self.is_compact() {
            start += appconsts::COMPACT_SHARE_RESERVED_BYTES;
        }

        &self.data[start..]
    }

    /// Returns true if the share is any kind of padding.
    ///
    /// Namespace padding shares start a sequence of zero length, while
    /// reserved and tail padding shares are recognized by their namespace.
    pub fn is_padding(&self) -> bool {
        let namespace = self.namespace();

        namespace == Namespace::TAIL_PADDING
            || namespace == Namespace::PRIMARY_RESERVED_PADDING
            || self.sequence_length() == Some(0)
    }

    /// Get all the data that follows the [`Namespace`] of the [`Share`].
    ///
    /// This will include also the [`InfoByte`] and the `sequence length`.
    pub fn data(&self) -> &[u8] {
        &self.data[NS_SIZE..]
    }

    /// Converts this [`Share`] into the raw bytes vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

pub(crate) fn is_compact_namespace(namespace: &Namespace) -> bool {
    namespace.is_tx() || namespace.is_pay_for_blob()
}

pub(crate) fn reserved_bytes_index(is_sequence_start: bool) -> usize {
    let index = NS_SIZE + appconsts::SHARE_INFO_BYTES;

    if is_sequence_start {
        index + appconsts::SEQUENCE_LEN_BYTES
    } else {
        index
    }
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct RawNamespacedShares {
    rows: Option<Vec<NamespacedRow>>,
}

impl From<RawNamespacedShares> for NamespacedShares {
    fn from(value: RawNamespacedShares) -> Self {
        Self {
            rows: value.rows.unwrap_or_default(),
        }
    }
}

impl From<NamespacedShares> for RawNamespacedShares {
    fn from(value: NamespacedShares) -> Self {
        let rows = if value.rows.is_empty() {
            None
        } else {
            Some(value.rows)
        };

        Self { rows }
    }
}

#[derive(Serialize, Deserialize)]
struct RawNamespacedRow {
    #[serde(alias = "Shares", default)]
    shares: Option<Vec<Share>>,
    #[serde(alias = "Proof", default)]
    proof: Option<NamespaceProof>,
}

impl TryFrom<RawNamespacedRow> for NamespacedRow {
    type Error = Error;

    fn try_from(value: RawNamespacedRow) -> Result<Self, Self::Error> {
        let shares = value.shares.unwrap_or_default();
        let proof = value.proof.ok_or(Error::MissingProof)?;

        if shares.is_empty() && !proof.is_of_absence() {
            return Err(Error::WrongProofType);
        }

        Ok(NamespacedRow { shares, proof })
    }
}

impl From<NamespacedRow> for RawNamespacedRow {
    fn from(value: NamespacedRow) -> RawNamespacedRow {
        RawNamespacedRow {
            shares: Some(value.shares),
            proof: Some(value.proof),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct RawShare {
    #[serde(with = "tendermint_proto::serializers::bytes::base64string")]
    data: Vec<u8>,
}

impl TryFrom<RawShare> for Share {
    type Error = Error;

    fn try_from(value: RawShare) -> Result<Self, Self::Error> {
        Share::from_raw(&value.data)
    }
}

impl From<Share> for RawShare {
    fn from(value: Share) -> Self {
        RawShare {
            data: value.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmt::{Nmt, NmtExt};
    use base64::prelude::*;

    fn namespace() -> Namespace {
        Namespace::new_v0(&[1, 2, 3]).unwrap()
    }

    fn share_with(namespace: Namespace, rest: &[u8]) -> Share {
        let mut data = [0; appconsts::SHARE_SIZE];
        data[..NS_SIZE].copy_from_slice(namespace.as_bytes());
        data[NS_SIZE..NS_SIZE + rest.len()].copy_from_slice(rest);
        Share::from_raw(&data).unwrap()
    }

    #[test]
    fn share_should_have_correct_len() {
        Share::from_raw(&[0; 0]).unwrap_err();
        Share::from_raw(&[0; 100]).unwrap_err();
        Share::from_raw(&[0; appconsts::SHARE_SIZE - 1]).unwrap_err();
        Share::from_raw(&[0; appconsts::SHARE_SIZE + 1]).unwrap_err();
        Share::from_raw(&[0; 2 * appconsts::SHARE_SIZE]).unwrap_err();

        Share::from_raw(&vec![0; appconsts::SHARE_SIZE]).unwrap();
    }

    #[test]
    fn share_with_invalid_namespace() {
        let mut data = [0; appconsts::SHARE_SIZE];
        // version 1 doesn't exist
        data[0] = 1;
        Share::from_raw(&data).unwrap_err();
    }

    #[test]
    fn sparse_share_fields() {
        let share = share_with(namespace(), &[1, 0, 0, 0, 7, 0xaa]);

        assert_eq!(share.namespace(), namespace());
        assert!(share.is_sequence_start());
        assert!(!share.is_compact());
        assert_eq!(share.info_byte().version(), 0);
        assert_eq!(share.sequence_length(), Some(7));
        assert_eq!(share.reserved_bytes(), None);
        assert_eq!(share.payload().len(), appconsts::FIRST_SPARSE_SHARE_CONTENT_SIZE);
        assert_eq!(share.payload()[0], 0xaa);
        assert!(!share.is_padding());

        let continuation = share_with(namespace(), &[0, 0xbb]);
        assert!(!continuation.is_sequence_start());
        assert_eq!(continuation.sequence_length(), None);
        assert_eq!(
            continuation.payload().len(),
            appconsts::CONTINUATION_SPARSE_SHARE_CONTENT_SIZE
        );
        assert_eq!(continuation.payload()[0], 0xbb);
    }

    #[test]
    fn compact_share_fields() {
        let share = share_with(Namespace::TRANSACTION, &[1, 0, 0, 0, 9, 0, 0, 0, 38, 0xcc]);

        assert!(share.is_compact());
        assert_eq!(share.sequence_length(), Some(9));
        assert_eq!(share.reserved_bytes(), Some(38));
        assert_eq!(
            share.payload().len(),
            appconsts::FIRST_COMPACT_SHARE_CONTENT_SIZE
        );
        assert_eq!(share.payload()[0], 0xcc);

        let continuation = share_with(Namespace::PAY_FOR_BLOB, &[0, 0, 0, 0, 34]);
        assert_eq!(continuation.reserved_bytes(), Some(34));
        assert_eq!(
            continuation.payload().len(),
            appconsts::CONTINUATION_COMPACT_SHARE_CONTENT_SIZE
        );
    }

    #[test]
    fn padding_shares_detected() {
        assert!(share_with(namespace(), &[1]).is_padding());
        assert!(share_with(Namespace::TAIL_PADDING, &[1]).is_padding());
        assert!(share_with(Namespace::PRIMARY_RESERVED_PADDING, &[1]).is_padding());
        assert!(!share_with(namespace(), &[0]).is_padding());
    }

    #[test]
    fn share_json_is_base64() {
        let share = share_with(namespace(), &[1, 0, 0, 0, 1, 5]);
        let json = serde_json::to_string(&share).unwrap();
        let decoded: Share = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, share);

        serde_json::from_str::<Share>(r#""AAAA""#).unwrap_err();
    }

    #[test]
    fn decode_namespaced_shares() {
        let share = BASE64_STANDARD.encode([0u8; appconsts::SHARE_SIZE]);
        let get_shares_by_namespace_response = format!(
            r#"[
              {{
                "shares": ["{share}"],
                "proof": {{
                  "start": 1,
                  "end": 2,
                  "nodes": [
                    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABFmTiyJVvgoyHdw7JGii/wyMfMbSdN3Nbi6Uj0Lcprk+",
                    "/////////////////////////////////////////////////////////////////////////////0WE8jz9lbFjpXWj9v7/QgdAxYEqy4ew9TMdqil/UFZm"
                  ],
                  "leaf_hash": null,
                  "is_max_namespace_ignored": true
                }}
              }}
            ]"#
        );

        let ns_shares: NamespacedShares =
            serde_json::from_str(&get_shares_by_namespace_response).unwrap();

        assert_eq!(ns_shares.rows.len(), 1);
        assert_eq!(ns_shares.rows[0].shares.len(), 1);
        assert!(!ns_shares.rows[0].proof.is_of_absence());

        let empty: NamespacedShares = serde_json::from_str("null").unwrap();
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn row_without_shares_needs_absence_proof() {
        let json = r#"{
            "shares": [],
            "proof": { "start": 0, "end": 1, "nodes": [] }
        }"#;
        serde_json::from_str::<NamespacedRow>(json).unwrap_err();

        let json = r#"{ "shares": [] }"#;
        serde_json::from_str::<NamespacedRow>(json).unwrap_err();
    }

    #[test]
    fn verify_namespaced_row() {
        let ns = namespace();
        let other = Namespace::new_v0(&[9, 9, 9]).unwrap();
        let shares = vec![
            share_with(ns, &[1, 0, 0, 0, 3, 1, 2, 3]),
            share_with(ns, &[1, 0, 0, 0, 1, 4]),
            share_with(other, &[1, 0, 0, 0, 1, 5]),
        ];

        let mut tree = <Nmt as NmtExt>::default();
        for share in &shares {
            tree.push_leaf(share.as_ref(), *share.namespace()).unwrap();
        }
        let root = tree.root();

        let proof = tree.get_namespace_proof(*ns);
        let row = NamespacedRow {
            shares: shares[..2].to_vec(),
            proof: proof.into(),
        };
        row.verify(ns, &root).unwrap();

        let tampered = NamespacedRow {
            shares: vec![shares[0].clone(), shares[0].clone()],
            proof: row.proof.clone(),
        };
        tampered.verify(ns, &root).unwrap_err();
    }
}
