use std::fmt;

use base64::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::appconsts;
use crate::consts::HASH_SIZE;
use crate::consts::appconsts::AppVersion;
use crate::error::validation_error;
use crate::merkle::{self, Hash};
use crate::nmt::{Namespace, NamespacedHashExt, Nmt, NmtExt};
use crate::share::SparseShareSplitter;
use crate::{Blob, Error, Result};

/// A merkle hash used to identify the [`Blob`]s data.
///
/// In Celestia network, the transaction which pays for the blob's inclusion
/// is separated from the data itself. The reason for that is to allow verifying
/// the blockchain's state without the need to pull the actual data which got stored.
/// To achieve that, the `MsgPayForBlobs` transaction only includes the [`Commitment`]s
/// of the blobs it is paying for, not the data itself.
///
/// The algorithm of computing the [`Commitment`] of the [`Blob`]'s [`Share`]s is
/// designed in a way to allow easy and cheap proving of the [`Share`]s inclusion in the
/// block. It is computed as a [`merkle hash`] of all the [`Nmt`] subtree roots created from
/// the blob shares included in the [`ExtendedDataSquare`] rows. Assuming the `s1` and `s2`
/// are the only shares of some blob posted to the celestia, they'll result in a single subtree
/// root as shown below:
///
/// ```text
/// NMT:           row root
///                /     \
///              o   subtree root
///             / \      / \
///           _________________
/// EDS row: | s | s | s1 | s2 |
/// ```
///
/// Using subtree roots as a base for [`Commitment`] computation allows for much smaller
/// inclusion proofs than when the [`Share`]s would be used directly, but it imposes some
/// constraints on how the [`Blob`]s can be placed in the [`ExtendedDataSquare`]. You can
/// read more about that in the [`share commitment rules`].
///
/// [`Blob`]: crate::Blob
/// [`Share`]: crate::share::Share
/// [`ExtendedDataSquare`]: crate::ExtendedDataSquare
/// [`merkle hash`]: crate::merkle::hash_from_byte_slices
/// [`share commitment rules`]: https://github.com/celestiaorg/celestia-app/blob/main/specs/src/specs/data_square_layout.md#blob-share-commitment-rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment(pub Hash);

impl Commitment {
    /// Create a new commitment with hash.
    pub fn new(hash: Hash) -> Self {
        Commitment(hash)
    }

    /// Generate the share commitment from the given blob data.
    ///
    /// The subtree root threshold is chosen according to the [`AppVersion`].
    pub fn from_blob(
        namespace: Namespace,
        blob_data: &[u8],
        share_version: u8,
        app_version: AppVersion,
    ) -> Result<Commitment> {
        create_commitment(
            namespace,
            blob_data,
            share_version,
            appconsts::subtree_root_threshold(app_version),
        )
    }

    /// Hash of the commitment.
    pub fn hash(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BASE64_STANDARD.encode(self.0))
    }
}

impl From<Hash> for Commitment {
    fn from(value: Hash) -> Self {
        Commitment(value)
    }
}

impl From<Commitment> for Hash {
    fn from(value: Commitment) -> Self {
        value.0
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Commitment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = BASE64_STANDARD.encode(self.0);
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // base64 needs more buffer size than the final output
        let mut buf = [0u8; HASH_SIZE * 2];

        // owned, so that escaped and non-borrowing inputs decode too
        let s = String::deserialize(deserializer)?;

        let len = BASE64_STANDARD
            .decode_slice(&s, &mut buf)
            .map_err(|e| serde::de::Error::custom(e.to_string()))?;

        let hash: Hash = buf[..len]
            .try_into()
            .map_err(|_| serde::de::Error::custom(Error::InvalidHashSize(len)))?;

        Ok(Commitment(hash))
    }
}

/// Compute the share commitment of the blob data.
///
/// The data is split into shares, which are grouped into the merkle mountain range
/// of trees, each at most [`subtree_width`] wide. Every group is pushed into its own
/// [`Nmt`] and the commitment is the [`merkle hash`] of the roots of those trees.
///
/// # Errors
///
/// This function will return an error if the namespace is not a valid blob namespace,
/// the share version is not supported, the data is empty or exceeds the
/// [`DEFAULT_MAX_BYTES`], or if the threshold is zero.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::blob::create_commitment;
/// use celestia_openrpc_types::nmt::Namespace;
///
/// let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
/// let commitment = create_commitment(namespace, b"hello world", 0, 64).unwrap();
///
/// assert_eq!(
///     commitment.to_string(),
///     "I6VBbcCIpcliy0hYTCLdX13m18ImVdABclJupNGueko="
/// );
/// ```
///
/// [`merkle hash`]: crate::merkle::hash_from_byte_slices
/// [`DEFAULT_MAX_BYTES`]: appconsts::DEFAULT_MAX_BYTES
pub fn create_commitment(
    namespace: Namespace,
    blob_data: &[u8],
    share_version: u8,
    subtree_root_threshold: u64,
) -> Result<Commitment> {
    validate_blob_parts(namespace, blob_data, share_version)?;

    let mut splitter = SparseShareSplitter::new();
    splitter.write_data(namespace, share_version, blob_data)?;
    let shares = splitter.export();
    let share_count = shares.len() as u64;

    // the commitment is the root of a merkle mountain range with max tree size
    // determined by the number of roots required to create a share commitment
    // over that blob. The size of the tree is only increased if the number of
    // subtree roots surpasses a constant threshold.
    let subtree_width = subtree_width(share_count, subtree_root_threshold).ok_or_else(|| {
        validation_error!("invalid subtree root threshold: {subtree_root_threshold}")
    })?;
    let tree_sizes = merkle_mountain_range_sizes(share_count, subtree_width)
        .ok_or_else(|| validation_error!("invalid subtree width: {subtree_width}"))?;

    // create the commitments by pushing each leaf set onto an nmt
    let mut subtree_roots = Vec::with_capacity(tree_sizes.len());
    let mut leaf_sets = shares.as_slice();

    for size in tree_sizes {
        let (leaf_set, rest) = leaf_sets.split_at(size as usize);
        leaf_sets = rest;

        let mut tree = <Nmt as NmtExt>::default();
        for leaf_share in leaf_set {
            tree.push_leaf(leaf_share.as_ref(), *namespace)
                .map_err(|e| validation_error!("failed to push a leaf: {e}"))?;
        }

        subtree_roots.push(tree.root().to_array());
    }

    Ok(Commitment(merkle::hash_from_byte_slices(&subtree_roots)))
}

/// Compute the share commitments of all the blobs.
///
/// See [`create_commitment`].
pub fn create_commitments<'a>(
    blobs: impl IntoIterator<Item = &'a Blob>,
    subtree_root_threshold: u64,
) -> Result<Vec<Commitment>> {
    blobs
        .into_iter()
        .map(|blob| {
            create_commitment(
                blob.namespace,
                &blob.data,
                blob.share_version,
                subtree_root_threshold,
            )
        })
        .collect()
}

pub(crate) fn validate_blob_parts(
    namespace: Namespace,
    data: &[u8],
    share_version: u8,
) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyBlobData);
    }

    if data.len() > appconsts::DEFAULT_MAX_BYTES {
        return Err(Error::BlobTooLarge {
            size: data.len(),
            max: appconsts::DEFAULT_MAX_BYTES,
        });
    }

    namespace.validate_for_blob()?;

    if !appconsts::SUPPORTED_SHARE_VERSIONS.contains(&share_version) {
        return Err(Error::UnsupportedShareVersion(share_version));
    }

    Ok(())
}

/// merkle_mountain_range_sizes returns the sizes (number of leaf nodes) of the
/// trees in a merkle mountain range constructed for a given total_size and
/// max_tree_size.
///
/// Returns `None` if `max_tree_size` is zero.
///
/// https://docs.grin.mw/wiki/chain-state/merkle-mountain-range/
/// https://github.com/opentimestamps/opentimestamps-server/blob/master/doc/merkle-mountain-range.md
pub(crate) fn merkle_mountain_range_sizes(
    mut total_size: u64,
    max_tree_size: u64,
) -> Option<Vec<u64>> {
    if max_tree_size == 0 {
        return None;
    }

    let mut tree_sizes = Vec::new();

    while total_size != 0 {
        let tree_size = if total_size >= max_tree_size {
            max_tree_size
        } else {
            round_down_to_power_of_2(total_size)?
        };

        tree_sizes.push(tree_size);
        total_size -= tree_size;
    }

    Some(tree_sizes)
}

/// blob_min_square_size returns the minimum square size that can contain share_count
/// number of shares.
pub fn blob_min_square_size(share_count: u64) -> Option<u64> {
    round_up_to_power_of_2(ceil_sqrt(share_count))
}

/// subtree_width determines the maximum number of leaves per subtree in the share
/// commitment over a given blob. The input should be the total number of shares
/// used by that blob. The reasoning behind this algorithm is discussed in depth
/// in ADR013
/// (celestia-app/docs/architecture/adr-013-non-interative-default-rules-for-zero-padding).
///
/// Returns `None` if the threshold is zero.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::blob::subtree_width;
///
/// assert_eq!(subtree_width(64, 64), Some(1));
/// assert_eq!(subtree_width(65, 64), Some(2));
/// assert_eq!(subtree_width(11, 0), None);
/// ```
pub fn subtree_width(share_count: u64, subtree_root_threshold: u64) -> Option<u64> {
    // per ADR013, we use a predetermined threshold to determine width of sub
    // trees used to create share commitments
    let s = share_count.checked_div(subtree_root_threshold)?;

    // round up if the width is not an exact multiple of the threshold
    let s = if share_count % subtree_root_threshold != 0 {
        s + 1
    } else {
        s
    };

    // use a power of two equal to or larger than the multiple of the subtree
    // root threshold
    let s = round_up_to_power_of_2(s)?;

    // use the minimum of the subtree width and the min square size, this
    // gurarantees that a valid value is returned
    Some(s.min(blob_min_square_size(share_count)?))
}

/// round_up_to_power_of_2 returns the next power of two that is greater than or equal to input.
///
/// Returns `None` if the result doesn't fit into [`u64`].
pub fn round_up_to_power_of_2(x: u64) -> Option<u64> {
    x.checked_next_power_of_two()
}

/// round_down_to_power_of_2 returns the next power of two less than or equal to input.
///
/// Returns `None` if the input is zero.
pub fn round_down_to_power_of_2(x: u64) -> Option<u64> {
    if x == 0 {
        return None;
    }

    Some(1 << x.ilog2())
}

fn ceil_sqrt(x: u64) -> u64 {
    let mut root = (x as f64).sqrt() as u64;

    while root.saturating_mul(root) < x {
        root += 1;
    }
    while root > 0 && (root - 1).saturating_mul(root - 1) >= x {
        root -= 1;
    }

    root
}
