//! Utilities for writing tests.

use rand::RngCore;
use tendermint::block::header::{Header, Version};
use tendermint::block::{parts, Commit};
use tendermint::{chain, AppHash, Time};

use crate::blob::{merkle_mountain_range_sizes, subtree_width, CommitmentProof};
use crate::consts::appconsts::AppVersion;
use crate::hash::{Hash, HashExt};
use crate::nmt::{Namespace, NamespaceProof, Nmt, NmtExt, NS_ID_V0_SIZE};
use crate::share::{tail_padding_shares, Share};
use crate::{Blob, DataAvailabilityHeader, ExtendedHeader, ValidatorSet};

const GENESIS_HEIGHT: u64 = 1;
const BLOCK_PROTOCOL: u64 = 11;
// 2023-11-14T22:13:20Z
const GENESIS_UNIX_TIME: i64 = 1_700_000_000;

/// [`ExtendedHeader`] generator for testing purposes.
///
/// Headers are consistent and linked together, but the commits carry no
/// signatures.
///
/// **WARNING: ALL METHODS PANIC! DO NOT USE IT IN PRODUCTION!**
#[derive(Debug, Clone)]
pub struct ExtendedHeaderGenerator {
    chain_id: chain::Id,
    current_header: Option<ExtendedHeader>,
}

impl ExtendedHeaderGenerator {
    /// Creates new `ExtendedHeaderGenerator`.
    pub fn new() -> ExtendedHeaderGenerator {
        ExtendedHeaderGenerator {
            chain_id: "private".try_into().unwrap(),
            current_header: None,
        }
    }

    /// Generates the next header.
    ///
    /// ```
    /// use celestia_openrpc_types::test_utils::ExtendedHeaderGenerator;
    ///
    /// let mut gen = ExtendedHeaderGenerator::new();
    /// let header1 = gen.next();
    /// assert_eq!(header1.height().value(), 1);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> ExtendedHeader {
        self.next_with_dah(default_dah())
    }

    /// Generates the next header with the given [`DataAvailabilityHeader`].
    pub fn next_with_dah(&mut self, dah: DataAvailabilityHeader) -> ExtendedHeader {
        let header = generate(&self.chain_id, self.current_header.as_ref(), dah);
        self.current_header = Some(header.clone());
        header
    }

    /// Generate the next amount of headers.
    pub fn next_many(&mut self, amount: u64) -> Vec<ExtendedHeader> {
        (0..amount).map(|_| self.next()).collect()
    }
}

impl Default for ExtendedHeaderGenerator {
    fn default() -> Self {
        ExtendedHeaderGenerator::new()
    }
}

/// Invalidate the provided header.
pub fn invalidate(header: &mut ExtendedHeader) {
    // clear `dah` but keep `data_hash` unchanged
    header.dah = DataAvailabilityHeader::new_unchecked(Vec::new(), Vec::new());

    header.validate().unwrap_err();
}

/// Generate random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

/// Generate a random version 0 namespace, valid for blobs.
pub fn random_namespace() -> Namespace {
    let mut id = [0u8; NS_ID_V0_SIZE];
    rand::thread_rng().fill_bytes(&mut id);
    // keep it above the reserved namespaces
    id[0] |= 0x01;

    Namespace::const_v0(id)
}

/// Generate a blob of a random namespace with `len` bytes of random data.
pub fn random_blob(len: usize) -> Blob {
    Blob::new(random_namespace(), random_bytes(len)).unwrap()
}

/// Lay out the blob at the start of a minimal square and prove its inclusion.
///
/// Returns the [`DataAvailabilityHeader`] of the square together with the
/// [`CommitmentProof`] of the blob, computed for the given subtree root threshold.
///
/// ```
/// use celestia_openrpc_types::test_utils::{generate_blob_square, random_blob};
///
/// let blob = random_blob(2000);
/// let (dah, proof) = generate_blob_square(&blob, 64);
///
/// proof.verify(&blob.commitment, dah.hash(), 64).unwrap();
/// ```
pub fn generate_blob_square(
    blob: &Blob,
    subtree_root_threshold: u64,
) -> (DataAvailabilityHeader, CommitmentProof) {
    let namespace = blob.namespace;
    let blob_shares = blob.to_shares().unwrap();
    let shares_count = blob_shares.len();

    let width = crate::blob::blob_min_square_size(shares_count as u64)
        .unwrap()
        .max(2) as usize;
    let rows_count = shares_count.div_ceil(width);

    let mut shares = blob_shares.clone();
    shares.extend(tail_padding_shares(width * width - shares_count).unwrap());

    let mut rows: Vec<_> = shares.chunks(width).map(tree_of).collect();
    let mut columns: Vec<_> = (0..width)
        .map(|col| {
            let column: Vec<_> = shares.iter().skip(col).step_by(width).cloned().collect();
            tree_of(&column)
        })
        .collect();

    let dah = DataAvailabilityHeader::new(
        rows.iter_mut().map(|tree| tree.root()).collect(),
        columns.iter_mut().map(|tree| tree.root()).collect(),
    )
    .unwrap();

    let subtree_width = subtree_width(shares_count as u64, subtree_root_threshold).unwrap();
    let mut subtree_roots = Vec::new();
    let mut start = 0;
    for size in merkle_mountain_range_sizes(shares_count as u64, subtree_width).unwrap() {
        let end = start + size as usize;
        subtree_roots.push(tree_of(&blob_shares[start..end]).root());
        start = end;
    }

    let subtree_root_proofs: Vec<NamespaceProof> = rows[..rows_count]
        .iter_mut()
        .map(|tree| tree.get_namespace_proof(*namespace).into())
        .collect();

    let proof = CommitmentProof::new(
        subtree_roots,
        subtree_root_proofs,
        namespace,
        dah.row_proof(0..=rows_count - 1).unwrap(),
    )
    .unwrap();

    (dah, proof)
}

fn tree_of(shares: &[Share]) -> Nmt {
    let mut tree = <Nmt as NmtExt>::default();
    for share in shares {
        tree.push_leaf(share.as_ref(), *share.namespace()).unwrap();
    }
    tree
}

fn default_dah() -> DataAvailabilityHeader {
    let root = tree_of(&tail_padding_shares(2).unwrap()).root();
    DataAvailabilityHeader::new(vec![root.clone(); 2], vec![root; 2]).unwrap()
}

fn random_block_id() -> tendermint::block::Id {
    tendermint::block::Id {
        hash: Hash::Sha256(rand::random()),
        part_set_header: parts::Header::new(1, Hash::Sha256(rand::random()))
            .expect("invalid PartSetHeader"),
    }
}

fn generate(
    chain_id: &chain::Id,
    current: Option<&ExtendedHeader>,
    dah: DataAvailabilityHeader,
) -> ExtendedHeader {
    let height = current.map_or(GENESIS_HEIGHT, |header| header.height().value() + 1);
    let time = Time::from_unix_timestamp(GENESIS_UNIX_TIME + height as i64, 0).unwrap();
    let validator_set = ValidatorSet::new(Vec::new(), None);

    let mut header = ExtendedHeader {
        header: Header {
            version: Version {
                block: BLOCK_PROTOCOL,
                app: AppVersion::latest().as_u64(),
            },
            chain_id: chain_id.clone(),
            height: height.try_into().unwrap(),
            time,
            last_block_id: current.map(|header| header.commit.block_id),
            last_commit_hash: Some(Hash::default_sha256()),
            data_hash: Some(Hash::Sha256(dah.hash())),
            validators_hash: validator_set.hash(),
            next_validators_hash: validator_set.hash(),
            consensus_hash: Hash::Sha256(rand::random()),
            app_hash: AppHash::default(),
            last_results_hash: Some(Hash::default_sha256()),
            evidence_hash: Some(Hash::default_sha256()),
            proposer_address: tendermint::account::Id::new(rand::random()),
        },
        commit: Commit {
            height: height.try_into().unwrap(),
            round: 0_u16.into(),
            block_id: random_block_id(),
            signatures: Vec::new(),
        },
        validator_set,
        dah,
    };

    header.commit.block_id.hash = header.header.hash();
    header.validate().expect("invalid header generated");

    if let Some(current) = current {
        current
            .verify_adjacent(&header)
            .expect("invalid header generated");
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::create_commitment;
    use crate::ErrorKind;

    #[test]
    fn generate_blocks() {
        let mut gen = ExtendedHeaderGenerator::new();

        let genesis = gen.next();
        assert_eq!(genesis.height().value(), 1);
        assert!(genesis.header.last_block_id.is_none());

        let height2 = gen.next();
        assert_eq!(height2.height().value(), 2);
        assert_eq!(height2.last_header_hash(), genesis.hash());
        genesis.verify_adjacent(&height2).unwrap();

        let another_chain = ExtendedHeaderGenerator::new().next_many(2);
        assert_ne!(another_chain[1].hash(), height2.hash());
    }

    #[test]
    fn invalidate_header() {
        let mut header = ExtendedHeaderGenerator::new().next();
        invalidate(&mut header);

        header.validate().unwrap_err();
    }

    #[test]
    fn random_namespaces_are_for_blobs() {
        for _ in 0..32 {
            random_namespace().validate_for_blob().unwrap();
        }
    }

    #[test]
    fn blob_square_proofs() {
        for (len, threshold) in [(100, 64), (2000, 64), (20_000, 64), (20_000, 4), (5000, 1)] {
            let blob = random_blob(len);
            let (dah, proof) = generate_blob_square(&blob, threshold);
            // blob's own commitment is computed with the threshold of its app version
            let commitment =
                create_commitment(blob.namespace, &blob.data, blob.share_version, threshold)
                    .unwrap();

            proof.verify(&commitment, dah.hash(), threshold).unwrap();

            let other = random_blob(len);
            let err = proof
                .verify(&other.commitment, dah.hash(), threshold)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidProof);
        }
    }

    #[test]
    fn header_with_blob_square() {
        let blob = random_blob(1000);
        let (dah, proof) = generate_blob_square(&blob, 64);
        let header = ExtendedHeaderGenerator::new().next_with_dah(dah);

        proof
            .verify(&blob.commitment, header.data_root().unwrap(), 64)
            .unwrap();
    }
}
