//! Binary merkle tree as specified in [RFC-6962].
//!
//! Leaves are hashed as `sha256(0x00 | leaf)` and inner nodes as
//! `sha256(0x01 | left | right)`. An empty tree hashes to `sha256("")`.
//!
//! [RFC-6962]: https://www.rfc-editor.org/rfc/rfc6962#section-2.1

use sha2::{Digest, Sha256};

use crate::consts::HASH_SIZE;

/// A raw sha256 hash.
pub type Hash = [u8; HASH_SIZE];

const LEAF_PREFIX: u8 = 0;
const INNER_PREFIX: u8 = 1;

/// Hash of an empty tree.
pub fn empty_hash() -> Hash {
    Sha256::digest(b"").into()
}

/// Hash of a single leaf.
pub fn leaf_hash(leaf: &[u8]) -> Hash {
    Sha256::new()
        .chain_update([LEAF_PREFIX])
        .chain_update(leaf)
        .finalize()
        .into()
}

/// Hash of an inner node.
pub fn inner_hash(left: &Hash, right: &Hash) -> Hash {
    Sha256::new()
        .chain_update([INNER_PREFIX])
        .chain_update(left)
        .chain_update(right)
        .finalize()
        .into()
}

/// The number of leaves in the left subtree of a tree with `length` leaves.
///
/// It is the largest power of two strictly less than `length`, so a tree
/// of `2^n` leaves is split in halves. Returns `0` for trees smaller than 2.
pub fn split_point(length: usize) -> usize {
    if length < 2 {
        return 0;
    }

    let k = 1 << length.ilog2();
    if k == length {
        k >> 1
    } else {
        k
    }
}

/// Compute the root hash of the tree built over the `items`.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::merkle::{hash_from_byte_slices, leaf_hash};
///
/// assert_eq!(hash_from_byte_slices(&[b"a"]), leaf_hash(b"a"));
/// ```
pub fn hash_from_byte_slices(items: &[impl AsRef<[u8]>]) -> Hash {
    match items.len() {
        0 => empty_hash(),
        1 => leaf_hash(items[0].as_ref()),
        n => {
            let (left, right) = items.split_at(split_point(n));
            inner_hash(&hash_from_byte_slices(left), &hash_from_byte_slices(right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tendermint::crypto::default::Sha256 as TmSha256;
    use tendermint::merkle::simple_hash_from_byte_vectors;

    #[test]
    fn empty_tree() {
        // sha256("")
        assert_eq!(
            empty_hash(),
            [
                0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
                0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
                0x78, 0x52, 0xb8, 0x55,
            ]
        );
        assert_eq!(hash_from_byte_slices(&Vec::<Vec<u8>>::new()), empty_hash());
    }

    #[test]
    fn split_points() {
        assert_eq!(split_point(1), 0);
        assert_eq!(split_point(2), 1);
        assert_eq!(split_point(3), 2);
        assert_eq!(split_point(4), 2);
        assert_eq!(split_point(5), 4);
        assert_eq!(split_point(8), 4);
        assert_eq!(split_point(9), 8);
        assert_eq!(split_point(100), 64);
    }

    #[test]
    fn three_leaves() {
        let items: [&[u8]; 3] = [b"a", b"b", b"c"];
        let expected = inner_hash(
            &inner_hash(&leaf_hash(b"a"), &leaf_hash(b"b")),
            &leaf_hash(b"c"),
        );
        assert_eq!(hash_from_byte_slices(&items), expected);
    }

    proptest! {
        #[test]
        fn split_point_is_largest_smaller_power_of_two(n in 2usize..1_000_000) {
            let k = split_point(n);
            prop_assert!(k.is_power_of_two());
            prop_assert!(k < n);
            prop_assert!(k * 2 >= n);
        }

        #[test]
        fn tendermint_compatibility(leaves in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..40)) {
            let root = hash_from_byte_slices(&leaves);
            let tendermint_root = simple_hash_from_byte_vectors::<TmSha256>(&leaves);

            prop_assert_eq!(root, tendermint_root);
        }
    }
}
