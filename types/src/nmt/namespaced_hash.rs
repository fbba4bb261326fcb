use crate::nmt::{MerkleHash, NamespacedHash, NamespacedSha2Hasher, NS_SIZE};
use crate::{Error, Result};

/// Size of the hash part of the [`NamespacedHash`].
pub const HASH_SIZE: usize = 32;
/// Size of the whole [`NamespacedHash`], `min | max | hash`.
pub const NAMESPACED_HASH_SIZE: usize = NS_SIZE * 2 + HASH_SIZE;

/// Raw bytes of the [`NamespacedHash`].
pub type RawNamespacedHash = [u8; NAMESPACED_HASH_SIZE];

/// An extention trait for the [`NamespacedHash`] to perform additional actions.
pub trait NamespacedHashExt {
    /// Get the hash of the root of an empty [`Nmt`].
    ///
    /// [`Nmt`]: crate::nmt::Nmt
    fn empty_root() -> NamespacedHash;

    /// Try to decode [`NamespacedHash`] from the raw bytes.
    fn from_raw(bytes: &[u8]) -> Result<NamespacedHash>;

    /// Convert [`NamespacedHash`] to a byte vector.
    fn to_vec(&self) -> Vec<u8>;

    /// Convert [`NamespacedHash`] to a byte array.
    fn to_array(&self) -> RawNamespacedHash;

    /// Check that the minimal namespace isn't greater than the maximal one.
    fn validate_namespace_order(&self) -> Result<()>;
}

impl NamespacedHashExt for NamespacedHash {
    fn empty_root() -> NamespacedHash {
        NamespacedSha2Hasher::EMPTY_ROOT
    }

    fn from_raw(bytes: &[u8]) -> Result<NamespacedHash> {
        if bytes.len() != NAMESPACED_HASH_SIZE {
            return Err(Error::InvalidNamespacedHash);
        }

        let mut min_ns = [0u8; NS_SIZE];
        let mut max_ns = [0u8; NS_SIZE];
        let mut hash = [0u8; HASH_SIZE];

        min_ns.copy_from_slice(&bytes[..NS_SIZE]);
        max_ns.copy_from_slice(&bytes[NS_SIZE..NS_SIZE * 2]);
        hash.copy_from_slice(&bytes[NS_SIZE * 2..]);

        Ok(NamespacedHash::new(
            nmt_rs::NamespaceId(min_ns),
            nmt_rs::NamespaceId(max_ns),
            hash,
        ))
    }

    fn to_vec(&self) -> Vec<u8> {
        self.to_array().to_vec()
    }

    fn to_array(&self) -> RawNamespacedHash {
        let mut out = [0u8; NAMESPACED_HASH_SIZE];
        out[..NS_SIZE].copy_from_slice(&self.min_namespace().0);
        out[NS_SIZE..NS_SIZE * 2].copy_from_slice(&self.max_namespace().0);
        out[NS_SIZE * 2..].copy_from_slice(&self.hash());
        out
    }

    fn validate_namespace_order(&self) -> Result<()> {
        if self.min_namespace() > self.max_namespace() {
            return Err(Error::InvalidNamespacedHash);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        let mut raw = [0u8; NAMESPACED_HASH_SIZE];
        raw[NS_SIZE - 1] = 1;
        raw[NS_SIZE * 2 - 1] = 2;
        raw[NS_SIZE * 2..].copy_from_slice(&[7; HASH_SIZE]);

        let hash = NamespacedHash::from_raw(&raw).unwrap();
        assert_eq!(hash.min_namespace().0[NS_SIZE - 1], 1);
        assert_eq!(hash.max_namespace().0[NS_SIZE - 1], 2);
        assert_eq!(hash.hash(), [7; HASH_SIZE]);
        assert_eq!(hash.to_array(), raw);
        hash.validate_namespace_order().unwrap();
    }

    #[test]
    fn wrong_size() {
        NamespacedHash::from_raw(&[0; NAMESPACED_HASH_SIZE - 1]).unwrap_err();
        NamespacedHash::from_raw(&[0; NAMESPACED_HASH_SIZE + 1]).unwrap_err();
    }

    #[test]
    fn min_above_max() {
        let mut raw = [0u8; NAMESPACED_HASH_SIZE];
        raw[NS_SIZE - 1] = 2;
        raw[NS_SIZE * 2 - 1] = 1;

        let hash = NamespacedHash::from_raw(&raw).unwrap();
        hash.validate_namespace_order().unwrap_err();
    }
}
