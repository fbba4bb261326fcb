//! Hashes of the headers as used by the node.

/// The hash of a block header, as returned by `header.GetByHash` queries.
pub type Hash = tendermint::hash::Hash;

/// A trait extending [`Hash`] functionality.
///
/// [`Hash`]: crate::hash::Hash
pub trait HashExt {
    /// Get the `SHA256` hash of an empty input.
    ///
    /// This is equivalent to `sha256sum /dev/null`.
    fn default_sha256() -> Hash;

    /// Get the raw 32 bytes of a `SHA256` hash, or `None` for an empty hash.
    fn as_sha256(&self) -> Option<crate::merkle::Hash>;
}

impl HashExt for Hash {
    fn default_sha256() -> Hash {
        Hash::Sha256(crate::merkle::empty_hash())
    }

    fn as_sha256(&self) -> Option<crate::merkle::Hash> {
        match self {
            Hash::Sha256(hash) => Some(*hash),
            Hash::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sha256_is_hash_of_nothing() {
        let hash = Hash::default_sha256();

        assert_eq!(
            hash.to_string(),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
        assert_eq!(hash.as_sha256(), Some(crate::merkle::empty_hash()));
        assert_eq!(Hash::None.as_sha256(), None);
    }
}
