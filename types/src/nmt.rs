//! Namespaces and the namespaced merkle tree primitives used in Celestia.
//!
//! Every piece of data in the data square belongs to some [`Namespace`].
//! Row and column roots of the square are roots of [`Nmt`]s, which keep
//! track of the minimal and maximal namespace of their leaves, allowing
//! proofs of presence and absence of the namespaced data.

use std::fmt;
use std::ops::Deref;

use base64::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

mod namespace_proof;
mod namespaced_hash;
mod namespaced_merkle_tree;
mod subtree_root;

pub use self::namespace_proof::NamespaceProof;
pub use self::namespaced_hash::{
    NamespacedHashExt, RawNamespacedHash, HASH_SIZE, NAMESPACED_HASH_SIZE,
};
pub use self::namespaced_merkle_tree::{MerkleHash, NamespacedSha2Hasher, Nmt, NmtExt};
pub use self::subtree_root::{to_leaf_ranges, verify_subtree_roots_inclusion};

use crate::{Error, Result};

/// The size of the [`Namespace`] version in bytes.
pub const NS_VER_SIZE: usize = 1;
/// The size of the [`Namespace`] id in bytes.
pub const NS_ID_SIZE: usize = 28;
/// The size of the [`Namespace`] in bytes.
pub const NS_SIZE: usize = NS_VER_SIZE + NS_ID_SIZE;
/// The amount of the user definable bytes of the version 0 [`Namespace`] id.
pub const NS_ID_V0_SIZE: usize = 10;
/// The amount of leading zeroes required in the version 0 [`Namespace`] id.
pub const NS_ID_V0_PREFIX_SIZE: usize = NS_ID_SIZE - NS_ID_V0_SIZE;

/// Namespace aware hash of a node in the [`Nmt`].
pub type NamespacedHash = nmt_rs::NamespacedHash<NS_SIZE>;

/// Namespace of the data published to the celestia network.
///
/// The [`Namespace`] is a single byte defining the version
/// followed by 28 bytes specifying concrete ID of the namespace.
///
/// Currently there are two versions of namespaces:
///
///  - version `0` - the one allowing for the custom namespace ids. It requires an id to start
///    with 18 `0x00` bytes followed by a user specified suffix (10 bytes).
///    It also allows for defining special reserved namespaces.
///  - version `255` - for the secondary reserved namespaces: parity shares and tail padding.
///
/// Namespaces are ordered lexicographically over all of their 29 bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd)]
pub struct Namespace(nmt_rs::NamespaceId<NS_SIZE>);

impl Namespace {
    /// Primary reserved [`Namespace`] for the compact `Share`s with `cosmos SDK` transactions.
    pub const TRANSACTION: Namespace = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    /// Primary reserved [`Namespace`] for the intermediate state roots.
    pub const INTERMEDIATE_STATE_ROOTS: Namespace =
        Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);

    /// Primary reserved [`Namespace`] for the compact `Share`s with `MsgPayForBlobs` transactions.
    pub const PAY_FOR_BLOB: Namespace = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 4]);

    /// Primary reserved [`Namespace`] for the `Share`s used for padding.
    ///
    /// `Share`s with this namespace are inserted after other shares from primary reserved namespace
    /// so that user-defined namespaces are correctly aligned in `ExtendedDataSquare`
    pub const PRIMARY_RESERVED_PADDING: Namespace = Namespace::MAX_PRIMARY_RESERVED;

    /// Maximal primary reserved [`Namespace`].
    ///
    /// Used to indicate the end of the primary reserved group.
    pub const MAX_PRIMARY_RESERVED: Namespace =
        Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff]);

    /// Minimal secondary reserved [`Namespace`].
    ///
    /// Used to indicate the beginning of the secondary reserved group.
    pub const MIN_SECONDARY_RESERVED: Namespace = Namespace::const_v255(0);

    /// Secondary reserved [`Namespace`] used for padding after the blobs.
    ///
    /// It is used to fill up the `original data square` after all user-submitted
    /// blobs before the parity data is generated for the `ExtendedDataSquare`.
    pub const TAIL_PADDING: Namespace = Namespace::const_v255(0xfe);

    /// The [`Namespace`] for `parity shares`.
    ///
    /// It is the namespace with which all the `parity shares` from
    /// `ExtendedDataSquare` are inserted to the `Nmt` when computing
    /// merkle roots.
    pub const PARITY_SHARE: Namespace = Namespace::const_v255(0xff);

    /// Create a new [`Namespace`] from the raw bytes.
    ///
    /// # Errors
    ///
    /// This function will return an error if the slice length is different than
    /// [`NS_SIZE`] or if the namespace is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::nmt::{Namespace, NS_SIZE};
    ///
    /// let raw = [0; NS_SIZE];
    /// let namespace = Namespace::from_raw(&raw).unwrap();
    /// ```
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != NS_SIZE {
            return Err(Error::InvalidNamespaceSize(bytes.len()));
        }

        Namespace::new(bytes[0], &bytes[1..])
    }

    /// Create a new [`Namespace`] from the version and id.
    ///
    /// # Errors
    ///
    /// This function will return an error if provided namespace version isn't supported
    /// or if the namespace is invalid.
    pub fn new(version: u8, id: &[u8]) -> Result<Self> {
        match version {
            0 => Self::new_v0(id),
            255 => Self::new_v255(id),
            n => Err(Error::UnsupportedNamespaceVersion(n)),
        }
    }

    /// Create a new [`Namespace`] version `0` with given id.
    ///
    /// The `id` must be either:
    ///  - a 28 byte slice specifying full id
    ///  - a 10 or less byte slice specifying user-defined suffix
    ///
    /// [`Namespace`]s in version 0 must have id's prefixed with 18 `0x00` bytes.
    ///
    /// # Errors
    ///
    /// This function will return an error if the provided id has incorrect length
    /// or if the `id` has 28 bytes and doesn't have mandatory 18x`0x00` bytes prefix
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::nmt::Namespace;
    ///
    /// let namespace = Namespace::new_v0(b"openrpc").unwrap();
    /// assert_eq!(&namespace.as_bytes()[22..], b"openrpc");
    /// ```
    pub fn new_v0(id: &[u8]) -> Result<Self> {
        let id_pos = match id.len() {
            // full id with the prefix
            NS_ID_SIZE => NS_ID_V0_PREFIX_SIZE,
            // user defined suffix
            n if n <= NS_ID_V0_SIZE => 0,
            n => return Err(Error::InvalidNamespaceIdSize(n)),
        };

        let (prefix, id) = id.split_at(id_pos);

        if !prefix.iter().all(|&x| x == 0) {
            return Err(Error::InvalidNamespaceV0Prefix);
        }

        let mut bytes = [0u8; NS_SIZE];
        bytes[NS_SIZE - id.len()..].copy_from_slice(id);

        Ok(Namespace(nmt_rs::NamespaceId(bytes)))
    }

    /// Create a new [`Namespace`] version `0` with a given id.
    ///
    /// The `id` is placed after the mandatory 18 zero bytes.
    pub const fn const_v0(id: [u8; NS_ID_V0_SIZE]) -> Self {
        let mut bytes = [0u8; NS_SIZE];
        let start = NS_SIZE - NS_ID_V0_SIZE;

        let mut i = 0;
        while i < NS_ID_V0_SIZE {
            bytes[start + i] = id[i];
            i += 1;
        }

        Namespace(nmt_rs::NamespaceId(bytes))
    }

    /// Create a new [`Namespace`] version `255` with the last byte of its id set to `id`.
    ///
    /// All the other bytes of the id are `0xff`.
    pub const fn const_v255(id: u8) -> Self {
        let mut bytes = [0xff; NS_SIZE];
        bytes[NS_SIZE - 1] = id;
        Namespace(nmt_rs::NamespaceId(bytes))
    }

    /// Create a new [`Namespace`] version `255` with a full 28 byte id.
    ///
    /// # Errors
    ///
    /// This function will return an error if the `id` isn't 28 bytes long.
    pub fn new_v255(id: &[u8]) -> Result<Self> {
        if id.len() != NS_ID_SIZE {
            return Err(Error::InvalidNamespaceIdSize(id.len()));
        }

        let mut bytes = [0xff; NS_SIZE];
        bytes[NS_VER_SIZE..].copy_from_slice(id);

        Ok(Namespace(nmt_rs::NamespaceId(bytes)))
    }

    /// Create a new [`Namespace`] from raw bytes without any checks.
    ///
    /// Use [`Namespace::validate`] to check the result later.
    pub const fn new_unchecked(bytes: [u8; NS_SIZE]) -> Self {
        Namespace(nmt_rs::NamespaceId(bytes))
    }

    /// Converts the [`Namespace`] to a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0 .0
    }

    /// Returns the first byte indicating the version of the [`Namespace`].
    pub fn version(&self) -> u8 {
        self.as_bytes()[0]
    }

    /// Returns the trailing 28 bytes indicating the id of the [`Namespace`].
    pub fn id(&self) -> &[u8] {
        &self.as_bytes()[NS_VER_SIZE..]
    }

    /// Returns the user definable suffix of the version `0` [`Namespace`].
    ///
    /// Returns `None` for the other versions.
    pub fn id_v0(&self) -> Option<&[u8]> {
        if self.version() == 0 {
            Some(&self.as_bytes()[NS_SIZE - NS_ID_V0_SIZE..])
        } else {
            None
        }
    }

    /// Check the version and the id prefix of the [`Namespace`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the version is neither `0` nor `255`
    /// or if a version `0` namespace doesn't start with 18 zero bytes.
    pub fn validate(&self) -> Result<()> {
        match self.version() {
            0 => {
                let prefix = &self.id()[..NS_ID_V0_PREFIX_SIZE];
                if prefix.iter().all(|&x| x == 0) {
                    Ok(())
                } else {
                    Err(Error::InvalidNamespaceV0Prefix)
                }
            }
            255 => Ok(()),
            n => Err(Error::UnsupportedNamespaceVersion(n)),
        }
    }

    /// Check whether the [`Namespace`] can hold data shares.
    ///
    /// Parity and tail padding namespaces are forbidden.
    pub fn validate_for_data(&self) -> Result<()> {
        self.validate()?;

        if *self == Namespace::PARITY_SHARE || *self == Namespace::TAIL_PADDING {
            return Err(Error::ForbiddenDataNamespace(self.to_string()));
        }

        Ok(())
    }

    /// Check whether the [`Namespace`] can be used for the user submitted blobs.
    ///
    /// Blob namespaces need to be version `0` and strictly greater than
    /// [`Namespace::MAX_PRIMARY_RESERVED`].
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::nmt::Namespace;
    ///
    /// assert!(Namespace::new_v0(&[1, 2, 3]).unwrap().validate_for_blob().is_ok());
    /// assert!(Namespace::PAY_FOR_BLOB.validate_for_blob().is_err());
    /// ```
    pub fn validate_for_blob(&self) -> Result<()> {
        self.validate_for_data()?;

        if *self <= Namespace::MAX_PRIMARY_RESERVED {
            return Err(Error::ReservedBlobNamespace(self.to_string()));
        }

        if self.version() != 0 {
            return Err(Error::UnsupportedNamespaceVersion(self.version()));
        }

        Ok(())
    }

    /// Returns true if the namespace is the primary reserved namespace for transactions.
    pub fn is_tx(&self) -> bool {
        *self == Namespace::TRANSACTION
    }

    /// Returns true if the namespace is the primary reserved namespace for `MsgPayForBlobs`.
    pub fn is_pay_for_blob(&self) -> bool {
        *self == Namespace::PAY_FOR_BLOB
    }

    /// Returns true if the namespace is in the primary or secondary reserved range.
    pub fn is_reserved(&self) -> bool {
        *self <= Namespace::MAX_PRIMARY_RESERVED || *self >= Namespace::MIN_SECONDARY_RESERVED
    }

    /// Returns true if the namespace is greater than the maximal namespace of the node hash.
    pub fn is_above_max(&self, node_hash: &NamespacedHash) -> bool {
        self.0 > node_hash.max_namespace()
    }

    /// Returns true if the namespace is less than the minimal namespace of the node hash.
    pub fn is_below_min(&self, node_hash: &NamespacedHash) -> bool {
        self.0 < node_hash.min_namespace()
    }

    /// Returns true if the namespace is outside the range spanned by two node hashes.
    ///
    /// The `left` node provides the minimum and the `right` node the maximum.
    pub fn is_outside_range(&self, left: &NamespacedHash, right: &NamespacedHash) -> bool {
        self.is_below_min(left) || self.is_above_max(right)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Deref for Namespace {
    type Target = nmt_rs::NamespaceId<NS_SIZE>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Namespace> for nmt_rs::NamespaceId<NS_SIZE> {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

impl TryFrom<nmt_rs::NamespaceId<NS_SIZE>> for Namespace {
    type Error = Error;

    fn try_from(value: nmt_rs::NamespaceId<NS_SIZE>) -> Result<Self, Self::Error> {
        Namespace::from_raw(&value.0)
    }
}

impl TryFrom<&[u8]> for Namespace {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Namespace::from_raw(value)
    }
}

impl Serialize for Namespace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = BASE64_STANDARD.encode(self.as_bytes());
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let bytes = BASE64_STANDARD
            .decode(s)
            .map_err(|e| serde::de::Error::custom(e.to_string()))?;

        Namespace::from_raw(&bytes).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn namespace_id_8_bytes() {
        let nid = Namespace::new_v0(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let expected_nid = Namespace(nmt_rs::NamespaceId([
            0, // version
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // prefix
            0, 0, 1, 2, 3, 4, 5, 6, 7, 8, // id with left padding
        ]));

        assert_eq!(nid, expected_nid);
    }

    #[test]
    fn namespace_id_10_bytes() {
        let nid = Namespace::new_v0(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap();
        let expected_nid = Namespace(nmt_rs::NamespaceId([
            0, // version
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // prefix
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, // id
        ]));

        assert_eq!(nid, expected_nid);
        assert_eq!(nid.id_v0(), Some(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10][..]));
        nid.validate_for_blob().unwrap();
    }

    #[test]
    fn namespace_id_11_bytes() {
        let e = Namespace::new_v0(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]).unwrap_err();
        assert!(matches!(e, Error::InvalidNamespaceIdSize(11)));
    }

    #[test]
    fn namespace_id_v0_full_id() {
        let mut id = [0; NS_ID_SIZE];
        id[NS_ID_SIZE - 1] = 7;
        let nid = Namespace::new_v0(&id).unwrap();
        assert_eq!(nid, Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 7]));

        id[0] = 1;
        let e = Namespace::new_v0(&id).unwrap_err();
        assert!(matches!(e, Error::InvalidNamespaceV0Prefix));
    }

    #[test]
    fn non_zero_prefix_fails_validation() {
        let mut raw = [0u8; NS_SIZE];
        raw[5] = 1;
        raw[NS_SIZE - 1] = 1;

        let ns = Namespace::new_unchecked(raw);
        assert!(matches!(ns.validate(), Err(Error::InvalidNamespaceV0Prefix)));
        Namespace::from_raw(&raw).unwrap_err();
    }

    #[test]
    fn unsupported_version() {
        let mut raw = [0u8; NS_SIZE];
        raw[0] = 1;

        let e = Namespace::from_raw(&raw).unwrap_err();
        assert!(matches!(e, Error::UnsupportedNamespaceVersion(1)));
        assert_eq!(e.kind(), crate::ErrorKind::InvalidNamespace);
    }

    #[test]
    fn invalid_size() {
        let e = Namespace::from_raw(&[0; NS_SIZE - 1]).unwrap_err();
        assert!(matches!(e, Error::InvalidNamespaceSize(28)));
        Namespace::from_raw(&[0; NS_SIZE + 1]).unwrap_err();
    }

    #[test]
    fn reserved_namespaces() {
        for ns in [
            Namespace::TRANSACTION,
            Namespace::INTERMEDIATE_STATE_ROOTS,
            Namespace::PAY_FOR_BLOB,
            Namespace::PRIMARY_RESERVED_PADDING,
            Namespace::MAX_PRIMARY_RESERVED,
        ] {
            ns.validate().unwrap();
            ns.validate_for_data().unwrap();
            assert!(matches!(
                ns.validate_for_blob(),
                Err(Error::ReservedBlobNamespace(_))
            ));
            assert!(ns.is_reserved());
        }

        for ns in [Namespace::TAIL_PADDING, Namespace::PARITY_SHARE] {
            ns.validate().unwrap();
            assert!(matches!(
                ns.validate_for_data(),
                Err(Error::ForbiddenDataNamespace(_))
            ));
            ns.validate_for_blob().unwrap_err();
            assert!(ns.is_reserved());
        }

        // data of version 255 is allowed, blobs must be version 0
        let ns = Namespace::new_v255(&[0; NS_ID_SIZE]).unwrap();
        ns.validate_for_data().unwrap();
        assert!(matches!(
            ns.validate_for_blob(),
            Err(Error::UnsupportedNamespaceVersion(255))
        ));

        assert!(Namespace::TRANSACTION.is_tx());
        assert!(Namespace::PAY_FOR_BLOB.is_pay_for_blob());
        assert_eq!(
            Namespace::TAIL_PADDING.as_bytes(),
            &[
                0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
                0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
                0xfe
            ]
        );
        assert_eq!(Namespace::PARITY_SHARE.as_bytes(), &[0xff; NS_SIZE]);
    }

    #[test]
    fn secondary_reserved_v255() {
        let ns = Namespace::new(255, &[0xff; NS_ID_SIZE]).unwrap();
        assert_eq!(ns, Namespace::PARITY_SHARE);
        Namespace::new(255, &[0xff; NS_ID_V0_SIZE]).unwrap_err();

        let mut id = [0xff; NS_ID_SIZE];
        id[NS_ID_SIZE - 1] = 0xfe;
        assert_eq!(Namespace::new(255, &id).unwrap(), Namespace::TAIL_PADDING);
    }

    #[test]
    fn range_checks() {
        let ns1 = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10]);
        let ns2 = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 0x20]);
        let ns3 = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, 0x30]);
        let hash = NamespacedHash::new(*ns1, *ns2, [0; HASH_SIZE]);

        assert!(!ns1.is_below_min(&hash));
        assert!(!ns2.is_above_max(&hash));
        assert!(ns3.is_above_max(&hash));
        assert!(Namespace::TRANSACTION.is_below_min(&hash));
        assert!(ns3.is_outside_range(&hash, &hash));
        assert!(!ns2.is_outside_range(&hash, &hash));
    }

    #[test]
    fn serde() {
        let ns = Namespace::new_v0(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let json = serde_json::to_string(&ns).unwrap();
        assert_eq!(json, r#""AAAAAAAAAAAAAAAAAAAAAAAAAAAAAQIDBAUGBwg=""#);

        let decoded: Namespace = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, ns);

        serde_json::from_str::<Namespace>(r#""AAAA""#).unwrap_err();
    }

    #[test]
    fn display_as_hex() {
        let ns = Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0xab, 0x01]);
        assert_eq!(ns.to_string(), format!("{}ab01", "00".repeat(27)));
    }

    proptest! {
        #[test]
        fn ordering_is_total_and_bytewise(a: [u8; NS_ID_V0_SIZE], b: [u8; NS_ID_V0_SIZE]) {
            let ns_a = Namespace::const_v0(a);
            let ns_b = Namespace::const_v0(b);

            let lt = ns_a < ns_b;
            let eq = ns_a == ns_b;
            let gt = ns_a > ns_b;
            prop_assert_eq!(lt as u8 + eq as u8 + gt as u8, 1);
            prop_assert_eq!(ns_a.cmp(&ns_b), ns_a.as_bytes().cmp(ns_b.as_bytes()));
        }
    }
}
