//! Types related to creation and submission of blobs.

use std::iter;

use serde::{Deserialize, Serialize};

mod commitment;
mod commitment_proof;

use crate::consts::appconsts;
use crate::consts::appconsts::AppVersion;
use crate::nmt::Namespace;
use crate::share::{Share, SparseShareSplitter};
use crate::{Error, Result};

pub use self::commitment::{
    blob_min_square_size, create_commitment, create_commitments, round_down_to_power_of_2,
    round_up_to_power_of_2, subtree_width, Commitment,
};
pub use self::commitment_proof::{CommitmentProof, Proof, SubscriptionResponse};
pub(crate) use self::commitment::merkle_mountain_range_sizes;

/// Arbitrary data that can be stored in the network within certain [`Namespace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "custom_serde::SerdeBlob", into = "custom_serde::SerdeBlob")]
pub struct Blob {
    /// A [`Namespace`] the [`Blob`] belongs to.
    pub namespace: Namespace,
    /// Data stored within the [`Blob`].
    pub data: Vec<u8>,
    /// Version indicating the format in which [`Share`]s should be created from this [`Blob`].
    pub share_version: u8,
    /// A [`Commitment`] computed from the [`Blob`]s data.
    pub commitment: Commitment,
    /// Index of the blob's first share in the EDS. Only set for blobs retrieved from chain.
    pub index: Option<u64>,
}

impl Blob {
    /// Create a new blob with the given data within the [`Namespace`].
    ///
    /// The blob uses the share version `0` and the commitment is computed with
    /// the parameters of the latest [`AppVersion`].
    ///
    /// # Errors
    ///
    /// This function propagates any error from the [`Commitment`] creation.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::{Blob, nmt::Namespace};
    ///
    /// let my_namespace = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    /// let blob = Blob::new(my_namespace, b"some data to store on blockchain".to_vec())
    ///     .expect("Failed to create a blob");
    ///
    /// assert_eq!(
    ///     &serde_json::to_string_pretty(&blob).unwrap(),
    ///     indoc::indoc! {r#"{
    ///       "namespace": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAQIDBAU=",
    ///       "data": "c29tZSBkYXRhIHRvIHN0b3JlIG9uIGJsb2NrY2hhaW4=",
    ///       "share_version": 0,
    ///       "commitment": "m0A4feU6Fqd5Zy9td3M7lntG8A3PKqe6YdugmAsWz28="
    ///     }"#},
    /// );
    /// ```
    pub fn new(namespace: Namespace, data: Vec<u8>) -> Result<Blob> {
        Blob::new_with_version(
            namespace,
            data,
            appconsts::SHARE_VERSION_ZERO,
            AppVersion::latest(),
        )
    }

    /// Create a new blob with explicit share version, computing the commitment
    /// with the parameters of the given [`AppVersion`].
    ///
    /// # Errors
    ///
    /// This function propagates any error from the [`Commitment`] creation.
    pub fn new_with_version(
        namespace: Namespace,
        data: Vec<u8>,
        share_version: u8,
        app_version: AppVersion,
    ) -> Result<Blob> {
        let commitment = Commitment::from_blob(namespace, &data, share_version, app_version)?;

        Ok(Blob {
            namespace,
            data,
            share_version,
            commitment,
            index: None,
        })
    }

    /// Validate [`Blob`]s data with the [`Commitment`] it has.
    ///
    /// # Errors
    ///
    /// If validation fails, this function will return an error with a reason of failure.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::Blob;
    /// # use celestia_openrpc_types::consts::appconsts::AppVersion;
    /// # use celestia_openrpc_types::nmt::Namespace;
    /// #
    /// # let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    ///
    /// let mut blob = Blob::new(namespace, b"foo".to_vec()).unwrap();
    ///
    /// assert!(blob.validate(AppVersion::V2).is_ok());
    ///
    /// let other_blob = Blob::new(namespace, b"bar".to_vec()).unwrap();
    /// blob.commitment = other_blob.commitment;
    ///
    /// assert!(blob.validate(AppVersion::V2).is_err());
    /// ```
    pub fn validate(&self, app_version: AppVersion) -> Result<()> {
        let computed_commitment =
            Commitment::from_blob(self.namespace, &self.data, self.share_version, app_version)?;

        if self.commitment != computed_commitment {
            return Err(Error::CommitmentMismatch {
                expected: self.commitment.to_string(),
                computed: computed_commitment.to_string(),
            });
        }

        Ok(())
    }

    /// Validate [`Blob`]s data with a [`Commitment`].
    ///
    /// # Errors
    ///
    /// If validation fails, this function will return an error with a reason of failure.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::Blob;
    /// # use celestia_openrpc_types::consts::appconsts::AppVersion;
    /// # use celestia_openrpc_types::nmt::Namespace;
    /// #
    /// # let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    ///
    /// let blob = Blob::new(namespace, b"foo".to_vec()).unwrap();
    /// let commitment = blob.commitment;
    ///
    /// assert!(blob.validate_with_commitment(&commitment, AppVersion::V2).is_ok());
    ///
    /// let other_commitment = Blob::new(namespace, b"bar".to_vec())
    ///     .unwrap()
    ///     .commitment;
    ///
    /// assert!(blob.validate_with_commitment(&other_commitment, AppVersion::V2).is_err());
    /// ```
    pub fn validate_with_commitment(
        &self,
        commitment: &Commitment,
        app_version: AppVersion,
    ) -> Result<()> {
        self.validate(app_version)?;

        if self.commitment != *commitment {
            return Err(Error::CommitmentMismatch {
                expected: commitment.to_string(),
                computed: self.commitment.to_string(),
            });
        }

        Ok(())
    }

    /// Encode the blob into a sequence of shares.
    ///
    /// Check the [`Share`] documentation for more information about the share format.
    ///
    /// # Errors
    ///
    /// This function will return an error if the share version is not supported
    /// or the data length overflows [`u32`].
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::Blob;
    /// # use celestia_openrpc_types::nmt::Namespace;
    /// # let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    ///
    /// let blob = Blob::new(namespace, b"foo".to_vec()).unwrap();
    /// let shares = blob.to_shares().unwrap();
    ///
    /// assert_eq!(shares.len(), 1);
    /// ```
    pub fn to_shares(&self) -> Result<Vec<Share>> {
        let mut splitter = SparseShareSplitter::new();
        splitter.write(self)?;
        Ok(splitter.export())
    }

    /// Reconstructs a blob from shares.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - there is not enough shares to reconstruct the blob
    /// - blob doesn't start with the first share
    /// - shares are from any reserved namespace
    /// - shares for the blob have different namespaces / share version
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::{AppVersion, Blob};
    /// # use celestia_openrpc_types::nmt::Namespace;
    /// # let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    ///
    /// let blob = Blob::new(namespace, b"foo".to_vec()).unwrap();
    /// let shares = blob.to_shares().unwrap();
    ///
    /// let reconstructed = Blob::reconstruct(&shares, AppVersion::V2).unwrap();
    ///
    /// assert_eq!(blob, reconstructed);
    /// ```
    pub fn reconstruct<'a, I>(shares: I, app_version: AppVersion) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Share>,
    {
        let mut shares = shares.into_iter();
        let first_share = shares.next().ok_or(Error::MissingShares {
            expected: 1,
            got: 0,
        })?;
        let blob_len = first_share
            .sequence_length()
            .ok_or(Error::ExpectedShareWithSequenceStart)?;
        let namespace = first_share.namespace();
        if namespace.is_reserved() {
            return Err(Error::ReservedBlobNamespace(namespace.to_string()));
        }
        let share_version = first_share.info_byte().version();

        let shares_needed = shares_needed_for_blob(blob_len as usize);
        let mut data =
            Vec::with_capacity(shares_needed * appconsts::CONTINUATION_SPARSE_SHARE_CONTENT_SIZE);
        data.extend_from_slice(first_share.payload());

        for got in 1..shares_needed {
            let share = shares.next().ok_or(Error::MissingShares {
                expected: shares_needed,
                got,
            })?;
            if share.namespace() != namespace {
                return Err(Error::UnexpectedSequence(format!(
                    "expected namespace ({}) got ({})",
                    namespace,
                    share.namespace()
                )));
            }
            let version = share.info_byte().version();
            if version != share_version {
                return Err(Error::UnexpectedSequence(format!(
                    "expected share version ({share_version}) got ({version})"
                )));
            }
            if share.is_sequence_start() {
                return Err(Error::UnexpectedSequence(format!(
                    "share {got} of the blob starts a new sequence"
                )));
            }
            data.extend_from_slice(share.payload());
        }

        // remove padding
        data.truncate(blob_len as usize);

        Self::new_with_version(namespace, data, share_version, app_version)
    }

    /// Reconstructs all the blobs from shares.
    ///
    /// This function will seek shares that indicate start of the next blob (with
    /// [`Share::sequence_length`]) and pass them to [`Blob::reconstruct`].
    /// It will automatically ignore all shares that are within reserved namespaces
    /// and the namespace padding shares, e.g. it is completely fine to pass the whole
    /// original data square to this function and get all blobs in the block.
    ///
    /// # Errors
    ///
    /// This function propagates any errors from [`Blob::reconstruct`].
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::{AppVersion, Blob};
    /// # use celestia_openrpc_types::nmt::Namespace;
    /// # let namespace1 = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    /// # let namespace2 = Namespace::new_v0(&[2, 3, 4, 5, 6]).expect("Invalid namespace");
    ///
    /// let blobs = vec![
    ///     Blob::new(namespace1, b"foo".to_vec()).unwrap(),
    ///     Blob::new(namespace2, b"bar".to_vec()).unwrap(),
    /// ];
    /// let shares: Vec<_> = blobs.iter().flat_map(|blob| blob.to_shares().unwrap()).collect();
    ///
    /// let reconstructed = Blob::reconstruct_all(&shares, AppVersion::V2).unwrap();
    ///
    /// assert_eq!(blobs, reconstructed);
    /// ```
    pub fn reconstruct_all<'a, I>(shares: I, app_version: AppVersion) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = &'a Share>,
    {
        let mut shares = shares
            .into_iter()
            .filter(|shr| !shr.namespace().is_reserved());
        let mut blobs = Vec::with_capacity(2);

        loop {
            let mut blob = {
                // find next share from blobs namespace that is sequence start
                let Some(start) = shares.find(|&shr| shr.is_sequence_start() && !shr.is_padding())
                else {
                    break;
                };
                iter::once(start).chain(&mut shares)
            };
            blobs.push(Blob::reconstruct(&mut blob, app_version)?);
        }

        Ok(blobs)
    }

    /// Get the amount of shares needed to encode this blob.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::Blob;
    /// # use celestia_openrpc_types::nmt::Namespace;
    /// # let namespace = Namespace::new_v0(&[1, 2, 3, 4, 5]).expect("Invalid namespace");
    ///
    /// let blob = Blob::new(namespace, b"foo".to_vec()).unwrap();
    /// let shares_len = blob.shares_len();
    ///
    /// let blob_shares = blob.to_shares().unwrap();
    ///
    /// assert_eq!(shares_len, blob_shares.len());
    /// ```
    pub fn shares_len(&self) -> usize {
        shares_needed_for_blob(self.data.len())
    }

    /// Index of the blob's first share in the EDS, if it was retrieved from chain.
    pub fn index(&self) -> Option<u64> {
        self.index
    }

    /// Version of the blob's [`Namespace`].
    pub fn namespace_version(&self) -> u8 {
        self.namespace.version()
    }

    /// Id of the blob's [`Namespace`].
    pub fn namespace_id(&self) -> &[u8] {
        self.namespace.id()
    }
}

fn shares_needed_for_blob(blob_len: usize) -> usize {
    let Some(without_first_share) = blob_len.checked_sub(appconsts::FIRST_SPARSE_SHARE_CONTENT_SIZE)
    else {
        return 1;
    };
    1 + without_first_share.div_ceil(appconsts::CONTINUATION_SPARSE_SHARE_CONTENT_SIZE)
}

mod custom_serde {
    use serde::{Deserialize, Serialize};
    use tendermint_proto::serializers::bytes::base64string;

    use crate::nmt::Namespace;
    use crate::serializers::none_as_negative_one;
    use crate::{Error, Result};

    use super::{commitment, Blob, Commitment};

    /// This is the copy of the `Blob` struct, to perform additional checks during deserialization
    #[derive(Serialize, Deserialize)]
    pub(super) struct SerdeBlob {
        namespace: Namespace,
        #[serde(with = "base64string")]
        data: Vec<u8>,
        share_version: u8,
        commitment: Commitment,
        // NOTE: celestia supports deserializing blobs without index, so we should too
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "none_as_negative_one"
        )]
        index: Option<u64>,
    }

    impl From<Blob> for SerdeBlob {
        fn from(value: Blob) -> Self {
            Self {
                namespace: value.namespace,
                data: value.data,
                share_version: value.share_version,
                commitment: value.commitment,
                index: value.index,
            }
        }
    }

    impl TryFrom<SerdeBlob> for Blob {
        type Error = Error;

        fn try_from(value: SerdeBlob) -> Result<Self> {
            // commitment is provided, so we only check the parts here.
            // user can still verify the commitment using `Blob::validate`
            commitment::validate_blob_parts(value.namespace, &value.data, value.share_version)?;

            Ok(Blob {
                namespace: value.namespace,
                data: value.data,
                share_version: value.share_version,
                commitment: value.commitment,
                index: value.index,
            })
        }
    }
}
