use std::fmt;

use crate::consts::appconsts;

/// Alias for a `Result` with the error type [`celestia_openrpc_types::Error`].
///
/// [`celestia_openrpc_types::Error`]: crate::Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Representation of all the errors that can occur when interacting with [`celestia_openrpc_types`].
///
/// [`celestia_openrpc_types`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unsupported namespace version.
    #[error("Unsupported namespace version: {0}")]
    UnsupportedNamespaceVersion(u8),

    /// Invalid namespace size.
    #[error("Invalid namespace size: expected {}, got {0}", crate::nmt::NS_SIZE)]
    InvalidNamespaceSize(usize),

    /// Invalid namespace id size for version 0.
    #[error("Invalid namespace id size: {0} > {}", crate::nmt::NS_ID_V0_SIZE)]
    InvalidNamespaceIdSize(usize),

    /// Version 0 namespace id doesn't start with the zero prefix.
    #[error(
        "Invalid namespace id: expected {} leading zeroes",
        crate::nmt::NS_ID_V0_PREFIX_SIZE
    )]
    InvalidNamespaceV0Prefix,

    /// Parity and tail padding namespaces cannot carry data.
    #[error("Invalid data namespace ({0}): parity and tail padding namespace are forbidden")]
    ForbiddenDataNamespace(String),

    /// Reserved namespaces cannot carry blobs.
    #[error("Invalid blob namespace ({0}): reserved namespaces are forbidden")]
    ReservedBlobNamespace(String),

    /// Blob data is empty.
    #[error("Blob data must not be empty")]
    EmptyBlobData,

    /// Blob data exceeds the maximum size.
    #[error("Blob data must be <= {max} bytes, but it was {size} bytes")]
    BlobTooLarge {
        /// Size of the rejected data.
        size: usize,
        /// Maximum accepted size.
        max: usize,
    },

    /// Share version is not supported for blobs.
    #[error("Unsupported share version: {0}")]
    UnsupportedShareVersion(u8),

    /// Share version can't be represented in the info byte.
    #[error("Share version {0} must be <= {}", appconsts::MAX_SHARE_VERSION)]
    MaxShareVersionExceeded(u8),

    /// Commitment of the blob doesn't match its data.
    #[error("Commitment mismatch: expected {expected}, computed {computed}")]
    CommitmentMismatch {
        /// Claimed commitment.
        expected: String,
        /// Commitment recomputed from the data.
        computed: String,
    },

    /// Invalid size of the share.
    #[error("Invalid share size: expected {}, got {0}", appconsts::SHARE_SIZE)]
    InvalidShareSize(usize),

    /// Share is not the first one of a sequence.
    #[error("Expected a sequence start share")]
    ExpectedShareWithSequenceStart,

    /// Share sequence is not contiguous or has mixed namespaces.
    #[error("Unexpected share sequence: {0}")]
    UnexpectedSequence(String),

    /// Shares end before the whole sequence was read.
    #[error("Missing shares: expected {expected}, got {got}")]
    MissingShares {
        /// Amount of shares needed for the sequence.
        expected: usize,
        /// Amount of shares provided.
        got: usize,
    },

    /// Sequence length is only present in the first share.
    #[error("Sequence length can only be written to the first share")]
    NotFirstShare,

    /// Reserved bytes of a compact share are out of bounds.
    #[error("Reserved byte index {0} must be < {}", appconsts::SHARE_SIZE)]
    InvalidReservedBytes(u32),

    /// Reserved bytes operations used on a sparse share.
    #[error("Share is not a compact share")]
    NotCompactShare,

    /// Data doesn't fit into a single share sequence.
    #[error("Share sequence length exceeded: {0} bytes")]
    ShareSequenceLenExceeded(usize),

    /// Namespace padding needs a preceding share to borrow its namespace.
    #[error("Cannot write namespace padding shares on an empty splitter")]
    EmptySplitter,

    /// Invalid namespaced hash.
    #[error("Invalid namespaced hash")]
    InvalidNamespacedHash,

    /// Invalid size of the hash.
    #[error("Invalid hash size: expected {}, got {0}", crate::consts::HASH_SIZE)]
    InvalidHashSize(usize),

    /// Index out of range.
    #[error("Index ({0}) out of range ({1})")]
    IndexOutOfRange(usize, usize),

    /// Computed root doesn't match the expected one.
    #[error("Root mismatch")]
    RootMismatch,

    /// Merkle range proof failed.
    #[error("Range proof error: {0:?}")]
    RangeProofError(nmt_rs::simple_merkle::error::RangeProofError),

    /// Proof is missing.
    #[error("Missing proof")]
    MissingProof,

    /// Rows without shares must carry an absence proof.
    #[error("Wrong proof type")]
    WrongProofType,

    /// Proof is of an unexpected type.
    #[error("Expected a presence proof, got an absence proof")]
    UnexpectedAbsentProof,

    /// Data square has an invalid shape.
    #[error("Invalid extended data square: {0}")]
    EdsInvalidDimentions(String),

    /// Invalid bech32 address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid address prefix.
    #[error("Invalid address prefix: {0}")]
    InvalidAddressPrefix(String),

    /// Invalid balance denomination.
    #[error("Invalid balance denomination: {0}")]
    InvalidBalanceDenomination(String),

    /// Invalid balance amount.
    #[error("Invalid balance amount: {0}")]
    InvalidBalanceAmount(String),

    /// Error propagated from the [`tendermint`].
    #[error(transparent)]
    Tendermint(#[from] tendermint::Error),

    /// Error from the base64 decoding.
    #[error("Base64 decoding: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Validation error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Verification error.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Stable tag of an error, shared with the rpc client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Size, version, prefix or reserved range violation of a namespace.
    InvalidNamespace,
    /// Empty or oversized payload, or unsupported share version.
    InvalidBlob,
    /// Recomputed commitment disagrees with a claimed one.
    CommitmentMismatch,
    /// Any check of a proof failed.
    InvalidProof,
    /// The node reported that the requested item doesn't exist.
    NotFound,
    /// Connection, auth or decoding failure of the transport.
    Transport,
    /// The node answered the call with an error.
    Rejected,
    /// The call was cancelled.
    Cancelled,
    /// The call exceeded its deadline.
    Deadline,
    /// Data is malformed or violates structural constraints.
    Malformed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidNamespace => "invalid namespace",
            ErrorKind::InvalidBlob => "invalid blob",
            ErrorKind::CommitmentMismatch => "commitment mismatch",
            ErrorKind::InvalidProof => "invalid proof",
            ErrorKind::NotFound => "not found",
            ErrorKind::Transport => "transport",
            ErrorKind::Rejected => "rejected by node",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Deadline => "deadline exceeded",
            ErrorKind::Malformed => "malformed",
        };
        f.write_str(s)
    }
}

impl Error {
    /// Get the stable [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedNamespaceVersion(_)
            | Error::InvalidNamespaceSize(_)
            | Error::InvalidNamespaceIdSize(_)
            | Error::InvalidNamespaceV0Prefix
            | Error::ForbiddenDataNamespace(_)
            | Error::ReservedBlobNamespace(_) => ErrorKind::InvalidNamespace,

            Error::EmptyBlobData
            | Error::BlobTooLarge { .. }
            | Error::UnsupportedShareVersion(_)
            | Error::MaxShareVersionExceeded(_) => ErrorKind::InvalidBlob,

            Error::CommitmentMismatch { .. } => ErrorKind::CommitmentMismatch,

            Error::RootMismatch
            | Error::RangeProofError(_)
            | Error::UnexpectedAbsentProof
            | Error::MissingProof
            | Error::WrongProofType
            | Error::Verification(_) => ErrorKind::InvalidProof,

            Error::InvalidShareSize(_)
            | Error::ExpectedShareWithSequenceStart
            | Error::UnexpectedSequence(_)
            | Error::MissingShares { .. }
            | Error::NotFirstShare
            | Error::InvalidReservedBytes(_)
            | Error::NotCompactShare
            | Error::ShareSequenceLenExceeded(_)
            | Error::EmptySplitter
            | Error::InvalidNamespacedHash
            | Error::InvalidHashSize(_)
            | Error::IndexOutOfRange(..)
            | Error::EdsInvalidDimentions(_)
            | Error::InvalidAddress(_)
            | Error::InvalidAddressPrefix(_)
            | Error::InvalidBalanceDenomination(_)
            | Error::InvalidBalanceAmount(_)
            | Error::Tendermint(_)
            | Error::Base64Decode(_)
            | Error::Validation(_) => ErrorKind::Malformed,
        }
    }
}

impl From<nmt_rs::simple_merkle::error::RangeProofError> for Error {
    fn from(value: nmt_rs::simple_merkle::error::RangeProofError) -> Self {
        Error::RangeProofError(value)
    }
}

/// Representation of the errors that can occur when validating data.
///
/// See [`ValidateBasic`]
///
/// [`ValidateBasic`]: crate::ValidateBasic
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Other errors that can happen during validation.
    #[error("{0}")]
    Other(String),
}

/// Representation of the errors that can occur when verifying data.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// Other errors that can happen during verification.
    #[error("{0}")]
    Other(String),
}

macro_rules! validation_error {
    ($fmt:literal $(,)?) => {
        $crate::error::ValidationError::Other(std::format!($fmt))
    };
    ($fmt:literal, $($arg:tt)*) => {
        $crate::error::ValidationError::Other(std::format!($fmt, $($arg)*))
    };
}

macro_rules! bail_validation {
    ($($arg:tt)*) => {
        return Err($crate::error::validation_error!($($arg)*).into())
    };
}

macro_rules! verification_error {
    ($fmt:literal $(,)?) => {
        $crate::error::VerificationError::Other(std::format!($fmt))
    };
    ($fmt:literal, $($arg:tt)*) => {
        $crate::error::VerificationError::Other(std::format!($fmt, $($arg)*))
    };
}

macro_rules! bail_verification {
    ($($arg:tt)*) => {
        return Err($crate::error::verification_error!($($arg)*).into())
    };
}

// NOTE: This need to be always after the macro definitions
pub(crate) use bail_validation;
pub(crate) use bail_verification;
pub(crate) use validation_error;
pub(crate) use verification_error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            Error::InvalidNamespaceV0Prefix.kind(),
            ErrorKind::InvalidNamespace
        );
        assert_eq!(
            Error::BlobTooLarge { size: 2, max: 1 }.kind(),
            ErrorKind::InvalidBlob
        );
        assert_eq!(Error::RootMismatch.kind(), ErrorKind::InvalidProof);
        assert_eq!(
            Error::from(verification_error!("bad node")).kind(),
            ErrorKind::InvalidProof
        );
        assert_eq!(
            Error::from(validation_error!("bad width {}", 3)).kind(),
            ErrorKind::Malformed
        );
    }

    #[test]
    fn messages_carry_values() {
        let err = Error::BlobTooLarge { size: 10, max: 5 };
        assert_eq!(
            err.to_string(),
            "Blob data must be <= 5 bytes, but it was 10 bytes"
        );

        let err = Error::InvalidShareSize(511);
        assert_eq!(err.to_string(), "Invalid share size: expected 512, got 511");
    }
}
