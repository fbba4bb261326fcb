use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tendermint::block::header::Header;
use tendermint::block::{Commit, Height};
use tendermint::chain::id::Id;
use tendermint::{validator, Hash, Time};

use crate::consts::appconsts::AppVersion;
use crate::error::{bail_validation, bail_verification};
use crate::{DataAvailabilityHeader, Result, ValidateBasicWithAppVersion};

pub type Validator = validator::Info;
pub type ValidatorSet = validator::Set;

/// Block header together with the commit, the validator set and the
/// [`DataAvailabilityHeader`] of the block, as served by the node's `header`
/// module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedHeader {
    /// Tendermint block header.
    pub header: Header,
    /// Commit of the block.
    pub commit: Commit,
    /// Validator set of the block.
    pub validator_set: ValidatorSet,
    /// Data availability header of the block.
    pub dah: DataAvailabilityHeader,
}

impl Display for ExtendedHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "hash: {}; height: {}", self.hash(), self.height())
    }
}

impl ExtendedHeader {
    pub fn chain_id(&self) -> &Id {
        &self.header.chain_id
    }

    pub fn height(&self) -> Height {
        self.header.height
    }

    pub fn time(&self) -> Time {
        self.header.time
    }

    pub fn hash(&self) -> Hash {
        self.commit.block_id.hash
    }

    pub fn last_header_hash(&self) -> Hash {
        self.header
            .last_block_id
            .map(|block_id| block_id.hash)
            .unwrap_or_default()
    }

    /// App version of the block, falling back to the latest one if unknown.
    pub fn app_version(&self) -> AppVersion {
        AppVersion::from_u64(self.header.version.app).unwrap_or_else(AppVersion::latest)
    }

    /// Hash of the [`DataAvailabilityHeader`] committed to in the block header.
    ///
    /// This is the data root the blob inclusion proofs are verified against.
    pub fn data_root(&self) -> Option<crate::merkle::Hash> {
        match self.header.data_hash {
            Some(Hash::Sha256(hash)) => Some(hash),
            _ => None,
        }
    }

    /// Validate the consistency of the header parts.
    ///
    /// Signatures of the commit are not verified.
    pub fn validate(&self) -> Result<()> {
        // make sure the validator set is consistent with the header
        if self.validator_set.hash() != self.header.validators_hash {
            bail_validation!(
                "validator_set hash ({}) != header validators_hash ({})",
                self.validator_set.hash(),
                self.header.validators_hash,
            )
        }

        // ensure data root from raw header matches computed root
        let dah_hash = Hash::Sha256(self.dah.hash());
        if self.header.data_hash != Some(dah_hash) {
            bail_validation!(
                "dah hash ({}) != header dah hash ({:?})",
                dah_hash,
                self.header.data_hash,
            )
        }

        // Make sure the header is consistent with the commit.
        if self.commit.height != self.height() {
            bail_validation!(
                "commit height ({}) != header height ({})",
                self.commit.height,
                self.height(),
            )
        }

        if self.commit.block_id.hash != self.header.hash() {
            bail_validation!(
                "commit block_id hash ({}) != header hash ({})",
                self.commit.block_id.hash,
                self.header.hash(),
            )
        }

        self.dah.validate_basic(self.app_version())?;

        Ok(())
    }

    /// Verify that the untrusted header directly follows this one.
    ///
    /// Checks the chain, height, time and hash linkage, without verifying
    /// the commit signatures.
    pub fn verify_adjacent(&self, untrusted: &ExtendedHeader) -> Result<()> {
        if self.height().increment() != untrusted.height() {
            bail_verification!(
                "untrusted header height ({}) not adjacent to the current trusted ({})",
                untrusted.height(),
                self.height(),
            );
        }

        if untrusted.chain_id() != self.chain_id() {
            bail_verification!(
                "untrusted header has different chain {}, not {}",
                untrusted.chain_id(),
                self.chain_id()
            );
        }

        if !untrusted.time().after(self.time()) {
            bail_verification!(
                "untrusted header time ({}) must be after current trusted header ({})",
                untrusted.time(),
                self.time()
            );
        }

        if untrusted.header.validators_hash != self.header.next_validators_hash {
            bail_verification!(
                "expected old header next validators ({}) to match those from new header ({})",
                self.header.next_validators_hash,
                untrusted.header.validators_hash,
            );
        }

        if untrusted.last_header_hash() != self.hash() {
            bail_verification!(
                "expected new header to point to last header hash ({}), but got {}",
                self.hash(),
                untrusted.last_header_hash()
            );
        }

        Ok(())
    }

    /// Verify a chain of untrusted headers, each adjacent to the previous one,
    /// starting right after `self`.
    ///
    /// # Note
    ///
    /// This method does not do validation of the headers. It should be done
    /// before with [`validate_headers`].
    pub fn verify_adjacent_range(&self, untrusted: &[ExtendedHeader]) -> Result<()> {
        let mut trusted = self;

        for untrusted in untrusted {
            trusted.verify_adjacent(untrusted)?;
            trusted = untrusted;
        }

        Ok(())
    }
}

/// Convenient utility for validating multiple headers.
pub fn validate_headers(headers: &[ExtendedHeader]) -> Result<()> {
    for header in headers {
        header.validate()?;
    }

    Ok(())
}
