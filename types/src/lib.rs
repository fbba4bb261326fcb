//! Core types, constants and the blob share commitment pipeline of the Celestia
//! data availability network.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod blob;
pub mod consts;
pub mod da;
mod das;
mod data_availability_header;
pub mod eds;
mod error;
mod extended_header;
pub mod fraud_proof;
pub mod hash;
pub mod merkle;
mod merkle_proof;
pub mod nmt;
pub mod node;
#[cfg(feature = "p2p")]
#[cfg_attr(docsrs, doc(cfg(feature = "p2p")))]
pub mod p2p;
mod row_proof;
pub(crate) mod serializers;
pub mod share;
pub mod state;
mod sync;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod test_utils;
mod tx_config;
mod validate;

pub use crate::blob::{Blob, Commitment, CommitmentProof};
pub use crate::consts::appconsts::AppVersion;
pub use crate::das::*;
pub use crate::data_availability_header::*;
pub use crate::eds::ExtendedDataSquare;
pub use crate::error::*;
pub use crate::extended_header::*;
pub use crate::merkle_proof::MerkleProof;
pub use crate::row_proof::RowProof;
pub use crate::share::{InfoByte, NamespacedRow, NamespacedShares, Share};
pub use crate::sync::*;
pub use crate::tx_config::{SubmitOptions, TxConfig, DEFAULT_GAS_PRICE};
pub use crate::validate::*;
