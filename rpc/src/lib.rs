#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod blob;
pub mod client;
mod da;
mod das;
mod error;
mod fraud;
mod header;
mod multi_client;
mod node;
#[cfg(feature = "p2p")]
mod p2p;
pub mod permissions;
mod share;
mod state;

pub use crate::blob::BlobClient;
pub use crate::client::{Client, ClientBuilder};
pub use crate::da::DaClient;
pub use crate::das::DasClient;
pub use crate::error::{Error, Result};
pub use crate::fraud::FraudClient;
pub use crate::header::HeaderClient;
pub use crate::multi_client::{MultiClient, MultiClientCloser};
pub use crate::node::NodeClient;
#[cfg(feature = "p2p")]
#[cfg_attr(docsrs, doc(cfg(feature = "p2p")))]
pub use crate::p2p::P2PClient;
pub use crate::share::ShareClient;
pub use crate::state::StateClient;
pub use celestia_openrpc_types::{SubmitOptions, TxConfig};

/// Re-exports of all the RPC traits.
pub mod prelude {
    pub use crate::BlobClient;
    pub use crate::DaClient;
    pub use crate::DasClient;
    pub use crate::FraudClient;
    pub use crate::HeaderClient;
    pub use crate::NodeClient;
    #[cfg(feature = "p2p")]
    pub use crate::P2PClient;
    pub use crate::ShareClient;
    pub use crate::StateClient;
}
