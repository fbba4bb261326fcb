//! Methods of the `share` namespace, reading the extended data square of a block.

use celestia_openrpc_types::nmt::Namespace;
use celestia_openrpc_types::{ExtendedDataSquare, ExtendedHeader, NamespacedShares, Share};
use jsonrpsee::proc_macros::rpc;

#[rpc(client)]
pub trait Share {
    /// Whole extended data square of the block described by the header.
    #[method(name = "share.GetEDS")]
    async fn share_get_eds(&self, header: &ExtendedHeader) -> Result<ExtendedDataSquare, Error>;

    /// Single share of the extended square at the given coordinates.
    #[method(name = "share.GetShare")]
    async fn share_get_share(
        &self,
        header: &ExtendedHeader,
        row: u64,
        col: u64,
    ) -> Result<Share, Error>;

    /// Shares of the namespace, grouped by the rows they occupy.
    ///
    /// Every row carries a namespace proof against its row root in the header's
    /// [`DataAvailabilityHeader`], see [`NamespacedShares::verify`].
    ///
    /// [`DataAvailabilityHeader`]: celestia_openrpc_types::DataAvailabilityHeader
    #[method(name = "share.GetSharesByNamespace")]
    async fn share_get_shares_by_namespace(
        &self,
        header: &ExtendedHeader,
        namespace: Namespace,
    ) -> Result<NamespacedShares, Error>;

    /// Succeeds if the node could sample the block and considers it available.
    #[method(name = "share.SharesAvailable")]
    async fn share_shares_available(&self, header: &ExtendedHeader) -> Result<(), Error>;
}
