use celestia_openrpc_types::hash::Hash;
use celestia_openrpc_types::{ExtendedHeader, SyncState};
use jsonrpsee::proc_macros::rpc;

#[rpc(client)]
pub trait Header {
    /// Header with the given hash, from the node's store.
    #[method(name = "header.GetByHash")]
    async fn header_get_by_hash(&self, hash: Hash) -> Result<ExtendedHeader, Error>;

    /// Header at the height, failing if the node hasn't synced it yet.
    #[method(name = "header.GetByHeight")]
    async fn header_get_by_height(&self, height: u64) -> Result<ExtendedHeader, Error>;

    /// Headers strictly between `from` and `to`.
    ///
    /// The node checks their adjacency, use
    /// [`ExtendedHeader::verify_adjacent_range`] to check it locally.
    #[method(name = "header.GetRangeByHeight")]
    async fn header_get_range_by_height(
        &self,
        from: &ExtendedHeader,
        to: u64,
    ) -> Result<Vec<ExtendedHeader>, Error>;

    /// Highest header in the node's store.
    #[method(name = "header.LocalHead")]
    async fn header_local_head(&self) -> Result<ExtendedHeader, Error>;

    /// Head of the network as seen by the node's syncer.
    #[method(name = "header.NetworkHead")]
    async fn header_network_head(&self) -> Result<ExtendedHeader, Error>;

    /// Stream of new headers as the node syncs them.
    ///
    /// # Notes
    ///
    /// Unsubscribe is not implemented by Celestia nodes.
    #[subscription(name = "header.Subscribe", unsubscribe = "header.Unsubscribe", item = ExtendedHeader)]
    async fn header_subscribe(&self) -> SubscriptionResult;

    /// State of the node's header syncer.
    #[method(name = "header.SyncState")]
    async fn header_sync_state(&self) -> Result<SyncState, Error>;

    /// Resolves once the syncer reaches the network head.
    #[method(name = "header.SyncWait")]
    async fn header_sync_wait(&self) -> Result<(), Error>;

    /// Resolves with the header at the height once the node stores it.
    ///
    /// Bounded by the client's request timeout.
    #[method(name = "header.WaitForHeight")]
    async fn header_wait_for_height(&self, height: u64) -> Result<ExtendedHeader, Error>;
}
