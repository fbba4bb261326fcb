use celestia_openrpc_types::blob::{Proof, SubscriptionResponse};
use celestia_openrpc_types::nmt::Namespace;
use celestia_openrpc_types::{Blob, Commitment, CommitmentProof, SubmitOptions};
use jsonrpsee::proc_macros::rpc;

#[rpc(client)]
pub trait Blob {
    /// Blob of the namespace with the given commitment, included at the height.
    #[method(name = "blob.Get")]
    async fn blob_get(
        &self,
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    ) -> Result<Blob, Error>;

    /// All blobs of the namespaces at the height.
    ///
    /// The node responds with `null`, decoded as `None`, when there are none.
    #[method(name = "blob.GetAll")]
    async fn blob_get_all(
        &self,
        height: u64,
        namespaces: &[Namespace],
    ) -> Result<Option<Vec<Blob>>, Error>;

    /// Namespace proofs of the shares of the blob.
    #[method(name = "blob.GetProof")]
    async fn blob_get_proof(
        &self,
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    ) -> Result<Proof, Error>;

    /// Asks the node whether the proof shows the commitment included at the height.
    #[method(name = "blob.Included")]
    async fn blob_included(
        &self,
        height: u64,
        namespace: Namespace,
        proof: &Proof,
        commitment: Commitment,
    ) -> Result<bool, Error>;

    /// Proof of inclusion of the share commitment in the block's data root.
    ///
    /// Verify it with [`CommitmentProof::verify`].
    #[method(name = "blob.GetCommitmentProof")]
    async fn blob_get_commitment_proof(
        &self,
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    ) -> Result<CommitmentProof, Error>;

    /// Submits the blobs atomically in a single transaction and returns the
    /// height they were included at.
    ///
    /// Signed by the node's default account unless the options say otherwise.
    #[method(name = "blob.Submit")]
    async fn blob_submit(&self, blobs: &[Blob], options: SubmitOptions) -> Result<u64, Error>;

    /// Stream of blobs of the namespace, one response per new block.
    ///
    /// # Notes
    ///
    /// Unsubscribe is not implemented by Celestia nodes.
    #[subscription(name = "blob.Subscribe", unsubscribe = "blob.Unsubscribe", item = SubscriptionResponse)]
    async fn blob_subscribe(&self, namespace: Namespace) -> SubscriptionResult;
}
