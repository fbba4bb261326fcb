//! Generic data availability interface of the node, used by the rollups.

use celestia_openrpc_types::da::{Blob, Commitment, Id, Proof};
use celestia_openrpc_types::nmt::Namespace;
use jsonrpsee::proc_macros::rpc;

#[rpc(client)]
pub trait Da {
    /// Commit creates a Commitment for each given Blob.
    #[method(name = "da.Commit")]
    async fn da_commit(
        &self,
        blobs: &[Blob],
        namespace: Namespace,
    ) -> Result<Vec<Commitment>, Error>;

    /// Get returns Blob for each given ID, or an error.
    #[method(name = "da.Get")]
    async fn da_get(&self, ids: &[Id], namespace: Namespace) -> Result<Vec<Blob>, Error>;

    /// GetIDs returns IDs of all Blobs located in DA at given height.
    #[method(name = "da.GetIDs")]
    async fn da_get_ids(
        &self,
        height: u64,
        namespace: Namespace,
    ) -> Result<Option<Vec<Id>>, Error>;

    /// GetProofs returns inclusion Proofs for Blobs specified by their IDs.
    #[method(name = "da.GetProofs")]
    async fn da_get_proofs(&self, ids: &[Id], namespace: Namespace) -> Result<Vec<Proof>, Error>;

    /// MaxBlobSize returns the max blob size.
    #[method(name = "da.MaxBlobSize")]
    async fn da_max_blob_size(&self) -> Result<u64, Error>;

    /// Submit submits the Blobs to Data Availability layer.
    ///
    /// A negative `gas_price` lets the node estimate it.
    #[method(name = "da.Submit")]
    async fn da_submit(
        &self,
        blobs: &[Blob],
        gas_price: f64,
        namespace: Namespace,
    ) -> Result<Vec<Id>, Error>;

    /// Validate validates Commitments against the corresponding Proofs.
    #[method(name = "da.Validate")]
    async fn da_validate(
        &self,
        ids: &[Id],
        proofs: &[Proof],
        namespace: Namespace,
    ) -> Result<Vec<bool>, Error>;
}
