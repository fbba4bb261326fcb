use jsonrpsee::proc_macros::rpc;

pub use celestia_openrpc_types::fraud_proof::{Proof, ProofType};

#[rpc(client, namespace = "fraud", namespace_separator = ".")]
pub trait Fraud {
    /// Fraud proofs of the given type stored by the node.
    #[method(name = "Get")]
    async fn fraud_get(&self, proof_type: ProofType) -> Result<Vec<Proof>, Error>;

    /// Stream of fraud proofs of the given type, as the node receives them.
    ///
    /// The node doesn't support unsubscribing, dropping the subscription
    /// only stops the notifications on the client side.
    #[subscription(name = "Subscribe", unsubscribe = "Unsubscribe", item = Proof)]
    async fn fraud_subscribe(&self, proof_type: ProofType) -> SubscriptionResult;
}
