use celestia_openrpc_types::SamplingStats;
use jsonrpsee::proc_macros::rpc;

/// Data availability sampling of the node.
#[rpc(client)]
pub trait Das {
    /// Progress of the sampling: checkpoints, running workers and failed heights.
    #[method(name = "das.SamplingStats")]
    async fn das_sampling_stats(&self) -> Result<SamplingStats, Error>;

    /// Resolves once the sampler has caught up with the network head.
    #[method(name = "das.WaitCatchUp")]
    async fn das_wait_catch_up(&self) -> Result<(), Error>;
}
