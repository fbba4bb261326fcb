use serde::{Deserialize, Serialize};

/// A worker of the sampler together with the range of heights it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DasWorker {
    /// Kind of the job, e.g. `catchup` or `recent`.
    pub job_type: String,
    /// Height being sampled right now.
    pub current: u64,
    /// First height of the job.
    pub from: u64,
    /// Last height of the job.
    pub to: u64,
}

/// Statistics of the sampling process, as returned by `das.SamplingStats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingStats {
    /// Height of the most recently sampled header.
    pub head_of_sampled_chain: u64,
    /// Height up to which all headers were sampled.
    pub head_of_catchup: u64,
    /// Height of the network head known to the sampler.
    pub network_head_height: u64,
    /// Workers currently running. The node sends `null` when there are none.
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub workers: Vec<DasWorker>,
    /// Maximum number of workers running in parallel.
    pub concurrency: u64,
    /// Whether the sampler finished catching up with the network head.
    pub catch_up_done: bool,
    /// Whether the sampler is running.
    pub is_running: bool,
}

impl SamplingStats {
    /// Amount of headers left to be sampled to catch up with the network head.
    pub fn catch_up_remaining(&self) -> u64 {
        self.network_head_height.saturating_sub(self.head_of_catchup)
    }
}
