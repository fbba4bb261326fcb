#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use celestia_openrpc_types::blob::SubscriptionResponse;
use celestia_openrpc_types::consts::appconsts::{self, AppVersion};
use celestia_openrpc_types::nmt::Namespace;
use celestia_openrpc_types::node::{NodeInfo, NodeType, Permission};
use celestia_openrpc_types::test_utils::{
    generate_blob_square, random_bytes, random_namespace, ExtendedHeaderGenerator,
};
use celestia_openrpc_types::{Blob, Commitment, CommitmentProof, ExtendedHeader, TxConfig};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::{ErrorObject, ErrorObjectOwned};
use jsonrpsee::RpcModule;
use tokio::sync::Mutex;

pub mod raw_node;

pub const BLOB_NOT_FOUND: &str = "blob: not found";
pub const HEADER_NOT_FOUND: &str = "header: not found";

/// A blob stored by the [`MockNode`] at some height.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub height: u64,
    pub blob: Blob,
    pub proof: CommitmentProof,
}

/// Chain served by the [`MockNode`].
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    pub headers: Vec<ExtendedHeader>,
    pub blobs: Vec<StoredBlob>,
    pub submitted: Arc<Mutex<Vec<(Vec<Blob>, TxConfig)>>>,
}

impl MockChain {
    /// Generate a chain of `heights` blocks, each but the first one containing a single blob.
    ///
    /// All the blobs share a namespace and the last block serves the commitment
    /// proof of the blob from the block before.
    pub fn generate(heights: u64) -> MockChain {
        let threshold = appconsts::subtree_root_threshold(AppVersion::latest());
        let namespace = random_namespace();
        let mut gen = ExtendedHeaderGenerator::new();
        let mut chain = MockChain {
            headers: vec![gen.next()],
            ..MockChain::default()
        };

        for height in 2..=heights {
            let blob = Blob::new(namespace, random_bytes(600 * height as usize)).unwrap();
            let (dah, proof) = generate_blob_square(&blob, threshold);

            chain.headers.push(gen.next_with_dah(dah));
            chain.blobs.push(StoredBlob {
                height,
                blob,
                proof,
            });
        }

        if let [.., second_last, last] = &mut chain.blobs[..] {
            last.proof = second_last.proof.clone();
        }

        chain
    }

    pub fn head(&self) -> &ExtendedHeader {
        self.headers.last().unwrap()
    }

    pub fn header(&self, height: u64) -> Result<&ExtendedHeader, ErrorObjectOwned> {
        self.headers
            .iter()
            .find(|header| header.height().value() == height)
            .ok_or_else(|| call_error(HEADER_NOT_FOUND))
    }

    pub fn blob(
        &self,
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    ) -> Result<&StoredBlob, ErrorObjectOwned> {
        self.blobs
            .iter()
            .find(|stored| {
                stored.height == height
                    && stored.blob.namespace == namespace
                    && stored.blob.commitment == commitment
            })
            .ok_or_else(|| call_error(BLOB_NOT_FOUND))
    }
}

pub fn call_error(msg: &str) -> ErrorObjectOwned {
    ErrorObject::owned(1, msg, None::<()>)
}

/// Create the rpc module of the mock node with all the methods of the chain.
pub fn mock_module(chain: MockChain) -> RpcModule<MockChain> {
    let mut module = RpcModule::new(chain);

    module
        .register_method("header.LocalHead", |_, chain, _| {
            Ok::<_, ErrorObjectOwned>(chain.head().clone())
        })
        .unwrap();
    module
        .register_method("header.NetworkHead", |_, chain, _| {
            Ok::<_, ErrorObjectOwned>(chain.head().clone())
        })
        .unwrap();
    module
        .register_method("header.GetByHeight", |params, chain, _| {
            let height: u64 = params.one()?;
            chain.header(height).cloned()
        })
        .unwrap();
    module
        .register_method("header.WaitForHeight", |params, chain, _| {
            let height: u64 = params.one()?;
            chain.header(height).cloned()
        })
        .unwrap();
    module
        .register_method("header.GetByHash", |params, chain, _| {
            let hash: celestia_openrpc_types::hash::Hash = params.one()?;
            chain
                .headers
                .iter()
                .find(|header| header.hash() == hash)
                .cloned()
                .ok_or_else(|| call_error(HEADER_NOT_FOUND))
        })
        .unwrap();
    module
        .register_method("header.GetRangeByHeight", |params, chain, _| {
            let (from, to): (ExtendedHeader, u64) = params.parse()?;
            let headers: Vec<_> = chain
                .headers
                .iter()
                .filter(|header| {
                    let height = header.height().value();
                    height > from.height().value() && height < to
                })
                .cloned()
                .collect();
            Ok::<_, ErrorObjectOwned>(headers)
        })
        .unwrap();

    module
        .register_method("blob.Get", |params, chain, _| {
            let (height, namespace, commitment): (u64, Namespace, Commitment) = params.parse()?;
            chain
                .blob(height, namespace, commitment)
                .map(|stored| stored.blob.clone())
        })
        .unwrap();
    module
        .register_method("blob.GetAll", |params, chain, _| {
            let (height, namespaces): (u64, Vec<Namespace>) = params.parse()?;
            let blobs: Vec<_> = chain
                .blobs
                .iter()
                .filter(|stored| {
                    stored.height == height && namespaces.contains(&stored.blob.namespace)
                })
                .map(|stored| stored.blob.clone())
                .collect();
            // node responds with `null` if there are no blobs
            Ok::<_, ErrorObjectOwned>((!blobs.is_empty()).then_some(blobs))
        })
        .unwrap();
    module
        .register_method("blob.GetCommitmentProof", |params, chain, _| {
            let (height, namespace, commitment): (u64, Namespace, Commitment) = params.parse()?;
            chain
                .blob(height, namespace, commitment)
                .map(|stored| stored.proof.clone())
        })
        .unwrap();
    module
        .register_async_method("blob.Submit", |params, chain, _| async move {
            let (blobs, config): (Vec<Blob>, TxConfig) = params.parse()?;
            chain.submitted.lock().await.push((blobs, config));
            Ok::<_, ErrorObjectOwned>(chain.head().height().value())
        })
        .unwrap();

    module
        .register_method("node.Ready", |_, _, _| Ok::<_, ErrorObjectOwned>(true))
        .unwrap();
    module
        .register_method("node.Info", |_, _, _| {
            Ok::<_, ErrorObjectOwned>(NodeInfo {
                node_type: NodeType::Light,
                api_version: "v0.21.0".to_owned(),
            })
        })
        .unwrap();
    module
        .register_method("node.AuthVerify", |_, _, _| {
            Ok::<_, ErrorObjectOwned>(vec![Permission::Public, Permission::Read])
        })
        .unwrap();

    module
        .register_method("da.MaxBlobSize", |_, _, _| {
            Ok::<_, ErrorObjectOwned>(1_973_786_u64)
        })
        .unwrap();
    module
        .register_method("fraud.Get", |_, _, _| {
            Ok::<_, ErrorObjectOwned>(Vec::<celestia_openrpc_types::fraud_proof::Proof>::new())
        })
        .unwrap();

    module
}

/// Rpc server serving the [`MockChain`] over both http and websocket.
pub struct MockNode {
    pub addr: SocketAddr,
    pub chain: MockChain,
    handle: ServerHandle,
}

impl MockNode {
    pub async fn spawn(chain: MockChain) -> MockNode {
        MockNode::spawn_with(chain, |_| {}).await
    }

    /// Spawn the node, registering additional methods with `extend`.
    pub async fn spawn_with<F>(chain: MockChain, extend: F) -> MockNode
    where
        F: FnOnce(&mut RpcModule<MockChain>),
    {
        let mut module = mock_module(chain.clone());
        extend(&mut module);

        let server = Server::builder().build("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.start(module);

        MockNode {
            addr,
            chain,
            handle,
        }
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        let _ = self.handle.stop();
    }
}

/// Blobs of the namespace at the height, as sent by the node's subscription.
pub fn subscription_response(chain: &MockChain, height: u64) -> SubscriptionResponse {
    SubscriptionResponse {
        blobs: chain
            .blobs
            .iter()
            .filter(|stored| stored.height == height)
            .map(|stored| stored.blob.clone())
            .collect(),
        height,
    }
}

pub fn enable_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_test_writer()
        .try_init();
}
