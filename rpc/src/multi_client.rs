//! A client connected to every namespace of the node's api.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use celestia_openrpc_types::consts::appconsts::{self, AppVersion};
use celestia_openrpc_types::nmt::Namespace;
use celestia_openrpc_types::{
    Blob, Commitment, Error as TypesError, ExtendedHeader, SubmitOptions, VerificationError,
};
use tracing::{debug, warn};

use crate::client::{to_ws_url, ClientBuilder};
use crate::permissions::namespace_has_subscriptions;
use crate::{BlobClient, Client, HeaderClient, Result};

/// Releases the connections of all the registered clients at once.
///
/// Closing is idempotent, and clients registered after closing are
/// closed right away.
pub struct MultiClientCloser {
    // `None` once closed
    clients: Mutex<Option<Vec<Arc<Client>>>>,
}

impl MultiClientCloser {
    /// Create a new closer without any clients.
    pub fn new() -> MultiClientCloser {
        MultiClientCloser {
            clients: Mutex::new(Some(Vec::new())),
        }
    }

    /// Register the client to be closed together with the others.
    pub fn register(&self, client: Arc<Client>) {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        match &mut *clients {
            Some(clients) => clients.push(client),
            None => client.close(),
        }
    }

    /// Close all the registered clients.
    pub fn close(&self) {
        let clients = self
            .clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(clients) = clients {
            debug!("Closing {} clients", clients.len());

            for client in clients {
                client.close();
            }
        }
    }

    /// Whether the closer was closed.
    pub fn is_closed(&self) -> bool {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Default for MultiClientCloser {
    fn default() -> Self {
        MultiClientCloser::new()
    }
}

impl fmt::Debug for MultiClientCloser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiClientCloser")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A client with a separate connection for each namespace of the node's api.
///
/// Namespaces with subscriptions (`blob`, `header` and `fraud`) are always
/// connected with websocket, upgrading the `http[s]` scheme to `ws[s]`. The
/// rest use the url as given.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> celestia_openrpc::Result<()> {
/// use celestia_openrpc::prelude::*;
/// use celestia_openrpc::MultiClient;
///
/// let client = MultiClient::new("http://localhost:26658", Some("token")).await?;
///
/// let head = client.header().header_network_head().await?;
/// let balance = client.state().state_balance().await?;
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MultiClient {
    blob: Arc<Client>,
    share: Arc<Client>,
    header: Arc<Client>,
    state: Arc<Client>,
    das: Arc<Client>,
    fraud: Arc<Client>,
    p2p: Arc<Client>,
    node: Arc<Client>,
    da: Arc<Client>,
    closer: MultiClientCloser,
    app_version: AppVersion,
}

impl MultiClient {
    /// Connect to all the namespaces of the node.
    pub async fn new(url: &str, auth_token: Option<&str>) -> Result<MultiClient> {
        let mut builder = ClientBuilder::new().url(url);

        if let Some(token) = auth_token {
            builder = builder.auth_token(token);
        }

        builder.build_multi().await
    }

    /// Client of the `blob` namespace.
    pub fn blob(&self) -> &Client {
        &self.blob
    }

    /// Client of the `share` namespace.
    pub fn share(&self) -> &Client {
        &self.share
    }

    /// Client of the `header` namespace.
    pub fn header(&self) -> &Client {
        &self.header
    }

    /// Client of the `state` namespace.
    pub fn state(&self) -> &Client {
        &self.state
    }

    /// Client of the `das` namespace.
    pub fn das(&self) -> &Client {
        &self.das
    }

    /// Client of the `fraud` namespace.
    pub fn fraud(&self) -> &Client {
        &self.fraud
    }

    /// Client of the `p2p` namespace.
    pub fn p2p(&self) -> &Client {
        &self.p2p
    }

    /// Client of the `node` namespace.
    pub fn node(&self) -> &Client {
        &self.node
    }

    /// Client of the `da` namespace.
    pub fn da(&self) -> &Client {
        &self.da
    }

    /// [`AppVersion`] whose parameters are used to validate and verify blobs.
    pub fn app_version(&self) -> AppVersion {
        self.app_version
    }

    /// Close connections of all the namespaces.
    ///
    /// Any call made afterwards fails with [`Error::ClientClosed`].
    ///
    /// [`Error::ClientClosed`]: crate::Error::ClientClosed
    pub fn close(&self) {
        self.closer.close();
    }

    /// Whether the client was closed.
    pub fn is_closed(&self) -> bool {
        self.closer.is_closed()
    }

    /// Validate the blobs and submit them.
    ///
    /// Returns the height the blobs were included at.
    ///
    /// # Errors
    ///
    /// Any blob failing the validation is reported before contacting the node.
    pub async fn blob_submit(&self, blobs: &[Blob], options: SubmitOptions) -> Result<u64> {
        for blob in blobs {
            blob.validate(self.app_version)?;
        }

        Ok(self.blob.blob_submit(blobs, options).await?)
    }

    /// Get the blob and verify its inclusion in the block at the height.
    ///
    /// The blob is checked against the `commitment`, and the commitment proof
    /// fetched from the node is verified against the data root of the header.
    /// Both use the app version of the block's header rather than the one the
    /// client was configured with.
    pub async fn blob_get_verified(
        &self,
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    ) -> Result<Blob> {
        let header = self.header.header_get_by_height(height).await?;
        header.validate()?;

        if header.height().value() != height {
            return Err(verification_error(format!(
                "header height ({}) != requested height ({height})",
                header.height()
            )));
        }

        let app_version = header_app_version(&header)?;

        let blob = self.blob.blob_get(height, namespace, commitment).await?;
        blob.validate_with_commitment(&commitment, app_version)?;

        let proof = self
            .blob
            .blob_get_commitment_proof(height, namespace, commitment)
            .await?;

        if proof.namespace() != namespace {
            return Err(verification_error(format!(
                "proof namespace ({:?}) != blob namespace ({namespace:?})",
                proof.namespace()
            )));
        }

        let threshold = appconsts::subtree_root_threshold(app_version);

        if let Err(e) = proof.verify(&commitment, header.dah.hash(), threshold) {
            warn!("Commitment proof of the blob at {height} is invalid: {e}");
            return Err(e.into());
        }

        Ok(blob)
    }
}

fn header_app_version(header: &ExtendedHeader) -> Result<AppVersion> {
    let version = header.header.version.app;

    AppVersion::from_u64(version)
        .ok_or_else(|| verification_error(format!("unsupported app version {version} in header")))
}

fn verification_error(msg: String) -> crate::Error {
    TypesError::from(VerificationError::Other(msg)).into()
}

impl Drop for MultiClient {
    fn drop(&mut self) {
        self.closer.close();
    }
}

impl ClientBuilder {
    /// Build a [`MultiClient`] connected to every namespace of the node.
    pub async fn build_multi(self) -> Result<MultiClient> {
        let url = self.get_url()?.to_owned();
        let closer = MultiClientCloser::new();

        let blob = self.connect_namespace(&url, "blob", &closer).await?;
        let share = self.connect_namespace(&url, "share", &closer).await?;
        let header = self.connect_namespace(&url, "header", &closer).await?;
        let state = self.connect_namespace(&url, "state", &closer).await?;
        let das = self.connect_namespace(&url, "das", &closer).await?;
        let fraud = self.connect_namespace(&url, "fraud", &closer).await?;
        let p2p = self.connect_namespace(&url, "p2p", &closer).await?;
        let node = self.connect_namespace(&url, "node", &closer).await?;
        let da = self.connect_namespace(&url, "da", &closer).await?;

        Ok(MultiClient {
            blob,
            share,
            header,
            state,
            das,
            fraud,
            p2p,
            node,
            da,
            closer,
            app_version: self.get_app_version(),
        })
    }

    async fn connect_namespace(
        &self,
        url: &str,
        namespace: &str,
        closer: &MultiClientCloser,
    ) -> Result<Arc<Client>> {
        let url = if namespace_has_subscriptions(namespace) {
            to_ws_url(url)
        } else {
            url.to_owned()
        };

        let client = match self.connect(&url).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                // release whatever was connected already
                closer.close();
                return Err(e);
            }
        };

        debug!("Connected {namespace} namespace using {:?}", client.protocol());
        closer.register(client.clone());

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use celestia_openrpc_types::test_utils::ExtendedHeaderGenerator;

    use super::*;
    use crate::Error;

    #[test]
    fn app_version_of_header() {
        let mut header = ExtendedHeaderGenerator::new().next();
        assert_eq!(header_app_version(&header).unwrap(), AppVersion::latest());

        header.header.version.app = 1;
        assert_eq!(header_app_version(&header).unwrap(), AppVersion::V1);

        header.header.version.app = 99;
        let err = header_app_version(&header).unwrap_err();
        assert!(matches!(err, Error::Types(_)));
    }

    async fn http_client() -> Arc<Client> {
        // http client doesn't connect until the first call
        Arc::new(Client::new("http://127.0.0.1:1", None).await.unwrap())
    }

    #[tokio::test]
    async fn closer_closes_all() {
        let closer = MultiClientCloser::new();
        let clients = [http_client().await, http_client().await];

        for client in &clients {
            closer.register(client.clone());
        }

        assert!(!closer.is_closed());
        assert!(clients.iter().all(|client| !client.is_closed()));

        closer.close();

        assert!(closer.is_closed());
        assert!(clients.iter().all(|client| client.is_closed()));

        // second close is a no-op
        closer.close();
        assert!(closer.is_closed());
    }

    #[tokio::test]
    async fn register_after_close() {
        let closer = MultiClientCloser::new();
        closer.close();

        let client = http_client().await;
        closer.register(client.clone());

        assert!(client.is_closed());
    }

    #[tokio::test]
    async fn failed_connection_closes_connected() {
        // websocket connects eagerly, so the `blob` namespace fails right away
        let err = MultiClient::new("http://127.0.0.1:1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::JsonRpc(_)));
        assert_eq!(err.kind(), celestia_openrpc_types::ErrorKind::Transport);
    }

    #[tokio::test]
    async fn unsupported_protocol() {
        let err = MultiClient::new("tcp://127.0.0.1:1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ProtocolNotSupported(_)));
    }
}
