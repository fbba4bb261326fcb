//! Clients for the celestia Json-RPC.
//!
//! This module aims to provide a convenient way to create a Json-RPC clients. If
//! you need more configuration options and / or some custom client you can create
//! one using [`jsonrpsee`] crate directly.

use std::fmt;
use std::result::Result;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use celestia_openrpc_types::consts::appconsts::{self, AppVersion, SHARE_SIZE};
use http::{header, HeaderValue};
use jsonrpsee::core::client::{BatchResponse, ClientT, Subscription, SubscriptionClientT};
use jsonrpsee::core::params::BatchRequestBuilder;
use jsonrpsee::core::traits::ToRpcParams;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HeaderMap, HttpClient, HttpClientBuilder};
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::CLIENT_CLOSED;
use crate::Error;

// NOTE: Always the largest `appconsts::*::SQUARE_SIZE_UPPER_BOUND` needs to be used.
const MAX_EDS_SIZE_BYTES: usize = appconsts::v4::SQUARE_SIZE_UPPER_BOUND
    * appconsts::v4::SQUARE_SIZE_UPPER_BOUND
    * 4
    * SHARE_SIZE;

// The biggest response we might get is for requesting an EDS.
// Also, we allow 1 MB extra for any metadata they come with it.
const MAX_RESPONSE_SIZE: usize = MAX_EDS_SIZE_BYTES + 1024 * 1024;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Protocol used by the [`Client`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// 'http\[s\]' protocol, supports only method calls.
    Http,
    /// 'ws\[s\]' protocol, supports both method calls and subscriptions.
    Ws,
}

impl Protocol {
    /// Get the protocol from the scheme of the url.
    pub fn from_url(url: &str) -> Option<Protocol> {
        match url.split_once(':').map(|(proto, _)| proto) {
            Some("http") | Some("https") => Some(Protocol::Http),
            Some("ws") | Some("wss") => Some(Protocol::Ws),
            _ => None,
        }
    }
}

/// Change the scheme of the url to the websocket one, if it is `http[s]`.
pub(crate) fn to_ws_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https:") {
        format!("wss:{rest}")
    } else if let Some(rest) = url.strip_prefix("http:") {
        format!("ws:{rest}")
    } else {
        url.to_owned()
    }
}

enum Transport {
    Http(HttpClient),
    Ws(WsClient),
}

/// Json RPC client.
///
/// The client can be shared between tasks. After [`Client::close`] every call
/// fails with [`Error::ClientClosed`].
pub struct Client {
    transport: RwLock<Option<Arc<Transport>>>,
    protocol: Protocol,
}

impl Client {
    /// Create a new Json RPC client.
    ///
    /// Only 'http\[s\]' and 'ws\[s\]' protocols are supported and they should
    /// be specified in the provided `conn_str`. For more flexibility
    /// consider creating the client using [`jsonrpsee`] directly.
    ///
    /// Please note that currently the celestia-node supports only 'http' and 'ws'.
    /// For a secure connection you have to hide it behind a proxy.
    pub async fn new(conn_str: &str, auth_token: Option<&str>) -> Result<Self, Error> {
        let mut builder = ClientBuilder::new().url(conn_str);

        if let Some(token) = auth_token {
            builder = builder.auth_token(token);
        }

        builder.build().await
    }

    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the protocol the client uses.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Release the connection of the client.
    ///
    /// Calls made after closing fail. Closing the client again does nothing.
    pub fn close(&self) {
        let transport = self
            .transport
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if transport.is_some() {
            debug!("Closing {:?} client", self.protocol);
        }
    }

    /// Whether the client was closed.
    pub fn is_closed(&self) -> bool {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn transport(&self) -> Result<Arc<Transport>, ClientError> {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| ClientError::Custom(CLIENT_CLOSED.to_owned()))
    }
}

impl ClientT for Client {
    async fn notification<Params>(&self, method: &str, params: Params) -> Result<(), ClientError>
    where
        Params: ToRpcParams + Send,
    {
        match &*self.transport()? {
            Transport::Http(client) => client.notification(method, params).await,
            Transport::Ws(client) => client.notification(method, params).await,
        }
    }

    async fn request<R, Params>(&self, method: &str, params: Params) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
        Params: ToRpcParams + Send,
    {
        trace!("Calling {method}");

        match &*self.transport()? {
            Transport::Http(client) => client.request(method, params).await,
            Transport::Ws(client) => client.request(method, params).await,
        }
    }

    async fn batch_request<'a, R>(
        &self,
        batch: BatchRequestBuilder<'a>,
    ) -> Result<BatchResponse<'a, R>, ClientError>
    where
        R: DeserializeOwned + fmt::Debug + 'a,
    {
        match &*self.transport()? {
            Transport::Http(client) => client.batch_request(batch).await,
            Transport::Ws(client) => client.batch_request(batch).await,
        }
    }
}

impl SubscriptionClientT for Client {
    async fn subscribe<'a, N, Params>(
        &self,
        subscribe_method: &'a str,
        params: Params,
        unsubscribe_method: &'a str,
    ) -> Result<Subscription<N>, ClientError>
    where
        Params: ToRpcParams + Send,
        N: DeserializeOwned,
    {
        trace!("Subscribing with {subscribe_method}");

        match &*self.transport()? {
            Transport::Http(client) => {
                client
                    .subscribe(subscribe_method, params, unsubscribe_method)
                    .await
            }
            Transport::Ws(client) => {
                client
                    .subscribe(subscribe_method, params, unsubscribe_method)
                    .await
            }
        }
    }

    async fn subscribe_to_method<N>(&self, method: &str) -> Result<Subscription<N>, ClientError>
    where
        N: DeserializeOwned,
    {
        match &*self.transport()? {
            Transport::Http(client) => client.subscribe_to_method(method).await,
            Transport::Ws(client) => client.subscribe_to_method(method).await,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("protocol", &self.protocol)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A builder for [`Client`] and [`MultiClient`].
///
/// # Example
///
/// ```no_run
/// # async fn run() -> celestia_openrpc::Result<()> {
/// use std::time::Duration;
///
/// use celestia_openrpc::prelude::*;
/// use celestia_openrpc::Client;
///
/// let client = Client::builder()
///     .url("http://localhost:26658")
///     .auth_token("secret")
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .await?;
///
/// let head = client.header_network_head().await?;
/// # Ok(())
/// # }
/// ```
///
/// [`MultiClient`]: crate::MultiClient
#[derive(Clone)]
pub struct ClientBuilder {
    url: Option<String>,
    auth_token: Option<String>,
    request_timeout: Duration,
    max_response_size: usize,
    app_version: AppVersion,
}

impl ClientBuilder {
    /// Returns a new builder.
    pub fn new() -> ClientBuilder {
        ClientBuilder {
            url: None,
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
            app_version: AppVersion::latest(),
        }
    }

    /// Set the url of the node.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the token sent in the `Authorization` header.
    ///
    /// An empty token is the same as no token.
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into()).filter(|token: &String| !token.is_empty());
        self
    }

    /// Set the timeout of a single request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the maximum size of a response, in bytes.
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size;
        self
    }

    /// Set the [`AppVersion`] whose parameters are used to verify blobs.
    pub fn app_version(mut self, app_version: AppVersion) -> Self {
        self.app_version = app_version;
        self
    }

    pub(crate) fn get_url(&self) -> Result<&str, Error> {
        self.url
            .as_deref()
            .ok_or_else(|| Error::ProtocolNotSupported(String::new()))
    }

    pub(crate) fn get_app_version(&self) -> AppVersion {
        self.app_version
    }

    /// Build a [`Client`].
    pub async fn build(self) -> Result<Client, Error> {
        let url = self.get_url()?;
        self.connect(url).await
    }

    pub(crate) async fn connect(&self, url: &str) -> Result<Client, Error> {
        let protocol =
            Protocol::from_url(url).ok_or_else(|| Error::ProtocolNotSupported(url.to_owned()))?;
        let headers = self.headers()?;
        let max_response_size = u32::try_from(self.max_response_size).unwrap_or(u32::MAX);

        debug!(
            "Connecting to {url} using {protocol:?}, authorized: {}",
            self.auth_token.is_some()
        );

        let transport = match protocol {
            Protocol::Http => Transport::Http(
                HttpClientBuilder::default()
                    .max_response_size(max_response_size)
                    .request_timeout(self.request_timeout)
                    .set_headers(headers)
                    .build(url)?,
            ),
            Protocol::Ws => Transport::Ws(
                WsClientBuilder::default()
                    .max_response_size(max_response_size)
                    .request_timeout(self.request_timeout)
                    .set_headers(headers)
                    .build(url)
                    .await?,
            ),
        };

        Ok(Client {
            transport: RwLock::new(Some(Arc::new(transport))),
            protocol,
        })
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &self.auth_token {
            let val = HeaderValue::from_str(&format!("Bearer {token}"))?;
            headers.insert(header::AUTHORIZATION, val);
        }

        Ok(headers)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        ClientBuilder::new()
    }
}

// The token is a secret, don't leak it into logs.
impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| ".."))
            .field("request_timeout", &self.request_timeout)
            .field("max_response_size", &self.max_response_size)
            .field("app_version", &self.app_version)
            .finish()
    }
}
