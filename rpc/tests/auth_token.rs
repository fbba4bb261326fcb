use celestia_openrpc::prelude::*;
use celestia_openrpc::Client;
use serde_json::json;

pub mod utils;

use crate::utils::raw_node::{header, RawNode};

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let node = RawNode::spawn(json!(true)).await;
    let client = Client::new(&node.url(), Some("secret-token")).await.unwrap();

    assert!(client.node_ready().await.unwrap());
    assert!(client.node_ready().await.unwrap());

    let requests = node.requests();
    assert_eq!(requests.len(), 2);

    for headers in &requests {
        assert_eq!(
            header(headers, "authorization"),
            Some("Bearer secret-token")
        );
    }
}

#[tokio::test]
async fn no_token_no_header() {
    let node = RawNode::spawn(json!(true)).await;
    let client = Client::new(&node.url(), None).await.unwrap();

    assert!(client.node_ready().await.unwrap());

    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(header(&requests[0], "authorization"), None);
}

#[tokio::test]
async fn empty_token_no_header() {
    let node = RawNode::spawn(json!(true)).await;
    let client = Client::new(&node.url(), Some("")).await.unwrap();

    assert!(client.node_ready().await.unwrap());

    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(header(&requests[0], "authorization"), None);
}

#[tokio::test]
async fn builder_token_is_sent() {
    let node = RawNode::spawn(json!(1_973_786)).await;
    let client = Client::builder()
        .url(node.url())
        .auth_token("secret-token")
        .build()
        .await
        .unwrap();

    assert_eq!(client.da_max_blob_size().await.unwrap(), 1_973_786);

    let requests = node.requests();
    assert_eq!(
        header(&requests[0], "authorization"),
        Some("Bearer secret-token")
    );
    assert_eq!(
        header(&requests[0], "content-type"),
        Some("application/json")
    );
}
