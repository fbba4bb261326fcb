use celestia_openrpc::prelude::*;
use celestia_openrpc::{Client, Error};
use celestia_openrpc_types::test_utils::ExtendedHeaderGenerator;
use celestia_openrpc_types::ErrorKind;

pub mod utils;

use crate::utils::{MockChain, MockNode};

#[tokio::test]
async fn local_and_network_head() {
    let node = MockNode::spawn(MockChain::generate(5)).await;
    let client = Client::new(&node.ws_url(), None).await.unwrap();

    let local_head = client.header_local_head().await.unwrap();
    let network_head = client.header_network_head().await.unwrap();

    local_head.validate().unwrap();
    assert_eq!(&local_head, node.chain.head());
    assert_eq!(local_head, network_head);
}

#[tokio::test]
async fn get_by_height() {
    let node = MockNode::spawn(MockChain::generate(5)).await;
    let client = Client::new(&node.http_url(), None).await.unwrap();

    let genesis = client.header_get_by_height(1).await.unwrap();
    genesis.validate().unwrap();
    assert_eq!(genesis.height().value(), 1);

    let mut trusted = genesis;

    for height in 2..=5 {
        let header = client.header_get_by_height(height).await.unwrap();
        header.validate().unwrap();
        trusted.verify_adjacent(&header).unwrap();
        trusted = header;
    }

    let waited = client.header_wait_for_height(3).await.unwrap();
    assert_eq!(waited.height().value(), 3);
}

#[tokio::test]
async fn get_by_height_not_found() {
    let node = MockNode::spawn(MockChain::generate(2)).await;
    let client = Client::new(&node.http_url(), None).await.unwrap();

    let err = Error::from(client.header_get_by_height(10).await.unwrap_err());
    // only missing blobs are reported as not found
    assert!(matches!(err, Error::JsonRpc(_)));
    assert_eq!(err.kind(), ErrorKind::Rejected);
}

#[tokio::test]
async fn get_by_hash() {
    let node = MockNode::spawn(MockChain::generate(3)).await;
    let client = Client::new(&node.http_url(), None).await.unwrap();

    for expected in &node.chain.headers {
        let header = client.header_get_by_hash(expected.hash()).await.unwrap();
        assert_eq!(&header, expected);
    }
}

#[tokio::test]
async fn get_range_by_height() {
    let node = MockNode::spawn(MockChain::generate(8)).await;
    let client = Client::new(&node.http_url(), None).await.unwrap();

    let from = client.header_get_by_height(2).await.unwrap();
    let range = client.header_get_range_by_height(&from, 7).await.unwrap();

    let heights: Vec<_> = range.iter().map(|h| h.height().value()).collect();
    assert_eq!(heights, vec![3, 4, 5, 6]);

    from.verify_adjacent_range(&range).unwrap();
}

#[tokio::test]
async fn headers_of_other_chain_are_not_adjacent() {
    let node = MockNode::spawn(MockChain::generate(3)).await;
    let client = Client::new(&node.http_url(), None).await.unwrap();

    let mut other_chain = ExtendedHeaderGenerator::new();
    let other_genesis = other_chain.next();
    let header = client.header_get_by_height(2).await.unwrap();

    let err = other_genesis.verify_adjacent(&header).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidProof);
}
