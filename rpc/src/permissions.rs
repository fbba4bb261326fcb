//! Permissions required by the node for each of its methods.
//!
//! The table is advisory, the node enforces the permissions of the token
//! it receives and the client never checks them on its own.

use celestia_openrpc_types::node::Permission::{self, Admin, Public, Read, Write};

/// Namespaces of the node's api.
pub const NAMESPACES: &[&str] = &[
    "blob", "share", "header", "state", "das", "fraud", "p2p", "node", "da",
];

/// A single method of the node's api.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Method {
    /// Namespace the method belongs to.
    pub namespace: &'static str,
    /// Name of the method within the namespace.
    pub name: &'static str,
    /// Permission needed to call the method.
    pub permission: Permission,
    /// Whether the method opens a subscription.
    pub is_subscription: bool,
}

impl Method {
    /// Full name of the method, as sent on the wire.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

const fn call(namespace: &'static str, name: &'static str, permission: Permission) -> Method {
    Method {
        namespace,
        name,
        permission,
        is_subscription: false,
    }
}

const fn subscription(namespace: &'static str, name: &'static str) -> Method {
    Method {
        namespace,
        name,
        permission: Read,
        is_subscription: true,
    }
}

/// All the methods of the node's api.
pub const METHODS: &[Method] = &[
    // blob
    call("blob", "Submit", Write),
    call("blob", "Get", Read),
    call("blob", "GetAll", Read),
    call("blob", "GetProof", Read),
    call("blob", "Included", Read),
    call("blob", "GetCommitmentProof", Read),
    subscription("blob", "Subscribe"),
    // share
    call("share", "SharesAvailable", Read),
    call("share", "GetShare", Read),
    call("share", "GetEDS", Read),
    call("share", "GetSharesByNamespace", Read),
    // header
    call("header", "LocalHead", Read),
    call("header", "GetByHash", Read),
    call("header", "GetRangeByHeight", Read),
    call("header", "GetByHeight", Read),
    call("header", "WaitForHeight", Read),
    call("header", "SyncState", Read),
    call("header", "SyncWait", Read),
    call("header", "NetworkHead", Read),
    subscription("header", "Subscribe"),
    // state
    call("state", "AccountAddress", Read),
    call("state", "Balance", Read),
    call("state", "BalanceForAddress", Read),
    call("state", "Transfer", Write),
    call("state", "SubmitPayForBlob", Write),
    call("state", "CancelUnbondingDelegation", Write),
    call("state", "BeginRedelegate", Write),
    call("state", "Undelegate", Write),
    call("state", "Delegate", Write),
    call("state", "QueryDelegation", Read),
    call("state", "QueryUnbonding", Read),
    call("state", "QueryRedelegations", Read),
    call("state", "GrantFee", Write),
    call("state", "RevokeGrantFee", Write),
    // das
    call("das", "SamplingStats", Read),
    call("das", "WaitCatchUp", Read),
    // fraud
    subscription("fraud", "Subscribe"),
    call("fraud", "Get", Read),
    // p2p
    call("p2p", "Info", Admin),
    call("p2p", "Peers", Admin),
    call("p2p", "PeerInfo", Admin),
    call("p2p", "Connect", Admin),
    call("p2p", "ClosePeer", Admin),
    call("p2p", "Connectedness", Admin),
    call("p2p", "NATStatus", Admin),
    call("p2p", "BlockPeer", Admin),
    call("p2p", "UnblockPeer", Admin),
    call("p2p", "ListBlockedPeers", Admin),
    call("p2p", "Protect", Admin),
    call("p2p", "Unprotect", Admin),
    call("p2p", "IsProtected", Admin),
    call("p2p", "BandwidthStats", Admin),
    call("p2p", "BandwidthForPeer", Admin),
    call("p2p", "BandwidthForProtocol", Admin),
    call("p2p", "ResourceState", Admin),
    call("p2p", "PubSubPeers", Admin),
    // node
    call("node", "Info", Admin),
    call("node", "Ready", Public),
    call("node", "LogLevelSet", Admin),
    call("node", "AuthVerify", Admin),
    call("node", "AuthNew", Admin),
    // da
    call("da", "MaxBlobSize", Read),
    call("da", "Get", Read),
    call("da", "GetProofs", Read),
    call("da", "GetIDs", Read),
    call("da", "Commit", Read),
    call("da", "Validate", Read),
    call("da", "Submit", Write),
];

/// Find the method by its full name, e.g. `blob.Submit`.
pub fn method(full_name: &str) -> Option<&'static Method> {
    let (namespace, name) = full_name.split_once('.')?;

    METHODS
        .iter()
        .find(|method| method.namespace == namespace && method.name == name)
}

/// Get the permission required by the method with the full name, e.g. `blob.Submit`.
pub fn permission(full_name: &str) -> Option<Permission> {
    method(full_name).map(|method| method.permission)
}

/// Whether any of the methods of the namespace opens a subscription.
pub fn namespace_has_subscriptions(namespace: &str) -> bool {
    METHODS
        .iter()
        .any(|method| method.namespace == namespace && method.is_subscription)
}
