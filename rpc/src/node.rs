use celestia_openrpc_types::node::{AuthToken, NodeInfo, Permission};
use jsonrpsee::proc_macros::rpc;

#[rpc(client)]
pub trait Node {
    /// AuthNew signs and returns a new token with the given permissions.
    #[method(name = "node.AuthNew")]
    async fn node_auth_new(&self, perms: &[Permission]) -> Result<AuthToken, Error>;

    /// AuthVerify returns the permissions assigned to the given token.
    #[method(name = "node.AuthVerify")]
    async fn node_auth_verify(&self, token: &str) -> Result<Vec<Permission>, Error>;

    /// Info returns administrative information about the node.
    #[method(name = "node.Info")]
    async fn node_info(&self) -> Result<NodeInfo, Error>;

    /// LogLevelSet sets the given component log level to the given level.
    #[method(name = "node.LogLevelSet")]
    async fn node_log_level_set(&self, name: &str, level: &str) -> Result<(), Error>;

    /// Ready returns true once the node's RPC is ready to accept requests.
    #[method(name = "node.Ready")]
    async fn node_ready(&self) -> Result<bool, Error>;
}
