//! Types of the `node` namespace: node info and the auth permissions.

use std::fmt;

use base64::prelude::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Kind of the node serving the api.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NodeType {
    /// Bridge node, connected to the consensus network.
    Bridge = 1,
    /// Full node, reconstructing every block from the network.
    Full = 2,
    /// Light node, sampling the blocks.
    Light = 3,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::Bridge => "Bridge",
            NodeType::Full => "Full",
            NodeType::Light => "Light",
        };
        f.write_str(s)
    }
}

/// Information about the node, as returned by `node.Info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Kind of the node.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Version of the api served by the node.
    pub api_version: String,
}

/// Permission level of an auth token.
///
/// Every method of the api requires one of these, see the permission table
/// of the rpc client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Accessible without a token.
    Public,
    /// Reading data from the node.
    Read,
    /// Submitting transactions through the node.
    Write,
    /// Managing the node.
    Admin,
}

impl Permission {
    /// Name of the permission, the same as on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Public => "public",
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An auth token created with `node.AuthNew`.
///
/// The node sends the token as base64 encoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Get the token to be used in the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the token.
    pub fn into_string(self) -> String {
        self.0
    }
}

// The token is a secret, don't leak it into logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

impl<'de> Deserialize<'de> for AuthToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)?;
        let token = String::from_utf8(bytes).map_err(D::Error::custom)?;
        Ok(AuthToken(token))
    }
}

impl Serialize for AuthToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64_STANDARD.encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_info_json() {
        let json = r#"{"type":3,"api_version":"v0.11.0"}"#;
        let info: NodeInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.node_type, NodeType::Light);
        assert_eq!(info.api_version, "v0.11.0");
        assert_eq!(serde_json::to_string(&info).unwrap(), json);

        serde_json::from_str::<NodeInfo>(r#"{"type":7,"api_version":""}"#).unwrap_err();
    }

    #[test]
    fn permissions_json() {
        let perms: Vec<Permission> =
            serde_json::from_str(r#"["public","read","write","admin"]"#).unwrap();

        assert_eq!(
            perms,
            vec![
                Permission::Public,
                Permission::Read,
                Permission::Write,
                Permission::Admin
            ]
        );
        assert!(Permission::Read < Permission::Admin);
        assert_eq!(Permission::Write.to_string(), "write");
    }

    #[test]
    fn auth_token_is_base64_on_wire() {
        let token: AuthToken = serde_json::from_str(r#""ZXlKaGJHY2lPaUpJVXpJMU5pSjk=""#).unwrap();

        assert_eq!(token.as_str(), "eyJhbGciOiJIUzI1NiJ9");
        assert_eq!(format!("{token:?}"), "AuthToken(..)");
        assert_eq!(
            serde_json::to_string(&token).unwrap(),
            r#""ZXlKaGJHY2lPaUpJVXpJMU5pSjk=""#
        );
    }
}
