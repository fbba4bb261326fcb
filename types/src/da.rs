//! Types of the `da` namespace, a generic data availability interface for rollups.
//!
//! All of them are opaque byte strings, sent as base64 over the wire.

use serde::{Deserialize, Serialize};

macro_rules! da_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(
            #[serde(with = "tendermint_proto::serializers::bytes::base64string")] pub Vec<u8>,
        );

        impl From<Vec<u8>> for $name {
            fn from(value: Vec<u8>) -> Self {
                $name(value)
            }
        }

        impl From<$name> for Vec<u8> {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

da_bytes! {
    /// Identifier of a blob, the height it was included at followed by its commitment.
    Id
}

da_bytes! {
    /// Data of a single blob.
    Blob
}

da_bytes! {
    /// Inclusion proof of a blob.
    Proof
}

da_bytes! {
    /// Commitment of a blob.
    Commitment
}

impl Id {
    /// Height encoded in the identifier, stored as the first 8 little endian bytes.
    pub fn height(&self) -> Option<u64> {
        let bytes = self.0.get(..8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }

    /// Commitment encoded in the identifier, following the height.
    pub fn commitment(&self) -> Option<&[u8]> {
        self.0.get(8..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_as_base64() {
        let blob = Blob(b"hello".to_vec());
        let json = serde_json::to_string(&blob).unwrap();

        assert_eq!(json, r#""aGVsbG8=""#);
        assert_eq!(serde_json::from_str::<Blob>(&json).unwrap(), blob);
    }

    #[test]
    fn id_parts() {
        let mut raw = 42u64.to_le_bytes().to_vec();
        raw.extend_from_slice(&[7; 32]);
        let id = Id::from(raw);

        assert_eq!(id.height(), Some(42));
        assert_eq!(id.commitment(), Some(&[7; 32][..]));

        let short = Id(vec![1, 2, 3]);
        assert_eq!(short.height(), None);
    }
}
