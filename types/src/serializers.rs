pub(crate) mod none_as_negative_one {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Deserialize [`Option<u64>`] with negative numbers represented as `None`
    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<i64>::deserialize(deserializer)?;
        Ok(value.and_then(|x| if x >= 0 { Some(x as u64) } else { None }))
    }

    /// Serialize [`Option<u64>`] with `None` represented as `-1`
    pub(crate) fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let x = value
            .map(i64::try_from)
            .transpose()
            .map_err(S::Error::custom)?
            .unwrap_or(-1);
        serializer.serialize_i64(x)
    }

}

/// Serialize a list of [`NamespacedHash`]es as uppercase hex strings.
///
/// [`NamespacedHash`]: crate::nmt::NamespacedHash
pub(crate) mod vec_hex_namespaced_hash {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::nmt::{NamespacedHash, NamespacedHashExt};

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NamespacedHash>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hashes = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();

        hashes
            .iter()
            .map(|s| {
                let bytes = hex::decode(s).map_err(D::Error::custom)?;
                NamespacedHash::from_raw(&bytes).map_err(D::Error::custom)
            })
            .collect()
    }

    pub(crate) fn serialize<S>(value: &[NamespacedHash], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hashes: Vec<String> = value
            .iter()
            .map(|hash| hex::encode_upper(hash.to_array()))
            .collect();

        hashes.serialize(serializer)
    }
}

/// Serialize a list of [`NamespacedHash`]es as base64 strings.
///
/// [`NamespacedHash`]: crate::nmt::NamespacedHash
pub(crate) mod vec_base64_namespaced_hash {
    use serde::de::Error as _;
    use serde::{Deserializer, Serializer};
    use tendermint_proto::serializers::bytes::vec_base64string;

    use crate::nmt::{NamespacedHash, NamespacedHashExt};

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NamespacedHash>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hashes: Vec<Vec<u8>> = vec_base64string::deserialize(deserializer)?;

        hashes
            .iter()
            .map(|bytes| NamespacedHash::from_raw(bytes).map_err(D::Error::custom))
            .collect()
    }

    pub(crate) fn serialize<S>(value: &[NamespacedHash], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hashes: Vec<Vec<u8>> = value.iter().map(|hash| hash.to_vec()).collect();
        vec_base64string::serialize(&hashes, serializer)
    }

    #[cfg(test)]
    mod tests {
        use serde::{Deserialize, Serialize};

        use crate::nmt::{NamespacedHash, NamespacedHashExt};

        #[derive(Debug, Serialize, Deserialize)]
        struct Roots {
            #[serde(with = "super")]
            base64: Vec<NamespacedHash>,
            #[serde(with = "super::super::vec_hex_namespaced_hash")]
            hex: Vec<NamespacedHash>,
        }

        #[test]
        fn empty_root_encodings() {
            let roots = Roots {
                base64: vec![NamespacedHash::empty_root()],
                hex: vec![NamespacedHash::empty_root()],
            };

            let json = serde_json::to_value(&roots).unwrap();
            let hex = json["hex"][0].as_str().unwrap();

            assert_eq!(hex.len(), 180);
            assert_eq!(hex, hex.to_uppercase());
            assert_eq!(json["base64"][0].as_str().unwrap().len(), 120);

            let decoded: Roots = serde_json::from_value(json).unwrap();
            assert_eq!(decoded.base64, roots.base64);
            assert_eq!(decoded.hex, roots.hex);
        }

        #[test]
        fn invalid_hash_size() {
            serde_json::from_str::<Roots>(r#"{"base64": ["AAAA"], "hex": []}"#).unwrap_err();
            serde_json::from_str::<Roots>(r#"{"base64": [], "hex": ["00FF"]}"#).unwrap_err();
        }
    }
}

/// Deserialize `null` as the default value of the type.
pub(crate) mod null_as_default {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub(crate) fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.serialize(serializer)
    }
}

/// Serialize [`Hash`] as an uppercase hex string, with `null` or an empty
/// string read as [`Hash::None`].
///
/// [`Hash`]: crate::hash::Hash
/// [`Hash::None`]: crate::hash::Hash::None
pub(crate) mod hex_hash {
    use std::str::FromStr;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::hash::Hash;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Hash, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = Option::<String>::deserialize(deserializer)?.unwrap_or_default();

        if hex.is_empty() {
            Ok(Hash::None)
        } else {
            Hash::from_str(&hex).map_err(D::Error::custom)
        }
    }

    pub(crate) fn serialize<S>(value: &Hash, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }
}
