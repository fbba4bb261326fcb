use serde::{Deserialize, Serialize};

use crate::error::{bail_validation, bail_verification, validation_error, verification_error};
use crate::merkle::{self, split_point, Hash};
use crate::{Error, Result};

/// A proof of inclusion of some leaf in a merkle tree.
///
/// The tree is the one built by [`merkle::hash_from_byte_slices`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMerkleProof", into = "RawMerkleProof")]
pub struct MerkleProof {
    index: usize,
    total: usize,
    leaf_hash: Hash,
    aunts: Vec<Hash>,
}

impl MerkleProof {
    /// Create a merkle proof of inclusion of a given leaf in a list.
    ///
    /// Returns a proof together with the root hash of a merkle tree built from given leaves.
    ///
    /// # Errors
    ///
    /// This function will return an error if `leaf_to_prove` index is out of `leaves` bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use celestia_openrpc_types::MerkleProof;
    ///
    /// let (proof, root) = MerkleProof::new(0, &[b"a", b"b", b"c"]).unwrap();
    ///
    /// assert!(proof.verify(b"a", root).is_ok());
    /// ```
    pub fn new(leaf_to_prove: usize, leaves: &[impl AsRef<[u8]>]) -> Result<(Self, Hash)> {
        if leaf_to_prove >= leaves.len() {
            return Err(Error::IndexOutOfRange(leaf_to_prove, leaves.len()));
        }

        let tree_height = leaves.len().next_power_of_two().ilog2() as usize;
        let mut aunts = Vec::with_capacity(tree_height);

        let root = hash_leaves_collecting_aunts(0, leaf_to_prove, leaves, &mut aunts);
        let proof = Self {
            index: leaf_to_prove,
            total: leaves.len(),
            leaf_hash: merkle::leaf_hash(leaves[leaf_to_prove].as_ref()),
            aunts,
        };

        Ok((proof, root))
    }

    /// Index of the proven leaf.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Amount of leaves in the tree.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Hash of the proven leaf.
    pub fn leaf_hash(&self) -> &Hash {
        &self.leaf_hash
    }

    /// Inner nodes needed to recompute the root, from the bottom of the tree.
    pub fn aunts(&self) -> &[Hash] {
        &self.aunts
    }

    /// Verify that given leaf is included under the root hash.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///  - provided leaf is different than the one for which proof was created
    ///  - proof is malformed, meaning some inconsistency between leaf index, leaves count,
    ///    or amount of inner nodes
    ///  - the recomputed root hash differs from expected one
    pub fn verify(&self, leaf: impl AsRef<[u8]>, root: Hash) -> Result<()> {
        let leaf = merkle::leaf_hash(leaf.as_ref());

        if leaf != self.leaf_hash {
            bail_verification!("proof created for a different leaf");
        }

        let computed_root = subtree_root_from_aunts(self.index, self.total, leaf, &self.aunts)?;

        if computed_root != root {
            return Err(Error::RootMismatch);
        }

        Ok(())
    }
}

// creates a merkle tree out of the given leaves and returns its root hash.
// inner nodes needed to prove leaf with given index are collected in `aunts`.
fn hash_leaves_collecting_aunts(
    // for recursion, index of the first leaf in current subtree wrt the whole tree
    first_leaf_index: usize,
    leaf_to_prove: usize,
    leaves: &[impl AsRef<[u8]>],
    aunts: &mut Vec<Hash>,
) -> Hash {
    let total = leaves.len();

    match total {
        0 => merkle::empty_hash(),
        1 => merkle::leaf_hash(leaves[0].as_ref()),
        _ => {
            let split = split_point(total);
            let left = hash_leaves_collecting_aunts(
                first_leaf_index,
                leaf_to_prove,
                &leaves[..split],
                aunts,
            );
            let right = hash_leaves_collecting_aunts(
                first_leaf_index + split,
                leaf_to_prove,
                &leaves[split..],
                aunts,
            );

            if (first_leaf_index..first_leaf_index + total).contains(&leaf_to_prove) {
                if leaf_to_prove < first_leaf_index + split {
                    aunts.push(right)
                } else {
                    aunts.push(left)
                }
            }

            merkle::inner_hash(&left, &right)
        }
    }
}

// aunts are the inner hashes needed to recompute the root, the last one
// being the sibling of the root's child
fn subtree_root_from_aunts(index: usize, total: usize, leaf: Hash, aunts: &[Hash]) -> Result<Hash> {
    if total == 0 || index >= total {
        bail_verification!("index {index} out of range for {total} leaves");
    }

    if total == 1 {
        if !aunts.is_empty() {
            bail_verification!("extra aunts in proof");
        }
        return Ok(leaf);
    }

    let split = split_point(total);
    let (sibling, aunts) = aunts
        .split_last()
        .ok_or_else(|| verification_error!("aunts missing in proof"))?;

    let root = if index < split {
        let left = subtree_root_from_aunts(index, split, leaf, aunts)?;
        merkle::inner_hash(&left, sibling)
    } else {
        let right = subtree_root_from_aunts(index - split, total - split, leaf, aunts)?;
        merkle::inner_hash(sibling, &right)
    };

    Ok(root)
}

#[derive(Serialize, Deserialize)]
struct RawMerkleProof {
    total: i64,
    index: i64,
    #[serde(with = "tendermint_proto::serializers::bytes::base64string")]
    leaf_hash: Vec<u8>,
    #[serde(
        default,
        with = "tendermint_proto::serializers::bytes::vec_base64string"
    )]
    aunts: Vec<Vec<u8>>,
}

impl TryFrom<RawMerkleProof> for MerkleProof {
    type Error = Error;

    fn try_from(value: RawMerkleProof) -> Result<Self, Self::Error> {
        if value.index < 0 {
            bail_validation!("negative index");
        }
        if value.total <= 0 {
            bail_validation!("total <= 0");
        }

        Ok(Self {
            index: value.index as usize,
            total: value.total as usize,
            leaf_hash: value
                .leaf_hash
                .try_into()
                .map_err(|_| validation_error!("invalid hash size"))?,
            aunts: value
                .aunts
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()
                .map_err(|_| validation_error!("invalid hash size"))?,
        })
    }
}

impl From<MerkleProof> for RawMerkleProof {
    fn from(value: MerkleProof) -> Self {
        Self {
            index: value.index as i64,
            total: value.total as i64,
            leaf_hash: value.leaf_hash.to_vec(),
            aunts: value.aunts.into_iter().map(|aunt| aunt.to_vec()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|_| rand::random()).collect()
    }

    #[test]
    fn create_and_verify() {
        for _ in 0..100 {
            let leaf_size = (rand::random::<usize>() % 1024) + 1;
            let leaves_amount = (rand::random::<usize>() % 16) + 1;
            let data = random_bytes(leaves_amount * leaf_size);

            let leaves: Vec<_> = data.chunks(leaf_size).collect();
            let leaf_to_prove = rand::random::<usize>() % leaves_amount;

            let (proof, root) = MerkleProof::new(leaf_to_prove, &leaves).unwrap();
            assert_eq!(root, merkle::hash_from_byte_slices(&leaves));

            proof.verify(leaves[leaf_to_prove], root).unwrap();
            proof.verify(random_bytes(leaf_size + 1), root).unwrap_err();
            proof
                .verify(leaves[leaf_to_prove], rand::random())
                .unwrap_err();
        }
    }

    #[test]
    fn out_of_range() {
        let e = MerkleProof::new(3, &[b"a", b"b", b"c"]).unwrap_err();
        assert!(matches!(e, Error::IndexOutOfRange(3, 3)));
    }

    #[test]
    fn tampered_aunts() {
        let leaves = [b"a", b"b", b"c", b"d", b"e"];
        let (mut proof, root) = MerkleProof::new(2, &leaves).unwrap();

        proof.aunts.pop();
        proof.verify(b"c", root).unwrap_err();

        let (mut proof, root) = MerkleProof::new(2, &leaves).unwrap();
        proof.aunts.push([0; 32]);
        proof.verify(b"c", root).unwrap_err();
    }

    #[test]
    fn json_shape() {
        let (proof, root) = MerkleProof::new(1, &[b"a", b"b"]).unwrap();

        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["index"], 1);
        assert_eq!(json["aunts"].as_array().unwrap().len(), 1);

        let decoded: MerkleProof = serde_json::from_value(json).unwrap();
        decoded.verify(b"b", root).unwrap();

        serde_json::from_str::<MerkleProof>(
            r#"{"total":0,"index":0,"leaf_hash":"","aunts":[]}"#,
        )
        .unwrap_err();
    }
}
