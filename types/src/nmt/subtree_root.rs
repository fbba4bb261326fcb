//! Inclusion of the blob's subtree roots in the row roots.
//!
//! A commitment proof carries the roots of the subtrees built over blob's
//! shares instead of the shares themselves. To check them against a row root,
//! the row's [`Nmt`] root is recomputed with the subtree roots standing in for
//! the whole aligned subtrees and the proof nodes filling in everything else.
//!
//! [`Nmt`]: crate::nmt::Nmt

use std::ops::Range;
use std::slice;

use crate::error::{bail_verification, verification_error};
use crate::merkle::split_point;
use crate::nmt::{
    MerkleHash, Namespace, NamespaceProof, NamespacedHash, NamespacedHashExt, NamespacedSha2Hasher,
};
use crate::Result;
use nmt_rs::NamespaceMerkleHasher;

/// Split the leaf range of a proof into the ranges covered by the consecutive subtree roots.
///
/// Each range starts where the previous one ended and is as wide as possible while
/// being aligned to its own width, not exceeding `subtree_width` and not crossing `end`.
///
/// # Errors
///
/// This function will return an error if the range is empty or if `subtree_width`
/// isn't a power of two.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::nmt::to_leaf_ranges;
///
/// let ranges = to_leaf_ranges(2, 11, 4).unwrap();
/// assert_eq!(ranges, vec![2..4, 4..8, 8..10, 10..11]);
/// ```
pub fn to_leaf_ranges(start: usize, end: usize, subtree_width: usize) -> Result<Vec<Range<usize>>> {
    if start >= end {
        bail_verification!("invalid proof range: [{start}, {end})");
    }
    if !subtree_width.is_power_of_two() {
        bail_verification!("subtree width must be a power of two, got {subtree_width}");
    }

    let mut ranges = Vec::new();
    let mut current = start;

    while current < end {
        let size = next_subtree_size(current, end).min(subtree_width);
        ranges.push(current..current + size);
        current += size;
    }

    Ok(ranges)
}

// size of the largest subtree aligned at `start` which doesn't cross `end`
fn next_subtree_size(start: usize, end: usize) -> usize {
    let ideal = start.trailing_zeros();
    let max = (end - start).ilog2();
    1 << ideal.min(max)
}

/// Verify that the subtree roots are included in the row root.
///
/// `proof` is the [`Nmt`] proof of the range of shares committed to by `subtree_roots`,
/// as returned by the node in the commitment proof. Every subtree root must belong
/// only to the `namespace`, which in turn must be within the range of the `row_root`.
///
/// # Errors
///
/// This function will return an error if any node is malformed or out of order,
/// if the amount of subtree roots doesn't match the proof range or if the
/// recomputed root is different than the `row_root`.
///
/// [`Nmt`]: crate::nmt::Nmt
pub fn verify_subtree_roots_inclusion(
    proof: &NamespaceProof,
    subtree_roots: &[NamespacedHash],
    subtree_width: usize,
    namespace: Namespace,
    row_root: &NamespacedHash,
) -> Result<()> {
    if proof.is_of_absence() {
        bail_verification!("expected presence proof of the subtree roots");
    }

    row_root.validate_namespace_order()?;
    if namespace.is_outside_range(row_root, row_root) {
        bail_verification!("namespace {namespace} outside of the row root range");
    }

    for root in subtree_roots {
        if root.min_namespace() != *namespace || root.max_namespace() != *namespace {
            bail_verification!("subtree root doesn't belong to the namespace {namespace}");
        }
    }

    let start = proof.start_idx() as usize;
    let end = proof.end_idx() as usize;
    let ranges = to_leaf_ranges(start, end, subtree_width)?;

    if ranges.len() != subtree_roots.len() {
        bail_verification!(
            "subtree roots ({}) don't match the ranges ({}) of the proof",
            subtree_roots.len(),
            ranges.len()
        );
    }

    let mut builder = RootBuilder {
        hasher: NamespacedSha2Hasher::with_ignore_max_ns(proof.max_ns_ignored()),
        proof_range: start..end,
        ranges: &ranges,
        subtree_roots: subtree_roots.iter(),
        nodes: proof.siblings().iter(),
    };

    let estimate = (split_point(end) * 2).max(1);
    let mut root = builder
        .compute(0, estimate)?
        .ok_or_else(|| verification_error!("proof doesn't cover any leaves"))?;

    if builder.subtree_roots.next().is_some() {
        bail_verification!("not all subtree roots were used");
    }

    // remaining nodes are roots of the subtrees to the right of the proven range
    for node in builder.nodes.by_ref() {
        root = hash_nodes(&builder.hasher, &root, node)?;
    }

    if root != *row_root {
        bail_verification!("computed root doesn't match the row root");
    }

    Ok(())
}

struct RootBuilder<'a> {
    hasher: NamespacedSha2Hasher,
    proof_range: Range<usize>,
    ranges: &'a [Range<usize>],
    subtree_roots: slice::Iter<'a, NamespacedHash>,
    nodes: slice::Iter<'a, NamespacedHash>,
}

impl RootBuilder<'_> {
    fn compute(&mut self, start: usize, end: usize) -> Result<Option<NamespacedHash>> {
        if end <= self.proof_range.start || start >= self.proof_range.end {
            return Ok(self.nodes.next().cloned());
        }

        if let Some((range, rest)) = self.ranges.split_first() {
            if range.start == start && range.end == end {
                self.ranges = rest;
                return Ok(self.subtree_roots.next().cloned());
            }
        }

        if end - start == 1 {
            return Ok(self.subtree_roots.next().cloned());
        }

        let split = split_point(end - start);
        let left = self.compute(start, start + split)?;
        let right = self.compute(start + split, end)?;

        match (left, right) {
            (Some(left), Some(right)) => hash_nodes(&self.hasher, &left, &right).map(Some),
            // only the right subtree can be missing
            (left, None) => Ok(left),
            (None, Some(_)) => bail_verification!("missing left node"),
        }
    }
}

fn hash_nodes(
    hasher: &NamespacedSha2Hasher,
    left: &NamespacedHash,
    right: &NamespacedHash,
) -> Result<NamespacedHash> {
    left.validate_namespace_order()?;
    right.validate_namespace_order()?;

    if left.max_namespace() > right.min_namespace() {
        bail_verification!("nodes out of namespace order");
    }

    Ok(hasher.hash_nodes(left, right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmt::{Nmt, NmtExt};

    #[test]
    fn leaf_ranges() {
        assert_eq!(to_leaf_ranges(0, 1, 1).unwrap(), vec![0..1]);
        assert_eq!(to_leaf_ranges(0, 8, 8).unwrap(), vec![0..8]);
        assert_eq!(to_leaf_ranges(0, 8, 4).unwrap(), vec![0..4, 4..8]);
        assert_eq!(to_leaf_ranges(0, 7, 4).unwrap(), vec![0..4, 4..6, 6..7]);
        assert_eq!(to_leaf_ranges(3, 9, 16).unwrap(), vec![3..4, 4..8, 8..9]);
        assert_eq!(to_leaf_ranges(2, 11, 4).unwrap(), vec![2..4, 4..8, 8..10, 10..11]);
    }

    #[test]
    fn leaf_ranges_invalid() {
        to_leaf_ranges(3, 3, 4).unwrap_err();
        to_leaf_ranges(4, 3, 4).unwrap_err();
        to_leaf_ranges(0, 4, 0).unwrap_err();
        to_leaf_ranges(0, 4, 3).unwrap_err();
    }

    fn ns(n: u8) -> Namespace {
        Namespace::const_v0([0, 0, 0, 0, 0, 0, 0, 0, 0, n])
    }

    // row of 8 leaves: 2 of ns(1), 5 of ns(2), 1 of ns(3)
    fn row() -> Vec<(Namespace, Vec<u8>)> {
        let namespaces = [1, 1, 2, 2, 2, 2, 2, 3];
        namespaces
            .iter()
            .enumerate()
            .map(|(i, n)| (ns(*n), vec![i as u8; 16]))
            .collect()
    }

    fn root_of(leaves: &[(Namespace, Vec<u8>)]) -> NamespacedHash {
        let mut tree = <Nmt as NmtExt>::default();
        for (ns, data) in leaves {
            tree.push_leaf(data, **ns).unwrap();
        }
        tree.root()
    }

    fn leaf_hash(leaf: &(Namespace, Vec<u8>)) -> NamespacedHash {
        NamespacedSha2Hasher::with_ignore_max_ns(true).hash_leaf_with_namespace(&leaf.1, *leaf.0)
    }

    #[test]
    fn subtree_roots_inclusion() {
        let row = row();
        let row_root = root_of(&row);
        let hasher = NamespacedSha2Hasher::with_ignore_max_ns(true);

        // blob of ns(2) spans leaves 2..7, with width 2: [2..4, 4..6, 6..7]
        let subtree_roots = vec![root_of(&row[2..4]), root_of(&row[4..6]), root_of(&row[6..7])];

        // in-order siblings: left of the range, then right of it
        let left = hasher.hash_nodes(&leaf_hash(&row[0]), &leaf_hash(&row[1]));
        let right = leaf_hash(&row[7]);
        let proof = NamespaceProof::new_presence(2, 7, vec![left, right]);

        verify_subtree_roots_inclusion(&proof, &subtree_roots, 2, ns(2), &row_root).unwrap();

        // proof nodes must agree with the nmt-rs range verification
        let leaves: Vec<_> = row[2..7].iter().map(|(_, data)| data.clone()).collect();
        proof.verify_range(&row_root, &leaves, *ns(2)).unwrap();

        // wrong namespace
        verify_subtree_roots_inclusion(&proof, &subtree_roots, 2, ns(1), &row_root).unwrap_err();

        // width 4 splits the range the same way as width 2
        verify_subtree_roots_inclusion(&proof, &subtree_roots, 4, ns(2), &row_root).unwrap();

        // width 1 needs a subtree root per leaf
        verify_subtree_roots_inclusion(&proof, &subtree_roots, 1, ns(2), &row_root).unwrap_err();

        // swapped subtree roots
        let mut swapped = subtree_roots.clone();
        swapped.swap(0, 1);
        verify_subtree_roots_inclusion(&proof, &swapped, 2, ns(2), &row_root).unwrap_err();

        // different row root
        let other_root = root_of(&row[..4]);
        verify_subtree_roots_inclusion(&proof, &subtree_roots, 2, ns(2), &other_root)
            .unwrap_err();
    }

    #[test]
    fn single_leaf_range_before_wider_one() {
        // ns(2) spans leaves 3..8, with width 4: [3..4, 4..8]
        let row: Vec<_> = [1, 1, 1, 2, 2, 2, 2, 2]
            .iter()
            .enumerate()
            .map(|(i, n)| (ns(*n), vec![i as u8; 16]))
            .collect();
        let row_root = root_of(&row);
        let hasher = NamespacedSha2Hasher::with_ignore_max_ns(true);

        let subtree_roots = vec![root_of(&row[3..4]), root_of(&row[4..8])];
        let left = hasher.hash_nodes(&leaf_hash(&row[0]), &leaf_hash(&row[1]));
        let proof = NamespaceProof::new_presence(3, 8, vec![left, leaf_hash(&row[2])]);

        let leaves: Vec<_> = row[3..8].iter().map(|(_, data)| data.clone()).collect();
        proof.verify_range(&row_root, &leaves, *ns(2)).unwrap();

        verify_subtree_roots_inclusion(&proof, &subtree_roots, 4, ns(2), &row_root).unwrap();

        // a root per leaf of the wider range doesn't fit
        let per_leaf: Vec<_> = (3..8).map(|i| root_of(&row[i..i + 1])).collect();
        verify_subtree_roots_inclusion(&proof, &per_leaf, 4, ns(2), &row_root).unwrap_err();
    }

    #[test]
    fn missing_and_extra_nodes() {
        let row = row();
        let row_root = root_of(&row);
        let hasher = NamespacedSha2Hasher::with_ignore_max_ns(true);
        let subtree_roots = vec![root_of(&row[2..4]), root_of(&row[4..6]), root_of(&row[6..7])];
        let left = hasher.hash_nodes(&leaf_hash(&row[0]), &leaf_hash(&row[1]));
        let right = leaf_hash(&row[7]);

        let missing = NamespaceProof::new_presence(2, 7, vec![left.clone()]);
        verify_subtree_roots_inclusion(&missing, &subtree_roots, 2, ns(2), &row_root)
            .unwrap_err();

        let extra = NamespaceProof::new_presence(2, 7, vec![left, right.clone(), right]);
        verify_subtree_roots_inclusion(&extra, &subtree_roots, 2, ns(2), &row_root).unwrap_err();
    }

    #[test]
    fn unordered_nodes_fail_closed() {
        let row = row();
        let row_root = root_of(&row);
        let subtree_roots = vec![root_of(&row[2..4]), root_of(&row[4..6]), root_of(&row[6..7])];

        // nodes with namespace order reversed must not panic the hasher
        let left = leaf_hash(&row[7]);
        let right = leaf_hash(&row[0]);
        let proof = NamespaceProof::new_presence(2, 7, vec![left, right]);

        verify_subtree_roots_inclusion(&proof, &subtree_roots, 2, ns(2), &row_root).unwrap_err();
    }
}
