// Copyright 2025 Redshift Labs

use rayon::prelude::*;
use redshift_hash::{hash, Hasher, PseudoCompressionFunction};
use redshift_utils::{bail, checked_arithmetics::checked_log_2};

use super::error::Error;

/// A binary Merkle tree over hashed leaves.
///
/// Each leaf is a slice of field elements hashed into a digest; inner nodes
/// are built with a 2-to-1 digest compression. `layers[0]` holds the leaf
/// digests and the last layer holds only the root.
#[derive(Debug, Clone)]
pub struct MerkleTree<D> {
	log_len: usize,
	layers: Vec<Vec<D>>,
}

impl<D> MerkleTree<D>
where
	D: Clone + Eq + Send + Sync,
{
	/// Hashes `leaves` (in parallel, leaves are independent) and builds the
	/// tree bottom-up.
	pub fn build<F, H, C, L>(compression: &C, leaves: &[L]) -> Result<Self, Error>
	where
		F: Sync,
		H: Hasher<F, Digest = D>,
		C: PseudoCompressionFunction<D, 2> + Sync,
		L: AsRef<[F]> + Sync,
	{
		if !leaves.len().is_power_of_two() {
			bail!(Error::PowerOfTwoLengthRequired);
		}
		let log_len = checked_log_2(leaves.len());

		let leaf_digests: Vec<D> = leaves
			.par_iter()
			.map(|leaf| hash::<_, H, _>(leaf.as_ref()))
			.collect();

		let mut layers = vec![leaf_digests];
		for _ in 0..log_len {
			let prev = layers.last().expect("layers starts non-empty");
			let next = prev
				.chunks(2)
				.map(|pair| compression.compress([pair[0].clone(), pair[1].clone()]))
				.collect();
			layers.push(next);
		}

		Ok(Self { log_len, layers })
	}

	pub fn log_len(&self) -> usize {
		self.log_len
	}

	/// Number of leaves.
	pub fn len(&self) -> usize {
		1 << self.log_len
	}

	pub fn is_empty(&self) -> bool {
		false
	}

	/// The root digest, the tree's commitment.
	pub fn root(&self) -> D {
		self.layers[self.log_len][0].clone()
	}
}

/// An opening proof for a single leaf: the sibling digests along the path to
/// the root, together with the root the path must reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof<D> {
	leaf_index: usize,
	branch: Vec<D>,
	root: D,
}

impl<D> MerkleProof<D>
where
	D: Clone + Eq + Send + Sync,
{
	pub fn new(tree: &MerkleTree<D>, leaf_index: usize) -> Result<Self, Error> {
		if leaf_index >= tree.len() {
			bail!(Error::IndexOutOfRange {
				index: leaf_index,
				max: tree.len() - 1,
			});
		}

		let mut branch = Vec::with_capacity(tree.log_len());
		let mut index = leaf_index;
		for layer in &tree.layers[..tree.log_len()] {
			branch.push(layer[index ^ 1].clone());
			index >>= 1;
		}

		Ok(Self {
			leaf_index,
			branch,
			root: tree.root(),
		})
	}

	pub fn leaf_index(&self) -> usize {
		self.leaf_index
	}

	pub fn root(&self) -> &D {
		&self.root
	}

	/// Recomputes the path from `leaf_data` and compares against the stored
	/// root. Fails closed on any mismatch.
	pub fn validate<F, H, C>(&self, compression: &C, leaf_data: &[F]) -> bool
	where
		H: Hasher<F, Digest = D>,
		C: PseudoCompressionFunction<D, 2>,
	{
		let mut node = hash::<_, H, _>(leaf_data);
		let mut index = self.leaf_index;
		for sibling in &self.branch {
			node = if index & 1 == 0 {
				compression.compress([node, sibling.clone()])
			} else {
				compression.compress([sibling.clone(), node])
			};
			index >>= 1;
		}
		node == self.root
	}
}
