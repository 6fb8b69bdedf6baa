// Copyright 2025 Redshift Labs

//! Pure index arithmetic for the coset structure of the folding protocol.
//!
//! One fold step pairs every domain index with its algebraic partner half a
//! domain away; a round group of `fold_count` steps groups the domain into
//! cosets of size `2^fold_count`, one Merkle leaf each. Everything here is
//! stateless and callable concurrently.

use redshift_field::TwoAdicField;

use crate::domain::EvaluationDomain;

/// The algebraic partner of `x` under one fold step: the index of `-x`.
pub fn paired_index(x: usize, domain_size: usize) -> usize {
	(x + domain_size / 2) % domain_size
}

/// Canonical index of `x` after `fold_count` halvings of the domain.
pub fn folded_index(x: usize, domain_size: usize, fold_count: usize) -> usize {
	let mut x = x % domain_size;
	let mut domain_size = domain_size;
	for _ in 0..fold_count {
		domain_size /= 2;
		x %= domain_size;
	}
	x
}

/// Sibling-pair indices of the coset of size `2^fold_count` rooted at
/// `x_index`, in the order a Merkle leaf stores them.
///
/// The pairs are produced by a binary-tree recursion over `(level, slot)`
/// state: the first pair is `(x, paired(x))`, and level `l >= 1` offsets every
/// pair root found so far by `base_index = domain_size >> (l + 1)`. Together
/// the pairs cover every intermediate fold inside one round group.
pub fn coset_pair_indices(
	x_index: usize,
	domain_size: usize,
	fold_count: usize,
) -> Vec<[usize; 2]> {
	let num_pairs = 1 << (fold_count - 1);
	let mut indices = Vec::with_capacity(num_pairs);
	indices.push([x_index % domain_size, paired_index(x_index, domain_size)]);

	let mut base_index = domain_size / 4;
	let mut prev_half_size = 1;
	while indices.len() < num_pairs {
		for j in 0..prev_half_size {
			let idx = (indices[j][0] + base_index) % domain_size;
			indices.push([idx, paired_index(idx, domain_size)]);
		}
		base_index /= 2;
		prev_half_size <<= 1;
	}
	indices
}

/// Sibling pairs of the coset rooted at `x_index`, as field elements together
/// with their domain indices.
pub fn coset_siblings<F: TwoAdicField>(
	x_index: usize,
	fold_count: usize,
	domain: &EvaluationDomain<F>,
) -> (Vec<[F; 2]>, Vec<[usize; 2]>) {
	let indices = coset_pair_indices(x_index, domain.size(), fold_count);
	let values = indices
		.iter()
		.map(|&[i0, i1]| [domain.element(i0), domain.element(i1)])
		.collect();
	(values, indices)
}

/// For each recomputed sibling pair, the slot of the matching pair inside the
/// committed leaf and whether the pair is stored swapped there.
///
/// The leaf layout is generated from the coset root while verification
/// recomputes pairs from the query index itself, so the two orders need not
/// line up; the permutation is recovered by brute-force search over the
/// (small) sibling set, matching pairs as unordered sets. Returns `None` when
/// some pair has no matching leaf slot.
pub fn leaf_pair_order(
	x_index: usize,
	domain_size: usize,
	fold_count: usize,
	pair_indices: &[[usize; 2]],
) -> Option<Vec<(usize, bool)>> {
	let root = folded_index(x_index, domain_size, fold_count);
	let leaf_indices = coset_pair_indices(root, domain_size, fold_count);
	if pair_indices.len() != leaf_indices.len() {
		return None;
	}

	pair_indices
		.iter()
		.map(|&[i0, i1]| {
			leaf_indices
				.iter()
				.position(|&[l0, l1]| (l0 == i0 && l1 == i1) || (l0 == i1 && l1 == i0))
				.map(|slot| (slot, leaf_indices[slot][0] != i0))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use redshift_field::BabyBear;

	use super::*;

	proptest! {
		#[test]
		fn test_paired_index_is_an_involution(log_size in 1usize..12, x in 0usize..4096) {
			let domain_size = 1 << log_size;
			let x = x % domain_size;
			prop_assert_eq!(paired_index(paired_index(x, domain_size), domain_size), x);
		}

		#[test]
		fn test_folded_index_is_reduction(log_size in 3usize..12, x in 0usize..4096, fold_count in 1usize..3) {
			let domain_size = 1 << log_size;
			let x = x % domain_size;
			prop_assert_eq!(
				folded_index(x, domain_size, fold_count),
				x % (domain_size >> fold_count)
			);
		}
	}

	#[test]
	fn test_single_fold_coset_of_zero() {
		// The one-step coset rooted at index 0 is exactly the pair
		// (1, element(n/2)) at indices (0, n/2).
		let domain = crate::domain::EvaluationDomain::<BabyBear>::new(4).unwrap();
		let (values, indices) = coset_siblings(0, 1, &domain);

		assert_eq!(indices, vec![[0, domain.size() / 2]]);
		assert_eq!(
			values,
			vec![[domain.element(0), domain.element(domain.size() / 2)]]
		);
	}

	#[test]
	fn test_coset_pair_indices_cover_the_coset() {
		let domain_size = 64;
		let fold_count = 3;
		let stride = domain_size >> fold_count;

		for x in [0, 5, 7, 21, 63] {
			let root = folded_index(x, domain_size, fold_count);
			let mut flattened: Vec<usize> = coset_pair_indices(x, domain_size, fold_count)
				.into_iter()
				.flatten()
				.collect();
			flattened.sort_unstable();

			let expected: Vec<usize> = (0..1 << fold_count).map(|t| root + t * stride).collect();
			assert_eq!(flattened, expected);
		}
	}

	#[test]
	fn test_pairs_are_half_a_domain_apart() {
		for pair in coset_pair_indices(13, 128, 4) {
			assert_eq!(pair[1], paired_index(pair[0], 128));
		}
	}

	#[test]
	fn test_leaf_pair_order_is_a_permutation() {
		let domain_size = 64;
		let fold_count = 3;

		for x in [2, 34, 18, 50] {
			let pairs = coset_pair_indices(x, domain_size, fold_count);
			let order = leaf_pair_order(x, domain_size, fold_count, &pairs).unwrap();

			let mut used = vec![false; pairs.len()];
			let root = folded_index(x, domain_size, fold_count);
			let leaf_pairs = coset_pair_indices(root, domain_size, fold_count);
			for (m, &(slot, swapped)) in order.iter().enumerate() {
				assert!(!used[slot]);
				used[slot] = true;
				let expected = if swapped {
					[leaf_pairs[slot][1], leaf_pairs[slot][0]]
				} else {
					leaf_pairs[slot]
				};
				assert_eq!(pairs[m], expected);
			}
		}
	}

	#[test]
	fn test_leaf_pair_order_rejects_foreign_pairs() {
		let pairs = coset_pair_indices(3, 64, 2);
		assert!(leaf_pair_order(4, 64, 2, &pairs).is_none());
	}
}
