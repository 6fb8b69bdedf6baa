// Copyright 2025 Redshift Labs

use std::collections::BTreeMap;

use digest::{Digest, FixedOutputReset};
use itertools::izip;
use redshift_field::{Field, TwoAdicField};
use redshift_hash::{Hasher, PseudoCompressionFunction};
use redshift_utils::bail;
use tracing::{debug, instrument};

use super::{
	check_step_list,
	common::{BatchId, FriParams, FriProof, QueryProof},
	coset::{coset_siblings, folded_index, leaf_pair_order},
	error::Error,
	grinding,
	prove::derive_query_index,
};
use crate::{polynomial::Polynomial, transcript::HasherTranscript};

/// Evaluates at `z` the degree-1 Lagrange interpolant through `(x0, y0)` and
/// `(x1, y1)`; this re-derives one fold step without recomputing the whole
/// polynomial.
fn interpolate_line<F: Field>(x0: F, y0: F, x1: F, y1: F, z: F) -> Option<F> {
	let inv = (x0 - x1).invert()?;
	Some((y0 * (z - x1) - y1 * (z - x0)) * inv)
}

/// Scatters verifier-ordered sibling pairs into the dense coset layout, where
/// slot `t` holds the value and point at domain index `root + t * stride`.
///
/// Slot `t` pairs with slot `t + len/2` across every fold level, so the dense
/// layout lets a whole round group fold with plain index arithmetic.
fn dense_coset<F: TwoAdicField>(
	root: usize,
	stride: usize,
	pair_indices: &[[usize; 2]],
	pair_values: &[[F; 2]],
	pair_points: &[[F; 2]],
) -> Option<(Vec<F>, Vec<F>)> {
	let len = 2 * pair_indices.len();
	let mut values = vec![F::ZERO; len];
	let mut points = vec![F::ZERO; len];
	let mut seen = vec![false; len];

	for (indices, vals, pts) in izip!(pair_indices, pair_values, pair_points) {
		for side in 0..2 {
			let index = indices[side];
			if index < root || (index - root) % stride != 0 {
				return None;
			}
			let slot = (index - root) / stride;
			if slot >= len || seen[slot] {
				return None;
			}
			values[slot] = vals[side];
			points[slot] = pts[side];
			seen[slot] = true;
		}
	}

	Some((values, points))
}

/// Verifies a complete proximity proof against independently supplied
/// parameters and batch commitments.
///
/// The transcript is replayed in the prover's exact order: per round group the
/// root is absorbed and the group's challenges drawn, then the grinding nonce
/// is checked once, then the query positions are re-derived. Every query
/// replays `CheckInitial → CombineQ → CheckRound(i) → CheckFinal`; any
/// mismatch anywhere returns `Ok(false)` immediately, with no partial credit.
#[instrument(skip_all, name = "fri::verify_eval")]
#[allow(clippy::too_many_arguments)]
pub fn verify_eval<F, H, C, TH>(
	proof: &FriProof<F, H::Digest>,
	params: &FriParams<F>,
	commitments: &BTreeMap<BatchId, H::Digest>,
	theta: F,
	poly_ids: &[Vec<(BatchId, usize)>],
	combined_u: &[Polynomial<F>],
	denominators: &[Polynomial<F>],
	compression: &C,
	transcript: &mut HasherTranscript<TH>,
) -> Result<bool, Error>
where
	F: TwoAdicField,
	H: Hasher<F>,
	H::Digest: Clone + Eq + Send + Sync + AsRef<[u8]>,
	C: PseudoCompressionFunction<H::Digest, 2>,
	TH: Digest + FixedOutputReset + Clone,
{
	check_step_list(params.step_list(), params.r())?;
	if poly_ids.len() != combined_u.len() || poly_ids.len() != denominators.len() {
		bail!(Error::InvalidArgs(
			"poly_ids, combined_u and denominators must have one entry per evaluation group"
				.to_string()
		));
	}

	// Degree bound on the disclosed final polynomial, checked once up front.
	if proof.final_polynomial.degree() > params.folded_degree_bound() {
		debug!("final polynomial exceeds the folded degree bound");
		return Ok(false);
	}
	if proof.fri_roots.len() != params.num_step_groups() {
		return Ok(false);
	}
	if proof.query_proofs.len() != params.lambda() {
		return Ok(false);
	}

	// Replay the commit phase: roots in, challenges out, in strict order.
	let mut alphas = Vec::with_capacity(params.r());
	for (root, &step) in proof.fri_roots.iter().zip(params.step_list()) {
		transcript.observe_bytes(root.as_ref());
		alphas.extend(transcript.sample_fields::<F>(step));
	}

	if params.use_grinding()
		&& !grinding::verify(transcript, proof.proof_of_work, params.grinding_bits())
	{
		debug!("grinding verification failed");
		return Ok(false);
	}

	for query_proof in &proof.query_proofs {
		let x_index = derive_query_index(&params.domains()[0], transcript)?;
		if !verify_query::<F, H, C>(
			proof,
			query_proof,
			x_index,
			&alphas,
			params,
			commitments,
			theta,
			poly_ids,
			combined_u,
			denominators,
			compression,
		) {
			debug!(x_index, "query verification failed");
			return Ok(false);
		}
	}

	Ok(true)
}

/// Replays one query through the per-round state machine.
#[allow(clippy::too_many_arguments)]
fn verify_query<F, H, C>(
	proof: &FriProof<F, H::Digest>,
	query_proof: &QueryProof<F, H::Digest>,
	x_index: usize,
	alphas: &[F],
	params: &FriParams<F>,
	commitments: &BTreeMap<BatchId, H::Digest>,
	theta: F,
	poly_ids: &[Vec<(BatchId, usize)>],
	combined_u: &[Polynomial<F>],
	denominators: &[Polynomial<F>],
	compression: &C,
) -> bool
where
	F: TwoAdicField,
	H: Hasher<F>,
	H::Digest: Clone + Eq + Send + Sync + AsRef<[u8]>,
	C: PseudoCompressionFunction<H::Digest, 2>,
{
	let num_groups = params.num_step_groups();
	if query_proof.round_proofs.len() != num_groups {
		return false;
	}

	let domain0 = &params.domains()[0];
	let fold0 = params.step_list()[0];
	let root0 = folded_index(x_index, domain0.size(), fold0);
	let (s_points, s_indices) = coset_siblings(x_index, fold0, domain0);
	let Some(order) = leaf_pair_order(x_index, domain0.size(), fold0, &s_indices) else {
		return false;
	};
	let coset_len = s_indices.len();

	// CheckInitial: every disclosed batch opening must hash back to the
	// externally supplied commitment.
	for (batch_id, initial) in &query_proof.initial_proofs {
		let Some(commitment) = commitments.get(batch_id) else {
			return false;
		};
		if initial.proof.root() != commitment || initial.proof.leaf_index() != root0 {
			return false;
		}
		let mut leaf = Vec::with_capacity(2 * coset_len * initial.values.len());
		for polynomial_values in &initial.values {
			if polynomial_values.len() != coset_len {
				return false;
			}
			for &[v0, v1] in polynomial_values {
				leaf.push(v0);
				leaf.push(v1);
			}
		}
		if !initial.proof.validate::<F, H, C>(compression, &leaf) {
			return false;
		}
	}

	// CombineQ: rebuild the combined-quotient evaluations at the coset from
	// the disclosed openings, reordered onto the recomputed sibling pairs.
	let mut combined = vec![[F::ZERO; 2]; coset_len];
	let mut theta_pow = F::ONE;
	for ((ids, u), denominator) in poly_ids.iter().zip(combined_u).zip(denominators) {
		let mut inner = vec![[F::ZERO; 2]; coset_len];
		for (batch_id, k) in ids {
			let Some(initial) = query_proof.initial_proofs.get(batch_id) else {
				return false;
			};
			let Some(polynomial_values) = initial.values.get(*k) else {
				return false;
			};
			for (m, &(slot, swapped)) in order.iter().enumerate() {
				let [v0, v1] = polynomial_values[slot];
				let pair = if swapped { [v1, v0] } else { [v0, v1] };
				for side in 0..2 {
					inner[m][side] += theta_pow * pair[side];
				}
			}
			theta_pow *= theta;
		}
		for (m, inner_pair) in inner.iter().enumerate() {
			for side in 0..2 {
				let point = s_points[m][side];
				let Some(inv) = denominator.evaluate(point).invert() else {
					return false;
				};
				combined[m][side] += (inner_pair[side] - u.evaluate(point)) * inv;
			}
		}
	}

	// CheckRound(0): the combined coset must reproduce the committed
	// combined-polynomial leaf.
	let round0 = &query_proof.round_proofs[0];
	if round0.proof.root() != &proof.fri_roots[0] || round0.proof.leaf_index() != root0 {
		return false;
	}
	let mut q_leaf = vec![F::ZERO; 2 * coset_len];
	for (&(slot, swapped), pair) in order.iter().zip(&combined) {
		let [v0, v1] = *pair;
		let (a, b) = if swapped { (v1, v0) } else { (v0, v1) };
		q_leaf[2 * slot] = a;
		q_leaf[2 * slot + 1] = b;
	}
	if !round0.proof.validate::<F, H, C>(compression, &q_leaf) {
		return false;
	}

	// Dense layout of the current group's coset.
	let stride0 = domain0.size() >> fold0;
	let Some((mut values, mut points)) =
		dense_coset(root0, stride0, &s_indices, &combined, &s_points)
	else {
		return false;
	};

	let mut t = 0;
	let mut x = x_index;
	for (i, &step) in params.step_list().iter().enumerate() {
		let domain = &params.domains()[t];
		x %= domain.size();

		// CheckRound(i): chain the group's sub-rounds by two-point Lagrange
		// interpolation at the round challenges.
		for &alpha in &alphas[t..t + step] {
			let half = values.len() / 2;
			for m in 0..half {
				let Some(folded) = interpolate_line(
					points[m],
					values[m],
					points[m + half],
					values[m + half],
					alpha,
				) else {
					return false;
				};
				values[m] = folded;
				points[m] = points[m].square();
			}
			values.truncate(half);
			points.truncate(half);
		}
		let folded_value = values[0];

		t += step;
		x %= params.domains()[t].size();

		let round = &query_proof.round_proofs[i];
		if i + 1 < num_groups {
			// Cross-round linkage: the disclosed next coset must contain the
			// interpolated fold at the query's own pair.
			let next_domain = &params.domains()[t];
			let next_step = params.step_list()[i + 1];
			let (next_pair_points, next_indices) = coset_siblings(x, next_step, next_domain);
			if round.y.len() != next_indices.len() {
				return false;
			}
			let Some(next_order) =
				leaf_pair_order(x, next_domain.size(), next_step, &next_indices)
			else {
				return false;
			};

			// the first recomputed pair is (x, paired(x)) by construction
			let (slot, swapped) = next_order[0];
			let [y0, y1] = round.y[slot];
			let linked = if swapped { y1 } else { y0 };
			if linked != folded_value {
				return false;
			}

			// the next opening must commit exactly the disclosed pairs
			let next_root = folded_index(x, next_domain.size(), next_step);
			let next_round = &query_proof.round_proofs[i + 1];
			if next_round.proof.root() != &proof.fri_roots[i + 1]
				|| next_round.proof.leaf_index() != next_root
			{
				return false;
			}
			let mut leaf = Vec::with_capacity(2 * round.y.len());
			for &[v0, v1] in &round.y {
				leaf.push(v0);
				leaf.push(v1);
			}
			if !next_round.proof.validate::<F, H, C>(compression, &leaf) {
				return false;
			}

			let ordered_values: Vec<[F; 2]> = next_order
				.iter()
				.map(|&(slot, swapped)| {
					let [v0, v1] = round.y[slot];
					if swapped {
						[v1, v0]
					} else {
						[v0, v1]
					}
				})
				.collect();
			let next_stride = next_domain.size() >> next_step;
			let Some((next_values, next_points)) = dense_coset(
				next_root,
				next_stride,
				&next_indices,
				&ordered_values,
				&next_pair_points,
			) else {
				return false;
			};
			values = next_values;
			points = next_points;
		} else {
			// CheckFinal: the chain must terminate exactly on the disclosed
			// final polynomial, evaluated at the fully squared query point.
			if round.y.len() != 1 {
				return false;
			}
			let final_domain = &params.domains()[params.r()];
			let endpoint = final_domain.element(x);
			let [y0, y1] = round.y[0];
			if y0 != folded_value {
				return false;
			}
			if proof.final_polynomial.evaluate(endpoint) != y0 {
				return false;
			}
			if proof.final_polynomial.evaluate(-endpoint) != y1 {
				return false;
			}
		}
	}

	true
}
