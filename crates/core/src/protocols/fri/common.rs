// Copyright 2025 Redshift Labs

use std::{collections::BTreeMap, sync::Arc};

use getset::{CopyGetters, Getters};
use rand::Rng;
use redshift_field::TwoAdicField;
use redshift_utils::{bail, checked_arithmetics::checked_log_2};

use super::error::Error;
use crate::{
	domain::EvaluationDomain,
	merkle_tree::MerkleProof,
	polynomial::Polynomial,
};

/// Identifier of one committed polynomial batch, e.g. "permutation" or
/// "quotient". Batches live in `BTreeMap`s so prover and verifier always walk
/// them in the same order.
pub type BatchId = String;

/// Sibling-pair values of one polynomial over a coset, in leaf order.
pub type PolynomialValues<F> = Vec<[F; 2]>;

/// The largest step list entry the protocol supports; a round group of `s`
/// folds discloses cosets of size `2^s` per query.
const MAX_STEP: usize = 10;

/// Parameters of one proximity-proof session.
///
/// Constructed once per session through [`FriParams::new`] and immutable
/// afterwards; the domain chain is shared read-only with the verifier.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct FriParams<F: TwoAdicField> {
	/// Number of spot-check queries.
	#[getset(get_copy = "pub")]
	lambda: usize,
	#[getset(get_copy = "pub")]
	use_grinding: bool,
	#[getset(get_copy = "pub")]
	grinding_bits: usize,
	/// Degree bound of the committed polynomial.
	#[getset(get_copy = "pub")]
	max_degree: usize,
	/// The halving chain of evaluation domains, `r + 1` of them.
	#[getset(get = "pub")]
	domains: Vec<Arc<EvaluationDomain<F>>>,
	/// Total number of fold rounds.
	#[getset(get_copy = "pub")]
	r: usize,
	/// Fold counts per Merkle commitment; sums to `r`, ends with 1.
	#[getset(get = "pub")]
	step_list: Vec<usize>,
	/// Ratio between the initial domain size and `max_degree + 1`.
	#[getset(get_copy = "pub")]
	expand_factor: usize,
}

impl<F: TwoAdicField> FriParams<F> {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		lambda: usize,
		use_grinding: bool,
		grinding_bits: usize,
		max_degree: usize,
		domains: Vec<Arc<EvaluationDomain<F>>>,
		r: usize,
		step_list: Vec<usize>,
		expand_factor: usize,
	) -> Result<Self, Error> {
		check_step_list(&step_list, r)?;

		if lambda == 0 {
			bail!(Error::InvalidArgs("at least one query is required".to_string()));
		}
		if !(max_degree + 1).is_power_of_two() {
			bail!(Error::InvalidArgs(format!(
				"max_degree + 1 must be a power of two, got {}",
				max_degree + 1
			)));
		}
		let log_degree = checked_log_2(max_degree + 1);
		if r > log_degree {
			bail!(Error::InvalidArgs(format!(
				"{r} fold rounds exceed the log degree bound {log_degree}"
			)));
		}
		if domains.len() != r + 1 {
			bail!(Error::DomainCountMismatch {
				expected: r + 1,
				actual: domains.len(),
			});
		}
		for (index, window) in domains.windows(2).enumerate() {
			if window[0].size() != 2 * window[1].size() {
				bail!(Error::DomainChainBroken { index });
			}
		}
		if domains[0].size() != (max_degree + 1) * expand_factor {
			bail!(Error::InvalidArgs(format!(
				"initial domain of size {} does not match degree {} at expansion {}",
				domains[0].size(),
				max_degree,
				expand_factor
			)));
		}

		Ok(Self {
			lambda,
			use_grinding,
			grinding_bits,
			max_degree,
			domains,
			r,
			step_list,
			expand_factor,
		})
	}

	/// Number of Merkle commitments sent during the fold rounds.
	pub fn num_step_groups(&self) -> usize {
		self.step_list.len()
	}

	/// Largest degree the disclosed final polynomial may have.
	pub fn folded_degree_bound(&self) -> usize {
		let log_degree = checked_log_2(self.max_degree + 1);
		(1usize << (log_degree + 1 - self.r)) - 1
	}
}

/// Validates a fold schedule: non-empty, entries in `1..=10`, summing to `r`,
/// with a final single-fold group.
///
/// This is a precondition of every prover and verifier entry point and is
/// checked before any transcript interaction.
pub fn check_step_list(step_list: &[usize], r: usize) -> Result<(), Error> {
	if step_list.is_empty() {
		bail!(Error::StepListEmpty);
	}
	for (index, &step) in step_list.iter().enumerate() {
		if step == 0 || step > MAX_STEP {
			bail!(Error::StepListEntryOutOfRange { index });
		}
	}
	let total: usize = step_list.iter().sum();
	if total != r {
		bail!(Error::StepListSumMismatch {
			expected: r,
			actual: total,
		});
	}
	if *step_list.last().expect("list is non-empty") != 1 {
		bail!(Error::StepListLastEntryNotOne);
	}
	Ok(())
}

/// Draws a random fold schedule for `r` rounds from a caller-supplied RNG.
///
/// The RNG is injected so that proof generation stays reproducible in tests.
pub fn generate_random_step_list(r: usize, rng: &mut impl Rng) -> Vec<usize> {
	assert!(r > 0, "at least one fold round is required");

	let mut step_list = Vec::new();
	let mut remaining = r - 1;
	while remaining > 0 {
		let step = rng.gen_range(1..=remaining.min(MAX_STEP));
		step_list.push(step);
		remaining -= step;
	}
	step_list.push(1);
	step_list
}

/// Per-query openings of one original committed batch: the coset values of
/// every polynomial in the batch plus the Merkle opening against the batch's
/// commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialProof<F, D> {
	pub values: Vec<PolynomialValues<F>>,
	pub proof: MerkleProof<D>,
}

/// One round group's part of a query proof.
///
/// `proof` opens this group's committed tree at the query's coset; `y`
/// discloses the sibling pairs the verifier needs at the *next* round: the
/// following group's coset values, or for the last group the two endpoint
/// evaluations of the final polynomial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundProof<F, D> {
	pub y: PolynomialValues<F>,
	pub proof: MerkleProof<D>,
}

/// Everything disclosed for a single spot-check query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryProof<F, D> {
	pub initial_proofs: BTreeMap<BatchId, InitialProof<F, D>>,
	pub round_proofs: Vec<RoundProof<F, D>>,
}

/// A complete proximity proof, consumed wholesale by verification.
///
/// The proof is structurally self-contained; the verifier supplies matching
/// [`FriParams`] independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriProof<F, D> {
	pub fri_roots: Vec<D>,
	pub final_polynomial: Polynomial<F>,
	pub query_proofs: Vec<QueryProof<F, D>>,
	pub proof_of_work: u64,
}
