// Copyright 2025 Redshift Labs

use std::collections::BTreeMap;

use digest::{Digest, FixedOutputReset};
use redshift_field::TwoAdicField;
use redshift_hash::{Hasher, PseudoCompressionFunction};
use redshift_utils::bail;
use tracing::instrument;

use super::{
	common::{BatchId, FriParams, FriProof, InitialProof, QueryProof, RoundProof},
	coset::{coset_pair_indices, folded_index},
	error::Error,
	grinding,
};
use crate::{
	domain::EvaluationDomain,
	merkle_tree::{MerkleProof, MerkleTree},
	polynomial::{FriFold, Polynomial, PolynomialDfs},
	transcript::HasherTranscript,
};

/// Prover-side history of the commit phase.
#[derive(Debug)]
pub struct CommitPhaseOutput<F, D> {
	/// The polynomial at the start of each round group.
	pub fs: Vec<PolynomialDfs<F>>,
	/// The Merkle tree committing to each group's polynomial.
	pub fri_trees: Vec<MerkleTree<D>>,
	/// The roots pushed into the transcript, one per group.
	pub fri_roots: Vec<D>,
	/// The fully folded polynomial, in coefficient form.
	pub final_polynomial: Polynomial<F>,
}

/// Packs the coset evaluations of a polynomial batch into Merkle leaves over
/// `domain` and builds the tree.
///
/// Polynomials that do not live on `domain` are first re-evaluated onto it
/// through their coefficient form, which cannot change the represented
/// polynomial. Each of the `|domain| / 2^fold_count` leaves serializes, for
/// every polynomial in the batch, the sibling pairs of one coset in their
/// recursion order.
pub fn precommit<F, H, C>(
	batch: &[PolynomialDfs<F>],
	domain: &EvaluationDomain<F>,
	fold_count: usize,
	compression: &C,
) -> Result<MerkleTree<H::Digest>, Error>
where
	F: TwoAdicField,
	H: Hasher<F>,
	H::Digest: Clone + Eq + Send + Sync,
	C: PseudoCompressionFunction<H::Digest, 2> + Sync,
{
	let resized = batch
		.iter()
		.map(|polynomial| {
			if polynomial.len() == domain.size() {
				Ok(polynomial.clone())
			} else {
				polynomial.resize(domain.size()).map_err(Error::from)
			}
		})
		.collect::<Result<Vec<_>, _>>()?;

	let leaves_number = domain.size() >> fold_count;
	let leaves: Vec<Vec<F>> = (0..leaves_number)
		.map(|leaf_index| {
			let pairs = coset_pair_indices(leaf_index, domain.size(), fold_count);
			let mut leaf = Vec::with_capacity(resized.len() << fold_count);
			for polynomial in &resized {
				for &[i0, i1] in &pairs {
					leaf.push(polynomial.values()[i0]);
					leaf.push(polynomial.values()[i1]);
				}
			}
			leaf
		})
		.collect();

	Ok(MerkleTree::build::<F, H, C, _>(compression, &leaves)?)
}

/// Runs the fold-and-commit loop over the step schedule.
///
/// For each round group the current tree root is absorbed into the transcript
/// before the group's fold challenges are drawn; the polynomial is then folded
/// once per sub-round, advancing one domain at a time, and re-committed onto
/// the next group's domain unless the group is the last. Exactly `r`
/// challenges are drawn and one root per group is emitted. The fully folded
/// polynomial is returned in coefficient form.
#[instrument(skip_all, name = "fri::commit_phase")]
pub fn commit_phase<F, H, C, TH>(
	combined_q: PolynomialDfs<F>,
	precommitment: MerkleTree<H::Digest>,
	params: &FriParams<F>,
	compression: &C,
	transcript: &mut HasherTranscript<TH>,
) -> Result<CommitPhaseOutput<F, H::Digest>, Error>
where
	F: TwoAdicField,
	H: Hasher<F>,
	H::Digest: Clone + Eq + Send + Sync + AsRef<[u8]>,
	C: PseudoCompressionFunction<H::Digest, 2> + Sync,
	TH: Digest + FixedOutputReset,
{
	let domains = params.domains();
	if combined_q.len() != domains[0].size() {
		bail!(Error::PolynomialDomainMismatch {
			polynomial_size: combined_q.len(),
			domain_size: domains[0].size(),
		});
	}

	let num_groups = params.num_step_groups();
	let mut fs = Vec::with_capacity(num_groups);
	let mut fri_trees = Vec::with_capacity(num_groups);
	let mut fri_roots = Vec::with_capacity(num_groups);

	let mut f = combined_q;
	let mut tree = Some(precommitment);
	let mut t = 0;
	for (i, &step) in params.step_list().iter().enumerate() {
		let current_tree = tree.take().expect("re-committed on every non-final group");
		let root = current_tree.root();
		transcript.observe_bytes(root.as_ref());
		fri_roots.push(root);
		fs.push(f.clone());
		fri_trees.push(current_tree);

		for _ in 0..step {
			let alpha = transcript.sample_field::<F>();
			f = f.fold(alpha, &domains[t + 1]);
			t += 1;
		}

		if i + 1 < num_groups {
			tree = Some(precommit::<F, H, C>(
				std::slice::from_ref(&f),
				&domains[t],
				params.step_list()[i + 1],
				compression,
			)?);
		}
	}
	debug_assert_eq!(t, params.r());

	let final_polynomial = f.to_polynomial();
	Ok(CommitPhaseOutput {
		fs,
		fri_trees,
		fri_roots,
		final_polynomial,
	})
}

/// Derives a query position from a transcript challenge: the unique domain
/// index whose element equals `challenge^((p - 1) / |D0|)`, found by exact
/// linear scan over the domain.
pub(super) fn derive_query_index<F, TH>(
	domain: &EvaluationDomain<F>,
	transcript: &mut HasherTranscript<TH>,
) -> Result<usize, Error>
where
	F: TwoAdicField,
	TH: Digest + FixedOutputReset,
{
	let challenge = transcript.sample_field::<F>();
	let exponent = (F::CHARACTERISTIC - 1) / domain.size() as u64;
	let eta = challenge.pow(exponent);
	domain.find_index(eta).ok_or(Error::QueryIndexNotFound)
}

/// Opens every original committed batch at the query's zeroth-round coset.
fn build_initial_proof<F, H>(
	g: &BTreeMap<BatchId, Vec<PolynomialDfs<F>>>,
	coefficient_cache: &BTreeMap<BatchId, Vec<Option<Polynomial<F>>>>,
	precommitments: &BTreeMap<BatchId, MerkleTree<H::Digest>>,
	x_index: usize,
	params: &FriParams<F>,
) -> Result<BTreeMap<BatchId, InitialProof<F, H::Digest>>, Error>
where
	F: TwoAdicField,
	H: Hasher<F>,
	H::Digest: Clone + Eq + Send + Sync,
{
	let domain = &params.domains()[0];
	let fold_count = params.step_list()[0];
	let leaf_index = folded_index(x_index, domain.size(), fold_count);
	let pairs = coset_pair_indices(leaf_index, domain.size(), fold_count);

	g.iter()
		.map(|(batch_id, polynomials)| {
			let tree = precommitments.get(batch_id).ok_or_else(|| {
				Error::InvalidArgs(format!("no precommitment for batch {batch_id}"))
			})?;

			let values = polynomials
				.iter()
				.zip(&coefficient_cache[batch_id])
				.map(|(polynomial, coefficients)| match coefficients {
					// stored on D[0]: read the committed evaluations directly
					None => pairs
						.iter()
						.map(|&[i0, i1]| [polynomial.values()[i0], polynomial.values()[i1]])
						.collect(),
					// stored on another grid: evaluate through the coefficient
					// form instead of resizing the whole batch per query
					Some(coefficients) => pairs
						.iter()
						.map(|&[i0, i1]| {
							[
								coefficients.evaluate(domain.element(i0)),
								coefficients.evaluate(domain.element(i1)),
							]
						})
						.collect(),
				})
				.collect();

			let proof = MerkleProof::new(tree, leaf_index)?;
			Ok((batch_id.clone(), InitialProof { values, proof }))
		})
		.collect()
}

/// Walks the step schedule emitting, per round group, the Merkle opening of
/// the group's tree at the folded index plus the disclosed values of the
/// next round: the following group's coset pairs, or the `±x` endpoint
/// evaluations of the final polynomial for the last group.
fn build_round_proofs<F, D>(
	fs: &[PolynomialDfs<F>],
	fri_trees: &[MerkleTree<D>],
	final_polynomial: &Polynomial<F>,
	x_index: usize,
	params: &FriParams<F>,
) -> Result<Vec<RoundProof<F, D>>, Error>
where
	F: TwoAdicField,
	D: Clone + Eq + Send + Sync,
{
	let num_groups = params.num_step_groups();
	let mut round_proofs = Vec::with_capacity(num_groups);
	let mut t = 0;
	let mut x = x_index;
	for (i, &step) in params.step_list().iter().enumerate() {
		let domain = &params.domains()[t];
		x %= domain.size();
		let leaf_index = folded_index(x, domain.size(), step);
		let proof = MerkleProof::new(&fri_trees[i], leaf_index)?;

		t += step;
		x %= params.domains()[t].size();

		let y = if i + 1 < num_groups {
			let next_domain = &params.domains()[t];
			let next_step = params.step_list()[i + 1];
			let next_leaf = folded_index(x, next_domain.size(), next_step);
			coset_pair_indices(next_leaf, next_domain.size(), next_step)
				.into_iter()
				.map(|[i0, i1]| [fs[i + 1].values()[i0], fs[i + 1].values()[i1]])
				.collect()
		} else {
			let final_domain = &params.domains()[params.r()];
			let endpoint = final_domain.element(x);
			vec![[
				final_polynomial.evaluate(endpoint),
				final_polynomial.evaluate(-endpoint),
			]]
		};
		round_proofs.push(RoundProof { y, proof });
	}
	Ok(round_proofs)
}

/// Batches the committed polynomials into the single combined polynomial the
/// proximity proof runs on.
///
/// Evaluation groups follow `poly_ids`; with a running θ-power across all
/// polynomials, each group contributes
/// `(Σ_j θ^c_j · g_j - combined_u[p]) / denominators[p]` pointwise over
/// `domain`. The claimed openings must be true for the division to be exact,
/// which is what verification ultimately spot-checks.
pub fn combine_polynomials<F: TwoAdicField>(
	g: &BTreeMap<BatchId, Vec<PolynomialDfs<F>>>,
	theta: F,
	poly_ids: &[Vec<(BatchId, usize)>],
	combined_u: &[Polynomial<F>],
	denominators: &[Polynomial<F>],
	domain: &EvaluationDomain<F>,
) -> Result<PolynomialDfs<F>, Error> {
	if poly_ids.len() != combined_u.len() || poly_ids.len() != denominators.len() {
		bail!(Error::InvalidArgs(
			"poly_ids, combined_u and denominators must have one entry per evaluation group"
				.to_string()
		));
	}

	let mut q_values = vec![F::ZERO; domain.size()];
	let mut theta_pow = F::ONE;
	for ((ids, u), denominator) in poly_ids.iter().zip(combined_u).zip(denominators) {
		let mut inner = vec![F::ZERO; domain.size()];
		for (batch_id, k) in ids {
			let polynomial = g
				.get(batch_id)
				.and_then(|batch| batch.get(*k))
				.ok_or_else(|| {
					Error::InvalidArgs(format!("unknown polynomial {batch_id}[{k}]"))
				})?;
			let on_domain = if polynomial.len() == domain.size() {
				polynomial.clone()
			} else {
				polynomial.resize(domain.size())?
			};
			for (value, acc) in on_domain.values().iter().zip(&mut inner) {
				*acc += theta_pow * *value;
			}
			theta_pow *= theta;
		}

		let mut x = F::ONE;
		for (acc, q) in inner.into_iter().zip(&mut q_values) {
			let inv = denominator
				.evaluate(x)
				.invert()
				.ok_or(Error::DenominatorVanishesOnDomain)?;
			*q += (acc - u.evaluate(x)) * inv;
			x *= domain.generator();
		}
	}

	Ok(PolynomialDfs::from_values(q_values)?)
}

/// Produces a complete proximity proof: commit phase, optional grinding, then
/// `lambda` query proofs against positions drawn from the transcript.
#[instrument(skip_all, name = "fri::proof_eval")]
pub fn proof_eval<F, H, C, TH>(
	g: &BTreeMap<BatchId, Vec<PolynomialDfs<F>>>,
	precommitments: &BTreeMap<BatchId, MerkleTree<H::Digest>>,
	combined_q: PolynomialDfs<F>,
	combined_q_precommitment: MerkleTree<H::Digest>,
	params: &FriParams<F>,
	compression: &C,
	transcript: &mut HasherTranscript<TH>,
) -> Result<FriProof<F, H::Digest>, Error>
where
	F: TwoAdicField,
	H: Hasher<F>,
	H::Digest: Clone + Eq + Send + Sync + AsRef<[u8]>,
	C: PseudoCompressionFunction<H::Digest, 2> + Sync,
	TH: Digest + FixedOutputReset + Clone,
{
	let commit = commit_phase::<F, H, C, TH>(
		combined_q,
		combined_q_precommitment,
		params,
		compression,
		transcript,
	)?;

	let proof_of_work = if params.use_grinding() {
		grinding::generate(transcript, params.grinding_bits())
	} else {
		0
	};

	let domain_size = params.domains()[0].size();
	let coefficient_cache: BTreeMap<BatchId, Vec<Option<Polynomial<F>>>> = g
		.iter()
		.map(|(batch_id, polynomials)| {
			let cache = polynomials
				.iter()
				.map(|polynomial| {
					(polynomial.len() != domain_size).then(|| polynomial.to_polynomial())
				})
				.collect();
			(batch_id.clone(), cache)
		})
		.collect();

	let query_proofs = (0..params.lambda())
		.map(|_| {
			let x_index = derive_query_index(&params.domains()[0], transcript)?;
			let initial_proofs = build_initial_proof::<F, H>(
				g,
				&coefficient_cache,
				precommitments,
				x_index,
				params,
			)?;
			let round_proofs = build_round_proofs(
				&commit.fs,
				&commit.fri_trees,
				&commit.final_polynomial,
				x_index,
				params,
			)?;
			Ok(QueryProof {
				initial_proofs,
				round_proofs,
			})
		})
		.collect::<Result<Vec<_>, Error>>()?;

	Ok(FriProof {
		fri_roots: commit.fri_roots,
		final_polynomial: commit.final_polynomial,
		query_proofs,
		proof_of_work,
	})
}
