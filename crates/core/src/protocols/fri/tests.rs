// Copyright 2025 Redshift Labs

use std::collections::BTreeMap;

use groestl_crypto::Groestl256;
use rand::{rngs::StdRng, SeedableRng};
use redshift_field::{BabyBear, Field};
use redshift_hash::{GroestlDigest, GroestlDigestCompression, GroestlHasher};

use super::*;
use crate::{
	domain::make_domains,
	merkle_tree::MerkleTree,
	polynomial::{Polynomial, PolynomialDfs},
	transcript::HasherTranscript,
};

type F = BabyBear;
type H = GroestlHasher<F>;
type TH = Groestl256;

struct TestInstance {
	params: FriParams<F>,
	g: BTreeMap<BatchId, Vec<PolynomialDfs<F>>>,
	precommitments: BTreeMap<BatchId, MerkleTree<GroestlDigest>>,
	commitments: BTreeMap<BatchId, GroestlDigest>,
	poly_ids: Vec<Vec<(BatchId, usize)>>,
	compression: GroestlDigestCompression,
}

/// Opening points per evaluation group: low powers of the full multiplicative
/// generator, which cannot land inside a small two-adic subgroup.
const OPENING_POINTS: [u32; 2] = [31, 961];

fn setup(lambda: usize, use_grinding: bool, step_list: Vec<usize>, seed: u64) -> TestInstance {
	let max_degree = 15;
	let expand_factor = 4;
	let r: usize = step_list.iter().sum();
	let max_log_size = 6;
	let domains = make_domains::<F>(max_log_size, r).unwrap();
	let params = FriParams::new(
		lambda,
		use_grinding,
		8,
		max_degree,
		domains,
		r,
		step_list,
		expand_factor,
	)
	.unwrap();

	let mut rng = StdRng::seed_from_u64(seed);
	let mut random_polynomial = |num_coeffs: usize, domain_size: usize| {
		let coeffs: Vec<F> = (0..num_coeffs).map(|_| F::random(&mut rng)).collect();
		PolynomialDfs::from_coefficients(&Polynomial::new(coeffs), domain_size).unwrap()
	};

	let domain_size = params.domains()[0].size();
	let mut g = BTreeMap::new();
	g.insert(
		"witness".to_string(),
		vec![
			random_polynomial(max_degree + 1, domain_size),
			// stored on its natural grid to exercise the coefficient path
			random_polynomial(max_degree + 1, max_degree + 1),
		],
	);
	g.insert(
		"quotient".to_string(),
		vec![random_polynomial(max_degree + 1, domain_size)],
	);

	let compression = GroestlDigestCompression;
	let fold0 = params.step_list()[0];
	let precommitments: BTreeMap<BatchId, MerkleTree<GroestlDigest>> = g
		.iter()
		.map(|(batch_id, batch)| {
			let tree =
				precommit::<F, H, _>(batch, &params.domains()[0], fold0, &compression).unwrap();
			(batch_id.clone(), tree)
		})
		.collect();
	let commitments = precommitments
		.iter()
		.map(|(batch_id, tree)| (batch_id.clone(), tree.root()))
		.collect();

	let poly_ids = vec![
		vec![("witness".to_string(), 0), ("witness".to_string(), 1)],
		vec![("quotient".to_string(), 0)],
	];

	TestInstance {
		params,
		g,
		precommitments,
		commitments,
		poly_ids,
		compression,
	}
}

/// True openings of the committed polynomials, θ-combined per group in the
/// same running order the combiner uses.
fn claims(instance: &TestInstance, theta: F) -> (Vec<Polynomial<F>>, Vec<Polynomial<F>>) {
	let mut combined_u = Vec::new();
	let mut denominators = Vec::new();
	let mut theta_pow = F::ONE;
	for (group, ids) in instance.poly_ids.iter().enumerate() {
		let z = F::new(OPENING_POINTS[group]);
		let mut u = F::ZERO;
		for (batch_id, k) in ids {
			u += theta_pow * instance.g[batch_id][*k].to_polynomial().evaluate(z);
			theta_pow *= theta;
		}
		combined_u.push(Polynomial::new(vec![u]));
		denominators.push(Polynomial::new(vec![-z, F::ONE]));
	}
	(combined_u, denominators)
}

fn transcript_with_commitments(instance: &TestInstance) -> HasherTranscript<TH> {
	let mut transcript = HasherTranscript::<TH>::new();
	for root in instance.commitments.values() {
		transcript.observe_bytes(root.as_ref());
	}
	transcript
}

fn prove(instance: &TestInstance) -> FriProof<F, GroestlDigest> {
	let mut transcript = transcript_with_commitments(instance);
	let theta: F = transcript.sample_field();
	let (combined_u, denominators) = claims(instance, theta);

	let combined_q = combine_polynomials(
		&instance.g,
		theta,
		&instance.poly_ids,
		&combined_u,
		&denominators,
		&instance.params.domains()[0],
	)
	.unwrap();
	assert!(combined_q.degree() <= instance.params.max_degree());

	let q_precommitment = precommit::<F, H, _>(
		std::slice::from_ref(&combined_q),
		&instance.params.domains()[0],
		instance.params.step_list()[0],
		&instance.compression,
	)
	.unwrap();

	proof_eval::<F, H, _, TH>(
		&instance.g,
		&instance.precommitments,
		combined_q,
		q_precommitment,
		&instance.params,
		&instance.compression,
		&mut transcript,
	)
	.unwrap()
}

fn verify(instance: &TestInstance, proof: &FriProof<F, GroestlDigest>) -> bool {
	let mut transcript = transcript_with_commitments(instance);
	let theta: F = transcript.sample_field();
	let (combined_u, denominators) = claims(instance, theta);

	verify_eval::<F, H, _, TH>(
		proof,
		&instance.params,
		&instance.commitments,
		theta,
		&instance.poly_ids,
		&combined_u,
		&denominators,
		&instance.compression,
		&mut transcript,
	)
	.unwrap()
}

#[test]
fn test_commit_verify_completeness() {
	let instance = setup(2, false, vec![2, 1], 7);
	let proof = prove(&instance);
	assert!(verify(&instance, &proof));
}

#[test]
fn test_commit_verify_single_fold_groups() {
	let instance = setup(2, false, vec![1, 1, 1], 11);
	let proof = prove(&instance);
	assert!(verify(&instance, &proof));
}

#[test]
fn test_commit_verify_wide_first_group() {
	let instance = setup(1, false, vec![3, 1], 13);
	let proof = prove(&instance);
	assert!(verify(&instance, &proof));
}

#[test]
fn test_commit_verify_with_grinding() {
	let instance = setup(1, true, vec![2, 1], 17);
	let proof = prove(&instance);
	assert!(verify(&instance, &proof));
}

#[test]
fn test_proof_shape() {
	let instance = setup(2, false, vec![2, 1], 19);
	let proof = prove(&instance);

	assert_eq!(proof.fri_roots.len(), instance.params.num_step_groups());
	assert_eq!(proof.query_proofs.len(), instance.params.lambda());
	for query_proof in &proof.query_proofs {
		assert_eq!(
			query_proof.round_proofs.len(),
			instance.params.num_step_groups()
		);
		assert_eq!(query_proof.initial_proofs.len(), instance.g.len());
		// the last round group discloses the two endpoint evaluations
		assert_eq!(query_proof.round_proofs.last().unwrap().y.len(), 1);
	}
	assert!(proof.final_polynomial.degree() <= instance.params.folded_degree_bound());
}

#[test]
fn test_mutated_initial_value_is_rejected() {
	let instance = setup(2, false, vec![2, 1], 23);
	let mut proof = prove(&instance);

	let initial = proof.query_proofs[0]
		.initial_proofs
		.get_mut("witness")
		.unwrap();
	initial.values[0][0][0] += F::ONE;

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_mutated_round_value_is_rejected() {
	let instance = setup(2, false, vec![2, 1], 29);
	let mut proof = prove(&instance);

	proof.query_proofs[0].round_proofs[0].y[0][0] += F::ONE;

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_mutated_final_round_value_is_rejected() {
	let instance = setup(1, false, vec![2, 1], 31);
	let mut proof = prove(&instance);

	let last = proof.query_proofs[0].round_proofs.last_mut().unwrap();
	last.y[0][1] += F::ONE;

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_mutated_final_polynomial_is_rejected() {
	let instance = setup(2, false, vec![2, 1], 37);
	let mut proof = prove(&instance);

	let mut coeffs = proof.final_polynomial.coefficients().to_vec();
	coeffs[0] += F::ONE;
	proof.final_polynomial = Polynomial::new(coeffs);

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_final_polynomial_degree_bound_is_enforced() {
	let instance = setup(2, false, vec![2, 1], 41);
	let mut proof = prove(&instance);

	// one above the allowed bound, regardless of any other proof content
	let bound = instance.params.folded_degree_bound();
	proof.final_polynomial = Polynomial::new(vec![F::ONE; bound + 2]);

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_tampered_fri_root_is_rejected() {
	let instance = setup(2, false, vec![2, 1], 43);
	let mut proof = prove(&instance);

	proof.fri_roots[0] = proof.fri_roots[1].clone();

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_truncated_query_proofs_are_rejected() {
	let instance = setup(2, false, vec![2, 1], 47);
	let mut proof = prove(&instance);

	proof.query_proofs.pop();

	assert!(!verify(&instance, &proof));
}

#[test]
fn test_proof_rejected_under_different_claims() {
	// a proof for one set of openings must not verify against another
	let instance = setup(2, false, vec![2, 1], 53);
	let proof = prove(&instance);

	let mut transcript = transcript_with_commitments(&instance);
	let theta: F = transcript.sample_field();
	let (mut combined_u, denominators) = claims(&instance, theta);
	combined_u[0] = Polynomial::new(vec![
		combined_u[0].coefficients()[0] + F::ONE,
	]);

	let accepted = verify_eval::<F, H, _, TH>(
		&proof,
		&instance.params,
		&instance.commitments,
		theta,
		&instance.poly_ids,
		&combined_u,
		&denominators,
		&instance.compression,
		&mut transcript,
	)
	.unwrap();
	assert!(!accepted);
}
