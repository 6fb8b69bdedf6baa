// Copyright 2025 Redshift Labs

//! Implementation of the Fast Reed–Solomon IOPP (FRI) over prime fields.
//!
//! FRI is an IOP of Proximity for Reed–Solomon codes, introduced in [BBHR17].
//! The polynomial under test is committed in evaluation form over a two-adic
//! multiplicative subgroup; in each round the prover receives a challenge and
//! folds the polynomial in half through its even/odd split, committing to the
//! folded evaluations with a Merkle tree. Commitments follow a caller-supplied
//! step schedule: several fold rounds may share one Merkle commitment, with
//! each leaf packing the whole coset a query needs to replay the folds of the
//! round group. The last polynomial is sent to the verifier in the clear, in
//! coefficient form.
//!
//! The verifier replays the transcript, spot-checks the folding at
//! pseudo-random query positions by two-point Lagrange interpolation, and
//! compares the fully-folded chain against the disclosed final polynomial.
//!
//! [BBHR17]: <https://eccc.weizmann.ac.il/report/2017/134/>

mod common;
mod coset;
mod error;
pub mod grinding;
mod prove;
#[cfg(test)]
mod tests;
mod verify;

pub use common::{
	check_step_list, generate_random_step_list, BatchId, FriParams, FriProof, InitialProof,
	PolynomialValues, QueryProof, RoundProof,
};
pub use coset::{coset_pair_indices, coset_siblings, folded_index, leaf_pair_order, paired_index};
pub use error::Error;
pub use prove::{
	combine_polynomials, commit_phase, precommit, proof_eval, CommitPhaseOutput,
};
pub use verify::verify_eval;
