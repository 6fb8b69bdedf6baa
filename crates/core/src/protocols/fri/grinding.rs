// Copyright 2025 Redshift Labs

//! Proof-of-work grinding over the transcript.
//!
//! Grinding makes a prover pay a delay between the commit and query phases,
//! raising the cost of adaptively re-rolling query positions. The nonce is
//! committed to the transcript on both sides, so the query challenges that
//! follow are bound to it.

use digest::{Digest, FixedOutputReset};

use crate::transcript::HasherTranscript;

/// Finds the least nonce whose transcript fork samples `bits` zero bits, then
/// commits that nonce to the live transcript.
pub fn generate<H>(transcript: &mut HasherTranscript<H>, bits: usize) -> u64
where
	H: Digest + FixedOutputReset + Clone,
{
	let mut nonce = 0u64;
	loop {
		let mut fork = transcript.clone();
		fork.observe_bytes(&nonce.to_le_bytes());
		if fork.sample_bits(bits) == 0 {
			transcript.observe_bytes(&nonce.to_le_bytes());
			return nonce;
		}
		nonce += 1;
	}
}

/// Replays the grinding check for a claimed nonce.
///
/// The nonce is committed to the live transcript whether or not the check
/// passes, keeping prover and verifier transcripts aligned; the caller must
/// still fail closed on `false`.
pub fn verify<H>(transcript: &mut HasherTranscript<H>, nonce: u64, bits: usize) -> bool
where
	H: Digest + FixedOutputReset + Clone,
{
	let mut fork = transcript.clone();
	fork.observe_bytes(&nonce.to_le_bytes());
	let ok = fork.sample_bits(bits) == 0;
	transcript.observe_bytes(&nonce.to_le_bytes());
	ok
}

#[cfg(test)]
mod tests {
	use groestl_crypto::Groestl256;
	use redshift_field::BabyBear;

	use super::*;

	#[test]
	fn test_generate_verify_round_trip() {
		let mut prover = HasherTranscript::<Groestl256>::new();
		let mut verifier = HasherTranscript::<Groestl256>::new();
		prover.observe_bytes(b"commitments");
		verifier.observe_bytes(b"commitments");

		let nonce = generate(&mut prover, 10);
		assert!(verify(&mut verifier, nonce, 10));

		// both transcripts end in the same state
		assert_eq!(
			prover.sample_field::<BabyBear>(),
			verifier.sample_field::<BabyBear>()
		);
	}

	#[test]
	fn test_wrong_nonce_is_rejected() {
		let template = {
			let mut transcript = HasherTranscript::<Groestl256>::new();
			transcript.observe_bytes(b"state");
			transcript
		};

		// pick a nonce that provably fails the puzzle
		let bad_nonce = (0u64..)
			.find(|nonce| {
				let mut fork = template.clone();
				fork.observe_bytes(&nonce.to_le_bytes());
				fork.sample_bits(10) != 0
			})
			.expect("a failing nonce exists");

		let mut verifier = template.clone();
		assert!(!verify(&mut verifier, bad_nonce, 10));
	}

	#[test]
	fn test_zero_difficulty_is_trivial() {
		let mut transcript = HasherTranscript::<Groestl256>::new();
		assert_eq!(generate(&mut transcript, 0), 0);
	}
}
