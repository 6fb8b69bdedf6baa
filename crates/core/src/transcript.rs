// Copyright 2025 Redshift Labs

//! Fiat–Shamir transcript: a deterministic challenge generator seeded by
//! every protocol message absorbed so far.
//!
//! Prover and verifier must interleave observe and sample calls in exactly
//! the same order; in particular every round root is observed before the
//! round's folding challenges are drawn. Reordering the sequence changes the
//! binding of the challenges and is a soundness bug, not a performance one.

use digest::{Digest, FixedOutputReset, Output};
use redshift_field::Field;

/// Transcript over any hash that implements the [`Digest`] trait.
///
/// Works over bytes: sampled output is the running digest, refilled with a
/// feed-forward of the previous digest whenever the buffer is exhausted or
/// new data has been observed.
#[derive(Debug, Clone)]
pub struct HasherTranscript<H: Digest> {
	index: usize,
	buffer: Output<H>,
	hasher: H,
}

impl<H> Default for HasherTranscript<H>
where
	H: Digest,
{
	fn default() -> Self {
		Self {
			hasher: H::new(),
			index: <H as Digest>::output_size(),
			buffer: Output::<H>::default(),
		}
	}
}

impl<H> HasherTranscript<H>
where
	H: Digest + FixedOutputReset,
{
	pub fn new() -> Self {
		Self::default()
	}

	fn fill_buffer(&mut self) {
		let digest = self.hasher.finalize_reset();

		// feed forward to the empty state
		Digest::update(&mut self.hasher, &digest);

		self.buffer = digest;
	}

	/// Absorbs raw bytes into the transcript.
	pub fn observe_bytes(&mut self, values: &[u8]) {
		let rate = <H as Digest>::output_size();
		if self.index != 0 && self.index != rate {
			Digest::update(&mut self.hasher, self.index.to_le_bytes());
		}

		self.index = rate;

		Digest::update(&mut self.hasher, values);
	}

	/// Absorbs a field element in its canonical encoding.
	pub fn observe_field<F: Field>(&mut self, value: F) {
		self.observe_bytes(value.to_le_bytes().as_ref());
	}

	/// Absorbs a slice of field elements.
	pub fn observe_fields<F: Field>(&mut self, values: &[F]) {
		for &value in values {
			self.observe_field(value);
		}
	}

	/// Samples one pseudo-random byte.
	pub fn sample_byte(&mut self) -> u8 {
		if self.index == self.buffer.len() {
			self.fill_buffer();
			self.index = 0;
		}

		let sampled = self.buffer[self.index];
		self.index += 1;

		sampled
	}

	/// Samples `bits` pseudo-random bits as the low bits of a `usize`.
	pub fn sample_bits(&mut self, bits: usize) -> usize {
		let bits = bits.min(usize::BITS as usize);

		let bytes_to_sample = bits.div_ceil(8);

		let mut bytes = [0u8; std::mem::size_of::<usize>()];
		for byte in bytes.iter_mut().take(bytes_to_sample) {
			*byte = self.sample_byte();
		}

		let unmasked = usize::from_le_bytes(bytes);
		let mask = match 1usize.checked_shl(bits as u32) {
			Some(x) => x - 1,
			None => usize::MAX,
		};
		mask & unmasked
	}

	/// Samples a verifier challenge as a field element.
	pub fn sample_field<F: Field>(&mut self) -> F {
		let mut bytes = [0u8; 8];
		for byte in &mut bytes {
			*byte = self.sample_byte();
		}
		F::from_u64(u64::from_le_bytes(bytes))
	}

	/// Samples `n` field challenges.
	pub fn sample_fields<F: Field>(&mut self, n: usize) -> Vec<F> {
		(0..n).map(|_| self.sample_field()).collect()
	}
}
