// Copyright 2025 Redshift Labs

use std::marker::PhantomData;

use digest::Digest;
use groestl_crypto::Groestl256;
use redshift_field::Field;

use super::hasher::Hasher;

/// Digest of the Groestl-256 hash, a 32-byte output.
pub type GroestlDigest = digest::Output<Groestl256>;

/// A [`Hasher`] over field elements backed by Groestl-256.
///
/// Elements are fed to the inner digest in their canonical little-endian
/// encoding, so two equal slices of field elements always hash identically
/// across prover and verifier.
#[derive(Debug, Default, Clone)]
pub struct GroestlHasher<F> {
	inner: Groestl256,
	_f_marker: PhantomData<F>,
}

impl<F: Field> Hasher<F> for GroestlHasher<F> {
	type Digest = GroestlDigest;

	fn new() -> Self {
		Self {
			inner: Groestl256::new(),
			_f_marker: PhantomData,
		}
	}

	fn update(&mut self, data: impl AsRef<[F]>) {
		for elem in data.as_ref() {
			Digest::update(&mut self.inner, elem.to_le_bytes());
		}
	}

	fn chain_update(mut self, data: impl AsRef<[F]>) -> Self {
		self.update(data);
		self
	}

	fn finalize(self) -> GroestlDigest {
		self.inner.finalize()
	}

	fn finalize_reset(&mut self) -> GroestlDigest {
		self.inner.finalize_reset()
	}

	fn reset(&mut self) {
		Digest::reset(&mut self.inner);
	}
}
