// Copyright 2025 Redshift Labs

/// Trait representing cryptographic hash functions which is generic over the input type.
///
/// This interface is largely based on the [`digest::Digest`] trait, except that instead of
/// requiring byte strings as input and byte arrays as output, this is generic over the input
/// values and has a less constrained output digest type.
pub trait Hasher<T> {
	/// The hash function output type.
	type Digest;

	fn new() -> Self;
	fn update(&mut self, data: impl AsRef<[T]>);
	fn chain_update(self, data: impl AsRef<[T]>) -> Self;
	fn finalize(self) -> Self::Digest;
	fn finalize_reset(&mut self) -> Self::Digest;
	fn reset(&mut self);
}

pub fn hash<T, H: Hasher<T>, Data: AsRef<[T]>>(data: Data) -> H::Digest {
	H::new().chain_update(data).finalize()
}
