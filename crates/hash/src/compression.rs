// Copyright 2025 Redshift Labs
// Copyright (c) 2024 The Plonky3 Authors

//! These interfaces are taken from [p3_symmetric](https://github.com/Plonky3/Plonky3/blob/main/symmetric/src/compression.rs) in [Plonky3].
//!
//! [Plonky3]: <https://github.com/plonky3/plonky3>

use digest::Digest;
use groestl_crypto::Groestl256;

use super::groestl::GroestlDigest;

/// An `N`-to-1 compression function collision-resistant in a hash tree setting.
///
/// Unlike `CompressionFunction`, it may not be collision-resistant in general.
/// Instead it is only collision-resistant in hash-tree like settings where
/// the preimage of a non-leaf node must consist of compression outputs.
pub trait PseudoCompressionFunction<T, const N: usize>: Clone {
	fn compress(&self, input: [T; N]) -> T;
}

/// An `N`-to-1 compression function.
pub trait CompressionFunction<T, const N: usize>: PseudoCompressionFunction<T, N> {}

/// 2-to-1 compression of Groestl-256 digests for Merkle inner nodes.
#[derive(Debug, Default, Clone)]
pub struct GroestlDigestCompression;

impl PseudoCompressionFunction<GroestlDigest, 2> for GroestlDigestCompression {
	fn compress(&self, input: [GroestlDigest; 2]) -> GroestlDigest {
		let [left, right] = input;
		Groestl256::new()
			.chain_update(left)
			.chain_update(right)
			.finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_compress_is_deterministic() {
		let a = GroestlDigest::default();
		let b = Groestl256::digest([0x42u8]);

		let compression = GroestlDigestCompression;
		assert_eq!(compression.compress([a, b]), compression.compress([a, b]));
	}

	#[test]
	fn test_compress_is_order_sensitive() {
		let a = Groestl256::digest([0x01u8]);
		let b = Groestl256::digest([0x02u8]);

		let compression = GroestlDigestCompression;
		assert_ne!(compression.compress([a, b]), compression.compress([b, a]));
	}
}
