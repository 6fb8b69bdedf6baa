// Copyright 2025 Redshift Labs

use std::{
	fmt::{Debug, Display},
	hash::Hash,
	iter::{Product, Sum},
	ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use rand::RngCore;

/// This trait is based on `ff::Field` with some unused functionality removed.
pub trait Field:
	Sized
	+ Eq
	+ Copy
	+ Clone
	+ Default
	+ Send
	+ Sync
	+ Debug
	+ Display
	+ Hash
	+ 'static
	+ Neg<Output = Self>
	+ Add<Output = Self>
	+ Sub<Output = Self>
	+ Mul<Output = Self>
	+ Sum
	+ Product
	+ AddAssign
	+ SubAssign
	+ MulAssign
{
	/// The zero element of the field, the additive identity.
	const ZERO: Self;

	/// The one element of the field, the multiplicative identity.
	const ONE: Self;

	/// The characteristic of the field.
	const CHARACTERISTIC: u64;

	/// Canonical little-endian encoding, used for transcripts and hashing.
	type Bytes: AsRef<[u8]> + Copy + Send + Sync;

	/// Returns an element chosen uniformly at random using a user-provided RNG.
	fn random(rng: impl RngCore) -> Self;

	/// Returns true iff this element is zero.
	fn is_zero(&self) -> bool {
		*self == Self::ZERO
	}

	/// Doubles this element.
	#[must_use]
	fn double(&self) -> Self {
		*self + *self
	}

	/// Squares this element.
	#[must_use]
	fn square(&self) -> Self;

	/// Computes the multiplicative inverse of this element,
	/// failing if the element is zero.
	fn invert(&self) -> Option<Self>;

	/// The canonical representative of `val` modulo the characteristic.
	fn from_u64(val: u64) -> Self;

	/// Canonical little-endian byte encoding of this element.
	fn to_le_bytes(&self) -> Self::Bytes;

	/// Exponentiates `self` by `exp` via square-and-multiply.
	#[must_use]
	fn pow(&self, exp: u64) -> Self {
		let mut res = Self::ONE;
		let mut base = *self;
		let mut exp = exp;
		while exp > 0 {
			if exp & 1 == 1 {
				res *= base;
			}
			base = base.square();
			exp >>= 1;
		}
		res
	}
}

/// A field whose multiplicative group contains a large power-of-two subgroup.
///
/// FRI evaluation domains are the subgroups generated by
/// [`Self::two_adic_generator`]; the field supports domains up to size
/// `2^TWO_ADICITY`.
pub trait TwoAdicField: Field {
	/// The largest `n` such that `2^n` divides the multiplicative group order.
	const TWO_ADICITY: usize;

	/// A generator of the whole multiplicative group.
	const MULTIPLICATIVE_GENERATOR: Self;

	/// Returns a root of unity of exact multiplicative order `2^bits`.
	///
	/// Consecutive generators are related by squaring:
	/// `two_adic_generator(bits - 1) == two_adic_generator(bits).square()`,
	/// which is what makes the halving domain chain of FRI line up.
	fn two_adic_generator(bits: usize) -> Self {
		assert!(bits <= Self::TWO_ADICITY, "field two-adicity exhausted");
		Self::MULTIPLICATIVE_GENERATOR.pow((Self::CHARACTERISTIC - 1) >> bits)
	}
}
