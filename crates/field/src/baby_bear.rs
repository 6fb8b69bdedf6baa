// Copyright 2025 Redshift Labs

use std::{
	fmt,
	iter::{Product, Sum},
	ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use bytemuck::{Pod, Zeroable};
use rand::RngCore;

use crate::field::{Field, TwoAdicField};

/// The BabyBear modulus, `2^31 - 2^27 + 1 = 15 * 2^27 + 1`.
pub const MODULUS: u32 = 2013265921;

/// The 31-bit BabyBear prime field.
///
/// Elements are kept in canonical form (`0 <= value < MODULUS`). Products are
/// computed through a widening u64 multiplication followed by one reduction;
/// at this word size there is no need for Montgomery form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct BabyBear(u32);

impl BabyBear {
	/// Creates the canonical representative of `val`.
	pub const fn new(val: u32) -> Self {
		Self(val % MODULUS)
	}

	/// The canonical u32 value of this element.
	pub const fn value(self) -> u32 {
		self.0
	}
}

impl fmt::Display for BabyBear {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u32> for BabyBear {
	fn from(val: u32) -> Self {
		Self::new(val)
	}
}

impl Add for BabyBear {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		// Both operands are < 2^31, so the u32 sum cannot overflow.
		let mut sum = self.0 + rhs.0;
		if sum >= MODULUS {
			sum -= MODULUS;
		}
		Self(sum)
	}
}

impl Sub for BabyBear {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		if self.0 >= rhs.0 {
			Self(self.0 - rhs.0)
		} else {
			Self(self.0 + MODULUS - rhs.0)
		}
	}
}

impl Mul for BabyBear {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self {
		Self(((self.0 as u64 * rhs.0 as u64) % MODULUS as u64) as u32)
	}
}

impl Neg for BabyBear {
	type Output = Self;

	fn neg(self) -> Self {
		if self.0 == 0 {
			self
		} else {
			Self(MODULUS - self.0)
		}
	}
}

impl AddAssign for BabyBear {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl SubAssign for BabyBear {
	fn sub_assign(&mut self, rhs: Self) {
		*self = *self - rhs;
	}
}

impl MulAssign for BabyBear {
	fn mul_assign(&mut self, rhs: Self) {
		*self = *self * rhs;
	}
}

impl Sum for BabyBear {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Self::ZERO, |acc, item| acc + item)
	}
}

impl Product for BabyBear {
	fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Self::ONE, |acc, item| acc * item)
	}
}

impl Field for BabyBear {
	const ZERO: Self = Self(0);
	const ONE: Self = Self(1);
	const CHARACTERISTIC: u64 = MODULUS as u64;

	type Bytes = [u8; 4];

	fn random(mut rng: impl RngCore) -> Self {
		Self((rng.next_u64() % MODULUS as u64) as u32)
	}

	fn square(&self) -> Self {
		*self * *self
	}

	fn invert(&self) -> Option<Self> {
		(!self.is_zero()).then(|| self.pow(MODULUS as u64 - 2))
	}

	fn from_u64(val: u64) -> Self {
		Self((val % MODULUS as u64) as u32)
	}

	fn to_le_bytes(&self) -> [u8; 4] {
		self.0.to_le_bytes()
	}
}

impl TwoAdicField for BabyBear {
	const TWO_ADICITY: usize = 27;
	const MULTIPLICATIVE_GENERATOR: Self = Self(31);
}
