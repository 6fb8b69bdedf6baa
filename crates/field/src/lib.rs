// Copyright 2025 Redshift Labs

//! Prime-field arithmetic for the redshift proving-system toolkit.
//!
//! The FRI engine only consumes a small field interface: the modulus,
//! exponentiation, squaring, inversion and equality, plus two-adic roots of
//! unity for the multiplicative evaluation domains. [`Field`] and
//! [`TwoAdicField`] capture exactly that contract, and [`BabyBear`] is the
//! concrete 31-bit field the toolkit instantiates it with.

mod baby_bear;
mod field;

pub use baby_bear::BabyBear;
pub use field::{Field, TwoAdicField};
