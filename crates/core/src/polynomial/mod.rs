// Copyright 2025 Redshift Labs

//! Polynomial representations used by the folding protocol.
//!
//! Polynomials appear in two forms: [`Polynomial`] holds coefficients,
//! [`PolynomialDfs`] holds evaluations over the natural two-adic domain of its
//! length. Folding is defined on both through [`FriFold`], with the
//! representation dispatched statically.

mod ntt;

use redshift_field::{Field, TwoAdicField};
use redshift_utils::bail;

use crate::domain::EvaluationDomain;

pub use ntt::{forward_transform, inverse_transform};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("evaluation form requires a power-of-two length, got {len}")]
	NonPowerOfTwoLength { len: usize },
	#[error("degree-{degree} polynomial does not fit on a domain of size {domain_size}")]
	DegreeTooLarge { degree: usize, domain_size: usize },
}

/// The even/odd halving step shared by both polynomial representations:
/// `fold(f)(x) = f_even(x) + alpha * f_odd(x)` where
/// `f(x) = f_even(x^2) + x * f_odd(x^2)`.
pub trait FriFold<F: TwoAdicField>: Sized {
	/// Folds the polynomial in half against the challenge `alpha`.
	///
	/// Evaluation-form folding reindexes onto `next_domain`; coefficient-form
	/// folding is domain independent.
	fn fold(&self, alpha: F, next_domain: &EvaluationDomain<F>) -> Self;
}

/// A polynomial in coefficient form, low-order first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polynomial<F> {
	coeffs: Vec<F>,
}

impl<F: Field> Polynomial<F> {
	pub fn new(coeffs: Vec<F>) -> Self {
		Self { coeffs }
	}

	pub fn zero() -> Self {
		Self { coeffs: Vec::new() }
	}

	pub fn coefficients(&self) -> &[F] {
		&self.coeffs
	}

	/// The degree, with the zero polynomial reported as degree 0.
	pub fn degree(&self) -> usize {
		self.coeffs
			.iter()
			.rposition(|c| !c.is_zero())
			.unwrap_or(0)
	}

	/// Horner evaluation at `x`.
	pub fn evaluate(&self, x: F) -> F {
		self.coeffs
			.iter()
			.rev()
			.fold(F::ZERO, |acc, &c| acc * x + c)
	}
}

impl<F: TwoAdicField> FriFold<F> for Polynomial<F> {
	fn fold(&self, alpha: F, _next_domain: &EvaluationDomain<F>) -> Self {
		let coeffs = self
			.coeffs
			.chunks(2)
			.map(|pair| {
				let even = pair[0];
				let odd = pair.get(1).copied().unwrap_or(F::ZERO);
				even + alpha * odd
			})
			.collect();
		Self::new(coeffs)
	}
}

/// A polynomial in evaluation ("DFS") form over the natural domain of its
/// length: entry `i` is the value at the `i`-th power of the domain generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialDfs<F> {
	values: Vec<F>,
}

impl<F: TwoAdicField> PolynomialDfs<F> {
	pub fn from_values(values: Vec<F>) -> Result<Self, Error> {
		if !values.len().is_power_of_two() {
			bail!(Error::NonPowerOfTwoLength { len: values.len() });
		}
		Ok(Self { values })
	}

	/// Evaluates `polynomial` over the natural domain of size `domain_size`.
	pub fn from_coefficients(polynomial: &Polynomial<F>, domain_size: usize) -> Result<Self, Error> {
		if !domain_size.is_power_of_two() {
			bail!(Error::NonPowerOfTwoLength { len: domain_size });
		}
		if polynomial.degree() + 1 > domain_size {
			bail!(Error::DegreeTooLarge {
				degree: polynomial.degree(),
				domain_size,
			});
		}
		let mut values = polynomial.coefficients().to_vec();
		values.resize(domain_size, F::ZERO);
		forward_transform(&mut values);
		Ok(Self { values })
	}

	pub fn values(&self) -> &[F] {
		&self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Coefficient form of the represented polynomial.
	pub fn to_polynomial(&self) -> Polynomial<F> {
		let mut coeffs = self.values.clone();
		inverse_transform(&mut coeffs);
		Polynomial::new(coeffs)
	}

	pub fn degree(&self) -> usize {
		self.to_polynomial().degree()
	}

	/// Re-evaluates the same polynomial onto a grid of size `new_size`.
	///
	/// The transform goes through the coefficient form, so the represented
	/// polynomial is unchanged; shrinking the grid below the degree is
	/// rejected rather than truncated.
	pub fn resize(&self, new_size: usize) -> Result<Self, Error> {
		let polynomial = self.to_polynomial();
		Self::from_coefficients(&polynomial, new_size)
	}
}

impl<F: TwoAdicField> FriFold<F> for PolynomialDfs<F> {
	fn fold(&self, alpha: F, next_domain: &EvaluationDomain<F>) -> Self {
		let n = self.values.len();
		let half = n / 2;
		debug_assert_eq!(next_domain.size(), half);

		let generator = F::two_adic_generator(redshift_utils::checked_arithmetics::checked_log_2(n));
		let generator_inv = generator.pow(n as u64 - 1);
		let two_inv = F::from_u64(2)
			.invert()
			.expect("the field characteristic is odd");

		// f'(x^2) = (f(x) + f(-x)) / 2 + alpha * (f(x) - f(-x)) / (2x),
		// with -x sitting half a domain away from x.
		let mut x_inv = F::ONE;
		let values = (0..half)
			.map(|i| {
				let (a, b) = (self.values[i], self.values[i + half]);
				let even = (a + b) * two_inv;
				let odd = (a - b) * two_inv * x_inv;
				x_inv *= generator_inv;
				even + alpha * odd
			})
			.collect();
		Self { values }
	}
}
