// Copyright 2025 Redshift Labs

use std::sync::Arc;

use redshift_field::TwoAdicField;
use redshift_utils::bail;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("domain of size 2^{log_size} exceeds the field two-adicity {two_adicity}")]
	DomainTooLarge { log_size: usize, two_adicity: usize },
	#[error("cannot fold a domain of size 2^{max_log_size} through {rounds} rounds")]
	TooManyFoldRounds { rounds: usize, max_log_size: usize },
}

/// A multiplicative evaluation domain: the size-`2^log_size` subgroup of the
/// field's unit group.
///
/// Immutable once constructed and shared read-only between the prover and the
/// verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationDomain<F> {
	log_size: usize,
	size: usize,
	generator: F,
}

impl<F: TwoAdicField> EvaluationDomain<F> {
	pub fn new(log_size: usize) -> Result<Self, Error> {
		if log_size > F::TWO_ADICITY {
			bail!(Error::DomainTooLarge {
				log_size,
				two_adicity: F::TWO_ADICITY,
			});
		}
		Ok(Self {
			log_size,
			size: 1 << log_size,
			generator: F::two_adic_generator(log_size),
		})
	}

	pub fn log_size(&self) -> usize {
		self.log_size
	}

	pub fn size(&self) -> usize {
		self.size
	}

	/// The primitive root of unity generating this domain.
	pub fn generator(&self) -> F {
		self.generator
	}

	/// The `index`-th power of the generator.
	pub fn element(&self, index: usize) -> F {
		self.generator.pow((index % self.size) as u64)
	}

	/// The inverse of [`Self::element`], computed without a field inversion.
	pub fn element_inverse(&self, index: usize) -> F {
		self.element(self.size - index % self.size)
	}

	/// Finds the index of `value` in the domain by exhaustive scan.
	///
	/// The scan is exact-match: a value outside the domain yields `None`.
	pub fn find_index(&self, value: F) -> Option<usize> {
		let mut current = F::ONE;
		for index in 0..self.size {
			if current == value {
				return Some(index);
			}
			current *= self.generator;
		}
		None
	}
}

/// Builds the halving chain of domains `D[0] ⊃ D[1] ⊃ … ⊃ D[rounds]` used by
/// the folding protocol, largest first.
///
/// Every consecutive pair is related by exact halving, and consecutive
/// generators by squaring.
pub fn make_domains<F: TwoAdicField>(
	max_log_size: usize,
	rounds: usize,
) -> Result<Vec<Arc<EvaluationDomain<F>>>, Error> {
	if rounds >= max_log_size {
		bail!(Error::TooManyFoldRounds {
			rounds,
			max_log_size,
		});
	}
	(0..=rounds)
		.map(|t| EvaluationDomain::new(max_log_size - t).map(Arc::new))
		.collect()
}
