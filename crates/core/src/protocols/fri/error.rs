// Copyright 2025 Redshift Labs

use crate::{domain, merkle_tree, polynomial};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("step list must not be empty")]
	StepListEmpty,
	#[error("step list entry at index {index} is outside the supported range 1..=10")]
	StepListEntryOutOfRange { index: usize },
	#[error("step list sums to {actual}, expected {expected} fold rounds")]
	StepListSumMismatch { expected: usize, actual: usize },
	#[error("the last step list entry must be 1")]
	StepListLastEntryNotOne,
	#[error("got {actual} evaluation domains, expected {expected}")]
	DomainCountMismatch { expected: usize, actual: usize },
	#[error("consecutive domains at index {index} are not related by exact halving")]
	DomainChainBroken { index: usize },
	#[error("polynomial of size {polynomial_size} does not live on a domain of size {domain_size}")]
	PolynomialDomainMismatch {
		polynomial_size: usize,
		domain_size: usize,
	},
	#[error("no domain element matches the query challenge")]
	QueryIndexNotFound,
	#[error("a consistency denominator vanishes on the evaluation domain")]
	DenominatorVanishesOnDomain,
	#[error("conflicting or incorrect constructor argument: {0}")]
	InvalidArgs(String),
	#[error("domain construction error: {0}")]
	Domain(#[from] domain::Error),
	#[error("polynomial error: {0}")]
	Polynomial(#[from] polynomial::Error),
	#[error("vector commit error: {0}")]
	VectorCommit(#[from] merkle_tree::Error),
}
