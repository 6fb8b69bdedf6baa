// Copyright 2025 Redshift Labs

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("the number of leaves must be a power of two")]
	PowerOfTwoLengthRequired,
	#[error("leaf index {index} is out of range (maximum {max})")]
	IndexOutOfRange { index: usize, max: usize },
}
