// Copyright 2025 Redshift Labs

//! Core protocol components of the redshift proving-system toolkit.
//!
//! The centerpiece is the FRI proximity-proof engine in [`protocols::fri`];
//! the remaining modules supply the evaluation domains, polynomial
//! representations, Merkle commitments and the Fiat–Shamir transcript it is
//! built on.

pub mod domain;
pub mod merkle_tree;
pub mod polynomial;
pub mod protocols;
pub mod transcript;
