// Copyright 2025 Redshift Labs

//! Hash functions and digest compression used by the redshift commitment
//! layer.
//!
//! The Merkle tree hashes field-element leaves with Groestl-256 and compresses
//! inner nodes with a 2-to-1 pseudo-compression function over digests.

mod compression;
mod groestl;
mod hasher;

pub use compression::{CompressionFunction, GroestlDigestCompression, PseudoCompressionFunction};
pub use groestl::{GroestlDigest, GroestlHasher};
pub use hasher::{hash, Hasher};
