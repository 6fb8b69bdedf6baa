// Copyright 2025 Redshift Labs

//! Radix-2 number-theoretic transform over the two-adic subgroups of the
//! field, mapping between coefficient and evaluation form.

use redshift_field::{Field, TwoAdicField};
use redshift_utils::checked_arithmetics::checked_log_2;

/// In-place iterative Cooley–Tukey radix-2 transform.
///
/// Maps standard-order input through a bit-reversal permutation followed by
/// butterfly passes; with a primitive `n`-th root as `root` this computes the
/// DFT `a'[k] = Σ_j a[j] * root^(j*k)` in standard order.
fn transform<F: Field>(a: &mut [F], root: F) {
	let n = a.len();
	debug_assert!(n.is_power_of_two());

	// Bit-reversal permutation
	let mut j = 0usize;
	for i in 1..n {
		let mut bit = n >> 1;
		while j & bit != 0 {
			j ^= bit;
			bit >>= 1;
		}
		j ^= bit;
		if i < j {
			a.swap(i, j);
		}
	}

	// Cooley–Tukey butterflies
	let mut len = 2;
	while len <= n {
		let w_len = root.pow((n / len) as u64);
		for start in (0..n).step_by(len) {
			let mut w = F::ONE;
			let half = len / 2;
			for i in 0..half {
				let u = a[start + i];
				let v = a[start + i + half] * w;
				a[start + i] = u + v;
				a[start + i + half] = u - v;
				w *= w_len;
			}
		}
		len <<= 1;
	}
}

/// Coefficients to evaluations over the natural domain of the slice length.
pub fn forward_transform<F: TwoAdicField>(a: &mut [F]) {
	let log_n = checked_log_2(a.len());
	transform(a, F::two_adic_generator(log_n));
}

/// Evaluations over the natural domain back to coefficients.
pub fn inverse_transform<F: TwoAdicField>(a: &mut [F]) {
	let log_n = checked_log_2(a.len());
	let root_inv = F::two_adic_generator(log_n)
		.invert()
		.expect("roots of unity are nonzero");
	transform(a, root_inv);

	let n_inv = F::from_u64(a.len() as u64)
		.invert()
		.expect("the domain size is a unit in the field");
	for x in a.iter_mut() {
		*x *= n_inv;
	}
}

#[cfg(test)]
mod tests {
	use rand::{rngs::StdRng, SeedableRng};
	use redshift_field::BabyBear;

	use super::*;

	fn horner(coeffs: &[BabyBear], x: BabyBear) -> BabyBear {
		coeffs
			.iter()
			.rev()
			.fold(BabyBear::ZERO, |acc, &c| acc * x + c)
	}

	#[test]
	fn test_forward_matches_naive_evaluation() {
		let mut rng = StdRng::seed_from_u64(0);
		let coeffs: Vec<BabyBear> = (0..16).map(|_| BabyBear::random(&mut rng)).collect();

		let mut evals = coeffs.clone();
		forward_transform(&mut evals);

		let root = BabyBear::two_adic_generator(4);
		for (i, &eval) in evals.iter().enumerate() {
			assert_eq!(eval, horner(&coeffs, root.pow(i as u64)));
		}
	}

	#[test]
	fn test_round_trip() {
		let mut rng = StdRng::seed_from_u64(1);
		for log_n in 0..8 {
			let coeffs: Vec<BabyBear> =
				(0..1 << log_n).map(|_| BabyBear::random(&mut rng)).collect();
			let mut buf = coeffs.clone();
			forward_transform(&mut buf);
			inverse_transform(&mut buf);
			assert_eq!(buf, coeffs);
		}
	}
}
