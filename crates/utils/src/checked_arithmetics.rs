// Copyright 2025 Redshift Labs

/// Division implementation that fails in case when `a` isn't divisible by `b`
pub const fn checked_int_div(a: usize, b: usize) -> usize {
	let result = a / b;
	assert!(b * result == a);

	result
}

/// log2 implementation that fails when `val` is not a power of 2.
pub const fn checked_log_2(val: usize) -> usize {
	let result = val.ilog2();
	assert!(2usize.pow(result) == val);

	result as _
}

/// log2 of `val`, rounded up.
pub const fn log2_ceil_usize(val: usize) -> usize {
	if val <= 1 {
		return 0;
	}
	(val - 1).ilog2() as usize + 1
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_checked_int_div_success() {
		assert_eq!(checked_int_div(6, 1), 6);
		assert_eq!(checked_int_div(6, 2), 3);
		assert_eq!(checked_int_div(6, 6), 1);
	}

	#[test]
	#[should_panic]
	fn test_checked_int_div_fail() {
		_ = checked_int_div(5, 2);
	}

	#[test]
	fn test_checked_log2_success() {
		assert_eq!(checked_log_2(1), 0);
		assert_eq!(checked_log_2(2), 1);
		assert_eq!(checked_log_2(4), 2);
		assert_eq!(checked_log_2(64), 6);
	}

	#[test]
	#[should_panic]
	fn test_checked_log2_fail() {
		_ = checked_log_2(6)
	}

	#[test]
	fn test_log2_ceil() {
		assert_eq!(log2_ceil_usize(1), 0);
		assert_eq!(log2_ceil_usize(2), 1);
		assert_eq!(log2_ceil_usize(3), 2);
		assert_eq!(log2_ceil_usize(9), 4);
	}
}
