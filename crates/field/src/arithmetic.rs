// Copyright 2025 Irreducible Inc.

/// Computes `a + b + carry`, returning the low word and the carry out.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
	let wide = a as u128 + b as u128 + carry as u128;
	(wide as u64, (wide >> 64) as u64)
}

/// Computes `a - b - borrow`, returning the low word and the borrow out (0 or 1).
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
	let wide = (a as u128).wrapping_sub(b as u128 + borrow as u128);
	(wide as u64, (wide >> 127) as u64)
}

/// Computes `a + b * c + carry`, returning the low word and the high word.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
	let wide = a as u128 + (b as u128) * (c as u128) + carry as u128;
	(wide as u64, (wide >> 64) as u64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_carries() {
		assert_eq!(adc(u64::MAX, 1, 0), (0, 1));
		assert_eq!(adc(u64::MAX, u64::MAX, 1), (u64::MAX, 1));
		assert_eq!(sbb(0, 1, 0), (u64::MAX, 1));
		assert_eq!(sbb(5, 3, 1), (1, 0));
		assert_eq!(mac(u64::MAX, u64::MAX, u64::MAX, u64::MAX), (u64::MAX, u64::MAX));
	}
}
