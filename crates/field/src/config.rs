// Copyright 2025 Irreducible Inc.

use std::fmt::{self, Debug};

use crate::{
	arithmetic::{adc, mac},
	BigInt, Error, NUM_LIMBS,
};

/// Static description of a prime field and its Montgomery constants.
///
/// With `n = limb_count` and `R = 2^(64 n)`, elements are stored as `a * R mod p`. One instance
/// exists per supported field; see [`crate::params`].
#[derive(Clone, PartialEq, Eq)]
pub struct FieldConfig {
	pub name: &'static str,
	pub modulus: BigInt,
	pub limb_count: usize,
	pub modulus_bits: usize,
	/// `R mod p`, the Montgomery form of one.
	pub montgomery_r: BigInt,
	/// `R^-1 mod p`.
	pub montgomery_r_inverse: BigInt,
	/// `R^2 mod p`, used to move canonical values into Montgomery form.
	pub montgomery_r_squared: BigInt,
	/// `-p^-1 mod 2^64`.
	pub inv: u64,
}

impl FieldConfig {
	/// Derives the Montgomery constants for the prime given as a hex literal.
	pub fn new(name: &'static str, modulus_hex: &str) -> Result<Self, Error> {
		let modulus = BigInt::from_hex(modulus_hex)?;
		if !modulus.is_odd() || modulus <= BigInt::ONE {
			return Err(Error::InvalidModulus);
		}
		let modulus_bits = modulus.num_bits();
		// Doubling below must not carry out of the top limb.
		if modulus_bits >= BigInt::BITS {
			return Err(Error::InvalidModulus);
		}
		let limb_count = modulus_bits.div_ceil(64);

		let mut config = Self {
			name,
			modulus,
			limb_count,
			modulus_bits,
			montgomery_r: BigInt::ZERO,
			montgomery_r_inverse: BigInt::ZERO,
			montgomery_r_squared: BigInt::ZERO,
			inv: neg_inverse_mod_word(modulus.0[0]),
		};

		let mut acc = BigInt::ONE;
		for _ in 0..64 * limb_count {
			acc = config.double(&acc);
		}
		config.montgomery_r = acc;
		for _ in 0..64 * limb_count {
			acc = config.double(&acc);
		}
		config.montgomery_r_squared = acc;
		// REDC(1) = R^-1 mod p.
		config.montgomery_r_inverse = config.mont_mul(&BigInt::ONE, &BigInt::ONE);

		Ok(config)
	}

	/// `a + b mod p` for reduced `a`, `b`.
	pub(crate) fn add(&self, a: &BigInt, b: &BigInt) -> BigInt {
		let (sum, carry) = a.add_with_carry(b);
		if carry || sum >= self.modulus {
			sum.sub_with_borrow(&self.modulus).0
		} else {
			sum
		}
	}

	/// `a - b mod p` for reduced `a`, `b`.
	pub(crate) fn sub(&self, a: &BigInt, b: &BigInt) -> BigInt {
		let (diff, borrow) = a.sub_with_borrow(b);
		if borrow {
			diff.add_with_carry(&self.modulus).0
		} else {
			diff
		}
	}

	pub(crate) fn double(&self, a: &BigInt) -> BigInt {
		self.add(a, a)
	}

	/// Montgomery product `a * b * R^-1 mod p` (CIOS), for reduced `a`, `b`.
	pub(crate) fn mont_mul(&self, a: &BigInt, b: &BigInt) -> BigInt {
		let n = self.limb_count;
		let p = &self.modulus.0;
		let mut t = [0u64; NUM_LIMBS + 2];

		for i in 0..n {
			let mut carry = 0;
			for j in 0..n {
				(t[j], carry) = mac(t[j], a.0[j], b.0[i], carry);
			}
			let (sum, hi) = adc(t[n], carry, 0);
			t[n] = sum;
			t[n + 1] = hi;

			let m = t[0].wrapping_mul(self.inv);
			let (_, mut carry) = mac(t[0], m, p[0], 0);
			for j in 1..n {
				(t[j - 1], carry) = mac(t[j], m, p[j], carry);
			}
			let (sum, hi) = adc(t[n], carry, 0);
			t[n - 1] = sum;
			t[n] = t[n + 1] + hi;
		}

		let mut result = BigInt::ZERO;
		result.0[..n].copy_from_slice(&t[..n]);
		let overflow = t[n] != 0;
		if n < NUM_LIMBS {
			result.0[n] = t[n];
		}
		if overflow || result >= self.modulus {
			result = result.sub_with_borrow(&self.modulus).0;
		}
		result
	}
}

impl Debug for FieldConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldConfig")
			.field("name", &self.name)
			.field("modulus", &self.modulus)
			.field("limb_count", &self.limb_count)
			.finish_non_exhaustive()
	}
}

/// Computes `-m^-1 mod 2^64` for odd `m` by Newton iteration.
const fn neg_inverse_mod_word(m: u64) -> u64 {
	let mut inv = 1u64;
	let mut i = 0;
	while i < 63 {
		inv = inv.wrapping_mul(inv);
		inv = inv.wrapping_mul(m);
		i += 1;
	}
	inv.wrapping_neg()
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;

	#[test]
	fn test_inverse_word() {
		for m in [1u64, 3, 0xffff_ffff_ffff_fffb, 0x3c20_8c16_d87c_fd47] {
			assert_eq!(m.wrapping_mul(neg_inverse_mod_word(m)), u64::MAX);
		}
	}

	#[test]
	fn test_small_modulus_constants() {
		let config = FieldConfig::new("f101", "0x65").unwrap();
		assert_eq!(config.limb_count, 1);
		// 2^64 mod 101 = 79, 79^2 mod 101 = 80, 79 * 78 = 61 * 101 + 1.
		assert_eq!(config.montgomery_r, BigInt::from_u64(79));
		assert_eq!(config.montgomery_r_squared, BigInt::from_u64(80));
		assert_eq!(config.montgomery_r_inverse, BigInt::from_u64(78));
	}

	#[test]
	fn test_rejects_even_modulus() {
		assert_matches!(FieldConfig::new("even", "0x64"), Err(Error::InvalidModulus));
		assert_matches!(FieldConfig::new("one", "0x1"), Err(Error::InvalidModulus));
	}
}
