// Copyright 2025 Irreducible Inc.

use std::{
	cmp::Ordering,
	fmt::{self, Debug, Display},
};

use crate::{
	arithmetic::{adc, mac, sbb},
	Error,
};

/// Number of 64-bit limbs in a [`BigInt`]; wide enough for a 381-bit modulus.
pub const NUM_LIMBS: usize = 6;

/// Unsigned integer of `64 * NUM_LIMBS` bits stored as little-endian limbs.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigInt(pub [u64; NUM_LIMBS]);

impl BigInt {
	pub const ZERO: Self = Self([0; NUM_LIMBS]);
	pub const ONE: Self = Self::from_u64(1);
	pub const BITS: usize = 64 * NUM_LIMBS;

	pub const fn from_u64(value: u64) -> Self {
		let mut limbs = [0; NUM_LIMBS];
		limbs[0] = value;
		Self(limbs)
	}

	/// Parses a hexadecimal literal, with or without a `0x` prefix. Underscores are ignored.
	pub fn from_hex(literal: &str) -> Result<Self, Error> {
		let trimmed = literal.trim();
		let digits = trimmed
			.strip_prefix("0x")
			.or_else(|| trimmed.strip_prefix("0X"))
			.unwrap_or(trimmed);
		if digits.is_empty() {
			return Err(Error::InvalidLiteral(literal.to_string()));
		}

		let mut result = Self::ZERO;
		for ch in digits.chars().filter(|&ch| ch != '_') {
			let digit = ch
				.to_digit(16)
				.ok_or_else(|| Error::InvalidLiteral(literal.to_string()))?;
			if result.0[NUM_LIMBS - 1] >> 60 != 0 {
				return Err(Error::InvalidLiteral(literal.to_string()));
			}
			result = result.shl_small(4);
			result.0[0] |= digit as u64;
		}
		Ok(result)
	}

	/// Parses a decimal literal. Underscores are ignored.
	pub fn from_dec(literal: &str) -> Result<Self, Error> {
		let digits = literal.trim();
		if digits.is_empty() {
			return Err(Error::InvalidLiteral(literal.to_string()));
		}

		let mut result = Self::ZERO;
		for ch in digits.chars().filter(|&ch| ch != '_') {
			let digit = ch
				.to_digit(10)
				.ok_or_else(|| Error::InvalidLiteral(literal.to_string()))?;
			let overflow = result.mul_small_add(10, digit as u64);
			if overflow != 0 {
				return Err(Error::InvalidLiteral(literal.to_string()));
			}
		}
		Ok(result)
	}

	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|&limb| limb == 0)
	}

	pub fn is_odd(&self) -> bool {
		self.0[0] & 1 == 1
	}

	/// Number of significant bits, zero for zero.
	pub fn num_bits(&self) -> usize {
		self.0
			.iter()
			.enumerate()
			.rev()
			.find(|(_, &limb)| limb != 0)
			.map(|(i, &limb)| 64 * i + (64 - limb.leading_zeros() as usize))
			.unwrap_or(0)
	}

	/// Returns bit `index`, counting from the least significant bit.
	pub fn bit(&self, index: usize) -> bool {
		if index >= Self::BITS {
			return false;
		}
		(self.0[index / 64] >> (index % 64)) & 1 == 1
	}

	/// Extracts the `width`-bit window starting at bit `offset`.
	///
	/// Bits past the top of the integer read as zero. `width` must be at most 64.
	pub fn bits(&self, offset: usize, width: usize) -> u64 {
		debug_assert!(width <= 64);
		if width == 0 || offset >= Self::BITS {
			return 0;
		}

		let limb_idx = offset / 64;
		let bit_idx = offset % 64;
		let mut window = self.0[limb_idx] >> bit_idx;
		if bit_idx != 0 && bit_idx + width > 64 && limb_idx + 1 < NUM_LIMBS {
			window |= self.0[limb_idx + 1] << (64 - bit_idx);
		}
		if width == 64 {
			window
		} else {
			window & ((1u64 << width) - 1)
		}
	}

	/// Returns `self + other` and whether the addition overflowed.
	pub fn add_with_carry(&self, other: &Self) -> (Self, bool) {
		let mut result = Self::ZERO;
		let mut carry = 0;
		for i in 0..NUM_LIMBS {
			(result.0[i], carry) = adc(self.0[i], other.0[i], carry);
		}
		(result, carry != 0)
	}

	/// Returns `self - other` and whether the subtraction borrowed.
	pub fn sub_with_borrow(&self, other: &Self) -> (Self, bool) {
		let mut result = Self::ZERO;
		let mut borrow = 0;
		for i in 0..NUM_LIMBS {
			(result.0[i], borrow) = sbb(self.0[i], other.0[i], borrow);
		}
		(result, borrow != 0)
	}

	/// `self = self * multiplier + addend`, returning the limb that overflowed.
	pub fn mul_small_add(&mut self, multiplier: u64, addend: u64) -> u64 {
		let mut carry = addend;
		for limb in self.0.iter_mut() {
			(*limb, carry) = mac(0, *limb, multiplier, carry);
		}
		carry
	}

	fn shl_small(&self, shift: u32) -> Self {
		debug_assert!(shift > 0 && shift < 64);
		let mut result = Self::ZERO;
		let mut carry = 0;
		for i in 0..NUM_LIMBS {
			result.0[i] = (self.0[i] << shift) | carry;
			carry = self.0[i] >> (64 - shift);
		}
		result
	}
}

impl From<u64> for BigInt {
	fn from(value: u64) -> Self {
		Self::from_u64(value)
	}
}

impl Ord for BigInt {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.iter().rev().cmp(other.0.iter().rev())
	}
}

impl PartialOrd for BigInt {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Display for BigInt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let top = self.0.iter().rposition(|&limb| limb != 0).unwrap_or(0);
		write!(f, "0x{:x}", self.0[top])?;
		for limb in self.0[..top].iter().rev() {
			write!(f, "{limb:016x}")?;
		}
		Ok(())
	}
}

impl Debug for BigInt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "BigInt({self})")
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn test_parse_hex_and_dec_agree() {
		let hex = BigInt::from_hex("0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001")
			.unwrap();
		let dec = BigInt::from_dec(
			"21888242871839275222246405745257275088548364400416034343698204186575808495617",
		)
		.unwrap();
		assert_eq!(hex, dec);
		assert_eq!(hex.num_bits(), 254);
		assert_eq!(
			hex.to_string(),
			"0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
		);
	}

	#[test]
	fn test_parse_errors() {
		assert_matches!(BigInt::from_hex("0x"), Err(Error::InvalidLiteral(_)));
		assert_matches!(BigInt::from_hex("0xzz"), Err(Error::InvalidLiteral(_)));
		assert_matches!(BigInt::from_dec("12a"), Err(Error::InvalidLiteral(_)));
		let too_wide = format!("0x1{}", "0".repeat(96));
		assert_matches!(BigInt::from_hex(&too_wide), Err(Error::InvalidLiteral(_)));
	}

	#[test]
	fn test_window_straddles_limbs() {
		let value = BigInt([0xF000_0000_0000_0000, 0b1011, 0, 0, 0, 0]);
		assert_eq!(value.bits(60, 8), 0b1011_1111);
		assert_eq!(value.bits(62, 4), 0b1111);
		assert_eq!(value.bits(64, 4), 0b1011);
		assert_eq!(value.bits(380, 8), 0);
		assert!(value.bit(63));
		assert!(!value.bit(66));
	}

	#[test]
	fn test_num_bits() {
		assert_eq!(BigInt::ZERO.num_bits(), 0);
		assert_eq!(BigInt::ONE.num_bits(), 1);
		assert_eq!(BigInt([0, 1, 0, 0, 0, 0]).num_bits(), 65);
	}

	proptest! {
		#[test]
		fn test_add_sub_inverse(a in any::<[u64; NUM_LIMBS]>(), b in any::<[u64; NUM_LIMBS]>()) {
			let (a, b) = (BigInt(a), BigInt(b));
			let (sum, _) = a.add_with_carry(&b);
			let (diff, _) = sum.sub_with_borrow(&b);
			prop_assert_eq!(diff, a);
		}

		#[test]
		fn test_bits_match_single_bits(limbs in any::<[u64; NUM_LIMBS]>(), offset in 0usize..370, width in 1usize..=16) {
			let value = BigInt(limbs);
			let expected = (0..width)
				.map(|i| (value.bit(offset + i) as u64) << i)
				.sum::<u64>();
			prop_assert_eq!(value.bits(offset, width), expected);
		}
	}
}
