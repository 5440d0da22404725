// Copyright 2025 Irreducible Inc.

use std::{
	fmt::{self, Debug, Display},
	ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use rand::RngCore;

use crate::{BigInt, Error, FieldConfig};

/// A residue modulo `config.modulus`, held in Montgomery form.
///
/// Elements are immutable values; every operation returns a new element. Combining elements
/// of different fields is a logic error and is caught by debug assertions.
#[derive(Clone, Copy)]
pub struct FieldElement {
	value: BigInt,
	config: &'static FieldConfig,
}

impl FieldElement {
	pub fn zero(config: &'static FieldConfig) -> Self {
		Self {
			value: BigInt::ZERO,
			config,
		}
	}

	pub fn one(config: &'static FieldConfig) -> Self {
		Self {
			value: config.montgomery_r,
			config,
		}
	}

	/// Lifts a canonical integer into the field, failing if it is not below the modulus.
	pub fn from_bigint(config: &'static FieldConfig, value: &BigInt) -> Result<Self, Error> {
		if *value >= config.modulus {
			return Err(Error::NotInField);
		}
		Ok(Self {
			value: config.mont_mul(value, &config.montgomery_r_squared),
			config,
		})
	}

	/// Reduces `value` modulo the field characteristic.
	pub fn from_u64(config: &'static FieldConfig, value: u64) -> Self {
		let one = Self::one(config);
		(0..64)
			.rev()
			.fold(Self::zero(config), |acc, bit| {
				let acc = acc.double();
				if (value >> bit) & 1 == 1 {
					acc + one
				} else {
					acc
				}
			})
	}

	/// Parses a hex literal (`0x` prefix optional) into the field.
	pub fn from_hex(config: &'static FieldConfig, literal: &str) -> Result<Self, Error> {
		Self::from_bigint(config, &BigInt::from_hex(literal)?)
	}

	/// Samples a uniformly random element by rejection sampling.
	pub fn random(config: &'static FieldConfig, mut rng: impl RngCore) -> Self {
		let top_bits = config.modulus_bits - 64 * (config.limb_count - 1);
		let top_mask = if top_bits == 64 {
			u64::MAX
		} else {
			(1u64 << top_bits) - 1
		};
		loop {
			let mut candidate = BigInt::ZERO;
			for limb in candidate.0.iter_mut().take(config.limb_count) {
				*limb = rng.next_u64();
			}
			candidate.0[config.limb_count - 1] &= top_mask;
			if candidate < config.modulus {
				// Any reduced value is a valid Montgomery representative.
				return Self {
					value: candidate,
					config,
				};
			}
		}
	}

	/// Returns the canonical integer representative in `[0, modulus)`.
	pub fn to_bigint(&self) -> BigInt {
		self.config.mont_mul(&self.value, &BigInt::ONE)
	}

	pub fn config(&self) -> &'static FieldConfig {
		self.config
	}

	pub fn is_zero(&self) -> bool {
		self.value.is_zero()
	}

	pub fn is_one(&self) -> bool {
		self.value == self.config.montgomery_r
	}

	#[must_use]
	pub fn double(&self) -> Self {
		Self {
			value: self.config.double(&self.value),
			config: self.config,
		}
	}

	#[must_use]
	pub fn square(&self) -> Self {
		Self {
			value: self.config.mont_mul(&self.value, &self.value),
			config: self.config,
		}
	}

	/// Exponentiates by a canonical little-endian integer exponent.
	#[must_use]
	pub fn pow(&self, exp: &BigInt) -> Self {
		let mut result = Self::one(self.config);
		for bit in (0..exp.num_bits()).rev() {
			result = result.square();
			if exp.bit(bit) {
				result *= self;
			}
		}
		result
	}

	/// Multiplicative inverse via Fermat's little theorem.
	pub fn inverse(&self) -> Result<Self, Error> {
		if self.is_zero() {
			return Err(Error::DivisionByZero);
		}
		let (exp, _) = self
			.config
			.modulus
			.sub_with_borrow(&BigInt::from_u64(2));
		Ok(self.pow(&exp))
	}

	fn same_field(&self, other: &Self) -> bool {
		std::ptr::eq(self.config, other.config) || self.config.modulus == other.config.modulus
	}
}

impl PartialEq for FieldElement {
	fn eq(&self, other: &Self) -> bool {
		self.same_field(other) && self.value == other.value
	}
}

impl Eq for FieldElement {}

impl Display for FieldElement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.to_bigint(), f)
	}
}

impl Debug for FieldElement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({})", self.config.name, self.to_bigint())
	}
}

impl Neg for FieldElement {
	type Output = Self;

	fn neg(self) -> Self {
		Self {
			value: self.config.sub(&BigInt::ZERO, &self.value),
			config: self.config,
		}
	}
}

macro_rules! impl_binary_op {
	($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $config_op:ident) => {
		impl<'a> $trait<&'a FieldElement> for FieldElement {
			type Output = FieldElement;

			#[inline]
			fn $method(self, rhs: &'a FieldElement) -> FieldElement {
				debug_assert!(self.same_field(rhs), "operands belong to different fields");
				FieldElement {
					value: self.config.$config_op(&self.value, &rhs.value),
					config: self.config,
				}
			}
		}

		impl $trait for FieldElement {
			type Output = FieldElement;

			#[inline]
			fn $method(self, rhs: FieldElement) -> FieldElement {
				self.$method(&rhs)
			}
		}

		impl<'a> $assign_trait<&'a FieldElement> for FieldElement {
			#[inline]
			fn $assign_method(&mut self, rhs: &'a FieldElement) {
				*self = (*self).$method(rhs);
			}
		}

		impl $assign_trait for FieldElement {
			#[inline]
			fn $assign_method(&mut self, rhs: FieldElement) {
				*self = (*self).$method(&rhs);
			}
		}
	};
}

impl_binary_op!(Add, add, AddAssign, add_assign, add);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, sub);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, mont_mul);

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use lazy_static::lazy_static;
	use proptest::prelude::*;
	use rand::{rngs::StdRng, SeedableRng};

	use super::*;
	use crate::params::{BLS12_381_FQ, BN254_FQ, BN254_FR};

	lazy_static! {
		static ref F101: FieldConfig = FieldConfig::new("f101", "0x65").unwrap();
	}

	#[test]
	fn test_small_field_arithmetic() {
		let three = FieldElement::from_u64(&F101, 3);
		let thirty_four = FieldElement::from_u64(&F101, 34);
		assert!((three * thirty_four).is_one());
		assert_eq!(FieldElement::from_u64(&F101, 200).to_bigint(), BigInt::from_u64(99));
		assert_eq!(three.inverse().unwrap(), thirty_four);
		assert_eq!((-three).to_bigint(), BigInt::from_u64(98));
	}

	#[test]
	fn test_canonical_round_trip() {
		let value = BigInt::from_hex("0x1234567890abcdef1234567890abcdef").unwrap();
		let element = FieldElement::from_bigint(&BN254_FQ, &value).unwrap();
		assert_eq!(element.to_bigint(), value);
		assert_eq!(format!("{element}"), "0x1234567890abcdef1234567890abcdef");
	}

	#[test]
	fn test_modulus_is_not_in_field() {
		assert_matches!(
			FieldElement::from_bigint(&BN254_FQ, &BN254_FQ.modulus),
			Err(Error::NotInField)
		);
	}

	#[test]
	fn test_minus_one_plus_one_is_zero() {
		let (p_minus_one, _) = BLS12_381_FQ.modulus.sub_with_borrow(&BigInt::ONE);
		let minus_one = FieldElement::from_bigint(&BLS12_381_FQ, &p_minus_one).unwrap();
		assert!((minus_one + FieldElement::one(&BLS12_381_FQ)).is_zero());
		assert_eq!(minus_one, -FieldElement::one(&BLS12_381_FQ));
	}

	#[test]
	fn test_montgomery_constants_are_inverse() {
		for config in [&*BN254_FQ, &*BN254_FR, &*BLS12_381_FQ] {
			let r = FieldElement::from_bigint(config, &config.montgomery_r).unwrap();
			let r_inv = FieldElement::from_bigint(config, &config.montgomery_r_inverse).unwrap();
			assert!((r * r_inv).is_one());
		}
	}

	#[test]
	fn test_inverse_of_zero_fails() {
		assert_matches!(FieldElement::zero(&BN254_FR).inverse(), Err(Error::DivisionByZero));
	}

	#[test]
	fn test_elements_of_different_fields_differ() {
		assert_ne!(FieldElement::one(&BN254_FQ), FieldElement::one(&BN254_FR));
	}

	#[test]
	fn test_random_is_reduced() {
		let mut rng = StdRng::seed_from_u64(0);
		for _ in 0..64 {
			let element = FieldElement::random(&BLS12_381_FQ, &mut rng);
			assert!(element.to_bigint() < BLS12_381_FQ.modulus);
		}
	}

	proptest! {
		#[test]
		fn test_field_axioms(seed in any::<u64>()) {
			let mut rng = StdRng::seed_from_u64(seed);
			for config in [&*BN254_FQ, &*BLS12_381_FQ] {
				let a = FieldElement::random(config, &mut rng);
				let b = FieldElement::random(config, &mut rng);
				let c = FieldElement::random(config, &mut rng);

				prop_assert_eq!((a + b) - b, a);
				prop_assert_eq!(a * b, b * a);
				prop_assert_eq!(a * (b + c), a * b + a * c);
				prop_assert_eq!(a.double(), a + a);
				prop_assert_eq!(a.square(), a * a);
				if !a.is_zero() {
					prop_assert!((a * a.inverse().unwrap()).is_one());
				}
			}
		}

		#[test]
		fn test_small_values_multiply_like_integers(a in any::<u32>(), b in any::<u32>()) {
			let product = FieldElement::from_u64(&BN254_FR, a as u64)
				* FieldElement::from_u64(&BN254_FR, b as u64);
			prop_assert_eq!(product.to_bigint(), BigInt::from_u64(a as u64 * b as u64));
		}
	}
}
