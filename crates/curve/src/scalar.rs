// Copyright 2025 Irreducible Inc.

use std::{
	fmt::{self, Display},
	str::FromStr,
};

use rand::RngCore;
use zkaccel_field::{BigInt, FieldElement};

use crate::{CurveId, Error};

/// A non-negative integer multiplier of a curve point, stored canonically.
///
/// Raw integers and scalar-field elements normalize to the same representation, so
/// `Scalar::from(5u64)` equals the scalar built from the field element `5`. Validity against a
/// curve's group order is checked by [`Scalar::is_valid_for`], not at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar(BigInt);

impl Scalar {
	pub const ZERO: Self = Self(BigInt::ZERO);
	pub const ONE: Self = Self(BigInt::ONE);

	pub const fn new(value: BigInt) -> Self {
		Self(value)
	}

	/// Uniformly random scalar below the curve order.
	pub fn random(curve: CurveId, rng: impl RngCore) -> Self {
		Self::from(FieldElement::random(curve.config().scalar_field, rng))
	}

	pub fn as_bigint(&self) -> &BigInt {
		&self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn num_bits(&self) -> usize {
		self.0.num_bits()
	}

	/// The `width`-bit digit starting at bit `offset`.
	pub fn window(&self, offset: usize, width: usize) -> u64 {
		self.0.bits(offset, width)
	}

	/// Whether the scalar lies in `[0, order)` for the given curve.
	pub fn is_valid_for(&self, curve: CurveId) -> bool {
		self.0 < curve.config().order
	}

	/// Lifts the scalar into the curve's scalar field.
	pub fn to_field(&self, curve: CurveId) -> Result<FieldElement, Error> {
		Ok(FieldElement::from_bigint(curve.config().scalar_field, &self.0)?)
	}
}

impl From<u64> for Scalar {
	fn from(value: u64) -> Self {
		Self(BigInt::from_u64(value))
	}
}

impl From<BigInt> for Scalar {
	fn from(value: BigInt) -> Self {
		Self(value)
	}
}

impl From<&FieldElement> for Scalar {
	fn from(value: &FieldElement) -> Self {
		Self(value.to_bigint())
	}
}

impl From<FieldElement> for Scalar {
	fn from(value: FieldElement) -> Self {
		Self::from(&value)
	}
}

impl FromStr for Scalar {
	type Err = Error;

	/// Parses a decimal or `0x`-prefixed hexadecimal literal.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let literal = s.trim();
		if literal.starts_with('-') {
			return Err(Error::NegativeScalar);
		}
		let literal = literal.strip_prefix('+').unwrap_or(literal);
		let value = if literal.starts_with("0x") || literal.starts_with("0X") {
			BigInt::from_hex(literal)
		} else {
			BigInt::from_dec(literal)
		};
		value
			.map(Self)
			.map_err(|_| Error::InvalidScalarLiteral(s.to_string()))
	}
}

impl Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use rand::{rngs::StdRng, SeedableRng};

	use super::*;

	#[test]
	fn test_integer_and_field_element_normalize_identically() {
		let config = CurveId::Bn254.config();
		let from_int = Scalar::from(12345u64);
		let from_field = Scalar::from(FieldElement::from_u64(config.scalar_field, 12345));
		assert_eq!(from_int, from_field);
		assert_eq!("12345".parse::<Scalar>().unwrap(), from_int);
		assert_eq!("0x3039".parse::<Scalar>().unwrap(), from_int);
	}

	#[test]
	fn test_negative_literals_are_rejected() {
		assert_matches!("-5".parse::<Scalar>(), Err(Error::NegativeScalar));
		assert_matches!("five".parse::<Scalar>(), Err(Error::InvalidScalarLiteral(_)));
	}

	#[test]
	fn test_order_is_not_a_valid_scalar() {
		for curve in CurveId::ALL {
			let order = Scalar::new(curve.config().order);
			assert!(!order.is_valid_for(curve));
			let (below, _) = curve.config().order.sub_with_borrow(&BigInt::ONE);
			assert!(Scalar::new(below).is_valid_for(curve));
		}
	}

	#[test]
	fn test_random_scalars_are_valid() {
		let mut rng = StdRng::seed_from_u64(7);
		for curve in CurveId::ALL {
			for _ in 0..16 {
				assert!(Scalar::random(curve, &mut rng).is_valid_for(curve));
			}
		}
	}
}
