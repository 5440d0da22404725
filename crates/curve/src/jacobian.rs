// Copyright 2025 Irreducible Inc.

use std::ops::Neg;

use zkaccel_field::{BigInt, FieldElement};

use crate::{AffinePoint, CurveId, CurvePoint};

/// A point in Jacobian coordinates: `(X, Y, Z)` represents `(X / Z^2, Y / Z^3)`.
///
/// `Z = 0` is the point at infinity. No inversion is needed for addition or doubling.
#[derive(Clone, Copy, Debug)]
pub struct JacobianPoint {
	pub curve: CurveId,
	pub x: FieldElement,
	pub y: FieldElement,
	pub z: FieldElement,
}

impl JacobianPoint {
	pub fn identity(curve: CurveId) -> Self {
		let field = curve.config().field;
		let one = FieldElement::one(field);
		Self {
			curve,
			x: one,
			y: one,
			z: FieldElement::zero(field),
		}
	}

	pub fn from_affine(point: &AffinePoint) -> Self {
		if point.infinity {
			return Self::identity(point.curve);
		}
		Self {
			curve: point.curve,
			x: point.x,
			y: point.y,
			z: FieldElement::one(point.x.config()),
		}
	}

	pub fn is_identity(&self) -> bool {
		self.z.is_zero()
	}

	/// Normalizes to affine coordinates; this is the only operation that inverts.
	pub fn to_affine(&self) -> AffinePoint {
		match self.z.inverse() {
			Ok(z_inv) => {
				let z_inv2 = z_inv.square();
				AffinePoint::new_unchecked(self.curve, self.x * z_inv2, self.y * z_inv2 * z_inv)
			}
			Err(_) => AffinePoint::identity(self.curve),
		}
	}

	/// Checks `Y^2 = X^3 + a X Z^4 + b Z^6`.
	pub fn is_on_curve(&self) -> bool {
		if self.is_identity() {
			return true;
		}
		let config = self.curve.config();
		let z2 = self.z.square();
		let z4 = z2.square();
		let z6 = z4 * z2;
		let rhs = self.x.square() * self.x + config.a * self.x * z4 + config.b * z6;
		self.y.square() == rhs
	}

	/// Point doubling, `dbl-2007-bl`.
	#[must_use]
	pub fn double(&self) -> Self {
		if self.is_identity() {
			return *self;
		}
		let config = self.curve.config();

		let xx = self.x.square();
		let yy = self.y.square();
		let yyyy = yy.square();
		let zz = self.z.square();
		let s = ((self.x + yy).square() - xx - yyyy).double();
		let mut m = xx.double() + xx;
		if !config.a_is_zero() {
			m += config.a * zz.square();
		}
		let x3 = m.square() - s.double();
		let y3 = m * (s - x3) - yyyy.double().double().double();
		// Vanishes for points of order two, which yields the identity.
		let z3 = (self.y + self.z).square() - yy - zz;

		Self {
			curve: self.curve,
			x: x3,
			y: y3,
			z: z3,
		}
	}

	/// General addition, `add-2007-bl`, with the exceptional cases handled explicitly.
	#[must_use]
	pub fn add(&self, other: &Self) -> Self {
		debug_assert_eq!(self.curve, other.curve);
		if self.is_identity() {
			return *other;
		}
		if other.is_identity() {
			return *self;
		}

		let z1z1 = self.z.square();
		let z2z2 = other.z.square();
		let u1 = self.x * z2z2;
		let u2 = other.x * z1z1;
		let s1 = self.y * other.z * z2z2;
		let s2 = other.y * self.z * z1z1;
		let h = u2 - u1;
		let r = (s2 - s1).double();

		if h.is_zero() {
			return if r.is_zero() {
				self.double()
			} else {
				Self::identity(self.curve)
			};
		}

		let i = h.double().square();
		let j = h * i;
		let v = u1 * i;
		let x3 = r.square() - j - v.double();
		let y3 = r * (v - x3) - (s1 * j).double();
		let z3 = ((self.z + other.z).square() - z1z1 - z2z2) * h;

		Self {
			curve: self.curve,
			x: x3,
			y: y3,
			z: z3,
		}
	}

	/// Mixed addition with an affine point, `madd-2007-bl`.
	#[must_use]
	pub fn add_affine(&self, other: &AffinePoint) -> Self {
		debug_assert_eq!(self.curve, other.curve);
		if other.infinity {
			return *self;
		}
		if self.is_identity() {
			return Self::from_affine(other);
		}

		let z1z1 = self.z.square();
		let u2 = other.x * z1z1;
		let s2 = other.y * self.z * z1z1;
		let h = u2 - self.x;
		let r = (s2 - self.y).double();

		if h.is_zero() {
			return if r.is_zero() {
				self.double()
			} else {
				Self::identity(self.curve)
			};
		}

		let hh = h.square();
		let i = hh.double().double();
		let j = h * i;
		let v = self.x * i;
		let x3 = r.square() - j - v.double();
		let y3 = r * (v - x3) - (self.y * j).double();
		let z3 = (self.z + h).square() - z1z1 - hh;

		Self {
			curve: self.curve,
			x: x3,
			y: y3,
			z: z3,
		}
	}

	/// Adds a point of any representation, using mixed addition for affine inputs.
	#[must_use]
	pub fn add_point(&self, other: &CurvePoint) -> Self {
		match other {
			CurvePoint::Affine(affine) => self.add_affine(affine),
			CurvePoint::Jacobian(jacobian) => self.add(jacobian),
			CurvePoint::Projective(projective) => self.add(&projective.to_jacobian()),
		}
	}

	/// Double-and-add scalar multiplication, most significant bit first.
	#[must_use]
	pub fn mul_bigint(&self, scalar: &BigInt) -> Self {
		let mut acc = Self::identity(self.curve);
		for bit in (0..scalar.num_bits()).rev() {
			acc = acc.double();
			if scalar.bit(bit) {
				acc = acc.add(self);
			}
		}
		acc
	}
}

impl PartialEq for JacobianPoint {
	fn eq(&self, other: &Self) -> bool {
		if self.curve != other.curve {
			return false;
		}
		match (self.is_identity(), other.is_identity()) {
			(true, true) => true,
			(false, false) => {
				let z1z1 = self.z.square();
				let z2z2 = other.z.square();
				self.x * z2z2 == other.x * z1z1
					&& self.y * z2z2 * other.z == other.y * z1z1 * self.z
			}
			_ => false,
		}
	}
}

impl Eq for JacobianPoint {}

impl Neg for JacobianPoint {
	type Output = Self;

	fn neg(self) -> Self {
		Self {
			y: -self.y,
			..self
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn generator(curve: CurveId) -> JacobianPoint {
		curve.config().generator.to_jacobian()
	}

	#[test]
	fn test_small_multiples_agree() {
		for curve in CurveId::ALL {
			let g = generator(curve);
			let two_g = g.double();
			let three_g = two_g.add(&g);
			assert_eq!(three_g, g.add(&two_g));
			assert_eq!(three_g, g.mul_bigint(&BigInt::from_u64(3)));
			assert_eq!(two_g.add_affine(&curve.config().generator), three_g);
			assert!(three_g.is_on_curve());
			assert!(three_g.to_affine().is_on_curve());
		}
	}

	#[test]
	fn test_exceptional_additions() {
		let g = generator(CurveId::Bn254);
		let identity = JacobianPoint::identity(CurveId::Bn254);
		assert_eq!(g.add(&g), g.double());
		assert!(g.add(&-g).is_identity());
		assert!(g.add_affine(&(-g).to_affine()).is_identity());
		assert_eq!(identity.add(&g), g);
		assert_eq!(g.add(&identity), g);
		assert!(identity.double().is_identity());
	}

	#[test]
	fn test_order_annihilates_generator() {
		for curve in CurveId::ALL {
			let order = curve.config().order;
			assert!(generator(curve).mul_bigint(&order).is_identity());
		}
	}

	#[test]
	fn test_identity_to_affine() {
		let identity = JacobianPoint::identity(CurveId::Bls12_381);
		assert!(identity.to_affine().is_identity());
		assert_eq!(identity.to_affine().to_jacobian(), identity);
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(16))]

		#[test]
		fn test_scalar_mul_distributes(a in any::<u32>(), b in any::<u32>()) {
			let g = generator(CurveId::Bn254);
			let lhs = g.mul_bigint(&BigInt::from_u64(a as u64 + b as u64));
			let rhs = g.mul_bigint(&BigInt::from_u64(a as u64)).add(&g.mul_bigint(&BigInt::from_u64(b as u64)));
			prop_assert_eq!(lhs, rhs);
		}
	}
}
