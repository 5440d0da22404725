// Copyright 2025 Irreducible Inc.

use zkaccel_field::FieldElement;

use crate::{AffinePoint, CurveId, JacobianPoint};

/// A point in homogeneous projective coordinates: `(X, Y, Z)` represents `(X / Z, Y / Z)`.
///
/// Arithmetic goes through [`JacobianPoint`]; the conversions in both directions are
/// inversion-free.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
	pub curve: CurveId,
	pub x: FieldElement,
	pub y: FieldElement,
	pub z: FieldElement,
}

impl ProjectivePoint {
	pub fn identity(curve: CurveId) -> Self {
		let field = curve.config().field;
		Self {
			curve,
			x: FieldElement::zero(field),
			y: FieldElement::one(field),
			z: FieldElement::zero(field),
		}
	}

	pub fn is_identity(&self) -> bool {
		self.z.is_zero()
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

	/// `(X, Y, Z)` in Jacobian form maps to `(X Z, Y, Z^3)`.
	pub fn from_jacobian(point: &JacobianPoint) -> Self {
		if point.is_identity() {
			return Self::identity(point.curve);
		}
		Self {
			curve: point.curve,
			x: point.x * point.z,
			y: point.y,
			z: point.z.square() * point.z,
		}
	}

	/// `(X, Y, Z)` in projective form maps to `(X Z, Y Z^2, Z)` in Jacobian form.
	pub fn to_jacobian(&self) -> JacobianPoint {
		if self.is_identity() {
			return JacobianPoint::identity(self.curve);
		}
		JacobianPoint {
			curve: self.curve,
			x: self.x * self.z,
			y: self.y * self.z.square(),
			z: self.z,
		}
	}

	pub fn to_affine(&self) -> AffinePoint {
		match self.z.inverse() {
			Ok(z_inv) => AffinePoint::new_unchecked(self.curve, self.x * z_inv, self.y * z_inv),
			Err(_) => AffinePoint::identity(self.curve),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_conversions_preserve_the_point() {
		let g = CurveId::Bn254.config().generator;
		let five_g = g.to_jacobian().double().double().add_affine(&g);

		let projective = ProjectivePoint::from_jacobian(&five_g);
		assert_eq!(projective.to_jacobian(), five_g);
		assert_eq!(projective.to_affine(), five_g.to_affine());
		assert_eq!(ProjectivePoint::from_affine(&g).to_affine(), g);
	}

	#[test]
	fn test_identity_round_trips() {
		let identity = ProjectivePoint::identity(CurveId::Bls12_381);
		assert!(identity.to_jacobian().is_identity());
		assert!(identity.to_affine().is_identity());
		assert!(ProjectivePoint::from_jacobian(&JacobianPoint::identity(CurveId::Bls12_381))
			.is_identity());
	}
}
