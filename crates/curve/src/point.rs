// Copyright 2025 Irreducible Inc.

use std::ops::Neg;

use crate::{AffinePoint, CurveId, JacobianPoint, ProjectivePoint, Scalar};

/// Coordinate system of a [`CurvePoint`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Representation {
	Affine,
	#[default]
	Jacobian,
	Projective,
}

/// A curve point in any of the supported coordinate systems.
///
/// Group operations return their result in the representation of `self`. Equality compares
/// group elements, so points in different representations can be equal.
#[derive(Clone, Copy, Debug)]
pub enum CurvePoint {
	Affine(AffinePoint),
	Jacobian(JacobianPoint),
	Projective(ProjectivePoint),
}

impl CurvePoint {
	pub fn identity(curve: CurveId, representation: Representation) -> Self {
		Self::from_jacobian(JacobianPoint::identity(curve), representation)
	}

	pub fn generator(curve: CurveId) -> Self {
		Self::Affine(curve.config().generator)
	}

	/// Converts a Jacobian point into the requested representation.
	pub fn from_jacobian(point: JacobianPoint, representation: Representation) -> Self {
		match representation {
			Representation::Affine => Self::Affine(point.to_affine()),
			Representation::Jacobian => Self::Jacobian(point),
			Representation::Projective => Self::Projective(ProjectivePoint::from_jacobian(&point)),
		}
	}

	#[must_use]
	pub fn into_representation(self, representation: Representation) -> Self {
		if self.representation() == representation {
			return self;
		}
		match (self, representation) {
			(Self::Affine(point), Representation::Projective) => {
				Self::Projective(ProjectivePoint::from_affine(&point))
			}
			(Self::Projective(point), Representation::Affine) => Self::Affine(point.to_affine()),
			_ => Self::from_jacobian(self.to_jacobian(), representation),
		}
	}

	pub fn curve(&self) -> CurveId {
		match self {
			Self::Affine(point) => point.curve,
			Self::Jacobian(point) => point.curve,
			Self::Projective(point) => point.curve,
		}
	}

	pub fn representation(&self) -> Representation {
		match self {
			Self::Affine(_) => Representation::Affine,
			Self::Jacobian(_) => Representation::Jacobian,
			Self::Projective(_) => Representation::Projective,
		}
	}

	pub fn to_jacobian(&self) -> JacobianPoint {
		match self {
			Self::Affine(point) => point.to_jacobian(),
			Self::Jacobian(point) => *point,
			Self::Projective(point) => point.to_jacobian(),
		}
	}

	pub fn to_affine(&self) -> AffinePoint {
		match self {
			Self::Affine(point) => *point,
			Self::Jacobian(point) => point.to_affine(),
			Self::Projective(point) => point.to_affine(),
		}
	}

	pub fn is_identity(&self) -> bool {
		match self {
			Self::Affine(point) => point.is_identity(),
			Self::Jacobian(point) => point.is_identity(),
			Self::Projective(point) => point.is_identity(),
		}
	}

	pub fn is_on_curve(&self) -> bool {
		match self {
			Self::Affine(point) => point.is_on_curve(),
			Self::Jacobian(point) => point.is_on_curve(),
			Self::Projective(point) => point.to_jacobian().is_on_curve(),
		}
	}

	#[must_use]
	pub fn add(&self, other: &Self) -> Self {
		let sum = self.to_jacobian().add_point(other);
		Self::from_jacobian(sum, self.representation())
	}

	#[must_use]
	pub fn double(&self) -> Self {
		Self::from_jacobian(self.to_jacobian().double(), self.representation())
	}

	#[must_use]
	pub fn scalar_mul(&self, scalar: &Scalar) -> Self {
		let product = self.to_jacobian().mul_bigint(scalar.as_bigint());
		Self::from_jacobian(product, self.representation())
	}
}

impl PartialEq for CurvePoint {
	fn eq(&self, other: &Self) -> bool {
		self.to_jacobian() == other.to_jacobian()
	}
}

impl Eq for CurvePoint {}

impl Neg for CurvePoint {
	type Output = Self;

	fn neg(self) -> Self {
		match self {
			Self::Affine(point) => Self::Affine(-point),
			Self::Jacobian(point) => Self::Jacobian(-point),
			Self::Projective(point) => Self::Projective(ProjectivePoint {
				y: -point.y,
				..point
			}),
		}
	}
}

impl From<AffinePoint> for CurvePoint {
	fn from(point: AffinePoint) -> Self {
		Self::Affine(point)
	}
}

impl From<JacobianPoint> for CurvePoint {
	fn from(point: JacobianPoint) -> Self {
		Self::Jacobian(point)
	}
}

impl From<ProjectivePoint> for CurvePoint {
	fn from(point: ProjectivePoint) -> Self {
		Self::Projective(point)
	}
}
