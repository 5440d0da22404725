// Copyright 2025 Irreducible Inc.

use std::ops::Neg;

use zkaccel_field::{BigInt, FieldElement};

use crate::{CurveId, Error, JacobianPoint};

/// A point in affine coordinates, with an explicit flag for the point at infinity.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
	pub curve: CurveId,
	pub x: FieldElement,
	pub y: FieldElement,
	pub infinity: bool,
}

impl AffinePoint {
	/// Creates a point, checking the curve equation.
	pub fn new(curve: CurveId, x: FieldElement, y: FieldElement) -> Result<Self, Error> {
		let point = Self::new_unchecked(curve, x, y);
		if !point.is_on_curve() {
			return Err(Error::NotOnCurve);
		}
		Ok(point)
	}

	/// Creates a point without checking the curve equation.
	pub fn new_unchecked(curve: CurveId, x: FieldElement, y: FieldElement) -> Self {
		Self {
			curve,
			x,
			y,
			infinity: false,
		}
	}

	/// Builds a point from canonical coordinates.
	///
	/// Only field membership of the coordinates is checked here; whether the point lies on the
	/// curve is left to [`Self::is_on_curve`] so that callers can validate in bulk.
	pub fn from_bigints(curve: CurveId, x: &BigInt, y: &BigInt) -> Result<Self, Error> {
		let field = curve.config().field;
		Ok(Self::new_unchecked(
			curve,
			FieldElement::from_bigint(field, x)?,
			FieldElement::from_bigint(field, y)?,
		))
	}

	pub fn identity(curve: CurveId) -> Self {
		let field = curve.config().field;
		Self {
			curve,
			x: FieldElement::zero(field),
			y: FieldElement::one(field),
			infinity: true,
		}
	}

	pub fn is_identity(&self) -> bool {
		self.infinity
	}

	/// Checks `y^2 = x^3 + a x + b`. The point at infinity is always on the curve.
	pub fn is_on_curve(&self) -> bool {
		if self.infinity {
			return true;
		}
		let config = self.curve.config();
		if !std::ptr::eq(self.x.config(), config.field) || !std::ptr::eq(self.y.config(), config.field)
		{
			return false;
		}
		let rhs = self.x.square() * self.x + config.a * self.x + config.b;
		self.y.square() == rhs
	}

	pub fn to_jacobian(&self) -> JacobianPoint {
		JacobianPoint::from_affine(self)
	}
}

impl PartialEq for AffinePoint {
	fn eq(&self, other: &Self) -> bool {
		if self.curve != other.curve {
			return false;
		}
		match (self.infinity, other.infinity) {
			(true, true) => true,
			(false, false) => self.x == other.x && self.y == other.y,
			_ => false,
		}
	}
}

impl Eq for AffinePoint {}

impl Neg for AffinePoint {
	type Output = Self;

	fn neg(self) -> Self {
		if self.infinity {
			return self;
		}
		Self { y: -self.y, ..self }
	}
}
