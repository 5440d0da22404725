// Copyright 2025 Irreducible Inc.

use std::{
	fmt::{self, Display},
	str::FromStr,
};

use lazy_static::lazy_static;
use zkaccel_field::{
	params::{BLS12_381_FQ, BLS12_381_FR, BN254_FQ, BN254_FR},
	BigInt, FieldConfig, FieldElement,
};

use crate::{AffinePoint, CurvePoint, Error, JacobianPoint};

/// The curves the MSM engine knows how to work with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveId {
	Bn254,
	Bls12_381,
}

impl CurveId {
	pub const ALL: [Self; 2] = [Self::Bn254, Self::Bls12_381];

	pub fn config(self) -> &'static CurveConfig {
		match self {
			Self::Bn254 => &*BN254,
			Self::Bls12_381 => &*BLS12_381,
		}
	}

	pub const fn name(self) -> &'static str {
		match self {
			Self::Bn254 => "bn254",
			Self::Bls12_381 => "bls12-381",
		}
	}
}

impl Display for CurveId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for CurveId {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"bn254" | "bn128" | "alt_bn128" => Ok(Self::Bn254),
			"bls12-381" | "bls12_381" | "bls12381" => Ok(Self::Bls12_381),
			_ => Err(Error::UnknownCurve(s.to_string())),
		}
	}
}

/// Static parameters of a short Weierstrass curve `y^2 = x^3 + a x + b`.
#[derive(Clone, Debug)]
pub struct CurveConfig {
	pub id: CurveId,
	pub name: &'static str,
	pub a: FieldElement,
	pub b: FieldElement,
	/// Field of the point coordinates.
	pub field: &'static FieldConfig,
	/// Field the scalars live in; its modulus is the group order.
	pub scalar_field: &'static FieldConfig,
	pub order: BigInt,
	/// Bit length of the group order.
	pub scalar_bits: usize,
	pub generator: AffinePoint,
}

impl CurveConfig {
	/// The group identity in Jacobian coordinates.
	pub fn identity(&self) -> JacobianPoint {
		JacobianPoint::identity(self.id)
	}

	pub fn generator_point(&self) -> CurvePoint {
		CurvePoint::Affine(self.generator)
	}

	/// Whether `a` is zero, which lets doubling skip the `a * Z^4` term.
	pub fn a_is_zero(&self) -> bool {
		self.a.is_zero()
	}

	fn new(
		id: CurveId,
		field: &'static FieldConfig,
		scalar_field: &'static FieldConfig,
		a: u64,
		b: u64,
		generator: (&str, &str),
	) -> Result<Self, Error> {
		let generator = AffinePoint::new_unchecked(
			id,
			FieldElement::from_hex(field, generator.0)?,
			FieldElement::from_hex(field, generator.1)?,
		);
		Ok(Self {
			id,
			name: id.name(),
			a: FieldElement::from_u64(field, a),
			b: FieldElement::from_u64(field, b),
			field,
			scalar_field,
			order: scalar_field.modulus,
			scalar_bits: scalar_field.modulus_bits,
			generator,
		})
	}
}

lazy_static! {
	static ref BN254: CurveConfig =
		CurveConfig::new(CurveId::Bn254, &BN254_FQ, &BN254_FR, 0, 3, ("0x1", "0x2"))
			.expect("BN254 parameters are valid");
	static ref BLS12_381: CurveConfig = CurveConfig::new(
		CurveId::Bls12_381,
		&BLS12_381_FQ,
		&BLS12_381_FR,
		0,
		4,
		(
			"0x17f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb",
			"0x08b3f481e3aaa0f1a09e30ed741d8ae4fcf5e095d5d00af600db18cb2c04b3edd03cc744a2888ae40caa232946c5e7e1",
		),
	)
	.expect("BLS12-381 parameters are valid");
}
