// Copyright 2025 Irreducible Inc.

//! Field configurations of the supported pairing-friendly curves.

use lazy_static::lazy_static;

use crate::FieldConfig;

pub const BN254_FQ_MODULUS: &str =
	"0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47";
pub const BN254_FR_MODULUS: &str =
	"0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";
pub const BLS12_381_FQ_MODULUS: &str = "0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab";
pub const BLS12_381_FR_MODULUS: &str =
	"0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";

lazy_static! {
	/// Base field of BN254.
	pub static ref BN254_FQ: FieldConfig =
		FieldConfig::new("bn254_fq", BN254_FQ_MODULUS).expect("BN254 base modulus is a valid prime literal");
	/// Scalar field of BN254.
	pub static ref BN254_FR: FieldConfig =
		FieldConfig::new("bn254_fr", BN254_FR_MODULUS).expect("BN254 scalar modulus is a valid prime literal");
	/// Base field of BLS12-381.
	pub static ref BLS12_381_FQ: FieldConfig =
		FieldConfig::new("bls12_381_fq", BLS12_381_FQ_MODULUS).expect("BLS12-381 base modulus is a valid prime literal");
	/// Scalar field of BLS12-381.
	pub static ref BLS12_381_FR: FieldConfig =
		FieldConfig::new("bls12_381_fr", BLS12_381_FR_MODULUS).expect("BLS12-381 scalar modulus is a valid prime literal");
}
