// Copyright 2025 Irreducible Inc.

use proptest::prelude::*;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use zkaccel_curve::{CurveId, CurvePoint, Representation, Scalar};

fn random_point(curve: CurveId, seed: u64) -> CurvePoint {
	let mut rng = StdRng::seed_from_u64(seed);
	let scalar = Scalar::from(rng.next_u64() >> 16);
	CurvePoint::generator(curve).scalar_mul(&scalar)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(8))]

	#[test]
	fn test_addition_is_associative_and_commutative(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
		for curve in CurveId::ALL {
			let (p, q, r) = (random_point(curve, a), random_point(curve, b), random_point(curve, c));
			prop_assert_eq!(p.add(&q).add(&r), p.add(&q.add(&r)));
			prop_assert_eq!(p.add(&q), q.add(&p));
		}
	}

	#[test]
	fn test_scalar_mul_is_linear(a in any::<u32>(), b in any::<u32>()) {
		let curve = CurveId::Bls12_381;
		let p = random_point(curve, a as u64 ^ b as u64);
		let sa = Scalar::from(a as u64);
		let sb = Scalar::from(b as u64);
		let sum = Scalar::from(&(sa.to_field(curve).unwrap() + sb.to_field(curve).unwrap()));
		prop_assert_eq!(p.scalar_mul(&sa).add(&p.scalar_mul(&sb)), p.scalar_mul(&sum));
	}
}

#[test]
fn test_results_stay_on_curve_in_every_representation() {
	for curve in CurveId::ALL {
		for repr in [Representation::Affine, Representation::Jacobian, Representation::Projective] {
			let p = random_point(curve, 11).into_representation(repr);
			let q = p.double().add(&p).scalar_mul(&Scalar::from(1_000_003u64));
			assert!(q.is_on_curve());
			assert!(q.to_affine().is_on_curve());
			assert_eq!(q.representation(), repr);
		}
	}
}
