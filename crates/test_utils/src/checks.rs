// Copyright 2025 Irreducible Inc.

use rand::{rngs::StdRng, SeedableRng};
use zkaccel_curve::{CurveConfig, CurveId, CurvePoint, Scalar};

use crate::fixtures::{random_points, random_scalars, reference_msm, REPRESENTATIONS};

/// Checks an MSM implementation against [`reference_msm`] on random inputs of size `n`, once
/// per point representation.
///
/// The result must equal the reference sum and come back in the representation of the first
/// input point.
pub fn test_generic_msm_matches_reference<E: std::fmt::Debug>(
	msm: impl Fn(&[Scalar], &[CurvePoint], &CurveConfig) -> Result<CurvePoint, E>,
	curve: CurveId,
	n: usize,
	seed: u64,
) {
	let mut rng = StdRng::seed_from_u64(seed);
	for representation in REPRESENTATIONS {
		let scalars = random_scalars(curve, n, &mut rng);
		let points = random_points(curve, n, representation, &mut rng);

		let result = msm(&scalars, &points, curve.config()).unwrap();
		assert_eq!(result, reference_msm(&scalars, &points, curve));
		if n > 0 {
			assert_eq!(result.representation(), representation);
		}
	}
}

/// Checks that an MSM implementation maps all-zero scalars to the identity.
pub fn test_generic_zero_scalars_give_identity<E: std::fmt::Debug>(
	msm: impl Fn(&[Scalar], &[CurvePoint], &CurveConfig) -> Result<CurvePoint, E>,
	curve: CurveId,
	n: usize,
	seed: u64,
) {
	let mut rng = StdRng::seed_from_u64(seed);
	let points = random_points(curve, n, Default::default(), &mut rng);
	let result = msm(&vec![Scalar::ZERO; n], &points, curve.config()).unwrap();
	assert!(result.is_identity());
}
