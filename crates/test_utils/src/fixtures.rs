// Copyright 2025 Irreducible Inc.

use std::iter::{repeat_with, successors};

use rand::RngCore;
use zkaccel_curve::{CurveId, CurvePoint, Representation, Scalar};

pub const REPRESENTATIONS: [Representation; 3] =
	[Representation::Affine, Representation::Jacobian, Representation::Projective];

pub fn random_scalars(curve: CurveId, n: usize, mut rng: impl RngCore) -> Vec<Scalar> {
	repeat_with(|| Scalar::random(curve, &mut rng))
		.take(n)
		.collect()
}

/// `n` distinct-looking points `A, A + B, A + 2B, ...` for random multiples `A`, `B` of the
/// generator, all in the given representation.
pub fn random_points(
	curve: CurveId,
	n: usize,
	representation: Representation,
	mut rng: impl RngCore,
) -> Vec<CurvePoint> {
	let g = CurvePoint::generator(curve).into_representation(Representation::Jacobian);
	let start = g.scalar_mul(&Scalar::random(curve, &mut rng));
	let step = g.scalar_mul(&Scalar::random(curve, &mut rng));
	successors(Some(start), |point| Some(point.add(&step)))
		.take(n)
		.map(|point| point.into_representation(representation))
		.collect()
}

/// `G, 2G, ..., nG` in Jacobian form.
pub fn generator_multiples(curve: CurveId, n: usize) -> Vec<CurvePoint> {
	let g = CurvePoint::generator(curve);
	successors(Some(g.into_representation(Representation::Jacobian)), |point| {
		Some(point.add(&g))
	})
	.take(n)
	.collect()
}

/// Sum of per-pair scalar multiplications, independent of any MSM engine.
pub fn reference_msm(scalars: &[Scalar], points: &[CurvePoint], curve: CurveId) -> CurvePoint {
	assert_eq!(scalars.len(), points.len());
	scalars.iter().zip(points).fold(
		CurvePoint::identity(curve, Representation::Jacobian),
		|acc, (scalar, point)| acc.add(&point.scalar_mul(scalar)),
	)
}
