// Copyright 2025 Irreducible Inc.

use tracing::instrument;
use zkaccel_curve::{CurveConfig, CurvePoint, Representation, Scalar};
use zkaccel_utils::ensure;

use crate::Error;

/// Reference MSM: one double-and-add scalar multiplication per pair, summed.
///
/// Used as the oracle for the bucket method in tests and benchmarks. The result has the
/// representation of the first input point.
#[instrument(skip_all, level = "debug", fields(n = scalars.len()))]
pub fn naive_msm(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
) -> Result<CurvePoint, Error> {
	ensure!(
		scalars.len() == points.len(),
		Error::ArrayLengthMismatch {
			scalars: scalars.len(),
			points: points.len(),
		}
	);

	let representation = points
		.first()
		.map_or(Representation::default(), CurvePoint::representation);
	let sum = scalars
		.iter()
		.zip(points)
		.fold(curve.identity(), |acc, (scalar, point)| {
			acc.add(&point.to_jacobian().mul_bigint(scalar.as_bigint()))
		});
	Ok(CurvePoint::from_jacobian(sum, representation))
}
