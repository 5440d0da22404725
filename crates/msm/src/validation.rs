// Copyright 2025 Irreducible Inc.

use zkaccel_curve::{CurveConfig, CurvePoint, Scalar};
use zkaccel_utils::ensure;

use crate::Error;

/// Checks MSM inputs before any bucket work is done.
///
/// Rejects mismatched lengths, scalars outside `[0, order)`, points of another curve and points
/// off the curve. Errors name the first offending index.
pub fn validate_msm_inputs(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
) -> Result<(), Error> {
	ensure!(
		scalars.len() == points.len(),
		Error::ArrayLengthMismatch {
			scalars: scalars.len(),
			points: points.len(),
		}
	);

	if let Some(index) = scalars
		.iter()
		.position(|scalar| !scalar.is_valid_for(curve.id))
	{
		return Err(Error::ScalarOutOfRange { index });
	}

	for (index, point) in points.iter().enumerate() {
		ensure!(point.curve() == curve.id, Error::CurveMismatch { index });
		ensure!(point.is_on_curve(), Error::InvalidPoint { index });
	}
	Ok(())
}
