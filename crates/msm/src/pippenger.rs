// Copyright 2025 Irreducible Inc.

//! Bucket-method multi-scalar multiplication.
//!
//! Scalars are cut into `w`-bit windows. Within a window, every point is added into the bucket
//! indexed by its scalar's digit, the buckets are collapsed with a running sum into
//! `sum(d * B_d)`, and the per-window results are recombined from the most significant window
//! down by doubling `w` times between windows.

use tracing::{instrument, trace};
use zkaccel_curve::{CurveConfig, CurvePoint, JacobianPoint, Representation, Scalar};
use zkaccel_utils::ensure;

use crate::Error;

pub const MIN_WINDOW_SIZE: usize = 4;
pub const MAX_WINDOW_SIZE: usize = 20;
/// Inputs above this many points have their window capped at [`LARGE_INPUT_MAX_WINDOW_SIZE`].
pub const LARGE_INPUT_THRESHOLD: usize = 1_000_000;
pub const LARGE_INPUT_MAX_WINDOW_SIZE: usize = 16;

/// Heuristic window width for `n` points: `floor(log2 n)` clamped to `[4, 20]`, and to at most
/// 16 bits above a million points to bound bucket memory.
pub fn select_window_size(n: usize) -> usize {
	let log_n = if n == 0 { 0 } else { n.ilog2() as usize };
	let window_size = log_n.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE);
	if n > LARGE_INPUT_THRESHOLD {
		window_size.min(LARGE_INPUT_MAX_WINDOW_SIZE)
	} else {
		window_size
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PippengerConfig {
	/// Window width in bits. Picked by [`select_window_size`] when `None`.
	pub window_size: Option<usize>,
}

impl PippengerConfig {
	pub fn with_window_size(window_size: usize) -> Self {
		Self {
			window_size: Some(window_size),
		}
	}

	/// The window width to use for `n` points.
	pub fn resolve_window_size(&self, n: usize) -> Result<usize, Error> {
		match self.window_size {
			Some(window_size) => {
				ensure!(
					(1..=MAX_WINDOW_SIZE).contains(&window_size),
					Error::InvalidWindowSize { window_size }
				);
				Ok(window_size)
			}
			None => Ok(select_window_size(n)),
		}
	}
}

/// Computes `sum(scalars[i] * points[i])` with an automatically chosen window.
pub fn pippenger_msm(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
) -> Result<CurvePoint, Error> {
	pippenger_msm_with_config(scalars, points, curve, &PippengerConfig::default())
}

/// Computes `sum(scalars[i] * points[i])`.
///
/// The result has the representation of the first input point, or is the Jacobian identity
/// when the input is empty. The result does not depend on the window size.
#[instrument(skip_all, level = "debug", fields(n = scalars.len()))]
pub fn pippenger_msm_with_config(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	config: &PippengerConfig,
) -> Result<CurvePoint, Error> {
	ensure!(
		scalars.len() == points.len(),
		Error::ArrayLengthMismatch {
			scalars: scalars.len(),
			points: points.len(),
		}
	);
	let window_size = config.resolve_window_size(scalars.len())?;

	let Some(first) = points.first() else {
		return Ok(CurvePoint::identity(curve.id, Representation::default()));
	};
	let representation = first.representation();

	if let ([scalar], [point]) = (scalars, points) {
		return Ok(point.scalar_mul(scalar));
	}

	let sum = bucket_sum(scalars, points, curve, window_size);
	Ok(CurvePoint::from_jacobian(sum, representation))
}

fn bucket_sum(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	window_size: usize,
) -> JacobianPoint {
	let pairs = scalars
		.iter()
		.zip(points)
		.filter(|(scalar, point)| !scalar.is_zero() && !point.is_identity())
		.collect::<Vec<_>>();

	let identity = curve.identity();
	if pairs.is_empty() {
		return identity;
	}

	let num_windows = curve.scalar_bits.div_ceil(window_size);
	// A zero digit contributes nothing, so digit `d` lives in bucket `d - 1`.
	let mut buckets = vec![identity; (1 << window_size) - 1];

	let mut result = identity;
	for window in (0..num_windows).rev() {
		let offset = window * window_size;
		for _ in 0..window_size {
			result = result.double();
		}

		buckets.fill(identity);
		for &(scalar, point) in &pairs {
			let digit = scalar.window(offset, window_size) as usize;
			if digit != 0 {
				buckets[digit - 1] = buckets[digit - 1].add_point(point);
			}
		}

		let window_sum = reduce_buckets(&buckets, identity);
		trace!(window, offset, "reduced window buckets");
		result = result.add(&window_sum);
	}
	result
}

/// Collapses buckets `B_1..B_m` into `sum(d * B_d)` with `2m` additions.
fn reduce_buckets(buckets: &[JacobianPoint], identity: JacobianPoint) -> JacobianPoint {
	let mut running_sum = identity;
	let mut result = identity;
	for bucket in buckets.iter().rev() {
		running_sum = running_sum.add(bucket);
		result = result.add(&running_sum);
	}
	result
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use zkaccel_curve::CurveId;

	use super::*;
	use crate::naive_msm;

	#[test]
	fn test_window_heuristic() {
		assert_eq!(select_window_size(0), 4);
		assert_eq!(select_window_size(2), 4);
		assert_eq!(select_window_size(1 << 10), 10);
		assert_eq!(select_window_size((1 << 12) + 5), 12);
		assert_eq!(select_window_size(1 << 19), 19);
		assert_eq!(select_window_size(LARGE_INPUT_THRESHOLD), 19);
		assert_eq!(select_window_size(LARGE_INPUT_THRESHOLD + 1), 16);
		assert_eq!(select_window_size(1 << 30), 16);
	}

	#[test]
	fn test_window_override_bounds() {
		assert_eq!(PippengerConfig::with_window_size(1).resolve_window_size(100).unwrap(), 1);
		assert_eq!(PippengerConfig::with_window_size(20).resolve_window_size(100).unwrap(), 20);
		assert_matches!(
			PippengerConfig::with_window_size(0).resolve_window_size(100),
			Err(Error::InvalidWindowSize { window_size: 0 })
		);
		assert_matches!(
			PippengerConfig::with_window_size(21).resolve_window_size(100),
			Err(Error::InvalidWindowSize { window_size: 21 })
		);
	}

	#[test]
	fn test_reduce_buckets_weights_by_digit() {
		let curve = CurveId::Bn254.config();
		let g = curve.generator.to_jacobian();
		// B_1 = G, B_2 = 0, B_3 = 2G: 1*G + 3*2G = 7G
		let buckets = [g, curve.identity(), g.double()];
		let expected = g.mul_bigint(&7u64.into());
		assert_eq!(reduce_buckets(&buckets, curve.identity()), expected);
	}

	#[test]
	fn test_small_known_sum() {
		let curve = CurveId::Bn254.config();
		let g = curve.generator_point();
		let points = [g, g.double(), g];
		let scalars = [Scalar::from(3u64), Scalar::from(5u64), Scalar::from(0u64)];
		let result = pippenger_msm(&scalars, &points, curve).unwrap();
		assert_eq!(result, g.scalar_mul(&Scalar::from(13u64)));
		assert_eq!(result.representation(), Representation::Affine);
	}

	#[test]
	fn test_matches_naive_for_every_window_size() {
		let curve = CurveId::Bls12_381.config();
		let g = curve.generator_point();
		let points = [
			g,
			g.double(),
			g.double()
				.double()
				.into_representation(Representation::Projective),
		];
		let scalars = [
			"0x1234567890abcdef1234567890abcdef".parse::<Scalar>().unwrap(),
			Scalar::from(u64::MAX),
			Scalar::from(77u64),
		];
		let expected = naive_msm(&scalars, &points, curve).unwrap();
		for window_size in [1, 3, 4, 7, 8, 13] {
			let config = PippengerConfig::with_window_size(window_size);
			assert_eq!(
				pippenger_msm_with_config(&scalars, &points, curve, &config).unwrap(),
				expected,
				"window size {window_size}"
			);
		}
	}

	#[test]
	fn test_identity_points_and_zero_scalars_are_skipped() {
		let curve = CurveId::Bn254.config();
		let g = curve.generator_point();
		let identity = CurvePoint::identity(curve.id, Representation::Jacobian);
		let points = [identity, g, g];
		let scalars = [Scalar::from(9u64), Scalar::ZERO, Scalar::ZERO];
		assert!(pippenger_msm(&scalars, &points, curve).unwrap().is_identity());
	}

	#[test]
	fn test_length_mismatch() {
		let curve = CurveId::Bn254.config();
		let g = curve.generator_point();
		assert_matches!(
			pippenger_msm(&[Scalar::ONE; 3], &[g; 2], curve),
			Err(Error::ArrayLengthMismatch {
				scalars: 3,
				points: 2
			})
		);
	}
}
