// Copyright 2025 Irreducible Inc.

use std::fmt::Debug;

use auto_impl::auto_impl;
use zkaccel_curve::{CurveConfig, CurvePoint, Scalar};

use crate::Error;

/// Device status reported by a GPU backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GpuStatus {
	pub initialized: bool,
	pub device_available: bool,
	pub unified_memory: bool,
	pub device_name: Option<String>,
	pub core_count: Option<u32>,
	pub max_threads_per_group: Option<u32>,
	pub max_buffer_length: Option<u64>,
}

impl GpuStatus {
	pub fn unavailable() -> Self {
		Self::default()
	}

	/// Whether MSM work may be dispatched to this device.
	pub fn is_usable(&self) -> bool {
		self.initialized && self.device_available
	}
}

/// Per-call tuning passed through to the GPU kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GpuMsmConfig {
	/// Pippenger window width in bits; the backend picks one when `None`.
	pub window_size: Option<usize>,
}

#[derive(Clone, Copy, Debug)]
pub struct GpuMsmOutput {
	pub point: CurvePoint,
	/// Device-side execution time in milliseconds.
	pub timing_ms: f64,
}

/// An accelerator that computes multi-scalar multiplications.
///
/// Implementations are black boxes to the scheduler: they may be slow, missing, or fail on any
/// call. Inputs are already validated and of equal length.
#[auto_impl(&, Box, Arc)]
pub trait GpuMsmBackend: Send + Sync + Debug {
	fn status(&self) -> GpuStatus;

	fn msm(
		&self,
		scalars: &[Scalar],
		points: &[CurvePoint],
		curve: &CurveConfig,
		config: &GpuMsmConfig,
	) -> Result<GpuMsmOutput, Error>;
}

/// Backend for machines without a usable GPU. Every dispatch fails with [`Error::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGpuBackend;

impl GpuMsmBackend for NoGpuBackend {
	fn status(&self) -> GpuStatus {
		GpuStatus::unavailable()
	}

	fn msm(
		&self,
		_scalars: &[Scalar],
		_points: &[CurvePoint],
		_curve: &CurveConfig,
		_config: &GpuMsmConfig,
	) -> Result<GpuMsmOutput, Error> {
		Err(Error::Unavailable)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use assert_matches::assert_matches;
	use zkaccel_curve::CurveId;

	use super::*;

	fn dispatch(backend: impl GpuMsmBackend) -> Result<GpuMsmOutput, Error> {
		let curve = CurveId::Bn254.config();
		backend.msm(&[Scalar::ONE], &[curve.generator_point()], curve, &GpuMsmConfig::default())
	}

	#[test]
	fn test_no_gpu_backend_always_fails() {
		assert!(!NoGpuBackend.status().is_usable());
		assert_matches!(dispatch(NoGpuBackend), Err(Error::Unavailable));
	}

	#[test]
	fn test_backend_behind_pointers() {
		let shared: Arc<dyn GpuMsmBackend> = Arc::new(NoGpuBackend);
		assert_matches!(dispatch(&shared), Err(Error::Unavailable));
		assert_matches!(dispatch(shared), Err(Error::Unavailable));
	}
}
