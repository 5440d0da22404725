// Copyright 2025 Irreducible Inc.

use std::{
	sync::atomic::{AtomicUsize, Ordering},
	thread,
	time::{Duration, Instant},
};

use zkaccel_curve::{CurveConfig, CurvePoint, Scalar};
use zkaccel_hal::{Error, GpuMsmBackend, GpuMsmConfig, GpuMsmOutput, GpuStatus};

use crate::fixtures::reference_msm;

fn available_status(name: &str) -> GpuStatus {
	GpuStatus {
		initialized: true,
		device_available: true,
		unified_memory: true,
		device_name: Some(name.to_string()),
		core_count: Some(8),
		max_threads_per_group: Some(256),
		max_buffer_length: None,
	}
}

/// A "GPU" that computes MSMs correctly on the host.
#[derive(Debug, Default)]
pub struct EmulatedGpuBackend {
	calls: AtomicUsize,
	points_processed: AtomicUsize,
	delay: Option<Duration>,
}

impl EmulatedGpuBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sleeps for `delay` on every dispatch, to model a slow device.
	pub fn with_delay(delay: Duration) -> Self {
		Self {
			delay: Some(delay),
			..Self::default()
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn points_processed(&self) -> usize {
		self.points_processed.load(Ordering::SeqCst)
	}
}

impl GpuMsmBackend for EmulatedGpuBackend {
	fn status(&self) -> GpuStatus {
		available_status("emulated")
	}

	fn msm(
		&self,
		scalars: &[Scalar],
		points: &[CurvePoint],
		curve: &CurveConfig,
		_config: &GpuMsmConfig,
	) -> Result<GpuMsmOutput, Error> {
		let start = Instant::now();
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.points_processed
			.fetch_add(points.len(), Ordering::SeqCst);
		if let Some(delay) = self.delay {
			thread::sleep(delay);
		}
		Ok(GpuMsmOutput {
			point: reference_msm(scalars, points, curve.id),
			timing_ms: start.elapsed().as_secs_f64() * 1000.0,
		})
	}
}

/// A GPU that reports itself as available but fails every dispatch.
#[derive(Debug, Default)]
pub struct FailingGpuBackend {
	calls: AtomicUsize,
}

impl FailingGpuBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl GpuMsmBackend for FailingGpuBackend {
	fn status(&self) -> GpuStatus {
		available_status("failing")
	}

	fn msm(
		&self,
		_scalars: &[Scalar],
		points: &[CurvePoint],
		_curve: &CurveConfig,
		_config: &GpuMsmConfig,
	) -> Result<GpuMsmOutput, Error> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Err(Error::Dispatch(format!("refusing to process {} points", points.len())))
	}
}
