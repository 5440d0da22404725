// Copyright 2025 Irreducible Inc.

use std::{sync::Arc, time::Instant};

use tracing::{debug, instrument};
use zkaccel_curve::{CurveConfig, CurvePoint, Scalar};
use zkaccel_hal::{
	detect_hardware_capabilities, make_backend, GpuMsmBackend, HardwareCapabilities,
	HardwareProbe,
};
use zkaccel_utils::ensure;

use crate::{
	hybrid::{run_cpu_partition, run_gpu_partition},
	hybrid_msm, run_calibration, select_path, validate_msm_inputs, AccelerationPath,
	CalibrationCache, CalibrationConfig, CalibrationResult, Error, HardwareFingerprint,
	HybridMsmResult, HybridOptions, MsmOptions, PerformanceModel, PippengerConfig, RouterConfig,
	SplitParameters,
};

/// The result of [`MsmContext::msm`].
#[derive(Clone, Copy, Debug)]
pub struct MsmOutput {
	pub path: AccelerationPath,
	pub report: HybridMsmResult,
}

impl MsmOutput {
	pub fn point(&self) -> CurvePoint {
		self.report.point
	}
}

/// Entry point for accelerated MSMs.
///
/// Owns the state shared between calls: the GPU backend, the cached hardware snapshot and the
/// cached calibration result. One context is meant to be shared by all callers in a process.
#[derive(Debug)]
pub struct MsmContext {
	backend: Arc<dyn GpuMsmBackend>,
	probe: HardwareProbe,
	calibration: CalibrationCache,
}

impl Default for MsmContext {
	fn default() -> Self {
		Self::new(Arc::new(make_backend()))
	}
}

impl MsmContext {
	pub fn new(backend: Arc<dyn GpuMsmBackend>) -> Self {
		Self {
			backend,
			probe: HardwareProbe::new(),
			calibration: CalibrationCache::new(),
		}
	}

	/// A context that uses `caps` instead of probing the machine.
	pub fn with_capabilities(backend: Arc<dyn GpuMsmBackend>, caps: HardwareCapabilities) -> Self {
		Self {
			backend,
			probe: HardwareProbe::with_snapshot(caps),
			calibration: CalibrationCache::new(),
		}
	}

	pub fn backend(&self) -> &dyn GpuMsmBackend {
		&*self.backend
	}

	pub fn capabilities(&self) -> Arc<HardwareCapabilities> {
		self.probe
			.get_or_detect(|| detect_hardware_capabilities(&self.backend.status()))
	}

	/// Pins the hardware snapshot to `caps` until the next refresh.
	pub fn set_capabilities(&self, caps: HardwareCapabilities) {
		self.probe.set(caps);
	}

	/// Drops the hardware snapshot so the next call probes again.
	pub fn refresh_capabilities(&self) {
		self.probe.clear();
	}

	pub fn calibration(&self) -> Option<Arc<CalibrationResult>> {
		self.calibration.get()
	}

	pub fn needs_calibration(&self) -> bool {
		let fingerprint = HardwareFingerprint::from(&*self.capabilities());
		self.calibration.needs_calibration(&fingerprint)
	}

	pub fn reset_calibration(&self) {
		self.calibration.reset();
	}

	/// Benchmarks this machine and caches the result.
	///
	/// Fails with [`Error::CalibrationInProgress`] while another calibration is running.
	pub fn calibrate(
		&self,
		curve: &CurveConfig,
		config: &CalibrationConfig,
	) -> Result<Arc<CalibrationResult>, Error> {
		let _running = self.calibration.try_begin_run()?;
		let caps = self.capabilities();
		let result = run_calibration(curve, config, self.backend(), &caps)?;
		debug!(
			optimal_gpu_ratio = result.optimal_gpu_ratio,
			cpu_time_per_point_us = result.cpu_time_per_point_us,
			gpu_time_per_point_us = result.gpu_time_per_point_us,
			"calibration finished"
		);
		Ok(self.calibration.store(result))
	}

	/// The calibrated model for the current hardware, or the built-in estimates.
	pub fn performance_model(&self) -> PerformanceModel {
		let caps = self.capabilities();
		match self.calibration.get_matching(&HardwareFingerprint::from(&*caps)) {
			Some(result) => PerformanceModel::from_calibration(&result),
			None => PerformanceModel::uncalibrated(&caps),
		}
	}

	/// Computes `sum(scalars[i] * points[i])` on the path chosen for the input size, the hint in
	/// `options` and the hardware.
	///
	/// GPU failures are never returned: the affected work is recomputed on the CPU.
	#[instrument(skip_all, level = "debug", fields(n = scalars.len(), curve = %curve.id))]
	pub fn msm(
		&self,
		scalars: &[Scalar],
		points: &[CurvePoint],
		curve: &CurveConfig,
		options: &MsmOptions,
	) -> Result<MsmOutput, Error> {
		if options.validate_inputs {
			validate_msm_inputs(scalars, points, curve)?;
		} else {
			ensure!(
				scalars.len() == points.len(),
				Error::ArrayLengthMismatch {
					scalars: scalars.len(),
					points: points.len(),
				}
			);
		}
		if let Some(ratio) = options.split_ratio {
			ensure!((0.0..=1.0).contains(&ratio), Error::InvalidSplitRatio { ratio });
		}

		let caps = self.capabilities();
		let path = select_path(scalars.len(), &RouterConfig::from(options), &caps);
		let pippenger = PippengerConfig {
			window_size: options.window_size,
		};

		let report = match path {
			AccelerationPath::Cpu => {
				let start = Instant::now();
				let cpu = run_cpu_partition(scalars, points, curve, &pippenger)?;
				HybridMsmResult::cpu_only(cpu.point, scalars.len(), elapsed_ms(start))
			}
			AccelerationPath::Gpu => {
				pippenger.resolve_window_size(scalars.len())?;
				let gpu = run_gpu_partition(scalars, points, curve, self.backend(), &pippenger)?;
				let representation = points
					.first()
					.map_or(gpu.point.representation(), CurvePoint::representation);
				HybridMsmResult {
					point: gpu.point.into_representation(representation),
					cpu_time_ms: 0.0,
					gpu_time_ms: gpu.elapsed_ms,
					total_time_ms: gpu.elapsed_ms,
					cpu_points: 0,
					gpu_points: scalars.len(),
					used_hybrid: false,
					gpu_fallback: gpu.fell_back,
				}
			}
			AccelerationPath::Hybrid => {
				let hybrid = HybridOptions {
					split: SplitParameters {
						min_gpu_points: options.min_gpu_points,
						split_ratio: options.split_ratio,
						model: self.performance_model(),
					},
					window_size: options.window_size,
				};
				hybrid_msm(scalars, points, curve, self.backend(), &caps, &hybrid)?
			}
		};
		Ok(MsmOutput { path, report })
	}
}

fn elapsed_ms(start: Instant) -> f64 {
	start.elapsed().as_secs_f64() * 1000.0
}
