// Copyright 2025 Irreducible Inc.

//! Cost model and CPU/GPU partitioning for hybrid execution.

use std::fmt::{self, Display};

use zkaccel_hal::HardwareCapabilities;
use zkaccel_utils::ensure;

use crate::{options::DEFAULT_MIN_GPU_POINTS, CalibrationResult, Error};

const BASE_CPU_TIME_PER_POINT_US: f64 = 50.0;
const SIMD_SPEEDUP: f64 = 0.85;
const MATRIX_COPROCESSOR_SPEEDUP: f64 = 0.7;
const BASE_GPU_TIME_PER_POINT_US: f64 = 5.0;
const BASE_GPU_DISPATCH_OVERHEAD_MS: f64 = 2.0;

/// Number of equal steps in the sweep of candidate GPU ratios `0.0, 0.1, ..., 1.0`.
const RATIO_STEPS: usize = 10;

/// Linear cost model of the two processors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceModel {
	pub cpu_time_per_point_us: f64,
	/// Infinite when the GPU is unusable.
	pub gpu_time_per_point_us: f64,
	pub gpu_dispatch_overhead_ms: f64,
}

impl PerformanceModel {
	/// Built-in estimates, with the CPU figure scaled for the vector and matrix units present.
	pub fn uncalibrated(caps: &HardwareCapabilities) -> Self {
		let mut cpu_time_per_point_us = BASE_CPU_TIME_PER_POINT_US;
		if caps.has_simd_ext {
			cpu_time_per_point_us *= SIMD_SPEEDUP;
		}
		if caps.has_matrix_coprocessor {
			cpu_time_per_point_us *= MATRIX_COPROCESSOR_SPEEDUP;
		}
		Self {
			cpu_time_per_point_us,
			gpu_time_per_point_us: BASE_GPU_TIME_PER_POINT_US,
			gpu_dispatch_overhead_ms: BASE_GPU_DISPATCH_OVERHEAD_MS,
		}
	}

	/// Measured figures, used as they are.
	pub fn from_calibration(result: &CalibrationResult) -> Self {
		Self {
			cpu_time_per_point_us: result.cpu_time_per_point_us,
			gpu_time_per_point_us: result.gpu_time_per_point_us,
			gpu_dispatch_overhead_ms: result.gpu_dispatch_overhead_ms,
		}
	}

	pub fn cpu_time_ms(&self, points: usize) -> f64 {
		points as f64 * self.cpu_time_per_point_us / 1000.0
	}

	/// Zero for an empty partition, otherwise dispatch overhead plus per-point cost.
	pub fn gpu_time_ms(&self, points: usize) -> f64 {
		if points == 0 {
			return 0.0;
		}
		self.gpu_dispatch_overhead_ms + points as f64 * self.gpu_time_per_point_us / 1000.0
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitParameters {
	/// GPU partitions smaller than this, other than empty ones, are never chosen.
	pub min_gpu_points: usize,
	/// Fixed fraction of points for the GPU; the model picks one when `None`.
	pub split_ratio: Option<f64>,
	pub model: PerformanceModel,
}

impl SplitParameters {
	pub fn new(model: PerformanceModel) -> Self {
		Self {
			min_gpu_points: DEFAULT_MIN_GPU_POINTS,
			split_ratio: None,
			model,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitReason {
	NoGpu,
	BelowMinGpuPoints,
	FixedRatio,
	CpuFastest,
	GpuFastest,
	Balanced,
}

impl Display for SplitReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::NoGpu => "no GPU available",
			Self::BelowMinGpuPoints => "input smaller than the minimum GPU partition",
			Self::FixedRatio => "caller-provided split ratio",
			Self::CpuFastest => "CPU alone is fastest",
			Self::GpuFastest => "GPU alone is fastest",
			Self::Balanced => "concurrent split is fastest",
		})
	}
}

/// How the points of one MSM are divided.
///
/// The CPU takes the prefix `[0, cpu_points)` and the GPU the suffix starting at
/// `gpu_start_index`, so the two always cover the input exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkloadSplit {
	pub cpu_points: usize,
	pub gpu_points: usize,
	pub gpu_start_index: usize,
	/// Both partitions are non-empty and run concurrently.
	pub use_hybrid: bool,
	pub gpu_ratio: f64,
	pub estimated_time_ms: f64,
	pub reason: SplitReason,
}

impl WorkloadSplit {
	fn new(
		num_points: usize,
		gpu_points: usize,
		model: &PerformanceModel,
		reason: SplitReason,
	) -> Self {
		let cpu_points = num_points - gpu_points;
		let gpu_ratio = if num_points == 0 {
			0.0
		} else {
			gpu_points as f64 / num_points as f64
		};
		Self {
			cpu_points,
			gpu_points,
			gpu_start_index: cpu_points,
			use_hybrid: cpu_points > 0 && gpu_points > 0,
			gpu_ratio,
			estimated_time_ms: estimate_time_ms(model, cpu_points, gpu_points),
			reason,
		}
	}

	pub fn cpu_only(num_points: usize, model: &PerformanceModel, reason: SplitReason) -> Self {
		Self::new(num_points, 0, model, reason)
	}
}

/// The partitions run concurrently, so the slower one determines the wall time.
fn estimate_time_ms(model: &PerformanceModel, cpu_points: usize, gpu_points: usize) -> f64 {
	model
		.cpu_time_ms(cpu_points)
		.max(model.gpu_time_ms(gpu_points))
}

fn gpu_points_for_ratio(num_points: usize, ratio: f64) -> usize {
	((num_points as f64 * ratio).round() as usize).min(num_points)
}

/// Chooses how many of `num_points` points go to the GPU.
///
/// Sweeps the GPU ratios `0.0, 0.1, ..., 1.0`, skips those that would give the GPU a non-empty
/// partition below `min_gpu_points`, and keeps the one with the lowest estimated wall time. Ties
/// go to the lower ratio. A fixed `split_ratio` replaces the sweep but is still subject to the
/// minimum partition size.
pub fn calculate_workload_split(
	num_points: usize,
	params: &SplitParameters,
	caps: &HardwareCapabilities,
) -> Result<WorkloadSplit, Error> {
	if let Some(ratio) = params.split_ratio {
		ensure!((0.0..=1.0).contains(&ratio), Error::InvalidSplitRatio { ratio });
	}

	let model = &params.model;
	if !caps.has_gpu {
		return Ok(WorkloadSplit::cpu_only(num_points, model, SplitReason::NoGpu));
	}
	if num_points < params.min_gpu_points {
		return Ok(WorkloadSplit::cpu_only(num_points, model, SplitReason::BelowMinGpuPoints));
	}

	let admissible = |gpu_points: usize| gpu_points == 0 || gpu_points >= params.min_gpu_points;

	if let Some(ratio) = params.split_ratio {
		let gpu_points = gpu_points_for_ratio(num_points, ratio);
		let gpu_points = if admissible(gpu_points) { gpu_points } else { 0 };
		return Ok(WorkloadSplit::new(num_points, gpu_points, model, SplitReason::FixedRatio));
	}

	let mut best_gpu_points = 0;
	let mut best_time = estimate_time_ms(model, num_points, 0);
	for step in 1..=RATIO_STEPS {
		let gpu_points = gpu_points_for_ratio(num_points, step as f64 / RATIO_STEPS as f64);
		if !admissible(gpu_points) {
			continue;
		}
		let time = estimate_time_ms(model, num_points - gpu_points, gpu_points);
		if time < best_time {
			best_time = time;
			best_gpu_points = gpu_points;
		}
	}

	let reason = match best_gpu_points {
		0 => SplitReason::CpuFastest,
		n if n == num_points => SplitReason::GpuFastest,
		_ => SplitReason::Balanced,
	};
	Ok(WorkloadSplit::new(num_points, best_gpu_points, model, reason))
}
