// Copyright 2025 Irreducible Inc.

//! Concurrent CPU + GPU execution of a single MSM.
//!
//! The input is cut into a CPU prefix and a GPU suffix. Both partial sums are computed
//! independently and added, which is valid because an MSM is linear in its terms.

use std::time::Instant;

use tracing::{debug, instrument};
use zkaccel_curve::{CurveConfig, CurvePoint, Scalar};
use zkaccel_hal::{GpuMsmBackend, GpuMsmConfig, HardwareCapabilities};
use zkaccel_utils::ensure;

use crate::{
	calculate_workload_split, pippenger_msm_with_config, Error, PippengerConfig, SplitParameters,
	WorkloadSplit,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HybridOptions {
	pub split: SplitParameters,
	/// Window width for both processors; chosen per partition when `None`.
	pub window_size: Option<usize>,
}

/// A computed MSM together with how the work was distributed and how long each part took.
#[derive(Clone, Copy, Debug)]
pub struct HybridMsmResult {
	pub point: CurvePoint,
	pub cpu_time_ms: f64,
	/// Includes the CPU recomputation when the GPU failed.
	pub gpu_time_ms: f64,
	pub total_time_ms: f64,
	pub cpu_points: usize,
	pub gpu_points: usize,
	pub used_hybrid: bool,
	/// The GPU partition was recomputed on the CPU after a backend failure.
	pub gpu_fallback: bool,
}

impl HybridMsmResult {
	pub(crate) fn cpu_only(point: CurvePoint, num_points: usize, elapsed_ms: f64) -> Self {
		Self {
			point,
			cpu_time_ms: elapsed_ms,
			gpu_time_ms: 0.0,
			total_time_ms: elapsed_ms,
			cpu_points: num_points,
			gpu_points: 0,
			used_hybrid: false,
			gpu_fallback: false,
		}
	}
}

pub(crate) struct PartitionOutput {
	pub point: CurvePoint,
	pub elapsed_ms: f64,
	pub fell_back: bool,
}

fn elapsed_ms(start: Instant) -> f64 {
	start.elapsed().as_secs_f64() * 1000.0
}

pub(crate) fn run_cpu_partition(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	config: &PippengerConfig,
) -> Result<PartitionOutput, Error> {
	let start = Instant::now();
	let point = pippenger_msm_with_config(scalars, points, curve, config)?;
	Ok(PartitionOutput {
		point,
		elapsed_ms: elapsed_ms(start),
		fell_back: false,
	})
}

/// Runs a partition on the GPU, recomputing it on the CPU if the backend fails.
pub(crate) fn run_gpu_partition(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	backend: &dyn GpuMsmBackend,
	config: &PippengerConfig,
) -> Result<PartitionOutput, Error> {
	let start = Instant::now();
	let gpu_config = GpuMsmConfig {
		window_size: config.window_size,
	};
	match backend.msm(scalars, points, curve, &gpu_config) {
		Ok(output) => Ok(PartitionOutput {
			point: output.point,
			elapsed_ms: elapsed_ms(start),
			fell_back: false,
		}),
		Err(err) => {
			debug!(
				%err,
				num_points = points.len(),
				"GPU MSM failed, recomputing partition on CPU"
			);
			let point = pippenger_msm_with_config(scalars, points, curve, config)?;
			Ok(PartitionOutput {
				point,
				elapsed_ms: elapsed_ms(start),
				fell_back: true,
			})
		}
	}
}

/// Splits an MSM between the CPU and `backend` and runs both partitions concurrently.
///
/// When the split leaves one side empty the other one runs alone, without a parallel dispatch.
/// A failing GPU partition is recomputed on the CPU; only CPU errors are returned.
#[instrument(skip_all, level = "debug", fields(n = scalars.len()))]
pub fn hybrid_msm(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	backend: &dyn GpuMsmBackend,
	caps: &HardwareCapabilities,
	options: &HybridOptions,
) -> Result<HybridMsmResult, Error> {
	execute(scalars, points, curve, backend, caps, options, true)
}

/// Same as [`hybrid_msm`] but runs the partitions one after the other on the calling thread.
#[instrument(skip_all, level = "debug", fields(n = scalars.len()))]
pub fn hybrid_msm_sync(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	backend: &dyn GpuMsmBackend,
	caps: &HardwareCapabilities,
	options: &HybridOptions,
) -> Result<HybridMsmResult, Error> {
	execute(scalars, points, curve, backend, caps, options, false)
}

fn execute(
	scalars: &[Scalar],
	points: &[CurvePoint],
	curve: &CurveConfig,
	backend: &dyn GpuMsmBackend,
	caps: &HardwareCapabilities,
	options: &HybridOptions,
	concurrent: bool,
) -> Result<HybridMsmResult, Error> {
	ensure!(
		scalars.len() == points.len(),
		Error::ArrayLengthMismatch {
			scalars: scalars.len(),
			points: points.len(),
		}
	);
	let pippenger = PippengerConfig {
		window_size: options.window_size,
	};
	pippenger.resolve_window_size(scalars.len())?;

	let split = calculate_workload_split(scalars.len(), &options.split, caps)?;
	debug!(
		cpu_points = split.cpu_points,
		gpu_points = split.gpu_points,
		reason = %split.reason,
		estimated_time_ms = split.estimated_time_ms,
		"computed workload split"
	);

	let start = Instant::now();
	let WorkloadSplit {
		gpu_start_index,
		use_hybrid,
		..
	} = split;

	if split.gpu_points == 0 {
		let cpu = run_cpu_partition(scalars, points, curve, &pippenger)?;
		return Ok(HybridMsmResult::cpu_only(cpu.point, scalars.len(), elapsed_ms(start)));
	}

	let (cpu_scalars, gpu_scalars) = scalars.split_at(gpu_start_index);
	let (cpu_points, gpu_points) = points.split_at(gpu_start_index);
	let representation = points[0].representation();

	let cpu_task = || run_cpu_partition(cpu_scalars, cpu_points, curve, &pippenger);
	let gpu_task = || run_gpu_partition(gpu_scalars, gpu_points, curve, backend, &pippenger);

	let (cpu, gpu) = if !use_hybrid {
		(None, gpu_task()?)
	} else if concurrent {
		let (cpu, gpu) = rayon::join(cpu_task, gpu_task);
		(Some(cpu?), gpu?)
	} else {
		(Some(cpu_task()?), gpu_task()?)
	};

	let point = match &cpu {
		Some(cpu) => cpu.point.add(&gpu.point),
		None => gpu.point,
	};
	Ok(HybridMsmResult {
		point: point.into_representation(representation),
		cpu_time_ms: cpu.as_ref().map_or(0.0, |cpu| cpu.elapsed_ms),
		gpu_time_ms: gpu.elapsed_ms,
		total_time_ms: elapsed_ms(start),
		cpu_points: split.cpu_points,
		gpu_points: split.gpu_points,
		used_hybrid: use_hybrid,
		gpu_fallback: gpu.fell_back,
	})
}

#[cfg(test)]
mod tests {
	use zkaccel_curve::CurveId;
	use zkaccel_hal::NoGpuBackend;

	use super::*;
	use crate::{pippenger_msm, PerformanceModel};

	fn inputs(curve: &CurveConfig, n: u64) -> (Vec<Scalar>, Vec<CurvePoint>) {
		let g = curve.generator_point();
		let mut points = Vec::new();
		let mut acc = g;
		for _ in 0..n {
			points.push(acc);
			acc = acc.add(&g);
		}
		let scalars = (0..n).map(|i| Scalar::from(i * i + 3)).collect();
		(scalars, points)
	}

	#[test]
	fn test_sync_without_gpu_matches_pippenger() {
		let curve = CurveId::Bn254.config();
		let (scalars, points) = inputs(curve, 20);
		let caps = HardwareCapabilities::cpu_only(4);
		let options = HybridOptions {
			split: SplitParameters::new(PerformanceModel::uncalibrated(&caps)),
			window_size: None,
		};

		let result =
			hybrid_msm_sync(&scalars, &points, curve, &NoGpuBackend, &caps, &options).unwrap();
		assert_eq!(result.point, pippenger_msm(&scalars, &points, curve).unwrap());
		assert_eq!(result.cpu_points + result.gpu_points, 20);
		assert!(!result.used_hybrid);
		assert!(!result.gpu_fallback);
	}

	#[test]
	fn test_failing_gpu_partition_falls_back_to_cpu() {
		let curve = CurveId::Bls12_381.config();
		let (scalars, points) = inputs(curve, 12);
		// Claims a GPU, but the backend refuses every dispatch.
		let caps = HardwareCapabilities {
			has_gpu: true,
			..HardwareCapabilities::cpu_only(4)
		};
		let options = HybridOptions {
			split: SplitParameters {
				min_gpu_points: 1,
				split_ratio: Some(0.5),
				..SplitParameters::new(PerformanceModel::uncalibrated(&caps))
			},
			window_size: Some(5),
		};

		for run in [hybrid_msm, hybrid_msm_sync] {
			let result = run(&scalars, &points, curve, &NoGpuBackend, &caps, &options).unwrap();
			assert!(result.used_hybrid);
			assert!(result.gpu_fallback);
			assert_eq!(result.gpu_points, 6);
			assert_eq!(result.point, pippenger_msm(&scalars, &points, curve).unwrap());
		}
	}
}
