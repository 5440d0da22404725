// Copyright 2025 Irreducible Inc.

//! Measures CPU and GPU MSM throughput on the running machine and derives the GPU share that
//! balances the two.

use std::{
	sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError},
	time::{Instant, SystemTime, UNIX_EPOCH},
};

use itertools::{Itertools, MinMaxResult};
use tracing::{debug, instrument, warn};
use zkaccel_curve::{CurveConfig, CurvePoint, FieldElement, JacobianPoint, Scalar};
use zkaccel_hal::{GpuMsmBackend, GpuMsmConfig, HardwareCapabilities};

use crate::{pippenger_msm, Error, PerformanceModel};

pub const DEFAULT_SAMPLE_SIZES: [usize; 3] = [1024, 4096, 16384];
pub const DEFAULT_REPRESENTATIVE_SIZE: usize = 1 << 20;

/// A GPU slower than this many times the CPU per point is not worth dispatching to.
const MAX_GPU_SLOWDOWN: f64 = 2.0;

/// Arbitrary full-width seed for the synthetic benchmark scalars.
const SCALAR_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalibrationConfig {
	/// Input sizes to benchmark. Zero entries are ignored.
	pub sample_sizes: Vec<usize>,
	/// Timed repetitions per size and processor.
	pub iterations: usize,
	/// Untimed repetitions before the timed ones.
	pub warmup_iterations: usize,
	/// Input size at which the optimal ratio is solved for.
	pub representative_size: usize,
}

impl Default for CalibrationConfig {
	fn default() -> Self {
		Self {
			sample_sizes: DEFAULT_SAMPLE_SIZES.to_vec(),
			iterations: 3,
			warmup_iterations: 1,
			representative_size: DEFAULT_REPRESENTATIVE_SIZE,
		}
	}
}

/// The hardware facts a calibration result depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HardwareFingerprint {
	pub has_gpu: bool,
	pub has_matrix_coprocessor: bool,
	pub has_simd_ext: bool,
}

impl From<&HardwareCapabilities> for HardwareFingerprint {
	fn from(caps: &HardwareCapabilities) -> Self {
		Self {
			has_gpu: caps.has_gpu,
			has_matrix_coprocessor: caps.has_matrix_coprocessor,
			has_simd_ext: caps.has_simd_ext,
		}
	}
}

/// Mean wall times measured for one input size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationSample {
	pub num_points: usize,
	pub cpu_time_ms: f64,
	/// Infinite when the GPU is absent or failed.
	pub gpu_time_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationResult {
	/// Share of points to give the GPU, in `[0, 1]`.
	pub optimal_gpu_ratio: f64,
	pub cpu_time_per_point_us: f64,
	/// Infinite when the GPU is absent or failed during benchmarking.
	pub gpu_time_per_point_us: f64,
	pub gpu_dispatch_overhead_ms: f64,
	pub hardware_fingerprint: HardwareFingerprint,
	/// Seconds since the Unix epoch.
	pub timestamp: u64,
	pub samples: Vec<CalibrationSample>,
}

/// Process-shared calibration state: the latest result and a guard against concurrent runs.
#[derive(Debug, Default)]
pub struct CalibrationCache {
	result: RwLock<Option<Arc<CalibrationResult>>>,
	running: Mutex<()>,
}

impl CalibrationCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self) -> Option<Arc<CalibrationResult>> {
		self.result
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// The cached result, if it was measured on hardware with this fingerprint.
	pub fn get_matching(&self, fingerprint: &HardwareFingerprint) -> Option<Arc<CalibrationResult>> {
		self.get()
			.filter(|result| result.hardware_fingerprint == *fingerprint)
	}

	pub fn store(&self, result: CalibrationResult) -> Arc<CalibrationResult> {
		let result = Arc::new(result);
		*self.result.write().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
		result
	}

	pub fn reset(&self) {
		*self.result.write().unwrap_or_else(PoisonError::into_inner) = None;
	}

	/// Whether there is no result for hardware with this fingerprint.
	pub fn needs_calibration(&self, fingerprint: &HardwareFingerprint) -> bool {
		self.get_matching(fingerprint).is_none()
	}

	/// Claims the right to run a calibration until the guard is dropped.
	pub fn try_begin_run(&self) -> Result<MutexGuard<'_, ()>, Error> {
		match self.running.try_lock() {
			Ok(guard) => Ok(guard),
			Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
			Err(TryLockError::WouldBlock) => Err(Error::CalibrationInProgress),
		}
	}
}

/// Solves `(1 - r) n c = o + r n g` for the GPU share `r` at `n` points, where `c` and `g` are
/// the per-point costs and `o` the dispatch overhead.
///
/// The result is clamped to `[0, 1]`. It is zero when the GPU is unusable or more than twice as
/// slow per point as the CPU.
pub fn optimal_gpu_ratio(model: &PerformanceModel, num_points: usize) -> f64 {
	let cpu_us = model.cpu_time_per_point_us;
	let gpu_us = model.gpu_time_per_point_us;
	if !gpu_us.is_finite() || gpu_us > MAX_GPU_SLOWDOWN * cpu_us {
		return 0.0;
	}

	let n = num_points as f64;
	let overhead_us = model.gpu_dispatch_overhead_ms * 1000.0;
	let ratio = (n * cpu_us - overhead_us) / (n * (cpu_us + gpu_us));
	if ratio.is_nan() {
		0.0
	} else {
		ratio.clamp(0.0, 1.0)
	}
}

/// Deterministic benchmark inputs: full-width scalars and the multiples `G, 2G, ..., nG`.
fn benchmark_inputs(curve: &CurveConfig, num_points: usize) -> (Vec<Scalar>, Vec<CurvePoint>) {
	let seed = FieldElement::from_u64(curve.scalar_field, SCALAR_SEED);
	let scalars = std::iter::successors(Some(seed), |s| Some(*s * seed))
		.take(num_points)
		.map(Scalar::from)
		.collect();

	let generator = curve.generator;
	let points = std::iter::successors(Some(generator.to_jacobian()), |p: &JacobianPoint| {
		Some(p.add_affine(&generator))
	})
	.take(num_points)
	.map(CurvePoint::Jacobian)
	.collect();

	(scalars, points)
}

/// Mean wall time of `run` over `iterations` calls, after `warmup` untimed calls.
fn mean_time_ms<E>(
	iterations: usize,
	warmup: usize,
	mut run: impl FnMut() -> Result<(), E>,
) -> Result<f64, E> {
	for _ in 0..warmup {
		run()?;
	}
	let iterations = iterations.max(1);
	let start = Instant::now();
	for _ in 0..iterations {
		run()?;
	}
	Ok(start.elapsed().as_secs_f64() * 1000.0 / iterations as f64)
}

/// Benchmarks both processors and derives a [`CalibrationResult`].
///
/// GPU failures do not abort the run: the GPU is then recorded as infinitely slow and the
/// resulting ratio is zero.
#[instrument(skip_all, level = "debug", fields(curve = %curve.id))]
pub fn run_calibration(
	curve: &CurveConfig,
	config: &CalibrationConfig,
	backend: &dyn GpuMsmBackend,
	caps: &HardwareCapabilities,
) -> Result<CalibrationResult, Error> {
	let requested = config.sample_sizes.iter().copied().filter(|&n| n > 0);
	let (smallest, largest) = match requested.clone().minmax() {
		MinMaxResult::MinMax(smallest, largest) => (smallest, largest),
		MinMaxResult::OneElement(n) => (n, n),
		MinMaxResult::NoElements => (DEFAULT_SAMPLE_SIZES[0], DEFAULT_SAMPLE_SIZES[2]),
	};
	let sizes = requested
		.chain([smallest, largest])
		.sorted()
		.dedup()
		.collect::<Vec<_>>();

	let (scalars, points) = benchmark_inputs(curve, largest);
	let gpu_config = GpuMsmConfig::default();
	let mut gpu_usable = caps.has_gpu;

	let mut samples = Vec::with_capacity(sizes.len());
	for &num_points in &sizes {
		let (scalars, points) = (&scalars[..num_points], &points[..num_points]);

		let cpu_time_ms = mean_time_ms(config.iterations, config.warmup_iterations, || {
			pippenger_msm(scalars, points, curve).map(drop)
		})?;

		let gpu_time_ms = if gpu_usable {
			let measured = mean_time_ms(config.iterations, config.warmup_iterations, || {
				backend.msm(scalars, points, curve, &gpu_config).map(drop)
			});
			match measured {
				Ok(time) => time,
				Err(err) => {
					warn!(%err, num_points, "GPU benchmark failed, treating GPU as unusable");
					gpu_usable = false;
					f64::INFINITY
				}
			}
		} else {
			f64::INFINITY
		};

		debug!(num_points, cpu_time_ms, gpu_time_ms, "calibration sample");
		samples.push(CalibrationSample {
			num_points,
			cpu_time_ms,
			gpu_time_ms,
		});
	}

	// `sizes` is sorted and always holds both extremes.
	let small = samples[0];
	let large = samples[samples.len() - 1];

	let cpu_time_per_point_us = large.cpu_time_ms * 1000.0 / largest as f64;
	let (gpu_time_per_point_us, gpu_dispatch_overhead_ms) = if gpu_usable {
		let per_point_us = large.gpu_time_ms * 1000.0 / largest as f64;
		let overhead_ms = small.gpu_time_ms - smallest as f64 * per_point_us / 1000.0;
		(per_point_us, overhead_ms.max(0.0))
	} else {
		(f64::INFINITY, 0.0)
	};

	let model = PerformanceModel {
		cpu_time_per_point_us,
		gpu_time_per_point_us,
		gpu_dispatch_overhead_ms,
	};
	let optimal_gpu_ratio = optimal_gpu_ratio(&model, config.representative_size);
	if caps.has_gpu && optimal_gpu_ratio == 0.0 {
		warn!(
			cpu_time_per_point_us,
			gpu_time_per_point_us, "calibration found the GPU not worth using"
		);
	}

	let timestamp = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_or(0, |elapsed| elapsed.as_secs());

	Ok(CalibrationResult {
		optimal_gpu_ratio,
		cpu_time_per_point_us,
		gpu_time_per_point_us,
		gpu_dispatch_overhead_ms,
		hardware_fingerprint: caps.into(),
		timestamp,
		samples,
	})
}
