// Copyright 2025 Irreducible Inc.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use zkaccel_utils::env::boolean_env_flag_set;

use crate::GpuStatus;

pub const DISABLE_GPU_ENV: &str = "ZKACCEL_DISABLE_GPU";
pub const DISABLE_SIMD_ENV: &str = "ZKACCEL_DISABLE_SIMD";
pub const DISABLE_MATRIX_ENV: &str = "ZKACCEL_DISABLE_MATRIX";
pub const ASSUME_MATRIX_EXT_ENV: &str = "ZKACCEL_ASSUME_MATRIX_EXT";

/// Immutable snapshot of what the executing machine can accelerate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardwareCapabilities {
	/// Wide vector instructions usable by field arithmetic (NEON, AVX2).
	pub has_simd_ext: bool,
	/// A matrix coprocessor reachable from the CPU (e.g. Apple AMX).
	pub has_matrix_coprocessor: bool,
	/// A newer, architecturally exposed matrix extension (e.g. Arm SME).
	pub has_experimental_matrix_ext: bool,
	pub has_gpu: bool,
	pub gpu_device_name: Option<String>,
	pub gpu_core_count: Option<u32>,
	pub gpu_max_threads_per_group: Option<u32>,
	/// CPU and GPU share memory, so no host/device copies are needed.
	pub unified_memory: bool,
	pub cpu_core_count: usize,
	pub arch: &'static str,
	pub os: &'static str,
}

impl HardwareCapabilities {
	/// A machine with plain scalar cores only.
	pub fn cpu_only(cpu_core_count: usize) -> Self {
		Self {
			has_simd_ext: false,
			has_matrix_coprocessor: false,
			has_experimental_matrix_ext: false,
			has_gpu: false,
			gpu_device_name: None,
			gpu_core_count: None,
			gpu_max_threads_per_group: None,
			unified_memory: false,
			cpu_core_count,
			arch: std::env::consts::ARCH,
			os: std::env::consts::OS,
		}
	}

	/// Fills in the GPU facts from a backend's status report.
	pub fn with_gpu(mut self, status: &GpuStatus) -> Self {
		self.has_gpu = status.is_usable();
		self.gpu_device_name = status.device_name.clone();
		self.gpu_core_count = status.core_count;
		self.gpu_max_threads_per_group = status.max_threads_per_group;
		self.unified_memory = status.unified_memory;
		self
	}

	pub fn is_apple_silicon(&self) -> bool {
		self.os == "macos" && self.arch == "aarch64"
	}

	/// Applies the `ZKACCEL_*` capability overrides. `flag_set` reports whether a flag is on.
	///
	/// A disabled GPU drops every GPU fact, not only `has_gpu`.
	pub fn with_overrides(mut self, flag_set: impl Fn(&str) -> bool) -> Self {
		if flag_set(DISABLE_GPU_ENV) {
			self = self.with_gpu(&GpuStatus::unavailable());
		}
		if flag_set(DISABLE_SIMD_ENV) {
			self.has_simd_ext = false;
		}
		if flag_set(DISABLE_MATRIX_ENV) {
			self.has_matrix_coprocessor = false;
		}
		self.has_experimental_matrix_ext =
			self.has_matrix_coprocessor && flag_set(ASSUME_MATRIX_EXT_ENV);
		self
	}
}

/// Probes the current machine.
///
/// CPU features are detected from the target and at runtime. GPU facts come from `gpu`, the
/// status of the backend that will receive dispatches. The `ZKACCEL_*` environment flags are
/// applied last, see [`HardwareCapabilities::with_overrides`].
pub fn detect_hardware_capabilities(gpu: &GpuStatus) -> HardwareCapabilities {
	let cpu_core_count = std::thread::available_parallelism()
		.map(|n| n.get())
		.unwrap_or(1);

	let mut caps = HardwareCapabilities::cpu_only(cpu_core_count).with_gpu(gpu);
	caps.has_simd_ext = detect_simd_ext();
	caps.has_matrix_coprocessor = caps.is_apple_silicon();
	let caps = caps.with_overrides(boolean_env_flag_set);

	debug!(?caps, "detected hardware capabilities");
	caps
}

fn detect_simd_ext() -> bool {
	cfg_if::cfg_if! {
		if #[cfg(target_arch = "x86_64")] {
			std::is_x86_feature_detected!("avx2")
		} else if #[cfg(target_arch = "aarch64")] {
			std::arch::is_aarch64_feature_detected!("neon")
		} else {
			false
		}
	}
}

/// Process-shared cache of the hardware snapshot.
///
/// The snapshot is computed on first use and kept until [`HardwareProbe::clear`]. Clearing only
/// ever resets to "absent", so a read racing with a clear just recomputes.
#[derive(Debug, Default)]
pub struct HardwareProbe {
	cached: RwLock<Option<Arc<HardwareCapabilities>>>,
}

impl HardwareProbe {
	pub const fn new() -> Self {
		Self {
			cached: RwLock::new(None),
		}
	}

	/// A probe pinned to the given snapshot until cleared.
	pub fn with_snapshot(caps: HardwareCapabilities) -> Self {
		Self {
			cached: RwLock::new(Some(Arc::new(caps))),
		}
	}

	pub fn cached(&self) -> Option<Arc<HardwareCapabilities>> {
		self.cached
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Returns the cached snapshot, running `detect` to fill the cache if it is empty.
	pub fn get_or_detect(
		&self,
		detect: impl FnOnce() -> HardwareCapabilities,
	) -> Arc<HardwareCapabilities> {
		if let Some(caps) = self.cached() {
			return caps;
		}
		let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
		cached.get_or_insert_with(|| Arc::new(detect())).clone()
	}

	/// Replaces the cached snapshot.
	pub fn set(&self, caps: HardwareCapabilities) {
		*self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(caps));
	}

	pub fn clear(&self) {
		*self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_detection_reports_at_least_one_core() {
		let caps = detect_hardware_capabilities(&GpuStatus::unavailable());
		assert!(caps.cpu_core_count >= 1);
		assert!(!caps.has_gpu);
		assert!(!caps.arch.is_empty());
	}

	#[test]
	fn test_gpu_status_is_copied_into_snapshot() {
		let caps = HardwareCapabilities::cpu_only(8).with_gpu(&usable_gpu());
		assert!(caps.has_gpu);
		assert!(caps.unified_memory);
		assert_eq!(caps.gpu_core_count, Some(10));
		assert_eq!(caps.gpu_device_name.as_deref(), Some("test device"));
	}

	#[test]
	fn test_uninitialized_gpu_is_not_usable() {
		let status = GpuStatus {
			device_available: true,
			..GpuStatus::default()
		};
		assert!(!HardwareCapabilities::cpu_only(1).with_gpu(&status).has_gpu);
	}

	#[test]
	fn test_probe_caches_until_cleared() {
		let probe = HardwareProbe::new();
		assert!(probe.cached().is_none());

		let first = probe.get_or_detect(|| HardwareCapabilities::cpu_only(2));
		let second = probe.get_or_detect(|| HardwareCapabilities::cpu_only(64));
		assert_eq!(first.cpu_core_count, 2);
		assert!(Arc::ptr_eq(&first, &second));

		probe.clear();
		assert!(probe.cached().is_none());
		assert_eq!(probe.get_or_detect(|| HardwareCapabilities::cpu_only(64)).cpu_core_count, 64);
	}

	#[test]
	fn test_injected_snapshot_wins_over_detection() {
		let probe = HardwareProbe::with_snapshot(HardwareCapabilities::cpu_only(3));
		let detect = || detect_hardware_capabilities(&GpuStatus::unavailable());
		assert_eq!(probe.get_or_detect(detect).cpu_core_count, 3);

		probe.set(HardwareCapabilities::cpu_only(5));
		assert_eq!(probe.get_or_detect(detect).cpu_core_count, 5);
	}

	fn usable_gpu() -> GpuStatus {
		GpuStatus {
			initialized: true,
			device_available: true,
			unified_memory: true,
			device_name: Some("test device".into()),
			core_count: Some(10),
			max_threads_per_group: Some(1024),
			max_buffer_length: None,
		}
	}

	fn fully_featured() -> HardwareCapabilities {
		HardwareCapabilities {
			has_simd_ext: true,
			has_matrix_coprocessor: true,
			..HardwareCapabilities::cpu_only(8)
		}
		.with_gpu(&usable_gpu())
	}

	fn flags(set: &'static [&'static str]) -> impl Fn(&str) -> bool {
		move |flag: &str| set.iter().any(|&name| name == flag)
	}

	#[test]
	fn test_no_overrides_keep_capabilities() {
		let caps = fully_featured().with_overrides(flags(&[]));
		assert!(caps.has_gpu);
		assert!(caps.has_simd_ext);
		assert!(caps.has_matrix_coprocessor);
		assert!(!caps.has_experimental_matrix_ext);
	}

	#[test]
	fn test_disable_gpu_drops_all_gpu_facts() {
		let caps = fully_featured().with_overrides(flags(&[DISABLE_GPU_ENV]));
		assert!(!caps.has_gpu);
		assert_eq!(caps.gpu_device_name, None);
		assert_eq!(caps.gpu_core_count, None);
		assert_eq!(caps.gpu_max_threads_per_group, None);
		assert!(!caps.unified_memory);
		assert!(caps.has_simd_ext);
		assert!(caps.has_matrix_coprocessor);
	}

	#[test]
	fn test_disable_simd_and_matrix() {
		let caps = fully_featured().with_overrides(flags(&[DISABLE_SIMD_ENV]));
		assert!(!caps.has_simd_ext);
		assert!(caps.has_matrix_coprocessor);
		assert!(caps.has_gpu);

		let caps = fully_featured().with_overrides(flags(&[DISABLE_MATRIX_ENV]));
		assert!(caps.has_simd_ext);
		assert!(!caps.has_matrix_coprocessor);
	}

	#[test]
	fn test_matrix_ext_requires_matrix_coprocessor() {
		let caps = fully_featured().with_overrides(flags(&[ASSUME_MATRIX_EXT_ENV]));
		assert!(caps.has_experimental_matrix_ext);

		let caps = fully_featured()
			.with_overrides(flags(&[DISABLE_MATRIX_ENV, ASSUME_MATRIX_EXT_ENV]));
		assert!(!caps.has_experimental_matrix_ext);

		let caps =
			HardwareCapabilities::cpu_only(2).with_overrides(flags(&[ASSUME_MATRIX_EXT_ENV]));
		assert!(!caps.has_experimental_matrix_ext);
	}

	#[test]
	fn test_disable_gpu_env_flag() {
		// Only this test sets the variable.
		std::env::set_var(DISABLE_GPU_ENV, "1");
		let caps = detect_hardware_capabilities(&usable_gpu());
		std::env::remove_var(DISABLE_GPU_ENV);

		assert!(!caps.has_gpu);
		assert_eq!(caps.gpu_device_name, None);
	}
}
