// Copyright 2025 Irreducible Inc.

use std::{
	fmt::{self, Display},
	str::FromStr,
};

use zkaccel_utils::env::usize_env_var;

pub const DEFAULT_GPU_THRESHOLD: usize = 4096;
pub const DEFAULT_HYBRID_THRESHOLD: usize = 65536;
pub const DEFAULT_MIN_GPU_POINTS: usize = 1024;

pub const GPU_THRESHOLD_ENV: &str = "ZKACCEL_GPU_THRESHOLD";
pub const HYBRID_THRESHOLD_ENV: &str = "ZKACCEL_HYBRID_THRESHOLD";
pub const WINDOW_SIZE_ENV: &str = "ZKACCEL_MSM_WINDOW";

/// Caller preference for where an MSM runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccelerationHint {
	Cpu,
	Gpu,
	Hybrid,
	#[default]
	Auto,
}

impl AccelerationHint {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Cpu => "cpu",
			Self::Gpu => "gpu",
			Self::Hybrid => "hybrid",
			Self::Auto => "auto",
		}
	}
}

impl Display for AccelerationHint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown acceleration hint {0:?}, expected one of cpu, gpu, hybrid, auto")]
pub struct ParseAccelerationHintError(String);

impl FromStr for AccelerationHint {
	type Err = ParseAccelerationHintError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"cpu" => Ok(Self::Cpu),
			"gpu" => Ok(Self::Gpu),
			"hybrid" => Ok(Self::Hybrid),
			"auto" => Ok(Self::Auto),
			_ => Err(ParseAccelerationHintError(s.to_string())),
		}
	}
}

/// Options accepted by [`crate::MsmContext::msm`].
#[derive(Clone, Debug, PartialEq)]
pub struct MsmOptions {
	pub acceleration_hint: AccelerationHint,
	/// Below this many points the CPU is always used.
	pub gpu_threshold: usize,
	/// From this many points on, `auto` splits the work between CPU and GPU.
	pub hybrid_threshold: usize,
	/// Pippenger window width in bits. Chosen from the input size when `None`.
	pub window_size: Option<usize>,
	/// Check lengths, scalar ranges and curve membership before computing.
	///
	/// With validation off, malformed input produces an unspecified point instead of an error.
	pub validate_inputs: bool,
	/// Fraction of points sent to the GPU on the hybrid path, overriding the performance model.
	pub split_ratio: Option<f64>,
	/// Smallest GPU partition worth a dispatch.
	pub min_gpu_points: usize,
}

impl Default for MsmOptions {
	fn default() -> Self {
		Self {
			acceleration_hint: AccelerationHint::Auto,
			gpu_threshold: DEFAULT_GPU_THRESHOLD,
			hybrid_threshold: DEFAULT_HYBRID_THRESHOLD,
			window_size: None,
			validate_inputs: true,
			split_ratio: None,
			min_gpu_points: DEFAULT_MIN_GPU_POINTS,
		}
	}
}

impl MsmOptions {
	/// Defaults, with thresholds and the window width overridable from the environment.
	pub fn from_env() -> Self {
		let defaults = Self::default();
		Self {
			gpu_threshold: usize_env_var(GPU_THRESHOLD_ENV).unwrap_or(defaults.gpu_threshold),
			hybrid_threshold: usize_env_var(HYBRID_THRESHOLD_ENV)
				.unwrap_or(defaults.hybrid_threshold),
			window_size: usize_env_var(WINDOW_SIZE_ENV),
			..defaults
		}
	}

	pub fn with_hint(hint: AccelerationHint) -> Self {
		Self {
			acceleration_hint: hint,
			..Self::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;

	#[test]
	fn test_hint_parsing() {
		for hint in [
			AccelerationHint::Cpu,
			AccelerationHint::Gpu,
			AccelerationHint::Hybrid,
			AccelerationHint::Auto,
		] {
			assert_eq!(hint.to_string().parse::<AccelerationHint>().unwrap(), hint);
		}
		assert_eq!("GPU".parse::<AccelerationHint>().unwrap(), AccelerationHint::Gpu);
		assert_matches!("fpga".parse::<AccelerationHint>(), Err(ParseAccelerationHintError(_)));
	}

	#[test]
	fn test_defaults() {
		let options = MsmOptions::default();
		assert_eq!(options.acceleration_hint, AccelerationHint::Auto);
		assert_eq!(options.gpu_threshold, 4096);
		assert_eq!(options.hybrid_threshold, 65536);
		assert_eq!(options.min_gpu_points, 1024);
		assert!(options.validate_inputs);
		assert_eq!(options.window_size, None);
		assert_eq!(options.split_ratio, None);
	}

	#[test]
	fn test_from_env_overrides() {
		// Only this test sets these variables.
		let vars = [GPU_THRESHOLD_ENV, HYBRID_THRESHOLD_ENV, WINDOW_SIZE_ENV];
		for (var, value) in vars.into_iter().zip(["abc", " 100 ", "7"]) {
			std::env::set_var(var, value);
		}
		let options = MsmOptions::from_env();
		std::env::set_var(WINDOW_SIZE_ENV, "-3");
		let negative_window = MsmOptions::from_env().window_size;
		for var in vars {
			std::env::remove_var(var);
		}

		assert_eq!(options.gpu_threshold, DEFAULT_GPU_THRESHOLD);
		assert_eq!(options.hybrid_threshold, 100);
		assert_eq!(options.window_size, Some(7));
		assert_eq!(negative_window, None);
		assert_eq!(MsmOptions::from_env(), MsmOptions::default());
	}
}
