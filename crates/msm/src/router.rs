// Copyright 2025 Irreducible Inc.

use std::fmt::{self, Display};

use tracing::debug;
use zkaccel_hal::HardwareCapabilities;

use crate::{AccelerationHint, MsmOptions};

/// Where an MSM is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccelerationPath {
	Cpu,
	Gpu,
	Hybrid,
}

impl Display for AccelerationPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Cpu => "cpu",
			Self::Gpu => "gpu",
			Self::Hybrid => "hybrid",
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterConfig {
	pub gpu_threshold: usize,
	pub hybrid_threshold: usize,
	pub hint: AccelerationHint,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self::from(&MsmOptions::default())
	}
}

impl From<&MsmOptions> for RouterConfig {
	fn from(options: &MsmOptions) -> Self {
		Self {
			gpu_threshold: options.gpu_threshold,
			hybrid_threshold: options.hybrid_threshold,
			hint: options.acceleration_hint,
		}
	}
}

/// Picks the execution path for an MSM over `num_points` points.
///
/// An explicit hint is honoured unless it asks for a GPU the machine does not have, in which
/// case the CPU is used. In `auto` mode, small inputs and GPU-less machines stay on the CPU,
/// inputs of at least `hybrid_threshold` points are split and everything in between goes to
/// the GPU.
pub fn select_path(
	num_points: usize,
	config: &RouterConfig,
	caps: &HardwareCapabilities,
) -> AccelerationPath {
	let path = match config.hint {
		AccelerationHint::Cpu => AccelerationPath::Cpu,
		AccelerationHint::Gpu | AccelerationHint::Hybrid if !caps.has_gpu => AccelerationPath::Cpu,
		AccelerationHint::Gpu => AccelerationPath::Gpu,
		AccelerationHint::Hybrid => AccelerationPath::Hybrid,
		AccelerationHint::Auto => {
			if num_points < config.gpu_threshold || !caps.has_gpu {
				AccelerationPath::Cpu
			} else if num_points >= config.hybrid_threshold {
				AccelerationPath::Hybrid
			} else {
				AccelerationPath::Gpu
			}
		}
	};
	debug!(num_points, hint = %config.hint, %path, has_gpu = caps.has_gpu, "selected MSM path");
	path
}
