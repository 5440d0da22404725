// Copyright 2025 Irreducible Inc.

//! Multi-scalar multiplication over the supported pairing-friendly curves.
//!
//! [`pippenger_msm`] is the CPU engine and [`naive_msm`] its reference oracle. [`MsmContext`]
//! routes each call to the CPU, the GPU backend or both, using the cached hardware snapshot and
//! calibration result it owns.

mod calibration;
mod context;
mod error;
mod hybrid;
mod naive;
pub mod options;
mod pippenger;
mod router;
mod split;
mod validation;

pub use calibration::*;
pub use context::*;
pub use error::*;
pub use hybrid::{hybrid_msm, hybrid_msm_sync, HybridMsmResult, HybridOptions};
pub use naive::*;
pub use options::{AccelerationHint, MsmOptions, ParseAccelerationHintError};
pub use pippenger::*;
pub use router::*;
pub use split::*;
pub use validation::*;
