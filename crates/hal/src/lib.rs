// Copyright 2025 Irreducible Inc.

//! Boundary to the executing machine: a snapshot of its acceleration capabilities and the
//! interface of a GPU multi-scalar multiplication backend.

mod backend;
mod capabilities;
mod error;

pub use backend::*;
pub use capabilities::*;
pub use error::*;

/// Create the default GPU backend, which reports that no device is present.
pub fn make_backend() -> NoGpuBackend {
	NoGpuBackend
}
