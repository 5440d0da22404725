// Copyright 2025 Irreducible Inc.

/// Failures of a GPU backend.
///
/// All of these are recoverable: the scheduler answers each of them by recomputing the affected
/// partition on the CPU.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no GPU device is available")]
	Unavailable,
	#[error("GPU dispatch failed: {0}")]
	Dispatch(String),
	#[error("shader compilation failed: {0}")]
	ShaderCompile(String),
	#[error("failed to allocate a GPU buffer of {requested} bytes")]
	BufferAllocation { requested: usize },
	/// Generic variant to represent errors from concrete backends.
	#[error("backend error: {0}")]
	Backend(Box<dyn std::error::Error + Send + Sync>),
}
