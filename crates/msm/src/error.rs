// Copyright 2025 Irreducible Inc.

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("got {scalars} scalars but {points} points")]
	ArrayLengthMismatch { scalars: usize, points: usize },
	#[error("scalar at index {index} is not below the group order")]
	ScalarOutOfRange { index: usize },
	#[error("point at index {index} is not on the curve")]
	InvalidPoint { index: usize },
	#[error("point at index {index} belongs to a different curve")]
	CurveMismatch { index: usize },
	#[error("window size {window_size} is outside the supported range 1..=20")]
	InvalidWindowSize { window_size: usize },
	#[error("split ratio {ratio} is outside [0, 1]")]
	InvalidSplitRatio { ratio: f64 },
	#[error("a calibration run is already in progress")]
	CalibrationInProgress,
	#[error("curve error: {0}")]
	Curve(#[from] zkaccel_curve::Error),
	#[error("field error: {0}")]
	Field(#[from] zkaccel_field::Error),
	#[error("GPU error: {0}")]
	Gpu(#[from] zkaccel_hal::Error),
}
