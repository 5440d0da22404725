// Copyright 2025 Irreducible Inc.

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("the point does not satisfy the curve equation")]
	NotOnCurve,
	#[error("scalars must be non-negative")]
	NegativeScalar,
	#[error("unknown curve: {0}")]
	UnknownCurve(String),
	#[error("invalid scalar literal: {0}")]
	InvalidScalarLiteral(String),
	#[error("{0}")]
	Field(#[from] zkaccel_field::Error),
}
