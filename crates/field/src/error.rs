// Copyright 2025 Irreducible Inc.

/// Error thrown when a field operation fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("division by zero")]
	DivisionByZero,
	#[error("value is not in the field")]
	NotInField,
	#[error("invalid integer literal: {0}")]
	InvalidLiteral(String),
	#[error("the modulus must be odd and greater than one")]
	InvalidModulus,
}
