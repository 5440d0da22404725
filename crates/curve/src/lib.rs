// Copyright 2025 Irreducible Inc.

//! Short Weierstrass curve arithmetic for the supported pairing-friendly curves.
//!
//! Points come in three representations, unified by [`CurvePoint`]. Group operations on a
//! [`CurvePoint`] return their result in the representation of the left operand.

mod affine;
mod config;
mod error;
mod jacobian;
mod point;
mod projective;
mod scalar;

pub use affine::*;
pub use config::*;
pub use error::*;
pub use jacobian::*;
pub use point::*;
pub use projective::*;
pub use scalar::*;
pub use zkaccel_field::{BigInt, FieldConfig, FieldElement};
