// Copyright 2025 Irreducible Inc.

//! Prime field arithmetic over fixed-width limb integers in Montgomery form.
//!
//! A field is described by a [`FieldConfig`], built once per modulus. Elements carry a
//! `&'static` reference to their config, so every operation knows the modulus it works in.

mod arithmetic;
mod bigint;
mod config;
mod element;
mod error;
pub mod params;

pub use bigint::*;
pub use config::*;
pub use element::*;
pub use error::*;
