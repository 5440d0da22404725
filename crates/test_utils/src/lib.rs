// Copyright 2025 Irreducible Inc.

//! Fixtures, GPU backend doubles and generic checks shared by the MSM test suites.

pub mod backends;
pub mod checks;
pub mod fixtures;
