//! Test utilities and fixtures for enumgen
//!
//! This crate provides shared test helpers used by the integration tests
//! (tests/ directories) of the core and CLI crates.

pub mod fixtures;
pub mod mocks;
