//! Shared fixtures for integration tests

mod nupkg;

pub use nupkg::*;
