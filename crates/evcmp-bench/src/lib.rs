//! Synthetic event generation and benchmark utilities for evcmp.
//!
//! This crate provides deterministic generation of physics-event files,
//! controlled perturbations of them, and invariant checkers used by the
//! benchmarks and property tests of `evcmp-core`.

use std::path::PathBuf;

pub mod correctness;
pub mod generator;

pub use generator::perturb::{
    Perturbation, PerturbationLog, RecordSite, bump, drop_last, perturb,
};
pub use generator::{GeneratorConfig, SizeTier, generate_events};

/// Returns the path of the reference fixture written by `gen-events`.
///
/// Fixtures live under `target/bench-fixtures/` so they are gitignored and
/// shared between the generator binary and the benchmark harness.
pub fn reference_fixture_path(extension: &str) -> PathBuf {
    fixtures_dir().join(format!("reference.events.{extension}"))
}

/// Returns the path of the perturbed fixture written by `gen-events`.
pub fn perturbed_fixture_path(extension: &str) -> PathBuf {
    fixtures_dir().join(format!("perturbed.events.{extension}"))
}

fn fixtures_dir() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .join("..")
        .join("..")
        .join("target")
        .join("bench-fixtures")
}
