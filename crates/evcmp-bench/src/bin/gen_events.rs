//! Generates the large-tier benchmark fixtures to disk.
//!
//! Writes a reference file and a perturbed copy of it, each as JSON and
//! CBOR, to `target/bench-fixtures/`. The two can be fed straight to the
//! `evcmp` binary to time a full run.

use std::error::Error;
use std::fs;

use evcmp_bench::{
    Perturbation, SizeTier, generate_events, perturb, perturbed_fixture_path,
    reference_fixture_path,
};
use evcmp_core::{EventFile, encode_cbor, encode_json};

fn write_fixture(file: &EventFile, label: &str) -> Result<(), Box<dyn Error>> {
    let json_path = reference_or_perturbed(label, "json");
    let cbor_path = reference_or_perturbed(label, "cbor");

    if let Some(parent) = json_path.parent() {
        fs::create_dir_all(parent)?;
    }

    eprintln!("Writing {label} JSON to {}...", json_path.display());
    let json = encode_json(file)?;
    fs::write(&json_path, &json)?;
    eprintln!("JSON: {:.1} MB", json.len() as f64 / (1024.0 * 1024.0));

    eprintln!("Writing {label} CBOR to {}...", cbor_path.display());
    let cbor = encode_cbor(file)?;
    fs::write(&cbor_path, &cbor)?;
    eprintln!(
        "CBOR: {:.1} MB ({:.0}% of JSON)",
        cbor.len() as f64 / (1024.0 * 1024.0),
        cbor.len() as f64 / json.len() as f64 * 100.0
    );
    Ok(())
}

fn reference_or_perturbed(label: &str, extension: &str) -> std::path::PathBuf {
    if label == "reference" {
        reference_fixture_path(extension)
    } else {
        perturbed_fixture_path(extension)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    eprintln!("Generating Large tier (1000 events)...");
    let reference = generate_events(&SizeTier::Large.config(42));
    let records: usize = reference
        .events
        .iter()
        .flat_map(|e| e.products.values())
        .filter_map(evcmp_core::Product::as_collection)
        .map(evcmp_core::Collection::len)
        .sum();
    eprintln!(
        "Generated {} events, {records} records",
        reference.events.len()
    );

    let (perturbed, log) = perturb(
        &reference,
        &Perturbation {
            seed: 43,
            rate: 0.001,
        },
    );
    eprintln!("Perturbed {} records", log.len());

    write_fixture(&reference, "reference")?;
    write_fixture(&perturbed, "perturbed")?;
    Ok(())
}
