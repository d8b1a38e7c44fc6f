//! Integration tests for `evcmp <NEW> <REFERENCE>`.
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use evcmp_core::{
    Association, Collection, CoreFields, Event, EventFile, FourVector, MissingEnergy, Record,
    RecordRef, Relation, ScalarField, compress, encode_cbor, encode_json,
};

/// Path to the compiled `evcmp` binary.
fn evcmp_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("evcmp");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(evcmp_bin())
        .args(args)
        .env_remove("EVCMP_MAX_FILE_SIZE")
        .env("NO_COLOR", "1")
        .output()
        .expect("run evcmp")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn particle(charge: i64, px: f64) -> Record {
    Record::core(
        CoreFields {
            p4: Some(FourVector {
                px,
                py: 1.0,
                pz: 2.0,
                mass: 0.105,
            }),
            ..CoreFields::default()
        }
        .with_scalar(ScalarField::Charge, charge),
    )
}

/// One event with muons, jets, a mother link and missing energy.
fn event(muon_charge: i64, jet_count: usize, met_phi: f64, linked: bool) -> Event {
    let jets = (0..jet_count)
        .map(|i| {
            Record::core(CoreFields::default().with_scalar(ScalarField::Energy, 40.0 + i as f64))
        })
        .collect::<Collection>();
    let link = Association::default().with_relation(
        Relation::Mother,
        linked.then(|| RecordRef::new("genParticles", 0)),
    );
    Event::default()
        .with_collection("genParticles", Collection::new(vec![particle(1, 3.0)]))
        .with_collection(
            "muons",
            Collection::new(vec![particle(-1, 5.0), particle(muon_charge, 6.0)]),
        )
        .with_collection("jets", jets)
        .with_collection("muonsToMC", Collection::new(vec![Record::association(link)]))
        .with_collection(
            "met",
            Collection::new(vec![Record::missing_energy(MissingEnergy {
                magnitude: 20.0,
                phi: met_phi,
                scalar_sum: 150.0,
            })]),
        )
}

fn reference_event() -> Event {
    event(-1, 3, 0.5, true)
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path.to_str().expect("utf-8 path").to_owned()
}

fn json_file(dir: &Path, name: &str, events: Vec<Event>) -> String {
    write(
        dir,
        name,
        &encode_json(&EventFile::new(events)).expect("encode json"),
    )
}

// ---------------------------------------------------------------------------
// Exit 0
// ---------------------------------------------------------------------------

/// Comparing a file with itself exits 0 and reports zero mismatches.
#[test]
fn identical_files_exit_0_with_zero_mismatches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = json_file(dir.path(), "a.json", vec![reference_event(), reference_event()]);

    let out = run(&[&file, &file]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("0 / 16 have mismatches, per category:"), "{text}");
    assert!(text.contains("  muons: 0"), "{text}");
    assert!(text.contains("  jetsToTauTags: 0"), "{text}");
}

/// Any `NO_COLOR` value disables color without rejecting the command line.
#[test]
fn no_color_env_accepts_conventional_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = json_file(dir.path(), "a.json", vec![reference_event()]);

    for value in ["1", "yes", "", "false"] {
        let out = Command::new(evcmp_bin())
            .args(["--format", "json", file.as_str(), file.as_str()])
            .env_remove("EVCMP_MAX_FILE_SIZE")
            .env("NO_COLOR", value)
            .output()
            .expect("run evcmp");
        assert_eq!(
            out.status.code(),
            Some(0),
            "NO_COLOR={value:?}: {}",
            stderr(&out)
        );
        assert!(!stderr(&out).contains('\x1b'));
    }
}

/// Mismatches alone do not change the exit code.
#[test]
fn mismatches_still_exit_0_by_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(1, 3, 0.5, true)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&[&new, &reference]);

    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(
        text.contains("event 0 muons[1]: charge mismatch: old=-1, new=1"),
        "{text}"
    );
    assert!(text.contains("1 / 8 have mismatches"), "{text}");
    assert!(text.contains("  muons: 1"), "{text}");
}

/// A size mismatch is reported once and its elements are not compared.
#[test]
fn size_mismatch_is_reported_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(-1, 2, 0.5, true)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&[&new, &reference]);

    let text = stdout(&out);
    assert!(
        text.contains("event 0 jets: size mismatch: old=3, new=2"),
        "{text}"
    );
    assert_eq!(text.matches("event 0 jets").count(), 1, "{text}");
    assert!(text.contains("  jets: 1"), "{text}");
}

/// A reference that disappears on the new side is a dangling reference.
#[test]
fn lost_association_target_is_dangling() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(-1, 3, 0.5, false)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&[&new, &reference]);

    let text = stdout(&out);
    assert!(
        text.contains("muonsToMC[0]: dangling mother reference on new side"),
        "{text}"
    );
}

/// Only `phi` differs on the missing-energy record.
#[test]
fn missing_energy_phi_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(-1, 3, -0.5, true)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&[&new, &reference]);

    let text = stdout(&out);
    assert!(text.contains("met[0]: phi mismatch"), "{text}");
    assert!(!text.contains("magnitude mismatch"), "{text}");
    assert!(text.contains("  met: 1"), "{text}");
}

/// CBOR and zstd inputs compare equal to the same events in JSON.
#[test]
fn mixed_encodings_compare_cleanly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = EventFile::new(vec![reference_event()]);
    let cbor = encode_cbor(&file).expect("encode cbor");
    let zstd = compress(&encode_json(&file).expect("encode json")).expect("compress");
    let cbor_path = write(dir.path(), "a.cbor", &cbor);
    let zstd_path = write(dir.path(), "b.json.zst", &zstd);

    let out = run(&["--fail-on-mismatch", &cbor_path, &zstd_path]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
}

// ---------------------------------------------------------------------------
// Exit 1
// ---------------------------------------------------------------------------

/// Different event counts abort with exit 1 and no report.
#[test]
fn event_count_mismatch_exits_1() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![reference_event(); 4]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event(); 3]);

    let out = run(&[&new, &reference]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(
        stderr(&out).contains("event count mismatch"),
        "stderr: {}",
        stderr(&out)
    );
}

/// `--fail-on-mismatch` turns a non-clean report into exit 1.
#[test]
fn fail_on_mismatch_exits_1() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(1, 3, 0.5, true)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&["--fail-on-mismatch", &new, &reference]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("1 / 8 have mismatches"));
}

// ---------------------------------------------------------------------------
// Exit 2
// ---------------------------------------------------------------------------

/// A missing input is an input failure.
#[test]
fn missing_file_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&["/no/such/new.json", &reference]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("not found"), "stderr: {}", stderr(&out));
}

/// An input over `--max-file-size` is rejected before decoding.
#[test]
fn oversized_file_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = json_file(dir.path(), "a.json", vec![reference_event()]);

    let out = run(&["--max-file-size", "10", &file, &file]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("too large"), "stderr: {}", stderr(&out));
}

/// The size limit can come from the environment.
#[test]
fn max_file_size_from_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = json_file(dir.path(), "a.json", vec![reference_event()]);

    let out = Command::new(evcmp_bin())
        .args([&file, &file])
        .env("EVCMP_MAX_FILE_SIZE", "10")
        .output()
        .expect("run evcmp");

    assert_eq!(out.status.code(), Some(2));
}

/// Garbage input is an input failure naming the file.
#[test]
fn undecodable_file_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bad = write(dir.path(), "bad.json", b"<events/>");
    let good = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&[&bad, &good]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("bad.json"), "stderr: {}", stderr(&out));
}

/// An unsupported format version is an input failure.
#[test]
fn unsupported_version_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let future = write(
        dir.path(),
        "future.json",
        br#"{"format_version":"2.0","events":[]}"#,
    );

    let out = run(&[&future, &future]);

    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("2.0"), "stderr: {}", stderr(&out));
}

/// An invalid `--only` regex is an input failure.
#[test]
fn invalid_only_pattern_exits_2() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = json_file(dir.path(), "a.json", vec![reference_event()]);

    let out = run(&["--only", "[", &file, &file]);

    assert_eq!(out.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// Output options
// ---------------------------------------------------------------------------

/// JSON output is a single object with the report, collection list and digest.
#[test]
fn json_format_is_parseable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(1, 3, 0.5, true)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&["--format", "json", &new, &reference]);

    assert_eq!(out.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["events"], 1);
    assert_eq!(value["examined"], 8);
    assert_eq!(value["mismatched"], 1);
    assert_eq!(value["collections"].as_array().map(Vec::len), Some(34));
    assert_eq!(value["mismatches"][0]["collection"], "muons");
    assert_eq!(value["mismatches"][0]["field"], "charge");
    assert!(value["digest"].is_string());
}

/// Two runs over the same inputs print the same digest.
#[test]
fn digest_is_reproducible() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(1, 2, 0.1, false)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let first = stdout(&run(&["--digest", &new, &reference]));
    let second = stdout(&run(&["--digest", &new, &reference]));

    let digest_line = |text: &str| {
        text.lines()
            .find(|l| l.starts_with("digest: "))
            .map(str::to_owned)
    };
    assert!(digest_line(&first).is_some(), "{first}");
    assert_eq!(digest_line(&first), digest_line(&second));
}

/// `--only` narrows the summary to matching collections.
#[test]
fn only_filters_collections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let new = json_file(dir.path(), "new.json", vec![event(1, 2, 0.1, false)]);
    let reference = json_file(dir.path(), "ref.json", vec![reference_event()]);

    let out = run(&["--only", "^met$", &new, &reference]);

    let text = stdout(&out);
    assert!(text.contains("collections: met\n"), "{text}");
    assert!(text.contains("1 / 1 have mismatches"), "{text}");
    assert!(!text.contains("muons"), "{text}");
}

/// `--quiet` leaves stderr empty on success; `--verbose` adds timing.
#[test]
fn quiet_and_verbose_control_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = json_file(dir.path(), "a.json", vec![reference_event()]);

    let quiet = run(&["--quiet", &file, &file]);
    assert!(stderr(&quiet).is_empty(), "stderr: {}", stderr(&quiet));

    let verbose = run(&["--verbose", &file, &file]);
    let text = stderr(&verbose);
    assert!(text.contains("compared in "), "stderr: {text}");
    assert!(text.contains("1 events, json"), "stderr: {text}");
}

/// `--version` prints the package version.
#[test]
fn version_flag_prints_version() {
    let out = run(&["--version"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains(env!("CARGO_PKG_VERSION")));
}
