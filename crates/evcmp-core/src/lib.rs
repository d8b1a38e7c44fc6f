#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod classify;
pub mod compare;
pub mod event_file;
pub mod record;
pub mod store;

pub use classify::{ClassifyError, Classifier, RecordKind};
pub use compare::{
    CompareConfig, CompareError, DEFAULT_COLLECTIONS, DEFAULT_MISSING_ENERGY_COLLECTIONS,
    Difference, Mismatch, MismatchReport, Side, StructuralError, StructuralErrorKind,
    compare_stores, compare_stores_with_cancel,
};
#[cfg(feature = "compression")]
pub use event_file::compress;
pub use event_file::{
    Encoding, EventFile, EventFileError, FORMAT_VERSION, detect_encoding, encode_cbor,
    encode_json, parse_event_file,
};
pub use record::{
    Association, CoreFields, FourVector, MissingEnergy, Point, Record, RecordRef, Relation,
    Scalar, ScalarField, float_eq,
};
pub use store::{Collection, Event, EventSource, EventStore, Product};

/// Returns the current version of the evcmp-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
