//! Record-by-record comparison of two event sources.
//!
//! Events are paired by index and collections by name. Records are paired by
//! position within a collection; there is no key-based matching. For each
//! configured collection the engine:
//!
//! 1. Skips it if the reference side has no such collection.
//! 2. Records a structural error if only the new side lacks it.
//! 3. Records a size mismatch and moves on if the lengths differ.
//! 4. Classifies the first reference record and compares every pair with
//!    the comparator registered for that kind. A new record of another kind
//!    is a kind mismatch instead.
//!
//! Field mismatches, dangling references and size mismatches are data in the
//! [`MismatchReport`]. Only an event-count mismatch aborts the whole run.
mod assoc;
mod dispatch;
mod engine;
mod fields;
mod report;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{
    CompareConfig, DEFAULT_COLLECTIONS, DEFAULT_MISSING_ENERGY_COLLECTIONS, compare_stores,
    compare_stores_with_cancel,
};
pub use report::MismatchReport;
pub use types::{
    CompareError, Difference, Mismatch, Side, StructuralError, StructuralErrorKind,
};
