use std::fmt;

use serde::Serialize;

use crate::classify::RecordKind;
use crate::record::{Relation, Scalar};

/// Which input a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The reference input.
    Old,
    /// The input under test.
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// One discrepancy between an old and a new value.
///
/// Differences are data: comparators return them, they never abort a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    /// The collection has a different length on each side; no element was
    /// compared.
    SizeMismatch { old: usize, new: usize },
    /// A single field differs. `None` means the field is absent on that side.
    FieldMismatch {
        field: String,
        old: Option<Scalar>,
        new: Option<Scalar>,
    },
    /// An association relation could not be dereferenced on `side`.
    DanglingReference { relation: Relation, side: Side },
    /// The new record does not expose the capability of the collection's kind.
    KindMismatch {
        expected: RecordKind,
        found: Option<RecordKind>,
    },
}

impl Difference {
    pub(crate) fn field(field: String, old: Option<Scalar>, new: Option<Scalar>) -> Self {
        Self::FieldMismatch { field, old, new }
    }

    /// Returns the field name for [`Difference::FieldMismatch`].
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::FieldMismatch { field, .. } => Some(field),
            Self::SizeMismatch { .. }
            | Self::DanglingReference { .. }
            | Self::KindMismatch { .. } => None,
        }
    }
}

fn opt(value: Option<&Scalar>) -> String {
    value.map_or_else(|| "<absent>".to_owned(), ToString::to_string)
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { old, new } => {
                write!(f, "size mismatch: old={old}, new={new}")
            }
            Self::FieldMismatch { field, old, new } => write!(
                f,
                "{field} mismatch: old={}, new={}",
                opt(old.as_ref()),
                opt(new.as_ref())
            ),
            Self::DanglingReference { relation, side } => {
                write!(f, "dangling {relation} reference on {side} side")
            }
            Self::KindMismatch {
                expected,
                found: Some(found),
            } => write!(f, "record kind mismatch: expected {expected}, found {found}"),
            Self::KindMismatch {
                expected,
                found: None,
            } => write!(f, "record kind mismatch: expected {expected}, found unclassified"),
        }
    }
}

/// A [`Difference`] located in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// Event index.
    pub event: usize,
    /// Collection name.
    pub collection: String,
    /// Record index; `None` for collection-level findings.
    pub index: Option<usize>,
    #[serde(flatten)]
    pub difference: Difference,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(
                f,
                "event {} {}[{i}]: {}",
                self.event, self.collection, self.difference
            ),
            None => write!(
                f,
                "event {} {}: {}",
                self.event, self.collection, self.difference
            ),
        }
    }
}

/// Why a collection could not be compared for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralErrorKind {
    /// The old record at `index` matches no kind, or not the collection's kind.
    UnclassifiedRecord { index: usize },
    /// The old side has the collection; the new side lacks it or holds a
    /// non-collection product under the same name.
    MissingCollection,
}

/// Something that could not be compared, as opposed to a [`Mismatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralError {
    pub event: usize,
    pub collection: String,
    #[serde(flatten)]
    pub kind: StructuralErrorKind,
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StructuralErrorKind::UnclassifiedRecord { index } => write!(
                f,
                "event {} {}[{index}]: record matches no known kind, collection skipped",
                self.event, self.collection
            ),
            StructuralErrorKind::MissingCollection => write!(
                f,
                "event {} {}: collection missing on new side",
                self.event, self.collection
            ),
        }
    }
}

/// Fatal errors that abort a whole comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// The two inputs hold a different number of events.
    EventCountMismatch { old: usize, new: usize },
    /// An [`crate::store::EventSource`] reported an index as in range but
    /// returned no event for it.
    MissingEvent { side: Side, index: usize },
    /// The cancellation check fired after `completed_events` events.
    Cancelled { completed_events: usize },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventCountMismatch { old, new } => {
                write!(f, "event count mismatch: reference has {old}, new has {new}")
            }
            Self::MissingEvent { side, index } => {
                write!(f, "{side} input has no event at index {index}")
            }
            Self::Cancelled { completed_events } => {
                write!(f, "comparison cancelled after {completed_events} events")
            }
        }
    }
}

impl std::error::Error for CompareError {}
