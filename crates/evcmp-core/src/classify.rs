//! Record classification by capability.
//!
//! Records do not declare a type. Their kind is inferred by probing a fixed,
//! ordered list of capabilities; the first capability present wins.
//!
//! | Priority | Capability                     | Kind                          |
//! |----------|--------------------------------|-------------------------------|
//! | 1        | `core`                         | [`RecordKind::Core`]          |
//! | 2        | `value`                        | [`RecordKind::TaggedValue`]   |
//! | 3        | `position`                     | [`RecordKind::Vertex`]        |
//! | 4        | `association`                  | [`RecordKind::Association`]   |
//! | 5        | `met`, in a designated collection | [`RecordKind::MissingEnergy`] |
//!
//! A record matching none of these is a [`ClassifyError::UnclassifiedRecord`].

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::record::Record;

/// The five known record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Core,
    TaggedValue,
    Vertex,
    Association,
    MissingEnergy,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::TaggedValue => "tagged_value",
            Self::Vertex => "vertex",
            Self::Association => "association",
            Self::MissingEnergy => "missing_energy",
        }
    }

    /// Returns `true` if `record` exposes the capability this kind is
    /// compared on.
    pub fn is_exposed_by(self, record: &Record) -> bool {
        match self {
            Self::Core => record.core.is_some(),
            Self::TaggedValue => record.value.is_some(),
            Self::Vertex => record.position.is_some(),
            Self::Association => record.association.is_some(),
            Self::MissingEnergy => record.met.is_some(),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The record exposes none of the known capabilities, or only the
    /// missing-energy capability outside a designated collection.
    UnclassifiedRecord {
        /// Collection the record belongs to.
        collection: String,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclassifiedRecord { collection } => {
                write!(f, "record in {collection:?} matches no known record kind")
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Capability-based classifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classifier {
    missing_energy_collections: BTreeSet<String>,
}

impl Classifier {
    /// Creates a classifier that accepts missing-energy records only in the
    /// given collections.
    pub fn new<I, S>(missing_energy_collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            missing_energy_collections: missing_energy_collections
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    pub fn is_missing_energy_collection(&self, collection: &str) -> bool {
        self.missing_energy_collections.contains(collection)
    }

    /// Determines the kind of `record`, a member of `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::UnclassifiedRecord`] if no capability matches.
    pub fn classify(&self, record: &Record, collection: &str) -> Result<RecordKind, ClassifyError> {
        if record.core.is_some() {
            return Ok(RecordKind::Core);
        }
        if record.value.is_some() {
            return Ok(RecordKind::TaggedValue);
        }
        if record.position.is_some() {
            return Ok(RecordKind::Vertex);
        }
        if record.association.is_some() {
            return Ok(RecordKind::Association);
        }
        if record.met.is_some() && self.is_missing_energy_collection(collection) {
            return Ok(RecordKind::MissingEnergy);
        }
        Err(ClassifyError::UnclassifiedRecord {
            collection: collection.to_owned(),
        })
    }
}
