use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::types::{Difference, Mismatch, StructuralError, StructuralErrorKind};

/// The accumulated outcome of a comparison run.
///
/// Owned by the engine while the run is in progress and handed to the caller
/// when it finishes. All collections are ordered, so two runs over the same
/// inputs serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MismatchReport {
    /// Number of events compared.
    pub events: usize,
    /// Record pairs compared, plus one per size-mismatched collection.
    pub examined: usize,
    /// Record pairs with at least one difference, plus one per
    /// size-mismatched collection.
    pub mismatched: usize,
    /// Mismatch count per configured collection.
    pub per_collection: BTreeMap<String, usize>,
    /// Every difference found, in discovery order.
    pub mismatches: Vec<Mismatch>,
    /// Collections that could not be compared.
    pub structural_errors: Vec<StructuralError>,
}

impl MismatchReport {
    /// Creates an empty report with a zero count for each of `collections`.
    pub fn new<S: AsRef<str>>(collections: &[S]) -> Self {
        Self {
            per_collection: collections
                .iter()
                .map(|name| (name.as_ref().to_owned(), 0))
                .collect(),
            ..Self::default()
        }
    }

    /// Mismatch count for `collection`; zero for unknown names.
    pub fn count(&self, collection: &str) -> usize {
        self.per_collection.get(collection).copied().unwrap_or(0)
    }

    /// Number of size mismatches recorded.
    pub fn size_mismatches(&self) -> usize {
        self.mismatches
            .iter()
            .filter(|m| matches!(m.difference, Difference::SizeMismatch { .. }))
            .count()
    }

    /// Returns `true` if nothing differed and everything could be compared.
    pub fn is_clean(&self) -> bool {
        self.mismatched == 0 && self.structural_errors.is_empty()
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Lowercase hex SHA-256 of the compact JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn digest(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&bytes);
        Ok(hex_encode(&hash))
    }

    pub(super) fn finish_event(&mut self) {
        self.events += 1;
    }

    fn bump(&mut self, collection: &str) {
        self.mismatched += 1;
        *self.per_collection.entry(collection.to_owned()).or_insert(0) += 1;
    }

    /// Records a collection whose lengths differ. Counts as one examined and
    /// one mismatched unit.
    pub(super) fn record_size_mismatch(
        &mut self,
        event: usize,
        collection: &str,
        old: usize,
        new: usize,
    ) {
        self.examined += 1;
        self.bump(collection);
        self.mismatches.push(Mismatch {
            event,
            collection: collection.to_owned(),
            index: None,
            difference: Difference::SizeMismatch { old, new },
        });
    }

    /// Records one compared record pair and its differences.
    pub(super) fn record_pair(
        &mut self,
        event: usize,
        collection: &str,
        index: usize,
        differences: Vec<Difference>,
    ) {
        self.examined += 1;
        if differences.is_empty() {
            return;
        }
        self.bump(collection);
        self.mismatches
            .extend(differences.into_iter().map(|difference| Mismatch {
                event,
                collection: collection.to_owned(),
                index: Some(index),
                difference,
            }));
    }

    pub(super) fn record_structural(
        &mut self,
        event: usize,
        collection: &str,
        kind: StructuralErrorKind,
    ) {
        self.structural_errors.push(StructuralError {
            event,
            collection: collection.to_owned(),
            kind,
        });
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[usize::from(b >> 4)] as char);
        out.push(HEX_CHARS[usize::from(b & 0x0f)] as char);
    }
    out
}
