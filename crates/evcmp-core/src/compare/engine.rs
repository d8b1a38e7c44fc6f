use std::collections::BTreeSet;

use crate::classify::Classifier;
use crate::store::{Event, EventSource};

use super::dispatch::{RecordPair, dispatch};
use super::report::MismatchReport;
use super::types::{CompareError, Difference, Side, StructuralErrorKind};

/// Collections compared by default, in report order.
pub const DEFAULT_COLLECTIONS: [&str; 34] = [
    "genParticles",
    "genVertices",
    "genJets",
    "genJetsFlavor",
    "muons",
    "muonITags",
    "electrons",
    "electronITags",
    "charged",
    "neutral",
    "photons",
    "photonITags",
    "jets",
    "jetParts",
    "jetsFlavor",
    "bTags",
    "cTags",
    "tauTags",
    "met",
    "genJetsToMC",
    "genJetsToFlavor",
    "muonsToMC",
    "muonsToITags",
    "electronsToMC",
    "electronsToITags",
    "chargedToMC",
    "neutralToMC",
    "photonsToMC",
    "photonsToITags",
    "jetsToParts",
    "jetsToFlavor",
    "jetsToBTags",
    "jetsToCTags",
    "jetsToTauTags",
];

/// Collections whose records may be classified as missing energy.
pub const DEFAULT_MISSING_ENERGY_COLLECTIONS: [&str; 1] = ["met"];

/// Which collections to compare and how to classify them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    /// Collection names, in report order.
    pub collections: Vec<String>,
    /// Collections designated to hold missing-energy records.
    pub missing_energy_collections: BTreeSet<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            collections: DEFAULT_COLLECTIONS.iter().map(|&s| s.to_owned()).collect(),
            missing_energy_collections: DEFAULT_MISSING_ENERGY_COLLECTIONS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
        }
    }
}

impl CompareConfig {
    /// A config comparing only `collections`, with the default
    /// missing-energy designation.
    pub fn with_collections<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            collections: collections.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Keeps only the collections for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.collections.retain(keep);
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.missing_energy_collections.iter().cloned())
    }
}

/// Compares `new` against the reference `old`.
///
/// # Errors
///
/// - [`CompareError::EventCountMismatch`] if the inputs differ in length;
///   no event is compared.
/// - [`CompareError::MissingEvent`] if a source fails to return an event
///   inside its own reported range.
pub fn compare_stores<O, N>(
    old: &O,
    new: &N,
    config: &CompareConfig,
) -> Result<MismatchReport, CompareError>
where
    O: EventSource + ?Sized,
    N: EventSource + ?Sized,
{
    compare_stores_with_cancel(old, new, config, || false)
}

/// Like [`compare_stores`], but calls `cancelled` before each event and
/// stops with [`CompareError::Cancelled`] once it returns `true`.
///
/// # Errors
///
/// See [`compare_stores`]; additionally [`CompareError::Cancelled`].
pub fn compare_stores_with_cancel<O, N>(
    old: &O,
    new: &N,
    config: &CompareConfig,
    mut cancelled: impl FnMut() -> bool,
) -> Result<MismatchReport, CompareError>
where
    O: EventSource + ?Sized,
    N: EventSource + ?Sized,
{
    if old.len() != new.len() {
        return Err(CompareError::EventCountMismatch {
            old: old.len(),
            new: new.len(),
        });
    }

    let classifier = config.classifier();
    let mut report = MismatchReport::new(&config.collections);

    for index in 0..old.len() {
        if cancelled() {
            return Err(CompareError::Cancelled {
                completed_events: index,
            });
        }
        let old_event = old.event(index).ok_or(CompareError::MissingEvent {
            side: Side::Old,
            index,
        })?;
        let new_event = new.event(index).ok_or(CompareError::MissingEvent {
            side: Side::New,
            index,
        })?;
        for name in &config.collections {
            compare_collection(&classifier, index, name, old_event, new_event, &mut report);
        }
        report.finish_event();
    }

    Ok(report)
}

/// Compares one named collection of one event.
///
/// A collection absent (or not a collection) on the old side is skipped.
/// Lengths must agree before any element is compared. The kind is taken
/// from the first old record and applies to the whole collection. A new
/// record that classifies as any other kind is a [`Difference::KindMismatch`].
fn compare_collection(
    classifier: &Classifier,
    event: usize,
    name: &str,
    old_event: &Event,
    new_event: &Event,
    report: &mut MismatchReport,
) {
    let Some(old) = old_event.collection(name) else {
        return;
    };
    let Some(new) = new_event.collection(name) else {
        report.record_structural(event, name, StructuralErrorKind::MissingCollection);
        return;
    };
    if old.len() != new.len() {
        report.record_size_mismatch(event, name, old.len(), new.len());
        return;
    }
    let Some(first) = old.records.first() else {
        return;
    };
    let Ok(kind) = classifier.classify(first, name) else {
        report.record_structural(event, name, StructuralErrorKind::UnclassifiedRecord { index: 0 });
        return;
    };

    for (index, (old_record, new_record)) in old.iter().zip(new.iter()).enumerate() {
        if !kind.is_exposed_by(old_record) {
            report.record_structural(
                event,
                name,
                StructuralErrorKind::UnclassifiedRecord { index },
            );
            return;
        }
        let found = classifier.classify(new_record, name).ok();
        if found != Some(kind) {
            report.record_pair(
                event,
                name,
                index,
                vec![Difference::KindMismatch {
                    expected: kind,
                    found,
                }],
            );
            continue;
        }
        let pair = RecordPair {
            old: old_record,
            new: new_record,
            old_event,
            new_event,
        };
        match dispatch(kind, &pair) {
            Ok(differences) => report.record_pair(event, name, index, differences),
            // Unreachable: both sides were checked above.
            Err(Side::Old | Side::New) => {
                report.record_structural(
                    event,
                    name,
                    StructuralErrorKind::UnclassifiedRecord { index },
                );
                return;
            }
        }
    }
}
