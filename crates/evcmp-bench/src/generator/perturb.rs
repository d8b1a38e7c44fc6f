//! Controlled edits to a generated file, with a log of what must differ.
//!
//! [`perturb`] changes exactly one comparable field of randomly chosen
//! records. [`PerturbationLog::expected_counts`] then predicts the
//! per-collection mismatch counts a comparison against the original must
//! report, including association records whose targets were edited.

use std::collections::{BTreeMap, BTreeSet};

use evcmp_core::{Association, CoreFields, EventFile, Record, Scalar, ScalarField};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where a record lives: event index, collection name, record index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordSite {
    pub event: usize,
    pub collection: String,
    pub index: usize,
}

/// How many records to edit.
#[derive(Debug, Clone, Copy)]
pub struct Perturbation {
    pub seed: u64,
    /// Probability that any one record is edited.
    pub rate: f64,
}

/// Records edited by [`perturb`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerturbationLog {
    pub changed: BTreeSet<RecordSite>,
}

impl PerturbationLog {
    /// Number of edited records.
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Mismatch count per collection in `collections` when `original` is
    /// compared against its perturbed copy.
    ///
    /// An association record also mismatches when any relation of the
    /// original points at an edited record.
    pub fn expected_counts(
        &self,
        original: &EventFile,
        collections: &[String],
    ) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> =
            collections.iter().map(|name| (name.clone(), 0)).collect();

        for (event_index, event) in original.events.iter().enumerate() {
            for name in collections {
                let Some(collection) = event.collection(name) else {
                    continue;
                };
                for (index, record) in collection.iter().enumerate() {
                    let site = RecordSite {
                        event: event_index,
                        collection: name.clone(),
                        index,
                    };
                    let edited = self.changed.contains(&site);
                    let rippled = record
                        .association
                        .as_ref()
                        .is_some_and(|a| self.targets_edited(event_index, a));
                    if edited || rippled {
                        *counts.entry(name.clone()).or_insert(0) += 1;
                    }
                }
            }
        }
        counts
    }

    fn targets_edited(&self, event: usize, association: &Association) -> bool {
        association.relations.values().flatten().any(|target| {
            self.changed.contains(&RecordSite {
                event,
                collection: target.collection.clone(),
                index: target.index,
            })
        })
    }
}

/// Returns a copy of `file` with roughly `rate` of its records edited, plus
/// the log of edited sites.
///
/// Summary products are never touched. Records without an editable field
/// (an association with no non-null relation and no tag) are skipped.
pub fn perturb(file: &EventFile, perturbation: &Perturbation) -> (EventFile, PerturbationLog) {
    let mut rng = StdRng::seed_from_u64(perturbation.seed);
    let mut out = file.clone();
    let mut log = PerturbationLog::default();

    for (event_index, event) in out.events.iter_mut().enumerate() {
        for (name, product) in &mut event.products {
            let evcmp_core::Product::Collection(collection) = product else {
                continue;
            };
            for (index, record) in collection.records.iter_mut().enumerate() {
                if rng.gen_bool(perturbation.rate) && edit(record) {
                    log.changed.insert(RecordSite {
                        event: event_index,
                        collection: name.clone(),
                        index,
                    });
                }
            }
        }
    }
    (out, log)
}

/// Changes one comparable field of `record`. Returns `false` if nothing
/// could be changed.
fn edit(record: &mut Record) -> bool {
    if let Some(core) = record.core.as_mut() {
        return edit_core(core);
    }
    if let Some(value) = record.value.as_mut() {
        *value = bump(*value);
        return true;
    }
    if let Some(position) = record.position.as_mut() {
        position.x += 1.0;
        return true;
    }
    if let Some(association) = record.association.as_mut() {
        if let Some(target) = association.relations.values_mut().find(|t| t.is_some()) {
            *target = None;
            return true;
        }
        if let Some(tag) = association.tag.as_mut() {
            *tag = bump(*tag);
            return true;
        }
        return false;
    }
    if let Some(met) = record.met.as_mut() {
        met.phi += 0.25;
        return true;
    }
    false
}

fn edit_core(core: &mut CoreFields) -> bool {
    for field in [ScalarField::Charge, ScalarField::Energy] {
        if let Some(value) = core.scalars.get_mut(&field) {
            *value = bump(*value);
            return true;
        }
    }
    if let Some(p4) = core.p4.as_mut() {
        p4.px += 1.0;
        return true;
    }
    false
}

/// Adds one to a scalar, keeping its variant.
pub fn bump(value: Scalar) -> Scalar {
    match value {
        Scalar::Int(i) => Scalar::Int(i.wrapping_add(1)),
        Scalar::Unsigned(u) => Scalar::Unsigned(u.wrapping_add(1)),
        Scalar::Float(f) => Scalar::Float(f + 1.0),
    }
}

/// Removes the last record of `collection` in event `event`, if any.
///
/// Returns `true` when a record was removed.
pub fn drop_last(file: &mut EventFile, event: usize, collection: &str) -> bool {
    let Some(evcmp_core::Product::Collection(records)) = file
        .events
        .get_mut(event)
        .and_then(|e| e.products.get_mut(collection))
    else {
        return false;
    };
    records.records.pop().is_some()
}
