use crate::classify::RecordKind;
use crate::record::Record;
use crate::store::Event;

use super::assoc::compare_association;
use super::fields::{compare_core, compare_missing_energy, compare_tagged_value, compare_vertex};
use super::types::{Difference, Side};

/// A pair of records at the same index, with the events that own them so
/// association references can be resolved.
pub(super) struct RecordPair<'a> {
    pub old: &'a Record,
    pub new: &'a Record,
    pub old_event: &'a Event,
    pub new_event: &'a Event,
}

/// Extracts the same capability from both records.
///
/// Fails with the side that does not expose it.
fn capability<'a, T>(
    pair: &RecordPair<'a>,
    get: impl Fn(&'a Record) -> Option<T>,
) -> Result<(T, T), Side> {
    let old = get(pair.old).ok_or(Side::Old)?;
    let new = get(pair.new).ok_or(Side::New)?;
    Ok((old, new))
}

/// Runs the comparator registered for `kind` on `pair`.
///
/// # Errors
///
/// Returns the [`Side`] whose record does not expose the capability `kind`
/// is compared on.
pub(super) fn dispatch(kind: RecordKind, pair: &RecordPair<'_>) -> Result<Vec<Difference>, Side> {
    let mut out = Vec::new();
    match kind {
        RecordKind::Core => {
            let (old, new) = capability(pair, |r| r.core.as_ref())?;
            compare_core(old, new, "", &mut out);
        }
        RecordKind::TaggedValue => {
            let (old, new) = capability(pair, |r| r.value)?;
            compare_tagged_value(old, new, &mut out);
        }
        RecordKind::Vertex => {
            let (old, new) = capability(pair, |r| r.position.as_ref())?;
            compare_vertex(old, new, &mut out);
        }
        RecordKind::Association => {
            let (old, new) = capability(pair, |r| r.association.as_ref())?;
            compare_association(old, new, pair.old_event, pair.new_event, &mut out);
        }
        RecordKind::MissingEnergy => {
            let (old, new) = capability(pair, |r| r.met.as_ref())?;
            compare_missing_energy(old, new, &mut out);
        }
    }
    Ok(out)
}
