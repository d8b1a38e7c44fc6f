use crate::record::{Association, Relation};
use crate::store::Event;

use super::fields::compare_core;
use super::types::{Difference, Side};

/// Compares two association records.
///
/// Every relation the old record exposes is dereferenced on both sides and
/// the two target cores are compared with fields prefixed by the relation
/// name. Two null references are equal. A reference that cannot be resolved
/// is reported as [`Difference::DanglingReference`] for the side that failed;
/// the old side is checked first.
pub(super) fn compare_association(
    old: &Association,
    new: &Association,
    old_event: &Event,
    new_event: &Event,
    out: &mut Vec<Difference>,
) {
    for relation in Relation::ALL {
        let Some(old_target) = old.relations.get(&relation) else {
            continue;
        };
        let new_target = new.relations.get(&relation).and_then(Option::as_ref);

        let old_core = old_target.as_ref().map(|r| old_event.resolve(r));
        let new_core = new_target.map(|r| new_event.resolve(r));

        match (old_core, new_core) {
            (None, None) => {}
            (Some(Some(a)), Some(Some(b))) => compare_core(a, b, relation.as_str(), out),
            (None | Some(None), _) => out.push(dangling(relation, Side::Old)),
            (Some(Some(_)), None | Some(None)) => out.push(dangling(relation, Side::New)),
        }
    }

    if let Some(old_tag) = old.tag {
        if new.tag != Some(old_tag) {
            out.push(Difference::field("tag".to_owned(), Some(old_tag), new.tag));
        }
    }
}

fn dangling(relation: Relation, side: Side) -> Difference {
    Difference::DanglingReference { relation, side }
}
