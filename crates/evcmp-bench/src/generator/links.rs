//! Association collections linking records of one event.

use evcmp_core::{Association, Collection, Record, RecordRef, Relation};
use rand::Rng;
use rand::rngs::StdRng;

/// One association per record of `from`, pointing at it through `own` and at
/// a random record of `target` through `other`.
///
/// The `other` reference is null with probability `null_rate`, and always
/// null when `target_len` is zero.
pub fn link_each(
    rng: &mut StdRng,
    (own, from, from_len): (Relation, &str, usize),
    (other, target, target_len): (Relation, &str, usize),
    null_rate: f64,
) -> Collection {
    (0..from_len)
        .map(|i| {
            let other_ref = if target_len == 0 || rng.gen_bool(null_rate) {
                None
            } else {
                Some(RecordRef::new(target, rng.gen_range(0..target_len)))
            };
            Record::association(
                Association::default()
                    .with_relation(own, Some(RecordRef::new(from, i)))
                    .with_relation(other, other_ref),
            )
        })
        .collect()
}

/// One association per tag record, linking record `i` of `from` through
/// `relation` to tag `i` and carrying the tag's value.
pub fn link_tags(
    relation: Relation,
    from: &str,
    from_len: usize,
    tags: &Collection,
) -> Collection {
    tags.iter()
        .enumerate()
        .take(from_len)
        .map(|(i, tag)| {
            let association =
                Association::default().with_relation(relation, Some(RecordRef::new(from, i)));
            let association = match tag.value {
                Some(value) => association.with_tag(value),
                None => association,
            };
            Record::association(association)
        })
        .collect()
}
