//! Property-based tests for the comparison engine.
//!
//! Generates small stores (1-4 events, a handful of collections with 0-6
//! records each) and checks the laws a comparison run must obey regardless of
//! the data: determinism, symmetry of size mismatches, zero mismatches under
//! self-comparison, and stable classification.
#![allow(clippy::expect_used)]

use evcmp_core::{
    Association, Classifier, Collection, CompareConfig, CoreFields, Event, EventStore, FourVector,
    MissingEnergy, Point, Record, RecordRef, Relation, ScalarField, compare_stores,
};
use proptest::prelude::*;

const COLLECTIONS: [&str; 5] = ["genParticles", "jets", "bTags", "met", "muonsToMC"];

fn arb_particle() -> impl Strategy<Value = Record> {
    (-2i64..=2, -50.0f64..50.0, 0.0f64..5.0, prop::bool::ANY).prop_map(
        |(charge, px, mass, with_vertex)| {
            let core = CoreFields {
                p4: Some(FourVector {
                    px,
                    py: px / 2.0,
                    pz: -px,
                    mass,
                }),
                vertex: with_vertex.then_some(Point {
                    x: 0.0,
                    y: 0.0,
                    z: mass,
                }),
                ..CoreFields::default()
            }
            .with_scalar(ScalarField::Charge, charge)
            .with_scalar(ScalarField::Status, 1);
            Record::core(core)
        },
    )
}

fn arb_jet() -> impl Strategy<Value = Record> {
    (0.0f64..500.0, 0.1f64..1.0).prop_map(|(energy, area)| {
        Record::core(
            CoreFields::default()
                .with_scalar(ScalarField::Energy, energy)
                .with_scalar(ScalarField::Area, area),
        )
    })
}

fn arb_met() -> impl Strategy<Value = Record> {
    (0.0f64..100.0, -3.0f64..3.0).prop_map(|(magnitude, phi)| {
        Record::missing_energy(MissingEnergy {
            magnitude,
            phi,
            scalar_sum: magnitude * 4.0,
        })
    })
}

/// An event whose association records point into its own `genParticles`.
fn arb_event() -> impl Strategy<Value = Event> {
    (
        prop::collection::vec(arb_particle(), 0..6),
        prop::collection::vec(arb_jet(), 0..6),
        prop::collection::vec(0.0f64..1.0, 0..6),
        arb_met(),
        prop::collection::vec(prop::option::of(0usize..6), 0..4),
    )
        .prop_map(|(particles, jets, tags, met, links)| {
            let n = particles.len();
            let links = links
                .into_iter()
                .map(|target| {
                    let target = target
                        .filter(|_| n > 0)
                        .map(|i| RecordRef::new("genParticles", i % n.max(1)));
                    Record::association(
                        Association::default().with_relation(Relation::Mother, target),
                    )
                })
                .collect::<Collection>();
            Event::default()
                .with_collection("genParticles", Collection::new(particles))
                .with_collection("jets", Collection::new(jets))
                .with_collection(
                    "bTags",
                    tags.into_iter().map(Record::tagged_value).collect(),
                )
                .with_collection("met", Collection::new(vec![met]))
                .with_collection("muonsToMC", links)
        })
}

fn arb_store() -> impl Strategy<Value = EventStore> {
    prop::collection::vec(arb_event(), 1..4).prop_map(EventStore::new)
}

fn config() -> CompareConfig {
    CompareConfig::with_collections(COLLECTIONS)
}

fn total_records(store: &EventStore) -> usize {
    store
        .events()
        .iter()
        .flat_map(|event| COLLECTIONS.iter().filter_map(|name| event.collection(name)))
        .map(Collection::len)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Comparing a store with itself examines every record and finds nothing.
    #[test]
    fn self_comparison_is_clean(store in arb_store()) {
        let report = compare_stores(&store, &store, &config()).expect("same length");
        prop_assert!(report.is_clean());
        prop_assert_eq!(report.examined, total_records(&store));
        prop_assert_eq!(report.events, store.events().len());
    }

    /// Two runs over the same inputs produce byte-identical reports.
    #[test]
    fn comparison_is_deterministic(old in arb_store(), new in arb_store()) {
        let n = old.events().len().min(new.events().len());
        let old = EventStore::new(old.events()[..n].to_vec());
        let new = EventStore::new(new.events()[..n].to_vec());

        let a = compare_stores(&old, &new, &config()).expect("same length");
        let b = compare_stores(&old, &new, &config()).expect("same length");
        prop_assert_eq!(a.to_json().expect("json"), b.to_json().expect("json"));
        prop_assert_eq!(a.digest().expect("digest"), b.digest().expect("digest"));
        prop_assert!(a.examined >= a.mismatched);
    }

    /// Swapping the inputs yields the same number of size mismatches.
    #[test]
    fn size_mismatches_are_symmetric(old in arb_store(), new in arb_store()) {
        let n = old.events().len().min(new.events().len());
        let old = EventStore::new(old.events()[..n].to_vec());
        let new = EventStore::new(new.events()[..n].to_vec());

        let forward = compare_stores(&old, &new, &config()).expect("same length");
        let backward = compare_stores(&new, &old, &config()).expect("same length");
        prop_assert_eq!(forward.size_mismatches(), backward.size_mismatches());
    }

    /// Different event counts never produce a report.
    #[test]
    fn event_count_mismatch_is_fatal(old in arb_store(), extra in arb_event()) {
        let mut new = old.clone();
        new.push(extra);
        prop_assert!(compare_stores(&old, &new, &config()).is_err());
    }

    /// Classifying a record twice gives the same answer.
    #[test]
    fn classification_is_stable(event in arb_event()) {
        let classifier = Classifier::new(["met"]);
        for name in COLLECTIONS {
            let Some(collection) = event.collection(name) else { continue };
            for record in collection.iter() {
                prop_assert_eq!(
                    classifier.classify(record, name),
                    classifier.classify(record, name)
                );
                prop_assert!(classifier.classify(record, name).is_ok());
            }
        }
    }
}
