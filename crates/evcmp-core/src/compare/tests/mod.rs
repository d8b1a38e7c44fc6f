#![allow(clippy::expect_used)]


use crate::record::{
    Association, CoreFields, FourVector, MissingEnergy, Point, Record, RecordRef, Relation,
    ScalarField,
};
use crate::store::{Collection, Event, EventStore};

pub(crate) fn muon(charge: i64, px: f64) -> Record {
    Record::core(
        CoreFields {
            p4: Some(FourVector {
                px,
                py: 0.5,
                pz: -2.0,
                mass: 0.105,
            }),
            vertex: None,
            ..CoreFields::default()
        }
        .with_scalar(ScalarField::Charge, charge)
        .with_scalar(ScalarField::Status, 1),
    )
}

pub(crate) fn jet(energy: f64) -> Record {
    Record::core(
        CoreFields::default()
            .with_scalar(ScalarField::Energy, energy)
            .with_scalar(ScalarField::Area, 0.4),
    )
}

pub(crate) fn vertex(z: f64) -> Record {
    Record::vertex(Point { x: 0.0, y: 0.0, z })
}

pub(crate) fn met(phi: f64) -> Record {
    Record::missing_energy(MissingEnergy {
        magnitude: 25.0,
        phi,
        scalar_sum: 310.0,
    })
}

pub(crate) fn mother_link(target: Option<usize>) -> Record {
    Record::association(Association::default().with_relation(
        Relation::Mother,
        target.map(|i| RecordRef::new("genParticles", i)),
    ))
}

pub(crate) fn collection(records: Vec<Record>) -> Collection {
    Collection::new(records)
}

pub(crate) fn single_event_store(collections: Vec<(&str, Vec<Record>)>) -> EventStore {
    let event = collections
        .into_iter()
        .fold(Event::default(), |event, (name, records)| {
            event.with_collection(name, collection(records))
        });
    EventStore::new(vec![event])
}
