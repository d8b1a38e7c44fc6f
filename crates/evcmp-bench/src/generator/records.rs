//! Single-record generators.

use evcmp_core::{CoreFields, FourVector, MissingEnergy, Point, Record, ScalarField};
use rand::Rng;
use rand::rngs::StdRng;

/// PDG ids drawn for generator-level particles.
const PDG_IDS: [i64; 8] = [11, -11, 13, -13, 22, 211, -211, 2212];

fn four_vector(rng: &mut StdRng, max_pt: f64) -> FourVector {
    FourVector {
        px: rng.gen_range(-max_pt..max_pt),
        py: rng.gen_range(-max_pt..max_pt),
        pz: rng.gen_range(-4.0 * max_pt..4.0 * max_pt),
        mass: rng.gen_range(0.0..1.0),
    }
}

fn point(rng: &mut StdRng) -> Point {
    Point {
        x: rng.gen_range(-0.05..0.05),
        y: rng.gen_range(-0.05..0.05),
        z: rng.gen_range(-50.0..50.0),
    }
}

fn charge(rng: &mut StdRng) -> i64 {
    rng.gen_range(-1i64..=1)
}

/// A generator-level particle: momentum, production vertex, PDG id, charge
/// and status.
pub fn gen_particle(rng: &mut StdRng) -> Record {
    let pdg = PDG_IDS[rng.gen_range(0..PDG_IDS.len())];
    Record::core(
        CoreFields {
            p4: Some(four_vector(rng, 100.0)),
            vertex: Some(point(rng)),
            ..CoreFields::default()
        }
        .with_scalar(ScalarField::Type, pdg)
        .with_scalar(ScalarField::Charge, charge(rng))
        .with_scalar(ScalarField::Status, rng.gen_range(1i64..=3)),
    )
}

/// A reconstructed particle: momentum, charge and quality bits.
pub fn reco_particle(rng: &mut StdRng) -> Record {
    Record::core(
        CoreFields {
            p4: Some(four_vector(rng, 80.0)),
            ..CoreFields::default()
        }
        .with_scalar(ScalarField::Charge, charge(rng))
        .with_scalar(ScalarField::Bits, rng.gen_range(0i64..256)),
    )
}

/// A calorimeter-like neutral object: momentum, energy, time and cell id.
pub fn neutral(rng: &mut StdRng) -> Record {
    Record::core(
        CoreFields {
            p4: Some(four_vector(rng, 60.0)),
            ..CoreFields::default()
        }
        .with_scalar(ScalarField::Energy, rng.gen_range(0.5f64..200.0))
        .with_scalar(ScalarField::Time, rng.gen_range(0.0f64..25.0))
        .with_scalar(ScalarField::CellId, rng.gen_range(0i64..1_000_000)),
    )
}

/// A jet: momentum, energy and catchment area.
pub fn jet(rng: &mut StdRng) -> Record {
    Record::core(
        CoreFields {
            p4: Some(four_vector(rng, 300.0)),
            ..CoreFields::default()
        }
        .with_scalar(ScalarField::Energy, rng.gen_range(20.0f64..1500.0))
        .with_scalar(ScalarField::Area, rng.gen_range(0.2f64..0.8)),
    )
}

/// A vertex position.
pub fn vertex(rng: &mut StdRng) -> Record {
    Record::vertex(point(rng))
}

/// A tagger discriminant in `[0, 1)`.
pub fn tag(rng: &mut StdRng) -> Record {
    Record::tagged_value(rng.gen_range(0.0f64..1.0))
}

/// A relative isolation value for a reconstructed lepton or photon.
pub fn isolation(rng: &mut StdRng) -> Record {
    Record::tagged_value(rng.gen_range(0.0f64..2.0))
}

/// A jet flavour label.
pub fn flavour(rng: &mut StdRng) -> Record {
    Record::tagged_value(rng.gen_range(0i64..=5))
}

/// The event's missing transverse energy.
pub fn missing_energy(rng: &mut StdRng) -> Record {
    let magnitude = rng.gen_range(0.0..150.0);
    Record::missing_energy(MissingEnergy {
        magnitude,
        phi: rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI),
        scalar_sum: magnitude + rng.gen_range(50.0..800.0),
    })
}
