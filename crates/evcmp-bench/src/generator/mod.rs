//! Synthetic event generator.
//!
//! Produces [`EventFile`] instances whose collections follow the default
//! comparison list: generator-level particles and vertices, reconstructed
//! particles, jets with tags and flavours, missing energy, and the
//! association collections linking them.

pub mod links;
pub mod perturb;
pub mod records;

use evcmp_core::{Collection, Event, EventFile, Product, Record, Relation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use links::{link_each, link_tags};

/// Configuration for the event generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of events.
    pub num_events: usize,
    /// Upper bound on generator-level particles per event.
    pub max_gen_particles: usize,
    /// Upper bound on records in each reconstructed particle collection.
    pub max_reco_particles: usize,
    /// Upper bound on jets (and generator-level jets) per event.
    pub max_jets: usize,
    /// Fraction of truth links left null.
    pub null_link_rate: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 10 events, ~300 records each
    Small,
    /// 100 events, ~1000 records each
    Medium,
    /// 1000 events, ~1000 records each
    Large,
}

impl SizeTier {
    /// Returns the default [`GeneratorConfig`] for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_events: 10,
                max_gen_particles: 60,
                max_reco_particles: 12,
                max_jets: 8,
                null_link_rate: 0.1,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_events: 100,
                max_gen_particles: 200,
                max_reco_particles: 40,
                max_jets: 20,
                null_link_rate: 0.1,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_events: 1000,
                max_gen_particles: 200,
                max_reco_particles: 40,
                max_jets: 20,
                null_link_rate: 0.15,
            },
        }
    }
}

/// Generates an event file from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_events(config: &GeneratorConfig) -> EventFile {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let events = (0..config.num_events)
        .map(|index| generate_event(config, index, &mut rng))
        .collect();
    EventFile::new(events)
}

fn sized(rng: &mut StdRng, max: usize, f: fn(&mut StdRng) -> Record) -> Collection {
    let len = rng.gen_range(0..=max);
    (0..len).map(|_| f(rng)).collect()
}

fn generate_event(config: &GeneratorConfig, index: usize, rng: &mut StdRng) -> Event {
    let gen_particles = sized(rng, config.max_gen_particles, records::gen_particle);
    let gen_vertices = sized(rng, config.max_gen_particles / 10, records::vertex);
    let gen_jets = sized(rng, config.max_jets, records::jet);
    let jets = sized(rng, config.max_jets, records::jet);
    let jet_parts = sized(rng, config.max_reco_particles, records::reco_particle);
    let n_gen = gen_particles.len();

    let mut event = Event::default();
    for (name, isolation) in [
        ("muons", Some("muonITags")),
        ("electrons", Some("electronITags")),
        ("charged", None),
        ("neutral", None),
        ("photons", Some("photonITags")),
    ] {
        let make: fn(&mut StdRng) -> Record = if name == "neutral" || name == "photons" {
            records::neutral
        } else {
            records::reco_particle
        };
        let reco = sized(rng, config.max_reco_particles, make);
        let link = link_each(
            rng,
            (Relation::Rec, name, reco.len()),
            (Relation::Sim, "genParticles", n_gen),
            config.null_link_rate,
        );
        if let Some(tags_name) = isolation {
            let tags: Collection = (0..reco.len()).map(|_| records::isolation(rng)).collect();
            event.insert_collection(
                format!("{name}ToITags"),
                link_tags(Relation::Rec, name, reco.len(), &tags),
            );
            event.insert_collection(tags_name, tags);
        }
        event.insert_collection(format!("{name}ToMC"), link);
        event.insert_collection(name, reco);
    }

    let gen_jet_links = link_each(
        rng,
        (Relation::Jet, "genJets", gen_jets.len()),
        (Relation::Particle, "genParticles", n_gen),
        config.null_link_rate,
    );
    let jets_to_parts = link_each(
        rng,
        (Relation::Jet, "jets", jets.len()),
        (Relation::Particle, "jetParts", jet_parts.len()),
        0.0,
    );
    for (source, len, name, link_name) in [
        ("genJets", gen_jets.len(), "genJetsFlavor", "genJetsToFlavor"),
        ("jets", jets.len(), "jetsFlavor", "jetsToFlavor"),
    ] {
        let flavour: Collection = (0..len).map(|_| records::flavour(rng)).collect();
        event.insert_collection(link_name, link_tags(Relation::Jet, source, len, &flavour));
        event.insert_collection(name, flavour);
    }
    for (name, link_name) in [
        ("bTags", "jetsToBTags"),
        ("cTags", "jetsToCTags"),
        ("tauTags", "jetsToTauTags"),
    ] {
        let tags: Collection = (0..jets.len()).map(|_| records::tag(rng)).collect();
        let links = link_tags(Relation::Jet, "jets", jets.len(), &tags);
        event.insert_collection(link_name, links);
        event.insert_collection(name, tags);
    }

    event.insert_collection("genJetsToMC", gen_jet_links);
    event.insert_collection("jetsToParts", jets_to_parts);
    event.insert_collection("genParticles", gen_particles);
    event.insert_collection("genVertices", gen_vertices);
    event.insert_collection("genJets", gen_jets);
    event.insert_collection("jets", jets);
    event.insert_collection("jetParts", jet_parts);
    event.insert_collection("met", Collection::new(vec![records::missing_energy(rng)]));
    event.products.insert(
        "eventInfo".to_owned(),
        Product::Summary {
            value: serde_json::json!({ "number": index, "weight": 1.0 }),
        },
    );
    event
}
