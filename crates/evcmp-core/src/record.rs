//! Record model for event collections.
//!
//! A [`Record`] is an opaque bundle of optional capabilities. Which
//! capabilities are present decides the record's kind (see
//! [`crate::classify`]); the comparators only ever look at the capability
//! matching that kind.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// An exact numeric value carried by a record field.
///
/// Integers and floats are kept apart so that identifiers such as `cell_id`
/// or `bits` keep their full 64-bit range. Equality is exact numeric
/// equality across variants; see [`PartialEq`] below.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer above `i64::MAX`.
    Unsigned(u64),
    /// IEEE 754 double.
    Float(f64),
}

/// Exact float equality in which two NaNs are equal.
///
/// Without the NaN rule a store compared against itself could report
/// mismatches, which breaks the zero-mismatch law.
pub fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn int_float_eq(int: i128, float: f64) -> bool {
    float.is_finite() && float.fract() == 0.0 && float as i128 == int
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Unsigned(a), Self::Unsigned(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_eq(a, b),
            (Self::Int(a), Self::Unsigned(b)) | (Self::Unsigned(b), Self::Int(a)) => {
                i128::from(a) == i128::from(b)
            }
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                int_float_eq(i128::from(a), b)
            }
            (Self::Unsigned(a), Self::Float(b)) | (Self::Float(b), Self::Unsigned(a)) => {
                int_float_eq(i128::from(a), b)
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Unsigned(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Geometric sub-structures
// ---------------------------------------------------------------------------

/// Four-momentum of a particle or jet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourVector {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub mass: f64,
}

/// A point in space (vertex or position).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

// ---------------------------------------------------------------------------
// Core fields
// ---------------------------------------------------------------------------

/// The optional scalar members of a core record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Bits,
    CellId,
    Energy,
    Time,
    Type,
    Charge,
    Status,
    Area,
}

impl ScalarField {
    /// All scalar fields in comparison order.
    pub const ALL: [ScalarField; 8] = [
        Self::Bits,
        Self::CellId,
        Self::Energy,
        Self::Time,
        Self::Type,
        Self::Charge,
        Self::Status,
        Self::Area,
    ];

    /// Returns the `snake_case` field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bits => "bits",
            Self::CellId => "cell_id",
            Self::Energy => "energy",
            Self::Time => "time",
            Self::Type => "type",
            Self::Charge => "charge",
            Self::Status => "status",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The common field block of particle- and jet-like records.
///
/// Every member is optional: which ones exist depends on the upstream record
/// type, not on the individual record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoreFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p4: Option<FourVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex: Option<Point>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scalars: BTreeMap<ScalarField, Scalar>,
}

impl CoreFields {
    /// Returns the value of `field`, if this record type carries it.
    pub fn scalar(&self, field: ScalarField) -> Option<Scalar> {
        self.scalars.get(&field).copied()
    }

    /// Builder-style setter used by fixtures and the generator.
    #[must_use]
    pub fn with_scalar(mut self, field: ScalarField, value: impl Into<Scalar>) -> Self {
        self.scalars.insert(field, value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

/// Named relation slots an association record may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Particle,
    Cluster,
    Mother,
    Daughter,
    Rec,
    Sim,
    Jet,
}

impl Relation {
    /// All relations in comparison order.
    pub const ALL: [Relation; 7] = [
        Self::Particle,
        Self::Cluster,
        Self::Mother,
        Self::Daughter,
        Self::Rec,
        Self::Sim,
        Self::Jet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Particle => "particle",
            Self::Cluster => "cluster",
            Self::Mother => "mother",
            Self::Daughter => "daughter",
            Self::Rec => "rec",
            Self::Sim => "sim",
            Self::Jet => "jet",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-owning reference to a record in another collection of the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub collection: String,
    pub index: usize,
}

impl RecordRef {
    pub fn new(collection: impl Into<String>, index: usize) -> Self {
        Self {
            collection: collection.into(),
            index,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.collection, self.index)
    }
}

/// A record linking other records, plus an optional classification tag.
///
/// A key in `relations` means the association type exposes that relation;
/// a `None` value is a null reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Association {
    #[serde(default)]
    pub relations: BTreeMap<Relation, Option<RecordRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Scalar>,
}

impl Association {
    #[must_use]
    pub fn with_relation(mut self, relation: Relation, target: Option<RecordRef>) -> Self {
        self.relations.insert(relation, target);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<Scalar>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Missing energy
// ---------------------------------------------------------------------------

/// Missing transverse energy summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingEnergy {
    pub magnitude: f64,
    pub phi: f64,
    pub scalar_sum: f64,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One element of a collection.
///
/// Each field is a capability accessor; a well-formed record exposes exactly
/// the capabilities of its upstream type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<CoreFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<Association>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub met: Option<MissingEnergy>,
}

impl Record {
    pub fn core(core: CoreFields) -> Self {
        Self {
            core: Some(core),
            ..Self::default()
        }
    }

    pub fn tagged_value(value: impl Into<Scalar>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn vertex(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn association(association: Association) -> Self {
        Self {
            association: Some(association),
            ..Self::default()
        }
    }

    pub fn missing_energy(met: MissingEnergy) -> Self {
        Self {
            met: Some(met),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn scalar_int_equality() {
        assert_eq!(Scalar::Int(-1), Scalar::Int(-1));
        assert_ne!(Scalar::Int(-1), Scalar::Int(1));
    }

    #[test]
    fn scalar_int_equals_integral_float() {
        assert_eq!(Scalar::Int(3), Scalar::Float(3.0));
        assert_eq!(Scalar::Float(3.0), Scalar::Int(3));
        assert_ne!(Scalar::Int(3), Scalar::Float(3.5));
    }

    #[test]
    fn scalar_unsigned_vs_negative_int() {
        assert_ne!(Scalar::Unsigned(u64::MAX), Scalar::Int(-1));
        assert_eq!(Scalar::Unsigned(7), Scalar::Int(7));
    }

    #[test]
    fn scalar_nan_equals_nan() {
        assert_eq!(Scalar::Float(f64::NAN), Scalar::Float(f64::NAN));
        assert_ne!(Scalar::Float(f64::NAN), Scalar::Float(0.0));
    }

    #[test]
    fn scalar_infinity_never_equals_int() {
        assert_ne!(Scalar::Float(f64::INFINITY), Scalar::Int(i64::MAX));
    }

    #[test]
    fn scalar_from_u64_prefers_int() {
        assert!(matches!(Scalar::from(5_u64), Scalar::Int(5)));
        assert!(matches!(Scalar::from(u64::MAX), Scalar::Unsigned(u64::MAX)));
    }

    #[test]
    fn scalar_display_keeps_float_marker() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Int(1).to_string(), "1");
    }

    #[test]
    fn scalar_json_shapes() {
        let v: Scalar = serde_json::from_str("-2").expect("int");
        assert!(matches!(v, Scalar::Int(-2)));
        let v: Scalar = serde_json::from_str("2.5").expect("float");
        assert!(matches!(v, Scalar::Float(x) if float_eq(x, 2.5)));
        let v: Scalar = serde_json::from_str("18446744073709551615").expect("u64");
        assert!(matches!(v, Scalar::Unsigned(u64::MAX)));
    }

    #[test]
    fn core_fields_json_round_trip() {
        let core = CoreFields {
            p4: Some(FourVector {
                px: 1.0,
                py: 2.0,
                pz: 3.0,
                mass: 0.105,
            }),
            vertex: None,
            scalars: BTreeMap::new(),
        }
        .with_scalar(ScalarField::Charge, -1)
        .with_scalar(ScalarField::CellId, u64::MAX);

        let json = serde_json::to_string(&core).expect("serialize");
        assert!(json.contains("\"charge\":-1"), "json: {json}");
        assert!(!json.contains("vertex"), "absent vertex is skipped: {json}");
        let back: CoreFields = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, core);
    }

    #[test]
    fn association_null_relation_round_trips() {
        let assoc = Association::default()
            .with_relation(Relation::Mother, None)
            .with_relation(Relation::Daughter, Some(RecordRef::new("genParticles", 4)));
        let json = serde_json::to_string(&assoc).expect("serialize");
        let back: Association = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, assoc);
        assert_eq!(back.relations.get(&Relation::Mother), Some(&None));
    }

    #[test]
    fn field_names_are_snake_case() {
        let names: Vec<&str> = ScalarField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            ["bits", "cell_id", "energy", "time", "type", "charge", "status", "area"]
        );
        let json = serde_json::to_string(&Relation::Daughter).expect("serialize");
        assert_eq!(json, "\"daughter\"");
    }

    #[test]
    fn record_ref_display() {
        assert_eq!(RecordRef::new("muons", 2).to_string(), "muons[2]");
    }
}
