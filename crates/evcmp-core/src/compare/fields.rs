//! Exact-equality comparators for core, vertex, tagged-value and
//! missing-energy records.

use crate::record::{CoreFields, FourVector, MissingEnergy, Point, Scalar, ScalarField, float_eq};

use super::types::Difference;

/// Joins a relation prefix and a field name: `("mother", "charge")` gives
/// `mother.charge`.
pub(super) fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

fn push_f64(out: &mut Vec<Difference>, prefix: &str, name: &str, old: f64, new: f64) {
    if !float_eq(old, new) {
        out.push(Difference::field(
            field_path(prefix, name),
            Some(Scalar::Float(old)),
            Some(Scalar::Float(new)),
        ));
    }
}

fn compare_four_vector(
    old: &FourVector,
    new: &FourVector,
    prefix: &str,
    out: &mut Vec<Difference>,
) {
    let prefix = field_path(prefix, "p4");
    push_f64(out, &prefix, "px", old.px, new.px);
    push_f64(out, &prefix, "py", old.py, new.py);
    push_f64(out, &prefix, "pz", old.pz, new.pz);
    push_f64(out, &prefix, "mass", old.mass, new.mass);
}

/// Compares `x`, `y`, `z` of two points under `prefix`.
pub(super) fn compare_point(old: &Point, new: &Point, prefix: &str, out: &mut Vec<Difference>) {
    push_f64(out, prefix, "x", old.x, new.x);
    push_f64(out, prefix, "y", old.y, new.y);
    push_f64(out, prefix, "z", old.z, new.z);
}

/// Compares two core blocks.
///
/// The four-vector and vertex are compared only when both sides expose them.
/// Each scalar field is compared only when the old side carries it; a field
/// missing on the new side is reported with `new: None`. A field carried
/// only by the new side is not reported.
pub(super) fn compare_core(
    old: &CoreFields,
    new: &CoreFields,
    prefix: &str,
    out: &mut Vec<Difference>,
) {
    if let (Some(a), Some(b)) = (&old.p4, &new.p4) {
        compare_four_vector(a, b, prefix, out);
    }
    if let (Some(a), Some(b)) = (&old.vertex, &new.vertex) {
        compare_point(a, b, &field_path(prefix, "vertex"), out);
    }
    for field in ScalarField::ALL {
        let Some(a) = old.scalar(field) else {
            continue;
        };
        let b = new.scalar(field);
        if b != Some(a) {
            out.push(Difference::field(field_path(prefix, field.as_str()), Some(a), b));
        }
    }
}

pub(super) fn compare_tagged_value(old: Scalar, new: Scalar, out: &mut Vec<Difference>) {
    if old != new {
        out.push(Difference::field("value".to_owned(), Some(old), Some(new)));
    }
}

pub(super) fn compare_vertex(old: &Point, new: &Point, out: &mut Vec<Difference>) {
    compare_point(old, new, "position", out);
}

pub(super) fn compare_missing_energy(
    old: &MissingEnergy,
    new: &MissingEnergy,
    out: &mut Vec<Difference>,
) {
    push_f64(out, "", "magnitude", old.magnitude, new.magnitude);
    push_f64(out, "", "phi", old.phi, new.phi);
    push_f64(out, "", "scalar_sum", old.scalar_sum, new.scalar_sum);
}
