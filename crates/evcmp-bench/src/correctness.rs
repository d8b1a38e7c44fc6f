//! Post-comparison invariant checkers for correctness validation.

use std::collections::{BTreeMap, BTreeSet};

use evcmp_core::{EventFile, MismatchReport};

/// Number of records held by the configured collections of `file`.
///
/// Summary products and absent collections contribute nothing.
pub fn count_records(file: &EventFile, collections: &[String]) -> usize {
    file.events
        .iter()
        .flat_map(|event| collections.iter().filter_map(|name| event.collection(name)))
        .map(evcmp_core::Collection::len)
        .sum()
}

/// Verifies the report's counters agree with each other:
/// - `mismatched <= examined`
/// - per-collection counts sum to `mismatched`
/// - every mismatched unit has at least one listed difference
pub fn check_report_accounting(report: &MismatchReport) -> Result<(), String> {
    if report.mismatched > report.examined {
        return Err(format!(
            "mismatched({}) exceeds examined({})",
            report.mismatched, report.examined
        ));
    }

    let summed: usize = report.per_collection.values().sum();
    if summed != report.mismatched {
        return Err(format!(
            "per-collection counts sum to {summed}, report says {}",
            report.mismatched
        ));
    }

    let units: BTreeSet<(usize, &str, Option<usize>)> = report
        .mismatches
        .iter()
        .map(|m| (m.event, m.collection.as_str(), m.index))
        .collect();
    if units.len() != report.mismatched {
        return Err(format!(
            "{} distinct mismatch sites listed, report counts {}",
            units.len(),
            report.mismatched
        ));
    }
    Ok(())
}

/// Verifies comparing `file` with itself found nothing and examined every
/// record of the configured collections.
pub fn check_self_compare(
    file: &EventFile,
    collections: &[String],
    report: &MismatchReport,
) -> Result<(), String> {
    if !report.is_clean() {
        return Err(format!(
            "self-comparison has {} mismatches and {} structural errors",
            report.mismatched,
            report.structural_errors.len()
        ));
    }
    let total = count_records(file, collections);
    if report.examined != total {
        return Err(format!(
            "self-comparison examined {} of {total} records",
            report.examined
        ));
    }
    if report.events != file.events.len() {
        return Err(format!(
            "self-comparison covered {} of {} events",
            report.events,
            file.events.len()
        ));
    }
    Ok(())
}

/// Verifies the per-collection counts equal `expected` exactly.
pub fn check_expected_counts(
    report: &MismatchReport,
    expected: &BTreeMap<String, usize>,
) -> Result<(), String> {
    for (name, &want) in expected {
        let got = report.count(name);
        if got != want {
            return Err(format!("{name}: expected {want} mismatches, found {got}"));
        }
    }
    for (name, &got) in &report.per_collection {
        if got != 0 && !expected.contains_key(name) {
            return Err(format!("{name}: {got} unexpected mismatches"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use evcmp_core::{Difference, Mismatch, Scalar};

    use super::*;

    fn mismatch(event: usize, collection: &str, index: usize) -> Mismatch {
        Mismatch {
            event,
            collection: collection.to_owned(),
            index: Some(index),
            difference: Difference::FieldMismatch {
                field: "charge".to_owned(),
                old: Some(Scalar::Int(0)),
                new: Some(Scalar::Int(1)),
            },
        }
    }

    #[test]
    fn accounting_accepts_two_differences_on_one_record() {
        let mut report = MismatchReport::new(&["muons"]);
        report.examined = 3;
        report.mismatched = 1;
        report.per_collection.insert("muons".to_owned(), 1);
        report.mismatches = vec![mismatch(0, "muons", 1), mismatch(0, "muons", 1)];
        assert_eq!(check_report_accounting(&report), Ok(()));
    }

    #[test]
    fn accounting_rejects_count_drift() {
        let mut report = MismatchReport::new(&["muons"]);
        report.examined = 3;
        report.mismatched = 2;
        report.per_collection.insert("muons".to_owned(), 1);
        report.mismatches = vec![mismatch(0, "muons", 1)];
        assert!(check_report_accounting(&report).is_err());
    }

    #[test]
    fn expected_counts_flag_extra_collections() {
        let mut report = MismatchReport::new(&["muons", "jets"]);
        report.per_collection.insert("jets".to_owned(), 2);
        let expected = BTreeMap::from([("muons".to_owned(), 0)]);
        assert!(check_expected_counts(&report, &expected).is_err());
    }
}
