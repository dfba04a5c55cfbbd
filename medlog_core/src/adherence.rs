//! Per-patient adherence aggregation.
//!
//! Counts are cumulative over the whole snapshot; no date range is applied.
//! A patient's denominator is the number of medications prescribed to them,
//! falling back to their taken + missed log count when none remain on file.

use crate::{
    AdherenceTier, JoinKey, Log, LogStatus, Medication, OverallStats, Patient, PatientAdherence,
    Snapshot,
};
use std::collections::HashSet;

/// Percentage of `numerator` over `denominator`, rounded half-up.
///
/// Returns 0 for a zero denominator. Not capped: more taken doses than
/// prescriptions yields a rate above 100.
pub fn percentage(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (f64::from(numerator) / f64::from(denominator) * 100.0).round() as u32
}

/// Compute one adherence row per patient, in patient order
pub fn patient_adherence(snapshot: &Snapshot, join: JoinKey) -> Vec<PatientAdherence> {
    let rows: Vec<_> = snapshot
        .patients
        .iter()
        .map(|patient| summarize_patient(patient, &snapshot.medications, &snapshot.logs, join))
        .collect();

    tracing::debug!(
        "Computed adherence for {} patients ({:?} join)",
        rows.len(),
        join
    );
    rows
}

fn summarize_patient(
    patient: &Patient,
    medications: &[Medication],
    logs: &[Log],
    join: JoinKey,
) -> PatientAdherence {
    let patient_meds: Vec<&Medication> = medications
        .iter()
        .filter(|m| m.patient_id == patient.id)
        .collect();

    let (taken, missed) = match join {
        JoinKey::PatientName => {
            count_outcomes(logs.iter().filter(|l| l.patient_name == patient.name))
        }
        JoinKey::Identifier => {
            let med_ids: HashSet<u64> = patient_meds.iter().map(|m| m.id).collect();
            // The log's own patient id wins; it survives medication deletion
            count_outcomes(logs.iter().filter(|l| match l.patient_id {
                Some(id) => id == patient.id,
                None => l.medication_id.is_some_and(|id| med_ids.contains(&id)),
            }))
        }
    };

    let total_meds = if patient_meds.is_empty() {
        taken + missed
    } else {
        patient_meds.len() as u32
    };

    PatientAdherence {
        patient: patient.name.clone(),
        total_meds,
        taken,
        missed,
        // Patient rates stay within 0..=100
        adherence_rate: percentage(taken, total_meds).min(100),
    }
}

fn count_outcomes<'a>(logs: impl Iterator<Item = &'a Log>) -> (u32, u32) {
    logs.fold((0, 0), |(taken, missed), log| match log.status {
        LogStatus::Taken => (taken + 1, missed),
        LogStatus::Missed => (taken, missed + 1),
        _ => (taken, missed),
    })
}

/// Classify a rate into a badge tier
pub fn classify(rate: u32, excellent_threshold: u32, good_threshold: u32) -> AdherenceTier {
    if rate >= excellent_threshold {
        AdherenceTier::Excellent
    } else if rate >= good_threshold {
        AdherenceTier::Good
    } else {
        AdherenceTier::NeedsAttention
    }
}

/// Headline totals, averaging the per-patient rates in `rows`
pub fn overall_stats(snapshot: &Snapshot, rows: &[PatientAdherence]) -> OverallStats {
    let total_missed = snapshot
        .logs
        .iter()
        .filter(|l| l.status == LogStatus::Missed)
        .count() as u32;

    let average_adherence = if rows.is_empty() {
        0
    } else {
        let sum: u32 = rows.iter().map(|r| r.adherence_rate).sum();
        (f64::from(sum) / rows.len() as f64).round() as u32
    };

    OverallStats {
        total_patients: snapshot.patients.len() as u32,
        total_medications: snapshot.medications.len() as u32,
        total_missed,
        average_adherence,
    }
}
