//! Adherence by medication name across all patients.

use crate::adherence::percentage;
use crate::{JoinKey, LogStatus, MedicationPerformance, Snapshot};
use std::collections::HashMap;

/// Compute one row per distinct medication name
///
/// Rows appear in the order each name is first seen among the medication
/// records. Taken logs for a name with no prescriptions are dropped.
pub fn medication_performance(snapshot: &Snapshot, join: JoinKey) -> Vec<MedicationPerformance> {
    let mut rows: Vec<MedicationPerformance> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for med in &snapshot.medications {
        let slot = *index.entry(med.medication_name.as_str()).or_insert_with(|| {
            rows.push(MedicationPerformance {
                medication: med.medication_name.clone(),
                prescribed: 0,
                taken: 0,
                adherence_rate: 0,
            });
            rows.len() - 1
        });
        rows[slot].prescribed += 1;
    }

    let names_by_id: HashMap<u64, &str> = match join {
        JoinKey::PatientName => HashMap::new(),
        JoinKey::Identifier => snapshot
            .medications
            .iter()
            .map(|m| (m.id, m.medication_name.as_str()))
            .collect(),
    };

    let mut dropped = 0usize;
    for log in snapshot.logs.iter().filter(|l| l.status == LogStatus::Taken) {
        let name = match join {
            JoinKey::PatientName => Some(log.medication_name.as_str()),
            JoinKey::Identifier => log
                .medication_id
                .and_then(|id| names_by_id.get(&id).copied()),
        };

        match name.and_then(|n| index.get(n)) {
            Some(&slot) => rows[slot].taken += 1,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("Ignored {} taken logs with no matching prescription", dropped);
    }

    for row in &mut rows {
        row.adherence_rate = percentage(row.taken, row.prescribed);
    }

    rows
}
