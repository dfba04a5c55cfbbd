//! Core domain types for the MedLog adherence system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Input records (patients, medications, intake logs)
//! - The snapshot handed to every aggregation
//! - Derived summary rows consumed by display code
//!
//! Record types use camelCase field names so the collections written by the
//! external store deserialize without translation.

use serde::{Deserialize, Serialize};

// ============================================================================
// Input Records
// ============================================================================

/// A patient record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub active_medications: Option<u32>,
    #[serde(default)]
    pub last_visit: Option<String>,
}

/// A medication prescribed to one patient
///
/// `patient_name` is a snapshot of the owner's name at the time the record
/// was written, not a live reference.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: u64,
    pub patient_id: u64,
    pub patient_name: String,
    pub medication_name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
}

impl Medication {
    /// Whether the medication is active on `date` (`YYYY-MM-DD`).
    ///
    /// An unset bound is open. Dates compare lexically.
    pub fn is_active_on(&self, date: &str) -> bool {
        let started = self
            .start_date
            .as_deref()
            .map_or(true, |start| start <= date);
        let not_ended = self.end_date.as_deref().map_or(true, |end| end >= date);
        started && not_ended
    }
}

/// Intake status recorded on a log
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogStatus {
    Taken,
    Missed,
    Delayed,
    /// Administrative markers such as `added`, kept verbatim
    Other(String),
}

impl LogStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LogStatus::Taken => "taken",
            LogStatus::Missed => "missed",
            LogStatus::Delayed => "delayed",
            LogStatus::Other(s) => s,
        }
    }
}

impl From<String> for LogStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "taken" => LogStatus::Taken,
            "missed" => LogStatus::Missed,
            "delayed" => LogStatus::Delayed,
            _ => LogStatus::Other(s),
        }
    }
}

impl From<LogStatus> for String {
    fn from(status: LogStatus) -> Self {
        match status {
            LogStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One daily intake log entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: u64,
    #[serde(default)]
    pub patient_id: Option<u64>,
    #[serde(default)]
    pub medication_id: Option<u64>,
    pub patient_name: String,
    pub medication_name: String,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub actual_time: Option<String>,
    pub status: LogStatus,
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Immutable view of the three record collections for one computation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

/// How logs are attributed to patients and medications
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// Match the denormalized `patientName` / `medicationName` strings
    #[default]
    PatientName,
    /// Follow record ids: `log.patientId` when set, else `log.medicationId`
    /// through the medication record
    Identifier,
}

// ============================================================================
// Derived Rows
// ============================================================================

/// Per-patient adherence summary
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientAdherence {
    pub patient: String,
    pub total_meds: u32,
    pub taken: u32,
    pub missed: u32,
    pub adherence_rate: u32,
}

/// Adherence band used for badges
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceTier {
    Excellent,
    Good,
    NeedsAttention,
}

impl AdherenceTier {
    pub fn label(&self) -> &'static str {
        match self {
            AdherenceTier::Excellent => "Excellent",
            AdherenceTier::Good => "Good",
            AdherenceTier::NeedsAttention => "Needs Attention",
        }
    }
}

/// Headline numbers for the reports page
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_patients: u32,
    pub total_medications: u32,
    pub total_missed: u32,
    pub average_adherence: u32,
}

/// Adherence for one medication name across all patients
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPerformance {
    pub medication: String,
    pub prescribed: u32,
    pub taken: u32,
    pub adherence_rate: u32,
}

/// Adherence for one week bucket
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrend {
    pub week: String,
    pub adherence_rate: u32,
}

/// Direction of a week relative to the one before it
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
}

/// Today's numbers for the dashboard
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub total_patients: u32,
    pub medications_today: u32,
    pub completed_today: u32,
    pub missed_today: u32,
    pub adherence_rate: u32,
}

/// Condensed log entry for the recent activity list
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecentLog {
    pub id: u64,
    pub patient: String,
    pub medication: String,
    pub time: String,
    pub status: LogStatus,
}

/// A scheduled dose for an active medication
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDose {
    pub id: u64,
    pub patient: String,
    pub medication: String,
    pub scheduled_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medication(start: Option<&str>, end: Option<&str>) -> Medication {
        Medication {
            id: 1,
            patient_id: 1,
            patient_name: "Alice".into(),
            medication_name: "Aspirin".into(),
            start_date: start.map(Into::into),
            end_date: end.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_active_with_open_bounds() {
        assert!(medication(None, None).is_active_on("2024-05-01"));
        assert!(medication(Some("2024-05-01"), None).is_active_on("2024-05-01"));
        assert!(medication(None, Some("2024-05-01")).is_active_on("2024-05-01"));
    }

    #[test]
    fn test_inactive_outside_range() {
        let med = medication(Some("2024-05-01"), Some("2024-05-31"));
        assert!(!med.is_active_on("2024-04-30"));
        assert!(med.is_active_on("2024-05-15"));
        assert!(!med.is_active_on("2024-06-01"));
    }

    #[test]
    fn test_status_wire_format() {
        let statuses: Vec<LogStatus> =
            serde_json::from_str(r#"["taken","missed","delayed","added"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![
                LogStatus::Taken,
                LogStatus::Missed,
                LogStatus::Delayed,
                LogStatus::Other("added".into()),
            ]
        );

        let json = serde_json::to_string(&statuses).unwrap();
        assert_eq!(json, r#"["taken","missed","delayed","added"]"#);
    }

    #[test]
    fn test_log_deserializes_store_format() {
        let json = r#"{
            "id": 1717000000000,
            "medicationId": 42,
            "patientName": "Alice",
            "medicationName": "Aspirin",
            "actualTime": null,
            "status": "missed",
            "date": "2024-05-30"
        }"#;

        let log: Log = serde_json::from_str(json).unwrap();
        assert_eq!(log.medication_id, Some(42));
        assert_eq!(log.status, LogStatus::Missed);
        assert!(log.actual_time.is_none());
        assert!(log.notes.is_none());
    }

    #[test]
    fn test_patient_minimal_record() {
        let patient: Patient = serde_json::from_str(r#"{"id": 3, "name": "Bob"}"#).unwrap();
        assert_eq!(patient.name, "Bob");
        assert!(patient.medical_conditions.is_empty());
    }
}
