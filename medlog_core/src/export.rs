//! CSV export of record collections.
//!
//! The format is fixed for compatibility with previously exported files:
//! - the header row is the column names joined by `,`, unquoted
//! - every data field is quoted, with embedded `"` doubled
//! - rows are separated by CRLF and the last row has no terminator

use crate::{Error, Log, Medication, Patient, Result};
use fs2::FileExt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Default download name for the log export
pub const EXPORT_FILE_NAME: &str = "medication-logs.csv";

/// MIME type of the exported file
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Column order of the log export
pub const LOG_EXPORT_COLUMNS: [&str; 8] = [
    "id",
    "patientName",
    "medicationName",
    "scheduledTime",
    "actualTime",
    "status",
    "date",
    "notes",
];

/// A record that can be projected onto named columns
pub trait Tabular {
    /// Value of `column` as text, or `None` when unset or unknown
    fn field(&self, column: &str) -> Option<String>;
}

impl Tabular for Log {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "patientId" => self.patient_id.map(|id| id.to_string()),
            "medicationId" => self.medication_id.map(|id| id.to_string()),
            "patientName" => Some(self.patient_name.clone()),
            "medicationName" => Some(self.medication_name.clone()),
            "scheduledTime" => self.scheduled_time.clone(),
            "actualTime" => self.actual_time.clone(),
            "status" => Some(self.status.to_string()),
            "date" => Some(self.date.clone()),
            "notes" => self.notes.clone(),
            _ => None,
        }
    }
}

impl Tabular for Medication {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "patientId" => Some(self.patient_id.to_string()),
            "patientName" => Some(self.patient_name.clone()),
            "medicationName" => Some(self.medication_name.clone()),
            "dosage" => self.dosage.clone(),
            "startDate" => self.start_date.clone(),
            "endDate" => self.end_date.clone(),
            "scheduledTime" => self.scheduled_time.clone(),
            _ => None,
        }
    }
}

impl Tabular for Patient {
    fn field(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "age" => self.age.map(|a| a.to_string()),
            "gender" => self.gender.clone(),
            "phone" => self.phone.clone(),
            "email" => self.email.clone(),
            "dateOfBirth" => self.date_of_birth.clone(),
            "address" => self.address.clone(),
            "emergencyContact" => self.emergency_contact.clone(),
            // Lists render comma-joined
            "medicalConditions" => Some(self.medical_conditions.join(",")),
            "activeMedications" => self.active_medications.map(|n| n.to_string()),
            "lastVisit" => self.last_visit.clone(),
            _ => None,
        }
    }
}

/// Serialize `records` projected onto `columns`
pub fn to_csv<T: Tabular>(records: &[T], columns: &[&str]) -> Result<String> {
    // No columns means one empty line per record
    if columns.is_empty() {
        return Ok("\r\n".repeat(records.len()));
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(
            columns
                .iter()
                .map(|column| record.field(column).unwrap_or_default()),
        )?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to flush CSV writer: {}", e)))?;
    let body = String::from_utf8(body)
        .map_err(|e| Error::Export(format!("CSV output is not UTF-8: {}", e)))?;

    let mut out = columns.join(",");
    if !body.is_empty() {
        out.push_str("\r\n");
        out.push_str(body.strip_suffix("\r\n").unwrap_or(&body));
    }
    Ok(out)
}

/// Serialize logs with the standard export columns
pub fn export_logs(logs: &[Log]) -> Result<String> {
    let csv = to_csv(logs, &LOG_EXPORT_COLUMNS)?;
    tracing::info!("Exported {} logs to CSV", logs.len());
    Ok(csv)
}

/// Parse CSV text into rows of fields, header row included
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Write an export to `path` atomically
///
/// The text goes to a locked temp file in the target directory, is synced,
/// then renamed over `path`.
pub fn write_export(path: &Path, csv: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(csv.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote export to {:?}", path);
    Ok(())
}
