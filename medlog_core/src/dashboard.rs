//! Day-level views for the dashboard: today's summary, recent activity and
//! upcoming doses.

use crate::adherence::percentage;
use crate::{DailySummary, Log, LogStatus, Medication, RecentLog, Snapshot, UpcomingDose};
use chrono::NaiveDate;

/// Number of entries shown in the recent and upcoming lists
pub const DASHBOARD_LIST_LIMIT: usize = 4;

fn day_key(today: NaiveDate) -> String {
    today.format("%Y-%m-%d").to_string()
}

/// Summarize activity on `today`
///
/// The rate is doses taken today over medications active today.
pub fn daily_summary(snapshot: &Snapshot, today: NaiveDate) -> DailySummary {
    let day = day_key(today);

    let medications_today = snapshot
        .medications
        .iter()
        .filter(|m| m.is_active_on(&day))
        .count() as u32;

    let (completed_today, missed_today) = snapshot
        .logs
        .iter()
        .filter(|l| l.date == day)
        .fold((0, 0), |(taken, missed), log| match log.status {
            LogStatus::Taken => (taken + 1, missed),
            LogStatus::Missed => (taken, missed + 1),
            _ => (taken, missed),
        });

    DailySummary {
        total_patients: snapshot.patients.len() as u32,
        medications_today,
        completed_today,
        missed_today,
        adherence_rate: percentage(completed_today, medications_today),
    }
}

/// The `limit` most recent logs by date, newest first
///
/// Logs on the same date keep their stored order.
pub fn recent_logs(logs: &[Log], limit: usize) -> Vec<RecentLog> {
    let mut sorted: Vec<&Log> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .take(limit)
        .map(|log| RecentLog {
            id: log.id,
            patient: log.patient_name.clone(),
            medication: log.medication_name.clone(),
            time: log.actual_time.clone().unwrap_or_default(),
            status: log.status.clone(),
        })
        .collect()
}

/// Scheduled doses of medications active on `today`, in stored order
pub fn upcoming_medications(
    medications: &[Medication],
    today: NaiveDate,
    limit: usize,
) -> Vec<UpcomingDose> {
    let day = day_key(today);

    medications
        .iter()
        .filter(|m| m.is_active_on(&day))
        .filter_map(|m| {
            let scheduled_time = m.scheduled_time.as_ref().filter(|t| !t.is_empty())?;
            let medication = format!("{} {}", m.medication_name, m.dosage.as_deref().unwrap_or(""))
                .trim()
                .to_string();
            Some(UpcomingDose {
                id: m.id,
                patient: m.patient_name.clone(),
                medication,
                scheduled_time: scheduled_time.clone(),
            })
        })
        .take(limit)
        .collect()
}
