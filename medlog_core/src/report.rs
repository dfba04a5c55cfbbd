//! Assembled reports view model.

use crate::adherence::{classify, overall_stats, patient_adherence};
use crate::config::ReportConfig;
use crate::dashboard::{daily_summary, recent_logs, upcoming_medications, DASHBOARD_LIST_LIMIT};
use crate::performance::medication_performance;
use crate::trends::{trend_directions, weekly_trends};
use crate::{
    AdherenceTier, DailySummary, MedicationPerformance, OverallStats, PatientAdherence, RecentLog,
    Snapshot, TrendDirection, UpcomingDose, WeeklyTrend,
};
use chrono::NaiveDate;
use serde::Serialize;

/// A patient row with its badge tier
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientReportRow {
    #[serde(flatten)]
    pub adherence: PatientAdherence,
    pub tier: AdherenceTier,
}

/// A weekly trend with its direction against the previous week
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReportRow {
    #[serde(flatten)]
    pub trend: WeeklyTrend,
    pub direction: Option<TrendDirection>,
}

/// Everything the reports page shows, derived from one snapshot
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_for: NaiveDate,
    pub overall: OverallStats,
    pub patients: Vec<PatientReportRow>,
    pub medications: Vec<MedicationPerformance>,
    pub weekly_trends: Vec<TrendReportRow>,
    pub today: DailySummary,
}

impl Report {
    /// Run every aggregation over `snapshot`
    pub fn build(snapshot: &Snapshot, today: NaiveDate, config: &ReportConfig) -> Self {
        let adherence = patient_adherence(snapshot, config.join_key);
        let overall = overall_stats(snapshot, &adherence);

        let patients = adherence
            .into_iter()
            .map(|row| PatientReportRow {
                tier: classify(
                    row.adherence_rate,
                    config.excellent_threshold,
                    config.good_threshold,
                ),
                adherence: row,
            })
            .collect();

        let ordering = config.week_ordering.comparator();
        let trends = weekly_trends(&snapshot.logs, ordering.as_ref(), config.trend_weeks);
        let directions = trend_directions(&trends);
        let weekly_trends = trends
            .into_iter()
            .zip(directions)
            .map(|(trend, direction)| TrendReportRow { trend, direction })
            .collect();

        tracing::info!(
            "Built report for {} ({} patients, {} medications, {} logs)",
            today,
            snapshot.patients.len(),
            snapshot.medications.len(),
            snapshot.logs.len()
        );

        Report {
            generated_for: today,
            overall,
            patients,
            medications: medication_performance(snapshot, config.join_key),
            weekly_trends,
            today: daily_summary(snapshot, today),
        }
    }
}

/// The dashboard's day view
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub summary: DailySummary,
    pub recent: Vec<RecentLog>,
    pub upcoming: Vec<UpcomingDose>,
}

impl DayView {
    pub fn build(snapshot: &Snapshot, today: NaiveDate) -> Self {
        DayView {
            date: today,
            summary: daily_summary(snapshot, today),
            recent: recent_logs(&snapshot.logs, DASHBOARD_LIST_LIMIT),
            upcoming: upcoming_medications(&snapshot.medications, today, DASHBOARD_LIST_LIMIT),
        }
    }
}
