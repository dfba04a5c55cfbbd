use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use medlog_core::export::{EXPORT_MIME_TYPE, LOG_EXPORT_COLUMNS};
use medlog_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medlog")]
#[command(about = "Medication adherence reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show adherence reports (default)
    Report {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show today's summary, recent logs and upcoming doses
    Today {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all logs as CSV
    Export {
        /// Output file (defaults to the configured file name in the current directory)
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the CSV to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> Result<()> {
    medlog_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let snapshot = Snapshot::load(&data_dir)?;

    match cli.command {
        Some(Commands::Report { today, json }) => cmd_report(&snapshot, &config, today, json),
        Some(Commands::Today { today, json }) => cmd_today(&snapshot, today, json),
        Some(Commands::Export { output, stdout }) => cmd_export(&snapshot, &config, output, stdout),
        None => cmd_report(&snapshot, &config, None, false),
    }
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn cmd_report(
    snapshot: &Snapshot,
    config: &Config,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let report = Report::build(snapshot, resolve_today(today), &config.report);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display_report(&report);
    Ok(())
}

fn cmd_today(snapshot: &Snapshot, today: Option<NaiveDate>, json: bool) -> Result<()> {
    let view = DayView::build(snapshot, resolve_today(today));

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    display_day(&view);
    Ok(())
}

fn cmd_export(
    snapshot: &Snapshot,
    config: &Config,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let csv = export_logs(&snapshot.logs)?;

    if stdout {
        print!("{}", csv);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&config.export.file_name));
    write_export(&path, &csv)?;

    println!("✓ Exported {} logs", snapshot.logs.len());
    println!("  File: {} ({})", path.display(), EXPORT_MIME_TYPE);
    println!("  Columns: {}", LOG_EXPORT_COLUMNS.join(", "));
    Ok(())
}

fn display_report(report: &Report) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  MEDICATION REPORTS ({})", report.generated_for);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total patients:     {}", report.overall.total_patients);
    println!("  Average adherence:  {}%", report.overall.average_adherence);
    println!("  Total medications:  {}", report.overall.total_medications);
    println!("  Missed doses:       {}", report.overall.total_missed);

    println!("\nPatient Adherence");
    println!("─────────────────────────────────────────");
    if report.patients.is_empty() {
        println!("  No patients on file.");
    }
    for row in &report.patients {
        let a = &row.adherence;
        println!(
            "  {:<20} {:>3}%  {:<15} meds {:>2}  taken {:>3}  missed {:>3}",
            a.patient,
            a.adherence_rate,
            row.tier.label(),
            a.total_meds,
            a.taken,
            a.missed
        );
    }

    println!("\nMedication Performance");
    println!("─────────────────────────────────────────");
    if report.medications.is_empty() {
        println!("  No medications on file.");
    }
    for med in &report.medications {
        println!(
            "  {:<20} {:>3}%  {} patients",
            med.medication, med.adherence_rate, med.prescribed
        );
    }

    println!("\nWeekly Adherence Trends");
    println!("─────────────────────────────────────────");
    if report.weekly_trends.is_empty() {
        println!("  No logs recorded yet.");
    }
    for row in &report.weekly_trends {
        let arrow = match row.direction {
            Some(TrendDirection::Improving) => "↑",
            Some(TrendDirection::Declining) => "↓",
            None => " ",
        };
        println!(
            "  {:<10} {:>3}%  {}",
            row.trend.week, row.trend.adherence_rate, arrow
        );
    }
    println!();
}

fn display_day(view: &DayView) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TODAY ({})", view.date);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Patients:           {}", view.summary.total_patients);
    println!("  Medications today:  {}", view.summary.medications_today);
    println!("  Completed:          {}", view.summary.completed_today);
    println!("  Missed:             {}", view.summary.missed_today);
    println!("  Adherence:          {}%", view.summary.adherence_rate);

    println!("\nRecent Activity");
    println!("─────────────────────────────────────────");
    for log in &view.recent {
        println!(
            "  {:<20} {:<20} {:<8} {}",
            log.patient, log.medication, log.status, log.time
        );
    }

    println!("\nUpcoming");
    println!("─────────────────────────────────────────");
    for dose in &view.upcoming {
        println!(
            "  {:<8} {:<20} {}",
            dose.scheduled_time, dose.patient, dose.medication
        );
    }
    println!();
}
