use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use serde::Serialize;

mod career;
mod config;
mod error;
mod faq;
mod loader;
mod messages;
mod metrics;
mod models;
mod report;
mod rules;

use config::MentorConfig;
use messages::display_number;
use error::MetricsError;
use models::{AttendanceRow, AttendanceStatus, DerivedReport, StudentRecord};

#[derive(Parser)]
#[command(name = "mentor-assistant", version)]
#[command(about = "Attendance, progress and parent communication helper for mentors", long_about = None)]
struct Cli {
    /// Config file path (defaults to ./mentor.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// JSON shape for per-student output: the computed value, or the error that
/// kept it from being computed.
#[derive(Serialize)]
#[serde(untagged)]
enum JsonEntry<T: Serialize> {
    Computed(T),
    Failed { name: String, error: String },
}

impl<T: Serialize> JsonEntry<T> {
    fn from_result(name: &str, result: Result<T, &MetricsError>) -> Self {
        match result {
            Ok(value) => JsonEntry::Computed(value),
            Err(err) => {
                tracing::warn!(student = %name, error = %err, "cannot compute entry");
                JsonEntry::Failed {
                    name: name.to_string(),
                    error: err.to_string(),
                }
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Attendance percentage and status for every student
    Attendance {
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Average score, attendance, trend and alerts per student
    Progress {
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        gpa: PathBuf,
        #[arg(long)]
        student: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the generated parent message for one student
    Message {
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        gpa: PathBuf,
        #[arg(long)]
        student: String,
    },
    /// Class-level averages and flagged count
    Summary {
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        gpa: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        gpa: PathBuf,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Answer a question from the FAQ file
    Ask {
        #[arg(long)]
        faq: PathBuf,
        question: String,
    },
    /// Suggest a career field from interest and scores
    Suggest {
        #[arg(long, value_enum)]
        interest: career::Interest,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        teamwork: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mentor_assistant=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Attendance { attendance, format } => {
            let rows: Vec<(String, u32, u32)> = loader::load_attendance(&attendance)?
                .into_iter()
                .map(|row| (row.name, row.attended, row.total_classes))
                .collect();
            let overview = metrics::attendance_overview(&rows, &config);

            match format {
                OutputFormat::Json => {
                    let entries: Vec<JsonEntry<&AttendanceRow>> = rows
                        .iter()
                        .zip(&overview)
                        .map(|((name, _, _), result)| JsonEntry::from_result(name, result.as_ref()))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table.set_header(vec!["Name", "Attended", "Total", "Attendance %", "Status"]);
                    for ((name, attended, total), result) in rows.iter().zip(&overview) {
                        let (percent, status) = match result {
                            Ok(row) => (
                                display_number(
                                    row.attendance_percent,
                                    config.precision.attendance_decimals,
                                ),
                                row.status.to_string(),
                            ),
                            Err(err) => {
                                tracing::warn!(student = %name, error = %err, "cannot compute attendance");
                                ("-".to_string(), format!("invalid: {err}"))
                            }
                        };
                        table.add_row(vec![
                            name.clone(),
                            attended.to_string(),
                            total.to_string(),
                            percent,
                            status,
                        ]);
                    }
                    println!("{table}");

                    let at_risk: Vec<&AttendanceRow> = overview
                        .iter()
                        .filter_map(|r| r.as_ref().ok())
                        .filter(|r| r.status == AttendanceStatus::AtRisk)
                        .collect();
                    println!(
                        "At risk students (below {}%): {}",
                        display_number(config.thresholds.min_attendance_percent, 2),
                        at_risk.len()
                    );
                    for row in at_risk {
                        println!(
                            "- {} ({}%)",
                            row.name,
                            display_number(
                                row.attendance_percent,
                                config.precision.attendance_decimals
                            )
                        );
                    }
                }
            }
        }
        Commands::Progress {
            attendance,
            gpa,
            student,
            format,
        } => {
            let records = loader::load_students(&attendance, &gpa)?;
            let selected: Vec<&StudentRecord> = match student.as_deref() {
                Some(name) => vec![find_student(&records, name)?],
                None => records.iter().collect(),
            };
            print_progress(&selected, &config, format)?;
        }
        Commands::Message {
            attendance,
            gpa,
            student,
        } => {
            let records = loader::load_students(&attendance, &gpa)?;
            let record = find_student(&records, &student)?;
            let report = metrics::compute_report(record, &config)?;
            if let Some(contact) = record.parent_contact.as_deref() {
                println!("To: {contact}\n");
            }
            println!("{}", report.parent_message);
        }
        Commands::Summary {
            attendance,
            gpa,
            format,
        } => {
            let records = loader::load_students(&attendance, &gpa)?;
            let summary = metrics::compute_class_summary(&records, &config)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Table => {
                    println!("Students: {}", summary.student_count);
                    println!(
                        "Average score: {}",
                        display_number(summary.average_of_averages, config.precision.score_decimals)
                    );
                    println!(
                        "Average attendance: {}%",
                        display_number(
                            summary.average_attendance,
                            config.precision.attendance_decimals
                        )
                    );
                    println!("Students with alerts: {}", summary.flagged_count);
                    for name in &summary.flagged_students {
                        println!("- {name}");
                    }
                }
            }
        }
        Commands::Report {
            attendance,
            gpa,
            label,
            out,
        } => {
            let records = loader::load_students(&attendance, &gpa)?;
            let report = report::build_report(
                label.as_deref(),
                Utc::now().date_naive(),
                &records,
                &config,
            );
            write_report(&out, &report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Ask { faq, question } => {
            let entries = loader::load_faq(&faq)?;
            let book = faq::FaqBook::new(&entries);
            if book.is_empty() {
                tracing::warn!(path = %faq.display(), "FAQ file has no usable entries");
            } else {
                tracing::debug!(entries = book.len(), "FAQ rules ready");
            }
            println!("{}", book.answer(&question));
        }
        Commands::Suggest {
            interest,
            score,
            teamwork,
        } => {
            let profile = career::CareerProfile {
                interest,
                average_score: score,
                prefers_teamwork: teamwork,
            };
            let suggestion = career::suggest(&career::career_rules(), &profile);
            println!("Suggested field: {}", suggestion.field);
            println!("{}", suggestion.advice);
        }
    }

    Ok(())
}

fn find_student<'a>(
    records: &'a [StudentRecord],
    name: &str,
) -> anyhow::Result<&'a StudentRecord> {
    let wanted = name.trim();
    records
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(wanted))
        .with_context(|| format!("student {wanted:?} not found in both attendance and GPA files"))
}

fn print_progress(
    records: &[&StudentRecord],
    config: &MentorConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let reports: Vec<Result<DerivedReport, MetricsError>> = records
                .iter()
                .map(|record| metrics::compute_report(record, config))
                .collect();
            let entries: Vec<JsonEntry<&DerivedReport>> = records
                .iter()
                .zip(&reports)
                .map(|(record, result)| JsonEntry::from_result(&record.name, result.as_ref()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec![
                "Name",
                "Roll No",
                "Average",
                "Attendance %",
                "Trend",
                "Alerts",
            ]);
            for record in records {
                let roll = record.roll_number.clone().unwrap_or_else(|| "-".to_string());
                match metrics::compute_report(record, config) {
                    Ok(report) => {
                        let alerts: Vec<&str> = report.alerts.iter().map(|a| a.label()).collect();
                        table.add_row(vec![
                            report.name.clone(),
                            roll,
                            display_number(report.average_score, config.precision.score_decimals),
                            display_number(
                                report.attendance_percent,
                                config.precision.attendance_decimals,
                            ),
                            report.trend.to_string(),
                            if alerts.is_empty() {
                                "-".to_string()
                            } else {
                                alerts.join(", ")
                            },
                        ]);
                    }
                    Err(err) => {
                        tracing::warn!(student = %record.name, error = %err, "cannot compute report");
                        table.add_row(vec![
                            record.name.clone(),
                            roll,
                            "-".to_string(),
                            "-".to_string(),
                            "-".to_string(),
                            err.to_string(),
                        ]);
                    }
                }
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn write_report(out: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(out, contents)
        .with_context(|| format!("failed to write report to {}", out.display()))
}
