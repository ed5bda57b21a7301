use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::MentorConfig;
use crate::messages::display_number;
use crate::metrics;
use crate::models::{DerivedReport, StudentRecord};

pub fn build_report(
    label: Option<&str>,
    generated_on: NaiveDate,
    records: &[StudentRecord],
    config: &MentorConfig,
) -> String {
    let score = |v: f64| display_number(v, config.precision.score_decimals);
    let percent = |v: f64| display_number(v, config.precision.attendance_decimals);

    let mut reports: Vec<DerivedReport> = Vec::new();
    let mut failures: Vec<(String, String)> = Vec::new();
    for record in records {
        match metrics::compute_report(record, config) {
            Ok(report) => reports.push(report),
            Err(err) => failures.push((record.name.clone(), err.to_string())),
        }
    }

    let mut output = String::new();
    let class_label = label.unwrap_or("all students");

    let _ = writeln!(output, "# Mentor Progress Report");
    let _ = writeln!(output, "Generated for {} on {}", class_label, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Summary");

    match metrics::compute_class_summary(records, config) {
        Ok(summary) => {
            let _ = writeln!(output, "- Students: {}", summary.student_count);
            let _ = writeln!(
                output,
                "- Average score: {}",
                score(summary.average_of_averages)
            );
            let _ = writeln!(
                output,
                "- Average attendance: {}%",
                percent(summary.average_attendance)
            );
            let _ = writeln!(output, "- Students with alerts: {}", summary.flagged_count);
        }
        Err(err) => {
            let _ = writeln!(output, "Summary unavailable: {}", err);
        }
    }

    let mut at_risk: Vec<&DerivedReport> = reports
        .iter()
        .filter(|r| metrics::is_below_attendance(r.attendance_percent, config))
        .collect();
    at_risk.sort_by(|a, b| {
        a.attendance_percent
            .partial_cmp(&b.attendance_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## At-Risk Attendance (below {}%)",
        display_number(config.thresholds.min_attendance_percent, 2)
    );
    if at_risk.is_empty() {
        let _ = writeln!(output, "No students below the attendance threshold.");
    } else {
        for report in at_risk {
            let _ = writeln!(
                output,
                "- {}: {}%",
                report.name,
                percent(report.attendance_percent)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Declining Scores");
    let declining: Vec<&DerivedReport> =
        reports.iter().filter(|r| r.trend.is_declining()).collect();
    if declining.is_empty() {
        let _ = writeln!(output, "No students with declining scores.");
    } else {
        for report in declining {
            let _ = writeln!(
                output,
                "- {}: {} -> {}",
                report.name,
                score(report.previous_score),
                score(report.latest_score)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");
    if reports.is_empty() && failures.is_empty() {
        let _ = writeln!(output, "No student records loaded.");
    }
    for report in &reports {
        let alerts = if report.alerts.is_empty() {
            "none".to_string()
        } else {
            report
                .alerts
                .iter()
                .map(|a| a.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            output,
            "- {}: average {}, attendance {}%, {}, alerts: {}",
            report.name,
            score(report.average_score),
            percent(report.attendance_percent),
            report.trend,
            alerts
        );
    }
    for (name, reason) in &failures {
        let _ = writeln!(output, "- {}: skipped ({})", name, reason);
    }

    output
}
