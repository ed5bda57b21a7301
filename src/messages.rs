use std::fmt::Write;

use crate::config::MentorConfig;
use crate::metrics;
use crate::models::{DerivedReport, StudentRecord};

/// Fixed-precision rendering with trailing zeros trimmed, keeping one decimal.
pub fn display_number(value: f64, decimals: u32) -> String {
    let text = format!("{:.*}", decimals as usize, value);
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

pub fn summary_text(report: &DerivedReport, config: &MentorConfig) -> String {
    let score = |v: f64| display_number(v, config.precision.score_decimals);
    let attendance = display_number(
        report.attendance_percent,
        config.precision.attendance_decimals,
    );
    let standing = if metrics::is_below_attendance(report.attendance_percent, config) {
        format!(
            "below the {}% requirement",
            display_number(config.thresholds.min_attendance_percent, 2)
        )
    } else {
        "good standing".to_string()
    };

    let mut output = String::new();
    let _ = write!(
        output,
        "{}: average score {}, attendance {}% ({}). Scores {} from {} to {}.",
        report.name,
        score(report.average_score),
        attendance,
        standing,
        report.trend,
        score(report.previous_score),
        score(report.latest_score),
    );

    if report.alerts.is_empty() {
        let _ = write!(output, " No alerts.");
    } else {
        let labels: Vec<&str> = report.alerts.iter().map(|a| a.label()).collect();
        let _ = write!(output, " Alerts: {}.", labels.join(", "));
    }
    output
}

/// Picks one of four letters from (attendance below threshold) x (latest score dropped).
pub fn parent_message(
    report: &DerivedReport,
    record: &StudentRecord,
    config: &MentorConfig,
) -> String {
    let score = |v: f64| display_number(v, config.precision.score_decimals);
    let attendance = display_number(
        report.attendance_percent,
        config.precision.attendance_decimals,
    );
    let previous = score(report.previous_score);
    let latest = score(report.latest_score);
    let name = &report.name;

    let greeting = match record.parent_name.as_deref().map(str::trim) {
        Some(parent) if !parent.is_empty() => format!("Dear {parent} (parent of {name}),"),
        _ => format!("Dear Parent of {name},"),
    };

    let low_attendance = metrics::is_below_attendance(report.attendance_percent, config);
    // Flat scores get the stable letter even though the trend reads as declining.
    let dropped = report.latest_score < report.previous_score;
    let body = match (low_attendance, dropped) {
        (true, true) => format!(
            "Your ward's attendance is {attendance}% and GPA has declined from {previous} to {latest}. \
             Please meet the mentor to discuss next steps."
        ),
        (true, false) => format!(
            "This is to inform you that {name}'s attendance is {attendance}%, below the {}% requirement. \
             Kindly ensure regular attendance.",
            display_number(config.thresholds.min_attendance_percent, 2)
        ),
        (false, true) => format!(
            "We have observed that {name}'s GPA declined from {previous} to {latest}. \
             Please support your ward's academics."
        ),
        (false, false) => format!(
            "{name} is performing well with {attendance}% attendance and stable GPA."
        ),
    };

    format!(
        "{greeting}\n\n{body}\n\nRegards,\n{}",
        config.messages.signature
    )
}
