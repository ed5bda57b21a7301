use std::collections::BTreeSet;

use crate::config::{MentorConfig, MAX_DECIMALS};
use crate::error::MetricsError;
use crate::messages;
use crate::models::{
    Alert, AttendanceRow, AttendanceStatus, ClassSummary, DerivedReport, StudentRecord, Trend,
};

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * factor).round() / factor
}

pub fn attendance_percent(
    name: &str,
    attended: u32,
    total: u32,
    decimals: u32,
) -> Result<f64, MetricsError> {
    if total == 0 {
        return Err(MetricsError::invalid(name, "total class count is zero"));
    }
    Ok(round_to(attended as f64 * 100.0 / total as f64, decimals))
}

pub fn is_below_attendance(percent: f64, config: &MentorConfig) -> bool {
    percent < config.thresholds.min_attendance_percent
}

/// Compares the last two scores in the order supplied.
pub fn trend(previous: f64, latest: f64) -> Trend {
    if latest > previous {
        Trend::Improving
    } else {
        Trend::Declining
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn compute_report(
    record: &StudentRecord,
    config: &MentorConfig,
) -> Result<DerivedReport, MetricsError> {
    let attendance = attendance_percent(
        &record.name,
        record.attended_count,
        record.total_count,
        config.precision.attendance_decimals,
    )?;

    if let Some(bad) = record.semester_scores.iter().find(|s| !s.is_finite()) {
        return Err(MetricsError::invalid(
            &record.name,
            format!("semester score {bad} is not a finite number"),
        ));
    }

    let (previous_score, latest_score) = match record.semester_scores.as_slice() {
        [.., previous, latest] => (*previous, *latest),
        scores => {
            return Err(MetricsError::InsufficientData {
                name: record.name.clone(),
                found: scores.len(),
            })
        }
    };

    let average_score = round_to(
        mean(&record.semester_scores),
        config.precision.score_decimals,
    );

    let mut alerts = BTreeSet::new();
    if let Some(min_score) = config.thresholds.min_average_score {
        if average_score < min_score {
            alerts.insert(Alert::LowAverageScore);
        }
    }
    if is_below_attendance(attendance, config) {
        alerts.insert(Alert::LowAttendance);
    }

    let mut report = DerivedReport {
        name: record.name.clone(),
        average_score,
        attendance_percent: attendance,
        previous_score,
        latest_score,
        trend: trend(previous_score, latest_score),
        alerts,
        summary_text: String::new(),
        parent_message: String::new(),
    };
    report.summary_text = messages::summary_text(&report, config);
    report.parent_message = messages::parent_message(&report, record, config);
    Ok(report)
}

pub fn compute_class_summary(
    records: &[StudentRecord],
    config: &MentorConfig,
) -> Result<ClassSummary, MetricsError> {
    if records.is_empty() {
        return Err(MetricsError::EmptyDataset);
    }

    let reports = records
        .iter()
        .map(|record| compute_report(record, config))
        .collect::<Result<Vec<_>, _>>()?;

    let averages: Vec<f64> = reports.iter().map(|r| r.average_score).collect();
    let attendance: Vec<f64> = reports.iter().map(|r| r.attendance_percent).collect();
    let flagged_students: Vec<String> = reports
        .iter()
        .filter(|r| r.is_flagged())
        .map(|r| r.name.clone())
        .collect();

    Ok(ClassSummary {
        student_count: reports.len(),
        average_of_averages: round_to(mean(&averages), config.precision.score_decimals),
        average_attendance: round_to(mean(&attendance), config.precision.attendance_decimals),
        flagged_count: flagged_students.len(),
        flagged_students,
    })
}

pub fn attendance_row(
    name: &str,
    attended: u32,
    total: u32,
    config: &MentorConfig,
) -> Result<AttendanceRow, MetricsError> {
    let percent = attendance_percent(name, attended, total, config.precision.attendance_decimals)?;
    let status = if is_below_attendance(percent, config) {
        AttendanceStatus::AtRisk
    } else {
        AttendanceStatus::Good
    };
    Ok(AttendanceRow {
        name: name.to_string(),
        attended_count: attended,
        total_count: total,
        attendance_percent: percent,
        status,
    })
}

/// Attendance-only view; needs no semester scores. One result per input row,
/// in input order, so a bad row does not hide the rest.
pub fn attendance_overview(
    rows: &[(String, u32, u32)],
    config: &MentorConfig,
) -> Vec<Result<AttendanceRow, MetricsError>> {
    rows.iter()
        .map(|(name, attended, total)| attendance_row(name, *attended, *total, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(scores: &[f64], attended: u32, total: u32) -> StudentRecord {
        StudentRecord {
            name: "Neha Sharma".to_string(),
            roll_number: Some("CS-014".to_string()),
            parent_name: None,
            parent_contact: None,
            semester_scores: scores.to_vec(),
            attended_count: attended,
            total_count: total,
        }
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(8.2333, 2), 8.23);
        assert_eq!(round_to(66.666, 2), 66.67);
        assert_eq!(round_to(66.666, 1), 66.7);
        assert_eq!(round_to(7.0, 2), 7.0);
    }

    #[test]
    fn oversized_precision_stays_finite() {
        let pct = round_to(66.666, 400);
        assert!(pct.is_finite());
        assert!((pct - 66.666).abs() < 1e-9);
    }

    #[test]
    fn end_to_end_healthy_but_declining() {
        let record = sample_record(&[8.2, 8.5, 8.0], 270, 300);
        let report = compute_report(&record, &MentorConfig::default()).unwrap();

        assert_eq!(report.average_score, 8.23);
        assert_eq!(report.attendance_percent, 90.0);
        assert!(report.alerts.is_empty());
        assert_eq!(report.trend, Trend::Declining);
        assert_eq!(report.previous_score, 8.5);
        assert_eq!(report.latest_score, 8.0);
        assert!(report.summary_text.contains("declining from 8.5 to 8.0"));
        assert!(report.parent_message.contains("declined from 8.5 to 8.0"));
    }

    #[test]
    fn trend_uses_last_two_in_list_order() {
        let record = sample_record(&[6.5, 8.0, 4.8, 7.2], 90, 100);
        let report = compute_report(&record, &MentorConfig::default()).unwrap();
        assert_eq!(report.trend, Trend::Improving);
        assert_eq!(report.previous_score, 4.8);
        assert_eq!(report.latest_score, 7.2);
    }

    #[test]
    fn equal_scores_count_as_declining() {
        assert_eq!(trend(7.0, 7.0), Trend::Declining);
        assert_eq!(trend(7.0, 7.1), Trend::Improving);
    }

    #[test]
    fn zero_total_is_invalid_record() {
        let record = sample_record(&[7.0, 8.0], 0, 0);
        let err = compute_report(&record, &MentorConfig::default()).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidRecord { .. }));
    }

    #[test]
    fn non_finite_score_is_invalid_record() {
        let record = sample_record(&[7.0, f64::NAN], 10, 10);
        let err = compute_report(&record, &MentorConfig::default()).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidRecord { .. }));
    }

    #[test]
    fn single_score_is_insufficient() {
        let record = sample_record(&[7.0], 10, 10);
        let err = compute_report(&record, &MentorConfig::default()).unwrap_err();
        assert_eq!(
            err,
            MetricsError::InsufficientData {
                name: "Neha Sharma".to_string(),
                found: 1
            }
        );

        let empty = sample_record(&[], 10, 10);
        assert!(matches!(
            compute_report(&empty, &MentorConfig::default()),
            Err(MetricsError::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn attendance_is_never_negative() {
        for attended in [0, 1, 50, 99, 100] {
            let pct = attendance_percent("x", attended, 100, 2).unwrap();
            assert!(pct >= 0.0);
        }
    }

    #[test]
    fn exactly_seventy_five_is_not_at_risk() {
        let config = MentorConfig::default();
        let at_boundary = compute_report(&sample_record(&[7.0, 7.5], 75, 100), &config).unwrap();
        assert!(!at_boundary.alerts.contains(&Alert::LowAttendance));

        let below = compute_report(&sample_record(&[7.0, 7.5], 74, 100), &config).unwrap();
        assert!(below.alerts.contains(&Alert::LowAttendance));
    }

    #[test]
    fn low_attendance_alert_tracks_attendance() {
        let config = MentorConfig::default();
        let flagged_at = |attended: u32| {
            compute_report(&sample_record(&[7.0, 7.5], attended, 100), &config)
                .unwrap()
                .alerts
                .contains(&Alert::LowAttendance)
        };

        // Lowering attendance never clears the flag once raised.
        let mut seen = false;
        for attended in (0..=100).rev() {
            let flagged = flagged_at(attended);
            assert!(flagged || !seen, "flag cleared at {attended}");
            seen |= flagged;
        }

        // Raising it back never re-adds the flag once cleared.
        let mut cleared = false;
        for attended in 0..=100 {
            let flagged = flagged_at(attended);
            assert!(!flagged || !cleared, "flag returned at {attended}");
            cleared |= !flagged;
            assert_eq!(flagged, attended < 75);
        }
    }

    #[test]
    fn low_average_alert_is_configurable() {
        let record = sample_record(&[5.0, 5.5], 90, 100);
        let report = compute_report(&record, &MentorConfig::default()).unwrap();
        assert!(report.alerts.contains(&Alert::LowAverageScore));

        let mut config = MentorConfig::default();
        config.thresholds.min_average_score = None;
        let report = compute_report(&record, &config).unwrap();
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn attendance_precision_is_configurable() {
        let mut config = MentorConfig::default();
        let record = sample_record(&[7.0, 7.5], 2, 3);
        assert_eq!(compute_report(&record, &config).unwrap().attendance_percent, 66.67);
        config.precision.attendance_decimals = 1;
        assert_eq!(compute_report(&record, &config).unwrap().attendance_percent, 66.7);
    }

    #[test]
    fn report_is_idempotent() {
        let record = sample_record(&[6.1, 5.2, 5.9], 61, 90);
        let config = MentorConfig::default();
        assert_eq!(
            compute_report(&record, &config).unwrap(),
            compute_report(&record, &config).unwrap()
        );
    }

    #[test]
    fn class_summary_over_empty_input_fails() {
        assert_eq!(
            compute_class_summary(&[], &MentorConfig::default()),
            Err(MetricsError::EmptyDataset)
        );
    }

    #[test]
    fn class_summary_averages_and_flags() {
        let mut low = sample_record(&[5.0, 6.0], 60, 100);
        low.name = "Ravi Kumar".to_string();
        let records = vec![sample_record(&[8.0, 9.0], 90, 100), low];

        let summary = compute_class_summary(&records, &MentorConfig::default()).unwrap();
        assert_eq!(summary.student_count, 2);
        assert_eq!(summary.average_of_averages, 7.0);
        assert_eq!(summary.average_attendance, 75.0);
        assert_eq!(summary.flagged_count, 1);
        assert_eq!(summary.flagged_students, vec!["Ravi Kumar".to_string()]);
    }

    #[test]
    fn class_summary_propagates_record_errors() {
        let records = vec![sample_record(&[8.0, 9.0], 90, 100), sample_record(&[8.0], 9, 10)];
        assert!(matches!(
            compute_class_summary(&records, &MentorConfig::default()),
            Err(MetricsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn overview_marks_at_risk_rows() {
        let rows = vec![
            ("Asha".to_string(), 45, 60),
            ("Bilal".to_string(), 40, 60),
        ];
        let overview = attendance_overview(&rows, &MentorConfig::default());
        let asha = overview[0].as_ref().unwrap();
        let bilal = overview[1].as_ref().unwrap();
        assert_eq!(asha.attendance_percent, 75.0);
        assert_eq!(asha.status, AttendanceStatus::Good);
        assert_eq!(bilal.attendance_percent, 66.67);
        assert_eq!(bilal.status, AttendanceStatus::AtRisk);
    }

    #[test]
    fn overview_keeps_rows_around_a_zero_total() {
        let rows = vec![
            ("Neha".to_string(), 27, 30),
            ("Ghost".to_string(), 0, 0),
            ("Ravi".to_string(), 40, 60),
        ];
        let overview = attendance_overview(&rows, &MentorConfig::default());
        assert_eq!(overview.len(), 3);
        assert_eq!(overview[0].as_ref().unwrap().attendance_percent, 90.0);
        assert!(matches!(
            overview[1],
            Err(MetricsError::InvalidRecord { ref name, .. }) if name == "Ghost"
        ));
        assert_eq!(
            overview[2].as_ref().unwrap().status,
            AttendanceStatus::AtRisk
        );
    }
}
