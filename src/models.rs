use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub roll_number: Option<String>,
    pub parent_name: Option<String>,
    pub parent_contact: Option<String>,
    /// Chronological, oldest semester first.
    pub semester_scores: Vec<f64>,
    pub attended_count: u32,
    pub total_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
}

impl Trend {
    pub fn is_declining(self) -> bool {
        matches!(self, Trend::Declining)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    LowAverageScore,
    LowAttendance,
}

impl Alert {
    pub fn label(self) -> &'static str {
        match self {
            Alert::LowAverageScore => "low average score",
            Alert::LowAttendance => "low attendance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedReport {
    pub name: String,
    pub average_score: f64,
    pub attendance_percent: f64,
    pub previous_score: f64,
    pub latest_score: f64,
    pub trend: Trend,
    pub alerts: BTreeSet<Alert>,
    pub summary_text: String,
    pub parent_message: String,
}

impl DerivedReport {
    pub fn is_flagged(&self) -> bool {
        !self.alerts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub student_count: usize,
    pub average_of_averages: f64,
    pub average_attendance: f64,
    pub flagged_count: usize,
    pub flagged_students: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Good,
    AtRisk,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Good => write!(f, "Good"),
            AttendanceStatus::AtRisk => write!(f, "At Risk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    pub name: String,
    pub attended_count: u32,
    pub total_count: u32,
    pub attendance_percent: f64,
    pub status: AttendanceStatus,
}
