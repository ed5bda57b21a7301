use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::faq::FaqEntry;
use crate::models::StudentRecord;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceCsvRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Attended")]
    pub attended: u32,
    #[serde(rename = "Total_Classes")]
    pub total_classes: u32,
    #[serde(rename = "Roll_No", default)]
    pub roll_number: Option<String>,
    #[serde(rename = "Parent_Name", default)]
    pub parent_name: Option<String>,
    #[serde(rename = "Parent_Contact", default)]
    pub parent_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpaRow {
    pub name: String,
    pub scores: Vec<f64>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub fn read_attendance<R: Read>(reader: R) -> anyhow::Result<Vec<AttendanceCsvRow>> {
    let mut reader = csv_reader(reader);
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<AttendanceCsvRow>().enumerate() {
        let row = result.with_context(|| format!("bad attendance row {}", index + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Reads `Name` plus every `Sem*` column, in header order.
pub fn read_gpa<R: Read>(reader: R) -> anyhow::Result<Vec<GpaRow>> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();

    let name_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("name"))
        .context("GPA file has no Name column")?;
    let semester_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.to_ascii_lowercase().starts_with("sem"))
        .map(|(i, h)| (i, h.to_string()))
        .collect();
    if semester_columns.is_empty() {
        bail!("GPA file has no semester columns (expected headers like Sem1, Sem2)");
    }

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("bad GPA row {}", index + 1))?;
        let name = record.get(name_index).unwrap_or_default().to_string();

        let mut scores = Vec::with_capacity(semester_columns.len());
        for (column, header) in &semester_columns {
            let cell = record.get(*column).unwrap_or_default();
            if cell.is_empty() {
                continue;
            }
            let score: f64 = cell.parse().with_context(|| {
                format!("GPA row {} column {header}: {cell:?} is not a number", index + 1)
            })?;
            scores.push(score);
        }

        rows.push(GpaRow { name, scores });
    }
    Ok(rows)
}

pub fn read_faq<R: Read>(reader: R) -> anyhow::Result<Vec<FaqEntry>> {
    let mut reader = csv_reader(reader);
    let mut entries = Vec::new();
    for (index, result) in reader.deserialize::<FaqEntry>().enumerate() {
        let entry = result.with_context(|| format!("bad FAQ row {}", index + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

fn open(path: &Path) -> anyhow::Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

pub fn load_attendance(path: &Path) -> anyhow::Result<Vec<AttendanceCsvRow>> {
    let rows =
        read_attendance(open(path)?).with_context(|| format!("in {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded attendance");
    Ok(rows)
}

pub fn load_gpa(path: &Path) -> anyhow::Result<Vec<GpaRow>> {
    let rows = read_gpa(open(path)?).with_context(|| format!("in {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded GPA records");
    Ok(rows)
}

pub fn load_faq(path: &Path) -> anyhow::Result<Vec<FaqEntry>> {
    let entries = read_faq(open(path)?).with_context(|| format!("in {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = entries.len(), "loaded FAQ");
    Ok(entries)
}

/// One record per attendance row that has GPA data under the same name.
pub fn join_records(attendance: Vec<AttendanceCsvRow>, gpa: Vec<GpaRow>) -> Vec<StudentRecord> {
    let mut scores_by_name: HashMap<String, Vec<f64>> = HashMap::new();
    for row in gpa {
        if scores_by_name.contains_key(&row.name) {
            tracing::warn!(name = %row.name, "duplicate GPA row ignored");
            continue;
        }
        scores_by_name.insert(row.name, row.scores);
    }

    let mut records = Vec::with_capacity(attendance.len());
    for row in attendance {
        let Some(scores) = scores_by_name.get(&row.name) else {
            tracing::warn!(name = %row.name, "no GPA data for student, skipping");
            continue;
        };
        records.push(StudentRecord {
            semester_scores: scores.clone(),
            name: row.name,
            roll_number: row.roll_number,
            parent_name: row.parent_name,
            parent_contact: row.parent_contact,
            attended_count: row.attended,
            total_count: row.total_classes,
        });
    }

    for name in scores_by_name.keys() {
        if !records.iter().any(|r| &r.name == name) {
            tracing::warn!(name = %name, "no attendance data for student, skipping");
        }
    }

    records
}

pub fn load_students(attendance_path: &Path, gpa_path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let attendance = load_attendance(attendance_path)?;
    let gpa = load_gpa(gpa_path)?;
    Ok(join_records(attendance, gpa))
}
