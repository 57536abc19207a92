//! # timeplan-core
//!
//! Core domain model for the timeplan project tracker.
//!
//! This crate provides:
//! - Domain types: `Project`, `Stage`
//! - The `DD/MM/YYYY` date codec shared by storage and the shell
//! - Completed-stage report types
//!
//! ## Example
//!
//! ```rust
//! use timeplan_core::{parse_date, Project};
//!
//! let mut project = Project::new(
//!     "Alpha",
//!     parse_date("01/01/2024").unwrap(),
//!     parse_date("31/12/2024").unwrap(),
//! );
//! project.add_stage(
//!     "Design",
//!     parse_date("01/01/2024").unwrap(),
//!     parse_date("15/02/2024").unwrap(),
//! );
//!
//! let completed = project.get_completed_stages(parse_date("01/03/2024").unwrap());
//! assert_eq!(completed.len(), 1);
//! assert_eq!(completed[0].name, "Design");
//! ```

pub mod report;

pub use report::{flatten, CompletedStages, ReportLine};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Dates
// ============================================================================

/// chrono format string for every date crossing a text boundary
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `DD/MM/YYYY` date
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| DateError {
        input: input.to_string(),
        source,
    })
}

/// Format a date as `DD/MM/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Date text that does not match `DD/MM/YYYY`
#[derive(Debug, Error)]
#[error("invalid date '{input}': expected DD/MM/YYYY")]
pub struct DateError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

fn date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_date(start), format_date(end))
}

// ============================================================================
// Stage
// ============================================================================

/// A named sub-phase of a project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub start_date: NaiveDate,
    /// Not validated against `start_date`
    pub end_date: NaiveDate,
}

impl Stage {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
        }
    }

    /// Spreadsheet row: name, start, end
    pub fn to_row(&self) -> [String; 3] {
        [
            self.name.clone(),
            format_date(self.start_date),
            format_date(self.end_date),
        ]
    }

    /// Two-line display text: name, then date range
    pub fn summary(&self) -> String {
        format!(
            "Stage: {}\n{}",
            self.name,
            date_range(self.start_date, self.end_date)
        )
    }

    /// Whether the stage ended on or before `reference`
    pub fn is_completed(&self, reference: NaiveDate) -> bool {
        self.end_date <= reference
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

// ============================================================================
// Project
// ============================================================================

/// A tracked work item with an overall date range and its stages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Expected to be unique across the store, not enforced
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Insertion order is preserved
    pub stages: Vec<Stage>,
}

impl Project {
    /// Create a project with no stages
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            stages: Vec::new(),
        }
    }

    /// Append a stage (builder style)
    pub fn with_stage(
        mut self,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        self.add_stage(name, start_date, end_date);
        self
    }

    /// Append a stage. Duplicate names are appended as-is.
    pub fn add_stage(&mut self, name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) {
        self.stages.push(Stage::new(name, start_date, end_date));
    }

    /// Set the end date of the first stage named `stage_name`.
    ///
    /// Returns `false` and leaves every stage untouched when no stage matches.
    pub fn update_stage(&mut self, stage_name: &str, new_end_date: NaiveDate) -> bool {
        match self.stages.iter_mut().find(|s| s.name == stage_name) {
            Some(stage) => {
                stage.end_date = new_end_date;
                true
            }
            None => false,
        }
    }

    /// First stage with the given name
    pub fn find_stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Stages whose end date is on or before `reference`, in insertion order
    pub fn get_completed_stages(&self, reference: NaiveDate) -> Vec<&Stage> {
        self.stages
            .iter()
            .filter(|s| s.is_completed(reference))
            .collect()
    }

    /// Spreadsheet row: name, start, end. Stages are not part of the row.
    pub fn to_row(&self) -> [String; 3] {
        [
            self.name.clone(),
            format_date(self.start_date),
            format_date(self.end_date),
        ]
    }

    /// Two-line display text: name, then date range
    pub fn summary(&self) -> String {
        format!(
            "Project: {}\n{}",
            self.name,
            date_range(self.start_date, self.end_date)
        )
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

// ============================================================================
// Tests
// ============================================================================
