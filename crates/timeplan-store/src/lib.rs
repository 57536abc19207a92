//! # timeplan-store
//!
//! In-memory project collection persisted to a spreadsheet file.
//!
//! Every mutating operation rewrites the whole file before returning, so the
//! file and the in-memory projects agree after each call. Only project rows
//! are persisted: stages live for the remainder of the process and are gone
//! after the next [`ProjectStore::open`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use timeplan_core::{parse_date, Project};
//! use timeplan_store::ProjectStore;
//!
//! let mut store = ProjectStore::open("TimePlan.xlsx")?;
//! store.add_project(Project::new(
//!     "Alpha",
//!     parse_date("01/01/2024")?,
//!     parse_date("31/12/2024")?,
//! ))?;
//! for summary in store.list_projects() {
//!     println!("{summary}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod sheet;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use timeplan_core::{flatten, CompletedStages, DateError, Project, ReportLine};
use tracing::{debug, info, warn};

// ============================================================================
// Errors
// ============================================================================

/// Storage error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Read(#[from] calamine::XlsxError),

    #[error("Failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Row {row}: {reason}")]
    InvalidRow { row: u32, reason: String },

    #[error("Row {row}: {source}")]
    InvalidDate {
        row: u32,
        #[source]
        source: DateError,
    },
}

impl StoreError {
    fn missing_cell(row: u32, column: &str) -> Self {
        Self::InvalidRow {
            row,
            reason: format!("missing value in column '{}'", column),
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Projects loaded from, and saved to, one spreadsheet file
#[derive(Debug)]
pub struct ProjectStore {
    storage_path: PathBuf,
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Create a store for `path` and load it.
    ///
    /// A missing file is not an error: the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            storage_path: path.into(),
            projects: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// First project with the given name
    pub fn find_project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Replace the in-memory projects with those stored in the file.
    ///
    /// Loaded projects never carry stages, so stages added since the last
    /// load are dropped. A missing file leaves the store empty.
    pub fn load(&mut self) -> Result<(), StoreError> {
        match sheet::read_projects(&self.storage_path)? {
            Some(projects) => {
                debug!(
                    path = %self.storage_path.display(),
                    count = projects.len(),
                    "loaded projects"
                );
                self.projects = projects;
            }
            None => {
                warn!(
                    path = %self.storage_path.display(),
                    "project file not found, starting empty"
                );
                self.projects.clear();
            }
        }
        Ok(())
    }

    /// Rewrite the whole file from the in-memory projects
    pub fn save(&self) -> Result<(), StoreError> {
        sheet::write_projects(&self.storage_path, &self.projects)?;
        debug!(
            path = %self.storage_path.display(),
            count = self.projects.len(),
            "saved projects"
        );
        Ok(())
    }

    /// Append a project and save
    pub fn add_project(&mut self, project: Project) -> Result<(), StoreError> {
        info!(project = %project.name, "adding project");
        self.projects.push(project);
        self.save()
    }

    /// Add a stage to the first project named `project_name` and save.
    ///
    /// Unknown project names are ignored.
    pub fn add_stage_to_project(
        &mut self,
        project_name: &str,
        stage_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let Some(project) = self.project_mut(project_name) else {
            debug!(project = project_name, "add stage: no such project");
            return Ok(());
        };
        project.add_stage(stage_name, start_date, end_date);
        info!(project = project_name, stage = stage_name, "added stage");
        self.save()
    }

    /// Set the end date of a stage in the first project named `project_name`
    /// and save.
    ///
    /// Unknown project names are ignored; an unknown stage name still saves.
    pub fn update_stage_in_project(
        &mut self,
        project_name: &str,
        stage_name: &str,
        new_end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let Some(project) = self.project_mut(project_name) else {
            debug!(project = project_name, "update stage: no such project");
            return Ok(());
        };
        if project.update_stage(stage_name, new_end_date) {
            info!(project = project_name, stage = stage_name, "updated stage");
        } else {
            debug!(project = project_name, stage = stage_name, "update stage: no such stage");
        }
        self.save()
    }

    /// Project summaries in store order.
    ///
    /// The iterator is lazy and can be cloned to walk the projects again.
    pub fn list_projects(&self) -> impl Iterator<Item = String> + Clone + '_ {
        self.projects.iter().map(Project::summary)
    }

    /// Completed stages grouped per project, projects without any omitted
    pub fn completed_groups(&self, reference: NaiveDate) -> Vec<CompletedStages<'_>> {
        CompletedStages::collect(&self.projects, reference)
    }

    /// Report lines: a project marker followed by each completed stage
    pub fn check_completed_stages(&self, reference: NaiveDate) -> Vec<ReportLine> {
        flatten(&self.completed_groups(reference))
    }

    /// [`check_completed_stages`](Self::check_completed_stages) against the local date
    pub fn check_completed_stages_today(&self) -> Vec<ReportLine> {
        self.check_completed_stages(chrono::Local::now().date_naive())
    }

    fn project_mut(&mut self, name: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.name == name)
    }
}

// ============================================================================
// Tests
// ============================================================================
