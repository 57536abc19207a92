//! Application context and typed action dispatch
//!
//! `App` owns the single `ProjectStore` for the process. Front ends build an
//! [`Action`] (directly from clap arguments, or through the [`ACTIONS`] table
//! when prompting interactively) and hand it to [`App::execute`].
//!
//! Dates travel as `DD/MM/YYYY` text up to `execute`, so a malformed date is
//! reported back to the front end as an error.

use anyhow::{Context, Result};
use timeplan_core::{parse_date, Project};
use timeplan_store::ProjectStore;

/// One store operation with its raw text arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ListProjects,
    AddProject {
        name: String,
        start: String,
        end: String,
    },
    AddStage {
        project: String,
        stage: String,
        start: String,
        end: String,
    },
    UpdateStage {
        project: String,
        stage: String,
        end: String,
    },
    /// `as_of` defaults to today
    CompletedStages { as_of: Option<String> },
}

/// Result of an action, ready to print
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub message: Option<String>,
    pub lines: Vec<String>,
}

impl Outcome {
    fn note(text: &str) -> Self {
        Self {
            message: Some(text.to_string()),
            lines: Vec::new(),
        }
    }

    fn listing(lines: Vec<String>, when_empty: &str) -> Self {
        if lines.is_empty() {
            Self::note(when_empty)
        } else {
            Self {
                message: None,
                lines,
            }
        }
    }
}

/// Dispatch table entry: the prompts an action needs and how to build it
#[derive(Debug)]
pub struct ActionSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub fields: &'static [&'static str],
    pub build: fn(Vec<String>) -> Action,
}

/// Every action reachable from the interactive shell, keyed by name
pub const ACTIONS: &[ActionSpec] = &[
    ActionSpec {
        key: "list",
        label: "List projects",
        fields: &[],
        build: build_list,
    },
    ActionSpec {
        key: "add-project",
        label: "Add project",
        fields: &["Project name", "Start date (DD/MM/YYYY)", "End date (DD/MM/YYYY)"],
        build: build_add_project,
    },
    ActionSpec {
        key: "add-stage",
        label: "Add stage",
        fields: &[
            "Project name",
            "Stage name",
            "Start date (DD/MM/YYYY)",
            "End date (DD/MM/YYYY)",
        ],
        build: build_add_stage,
    },
    ActionSpec {
        key: "update-stage",
        label: "Update stage",
        fields: &["Project name", "Stage name", "New end date (DD/MM/YYYY)"],
        build: build_update_stage,
    },
    ActionSpec {
        key: "completed",
        label: "Completed stages",
        fields: &["As of (DD/MM/YYYY, empty for today)"],
        build: build_completed,
    },
];

/// Find a dispatch entry by key, or by its 1-based menu position
pub fn lookup(choice: &str) -> Option<&'static ActionSpec> {
    if let Ok(index) = choice.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| ACTIONS.get(i));
    }
    ACTIONS.iter().find(|spec| spec.key == choice)
}

fn build_list(_: Vec<String>) -> Action {
    Action::ListProjects
}

fn build_add_project(fields: Vec<String>) -> Action {
    let mut fields = fields.into_iter();
    Action::AddProject {
        name: fields.next().unwrap_or_default(),
        start: fields.next().unwrap_or_default(),
        end: fields.next().unwrap_or_default(),
    }
}

fn build_add_stage(fields: Vec<String>) -> Action {
    let mut fields = fields.into_iter();
    Action::AddStage {
        project: fields.next().unwrap_or_default(),
        stage: fields.next().unwrap_or_default(),
        start: fields.next().unwrap_or_default(),
        end: fields.next().unwrap_or_default(),
    }
}

fn build_update_stage(fields: Vec<String>) -> Action {
    let mut fields = fields.into_iter();
    Action::UpdateStage {
        project: fields.next().unwrap_or_default(),
        stage: fields.next().unwrap_or_default(),
        end: fields.next().unwrap_or_default(),
    }
}

fn build_completed(fields: Vec<String>) -> Action {
    Action::CompletedStages {
        as_of: fields.into_iter().next().filter(|s| !s.is_empty()),
    }
}

/// Process-wide context handed to whichever front end is running
#[derive(Debug)]
pub struct App {
    store: ProjectStore,
}

impl App {
    pub fn new(store: ProjectStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn execute(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::ListProjects => Ok(Outcome::listing(
                self.store.list_projects().collect(),
                "No projects.",
            )),
            Action::AddProject { name, start, end } => {
                let project = Project::new(name, parse_date(&start)?, parse_date(&end)?);
                self.store
                    .add_project(project)
                    .context("failed to save project")?;
                Ok(Outcome::note("Project added."))
            }
            Action::AddStage {
                project,
                stage,
                start,
                end,
            } => {
                let (start, end) = (parse_date(&start)?, parse_date(&end)?);
                self.store
                    .add_stage_to_project(&project, &stage, start, end)
                    .context("failed to save projects")?;
                Ok(Outcome::note("Stage added."))
            }
            Action::UpdateStage {
                project,
                stage,
                end,
            } => {
                let end = parse_date(&end)?;
                self.store
                    .update_stage_in_project(&project, &stage, end)
                    .context("failed to save projects")?;
                Ok(Outcome::note("Stage updated."))
            }
            Action::CompletedStages { as_of } => {
                let report = match as_of {
                    Some(text) => self.store.check_completed_stages(parse_date(&text)?),
                    None => self.store.check_completed_stages_today(),
                };
                Ok(Outcome::listing(
                    report.iter().map(|line| line.to_string()).collect(),
                    "No completed stages found.",
                ))
            }
        }
    }
}
