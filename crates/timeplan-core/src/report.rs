//! Completed-stage report
//!
//! A stage is completed when its end date is on or before a reference date.
//! The report walks projects in order and keeps only those with at least one
//! completed stage:
//!
//! ```text
//! Project: Alpha
//! Stage: Design
//! 01/01/2024 - 15/02/2024
//! ```

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Project, Stage};

/// Completed stages of one project
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletedStages<'a> {
    pub project: &'a str,
    pub stages: Vec<&'a Stage>,
}

impl<'a> CompletedStages<'a> {
    /// Group completed stages per project, omitting projects with none
    pub fn collect(projects: &'a [Project], reference: NaiveDate) -> Vec<Self> {
        projects
            .iter()
            .filter_map(|project| {
                let stages = project.get_completed_stages(reference);
                (!stages.is_empty()).then_some(Self {
                    project: &project.name,
                    stages,
                })
            })
            .collect()
    }

    /// Marker line followed by one line per stage
    pub fn lines(&self) -> impl Iterator<Item = ReportLine> + '_ {
        std::iter::once(ReportLine::Project(self.project.to_string()))
            .chain(self.stages.iter().map(|s| ReportLine::Stage(s.summary())))
    }
}

/// One entry of the flattened report
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ReportLine {
    /// Project name marker
    Project(String),
    /// Stage summary
    Stage(String),
}

impl std::fmt::Display for ReportLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportLine::Project(name) => write!(f, "Project: {}", name),
            ReportLine::Stage(summary) => f.write_str(summary),
        }
    }
}

/// Flatten grouped stages into report lines
pub fn flatten(groups: &[CompletedStages<'_>]) -> Vec<ReportLine> {
    groups.iter().flat_map(|g| g.lines()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn projects() -> Vec<Project> {
        vec![
            Project::new("Alpha", date(2024, 1, 1), date(2024, 12, 31))
                .with_stage("Design", date(2024, 1, 1), date(2024, 2, 15))
                .with_stage("Build", date(2024, 2, 16), date(2024, 9, 1)),
            Project::new("Beta", date(2024, 3, 1), date(2024, 6, 1))
                .with_stage("Kickoff", date(2024, 3, 1), date(2024, 4, 1)),
            Project::new("Gamma", date(2024, 1, 1), date(2024, 2, 1))
                .with_stage("Setup", date(2024, 1, 1), date(2024, 1, 20)),
        ]
    }

    #[test]
    fn projects_without_completed_stages_are_omitted() {
        let projects = projects();
        let groups = CompletedStages::collect(&projects, date(2024, 3, 1));

        let names: Vec<_> = groups.iter().map(|g| g.project).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
        assert_eq!(groups[0].stages.len(), 1);
        assert_eq!(groups[0].stages[0].name, "Design");
    }

    #[test]
    fn empty_when_nothing_finished() {
        let projects = projects();
        assert!(CompletedStages::collect(&projects, date(2023, 12, 31)).is_empty());
    }

    #[test]
    fn flatten_emits_marker_then_stages() {
        let projects = projects();
        let groups = CompletedStages::collect(&projects, date(2024, 4, 1));
        let lines: Vec<String> = flatten(&groups).iter().map(|l| l.to_string()).collect();

        assert_eq!(
            lines,
            vec![
                "Project: Alpha",
                "Stage: Design\n01/01/2024 - 15/02/2024",
                "Project: Beta",
                "Stage: Kickoff\n01/03/2024 - 01/04/2024",
                "Project: Gamma",
                "Stage: Setup\n01/01/2024 - 20/01/2024",
            ]
        );
    }
}
