use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

pub mod github;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`.
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneState {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: MilestoneState,
    pub description: Option<String>,
    pub due_on: Option<DateTime<Utc>>,
}

/// Source-side view of an issue. Pull requests never make it into one.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMilestone {
    pub title: String,
    pub state: MilestoneState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

impl NewMilestone {
    /// Copy of `source` ready to be created in another repository.
    pub fn like(source: &Milestone) -> Self {
        Self {
            title: source.title.clone(),
            state: source.state,
            description: source.description.clone(),
            due_on: source
                .due_on
                .map(|due| due.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Issue to create. Empty `labels` and unset `milestone` are left out of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub milestone: Option<u64>,
}

/// `owner/repo` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoCoords {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Operations the copy pipeline needs from one repository.
#[async_trait]
pub trait Repository: Send + Sync {
    fn coords(&self) -> &RepoCoords;

    /// Every issue (open or closed) carrying `label`, pull requests excluded.
    async fn list_issues(&self, label: &str) -> Result<Vec<Issue>>;

    async fn list_labels(&self) -> Result<Vec<Label>>;

    /// Fails with `DuplicateLabel` when the label already exists.
    async fn create_label(&self, name: &str, color: &str) -> Result<Label>;

    /// Fails with `NotFound` when no such label exists.
    async fn get_label(&self, name: &str) -> Result<Label>;

    /// Every milestone, open or closed.
    async fn list_milestones(&self) -> Result<Vec<Milestone>>;

    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<Milestone>;

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue>;
}
