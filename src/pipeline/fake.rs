//! In-memory repository that records every call it receives.

use std::{collections::HashSet, sync::Mutex};

use async_trait::async_trait;

use crate::{
    error::CloneError,
    integrations::{
        Issue, Label, Milestone, MilestoneState, NewIssue, NewMilestone, RepoCoords, Repository,
    },
    Result,
};

#[derive(Debug, Default)]
pub struct State {
    pub issues: Vec<Issue>,
    /// Matched without regard to case, like GitHub does.
    pub labels: Vec<Label>,
    pub milestones: Vec<Milestone>,

    /// Labels that exist but are missing from `list_labels`, as if created behind our back.
    pub unlisted_labels: HashSet<String>,
    /// Labels whose creation conflicts and whose lookup then fails.
    pub unreachable_labels: HashSet<String>,
    pub failing_labels: HashSet<String>,
    pub failing_milestones: HashSet<String>,
    pub failing_issues: HashSet<String>,
    pub milestone_listing_fails: bool,

    pub calls: Vec<String>,
    pub created_labels: Vec<Label>,
    pub created_milestones: Vec<NewMilestone>,
    pub created_issues: Vec<NewIssue>,
}

pub struct FakeRepo {
    coords: RepoCoords,
    pub state: Mutex<State>,
}

impl FakeRepo {
    pub fn new(repo: &str) -> Self {
        Self {
            coords: RepoCoords {
                owner: "acme".into(),
                repo: repo.into(),
            },
            state: Mutex::new(State::default()),
        }
    }

    pub fn with(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn calls(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn created_issues(&self) -> Vec<NewIssue> {
        self.state.lock().unwrap().created_issues.clone()
    }

    pub fn created_milestones(&self) -> Vec<NewMilestone> {
        self.state.lock().unwrap().created_milestones.clone()
    }

    pub fn created_labels(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .created_labels
            .iter()
            .map(|l| l.name.clone())
            .collect()
    }

    fn mutations(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.created_labels.len() + state.created_milestones.len() + state.created_issues.len()
    }

    pub fn is_untouched(&self) -> bool {
        self.mutations() == 0
    }
}

pub fn label(name: &str) -> Label {
    Label {
        name: name.into(),
        color: "ededed".into(),
    }
}

pub fn milestone(number: u64, title: &str) -> Milestone {
    Milestone {
        number,
        title: title.into(),
        state: MilestoneState::Open,
        description: None,
        due_on: None,
    }
}

pub fn issue(number: u64, title: &str, labels: &[&str], milestone: Option<Milestone>) -> Issue {
    Issue {
        number,
        title: title.into(),
        body: format!("Body of {title}"),
        labels: labels.iter().copied().map(label).collect(),
        milestone,
    }
}

fn remote(what: &str) -> CloneError {
    CloneError::Remote(format!("500 Internal Server Error creating {what}"))
}

#[async_trait]
impl Repository for FakeRepo {
    fn coords(&self) -> &RepoCoords {
        &self.coords
    }

    async fn list_issues(&self, label: &str) -> Result<Vec<Issue>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_issues:{label}"));
        Ok(state
            .issues
            .iter()
            .filter(|issue| issue.labels.iter().any(|l| l.name == label))
            .cloned()
            .collect())
    }

    async fn list_labels(&self) -> Result<Vec<Label>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_labels".into());
        Ok(state
            .labels
            .iter()
            .filter(|l| !state.unlisted_labels.contains(&l.name))
            .cloned()
            .collect())
    }

    async fn create_label(&self, name: &str, color: &str) -> Result<Label> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_label:{name}"));
        if state.failing_labels.contains(name) {
            return Err(remote(name));
        }
        if state.unreachable_labels.contains(name)
            || state.labels.iter().any(|l| l.name.eq_ignore_ascii_case(name))
        {
            return Err(CloneError::DuplicateLabel(name.into()));
        }
        let created = Label {
            name: name.into(),
            color: color.into(),
        };
        state.labels.push(created.clone());
        state.created_labels.push(created.clone());
        Ok(created)
    }

    async fn get_label(&self, name: &str) -> Result<Label> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get_label:{name}"));
        if state.unreachable_labels.contains(name) {
            return Err(CloneError::NotFound(format!("label '{name}'")));
        }
        state
            .labels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| CloneError::NotFound(format!("label '{name}'")))
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_milestones".into());
        if state.milestone_listing_fails {
            return Err(CloneError::Remote("502 Bad Gateway".into()));
        }
        Ok(state.milestones.clone())
    }

    async fn create_milestone(&self, new: &NewMilestone) -> Result<Milestone> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_milestone:{}", new.title));
        if state.failing_milestones.contains(&new.title) {
            return Err(remote(&new.title));
        }
        let number = state.milestones.iter().map(|m| m.number).max().unwrap_or(0) + 1;
        let created = Milestone {
            number,
            title: new.title.clone(),
            state: new.state,
            description: new.description.clone(),
            due_on: None,
        };
        state.milestones.push(created.clone());
        state.created_milestones.push(new.clone());
        Ok(created)
    }

    async fn create_issue(&self, new: &NewIssue) -> Result<Issue> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_issue:{}", new.title));
        if state.failing_issues.contains(&new.title) {
            return Err(remote(&new.title));
        }
        state.created_issues.push(new.clone());
        let number = state.created_issues.len() as u64;
        Ok(Issue {
            number,
            title: new.title.clone(),
            body: new.body.clone(),
            labels: new.labels.iter().map(|name| label(name)).collect(),
            milestone: None,
        })
    }
}
