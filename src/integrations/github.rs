use async_trait::async_trait;
use octocrab::{
    issues::IssueHandler, models, params, service::middleware::retry::RetryConfig, Octocrab,
    Page,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    Issue, Label, Milestone, MilestoneState, NewIssue, NewMilestone, RepoCoords, Repository,
};
use crate::{
    error::{status_of, CloneError},
    Result,
};

const PER_PAGE: u8 = 100;

#[derive(Debug, Deserialize)]
struct Identity {
    login: String,
}

#[derive(Serialize)]
struct ListAll {
    state: &'static str,
    per_page: u8,
}

/// Authenticated GitHub API client.
pub fn connect(token: &str) -> Result<Octocrab> {
    client(token, None)
}

/// Every request is sent exactly once: octocrab's automatic retries are turned off.
fn client(token: &str, base_uri: Option<&str>) -> Result<Octocrab> {
    let mut builder = Octocrab::builder()
        .personal_token(token.to_string())
        .add_retry_config(RetryConfig::None);
    if let Some(uri) = base_uri {
        builder = builder.base_uri(uri)?;
    }
    Ok(builder.build()?)
}

/// Identity check for the token the client was built with. Returns the login.
pub async fn authenticate(octo: &Octocrab) -> Result<String> {
    let me: Identity = octo
        .get("/user", None::<&()>)
        .await
        .map_err(|e| CloneError::Auth(CloneError::from(e).to_string()))?;
    Ok(me.login)
}

impl From<models::Label> for Label {
    fn from(label: models::Label) -> Self {
        Self {
            name: label.name,
            color: label.color,
        }
    }
}

impl From<models::Milestone> for Milestone {
    fn from(milestone: models::Milestone) -> Self {
        Self {
            number: milestone.number as u64,
            title: milestone.title,
            state: match milestone.state.as_deref() {
                Some("closed") => MilestoneState::Closed,
                _ => MilestoneState::Open,
            },
            description: milestone.description,
            due_on: milestone.due_on,
        }
    }
}

impl From<models::issues::Issue> for Issue {
    fn from(issue: models::issues::Issue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            labels: issue.labels.into_iter().map(Label::from).collect(),
            milestone: issue.milestone.map(Milestone::from),
        }
    }
}

/// Repository client bound to one `owner/repo`.
#[derive(Clone)]
pub struct GitHubRepo {
    octo: Octocrab,
    coords: RepoCoords,
}

impl GitHubRepo {
    /// Looks the repository up so a typo fails before anything is copied.
    pub async fn open(octo: Octocrab, coords: RepoCoords) -> Result<Self> {
        let route = format!("/repos/{}/{}", coords.owner, coords.repo);
        if let Err(e) = octo.get::<serde::de::IgnoredAny, _, ()>(&route, None).await {
            return Err(CloneError::RepoNotFound {
                repo: coords.to_string(),
                reason: CloneError::from(e).to_string(),
            });
        }

        Ok(Self { octo, coords })
    }

    fn issues(&self) -> IssueHandler<'_> {
        self.octo
            .issues(self.coords.owner.as_str(), self.coords.repo.as_str())
    }

    fn route(&self, tail: &str) -> String {
        format!("/repos/{}/{}/{tail}", self.coords.owner, self.coords.repo)
    }
}

#[async_trait]
impl Repository for GitHubRepo {
    fn coords(&self) -> &RepoCoords {
        &self.coords
    }

    async fn list_issues(&self, label: &str) -> Result<Vec<Issue>> {
        let labels = [label.to_string()];
        let page = self
            .issues()
            .list()
            .labels(&labels)
            .state(params::State::All)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let items = self.octo.all_pages(page).await?;

        let (pulls, issues): (Vec<_>, Vec<_>) =
            items.into_iter().partition(|item| item.pull_request.is_some());
        debug!(
            "{}: {} issues labelled '{label}', {} pull requests ignored",
            self.coords,
            issues.len(),
            pulls.len()
        );

        Ok(issues.into_iter().map(Issue::from).collect())
    }

    async fn list_labels(&self) -> Result<Vec<Label>> {
        let page = self
            .issues()
            .list_labels_for_repo()
            .per_page(PER_PAGE)
            .send()
            .await?;
        let labels = self.octo.all_pages(page).await?;
        Ok(labels.into_iter().map(Label::from).collect())
    }

    async fn create_label(&self, name: &str, color: &str) -> Result<Label> {
        self.issues()
            .create_label(name, color.trim_start_matches('#'), "")
            .await
            .map(Label::from)
            .map_err(|e| match status_of(&e) {
                Some(422) => CloneError::DuplicateLabel(name.to_string()),
                _ => e.into(),
            })
    }

    // Raw route: the label name has to be escaped into the path.
    async fn get_label(&self, name: &str) -> Result<Label> {
        let route = self.route(&format!("labels/{}", urlencoding::encode(name)));
        self.octo
            .get(route, None::<&()>)
            .await
            .map_err(|e| match status_of(&e) {
                Some(404) => CloneError::NotFound(format!("label '{name}'")),
                _ => e.into(),
            })
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>> {
        let params = ListAll {
            state: "all",
            per_page: PER_PAGE,
        };
        let page: Page<Milestone> = self
            .octo
            .get(self.route("milestones"), Some(&params))
            .await?;
        Ok(self.octo.all_pages(page).await?)
    }

    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<Milestone> {
        Ok(self
            .octo
            .post(self.route("milestones"), Some(milestone))
            .await?)
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue> {
        let labels = (!issue.labels.is_empty()).then(|| issue.labels.clone());
        let created = self
            .issues()
            .create(issue.title.as_str())
            .body(issue.body.clone())
            .labels(labels)
            .milestone(issue.milestone)
            .send()
            .await?;
        Ok(created.into())
    }
}
