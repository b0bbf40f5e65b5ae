use tokio::time::{sleep, Duration};
use tracing::{error, info};

use super::{labels::LabelSync, milestones::MilestoneMap};
use crate::{
    integrations::{Issue, NewIssue, Repository},
    Result,
};

/// Issues created back to back before pausing.
pub const BATCH_SIZE: usize = 10;
/// Pause after each full batch, to stay clear of GitHub's secondary rate limits.
pub const BATCH_PAUSE: Duration = Duration::from_secs(60);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub created: usize,
    pub labels_created: usize,
    pub pauses: usize,
    /// Titles of source milestones left off copied issues, one entry per issue.
    pub skipped_milestones: Vec<String>,
}

pub struct IssueCopier<'a> {
    target: &'a dyn Repository,
    labels: LabelSync<'a>,
    milestones: &'a MilestoneMap,
    report: CopyReport,
    batch: usize,
}

impl<'a> IssueCopier<'a> {
    pub fn new(
        target: &'a dyn Repository,
        labels: LabelSync<'a>,
        milestones: &'a MilestoneMap,
    ) -> Self {
        Self {
            target,
            labels,
            milestones,
            report: CopyReport::default(),
            batch: 0,
        }
    }

    /// Creates one target issue per source issue, in order. Stops at the first failure.
    pub async fn copy_all(mut self, issues: &[Issue]) -> Result<CopyReport> {
        for issue in issues {
            self.copy(issue).await?;

            if self.batch == BATCH_SIZE {
                info!(
                    "Created {} issues so far, pausing {}s for rate limiting",
                    self.report.created,
                    BATCH_PAUSE.as_secs()
                );
                sleep(BATCH_PAUSE).await;
                self.batch = 0;
                self.report.pauses += 1;
            }
        }

        self.report.labels_created = self.labels.created();
        Ok(self.report)
    }

    async fn copy(&mut self, issue: &Issue) -> Result<()> {
        self.labels.sync(&issue.labels).await?;

        let milestone = match &issue.milestone {
            Some(source) => match self.milestones.get(source.number) {
                Some(mapped) => Some(mapped.number),
                None => {
                    info!(
                        "Skipping milestone assignment for #{} '{}': milestone '{}' (#{}) has no counterpart in {}",
                        issue.number,
                        issue.title,
                        source.title,
                        source.number,
                        self.target.coords()
                    );
                    self.report.skipped_milestones.push(source.title.clone());
                    None
                }
            },
            None => None,
        };

        let new = NewIssue {
            title: issue.title.clone(),
            body: issue.body.clone(),
            labels: self.labels.names_for(&issue.labels),
            milestone,
        };

        info!("Creating: {}", issue.title);
        match self.target.create_issue(&new).await {
            Ok(created) => {
                info!("Created #{} from #{}", created.number, issue.number);
                self.report.created += 1;
                self.batch += 1;
                Ok(())
            }
            Err(e) => {
                error!("Error creating the issue #{} '{}': {e}", issue.number, issue.title);
                Err(e)
            }
        }
    }
}
