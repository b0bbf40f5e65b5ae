//! The copy run: milestones, then labels and issues.

use itertools::Itertools;
use tracing::info;

use crate::{integrations::Repository, settings::Settings, Result};

use self::{
    issues::IssueCopier,
    labels::LabelSync,
    milestones::{clone_milestones, MilestoneMap},
};

pub mod issues;
pub mod labels;
pub mod milestones;

#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub issues_found: usize,
    pub issues_created: usize,
    pub milestones_mapped: usize,
    pub labels_created: usize,
    pub pauses: usize,
    /// Source milestone titles that could not be set on a copied issue.
    pub skipped_milestones: Vec<String>,
}

/// Copies every issue carrying the selection label from `source` to `target`.
pub async fn run(
    source: &dyn Repository,
    target: &dyn Repository,
    settings: &Settings,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    if !settings.whitelist.is_empty() {
        info!(
            "Copying label '{}' plus whitelisted labels: {}",
            settings.label,
            settings.whitelist.iter().join(", ")
        );
    }

    let milestones = if settings.clone_milestones {
        clone_milestones(source, target).await
    } else {
        MilestoneMap::default()
    };
    summary.milestones_mapped = milestones.len();
    if settings.clone_milestones && milestones.is_empty() {
        info!("No milestones mapped, copied issues will have none");
    }

    let issues = source.list_issues(&settings.label).await?;
    summary.issues_found = issues.len();
    if issues.is_empty() {
        info!(
            "No issues found in {} with label '{}', nothing to copy.",
            source.coords(),
            settings.label
        );
        return Ok(summary);
    }
    info!(
        "Found {} issues in {} labelled '{}'",
        issues.len(),
        source.coords(),
        settings.label
    );

    let labels = LabelSync::new(target, &settings.label, &settings.whitelist);
    let report = IssueCopier::new(target, labels, &milestones)
        .copy_all(&issues)
        .await?;

    summary.issues_created = report.created;
    summary.labels_created = report.labels_created;
    summary.pauses = report.pauses;
    summary.skipped_milestones = report.skipped_milestones;
    Ok(summary)
}
