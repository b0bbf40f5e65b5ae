mod cli;
mod credentials;
mod error;
mod integrations;
mod pipeline;
mod settings;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::{
    cli::Cli,
    integrations::{github, github::GitHubRepo, Repository},
    pipeline::RunSummary,
    settings::Settings,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match copy(Cli::parse()).await {
        Ok(summary) => {
            info!("Copied {} issues.", summary.issues_created);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn copy(cli: Cli) -> anyhow::Result<RunSummary> {
    let settings = Settings::new(&cli)?;
    let token = credentials::resolve_token()?;

    let octo = github::connect(&token).context("Could not build the GitHub client")?;
    let login = github::authenticate(&octo).await?;
    info!("Logged in to GitHub as {login}");

    let source = GitHubRepo::open(octo.clone(), settings.source.clone()).await?;
    info!("Source repository: {}", source.coords());
    let target = GitHubRepo::open(octo, settings.target.clone()).await?;
    info!("Target repository: {}", target.coords());

    let summary = pipeline::run(&source, &target, &settings).await?;
    info!(
        "Found {} issues, created {}, mapped {} milestones, created {} labels, paused {} times",
        summary.issues_found,
        summary.issues_created,
        summary.milestones_mapped,
        summary.labels_created,
        summary.pauses
    );
    if !summary.skipped_milestones.is_empty() {
        info!(
            "Copied without their milestone, for lack of a target counterpart: {}",
            summary.skipped_milestones.iter().unique().join(", ")
        );
    }

    Ok(summary)
}
