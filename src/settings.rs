use std::collections::BTreeSet;

use config::{Config, ConfigError, Environment};
use serde_derive::Deserialize;
use tracing::debug;

use crate::{cli::Cli, integrations::RepoCoords, Result};

pub const DEFAULT_LABEL: &str = "annual";
const ENV_PREFIX: &str = "TASKCLONE";

/// Extra labels to copy alongside the selection label. Empty means every label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist(BTreeSet<String>);

impl Whitelist {
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    source: RepoCoords,
    target: RepoCoords,
    label: String,
    whitelist: String,
    clone_milestones: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: RepoCoords,
    pub target: RepoCoords,
    pub label: String,
    pub whitelist: Whitelist,
    pub clone_milestones: bool,
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self> {
        Self::layered(
            cli,
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
    }

    fn layered(cli: &Cli, env: Environment) -> Result<Self> {
        debug!("Reading settings from {ENV_PREFIX}_* variables and command-line flags");

        let config = Config::builder()
            .set_default("label", DEFAULT_LABEL)?
            .set_default("whitelist", "")?
            .set_default("clone_milestones", false)?
            .add_source(env)
            .set_override_option("source.owner", cli.source_owner.clone())?
            .set_override_option("source.repo", cli.source_repo.clone())?
            .set_override_option("target.owner", cli.target_owner.clone())?
            .set_override_option("target.repo", cli.target_repo.clone())?
            .set_override_option("label", cli.label.clone())?
            .set_override_option("whitelist", cli.whitelist.clone())?
            .set_override_option("clone_milestones", cli.clone_milestones.then_some(true))?
            .build()?;

        config.try_deserialize::<RawSettings>()?.validate()
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings> {
        for (key, value) in [
            ("source owner", &self.source.owner),
            ("source repo", &self.source.repo),
            ("target owner", &self.target.owner),
            ("target repo", &self.target.repo),
            ("label", &self.label),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{key} must not be empty")).into());
            }
        }

        Ok(Settings {
            source: self.source,
            target: self.target,
            label: self.label,
            whitelist: Whitelist::parse(&self.whitelist),
            clone_milestones: self.clone_milestones,
        })
    }
}
