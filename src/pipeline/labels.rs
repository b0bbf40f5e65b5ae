use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, error, info, warn};

use crate::{
    integrations::{Label, Repository},
    settings::Whitelist,
    Result,
};

/// GitHub's default label grey, used when the source label has no color.
pub const DEFAULT_COLOR: &str = "cfd3d7";

/// Whether a label on a copied issue travels with it.
pub fn should_copy(name: &str, selection: &str, whitelist: &Whitelist) -> bool {
    name == selection || whitelist.is_empty() || whitelist.contains(name)
}

/// Makes sure the labels of copied issues exist in the target repository.
///
/// The cache is filled from the target on first use and then kept in step with every
/// label created, so each label name costs at most one remote lookup per run. GitHub
/// compares label names without regard to case, and so does the cache.
pub struct LabelSync<'a> {
    target: &'a dyn Repository,
    selection: &'a str,
    whitelist: &'a Whitelist,
    cache: Option<HashMap<String, Label>>,
    created: usize,
}

impl<'a> LabelSync<'a> {
    pub fn new(target: &'a dyn Repository, selection: &'a str, whitelist: &'a Whitelist) -> Self {
        Self {
            target,
            selection,
            whitelist,
            cache: None,
            created: 0,
        }
    }

    /// Names of the labels from `labels` that should be set on the copied issue.
    pub fn names_for(&self, labels: &[Label]) -> Vec<String> {
        labels
            .iter()
            .filter(|l| should_copy(&l.name, self.selection, self.whitelist))
            .map(|l| l.name.clone())
            .unique()
            .collect()
    }

    /// Labels created in the target so far.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Creates whichever of `labels` should be copied and are not in the target yet.
    ///
    /// A conflict on creation means the label appeared remotely after the cache was
    /// filled; it is fetched and cached instead. Any other failure is returned.
    pub async fn sync(&mut self, labels: &[Label]) -> Result<()> {
        let target = self.target;
        let wanted: Vec<&Label> = labels
            .iter()
            .filter(|l| should_copy(&l.name, self.selection, self.whitelist))
            .collect();
        if self.cache.is_none() {
            self.cache = Some(load(target).await?);
        }
        let cache = self.cache.get_or_insert_with(HashMap::new);

        for label in wanted {
            if cache.contains_key(&key(&label.name)) {
                continue;
            }

            let color = if label.color.is_empty() {
                DEFAULT_COLOR
            } else {
                &label.color
            };

            match target.create_label(&label.name, color).await {
                Ok(new) => {
                    info!("Created label '{}' in {}", new.name, target.coords());
                    cache.insert(key(&label.name), new);
                    self.created += 1;
                }
                Err(e) if e.is_duplicate() => match target.get_label(&label.name).await {
                    Ok(existing) => {
                        debug!("Label '{}' already existed, cached it", existing.name);
                        cache.insert(key(&label.name), existing);
                    }
                    Err(e) => {
                        warn!(
                            "Label '{}' exists in {} but could not be fetched: {e}",
                            label.name,
                            target.coords()
                        );
                    }
                },
                Err(e) => {
                    error!("Error creating the label {}: {e}", label.name);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

async fn load(target: &dyn Repository) -> Result<HashMap<String, Label>> {
    let existing = target.list_labels().await.inspect_err(|e| {
        error!("Error listing labels of {}: {e}", target.coords());
    })?;
    debug!(
        "{} has {} labels: {}",
        target.coords(),
        existing.len(),
        existing.iter().map(|l| &l.name).join(", ")
    );

    Ok(existing.into_iter().map(|l| (key(&l.name), l)).collect())
}

fn key(name: &str) -> String {
    name.to_lowercase()
}
