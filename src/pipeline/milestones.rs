use std::collections::HashMap;

use tracing::{error, info};

use crate::integrations::{Milestone, NewMilestone, Repository};

/// Source milestone number to the matching milestone in the target repository.
#[derive(Debug, Default)]
pub struct MilestoneMap(HashMap<u64, Milestone>);

impl MilestoneMap {
    pub fn get(&self, source_number: u64) -> Option<&Milestone> {
        self.0.get(&source_number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Replicates the source milestones in the target, matching them by title.
///
/// Existing target milestones are reused as they are. Failures never abort the run:
/// a milestone that cannot be created is left out of the map, and a failed listing
/// yields an empty map.
pub async fn clone_milestones(source: &dyn Repository, target: &dyn Repository) -> MilestoneMap {
    let mut map = MilestoneMap::default();

    let source_milestones = match source.list_milestones().await {
        Ok(milestones) => milestones,
        Err(e) => {
            error!("Error listing milestones of {}: {e}", source.coords());
            return map;
        }
    };
    let mut by_title: HashMap<String, Milestone> = match target.list_milestones().await {
        Ok(milestones) => milestones
            .into_iter()
            .map(|m| (m.title.clone(), m))
            .collect(),
        Err(e) => {
            error!("Error listing milestones of {}: {e}", target.coords());
            return map;
        }
    };

    for milestone in &source_milestones {
        if let Some(existing) = by_title.get(&milestone.title) {
            info!(
                "Milestone '{}' already exists in {} as #{}",
                milestone.title,
                target.coords(),
                existing.number
            );
            map.0.insert(milestone.number, existing.clone());
            continue;
        }

        match target.create_milestone(&NewMilestone::like(milestone)).await {
            Ok(created) => {
                info!(
                    "Created milestone '{}' in {} as #{}",
                    created.title,
                    target.coords(),
                    created.number
                );
                by_title.insert(created.title.clone(), created.clone());
                map.0.insert(milestone.number, created);
            }
            Err(e) => {
                error!(
                    "Error creating the milestone '{}' (#{}): {e}",
                    milestone.title, milestone.number
                );
            }
        }
    }

    info!(
        "Mapped {} of {} milestones from {}",
        map.len(),
        source_milestones.len(),
        source.coords()
    );
    map
}
