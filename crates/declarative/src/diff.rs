//! Diff computation for resources

use crate::resource::Resource;
use crate::types::ResourceState;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A diff between current and desired state of a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Unique identifier of the resource
    pub resource_id: String,
    /// Type of the resource
    pub resource_type: String,
    /// Human-readable description
    pub description: String,
    /// Current state
    pub current: ResourceState,
    /// Desired state
    pub desired: ResourceState,
}

impl ResourceDiff {
    /// Create a diff from a resource, returning None if no changes needed
    pub fn from_resource(resource: &dyn Resource) -> Result<Option<Self>> {
        let current = resource.current_state()?;
        let desired = resource.desired_state();

        if current == desired {
            return Ok(None);
        }

        Ok(Some(Self {
            resource_id: resource.id(),
            resource_type: resource.resource_type().to_string(),
            description: resource.description(),
            current,
            desired,
        }))
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        matches!(
            (&self.current, &self.desired),
            (ResourceState::Absent, ResourceState::Present { .. })
        )
    }

    /// Check if this diff represents a removal
    pub fn is_removal(&self) -> bool {
        matches!(
            (&self.current, &self.desired),
            (ResourceState::Present { .. }, ResourceState::Absent)
        )
    }
}

/// A resource whose current state could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableResource {
    /// Unique identifier of the resource
    pub resource_id: String,
    /// Why its state could not be read
    pub error: String,
}

/// Diffs for a set of resources, plus the resources that could not be diffed
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    /// Resources whose current state differs from the desired state
    pub diffs: Vec<ResourceDiff>,
    /// Resources whose current state could not be read
    pub unreadable: Vec<UnreadableResource>,
}

impl DiffReport {
    /// Nothing to apply and nothing failed
    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty() && self.unreadable.is_empty()
    }
}

/// Diff every resource, keeping the ones whose state cannot be read
pub fn diff_resources(resources: &[Box<dyn Resource>]) -> DiffReport {
    let mut report = DiffReport::default();
    for resource in resources {
        match ResourceDiff::from_resource(resource.as_ref()) {
            Ok(Some(diff)) => report.diffs.push(diff),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Could not determine state of {}: {e:#}", resource.id());
                report.unreadable.push(UnreadableResource {
                    resource_id: resource.id(),
                    error: format!("{e:#}"),
                });
            }
        }
    }
    report
}

/// Compute diffs for a list of resources
///
/// Returns only resources that have differences between current and desired state.
/// Use [`diff_resources`] to also see resources whose state cannot be read.
pub fn compute_diffs(resources: &[Box<dyn Resource>]) -> Vec<ResourceDiff> {
    diff_resources(resources).diffs
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to remove
    pub removals: usize,
    /// Number of resources to modify
    pub modifications: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if diff.is_addition() {
                summary.additions += 1;
            } else if diff.is_removal() {
                summary.removals += 1;
            } else {
                summary.modifications += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
