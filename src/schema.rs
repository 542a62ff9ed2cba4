use tracing::debug;

use crate::error::{Result, SyncError};
use crate::gateway::BoardGateway;
use crate::model::{Project, ProjectLocator};

/// A status option resolved to the opaque ids the mutation API wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTarget {
    pub field_id: String,
    pub option_id: String,
}

/// Resolve a board locator to a project, including its Status field schema.
pub fn resolve_project<G: BoardGateway>(
    gateway: &G,
    org: &str,
    locator: &ProjectLocator,
) -> Result<Project> {
    let project = gateway.fetch_project(org, locator)?;
    debug!(
        project = %project.title,
        options = project.status_field.options.len(),
        "resolved project board"
    );
    Ok(project)
}

/// Look up a status option by its human-readable label.
///
/// Board maintainers configure labels through the UI, so options are located
/// by exact label match rather than a hard-coded opaque id. The option set is
/// small and bounded; a linear scan is fine.
pub fn resolve_status_option(project: &Project, label: &str) -> Result<StatusTarget> {
    let field = &project.status_field;
    for option in &field.options {
        if option.label == label {
            return Ok(StatusTarget {
                field_id: field.id.clone(),
                option_id: option.id.clone(),
            });
        }
    }
    Err(SyncError::NotFound(format!(
        "status option {:?} in project {:?}",
        label, project.title
    )))
}
