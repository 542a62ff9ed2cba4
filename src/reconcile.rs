use tracing::debug;

use crate::error::{Result, SyncError};
use crate::gateway::BoardGateway;
use crate::model::{ContentRef, Project};
use crate::schema::StatusTarget;

/// Which branch the reconciler took for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The item had no status; the target option was written.
    Written,
    /// The item already carried a status; nothing was written.
    AlreadySet,
}

/// Reconciles one discovered item against the board: idempotent add, then a
/// status write only when no status is set.
///
/// An existing status is never overwritten, whichever bucket it belongs to.
/// A "Done" set by hand blocks the write just like a previous triage label;
/// that is deliberate. The inspect-then-write sequence is not guarded against
/// concurrent external edits; this is a single-writer batch tool.
pub struct Reconciler<'g, G: BoardGateway> {
    gateway: &'g G,
}

impl<'g, G: BoardGateway> Reconciler<'g, G> {
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Add `content` to the board if absent and write `target` into its
    /// Status field unless a status is already present.
    ///
    /// Callers must not pass items without a resolvable content id; the
    /// source enumerator filters those out.
    pub fn reconcile(
        &self,
        project: &Project,
        content: &ContentRef,
        target: &StatusTarget,
    ) -> Result<Outcome> {
        let item = self
            .gateway
            .add_item(&project.id, &content.id)
            .map_err(|e| {
                SyncError::AddFailed(format!("[{}] {:?}: {}", content.number, content.title, e))
            })?;

        if item.status_is_unset() {
            self.gateway
                .set_status(&project.id, &item.id, &target.field_id, &target.option_id)
                .map_err(|e| {
                    SyncError::UpdateFailed(format!(
                        "[{}] {:?}: {}",
                        content.number, content.title, e
                    ))
                })?;
            debug!(number = content.number, item = %item.id, "status written");
            Ok(Outcome::Written)
        } else {
            debug!(
                number = content.number,
                item = %item.id,
                status = item.status.as_deref().unwrap_or_default(),
                "status already set"
            );
            Ok(Outcome::AlreadySet)
        }
    }
}
