use crate::error::Result;
use crate::model::{BoardItem, ContentRef, Project, ProjectLocator, TriageBucket};

/// Capability handle for the project-board API.
///
/// All board reads and mutations go through this trait so the schema
/// resolver, reconciler, and orchestrator never talk to the network
/// directly. The production implementation is [`crate::github::GithubClient`].
pub trait BoardGateway {
    /// Resolve a board locator to a project with its Status field schema.
    fn fetch_project(&self, org: &str, locator: &ProjectLocator) -> Result<Project>;

    /// Attach a content object to the board.
    ///
    /// Idempotent at the API boundary: adding an already-present item
    /// returns the existing board item instead of duplicating it.
    fn add_item(&self, project_id: &str, content_id: &str) -> Result<BoardItem>;

    /// Write a single-select option into an item's Status field.
    fn set_status(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<()>;
}

/// Source of candidate items, already filtered by the configured selection
/// criteria. Pagination and exhaustion handling are entirely the
/// implementation's concern; callers only see finite lists.
pub trait ItemSource {
    /// Repositories to scan for a discovery category, as `owner/name` pairs.
    fn repositories(&self, bucket: TriageBucket) -> Result<Vec<String>>;

    /// Candidate issues and PRs in one repository. Every returned item
    /// carries a resolvable content id.
    fn items(&self, bucket: TriageBucket, repo: &str) -> Result<Vec<ContentRef>>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::SyncError;
    use crate::model::{StatusField, StatusOption};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// In-memory board for unit tests. Tracks added items, their statuses,
    /// and every status write issued against it.
    pub struct MockGateway {
        pub project: Project,
        /// content id -> board item id
        pub board: RefCell<HashMap<String, String>>,
        /// board item id -> status label
        pub statuses: RefCell<HashMap<String, String>>,
        /// (item id, option id) per set_status call
        pub writes: RefCell<Vec<(String, String)>>,
        pub fail_add_for: RefCell<Option<String>>,
        pub fail_update: Cell<bool>,
        next_item: Cell<u64>,
    }

    impl MockGateway {
        pub fn new(project: Project) -> Self {
            Self {
                project,
                board: RefCell::new(HashMap::new()),
                statuses: RefCell::new(HashMap::new()),
                writes: RefCell::new(Vec::new()),
                fail_add_for: RefCell::new(None),
                fail_update: Cell::new(false),
                next_item: Cell::new(1),
            }
        }

        /// A board with a Status field holding the given (label, id) options.
        pub fn project_with_options(options: &[(&str, &str)]) -> Project {
            Project {
                id: "PVT_board".to_string(),
                title: "Test Board".to_string(),
                status_field: StatusField {
                    id: "F".to_string(),
                    options: options
                        .iter()
                        .map(|(label, id)| StatusOption {
                            id: (*id).to_string(),
                            label: (*label).to_string(),
                        })
                        .collect(),
                },
            }
        }

        /// Pre-set a status label on an item, as a human would via the UI.
        pub fn preset_status(&self, item_id: &str, label: &str) {
            self.statuses
                .borrow_mut()
                .insert(item_id.to_string(), label.to_string());
        }

        fn option_label(&self, option_id: &str) -> Option<String> {
            self.project
                .status_field
                .options
                .iter()
                .find(|o| o.id == option_id)
                .map(|o| o.label.clone())
        }
    }

    impl BoardGateway for MockGateway {
        fn fetch_project(&self, _org: &str, _locator: &ProjectLocator) -> Result<Project> {
            Ok(self.project.clone())
        }

        fn add_item(&self, _project_id: &str, content_id: &str) -> Result<BoardItem> {
            if self.fail_add_for.borrow().as_deref() == Some(content_id) {
                return Err(SyncError::Api("add rejected".to_string()));
            }
            let mut board = self.board.borrow_mut();
            let item_id = if let Some(existing) = board.get(content_id).cloned() {
                existing
            } else {
                let id = format!("PVTI_{}", self.next_item.get());
                self.next_item.set(self.next_item.get() + 1);
                board.insert(content_id.to_string(), id.clone());
                id
            };
            Ok(BoardItem {
                status: self.statuses.borrow().get(&item_id).cloned(),
                id: item_id,
            })
        }

        fn set_status(
            &self,
            _project_id: &str,
            item_id: &str,
            _field_id: &str,
            option_id: &str,
        ) -> Result<()> {
            if self.fail_update.get() {
                return Err(SyncError::Api("update rejected".to_string()));
            }
            self.writes
                .borrow_mut()
                .push((item_id.to_string(), option_id.to_string()));
            if let Some(label) = self.option_label(option_id) {
                self.statuses
                    .borrow_mut()
                    .insert(item_id.to_string(), label);
            }
            Ok(())
        }
    }

    /// Canned discovery results per category, with optional injected failure.
    pub struct MockSource {
        /// bucket -> ordered (repo, items) pairs
        pub repos: Vec<(TriageBucket, String, Vec<ContentRef>)>,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self { repos: Vec::new() }
        }

        pub fn with_repo(
            mut self,
            bucket: TriageBucket,
            repo: &str,
            items: Vec<ContentRef>,
        ) -> Self {
            self.repos.push((bucket, repo.to_string(), items));
            self
        }
    }

    impl ItemSource for MockSource {
        fn repositories(&self, bucket: TriageBucket) -> Result<Vec<String>> {
            Ok(self
                .repos
                .iter()
                .filter(|(b, _, _)| *b == bucket)
                .map(|(_, repo, _)| repo.clone())
                .collect())
        }

        fn items(&self, bucket: TriageBucket, repo: &str) -> Result<Vec<ContentRef>> {
            Ok(self
                .repos
                .iter()
                .find(|(b, r, _)| *b == bucket && r == repo)
                .map(|(_, _, items)| items.clone())
                .unwrap_or_default())
        }
    }

    pub fn content(id: &str, number: u64, title: &str) -> ContentRef {
        ContentRef {
            id: id.to_string(),
            number,
            title: title.to_string(),
        }
    }
}
