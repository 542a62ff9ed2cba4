use std::time::{Duration, Instant};

use colored::Colorize;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::gateway::{BoardGateway, ItemSource};
use crate::model::{SyncSummary, TriageBucket};
use crate::reconcile::{Outcome, Reconciler};
use crate::schema::{self, StatusTarget};

/// Wall-clock budget for the whole run. Checked before every API round-trip;
/// there is no per-item timeout.
pub struct Deadline {
    end: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            end: Instant::now() + budget,
        }
    }

    pub fn check(&self) -> Result<()> {
        if Instant::now() >= self.end {
            return Err(SyncError::Timeout);
        }
        Ok(())
    }
}

/// Drives the whole batch run: schema resolution once at startup, then one
/// category at a time, one repository at a time, one item at a time. The
/// first reconciliation error aborts the run; a partially-synced board is
/// safe to re-run against because the add/write sequence is idempotent.
pub struct SyncRunner<'a, G: BoardGateway, S: ItemSource> {
    gateway: &'a G,
    source: &'a S,
    config: &'a SyncConfig,
    dry_run: bool,
}

impl<'a, G: BoardGateway, S: ItemSource> SyncRunner<'a, G, S> {
    pub fn new(gateway: &'a G, source: &'a S, config: &'a SyncConfig, dry_run: bool) -> Self {
        Self {
            gateway,
            source,
            config,
            dry_run,
        }
    }

    pub fn run(&self) -> Result<SyncSummary> {
        let deadline = Deadline::after(Duration::from_secs(self.config.api.deadline_secs));
        let mut summary = SyncSummary::default();

        deadline.check()?;
        let project = schema::resolve_project(
            self.gateway,
            &self.config.board.org,
            &self.config.locator()?,
        )?;
        info!(project = %project.title, "syncing into project board");

        // Resolve every bucket's target up front so a misconfigured label
        // fails the run before any mutation is issued.
        let targets: Vec<(TriageBucket, StatusTarget)> = self
            .config
            .buckets()
            .into_iter()
            .map(|bucket| {
                schema::resolve_status_option(&project, self.config.status_label(bucket))
                    .map(|target| (bucket, target))
            })
            .collect::<Result<_>>()?;

        let reconciler = Reconciler::new(self.gateway);

        for (bucket, target) in &targets {
            deadline.check()?;
            let repos = self.source.repositories(*bucket)?;

            for repo in &repos {
                summary.repos += 1;
                println!("Looking for issues and PRs in {}", repo.cyan());

                deadline.check()?;
                let items = self.source.items(*bucket, repo)?;
                println!("found {} in repo {}", items.len(), repo.cyan());

                for item in &items {
                    summary.items += 1;
                    println!("adding [{}] {:?} to project", item.number, item.title);

                    if self.dry_run {
                        summary.planned += 1;
                        continue;
                    }

                    deadline.check()?;
                    match reconciler.reconcile(&project, item, target)? {
                        Outcome::Written => {
                            summary.written += 1;
                            println!(
                                "updating status field for [{}] {:?}",
                                item.number, item.title
                            );
                        }
                        Outcome::AlreadySet => {
                            summary.already_set += 1;
                            println!(
                                "status field already set for [{}] {:?}",
                                item.number, item.title
                            );
                        }
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{MockGateway, MockSource, content};

    fn config() -> SyncConfig {
        let mut config = SyncConfig::default();
        config.board.org = "acme".to_string();
        config.board.project = Some(116);
        config.sources.label = Some("triage/me".to_string());
        config.sources.subproject_org = Some("acme-contrib".to_string());
        config.sources.subproject_topic = Some("acme-subproject".to_string());
        config
    }

    fn gateway() -> MockGateway {
        MockGateway::new(MockGateway::project_with_options(&[
            ("Needs Triage", "A"),
            ("Subprojects - Needs Triage", "B"),
            ("In Progress", "C"),
        ]))
    }

    #[test]
    fn test_end_to_end_two_passes() {
        let config = config();
        let gateway = gateway();
        let source = MockSource::new().with_repo(
            TriageBucket::PrimaryOrg,
            "acme/widget",
            vec![content("I_1", 42, "fix bug")],
        );

        let runner = SyncRunner::new(&gateway, &source, &config, false);
        let summary = runner.run().unwrap();
        assert_eq!(summary.items, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.already_set, 0);

        // Second run over the same discovery set: same board item, no
        // further writes.
        let summary = runner.run().unwrap();
        assert_eq!(summary.written, 0);
        assert_eq!(summary.already_set, 1);
        assert_eq!(gateway.board.borrow().len(), 1);
        assert_eq!(gateway.writes.borrow().len(), 1);
    }

    #[test]
    fn test_category_to_bucket_mapping() {
        let config = config();
        let gateway = gateway();
        let source = MockSource::new()
            .with_repo(
                TriageBucket::PrimaryOrg,
                "acme/widget",
                vec![content("I_1", 1, "primary item")],
            )
            .with_repo(
                TriageBucket::Subproject,
                "acme-contrib/gadget",
                vec![content("I_2", 2, "subproject item")],
            );

        SyncRunner::new(&gateway, &source, &config, false)
            .run()
            .unwrap();

        let writes = gateway.writes.borrow();
        assert_eq!(writes.len(), 2);
        // Primary org items land in option A, subproject items in option B.
        assert_eq!(writes[0].1, "A");
        assert_eq!(writes[1].1, "B");
    }

    #[test]
    fn test_fail_fast_stops_remaining_items() {
        let config = config();
        let gateway = gateway();
        *gateway.fail_add_for.borrow_mut() = Some("I_3".to_string());
        let source = MockSource::new().with_repo(
            TriageBucket::PrimaryOrg,
            "acme/widget",
            vec![
                content("I_1", 1, "one"),
                content("I_2", 2, "two"),
                content("I_3", 3, "three"),
                content("I_4", 4, "four"),
                content("I_5", 5, "five"),
            ],
        );

        let err = SyncRunner::new(&gateway, &source, &config, false)
            .run()
            .unwrap_err();

        assert!(matches!(err, SyncError::AddFailed(_)));
        // Items 4 and 5 were never processed.
        assert_eq!(gateway.writes.borrow().len(), 2);
        assert!(!gateway.board.borrow().contains_key("I_4"));
        assert!(!gateway.board.borrow().contains_key("I_5"));
    }

    #[test]
    fn test_missing_status_label_fails_before_any_mutation() {
        let mut config = config();
        config.status.subprojects_needs_triage = "No Such Column".to_string();
        let gateway = gateway();
        let source = MockSource::new().with_repo(
            TriageBucket::PrimaryOrg,
            "acme/widget",
            vec![content("I_1", 1, "one")],
        );

        let err = SyncRunner::new(&gateway, &source, &config, false)
            .run()
            .unwrap_err();

        assert!(matches!(err, SyncError::NotFound(_)));
        assert!(gateway.board.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_issues_no_mutations() {
        let config = config();
        let gateway = gateway();
        let source = MockSource::new().with_repo(
            TriageBucket::PrimaryOrg,
            "acme/widget",
            vec![content("I_1", 42, "fix bug")],
        );

        let summary = SyncRunner::new(&gateway, &source, &config, true)
            .run()
            .unwrap();

        assert_eq!(summary.planned, 1);
        assert_eq!(summary.written, 0);
        assert!(gateway.board.borrow().is_empty());
        assert!(gateway.writes.borrow().is_empty());
    }

    #[test]
    fn test_expired_deadline_aborts() {
        let mut config = config();
        config.api.deadline_secs = 0;
        let gateway = gateway();
        let source = MockSource::new();

        let err = SyncRunner::new(&gateway, &source, &config, false)
            .run()
            .unwrap_err();
        assert!(matches!(err, SyncError::Timeout));
    }

    #[test]
    fn test_deadline_check() {
        let live = Deadline::after(Duration::from_secs(60));
        assert!(live.check().is_ok());

        let expired = Deadline::after(Duration::ZERO);
        assert!(matches!(expired.check(), Err(SyncError::Timeout)));
    }
}
