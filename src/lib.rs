//! # Boardsync - one-shot triage sync for GitHub Projects boards
//!
//! Boardsync scans a set of source repositories for issues and pull requests
//! and reconciles them onto a GitHub Projects (v2) board: every discovered
//! item is added exactly once, and items that nobody has triaged yet get an
//! initial "needs triage" status. A status a human has already set is never
//! overwritten.
//!
//! It is a batch job, not a service: it runs to completion, prints progress,
//! and exits. Any failure aborts the run; because the add/status-write
//! sequence is idempotent, re-running after a failure is always safe.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a starter config
//! boardsync init --org my-org --project 116
//!
//! # See what would change
//! GITHUB_TOKEN=... boardsync sync --dry-run
//!
//! # Run the sync
//! GITHUB_TOKEN=... boardsync sync
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`gateway`]: Trait seams for the board API and item discovery
//! - [`github`]: GitHub REST/GraphQL implementation of the seams
//! - [`model`]: Data model (projects, status fields, board items)
//! - [`reconcile`]: Idempotent add + conditional status write
//! - [`schema`]: Board and status-option resolution
//! - [`sync`]: The batch run orchestrator

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.boardsync.yml` configuration files and upward discovery.
pub mod config;

/// Error types and result aliases.
///
/// Defines the `SyncError` enum and `Result<T>` type alias.
pub mod error;

/// Trait seams consumed by the core.
///
/// `BoardGateway` covers board reads and mutations, `ItemSource` covers
/// repository and item discovery.
pub mod gateway;

/// GitHub-backed implementations of the gateway and source traits.
pub mod github;

/// Data model: projects, status fields, board items, triage buckets.
pub mod model;

/// The item reconciler: idempotent add plus conditional status write.
pub mod reconcile;

/// Project schema resolution: board lookup and status-option lookup.
pub mod schema;

/// The sync orchestrator and run deadline.
pub mod sync;

pub mod logging;
