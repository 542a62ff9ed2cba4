use crate::error::{Result, SyncError};
use crate::model::{ProjectLocator, TriageBucket};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".boardsync.yml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub board: BoardSettings,

    #[serde(default)]
    pub sources: SourceSettings,

    #[serde(default)]
    pub status: StatusSettings,

    #[serde(default)]
    pub api: ApiSettings,
}

/// Which board to sync into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Organization that owns the project board.
    #[serde(default)]
    pub org: String,

    /// Project number, as shown in the board URL.
    #[serde(default)]
    pub project: Option<u64>,

    /// Exact board title, used when no number is configured.
    #[serde(default)]
    pub project_title: Option<String>,
}

/// Where candidate issues and PRs are discovered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Issue label filter for repositories in the primary org.
    #[serde(default)]
    pub label: Option<String>,

    /// Organization holding subproject repositories.
    #[serde(default)]
    pub subproject_org: Option<String>,

    /// Repository topic identifying subproject repos. When unset, the
    /// subproject category is skipped entirely.
    #[serde(default)]
    pub subproject_topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSettings {
    #[serde(default = "default_needs_triage")]
    pub needs_triage: String,

    #[serde(default = "default_subprojects_needs_triage")]
    pub subprojects_needs_triage: String,
}

fn default_needs_triage() -> String {
    "Needs Triage".to_string()
}

fn default_subprojects_needs_triage() -> String {
    "Subprojects - Needs Triage".to_string()
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            needs_triage: default_needs_triage(),
            subprojects_needs_triage: default_subprojects_needs_triage(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Wall-clock budget for the whole run, in seconds.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_deadline_secs() -> u64 {
    300
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            graphql_url: default_graphql_url(),
            per_page: default_per_page(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

impl SyncConfig {
    /// Load the configuration by upward search from `start_path`.
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        Self::load_from(&config_path)
    }

    /// Load the configuration from an explicit file path.
    pub fn load_from(config_path: &Path) -> Result<(Self, PathBuf)> {
        let content = std::fs::read_to_string(config_path)?;
        let config: SyncConfig = serde_yaml::from_str(&content)?;
        Ok((config, config_path.to_path_buf()))
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(SyncError::NotInitialized);
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The board locator, preferring the project number over the title.
    pub fn locator(&self) -> Result<ProjectLocator> {
        if let Some(number) = self.board.project {
            return Ok(ProjectLocator::Number(number));
        }
        if let Some(ref title) = self.board.project_title {
            if !title.is_empty() {
                return Ok(ProjectLocator::Title(title.clone()));
            }
        }
        Err(SyncError::Config(
            "either board.project or board.project_title must be set".to_string(),
        ))
    }

    /// The target status label for a discovery category.
    pub fn status_label(&self, bucket: TriageBucket) -> &str {
        match bucket {
            TriageBucket::PrimaryOrg => &self.status.needs_triage,
            TriageBucket::Subproject => &self.status.subprojects_needs_triage,
        }
    }

    /// Categories this run will process, in order.
    pub fn buckets(&self) -> Vec<TriageBucket> {
        let mut buckets = vec![TriageBucket::PrimaryOrg];
        if self.sources.subproject_topic.is_some() {
            buckets.push(TriageBucket::Subproject);
        }
        buckets
    }

    pub fn validate(&self) -> Result<()> {
        if self.board.org.is_empty() {
            return Err(SyncError::Config("board.org must be set".to_string()));
        }
        self.locator()?;
        if self.sources.subproject_topic.is_some()
            && self.sources.subproject_org.is_none()
        {
            return Err(SyncError::Config(
                "sources.subproject_org must be set when sources.subproject_topic is".to_string(),
            ));
        }
        Ok(())
    }
}
