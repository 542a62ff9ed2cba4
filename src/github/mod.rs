//! GitHub-backed implementations of the gateway and source traits.
//!
//! Discovery goes through the REST API (repository and issue listing, topic
//! search), board reads and mutations through the GraphQL API.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::gateway::{BoardGateway, ItemSource};
use crate::model::{BoardItem, ContentRef, Project, ProjectLocator, TriageBucket};

pub mod graphql;

pub struct GithubClient {
    http: Client,
    config: SyncConfig,
}

impl GithubClient {
    pub fn new(token: &str, config: &SyncConfig) -> Result<Self> {
        // reqwest is built without a default TLS provider; install ring.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| SyncError::Config("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(concat!("boardsync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            // No single call may outlive the run budget.
            .timeout(Duration::from_secs(config.api.deadline_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn per_page(&self) -> u32 {
        self.config.api.per_page
    }

    fn rest_get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = Url::parse(&format!(
            "{}/{}",
            self.config.api.url.trim_end_matches('/'),
            path
        ))
        .map_err(|e| SyncError::Config(format!("invalid api url: {}", e)))?;
        debug!(%url, "GET");
        let resp = self.http.get(url).query(query).send()?;
        let resp = check_status(resp)?;
        Ok(resp.json()?)
    }

    fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let resp = self
            .http
            .post(self.config.api.graphql_url.as_str())
            .json(&json!({"query": query, "variables": variables}))
            .send()?;
        let resp = check_status(resp)?;
        let envelope: graphql::Envelope = resp.json()?;
        graphql::unwrap_data(envelope)
    }

    fn list_org_repos(&self, org: &str) -> Result<Vec<String>> {
        let mut repos = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<RepoRec> = self.rest_get(
                &format!("orgs/{}/repos", org),
                &[
                    ("per_page", self.per_page().to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            let len = batch.len() as u32;
            repos.extend(batch.into_iter().map(|r| r.full_name));
            if len < self.per_page() {
                break;
            }
            page += 1;
        }
        Ok(repos)
    }

    fn search_repos_by_topic(&self, topic: &str, org: &str) -> Result<Vec<String>> {
        let mut repos = Vec::new();
        let mut page = 1u32;
        loop {
            let result: SearchResult = self.rest_get(
                "search/repositories",
                &[
                    ("q", format!("topic:{} org:{}", topic, org)),
                    ("per_page", self.per_page().to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            let len = result.items.len() as u32;
            repos.extend(result.items.into_iter().map(|r| r.full_name));
            if len < self.per_page() {
                break;
            }
            page += 1;
        }
        Ok(repos)
    }

    // The REST issues listing returns pull requests as well; both are
    // candidates for the board.
    fn list_issues(&self, repo: &str, label: Option<&str>) -> Result<Vec<ContentRef>> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut query = vec![
                ("per_page", self.per_page().to_string()),
                ("page", page.to_string()),
            ];
            if let Some(label) = label {
                query.push(("labels", label.to_string()));
            }
            let batch: Vec<IssueRec> =
                self.rest_get(&format!("repos/{}/issues", repo), &query)?;
            let len = batch.len() as u32;
            for issue in batch {
                match issue.node_id {
                    Some(id) => items.push(ContentRef {
                        id,
                        number: issue.number,
                        title: issue.title,
                    }),
                    None => warn!(repo, number = issue.number, "skipping item without content id"),
                }
            }
            if len < self.per_page() {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    fn find_project_number(&self, org: &str, title: &str) -> Result<u64> {
        let mut cursor: Option<String> = None;
        loop {
            let data = self.graphql(
                graphql::PROJECTS_PAGE,
                json!({"org": org, "cursor": cursor}),
            )?;
            let (stubs, next) = graphql::parse_projects_page(data, org)?;
            if let Some(stub) = stubs.into_iter().find(|s| s.title == title) {
                return Ok(stub.number);
            }
            match next {
                Some(c) => cursor = Some(c),
                None => {
                    return Err(SyncError::NotFound(format!(
                        "project titled {:?} in org {}",
                        title, org
                    )));
                }
            }
        }
    }
}

impl BoardGateway for GithubClient {
    fn fetch_project(&self, org: &str, locator: &ProjectLocator) -> Result<Project> {
        let number = match locator {
            ProjectLocator::Number(n) => *n,
            ProjectLocator::Title(title) => self.find_project_number(org, title)?,
        };
        let data = self.graphql(
            graphql::PROJECT_BY_NUMBER,
            json!({"org": org, "number": number}),
        )?;
        graphql::parse_project(data, org, &locator.to_string())
    }

    fn add_item(&self, project_id: &str, content_id: &str) -> Result<BoardItem> {
        let data = self.graphql(
            graphql::ADD_ITEM,
            json!({"project": project_id, "content": content_id}),
        )?;
        graphql::parse_added_item(data)
    }

    fn set_status(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<()> {
        self.graphql(
            graphql::UPDATE_STATUS,
            json!({
                "project": project_id,
                "item": item_id,
                "field": field_id,
                "option": option_id,
            }),
        )?;
        Ok(())
    }
}

impl ItemSource for GithubClient {
    fn repositories(&self, bucket: TriageBucket) -> Result<Vec<String>> {
        match bucket {
            TriageBucket::PrimaryOrg => self.list_org_repos(&self.config.board.org),
            TriageBucket::Subproject => {
                let org = self
                    .config
                    .sources
                    .subproject_org
                    .as_deref()
                    .ok_or_else(|| {
                        SyncError::Config("sources.subproject_org is not set".to_string())
                    })?;
                let topic = self
                    .config
                    .sources
                    .subproject_topic
                    .as_deref()
                    .ok_or_else(|| {
                        SyncError::Config("sources.subproject_topic is not set".to_string())
                    })?;
                self.search_repos_by_topic(topic, org)
            }
        }
    }

    fn items(&self, bucket: TriageBucket, repo: &str) -> Result<Vec<ContentRef>> {
        let label = match bucket {
            TriageBucket::PrimaryOrg => self.config.sources.label.as_deref(),
            TriageBucket::Subproject => None,
        };
        self.list_issues(repo, label)
    }
}

#[derive(Deserialize)]
struct RepoRec {
    full_name: String,
}

#[derive(Deserialize)]
struct SearchResult {
    items: Vec<RepoRec>,
}

#[derive(Deserialize)]
struct IssueRec {
    node_id: Option<String>,
    number: u64,
    title: String,
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(SyncError::Api(
            "authentication failed (HTTP 401), check the token and its scopes".to_string(),
        ));
    }
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = resp
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        return Err(SyncError::Api(format!(
            "request refused (HTTP {}), retry-after: {}",
            status, retry_after
        )));
    }
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        let body: String = body.trim().chars().take(200).collect();
        return Err(SyncError::Api(format!("HTTP {}: {}", status, body)));
    }
    Ok(resp)
}
