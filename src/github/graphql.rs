//! GraphQL documents and response parsing for the Projects (v2) API.
//!
//! Identifiers coming back from the API (project, item, field, option ids)
//! are opaque tokens; they are stored and passed through unchanged.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::model::{BoardItem, Project, StatusField, StatusOption};

/// Fetch a board by number, including the Status field's option set.
pub const PROJECT_BY_NUMBER: &str = r#"
query($org: String!, $number: Int!) {
  organization(login: $org) {
    projectV2(number: $number) {
      id
      title
      field(name: "Status") {
        ... on ProjectV2SingleSelectField {
          id
          options { id name }
        }
      }
    }
  }
}"#;

/// One page of an organization's boards, for lookup by title.
pub const PROJECTS_PAGE: &str = r#"
query($org: String!, $cursor: String) {
  organization(login: $org) {
    projectsV2(first: 100, after: $cursor) {
      nodes { number title }
      pageInfo { hasNextPage endCursor }
    }
  }
}"#;

/// Attach a content object to a board. Idempotent: an already-present item
/// is returned rather than duplicated. The item's current Status value is
/// requested here so no second query is needed before the conditional write.
pub const ADD_ITEM: &str = r#"
mutation($project: ID!, $content: ID!) {
  addProjectV2ItemById(input: {projectId: $project, contentId: $content}) {
    item {
      id
      fieldValueByName(name: "Status") {
        ... on ProjectV2ItemFieldSingleSelectValue { name }
      }
    }
  }
}"#;

/// Write a single-select option into an item's Status field.
pub const UPDATE_STATUS: &str = r#"
mutation($project: ID!, $item: ID!, $field: ID!, $option: String!) {
  updateProjectV2ItemFieldValue(
    input: {projectId: $project, itemId: $item, fieldId: $field, value: {singleSelectOptionId: $option}}
  ) {
    projectV2Item { id }
  }
}"#;

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// GraphQL reports errors in-band with HTTP 200; surface them as API errors.
pub fn unwrap_data(envelope: Envelope) -> Result<Value> {
    if let Some(errors) = envelope.errors {
        if !errors.is_empty() {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(SyncError::Api(messages.join("; ")));
        }
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}

#[derive(Deserialize)]
struct ProjectData {
    organization: Option<ProjectOrg>,
}

#[derive(Deserialize)]
struct ProjectOrg {
    #[serde(rename = "projectV2")]
    project: Option<ProjectNode>,
}

#[derive(Deserialize)]
struct ProjectNode {
    id: String,
    title: String,
    field: Option<FieldNode>,
}

#[derive(Deserialize)]
struct FieldNode {
    // Absent when the field exists but is not single-select.
    id: Option<String>,
    #[serde(default)]
    options: Vec<OptionNode>,
}

#[derive(Deserialize)]
struct OptionNode {
    id: String,
    name: String,
}

pub fn parse_project(data: Value, org: &str, locator: &str) -> Result<Project> {
    let parsed: ProjectData = serde_json::from_value(data)?;
    let node = parsed
        .organization
        .and_then(|o| o.project)
        .ok_or_else(|| SyncError::NotFound(format!("project {} in org {}", locator, org)))?;
    let field = node
        .field
        .and_then(|f| {
            f.id.map(|id| StatusField {
                id,
                options: f
                    .options
                    .into_iter()
                    .map(|o| StatusOption {
                        id: o.id,
                        label: o.name,
                    })
                    .collect(),
            })
        })
        .ok_or_else(|| {
            SyncError::NotFound(format!(
                "single-select Status field on project {:?}",
                node.title
            ))
        })?;
    Ok(Project {
        id: node.id,
        title: node.title,
        status_field: field,
    })
}

#[derive(Deserialize)]
struct ProjectsPageData {
    organization: Option<ProjectsPageOrg>,
}

#[derive(Deserialize)]
struct ProjectsPageOrg {
    #[serde(rename = "projectsV2")]
    projects: ProjectsConnection,
}

#[derive(Deserialize)]
struct ProjectsConnection {
    nodes: Vec<ProjectStub>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
}

#[derive(Deserialize)]
pub struct ProjectStub {
    pub number: u64,
    pub title: String,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

/// Returns the page's project stubs plus the cursor for the next page, if any.
pub fn parse_projects_page(data: Value, org: &str) -> Result<(Vec<ProjectStub>, Option<String>)> {
    let parsed: ProjectsPageData = serde_json::from_value(data)?;
    let connection = parsed
        .organization
        .ok_or_else(|| SyncError::NotFound(format!("organization {}", org)))?
        .projects;
    let cursor = if connection.page_info.has_next_page {
        connection.page_info.end_cursor
    } else {
        None
    };
    Ok((connection.nodes, cursor))
}

#[derive(Deserialize)]
struct AddItemData {
    #[serde(rename = "addProjectV2ItemById")]
    add: AddItemPayload,
}

#[derive(Deserialize)]
struct AddItemPayload {
    item: AddedItem,
}

#[derive(Deserialize)]
struct AddedItem {
    id: String,
    #[serde(rename = "fieldValueByName")]
    field_value: Option<FieldValue>,
}

#[derive(Deserialize)]
struct FieldValue {
    name: Option<String>,
}

pub fn parse_added_item(data: Value) -> Result<BoardItem> {
    let parsed: AddItemData = serde_json::from_value(data)?;
    Ok(BoardItem {
        id: parsed.add.item.id,
        status: parsed.add.item.field_value.and_then(|v| v.name),
    })
}
