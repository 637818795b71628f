use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::record::lenient_map;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Active,
    Suspended,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "lenient_map")]
    pub preferences: Option<Map<String, Value>>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectUserPermission {
    FullAccess,
}

/// Membership of a user in a project.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUser {
    pub project_id: String,
    pub user_id: String,
    pub is_owner: bool,
    #[serde(default)]
    pub permissions: Vec<ProjectUserPermission>,
    pub created_at: i64,
    pub updated_at: i64,
}
