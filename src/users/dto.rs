use serde::Serialize;
use serde_json::{Map, Value};

use super::repo::SearchPage;
use super::repo_types::{User, UserStatus};

pub const DEFAULT_PAGE_SIZE: i32 = 10;
pub const MAX_PAGE_SIZE: i32 = 50;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub status: UserStatus,
    pub preferences: Map<String, Value>,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_login_at: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            email: u.email,
            status: u.status,
            preferences: u.preferences.unwrap_or_default(),
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResult {
    pub user_id: String,
    pub email: String,
}

impl From<User> for UserSearchResult {
    fn from(u: User) -> Self {
        Self { user_id: u.id, email: u.email }
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page_size: i32,
    pub next_page_key: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct UserSearchResponse {
    pub users: Vec<UserSearchResult>,
    pub pagination: Pagination,
}

impl From<SearchPage> for UserSearchResponse {
    fn from(p: SearchPage) -> Self {
        Self {
            users: p.users.into_iter().map(UserSearchResult::from).collect(),
            pagination: Pagination {
                page_size: p.page_size,
                next_page_key: p.next_page_key,
                has_more: p.has_more,
            },
        }
    }
}

/// Raw query pairs in request order.
pub type QueryPairs = Vec<(String, String)>;

fn first_value(pairs: &QueryPairs, key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

/// Search parameters. Repeated keys keep their first value and bad values
/// never reject the request.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub page_size: Option<String>,
    pub page_key: Option<String>,
}

impl From<QueryPairs> for SearchParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            keyword: first_value(&pairs, "keyword"),
            page_size: first_value(&pairs, "page_size"),
            page_key: first_value(&pairs, "page_key"),
        }
    }
}

#[derive(Debug, Default)]
pub struct EmailLookupParams {
    pub email: Option<String>,
}

impl From<QueryPairs> for EmailLookupParams {
    fn from(pairs: QueryPairs) -> Self {
        Self { email: first_value(&pairs, "email") }
    }
}

/// Accepts 1..=50; anything else falls back to the default.
pub fn parse_page_size(raw: Option<&str>) -> i32 {
    raw.and_then(|s| s.parse::<i32>().ok())
        .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
