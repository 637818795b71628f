use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::record::{lenient, lenient_map, lenient_millis};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Suspended,
}

/// Pending email sign-in state. Stored on the record, never served.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailAuth {
    pub token: String,
    pub sent_at: i64,
    pub completed: bool,
}

/// A user record as stored in the users table. Timestamps are epoch millis.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userId")]
    pub id: String,
    pub email: String,
    pub status: UserStatus,
    #[serde(default, deserialize_with = "lenient_map")]
    pub preferences: Option<Map<String, Value>>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub last_login_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub email_auth: Option<EmailAuth>,
}
