//! In-process stand-ins for the key-value store, used by unit and HTTP tests.

use std::collections::BTreeMap;

use axum::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::sync::RwLock;

use super::{Item, KvStore, ScanPage, StoreError, PARTITION_KEY};

/// Rows ordered by partition key. Scans examine `limit` rows first and filter
/// afterwards, and report a continuation key only when rows remain.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, item: Item) {
        let key = item
            .get(PARTITION_KEY)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .unwrap_or_default();
        self.rows.write().await.insert(key, item);
    }

    pub async fn with_users(users: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (id, email) in users {
            store.insert(user_item(id, email)).await;
        }
        store
    }
}

/// Minimal well-formed user record.
pub fn user_item(id: &str, email: &str) -> Item {
    Item::from([
        (PARTITION_KEY.to_string(), AttributeValue::S(id.into())),
        ("email".to_string(), AttributeValue::S(email.into())),
        ("status".to_string(), AttributeValue::S("ACTIVE".into())),
        ("createdAt".to_string(), AttributeValue::N("1700000000000".into())),
        ("updatedAt".to_string(), AttributeValue::N("1700000005000".into())),
    ])
}

fn attr_contains(item: &Item, attr: &str, needle: &str) -> bool {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .is_some_and(|s| s.contains(needle))
}

fn attr_equals(item: &Item, attr: &str, value: &str) -> bool {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .is_some_and(|s| s == value)
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn query(&self, key_attr: &str, key_value: &str) -> Result<Vec<Item>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|item| attr_equals(item, key_attr, key_value))
            .cloned()
            .collect())
    }

    async fn query_index(
        &self,
        _index: &str,
        key_attr: &str,
        key_value: &str,
        limit: i32,
    ) -> Result<Vec<Item>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|item| attr_equals(item, key_attr, key_value))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn scan_contains(
        &self,
        attr: &str,
        needle: &str,
        limit: i32,
        exclusive_start: Option<&str>,
    ) -> Result<ScanPage, StoreError> {
        let rows = self.rows.read().await;
        let mut remaining = rows
            .iter()
            .filter(|(key, _)| exclusive_start.map_or(true, |start| key.as_str() > start));

        let mut examined: Vec<(&String, &Item)> = Vec::new();
        for row in remaining.by_ref().take(limit.max(0) as usize) {
            examined.push(row);
        }
        let last_evaluated_key = match (remaining.next(), examined.last()) {
            (Some(_), Some((key, _))) => Some((*key).clone()),
            _ => None,
        };

        Ok(ScanPage {
            items: examined
                .into_iter()
                .filter(|(_, item)| attr_contains(item, attr, needle))
                .map(|(_, item)| item.clone())
                .collect(),
            last_evaluated_key,
        })
    }
}

/// Fails every call the way an unreachable store would.
pub struct FailingStore;

#[async_trait]
impl KvStore for FailingStore {
    async fn query(&self, _key_attr: &str, _key_value: &str) -> Result<Vec<Item>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn query_index(
        &self,
        _index: &str,
        _key_attr: &str,
        _key_value: &str,
        _limit: i32,
    ) -> Result<Vec<Item>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn scan_contains(
        &self,
        _attr: &str,
        _needle: &str,
        _limit: i32,
        _exclusive_start: Option<&str>,
    ) -> Result<ScanPage, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Scans that read zero rows yet report a continuation key.
pub struct TruncatedScanStore {
    pub next_key: String,
}

#[async_trait]
impl KvStore for TruncatedScanStore {
    async fn query(&self, _key_attr: &str, _key_value: &str) -> Result<Vec<Item>, StoreError> {
        Ok(Vec::new())
    }

    async fn query_index(
        &self,
        _index: &str,
        _key_attr: &str,
        _key_value: &str,
        _limit: i32,
    ) -> Result<Vec<Item>, StoreError> {
        Ok(Vec::new())
    }

    async fn scan_contains(
        &self,
        _attr: &str,
        _needle: &str,
        _limit: i32,
        _exclusive_start: Option<&str>,
    ) -> Result<ScanPage, StoreError> {
        Ok(ScanPage {
            items: Vec::new(),
            last_evaluated_key: Some(self.next_key.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scan_limits_before_filtering() {
        let store = MemoryStore::with_users(&[
            ("u1", "jane@x.com"),
            ("u2", "john@x.com"),
            ("u3", "johnny@x.com"),
        ])
        .await;

        let page = store.scan_contains("email", "john", 1, None).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.last_evaluated_key.as_deref(), Some("u1"));

        let page = store.scan_contains("email", "john", 2, Some("u1")).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.last_evaluated_key, None);
    }
}
