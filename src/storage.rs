use std::collections::HashMap;

use axum::async_trait;
use aws_config::{defaults, BehaviorVersion, SdkConfig};
use aws_credential_types::{provider::ProvideCredentials, Credentials};
use aws_sdk_dynamodb::{config::Region, error::DisplayErrorContext, types::AttributeValue, Client};
use tracing::debug;

use crate::config::StoreConfig;

#[cfg(test)]
pub mod memory;
pub mod record;

/// One raw record as the store returns it.
pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store configuration error: {0}")]
    Configuration(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result of a single scan call. `last_evaluated_key` is set whenever the
/// store stopped early and the scan can be resumed from it.
#[derive(Debug, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<String>,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Point query on the table's partition key.
    async fn query(&self, key_attr: &str, key_value: &str) -> Result<Vec<Item>, StoreError>;

    async fn query_index(
        &self,
        index: &str,
        key_attr: &str,
        key_value: &str,
        limit: i32,
    ) -> Result<Vec<Item>, StoreError>;

    /// Scan up to `limit` rows after `exclusive_start`, keeping those whose
    /// `attr` contains `needle`. The limit counts examined rows, not matches.
    async fn scan_contains(
        &self,
        attr: &str,
        needle: &str,
        limit: i32,
        exclusive_start: Option<&str>,
    ) -> Result<ScanPage, StoreError>;
}

pub const PARTITION_KEY: &str = "userId";

#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub async fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut loader = defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader
                .endpoint_url(endpoint)
                .credentials_provider(Credentials::new("local", "local", None, None, "static"));
        }
        let shared = loader.load().await;
        check_resolvable(&shared).await?;

        debug!(table = %config.users_table, region = ?shared.region(), "dynamodb client ready");
        Ok(Self {
            client: Client::new(&shared),
            table: config.users_table.clone(),
        })
    }
}

/// Fails fast when the region is missing or no credentials can be loaded;
/// the default provider chain otherwise defers that to the first request.
async fn check_resolvable(shared: &SdkConfig) -> Result<(), StoreError> {
    if shared.region().is_none() {
        return Err(StoreError::Configuration(
            "no region configured; set AWS_REGION".into(),
        ));
    }
    let provider = shared
        .credentials_provider()
        .ok_or_else(|| StoreError::Configuration("no credentials provider configured".into()))?;
    provider.provide_credentials().await.map_err(|e| {
        StoreError::Configuration(format!("resolve credentials: {}", DisplayErrorContext(e)))
    })?;
    Ok(())
}

fn unavailable<E: std::error::Error>(op: &str, e: E) -> StoreError {
    StoreError::Unavailable(format!("{op}: {}", DisplayErrorContext(e)))
}

#[async_trait]
impl KvStore for DynamoStore {
    async fn query(&self, key_attr: &str, key_value: &str) -> Result<Vec<Item>, StoreError> {
        let out = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("#k = :v")
            .expression_attribute_names("#k", key_attr)
            .expression_attribute_values(":v", AttributeValue::S(key_value.to_string()))
            .send()
            .await
            .map_err(|e| unavailable("dynamodb query", e))?;
        Ok(out.items.unwrap_or_default())
    }

    async fn query_index(
        &self,
        index: &str,
        key_attr: &str,
        key_value: &str,
        limit: i32,
    ) -> Result<Vec<Item>, StoreError> {
        let out = self
            .client
            .query()
            .table_name(&self.table)
            .index_name(index)
            .key_condition_expression("#k = :v")
            .expression_attribute_names("#k", key_attr)
            .expression_attribute_values(":v", AttributeValue::S(key_value.to_string()))
            .limit(limit)
            .send()
            .await
            .map_err(|e| unavailable("dynamodb index query", e))?;
        Ok(out.items.unwrap_or_default())
    }

    async fn scan_contains(
        &self,
        attr: &str,
        needle: &str,
        limit: i32,
        exclusive_start: Option<&str>,
    ) -> Result<ScanPage, StoreError> {
        let mut req = self
            .client
            .scan()
            .table_name(&self.table)
            .filter_expression("contains(#a, :n)")
            .expression_attribute_names("#a", attr)
            .expression_attribute_values(":n", AttributeValue::S(needle.to_string()))
            .limit(limit);
        if let Some(start) = exclusive_start {
            req = req.exclusive_start_key(PARTITION_KEY, AttributeValue::S(start.to_string()));
        }
        let out = req
            .send()
            .await
            .map_err(|e| unavailable("dynamodb scan", e))?;

        let last_evaluated_key = out
            .last_evaluated_key
            .as_ref()
            .and_then(|k| k.get(PARTITION_KEY))
            .and_then(|v| v.as_s().ok())
            .cloned();
        Ok(ScanPage {
            items: out.items.unwrap_or_default(),
            last_evaluated_key,
        })
    }
}
