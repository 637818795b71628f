use crate::config::AppConfig;
use crate::storage::{DynamoStore, KvStore};
use crate::users::repo::UserRepo;
use anyhow::Context;
use std::sync::Arc;

/// Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserRepo,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = Arc::new(
            DynamoStore::new(&config.store)
                .await
                .context("initialize dynamodb client")?,
        ) as Arc<dyn KvStore>;

        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn KvStore>) -> Self {
        Self {
            config,
            users: UserRepo::new(store),
        }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn KvStore>) -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            service_name: "prunk".into(),
            store: crate::config::StoreConfig {
                region: Some("us-east-1".into()),
                users_table: "PrunkUsers".into(),
                endpoint: None,
            },
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: Some("test".into()),
                audience: Some("test".into()),
            },
        });
        Self::from_parts(config, store)
    }
}
