use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Falls back to the SDK default chain when unset.
    pub region: Option<String>,
    pub users_table: String,
    /// Local DynamoDB endpoint; switches to static local credentials.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub store: StoreConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let store = StoreConfig {
            region: non_empty_var("AWS_REGION"),
            users_table: std::env::var("USERS_TABLE").unwrap_or_else(|_| "PrunkUsers".into()),
            endpoint: non_empty_var("DYNAMODB_ENDPOINT"),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: non_empty_var("JWT_ISSUER"),
            audience: non_empty_var("JWT_AUDIENCE"),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            service_name: std::env::var("SERVICE_NAME").unwrap_or_else(|_| "prunk".into()),
            store,
            jwt,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
