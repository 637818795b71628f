use serde::{Deserialize, Serialize};

/// JWT payload issued by the sign-in service. Issuer and audience are
/// checked by the validator and not read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub exp: usize,  // expires at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>, // issued at (unix timestamp)
}
