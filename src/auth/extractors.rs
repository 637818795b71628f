use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::warn;

use super::claims::Claims;
use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Extracts and validates the bearer JWT, yielding the caller's user ID.
#[derive(Debug)]
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(ApiError::invalid_token)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(ApiError::invalid_token)?;

        let claims = verify(token.trim(), &state.config.jwt).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            ApiError::invalid_token()
        })?;

        if claims.sub.is_empty() {
            warn!("token has an empty subject");
            return Err(ApiError::invalid_token());
        }
        Ok(AuthUser(claims.sub))
    }
}

fn verify(token: &str, cfg: &JwtConfig) -> jsonwebtoken::errors::Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &cfg.audience {
        Some(aud) => validation.set_audience(std::slice::from_ref(aud)),
        None => validation.validate_aud = false,
    }
    if let Some(iss) = &cfg.issuer {
        validation.set_issuer(std::slice::from_ref(iss));
    }
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());
    Ok(decode::<Claims>(token, &decoding, &validation)?.claims)
}

/// Signs an access token the way the sign-in service does.
#[cfg(test)]
pub(crate) fn mint_token(cfg: &JwtConfig, user_id: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use time::OffsetDateTime;

    #[derive(Serialize)]
    struct Signed<'a> {
        #[serde(flatten)]
        claims: &'a Claims,
        #[serde(skip_serializing_if = "Option::is_none")]
        iss: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        aud: Option<&'a str>,
    }

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl_secs).max(0) as usize,
        iat: Some(now as usize),
    };
    let signed = Signed {
        claims: &claims,
        iss: cfg.issuer.as_deref(),
        aud: cfg.audience.as_deref(),
    };
    encode(
        &Header::default(),
        &signed,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .expect("sign test token")
}
