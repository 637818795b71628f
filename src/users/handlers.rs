use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{
    parse_page_size, EmailLookupParams, QueryPairs, SearchParams, UserResponse, UserSearchResponse,
    UserSearchResult,
};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(get_current_user))
        .route("/users/search", get(search_users))
        .route("/users/by-email", get(get_user_by_email))
}

/// GET /user
///
/// A caller whose record is missing gets a 500, not a 404: a valid token
/// without a user row is an internal inconsistency.
#[instrument(skip(state))]
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.get_by_id(&user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "failed to retrieve user data");
        ApiError::Internal("Failed to retrieve user data".into())
    })?;

    let Some(user) = user else {
        warn!(%user_id, "user not found");
        return Err(ApiError::Internal("User not found".into()));
    };

    Ok(Json(user.into()))
}

/// GET /users/search?keyword=&page_size=&page_key=
#[instrument(skip(state))]
pub async fn search_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<UserSearchResponse>, ApiError> {
    let Query(pairs) = query?;
    let params = SearchParams::from(pairs);
    let keyword = params
        .keyword
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::BadRequest("keyword parameter is required".into()))?;
    let page_size = parse_page_size(params.page_size.as_deref());
    let page_key = params.page_key.as_deref().filter(|k| !k.is_empty());

    let page = state
        .users
        .search(&keyword, page_size, page_key)
        .await
        .map_err(|e| {
            error!(error = %e, %keyword, "failed to search users");
            ApiError::Internal("Failed to search users".into())
        })?;

    Ok(Json(page.into()))
}

/// GET /users/by-email?email=
#[instrument(skip(state))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<UserSearchResult>, ApiError> {
    let Query(pairs) = query?;
    let params = EmailLookupParams::from(pairs);
    let email = params
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("email parameter is required".into()))?;

    let user = state.users.get_by_email(&email).await.map_err(|e| {
        error!(error = %e, %email, "failed to look up user by email");
        ApiError::Internal("Failed to retrieve user data".into())
    })?;

    user.map(|u| Json(UserSearchResult::from(u)))
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}
