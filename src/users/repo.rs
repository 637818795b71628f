use std::sync::Arc;

use tracing::{debug, warn};

use super::repo_types::User;
use crate::storage::{
    record::{from_item, RecordError},
    Item, KvStore, StoreError, PARTITION_KEY,
};

const EMAIL_ATTR: &str = "email";
const EMAIL_INDEX: &str = "email-index";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
    #[error("malformed user record: {0}")]
    MalformedRecord(#[from] RecordError),
}

/// One scan-backed page of search results.
#[derive(Debug)]
pub struct SearchPage {
    pub users: Vec<User>,
    pub next_page_key: Option<String>,
    pub has_more: bool,
    pub page_size: i32,
}

#[derive(Clone)]
pub struct UserRepo {
    store: Arc<dyn KvStore>,
}

impl UserRepo {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        let items = self.store.query(PARTITION_KEY, id).await?;
        first_user(items)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let items = self
            .store
            .query_index(EMAIL_INDEX, EMAIL_ATTR, email, 1)
            .await?;
        first_user(items)
    }

    /// Case-sensitive substring match on email. `page_size` bounds the rows
    /// the store examines, so a page can hold fewer matches (even none) while
    /// `has_more` is still true.
    pub async fn search(
        &self,
        keyword: &str,
        page_size: i32,
        page_key: Option<&str>,
    ) -> Result<SearchPage, RepoError> {
        let page = self
            .store
            .scan_contains(EMAIL_ATTR, keyword, page_size, page_key)
            .await?;

        let users = page
            .items
            .iter()
            .map(from_item::<User>)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(keyword, matched = users.len(), next = ?page.last_evaluated_key, "user scan page");

        Ok(SearchPage {
            users,
            has_more: page.last_evaluated_key.is_some(),
            next_page_key: page.last_evaluated_key,
            page_size,
        })
    }
}

fn first_user(items: Vec<Item>) -> Result<Option<User>, RepoError> {
    let Some(item) = items.first() else {
        return Ok(None);
    };
    if items.len() > 1 {
        warn!(count = items.len(), "more than one user record for key; using the first");
    }
    Ok(Some(from_item(item)?))
}
