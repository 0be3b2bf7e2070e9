//! Keyed, revalidate-on-demand query cache.
//!
//! One [`Cached`] slot holds the latest response for one key (a week range, a
//! project id). Reads are served from the slot until it is invalidated or the
//! key changes; `mutate` applies optimistic local edits without a fetch.
//!
//! Revalidations are not stamped with a generation: a slow fetch that
//! resolves after a newer optimistic edit overwrites that edit.

use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct Cached<K, T> {
    key: Option<K>,
    data: Option<T>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
}

impl<K, T> Default for Cached<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            data: None,
            fetched_at: None,
            stale: true,
        }
    }
}

impl<K: PartialEq + Clone + std::fmt::Debug, T> Cached<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replace the slot with a confirmed value for `key`.
    pub fn set(&mut self, key: K, data: T) {
        self.key = Some(key);
        self.data = Some(data);
        self.fetched_at = Some(Utc::now());
        self.stale = false;
    }

    /// Apply a local edit to the cached value without revalidating.
    ///
    /// Returns `false` when there is nothing cached to edit.
    pub fn mutate(&mut self, edit: impl FnOnce(&mut T)) -> bool {
        match self.data.as_mut() {
            Some(data) => {
                edit(data);
                true
            }
            None => false,
        }
    }

    /// Mark the slot stale; the next `load` fetches again. Data stays readable.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Serve `key` from the slot, fetching when it is stale or holds another key.
    pub async fn load<F, Fut>(&mut self, key: K, fetch: F) -> Result<&T, CoreError>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let fresh = !self.stale && self.key.as_ref() == Some(&key) && self.data.is_some();
        if !fresh {
            return self.revalidate(key, fetch).await;
        }
        debug!(?key, "cache hit");
        self.data.as_ref().ok_or(CoreError::Unknown)
    }

    /// Fetch `key` unconditionally and overwrite whatever the slot holds.
    ///
    /// On failure the previous data is kept and the slot stays stale.
    pub async fn revalidate<F, Fut>(&mut self, key: K, fetch: F) -> Result<&T, CoreError>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        debug!(?key, "revalidating");
        match fetch(key.clone()).await {
            Ok(data) => {
                self.set(key, data);
                self.data.as_ref().ok_or(CoreError::Unknown)
            }
            Err(err) => {
                self.stale = true;
                Err(err)
            }
        }
    }
}
