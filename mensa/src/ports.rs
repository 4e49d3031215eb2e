use crate::domain::{DailyMenu, MealDocument, MenuPost};
use crate::error::MenuError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

// Ports are the pluggable seams between the engine and its collaborators.

/// Key/value store with per-entry expiration.
///
/// Absence is `Ok(None)` / `Ok(false)`, never an error; an `Err` always
/// means the backing itself failed. Each call is atomic with respect to the
/// others, and a value is never visible with a mismatched expiry.
#[async_trait]
pub trait TtlStore<V>: Send + Sync + 'static
where
    V: Send + Sync + 'static,
{
    /// Returns the value only while its entry is unexpired. A lookup may
    /// lazily purge an expired entry it runs into, but expiry is re-checked
    /// on every call either way.
    async fn get(&self, key: &str) -> shared::Result<Option<V>>;

    /// Unconditional overwrite. A `None` TTL falls back to the store-wide
    /// default.
    async fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> shared::Result<()>;

    /// Same expiry rule as `get`, without cloning the value out.
    async fn has(&self, key: &str) -> shared::Result<bool>;

    /// Returns whether an entry was actually removed.
    async fn delete(&self, key: &str) -> shared::Result<bool>;

    /// Removes all entries immediately.
    async fn clear(&self) -> shared::Result<()>;
}

/// The scraping collaborator. Both calls hit the remote board, so they are
/// slow and fallible; a failure surfaces as an error, never an empty result.
#[async_trait]
pub trait MenuSource: Send + Sync + 'static {
    /// The board's current post listing, in site order (newest first).
    async fn latest_posts(&self) -> Result<Vec<MenuPost>, MenuError>;

    /// One post's raw body text and meal photos.
    async fn meal_document(&self, document_id: &str) -> Result<MealDocument, MenuError>;
}

/// Optional durable backing consulted between the cache and a live fetch.
/// I/O failure is an error distinct from `Ok(None)`.
#[async_trait]
pub trait MealRepository: Send + Sync + 'static {
    async fn save_meal(
        &self,
        date: NaiveDate,
        menu: &DailyMenu,
        document_id: &str,
    ) -> shared::Result<()>;

    async fn meal(&self, date: NaiveDate) -> shared::Result<Option<DailyMenu>>;
}
