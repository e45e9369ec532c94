use crate::error::Result;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;

/// Outcome of an expiry-aware lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The record exists and has not expired.
    Live(UrlRecord),
    /// The record exists but is past its validity window.
    Expired,
    /// No record was ever stored under the code.
    Missing,
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist. Expiry is not evaluated.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code has ever been stored, live or expired.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record keyed by its own short code.
    /// Returns `Err(Conflict)` if the code already exists, expired or not.
    async fn insert(&self, record: UrlRecord) -> Result<()>;

    /// Applies `update` to the stored record if it is live at `now`.
    ///
    /// The expiry check and the update run as one step with respect to
    /// other operations on the same code.
    async fn update_if_live(
        &self,
        code: &ShortCode,
        now: Timestamp,
        update: &(dyn for<'a> Fn(&'a mut UrlRecord) + Send + Sync),
    ) -> Result<Lookup>;
}
