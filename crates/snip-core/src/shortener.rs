use crate::expiry::Validity;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Parameters for creating a URL mapping.
#[derive(Debug, Clone)]
pub struct CreateParams {
    /// The original URL to be shortened.
    pub target_url: String,
    /// How long the mapping stays resolvable.
    pub validity: Validity,
    /// Optional caller-chosen short code.
    pub custom_alias: Option<ShortCode>,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a mapping and returns the stored record.
    async fn create(&self, params: CreateParams) -> Result<UrlRecord>;

    /// Resolves a short code to its live record without counting a click.
    /// Fails with `NotFound` if the code does not exist or has expired.
    async fn resolve(&self, code: &ShortCode) -> Result<UrlRecord>;

    /// Resolves a short code and records a click on it.
    /// Returns the record including the new click.
    async fn resolve_and_track(
        &self,
        code: &ShortCode,
        referrer: Option<String>,
    ) -> Result<UrlRecord>;
}
