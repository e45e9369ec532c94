use crate::error::ShortenerError;
use crate::expiry::{ExpiryPolicy, Validity};
use crate::shortcode::ShortCode;
use jiff::Timestamp;

/// Placeholder for click attributes the caller could not supply.
pub const UNKNOWN: &str = "Unknown";

/// One redirect traversal of a short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// When the redirect happened.
    pub timestamp: Timestamp,
    /// Where the visitor came from, `"Unknown"` when not supplied.
    pub referrer: String,
    /// Reserved for geolocation; always `"Unknown"`.
    pub location: String,
}

impl ClickEvent {
    pub fn new(timestamp: Timestamp, referrer: Option<String>) -> Self {
        Self {
            timestamp,
            referrer: referrer
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            location: UNKNOWN.to_string(),
        }
    }
}

/// A stored URL mapping.
///
/// Everything except the click history is fixed at creation. The click
/// count is the length of the history, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    shortcode: ShortCode,
    target_url: String,
    created_at: Timestamp,
    expires_at: Timestamp,
    click_history: Vec<ClickEvent>,
}

impl UrlRecord {
    pub fn new(
        shortcode: ShortCode,
        target_url: String,
        created_at: Timestamp,
        validity: Validity,
    ) -> Result<Self, ShortenerError> {
        let expires_at = validity.expires_at(created_at)?;
        Ok(Self {
            shortcode,
            target_url,
            created_at,
            expires_at,
            click_history: Vec::new(),
        })
    }

    pub fn shortcode(&self) -> &ShortCode {
        &self.shortcode
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn click_count(&self) -> u64 {
        self.click_history.len() as u64
    }

    pub fn click_history(&self) -> &[ClickEvent] {
        &self.click_history
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        ExpiryPolicy::is_expired(self, now)
    }

    /// Appends a click, bumping the count by exactly one.
    pub fn push_click(&mut self, click: ClickEvent) {
        self.click_history.push(click);
    }
}
