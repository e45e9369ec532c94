use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::{ClickEvent, UrlRecord};

/// Renders a timestamp the way JavaScript's `toISOString` does:
/// UTC with millisecond precision.
pub fn iso8601(ts: Timestamp) -> String {
    format!("{ts:.3}")
}

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: Option<String>,
    /// Minutes the link stays valid. Parsed as any JSON number so that
    /// fractional values get a domain error instead of a decode error.
    pub validity: Option<f64>,
    pub shortcode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub short_link: String,
    pub expiry: String,
}

#[derive(Debug, Serialize)]
pub struct ClickData {
    pub timestamp: String,
    pub source: String,
    pub location: String,
}

impl From<&ClickEvent> for ClickData {
    fn from(click: &ClickEvent) -> Self {
        Self {
            timestamp: iso8601(click.timestamp),
            source: click.referrer.clone(),
            location: click.location.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_clicks: u64,
    #[serde(rename = "originalURL")]
    pub original_url: String,
    pub creation_date: String,
    pub expiry_date: String,
    pub click_data: Vec<ClickData>,
}

impl From<&UrlRecord> for StatsResponse {
    fn from(record: &UrlRecord) -> Self {
        Self {
            total_clicks: record.click_count(),
            original_url: record.target_url().to_owned(),
            creation_date: iso8601(record.created_at()),
            expiry_date: iso8601(record.expires_at()),
            click_data: record.click_history().iter().map(ClickData::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
