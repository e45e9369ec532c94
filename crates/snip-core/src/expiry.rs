use crate::error::ShortenerError;
use crate::record::UrlRecord;
use jiff::{SignedDuration, Timestamp};

/// Validity window applied when the caller does not specify one.
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

/// How long a mapping stays resolvable after creation.
///
/// Always a positive number of minutes, so `expires_at > created_at`
/// holds for every record built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    minutes: u32,
}

impl Validity {
    pub fn from_minutes(minutes: u32) -> Result<Self, ShortenerError> {
        if minutes == 0 {
            return Err(ShortenerError::InvalidValidity(
                "validity must be at least one minute".to_string(),
            ));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn as_duration(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.minutes))
    }

    /// Computes the expiry instant for a record created at `created_at`.
    pub fn expires_at(&self, created_at: Timestamp) -> Result<Timestamp, ShortenerError> {
        created_at
            .checked_add(self.as_duration())
            .map_err(|e| ShortenerError::InvalidValidity(format!("{} minutes: {e}", self.minutes)))
    }
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_VALIDITY_MINUTES,
        }
    }
}

/// Decides whether a record is past its validity window.
///
/// Evaluated fresh on every resolution; the result is never cached since
/// "now" keeps moving.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryPolicy;

impl ExpiryPolicy {
    /// A record is expired strictly after `expires_at`; a lookup at exactly
    /// `expires_at` still succeeds.
    pub fn is_expired(record: &UrlRecord, now: Timestamp) -> bool {
        now > record.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::ShortCode;

    fn record_at(created_at: Timestamp, minutes: u32) -> UrlRecord {
        UrlRecord::new(
            ShortCode::new_unchecked("abc123"),
            "https://example.com".to_string(),
            created_at,
            Validity::from_minutes(minutes).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn zero_minutes_is_rejected() {
        let err = Validity::from_minutes(0).unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidValidity(_)));
    }

    #[test]
    fn default_is_thirty_minutes() {
        assert_eq!(Validity::default().minutes(), 30);
    }

    #[test]
    fn expires_at_adds_minutes() {
        let t0 = Timestamp::from_second(1_000).unwrap();
        let validity = Validity::from_minutes(2).unwrap();
        assert_eq!(
            validity.expires_at(t0).unwrap(),
            Timestamp::from_second(1_120).unwrap()
        );
    }

    #[test]
    fn live_up_to_and_including_expiry() {
        let t0 = Timestamp::from_second(1_000).unwrap();
        let record = record_at(t0, 1);

        assert!(!ExpiryPolicy::is_expired(&record, t0));
        assert!(!ExpiryPolicy::is_expired(&record, record.expires_at()));
    }

    #[test]
    fn expired_strictly_after_expiry() {
        let t0 = Timestamp::from_second(1_000).unwrap();
        let record = record_at(t0, 1);

        let just_after = record.expires_at() + SignedDuration::from_nanos(1);
        assert!(ExpiryPolicy::is_expired(&record, just_after));
    }
}
