use crate::tracker::ClickTracker;
use async_trait::async_trait;
use snip_core::{
    Clock, CreateParams, EventRecorder, ExpiryPolicy, Level, LogEvent, Lookup, NoopRecorder,
    Package, Repository, ShortCode, Shortener, ShortenerError, StorageError, SystemClock,
    UrlRecord, Validity,
};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;
use url::Url;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Tunables for [`MappingService`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct MappingSettings {
    /// How many generated codes to try before giving up on a collision.
    #[builder(default = 5)]
    pub max_generate_attempts: u32,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The concrete implementation of the [`Shortener`] trait.
///
/// Owns nothing but handles: the repository is shared, so several services
/// (or a service and a test) can look at the same store.
pub struct MappingService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: Arc<C>,
    recorder: Arc<dyn EventRecorder>,
    settings: MappingSettings,
}

impl<R, G, C> Clone for MappingService<R, G, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            clock: Arc::clone(&self.clock),
            recorder: Arc::clone(&self.recorder),
            settings: self.settings,
        }
    }
}

impl<R: Repository, G: Generator> MappingService<R, G, SystemClock> {
    pub fn new(repository: Arc<R>, generator: G) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
            clock: Arc::new(SystemClock),
            recorder: Arc::new(NoopRecorder),
            settings: MappingSettings::default(),
        }
    }
}

impl<R: Repository, G: Generator, C: Clock> MappingService<R, G, C> {
    /// Replaces the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> MappingService<R, G, C2> {
        MappingService {
            repository: self.repository,
            generator: self.generator,
            clock: Arc::new(clock),
            recorder: self.recorder,
            settings: self.settings,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn EventRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_settings(mut self, settings: MappingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Accepts any well-formed absolute URL, whatever its scheme.
    fn validate_url(raw: &str) -> Result<()> {
        if raw.is_empty() {
            return Err(ShortenerError::InvalidUrl("URL cannot be empty".to_string()));
        }

        Url::parse(raw).map_err(|e| ShortenerError::InvalidUrl(format!("{raw}: {e}")))?;
        Ok(())
    }

    async fn insert_new(
        &self,
        code: ShortCode,
        target_url: &str,
        validity: Validity,
    ) -> std::result::Result<UrlRecord, StorageOrDomain> {
        let record = UrlRecord::new(code, target_url.to_owned(), self.clock.now(), validity)
            .map_err(StorageOrDomain::Domain)?;
        self.repository
            .insert(record.clone())
            .await
            .map_err(StorageOrDomain::Storage)?;
        Ok(record)
    }

    /// Inserts under a freshly generated code, retrying generated collisions.
    async fn insert_generated(&self, target_url: &str, validity: Validity) -> Result<UrlRecord> {
        let attempts = self.settings.max_generate_attempts.max(1);

        for attempt in 1..=attempts {
            let code: ShortCode = self.generator.generate().into();
            match self.insert_new(code.clone(), target_url, validity).await {
                Ok(record) => return Ok(record),
                Err(StorageOrDomain::Storage(StorageError::Conflict(_))) => {
                    warn!(code = %code, attempt, "generated short code collided");
                    self.emit(
                        Level::Warn,
                        format!("Generated shortcode collision: {code} (attempt {attempt}/{attempts})"),
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(ShortenerError::Conflict(format!(
            "no free short code after {attempts} attempts"
        )))
    }

    fn emit(&self, level: Level, message: String) {
        self.recorder
            .record(LogEvent::backend(level, Package::Service, message));
    }
}

/// Keeps storage failures apart from record construction failures so a
/// generated-code collision can be told from everything else.
enum StorageOrDomain {
    Storage(StorageError),
    Domain(ShortenerError),
}

impl From<StorageOrDomain> for ShortenerError {
    fn from(value: StorageOrDomain) -> Self {
        match value {
            StorageOrDomain::Storage(e) => e.into(),
            StorageOrDomain::Domain(e) => e,
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for MappingService<R, G, C> {
    async fn create(&self, params: CreateParams) -> Result<UrlRecord> {
        Self::validate_url(&params.target_url)?;

        let record = match params.custom_alias {
            Some(code) => {
                if self.repository.exists(&code).await? {
                    return Err(ShortenerError::Conflict(code.to_string()));
                }
                // A racing insert of the same alias still surfaces as a conflict.
                self.insert_new(code, &params.target_url, params.validity)
                    .await?
            }
            None => {
                self.insert_generated(&params.target_url, params.validity)
                    .await?
            }
        };

        info!(
            code = %record.shortcode(),
            expires_at = %record.expires_at(),
            "created mapping"
        );
        Ok(record)
    }

    async fn resolve(&self, code: &ShortCode) -> Result<UrlRecord> {
        let Some(record) = self.repository.get(code).await? else {
            debug!(code = %code, "short code not found");
            return Err(ShortenerError::NotFound(code.to_string()));
        };

        if ExpiryPolicy::is_expired(&record, self.clock.now()) {
            debug!(code = %code, "record has expired");
            self.emit(
                Level::Warn,
                format!("URL with shortcode {code} has expired"),
            );
            return Err(ShortenerError::NotFound(code.to_string()));
        }

        Ok(record)
    }

    async fn resolve_and_track(
        &self,
        code: &ShortCode,
        referrer: Option<String>,
    ) -> Result<UrlRecord> {
        let now = self.clock.now();
        let referrer = referrer.as_deref();

        let lookup = self
            .repository
            .update_if_live(code, now, &|record: &mut UrlRecord| {
                ClickTracker::record(record, referrer, now)
            })
            .await?;

        match lookup {
            Lookup::Live(record) => {
                debug!(code = %code, clicks = record.click_count(), "tracked click");
                Ok(record)
            }
            Lookup::Expired => {
                debug!(code = %code, "record has expired");
                Err(ShortenerError::NotFound(code.to_string()))
            }
            Lookup::Missing => {
                debug!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};
    use snip_core::{ManualClock, ReadRepository, UNKNOWN};
    use snip_generator::SeqGenerator;
    use snip_storage::InMemoryRepository;

    type TestService = MappingService<InMemoryRepository, SeqGenerator, ManualClock>;

    fn t0() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn test_service() -> (TestService, ManualClock) {
        let clock = ManualClock::new(t0());
        let service = MappingService::new(
            Arc::new(InMemoryRepository::new()),
            SeqGenerator::with_prefix("sn"),
        )
        .with_clock(clock.clone());
        (service, clock)
    }

    fn params(url: &str, alias: Option<&str>, minutes: u32) -> CreateParams {
        CreateParams {
            target_url: url.to_string(),
            validity: Validity::from_minutes(minutes).unwrap(),
            custom_alias: alias.map(|a| ShortCode::new(a).unwrap()),
        }
    }

    /// Always hands out the same code.
    struct StuckGenerator;

    impl Generator for StuckGenerator {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            ShortCode::new_unchecked("stuck")
        }
    }

    #[tokio::test]
    async fn create_with_generated_code() {
        let (service, _) = test_service();

        let record = service
            .create(params("https://example.com", None, 30))
            .await
            .unwrap();

        assert_eq!(record.shortcode().as_str(), "sn000000");
        assert_eq!(record.created_at(), t0());
        assert_eq!(record.expires_at(), t0() + SignedDuration::from_mins(30));
        assert_eq!(record.click_count(), 0);
    }

    #[tokio::test]
    async fn create_then_resolve_round_trips() {
        let (service, _) = test_service();

        let created = service
            .create(params("https://example.com/a/b?c=d", Some("my-alias"), 30))
            .await
            .unwrap();
        let resolved = service.resolve(created.shortcode()).await.unwrap();

        assert_eq!(resolved.target_url(), "https://example.com/a/b?c=d");
        assert_eq!(resolved.shortcode().as_str(), "my-alias");
    }

    #[tokio::test]
    async fn duplicate_alias_is_a_conflict() {
        let (service, _) = test_service();

        service
            .create(params("https://example1.com", Some("my-alias"), 30))
            .await
            .unwrap();
        let err = service
            .create(params("https://example2.com", Some("my-alias"), 30))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::Conflict(_)));

        let kept = service
            .resolve(&ShortCode::new("my-alias").unwrap())
            .await
            .unwrap();
        assert_eq!(kept.target_url(), "https://example1.com");
    }

    #[tokio::test]
    async fn alias_of_expired_mapping_is_still_taken() {
        let (service, clock) = test_service();

        service
            .create(params("https://example.com", Some("my-alias"), 1))
            .await
            .unwrap();
        clock.advance(SignedDuration::from_hours(1));

        let err = service
            .create(params("https://example.com", Some("my-alias"), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_url_inserts_nothing() {
        let (service, _) = test_service();

        for bad in ["not a url", "", "example.com", "/relative/path", "https://"] {
            let err = service.create(params(bad, None, 30)).await.unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidUrl(_)), "{bad}");
        }
        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn any_absolute_scheme_is_accepted() {
        let (service, _) = test_service();

        for good in ["ftp://example.com/file", "mailto:a@b.com", "http://localhost:8080/x"] {
            let record = service.create(params(good, None, 30)).await.unwrap();
            assert_eq!(record.target_url(), good);
        }
        assert_eq!(service.repository().len(), 3);
    }

    #[tokio::test]
    async fn generated_collision_is_retried() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = MappingService::new(repo.clone(), SeqGenerator::with_prefix("sn"));

        // Occupy the first code the generator will produce.
        service
            .create(params("https://taken.com", Some("sn000000"), 30))
            .await
            .unwrap();

        let record = service
            .create(params("https://example.com", None, 30))
            .await
            .unwrap();
        assert_eq!(record.shortcode().as_str(), "sn000001");
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_conflict() {
        let service = MappingService::new(Arc::new(InMemoryRepository::new()), StuckGenerator)
            .with_settings(MappingSettings::builder().max_generate_attempts(3).build());

        service
            .create(params("https://first.com", None, 30))
            .await
            .unwrap();
        let err = service
            .create(params("https://second.com", None, 30))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::Conflict(_)));
    }

    #[tokio::test]
    async fn resolve_unknown_code() {
        let (service, _) = test_service();
        let err = service
            .resolve(&ShortCode::new("nope").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolve_honours_expiry_boundary() {
        let (service, clock) = test_service();
        let record = service
            .create(params("https://example.com", None, 5))
            .await
            .unwrap();
        let code = record.shortcode().clone();

        clock.set(record.expires_at());
        assert!(service.resolve(&code).await.is_ok());

        clock.advance(SignedDuration::from_nanos(1));
        let err = service.resolve(&code).await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));

        // Expired, but the record itself is still stored.
        assert!(service.repository().exists(&code).await.unwrap());
    }

    #[tokio::test]
    async fn resolve_does_not_count_clicks() {
        let (service, _) = test_service();
        let record = service
            .create(params("https://example.com", None, 30))
            .await
            .unwrap();

        service.resolve(record.shortcode()).await.unwrap();
        let again = service.resolve(record.shortcode()).await.unwrap();
        assert_eq!(again.click_count(), 0);
    }

    #[tokio::test]
    async fn tracking_counts_clicks_in_order() {
        let (service, clock) = test_service();
        let record = service
            .create(params("https://example.com", None, 30))
            .await
            .unwrap();
        let code = record.shortcode().clone();

        for i in 0..3 {
            clock.advance(SignedDuration::from_secs(1));
            let referrer = (i % 2 == 0).then(|| format!("https://ref{i}.example"));
            service.resolve_and_track(&code, referrer).await.unwrap();
        }

        let stats = service.resolve(&code).await.unwrap();
        assert_eq!(stats.click_count(), 3);
        let history = stats.click_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].referrer, "https://ref0.example");
        assert_eq!(history[1].referrer, UNKNOWN);
        assert_eq!(history[2].referrer, "https://ref2.example");
        assert!(history[0].timestamp < history[1].timestamp);
        assert!(history[1].timestamp < history[2].timestamp);
        assert!(history.iter().all(|c| c.location == UNKNOWN));
    }

    #[tokio::test]
    async fn one_minute_link_scenario() {
        let (service, clock) = test_service();
        let record = service
            .create(params("https://example.com", None, 1))
            .await
            .unwrap();
        let code = record.shortcode().clone();
        assert_eq!(record.expires_at(), t0() + SignedDuration::from_mins(1));

        clock.advance(SignedDuration::from_secs(30));
        let tracked = service.resolve_and_track(&code, None).await.unwrap();
        assert_eq!(tracked.click_count(), 1);

        clock.advance(SignedDuration::from_secs(60));
        let err = service.resolve_and_track(&code, None).await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));

        // The refused redirect was not counted.
        let stored = service.repository().get(&code).await.unwrap().unwrap();
        assert_eq!(stored.click_count(), 1);
    }

    #[tokio::test]
    async fn tracking_unknown_code_is_not_found() {
        let (service, _) = test_service();
        let err = service
            .resolve_and_track(&ShortCode::new("nope").unwrap(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let (service, _) = test_service();
        let shortener: Arc<dyn Shortener> = Arc::new(service);

        let record = shortener
            .create(params("https://example.com", None, 30))
            .await
            .unwrap();
        let tracked = shortener
            .resolve_and_track(record.shortcode(), Some("https://ref.example".into()))
            .await
            .unwrap();
        assert_eq!(tracked.click_count(), 1);
    }
}
