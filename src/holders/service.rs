/// Holder count orchestrator
///
/// One decision per request:
///
/// ```text
/// CHECK_CACHE -> CHECK_RATE_LIMIT -> (ATTEMPT_SOURCES | SKIP) -> VALIDATE -> PERSIST -> RESPOND
/// ```
///
/// Every path ends in a response. Source and tier failures are reported as
/// metadata on the response (`error`), never as a failed call. When nothing
/// live or cached is available the bootstrap constant is served as
/// `fallback`.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

use super::cache::{TierSnapshot, TieredCache, WriteReport};
use super::errors::SourceError;
use super::extractor::PatternReport;
use super::rate_limiter::AttemptRateLimiter;
use super::sources::{ExplorerPageStrategy, SourceChain};
use super::types::{
    HolderCountRecord, HolderCountResponse, HolderSource, PlausibilityBounds, ProviderTag,
    TokenTarget,
};
use crate::constants::BOOTSTRAP_TIMESTAMP;
use crate::logger::{self, LogTag};
use crate::utils::format_age_string;

/// Orchestrator state, constructed once per process and shared by handlers
pub struct HolderCountService {
    token: TokenTarget,
    cache: TieredCache,
    chain: SourceChain,
    limiter: AttemptRateLimiter,
    bounds: PlausibilityBounds,
    bootstrap: HolderCountRecord,
    /// Present when single-flight is enabled
    flight: Option<AsyncMutex<()>>,
    page_probe: Option<Arc<ExplorerPageStrategy>>,
}

/// Rate limiter and wiring summary for the status endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub token: String,
    pub chain: String,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub min_interval_secs: u64,
    pub next_attempt_in_secs: u64,
    pub strategies: Vec<&'static str>,
    pub tiers: Vec<&'static str>,
    pub single_flight: bool,
    pub max_plausible_count: u64,
}

/// One diagnostics pass over the explorer page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    pub url: Option<String>,
    pub rate_limited: bool,
    pub fetched: bool,
    pub page_bytes: usize,
    pub error: Option<String>,
    pub extracted: Option<u64>,
    pub patterns: Vec<PatternReport>,
    pub tiers: Vec<TierSnapshot>,
}

/// The compiled-in cold start record
pub fn bootstrap_record(count: u64) -> HolderCountRecord {
    HolderCountRecord {
        count,
        timestamp: BOOTSTRAP_TIMESTAMP
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
        source: HolderSource::Fallback,
        provider: Some(ProviderTag::Bootstrap),
    }
}

impl HolderCountService {
    pub fn new(
        token: TokenTarget,
        cache: TieredCache,
        chain: SourceChain,
        limiter: AttemptRateLimiter,
        bounds: PlausibilityBounds,
        bootstrap_count: u64,
    ) -> Self {
        Self {
            token,
            cache: cache.with_bounds(bounds),
            chain,
            limiter,
            bounds,
            bootstrap: bootstrap_record(bootstrap_count),
            flight: None,
            page_probe: None,
        }
    }

    /// Serialize source passes: callers that find a pass in flight serve
    /// the cache, or wait for the pass when there is no cache yet
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.flight = enabled.then(|| AsyncMutex::new(()));
        self
    }

    /// Explorer page used by `diagnose`
    pub fn with_page_probe(mut self, probe: Option<Arc<ExplorerPageStrategy>>) -> Self {
        self.page_probe = probe;
        self
    }

    pub fn token(&self) -> &TokenTarget {
        &self.token
    }

    pub fn bounds(&self) -> PlausibilityBounds {
        self.bounds
    }

    pub fn chain(&self) -> &SourceChain {
        &self.chain
    }

    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn bootstrap(&self) -> &HolderCountRecord {
        &self.bootstrap
    }

    pub async fn resolve(&self) -> HolderCountResponse {
        self.resolve_at(Utc::now()).await
    }

    pub async fn resolve_at(&self, now: DateTime<Utc>) -> HolderCountResponse {
        // CHECK_CACHE
        let cached = self.cache.resolve().await;

        // CHECK_RATE_LIMIT: only a cached record lets us skip the sources
        if let Some(record) = &cached {
            if !self.limiter.should_attempt(now) {
                logger::debug(
                    LogTag::RateLimit,
                    &format!(
                        "Source pass throttled, next allowed in {}s",
                        self.limiter.time_until_next(now).as_secs()
                    ),
                );
                return self.respond_cached(record, None);
            }
        }

        let _flight = match &self.flight {
            None => None,
            Some(gate) => match gate.try_lock() {
                Ok(guard) => Some(guard),
                Err(_) => {
                    if let Some(record) = &cached {
                        logger::debug(
                            LogTag::Holders,
                            "Source pass already in flight, serving cached value",
                        );
                        return self.respond_cached(record, None);
                    }
                    let guard = gate.lock().await;
                    if let Some(record) = self.cache.resolve().await {
                        return self.respond_cached(&record, None);
                    }
                    Some(guard)
                }
            },
        };

        // ATTEMPT_SOURCES
        self.limiter.record_attempt(now);
        let outcome = self.chain.run(&self.token).await;

        // VALIDATE
        let reading = outcome
            .reading
            .as_ref()
            .filter(|r| self.bounds.contains(r.count));

        // PERSIST
        if let Some(reading) = reading {
            let record = HolderCountRecord::live(reading.count, now, reading.provider);
            let report = self.cache.write_all(&record).await;
            if !report.all_written() {
                logger::debug(
                    LogTag::Cache,
                    &format!("Partial write: skipped {:?}", report.skipped),
                );
            }
            logger::info(
                LogTag::Holders,
                &format!(
                    "Live holder count {} from {} ({})",
                    record.count, reading.strategy, reading.provider
                ),
            );
            return HolderCountResponse::from_record(&record, HolderSource::Live);
        }

        let summary = outcome.failure_summary();
        match &cached {
            Some(record) => {
                logger::warning(
                    LogTag::Holders,
                    &format!(
                        "No live holder count, serving cached {}: {}",
                        record.count, summary
                    ),
                );
                self.respond_cached(record, Some(summary))
            }
            None => {
                logger::warning(
                    LogTag::Holders,
                    &format!(
                        "No live or cached holder count, serving bootstrap {}: {}",
                        self.bootstrap.count, summary
                    ),
                );
                HolderCountResponse::from_record(&self.bootstrap, HolderSource::Fallback)
                    .with_error(Some(summary))
            }
        }
    }

    fn respond_cached(&self, record: &HolderCountRecord, error: Option<String>) -> HolderCountResponse {
        logger::info(
            LogTag::Holders,
            &format!(
                "Serving cached holder count {} (age {})",
                record.count,
                format_age_string(Some(record.timestamp), Utc::now())
            ),
        );
        HolderCountResponse::from_record(record, HolderSource::Cached).with_error(error)
    }

    /// Operator-supplied count, written to every tier
    pub async fn seed_manual(
        &self,
        count: u64,
        now: DateTime<Utc>,
    ) -> Result<(HolderCountRecord, WriteReport), SourceError> {
        if !self.bounds.contains(count) {
            return Err(SourceError::OutOfRange(count as i128));
        }

        let record = HolderCountRecord::live(count, now, ProviderTag::Manual);
        let report = self.cache.write_all(&record).await;
        logger::info(
            LogTag::Holders,
            &format!(
                "Manual holder count {} stored in {:?}",
                count, report.written
            ),
        );
        Ok((record, report))
    }

    pub fn status(&self, now: DateTime<Utc>) -> ServiceStatus {
        ServiceStatus {
            token: self.token.address.clone(),
            chain: self.token.chain.clone(),
            last_attempt_at: self.limiter.last_attempt_at(),
            min_interval_secs: self.limiter.min_interval().as_secs(),
            next_attempt_in_secs: self.limiter.time_until_next(now).as_secs(),
            strategies: self.chain.names(),
            tiers: self.cache.tier_names(),
            single_flight: self.flight.is_some(),
            max_plausible_count: self.bounds.max_exclusive,
        }
    }

    /// Fetch the explorer page once and report how every pattern fares.
    /// Counts as a source pass for the rate limiter.
    pub async fn diagnose(&self, now: DateTime<Utc>) -> DiagnosticsReport {
        let tiers = self.cache.snapshot().await;
        let mut report = DiagnosticsReport {
            url: None,
            rate_limited: false,
            fetched: false,
            page_bytes: 0,
            error: None,
            extracted: None,
            patterns: Vec::new(),
            tiers,
        };

        let Some(probe) = &self.page_probe else {
            report.error = Some("explorer page strategy not configured".to_string());
            return report;
        };
        report.url = Some(probe.page_url(&self.token));

        if !self.limiter.try_begin(now) {
            report.rate_limited = true;
            return report;
        }

        match probe.fetch_page(&self.token).await {
            Ok(html) => {
                report.fetched = true;
                report.page_bytes = html.len();
                report.patterns = probe.extractor().diagnose(&html);
                report.extracted = probe.extractor().extract(&html);
            }
            Err(e) => {
                logger::warning(LogTag::Holders, &format!("Diagnostics fetch failed: {}", e));
                report.error = Some(e.to_string());
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holders::cache::{CacheTier, FileTier, MemoryTier, RemoteTier};
    use crate::holders::client::HttpClient;
    use crate::holders::errors::CacheError;
    use crate::holders::extractor::HolderExtractor;
    use crate::holders::sources::testing::{Script, ScriptedStrategy};
    use crate::holders::sources::HolderStrategy;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::time::Duration;

    const MIN_INTERVAL: Duration = Duration::from_secs(30);

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap()
    }

    fn token() -> TokenTarget {
        TokenTarget::new("0xabc", "base-mainnet")
    }

    fn cache(tiers: Vec<Arc<dyn CacheTier>>) -> TieredCache {
        TieredCache::new(tiers, Duration::from_secs(2))
    }

    fn service(tiers: Vec<Arc<dyn CacheTier>>, strategies: Vec<Arc<dyn HolderStrategy>>) -> HolderCountService {
        HolderCountService::new(
            token(),
            cache(tiers),
            SourceChain::new(strategies, PlausibilityBounds::default()),
            AttemptRateLimiter::new(MIN_INTERVAL),
            PlausibilityBounds::default(),
            1427,
        )
    }

    fn stored(count: u64, at: DateTime<Utc>) -> HolderCountRecord {
        HolderCountRecord::live(count, at, ProviderTag::ExplorerPage)
    }

    struct UnreachableTier;

    #[async_trait]
    impl CacheTier for UnreachableTier {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        async fn read(&self) -> Result<Option<HolderCountRecord>, CacheError> {
            Err(CacheError::Network("connection refused".to_string()))
        }

        async fn write(&self, _record: &HolderCountRecord) -> Result<(), CacheError> {
            Err(CacheError::Network("connection refused".to_string()))
        }
    }

    #[test]
    fn test_bootstrap_record() {
        let record = bootstrap_record(1427);
        assert_eq!(record.count, 1427);
        assert_eq!(record.source, HolderSource::Fallback);
        assert_eq!(record.timestamp, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_total_failure_serves_bootstrap() {
        let strategies: Vec<Arc<dyn HolderStrategy>> = vec![
            ScriptedStrategy::new("a", Script::Fail(SourceError::NoMatch)),
            ScriptedStrategy::new("b", Script::Hang),
            ScriptedStrategy::new("c", Script::Count(0)),
        ];
        let tiers: Vec<Arc<dyn CacheTier>> = vec![Arc::new(MemoryTier::new()), Arc::new(UnreachableTier)];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0()).await;
        assert_eq!(response.holders, 1427);
        assert_eq!(response.source, HolderSource::Fallback);
        assert_eq!(response.last_updated, bootstrap_record(1427).timestamp);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_no_strategies_no_tiers_is_fallback() {
        let svc = service(Vec::new(), Vec::new());
        let response = svc.resolve_at(t0()).await;
        assert_eq!(response.source, HolderSource::Fallback);
        assert_eq!(response.error.as_deref(), Some("no live source configured"));
    }

    #[tokio::test]
    async fn test_live_value_is_persisted() {
        let memory = Arc::new(MemoryTier::new());
        let strategy = ScriptedStrategy::new("good", Script::Count(1416));
        let tiers: Vec<Arc<dyn CacheTier>> = vec![memory.clone()];
        let strategies: Vec<Arc<dyn HolderStrategy>> = vec![strategy.clone()];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0()).await;
        assert_eq!(response.holders, 1416);
        assert_eq!(response.source, HolderSource::Live);
        assert_eq!(response.last_updated, t0());
        assert_eq!(response.error, None);
        assert_eq!(memory.get().map(|r| r.count), Some(1416));
    }

    #[tokio::test]
    async fn test_cache_precedence_is_by_timestamp() {
        let older = Arc::new(MemoryTier::new());
        let newer = Arc::new(MemoryTier::new());
        older.write(&stored(1000, t0() - ChronoDuration::hours(2))).await.unwrap();
        newer.write(&stored(1200, t0() - ChronoDuration::hours(1))).await.unwrap();

        let strategies: Vec<Arc<dyn HolderStrategy>> =
            vec![ScriptedStrategy::new("down", Script::Fail(SourceError::NoMatch))];
        // newer tier listed last on purpose
        let tiers: Vec<Arc<dyn CacheTier>> = vec![older, newer];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0()).await;
        assert_eq!(response.holders, 1200);
        assert_eq!(response.source, HolderSource::Cached);
        assert_eq!(response.last_updated, t0() - ChronoDuration::hours(1));
        assert_eq!(
            response.error.as_deref(),
            Some("down: No holder count found in payload")
        );
    }

    #[tokio::test]
    async fn test_inflated_cached_count_never_served() {
        let memory = Arc::new(MemoryTier::new());
        memory
            .write(&HolderCountRecord::live(5_000_000, t0(), ProviderTag::Manual))
            .await
            .unwrap();
        let strategies: Vec<Arc<dyn HolderStrategy>> =
            vec![ScriptedStrategy::new("down", Script::Fail(SourceError::NoMatch))];
        let tiers: Vec<Arc<dyn CacheTier>> = vec![memory];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0() + ChronoDuration::minutes(5)).await;
        assert_eq!(response.holders, 1427);
        assert_eq!(response.source, HolderSource::Fallback);
    }

    #[tokio::test]
    async fn test_older_valid_record_beats_newer_inflated_one() {
        let inflated = Arc::new(MemoryTier::new());
        let valid = Arc::new(MemoryTier::new());
        inflated
            .write(&HolderCountRecord::live(5_000_000, t0(), ProviderTag::Manual))
            .await
            .unwrap();
        valid.write(&stored(1416, t0() - ChronoDuration::hours(3))).await.unwrap();

        let strategies: Vec<Arc<dyn HolderStrategy>> =
            vec![ScriptedStrategy::new("down", Script::Fail(SourceError::NoMatch))];
        let tiers: Vec<Arc<dyn CacheTier>> = vec![inflated, valid];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0() + ChronoDuration::minutes(5)).await;
        assert_eq!(response.holders, 1416);
        assert_eq!(response.source, HolderSource::Cached);
        assert_eq!(response.last_updated, t0() - ChronoDuration::hours(3));
    }

    #[tokio::test]
    async fn test_zero_count_on_disk_is_not_served() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holder_count.json");
        let file = Arc::new(FileTier::new(&path));
        file.write(&stored(0, t0())).await.unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"count\": 0"));

        let strategies: Vec<Arc<dyn HolderStrategy>> =
            vec![ScriptedStrategy::new("down", Script::Fail(SourceError::NoMatch))];
        let tiers: Vec<Arc<dyn CacheTier>> = vec![file];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0() + ChronoDuration::minutes(1)).await;
        assert_eq!(response.holders, 1427);
        assert_eq!(response.source, HolderSource::Fallback);

        let report = svc.diagnose(t0() + ChronoDuration::minutes(1)).await;
        assert!(report.tiers[0].record.is_none());
        assert!(report.tiers[0].error.is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_suppresses_sources_when_cached() {
        let memory = Arc::new(MemoryTier::new());
        memory.write(&stored(1300, t0() - ChronoDuration::minutes(5))).await.unwrap();
        let strategy = ScriptedStrategy::new("page", Script::Count(1500));
        let tiers: Vec<Arc<dyn CacheTier>> = vec![memory];
        let strategies: Vec<Arc<dyn HolderStrategy>> = vec![strategy.clone()];
        let svc = service(tiers, strategies);

        svc.limiter.record_attempt(t0());
        let just_before = t0() + ChronoDuration::from_std(MIN_INTERVAL).unwrap()
            - ChronoDuration::milliseconds(1);

        let response = svc.resolve_at(just_before).await;
        assert_eq!(response.source, HolderSource::Cached);
        assert_eq!(response.holders, 1300);
        assert_eq!(response.error, None);
        assert_eq!(strategy.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_never_blocks_without_cache() {
        let strategy = ScriptedStrategy::new("page", Script::Count(1500));
        let tiers: Vec<Arc<dyn CacheTier>> = vec![Arc::new(MemoryTier::new())];
        let strategies: Vec<Arc<dyn HolderStrategy>> = vec![strategy.clone()];
        let svc = service(tiers, strategies);

        svc.limiter.record_attempt(t0());
        let response = svc.resolve_at(t0() + ChronoDuration::seconds(1)).await;
        assert_eq!(response.source, HolderSource::Live);
        assert_eq!(strategy.calls(), 1);
    }

    #[tokio::test]
    async fn test_attempt_recorded_even_on_failure() {
        let strategies: Vec<Arc<dyn HolderStrategy>> =
            vec![ScriptedStrategy::new("down", Script::Fail(SourceError::NoMatch))];
        let svc = service(Vec::new(), strategies);

        svc.resolve_at(t0()).await;
        assert_eq!(svc.limiter.last_attempt_at(), Some(t0()));
    }

    #[tokio::test]
    async fn test_single_flight_serves_cache_to_concurrent_caller() {
        let memory = Arc::new(MemoryTier::new());
        memory.write(&stored(1300, t0() - ChronoDuration::hours(1))).await.unwrap();
        let slow = ScriptedStrategy::new("slow", Script::Hang);
        let tiers: Vec<Arc<dyn CacheTier>> = vec![memory];
        let strategies: Vec<Arc<dyn HolderStrategy>> = vec![slow.clone()];
        let svc = service(tiers, strategies).with_single_flight(true);

        let later = t0() + ChronoDuration::minutes(1);
        let (first, second) = tokio::join!(svc.resolve_at(t0()), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            svc.resolve_at(later).await
        });

        assert_eq!(slow.calls(), 1);
        assert_eq!(first.source, HolderSource::Cached);
        assert!(first.error.is_some());
        assert_eq!(second.source, HolderSource::Cached);
        assert_eq!(second.error, None);
    }

    #[tokio::test]
    async fn test_seed_manual() {
        let memory = Arc::new(MemoryTier::new());
        let tiers: Vec<Arc<dyn CacheTier>> = vec![memory.clone()];
        let svc = service(tiers, Vec::new());

        assert!(matches!(
            svc.seed_manual(0, t0()).await,
            Err(SourceError::OutOfRange(0))
        ));
        assert!(svc.seed_manual(1_000_000, t0()).await.is_err());

        let (record, report) = svc.seed_manual(1450, t0()).await.unwrap();
        assert_eq!(record.provider, Some(ProviderTag::Manual));
        assert!(report.all_written());
        assert_eq!(memory.get(), Some(record));
    }

    #[tokio::test]
    async fn test_status() {
        let strategies: Vec<Arc<dyn HolderStrategy>> =
            vec![ScriptedStrategy::new("page", Script::Count(1))];
        let tiers: Vec<Arc<dyn CacheTier>> = vec![Arc::new(MemoryTier::new())];
        let svc = service(tiers, strategies);
        svc.limiter.record_attempt(t0());

        let status = svc.status(t0() + ChronoDuration::seconds(10));
        assert_eq!(status.strategies, vec!["page"]);
        assert_eq!(status.tiers, vec!["memory"]);
        assert_eq!(status.last_attempt_at, Some(t0()));
        assert_eq!(status.min_interval_secs, 30);
        assert_eq!(status.next_attempt_in_secs, 20);
        assert!(!status.single_flight);
    }

    #[tokio::test]
    async fn test_diagnose_reports_patterns_and_respects_limiter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/token/0xabc")
            .with_status(200)
            .with_body("<div>Holders: 1,416</div>")
            .expect(1)
            .create_async()
            .await;

        let probe = Arc::new(ExplorerPageStrategy::new(
            HttpClient::new(5).unwrap(),
            format!("{}/token/{{address}}", server.url()),
            HolderExtractor::default(),
            Duration::from_secs(5),
        ));
        let svc = service(Vec::new(), Vec::new()).with_page_probe(Some(probe));

        let report = svc.diagnose(t0()).await;
        assert!(report.fetched);
        assert_eq!(report.extracted, Some(1416));
        assert_eq!(report.patterns[0].capture.as_deref(), Some("1,416"));

        let throttled = svc.diagnose(t0() + ChronoDuration::seconds(5)).await;
        assert!(throttled.rate_limited);
        assert!(!throttled.fetched);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_end_to_end_cold_start() {
        let mut server = mockito::Server::new_async().await;
        let page = server
            .mock("GET", "/token/0xabc")
            .with_status(200)
            .with_body("<html><body><div>Token Holders: 2,003</div></body></html>")
            .create_async()
            .await;
        let remote_read = server
            .mock("GET", "/item/holder-count-0xabc")
            .with_status(404)
            .create_async()
            .await;
        let remote_write = server
            .mock("PATCH", "/items")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex(r#""key":"holder-count-0xabc""#.to_string()),
                mockito::Matcher::Regex(r#""count":2003"#.to_string()),
                mockito::Matcher::Regex(r#""timestamp":"2025-08-01T12:00:00Z""#.to_string()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let http = HttpClient::new(5).unwrap();
        let memory = Arc::new(MemoryTier::new());
        let file = Arc::new(FileTier::new(dir.path().join("holder_count.json")));
        let remote = Arc::new(
            RemoteTier::new(http.clone(), server.url(), token().cache_key())
                .with_writer(Some(format!("{}/items", server.url())), None),
        );

        let hanging = ScriptedStrategy::new("hanging", Script::Hang);
        let page_strategy = Arc::new(ExplorerPageStrategy::new(
            http,
            format!("{}/token/{{address}}", server.url()),
            HolderExtractor::default(),
            Duration::from_secs(5),
        ));

        let tiers: Vec<Arc<dyn CacheTier>> = vec![memory.clone(), file.clone(), remote];
        let strategies: Vec<Arc<dyn HolderStrategy>> = vec![hanging.clone(), page_strategy];
        let svc = service(tiers, strategies);

        let response = svc.resolve_at(t0()).await;
        assert_eq!(response.holders, 2003);
        assert_eq!(response.source, HolderSource::Live);
        assert_eq!(response.last_updated, t0());
        assert_eq!(hanging.calls(), 1);

        assert_eq!(memory.get().map(|r| (r.count, r.timestamp)), Some((2003, t0())));
        let on_disk = file.read().await.unwrap().unwrap();
        assert_eq!((on_disk.count, on_disk.timestamp), (2003, t0()));
        assert_eq!(on_disk.provider, Some(ProviderTag::ExplorerPage));

        page.assert_async().await;
        remote_read.assert_async().await;
        remote_write.assert_async().await;
    }
}
