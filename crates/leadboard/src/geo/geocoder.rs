//! Provider chain with caching and a built-in fallback table.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::provider::{GeocodeProvider, Nominatim, Photon};
use super::{fallback, GeocodeResult};
use crate::config::GeocodingConfig;
use crate::error::Result;

/// Resolves place names to coordinates.
///
/// Successful lookups are cached by exact query string for the lifetime of
/// the process. Misses are not cached.
pub struct Geocoder {
    providers: Vec<Box<dyn GeocodeProvider>>,
    cache: Mutex<HashMap<String, GeocodeResult>>,
    enabled: bool,
    request_delay: Duration,
    provider_delay: Duration,
}

impl std::fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geocoder")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("enabled", &self.enabled)
            .field("cached", &self.cache_size())
            .finish_non_exhaustive()
    }
}

impl Geocoder {
    /// Build the standard chain: Nominatim (US only), Nominatim with a
    /// country suffix, then Photon.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        let providers: Vec<Box<dyn GeocodeProvider>> = vec![
            Box::new(Nominatim::us_only(config)?),
            Box::new(Nominatim::with_country_suffix(config)?),
            Box::new(Photon::new(config)?),
        ];
        Ok(Self::new(
            providers,
            config.request_delay(),
            config.provider_delay(),
        ))
    }

    /// Build a geocoder over an explicit provider chain.
    #[must_use]
    pub fn new(
        providers: Vec<Box<dyn GeocodeProvider>>,
        request_delay: Duration,
        provider_delay: Duration,
    ) -> Self {
        Self {
            providers,
            cache: Mutex::new(HashMap::new()),
            enabled: true,
            request_delay,
            provider_delay,
        }
    }

    /// A geocoder that only consults the cache and the fallback table.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            providers: Vec::new(),
            cache: Mutex::new(HashMap::new()),
            enabled: false,
            request_delay: Duration::ZERO,
            provider_delay: Duration::ZERO,
        }
    }

    /// Whether remote providers are consulted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of cached lookups.
    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, query: &str) -> Option<GeocodeResult> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query)
            .cloned()
    }

    fn remember(&self, query: &str, result: &GeocodeResult) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.to_string(), result.clone());
    }

    /// Resolve `query`, returning `None` when nothing matched.
    pub async fn geocode(&self, query: &str) -> Option<GeocodeResult> {
        if query.trim().is_empty() {
            return None;
        }
        if let Some(hit) = self.cached(query) {
            debug!(query, "Geocode cache hit");
            return Some(hit);
        }

        if self.enabled && !self.providers.is_empty() {
            tokio::time::sleep(self.request_delay).await;

            for provider in &self.providers {
                match provider.lookup(query).await {
                    Ok(Some(result)) => {
                        info!(
                            query,
                            provider = provider.name(),
                            coordinates = %result.coordinates,
                            "Geocoded"
                        );
                        self.remember(query, &result);
                        return Some(result);
                    }
                    Ok(None) => {
                        debug!(query, provider = provider.name(), "No geocode result");
                        // Pause after a miss only; a failed provider moves straight on
                        tokio::time::sleep(self.provider_delay).await;
                    }
                    Err(e) => warn!(query, provider = provider.name(), error = %e, "Geocoder failed"),
                }
            }
        }

        if let Some(result) = fallback::lookup(query) {
            info!(query, "Using built-in coordinates");
            self.remember(query, &result);
            return Some(result);
        }

        debug!(query, "No coordinates found");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lead::Coordinates;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Answer {
        Hit(f64, f64),
        Miss,
        Fail,
    }

    struct FakeProvider {
        name: &'static str,
        answer: Answer,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GeocodeProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn lookup(&self, query: &str) -> Result<Option<GeocodeResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Answer::Hit(lat, lon) => Ok(Some(GeocodeResult {
                    coordinates: Coordinates::new(lat, lon).unwrap(),
                    display_name: format!("{query} via {}", self.name),
                })),
                Answer::Miss => Ok(None),
                Answer::Fail => Err(Error::geocode(self.name, "boom")),
            }
        }
    }

    fn fake(name: &'static str, answer: Answer) -> (Box<dyn GeocodeProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = FakeProvider {
            name,
            answer,
            calls: Arc::clone(&calls),
        };
        (Box::new(provider), calls)
    }

    fn geocoder(providers: Vec<Box<dyn GeocodeProvider>>) -> Geocoder {
        Geocoder::new(providers, Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_first_hit_wins_and_is_cached() {
        let (first, first_calls) = fake("first", Answer::Hit(10.0, 20.0));
        let (second, second_calls) = fake("second", Answer::Hit(30.0, 40.0));
        let geo = geocoder(vec![first, second]);

        let hit = geo.geocode("Somewhere").await.unwrap();
        assert_eq!(hit.display_name, "Somewhere via first");
        assert_eq!(geo.cache_size(), 1);

        let again = geo.geocode("Somewhere").await.unwrap();
        assert_eq!(again, hit);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_errors_and_misses_fall_through() {
        let (failing, _) = fake("failing", Answer::Fail);
        let (empty, _) = fake("empty", Answer::Miss);
        let (good, good_calls) = fake("good", Answer::Hit(10.0, 20.0));
        let geo = geocoder(vec![failing, empty, good]);

        let hit = geo.geocode("Somewhere").await.unwrap();
        assert_eq!(hit.display_name, "Somewhere via good");
        assert_eq!(good_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_delay_follows_misses_only() {
        let delay = Duration::from_millis(300);

        let (failing, _) = fake("failing", Answer::Fail);
        let (good, _) = fake("good", Answer::Hit(10.0, 20.0));
        let geo = Geocoder::new(vec![failing, good], Duration::ZERO, delay);
        let start = std::time::Instant::now();
        assert!(geo.geocode("Somewhere").await.is_some());
        assert!(start.elapsed() < delay);

        let (empty, _) = fake("empty", Answer::Miss);
        let (good, _) = fake("good", Answer::Hit(10.0, 20.0));
        let geo = Geocoder::new(vec![empty, good], Duration::ZERO, delay);
        let start = std::time::Instant::now();
        assert!(geo.geocode("Somewhere").await.is_some());
        assert!(start.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_fallback_table_after_provider_failure() {
        let (failing, _) = fake("failing", Answer::Fail);
        let geo = geocoder(vec![failing]);

        let hit = geo.geocode("Denver").await.unwrap();
        assert_eq!(hit.display_name, "Denver, CO, USA");
        assert_eq!(geo.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let (empty, calls) = fake("empty", Answer::Miss);
        let geo = geocoder(vec![empty]);

        assert!(geo.geocode("Atlantis").await.is_none());
        assert!(geo.geocode("Atlantis").await.is_none());
        assert_eq!(geo.cache_size(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blank_query() {
        let (good, calls) = fake("good", Answer::Hit(10.0, 20.0));
        let geo = geocoder(vec![good]);

        assert!(geo.geocode("   ").await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_uses_fallback_only() {
        let geo = Geocoder::disabled();
        assert!(!geo.is_enabled());
        assert!(geo.geocode("Seattle").await.is_some());
        assert!(geo.geocode("Atlantis").await.is_none());
    }

    #[test]
    fn test_from_config_disabled() {
        let config = GeocodingConfig {
            enabled: false,
            ..GeocodingConfig::default()
        };
        let geo = Geocoder::from_config(&config).unwrap();
        assert!(!geo.is_enabled());
    }

    #[test]
    fn test_from_config_chain() {
        let geo = Geocoder::from_config(&GeocodingConfig::default()).unwrap();
        let debug = format!("{geo:?}");
        assert!(debug.contains("nominatim-formatted"));
        assert!(debug.contains("photon"));
    }
}
