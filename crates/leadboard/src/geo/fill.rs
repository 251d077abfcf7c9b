//! Backfilling coordinates for leads that only have an address.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info};

use super::Geocoder;
use crate::config::GeocodingConfig;
use crate::lead::Lead;

/// Bounds on one backfill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillLimits {
    /// Maximum number of leads geocoded per pass.
    pub max_per_refresh: usize,
    /// Number of lookups run concurrently.
    pub batch_size: usize,
    /// Pause between batches.
    pub batch_delay: Duration,
}

impl FillLimits {
    /// Limits taken from the geocoding settings.
    #[must_use]
    pub fn from_config(config: &GeocodingConfig) -> Self {
        Self {
            max_per_refresh: config.max_per_refresh,
            batch_size: config.batch_size,
            batch_delay: config.batch_delay(),
        }
    }
}

impl Default for FillLimits {
    fn default() -> Self {
        Self::from_config(&GeocodingConfig::default())
    }
}

/// Outcome of a backfill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Leads a lookup was attempted for.
    pub attempted: usize,
    /// Leads that received coordinates.
    pub filled: usize,
}

/// Geocode addresses of leads that have no coordinates yet.
///
/// Candidates are taken in list order up to `max_per_refresh` and looked up
/// `batch_size` at a time.
pub async fn fill_missing_coordinates(
    leads: &mut [Lead],
    geocoder: &Geocoder,
    limits: &FillLimits,
) -> FillReport {
    let candidates: Vec<usize> = leads
        .iter()
        .enumerate()
        .filter(|(_, lead)| lead.needs_geocoding())
        .map(|(i, _)| i)
        .take(limits.max_per_refresh)
        .collect();

    let mut report = FillReport {
        attempted: candidates.len(),
        filled: 0,
    };
    if candidates.is_empty() {
        return report;
    }

    info!(candidates = candidates.len(), "Geocoding leads without coordinates");

    for (n, batch) in candidates.chunks(limits.batch_size.max(1)).enumerate() {
        if n > 0 {
            tokio::time::sleep(limits.batch_delay).await;
        }

        let lookups = batch.iter().map(|&i| {
            let address = leads[i].address.clone();
            async move { (i, geocoder.geocode(&address).await) }
        });
        let results = join_all(lookups).await;

        for (i, result) in results {
            match result {
                Some(found) => {
                    leads[i].coordinates = Some(found.coordinates);
                    report.filled += 1;
                }
                None => debug!(company = %leads[i].company, "Could not geocode lead address"),
            }
        }
    }

    info!(
        attempted = report.attempted,
        filled = report.filled,
        "Geocoding pass finished"
    );
    report
}
