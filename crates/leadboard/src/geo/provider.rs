//! Public geocoding services.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::GeocodeResult;
use crate::config::GeocodingConfig;
use crate::error::{Error, Result};
use crate::lead::Coordinates;

/// A service that can turn a place name into coordinates.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Look up `query`.
    ///
    /// `Ok(None)` means the service answered but found nothing.
    async fn lookup(&self, query: &str) -> Result<Option<GeocodeResult>>;
}

fn http_client(config: &GeocodingConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .build()?)
}

/// OpenStreetMap Nominatim search.
#[derive(Debug, Clone)]
pub struct Nominatim {
    http: reqwest::Client,
    base_url: String,
    name: &'static str,
    us_only: bool,
    suffix: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl Nominatim {
    /// Search restricted to the United States (`countrycodes=us`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn us_only(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            name: "nominatim",
            us_only: true,
            suffix: None,
        })
    }

    /// Unrestricted search with `", United States"` appended to the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_country_suffix(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            name: "nominatim-formatted",
            us_only: false,
            suffix: Some(", United States"),
        })
    }
}

#[async_trait]
impl GeocodeProvider for Nominatim {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, query: &str) -> Result<Option<GeocodeResult>> {
        let q = match self.suffix {
            Some(suffix) => format!("{query}{suffix}"),
            None => query.to_string(),
        };
        let mut params = vec![
            ("q", q.as_str()),
            ("format", "json"),
            ("limit", "1"),
            ("addressdetails", "1"),
        ];
        if self.us_only {
            params.push(("countrycodes", "us"));
        }

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::geocode(self.name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::geocode(self.name, format!("HTTP {status}")));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| Error::geocode(self.name, e.to_string()))?;
        debug!(provider = self.name, results = places.len(), "Nominatim answered");

        Ok(places.into_iter().next().and_then(|place| {
            let lat = place.lat.trim().parse().ok()?;
            let lon = place.lon.trim().parse().ok()?;
            Some(GeocodeResult {
                coordinates: Coordinates::new(lat, lon)?,
                display_name: place.display_name,
            })
        }))
    }
}

/// Komoot Photon search.
#[derive(Debug, Clone)]
pub struct Photon {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    #[serde(default)]
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl PhotonProperties {
    fn display_name(&self) -> String {
        [&self.name, &self.state, &self.country]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Photon {
    /// Build a Photon client from the geocoding settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            base_url: config.photon_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for Photon {
    fn name(&self) -> &'static str {
        "photon"
    }

    async fn lookup(&self, query: &str) -> Result<Option<GeocodeResult>> {
        let response = self
            .http
            .get(format!("{}/api/", self.base_url))
            .query(&[("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| Error::geocode("photon", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::geocode("photon", format!("HTTP {status}")));
        }

        let body: PhotonResponse = response
            .json()
            .await
            .map_err(|e| Error::geocode("photon", e.to_string()))?;

        Ok(body.features.into_iter().next().and_then(|feature| {
            let lon = *feature.geometry.coordinates.first()?;
            let lat = *feature.geometry.coordinates.get(1)?;
            Some(GeocodeResult {
                coordinates: Coordinates::new(lat, lon)?,
                display_name: feature.properties.display_name(),
            })
        }))
    }
}
