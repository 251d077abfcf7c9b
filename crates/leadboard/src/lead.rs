//! Core lead types for leadboard.
//!
//! A [`Lead`] is the flattened form of one SmartSuite record. Leads are only
//! ever held in memory and are replaced wholesale on every refresh.

use serde::{Deserialize, Serialize};

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values that cannot be a real location.
    ///
    /// Returns `None` for non-finite values, values outside ±90/±180, and for
    /// a zero in either component (SmartSuite reports unset locations as zero).
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        if latitude == 0.0 || longitude == 0.0 {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A single lead record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Company name.
    pub company: String,
    /// Single-line address.
    pub address: String,
    /// Location, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Estimated number of new jobs.
    pub estimated_new_jobs: i64,
    /// Activity type label.
    pub activity_type: String,
    /// Timeframe label.
    pub timeframe: String,
    /// Comma-joined site type labels.
    pub site_type: String,
    /// Comma-joined specialized industry site labels.
    pub specialized_industry_site: String,
    /// Comma-joined O*NET industry site labels.
    pub onet_industry_site: String,
    /// Free-text lead summary.
    pub general_lead_summary: String,
    /// Free-text company description.
    pub about: String,
}

impl Lead {
    /// Whether this lead carries valid coordinates.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Whether this lead is a candidate for geocoding.
    #[must_use]
    pub fn needs_geocoding(&self) -> bool {
        self.coordinates.is_none() && !self.address.trim().is_empty()
    }
}

/// A lead matched by a radius search, with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLead {
    /// The matched lead.
    #[serde(flatten)]
    pub lead: Lead,
    /// Distance from the search center in miles.
    pub distance_miles: f64,
}

impl ScoredLead {
    /// Distance formatted with one decimal place.
    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{:.1}", self.distance_miles)
    }
}

/// Count the leads that carry coordinates.
#[must_use]
pub fn count_with_coordinates(leads: &[Lead]) -> usize {
    leads.iter().filter(|l| l.has_coordinates()).count()
}
