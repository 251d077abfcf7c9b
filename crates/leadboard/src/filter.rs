//! Lead selection by state, company and distance.

use tracing::debug;

use crate::geo::haversine_miles;
use crate::lead::{Coordinates, Lead, ScoredLead};
use crate::states;

/// Radius used when none (or nonsense) is given.
pub const DEFAULT_RADIUS_MILES: f64 = 50.0;

/// Picker value meaning "no state filter".
pub const ALL_STATES: &str = "All States";

/// Leads located in `state` (full name).
///
/// No state, an empty string or [`ALL_STATES`] selects everything.
#[must_use]
pub fn by_state(leads: &[Lead], state: Option<&str>) -> Vec<Lead> {
    match state.map(str::trim) {
        None | Some("" | ALL_STATES) => leads.to_vec(),
        Some(state) => {
            let matched: Vec<Lead> = leads
                .iter()
                .filter(|l| states::address_in_state(&l.address, state))
                .cloned()
                .collect();
            debug!(state, matched = matched.len(), "Filtered leads by state");
            matched
        }
    }
}

/// Leads whose company name contains `term` (case-insensitive).
#[must_use]
pub fn by_company(leads: &[Lead], term: &str) -> Vec<Lead> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return leads.to_vec();
    }
    leads
        .iter()
        .filter(|l| l.company.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

/// Leads within `radius_miles` of `center`, nearest first.
#[must_use]
pub fn within_radius(leads: &[Lead], center: Coordinates, radius_miles: f64) -> Vec<ScoredLead> {
    let mut scored: Vec<ScoredLead> = leads
        .iter()
        .filter_map(|lead| {
            let distance_miles = haversine_miles(center, lead.coordinates?);
            (distance_miles <= radius_miles).then(|| ScoredLead {
                lead: lead.clone(),
                distance_miles,
            })
        })
        .collect();

    scored.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    scored
}

/// Parse a radius query value, falling back to [`DEFAULT_RADIUS_MILES`].
#[must_use]
pub fn parse_radius(raw: Option<&str>) -> f64 {
    raw.and_then(|r| r.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_MILES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(company: &str, address: &str, coords: Option<(f64, f64)>) -> Lead {
        Lead {
            company: company.to_string(),
            address: address.to_string(),
            coordinates: coords.and_then(|(lat, lon)| Coordinates::new(lat, lon)),
            ..Lead::default()
        }
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead("Acme Steel", "Pittsburgh, PA 15201", Some((40.4406, -79.9959))),
            lead("Globex", "Austin, TX", Some((30.2672, -97.7431))),
            lead("Initech", "Round Rock, Texas", Some((30.5083, -97.6789))),
            lead("Umbrella", "Somewhere", None),
        ]
    }

    #[test]
    fn test_by_state_all() {
        let leads = sample();
        assert_eq!(by_state(&leads, None).len(), 4);
        assert_eq!(by_state(&leads, Some("")).len(), 4);
        assert_eq!(by_state(&leads, Some("All States")).len(), 4);
    }

    #[test]
    fn test_by_state_matches_name_and_abbreviation() {
        let texas = by_state(&sample(), Some("Texas"));
        let names: Vec<&str> = texas.iter().map(|l| l.company.as_str()).collect();
        assert_eq!(names, vec!["Globex", "Initech"]);
    }

    #[test]
    fn test_by_state_no_match() {
        assert!(by_state(&sample(), Some("Alaska")).is_empty());
    }

    #[test]
    fn test_by_company() {
        let leads = sample();
        assert_eq!(by_company(&leads, "  ACME ").len(), 1);
        assert_eq!(by_company(&leads, "").len(), 4);
        assert!(by_company(&leads, "zzz").is_empty());
    }

    #[test]
    fn test_within_radius_sorted_nearest_first() {
        let center = Coordinates::new(30.2672, -97.7431).unwrap();
        let found = within_radius(&sample(), center, 50.0);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].lead.company, "Globex");
        assert!(found[0].distance_miles < 0.01);
        assert_eq!(found[1].lead.company, "Initech");
        assert!(found[1].distance_miles > found[0].distance_miles);
    }

    #[test]
    fn test_within_radius_excludes_far_and_unlocated() {
        let center = Coordinates::new(40.4406, -79.9959).unwrap();
        let found = within_radius(&sample(), center, 10.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lead.company, "Acme Steel");
    }

    #[test]
    fn test_parse_radius() {
        assert!((parse_radius(Some("25")) - 25.0).abs() < f64::EPSILON);
        assert!((parse_radius(Some(" 7.5 ")) - 7.5).abs() < f64::EPSILON);
        for bad in [None, Some(""), Some("abc"), Some("0"), Some("-3"), Some("inf"), Some("NaN")] {
            assert!((parse_radius(bad) - DEFAULT_RADIUS_MILES).abs() < f64::EPSILON);
        }
    }
}
