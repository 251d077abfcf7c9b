//! Dashboard aggregates over a list of leads.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::lead::Lead;
use crate::states;

/// Label → number of leads.
pub type Counts = BTreeMap<String, usize>;

const UNKNOWN: &str = "Unknown";

/// Words that mark an address component as something other than a city.
const NON_CITY_WORDS: [&str; 17] = [
    "street", "avenue", "road", "blvd", "suite", "drive", "lane", "way", "highway", "route",
    "plaza", "court", "building", "floor", "parkway", "pike", "turnpike",
];

/// Headline numbers for the summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of leads.
    pub total_leads: usize,
    /// Sum of estimated new jobs.
    pub total_jobs: i64,
    /// Number of distinct activity types.
    pub total_activity_types: usize,
    /// Jobs per lead, rounded to the nearest integer.
    pub avg_jobs_per_lead: i64,
}

/// All distributions shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Leads per activity type.
    pub activity_counts: Counts,
    /// Leads per timeframe.
    pub timeframe_counts: Counts,
    /// Leads per site type label.
    pub site_type_counts: Counts,
    /// Leads per detected state.
    pub state_counts: Counts,
    /// Leads per detected city.
    pub city_counts: Counts,
}

impl DashboardMetrics {
    /// Compute every distribution for `leads`.
    #[must_use]
    pub fn compute(leads: &[Lead]) -> Self {
        Self {
            activity_counts: activity_counts(leads),
            timeframe_counts: timeframe_counts(leads),
            site_type_counts: site_type_counts(leads),
            state_counts: state_counts(leads),
            city_counts: city_counts(leads),
        }
    }
}

fn label_or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// Leads per activity type.
#[must_use]
pub fn activity_counts(leads: &[Lead]) -> Counts {
    let mut counts = Counts::new();
    for lead in leads {
        *counts.entry(label_or_unknown(&lead.activity_type)).or_default() += 1;
    }
    counts
}

/// Leads per timeframe.
#[must_use]
pub fn timeframe_counts(leads: &[Lead]) -> Counts {
    let mut counts = Counts::new();
    for lead in leads {
        *counts.entry(label_or_unknown(&lead.timeframe)).or_default() += 1;
    }
    counts
}

/// Site type labels, each counted once per lead that carries it.
#[must_use]
pub fn site_type_counts(leads: &[Lead]) -> Counts {
    let mut counts = Counts::new();
    for lead in leads {
        if lead.site_type.is_empty() {
            *counts.entry(UNKNOWN.to_string()).or_default() += 1;
            continue;
        }
        for label in lead.site_type.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            *counts.entry(label.to_string()).or_default() += 1;
        }
    }
    counts
}

/// Leads per state detected from the address.
#[must_use]
pub fn state_counts(leads: &[Lead]) -> Counts {
    let mut counts = Counts::new();
    for state in leads.iter().filter_map(|l| states::detect_state(&l.address)) {
        *counts.entry(state.to_string()).or_default() += 1;
    }
    counts
}

/// Leads per city guessed from the address.
#[must_use]
pub fn city_counts(leads: &[Lead]) -> Counts {
    let mut counts = Counts::new();
    for city in leads.iter().filter_map(|l| city_from_address(&l.address)) {
        *counts.entry(city).or_default() += 1;
    }
    counts
}

/// Guess the city component of a comma-separated address.
#[must_use]
pub fn city_from_address(address: &str) -> Option<String> {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }

    let candidate = if states::is_state_token(parts[1]) {
        parts[0]
    } else if parts.len() >= 3 {
        parts[1]
    } else {
        parts[0]
    };

    let city = clean_city(candidate);
    if is_plausible_city(&city) {
        Some(title_case(&city))
    } else {
        None
    }
}

fn clean_city(raw: &str) -> String {
    let without_number = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) if idx > 0 && raw[idx..].starts_with(char::is_whitespace) => &raw[idx..],
        _ => raw,
    };
    let city = without_number.split_whitespace().collect::<Vec<_>>().join(" ");

    let cut = city.len().saturating_sub(" county".len());
    if city.is_char_boundary(cut) && city[cut..].eq_ignore_ascii_case(" county") {
        city[..cut].trim().to_string()
    } else {
        city
    }
}

fn is_plausible_city(city: &str) -> bool {
    let lower = city.to_lowercase();
    if states::is_state_token(city) || matches!(lower.as_str(), "united states" | "usa" | "us") {
        return false;
    }
    if city.chars().count() <= 2 || city.chars().all(|c| c.is_ascii_digit()) || city == "N/A" {
        return false;
    }
    !NON_CITY_WORDS.iter().any(|word| lower.contains(word))
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Headline numbers for `leads`.
#[must_use]
pub fn summarize(leads: &[Lead]) -> Summary {
    let total_leads = leads.len();
    let total_jobs = leads
        .iter()
        .map(|l| l.estimated_new_jobs)
        .fold(0i64, i64::saturating_add);

    Summary {
        total_leads,
        total_jobs,
        total_activity_types: activity_counts(leads).len(),
        avg_jobs_per_lead: rounded_average(total_jobs, total_leads),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn rounded_average(total: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as i64
}

/// Entries ordered by count descending, ties broken by label.
#[must_use]
pub fn sorted_desc(counts: &Counts) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lead(address: &str, activity: &str, site_type: &str, jobs: i64) -> Lead {
        Lead {
            address: address.to_string(),
            activity_type: activity.to_string(),
            site_type: site_type.to_string(),
            estimated_new_jobs: jobs,
            ..Lead::default()
        }
    }

    fn counts(pairs: &[(&str, usize)]) -> Counts {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_activity_counts_with_unknown() {
        let leads = vec![
            lead("", "Expansion", "", 0),
            lead("", "Expansion", "", 0),
            lead("", "", "", 0),
        ];
        assert_eq!(
            activity_counts(&leads),
            counts(&[("Expansion", 2), ("Unknown", 1)])
        );
    }

    #[test]
    fn test_timeframe_counts() {
        let dated = Lead {
            timeframe: "2025".to_string(),
            ..Lead::default()
        };
        let leads = vec![dated, Lead::default()];
        assert_eq!(timeframe_counts(&leads), counts(&[("2025", 1), ("Unknown", 1)]));
    }

    #[test]
    fn test_site_type_counts_split() {
        let leads = vec![
            lead("", "", "Manufacturing, Warehouse", 0),
            lead("", "", "Warehouse", 0),
            lead("", "", "Office, ", 0),
            lead("", "", "", 0),
        ];
        assert_eq!(
            site_type_counts(&leads),
            counts(&[
                ("Manufacturing", 1),
                ("Office", 1),
                ("Unknown", 1),
                ("Warehouse", 2)
            ])
        );
    }

    #[test]
    fn test_state_counts() {
        let leads = vec![
            lead("Austin, TX", "", "", 0),
            lead("Dallas, TX 75201", "", "", 0),
            lead("Nowhere", "", "", 0),
        ];
        assert_eq!(state_counts(&leads), counts(&[("Texas", 2)]));
    }

    #[test]
    fn test_city_from_address() {
        assert_eq!(city_from_address("Austin, TX"), Some("Austin".to_string()));
        assert_eq!(
            city_from_address("100 Main St, philadelphia, PA 19104"),
            Some("Philadelphia".to_string())
        );
        assert_eq!(
            city_from_address("New Castle County, Delaware"),
            Some("New Castle".to_string())
        );
        assert_eq!(
            city_from_address("12 fort   worth, Texas"),
            Some("Fort Worth".to_string())
        );
    }

    #[test]
    fn test_city_from_address_rejections() {
        assert_eq!(city_from_address("Austin"), None);
        assert_eq!(city_from_address("Texas, USA"), None);
        assert_eq!(city_from_address("1 Main St, 90210, CA"), None);
        assert_eq!(city_from_address("12 Oak Street, Suite 4, Boise"), None);
        assert_eq!(city_from_address("Site, United States, 123"), None);
        assert_eq!(city_from_address("NY, NY"), None);
    }

    #[test]
    fn test_city_counts() {
        let leads = vec![
            lead("Austin, TX", "", "", 0),
            lead("austin, Texas", "", "", 0),
            lead("1 Elm Rd, Denver, CO", "", "", 0),
        ];
        assert_eq!(city_counts(&leads), counts(&[("Austin", 2), ("Denver", 1)]));
    }

    #[test]
    fn test_summarize() {
        let leads = vec![
            lead("", "A", "", 10),
            lead("", "B", "", 5),
            lead("", "", "", 0),
        ];
        assert_eq!(
            summarize(&leads),
            Summary {
                total_leads: 3,
                total_jobs: 15,
                total_activity_types: 3,
                avg_jobs_per_lead: 5,
            }
        );
    }

    #[test]
    fn test_summarize_rounds_and_handles_empty() {
        let leads = vec![lead("", "", "", 3), lead("", "", "", 2)];
        assert_eq!(summarize(&leads).avg_jobs_per_lead, 3);
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_summarize_saturates_job_total() {
        let leads = vec![lead("", "A", "", i64::MAX), lead("", "B", "", 1)];
        let summary = summarize(&leads);
        assert_eq!(summary.total_jobs, i64::MAX);
        assert_eq!(summary.total_leads, 2);
        assert!(summary.avg_jobs_per_lead > 0);
    }

    #[test]
    fn test_sorted_desc() {
        let c = counts(&[("b", 2), ("a", 2), ("c", 5), ("d", 1)]);
        assert_eq!(sorted_desc(&c), vec![("c", 5), ("a", 2), ("b", 2), ("d", 1)]);
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let metrics = DashboardMetrics::compute(&[lead("Austin, TX", "New", "Plant", 1)]);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["activityCounts"]["New"], 1);
        assert_eq!(json["siteTypeCounts"]["Plant"], 1);
        assert_eq!(json["stateCounts"]["Texas"], 1);
        assert_eq!(json["cityCounts"]["Austin"], 1);
    }
}
