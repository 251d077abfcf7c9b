//! US state table and address-based state detection.

use lazy_static::lazy_static;
use regex::Regex;

/// The 50 US states as `(abbreviation, full name)` pairs.
pub const US_STATES: [(&str, &str); 50] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

lazy_static! {
    static ref ABBR_WITH_ZIP: Regex = Regex::new(r"^([A-Z]{2})\s+\d{5}").expect("valid regex");
    static ref ABBR_ONLY: Regex = Regex::new(r"^([A-Z]{2})$").expect("valid regex");
}

/// Full state name for a two-letter abbreviation (exact, uppercase).
#[must_use]
pub fn name_for_abbr(abbr: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(a, _)| *a == abbr)
        .map(|(_, name)| *name)
}

/// Abbreviation for a full state name (case-insensitive).
#[must_use]
pub fn abbr_for_name(name: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|(abbr, _)| *abbr)
}

/// All state names in alphabetical order.
#[must_use]
pub fn all_names_sorted() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = US_STATES.iter().map(|(_, name)| *name).collect();
    names.sort_unstable();
    names
}

/// Whether `token` is a state name or abbreviation (case-insensitive).
#[must_use]
pub fn is_state_token(token: &str) -> bool {
    let token = token.trim();
    US_STATES
        .iter()
        .any(|(abbr, name)| abbr.eq_ignore_ascii_case(token) || name.eq_ignore_ascii_case(token))
}

/// Best-effort detection of the state an address is in.
///
/// Looks at the trailing `"ST 12345"` / `"ST"` component first, then the
/// second-to-last component, and finally scans the whole address for a state
/// name or a delimited abbreviation.
#[must_use]
pub fn detect_state(address: &str) -> Option<&'static str> {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }

    let last = parts[parts.len() - 1];
    let trailing = ABBR_WITH_ZIP
        .captures(last)
        .or_else(|| ABBR_ONLY.captures(last))
        .and_then(|caps| caps.get(1))
        .and_then(|m| name_for_abbr(m.as_str()));
    if trailing.is_some() {
        return trailing;
    }

    if parts.len() >= 3 {
        let second_last = parts[parts.len() - 2];
        if let Some(name) = ABBR_ONLY
            .captures(second_last)
            .and_then(|caps| caps.get(1))
            .and_then(|m| name_for_abbr(m.as_str()))
        {
            return Some(name);
        }
        if let Some((_, name)) = US_STATES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(second_last))
        {
            return Some(name);
        }
    }

    let lower = address.to_lowercase();
    US_STATES
        .iter()
        .find(|(abbr, name)| {
            let abbr = abbr.to_lowercase();
            lower.contains(&name.to_lowercase())
                || lower.contains(&format!(", {abbr},"))
                || lower.contains(&format!(", {abbr} "))
        })
        .map(|(_, name)| *name)
}

/// Whether an address belongs to the given state (full name).
///
/// Matches the full name anywhere (case-insensitive) or the abbreviation as a
/// comma-delimited component.
#[must_use]
pub fn address_in_state(address: &str, state_name: &str) -> bool {
    if address.to_lowercase().contains(&state_name.to_lowercase()) {
        return true;
    }

    abbr_for_name(state_name).is_some_and(|abbr| {
        address.contains(&format!(", {abbr} "))
            || address.contains(&format!(", {abbr},"))
            || address.ends_with(&format!(", {abbr}"))
    })
}
