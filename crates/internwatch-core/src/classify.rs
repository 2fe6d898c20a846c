//! Heuristics for deciding what a posting is and where it lives.
//!
//! These are substring checks, not NLP. They misfire on purpose-built
//! counterexamples ("International" contains "IN") and that is accepted:
//! the tracker feeds us curated career pages, not arbitrary text.

use chrono::{DateTime, Local, Utc};

use crate::models::Job;

/// Keywords that mark a posting as an internship (matched lowercase)
pub const INTERNSHIP_KEYWORDS: [&str; 5] = ["intern", "internship", "summer 2026", "co-op", "coop"];

/// City names that count as India (plus "Remote", which we give the benefit
/// of the doubt)
pub const INDIA_CITIES: [&str; 16] = [
    "Bangalore",
    "Bengaluru",
    "Hyderabad",
    "Pune",
    "Mumbai",
    "Delhi",
    "Noida",
    "Gurgaon",
    "Gurugram",
    "Chennai",
    "Kolkata",
    "Ahmedabad",
    "Jaipur",
    "Kochi",
    "Chandigarh",
    "Remote",
];

/// Markers that veto a location even when an India hint also matched
pub const INTERNATIONAL_MARKERS: [&str; 10] = [
    "USA",
    "United States",
    "UK",
    "London",
    "Singapore",
    "Dubai",
    "China",
    "Japan",
    "Australia",
    "Canada",
];

/// Does this posting look like an internship?
///
/// True when any keyword appears as a substring of the lowercased title or
/// any lowercased tag. Keyword overlap ("intern" inside "internship") is
/// harmless since one hit is enough.
pub fn is_internship(job: &Job) -> bool {
    let title = job.title.to_lowercase();
    if INTERNSHIP_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return true;
    }
    job.tags
        .iter()
        .map(|tag| tag.to_lowercase())
        .any(|tag| INTERNSHIP_KEYWORDS.iter().any(|kw| tag.contains(kw)))
}

/// Does this location plausibly sit in India?
///
/// Missing or empty locations pass (unknown is not a reason to hide a
/// posting), as does a bare "Remote". Otherwise we want an India city or
/// an "India"/"IND"/"IN" substring, case-sensitive, and no international
/// marker. "Chennai, India and London, UK" fails: the veto wins.
pub fn is_india_location(location: Option<&str>) -> bool {
    let Some(location) = location else {
        return true;
    };
    if location.is_empty() || location == "Remote" {
        return true;
    }

    let has_city = INDIA_CITIES.iter().any(|city| location.contains(city));
    let has_india_hint =
        location.contains("India") || location.contains("IND") || location.contains("IN");
    let is_international = INTERNATIONAL_MARKERS
        .iter()
        .any(|marker| location.contains(marker));

    (has_city || has_india_hint) && !is_international
}

/// Did this timestamp land on today's calendar day, device-local?
pub fn is_today(timestamp: Option<DateTime<Utc>>) -> bool {
    is_today_at(timestamp, Local::now())
}

/// Same check against an explicit reference instant so tests don't depend
/// on the wall clock
pub fn is_today_at(timestamp: Option<DateTime<Utc>>, reference: DateTime<Local>) -> bool {
    match timestamp {
        Some(ts) => ts.with_timezone(&Local).date_naive() == reference.date_naive(),
        None => false,
    }
}
