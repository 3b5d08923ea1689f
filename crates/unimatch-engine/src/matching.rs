//! Resolving a free-text university/major pair to a knowledge-base entry.

use tracing::debug;
use unimatch_core::MajorCard;

use crate::fuzzy;

/// Minimum fuzzy score for a university or major name to count as a match.
pub const PAIR_MATCH_THRESHOLD: f64 = 70.0;

fn blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Finds the entry best matching `university` and `major`.
///
/// Tries an exact case-insensitive match first, then fuzzy-matches the
/// university and, within it, the major.
pub fn find_best_match<'a>(
    entries: &[(&'a str, &'a MajorCard)],
    university: Option<&str>,
    major: Option<&str>,
) -> Option<(&'a str, &'a MajorCard)> {
    let university = blank(university)?;
    let major = blank(major)?;
    let uni_lower = university.to_lowercase();
    let major_lower = major.to_lowercase();

    let exact = entries.iter().find(|(_, card)| {
        card.university_name().to_lowercase() == uni_lower
            && card.major_name().to_lowercase() == major_lower
    });
    if let Some(&(key, card)) = exact {
        return Some((key, card));
    }

    let uni_names: Vec<&str> = entries
        .iter()
        .filter_map(|(_, card)| card.university.as_deref())
        .collect();
    let uni_hit = fuzzy::extract_one(university, &uni_names)
        .filter(|m| m.score >= PAIR_MATCH_THRESHOLD)?;
    let matched_uni = uni_names[uni_hit.index].to_lowercase();

    let major_names: Vec<&str> = entries
        .iter()
        .filter(|(_, card)| card.university_name().to_lowercase() == matched_uni)
        .filter_map(|(_, card)| card.major.as_deref())
        .collect();
    let major_hit = fuzzy::extract_one(major, &major_names)
        .filter(|m| m.score >= PAIR_MATCH_THRESHOLD)?;
    let matched_major = major_names[major_hit.index].to_lowercase();

    debug!(
        university,
        major,
        uni_score = uni_hit.score,
        major_score = major_hit.score,
        "Fuzzy matched university/major pair"
    );

    entries
        .iter()
        .find(|(_, card)| {
            card.university_name().to_lowercase() == matched_uni
                && card.major_name().to_lowercase() == matched_major
        })
        .copied()
}
