//! Weighted fuzzy string similarity on a 0..=100 scale.
//!
//! Follows the WRatio strategy: compare whole strings when their lengths are
//! close, otherwise fall back to scaled partial and token-based comparisons.

use std::collections::BTreeSet;

/// A scored candidate from [`extract_one`] or [`extract`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    /// Index into the choices slice.
    pub index: usize,
    pub score: f64,
}

/// Lowercases, turns non-alphanumerics into spaces and collapses whitespace.
fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain edit-distance similarity.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best [`ratio`] of the shorter string against equal-length windows of the longer.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long): (Vec<char>, Vec<char>) = {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.len() <= b.len() { (a, b) } else { (b, a) }
    };

    if short.is_empty() {
        return 0.0;
    }

    let needle: String = short.iter().collect();
    let mut best = 0.0_f64;
    for start in 0..=(long.len() - short.len()) {
        let window: String = long[start..start + short.len()].iter().collect();
        best = best.max(ratio(&needle, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

fn join_tokens<'a, 'b: 'a>(parts: impl Iterator<Item = &'a &'b str>) -> String {
    parts.copied().collect::<Vec<_>>().join(" ")
}

pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a = token_set(a);
    let set_b = token_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let sect = join_tokens(set_a.intersection(&set_b));
    let diff_ab = join_tokens(set_a.difference(&set_b));
    let diff_ba = join_tokens(set_b.difference(&set_a));

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_ab))
            .max(ratio(&sect, &combined_ba));
    }
    best
}

/// Any shared token is a full partial match; otherwise compare sorted tokens.
fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let set_a = token_set(a);
    let set_b = token_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    if set_a.intersection(&set_b).next().is_some() {
        return 100.0;
    }
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Weighted ratio combining plain, partial and token comparisons.
pub fn wratio(a: &str, b: &str) -> f64 {
    const UNBASE_SCALE: f64 = 0.95;

    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let plain = ratio(&a, &b);
    if len_ratio < 1.5 {
        let token = token_sort_ratio(&a, &b).max(token_set_ratio(&a, &b));
        return plain.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = plain.max(partial_ratio(&a, &b) * partial_scale);
    partial.max(partial_token_ratio(&a, &b) * UNBASE_SCALE * partial_scale)
}

/// Best-scoring choice; the earliest wins ties.
pub fn extract_one<S: AsRef<str>>(query: &str, choices: &[S]) -> Option<FuzzyMatch> {
    let mut best: Option<FuzzyMatch> = None;
    for (index, choice) in choices.iter().enumerate() {
        let score = wratio(query, choice.as_ref());
        if best.map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch { index, score });
        }
    }
    best
}

/// Top `limit` choices by descending score.
pub fn extract<S: AsRef<str>>(query: &str, choices: &[S], limit: usize) -> Vec<FuzzyMatch> {
    let mut scored: Vec<FuzzyMatch> = choices
        .iter()
        .enumerate()
        .map(|(index, choice)| FuzzyMatch {
            index,
            score: wratio(query, choice.as_ref()),
        })
        .collect();
    scored.sort_by(|x, y| y.score.total_cmp(&x.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Teknik-Informatika (S1) "), "teknik informatika s1");
    }

    #[test]
    fn test_identical_ignoring_case_and_punctuation() {
        assert_eq!(wratio("Universitas Indonesia", "universitas  indonesia"), 100.0);
        assert_eq!(wratio("Ilmu-Komputer", "ilmu komputer"), 100.0);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(wratio("", "hukum"), 0.0);
        assert_eq!(wratio("---", "hukum"), 0.0);
    }

    #[test]
    fn test_word_order_does_not_matter_much() {
        let score = wratio("Informatika Teknik", "Teknik Informatika");
        assert!(score >= 94.0, "score was {}", score);
    }

    #[test]
    fn test_substring_scores_partial() {
        // len ratio 18/11 puts this on the partial path with a 0.9 scale
        let score = wratio("informatika", "teknik informatika");
        assert!((score - 90.0).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn test_shared_token_on_long_choice() {
        let score = wratio("Hukum", "Universitas Gadjah Mada - Hukum");
        assert!(score >= 80.0, "score was {}", score);
    }

    #[test]
    fn test_very_long_choice_uses_low_partial_scale() {
        // 32/3 length ratio; "ter" sits inside "kedokteran" but shares no token
        let score = wratio("ter", "Universitas Indonesia Kedokteran");
        assert!((score - 60.0).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn test_length_ratio_boundary() {
        // 9/6 is exactly 1.5, so the partial path applies
        let score = wratio("teknik", "teknik ti");
        assert!((score - 90.0).abs() < 1e-9, "score was {}", score);

        // 8/6 stays on the token path
        let score = wratio("teknik", "teknik t");
        assert!((score - 95.0).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn test_unrelated_scores_low() {
        let score = wratio("Kedokteran", "Sastra Jepang");
        assert!(score < 50.0, "score was {}", score);
    }

    #[test]
    fn test_partial_ratio_exact_window() {
        assert_eq!(partial_ratio("abc", "xxabcxx"), 100.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_token_set_subset_is_full() {
        assert_eq!(token_set_ratio("ilmu hukum", "hukum"), 100.0);
    }

    #[test]
    fn test_extract_one_prefers_first_on_tie() {
        let choices = ["Hukum", "Ekonomi", "Hukum"];
        let best = extract_one("hukum", &choices).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.score, 100.0);

        let empty: [&str; 0] = [];
        assert!(extract_one("hukum", &empty).is_none());
    }

    #[test]
    fn test_extract_orders_and_limits() {
        let choices = vec![
            "Sastra Jepang".to_string(),
            "Teknik Informatika".to_string(),
            "Informatika".to_string(),
        ];
        let found = extract("informatika", &choices, 2);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 2);
        assert_eq!(found[1].index, 1);
        assert!(found[0].score >= found[1].score);
    }
}
