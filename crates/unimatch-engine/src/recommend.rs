//! Ranking knowledge-base majors into preferred picks and alternatives.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::info;
use unimatch_config::KnowledgeBase;
use unimatch_core::{
    decision_label, Bucket, Features, Label, MajorCard, RecommendTargets, UnimatchError,
};

use crate::fuzzy;
use crate::matching::find_best_match;
use crate::scoring::{guess_program, score_components, ScoreComponents};

/// Minimum fuzzy score for a target major to select a KB key.
const KEY_MATCH_THRESHOLD: f64 = 80.0;
const KEY_MATCH_LIMIT: usize = 80;

/// Output sizing for [`recommend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendParams {
    pub pref_n: usize,
    pub alt_n: usize,
    pub per_uni: usize,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            pref_n: 10,
            alt_n: 10,
            per_uni: 2,
        }
    }
}

/// A scored KB entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub key: String,
    pub university: Option<String>,
    pub major: Option<String>,
    pub level: Option<String>,
    pub sheet: Option<String>,
    pub ci: Option<f64>,
    pub competitiveness: Option<String>,
    pub probability: f64,
    pub bucket: Bucket,
    pub tags: Vec<String>,
    pub components: ScoreComponents,
    pub label: Label,
}

impl Recommendation {
    fn new(key: &str, card: &MajorCard, features: &Features) -> Self {
        let scored = score_components(features, card);
        Self {
            key: key.to_string(),
            university: card.university.clone(),
            major: card.major.clone(),
            level: card.level.clone(),
            sheet: card.sheet.clone(),
            ci: card.ci,
            competitiveness: card.competitiveness.clone(),
            probability: scored.probability,
            bucket: Bucket::from_probability(scored.probability),
            tags: scored.tags,
            components: scored.components,
            label: decision_label(scored.probability),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendResult {
    pub preferred: Vec<Recommendation>,
    pub alternatives: Vec<Recommendation>,
    pub total_considered: usize,
}

fn sort_by_probability(items: &mut [Recommendation]) {
    items.sort_by(|a, b| b.probability.total_cmp(&a.probability));
}

/// Keeps the best `per_uni` items of each university, then re-sorts.
fn top_per_university(mut items: Vec<Recommendation>, per_uni: usize) -> Vec<Recommendation> {
    sort_by_probability(&mut items);
    let mut seen: HashMap<Option<String>, usize> = HashMap::new();
    let mut kept: Vec<Recommendation> = items
        .into_iter()
        .filter(|item| {
            let count = seen.entry(item.university.clone()).or_default();
            *count += 1;
            *count <= per_uni
        })
        .collect();
    sort_by_probability(&mut kept);
    kept
}

/// Keys matched by positional university/major pairs.
fn match_pairs(pool: &[(&str, &MajorCard)], targets: &RecommendTargets) -> BTreeSet<String> {
    targets
        .universities
        .iter()
        .zip(&targets.majors)
        .filter_map(|(uni, major)| {
            find_best_match(pool, Some(uni.as_str()), Some(major.as_str()))
        })
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Keys fuzzy-matching any target major.
fn match_keys(pool: &[(&str, &MajorCard)], majors: &[String]) -> BTreeSet<String> {
    let keys: Vec<&str> = pool.iter().map(|(k, _)| *k).collect();
    majors
        .iter()
        .flat_map(|query| fuzzy::extract(query, &keys, KEY_MATCH_LIMIT))
        .filter(|m| m.score >= KEY_MATCH_THRESHOLD)
        .map(|m| keys[m.index].to_string())
        .collect()
}

/// Scores the program-compatible KB entries and splits them into preferred and alternatives.
pub fn recommend(
    kb: &KnowledgeBase,
    features: &Features,
    targets: &RecommendTargets,
    params: RecommendParams,
) -> Result<RecommendResult, UnimatchError> {
    if kb.is_empty() {
        return Err(UnimatchError::KnowledgeBaseMissing);
    }

    let pool: Vec<(&str, &MajorCard)> = kb
        .entries()
        .into_iter()
        .filter(|(_, card)| {
            guess_program(card.major_name()).map_or(true, |p| p == features.program)
        })
        .collect();

    let mut keep = BTreeSet::new();
    if !targets.universities.is_empty() && !targets.majors.is_empty() {
        keep = match_pairs(&pool, targets);
    }
    if keep.is_empty() && !targets.majors.is_empty() {
        keep = match_keys(&pool, &targets.majors);
    }

    let (preferred, others): (Vec<_>, Vec<_>) = pool
        .iter()
        .map(|(key, card)| Recommendation::new(key, card, features))
        .partition(|item| keep.contains(&item.key));

    let mut preferred = top_per_university(preferred, params.per_uni);
    let mut alternatives = top_per_university(others, params.per_uni);
    preferred.truncate(params.pref_n);
    alternatives.truncate(params.alt_n);

    info!(
        pool = pool.len(),
        preferred = preferred.len(),
        alternatives = alternatives.len(),
        "Recommendations ranked"
    );

    Ok(RecommendResult {
        preferred,
        alternatives,
        total_considered: pool.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use unimatch_core::{Accreditation, Achievement, Competitiveness, Program};

    fn card(university: &str, major: &str, ci: f64) -> MajorCard {
        MajorCard {
            university: Some(university.into()),
            major: Some(major.into()),
            ci: Some(ci),
            ..Default::default()
        }
    }

    fn kb() -> KnowledgeBase {
        let mut majors = BTreeMap::new();
        for (uni, major, ci) in [
            ("Institut Teknologi Bandung", "Teknik Informatika", 1.0),
            ("Institut Teknologi Bandung", "Teknik Elektro", 0.8),
            ("Institut Teknologi Bandung", "Teknik Sipil", 0.4),
            ("Universitas Indonesia", "Kedokteran", 0.9),
            ("Universitas Indonesia", "Akuntansi", 0.7),
            ("Universitas Gadjah Mada", "Seni Rupa", 0.2),
        ] {
            majors.insert(format!("{} - {}", uni, major), card(uni, major, ci));
        }
        KnowledgeBase::new(majors)
    }

    fn features() -> Features {
        Features {
            program: Program::Saintek,
            target_major: None,
            target_university: None,
            competitiveness: Competitiveness::High,
            rapor_avg: 88.0,
            core_avg: 86.0,
            rank_percentile: Some(15),
            achievement: Achievement::School,
            accreditation: Accreditation::A,
        }
    }

    #[test]
    fn test_empty_kb_is_error() {
        let res = recommend(
            &KnowledgeBase::default(),
            &features(),
            &RecommendTargets::default(),
            RecommendParams::default(),
        );
        assert!(matches!(res, Err(UnimatchError::KnowledgeBaseMissing)));
    }

    #[test]
    fn test_pool_filters_other_program() {
        let res = recommend(
            &kb(),
            &features(),
            &RecommendTargets::default(),
            RecommendParams::default(),
        )
        .unwrap();
        // Akuntansi is soshum; Seni Rupa has no known track and stays
        assert_eq!(res.total_considered, 5);
        assert!(res.preferred.is_empty());
        assert!(res
            .alternatives
            .iter()
            .all(|r| r.major.as_deref() != Some("Akuntansi")));
    }

    #[test]
    fn test_per_university_cap_and_order() {
        let res = recommend(
            &kb(),
            &features(),
            &RecommendTargets::default(),
            RecommendParams::default(),
        )
        .unwrap();
        let itb = res
            .alternatives
            .iter()
            .filter(|r| r.university.as_deref() == Some("Institut Teknologi Bandung"))
            .count();
        assert_eq!(itb, 2);
        assert_eq!(res.alternatives.len(), 4);
        assert!(res
            .alternatives
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
        // lowest ci means lowest penalty, so highest chance
        assert_eq!(res.alternatives[0].major.as_deref(), Some("Seni Rupa"));
        assert_eq!(res.alternatives[0].bucket, Bucket::Safe);
    }

    #[test]
    fn test_pair_targets_become_preferred() {
        let targets = RecommendTargets {
            universities: vec!["ITB Institut Teknologi Bandung".into()],
            majors: vec!["Informatika".into()],
        };
        let res = recommend(&kb(), &features(), &targets, RecommendParams::default()).unwrap();
        assert_eq!(res.preferred.len(), 1);
        assert_eq!(
            res.preferred[0].key,
            "Institut Teknologi Bandung - Teknik Informatika"
        );
        assert!(res.alternatives.iter().all(|r| r.key != res.preferred[0].key));
    }

    #[test]
    fn test_major_only_targets_match_keys() {
        let targets = RecommendTargets {
            universities: vec![],
            majors: vec!["Kedokteran".into()],
        };
        let res = recommend(&kb(), &features(), &targets, RecommendParams::default()).unwrap();
        assert_eq!(res.preferred.len(), 1);
        assert_eq!(res.preferred[0].key, "Universitas Indonesia - Kedokteran");
    }

    #[test]
    fn test_truncation() {
        let params = RecommendParams {
            pref_n: 0,
            alt_n: 1,
            per_uni: 5,
        };
        let res = recommend(&kb(), &features(), &RecommendTargets::default(), params).unwrap();
        assert_eq!(res.alternatives.len(), 1);
        assert_eq!(res.total_considered, 5);
    }
}
