//! Student request payload and derived scoring features.

use serde::{Deserialize, Serialize};

use crate::{Accreditation, Achievement, Competitiveness, Program, UnimatchError};

/// Body of `/api/predict` and `/api/recommend`.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub program: Program,
    #[serde(default)]
    pub target_major: Option<String>,
    #[serde(default)]
    pub target_university: Option<String>,
    #[serde(default)]
    pub competitiveness: Competitiveness,

    // Semester report averages
    #[serde(default)]
    pub s1: Option<f64>,
    #[serde(default)]
    pub s2: Option<f64>,
    #[serde(default)]
    pub s3: Option<f64>,
    #[serde(default)]
    pub s4: Option<f64>,
    #[serde(default)]
    pub s5: Option<f64>,

    // Subject scores
    #[serde(default)]
    pub math: Option<f64>,
    #[serde(default)]
    pub language: Option<f64>,
    #[serde(default)]
    pub physics: Option<f64>,
    #[serde(default)]
    pub chemistry: Option<f64>,
    #[serde(default)]
    pub biology: Option<f64>,
    #[serde(default)]
    pub economics: Option<f64>,
    #[serde(default)]
    pub geography: Option<f64>,
    #[serde(default)]
    pub history: Option<f64>,

    /// Class rank percentile, 1 is the top of the class.
    #[serde(default)]
    pub rank_percentile: Option<u32>,
    #[serde(default)]
    pub achievement: Achievement,
    #[serde(default)]
    pub accreditation: Accreditation,

    // Multi-target and legacy form fields
    #[serde(default)]
    pub target_university_1: Option<String>,
    #[serde(default)]
    pub target_major_1: Option<String>,
    #[serde(default)]
    pub target_majors: Vec<String>,
    #[serde(default)]
    pub target_universities: Vec<String>,
}

/// Cleaned target lists used by the recommender.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendTargets {
    pub universities: Vec<String>,
    pub majors: Vec<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl PredictRequest {
    fn grades(&self) -> [(&'static str, Option<f64>); 13] {
        [
            ("s1", self.s1),
            ("s2", self.s2),
            ("s3", self.s3),
            ("s4", self.s4),
            ("s5", self.s5),
            ("math", self.math),
            ("language", self.language),
            ("physics", self.physics),
            ("chemistry", self.chemistry),
            ("biology", self.biology),
            ("economics", self.economics),
            ("geography", self.geography),
            ("history", self.history),
        ]
    }

    /// Checks grade and rank ranges.
    pub fn validate(&self) -> Result<(), UnimatchError> {
        for (name, value) in self.grades() {
            let Some(v) = value else { continue };
            if !(0.0..=100.0).contains(&v) {
                return Err(UnimatchError::InvalidPayload(format!(
                    "{} must be between 0 and 100, got {}",
                    name, v
                )));
            }
        }

        if let Some(rank) = self.rank_percentile {
            if !(1..=100).contains(&rank) {
                return Err(UnimatchError::InvalidPayload(format!(
                    "rank_percentile must be between 1 and 100, got {}",
                    rank
                )));
            }
        }

        Ok(())
    }

    /// Resolves the single target used by `/api/predict`.
    ///
    /// A complete `target_university_1`/`target_major_1` pair wins over the
    /// plain fields; otherwise the first of `target_majors` fills a missing major.
    pub fn normalize_for_predict(&mut self) {
        if let (Some(uni), Some(major)) = (
            non_blank(&self.target_university_1).map(String::from),
            non_blank(&self.target_major_1).map(String::from),
        ) {
            self.target_university = Some(uni);
            self.target_major = Some(major);
            return;
        }

        if non_blank(&self.target_major).is_none() {
            if let Some(first) = self.target_majors.first() {
                self.target_major = Some(first.clone());
            }
        }
    }

    /// Cleans the target lists and backfills the single target fields from them.
    pub fn normalize_for_recommend(&mut self) -> RecommendTargets {
        let targets = RecommendTargets {
            universities: clean_list(&self.target_universities),
            majors: clean_list(&self.target_majors),
        };

        if non_blank(&self.target_major).is_none() {
            if let Some(first) = targets.majors.first() {
                self.target_major = Some(first.clone());
            }
        }
        if non_blank(&self.target_university).is_none() {
            if let Some(first) = targets.universities.first() {
                self.target_university = Some(first.clone());
            }
        }

        targets
    }
}

/// Mean of the present values, `None` when all are missing.
pub fn average(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Scoring inputs derived from a [`PredictRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    pub program: Program,
    pub target_major: Option<String>,
    pub target_university: Option<String>,
    pub competitiveness: Competitiveness,
    pub rapor_avg: f64,
    pub core_avg: f64,
    pub rank_percentile: Option<u32>,
    pub achievement: Achievement,
    pub accreditation: Accreditation,
}

impl Features {
    pub fn from_request(req: &PredictRequest) -> Self {
        let rapor_avg = average(&[req.s1, req.s2, req.s3, req.s4, req.s5]).unwrap_or(0.0);

        let core = match req.program {
            Program::Saintek => [req.math, req.language, req.physics, req.chemistry, req.biology],
            Program::Soshum => [req.math, req.language, req.economics, req.geography, req.history],
        };
        let core_avg = average(&core).unwrap_or(rapor_avg);

        Self {
            program: req.program,
            target_major: req.target_major.clone(),
            target_university: req.target_university.clone(),
            competitiveness: req.competitiveness,
            rapor_avg,
            core_avg,
            rank_percentile: req.rank_percentile,
            achievement: req.achievement,
            accreditation: req.accreditation,
        }
    }

    /// Rank percentile with a missing rank treated as the bottom of the class.
    pub fn rank_or_default(&self) -> u32 {
        self.rank_percentile.unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PredictRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = parse(r#"{"program": "soshum"}"#);
        assert_eq!(req.competitiveness, Competitiveness::High);
        assert_eq!(req.achievement, Achievement::None);
        assert_eq!(req.accreditation, Accreditation::B);
        assert!(req.target_majors.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_program_is_rejected() {
        assert!(serde_json::from_str::<PredictRequest>(r#"{"s1": 80}"#).is_err());
    }

    #[test]
    fn test_unknown_enum_is_rejected() {
        let res = serde_json::from_str::<PredictRequest>(
            r#"{"program": "saintek", "achievement": "olympiad"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let req = parse(r#"{"program": "saintek", "math": 101}"#);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("math"));

        let req = parse(r#"{"program": "saintek", "rank_percentile": 0}"#);
        assert!(req.validate().is_err());

        let req = parse(r#"{"program": "saintek", "rank_percentile": 100, "s1": 0}"#);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[Some(80.0), None, Some(90.0)]), Some(85.0));
        assert_eq!(average(&[None, None]), None);
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn test_features_saintek_core() {
        let req = parse(
            r#"{"program": "saintek", "s1": 80, "s2": 90,
                "math": 100, "physics": 90, "economics": 10}"#,
        );
        let f = Features::from_request(&req);
        assert_eq!(f.rapor_avg, 85.0);
        assert_eq!(f.core_avg, 95.0);
    }

    #[test]
    fn test_features_soshum_core() {
        let req = parse(
            r#"{"program": "soshum", "s1": 80, "physics": 10,
                "economics": 70, "history": 90}"#,
        );
        let f = Features::from_request(&req);
        assert_eq!(f.core_avg, 80.0);
    }

    #[test]
    fn test_features_fallbacks() {
        let req = parse(r#"{"program": "saintek", "s3": 77}"#);
        let f = Features::from_request(&req);
        assert_eq!(f.core_avg, 77.0);

        let req = parse(r#"{"program": "saintek"}"#);
        let f = Features::from_request(&req);
        assert_eq!(f.rapor_avg, 0.0);
        assert_eq!(f.core_avg, 0.0);
        assert_eq!(f.rank_or_default(), 100);
    }

    #[test]
    fn test_normalize_for_predict_prefers_numbered_pair() {
        let mut req = parse(
            r#"{"program": "saintek", "target_major": "Fisika",
                "target_university_1": "ITB", "target_major_1": "Informatika",
                "target_majors": ["Kimia"]}"#,
        );
        req.normalize_for_predict();
        assert_eq!(req.target_university.as_deref(), Some("ITB"));
        assert_eq!(req.target_major.as_deref(), Some("Informatika"));
    }

    #[test]
    fn test_normalize_for_predict_falls_back_to_list() {
        let mut req = parse(
            r#"{"program": "saintek", "target_major_1": "Informatika",
                "target_majors": ["Kimia", "Fisika"]}"#,
        );
        req.normalize_for_predict();
        assert_eq!(req.target_major.as_deref(), Some("Kimia"));
        assert!(req.target_university.is_none());

        let mut req = parse(r#"{"program": "saintek", "target_major": "Biologi", "target_majors": ["Kimia"]}"#);
        req.normalize_for_predict();
        assert_eq!(req.target_major.as_deref(), Some("Biologi"));
    }

    #[test]
    fn test_normalize_for_recommend() {
        let mut req = parse(
            r#"{"program": "soshum",
                "target_universities": [" UGM ", "", "UI"],
                "target_majors": ["  ", "Hukum"]}"#,
        );
        let targets = req.normalize_for_recommend();
        assert_eq!(targets.universities, vec!["UGM", "UI"]);
        assert_eq!(targets.majors, vec!["Hukum"]);
        assert_eq!(req.target_major.as_deref(), Some("Hukum"));
        assert_eq!(req.target_university.as_deref(), Some("UGM"));
    }
}
