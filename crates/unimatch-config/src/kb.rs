//! Knowledge base of university/major cards.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use unimatch_core::MajorCard;

use crate::ConfigError;

const MAJORS_FILE: &str = "majors.json";
const DISTROS_FILE: &str = "distros.json";
const CALIBRATOR_FILE: &str = "calibrator.json";

/// Admitted-score distribution for one KB entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub mean: f64,
    pub std: f64,
    #[serde(default)]
    pub n: Option<u32>,
}

/// Logistic calibration `sigmoid(a * logit(p) + b)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratorParams {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub majors: BTreeMap<String, MajorCard>,
    pub distros: BTreeMap<String, ScoreDistribution>,
    pub calibrator: Option<CalibratorParams>,
}

fn read_optional<T>(path: &Path) -> Result<Option<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

impl KnowledgeBase {
    pub fn new(majors: BTreeMap<String, MajorCard>) -> Self {
        Self {
            majors,
            ..Default::default()
        }
    }

    /// Loads `majors.json`, `distros.json` and `calibrator.json` from `dir`.
    ///
    /// Missing files leave the corresponding part empty.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let majors = read_optional(&dir.join(MAJORS_FILE))?;
        let distros = read_optional(&dir.join(DISTROS_FILE))?;
        let calibrator = read_optional(&dir.join(CALIBRATOR_FILE))?;

        if majors.is_none() {
            warn!("No {} found in {}", MAJORS_FILE, dir.display());
        }

        let kb = Self {
            majors: majors.unwrap_or_default(),
            distros: distros.unwrap_or_default(),
            calibrator,
        };

        info!(
            majors = kb.majors.len(),
            distros = kb.distros.len(),
            calibrator = kb.calibrator.is_some(),
            "Knowledge base loaded from {}",
            dir.display()
        );

        Ok(kb)
    }

    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MajorCard> {
        self.majors.get(key)
    }

    /// All `(key, card)` pairs in key order.
    pub fn entries(&self) -> Vec<(&str, &MajorCard)> {
        self.majors.iter().map(|(k, c)| (k.as_str(), c)).collect()
    }

    pub fn distro_keys(&self) -> Vec<&str> {
        self.distros.keys().map(|s| s.as_str()).collect()
    }

    /// Sorted unique university names.
    pub fn universities(&self) -> Vec<String> {
        unique_sorted(self.majors.values().filter_map(|c| c.university.as_deref()))
    }

    /// Sorted unique major names.
    pub fn major_names(&self) -> Vec<String> {
        unique_sorted(self.majors.values().filter_map(|c| c.major.as_deref()))
    }

    /// Sorted unique majors offered by `university`, compared case-insensitively.
    pub fn majors_at(&self, university: &str) -> Vec<String> {
        let wanted = university.to_lowercase();
        unique_sorted(
            self.majors
                .values()
                .filter(|c| c.university_name().to_lowercase() == wanted)
                .filter_map(|c| c.major.as_deref()),
        )
    }
}

fn unique_sorted<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MAJORS: &str = r#"{
        "ui-ilkom": {"university": "Universitas Indonesia", "major": "Ilmu Komputer", "ci": 0.9},
        "ui-hukum": {"university": "Universitas Indonesia", "major": "Hukum "},
        "itb-if": {"university": "Institut Teknologi Bandung", "major": "Teknik Informatika"},
        "ugm-hukum": {"university": "Universitas Gadjah Mada", "major": "Hukum"},
        "orphan": {"major": ""}
    }"#;

    fn write_kb(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_full_kb() {
        let dir = write_kb(&[
            (MAJORS_FILE, MAJORS),
            (DISTROS_FILE, r#"{"ui-ilkom": {"mean": 91.5, "std": 2.1, "n": 40}}"#),
            (CALIBRATOR_FILE, r#"{"a": 1.2, "b": -0.3}"#),
        ]);
        let kb = KnowledgeBase::load_from_dir(dir.path()).unwrap();
        assert_eq!(kb.majors.len(), 5);
        assert_eq!(kb.distro_keys(), vec!["ui-ilkom"]);
        assert_eq!(kb.calibrator, Some(CalibratorParams { a: 1.2, b: -0.3 }));
        assert_eq!(kb.get("itb-if").unwrap().major_name(), "Teknik Informatika");
    }

    #[test]
    fn test_missing_files_give_empty_kb() {
        let dir = TempDir::new().unwrap();
        let kb = KnowledgeBase::load_from_dir(dir.path()).unwrap();
        assert!(kb.is_empty());
        assert!(kb.distros.is_empty());
        assert!(kb.calibrator.is_none());
    }

    #[test]
    fn test_malformed_majors_is_error() {
        let dir = write_kb(&[(MAJORS_FILE, "{not json")]);
        let err = KnowledgeBase::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_non_numeric_ci_keeps_kb() {
        let dir = write_kb(&[(
            MAJORS_FILE,
            r#"{
                "ui-farmasi": {"university": "Universitas Indonesia", "major": "Farmasi", "ci": "n/a", "competitiveness": "very"},
                "ui-ilkom": {"university": "Universitas Indonesia", "major": "Ilmu Komputer", "ci": 0.9}
            }"#,
        )]);
        let kb = KnowledgeBase::load_from_dir(dir.path()).unwrap();
        assert_eq!(kb.majors.len(), 2);
        let farmasi = kb.get("ui-farmasi").unwrap();
        assert_eq!(farmasi.ci, None);
        assert_eq!(farmasi.competitiveness.as_deref(), Some("very"));
        assert_eq!(kb.get("ui-ilkom").unwrap().ci, Some(0.9));
    }

    #[test]
    fn test_queries() {
        let dir = write_kb(&[(MAJORS_FILE, MAJORS)]);
        let kb = KnowledgeBase::load_from_dir(dir.path()).unwrap();

        assert_eq!(
            kb.universities(),
            vec![
                "Institut Teknologi Bandung",
                "Universitas Gadjah Mada",
                "Universitas Indonesia"
            ]
        );
        assert_eq!(
            kb.major_names(),
            vec!["Hukum", "Ilmu Komputer", "Teknik Informatika"]
        );
        assert_eq!(
            kb.majors_at("universitas indonesia"),
            vec!["Hukum", "Ilmu Komputer"]
        );
        assert!(kb.majors_at("Unknown").is_empty());
    }
}
