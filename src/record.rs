//! Detection-result data model.
//!
//! Mirrors the JSON produced by the upstream detection API: a list of images,
//! each with a list of detections. Fields this tool does not understand are
//! captured in `extra` maps and written back untouched, so a round trip never
//! loses data added by other tools in the chain.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of the detection-result structure.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub images: Vec<ImageRecord>,
    /// Classifier output index (as a string) to human-readable class name.
    /// Built once per result; never overwritten on re-runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_categories: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One source image and its detections.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    /// Path relative to the configured image base directory.
    pub file: String,
    pub detections: Vec<Detection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One detector box: coarse category, confidence, normalized bounding box.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub category: String,
    pub conf: f32,
    /// `[x_min, y_min, width, height]`, normalized to [0,1].
    pub bbox: [f32; 4],
    /// Top-K classifier predictions, descending by score. Absent until the
    /// detection has been classified.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single prediction, serialized as `["<class_idx>", score]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Classification(pub String, pub f32);

impl DetectionResult {
    /// Parse a detection-result JSON document.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("malformed detection result JSON")
    }

    /// Build `classification_categories` from an ordered class-name list,
    /// line i of the source becoming index i. A no-op when the field already
    /// exists, so a re-run cannot silently change the index scheme.
    pub fn add_classification_categories(&mut self, class_names: &[String]) {
        if self.classification_categories.is_some() {
            log::warn!("input already contains classification categories, keeping them");
            return;
        }
        let categories = class_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx.to_string(), name.clone()))
            .collect();
        self.classification_categories = Some(categories);
    }
}

impl Detection {
    /// Result merger: store the `k` best-ranked predictions on this detection.
    ///
    /// `ranked` is a full (class index, raw score) ranking, descending by
    /// score. Class indices are stored as strings to match the vocabulary
    /// keys; names are resolved at presentation time, never here.
    pub fn merge_top_classes(&mut self, ranked: &[(usize, f32)], k: usize) {
        self.classifications = ranked
            .iter()
            .take(k)
            .map(|&(idx, score)| Classification(idx.to_string(), score))
            .collect();
    }
}

/// Read the ordered class-name list, one name per line, blank lines dropped.
pub fn read_class_list(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read class list {}", path.display()))?;
    let names: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(anyhow!("class list {} contains no names", path.display()));
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builds_vocabulary_with_zero_based_indices() {
        let mut result = DetectionResult {
            images: vec![],
            classification_categories: None,
            extra: Map::new(),
        };
        result.add_classification_categories(&names(&["wolf", "fox", "deer"]));

        let vocab = result.classification_categories.unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab["0"], "wolf");
        assert_eq!(vocab["1"], "fox");
        assert_eq!(vocab["2"], "deer");
    }

    #[test]
    fn vocabulary_build_is_a_noop_when_present() {
        let mut result = DetectionResult {
            images: vec![],
            classification_categories: None,
            extra: Map::new(),
        };
        result.add_classification_categories(&names(&["wolf"]));
        let first = result.classification_categories.clone();

        result.add_classification_categories(&names(&["fox", "deer"]));
        assert_eq!(result.classification_categories, first);
    }

    #[test]
    fn merge_truncates_to_k_and_stringifies_indices() {
        let mut det = Detection {
            category: "1".to_string(),
            conf: 0.9,
            bbox: [0.1, 0.1, 0.2, 0.2],
            classifications: vec![],
            extra: Map::new(),
        };
        det.merge_top_classes(&[(1, 0.7), (2, 0.2), (0, 0.1)], 2);
        assert_eq!(
            det.classifications,
            vec![
                Classification("1".to_string(), 0.7),
                Classification("2".to_string(), 0.2),
            ]
        );
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = r#"{
            "info": {"detector": "v4.1"},
            "detection_categories": {"1": "animal"},
            "images": [
                {
                    "file": "a.jpg",
                    "meta": 7,
                    "detections": [
                        {"category": "1", "conf": 0.95, "bbox": [0.1, 0.2, 0.3, 0.4], "note": "x"}
                    ]
                }
            ]
        }"#;
        let parsed = DetectionResult::from_json(raw).unwrap();
        assert_eq!(parsed.extra["info"]["detector"], "v4.1");
        assert_eq!(parsed.images[0].extra["meta"], 7);
        assert_eq!(parsed.images[0].detections[0].extra["note"], "x");

        let reserialized = serde_json::to_string(&parsed).unwrap();
        let reparsed = DetectionResult::from_json(&reserialized).unwrap();
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn empty_classifications_are_not_serialized() {
        let raw = r#"{"images": [{"file": "a.jpg", "detections":
            [{"category": "1", "conf": 0.5, "bbox": [0, 0, 0.1, 0.1]}]}]}"#;
        let parsed = DetectionResult::from_json(raw).unwrap();
        let out = serde_json::to_string(&parsed).unwrap();
        assert!(!out.contains("classifications"));
    }

    #[test]
    fn class_list_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "wolf\n\n  \nfox").unwrap();
        let names = read_class_list(file.path()).unwrap();
        assert_eq!(names, vec!["wolf".to_string(), "fox".to_string()]);
    }

    #[test]
    fn empty_class_list_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n \n").unwrap();
        assert!(read_class_list(file.path()).is_err());
    }
}
