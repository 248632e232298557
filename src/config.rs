//! Pipeline configuration.
//!
//! All tunables live in one value object passed by reference into the
//! pipeline; there is no process-wide mutable state. The binary builds this
//! from CLI flags, tests build it directly.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.85;
pub const DEFAULT_PADDING_FACTOR: f32 = 1.6;
pub const DEFAULT_NUM_ANNOTATED_CLASSES: usize = 3;
pub const DEFAULT_CATEGORY_WHITELIST: &[&str] = &["1"];

/// What to do when the classifier fails on a single crop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InferenceErrorPolicy {
    /// Log the failure and leave that one detection unclassified.
    #[default]
    Skip,
    /// Propagate the failure and abort the batch without writing output.
    Abort,
}

#[derive(Clone, Debug)]
pub struct ClassifyConfig {
    /// Minimum detection confidence to classify.
    pub confidence_threshold: f32,
    /// Crop enlargement factor applied before classification.
    pub padding_factor: f32,
    /// Number of top-scoring predictions retained per detection.
    pub num_annotated_classes: usize,
    /// Detector category ids eligible for classification.
    pub detection_category_whitelist: BTreeSet<String>,
    /// Prefix joined to each image's relative path. Empty means paths are
    /// used as-is.
    pub image_base_directory: String,
    pub inference_error_policy: InferenceErrorPolicy,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            padding_factor: DEFAULT_PADDING_FACTOR,
            num_annotated_classes: DEFAULT_NUM_ANNOTATED_CLASSES,
            detection_category_whitelist: DEFAULT_CATEGORY_WHITELIST
                .iter()
                .map(|c| c.to_string())
                .collect(),
            image_base_directory: String::new(),
            inference_error_policy: InferenceErrorPolicy::default(),
        }
    }
}

impl ClassifyConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence threshold {} must be within [0, 1]",
                self.confidence_threshold
            ));
        }
        if self.padding_factor < 1.0 {
            return Err(anyhow!(
                "padding factor {} must be at least 1.0, crops may not shrink the box",
                self.padding_factor
            ));
        }
        if self.num_annotated_classes == 0 {
            return Err(anyhow!("number of annotated classes must be at least 1"));
        }
        if self.detection_category_whitelist.is_empty() {
            return Err(anyhow!("detection category whitelist must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ClassifyConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let cfg = ClassifyConfig {
            confidence_threshold: 1.5,
            ..ClassifyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_shrinking_padding_factor() {
        let cfg = ClassifyConfig {
            padding_factor: 0.9,
            ..ClassifyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_top_k() {
        let cfg = ClassifyConfig {
            num_annotated_classes: 0,
            ..ClassifyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_whitelist() {
        let cfg = ClassifyConfig {
            detection_category_whitelist: BTreeSet::new(),
            ..ClassifyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
