//! Per-detection classification gate.

use std::collections::BTreeSet;

use crate::record::Detection;

/// Decide whether a detection should be sent to the classifier.
///
/// True iff the confidence clears the threshold, the detector category is
/// whitelisted, and the detection has not been classified before. Pure and
/// evaluated independently per detection, so re-runs and any future
/// parallelization see the same outcome regardless of processing order.
pub fn should_classify(
    detection: &Detection,
    confidence_threshold: f32,
    category_whitelist: &BTreeSet<String>,
) -> bool {
    detection.conf >= confidence_threshold
        && category_whitelist.contains(&detection.category)
        && detection.classifications.is_empty()
}
