//! Batch orchestration.
//!
//! Walks every detection of every image through the gate → crop → classify →
//! merge sequence. The classifier handle is held mutably for the whole batch,
//! one inference at a time. Failure isolation lives here and nowhere else: a
//! missing or undecodable image skips that image's detections and the batch
//! keeps going.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::classify::{rank_scores, ClassifierBackend};
use crate::config::{ClassifyConfig, InferenceErrorPolicy};
use crate::geometry::compute_crop;
use crate::imageio;
use crate::record::DetectionResult;
use crate::select::should_classify;

/// Per-run counters reported after the batch completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub images_total: usize,
    pub images_failed: usize,
    pub detections_classified: usize,
    pub detections_failed: usize,
}

/// Classify every qualifying detection in `result`, in place.
///
/// Image and detection order is never changed; already-classified detections
/// are left untouched, so running this twice with the same settings is
/// equivalent to running it once.
pub fn classify_boxes(
    result: &mut DetectionResult,
    backend: &mut dyn ClassifierBackend,
    cfg: &ClassifyConfig,
) -> Result<BatchSummary> {
    cfg.validate()?;

    let mut summary = BatchSummary {
        images_total: result.images.len(),
        ..BatchSummary::default()
    };

    for image in &mut result.images {
        let path = resolve_image_path(&cfg.image_base_directory, &image.file);
        let loaded = match imageio::load_rgb(&path) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("skipping image {}: {:#}", path.display(), e);
                summary.images_failed += 1;
                continue;
            }
        };

        for detection in &mut image.detections {
            if !should_classify(
                detection,
                cfg.confidence_threshold,
                &cfg.detection_category_whitelist,
            ) {
                continue;
            }

            let rect = compute_crop(
                detection.bbox,
                loaded.width,
                loaded.height,
                cfg.padding_factor,
            );
            let crop = loaded.crop(&rect);

            let scores = match backend.classify(&crop, rect.width(), rect.height()) {
                Ok(scores) => scores,
                Err(e) => match cfg.inference_error_policy {
                    InferenceErrorPolicy::Skip => {
                        log::warn!(
                            "skipping box {:?} in {}: {:#}",
                            detection.bbox,
                            image.file,
                            e
                        );
                        summary.detections_failed += 1;
                        continue;
                    }
                    InferenceErrorPolicy::Abort => {
                        return Err(e).with_context(|| {
                            format!("classifier failed on box {:?} in {}", detection.bbox, image.file)
                        });
                    }
                },
            };

            let ranked = rank_scores(&scores);
            detection.merge_top_classes(&ranked, cfg.num_annotated_classes);
            summary.detections_classified += 1;
        }
    }

    Ok(summary)
}

fn resolve_image_path(base_directory: &str, file: &str) -> PathBuf {
    if base_directory.is_empty() {
        PathBuf::from(file)
    } else {
        Path::new(base_directory).join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_directory_when_configured() {
        assert_eq!(
            resolve_image_path("/data/images", "cam1/a.jpg"),
            PathBuf::from("/data/images/cam1/a.jpg")
        );
    }

    #[test]
    fn empty_base_directory_uses_path_as_is() {
        assert_eq!(
            resolve_image_path("", "cam1/a.jpg"),
            PathBuf::from("cam1/a.jpg")
        );
    }
}
