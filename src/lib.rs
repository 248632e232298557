//! boxtag - fine-grained classification for detector bounding boxes.
//!
//! Takes the JSON produced by an upstream object detector, crops each
//! qualifying bounding box out of its source image with square context
//! padding, runs a classifier on the crop, and merges the top-K predictions
//! back into the detection record. Everything else in the input structure is
//! preserved, and a re-run never recomputes a detection that already carries
//! classifications.
//!
//! Pipeline per detection: [`select::should_classify`] gates on confidence,
//! category whitelist, and prior classification; [`geometry::compute_crop`]
//! turns the normalized box into a padded, clipped pixel rectangle;
//! [`imageio::LoadedImage::crop`] extracts the pixels; a
//! [`classify::ClassifierBackend`] scores the crop; and
//! [`record::Detection::merge_top_classes`] writes the ranked result back.
//! [`pipeline::classify_boxes`] sequences the whole batch and isolates
//! per-image load failures.

pub mod classify;
pub mod config;
pub mod geometry;
pub mod imageio;
pub mod pipeline;
pub mod record;
pub mod select;

pub use classify::{rank_scores, ClassifierBackend, StubBackend};
pub use config::{ClassifyConfig, InferenceErrorPolicy};
pub use geometry::{compute_crop, CropRect};
pub use pipeline::{classify_boxes, BatchSummary};
pub use record::{read_class_list, Classification, Detection, DetectionResult, ImageRecord};
pub use select::should_classify;

#[cfg(feature = "backend-tract")]
pub use classify::TractBackend;
