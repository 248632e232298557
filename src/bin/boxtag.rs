//! boxtag - apply a fine-grained classifier to detector output
//!
//! Reads the detection JSON, classifies every qualifying box, and writes the
//! augmented JSON. Fatal setup errors (model, class list, malformed input)
//! abort before any processing; per-image load failures are logged skips.

use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use boxtag::{
    classify_boxes, read_class_list, ClassifierBackend, ClassifyConfig, DetectionResult,
    InferenceErrorPolicy, StubBackend,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Serialized classifier model. The model receives an RGB crop scaled to
    /// [0,1] and must embed its own preprocessing.
    classifier_file: PathBuf,
    /// Class-name list, one name per line; line i names classifier output i.
    classes_file: PathBuf,
    /// Detection JSON produced by the detection API.
    detector_json_file: PathBuf,
    /// Output path for the augmented JSON.
    output_json_file: PathBuf,
    /// Base directory of the images; JSON paths are relative to it.
    #[arg(long, env = "BOXTAG_IMAGE_DIR", default_value = "")]
    image_dir: String,
    /// Minimum detection confidence to classify.
    #[arg(long, default_value_t = boxtag::config::DEFAULT_CONFIDENCE_THRESHOLD)]
    threshold: f32,
    /// Enlargement factor applied to boxes before classification.
    #[arg(long, default_value_t = boxtag::config::DEFAULT_PADDING_FACTOR)]
    padding_factor: f32,
    /// Number of top-scoring classes stored per box.
    #[arg(long, default_value_t = boxtag::config::DEFAULT_NUM_ANNOTATED_CLASSES)]
    num_annotated_classes: usize,
    /// Detection categories to classify (repeatable).
    #[arg(long = "detection-category-whitelist", num_args = 1..)]
    detection_category_whitelist: Vec<String>,
    /// Behavior when the classifier fails on a single crop (skip|abort).
    #[arg(long, default_value = "skip")]
    on_inference_error: String,
    /// Classifier backend (tract|stub).
    #[arg(long, default_value = "tract")]
    backend: String,
    /// Square input resolution of the classifier model.
    #[arg(long, default_value_t = 224)]
    model_input_side: u32,
    /// UI mode for stderr progress (auto|plain|pretty).
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::from_flag(&args.ui, std::io::stderr().is_terminal());

    let cfg = build_config(&args)?;

    let mut backend = {
        let _stage = ui.stage("Load classifier");
        build_backend(&args)?
    };

    let class_names = read_class_list(&args.classes_file)?;

    let mut result = {
        let _stage = ui.stage("Read detections");
        let raw = std::fs::read_to_string(&args.detector_json_file).with_context(|| {
            format!(
                "failed to read detection JSON {}",
                args.detector_json_file.display()
            )
        })?;
        DetectionResult::from_json(&raw)?
    };

    result.add_classification_categories(&class_names);

    let started = Instant::now();
    let summary = {
        let _stage = ui.stage("Classify boxes");
        classify_boxes(&mut result, backend.as_mut(), &cfg)?
    };
    log::info!(
        "classified {} boxes across {} images ({} image(s) failed, {} box(es) failed) in {:.1}s",
        summary.detections_classified,
        summary.images_total,
        summary.images_failed,
        summary.detections_failed,
        started.elapsed().as_secs_f64()
    );

    {
        let _stage = ui.stage("Write output");
        let out = std::fs::File::create(&args.output_json_file).with_context(|| {
            format!(
                "failed to create output file {}",
                args.output_json_file.display()
            )
        })?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(out), &result)
            .context("failed to serialize output JSON")?;
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ClassifyConfig> {
    let mut cfg = ClassifyConfig {
        confidence_threshold: args.threshold,
        padding_factor: args.padding_factor,
        num_annotated_classes: args.num_annotated_classes,
        image_base_directory: args.image_dir.clone(),
        inference_error_policy: match args.on_inference_error.as_str() {
            "skip" => InferenceErrorPolicy::Skip,
            "abort" => InferenceErrorPolicy::Abort,
            other => return Err(anyhow!("unknown inference error policy '{}'", other)),
        },
        ..ClassifyConfig::default()
    };
    if !args.detection_category_whitelist.is_empty() {
        cfg.detection_category_whitelist = args
            .detection_category_whitelist
            .iter()
            .cloned()
            .collect::<BTreeSet<String>>();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_backend(args: &Args) -> Result<Box<dyn ClassifierBackend>> {
    match args.backend.as_str() {
        "stub" => {
            let class_names = read_class_list(&args.classes_file)?;
            Ok(Box::new(StubBackend::uniform(class_names.len())))
        }
        "tract" => {
            #[cfg(feature = "backend-tract")]
            {
                Ok(Box::new(boxtag::TractBackend::new(
                    &args.classifier_file,
                    args.model_input_side,
                )?))
            }
            #[cfg(not(feature = "backend-tract"))]
            {
                Err(anyhow!(
                    "the tract backend requires the backend-tract feature; \
                     rebuild with --features backend-tract or use --backend stub"
                ))
            }
        }
        other => Err(anyhow!("unknown backend '{}'", other)),
    }
}
