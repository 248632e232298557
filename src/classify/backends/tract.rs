#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use image::RgbImage;
use tract_onnx::prelude::*;

use crate::classify::backend::ClassifierBackend;

/// Tract-based ONNX classifier backend.
///
/// The model is loaded once with a fixed `1x3xSxS` input. Crops arrive at
/// whatever size the padded bounding box produced, so each crop is resized to
/// the model side and its pixel values scaled to [0,1] before inference. The
/// model is expected to embed its own remaining preprocessing.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    input_side: u32,
}

impl TractBackend {
    /// Load an ONNX classifier from disk. `input_side` is the square input
    /// resolution the model was exported with.
    pub fn new<P: AsRef<Path>>(model_path: P, input_side: u32) -> Result<Self> {
        let model_path = model_path.as_ref();
        let side = input_side as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, side, side)),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self { model, input_side })
    }

    fn build_input(&self, pixels: &[u8], width: u32, height: u32) -> Result<Tensor> {
        if width == 0 || height == 0 {
            return Err(anyhow!("cannot classify an empty crop"));
        }
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("crop dimensions overflow"))?;
        if pixels.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected_len,
                width,
                height,
                pixels.len()
            ));
        }

        let crop = RgbImage::from_raw(width, height, pixels.to_vec())
            .ok_or_else(|| anyhow!("crop buffer does not match {}x{}", width, height))?;
        let resized = image::imageops::resize(
            &crop,
            self.input_side,
            self.input_side,
            FilterType::Triangle,
        );

        let side = self.input_side as usize;
        let input = tract_ndarray::Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
            resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        });

        Ok(input.into_tensor())
    }

    fn extract_scores(&self, outputs: TVec<TValue>) -> Result<Vec<f32>> {
        let output = outputs
            .get(0)
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        Ok(scores.iter().copied().collect())
    }
}

impl ClassifierBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn classify(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<f32>> {
        let input = self.build_input(pixels, width, height)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        // tract returns a 1xN batch; the flattened view is the score vector.
        self.extract_scores(outputs)
    }
}
