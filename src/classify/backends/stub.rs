use anyhow::{anyhow, Result};

use crate::classify::backend::ClassifierBackend;

/// Stub backend for tests and dry runs. Returns a fixed score vector for
/// every non-empty crop and rejects empty crops the way a real model would.
pub struct StubBackend {
    scores: Vec<f32>,
}

impl StubBackend {
    pub fn new(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    /// Uniform scores over `num_classes` outputs.
    pub fn uniform(num_classes: usize) -> Self {
        let score = 1.0 / num_classes.max(1) as f32;
        Self {
            scores: vec![score; num_classes],
        }
    }
}

impl ClassifierBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn classify(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<f32>> {
        if pixels.is_empty() || width == 0 || height == 0 {
            return Err(anyhow!("cannot classify an empty crop"));
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        Ok(self.scores.clone())
    }
}
