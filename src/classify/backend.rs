use anyhow::Result;

/// Classifier backend trait.
///
/// A backend wraps one loaded model handle. The handle is not reentrant:
/// `classify` takes `&mut self`, so concurrent use requires either a handle
/// per worker or serialization behind a `Mutex`. The sequential pipeline
/// simply holds the one handle for the whole batch.
pub trait ClassifierBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run the classifier on one RGB8 crop and return one raw score per
    /// model output class.
    ///
    /// Exactly one inference per call; no retries, no caching. Failures
    /// (including degenerate zero-area crops) propagate to the caller, which
    /// applies the configured error policy.
    fn classify(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<f32>>;
}
