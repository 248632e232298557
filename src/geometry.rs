//! Bounding-box to crop-rectangle transformation.
//!
//! Detector boxes arrive normalized to [0,1] in `(x_min, y_min, width,
//! height)` form. The classifier wants a roughly square, context-padded pixel
//! region. `compute_crop` performs the conversion: corner form, pixel scaling,
//! centered square padding by the configured factor, then clamping to the
//! image extents.

/// A pixel-space crop rectangle, `x0..x1` by `y0..y1`, half-open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Convert a normalized detector box into a padded, clipped pixel rectangle.
///
/// Each axis is expanded symmetrically until the box covers
/// `padding_factor * max(box_height, box_width)` pixels, which squares off the
/// box and adds surrounding context. All coordinates are clamped to
/// `[0, image_height]` / `[0, image_width]` and floored to integers.
///
/// A degenerate box (zero width or height) yields an empty rectangle; callers
/// must expect the classifier to reject the resulting crop.
pub fn compute_crop(
    bbox: [f32; 4],
    image_width: u32,
    image_height: u32,
    padding_factor: f32,
) -> CropRect {
    let [x, y, w, h] = bbox;

    let x0 = x * image_width as f32;
    let y0 = y * image_height as f32;
    let x1 = (x + w) * image_width as f32;
    let y1 = (y + h) * image_height as f32;

    let box_w = x1 - x0;
    let box_h = y1 - y0;
    let target_side = padding_factor * box_w.max(box_h);
    let dx = (target_side - box_w) / 2.0;
    let dy = (target_side - box_h) / 2.0;

    let clamp_x = |v: f32| v.clamp(0.0, image_width as f32).floor() as u32;
    let clamp_y = |v: f32| v.clamp(0.0, image_height as f32).floor() as u32;

    CropRect {
        x0: clamp_x(x0 - dx),
        y0: clamp_y(y0 - dy),
        x1: clamp_x(x1 + dx),
        y1: clamp_y(y1 + dy),
    }
}
