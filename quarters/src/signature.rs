//! Freehand signature capture surface.
//!
//! A [`SignaturePad`] is a fixed-size grayscale drawing surface: 480x240
//! logical pixels, rendered internally at 2x for crisp output on high-density
//! displays and downsampled on save. Strokes are drawn in black ink at a
//! constant width with round caps and joins (each segment is stamped as a
//! chain of overlapping discs, which produces both).
//!
//! `save` rasterizes the surface to a PNG and returns it as a
//! `data:image/png;base64,...` blob ready for embedding in a lease document.
//! Saving an untouched or cleared surface is rejected so callers cannot
//! persist a blank signature.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Logical surface size, in CSS-pixel terms.
pub const SURFACE_WIDTH: u32 = 480;
pub const SURFACE_HEIGHT: u32 = 240;

/// Backing-store scale factor for high-density rendering.
const SCALE: u32 = 2;

/// Ink stroke width in logical pixels.
const STROKE_WIDTH: f32 = 2.5;

/// Incoming logical coordinates are clamped to this margin around the
/// surface before any ink is stamped, so segment length stays bounded for
/// arbitrary input. The margin exceeds the stroke radius, so a clamped
/// off-surface point still leaves no mark.
const CLAMP_MARGIN: f32 = 8.0;

const WHITE: u8 = 0xff;
const BLACK: u8 = 0x00;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// Save requested on an untouched or cleared surface
    #[error("signature surface is empty")]
    EmptySurface,

    /// PNG encoding failed (should not happen for a well-formed buffer)
    #[error("failed to encode signature image: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone)]
pub struct SignaturePad {
    /// Grayscale backing store, `SCALE * SURFACE_WIDTH` x `SCALE * SURFACE_HEIGHT`.
    pixels: Vec<u8>,
    /// End of the in-progress stroke, in backing-store coordinates.
    cursor: Option<(f32, f32)>,
    /// Set by any ink landing on the surface, cleared by `clear`.
    dirty: bool,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new()
    }
}

impl SignaturePad {
    pub fn new() -> Self {
        let len = (SCALE * SURFACE_WIDTH) as usize * (SCALE * SURFACE_HEIGHT) as usize;
        Self {
            pixels: vec![WHITE; len],
            cursor: None,
            dirty: false,
        }
    }

    /// Whether anything has been drawn since creation or the last clear.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Begin a stroke at a logical coordinate. Stamps a dot immediately so a
    /// tap (begin + end with no movement) still leaves a mark. Non-finite
    /// points are ignored.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        let Some((x, y)) = clamp_point(x, y) else {
            return;
        };
        let (bx, by) = (x * SCALE as f32, y * SCALE as f32);
        self.stamp(bx, by);
        self.cursor = Some((bx, by));
    }

    /// Extend the in-progress stroke to a new logical coordinate. Without a
    /// preceding `begin_stroke` this starts one. Non-finite points are
    /// ignored.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        let Some((x, y)) = clamp_point(x, y) else {
            return;
        };
        let (bx, by) = (x * SCALE as f32, y * SCALE as f32);
        match self.cursor {
            Some((px, py)) => self.stamp_segment(px, py, bx, by),
            None => self.stamp(bx, by),
        }
        self.cursor = Some((bx, by));
    }

    /// Finish the in-progress stroke.
    pub fn end_stroke(&mut self) {
        self.cursor = None;
    }

    /// Reset to a blank white surface and disable save again.
    pub fn clear(&mut self) {
        self.pixels.fill(WHITE);
        self.cursor = None;
        self.dirty = false;
    }

    /// Rasterize the surface to a 480x240 PNG and return it as a data URL.
    pub fn save(&self) -> Result<String, SignatureError> {
        if !self.dirty {
            return Err(SignatureError::EmptySurface);
        }
        let png = self.encode_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }

    /// Downsample the 2x backing store to the logical size and PNG-encode it.
    fn encode_png(&self) -> Result<Vec<u8>, SignatureError> {
        let backing_width = (SCALE * SURFACE_WIDTH) as usize;
        let mut output = vec![WHITE; (SURFACE_WIDTH * SURFACE_HEIGHT) as usize];

        // box filter over each SCALE x SCALE block
        for oy in 0..SURFACE_HEIGHT as usize {
            for ox in 0..SURFACE_WIDTH as usize {
                let mut sum: u32 = 0;
                for dy in 0..SCALE as usize {
                    for dx in 0..SCALE as usize {
                        let sx = ox * SCALE as usize + dx;
                        let sy = oy * SCALE as usize + dy;
                        sum += self.pixels[sy * backing_width + sx] as u32;
                    }
                }
                output[oy * SURFACE_WIDTH as usize + ox] = (sum / (SCALE * SCALE)) as u8;
            }
        }

        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, SURFACE_WIDTH, SURFACE_HEIGHT);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().map_err(|e| SignatureError::Encoding(e.to_string()))?;
            writer
                .write_image_data(&output)
                .map_err(|e| SignatureError::Encoding(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Stamp discs along the segment at sub-pixel steps; overlapping discs
    /// give round caps and joins at constant width.
    fn stamp_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let length = (dx * dx + dy * dy).sqrt();
        let steps = (length / 0.5).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(x0 + dx * t, y0 + dy * t);
        }
    }

    /// Fill one disc of ink, clipped to the surface.
    fn stamp(&mut self, cx: f32, cy: f32) {
        let radius = STROKE_WIDTH * SCALE as f32 / 2.0;
        let width = (SCALE * SURFACE_WIDTH) as i64;
        let height = (SCALE * SURFACE_HEIGHT) as i64;

        let min_x = ((cx - radius).floor() as i64).max(0);
        let max_x = ((cx + radius).ceil() as i64).min(width - 1);
        let min_y = ((cy - radius).floor() as i64).max(0);
        let max_y = ((cy + radius).ceil() as i64).min(height - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let r2 = radius * radius;
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let (fx, fy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                if fx * fx + fy * fy <= r2 {
                    self.pixels[(py * width + px) as usize] = BLACK;
                    self.dirty = true;
                }
            }
        }
    }
}

/// Clamp a logical point to the surface plus margin. `None` for non-finite
/// coordinates.
fn clamp_point(x: f32, y: f32) -> Option<(f32, f32)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((
        x.clamp(-CLAMP_MARGIN, SURFACE_WIDTH as f32 + CLAMP_MARGIN),
        y.clamp(-CLAMP_MARGIN, SURFACE_HEIGHT as f32 + CLAMP_MARGIN),
    ))
}

/// Replay a list of recorded strokes (each a polyline of logical points)
/// onto a fresh pad.
pub fn replay_strokes(strokes: &[Vec<(f32, f32)>]) -> SignaturePad {
    let mut pad = SignaturePad::new();
    for stroke in strokes {
        let mut points = stroke.iter();
        if let Some(&(x, y)) = points.next() {
            pad.begin_stroke(x, y);
            for &(x, y) in points {
                pad.extend_stroke(x, y);
            }
            pad.end_stroke();
        }
    }
    pad
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pad_refuses_to_save() {
        let pad = SignaturePad::new();
        assert!(!pad.is_dirty());
        assert_eq!(pad.save(), Err(SignatureError::EmptySurface));
    }

    #[test]
    fn drawing_enables_save() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(10.0, 10.0);
        pad.extend_stroke(100.0, 60.0);
        pad.end_stroke();
        assert!(pad.is_dirty());

        let blob = pad.save().expect("dirty pad should save");
        assert!(blob.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn saved_png_has_fixed_dimensions() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(0.0, 0.0);
        pad.extend_stroke(479.0, 239.0);
        pad.end_stroke();

        let blob = pad.save().unwrap();
        let bytes = STANDARD.decode(blob.strip_prefix("data:image/png;base64,").unwrap()).unwrap();

        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().expect("valid png");
        let info = reader.info();
        assert_eq!(info.width, SURFACE_WIDTH);
        assert_eq!(info.height, SURFACE_HEIGHT);
    }

    #[test]
    fn a_tap_leaves_a_mark() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(240.0, 120.0);
        pad.end_stroke();
        assert!(pad.is_dirty());
    }

    #[test]
    fn clear_returns_to_blank_and_disables_save() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(10.0, 10.0);
        pad.extend_stroke(50.0, 50.0);
        pad.end_stroke();
        assert!(pad.is_dirty());

        pad.clear();
        assert!(!pad.is_dirty());
        assert_eq!(pad.save(), Err(SignatureError::EmptySurface));
    }

    #[test]
    fn strokes_outside_the_surface_are_clipped() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(-500.0, -500.0);
        pad.extend_stroke(-400.0, -400.0);
        pad.end_stroke();
        // never touched the surface
        assert!(!pad.is_dirty());
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(f32::NAN, 10.0);
        pad.extend_stroke(10.0, f32::INFINITY);
        assert!(!pad.is_dirty());

        // drawing still works after a bad point
        pad.extend_stroke(10.0, 10.0);
        pad.end_stroke();
        assert!(pad.is_dirty());
    }

    #[test]
    fn oversized_coordinates_are_clamped_to_the_surface() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(0.0, 120.0);
        // clamping bounds the segment length, so this returns promptly
        pad.extend_stroke(5.0e7, 120.0);
        pad.end_stroke();
        assert!(pad.is_dirty());

        let mut edge = SignaturePad::new();
        edge.begin_stroke(0.0, 120.0);
        edge.extend_stroke(SURFACE_WIDTH as f32 + CLAMP_MARGIN, 120.0);
        edge.end_stroke();
        assert_eq!(pad.save().unwrap(), edge.save().unwrap());
    }

    #[test]
    fn replay_matches_manual_drawing() {
        let strokes = vec![vec![(10.0, 10.0), (20.0, 20.0), (40.0, 15.0)], vec![(100.0, 100.0)]];
        let pad = replay_strokes(&strokes);
        assert!(pad.is_dirty());

        let mut manual = SignaturePad::new();
        manual.begin_stroke(10.0, 10.0);
        manual.extend_stroke(20.0, 20.0);
        manual.extend_stroke(40.0, 15.0);
        manual.end_stroke();
        manual.begin_stroke(100.0, 100.0);
        manual.end_stroke();

        assert_eq!(pad.save().unwrap(), manual.save().unwrap());
    }

    #[test]
    fn empty_stroke_list_replays_to_a_blank_pad() {
        let pad = replay_strokes(&[]);
        assert_eq!(pad.save(), Err(SignatureError::EmptySurface));
    }
}
