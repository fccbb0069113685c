//! Pixel pattern synthesis
//!
//! Every pattern is a pure function of its inputs; the geometric pattern
//! draws its shape placement from a `ChaCha8Rng` seeded by the caller.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::types::{ChannelLayout, FixtureError, FixtureResult, PixelBuffer};

/// Shape palette for the geometric pattern
pub const BASE_COLORS: [[u8; 3]; 6] = [
    [255, 0, 0],   // red
    [0, 255, 0],   // green
    [0, 0, 255],   // blue
    [255, 255, 0], // yellow
    [255, 0, 255], // magenta
    [0, 255, 255], // cyan
];

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

/// Content kinds the synthesizer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// R follows x, G follows y, B follows x + y
    Gradient,
    /// Black/white squares of side `max(8, min(w, h) / 16)`
    Checkerboard,
    /// 3 to 10 filled rectangles, ellipses and triangles on white
    Geometric { seed: u64 },
}

impl Pattern {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::Checkerboard => "checkerboard",
            Self::Geometric { .. } => "geometric",
        }
    }
}

/// Synthesize an RGB buffer of the given pattern
pub fn synthesize(width: u32, height: u32, pattern: Pattern) -> FixtureResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(FixtureError::invalid(format!(
            "pattern dimensions must be positive, got {width}x{height}"
        )));
    }

    let data = match pattern {
        Pattern::Gradient => gradient(width, height),
        Pattern::Checkerboard => checkerboard(width, height),
        Pattern::Geometric { seed } => geometric(width, height, seed).into_raw(),
    };

    PixelBuffer::new(width, height, ChannelLayout::Rgb, data)
}

fn gradient(width: u32, height: u32) -> Vec<u8> {
    let (w, h) = (u64::from(width), u64::from(height));
    let dx = (w - 1).max(1);
    let dy = (h - 1).max(1);
    let dxy = (w + h - 2).max(1);

    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            data.push((255 * x / dx) as u8);
            data.push((255 * y / dy) as u8);
            data.push((255 * (x + y) / dxy) as u8);
        }
    }
    data
}

/// Square side used by the checkerboard pattern
pub fn checker_square(width: u32, height: u32) -> u32 {
    (width.min(height) / 16).max(8)
}

fn checkerboard(width: u32, height: u32) -> Vec<u8> {
    let side = checker_square(width, height);
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let odd = (x / side + y / side) % 2 == 1;
            data.extend_from_slice(if odd { &BLACK } else { &WHITE });
        }
    }
    data
}

/// Number of shapes drawn for a canvas of this area
pub fn geometric_shape_count(width: u32, height: u32) -> usize {
    let area = width as usize * height as usize;
    (area / 10_000).clamp(3, 10)
}

fn geometric(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(WHITE));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for i in 0..geometric_shape_count(width, height) {
        let color = Rgb(BASE_COLORS[i % BASE_COLORS.len()]);
        let x1 = rng.gen_range(0..width);
        let y1 = rng.gen_range(0..height);
        let x2 = rng.gen_range(x1..width);
        let y2 = rng.gen_range(y1..height);

        match i % 3 {
            0 => fill_rect(&mut canvas, (x1, y1, x2, y2), color),
            1 => fill_ellipse(&mut canvas, (x1, y1, x2, y2), color),
            _ => fill_triangle(&mut canvas, (x1, y1, x2, y2), color),
        }
    }

    canvas
}

/// Inclusive box (x1, y1, x2, y2) with x1 <= x2 and y1 <= y2
type BoxCoords = (u32, u32, u32, u32);

fn fill_rect(canvas: &mut RgbImage, (x1, y1, x2, y2): BoxCoords, color: Rgb<u8>) {
    let rect = Rect::at(x1 as i32, y1 as i32).of_size(x2 - x1 + 1, y2 - y1 + 1);
    draw_filled_rect_mut(canvas, rect, color);
}

fn fill_ellipse(canvas: &mut RgbImage, (x1, y1, x2, y2): BoxCoords, color: Rgb<u8>) {
    let rx = ((x2 - x1) / 2) as i32;
    let ry = ((y2 - y1) / 2) as i32;
    // a zero radius collapses to a line; draw it as the bounding box instead
    if rx == 0 || ry == 0 {
        fill_rect(canvas, (x1, y1, x2, y2), color);
        return;
    }
    let center = (((x1 + x2) / 2) as i32, ((y1 + y2) / 2) as i32);
    draw_filled_ellipse_mut(canvas, center, rx, ry, color);
}

fn fill_triangle(canvas: &mut RgbImage, (x1, y1, x2, y2): BoxCoords, color: Rgb<u8>) {
    if x1 == x2 || y1 == y2 {
        fill_rect(canvas, (x1, y1, x2, y2), color);
        return;
    }
    let apex = Point::new(((x1 + x2) / 2) as i32, y2 as i32);
    let poly = [Point::new(x1 as i32, y1 as i32), Point::new(x2 as i32, y1 as i32), apex];
    draw_polygon_mut(canvas, &poly, color);
}

/// Add a radial alpha hole: inside a centered circle of radius
/// `min(w, h) / 4`, alpha ramps from 0 at the center to 255 at the rim.
pub fn with_radial_alpha(buffer: &PixelBuffer) -> FixtureResult<PixelBuffer> {
    let (w, h) = (buffer.width(), buffer.height());
    let (cx, cy) = (f64::from(w / 2), f64::from(h / 2));
    let radius = f64::from(w.min(h) / 4);

    let mut data = Vec::with_capacity(buffer.pixel_count() * 4);
    for y in 0..h {
        for x in 0..w {
            let px = buffer.pixel(x, y);
            data.extend_from_slice(&px[..3]);
            let dist = (f64::from(x) - cx).hypot(f64::from(y) - cy);
            let alpha = if dist < radius { (255.0 * dist / radius) as u8 } else { 255 };
            data.push(alpha);
        }
    }

    PixelBuffer::new(w, h, ChannelLayout::Rgba, data)
}

/// Rotate color channels by `shift` positions: output channel `c` takes
/// input channel `(c - shift) mod 3`. Alpha is left alone.
pub fn shift_channels(buffer: &PixelBuffer, shift: usize) -> FixtureResult<PixelBuffer> {
    let k = shift % 3;
    let mut data = Vec::with_capacity(buffer.as_bytes().len());
    for px in buffer.pixels() {
        for c in 0..3 {
            data.push(px[(c + 3 - k) % 3]);
        }
        if buffer.has_alpha() {
            data.push(px[3]);
        }
    }
    PixelBuffer::new(buffer.width(), buffer.height(), buffer.layout(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_corners() {
        let buf = synthesize(4, 3, Pattern::Gradient).unwrap();
        assert_eq!(buf.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(buf.pixel(3, 0), &[255, 0, 153]);
        assert_eq!(buf.pixel(0, 2), &[0, 255, 102]);
        assert_eq!(buf.pixel(3, 2), &[255, 255, 255]);
    }

    #[test]
    fn test_gradient_single_pixel() {
        let buf = synthesize(1, 1, Pattern::Gradient).unwrap();
        assert_eq!(buf.as_bytes(), &[0, 0, 0]);
    }

    #[test]
    fn test_checkerboard_squares() {
        let buf = synthesize(32, 32, Pattern::Checkerboard).unwrap();
        assert_eq!(checker_square(32, 32), 8);
        assert_eq!(buf.pixel(0, 0), &WHITE);
        assert_eq!(buf.pixel(7, 7), &WHITE);
        assert_eq!(buf.pixel(8, 0), &BLACK);
        assert_eq!(buf.pixel(8, 8), &WHITE);
        assert_eq!(checker_square(512, 512), 32);
    }

    #[test]
    fn test_geometric_is_seeded() {
        let a = synthesize(128, 96, Pattern::Geometric { seed: 1 }).unwrap();
        let b = synthesize(128, 96, Pattern::Geometric { seed: 1 }).unwrap();
        let c = synthesize(128, 96, Pattern::Geometric { seed: 2 }).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.pixels().any(|px| px != WHITE));
    }

    #[test]
    fn test_geometric_small_canvas() {
        for seed in 0..32 {
            let buf = synthesize(2, 2, Pattern::Geometric { seed }).unwrap();
            assert_eq!(buf.as_bytes().len(), 12);
        }
    }

    #[test]
    fn test_shape_count_bounds() {
        assert_eq!(geometric_shape_count(32, 32), 3);
        assert_eq!(geometric_shape_count(512, 512), 10);
        assert_eq!(geometric_shape_count(200, 200), 4);
    }

    #[test]
    fn test_radial_alpha() {
        let base = synthesize(16, 16, Pattern::Gradient).unwrap();
        let rgba = with_radial_alpha(&base).unwrap();
        assert!(rgba.has_alpha());
        assert_eq!(rgba.pixel(8, 8)[3], 0);
        assert_eq!(rgba.pixel(0, 0)[3], 255);
        assert_eq!(&rgba.pixel(3, 5)[..3], base.pixel(3, 5));
    }

    #[test]
    fn test_shift_channels() {
        let buf = PixelBuffer::filled(1, 1, &[1, 2, 3]).unwrap();
        assert_eq!(shift_channels(&buf, 0).unwrap().as_bytes(), &[1, 2, 3]);
        assert_eq!(shift_channels(&buf, 1).unwrap().as_bytes(), &[3, 1, 2]);
        assert_eq!(shift_channels(&buf, 10).unwrap().as_bytes(), &[3, 1, 2]);
        assert_eq!(shift_channels(&buf, 2).unwrap().as_bytes(), &[2, 3, 1]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(synthesize(0, 4, Pattern::Checkerboard).is_err());
    }
}
