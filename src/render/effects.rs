//! Whole-canvas effects: vignette, noise and Gaussian blur.

use image::RgbImage;
use rand::{Rng, RngCore};

use super::gradient::Radial;
use super::Canvas;
use crate::error::{PostError, Result};

/// Darken the canvas towards its edges.
///
/// The black overlay's alpha grows linearly with distance from the centre,
/// reaching `255 * intensity` at the corners.
pub fn add_vignette(canvas: &mut Canvas, intensity: f64) {
    let radial = Radial::new(canvas.width(), canvas.height());
    for (x, y, px) in canvas.image_mut().enumerate_pixels_mut() {
        let alpha = (255.0 * radial.ratio(x, y) * intensity).clamp(0.0, 255.0) as u32;
        if alpha == 0 {
            continue;
        }
        let inv = 255 - alpha;
        for c in px.0.iter_mut() {
            *c = ((*c as u32 * inv + 127) / 255) as u8;
        }
    }
}

/// Add one random delta in `[-intensity, intensity]` to every pixel,
/// applied equally to all three channels.
pub fn add_noise(canvas: &mut Canvas, intensity: u8, rng: &mut dyn RngCore) {
    let i = intensity as i16;
    for px in canvas.image_mut().pixels_mut() {
        let delta = rng.random_range(-i..=i);
        for c in px.0.iter_mut() {
            *c = (*c as i16 + delta).clamp(0, 255) as u8;
        }
    }
}

/// Inclusive-exclusive pixel region `(x1, y1, x2, y2)`.
pub type Region = (i32, i32, i32, i32);

/// Gaussian blur with `sigma = radius` over the canvas or a region of it.
///
/// The region is clipped to the canvas; an empty region is a no-op.
pub fn add_blur(canvas: &mut Canvas, radius: u32, region: Option<Region>) -> Result<()> {
    if radius == 0 {
        return Ok(());
    }

    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let (x1, y1, x2, y2) = region.unwrap_or((0, 0, w, h));
    let (x1, x2) = (x1.clamp(0, w), x2.clamp(0, w));
    let (y1, y2) = (y1.clamp(0, h), y2.clamp(0, h));
    if x2 <= x1 || y2 <= y1 {
        tracing::debug!(?region, "blur region is empty after clipping");
        return Ok(());
    }

    let (rw, rh) = ((x2 - x1) as u32, (y2 - y1) as u32);
    let crop = image::imageops::crop_imm(canvas.image(), x1 as u32, y1 as u32, rw, rh).to_image();
    let kernel = gaussian_kernel_q16(radius as f32)?;
    let blurred = blur_rgb8(&crop, &kernel);
    image::imageops::replace(canvas.image_mut(), &blurred, x1 as i64, y1 as i64);
    Ok(())
}

/// Normalized Gaussian weights in Q16, spanning three sigmas each side.
fn gaussian_kernel_q16(sigma: f32) -> Result<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PostError::invalid("blur sigma must be > 0"));
    }

    let r = (sigma * 3.0).ceil() as i32;
    let denom = 2.0 * (sigma as f64) * (sigma as f64);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| (-(i as f64) * (i as f64) / denom).exp())
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Push rounding drift into the centre tap so the kernel sums to 1.0.
    let acc: i64 = weights.iter().map(|&w| w as i64).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (weights[mid] as i64 + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn blur_rgb8(src: &RgbImage, kernel: &[u32]) -> RgbImage {
    let (width, height) = src.dimensions();
    let mut tmp = RgbImage::new(width, height);
    let mut out = RgbImage::new(width, height);
    pass(src, &mut tmp, kernel, (1, 0));
    pass(&tmp, &mut out, kernel, (0, 1));
    out
}

/// One separable pass along `step`, clamping samples at the edges.
fn pass(src: &RgbImage, dst: &mut RgbImage, kernel: &[u32], step: (i32, i32)) {
    let radius = (kernel.len() / 2) as i32;
    let (w, h) = (src.width() as i32, src.height() as i32);

    for (x, y, px) in dst.enumerate_pixels_mut() {
        let mut acc = [0u64; 3];
        for (ki, &kw) in kernel.iter().enumerate() {
            let d = ki as i32 - radius;
            let sx = (x as i32 + d * step.0).clamp(0, w - 1);
            let sy = (y as i32 + d * step.1).clamp(0, h - 1);
            let sample = src.get_pixel(sx as u32, sy as u32).0;
            for c in 0..3 {
                acc[c] += kw as u64 * sample[c] as u64;
            }
        }
        px.0 = acc.map(q16_to_u8);
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}
