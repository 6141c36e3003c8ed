//! Canvas composition: blurred aspect-fill backdrop with the unclipped
//! source image centered on top, always 1080x1350 (4:5 portrait).

use image::imageops::{self, FilterType};
use image::RgbImage;

pub const CANVAS_W: u32 = 1080;
pub const CANVAS_H: u32 = 1350;

const BLUR_SIGMA: f32 = 20.0;

/// Centered cover-crop window `(x, y, w, h)` in source coordinates: the
/// largest canvas-ratio rectangle inside the source. Cropping before
/// scaling keeps the fill intermediate no larger than the source itself,
/// so a sliver-shaped input cannot blow up the allocation.
pub fn fill_window(w: u32, h: u32) -> (u32, u32, u32, u32) {
    let src_ratio = w as f64 / h as f64;
    let target_ratio = CANVAS_W as f64 / CANVAS_H as f64;
    if src_ratio > target_ratio {
        let cw = ((h as f64 * target_ratio).round() as u32).clamp(1, w);
        ((w - cw) / 2, 0, cw, h)
    } else {
        let ch = ((w as f64 / target_ratio).round() as u32).clamp(1, h);
        (0, (h - ch) / 2, w, ch)
    }
}

/// Scaled dimensions fitting inside the canvas with no cropping. The
/// tighter axis touches the canvas edge, the other is letterboxed.
pub fn fit_dims(w: u32, h: u32) -> (u32, u32) {
    let src_ratio = w as f64 / h as f64;
    let target_ratio = CANVAS_W as f64 / CANVAS_H as f64;
    if src_ratio > target_ratio {
        let new_w = CANVAS_W;
        let new_h = ((new_w as f64 / src_ratio).round() as u32).clamp(1, CANVAS_H);
        (new_w, new_h)
    } else {
        let new_h = CANVAS_H;
        let new_w = ((new_h as f64 * src_ratio).round() as u32).clamp(1, CANVAS_W);
        (new_w, new_h)
    }
}

/// Builds the card canvas from a decoded source of any aspect ratio.
/// Cannot fail on a valid image; a 4:5 source simply occludes the
/// backdrop completely.
pub fn compose(source: &RgbImage, filter: FilterType) -> RgbImage {
    // backdrop: cover-crop in source coordinates, scale to the canvas,
    // then soften until it reads as ambient color
    let (cx, cy, cw, ch) = fill_window(source.width(), source.height());
    let cropped = imageops::crop_imm(source, cx, cy, cw, ch).to_image();
    let scaled = imageops::resize(&cropped, CANVAS_W, CANVAS_H, filter);
    let mut canvas = imageops::fast_blur(&scaled, BLUR_SIGMA);

    // foreground: contain-fit, centered
    let (fw, fh) = fit_dims(source.width(), source.height());
    let fg = imageops::resize(source, fw, fh, filter);
    let x = (CANVAS_W - fw) / 2;
    let y = (CANVAS_H - fh) / 2;
    imageops::replace(&mut canvas, &fg, i64::from(x), i64::from(y));

    canvas
}
