//! Headline layout: greedy character-budget word wrap, bottom-anchored
//! vertical placement, and shadowed glyph rendering. Wrapping is a plain
//! character-count heuristic, not shaped text metrics; it leans on the
//! display font being close to uniform-width at this size.

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

pub const FONT_SIZE: f32 = 120.0;
pub const WRAP_WIDTH: usize = 15;
pub const PAD_X: i32 = 50;
pub const BOTTOM_MARGIN: i32 = 100;
pub const SHADOW_OFFSET: i32 = 4;
pub const LINE_GAP: i32 = 10;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const SHADOW_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

// black gradient scrim behind the text block, starting at 40% height
const SCRIM_START: f32 = 0.4;
const SCRIM_MAX: f32 = 220.0 / 255.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn from_env() -> Self {
        match std::env::var("TEXT_ALIGN").as_deref() {
            Ok("center") => Self::Center,
            _ => Self::Left,
        }
    }
}

/// Greedy word wrap against a character budget. A single word longer
/// than the budget gets its own line, unmodified.
pub fn wrap_headline(headline: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in headline.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct LineMetrics {
    /// Rendered bounding-box height; varies per line with
    /// ascenders/descenders.
    height: i32,
    /// Distance from the line's top edge down to its baseline.
    bearing: i32,
}

fn measure_line(font: &Font<'_>, scale: Scale, text: &str) -> LineMetrics {
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;
    for g in font.layout(text, scale, point(0.0, 0.0)) {
        if let Some(bb) = g.pixel_bounding_box() {
            min_y = min_y.min(bb.min.y);
            max_y = max_y.max(bb.max.y);
        }
    }
    if min_y > max_y {
        // nothing rasterizable (e.g. all spaces): fall back to the font's
        // nominal extent so the block still reserves a slot
        let vm = font.v_metrics(scale);
        LineMetrics {
            height: (vm.ascent - vm.descent).ceil() as i32,
            bearing: vm.ascent.ceil() as i32,
        }
    } else {
        LineMetrics {
            height: max_y - min_y,
            bearing: -min_y,
        }
    }
}

/// Top y of each line, anchored so the block ends `bottom_margin` above
/// the canvas bottom. The block top is clamped at 0: an absurdly long
/// headline clips at the bottom edge instead of escaping the canvas top.
pub fn place_lines(heights: &[i32], gap: i32, canvas_h: i32, bottom_margin: i32) -> Vec<i32> {
    if heights.is_empty() {
        return Vec::new();
    }
    let block: i32 = heights.iter().sum::<i32>() + gap * (heights.len() as i32 - 1);
    let mut y = (canvas_h - block - bottom_margin).max(0);
    let mut tops = Vec::with_capacity(heights.len());
    for h in heights {
        tops.push(y);
        y += h + gap;
    }
    tops
}

fn line_width(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    let mut width = 0.0f32;
    for g in font.layout(text, scale, point(0.0, 0.0)) {
        if let Some(bb) = g.pixel_bounding_box() {
            width = width.max(bb.max.x as f32);
        }
    }
    width
}

fn draw_line(
    img: &mut RgbImage,
    font: &Font<'_>,
    scale: Scale,
    x: i32,
    baseline_y: i32,
    color: Rgb<u8>,
    text: &str,
) {
    for glyph in font.layout(text, scale, point(x as f32, baseline_y as f32)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= img.width() || py >= img.height() || v <= 0.0 {
                    return;
                }
                let dst = img.get_pixel_mut(px, py);
                let inv = 1.0 - v;
                dst.0[0] = (color.0[0] as f32 * v + dst.0[0] as f32 * inv) as u8;
                dst.0[1] = (color.0[1] as f32 * v + dst.0[1] as f32 * inv) as u8;
                dst.0[2] = (color.0[2] as f32 * v + dst.0[2] as f32 * inv) as u8;
            });
        }
    }
}

fn apply_scrim(img: &mut RgbImage) {
    let h = img.height() as f32;
    let start = h * SCRIM_START;
    let span = h - start;
    for y in 0..img.height() {
        let t = ((y as f32 - start) / span).clamp(0.0, 1.0);
        if t <= 0.0 {
            continue;
        }
        let keep = 1.0 - t * SCRIM_MAX;
        for x in 0..img.width() {
            let p = img.get_pixel_mut(x, y);
            p.0[0] = (p.0[0] as f32 * keep) as u8;
            p.0[1] = (p.0[1] as f32 * keep) as u8;
            p.0[2] = (p.0[2] as f32 * keep) as u8;
        }
    }
}

/// Wraps the headline and draws it onto the canvas, bottom-left
/// anchored. Each line is drawn twice, shadow strictly first so the
/// foreground is never occluded. An input that wraps to zero lines
/// leaves the canvas untouched.
pub fn draw_headline(canvas: &mut RgbImage, font: &Font<'_>, headline: &str, align: TextAlign) {
    let lines = wrap_headline(headline, WRAP_WIDTH);
    if lines.is_empty() {
        return;
    }

    apply_scrim(canvas);

    let scale = Scale::uniform(FONT_SIZE);
    let metrics: Vec<LineMetrics> = lines.iter().map(|l| measure_line(font, scale, l)).collect();
    let heights: Vec<i32> = metrics.iter().map(|m| m.height).collect();
    let tops = place_lines(&heights, LINE_GAP, canvas.height() as i32, BOTTOM_MARGIN);

    for ((line, m), top) in lines.iter().zip(&metrics).zip(&tops) {
        let x = match align {
            TextAlign::Left => PAD_X,
            TextAlign::Center => {
                let w = line_width(font, scale, line);
                ((canvas.width() as f32 - w) / 2.0).round() as i32
            }
        };
        let baseline = top + m.bearing;
        draw_line(
            canvas,
            font,
            scale,
            x + SHADOW_OFFSET,
            baseline + SHADOW_OFFSET,
            SHADOW_COLOR,
            line,
        );
        draw_line(canvas, font, scale, x, baseline, TEXT_COLOR, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::font;

    #[test]
    fn wrap_splits_at_the_budget() {
        let lines = wrap_headline("BREAKING NEWS TODAY", WRAP_WIDTH);
        assert_eq!(lines, vec!["BREAKING NEWS", "TODAY"]);
        for line in &lines {
            assert!(line.chars().count() <= WRAP_WIDTH);
        }
    }

    #[test]
    fn wrap_is_idempotent_on_short_input() {
        assert_eq!(wrap_headline("SHORT", WRAP_WIDTH), vec!["SHORT"]);
        assert_eq!(
            wrap_headline("UNDER FIFTEEN", WRAP_WIDTH),
            vec!["UNDER FIFTEEN"]
        );
    }

    #[test]
    fn wrap_of_empty_or_blank_is_no_lines() {
        assert!(wrap_headline("", WRAP_WIDTH).is_empty());
        assert!(wrap_headline("   \t ", WRAP_WIDTH).is_empty());
    }

    #[test]
    fn overlong_word_gets_its_own_line_unmodified() {
        let lines = wrap_headline("A FLOCCINAUCINIHILIPILIFICATION B", WRAP_WIDTH);
        assert_eq!(lines, vec!["A", "FLOCCINAUCINIHILIPILIFICATION", "B"]);
    }

    #[test]
    fn wrap_collapses_runs_of_whitespace() {
        assert_eq!(
            wrap_headline("TWO   WORDS", WRAP_WIDTH),
            vec!["TWO WORDS"]
        );
    }

    #[test]
    fn placement_accumulates_per_line_heights() {
        let tops = place_lines(&[100, 90, 120], 10, 1350, 100);
        // block = 100 + 90 + 120 + 2 gaps = 330; start = 1350 - 330 - 100
        assert_eq!(tops, vec![920, 1030, 1130]);
    }

    #[test]
    fn placement_clamps_at_the_canvas_top() {
        let tops = place_lines(&[400; 5], 10, 1350, 100);
        assert_eq!(tops[0], 0);
        assert_eq!(tops[1], 410);
    }

    #[test]
    fn placement_of_nothing_is_nothing() {
        assert!(place_lines(&[], 10, 1350, 100).is_empty());
    }

    #[test]
    fn single_line_sits_above_the_bottom_margin() {
        let tops = place_lines(&[110], 10, 1350, 100);
        assert_eq!(tops, vec![1140]);
    }

    #[test]
    fn blank_headline_leaves_canvas_pixel_identical() {
        let Some(font) = font::system_fallback().get().cloned() else {
            return;
        };
        let mut canvas = RgbImage::from_pixel(200, 250, image::Rgb([17, 34, 51]));
        let before = canvas.clone();
        draw_headline(&mut canvas, &font, "", TextAlign::Left);
        draw_headline(&mut canvas, &font, "  \n ", TextAlign::Left);
        assert_eq!(canvas, before);
    }

    #[test]
    fn shadow_and_foreground_are_both_visible() {
        let Some(font) = font::system_fallback().get().cloned() else {
            return;
        };
        // mid-gray canvas so both pure white (foreground) and pure black
        // (shadow peeking out past the +4/+4 offset) stand out
        let mut canvas = RgbImage::from_pixel(1080, 1350, image::Rgb([128, 128, 128]));
        draw_headline(&mut canvas, &font, "NEWS", TextAlign::Left);
        let mut white = 0usize;
        let mut dark = 0usize;
        for p in canvas.pixels() {
            if p.0 == [255, 255, 255] {
                white += 1;
            }
            if p.0[0] < 30 && p.0[1] < 30 && p.0[2] < 30 {
                dark += 1;
            }
        }
        // foreground drawn after the shadow, so its solid core survives
        assert!(white > 0, "no foreground pixels rendered");
        assert!(dark > 0, "no shadow pixels rendered");
    }

    #[test]
    fn measured_heights_track_descenders() {
        let Some(font) = font::system_fallback().get().cloned() else {
            return;
        };
        let scale = Scale::uniform(FONT_SIZE);
        let flat = measure_line(&font, scale, "ACE");
        let descending = measure_line(&font, scale, "Qg");
        assert!(descending.height >= flat.height);
        assert!(flat.height > 0 && flat.bearing > 0);
    }
}
