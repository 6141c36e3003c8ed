pub mod compose;
pub mod font;
pub mod text;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ImageEncoder, RgbImage};
use thiserror::Error;
use tracing::warn;

use font::FontHandle;
use text::TextAlign;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("fetch: {0}")]
    Fetch(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Resample filter used for both the fill and fit scaling passes.
/// Named explicitly so the choice does not track any imaging
/// library's own constant names across versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleFilter {
    NearestNeighbor,
    Bilinear,
    Lanczos,
}

impl ResampleFilter {
    pub fn from_env() -> Self {
        match std::env::var("RESAMPLE_FILTER").as_deref() {
            Ok("nearest") => Self::NearestNeighbor,
            Ok("bilinear") => Self::Bilinear,
            _ => Self::Lanczos,
        }
    }

    pub fn filter_type(self) -> FilterType {
        match self {
            Self::NearestNeighbor => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub filter: ResampleFilter,
    pub align: TextAlign,
}

impl RenderConfig {
    /// Resolved once at startup; requests never re-read the environment.
    pub fn from_env() -> Self {
        Self {
            filter: ResampleFilter::from_env(),
            align: TextAlign::from_env(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::Lanczos,
            align: TextAlign::Left,
        }
    }
}

const JPEG_QUALITY: u8 = 95;

/// Full card pipeline: compose the canvas, overlay the headline, encode.
/// Headline text degrades gracefully: without a usable font the card is
/// still produced, just without text.
pub fn generate_card(
    source: &RgbImage,
    headline: &str,
    font: &FontHandle,
    cfg: RenderConfig,
) -> Result<Vec<u8>, GenError> {
    let mut canvas = compose::compose(source, cfg.filter.filter_type());

    let headline = headline.trim();
    if !headline.is_empty() {
        match font.get() {
            Some(f) => text::draw_headline(&mut canvas, f, &headline.to_uppercase(), cfg.align),
            None => warn!("no display font available, skipping headline"),
        }
    }

    encode_jpeg(&canvas)
}

pub fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>, GenError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| GenError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_source(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn card_is_valid_jpeg_at_canvas_size() {
        let source = gradient_source(2000, 1000);
        let jpeg = generate_card(
            &source,
            "BREAKING NEWS TODAY",
            &font::system_fallback(),
            RenderConfig::default(),
        )
        .unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), compose::CANVAS_W);
        assert_eq!(decoded.height(), compose::CANVAS_H);
    }

    #[test]
    fn missing_font_still_produces_card() {
        let source = gradient_source(640, 480);
        let with_headline = generate_card(
            &source,
            "NO FONT HERE",
            &FontHandle::none(),
            RenderConfig::default(),
        )
        .unwrap();
        let plain = encode_jpeg(&compose::compose(
            &source,
            ResampleFilter::Lanczos.filter_type(),
        ))
        .unwrap();
        // Without a font the headline is skipped entirely, so the bytes
        // match a text-free encode of the same canvas.
        assert_eq!(with_headline, plain);
    }

    #[test]
    fn empty_headline_never_touches_the_canvas() {
        let source = gradient_source(800, 800);
        let card = generate_card(
            &source,
            "   ",
            &font::system_fallback(),
            RenderConfig::default(),
        )
        .unwrap();
        let plain = encode_jpeg(&compose::compose(
            &source,
            ResampleFilter::Lanczos.filter_type(),
        ))
        .unwrap();
        assert_eq!(card, plain);
    }

    #[test]
    fn resample_filter_resolves_every_variant() {
        assert_eq!(
            ResampleFilter::NearestNeighbor.filter_type(),
            FilterType::Nearest
        );
        assert_eq!(ResampleFilter::Bilinear.filter_type(), FilterType::Triangle);
        assert_eq!(ResampleFilter::Lanczos.filter_type(), FilterType::Lanczos3);
    }
}
