//! Display-font bootstrap. The asset is resolved once at startup and
//! handed to the layout engine as a cheap-to-clone handle; a missing or
//! corrupt asset degrades to a system font, never a failed request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use rusttype::Font;
use tracing::{info, warn};

use super::GenError;

const FONT_URL: &str = "https://github.com/google/fonts/raw/main/ofl/anton/Anton-Regular.ttf";

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
];

/// Reference-counted handle to the resolved display font. Empty when
/// neither the asset nor any system fallback could be loaded; the
/// layout engine then skips text instead of failing.
#[derive(Clone, Default)]
pub struct FontHandle(Option<Arc<Font<'static>>>);

impl FontHandle {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn from_font(font: Font<'static>) -> Self {
        Self(Some(Arc::new(font)))
    }

    pub fn get(&self) -> Option<&Font<'static>> {
        self.0.as_deref()
    }
}

fn font_path() -> PathBuf {
    std::env::var("FONT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("assets/fonts/Anton-Regular.ttf"))
}

static SYSTEM_FALLBACK: Lazy<FontHandle> = Lazy::new(|| {
    for path in SYSTEM_FONT_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            if let Some(font) = Font::try_from_vec(bytes) {
                info!(path = *path, "using system fallback font");
                return FontHandle::from_font(font);
            }
        }
    }
    FontHandle::none()
});

pub fn system_fallback() -> FontHandle {
    SYSTEM_FALLBACK.clone()
}

/// Resolves the display font: cached asset first, one-time download if
/// absent, system fallback on any failure. Call once at startup.
pub async fn resolve(http: &reqwest::Client) -> FontHandle {
    let path = font_path();
    match std::fs::read(&path) {
        Ok(bytes) => {
            if let Some(font) = Font::try_from_vec(bytes) {
                return FontHandle::from_font(font);
            }
            warn!(path = %path.display(), "cached font asset is corrupt, falling back");
            return system_fallback();
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read font asset, falling back");
            return system_fallback();
        }
    }

    match fetch_font(http, &path).await {
        Ok(font) => FontHandle::from_font(font),
        Err(e) => {
            warn!(error = %e, "display font download failed, falling back");
            system_fallback()
        }
    }
}

async fn fetch_font(http: &reqwest::Client, path: &Path) -> Result<Font<'static>, GenError> {
    info!(url = FONT_URL, "downloading display font");
    let resp = http
        .get(FONT_URL)
        .send()
        .await
        .map_err(|e| GenError::Fetch(e.to_string()))?
        .error_for_status()
        .map_err(|e| GenError::Fetch(e.to_string()))?;
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| GenError::Fetch(e.to_string()))?
        .to_vec();

    let font = Font::try_from_vec(bytes.clone())
        .ok_or_else(|| GenError::Internal(format!("{FONT_URL} is not a parsable font")))?;

    // best-effort cache; the in-memory font is what matters this run
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = std::fs::write(path, &bytes) {
        warn!(path = %path.display(), error = %e, "could not cache font asset");
    }

    Ok(font)
}
