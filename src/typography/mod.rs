//! Typography: font resolution, measuring, wrapping and text drawing.
//!
//! [`Typography`] resolves `(path, size)` pairs to [`FontHandle`]s and caches
//! them. Resolution never fails: a missing font falls back to a platform
//! font, then to the built-in bitmap font, logging a warning at each step.

mod builtin;
mod font;
mod layout;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::error::{PostError, Result};

pub use font::{FontHandle, TextMask};
pub use layout::{
    draw_multiline_text, draw_text, draw_text_with_outline, draw_text_with_shadow, wrap_text,
    Align, TextEffect,
};

/// Default headline font, relative to the font base path.
pub const BOLD_FONT: &str = "fonts/Poppins-Bold.ttf";

/// Default body font, relative to the font base path.
pub const REGULAR_FONT: &str = "fonts/Poppins-Regular.ttf";

/// Font candidates tried when a requested font file is missing.
pub fn platform_fallbacks() -> Vec<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &["C:\\Windows\\Fonts\\arialbd.ttf", "C:\\Windows\\Fonts\\arial.ttf"]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        ]
    };
    candidates.iter().map(PathBuf::from).collect()
}

/// Font resolver with a per-instance cache.
///
/// Safe to share between threads; the HTTP server keeps one behind an `Arc`.
pub struct Typography {
    base_path: PathBuf,
    fallbacks: Vec<PathBuf>,
    /// Parsed font files, `None` when the file could not be used.
    faces: RwLock<HashMap<PathBuf, Option<Arc<fontdue::Font>>>>,
    handles: RwLock<HashMap<(String, u32), Arc<FontHandle>>>,
}

impl std::fmt::Debug for Typography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typography")
            .field("base_path", &self.base_path)
            .field("fallbacks", &self.fallbacks)
            .finish_non_exhaustive()
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Typography {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            fallbacks: platform_fallbacks(),
            faces: RwLock::new(HashMap::new()),
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the platform fallback list. An empty list sends every
    /// unresolvable font straight to the built-in bitmap font.
    pub fn with_fallbacks(mut self, fallbacks: Vec<PathBuf>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// A resolver that only ever yields the built-in font.
    pub fn builtin_only() -> Self {
        Self::new(".").with_fallbacks(Vec::new())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a font at the given size.
    pub fn get_font(&self, path: &str, size: u32) -> Arc<FontHandle> {
        let key = (path.to_string(), size);
        if let Some(handle) = read(&self.handles).get(&key) {
            return handle.clone();
        }

        let handle = Arc::new(self.resolve(path, size));
        write(&self.handles).insert(key, handle.clone());
        handle
    }

    /// Number of cached `(path, size)` handles.
    pub fn cached_handles(&self) -> usize {
        read(&self.handles).len()
    }

    fn resolve(&self, path: &str, size: u32) -> FontHandle {
        let requested = self.base_path.join(path);
        if let Some(font) = self.load_face(&requested) {
            return outline(font, size, requested);
        }
        warn!(font = %requested.display(), "font not found, trying platform fallbacks");

        for candidate in &self.fallbacks {
            if let Some(font) = self.load_face(candidate) {
                debug!(font = %candidate.display(), "using fallback font");
                return outline(font, size, candidate.clone());
            }
        }

        warn!(font = path, "no usable font file, using built-in bitmap font");
        FontHandle::Builtin
    }

    fn load_face(&self, path: &Path) -> Option<Arc<fontdue::Font>> {
        if let Some(entry) = read(&self.faces).get(path) {
            return entry.clone();
        }

        let parsed = std::fs::read(path)
            .ok()
            .and_then(|bytes| match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
                Ok(font) => Some(Arc::new(font)),
                Err(e) => {
                    warn!(font = %path.display(), error = e, "could not parse font");
                    None
                }
            });

        write(&self.faces).insert(path.to_path_buf(), parsed.clone());
        parsed
    }

    /// Ink width and height of a single line.
    pub fn text_dimensions(&self, text: &str, font: &FontHandle) -> (i32, i32) {
        font.dimensions(text)
    }

    /// Find the largest size whose single-line width fits `max_width`.
    ///
    /// Sizes are tried from `max_size` down in steps of 2. When nothing
    /// fits the `min_size` font is returned.
    pub fn fit_text_to_width(
        &self,
        text: &str,
        max_width: i32,
        font_path: &str,
        max_size: u32,
        min_size: u32,
    ) -> Result<Arc<FontHandle>> {
        if max_size < min_size {
            return Err(PostError::InvalidArgument {
                message: format!("max font size {} is smaller than min font size {}", max_size, min_size),
                help: Some("Pass max_size >= min_size".to_string()),
            });
        }

        let mut size = max_size;
        loop {
            let font = self.get_font(font_path, size);
            if font.dimensions(text).0 <= max_width {
                return Ok(font);
            }
            match size.checked_sub(2) {
                Some(next) if next >= min_size => size = next,
                _ => break,
            }
        }

        Ok(self.get_font(font_path, min_size))
    }
}

fn outline(font: Arc<fontdue::Font>, size: u32, source: PathBuf) -> FontHandle {
    FontHandle::Outline {
        font,
        size: size as f32,
        source,
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_falls_back_to_builtin() {
        let typography = Typography::builtin_only();
        let font = typography.get_font("fonts/DoesNotExist.ttf", 70);
        assert!(font.is_builtin());
    }

    #[test]
    fn test_font_is_cached_per_path_and_size() {
        let typography = Typography::builtin_only();
        let a = typography.get_font("fonts/a.ttf", 40);
        let b = typography.get_font("fonts/a.ttf", 40);
        assert!(Arc::ptr_eq(&a, &b));

        typography.get_font("fonts/a.ttf", 42);
        typography.get_font("fonts/b.ttf", 40);
        assert_eq!(typography.cached_handles(), 3);
    }

    #[test]
    fn test_garbage_font_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("fonts")).unwrap();
        std::fs::write(dir.path().join("fonts/bad.ttf"), b"not a font").unwrap();

        let typography = Typography::new(dir.path()).with_fallbacks(Vec::new());
        assert!(typography.get_font("fonts/bad.ttf", 30).is_builtin());
    }

    #[test]
    fn test_fit_text_rejects_inverted_range() {
        let typography = Typography::builtin_only();
        let err = typography
            .fit_text_to_width("Hello", 100, BOLD_FONT, 10, 20)
            .unwrap_err();
        assert!(matches!(err, PostError::InvalidArgument { .. }));
    }

    #[test]
    fn test_fit_text_returns_min_when_nothing_fits() {
        let typography = Typography::builtin_only();
        // Builtin glyphs are 8px wide regardless of size, so 5 chars never fit in 10px.
        let font = typography
            .fit_text_to_width("Hello", 10, BOLD_FONT, 30, 20)
            .unwrap();
        assert!(font.is_builtin());
        assert_eq!(typography.cached_handles(), 6); // 30, 28, 26, 24, 22, 20
    }

    #[test]
    fn test_fit_text_stops_at_first_fit() {
        let typography = Typography::builtin_only();
        typography
            .fit_text_to_width("Hi", 100, BOLD_FONT, 30, 20)
            .unwrap();
        assert_eq!(typography.cached_handles(), 1);
    }
}
