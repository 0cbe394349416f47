// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::glyph_cache::GlyphCache;
use crate::{
    Error, FaceInfo, Font, GlyphBBox, GlyphBitmap, HandleGuard, Library, Result,
};

/// Backend assigned glyph identifier, only meaningful for the [`Face`] that produced it
pub type GlyphIndex = u32;

/// Index of the `.notdef` glyph, returned for unmapped codepoints
pub const MISSING_GLYPH: GlyphIndex = 0;

/// Options for opening a [`Face`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct FaceOptions {
    /// Size in points, must be finite and greater than zero
    pub size: f32,
    /// Face within a collection file, zero for single font files
    pub face_index: u32,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            size: 12.0,
            face_index: 0,
        }
    }
}

impl FaceOptions {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn face_index(mut self, face_index: u32) -> Self {
        self.face_index = face_index;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.size.is_finite() && self.size > 0.0 {
            Ok(())
        } else {
            log::warn!("invalid face size {}", self.size);
            Err(Error::InvalidPointer)
        }
    }
}

/// Vertical metrics of a face, scaled to its size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub glyph_count: u32,
    /// Distance from the baseline to the top of the line, in pixels
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line, in pixels
    pub descent: f32,
    /// Recommended extra space between lines, in pixels
    pub leading: f32,
}

/// An opened font face, scaled to the size it was opened with
///
/// Glyph operations take `&self`; the glyph metric cache is private to the face and dropped
/// with it.
pub struct Face<'a> {
    library: &'a Library,
    path: PathBuf,
    font: Font,
    options: FaceOptions,
    ppem: f32,
    glyph_cache: GlyphCache,
    _guard: HandleGuard<'a>,
}

impl fmt::Debug for Face<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("library", &self.library.id())
            .field("path", &self.path)
            .field("options", &self.options)
            .field("ppem", &self.ppem)
            .field("cached_glyphs", &self.glyph_cache.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Face<'a> {
    /// Open face `options.face_index` of the font file at `path`
    ///
    /// # Errors
    ///
    /// - [`Error::FailedToOpen`] if the file cannot be read or is not a font
    /// - [`Error::NotSupported`] if the face index is out of range or has no usable outlines
    /// - [`Error::OutOfMemory`] if the file does not fit in memory
    /// - [`Error::InvalidPointer`] if the size is not a positive number
    pub fn open(library: &'a Library, path: impl AsRef<Path>, options: FaceOptions) -> Result<Self> {
        let path = path.as_ref();
        options.validate()?;

        let data = read_font_file(path)?;
        let font = Font::new(data, options.face_index).map_err(|err| {
            log::warn!("failed to open '{}': {}", path.display(), err.name());
            err
        })?;
        let ppem = library.ppem(options.size);

        log::debug!(
            "opened '{}' face {} at {}pt ({} glyphs)",
            path.display(),
            options.face_index,
            options.size,
            font.glyph_count()
        );

        Ok(Self {
            library,
            path: path.to_path_buf(),
            font,
            options,
            ppem,
            glyph_cache: GlyphCache::new(),
            _guard: HandleGuard::new(library),
        })
    }

    /// Open a face from a path given as raw UTF-8 bytes
    ///
    /// Bytes that are not UTF-8 fail with [`Error::InvalidEncoding`] before touching the file
    /// system.
    pub fn open_bytes(library: &'a Library, path: &[u8], options: FaceOptions) -> Result<Self> {
        let path = core::str::from_utf8(path).map_err(|_| {
            log::warn!("font path is not valid UTF-8");
            Error::InvalidEncoding
        })?;
        Self::open(library, path, options)
    }

    /// Release the face, equivalent to dropping it
    pub fn close(self) {}

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> FaceOptions {
        self.options
    }

    /// Id of the [`Library`] this face belongs to
    pub fn library_id(&self) -> u64 {
        self.library.id()
    }

    pub fn glyph_count(&self) -> u32 {
        self.font.glyph_count()
    }

    /// Resolve `codepoint` through the character map
    ///
    /// Unmapped codepoints resolve to [`MISSING_GLYPH`].
    pub fn glyph_index(&self, codepoint: u32) -> Result<GlyphIndex> {
        self.font.glyph_index(codepoint)
    }

    /// Ink bounding box of `glyph` at the face size
    ///
    /// An index outside the face's glyph range is [`Error::InvalidPointer`].
    pub fn glyph_bbox(&self, glyph: GlyphIndex) -> Result<GlyphBBox> {
        let id = self.check_glyph(glyph)?;
        self.glyph_cache.get_or_insert_with(glyph, || {
            self.library
                .rasterizer()?
                .glyph_bbox(&self.font, self.ppem, id)
        })
    }

    /// Rasterize `glyph` to an 8-bit coverage bitmap with the size of its [`GlyphBBox`]
    pub fn render_glyph(&self, glyph: GlyphIndex) -> Result<GlyphBitmap> {
        let bbox = self.glyph_bbox(glyph)?;
        let id = self.check_glyph(glyph)?;
        self.library
            .rasterizer()?
            .render_glyph(&self.font, self.ppem, id, bbox)
    }

    /// Family, weight and slant read from the font tables
    pub fn info(&self) -> Result<FaceInfo> {
        let (weight, slant) = self.font.weight_and_slant()?;
        Ok(FaceInfo {
            family: self.font.family()?,
            size: self.options.size,
            weight,
            slant,
        })
    }

    pub fn metrics(&self) -> FaceMetrics {
        let metrics = self.font.as_swash().metrics(&[]);
        let scaled = metrics.scale(self.ppem);
        FaceMetrics {
            units_per_em: metrics.units_per_em,
            glyph_count: self.font.glyph_count(),
            ascent: scaled.ascent,
            descent: scaled.descent,
            leading: scaled.leading,
        }
    }

    fn check_glyph(&self, glyph: GlyphIndex) -> Result<u16> {
        if glyph >= self.font.glyph_count() {
            log::warn!(
                "glyph {} out of range for '{}' ({} glyphs)",
                glyph,
                self.path.display(),
                self.font.glyph_count()
            );
            return Err(Error::InvalidPointer);
        }
        u16::try_from(glyph).map_err(|_| Error::InvalidPointer)
    }
}

fn read_font_file(path: &Path) -> Result<Arc<[u8]>> {
    let read = || -> Result<Vec<u8>> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        let len = usize::try_from(len).map_err(|_| Error::OutOfMemory)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
        file.read_to_end(&mut data)?;
        Ok(data)
    };

    match read() {
        Ok(data) => Ok(Arc::from(data)),
        Err(err) => {
            log::warn!("failed to read '{}': {}", path.display(), err.name());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LibraryConfig;

    fn library() -> Library {
        Library::new_with_config(LibraryConfig::new().system_fonts(false)).unwrap()
    }

    #[test]
    fn size_must_be_positive() {
        assert_eq!(FaceOptions::new(0.0).validate(), Err(Error::InvalidPointer));
        assert_eq!(FaceOptions::new(-1.0).validate(), Err(Error::InvalidPointer));
        assert_eq!(FaceOptions::new(f32::INFINITY).validate(), Err(Error::InvalidPointer));
        assert_eq!(FaceOptions::new(0.5).validate(), Ok(()));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let library = library();
        let err = Face::open(&library, "/nonexistent/dir/font.ttf", FaceOptions::new(12.0));
        assert_eq!(err.err(), Some(Error::FailedToOpen));
        assert_eq!(library.live_handles(), 0);
    }

    #[test]
    fn non_utf8_path_is_invalid_encoding() {
        let library = library();
        let err = Face::open_bytes(&library, b"fonts/\xff\xfe.ttf", FaceOptions::new(12.0));
        assert_eq!(err.err(), Some(Error::InvalidEncoding));
    }
}
