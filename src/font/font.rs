// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use skrifa::raw::types::Tag;
use skrifa::raw::{FileRef, TableProvider};
use skrifa::string::StringId;
use skrifa::{GlyphId, MetadataProvider};
use smol_str::SmolStr;

use crate::{Error, FontWeight, Result, Slant};

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");
const CFF: Tag = Tag::new(b"CFF ");
const CFF2: Tag = Tag::new(b"CFF2");

/// Number of faces in a font file or collection
pub(crate) fn face_count(data: &[u8]) -> Result<u32> {
    match FileRef::new(data)? {
        FileRef::Font(_) => Ok(1),
        FileRef::Collection(collection) => Ok(collection.len()),
    }
}

/// Whether the character map of face `index` maps `codepoint` to a real glyph
///
/// Only the table directory, `maxp` and `cmap` are read.
pub(crate) fn cmap_covers(data: &[u8], index: u32, codepoint: u32) -> Result<bool> {
    let font = skrifa::FontRef::from_index(data, index)?;
    let glyph_count = u32::from(font.maxp()?.num_glyphs());
    Ok(font
        .charmap()
        .map(codepoint)
        .is_some_and(|glyph| glyph != GlyphId::NOTDEF && glyph.to_u32() < glyph_count))
}

/// A validated font face, backed by the bytes of its file
pub struct Font {
    data: Arc<[u8]>,
    index: u32,
    glyph_count: u32,
    swash_offset: u32,
    swash_key: swash::CacheKey,
}

impl Font {
    /// Validate face `index` of `data`
    ///
    /// Unparseable data is [`Error::FailedToOpen`], an out of range index or a face without
    /// scalable outlines is [`Error::NotSupported`].
    pub fn new(data: Arc<[u8]>, index: u32) -> Result<Self> {
        let count = face_count(&data)?;
        if index >= count {
            log::warn!("face index {} out of range, file has {} faces", index, count);
            return Err(Error::NotSupported);
        }

        let glyph_count = {
            let font = skrifa::FontRef::from_index(&data, index)?;
            // Missing or truncated required tables mean the file cannot be used at all
            font.head()?;
            let maxp = font.maxp()?;

            let truetype = font.table_data(GLYF).is_some() && font.table_data(LOCA).is_some();
            let postscript = font.table_data(CFF).is_some() || font.table_data(CFF2).is_some();
            if !truetype && !postscript {
                log::warn!("face {} has no supported outlines", index);
                return Err(Error::NotSupported);
            }

            u32::from(maxp.num_glyphs())
        };

        let (swash_offset, swash_key) = match swash::FontRef::from_index(&data, index as usize) {
            Some(font) => (font.offset, font.key),
            None => {
                log::warn!("swash rejected face {}", index);
                return Err(Error::NotSupported);
            }
        };

        Ok(Self {
            data,
            index,
            glyph_count,
            swash_offset,
            swash_key,
        })
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    pub fn as_skrifa(&self) -> Result<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.index).map_err(|err| {
            log::warn!("failed to reparse validated face: {}", err);
            Error::Unexpected
        })
    }

    pub fn as_swash(&self) -> swash::FontRef<'_> {
        swash::FontRef {
            data: &self.data,
            offset: self.swash_offset,
            key: self.swash_key,
        }
    }

    /// Glyph mapped to `codepoint`, or `.notdef` when unmapped
    ///
    /// A cmap entry pointing past the last glyph also gives `.notdef`.
    pub fn glyph_index(&self, codepoint: u32) -> Result<u32> {
        let font = self.as_skrifa()?;
        let glyph = font.charmap().map(codepoint).unwrap_or(GlyphId::NOTDEF).to_u32();
        if glyph >= self.glyph_count {
            log::debug!(
                "cmap maps U+{:04X} to glyph {} of {}",
                codepoint,
                glyph,
                self.glyph_count
            );
            return Ok(GlyphId::NOTDEF.to_u32());
        }
        Ok(glyph)
    }

    /// Family name, preferring the typographic family
    pub fn family(&self) -> Result<SmolStr> {
        let font = self.as_skrifa()?;
        let family = [StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]
            .into_iter()
            .find_map(|id| font.localized_strings(id).english_or_first())
            .map(|name| SmolStr::new(name.to_string()))
            .unwrap_or_default();
        Ok(family)
    }

    pub fn weight_and_slant(&self) -> Result<(FontWeight, Slant)> {
        use skrifa::attribute::Style;

        let attributes = self.as_skrifa()?.attributes();
        let weight = FontWeight::from_os2(attributes.weight.value().round().clamp(0.0, 1000.0) as u16);
        let slant = match attributes.style {
            Style::Normal => Slant::Roman,
            Style::Italic => Slant::Italic,
            Style::Oblique(_) => Slant::Oblique,
        };
        Ok((weight, slant))
    }
}
