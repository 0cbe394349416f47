// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Font, Result};

/// Ink bounding box of a glyph, in device pixels
///
/// `left` and `top` place the box relative to the pen origin on the baseline, with `top` growing
/// upwards. A glyph without ink has a zero sized box.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(C)]
pub struct GlyphBBox {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

impl GlyphBBox {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of coverage samples a bitmap of this box holds
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// 8-bit grayscale coverage of a single glyph, top row first
///
/// The bitmap has exactly the dimensions of the glyph's [`GlyphBBox`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    data: Vec<u8>,
}

impl GlyphBitmap {
    pub(crate) fn new(bbox: GlyphBBox, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), bbox.area());
        Self {
            width: bbox.width,
            height: bbox.height,
            left: bbox.left,
            top: bbox.top,
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Coverage at `(x, y)`, or `None` outside the bitmap
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Free the sample buffer, calling this again is a no-op
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    pub fn is_released(&self) -> bool {
        self.data.is_empty() && self.data.capacity() == 0
    }
}

/// A glyph rasterizer backend
pub(crate) trait Rasterize {
    fn name(&self) -> &'static str;

    /// Ink box of `glyph` at `ppem`
    fn glyph_bbox(&mut self, font: &Font, ppem: f32, glyph: u16) -> Result<GlyphBBox>;

    /// Render `glyph` into a bitmap sized to `bbox`
    fn render_glyph(
        &mut self,
        font: &Font,
        ppem: f32,
        glyph: u16,
        bbox: GlyphBBox,
    ) -> Result<GlyphBitmap>;
}

pub(crate) use self::swash::SwashRasterizer;
mod swash;
