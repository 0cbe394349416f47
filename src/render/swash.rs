// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Scaler, Source};
use swash::zeno::{Format, Placement};

use super::{GlyphBBox, GlyphBitmap, Rasterize};
use crate::{Error, Font, Result};

/// Rasterizer backed by the swash scaler
pub(crate) struct SwashRasterizer {
    context: ScaleContext,
}

impl fmt::Debug for SwashRasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("SwashRasterizer { .. }")
    }
}

impl SwashRasterizer {
    pub fn new() -> Self {
        Self {
            context: ScaleContext::new(),
        }
    }

    fn scaler<'a>(context: &'a mut ScaleContext, font: &'a Font, ppem: f32) -> Scaler<'a> {
        // Hinting is off so the outline bounds and the rendered mask agree
        context
            .builder(font.as_swash())
            .size(ppem)
            .hint(false)
            .build()
    }

    fn outline_bbox(scaler: &mut Scaler<'_>, glyph: u16) -> GlyphBBox {
        let outline = match scaler.scale_outline(glyph) {
            Some(some) => some,
            None => {
                log::debug!("glyph {} has no outline", glyph);
                return GlyphBBox::default();
            }
        };

        let bounds = outline.bounds();
        if !(bounds.min.x < bounds.max.x && bounds.min.y < bounds.max.y) {
            return GlyphBBox::default();
        }

        let left = bounds.min.x.floor();
        let bottom = bounds.min.y.floor();
        let right = bounds.max.x.ceil();
        let top = bounds.max.y.ceil();
        GlyphBBox {
            width: (right - left) as u32,
            height: (top - bottom) as u32,
            left: left as i32,
            top: top as i32,
        }
    }
}

impl Rasterize for SwashRasterizer {
    fn name(&self) -> &'static str {
        "swash"
    }

    fn glyph_bbox(&mut self, font: &Font, ppem: f32, glyph: u16) -> Result<GlyphBBox> {
        let mut scaler = Self::scaler(&mut self.context, font, ppem);
        Ok(Self::outline_bbox(&mut scaler, glyph))
    }

    fn render_glyph(
        &mut self,
        font: &Font,
        ppem: f32,
        glyph: u16,
        bbox: GlyphBBox,
    ) -> Result<GlyphBitmap> {
        let mut data = Vec::new();
        if data.try_reserve_exact(bbox.area()).is_err() {
            log::warn!("failed to allocate {}x{} glyph bitmap", bbox.width, bbox.height);
            return Err(Error::OutOfMemory);
        }
        data.resize(bbox.area(), 0u8);

        if bbox.is_empty() {
            return Ok(GlyphBitmap::new(bbox, data));
        }

        let mut scaler = Self::scaler(&mut self.context, font, ppem);
        let image = match Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, glyph)
        {
            Some(some) => some,
            None => {
                log::warn!("swash failed to render glyph {}", glyph);
                return Err(Error::Unexpected);
            }
        };

        if !matches!(image.content, Content::Mask) {
            log::warn!("glyph {} did not render to an alpha mask", glyph);
            return Err(Error::Unexpected);
        }

        // Copy the mask into the ink box, the two normally coincide exactly
        blit(&image.data, image.placement, &mut data, &bbox);

        Ok(GlyphBitmap::new(bbox, data))
    }
}

/// Copy `mask`, placed at `placement`, into the `bbox` sized `data`, clipping what falls outside
fn blit(mask: &[u8], placement: Placement, data: &mut [u8], bbox: &GlyphBBox) {
    let dx = i64::from(placement.left) - i64::from(bbox.left);
    let dy = i64::from(bbox.top) - i64::from(placement.top);
    let src_width = placement.width as usize;
    let dst_width = bbox.width as usize;
    for row in 0..placement.height {
        let y = i64::from(row) + dy;
        if y < 0 || y >= i64::from(bbox.height) {
            continue;
        }
        for col in 0..placement.width {
            let x = i64::from(col) + dx;
            if x < 0 || x >= i64::from(bbox.width) {
                continue;
            }
            let src = row as usize * src_width + col as usize;
            let dst = y as usize * dst_width + x as usize;
            if let (Some(&coverage), Some(sample)) = (mask.get(src), data.get_mut(dst)) {
                *sample = coverage;
            }
        }
    }
}
