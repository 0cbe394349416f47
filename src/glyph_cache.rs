// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::{GlyphBBox, Result};

/// Per-face cache of scaled glyph metrics, keyed by glyph index
///
/// Entries live as long as the face that owns the cache.
#[derive(Debug, Default)]
pub(crate) struct GlyphCache {
    bboxes: RefCell<FxHashMap<u32, GlyphBBox>>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, glyph: u32) -> Option<GlyphBBox> {
        self.bboxes.borrow().get(&glyph).copied()
    }

    /// Return the cached box of `glyph`, computing and storing it on a miss
    ///
    /// Failures are not cached.
    pub fn get_or_insert_with<F>(&self, glyph: u32, f: F) -> Result<GlyphBBox>
    where
        F: FnOnce() -> Result<GlyphBBox>,
    {
        if let Some(bbox) = self.get(glyph) {
            return Ok(bbox);
        }

        let bbox = f()?;
        self.bboxes.borrow_mut().insert(glyph, bbox);
        Ok(bbox)
    }

    pub fn len(&self) -> usize {
        self.bboxes.borrow().len()
    }
}
