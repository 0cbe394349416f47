// SPDX-License-Identifier: MIT OR Apache-2.0

//! # fat
//!
//! A font abstraction layer that hides the concrete font engine behind a small, stable API. It
//! opens font faces from files, resolves codepoints to glyphs, measures and rasterizes glyphs to
//! 8-bit coverage bitmaps, and enumerates installed fonts matching a descriptor. Font discovery
//! utilizes fontdb, table parsing utilizes skrifa and rasterization utilizes swash.
//!
//! Start by creating a [Library]. Open a [Face] directly from a path, or discover fonts with a
//! [FontCollection] and upgrade the [DeferredFace] handles you are interested in.
//!
//! ```no_run
//! use fat::{CollectionDescriptor, FaceOptions, Library};
//!
//! // A Library owns the rasterizer and the font inventory, create one per application
//! let library = Library::new()?;
//!
//! // Open a face at 32 points
//! let face = library.open_face("tests/arial.ttf", FaceOptions::new(32.0))?;
//! let glyph = face.glyph_index('A' as u32)?;
//! let bitmap = face.render_glyph(glyph)?;
//! assert_eq!(bitmap.data().len(), (bitmap.width * bitmap.height) as usize);
//!
//! // Find installed fonts that can display a snowman
//! let mut collection = library.open_collection(CollectionDescriptor::new(16.0).codepoint('☃'))?;
//! while let Some(deferred) = collection.next_face()? {
//!     println!("{}", deferred.info());
//! }
//! # Ok::<(), fat::Error>(())
//! ```
//!
//! The C interface in [ffi] exposes the same operations through opaque handles.

pub use self::attrs::*;
mod attrs;

pub use self::error::*;
mod error;

pub mod ffi;

pub use self::font::*;
mod font;

mod glyph_cache;

pub use self::render::{GlyphBBox, GlyphBitmap};
mod render;
