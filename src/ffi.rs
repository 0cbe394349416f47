// SPDX-License-Identifier: MIT OR Apache-2.0

//! C interface over opaque handles.
//!
//! Every function returns a [`FatError`]. Handles are boxed Rust values that C only passes back,
//! and every `*_done` function accepts null. Children (faces, collections, deferred faces) must
//! be released before the library they came from; debug builds assert on this.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::{
    CollectionDescriptor, DeferredFace, Error, Face, FaceOptions, FontCollection, FontWeight,
    GlyphBBox, Library, LibraryConfig, Slant,
};

/// Error codes of the C interface
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(C)]
pub enum FatError {
    Ok = 0,
    FailedToOpen,
    NotSupported,
    InvalidEncoding,
    InvalidPointer,
    OutOfMemory,
    Unexpected,
}

impl FatError {
    pub const fn name(self) -> &'static CStr {
        match self {
            Self::Ok => c"ok",
            Self::FailedToOpen => c"failed-to-open",
            Self::NotSupported => c"not-supported",
            Self::InvalidEncoding => c"invalid-encoding",
            Self::InvalidPointer => c"invalid-pointer",
            Self::OutOfMemory => c"out-of-memory",
            Self::Unexpected => c"unexpected",
        }
    }
}

impl From<Error> for FatError {
    fn from(err: Error) -> Self {
        match err {
            Error::FailedToOpen => Self::FailedToOpen,
            Error::NotSupported => Self::NotSupported,
            Error::InvalidEncoding => Self::InvalidEncoding,
            Error::InvalidPointer => Self::InvalidPointer,
            Error::OutOfMemory => Self::OutOfMemory,
            Error::Unexpected => Self::Unexpected,
        }
    }
}

impl<T> From<Result<T, Error>> for FatError {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.into(),
        }
    }
}

/// Opaque library handle
pub struct FatLibrary(Library);

/// Opaque face handle
pub struct FatFace(Face<'static>);

/// Opaque collection handle
pub struct FatCollection(FontCollection<'static>);

/// Opaque deferred face handle, owning the C copy of its family name
pub struct FatDeferredFace {
    face: DeferredFace<'static>,
    family: CString,
}

/// Library configuration passed by value, a null `font_dir` adds no directory
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct FatLibraryConfig {
    pub dpi: f32,
    pub system_fonts: bool,
    pub font_dir: *const c_char,
}

/// Face options passed by value
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct FatFaceOptions {
    pub size: f32,
    pub face_index: u32,
}

/// Collection descriptor passed by value, null strings and zero `has_codepoint` mean no filter
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct FatCollectionDescriptor {
    pub family: *const c_char,
    pub style: *const c_char,
    pub has_codepoint: bool,
    pub codepoint: u32,
    pub size: f32,
}

/// Face info, `family` is borrowed from the deferred face it was read from
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct FatFaceInfo {
    pub family: *const c_char,
    pub size: f32,
    pub weight: FontWeight,
    pub slant: Slant,
}

/// Rendered glyph, `bitmap` holds `width * height` bytes owned by the library until
/// [`fat_face_glyph_render_done`]
#[derive(Debug)]
#[repr(C)]
pub struct FatGlyphRender {
    pub width: u32,
    pub height: u32,
    pub bitmap: *mut u8,
}

impl Default for FatGlyphRender {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            bitmap: ptr::null_mut(),
        }
    }
}

unsafe fn optional_str<'a>(text: *const c_char) -> Result<Option<&'a str>, Error> {
    if text.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(text)
        .to_str()
        .map(Some)
        .map_err(|_| Error::InvalidEncoding)
}

/// Name of an error code, as a static NUL-terminated string
#[no_mangle]
pub extern "C" fn fat_error_name(err: FatError) -> *const c_char {
    err.name().as_ptr()
}

/// Create a library with the default configuration
///
/// # Safety
///
/// `library` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fat_init_library(library: *mut *mut FatLibrary) -> FatError {
    if library.is_null() {
        return FatError::InvalidPointer;
    }
    *library = ptr::null_mut();

    match Library::new() {
        Ok(lib) => {
            *library = Box::into_raw(Box::new(FatLibrary(lib)));
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Create a library with an explicit configuration
///
/// # Safety
///
/// `library` must be null or valid for writes, `config.font_dir` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn fat_init_library_with_config(
    library: *mut *mut FatLibrary,
    config: FatLibraryConfig,
) -> FatError {
    if library.is_null() {
        return FatError::InvalidPointer;
    }
    *library = ptr::null_mut();

    let mut lib_config = LibraryConfig::new()
        .dpi(config.dpi)
        .system_fonts(config.system_fonts);
    match optional_str(config.font_dir) {
        Ok(Some(dir)) => lib_config = lib_config.font_dir(dir),
        Ok(None) => {}
        Err(err) => return err.into(),
    }

    match Library::new_with_config(lib_config) {
        Ok(lib) => {
            *library = Box::into_raw(Box::new(FatLibrary(lib)));
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Release a library, null is accepted
///
/// # Safety
///
/// `library` must be null or come from [`fat_init_library`], with every face and collection
/// created from it already released.
#[no_mangle]
pub unsafe extern "C" fn fat_library_done(library: *mut FatLibrary) -> FatError {
    if !library.is_null() {
        drop(Box::from_raw(library));
    }
    FatError::Ok
}

/// Open face `options.face_index` of the font at the UTF-8 `path`
///
/// # Safety
///
/// `library` must be a live library, `face` valid for writes and `path` null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn fat_open_face(
    library: *const FatLibrary,
    face: *mut *mut FatFace,
    path: *const c_char,
    options: FatFaceOptions,
) -> FatError {
    if face.is_null() {
        return FatError::InvalidPointer;
    }
    *face = ptr::null_mut();
    if library.is_null() || path.is_null() {
        return FatError::InvalidPointer;
    }

    let library: &'static Library = &(*library).0;
    let options = FaceOptions::new(options.size).face_index(options.face_index);
    match Face::open_bytes(library, CStr::from_ptr(path).to_bytes(), options) {
        Ok(opened) => {
            *face = Box::into_raw(Box::new(FatFace(opened)));
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Release a face, null is accepted
///
/// # Safety
///
/// `face` must be null or come from [`fat_open_face`] and not be released yet.
#[no_mangle]
pub unsafe extern "C" fn fat_face_done(face: *mut FatFace) -> FatError {
    if !face.is_null() {
        drop(Box::from_raw(face));
    }
    FatError::Ok
}

/// Resolve a codepoint, unmapped codepoints give glyph 0
///
/// # Safety
///
/// `face` must be null or live, `index` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fat_face_glyph_index(
    face: *const FatFace,
    codepoint: u32,
    index: *mut u32,
) -> FatError {
    if face.is_null() || index.is_null() {
        return FatError::InvalidPointer;
    }
    match (*face).0.glyph_index(codepoint) {
        Ok(glyph) => {
            *index = glyph;
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Ink bounding box of a glyph
///
/// # Safety
///
/// `face` must be null or live, `bbox` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fat_face_glyph_bbox(
    face: *const FatFace,
    index: u32,
    bbox: *mut GlyphBBox,
) -> FatError {
    if face.is_null() || bbox.is_null() {
        return FatError::InvalidPointer;
    }
    match (*face).0.glyph_bbox(index) {
        Ok(measured) => {
            *bbox = measured;
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Rasterize a glyph into `glyph`, which must later go to [`fat_face_glyph_render_done`]
///
/// # Safety
///
/// `face` must be null or live, `glyph` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fat_face_render_glyph(
    face: *const FatFace,
    index: u32,
    glyph: *mut FatGlyphRender,
) -> FatError {
    if face.is_null() || glyph.is_null() {
        return FatError::InvalidPointer;
    }
    *glyph = FatGlyphRender::default();

    match (*face).0.render_glyph(index) {
        Ok(bitmap) => {
            let (width, height) = (bitmap.width, bitmap.height);
            let data = bitmap.into_data().into_boxed_slice();
            *glyph = FatGlyphRender {
                width,
                height,
                bitmap: Box::into_raw(data).cast::<u8>(),
            };
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Free a rendered glyph's bitmap and reset the slot, safe to call again
///
/// # Safety
///
/// `glyph` must be null or point to a slot filled by [`fat_face_render_glyph`] or reset by
/// this function.
#[no_mangle]
pub unsafe extern "C" fn fat_face_glyph_render_done(glyph: *mut FatGlyphRender) -> FatError {
    if glyph.is_null() {
        return FatError::Ok;
    }

    let render = &mut *glyph;
    if !render.bitmap.is_null() {
        let len = render.width as usize * render.height as usize;
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(render.bitmap, len)));
    }
    *render = FatGlyphRender::default();
    FatError::Ok
}

/// Start enumerating fonts matching `descriptor`
///
/// # Safety
///
/// `library` must be live, `collection` valid for writes and the descriptor strings null or
/// NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn fat_open_collection(
    library: *const FatLibrary,
    descriptor: FatCollectionDescriptor,
    collection: *mut *mut FatCollection,
) -> FatError {
    if collection.is_null() {
        return FatError::InvalidPointer;
    }
    *collection = ptr::null_mut();
    if library.is_null() {
        return FatError::InvalidPointer;
    }

    let mut filter = CollectionDescriptor::new(descriptor.size);
    match optional_str(descriptor.family) {
        Ok(Some(family)) => filter = filter.family(family),
        Ok(None) => {}
        Err(err) => return err.into(),
    }
    match optional_str(descriptor.style) {
        Ok(Some(style)) => filter = filter.style(style),
        Ok(None) => {}
        Err(err) => return err.into(),
    }
    if descriptor.has_codepoint {
        filter = filter.codepoint(descriptor.codepoint);
    }

    let library: &'static Library = &(*library).0;
    match library.open_collection(filter) {
        Ok(opened) => {
            *collection = Box::into_raw(Box::new(FatCollection(opened)));
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Advance a collection, an exhausted collection returns `Ok` with a null `face`
///
/// # Safety
///
/// `collection` must be live and `face` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fat_collection_next(
    collection: *mut FatCollection,
    face: *mut *mut FatDeferredFace,
) -> FatError {
    if face.is_null() {
        return FatError::InvalidPointer;
    }
    *face = ptr::null_mut();
    if collection.is_null() {
        return FatError::InvalidPointer;
    }

    match (*collection).0.next_face() {
        Ok(Some(deferred)) => {
            let family = c_family(&deferred.info().family);
            *face = Box::into_raw(Box::new(FatDeferredFace {
                face: deferred,
                family,
            }));
            FatError::Ok
        }
        Ok(None) => FatError::Ok,
        Err(err) => err.into(),
    }
}

/// Family name as a C string, cut at the first interior NUL
fn c_family(name: &str) -> CString {
    let name = name.split('\0').next().unwrap_or_default();
    CString::new(name).unwrap_or_default()
}

/// Read the cheap metadata of a deferred face
///
/// # Safety
///
/// `face` must be live and `info` valid for writes. `info.family` lives as long as `face`.
#[no_mangle]
pub unsafe extern "C" fn fat_deferred_face_info(
    face: *const FatDeferredFace,
    info: *mut FatFaceInfo,
) -> FatError {
    if face.is_null() || info.is_null() {
        return FatError::InvalidPointer;
    }
    let deferred = &*face;
    let face_info = deferred.face.info();
    *info = FatFaceInfo {
        family: deferred.family.as_ptr(),
        size: face_info.size,
        weight: face_info.weight,
        slant: face_info.slant,
    };
    FatError::Ok
}

/// Open the full face of a deferred face, which stays owned by the caller
///
/// # Safety
///
/// `deferred` must be live and `face` valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fat_deferred_face_open_face(
    deferred: *const FatDeferredFace,
    face: *mut *mut FatFace,
) -> FatError {
    if face.is_null() {
        return FatError::InvalidPointer;
    }
    *face = ptr::null_mut();
    if deferred.is_null() {
        return FatError::InvalidPointer;
    }

    match (*deferred).face.open_face() {
        Ok(opened) => {
            *face = Box::into_raw(Box::new(FatFace(opened)));
            FatError::Ok
        }
        Err(err) => err.into(),
    }
}

/// Release a deferred face, null is accepted
///
/// # Safety
///
/// `face` must be null or come from [`fat_collection_next`] and not be released yet.
#[no_mangle]
pub unsafe extern "C" fn fat_deferred_face_done(face: *mut FatDeferredFace) -> FatError {
    if !face.is_null() {
        drop(Box::from_raw(face));
    }
    FatError::Ok
}

/// Release a collection, null is accepted; deferred faces it yielded stay valid
///
/// # Safety
///
/// `collection` must be null or come from [`fat_open_collection`] and not be released yet.
#[no_mangle]
pub unsafe extern "C" fn fat_collection_done(collection: *mut FatCollection) -> FatError {
    if !collection.is_null() {
        drop(Box::from_raw(collection));
    }
    FatError::Ok
}
