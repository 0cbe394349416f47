// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::{Cell, OnceCell, RefCell, RefMut};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::path::{Path, PathBuf};

use crate::render::{Rasterize, SwashRasterizer};
use crate::{
    cmap_covers, CollectionDescriptor, Error, Face, FaceOptions, FontCollection, Result,
};

static NEXT_LIBRARY_ID: AtomicU64 = AtomicU64::new(1);

/// Configuration of a [`Library`]
#[derive(Clone, Debug, PartialEq)]
pub struct LibraryConfig {
    dpi: f32,
    system_fonts: bool,
    font_dirs: Vec<PathBuf>,
    font_files: Vec<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            dpi: 72.0,
            system_fonts: true,
            font_dirs: Vec::new(),
            font_files: Vec::new(),
        }
    }
}

impl LibraryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution that point sizes are scaled at, 72 maps one point to one pixel
    pub fn dpi(mut self, dpi: f32) -> Self {
        if dpi.is_finite() && dpi > 0.0 {
            self.dpi = dpi;
        } else {
            log::warn!("ignoring invalid dpi {}, keeping {}", dpi, self.dpi);
        }
        self
    }

    /// Whether font collections scan the platform font directories
    pub fn system_fonts(mut self, system_fonts: bool) -> Self {
        self.system_fonts = system_fonts;
        self
    }

    /// Scan `dir` recursively in addition to the system fonts
    pub fn font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// Add a single font file to the collection inventory
    pub fn font_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.font_files.push(file.into());
        self
    }

    pub fn get_dpi(&self) -> f32 {
        self.dpi
    }

    pub fn uses_system_fonts(&self) -> bool {
        self.system_fonts
    }

    pub fn font_dirs(&self) -> &[PathBuf] {
        &self.font_dirs
    }

    pub fn font_files(&self) -> &[PathBuf] {
        &self.font_files
    }
}

/// Process-wide font state: the rasterizer and the cached font inventory
///
/// Every [`Face`], [`FontCollection`] and [`crate::DeferredFace`] borrows the library it was
/// created from, so a library always outlives its handles. A library is not `Sync`, handles
/// derived from it must stay on one thread at a time.
pub struct Library {
    id: u64,
    config: LibraryConfig,
    rasterizer: RefCell<Box<dyn Rasterize>>,
    db: OnceCell<fontdb::Database>,
    live: Cell<usize>,
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("live", &self.live.get())
            .finish_non_exhaustive()
    }
}

impl Library {
    /// Create a library with the default configuration
    ///
    /// # Timing
    ///
    /// This does not touch the file system. The font inventory is built by the first
    /// [`Library::open_collection`], which can take up to a second with many fonts installed.
    pub fn new() -> Result<Self> {
        Self::new_with_config(LibraryConfig::default())
    }

    pub fn new_with_config(config: LibraryConfig) -> Result<Self> {
        let rasterizer: Box<dyn Rasterize> = Box::new(SwashRasterizer::new());
        let id = NEXT_LIBRARY_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("library {} using {} rasterizer", id, rasterizer.name());

        Ok(Self {
            id,
            config,
            rasterizer: RefCell::new(rasterizer),
            db: OnceCell::new(),
            live: Cell::new(0),
        })
    }

    /// Release the library, equivalent to dropping it
    pub fn done(self) {
        log::debug!("library {} done", self.id);
    }

    /// Identifier unique to this library within the process
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Number of faces, collections and deferred faces still borrowing this library
    pub fn live_handles(&self) -> usize {
        self.live.get()
    }

    /// Open a face, see [`Face::open`]
    pub fn open_face(&self, path: impl AsRef<Path>, options: FaceOptions) -> Result<Face<'_>> {
        Face::open(self, path, options)
    }

    /// Start enumerating inventory fonts matching `descriptor`
    pub fn open_collection(&self, descriptor: CollectionDescriptor) -> Result<FontCollection<'_>> {
        FontCollection::new(self, descriptor)
    }

    /// Forget the cached font inventory, the next collection rescans
    pub fn refresh_fonts(&mut self) {
        self.db = OnceCell::new();
    }

    /// Pixels per em for a size in points
    pub(crate) fn ppem(&self, size: f32) -> f32 {
        size * self.config.dpi / 72.0
    }

    pub(crate) fn rasterizer(&self) -> Result<RefMut<'_, Box<dyn Rasterize>>> {
        self.rasterizer.try_borrow_mut().map_err(|_| {
            log::warn!("rasterizer of library {} is already in use", self.id);
            Error::Unexpected
        })
    }

    pub(crate) fn db(&self) -> &fontdb::Database {
        self.db.get_or_init(|| self.load_db())
    }

    /// Whether inventory face `id` maps `codepoint`, reading only its character map
    pub(crate) fn face_covers(&self, id: fontdb::ID, codepoint: u32) -> Result<bool> {
        match self
            .db()
            .with_face_data(id, |data, index| cmap_covers(data, index, codepoint))
        {
            Some(covers) => covers,
            None => {
                log::warn!("failed to load data of font {:?}", id);
                Err(Error::FailedToOpen)
            }
        }
    }

    fn load_db(&self) -> fontdb::Database {
        let now = std::time::Instant::now();

        let mut db = fontdb::Database::new();
        if self.config.system_fonts {
            db.load_system_fonts();
        }
        for dir in &self.config.font_dirs {
            db.load_fonts_dir(dir);
        }
        for file in &self.config.font_files {
            if let Err(err) = db.load_font_file(file) {
                log::warn!("failed to load font file '{}': {}", file.display(), err);
            }
        }

        log::info!(
            "Parsed {} font faces in {}ms.",
            db.len(),
            now.elapsed().as_millis()
        );

        db
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.live.get(),
            0,
            "library {} released while handles are alive",
            self.id
        );
    }
}

/// Accounts for one live handle borrowing a [`Library`]
#[derive(Debug)]
pub(crate) struct HandleGuard<'a> {
    live: &'a Cell<usize>,
}

impl<'a> HandleGuard<'a> {
    pub fn new(library: &'a Library) -> Self {
        library.live.set(library.live.get() + 1);
        Self {
            live: &library.live,
        }
    }
}

impl Drop for HandleGuard<'_> {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}
