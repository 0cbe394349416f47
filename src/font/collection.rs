// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use core::iter::FusedIterator;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::font::matches::Matcher;
use crate::{
    style_name, CollectionDescriptor, Face, FaceInfo, FaceOptions, FontWeight, HandleGuard,
    Library, Result, Slant,
};

/// A font from the inventory snapshot, described by name metadata only
#[derive(Clone, Debug)]
struct Candidate {
    id: fontdb::ID,
    path: PathBuf,
    index: u32,
    families: Vec<SmolStr>,
    weight: FontWeight,
    slant: Slant,
}

impl Candidate {
    fn from_face_info(face: &fontdb::FaceInfo) -> Option<Self> {
        let path = match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => path.clone(),
            fontdb::Source::Binary(_) => {
                log::debug!("{:?}: skipping font without a path", face.id);
                return None;
            }
        };

        let families: Vec<SmolStr> = face
            .families
            .iter()
            .map(|(family, _language)| SmolStr::new(family))
            .filter(|family| !family.is_empty())
            .collect();
        if families.is_empty() {
            log::debug!("{:?}: skipping unnamed font '{}'", face.id, path.display());
            return None;
        }

        Some(Self {
            id: face.id,
            path,
            index: face.index,
            families,
            weight: face.weight.into(),
            slant: face.style.into(),
        })
    }
}

/// How much of a [`DeferredFace`] has been examined
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeferredState {
    /// Only name metadata is known
    NameOnly,
    /// The character map was read for `codepoint`
    CoverageChecked { codepoint: u32, covered: bool },
}

/// Lazy single-pass enumeration of inventory fonts matching a [`CollectionDescriptor`]
///
/// The inventory is snapshotted when the collection is opened. Each matching font is yielded
/// at most once, in a stable order, and [`FontCollection::next_face`] keeps returning `None`
/// once exhausted.
pub struct FontCollection<'a> {
    library: &'a Library,
    descriptor: CollectionDescriptor,
    matcher: Matcher,
    candidates: Vec<Candidate>,
    cursor: usize,
    yielded: FxHashSet<(PathBuf, u32)>,
    _guard: HandleGuard<'a>,
}

impl fmt::Debug for FontCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCollection")
            .field("library", &self.library.id())
            .field("descriptor", &self.descriptor)
            .field("cursor", &self.cursor)
            .field("len", &self.candidates.len())
            .finish_non_exhaustive()
    }
}

impl<'a> FontCollection<'a> {
    pub(crate) fn new(library: &'a Library, descriptor: CollectionDescriptor) -> Result<Self> {
        let matcher = descriptor.matcher()?;

        let candidates: Vec<Candidate> = library
            .db()
            .faces()
            .filter_map(Candidate::from_face_info)
            .collect();
        log::debug!(
            "collection for {:?} over {} candidates",
            descriptor,
            candidates.len()
        );

        Ok(Self {
            library,
            descriptor,
            matcher,
            candidates,
            cursor: 0,
            yielded: FxHashSet::default(),
            _guard: HandleGuard::new(library),
        })
    }

    pub fn descriptor(&self) -> &CollectionDescriptor {
        &self.descriptor
    }

    /// Number of candidates in the snapshot, before filtering
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of candidates examined so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.candidates.len()
    }

    /// Advance to the next matching font
    ///
    /// Returns `Ok(None)` when no candidates remain. If a candidate's data cannot be read for a
    /// coverage check, the error is returned with the cursor already past that candidate, so
    /// calling again continues with the rest.
    pub fn next_face(&mut self) -> Result<Option<DeferredFace<'a>>> {
        while let Some(candidate) = self.candidates.get(self.cursor) {
            self.cursor += 1;

            if !self
                .matcher
                .matches_names(&candidate.families, candidate.weight, candidate.slant)
            {
                continue;
            }

            let key = (candidate.path.clone(), candidate.index);
            if self.yielded.contains(&key) {
                log::debug!("{:?}: duplicate of an earlier result", candidate.id);
                continue;
            }

            let state = match self.matcher.codepoint {
                Some(codepoint) => {
                    if !self.library.face_covers(candidate.id, codepoint)? {
                        continue;
                    }
                    DeferredState::CoverageChecked {
                        codepoint,
                        covered: true,
                    }
                }
                None => DeferredState::NameOnly,
            };

            log::debug!(
                "{:?}: matched '{}' face {} family '{}'",
                candidate.id,
                candidate.path.display(),
                candidate.index,
                candidate.families[0]
            );

            self.yielded.insert(key);
            return Ok(Some(DeferredFace::new(
                self.library,
                candidate,
                self.descriptor.size,
                state,
            )));
        }

        Ok(None)
    }

    /// Release the collection, equivalent to dropping it
    ///
    /// Faces already yielded stay valid.
    pub fn done(self) {}
}

impl<'a> Iterator for FontCollection<'a> {
    type Item = Result<DeferredFace<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_face().transpose()
    }
}

impl FusedIterator for FontCollection<'_> {}

/// A font found by a [`FontCollection`], carrying metadata but no glyph data
///
/// Glyph operations need a full [`Face`], see [`DeferredFace::open_face`].
pub struct DeferredFace<'a> {
    library: &'a Library,
    id: fontdb::ID,
    path: PathBuf,
    index: u32,
    info: FaceInfo,
    state: DeferredState,
    _guard: HandleGuard<'a>,
}

impl fmt::Debug for DeferredFace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredFace")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("info", &self.info)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> DeferredFace<'a> {
    fn new(library: &'a Library, candidate: &Candidate, size: f32, state: DeferredState) -> Self {
        Self {
            library,
            id: candidate.id,
            path: candidate.path.clone(),
            index: candidate.index,
            info: FaceInfo {
                family: candidate.families[0].clone(),
                size,
                weight: candidate.weight,
                slant: candidate.slant,
            },
            state,
            _guard: HandleGuard::new(library),
        }
    }

    /// Metadata gathered during discovery, never does I/O
    pub fn info(&self) -> &FaceInfo {
        &self.info
    }

    pub fn style_name(&self) -> String {
        style_name(self.info.weight, self.info.slant)
    }

    /// File a full face would be opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn face_index(&self) -> u32 {
        self.index
    }

    pub fn state(&self) -> DeferredState {
        self.state
    }

    /// Read the character map and record whether it covers `codepoint`
    pub fn check_coverage(&mut self, codepoint: u32) -> Result<bool> {
        let covered = self.library.face_covers(self.id, codepoint)?;
        self.state = DeferredState::CoverageChecked { codepoint, covered };
        Ok(covered)
    }

    /// Open the full face this handle refers to, at the size it reports
    pub fn open_face(&self) -> Result<Face<'a>> {
        let options = FaceOptions::new(self.info.size).face_index(self.index);
        Face::open(self.library, &self.path, options)
    }

    /// Replace this handle with the full face, see [`DeferredFace::open_face`]
    pub fn upgrade(self) -> Result<Face<'a>> {
        self.open_face()
    }

    /// Release the handle, equivalent to dropping it
    pub fn done(self) {}
}
