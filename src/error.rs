// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io;

/// Errors returned by every fallible operation
///
/// Each variant has a fixed meaning and a stable code across the C boundary, see
/// [`crate::ffi::FatError`]. Exhausting a [`crate::FontCollection`] is not an error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum Error {
    /// The path does not name a readable file, or the file is not a font container
    #[error("failed to open font")]
    FailedToOpen,
    /// The container parses, but the requested face or its outline format is unavailable
    #[error("font face not supported")]
    NotSupported,
    /// The path is not valid text in the boundary encoding
    #[error("invalid path encoding")]
    InvalidEncoding,
    /// A null or invalid handle, output slot or argument was passed
    #[error("invalid pointer or argument")]
    InvalidPointer,
    /// An allocation could not be satisfied
    #[error("out of memory")]
    OutOfMemory,
    /// A backend failure that fits no other category
    #[error("unexpected backend error")]
    Unexpected,
}

impl Error {
    /// Diagnostic name of this error, for logs and messages only
    pub const fn name(self) -> &'static str {
        match self {
            Self::FailedToOpen => "failed-to-open",
            Self::NotSupported => "not-supported",
            Self::InvalidEncoding => "invalid-encoding",
            Self::InvalidPointer => "invalid-pointer",
            Self::OutOfMemory => "out-of-memory",
            Self::Unexpected => "unexpected",
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::OutOfMemory => Self::OutOfMemory,
            _ => Self::FailedToOpen,
        }
    }
}

impl From<skrifa::raw::ReadError> for Error {
    fn from(err: skrifa::raw::ReadError) -> Self {
        use skrifa::raw::ReadError;

        match err {
            ReadError::InvalidCollectionIndex(_) => Self::NotSupported,
            _ => Self::FailedToOpen,
        }
    }
}

/// Result alias used throughout this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
