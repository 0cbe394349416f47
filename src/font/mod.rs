// SPDX-License-Identifier: MIT OR Apache-2.0

pub use self::collection::*;
mod collection;

pub use self::face::*;
mod face;

pub(crate) use self::font::{cmap_covers, Font};
mod font;

pub use self::matches::*;
pub(crate) mod matches;

pub(crate) use self::system::HandleGuard;
pub use self::system::*;
mod system;
