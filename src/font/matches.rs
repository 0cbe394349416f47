// SPDX-License-Identifier: MIT OR Apache-2.0

use smol_str::SmolStr;

use crate::{style_name, Error, FontWeight, Result, Slant};

/// Filter for enumerating fonts, all present filters must match
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionDescriptor {
    /// Case-insensitive substring of any family name
    pub family: Option<String>,
    /// Case-insensitive style name, such as `Bold Italic`
    pub style: Option<String>,
    /// Codepoint the character map must cover
    pub codepoint: Option<u32>,
    /// Size in points reported by the resulting faces, not a filter
    pub size: f32,
}

impl Default for CollectionDescriptor {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl CollectionDescriptor {
    pub fn new(size: f32) -> Self {
        Self {
            family: None,
            style: None,
            codepoint: None,
            size,
        }
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn codepoint(mut self, codepoint: impl Into<u32>) -> Self {
        self.codepoint = Some(codepoint.into());
        self
    }

    pub(crate) fn matcher(&self) -> Result<Matcher> {
        if !(self.size.is_finite() && self.size > 0.0) {
            log::warn!("invalid collection size {}", self.size);
            return Err(Error::InvalidPointer);
        }

        Ok(Matcher {
            family: self.family.as_deref().map(str::to_lowercase),
            style: self.style.as_deref().map(normalize_style),
            codepoint: self.codepoint,
        })
    }
}

/// Normalized form of a descriptor, for comparing against many candidates
#[derive(Clone, Debug)]
pub(crate) struct Matcher {
    family: Option<String>,
    style: Option<String>,
    pub codepoint: Option<u32>,
}

impl Matcher {
    pub fn matches_family(&self, families: &[SmolStr]) -> bool {
        match &self.family {
            Some(filter) => families
                .iter()
                .any(|family| family.to_lowercase().contains(filter.as_str())),
            None => true,
        }
    }

    pub fn matches_style(&self, weight: FontWeight, slant: Slant) -> bool {
        match &self.style {
            Some(filter) => normalize_style(&style_name(weight, slant)) == *filter,
            None => true,
        }
    }

    /// Family and style filters, which need no font data
    pub fn matches_names(&self, families: &[SmolStr], weight: FontWeight, slant: Slant) -> bool {
        self.matches_family(families) && self.matches_style(weight, slant)
    }
}

fn normalize_style(style: &str) -> String {
    style
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
