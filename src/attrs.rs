// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use smol_str::SmolStr;

/// Font weight, in twelve ordered levels from thinnest to heaviest
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(C)]
pub enum FontWeight {
    Thin = 0,
    ExtraLight,
    Light,
    SemiLight,
    Book,
    #[default]
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
    ExtraBlack,
}

impl FontWeight {
    /// All levels, in order
    pub const ALL: [Self; 12] = [
        Self::Thin,
        Self::ExtraLight,
        Self::Light,
        Self::SemiLight,
        Self::Book,
        Self::Regular,
        Self::Medium,
        Self::SemiBold,
        Self::Bold,
        Self::ExtraBold,
        Self::Black,
        Self::ExtraBlack,
    ];

    /// Classify an OpenType `usWeightClass` value, rounding to the nearest level
    pub fn from_os2(value: u16) -> Self {
        match value {
            0..=149 => Self::Thin,
            150..=249 => Self::ExtraLight,
            250..=324 => Self::Light,
            325..=364 => Self::SemiLight,
            365..=389 => Self::Book,
            390..=449 => Self::Regular,
            450..=549 => Self::Medium,
            550..=649 => Self::SemiBold,
            650..=749 => Self::Bold,
            750..=849 => Self::ExtraBold,
            850..=924 => Self::Black,
            _ => Self::ExtraBlack,
        }
    }

    /// Representative `usWeightClass` value of this level
    pub const fn to_os2(self) -> u16 {
        match self {
            Self::Thin => 100,
            Self::ExtraLight => 200,
            Self::Light => 300,
            Self::SemiLight => 350,
            Self::Book => 380,
            Self::Regular => 400,
            Self::Medium => 500,
            Self::SemiBold => 600,
            Self::Bold => 700,
            Self::ExtraBold => 800,
            Self::Black => 900,
            Self::ExtraBlack => 950,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Thin => "Thin",
            Self::ExtraLight => "ExtraLight",
            Self::Light => "Light",
            Self::SemiLight => "SemiLight",
            Self::Book => "Book",
            Self::Regular => "Regular",
            Self::Medium => "Medium",
            Self::SemiBold => "SemiBold",
            Self::Bold => "Bold",
            Self::ExtraBold => "ExtraBold",
            Self::Black => "Black",
            Self::ExtraBlack => "ExtraBlack",
        }
    }
}

impl From<fontdb::Weight> for FontWeight {
    fn from(weight: fontdb::Weight) -> Self {
        Self::from_os2(weight.0)
    }
}

/// Font slant
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(C)]
pub enum Slant {
    #[default]
    Roman = 0,
    Italic,
    Oblique,
}

impl Slant {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Roman => "Roman",
            Self::Italic => "Italic",
            Self::Oblique => "Oblique",
        }
    }
}

impl From<fontdb::Style> for Slant {
    fn from(style: fontdb::Style) -> Self {
        match style {
            fontdb::Style::Normal => Self::Roman,
            fontdb::Style::Italic => Self::Italic,
            fontdb::Style::Oblique => Self::Oblique,
        }
    }
}

/// Style name built from a weight and slant, such as `Regular`, `Bold Italic` or `Oblique`
pub fn style_name(weight: FontWeight, slant: Slant) -> String {
    match (weight, slant) {
        (weight, Slant::Roman) => weight.name().to_string(),
        (FontWeight::Regular, slant) => slant.name().to_string(),
        (weight, slant) => format!("{} {}", weight.name(), slant.name()),
    }
}

/// Cheap metadata of a face, available without parsing glyph data
#[derive(Clone, Debug, PartialEq)]
pub struct FaceInfo {
    pub family: SmolStr,
    /// Size in points that the face reports metrics at
    pub size: f32,
    pub weight: FontWeight,
    pub slant: Slant,
}

impl FaceInfo {
    pub fn style_name(&self) -> String {
        style_name(self.weight, self.slant)
    }
}

impl fmt::Display for FaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}pt", self.family, self.style_name(), self.size)
    }
}
