// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fat::{Library, LibraryConfig};
use tempfile::TempDir;
use write_fonts::read::tables::glyf::CurvePoint;
use write_fonts::read::tables::head::MacStyle;
use write_fonts::read::tables::os2::SelectionFlags;
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{Bbox, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::Os2;
use write_fonts::types::{FWord, Fixed, GlyphId, NameId, UfWord};
use write_fonts::FontBuilder;

pub const UNITS_PER_EM: u16 = 1000;
pub const SMILEY: char = '\u{263A}';

/// Simple TrueType glyph made of straight on-curve contours
#[derive(Clone, Debug)]
pub struct TestGlyph {
    pub codepoint: Option<char>,
    pub advance: u16,
    pub contours: Vec<Vec<(i16, i16)>>,
}

impl TestGlyph {
    pub fn notdef() -> Self {
        Self {
            codepoint: None,
            advance: 500,
            contours: vec![vec![(50, 0), (50, 700), (450, 700), (450, 0)]],
        }
    }

    /// Triangle with its apex at the top
    pub fn triangle(codepoint: char) -> Self {
        Self {
            codepoint: Some(codepoint),
            advance: 520,
            contours: vec![vec![(0, 0), (250, 700), (500, 0)]],
        }
    }

    pub fn rect(codepoint: char) -> Self {
        Self {
            codepoint: Some(codepoint),
            advance: 560,
            contours: vec![vec![(60, 0), (60, 720), (500, 720), (500, 0)]],
        }
    }

    pub fn empty(codepoint: char) -> Self {
        Self {
            codepoint: Some(codepoint),
            advance: 250,
            contours: Vec::new(),
        }
    }

    fn bounds(&self) -> Option<(i16, i16, i16, i16)> {
        let mut points = self.contours.iter().flatten();
        let &(x, y) = points.next()?;
        Some(points.fold((x, y, x, y), |(x0, y0, x1, y1), &(x, y)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        }))
    }

    fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    fn outline(&self) -> Glyph {
        let Some((x_min, y_min, x_max, y_max)) = self.bounds() else {
            return Glyph::Empty;
        };
        Glyph::Simple(SimpleGlyph {
            bbox: Bbox {
                x_min,
                y_min,
                x_max,
                y_max,
            },
            contours: self
                .contours
                .iter()
                .map(|points| {
                    let points: Vec<CurvePoint> = points
                        .iter()
                        .map(|&(x, y)| CurvePoint::on_curve(x, y))
                        .collect();
                    Contour::from(points)
                })
                .collect(),
            instructions: Vec::new(),
        })
    }
}

/// Builder for small, valid TrueType fonts
#[derive(Clone, Debug)]
pub struct TestFont {
    family: String,
    subfamily: String,
    weight: u16,
    italic: bool,
    outlines: bool,
    glyphs: Vec<TestGlyph>,
    stray: Vec<char>,
}

impl TestFont {
    /// Regular font with `.notdef`, a triangular `A`, a rectangular `B` and an empty space
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            subfamily: "Regular".to_string(),
            weight: 400,
            italic: false,
            outlines: true,
            glyphs: vec![
                TestGlyph::notdef(),
                TestGlyph::triangle('A'),
                TestGlyph::rect('B'),
                TestGlyph::empty(' '),
            ],
            stray: Vec::new(),
        }
    }

    pub fn style(mut self, subfamily: &str, weight: u16, italic: bool) -> Self {
        self.subfamily = subfamily.to_string();
        self.weight = weight;
        self.italic = italic;
        self
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Map `codepoint` to a glyph id past the end of the font, as a damaged cmap would
    pub fn stray_mapping(mut self, codepoint: char) -> Self {
        self.stray.push(codepoint);
        self
    }

    /// Leave out `glyf` and `loca`, keeping every other table
    pub fn without_outlines(mut self) -> Self {
        self.outlines = false;
        self
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyphs.len() as u32
    }

    pub fn build(&self) -> Vec<u8> {
        let mut builder = FontBuilder::new();
        let mut head = self.head();
        if self.outlines {
            let mut glyphs = GlyfLocaBuilder::new();
            for glyph in &self.glyphs {
                glyphs.add_glyph(&glyph.outline()).unwrap();
            }
            let (glyf, loca, format) = glyphs.build();
            head.index_to_loc_format = match format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            };
            builder.add_table(&glyf).unwrap();
            builder.add_table(&loca).unwrap();
        }
        builder
            .add_table(&head)
            .unwrap()
            .add_table(&self.hhea())
            .unwrap()
            .add_table(&self.hmtx())
            .unwrap()
            .add_table(&self.maxp())
            .unwrap()
            .add_table(&self.cmap())
            .unwrap()
            .add_table(&self.name())
            .unwrap()
            .add_table(&self.os2())
            .unwrap();
        builder.build()
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build()).unwrap();
        path
    }

    fn bounds(&self) -> (i16, i16, i16, i16) {
        self.glyphs
            .iter()
            .filter_map(TestGlyph::bounds)
            .reduce(|(a0, b0, c0, d0), (a1, b1, c1, d1)| {
                (a0.min(a1), b0.min(b1), c0.max(c1), d0.max(d1))
            })
            .unwrap_or_default()
    }

    fn mappings(&self) -> Vec<(char, GlyphId)> {
        let mut mappings: Vec<(char, GlyphId)> = self
            .glyphs
            .iter()
            .enumerate()
            .filter_map(|(gid, glyph)| Some((glyph.codepoint?, GlyphId::new(gid as u32))))
            .collect();
        let past_end = GlyphId::new(self.glyph_count() + 7);
        mappings.extend(self.stray.iter().map(|&codepoint| (codepoint, past_end)));
        mappings.sort_unstable();
        mappings
    }

    fn head(&self) -> Head {
        let (x_min, y_min, x_max, y_max) = self.bounds();
        let mut mac_style = MacStyle::empty();
        if self.weight >= 700 {
            mac_style |= MacStyle::BOLD;
        }
        if self.italic {
            mac_style |= MacStyle::ITALIC;
        }
        Head {
            font_revision: Fixed::ONE,
            units_per_em: UNITS_PER_EM,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem: 8,
            ..Default::default()
        }
    }

    fn hhea(&self) -> Hhea {
        let (_, _, x_max, _) = self.bounds();
        let advance_max = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        Hhea {
            ascender: FWord::new(800),
            descender: FWord::new(-200),
            advance_width_max: UfWord::new(advance_max),
            x_max_extent: FWord::new(x_max),
            caret_slope_rise: 1,
            number_of_h_metrics: self.glyphs.len() as u16,
            ..Default::default()
        }
    }

    fn hmtx(&self) -> Hmtx {
        let metrics = self
            .glyphs
            .iter()
            .map(|glyph| {
                let lsb = glyph.bounds().map_or(0, |(x_min, ..)| x_min);
                LongMetric::new(glyph.advance, lsb)
            })
            .collect();
        Hmtx::new(metrics, Vec::new())
    }

    fn maxp(&self) -> Maxp {
        let max_points = self.glyphs.iter().map(TestGlyph::point_count).max().unwrap_or(0);
        let max_contours = self.glyphs.iter().map(|g| g.contours.len()).max().unwrap_or(0);
        Maxp {
            num_glyphs: self.glyphs.len() as u16,
            max_points: Some(max_points as u16),
            max_contours: Some(max_contours as u16),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(2),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
            ..Default::default()
        }
    }

    fn cmap(&self) -> Cmap {
        Cmap::from_mappings(self.mappings()).unwrap()
    }

    fn name(&self) -> Name {
        let full = if self.subfamily == "Regular" {
            self.family.clone()
        } else {
            format!("{} {}", self.family, self.subfamily)
        };
        let postscript = format!("{}-{}", self.family, self.subfamily).replace(' ', "");
        let records = [
            (NameId::FAMILY_NAME, self.family.as_str()),
            (NameId::SUBFAMILY_NAME, self.subfamily.as_str()),
            (NameId::FULL_NAME, full.as_str()),
            (NameId::POSTSCRIPT_NAME, postscript.as_str()),
        ];
        Name::new(
            records
                .into_iter()
                .map(|(name_id, text)| {
                    NameRecord::new(3, 1, 0x0409, name_id, text.to_string().into())
                })
                .collect(),
        )
    }

    fn os2(&self) -> Os2 {
        let mappings = self.mappings();
        let first = mappings.first().map_or(0, |&(codepoint, _)| codepoint as u16);
        let last = mappings.last().map_or(0, |&(codepoint, _)| codepoint as u16);
        let mut fs_selection = SelectionFlags::empty();
        if self.italic {
            fs_selection |= SelectionFlags::ITALIC;
        }
        if self.weight >= 700 {
            fs_selection |= SelectionFlags::BOLD;
        }
        if fs_selection.is_empty() {
            fs_selection = SelectionFlags::REGULAR;
        }
        Os2 {
            x_avg_char_width: 500,
            us_weight_class: self.weight,
            us_width_class: 5,
            fs_selection,
            us_first_char_index: first,
            us_last_char_index: last,
            s_typo_ascender: 800,
            s_typo_descender: -200,
            us_win_ascent: 800,
            us_win_descent: 200,
            ul_code_page_range_1: Some(1),
            ul_code_page_range_2: Some(0),
            sx_height: Some(500),
            s_cap_height: Some(700),
            us_default_char: Some(0),
            us_break_char: Some(0x20),
            us_max_context: Some(0),
            ..Default::default()
        }
    }
}

/// Font collection file holding every font of `fonts` in order
///
/// Each member is built on its own, then its table offsets are shifted to count from the start
/// of the collection.
pub fn build_collection(fonts: &[TestFont]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"ttcf");
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    data.extend_from_slice(&(fonts.len() as u32).to_be_bytes());
    let header_len = data.len() + 4 * fonts.len();
    data.resize(header_len, 0);

    for (i, font) in fonts.iter().enumerate() {
        let base = data.len() as u32;
        data[12 + 4 * i..16 + 4 * i].copy_from_slice(&base.to_be_bytes());

        let mut member = font.build();
        let num_tables = u16::from_be_bytes([member[4], member[5]]) as usize;
        for record in member[12..12 + 16 * num_tables].chunks_exact_mut(16) {
            let offset = u32::from_be_bytes([record[8], record[9], record[10], record[11]]);
            record[8..12].copy_from_slice(&(offset + base).to_be_bytes());
        }
        data.extend_from_slice(&member);
        data.resize((data.len() + 3) & !3, 0);
    }
    data
}

/// Directory of fixture fonts
///
/// | file | family | style | faces |
/// |------|--------|-------|-------|
/// | `fixture-sans.ttf` | Fixture Sans | Regular | 1 |
/// | `fixture-serif-bold-italic.ttf` | Fixture Serif | Bold Italic, covers U+263A, no `B` | 1 |
/// | `fixture-mono.ttc` | Fixture Mono | Regular, Light without `B` | 2 |
///
/// A truncated `broken.ttf` and a `readme.txt` sit next to them and never enumerate.
pub struct Fixtures {
    pub dir: TempDir,
    pub sans: PathBuf,
    pub serif: PathBuf,
    pub mono: PathBuf,
}

pub const FIXTURE_FACES: usize = 4;

pub fn sans() -> TestFont {
    TestFont::new("Fixture Sans")
}

pub fn serif() -> TestFont {
    let mut font = TestFont::new("Fixture Serif").style("Bold Italic", 700, true);
    font.glyphs.retain(|glyph| glyph.codepoint != Some('B'));
    font.glyph(TestGlyph::rect(SMILEY))
}

pub fn mono_regular() -> TestFont {
    TestFont::new("Fixture Mono")
}

pub fn mono_light() -> TestFont {
    let mut font = TestFont::new("Fixture Mono").style("Light", 300, false);
    font.glyphs.retain(|glyph| glyph.codepoint != Some('B'));
    font
}

impl Fixtures {
    pub fn new() -> Self {
        init_logger();
        let dir = tempfile::tempdir().unwrap();

        let sans_path = sans().write(dir.path(), "fixture-sans.ttf");
        let serif_path = serif().write(dir.path(), "fixture-serif-bold-italic.ttf");
        let mono = dir.path().join("fixture-mono.ttc");
        fs::write(&mono, build_collection(&[mono_regular(), mono_light()])).unwrap();

        let mut broken = sans().build();
        broken.truncate(10);
        fs::write(dir.path().join("broken.ttf"), broken).unwrap();
        fs::write(dir.path().join("readme.txt"), "not a font").unwrap();

        Self {
            dir,
            sans: sans_path,
            serif: serif_path,
            mono,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Library that only sees the fixture directory
    pub fn library(&self) -> Library {
        Library::new_with_config(LibraryConfig::new().system_fonts(false).font_dir(self.path()))
            .unwrap()
    }
}

/// Library without any inventory, for opening faces by path
pub fn library() -> Library {
    init_logger();
    Library::new_with_config(LibraryConfig::new().system_fonts(false)).unwrap()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
