// Crossbot – A crossword puzzle game
// Copyright (C) 2026  The Crossbot authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(target_os = "windows")]
const SYSTEM_FONTS: [&str; 3] = [
    "C:/Windows/Fonts/msyh.ttc",
    "C:/Windows/Fonts/YuGothM.ttc",
    "C:/Windows/Fonts/msgothic.ttc",
];

#[cfg(target_os = "macos")]
const SYSTEM_FONTS: [&str; 2] = [
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const SYSTEM_FONTS: [&str; 2] = [
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
];

const DATA_DIR_FONT: &str = "fonts/NotoSansCJK-Regular.ttc";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("{}: not a usable font", path.display())]
    Invalid {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "{}", path.display()),
            FontSource::Builtin => write!(f, "built-in glyphs"),
        }
    }
}

enum Face {
    TrueType(FontVec),
    Bitmap,
}

pub struct FontSet {
    face: Face,
    source: FontSource,
}

// 5×7 glyphs. Each row is a byte with the leftmost pixel in bit 4.
const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;

static BITMAP_GLYPHS: [(char, [u8; 7]); 37] = [
    (',', [0x00, 0x00, 0x00, 0x00, 0x0c, 0x04, 0x08]),
    ('0', [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e]),
    ('1', [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e]),
    ('2', [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f]),
    ('3', [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e]),
    ('4', [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02]),
    ('5', [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e]),
    ('6', [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e]),
    ('7', [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e]),
    ('9', [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c]),
    ('A', [0x0e, 0x11, 0x11, 0x11, 0x1f, 0x11, 0x11]),
    ('B', [0x1e, 0x11, 0x11, 0x1e, 0x11, 0x11, 0x1e]),
    ('C', [0x0e, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0e]),
    ('D', [0x1c, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1c]),
    ('E', [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f]),
    ('F', [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10]),
    ('G', [0x0e, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0f]),
    ('H', [0x11, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11]),
    ('I', [0x0e, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0c]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1f]),
    ('M', [0x11, 0x1b, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
    ('O', [0x0e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e]),
    ('P', [0x1e, 0x11, 0x11, 0x1e, 0x10, 0x10, 0x10]),
    ('Q', [0x0e, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0d]),
    ('R', [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11]),
    ('S', [0x0f, 0x10, 0x10, 0x0e, 0x01, 0x01, 0x1e]),
    ('T', [0x1f, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0a, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0a]),
    ('X', [0x11, 0x11, 0x0a, 0x04, 0x0a, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x11, 0x0a, 0x04, 0x04, 0x04]),
    ('Z', [0x1f, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1f]),
];

// Characters without a glyph are drawn as a hollow box
const MISSING_GLYPH: [u8; 7] = [0x1f, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1f];

fn bitmap_glyph(ch: char) -> &'static [u8; 7] {
    let ch = ch.to_ascii_uppercase();

    match BITMAP_GLYPHS.binary_search_by_key(&ch, |&(glyph_ch, _)| glyph_ch) {
        Ok(index) => &BITMAP_GLYPHS[index].1,
        Err(_) => &MISSING_GLYPH,
    }
}

fn bitmap_scale(size: f32) -> i32 {
    ((size / (GLYPH_HEIGHT + 1) as f32).round() as i32).max(1)
}

/// Every path that is tried when looking for a font, in order.
pub fn candidates(
    explicit: Option<&Path>,
    data_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.extend(explicit.map(Path::to_owned));
    paths.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
    paths.extend(data_dir.map(|dir| dir.join(DATA_DIR_FONT)));

    paths
}

fn first_loadable<I>(paths: I) -> Option<FontSet>
    where I: IntoIterator<Item = PathBuf>
{
    for path in paths {
        if !path.exists() {
            log::debug!("font {} doesn’t exist", path.display());
            continue;
        }

        match FontSet::load(&path) {
            Ok(font) => return Some(font),
            Err(e) => log::warn!("{}", e),
        }
    }

    None
}

impl FontSet {
    pub fn builtin() -> FontSet {
        FontSet {
            face: Face::Bitmap,
            source: FontSource::Builtin,
        }
    }

    pub fn load(path: &Path) -> Result<FontSet, Error> {
        let data = fs::read(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        let font = FontVec::try_from_vec_and_index(data, 0)
            .map_err(|_| Error::Invalid { path: path.to_owned() })?;

        Ok(FontSet {
            face: Face::TrueType(font),
            source: FontSource::File(path.to_owned()),
        })
    }

    /// Tries each of the candidate fonts and falls back to the
    /// built-in glyphs, so this always returns something usable.
    pub fn resolve(
        explicit: Option<&Path>,
        data_dir: Option<&Path>,
    ) -> FontSet {
        let font = first_loadable(candidates(explicit, data_dir))
            .unwrap_or_else(|| {
                log::warn!("no font found, text will use the built-in glyphs");
                FontSet::builtin()
            });

        log::info!("using font: {}", font.source);

        font
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    fn px_scale(font: &FontVec, size: f32) -> PxScale {
        // Make `size` the em size rather than the line height
        match font.units_per_em() {
            Some(units_per_em) if units_per_em > 0.0 => {
                PxScale::from(size * font.height_unscaled() / units_per_em)
            },
            _ => PxScale::from(size),
        }
    }

    /// The width and height of `text` drawn at `size` pixels.
    pub fn text_size(&self, text: &str, size: f32) -> (u32, u32) {
        match &self.face {
            Face::TrueType(font) => {
                let scaled = font.as_scaled(FontSet::px_scale(font, size));

                let width = text.chars()
                    .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
                    .sum::<f32>();

                (width.ceil() as u32, scaled.height().ceil() as u32)
            },
            Face::Bitmap => {
                let scale = bitmap_scale(size);
                let n_chars = text.chars().count() as i32;

                if n_chars == 0 {
                    return (0, (GLYPH_HEIGHT * scale) as u32);
                }

                (
                    ((n_chars * (GLYPH_WIDTH + 1) - 1) * scale) as u32,
                    (GLYPH_HEIGHT * scale) as u32,
                )
            },
        }
    }

    /// Rasterizes `text` with its top left corner at `(x, y)`. `put`
    /// is called with each pixel position and a coverage between 0
    /// and 1. Positions may lie outside of the target image.
    pub fn draw_text<F>(
        &self,
        text: &str,
        size: f32,
        (x, y): (i32, i32),
        mut put: F,
    )
        where F: FnMut(i32, i32, f32)
    {
        match &self.face {
            Face::TrueType(font) => {
                let scaled = font.as_scaled(FontSet::px_scale(font, size));
                let mut caret = x as f32;

                for ch in text.chars() {
                    let mut glyph = scaled.scaled_glyph(ch);
                    let advance = scaled.h_advance(glyph.id);

                    glyph.position =
                        ab_glyph::point(caret, y as f32 + scaled.ascent());

                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();

                        outlined.draw(|gx, gy, coverage| {
                            put(
                                bounds.min.x as i32 + gx as i32,
                                bounds.min.y as i32 + gy as i32,
                                coverage,
                            );
                        });
                    }

                    caret += advance;
                }
            },
            Face::Bitmap => {
                let scale = bitmap_scale(size);
                let mut caret = x;

                for ch in text.chars() {
                    let rows = bitmap_glyph(ch);

                    for (row, &bits) in rows.iter().enumerate() {
                        for col in 0..GLYPH_WIDTH {
                            if bits & (0x10 >> col) == 0 {
                                continue;
                            }

                            let px = caret + col * scale;
                            let py = y + row as i32 * scale;

                            for dy in 0..scale {
                                for dx in 0..scale {
                                    put(px + dx, py + dy, 1.0);
                                }
                            }
                        }
                    }

                    caret += (GLYPH_WIDTH + 1) * scale;
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ink(font: &FontSet, text: &str, size: f32) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();

        font.draw_text(text, size, (0, 0), |x, y, coverage| {
            if coverage > 0.0 {
                pixels.push((x, y));
            }
        });

        pixels
    }

    #[test]
    fn glyph_table_sorted() {
        for pair in BITMAP_GLYPHS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{:?}", pair[1].0);
        }
    }

    #[test]
    fn bitmap_size() {
        let font = FontSet::builtin();

        assert_eq!(font.text_size("a", 7.0), (5, 7));
        assert_eq!(font.text_size("ka", 10.0), (11, 7));
        assert_eq!(font.text_size("か", 15.0), (10, 14));
        assert_eq!(font.text_size("", 15.0), (0, 14));
    }

    #[test]
    fn bitmap_draw() {
        let font = FontSet::builtin();

        // ‘I’ has 3 + 5 + 3 pixels
        assert_eq!(ink(&font, "i", 7.0).len(), 11);
        assert_eq!(ink(&font, "I", 15.0).len(), 11 * 4);

        let pixels = ink(&font, "1,", 7.0);
        assert!(pixels.iter().all(|&(x, y)| x >= 0 && x < 11 && y < 7));
        assert!(pixels.iter().any(|&(x, _)| x >= 6));

        // Unknown characters get a box
        assert_eq!(ink(&font, "か", 7.0).len(), 5 + 5 + 5 * 2);
    }

    #[test]
    fn candidate_order() {
        let explicit = Path::new("/tmp/my-font.ttf");
        let data_dir = Path::new("/var/lib/crossbot");

        let paths = candidates(Some(explicit), Some(data_dir));

        assert_eq!(paths.first().map(PathBuf::as_path), Some(explicit));
        assert_eq!(
            paths.last(),
            Some(&data_dir.join("fonts/NotoSansCJK-Regular.ttc")),
        );
        assert_eq!(paths.len(), SYSTEM_FONTS.len() + 2);

        assert_eq!(candidates(None, None).len(), SYSTEM_FONTS.len());
    }

    #[test]
    fn unusable_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let bad_font = dir.path().join("bad.ttf");
        fs::write(&bad_font, "not a font").unwrap();

        assert!(matches!(
            FontSet::load(&bad_font),
            Err(Error::Invalid { .. }),
        ));
        assert!(matches!(
            FontSet::load(&dir.path().join("missing.ttf")),
            Err(Error::Io { .. }),
        ));

        assert!(first_loadable([
            bad_font,
            dir.path().join("missing.ttf"),
        ]).is_none());
    }

    #[test]
    fn source_names() {
        assert_eq!(&FontSet::builtin().source().to_string(), "built-in glyphs");
        assert_eq!(
            &FontSource::File(PathBuf::from("/a/b.ttc")).to_string(),
            "/a/b.ttc",
        );
    }
}
