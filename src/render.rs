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

use super::direction::Direction;
use super::fonts::FontSet;
use super::game_state::{DisplayMode, GameState};
use super::grid::{self, Grid};
use super::puzzle_data::PuzzleDefinition;
use super::store;
use image::{Rgb, RgbImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CELL_SIZE: u32 = 20;
pub const PADDING: u32 = 20;

const NATIVE_FONT_SIZE: f32 = 15.0;
const ROMAJI_FONT_SIZE: f32 = 10.0;
const LABEL_FONT_SIZE: f32 = 7.0;

const GRID_COLOR: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const BACKGROUND_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const UNFILLABLE_COLOR: Rgb<u8> = Rgb([0xee, 0xee, 0xee]);
const TEXT_COLOR: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const LABEL_COLOR: Rgb<u8> = Rgb([0xff, 0x00, 0x00]);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] grid::Error),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// The size in pixels of the image for a grid.
pub fn image_size(rows: usize, cols: usize) -> (u32, u32) {
    (
        cols as u32 * CELL_SIZE + 2 * PADDING,
        rows as u32 * CELL_SIZE + 2 * PADDING,
    )
}

fn put_pixel(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() &&
        (y as u32) < image.height()
    {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn blend_pixel(
    image: &mut RgbImage,
    x: i32,
    y: i32,
    color: Rgb<u8>,
    coverage: f32,
) {
    if x < 0 || y < 0 || x as u32 >= image.width() ||
        y as u32 >= image.height()
    {
        return;
    }

    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = image.get_pixel_mut(x as u32, y as u32);

    for (old, new) in pixel.0.iter_mut().zip(color.0) {
        *old = (*old as f32 * (1.0 - coverage) + new as f32 * coverage)
            .round() as u8;
    }
}

// Both corners are inclusive
fn fill_rect(
    image: &mut RgbImage,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    color: Rgb<u8>,
) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            put_pixel(image, x, y, color);
        }
    }
}

fn draw_line(
    image: &mut RgbImage,
    (mut x0, mut y0): (i32, i32),
    (x1, y1): (i32, i32),
    color: Rgb<u8>,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel(image, x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_polyline(image: &mut RgbImage, points: &[(i32, i32)], color: Rgb<u8>) {
    for pair in points.windows(2) {
        draw_line(image, pair[0], pair[1], color);
    }
}

pub struct Renderer {
    fonts: FontSet,
}

impl Renderer {
    pub fn new(fonts: FontSet) -> Renderer {
        Renderer { fonts }
    }

    fn draw_text(
        &self,
        image: &mut RgbImage,
        text: &str,
        size: f32,
        pos: (i32, i32),
        color: Rgb<u8>,
    ) {
        self.fonts.draw_text(text, size, pos, |x, y, coverage| {
            blend_pixel(image, x, y, color, coverage);
        });
    }

    fn text_size(&self, text: &str, size: f32) -> (i32, i32) {
        let (width, height) = self.fonts.text_size(text, size);
        (width as i32, height as i32)
    }

    fn draw_lines(&self, image: &mut RgbImage, grid: &Grid) {
        let (width, height) = (image.width() as i32, image.height() as i32);
        let padding = PADDING as i32;
        let cell_size = CELL_SIZE as i32;

        for row in 0..=grid.rows() as i32 {
            let y = padding + row * cell_size;
            draw_line(
                image,
                (padding, y),
                (width - padding, y),
                GRID_COLOR,
            );
        }

        for col in 0..=grid.cols() as i32 {
            let x = padding + col * cell_size;
            draw_line(
                image,
                (x, padding),
                (x, height - padding),
                GRID_COLOR,
            );
        }
    }

    fn draw_cells(
        &self,
        image: &mut RgbImage,
        grid: &Grid,
        display_mode: DisplayMode,
    ) {
        let cell_size = CELL_SIZE as i32;
        let font_size = match display_mode {
            DisplayMode::Native => NATIVE_FONT_SIZE,
            DisplayMode::Transliterated => ROMAJI_FONT_SIZE,
        };

        for ((row, col), cell) in grid.cells() {
            let (x, y) = cell_origin(row, col);

            if !cell.fillable {
                fill_rect(
                    image,
                    (x + 1, y + 1),
                    (x + cell_size - 1, y + cell_size - 1),
                    UNFILLABLE_COLOR,
                );
            } else if !cell.content.is_empty() {
                let (text_width, text_height) =
                    self.text_size(&cell.content, font_size);

                self.draw_text(
                    image,
                    &cell.content,
                    font_size,
                    (
                        x + (cell_size - text_width) / 2,
                        y + (cell_size - text_height) / 2,
                    ),
                    TEXT_COLOR,
                );
            }
        }
    }

    // Labels sit outside the anchor cell, before the start of the
    // word, with an arrow pointing into it.
    fn draw_label(
        &self,
        image: &mut RgbImage,
        label: &str,
        direction: Direction,
        (x, y): (i32, i32),
    ) {
        let cell_size = CELL_SIZE as i32;
        let (text_width, text_height) = self.text_size(label, LABEL_FONT_SIZE);

        let (text_x, text_y) = match direction {
            Direction::Across => {
                let arrow_y = y + cell_size - 5;
                draw_line(
                    image,
                    (x - cell_size + 5, arrow_y),
                    (x - 5, arrow_y),
                    LABEL_COLOR,
                );
                draw_polyline(
                    image,
                    &[
                        (x - 10, arrow_y - 5),
                        (x - 5, arrow_y),
                        (x - 10, arrow_y + 5),
                    ],
                    LABEL_COLOR,
                );

                (x - cell_size + 2, y + (cell_size - text_height) / 2)
            },
            Direction::Down => {
                let arrow_x = x + cell_size - 5;
                draw_line(
                    image,
                    (arrow_x, y - cell_size + 5),
                    (arrow_x, y - 5),
                    LABEL_COLOR,
                );
                draw_polyline(
                    image,
                    &[
                        (arrow_x - 5, y - 10),
                        (arrow_x, y - 5),
                        (arrow_x + 5, y - 10),
                    ],
                    LABEL_COLOR,
                );

                (x + (cell_size - text_width) / 2, y - cell_size + 2)
            },
        };

        fill_rect(
            image,
            (text_x - 1, text_y - 1),
            (text_x + text_width + 1, text_y + text_height + 1),
            BACKGROUND_COLOR,
        );

        self.draw_text(
            image,
            label,
            LABEL_FONT_SIZE,
            (text_x, text_y),
            LABEL_COLOR,
        );
    }

    fn draw_grid(
        &self,
        grid: &Grid,
        puzzle: &PuzzleDefinition,
        display_mode: DisplayMode,
    ) -> RgbImage {
        let (width, height) = image_size(grid.rows(), grid.cols());
        let mut image = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);

        self.draw_lines(&mut image, grid);
        self.draw_cells(&mut image, grid, display_mode);

        // Labels go last so that nothing covers them. An across and a
        // down word starting on the same cell both get one.
        for placement in puzzle.placements.iter() {
            let (row, col) = placement.anchor;

            self.draw_label(
                &mut image,
                &placement.label,
                placement.direction,
                cell_origin(row, col),
            );
        }

        image
    }

    pub fn render(
        &self,
        state: &GameState,
        puzzle: &PuzzleDefinition,
    ) -> RgbImage {
        self.draw_grid(state.grid(), puzzle, state.display_mode())
    }

    /// Renders the puzzle with every canonical answer filled in.
    pub fn render_solution(
        &self,
        puzzle: &PuzzleDefinition,
    ) -> Result<RgbImage, Error> {
        let grid = Grid::solution(puzzle)?;

        Ok(self.draw_grid(&grid, puzzle, DisplayMode::Native))
    }
}

fn cell_origin(row: usize, col: usize) -> (i32, i32) {
    (
        (PADDING + col as u32 * CELL_SIZE) as i32,
        (PADDING + row as u32 * CELL_SIZE) as i32,
    )
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.to_owned(),
            source,
        })?;
    }

    image.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| Error::Image { path: path.to_owned(), source })
}

/// Where the image for a solver is written in the scratch directory.
pub fn image_path(scratch_dir: &Path, name: &str) -> PathBuf {
    scratch_dir.join(format!("{}.png", store::file_stem(name)))
}
