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

use super::direction::{self, Coord};
use super::puzzle_data::PuzzleDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub fillable: bool,
    pub content: String,
    /// Labels of the words starting here. An across and a down word
    /// can share a first cell.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("empty grid")]
    EmptyGrid,
    #[error("word {label} runs off the grid at {}",
            direction::format_anchor(*.pos))]
    OutOfBounds {
        label: String,
        pos: Coord,
    },
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Grid, Error> {
        if rows < 1 || cols < 1 {
            return Err(Error::EmptyGrid);
        }

        Ok(Grid {
            cells: vec![Cell::default(); rows * cols],
            rows,
            cols,
        })
    }

    /// Lays out the words of a puzzle on an empty grid. Every cell
    /// that a word passes through becomes fillable and the first cell
    /// of each word gets its label.
    pub fn build(puzzle: &PuzzleDefinition) -> Result<Grid, Error> {
        let mut grid = Grid::new(puzzle.rows, puzzle.cols)?;

        for placement in puzzle.placements.iter() {
            for pos in placement.cells() {
                if !grid.contains(pos) {
                    return Err(Error::OutOfBounds {
                        label: placement.label.clone(),
                        pos,
                    });
                }
            }

            grid.at_mut(placement.anchor).labels
                .push(placement.label.clone());

            for pos in placement.cells() {
                grid.at_mut(pos).fillable = true;
            }
        }

        Ok(grid)
    }

    /// The grid with the canonical answer of every word filled in.
    pub fn solution(puzzle: &PuzzleDefinition) -> Result<Grid, Error> {
        let mut grid = Grid::build(puzzle)?;

        for placement in puzzle.placements.iter() {
            let letters = placement.canonical().chars();

            for (pos, ch) in placement.cells().zip(letters) {
                grid.at_mut(pos).content = ch.to_string();
            }
        }

        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn at(&self, (row, col): Coord) -> &Cell {
        assert!(col < self.cols);

        &self.cells[row * self.cols + col]
    }

    pub fn at_mut(&mut self, (row, col): Coord) -> &mut Cell {
        assert!(col < self.cols);

        &mut self.cells[row * self.cols + col]
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let cols = self.cols;

        self.cells.iter()
            .enumerate()
            .map(move |(i, cell)| ((i / cols, i % cols), cell))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// The contents of a run of cells joined together.
    pub fn word<I>(&self, cells: I) -> String
        where I: IntoIterator<Item = Coord>
    {
        cells.into_iter()
            .map(|pos| self.at(pos).content.as_str())
            .collect()
    }
}

// One line per row. Unfillable cells are shown as ‘■’ and empty
// fillable cells as ‘□’. Only the first character of each cell is
// shown.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.at((row, col));

                let ch = if !cell.fillable {
                    '■'
                } else {
                    cell.content.chars().next().unwrap_or('□')
                };

                write!(f, "{}", ch)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
