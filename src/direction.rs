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

// Coordinates are (row, column) with the origin at the top left. A
// word runs either to the right along a row or downwards along a
// column.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type Coord = (usize, usize);

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn step(self, (row, col): Coord, distance: usize) -> Coord {
        match self {
            Direction::Across => (row, col + distance),
            Direction::Down => (row + distance, col),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Across => "横",
            Direction::Down => "竖",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    #[error("empty coordinate")]
    Empty,
    #[error("invalid row letter “{0}”")]
    InvalidRow(char),
    #[error("invalid column number “{0}”")]
    InvalidColumn(String),
}

// Anchors are written like “E11”. The letter picks the row and the
// number is the 1-based column.
pub fn parse_anchor(s: &str) -> Result<Coord, AnchorError> {
    let mut chars = s.trim().chars();

    let Some(letter) = chars.next()
    else {
        return Err(AnchorError::Empty);
    };

    if !letter.is_ascii_alphabetic() {
        return Err(AnchorError::InvalidRow(letter));
    }

    let row = (letter.to_ascii_uppercase() as u8 - b'A') as usize;

    let number = chars.as_str();

    match number.parse::<usize>() {
        Ok(col) if col >= 1 => Ok((row, col - 1)),
        _ => Err(AnchorError::InvalidColumn(number.to_string())),
    }
}

/// Rows that an anchor letter can name.
pub const MAX_ROWS: usize = 26;

pub fn format_anchor((row, col): Coord) -> String {
    if row < MAX_ROWS {
        format!("{}{}", (b'A' + row as u8) as char, col + 1)
    } else {
        // Only reachable from a grid that was never checked
        format!("R{}C{}", row + 1, col + 1)
    }
}
