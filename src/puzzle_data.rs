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

use super::direction::{Coord, Direction};
use serde::{Deserialize, Serialize};

/// How answers to a puzzle are checked and committed.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Each answer is checked against the accepted spellings and the
    /// canonical spelling is written into the grid.
    Standard,
    /// Any answer of the right length is provisionally accepted. The
    /// real check happens when the whole grid is submitted.
    LengthOnly,
    /// Like `LengthOnly`, but an answer that disagrees with a letter
    /// already placed by a crossing word is refused.
    CrossValidated,
    /// Not a grid at all. The solver answers once with a
    /// comma-separated sequence of numbers.
    FreeSequence {
        answer: String,
    },
}

impl AnswerKind {
    pub fn is_grid(&self) -> bool {
        !matches!(self, AnswerKind::FreeSequence { .. })
    }

    /// Whether answers are only checked properly on submission.
    pub fn defers_checking(&self) -> bool {
        matches!(self, AnswerKind::LengthOnly | AnswerKind::CrossValidated)
    }
}

#[derive(Clone, Debug)]
pub struct Placement {
    pub direction: Direction,
    pub anchor: Coord,
    pub length: usize,
    pub label: String,
    /// Never empty. The first entry is the canonical form.
    pub answers: Vec<String>,
    pub clue: Option<String>,
}

impl Placement {
    pub fn canonical(&self) -> &str {
        &self.answers[0]
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.length).map(|i| self.direction.step(self.anchor, i))
    }

    /// Returns the index of `pos` along the word, if the word covers it.
    pub fn index_of(&self, pos: Coord) -> Option<usize> {
        let (row, col) = pos;
        let (anchor_row, anchor_col) = self.anchor;

        let (along, fixed, anchor_along, anchor_fixed) = match self.direction {
            Direction::Across => (col, row, anchor_col, anchor_row),
            Direction::Down => (row, col, anchor_row, anchor_col),
        };

        (fixed == anchor_fixed &&
         along >= anchor_along &&
         along < anchor_along + self.length)
            .then(|| along - anchor_along)
    }

    pub fn accepts(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.answers.iter().any(|answer| answer.to_lowercase() == text)
    }
}

#[derive(Clone, Debug)]
pub struct PuzzleDefinition {
    pub id: u32,
    pub rows: usize,
    pub cols: usize,
    pub supports_transliteration: bool,
    pub kind: AnswerKind,
    pub prompt: Option<String>,
    pub placements: Vec<Placement>,
}

impl PuzzleDefinition {
    pub fn placement(&self, label: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.placements.iter().map(|p| p.label.as_str())
    }

    /// Placements other than `label` that cover `pos`.
    pub fn crossings<'a>(
        &'a self,
        label: &'a str,
        pos: Coord,
    ) -> impl Iterator<Item = (&'a Placement, usize)> + 'a {
        self.placements.iter().filter_map(move |p| {
            if p.label == label {
                None
            } else {
                p.index_of(pos).map(|index| (p, index))
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn placement(
        direction: Direction,
        anchor: Coord,
        label: &str,
        answers: &[&str],
    ) -> Placement {
        Placement {
            direction,
            anchor,
            length: answers[0].chars().count(),
            label: label.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            clue: None,
        }
    }

    // A small crossword:
    //
    //   かざみ.
    //   ..ゆ.
    //   ..か.
    pub fn small_puzzle(kind: AnswerKind) -> PuzzleDefinition {
        PuzzleDefinition {
            id: 7,
            rows: 3,
            cols: 4,
            supports_transliteration: true,
            kind,
            prompt: None,
            placements: vec![
                placement(
                    Direction::Across,
                    (0, 0),
                    "1",
                    &["かざみ", "kazami", "风见"],
                ),
                placement(
                    Direction::Down,
                    (0, 2),
                    "一",
                    &["みゆか", "miyuka"],
                ),
            ],
        }
    }

    #[test]
    fn cells() {
        let puzzle = small_puzzle(AnswerKind::Standard);

        assert_eq!(
            puzzle.placement("1").unwrap().cells().collect::<Vec<_>>(),
            &[(0, 0), (0, 1), (0, 2)],
        );
        assert_eq!(
            puzzle.placement("一").unwrap().cells().collect::<Vec<_>>(),
            &[(0, 2), (1, 2), (2, 2)],
        );
        assert!(puzzle.placement("2").is_none());
        assert_eq!(puzzle.labels().collect::<Vec<_>>(), &["1", "一"]);
    }

    #[test]
    fn index_of() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let across = puzzle.placement("1").unwrap();
        let down = puzzle.placement("一").unwrap();

        assert_eq!(across.index_of((0, 0)), Some(0));
        assert_eq!(across.index_of((0, 2)), Some(2));
        assert_eq!(across.index_of((0, 3)), None);
        assert_eq!(across.index_of((1, 0)), None);

        assert_eq!(down.index_of((0, 2)), Some(0));
        assert_eq!(down.index_of((2, 2)), Some(2));
        assert_eq!(down.index_of((3, 2)), None);
        assert_eq!(down.index_of((1, 1)), None);
    }

    #[test]
    fn crossings() {
        let puzzle = small_puzzle(AnswerKind::Standard);

        let crossings = puzzle.crossings("1", (0, 2))
            .map(|(p, index)| (p.label.as_str(), index))
            .collect::<Vec<_>>();
        assert_eq!(&crossings, &[("一", 0)]);

        assert_eq!(puzzle.crossings("1", (0, 1)).count(), 0);
    }

    #[test]
    fn accepts() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let across = puzzle.placement("1").unwrap();

        assert!(across.accepts("かざみ"));
        assert!(across.accepts("KaZaMi"));
        assert!(across.accepts("风见"));
        assert!(!across.accepts("kazam"));
        assert_eq!(across.canonical(), "かざみ");
    }

    #[test]
    fn kinds() {
        assert!(AnswerKind::Standard.is_grid());
        assert!(!AnswerKind::Standard.defers_checking());
        assert!(AnswerKind::LengthOnly.defers_checking());
        assert!(AnswerKind::CrossValidated.defers_checking());
        let sequence = AnswerKind::FreeSequence { answer: "1,2".to_string() };
        assert!(!sequence.is_grid());
        assert!(!sequence.defers_checking());
    }
}
