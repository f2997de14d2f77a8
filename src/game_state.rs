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
use super::grid::{self, Grid};
use super::puzzle_data::{AnswerKind, Placement, PuzzleDefinition};
use super::romaji;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Native,
    Transliterated,
}

impl DisplayMode {
    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Native => "假名",
            DisplayMode::Transliterated => "罗马音",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SolvedClue {
    label: String,
    text: String,
}

/// The progress of one solver on one puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    grid: Grid,
    // In the order the answers were committed. A label appears at
    // most once.
    solved: Vec<SolvedClue>,
    #[serde(default)]
    display_mode: DisplayMode,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("no clue labelled {0}")]
    UnknownClue(String),
    #[error("answer for {label} should be {expected} characters long \
             but is {actual}")]
    WrongLength {
        label: String,
        expected: usize,
        actual: usize,
    },
    #[error(
        "“{attempted}” from {label} conflicts with “{existing}” from {other} \
         at {}",
        direction::format_anchor((*.row, *.col)),
    )]
    CrossConflict {
        label: String,
        other: String,
        row: usize,
        col: usize,
        existing: String,
        attempted: String,
    },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("puzzle {0} can’t be shown in romaji")]
pub struct NoTransliteration(pub u32);

fn cell_text(ch: char, display_mode: DisplayMode) -> String {
    match display_mode {
        DisplayMode::Native => ch.to_string(),
        DisplayMode::Transliterated => match romaji::lookup(ch) {
            Some(romaji) => romaji.to_string(),
            None => ch.to_string(),
        },
    }
}

impl GameState {
    pub fn new(puzzle: &PuzzleDefinition) -> Result<GameState, grid::Error> {
        Ok(GameState {
            grid: Grid::build(puzzle)?,
            solved: Vec::new(),
            display_mode: DisplayMode::Native,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn solved_labels(&self) -> impl Iterator<Item = &str> {
        self.solved.iter().map(|clue| clue.label.as_str())
    }

    pub fn is_solved(&self, label: &str) -> bool {
        self.solved.iter().any(|clue| clue.label == label)
    }

    /// The native text committed for `label`, if any.
    pub fn answer(&self, label: &str) -> Option<&str> {
        self.solved.iter()
            .find(|clue| clue.label == label)
            .map(|clue| clue.text.as_str())
    }

    fn write_placement(&mut self, placement: &Placement, text: &str) {
        for (pos, ch) in placement.cells().zip(text.chars()) {
            self.grid.at_mut(pos).content = cell_text(ch, self.display_mode);
        }
    }

    fn check_crossings(
        &self,
        puzzle: &PuzzleDefinition,
        placement: &Placement,
        text: &str,
    ) -> Result<(), CommitError> {
        for (pos, ch) in placement.cells().zip(text.chars()) {
            let attempted = cell_text(ch, self.display_mode);
            let existing = &self.grid.at(pos).content;

            if existing.is_empty() || *existing == attempted {
                continue;
            }

            let Some((other, _)) = puzzle.crossings(&placement.label, pos)
                .find(|(other, _)| self.is_solved(&other.label))
            else {
                continue;
            };

            let (row, col): Coord = pos;

            return Err(CommitError::CrossConflict {
                label: placement.label.clone(),
                other: other.label.clone(),
                row,
                col,
                existing: existing.clone(),
                attempted,
            });
        }

        Ok(())
    }

    /// Writes an accepted answer into the grid and marks its clue as
    /// solved. On error nothing is changed.
    pub fn commit(
        &mut self,
        puzzle: &PuzzleDefinition,
        label: &str,
        text: &str,
    ) -> Result<(), CommitError> {
        if !puzzle.kind.is_grid() {
            self.record_solved(label, text);
            return Ok(());
        }

        let Some(placement) = puzzle.placement(label)
        else {
            return Err(CommitError::UnknownClue(label.to_string()));
        };

        let actual = text.chars().count();

        if actual != placement.length {
            return Err(CommitError::WrongLength {
                label: label.to_string(),
                expected: placement.length,
                actual,
            });
        }

        if puzzle.kind == AnswerKind::CrossValidated {
            self.check_crossings(puzzle, placement, text)?;
        }

        self.write_placement(placement, text);
        self.record_solved(label, text);

        Ok(())
    }

    fn record_solved(&mut self, label: &str, text: &str) {
        self.solved.retain(|clue| clue.label != label);
        self.solved.push(SolvedClue {
            label: label.to_string(),
            text: text.to_string(),
        });
    }

    // Clears every cell and writes the solved answers again in the
    // order they were committed.
    fn replay(&mut self, puzzle: &PuzzleDefinition) {
        for cell in self.grid.cells_mut() {
            cell.content.clear();
        }

        let solved = std::mem::take(&mut self.solved);

        for clue in solved.iter() {
            if let Some(placement) = puzzle.placement(&clue.label) {
                self.write_placement(placement, &clue.text);
            }
        }

        self.solved = solved;
    }

    /// Switches between native and romaji display and returns the
    /// new mode.
    pub fn toggle_display(
        &mut self,
        puzzle: &PuzzleDefinition,
    ) -> Result<DisplayMode, NoTransliteration> {
        if !puzzle.supports_transliteration {
            return Err(NoTransliteration(puzzle.id));
        }

        match self.display_mode {
            DisplayMode::Native => {
                for cell in self.grid.cells_mut() {
                    if !cell.content.is_empty() {
                        cell.content = romaji::to_romaji(&cell.content);
                    }
                }

                self.display_mode = DisplayMode::Transliterated;
            },
            DisplayMode::Transliterated => {
                self.display_mode = DisplayMode::Native;
                self.replay(puzzle);
            },
        }

        Ok(self.display_mode)
    }

    /// Removes the answer for `label`. Cells shared with another
    /// solved clue keep that clue’s letter. Returns whether the clue
    /// had been solved.
    pub fn erase(
        &mut self,
        puzzle: &PuzzleDefinition,
        label: &str,
    ) -> Result<bool, CommitError> {
        if puzzle.kind.is_grid() && puzzle.placement(label).is_none() {
            return Err(CommitError::UnknownClue(label.to_string()));
        }

        if !self.is_solved(label) {
            return Ok(false);
        }

        self.solved.retain(|clue| clue.label != label);
        self.replay(puzzle);

        Ok(true)
    }

    pub fn is_complete(&self, puzzle: &PuzzleDefinition) -> bool {
        if puzzle.kind.is_grid() {
            puzzle.labels().all(|label| self.is_solved(label))
        } else {
            !self.solved.is_empty()
        }
    }

    /// Labels whose committed answer isn’t one of the accepted
    /// answers, in puzzle order. Unsolved clues are included.
    pub fn check_solution(&self, puzzle: &PuzzleDefinition) -> Vec<String> {
        puzzle.placements.iter()
            .filter(|placement| {
                !self.answer(&placement.label)
                    .is_some_and(|text| placement.accepts(text))
            })
            .map(|placement| placement.label.clone())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::Catalog;
    use crate::puzzle_data::test::small_puzzle;

    fn contents(state: &GameState) -> Vec<String> {
        state.grid().cells().map(|(_, cell)| cell.content.clone()).collect()
    }

    #[test]
    fn commit() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let mut state = GameState::new(&puzzle).unwrap();

        state.commit(&puzzle, "1", "かざみ").unwrap();

        assert_eq!(state.grid().word([(0, 0), (0, 1), (0, 2)]), "かざみ");
        assert!(state.is_solved("1"));
        assert!(!state.is_solved("一"));
        assert!(!state.is_complete(&puzzle));

        state.commit(&puzzle, "一", "みゆか").unwrap();

        assert_eq!(state.grid().word([(0, 2), (1, 2), (2, 2)]), "みゆか");
        assert_eq!(state.solved_labels().collect::<Vec<_>>(), &["1", "一"]);
        assert!(state.is_complete(&puzzle));
        assert!(state.check_solution(&puzzle).is_empty());
    }

    #[test]
    fn commit_errors() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let mut state = GameState::new(&puzzle).unwrap();

        assert_eq!(
            state.commit(&puzzle, "2", "かざみ").unwrap_err(),
            CommitError::UnknownClue("2".to_string()),
        );
        assert_eq!(
            &state.commit(&puzzle, "1", "かざ").unwrap_err().to_string(),
            "answer for 1 should be 3 characters long but is 2",
        );
        assert_eq!(state.solved_labels().count(), 0);
    }

    #[test]
    fn cross_conflict() {
        let puzzle = small_puzzle(AnswerKind::CrossValidated);
        let mut state = GameState::new(&puzzle).unwrap();

        state.commit(&puzzle, "1", "あいう").unwrap();
        let before = state.clone();

        assert_eq!(
            state.commit(&puzzle, "一", "えおか").unwrap_err(),
            CommitError::CrossConflict {
                label: "一".to_string(),
                other: "1".to_string(),
                row: 0,
                col: 2,
                existing: "う".to_string(),
                attempted: "え".to_string(),
            },
        );
        assert_eq!(
            &state.commit(&puzzle, "一", "えおか").unwrap_err().to_string(),
            "“え” from 一 conflicts with “う” from 1 at A3",
        );

        // Nothing is written on a conflict
        assert_eq!(state, before);

        state.commit(&puzzle, "一", "うおか").unwrap();
        assert!(state.is_complete(&puzzle));

        // Replacing an answer is checked against the crossings too
        assert!(matches!(
            state.commit(&puzzle, "1", "あいえ"),
            Err(CommitError::CrossConflict { .. }),
        ));
        state.commit(&puzzle, "1", "かきう").unwrap();
        assert_eq!(state.answer("1"), Some("かきう"));
    }

    #[test]
    fn length_only_ignores_crossings() {
        let puzzle = small_puzzle(AnswerKind::LengthOnly);
        let mut state = GameState::new(&puzzle).unwrap();

        state.commit(&puzzle, "1", "あいう").unwrap();
        state.commit(&puzzle, "一", "えおか").unwrap();

        assert_eq!(state.grid().at((0, 2)).content, "え");
        assert_eq!(state.check_solution(&puzzle), &["1", "一"]);
    }

    #[test]
    fn check_solution() {
        let puzzle = small_puzzle(AnswerKind::CrossValidated);
        let mut state = GameState::new(&puzzle).unwrap();

        assert_eq!(state.check_solution(&puzzle), &["1", "一"]);

        state.commit(&puzzle, "1", "かざみ").unwrap();
        state.commit(&puzzle, "一", "みゆき").unwrap();

        assert!(state.is_complete(&puzzle));
        assert_eq!(state.check_solution(&puzzle), &["一"]);

        state.commit(&puzzle, "一", "みゆか").unwrap();
        assert!(state.check_solution(&puzzle).is_empty());
    }

    #[test]
    fn toggle() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let mut state = GameState::new(&puzzle).unwrap();

        state.commit(&puzzle, "1", "かざみ").unwrap();

        assert_eq!(
            state.toggle_display(&puzzle).unwrap(),
            DisplayMode::Transliterated,
        );
        assert_eq!(state.grid().word([(0, 0), (0, 1), (0, 2)]), "kazami");
        assert_eq!(state.grid().at((1, 2)).content, "");

        // Answers committed while in romaji are written in romaji
        state.commit(&puzzle, "一", "みゆか").unwrap();
        assert_eq!(state.grid().word([(0, 2), (1, 2), (2, 2)]), "miyuka");

        assert_eq!(state.toggle_display(&puzzle).unwrap(), DisplayMode::Native);
        assert_eq!(state.grid().word([(0, 0), (0, 1), (0, 2)]), "かざみ");
        assert_eq!(state.grid().word([(0, 2), (1, 2), (2, 2)]), "みゆか");
    }

    #[test]
    fn toggle_twice_restores_grid() {
        let catalog = Catalog::builtin().unwrap();
        let puzzle = catalog.lookup(1).unwrap();
        let mut state = GameState::new(puzzle).unwrap();

        for placement in puzzle.placements.iter().step_by(2) {
            state.commit(puzzle, &placement.label, placement.canonical())
                .unwrap();

            let before = contents(&state);

            state.toggle_display(puzzle).unwrap();
            assert_ne!(contents(&state), before);
            state.toggle_display(puzzle).unwrap();

            assert_eq!(contents(&state), before);
        }
    }

    #[test]
    fn toggle_unsupported() {
        let mut puzzle = small_puzzle(AnswerKind::Standard);
        puzzle.supports_transliteration = false;
        let mut state = GameState::new(&puzzle).unwrap();

        assert_eq!(
            state.toggle_display(&puzzle).unwrap_err(),
            NoTransliteration(7),
        );
        assert_eq!(state.display_mode(), DisplayMode::Native);
    }

    #[test]
    fn erase() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let mut state = GameState::new(&puzzle).unwrap();

        state.commit(&puzzle, "1", "かざみ").unwrap();
        state.commit(&puzzle, "一", "みゆか").unwrap();

        assert!(state.erase(&puzzle, "1").unwrap());

        assert!(!state.is_solved("1"));
        assert_eq!(state.grid().word([(0, 0), (0, 1)]), "");
        // Shared with the down clue
        assert_eq!(state.grid().at((0, 2)).content, "み");

        assert!(!state.erase(&puzzle, "1").unwrap());
        assert_eq!(
            state.erase(&puzzle, "九").unwrap_err(),
            CommitError::UnknownClue("九".to_string()),
        );

        assert!(state.erase(&puzzle, "一").unwrap());
        assert!(contents(&state).iter().all(|content| content.is_empty()));
    }

    #[test]
    fn free_sequence() {
        let puzzle = PuzzleDefinition {
            id: 3,
            rows: 1,
            cols: 1,
            supports_transliteration: false,
            kind: AnswerKind::FreeSequence { answer: "1,2".to_string() },
            prompt: None,
            placements: Vec::new(),
        };
        let mut state = GameState::new(&puzzle).unwrap();

        assert!(!state.is_complete(&puzzle));

        state.commit(&puzzle, "1", "1,2").unwrap();

        assert!(state.is_complete(&puzzle));
        assert_eq!(state.grid().at((0, 0)).content, "");
    }

    #[test]
    fn serialize() {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let mut state = GameState::new(&puzzle).unwrap();

        state.commit(&puzzle, "1", "かざみ").unwrap();
        state.toggle_display(&puzzle).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let loaded = serde_json::from_str::<GameState>(&json).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.display_mode(), DisplayMode::Transliterated);
    }
}
