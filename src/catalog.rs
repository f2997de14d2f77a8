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

use super::direction::{self, AnchorError, Coord, Direction};
use super::grid::{self, Grid};
use super::puzzle_data::{AnswerKind, Placement, PuzzleDefinition};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

static BUILTIN_PUZZLES: &str = include_str!("../data/puzzles.json");

#[derive(Deserialize)]
struct CatalogFile {
    puzzles: Vec<PuzzleEntry>,
}

#[derive(Deserialize)]
struct PuzzleEntry {
    id: u32,
    rows: usize,
    cols: usize,
    #[serde(default)]
    transliteration: bool,
    kind: AnswerKind,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    placements: Vec<PlacementEntry>,
}

#[derive(Deserialize)]
struct PlacementEntry {
    direction: Direction,
    anchor: String,
    length: usize,
    label: String,
    answers: Vec<String>,
    #[serde(default)]
    clue: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("puzzle {0} does not exist")]
    NotFound(u32),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("puzzle {0} is defined more than once")]
    DuplicatePuzzle(u32),
    #[error("puzzle {puzzle}, clue {label}: {source}")]
    InvalidAnchor {
        puzzle: u32,
        label: String,
        source: AnchorError,
    },
    #[error("puzzle {puzzle}: {source}")]
    Layout {
        puzzle: u32,
        source: grid::Error,
    },
    #[error("puzzle {puzzle}, clue {label} has no answers")]
    NoAnswers {
        puzzle: u32,
        label: String,
    },
    #[error("puzzle {puzzle}, clue {label}: “{answer}” does not have {length} \
             characters")]
    AnswerLength {
        puzzle: u32,
        label: String,
        answer: String,
        length: usize,
    },
    #[error("puzzle {puzzle}: clue label {label} is used more than once")]
    DuplicateLabel {
        puzzle: u32,
        label: String,
    },
    #[error("puzzle {puzzle} has no words")]
    NoPlacements {
        puzzle: u32,
    },
    #[error("puzzle {puzzle} has {rows} rows but anchors can only name {}",
            direction::MAX_ROWS)]
    TooManyRows {
        puzzle: u32,
        rows: usize,
    },
    #[error("puzzle {puzzle}: clues {first} and {second} disagree at {}",
            direction::format_anchor(*.pos))]
    CrossingMismatch {
        puzzle: u32,
        first: String,
        second: String,
        pos: Coord,
    },
}

/// The read-only set of puzzles the bot knows about.
#[derive(Debug)]
pub struct Catalog {
    puzzles: BTreeMap<u32, PuzzleDefinition>,
}

impl Catalog {
    /// The puzzles compiled into the program.
    pub fn builtin() -> Result<Catalog, Error> {
        Catalog::from_json(BUILTIN_PUZZLES)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog, Error> {
        let path = path.as_ref();

        let source = std::fs::read_to_string(path).map_err(|source| {
            Error::Io { path: path.to_owned(), source }
        })?;

        Catalog::from_json(&source)
    }

    pub fn from_json(source: &str) -> Result<Catalog, Error> {
        let file = serde_json::from_str::<CatalogFile>(source)?;

        let mut puzzles = BTreeMap::new();

        for entry in file.puzzles.into_iter() {
            let puzzle = convert_puzzle(entry)?;
            let id = puzzle.id;

            check_puzzle(&puzzle)?;

            if puzzles.insert(id, puzzle).is_some() {
                return Err(Error::DuplicatePuzzle(id));
            }
        }

        Ok(Catalog { puzzles })
    }

    pub fn lookup(&self, id: u32) -> Result<&PuzzleDefinition, Error> {
        self.puzzles.get(&id).ok_or(Error::NotFound(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.puzzles.contains_key(&id)
    }

    pub fn puzzles(&self) -> impl Iterator<Item = &PuzzleDefinition> {
        self.puzzles.values()
    }
}

fn convert_puzzle(entry: PuzzleEntry) -> Result<PuzzleDefinition, Error> {
    let puzzle = entry.id;

    let placements = entry.placements.into_iter()
        .map(|p| {
            let anchor = direction::parse_anchor(&p.anchor)
                .map_err(|source| Error::InvalidAnchor {
                    puzzle,
                    label: p.label.clone(),
                    source,
                })?;

            Ok(Placement {
                direction: p.direction,
                anchor,
                length: p.length,
                label: p.label,
                answers: p.answers,
                clue: p.clue,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(PuzzleDefinition {
        id: puzzle,
        rows: entry.rows,
        cols: entry.cols,
        supports_transliteration: entry.transliteration,
        kind: entry.kind,
        prompt: entry.prompt,
        placements,
    })
}

/// Checks the authoring rules that the rest of the program relies on.
pub fn check_puzzle(puzzle: &PuzzleDefinition) -> Result<(), Error> {
    let id = puzzle.id;

    if puzzle.kind.is_grid() && puzzle.placements.is_empty() {
        return Err(Error::NoPlacements { puzzle: id });
    }

    if puzzle.rows > direction::MAX_ROWS {
        return Err(Error::TooManyRows { puzzle: id, rows: puzzle.rows });
    }

    let mut labels = HashSet::new();

    for placement in puzzle.placements.iter() {
        let Some(canonical) = placement.answers.first()
        else {
            return Err(Error::NoAnswers {
                puzzle: id,
                label: placement.label.clone(),
            });
        };

        if canonical.chars().count() != placement.length ||
            placement.length < 1
        {
            return Err(Error::AnswerLength {
                puzzle: id,
                label: placement.label.clone(),
                answer: canonical.clone(),
                length: placement.length,
            });
        }

        if !labels.insert(placement.label.as_str()) {
            return Err(Error::DuplicateLabel {
                puzzle: id,
                label: placement.label.clone(),
            });
        }
    }

    Grid::build(puzzle).map_err(|source| Error::Layout { puzzle: id, source })?;

    // Every pair of crossing words must agree on the shared letter
    let mut letters = HashMap::<Coord, (char, &str)>::new();

    for placement in puzzle.placements.iter() {
        for (pos, ch) in placement.cells().zip(placement.canonical().chars()) {
            match letters.get(&pos) {
                Some(&(other_ch, other_label)) if other_ch != ch => {
                    return Err(Error::CrossingMismatch {
                        puzzle: id,
                        first: other_label.to_string(),
                        second: placement.label.clone(),
                        pos,
                    });
                },
                Some(_) => (),
                None => {
                    letters.insert(pos, (ch, placement.label.as_str()));
                },
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn one_puzzle(placements: &str) -> String {
        format!(
            "{{\"puzzles\": [{{\"id\": 4, \"rows\": 3, \"cols\": 3, \
             \"kind\": \"standard\", \"placements\": [{}]}}]}}",
            placements,
        )
    }

    #[test]
    fn builtin() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(
            catalog.puzzles().map(|p| p.id).collect::<Vec<_>>(),
            &[1, 2, 3],
        );

        let first = catalog.lookup(1).unwrap();
        assert_eq!((first.rows, first.cols), (20, 20));
        assert!(first.supports_transliteration);
        assert_eq!(first.kind, AnswerKind::Standard);
        assert_eq!(first.placements.len(), 24);

        let across = first.placement("1").unwrap();
        assert_eq!(across.direction, Direction::Across);
        assert_eq!(across.anchor, (1, 0));
        assert_eq!(across.canonical(), "そんびてん");
        assert!(across.clue.is_some());

        let second = catalog.lookup(2).unwrap();
        assert_eq!(second.kind, AnswerKind::CrossValidated);
        assert!(!second.supports_transliteration);

        let third = catalog.lookup(3).unwrap();
        assert_eq!(
            third.kind,
            AnswerKind::FreeSequence { answer: "2,2,6,9,7,7,7".to_string() },
        );
        assert!(third.placements.is_empty());
        assert!(third.prompt.is_some());
    }

    #[test]
    fn builtin_paths_in_bounds() {
        let catalog = Catalog::builtin().unwrap();

        for puzzle in catalog.puzzles() {
            for placement in puzzle.placements.iter() {
                for (row, col) in placement.cells() {
                    assert!(row < puzzle.rows && col < puzzle.cols);
                }
            }
        }
    }

    #[test]
    fn not_found() {
        let catalog = Catalog::builtin().unwrap();

        assert!(matches!(catalog.lookup(99), Err(Error::NotFound(99))));
        assert!(!catalog.contains(99));
        assert!(catalog.contains(3));
        assert_eq!(
            &catalog.lookup(99).unwrap_err().to_string(),
            "puzzle 99 does not exist",
        );
    }

    #[test]
    fn out_of_bounds() {
        let source = one_puzzle(
            "{\"direction\": \"down\", \"anchor\": \"B3\", \"length\": 3, \
             \"label\": \"一\", \"answers\": [\"abc\"]}"
        );

        assert_eq!(
            &Catalog::from_json(&source).unwrap_err().to_string(),
            "puzzle 4: word 一 runs off the grid at D3",
        );
    }

    #[test]
    fn bad_anchor() {
        let source = one_puzzle(
            "{\"direction\": \"down\", \"anchor\": \"3B\", \"length\": 3, \
             \"label\": \"一\", \"answers\": [\"abc\"]}"
        );

        assert_eq!(
            &Catalog::from_json(&source).unwrap_err().to_string(),
            "puzzle 4, clue 一: invalid row letter “3”",
        );
    }

    #[test]
    fn answer_length() {
        let source = one_puzzle(
            "{\"direction\": \"across\", \"anchor\": \"A1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": [\"ab\", \"abc\"]}"
        );

        assert_eq!(
            &Catalog::from_json(&source).unwrap_err().to_string(),
            "puzzle 4, clue 1: “ab” does not have 3 characters",
        );

        let source = one_puzzle(
            "{\"direction\": \"across\", \"anchor\": \"A1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": []}"
        );

        assert!(matches!(
            Catalog::from_json(&source).unwrap_err(),
            Error::NoAnswers { puzzle: 4, .. },
        ));
    }

    #[test]
    fn duplicates() {
        let source = one_puzzle(
            "{\"direction\": \"across\", \"anchor\": \"A1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": [\"abc\"]}, \
             {\"direction\": \"across\", \"anchor\": \"C1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": [\"abc\"]}"
        );

        assert!(matches!(
            Catalog::from_json(&source).unwrap_err(),
            Error::DuplicateLabel { puzzle: 4, .. },
        ));

        let puzzle = "{\"id\": 5, \"rows\": 1, \"cols\": 1, \
                      \"kind\": {\"free_sequence\": {\"answer\": \"1\"}}}";
        let source = format!("{{\"puzzles\": [{}, {}]}}", puzzle, puzzle);

        assert!(matches!(
            Catalog::from_json(&source).unwrap_err(),
            Error::DuplicatePuzzle(5),
        ));
    }

    #[test]
    fn crossing_mismatch() {
        let source = one_puzzle(
            "{\"direction\": \"across\", \"anchor\": \"A1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": [\"abc\"]}, \
             {\"direction\": \"down\", \"anchor\": \"A3\", \"length\": 3, \
             \"label\": \"一\", \"answers\": [\"xyz\"]}"
        );

        assert_eq!(
            &Catalog::from_json(&source).unwrap_err().to_string(),
            "puzzle 4: clues 1 and 一 disagree at A3",
        );

        let source = one_puzzle(
            "{\"direction\": \"across\", \"anchor\": \"A1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": [\"abc\"]}, \
             {\"direction\": \"down\", \"anchor\": \"A3\", \"length\": 3, \
             \"label\": \"一\", \"answers\": [\"cyz\"]}"
        );

        assert!(Catalog::from_json(&source).is_ok());
    }

    #[test]
    fn no_placements() {
        let source = one_puzzle("");

        assert!(matches!(
            Catalog::from_json(&source).unwrap_err(),
            Error::NoPlacements { puzzle: 4 },
        ));
    }

    #[test]
    fn too_many_rows() {
        let source = one_puzzle(
            "{\"direction\": \"across\", \"anchor\": \"A1\", \"length\": 3, \
             \"label\": \"1\", \"answers\": [\"abc\"]}"
        ).replace("\"rows\": 3", "\"rows\": 27");

        let err = Catalog::from_json(&source).unwrap_err();

        assert!(matches!(err, Error::TooManyRows { puzzle: 4, rows: 27 }));
        assert_eq!(
            err.to_string(),
            "puzzle 4 has 27 rows but anchors can only name 26",
        );

        let source = source.replace("\"rows\": 27", "\"rows\": 26");
        assert!(Catalog::from_json(&source).is_ok());
    }
}
