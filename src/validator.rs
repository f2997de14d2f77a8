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

use super::catalog::{self, Catalog};
use super::puzzle_data::{AnswerKind, PuzzleDefinition};
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Rejection {
    UnknownClue(String),
    WrongLength {
        expected: usize,
    },
    WrongAnswer,
    BadSequenceFormat,
    WrongFieldCount {
        expected: usize,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::UnknownClue(label) => {
                write!(f, "题号 {} 不存在", label)
            },
            Rejection::WrongLength { expected } => {
                write!(f, "答案长度错误，需要{}个字符", expected)
            },
            Rejection::WrongAnswer => write!(f, "回答错误，请重试"),
            Rejection::BadSequenceFormat => {
                write!(f, "答案格式错误，请使用逗号分隔的数字序列")
            },
            Rejection::WrongFieldCount { expected } => {
                write!(f, "答案必须包含{}个数字，用逗号分隔", expected)
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Verdict {
    Accepted {
        /// The text to write into the grid.
        canonical: String,
        /// Set when only the shape of the answer was checked and the
        /// real check happens on submission.
        provisional: bool,
    },
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    pub fn canonical(&self) -> Option<&str> {
        match self {
            Verdict::Accepted { canonical, .. } => Some(canonical),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Accepted { provisional: false, .. } => {
                write!(f, "回答正确！")
            },
            Verdict::Accepted { provisional: true, .. } => {
                write!(
                    f,
                    "答案已填入，请继续完成其他题目或使用 /提交 提交答案",
                )
            },
            Verdict::Rejected(rejection) => rejection.fmt(f),
        }
    }
}

/// Replaces full-width commas and trims the answer to a number
/// sequence puzzle.
pub fn normalize_sequence(text: &str) -> String {
    text.replace('，', ",").trim().to_string()
}

fn validate_sequence(answer: &str, text: &str) -> Verdict {
    let text = normalize_sequence(text);

    if !text.chars().all(|ch| ch.is_ascii_digit() || ch == ',') {
        return Verdict::Rejected(Rejection::BadSequenceFormat);
    }

    let expected = answer.split(',').count();

    if text.split(',').count() != expected {
        return Verdict::Rejected(Rejection::WrongFieldCount { expected });
    }

    if text == answer {
        Verdict::Accepted { canonical: text, provisional: false }
    } else {
        Verdict::Rejected(Rejection::WrongAnswer)
    }
}

/// Checks an answer given by a solver. Problems with the answer
/// itself are reported in the verdict rather than as an error.
pub fn validate(puzzle: &PuzzleDefinition, label: &str, text: &str) -> Verdict {
    if let AnswerKind::FreeSequence { answer } = &puzzle.kind {
        return validate_sequence(answer, text);
    }

    let Some(placement) = puzzle.placement(label)
    else {
        return Verdict::Rejected(Rejection::UnknownClue(label.to_string()));
    };

    match puzzle.kind {
        AnswerKind::LengthOnly | AnswerKind::CrossValidated => {
            if text.chars().count() == placement.length {
                Verdict::Accepted {
                    canonical: text.to_string(),
                    provisional: true,
                }
            } else {
                Verdict::Rejected(Rejection::WrongLength {
                    expected: placement.length,
                })
            }
        },
        _ => {
            if placement.accepts(text) {
                Verdict::Accepted {
                    canonical: placement.canonical().to_string(),
                    provisional: false,
                }
            } else {
                Verdict::Rejected(Rejection::WrongAnswer)
            }
        },
    }
}

/// Looks up the puzzle first. An unknown puzzle is an error in the
/// caller rather than something the solver did.
pub fn validate_in(
    catalog: &Catalog,
    puzzle_id: u32,
    label: &str,
    text: &str,
) -> Result<Verdict, catalog::Error> {
    Ok(validate(catalog.lookup(puzzle_id)?, label, text))
}
