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

fn digit_value(ch: char) -> Option<u32> {
    let value = match ch {
        '一' => 1,
        '二' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        _ => return None,
    };

    Some(value)
}

fn multiplier_value(ch: char) -> Option<u32> {
    let value = match ch {
        '十' => 10,
        '百' => 100,
        '千' => 1000,
        '万' => 10000,
        _ => return None,
    };

    Some(value)
}

/// Parses a number written with Chinese numerals such as “十二” or
/// “三百五”. A multiplier without a digit before it counts as one of
/// that multiplier, so “十一” is 11. Returns `None` if the string is
/// empty or contains any other character.
pub fn parse_cjk_number(s: &str) -> Option<u32> {
    let mut result = 0u32;
    let mut pending = 0u32;
    let mut any = false;

    for ch in s.chars() {
        if let Some(digit) = digit_value(ch) {
            pending = digit;
        } else if let Some(multiplier) = multiplier_value(ch) {
            if pending == 0 {
                pending = 1;
            }
            result = result.checked_add(pending.checked_mul(multiplier)?)?;
            pending = 0;
        } else {
            return None;
        }

        any = true;
    }

    if !any {
        return None;
    }

    result.checked_add(pending)
}

/// Parses a number written either with Arabic or Chinese numerals.
pub fn parse_number(s: &str) -> Option<u32> {
    let s = s.trim();

    match s.parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => parse_cjk_number(s),
    }
}

/// Parses a reference to a puzzle. Besides a plain number this
/// accepts the “第N题” form that solvers tend to type.
pub fn parse_puzzle_reference(s: &str) -> Option<u32> {
    let s = s.trim();

    let s = s.strip_prefix('第').unwrap_or(s);
    let s = s.strip_suffix('题').unwrap_or(s);

    parse_number(s)
}

/// Whether a clue label is written in Chinese numerals, which is the
/// convention for down clues.
pub fn is_cjk_label(label: &str) -> bool {
    !label.is_empty() && parse_cjk_number(label).is_some()
}
