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

// Kunrei-style romanisation of single hiragana. The table is sorted
// by kana so that lookups can use a binary search.
static ROMAJI: [(char, &str); 74] = [
    ('あ', "a"), ('い', "i"), ('う', "u"), ('え', "e"), ('お', "o"),
    ('か', "ka"), ('が', "ga"), ('き', "ki"), ('ぎ', "gi"),
    ('く', "ku"), ('ぐ', "gu"), ('け', "ke"), ('げ', "ge"),
    ('こ', "ko"), ('ご', "go"), ('さ', "sa"), ('ざ', "za"),
    ('し', "si"), ('じ', "zi"), ('す', "su"), ('ず', "zu"),
    ('せ', "se"), ('ぜ', "ze"), ('そ', "so"), ('ぞ', "zo"),
    ('た', "ta"), ('だ', "da"), ('ち', "ti"), ('ぢ', "di"),
    ('つ', "tu"), ('づ', "du"), ('て', "te"), ('で', "de"),
    ('と', "to"), ('ど', "do"), ('な', "na"), ('に', "ni"),
    ('ぬ', "nu"), ('ね', "ne"), ('の', "no"), ('は', "ha"),
    ('ば', "ba"), ('ぱ', "pa"), ('ひ', "hi"), ('び', "bi"),
    ('ぴ', "pi"), ('ふ', "hu"), ('ぶ', "bu"), ('ぷ', "pu"),
    ('へ', "he"), ('べ', "be"), ('ぺ', "pe"), ('ほ', "ho"),
    ('ぼ', "bo"), ('ぽ', "po"), ('ま', "ma"), ('み', "mi"),
    ('む', "mu"), ('め', "me"), ('も', "mo"), ('や', "ya"),
    ('ゆ', "yu"), ('よ', "yo"), ('ら', "ra"), ('り', "ri"),
    ('る', "ru"), ('れ', "re"), ('ろ', "ro"), ('わ', "wa"),
    ('ゐ', "wi"), ('ゑ', "we"), ('を', "wo"), ('ん', "n"),
    ('ゔ', "vu"),
];

/// Returns the romanisation of a single character, or `None` if the
/// character isn’t in the table.
pub fn lookup(ch: char) -> Option<&'static str> {
    ROMAJI.binary_search_by_key(&ch, |&(kana, _)| kana)
        .ok()
        .map(|index| ROMAJI[index].1)
}

/// Converts every character of `text` that has a romanisation.
/// Anything else is copied through unchanged.
pub fn to_romaji(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match lookup(ch) {
            Some(romaji) => result.push_str(romaji),
            None => result.push(ch),
        }
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sorted() {
        for pair in ROMAJI.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{:?}", pair);
        }
    }

    #[test]
    fn convert() {
        assert_eq!(to_romaji("そんびてん"), "sonbiten");
        assert_eq!(to_romaji("こめいじこいし"), "komeizikoisi");
        assert_eq!(to_romaji("ひななゐてんし"), "hinanawitensi");
        assert_eq!(to_romaji("いなばてゐ"), "inabatewi");
        assert_eq!(to_romaji(""), "");
    }

    #[test]
    fn passthrough() {
        assert_eq!(to_romaji("風見ゆか!"), "風見yuka!");
        assert_eq!(lookup('x'), None);
        assert_eq!(lookup('ゆ'), Some("yu"));
    }
}
