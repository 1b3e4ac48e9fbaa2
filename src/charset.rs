//! # Character Code Table
//!
//! The split-flap firmware addresses every tile by a small integer code in
//! the range 0..=71. This module is the single source of truth for that
//! mapping: no other module hard-codes a character/code pair.
//!
//! ## Code Layout
//!
//! The assignment is fixed by the device firmware and must match it
//! bit-for-bit:
//! - `0`: blank tile (space)
//! - `1..=26`: letters A-Z
//! - `27..=35`: digits 1-9, `36`: digit 0
//! - `37..=60`: punctuation (with a handful of unassigned gaps)
//! - `62`: degree sign
//! - `63..=70`: colored tiles (red, orange, yellow, green, blue, violet,
//!   white, black)
//! - `71`: filled tile
//!
//! Codes 43, 45, 51, 57, 58 and 61 are unassigned in current firmware and
//! decode to blank.
//!
//! ## Lookup Semantics
//!
//! [`code_of_token`] is a *total* function: any character or word the table
//! does not recognize resolves to the blank code rather than failing. A
//! corrupted or unsupported character must never abort rendering of the
//! rest of a message.
//!
//! The tables are built once at first use and treated as immutable
//! process-wide state. Lookups never allocate.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A single tile code understood by the display firmware.
///
/// Valid codes occupy `0..=71`; see the module docs for the layout.
pub type CharacterCode = u8;

/// Code for the blank tile. Doubles as the degraded value for any input
/// the table does not recognize.
pub const BLANK: CharacterCode = 0;

/// Highest code assigned by current firmware.
pub const CODE_MAX: CharacterCode = 71;

/// Reserved multi-letter tokens and their codes.
///
/// Each of these occupies exactly one grid cell when encoded, regardless
/// of the token's spelled length.
const SPECIAL_TOKENS: &[(&str, CharacterCode)] = &[
    ("degreeSign", 62),
    ("redBlock", 63),
    ("orangeBlock", 64),
    ("yellowBlock", 65),
    ("greenBlock", 66),
    ("blueBlock", 67),
    ("violetBlock", 68),
    ("whiteBlock", 69),
    ("blackBlock", 70),
    ("filled", 71),
];

/// Printable characters outside the letter/digit ranges.
const PUNCTUATION: &[(char, CharacterCode)] = &[
    ('!', 37),
    ('@', 38),
    ('#', 39),
    ('$', 40),
    ('(', 41),
    (')', 42),
    ('-', 44),
    ('+', 46),
    ('&', 47),
    ('=', 48),
    (';', 49),
    (':', 50),
    ('\'', 52),
    ('"', 53),
    ('%', 54),
    (',', 55),
    ('.', 56),
    ('/', 59),
    ('?', 60),
    ('°', 62),
];

/// Forward table: uppercase character -> code.
static CHAR_CODES: LazyLock<HashMap<char, CharacterCode>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    table.insert(' ', BLANK);
    for (i, c) in ('A'..='Z').enumerate() {
        table.insert(c, (i + 1) as CharacterCode);
    }
    for (i, c) in ('1'..='9').enumerate() {
        table.insert(c, (i + 27) as CharacterCode);
    }
    table.insert('0', 36);
    for &(c, code) in PUNCTUATION {
        table.insert(c, code);
    }
    table
});

/// Reverse table: code -> printable character, where one exists.
///
/// Colored tiles and the filled tile have no printable equivalent and stay
/// `None`; the decoder renders them through [`special_name`] instead.
static CODE_CHARS: LazyLock<[Option<char>; 72]> = LazyLock::new(|| {
    let mut table = [None; 72];
    for (&c, &code) in CHAR_CODES.iter() {
        table[code as usize] = Some(c);
    }
    table
});

/// Look up the code for a single character.
///
/// Letters are folded to uppercase before lookup. Unrecognized characters
/// degrade to [`BLANK`].
pub fn code_of_char(c: char) -> CharacterCode {
    CHAR_CODES
        .get(&c.to_ascii_uppercase())
        .copied()
        .unwrap_or(BLANK)
}

/// Look up the code for a source-text token.
///
/// A reserved word (see [`is_special_token`]) maps to its tile code; a
/// single-character token maps through [`code_of_char`]. Anything else —
/// including multi-character words, which the encoder spells out one
/// character at a time — degrades to [`BLANK`].
pub fn code_of_token(token: &str) -> CharacterCode {
    if let Some(&(_, code)) = SPECIAL_TOKENS.iter().find(|(name, _)| *name == token) {
        return code;
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => code_of_char(c),
        _ => BLANK,
    }
}

/// True if `word` is one of the reserved tokens that encode to a single
/// non-letter tile (colored blocks, degree sign, filled).
pub fn is_special_token(word: &str) -> bool {
    SPECIAL_TOKENS.iter().any(|(name, _)| *name == word)
}

/// Printable character for a code, if the code has one.
pub fn char_of(code: CharacterCode) -> Option<char> {
    CODE_CHARS.get(code as usize).copied().flatten()
}

/// Reserved-token name for a code, if the code belongs to a special tile.
pub fn special_name(code: CharacterCode) -> Option<&'static str> {
    SPECIAL_TOKENS
        .iter()
        .find(|&&(_, c)| c == code)
        .map(|&(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_one_through_twenty_six() {
        assert_eq!(code_of_char('A'), 1);
        assert_eq!(code_of_char('Z'), 26);
        assert_eq!(code_of_char('a'), 1, "lowercase should fold to uppercase");
        assert_eq!(code_of_char('m'), 13);
    }

    #[test]
    fn digits_map_with_zero_last() {
        assert_eq!(code_of_char('1'), 27);
        assert_eq!(code_of_char('9'), 35);
        assert_eq!(code_of_char('0'), 36);
    }

    #[test]
    fn punctuation_matches_firmware_assignments() {
        assert_eq!(code_of_char('!'), 37);
        assert_eq!(code_of_char('-'), 44);
        assert_eq!(code_of_char('?'), 60);
        assert_eq!(code_of_char('°'), 62);
    }

    #[test]
    fn unknown_input_degrades_to_blank() {
        assert_eq!(code_of_char('~'), BLANK);
        assert_eq!(code_of_char('é'), BLANK);
        assert_eq!(code_of_token("notAToken"), BLANK);
        assert_eq!(code_of_token(""), BLANK);
    }

    #[test]
    fn special_tokens_resolve_to_single_codes() {
        assert_eq!(code_of_token("degreeSign"), 62);
        assert_eq!(code_of_token("redBlock"), 63);
        assert_eq!(code_of_token("blackBlock"), 70);
        assert_eq!(code_of_token("filled"), 71);
        assert!(is_special_token("violetBlock"));
        assert!(!is_special_token("VIOLETBLOCK"), "reserved words are case-sensitive");
        assert!(!is_special_token("return"));
        assert!(!is_special_token("HELLO"));
    }

    #[test]
    fn all_codes_stay_in_firmware_range() {
        for c in ' '..='~' {
            assert!(code_of_char(c) <= CODE_MAX, "char {:?} out of range", c);
        }
        for (name, code) in SPECIAL_TOKENS {
            assert!(*code <= CODE_MAX, "token {} out of range", name);
        }
    }

    #[test]
    fn reverse_lookup_round_trips_printables() {
        for c in ['A', 'Q', 'Z', '0', '7', '!', '.', ' '] {
            let code = code_of_char(c);
            assert_eq!(char_of(code), Some(c));
        }
    }

    #[test]
    fn special_names_round_trip() {
        assert_eq!(special_name(63), Some("redBlock"));
        assert_eq!(special_name(71), Some("filled"));
        assert_eq!(special_name(1), None);
        assert_eq!(special_name(200), None);
    }

    #[test]
    fn unassigned_codes_have_no_rendering() {
        for code in [43u8, 45, 51, 57, 58, 61] {
            assert_eq!(char_of(code), None);
            assert_eq!(special_name(code), None);
        }
    }
}
