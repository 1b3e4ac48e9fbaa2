//! # Board Layout Codec
//!
//! Converts between free-form text and the fixed 6×22 matrix of character
//! codes the split-flap display renders. This is the only module that knows
//! the board geometry; everything transport-side treats a [`Grid`] as an
//! opaque frame.
//!
//! ## Encoding Model
//!
//! Source text is split on single spaces into tokens and folded left to
//! right into a flat sequence of codes:
//! - a reserved special token (colored tile, degree sign) emits exactly one
//!   code, regardless of its spelled length
//! - the `return` control token pads with blanks to the next row boundary
//! - an empty token (from consecutive spaces) emits one blank
//! - an ordinary word emits one code per character, plus one separator
//!   blank unless the *next* token is a special token
//!
//! The flat sequence is then right-padded or silently truncated to 132
//! codes and reshaped row-major into 6 rows of 22. Truncation is not an
//! error: the device has fixed capacity and overflow is simply dropped.
//!
//! Encoding is total and pure — arbitrary input always yields a full grid,
//! with unknown characters degraded to blank tiles by the
//! [`charset`](crate::charset) table.

use crate::charset::{self, CharacterCode, BLANK};
use serde::{Deserialize, Serialize};

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of tiles per row.
pub const COLUMNS: usize = 22;

/// Total tile count (`ROWS * COLUMNS`).
pub const CELLS: usize = ROWS * COLUMNS;

/// One board row: exactly 22 character codes.
pub type Line = [CharacterCode; COLUMNS];

/// A full display frame: 6 rows of 22 character codes, row-major.
///
/// The invariant is structural — a `Grid` is always exactly 6×22, so no
/// sparse or partial frame can escape the codec. Serializes as the nested
/// `[[u8; 22]; 6]` array the wire contracts expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid([Line; ROWS]);

impl Grid {
    /// An all-blank frame.
    pub const fn blank() -> Self {
        Grid([[BLANK; COLUMNS]; ROWS])
    }

    /// A frame with every tile set to `code`.
    pub const fn filled(code: CharacterCode) -> Self {
        Grid([[code; COLUMNS]; ROWS])
    }

    /// Build a grid from explicit rows.
    pub const fn from_rows(rows: [Line; ROWS]) -> Self {
        Grid(rows)
    }

    /// Reshape a flat code sequence into a grid, right-padding with blanks
    /// past the end and ignoring anything beyond 132 codes.
    pub fn from_flat(codes: &[CharacterCode]) -> Self {
        let mut grid = Grid::blank();
        for (i, &code) in codes.iter().take(CELLS).enumerate() {
            grid.0[i / COLUMNS][i % COLUMNS] = code;
        }
        grid
    }

    /// The rows of the frame.
    pub fn rows(&self) -> &[Line; ROWS] {
        &self.0
    }

    /// Code at `(row, col)`. Panics if out of bounds, like slice indexing.
    pub fn get(&self, row: usize, col: usize) -> CharacterCode {
        self.0[row][col]
    }

    /// Iterate all 132 codes in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CharacterCode> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::blank()
    }
}

impl From<[Line; ROWS]> for Grid {
    fn from(rows: [Line; ROWS]) -> Self {
        Grid(rows)
    }
}

/// Blanks needed to advance a cell count to the next row boundary.
///
/// Returns 0 when `n` already sits on a boundary, so a `return` token at
/// the start of a row emits nothing.
fn pad_to_row_boundary(n: usize) -> usize {
    let remaining = COLUMNS - n % COLUMNS;
    if remaining < COLUMNS {
        remaining
    } else {
        0
    }
}

/// Encode free-form text into a display frame.
///
/// Total function: never fails on any input. See the module docs for the
/// token rules. The output is always exactly 6×22 with every code in the
/// firmware range.
///
/// # Example
/// ```
/// use vestaboard_client::layout::encode;
///
/// let grid = encode("AB return CD");
/// assert_eq!(grid.get(0, 0), 1); // A
/// assert_eq!(grid.get(0, 1), 2); // B
/// assert_eq!(grid.get(1, 0), 3); // C, wrapped to row 1 by "return"
/// assert_eq!(grid.get(1, 1), 4); // D
/// ```
pub fn encode(text: &str) -> Grid {
    let tokens: Vec<&str> = text.split(' ').collect();
    let mut codes: Vec<CharacterCode> = Vec::with_capacity(CELLS);

    for (i, token) in tokens.iter().enumerate() {
        match *token {
            t if charset::is_special_token(t) => codes.push(charset::code_of_token(t)),
            "" => codes.push(BLANK),
            "return" => {
                let pad = pad_to_row_boundary(codes.len());
                codes.extend(std::iter::repeat(BLANK).take(pad));
            }
            word => {
                codes.extend(word.chars().map(charset::code_of_char));
                let next_is_special = tokens
                    .get(i + 1)
                    .is_some_and(|next| charset::is_special_token(next));
                if !next_is_special {
                    codes.push(BLANK);
                }
            }
        }
    }

    Grid::from_flat(&codes)
}

/// Render a frame back to text, best effort.
///
/// The left inverse of [`encode`] for the printable-character subset:
/// printable codes become their character, special tiles become the
/// reserved token name in braces (multiple source spellings are not
/// distinguishable post-encoding), and unassigned codes become spaces.
/// Rows are joined with newlines and trailing blanks are trimmed.
///
/// Diagnostics and echo only — padding and truncation are not inverted,
/// and the output is never fed back into an authoritative data path.
pub fn to_text(grid: &Grid) -> String {
    let lines: Vec<String> = grid
        .rows()
        .iter()
        .map(|row| {
            let mut line = String::with_capacity(COLUMNS);
            for &code in row.iter() {
                if let Some(c) = charset::char_of(code) {
                    line.push(c);
                } else if let Some(name) = charset::special_name(code) {
                    line.push('{');
                    line.push_str(name);
                    line.push('}');
                } else {
                    line.push(' ');
                }
            }
            line.trim_end().to_string()
        })
        .collect();

    lines.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CODE_MAX;

    /// Flatten a grid for positional assertions.
    fn flat(grid: &Grid) -> Vec<CharacterCode> {
        grid.cells().collect()
    }

    #[test]
    fn output_is_always_six_by_twenty_two_in_range() {
        for text in ["", "HELLO WORLD", "a!@#$%^&*()", "redBlock", &"X".repeat(500)] {
            let grid = encode(text);
            assert_eq!(grid.rows().len(), ROWS);
            for row in grid.rows() {
                assert_eq!(row.len(), COLUMNS);
            }
            assert!(
                grid.cells().all(|code| code <= CODE_MAX),
                "code out of firmware range for input {:?}",
                text
            );
        }
    }

    #[test]
    fn empty_input_yields_all_blank_grid() {
        // A single empty token still emits one blank, which is
        // indistinguishable from padding.
        assert_eq!(encode(""), Grid::blank());
    }

    #[test]
    fn encoding_is_pure() {
        let text = "TIDE 4.2 FT degreeSign return LOW 11:30";
        assert_eq!(encode(text), encode(text));
    }

    #[test]
    fn simple_word_spells_out_with_separator() {
        let grid = encode("HI THERE");
        let codes = flat(&grid);
        // H=8 I=9, blank, T=20 H=8 E=5 R=18 E=5, blank
        assert_eq!(&codes[..10], &[8, 9, 0, 20, 8, 5, 18, 5, 0, 0]);
    }

    #[test]
    fn long_input_truncates_to_prefix() {
        let long = "A".repeat(200);
        let prefix = "A".repeat(132);
        assert_eq!(
            encode(&long),
            encode(&prefix),
            "surplus past 132 cells must be silently dropped"
        );
        // Every cell occupied, nothing padded.
        assert!(encode(&long).cells().all(|code| code == 1));
    }

    #[test]
    fn exactly_full_message_neither_pads_nor_truncates() {
        let full = "B".repeat(132);
        let grid = encode(&full);
        assert!(grid.cells().all(|code| code == 2));
    }

    #[test]
    fn special_token_occupies_one_cell() {
        let grid = encode("redBlock");
        let non_blank: Vec<_> = flat(&grid).into_iter().filter(|&c| c != BLANK).collect();
        assert_eq!(non_blank, vec![63], "one token, one tile");
    }

    #[test]
    fn adjacent_special_tokens_get_no_separators() {
        let grid = encode("redBlock greenBlock blueBlock");
        let codes = flat(&grid);
        assert_eq!(&codes[..3], &[63, 66, 67]);
        assert!(codes[3..].iter().all(|&c| c == BLANK));
    }

    #[test]
    fn word_before_special_token_suppresses_separator() {
        let grid = encode("72 degreeSign");
        let codes = flat(&grid);
        // 7=33 2=28, then the degree tile directly — no separator blank.
        assert_eq!(&codes[..3], &[33, 28, 62]);
    }

    #[test]
    fn word_before_ordinary_word_keeps_separator() {
        let grid = encode("72 F");
        let codes = flat(&grid);
        assert_eq!(&codes[..4], &[33, 28, 0, 6]);
    }

    #[test]
    fn return_token_advances_to_next_row() {
        let grid = encode("AB return CD");
        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.get(0, 1), 2);
        // Separator blank after "AB", then padding to the row boundary.
        for col in 2..COLUMNS {
            assert_eq!(grid.get(0, col), BLANK, "row 0 col {} should be blank", col);
        }
        assert_eq!(grid.get(1, 0), 3);
        assert_eq!(grid.get(1, 1), 4);
    }

    #[test]
    fn return_at_row_boundary_emits_nothing() {
        // 21 chars + separator = 22 cells, exactly one row.
        let row = "C".repeat(21);
        let grid = encode(&format!("{} return DD", row));
        assert_eq!(grid.get(0, COLUMNS - 1), BLANK);
        assert_eq!(grid.get(1, 0), 4);
    }

    #[test]
    fn consecutive_spaces_each_consume_one_cell() {
        // "A", "", "", "B" -> A, separator, blank, blank, B
        let grid = encode("A   B");
        let codes = flat(&grid);
        assert_eq!(&codes[..5], &[1, 0, 0, 0, 2]);
    }

    #[test]
    fn unknown_characters_degrade_to_blank_without_aborting() {
        let grid = encode("A~Z");
        let codes = flat(&grid);
        assert_eq!(&codes[..4], &[1, 0, 26, 0]);
    }

    #[test]
    fn pad_arithmetic_is_pure_and_boundary_aware() {
        assert_eq!(pad_to_row_boundary(0), 0);
        assert_eq!(pad_to_row_boundary(1), 21);
        assert_eq!(pad_to_row_boundary(21), 1);
        assert_eq!(pad_to_row_boundary(22), 0);
        assert_eq!(pad_to_row_boundary(45), 21);
        assert_eq!(pad_to_row_boundary(132), 0);
    }

    #[test]
    fn from_flat_pads_and_truncates() {
        let short = [5u8; 10];
        let grid = Grid::from_flat(&short);
        assert_eq!(grid.get(0, 9), 5);
        assert_eq!(grid.get(0, 10), BLANK);

        let long = [7u8; 200];
        let grid = Grid::from_flat(&long);
        assert!(grid.cells().all(|code| code == 7));
    }

    #[test]
    fn filled_grid_sets_every_cell() {
        let grid = Grid::filled(70);
        assert!(grid.cells().all(|code| code == 70));
    }

    #[test]
    fn grid_serializes_as_nested_arrays() {
        let json = serde_json::to_string(&Grid::blank()).unwrap();
        let expected_row = format!("[{}]", vec!["0"; COLUMNS].join(","));
        assert_eq!(json, format!("[{}]", vec![expected_row; ROWS].join(",")));

        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Grid::blank());
    }

    #[test]
    fn decode_round_trips_printable_text() {
        let grid = encode("HIGH TIDE 3:45 PM");
        assert_eq!(to_text(&grid), "HIGH TIDE 3:45 PM");
    }

    #[test]
    fn decode_renders_special_tiles_as_placeholders() {
        let grid = encode("redBlock OK");
        assert_eq!(to_text(&grid), "{redBlock}OK");
    }

    #[test]
    fn decode_joins_rows_with_newlines() {
        let grid = encode("UP return DOWN");
        assert_eq!(to_text(&grid), "UP\nDOWN");
    }
}
