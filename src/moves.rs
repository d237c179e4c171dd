use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

use crate::error::MoveError;

static MOVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-h])([1-8])([a-h])([1-8])$").expect("move pattern is a valid regex"));

/// A file/rank pair. Both halves are signed so offsets may step off the board;
/// check `is_on_board` before using one to index a `Board`.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Hash)]
pub struct Coord {
    pub file: i8,
    pub rank: i8,
}

impl Coord {
    pub const fn new(file: i8, rank: i8) -> Coord {
        Coord { file, rank }
    }

    pub const fn is_on_board(&self) -> bool {
        self.file >= 0 && self.file < 8 && self.rank >= 0 && self.rank < 8
    }

    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Coord {
        Coord {
            file: self.file + file_delta,
            rank: self.rank + rank_delta,
        }
    }

    pub fn from_algebraic(text: &str) -> Result<Coord, String> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("Expected a square like 'e4' but got '{text}'"));
        }

        match (bytes[0], bytes[1]) {
            (file @ b'a'..=b'h', rank @ b'1'..=b'8') => Ok(Coord::new((file - b'a') as i8, (rank - b'1') as i8)),
            _ => Err(format!("Square '{text}' is not on the board")),
        }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_on_board() {
            write!(f, "{}{}", (b'a' + self.file as u8) as char, self.rank + 1)
        } else {
            write!(f, "({}, {})", self.file, self.rank)
        }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub const fn new(from: Coord, to: Coord) -> Move {
        Move { from, to }
    }

    /// Parses text like `e2e4`. Anything that is not exactly two on-board squares is rejected.
    pub fn from_simple_long_algebraic_notation(text: &str) -> Result<Move, MoveError> {
        let Some(captures) = MOVE_PATTERN.captures(text) else {
            return Err(MoveError::MalformedInput);
        };

        let coord = |file: usize, rank: usize| {
            Coord::new(
                (captures[file].as_bytes()[0] - b'a') as i8,
                (captures[rank].as_bytes()[0] - b'1') as i8,
            )
        };

        Ok(Move::new(coord(1, 2), coord(3, 4)))
    }

    pub const fn file_delta(&self) -> i8 {
        self.to.file - self.from.file
    }

    pub const fn rank_delta(&self) -> i8 {
        self.to.rank - self.from.rank
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
