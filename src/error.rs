//! Reasons a move request can be turned away.

use std::fmt;

use crate::{game::Side, moves::Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Text is not two squares like `e2e4`.
    MalformedInput,
    /// The origin square does not hold a pawn of the side to move.
    NoPawnAt {
        side: Side,
        square: Coord,
    },
    /// Origin and destination are the same square, or pawns cannot move that way.
    IllegalMove,
    /// The game already has an outcome.
    GameFinished,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::MalformedInput | MoveError::IllegalMove => write!(f, "Invalid Input"),
            MoveError::NoPawnAt { side, square } => write!(f, "No {side} pawn at {square}"),
            MoveError::GameFinished => write!(f, "The game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}
