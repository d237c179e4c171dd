use std::fmt::{Debug, Write};

use log::error;

use crate::moves::Coord;

const BORDER: &str = "  +---+---+---+---+---+---+---+---+";
const FOOTER: &str = "    a   b   c   d   e   f   g   h";

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Hash)]
pub enum Square {
    #[default]
    Empty,
    White,
    Black,
}

impl Square {
    pub const fn to_char(self) -> char {
        match self {
            Square::Empty => ' ',
            Square::White => 'W',
            Square::Black => 'B',
        }
    }
}

const E: Square = Square::Empty;
const W: Square = Square::White;
const B: Square = Square::Black;

// Indexed [rank][file], rank 0 is the first rank
#[rustfmt::skip]
static STARTING_SQUARES: [[Square; 8]; 8] = [
    [E, E, E, E, E, E, E, E],
    [W, W, W, W, W, W, W, W],
    [E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E],
    [B, B, B, B, B, B, B, B],
    [E, E, E, E, E, E, E, E],
];

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Square; 8]; 8],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[Square::Empty; 8]; 8],
        }
    }

    /// Reads the piece placement part of a FEN restricted to pawns: `P` is white, `p` is black.
    pub fn from_placement(placement: &str) -> Result<Board, String> {
        if !placement.is_ascii() {
            return Err(String::from("Expected placement to only contain ASCII characters"));
        }

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(format!(
                "Expected placement to have 8 '/'-delimited ranks but it had {}",
                ranks.len()
            ));
        }

        let mut board = Board::empty();
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0;

            for c in rank_str.chars() {
                match c {
                    '1'..='8' => {
                        file += (c as u8 - b'0') as usize;
                    }
                    'P' | 'p' => {
                        if file >= 8 {
                            return Err(format!("Rank {} '{rank_str}' has more than 8 files", rank + 1));
                        }
                        board.squares[rank][file] = if c == 'P' { Square::White } else { Square::Black };
                        file += 1;
                    }
                    _ => {
                        return Err(format!(
                            "Encountered unexpected character {c} while processing rank {}",
                            rank + 1
                        ));
                    }
                }
            }

            if file != 8 {
                return Err(format!("Rank {} '{rank_str}' covers {file} files instead of 8", rank + 1));
            }
        }

        Ok(board)
    }

    pub fn to_placement(&self) -> String {
        let mut result = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for square in self.squares[rank] {
                let c = match square {
                    Square::Empty => {
                        empty_run += 1;
                        continue;
                    }
                    Square::White => 'P',
                    Square::Black => 'p',
                };

                if empty_run > 0 {
                    result.push((b'0' + empty_run) as char);
                    empty_run = 0;
                }
                result.push(c);
            }

            if empty_run > 0 {
                result.push((b'0' + empty_run) as char);
            }
            if rank > 0 {
                result.push('/');
            }
        }

        result
    }

    pub fn get(&self, coord: Coord) -> Square {
        let (rank, file) = Self::index(coord);
        self.squares[rank][file]
    }

    pub fn set(&mut self, coord: Coord, square: Square) {
        let (rank, file) = Self::index(coord);
        self.squares[rank][file] = square;
    }

    pub fn clear(&mut self, coord: Coord) {
        self.set(coord, Square::Empty);
    }

    pub fn has_color_on_rank(&self, rank: usize, color: Square) -> bool {
        self.squares[rank].contains(&color)
    }

    pub fn has_any_of_color(&self, color: Square) -> bool {
        self.squares.iter().any(|rank| rank.contains(&color))
    }

    /// Every occupied square holding `color`, rank by rank from the first.
    pub fn squares_of_color(&self, color: Square) -> impl Iterator<Item = Coord> + '_ {
        (0..8i8)
            .flat_map(|rank| (0..8i8).map(move |file| Coord::new(file, rank)))
            .filter(move |coord| self.get(*coord) == color)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "{BORDER}");
        for rank in (0..8).rev() {
            let _ = write!(out, "{} ", rank + 1);
            for square in self.squares[rank] {
                let _ = write!(out, "| {} ", square.to_char());
            }
            let _ = writeln!(out, "|");
            let _ = writeln!(out, "{BORDER}");
        }
        let _ = writeln!(out, "{FOOTER}");

        out
    }

    fn index(coord: Coord) -> (usize, usize) {
        if !coord.is_on_board() {
            error!("Board accessed at {coord} which is off the board");
            panic!("Board accessed off the board at file {} rank {}", coord.file, coord.rank);
        }

        (coord.rank as usize, coord.file as usize)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: STARTING_SQUARES,
        }
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("placement", &self.to_placement())
            .finish()?;

        writeln!(f, "\n{}", self.render())
    }
}
