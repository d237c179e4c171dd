use std::fmt::Display;

use log::{debug, info, trace};
use tinyvec::TinyVec;

use crate::{
    board::{Board, Square},
    error::MoveError,
    moves::{Coord, Move},
};

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Rank delta of a forward step.
    pub const fn direction(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    pub const fn home_rank(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    pub const fn promotion_rank(self) -> i8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    /// Rank a pawn of this side lands on when capturing en passant.
    pub const fn en_passant_capture_rank(self) -> i8 {
        match self {
            Side::White => 5,
            Side::Black => 2,
        }
    }

    pub const fn pawn(self) -> Square {
        match self {
            Side::White => Square::White,
            Side::Black => Square::Black,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Stalemate,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::WhiteWins => write!(f, "White Wins!"),
            Outcome::BlackWins => write!(f, "Black Wins!"),
            Outcome::Stalemate => write!(f, "Stalemate!"),
        }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum GameStatus {
    InProgress(Side),
    Finished(Outcome),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Game {
    board: Board,
    side_to_move: Side,
    /// File of a pawn that just advanced two squares. Only valid for the next half-move.
    en_passant_file: Option<i8>,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new() -> Game {
        Game {
            board: Board::default(),
            side_to_move: Side::White,
            en_passant_file: None,
            outcome: None,
        }
    }

    /// Reads `<placement> <w|b> <en passant target>`, e.g. `8/8/3p4/4P3/8/8/8/8 w d6`.
    pub fn from_position(position: &str) -> Result<Game, String> {
        let parts: Vec<&str> = position.split(' ').collect();
        if parts.len() != 3 {
            return Err(format!(
                "Expected position to have 3 space-delimited parts but it had {}",
                parts.len()
            ));
        }

        let board = Board::from_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(format!("Encountered unexpected side to move value '{other}'")),
        };

        let en_passant_file = if parts[2] == "-" {
            None
        } else {
            let target = Coord::from_algebraic(parts[2])?;
            if target.rank != side_to_move.en_passant_capture_rank() {
                return Err(format!(
                    "En passant target square '{}' is not capturable by {side_to_move}",
                    parts[2]
                ));
            }
            Some(target.file)
        };

        Ok(Game {
            board,
            side_to_move,
            en_passant_file,
            outcome: None,
        })
    }

    pub fn to_position(&self) -> String {
        let side = match self.side_to_move {
            Side::White => 'w',
            Side::Black => 'b',
        };
        let en_passant = match self.en_passant_file() {
            Some(file) => Coord::new(file, self.side_to_move.en_passant_capture_rank()).to_string(),
            None => String::from("-"),
        };

        format!("{} {side} {en_passant}", self.board.to_placement())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn en_passant_file(&self) -> Option<i8> {
        self.en_passant_file
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn status(&self) -> GameStatus {
        match self.outcome {
            Some(outcome) => GameStatus::Finished(outcome),
            None => GameStatus::InProgress(self.side_to_move),
        }
    }

    pub fn has_pawn_at(&self, coord: Coord) -> bool {
        coord.is_on_board() && self.board.get(coord) == self.side_to_move.pawn()
    }

    /// Whether `m` is a pawn move the side to move may make. Defined for any coordinates:
    /// anything off the board is simply not legal.
    pub fn is_legal_move(&self, m: Move) -> bool {
        if !m.from.is_on_board() || !m.to.is_on_board() || !self.has_pawn_at(m.from) {
            return false;
        }

        let side = self.side_to_move;
        let steps = m.rank_delta() * side.direction();
        let target = self.board.get(m.to);

        let legal = match (m.file_delta().abs(), steps) {
            (0, 1) => target == Square::Empty,
            (0, 2) => target == Square::Empty && m.from.rank == side.home_rank(),
            (1, 1) => target == side.opponent().pawn() || self.is_en_passant_capture(m),
            _ => false,
        };

        trace!("{m} for {side} is legal: {legal}");
        legal
    }

    /// Whether `m` is a diagonal step onto the square a pawn skipped on the previous half-move.
    pub fn is_en_passant_capture(&self, m: Move) -> bool {
        let side = self.side_to_move;
        let Some(file) = self.en_passant_file else {
            return false;
        };

        m.to.is_on_board()
            && m.file_delta().abs() == 1
            && m.rank_delta() == side.direction()
            && m.to.file == file
            && m.to.rank == side.en_passant_capture_rank()
            && self.board.get(m.to) == Square::Empty
    }

    /// Moves the pawn and hands the turn over. `m` must have passed `is_legal_move`.
    pub fn apply_move(&mut self, m: Move) {
        debug_assert!(self.is_legal_move(m), "apply_move called with illegal move {m}");

        let side = self.side_to_move;
        let en_passant = self.is_en_passant_capture(m);

        self.board.clear(m.from);
        self.board.set(m.to, side.pawn());

        if en_passant {
            // The captured pawn sits beside the origin, not on the destination
            self.board.clear(Coord::new(m.to.file, m.from.rank));
        }

        let double_step = m.file_delta() == 0 && m.rank_delta() * side.direction() == 2;
        self.en_passant_file = if double_step { Some(m.from.file) } else { None };

        self.side_to_move = side.opponent();

        debug!(
            "{side} played {m}{}. Position: {}",
            if en_passant { " en passant" } else { "" },
            self.to_position()
        );
    }

    /// Looks for a terminal state on the current board and records it.
    /// Both sides' wins are checked before stalemate.
    pub fn evaluate_end(&mut self) -> GameStatus {
        if self.outcome.is_some() {
            return self.status();
        }

        let white_wins = self.board.has_color_on_rank(Side::White.promotion_rank() as usize, Square::White)
            || !self.board.has_any_of_color(Square::Black);
        let black_wins = self.board.has_color_on_rank(Side::Black.promotion_rank() as usize, Square::Black)
            || !self.board.has_any_of_color(Square::White);

        self.outcome = if white_wins {
            Some(Outcome::WhiteWins)
        } else if black_wins {
            Some(Outcome::BlackWins)
        } else if !self.has_single_step() {
            Some(Outcome::Stalemate)
        } else {
            None
        };

        if let Some(outcome) = self.outcome {
            info!("Game over: {outcome:?}. Position: {}", self.to_position());
        }

        self.status()
    }

    /// Whether any pawn of the side to move can step forward or capture one square diagonally.
    fn has_single_step(&self) -> bool {
        let side = self.side_to_move;
        let forward = side.direction();

        self.board.squares_of_color(side.pawn()).any(|from| {
            [-1, 0, 1]
                .into_iter()
                .any(|file_delta| self.is_legal_move(Move::new(from, from.offset(file_delta, forward))))
        })
    }

    pub fn legal_moves(&self) -> TinyVec<[Move; 32]> {
        let mut moves = TinyVec::new();
        if self.outcome.is_some() {
            return moves;
        }

        let side = self.side_to_move;
        let forward = side.direction();

        for from in self.board.squares_of_color(side.pawn()) {
            let candidates = [
                from.offset(0, forward),
                from.offset(0, forward * 2),
                from.offset(-1, forward),
                from.offset(1, forward),
            ];

            for to in candidates {
                let m = Move::new(from, to);
                if self.is_legal_move(m) {
                    moves.push(m);
                }
            }
        }

        moves
    }

    /// Checks, applies and evaluates one move request as a single step.
    pub fn try_move(&mut self, m: Move) -> Result<GameStatus, MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameFinished);
        }

        if !self.has_pawn_at(m.from) {
            return Err(MoveError::NoPawnAt {
                side: self.side_to_move,
                square: m.from,
            });
        }

        if m.from == m.to || !self.is_legal_move(m) {
            return Err(MoveError::IllegalMove);
        }

        self.apply_move(m);
        Ok(self.evaluate_end())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("side_to_move", &self.side_to_move)
            .field("en_passant_file", &self.en_passant_file)
            .field("outcome", &self.outcome)
            .field("board", &self.board)
            .finish()
    }
}

#[cfg(test)]
mod game_tests {
    use super::*;

    const STARTING_POSITION: &str = "8/pppppppp/8/8/8/8/PPPPPPPP/8 w -";

    fn sq(s: &str) -> Coord {
        Coord::from_algebraic(s).unwrap()
    }

    fn mv(s: &str) -> Move {
        Move::from_simple_long_algebraic_notation(s).unwrap()
    }

    fn play(game: &mut Game, moves: &[&str]) {
        for m in moves {
            game.try_move(mv(m)).unwrap();
        }
    }

    #[test]
    pub fn starting_position_round_trips() {
        let game = Game::new();

        assert_eq!(STARTING_POSITION, game.to_position());
        assert_eq!(game, Game::from_position(STARTING_POSITION).unwrap());
        assert_eq!(GameStatus::InProgress(Side::White), game.status());
    }

    #[test]
    pub fn double_step_sets_en_passant_file() {
        let mut game = Game::new();

        play(&mut game, &["e2e4"]);
        assert_eq!(Square::White, game.board().get(sq("e4")));
        assert_eq!(Square::Empty, game.board().get(sq("e2")));
        assert_eq!(Some(4), game.en_passant_file());
        assert_eq!(Side::Black, game.side_to_move());

        play(&mut game, &["d7d5"]);
        assert_eq!(Some(3), game.en_passant_file());
        assert_eq!(Side::White, game.side_to_move());

        play(&mut game, &["e4e5"]);
        assert_eq!(None, game.en_passant_file());
    }

    #[test]
    pub fn full_en_passant_capture() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);

        let capture = mv("e5d6");
        assert!(game.is_en_passant_capture(capture));
        assert_eq!(Ok(GameStatus::InProgress(Side::Black)), game.try_move(capture));

        assert_eq!(Square::White, game.board().get(sq("d6")));
        assert_eq!(Square::Empty, game.board().get(sq("d5")));
        assert_eq!(Square::Empty, game.board().get(sq("e5")));
        assert_eq!(None, game.en_passant_file());
    }

    #[test]
    pub fn en_passant_expires_after_one_half_move() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert!(game.is_legal_move(mv("e5d6")));

        play(&mut game, &["h2h3", "a6a5"]);
        assert!(!game.is_legal_move(mv("e5d6")));
        assert_eq!(Err(MoveError::IllegalMove), game.try_move(mv("e5d6")));
    }

    #[test]
    pub fn en_passant_not_available_before_the_double_step() {
        let game = Game::from_position("8/3p4/8/4P3/8/8/8/8 w -").unwrap();
        assert!(!game.is_legal_move(mv("e5d6")));

        // A single step onto the fifth rank does not count
        let mut game = Game::from_position("8/8/3p4/4P3/8/8/8/7P b -").unwrap();
        play(&mut game, &["d6d5"]);
        assert!(!game.is_legal_move(mv("e5d6")));
    }

    #[test]
    pub fn black_captures_en_passant() {
        let mut game = Game::from_position("8/8/8/8/5p2/8/4P3/8 w -").unwrap();
        play(&mut game, &["e2e4"]);

        // Taking white's only pawn also ends the game
        assert_eq!(Ok(GameStatus::Finished(Outcome::BlackWins)), game.try_move(mv("f4e3")));
        assert_eq!(Square::Black, game.board().get(sq("e3")));
        assert_eq!(Square::Empty, game.board().get(sq("e4")));
        assert_eq!(Square::Empty, game.board().get(sq("f4")));
    }

    #[test]
    pub fn straight_moves() {
        let game = Game::from_position("8/8/8/8/3p4/8/3P3P/8 w -").unwrap();

        assert!(game.is_legal_move(mv("d2d3")));
        assert!(!game.is_legal_move(mv("d2d4")));
        assert!(game.is_legal_move(mv("h2h3")));
        assert!(game.is_legal_move(mv("h2h4")));
        assert!(!game.is_legal_move(mv("h2h5")));
        assert!(!game.is_legal_move(mv("h2h1")));
        assert!(!game.is_legal_move(mv("h2h2")));
    }

    #[test]
    pub fn double_step_only_from_home_rank() {
        let game = Game::from_position("8/8/8/8/8/3P4/8/8 w -").unwrap();
        assert!(game.is_legal_move(mv("d3d4")));
        assert!(!game.is_legal_move(mv("d3d5")));

        let game = Game::from_position("8/3p4/8/8/8/8/8/8 b -").unwrap();
        assert!(game.is_legal_move(mv("d7d5")));
        assert!(!game.is_legal_move(mv("d7d8")));
    }

    #[test]
    pub fn diagonal_moves_need_an_opponent() {
        let game = Game::from_position("8/8/8/8/2pP4/3p4/8/8 b -").unwrap();

        assert!(!game.is_legal_move(mv("c4b3")));
        assert!(!game.is_legal_move(mv("c4d3")));
        assert!(!game.is_legal_move(mv("c4e2")));

        let game = Game::from_position("8/8/8/8/8/2p1p3/3P4/8 w -").unwrap();
        assert!(game.is_legal_move(mv("d2c3")));
        assert!(game.is_legal_move(mv("d2e3")));
        assert!(!game.is_legal_move(mv("d2f4")));
    }

    #[test]
    pub fn off_board_destinations_are_never_legal() {
        let game = Game::from_position("8/8/8/8/8/8/P6P/8 w -").unwrap();
        let a2 = sq("a2");
        let h2 = sq("h2");

        for file_delta in -3..=3 {
            for rank_delta in -3..=3 {
                for from in [a2, h2] {
                    let to = from.offset(file_delta, rank_delta);
                    if !to.is_on_board() {
                        assert!(!game.is_legal_move(Move::new(from, to)), "{from} to {to}");
                    }
                }
            }
        }

        assert!(!game.is_legal_move(Move::new(Coord::new(-1, 1), Coord::new(-1, 2))));
    }

    #[test]
    pub fn apply_move_always_toggles_side() {
        let mut game = Game::from_position("8/8/8/3pP3/8/8/2p5/1P6 w d6").unwrap();

        game.apply_move(mv("e5d6"));
        assert_eq!(Side::Black, game.side_to_move());

        game.apply_move(mv("c2b1"));
        assert_eq!(Side::White, game.side_to_move());

        let mut game = Game::new();
        game.apply_move(mv("a2a3"));
        assert_eq!(Side::Black, game.side_to_move());
    }

    #[test]
    pub fn reports_missing_pawn_before_same_square() {
        let mut game = Game::new();

        assert_eq!(
            Err(MoveError::NoPawnAt {
                side: Side::White,
                square: sq("b3")
            }),
            game.try_move(mv("b3b3"))
        );
        assert_eq!(
            Err(MoveError::NoPawnAt {
                side: Side::White,
                square: sq("a7")
            }),
            game.try_move(mv("a7a6"))
        );
        assert_eq!(Err(MoveError::IllegalMove), game.try_move(mv("b2b2")));
        assert_eq!(Err(MoveError::IllegalMove), game.try_move(mv("b2b5")));
        assert_eq!(Side::White, game.side_to_move());
    }

    #[test]
    pub fn white_wins_on_last_rank_with_no_black_pawns() {
        let mut game = Game::from_position("P7/8/8/8/8/8/8/8 b -").unwrap();
        assert_eq!(GameStatus::Finished(Outcome::WhiteWins), game.evaluate_end());
    }

    #[test]
    pub fn black_wins_by_reaching_first_rank() {
        let mut game = Game::from_position("8/8/8/8/8/8/1p4P1/8 b -").unwrap();
        assert_eq!(Ok(GameStatus::Finished(Outcome::BlackWins)), game.try_move(mv("b2b1")));
        assert_eq!(Some(Outcome::BlackWins), game.outcome());
    }

    #[test]
    pub fn capturing_the_last_pawn_wins() {
        let mut game = Game::from_position("8/8/8/8/4p3/3P4/8/8 w -").unwrap();
        assert_eq!(Ok(GameStatus::Finished(Outcome::WhiteWins)), game.try_move(mv("d3e4")));
    }

    #[test]
    pub fn blocked_pawn_is_stalemate() {
        let mut game = Game::from_position("8/8/8/4p3/8/8/8/8 w -").unwrap();
        assert_eq!(GameStatus::InProgress(Side::White), game.status());

        let mut game = Game::from_position("8/8/8/4p3/4P3/8/8/8 w -").unwrap();
        assert_eq!(GameStatus::Finished(Outcome::Stalemate), game.evaluate_end());
        assert_eq!(Err(MoveError::GameFinished), game.try_move(mv("e4e5")));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    pub fn stalemate_reached_by_a_move() {
        let mut game = Game::from_position("8/8/8/4p3/8/4P3/8/8 w -").unwrap();
        assert_eq!(Ok(GameStatus::Finished(Outcome::Stalemate)), game.try_move(mv("e3e4")));
    }

    #[test]
    pub fn edge_pawn_stalemate_scan_stays_on_board() {
        let mut game = Game::from_position("8/8/8/p6p/P6P/8/8/8 w -").unwrap();
        assert_eq!(GameStatus::Finished(Outcome::Stalemate), game.evaluate_end());
    }

    #[test]
    pub fn win_beats_stalemate_of_the_other_side() {
        // After g7g8 black's only pawn is blocked, but white has arrived
        let mut game = Game::from_position("8/6P1/8/7p/7P/8/8/8 w -").unwrap();
        assert_eq!(Ok(GameStatus::Finished(Outcome::WhiteWins)), game.try_move(mv("g7g8")));
    }

    #[test]
    pub fn promotion_and_annihilation_together() {
        let mut game = Game::from_position("P7/8/8/8/8/8/8/8 b -").unwrap();
        assert_eq!(GameStatus::Finished(Outcome::WhiteWins), game.evaluate_end());

        let mut game = Game::from_position("8/8/8/8/8/8/8/p7 w -").unwrap();
        assert_eq!(GameStatus::Finished(Outcome::BlackWins), game.evaluate_end());
    }

    #[test]
    pub fn legal_moves_from_start() {
        let moves = Game::new().legal_moves();

        assert_eq!(16, moves.len());
        assert!(moves.contains(&mv("a2a4")));
        assert!(moves.contains(&mv("h2h3")));
    }

    #[test]
    pub fn legal_moves_include_en_passant() {
        let game = Game::from_position("8/8/8/3pP3/8/8/8/8 w d6").unwrap();
        let moves = game.legal_moves();

        assert_eq!(2, moves.len());
        assert!(moves.contains(&mv("e5e6")));
        assert!(moves.contains(&mv("e5d6")));
    }

    #[test]
    pub fn position_errors() {
        assert!(Game::from_position("8/8/8/8/8/8/8/8 w").is_err());
        assert!(Game::from_position("8/8/8/8/8/8/8/8 x -").is_err());
        assert!(Game::from_position("8/8/8/8/8/8/8/8 w d3").is_err());
        assert!(Game::from_position("8/8/8/8/8/8/8/8 b d6").is_err());
        assert_eq!(
            "8/8/8/8/8/8/8/8 b d3",
            Game::from_position("8/8/8/8/8/8/8/8 b d3").unwrap().to_position()
        );
    }
}
