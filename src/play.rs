use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::{
    game::{Game, GameStatus, Outcome, Side},
    moves::Move,
};

#[derive(Debug, Default, Clone)]
pub struct PlayerNames {
    pub white: Option<String>,
    pub black: Option<String>,
}

/// Console dialogue for one match. Returns the outcome, or `None` if the players left early.
pub fn run_match<R: BufRead, W: Write>(input: R, mut output: W, names: PlayerNames) -> io::Result<Option<Outcome>> {
    let mut lines = input.lines();

    writeln!(output, " Pawns-Only Chess")?;

    let white = match names.white {
        Some(name) => name,
        None => {
            writeln!(output, "First Player's name:")?;
            lines.next().transpose()?.unwrap_or_default()
        }
    };
    let black = match names.black {
        Some(name) => name,
        None => {
            writeln!(output, "Second Player's name:")?;
            lines.next().transpose()?.unwrap_or_default()
        }
    };
    info!("Starting match between {white} (white) and {black} (black)");

    let mut game = Game::new();
    write!(output, "{}", game.board().render())?;

    loop {
        let player = match game.side_to_move() {
            Side::White => &white,
            Side::Black => &black,
        };
        writeln!(output, "{player}'s turn:")?;

        let Some(line) = lines.next().transpose()? else {
            debug!("Input closed");
            writeln!(output, "Bye!")?;
            return Ok(None);
        };
        let line = line.trim();

        if line == "exit" {
            writeln!(output, "Bye!")?;
            return Ok(None);
        }

        let result = Move::from_simple_long_algebraic_notation(line).and_then(|m| game.try_move(m));
        match result {
            Ok(status) => {
                write!(output, "{}", game.board().render())?;

                if let GameStatus::Finished(outcome) = status {
                    writeln!(output, "{outcome}")?;
                    writeln!(output, "Bye!")?;
                    return Ok(Some(outcome));
                }
            }
            Err(err) => {
                debug!("Rejected '{line}' from {player}: {err:?}");
                writeln!(output, "{err}")?;
            }
        }
    }
}
