use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{board::Square, game::Game};

impl Game {
    pub fn start_perft(&self, depth: u8) -> PerftStats {
        let mut stats = PerftStats::default();

        let start_time = Instant::now();
        do_perft(depth, self, &mut stats);
        let elapsed = start_time.elapsed();

        let nps = stats.nodes as f64 / elapsed.as_secs_f64();
        info!(
            "depth {depth} in {elapsed:#?}. Nodes: {}. Nodes per second: {}",
            stats.nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en)
        );
        info!("{:?}", stats);

        stats
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub eps: u64,
    /// Leaves where the game ended before reaching the requested depth count here too.
    pub finished_games: u64,
}

// Code referenced from https://www.chessprogramming.org/Perft
fn do_perft(depth: u8, game: &Game, stats: &mut PerftStats) {
    if game.outcome().is_some() {
        stats.finished_games += 1;
        stats.nodes += 1;
        return;
    }

    if depth == 0 {
        stats.nodes += 1;
        return;
    }

    for m in game.legal_moves() {
        if depth == 1 {
            if game.is_en_passant_capture(m) {
                stats.eps += 1;
                stats.captures += 1;
            } else if game.board().get(m.to) != Square::Empty {
                stats.captures += 1;
            }
        }

        let mut next = *game;
        next.apply_move(m);
        next.evaluate_end();
        do_perft(depth - 1, &next, stats);
    }
}
