//! UCI driver: the thin collaborator that feeds the engine FEN strings
//! and `go` parameters and streams back info lines and the best move.

use std::io::{self, BufRead};
use std::str::FromStr;
use std::time::Duration;

use courier::board::tables::parse_square;
use courier::board::{Color, PieceKind, Position};
use courier::logger::init_logging;
use courier::moves::execute::make_move;
use courier::moves::movegen::generate_legal;
use courier::moves::perft::perft;
use courier::moves::types::{Move, MoveList};
use courier::search::search::{Score, SearchLimits, Searcher};

fn main() {
    init_logging("logs/courier.log", "info");

    let mut pos = Position::new();
    let mut searcher = Searcher::new();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "uci" => {
                println!("id name Courier {}", env!("CARGO_PKG_VERSION"));
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                pos = Position::new();
                searcher = Searcher::new();
            }
            "position" => {
                if let Some(new_pos) = handle_position(&parts) {
                    pos = new_pos;
                }
            }
            "go" => handle_go(&parts, &mut pos, &mut searcher),
            "fen" | "d" | "display" => println!("{}", pos.to_fen()),
            "perft" => {
                if let Some(depth) = parts.get(1).and_then(|s| s.parse().ok()) {
                    println!("{}", perft(&mut pos, depth));
                }
            }
            "quit" => break,
            _ => {}
        }
    }
}

fn handle_position(parts: &[&str]) -> Option<Position> {
    let mut pos = if parts.get(1) == Some(&"startpos") {
        Position::new()
    } else if parts.get(1) == Some(&"fen") {
        let fen_end = parts
            .iter()
            .position(|&p| p == "moves")
            .unwrap_or(parts.len());
        let fen = parts.get(2..fen_end)?.join(" ");
        match Position::from_str(&fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("info string rejected FEN: {err}");
                return None;
            }
        }
    } else {
        Position::new()
    };

    if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
        for move_str in &parts[moves_idx + 1..] {
            match parse_uci_move(&mut pos, move_str) {
                Some(mv) => make_move(&mut pos, mv),
                None => {
                    eprintln!("info string not a legal move: {move_str}");
                    return None;
                }
            }
        }
    }

    Some(pos)
}

/// Match a long-algebraic move string against the legal move list.
fn parse_uci_move(pos: &mut Position, s: &str) -> Option<Move> {
    if !(4..=5).contains(&s.len()) || !s.is_ascii() {
        return None;
    }
    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    let promotion = match s.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(PieceKind::Queen),
        Some(b'r') => Some(PieceKind::Rook),
        Some(b'b') => Some(PieceKind::Bishop),
        Some(b'n') => Some(PieceKind::Knight),
        Some(_) => return None,
    };

    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);
    moves.iter().copied().find(|mv| {
        mv.from as usize == from && mv.to as usize == to && mv.promotion() == promotion
    })
}

fn handle_go(parts: &[&str], pos: &mut Position, searcher: &mut Searcher) {
    let mut limits = SearchLimits::default();
    let side = pos.side_to_move;

    let mut iter = parts[1..].iter();
    while let Some(&param) = iter.next() {
        match param {
            "infinite" => {}
            "depth" => {
                if let Some(d) = iter.next().and_then(|v| v.parse::<u32>().ok()) {
                    limits.depth = Some(d.max(1));
                }
            }
            "movetime" => {
                if let Some(ms) = iter.next().and_then(|v| v.parse::<u64>().ok()) {
                    limits.movetime = Some(Duration::from_millis(ms));
                }
            }
            "wtime" | "btime" => {
                let matches_side = (param == "wtime") == (side == Color::White);
                if let Some(ms) = iter.next().and_then(|v| v.parse::<u64>().ok()) {
                    if matches_side {
                        limits.time_left = Some(Duration::from_millis(ms));
                    }
                }
            }
            "winc" | "binc" => {
                let matches_side = (param == "winc") == (side == Color::White);
                if let Some(ms) = iter.next().and_then(|v| v.parse::<u64>().ok()) {
                    if matches_side {
                        limits.increment = Duration::from_millis(ms);
                    }
                }
            }
            "movestogo" => {
                if let Some(n) = iter.next().and_then(|v| v.parse::<u32>().ok()) {
                    limits.movestogo = n;
                }
            }
            other => {
                eprintln!("info string ignoring go parameter {other:?}");
                let _ = iter.next();
            }
        }
    }

    let result = searcher.search_with(pos, &limits, |info| {
        let score = match info.score {
            Score::Centipawns(cp) => format!("cp {cp}"),
            Score::MateIn(n) => format!("mate {n}"),
        };
        let pv = info
            .pv
            .iter()
            .map(Move::to_uci)
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "info depth {} score {} nodes {} time {} pv {}",
            info.depth,
            score,
            info.nodes,
            info.elapsed.as_millis(),
            pv
        );
    });

    match result.best_move {
        Some(mv) => println!("bestmove {}", mv.to_uci()),
        // Mate or stalemate on the board; there is nothing to play.
        None => println!("bestmove 0000"),
    }
}
