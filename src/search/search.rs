//! Iterative-deepening negamax with quiescence.
//!
//! Single-threaded and strictly depth-first: the only shared mutable
//! state is the [`Position`] itself. Time control is cooperative; every
//! few thousand nodes the searcher reads a monotonic clock, and once the
//! deadline passes it unwinds with a stopped flag and the deepening loop
//! keeps the last fully searched depth's answer.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::board::{piece_code, Position};
use crate::moves::execute::{make_move, make_null, unmake_move, unmake_null};
use crate::moves::movegen::{generate_captures, generate_legal, in_check};
use crate::moves::types::{Move, MoveKind, MoveList};
use crate::search::context::{SearchContext, MAX_PLY};
use crate::search::eval::evaluate;
use crate::search::ordering::{order_captures, order_moves};

pub const INFINITY: i32 = 100_000;
/// Base of the mate encoding: a mate delivered at ply `p` scores
/// `MATE_VALUE - p`.
pub const MATE_VALUE: i32 = 99_000;
/// Scores beyond this are forced mates and are reported as a distance.
pub const MATE_SCORE: i32 = 98_000;

const ASPIRATION_WINDOW: i32 = 50;
const NULL_MOVE_REDUCTION: i32 = 2;
/// Quiescence delta margin: roughly a queen.
const DELTA_MARGIN: i32 = 975;
/// Lag compensation subtracted from the per-move time budget.
const SAFETY_MARGIN: Duration = Duration::from_millis(100);

/// What the driver asked for: a fixed depth, a fixed per-move time, or a
/// classical clock.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub depth: Option<u32>,
    pub movetime: Option<Duration>,
    pub time_left: Option<Duration>,
    pub increment: Duration,
    /// Moves until the next time control; 0 means "not given".
    pub movestogo: u32,
}

impl SearchLimits {
    pub fn fixed_depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..SearchLimits::default()
        }
    }

    pub fn fixed_time(movetime: Duration) -> Self {
        SearchLimits {
            movetime: Some(movetime),
            ..SearchLimits::default()
        }
    }

    /// Per-move budget: `movetime` verbatim, or an equal split of the
    /// remaining clock plus the increment, minus lag compensation.
    fn budget(&self) -> Option<Duration> {
        let (total, movestogo) = match (self.movetime, self.time_left) {
            (Some(movetime), _) => (movetime, 1),
            (None, Some(left)) => (left, if self.movestogo == 0 { 50 } else { self.movestogo }),
            (None, None) => return None,
        };

        let per_move = total / movestogo;
        if per_move > Duration::from_millis(1500) {
            Some(per_move - SAFETY_MARGIN + self.increment)
        } else if !self.increment.is_zero() {
            // Almost out of clock: live off the increment.
            Some(self.increment.saturating_sub(SAFETY_MARGIN))
        } else {
            Some(per_move + self.increment)
        }
    }
}

/// Cooperative deadline. The node-count interval between clock reads is
/// tuned to the budget so short budgets get checked often enough.
pub struct TimeManager {
    start: Instant,
    deadline: Option<Instant>,
    check_interval: u64,
    pub stopped: bool,
}

impl TimeManager {
    fn new(budget: Option<Duration>) -> Self {
        let check_interval = match budget {
            Some(b) if b < Duration::from_secs(5) => 800,
            Some(b) if b <= Duration::from_secs(10) => 12_000,
            _ => 2_000,
        };
        let start = Instant::now();
        TimeManager {
            start,
            deadline: budget.map(|b| start + b),
            check_interval,
            stopped: false,
        }
    }

    #[inline(always)]
    fn tick(&mut self, nodes: u64) {
        if nodes % self.check_interval == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                }
            }
        }
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Reported score: centipawns, or distance to mate in full moves
/// (negative when getting mated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    MateIn(i32),
}

fn report_score(raw: i32) -> Score {
    if raw > MATE_SCORE {
        Score::MateIn((MATE_VALUE - raw) / 2 + 1)
    } else if raw < -MATE_SCORE {
        Score::MateIn(-((raw + MATE_VALUE) / 2) - 1)
    } else {
        Score::Centipawns(raw)
    }
}

/// Emitted after each completed depth.
#[derive(Debug, Clone)]
pub struct SearchInfo {
    pub depth: u32,
    pub score: Score,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// The searcher owns the ordering heuristics and the PV table; the
/// position is borrowed mutably for the duration of a search and handed
/// back in its original state.
pub struct Searcher {
    ctx: SearchContext,
}

impl Searcher {
    pub fn new() -> Self {
        Searcher {
            ctx: SearchContext::new(),
        }
    }

    pub fn search(&mut self, pos: &mut Position, limits: &SearchLimits) -> SearchResult {
        self.search_with(pos, limits, |_| {})
    }

    /// Iterative deepening with an aspiration window around the previous
    /// depth's score. `on_depth` fires after every completed depth.
    pub fn search_with(
        &mut self,
        pos: &mut Position,
        limits: &SearchLimits,
        mut on_depth: impl FnMut(&SearchInfo),
    ) -> SearchResult {
        let mut time = TimeManager::new(limits.budget());
        self.ctx.reset();

        let max_depth = limits.depth.unwrap_or(64).max(1);
        let mut best_move = None;
        let mut best_score = 0;
        let mut alpha = -INFINITY;
        let mut beta = INFINITY;

        for depth in 1..=max_depth {
            self.ctx.begin_iteration();
            let mut score = self.negamax(pos, &mut time, depth as i32, 0, alpha, beta, false);

            // Outside the aspiration window: redo the depth full-width.
            if !time.stopped && (score <= alpha || score >= beta) {
                debug!(depth, score, alpha, beta, "aspiration fail, re-searching");
                alpha = -INFINITY;
                beta = INFINITY;
                self.ctx.begin_iteration();
                score = self.negamax(pos, &mut time, depth as i32, 0, alpha, beta, false);
            }

            // Window for the next depth.
            alpha = score - ASPIRATION_WINDOW;
            beta = score + ASPIRATION_WINDOW;

            if time.stopped {
                // The interrupted depth is discarded wholesale.
                break;
            }

            best_move = self.ctx.pv_table[0][0];
            best_score = score;

            let pv = self.ctx.principal_variation();
            info!(
                depth,
                score,
                nodes = self.ctx.nodes,
                elapsed_ms = time.elapsed().as_millis() as u64,
                "depth complete"
            );
            on_depth(&SearchInfo {
                depth,
                score: report_score(score),
                nodes: self.ctx.nodes,
                elapsed: time.elapsed(),
                pv,
            });
        }

        // Even an instantly interrupted (or drawn-at-the-root) search
        // answers with a legal move when one exists.
        let best_move = best_move.or_else(|| {
            let mut moves = MoveList::new();
            generate_legal(pos, &mut moves);
            moves.first().copied()
        });

        SearchResult {
            best_move,
            score: best_score,
            nodes: self.ctx.nodes,
            elapsed: time.elapsed(),
        }
    }

    /// Fail-hard negamax: the returned score stays inside `[alpha, beta]`.
    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        pos: &mut Position,
        time: &mut TimeManager,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        allow_null: bool,
    ) -> i32 {
        if ply >= MAX_PLY {
            return evaluate(pos);
        }

        self.ctx.pv_length[ply] = 0;

        if pos.is_repetition() {
            return 0;
        }

        let in_check_now = in_check(pos, pos.side_to_move);
        if in_check_now {
            depth += 1;
        }

        if depth == 0 {
            return self.quiescence(pos, time, ply, alpha, beta);
        }

        self.ctx.nodes += 1;

        // Null move: hand the opponent a free move at reduced depth; if
        // they still cannot reach beta, the real subtree cannot either.
        // Skipped in check and at the root.
        if allow_null && ply > 0 && !in_check_now && depth - 1 - NULL_MOVE_REDUCTION >= 0 {
            let undo = make_null(pos);
            let score = -self.negamax(
                pos,
                time,
                depth - 1 - NULL_MOVE_REDUCTION,
                ply + 1,
                -beta,
                -beta + 1,
                false,
            );
            unmake_null(pos, undo);

            if time.stopped {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let mut moves = MoveList::new();
        generate_legal(pos, &mut moves);
        order_moves(pos, &mut self.ctx, ply, &mut moves);

        let mover = pos.side_to_move;
        let mut legal_moves = 0;

        for i in 0..moves.len() {
            let mv = moves[i];
            let quiet = pos.is_empty(mv.to as usize) && mv.kind != MoveKind::EnPassant;

            make_move(pos, mv);
            legal_moves += 1;
            let score = -self.negamax(pos, time, depth - 1, ply + 1, -beta, -alpha, true);
            unmake_move(pos);

            time.tick(self.ctx.nodes);
            if time.stopped {
                return 0;
            }

            if score > alpha {
                alpha = score;

                if quiet {
                    self.ctx
                        .add_history(piece_code(mover, mv.piece), mv.to as usize, depth);
                }
                self.ctx.store_pv(ply, mv);

                if score >= beta {
                    if quiet {
                        self.ctx.update_killers(ply, mv);
                    }
                    return beta;
                }
            }
        }

        if legal_moves == 0 {
            if in_check_now {
                // Mate distance: closer mates score higher.
                return -MATE_VALUE + ply as i32;
            }
            return 0;
        }

        alpha
    }

    /// Tactical-only search past the horizon: stand pat, then captures
    /// ordered by MVV-LVA, with delta pruning against hopeless nodes.
    fn quiescence(
        &mut self,
        pos: &mut Position,
        time: &mut TimeManager,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        time.tick(self.ctx.nodes);
        if time.stopped {
            return 0;
        }

        self.ctx.nodes += 1;

        if pos.is_repetition() {
            return 0;
        }

        let stand_pat = evaluate(pos);
        if ply >= MAX_PLY {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat < alpha - DELTA_MARGIN {
            return alpha;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = MoveList::new();
        generate_captures(pos, &mut moves);
        order_captures(pos, &mut moves);

        for i in 0..moves.len() {
            let mv = moves[i];
            make_move(pos, mv);
            let score = -self.quiescence(pos, time, ply + 1, -beta, -alpha);
            unmake_move(pos);

            if time.stopped {
                return 0;
            }

            if score > alpha {
                alpha = score;
                if score >= beta {
                    return beta;
                }
            }
        }

        alpha
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new()
    }
}

/// Convenience entry point: search and return the best move alone.
pub fn best_move(pos: &mut Position, limits: &SearchLimits) -> Option<Move> {
    Searcher::new().search(pos, limits).best_move
}
