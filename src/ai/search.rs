use crate::ai::evaluator::{DiscDifferential, Evaluator};
use crate::ai::movegen::generate_moves;
use crate::board::Board;
use crate::types::{Color, Position};

// Mirrored sentinels stay safe to negate; i32::MIN would not.
const MAX_SCORE: i32 = i32::MAX;
const MIN_SCORE: i32 = -MAX_SCORE;

/// Move chosen for a node together with its minimax value.
///
/// `position` is `None` at terminal nodes: depth exhausted, or the mover
/// has no legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub position: Option<Position>,
    pub score: i32,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self {
            position: None,
            score,
        }
    }
}

/// Depth-limited minimax with alpha-beta pruning.
///
/// The acting color, the depth budget, and the evaluator are fixed at
/// construction; every search answers "what should this color play".
pub struct Searcher<E = DiscDifferential> {
    color: Color,
    depth: u8,
    evaluator: E,
}

impl Searcher<DiscDifferential> {
    pub fn new(color: Color, depth: u8) -> Self {
        Self::with_evaluator(color, depth, DiscDifferential::new(color))
    }
}

impl<E: Evaluator> Searcher<E> {
    /// Swaps in a different static heuristic; the search contract is
    /// unchanged.
    pub fn with_evaluator(color: Color, depth: u8, evaluator: E) -> Self {
        Self {
            color,
            depth,
            evaluator,
        }
    }

    /// Searches to the configured depth from the acting color's
    /// perspective. The returned position is `None` iff the acting color
    /// has no legal move.
    pub fn search(&self, board: &Board) -> SearchResult {
        self.minimax(board, self.depth, MIN_SCORE, MAX_SCORE, true)
    }

    fn minimax(
        &self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        if depth == 0 {
            return SearchResult::leaf(self.evaluator.evaluate(board));
        }

        let mover = if maximizing {
            self.color
        } else {
            self.color.opponent()
        };
        let moves = generate_moves(board, mover);
        // A move-less node is terminal even with depth remaining.
        if moves.is_empty() {
            return SearchResult::leaf(self.evaluator.evaluate(board));
        }

        let mut best = SearchResult {
            position: None,
            score: if maximizing { MIN_SCORE } else { MAX_SCORE },
        };

        for pos in moves {
            let child_board = board.with_move(mover, pos);
            let child = self.minimax(&child_board, depth - 1, alpha, beta, !maximizing);

            if maximizing {
                if child.score > best.score {
                    best = SearchResult {
                        position: Some(pos),
                        score: child.score,
                    };
                }
                alpha = alpha.max(child.score);
            } else {
                if child.score < best.score {
                    best = SearchResult {
                        position: Some(pos),
                        score: child.score,
                    };
                }
                beta = beta.min(child.score);
            }

            // The window is closed: no remaining candidate can change what
            // a rational opponent would allow.
            if beta <= alpha {
                break;
            }
        }

        best
    }
}
