//! The searcher API: the boundary every engine in this crate exposes to callers.

pub mod alpha_beta;
pub mod config;
pub mod mcts;
pub mod randomized;

use crate::board::Board;
use crate::error::SearchError;

/// The result of a `Search` call: the chosen action, the board it leads to, its
/// estimated value from the perspective of the side to move on the *input* board, and
/// (when the engine can produce them) per-action scores.
///
/// Alpha-beta deliberately leaves `per_action_scores` as `None`: pruning makes scores
/// for non-best actions unreliable, so exposing them would be misleading.
#[derive(Debug, Clone)]
pub struct SearchOutcome<B> {
    pub action: crate::types::Action,
    pub next_board: B,
    pub score: f32,
    pub per_action_scores: Option<Vec<f32>>,
}

/// A deterministic-or-stochastic policy over a board's legal actions, aligned with
/// `board.actions()`.
#[derive(Debug, Clone)]
pub struct PolicyOutcome<B> {
    pub action: crate::types::Action,
    pub next_board: B,
    pub score: f32,
    pub policy: Vec<f32>,
}

/// A stateless search engine: each call rebuilds whatever internal tree/stack it needs
/// from scratch. There is no cross-move carry (transposition table, tree reuse).
pub trait Searcher<B: Board> {
    fn search(&self, board: &B) -> Result<SearchOutcome<B>, SearchError>;
}

/// A searcher that can additionally report a learned-policy-shaped distribution, as
/// MCTS does via its visit counts.
pub trait PolicySearcher<B: Board>: Searcher<B> {
    fn search_with_policy(&self, board: &B) -> Result<PolicyOutcome<B>, SearchError>;
}
