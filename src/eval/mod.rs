//! The evaluator contract: a scalar value scorer, its batched counterpart, and a policy
//! scorer, kept as separate capabilities (per the design notes) so that a plain linear or
//! neural value model can power alpha-beta while MCTS requires, or synthesizes via
//! [`PolicyProxy`], a policy head.

mod policy_proxy;
#[cfg(test)]
pub mod test_doubles;

pub use policy_proxy::PolicyProxy;

use crate::board::Board;

/// Maps an arbitrary real logit into `(-1, +1)`.
pub fn squash(x: f32) -> f32 {
    x.tanh()
}

/// `(true, +1)` if the side to move on `b` has just won, `(true, -1)` if it has just
/// lost, `(true, 0)` if `b` is drawn, `(false, 0)` otherwise.
///
/// The winner need not differ from the side now to move: a move can end the game by
/// deciding either queen's encirclement, so the player whose turn it is next is not
/// always the loser.
pub fn is_endgame_and_score<B: Board>(b: &B) -> (bool, f32) {
    if !b.is_finished() {
        return (false, 0.0);
    }
    if b.is_draw() {
        return (true, 0.0);
    }
    if b.winner() == b.side_to_move() {
        (true, 1.0)
    } else {
        (true, -1.0)
    }
}

/// A board evaluator returning a scalar value in `[-1, +1]` for the side to move.
pub trait ValueScorer<B: Board> {
    fn score(&self, board: &B) -> f32;

    /// A human-readable name for logging/debugging.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// A batched value scorer, potentially amortized (e.g. a single neural-network forward
/// pass over many boards at once).
pub trait BatchValueScorer<B: Board> {
    fn batch_score(&self, boards: &[B]) -> Vec<f32>;
}

/// Fallback wrapper turning any [`ValueScorer`] into a [`BatchValueScorer`] by mapping
/// `score` over the batch one board at a time. Always available.
pub struct BatchValueScorerProxy<'a, B, S> {
    inner: &'a S,
    _board: std::marker::PhantomData<B>,
}

impl<'a, B, S> BatchValueScorerProxy<'a, B, S> {
    pub fn new(inner: &'a S) -> Self {
        BatchValueScorerProxy {
            inner,
            _board: std::marker::PhantomData,
        }
    }
}

impl<'a, B: Board, S: ValueScorer<B>> BatchValueScorer<B> for BatchValueScorerProxy<'a, B, S> {
    fn batch_score(&self, boards: &[B]) -> Vec<f32> {
        boards.iter().map(|b| self.inner.score(b)).collect()
    }
}

/// A board evaluator returning a probability distribution over `board.actions()`,
/// non-negative and summing to `1 ± 1e-3`.
pub trait PolicyScorer<B: Board> {
    fn policy_score(&self, board: &B) -> Vec<f32>;
}

/// Numerically stable softmax: subtracts the maximum value before exponentiation.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
