//! Synthesizes a policy distribution from a plain value scorer, so MCTS can run with an
//! evaluator that lacks a native policy head.

use super::{softmax, BatchValueScorer, BatchValueScorerProxy, PolicyScorer, ValueScorer};
use crate::board::Board;

/// `policy_score(b) = softmax(scale * batch_score(b.take_all_actions()))`.
pub struct PolicyProxy<S> {
    scorer: S,
    scale: f32,
}

impl<S> PolicyProxy<S> {
    pub fn new(scorer: S, scale: f32) -> Self {
        PolicyProxy { scorer, scale }
    }
}

impl<B: Board, S: ValueScorer<B>> PolicyScorer<B> for PolicyProxy<S> {
    fn policy_score(&self, board: &B) -> Vec<f32> {
        let successors = board.take_all_actions();
        let proxy = BatchValueScorerProxy::new(&self.scorer);
        let values = proxy.batch_score(successors);
        let logits: Vec<f32> = values.iter().map(|&v| self.scale * v).collect();
        softmax(&logits)
    }
}

/// Blanket impl for evaluators that already implement [`BatchValueScorer`] natively,
/// avoiding the one-at-a-time [`BatchValueScorerProxy`] fallback when a faster batched
/// path is available.
impl<S> PolicyProxy<S> {
    pub fn policy_score_batched<B: Board>(&self, board: &B) -> Vec<f32>
    where
        S: BatchValueScorer<B>,
    {
        let successors = board.take_all_actions();
        let values = self.scorer.batch_score(successors);
        let logits: Vec<f32> = values.iter().map(|&v| self.scale * v).collect();
        softmax(&logits)
    }
}
