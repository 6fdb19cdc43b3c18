//! In-crate evaluator stand-ins for the (out-of-scope) neural evaluators, used only by
//! the test suite to build the concrete scenarios of the testable-properties spec.

use super::{PolicyScorer, ValueScorer};
use crate::board::Board;

/// Always returns the same value, regardless of board. Used for the "zero-value
/// scorer" MCTS scenario.
pub struct ConstantScorer(pub f32);

impl<B: Board> ValueScorer<B> for ConstantScorer {
    fn score(&self, _board: &B) -> f32 {
        self.0
    }
}

/// Returns a uniform distribution over `board.actions()`.
pub struct UniformPolicyScorer;

impl<B: Board> PolicyScorer<B> for UniformPolicyScorer {
    fn policy_score(&self, board: &B) -> Vec<f32> {
        let n = board.actions().len();
        vec![1.0 / n as f32; n]
    }
}

/// Returns a fixed, caller-provided value per call, in order. Used to pin down exact
/// per-successor scores in deterministic tests (e.g. `[0.0, 1.0, -1.0]` for a
/// three-successor board), including through the one-board-at-a-time
/// [`super::BatchValueScorerProxy`] fallback that [`super::PolicyProxy`] uses.
pub struct ListScorer {
    values: Vec<f32>,
    next: std::cell::Cell<usize>,
}

impl ListScorer {
    pub fn new(values: Vec<f32>) -> Self {
        ListScorer {
            values,
            next: std::cell::Cell::new(0),
        }
    }
}

impl<B: Board> ValueScorer<B> for ListScorer {
    fn score(&self, _board: &B) -> f32 {
        let i = self.next.get();
        self.next.set(i + 1);
        self.values[i]
    }
}

/// A [`ValueScorer`] that always returns a fixed value and counts its own invocations,
/// for asserting the evaluator is called at most (or exactly) a given number of times.
pub struct CountingScorer {
    value: f32,
    calls: std::cell::Cell<usize>,
}

impl CountingScorer {
    pub fn new(value: f32) -> Self {
        CountingScorer {
            value,
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<B: Board> ValueScorer<B> for CountingScorer {
    fn score(&self, _board: &B) -> f32 {
        self.calls.set(self.calls.get() + 1);
        self.value
    }
}

/// Wraps [`UniformPolicyScorer`] and counts its own invocations, for asserting the
/// policy scorer is called exactly once when MCTS creates a root and nothing more. The
/// counter is behind an `Rc` so a caller can keep reading it after the scorer itself has
/// been moved into a searcher.
pub struct CountingPolicyScorer {
    calls: std::rc::Rc<std::cell::Cell<usize>>,
}

impl CountingPolicyScorer {
    pub fn new() -> Self {
        CountingPolicyScorer {
            calls: std::rc::Rc::new(std::cell::Cell::new(0)),
        }
    }

    pub fn counter(&self) -> std::rc::Rc<std::cell::Cell<usize>> {
        self.calls.clone()
    }
}

impl Default for CountingPolicyScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board> PolicyScorer<B> for CountingPolicyScorer {
    fn policy_score(&self, board: &B) -> Vec<f32> {
        self.calls.set(self.calls.get() + 1);
        UniformPolicyScorer.policy_score(board)
    }
}
