//! Decorates any [`Searcher`] that reports per-action scores with softmax sampling, so a
//! deterministic engine can be turned into a stochastic one for self-play-style variety.
//!
//! The sampling technique mirrors the cumulative-distribution-plus-uniform-draw approach
//! this crate already uses for MCTS's temperature-controlled action selection
//! (`src/search/mcts.rs`), itself grounded in `tiltak`'s `Tree::best_move_temperature`.

use std::cell::RefCell;
use std::marker::PhantomData;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::error::SearchError;
use crate::eval::softmax;

use super::{SearchOutcome, Searcher};

pub struct RandomizedSearcher<B, S> {
    base: S,
    randomness: f32,
    max_move_randomness: i64,
    rng: RefCell<SmallRng>,
    _board: PhantomData<B>,
}

impl<B: Board, S: Searcher<B>> RandomizedSearcher<B, S> {
    pub fn new(base: S, randomness: f32, max_move_randomness: i64) -> Self {
        RandomizedSearcher {
            base,
            randomness,
            max_move_randomness,
            rng: RefCell::new(SmallRng::from_entropy()),
            _board: PhantomData,
        }
    }

    pub fn with_seed(base: S, randomness: f32, max_move_randomness: i64, seed: u64) -> Self {
        RandomizedSearcher {
            base,
            randomness,
            max_move_randomness,
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
            _board: PhantomData,
        }
    }
}

fn sample_categorical(probs: &[f32], rng: &mut SmallRng) -> usize {
    let draw: f32 = rng.gen();
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if draw < cumulative {
            return i;
        }
    }
    probs.len() - 1
}

impl<B: Board, S: Searcher<B>> Searcher<B> for RandomizedSearcher<B, S> {
    fn search(&self, board: &B) -> Result<SearchOutcome<B>, SearchError> {
        let outcome = self.base.search(board)?;

        if self.randomness <= 0.0
            || board.move_number() as i64 >= self.max_move_randomness
            || outcome.next_board.is_finished()
            || board.actions().len() < 2
        {
            return Ok(outcome);
        }

        let Some(scores) = &outcome.per_action_scores else {
            return Ok(outcome);
        };

        let logits: Vec<f32> = scores.iter().map(|&s| s / self.randomness).collect();
        let probs = softmax(&logits);
        let idx = sample_categorical(&probs, &mut self.rng.borrow_mut());
        let next_board = board.take_all_actions()[idx].clone();

        Ok(SearchOutcome {
            action: board.actions()[idx],
            next_board,
            score: scores[idx],
            per_action_scores: outcome.per_action_scores,
        })
    }
}
