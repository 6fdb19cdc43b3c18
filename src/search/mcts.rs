//! AlphaZero-flavored Monte Carlo Tree Search: PUCT selection, lazy child expansion, and
//! temperature-controlled action selection over visit counts.
//!
//! Grounded in `tiltak`'s `mcts_core::Tree`/`TreeEdge` split
//! (`examples/MortenLohne-tiltak/src/mcts.rs`): the same lazy-expand-on-second-visit
//! discipline, the same `(visits, mean_value)` per-edge state, and the same cumulative
//! visit-probability sampling in `Tree::best_move_temperature`.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::error::SearchError;
use crate::eval::{is_endgame_and_score, PolicyScorer, ValueScorer};

use super::config::RawConfig;
use super::{PolicyOutcome, PolicySearcher, SearchOutcome, Searcher};

#[derive(Debug, Clone, PartialEq)]
pub struct MctsSettings {
    pub max_time: Duration,
    pub max_traverses: u32,
    pub min_traverses: u32,
    pub c_puct: f32,
    pub temperature: f32,
    pub max_rand_depth: i64,
}

impl Default for MctsSettings {
    fn default() -> Self {
        MctsSettings {
            max_time: Duration::from_secs(30),
            max_traverses: 300,
            min_traverses: 10,
            c_puct: 1.1,
            temperature: 1.0,
            max_rand_depth: 25,
        }
    }
}

impl MctsSettings {
    pub fn from_config_str(s: &str) -> Result<Self, SearchError> {
        let raw = RawConfig::parse(s)?;
        raw.mark_consulted("mcts");
        Self::from_raw(&raw)
    }

    pub(super) fn from_raw(raw: &RawConfig) -> Result<Self, SearchError> {
        let mut settings = MctsSettings::default();

        if let Some(v) = raw.get_duration("max_time")? {
            settings.max_time = v;
        }
        if let Some(v) = raw.get_int("max_traverses")? {
            if v <= 0 {
                return Err(SearchError::Config("max_traverses must be > 0".to_string()));
            }
            settings.max_traverses = v as u32;
        }
        if let Some(v) = raw.get_int("min_traverses")? {
            if v < 0 {
                return Err(SearchError::Config("min_traverses must be >= 0".to_string()));
            }
            settings.min_traverses = v as u32;
        }
        if let Some(v) = raw.get_f32("c_puct")? {
            settings.c_puct = v;
        }
        if let Some(v) = raw.get_f32("temperature")? {
            settings.temperature = v;
        }
        if let Some(v) = raw.get_int("max_rand_depth")? {
            settings.max_rand_depth = v;
        }

        if settings.c_puct < 0.0 {
            return Err(SearchError::Config("c_puct must be >= 0".to_string()));
        }
        if settings.temperature < 0.0 {
            return Err(SearchError::Config("temperature must be >= 0".to_string()));
        }
        if settings.min_traverses > settings.max_traverses {
            return Err(SearchError::Config(
                "min_traverses must not exceed max_traverses".to_string(),
            ));
        }

        Ok(settings)
    }
}

/// A non-terminal board position explored by MCTS. Only `visits`, `total_value`, and
/// `children` are mutated after construction; `board` and `prior` are fixed for the
/// node's lifetime, matching the "only the per-action counters are mutable" invariant
/// that a future parallel implementation would need to lock around.
struct CacheNode<B> {
    board: B,
    prior: Vec<f32>,
    visits: Vec<u32>,
    total_value: Vec<f32>,
    children: Vec<Option<Box<CacheNode<B>>>>,
    sum_n: u32,
}

impl<B: Board> CacheNode<B> {
    fn new<P: PolicyScorer<B> + ?Sized>(board: B, policy_scorer: &P) -> Result<Self, SearchError> {
        if board.is_finished() {
            return Err(SearchError::BoardContract(
                "a CacheNode was built for a finished board".to_string(),
            ));
        }
        let prior = policy_scorer.policy_score(&board);
        let n_actions = board.actions().len();
        if prior.len() != n_actions {
            return Err(SearchError::EvaluatorContract(format!(
                "policy has {} components, but the board has {n_actions} actions",
                prior.len()
            )));
        }
        if prior.iter().any(|&p| p < 0.0) {
            return Err(SearchError::EvaluatorContract(
                "policy has a negative component".to_string(),
            ));
        }
        let sum: f32 = prior.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(SearchError::EvaluatorContract(format!(
                "policy sums to {sum}, expected 1 +/- 1e-3"
            )));
        }

        Ok(CacheNode {
            prior,
            visits: vec![0; n_actions],
            total_value: vec![0.0; n_actions],
            children: (0..n_actions).map(|_| None).collect(),
            board,
            sum_n: 0,
        })
    }

    fn q(&self, a: usize) -> f32 {
        if self.visits[a] > 0 {
            self.total_value[a] / self.visits[a] as f32
        } else {
            0.0
        }
    }

    fn select_puct(&self, c_puct: f32) -> usize {
        let sqrt_sum = (self.sum_n as f32).sqrt();
        let mut best_idx = 0;
        let mut best_u = f32::NEG_INFINITY;
        for a in 0..self.prior.len() {
            let u = self.q(a) + c_puct * self.prior[a] * sqrt_sum / (1.0 + self.visits[a] as f32);
            if u > best_u {
                best_u = u;
                best_idx = a;
            }
        }
        best_idx
    }
}

pub struct MctsSearcher<B, V, P> {
    settings: MctsSettings,
    value_scorer: V,
    policy_scorer: P,
    rng: RefCell<SmallRng>,
    _board: std::marker::PhantomData<B>,
}

impl<B: Board, V: ValueScorer<B>, P: PolicyScorer<B>> MctsSearcher<B, V, P> {
    pub fn new(settings: MctsSettings, value_scorer: V, policy_scorer: P) -> Self {
        MctsSearcher {
            settings,
            value_scorer,
            policy_scorer,
            rng: RefCell::new(SmallRng::from_entropy()),
            _board: std::marker::PhantomData,
        }
    }

    pub fn with_seed(settings: MctsSettings, value_scorer: V, policy_scorer: P, seed: u64) -> Self {
        MctsSearcher {
            settings,
            value_scorer,
            policy_scorer,
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
            _board: std::marker::PhantomData,
        }
    }

    /// One rollout: PUCT-select down the tree, expanding at most one new [`CacheNode`],
    /// and backpropagate the negated value at every level.
    fn simulate(&self, node: &mut CacheNode<B>) -> Result<f32, SearchError> {
        let a = node.select_puct(self.settings.c_puct);

        if node.visits[a] == 0 {
            let successor = node.board.take_all_actions()[a].clone();
            let v = if successor.is_finished() {
                let (_, endgame_v) = is_endgame_and_score(&successor);
                -endgame_v
            } else {
                -self.value_scorer.score(&successor)
            };
            node.visits[a] = 1;
            node.total_value[a] += v;
            node.sum_n += 1;
            return Ok(v);
        }

        if node.children[a].is_none() {
            let successor = node.board.take_all_actions()[a].clone();
            if successor.is_finished() {
                let (_, endgame_v) = is_endgame_and_score(&successor);
                let v = -endgame_v;
                node.visits[a] += 1;
                node.total_value[a] += v;
                node.sum_n += 1;
                return Ok(v);
            }
            let child = CacheNode::new(successor, &self.policy_scorer)?;
            node.children[a] = Some(Box::new(child));
        }

        let v = -self.simulate(node.children[a].as_mut().unwrap())?;
        node.visits[a] += 1;
        node.total_value[a] += v;
        node.sum_n += 1;
        Ok(v)
    }

    /// Builds the root, runs simulations to termination, and selects the root action.
    /// Shared by [`Searcher::search`] and [`PolicySearcher::search_with_policy`] so a
    /// caller using either never pays for two independent simulation runs.
    fn run(&self, board: &B) -> Result<(usize, CacheNode<B>), SearchError> {
        if board.is_finished() {
            return Err(SearchError::BoardContract(
                "search() called on a finished board".to_string(),
            ));
        }

        let mut root = CacheNode::new(board.clone(), &self.policy_scorer)?;
        let start = Instant::now();
        let mut traverses = 0u32;
        loop {
            if traverses >= self.settings.max_traverses {
                break;
            }
            if traverses >= self.settings.min_traverses && start.elapsed() >= self.settings.max_time {
                break;
            }
            self.simulate(&mut root)?;
            traverses += 1;
        }

        let greedy = self.settings.temperature == 0.0
            || (self.settings.max_rand_depth > 0
                && board.move_number() as i64 > self.settings.max_rand_depth);
        let chosen = if greedy {
            argmax_visits(&root.visits, &mut self.rng.borrow_mut())
        } else {
            sample_by_temperature(&root.visits, self.settings.temperature, &mut self.rng.borrow_mut())
        };

        Ok((chosen, root))
    }

    /// Exposes the raw simulation count for a search, for asserting the bounded-resource
    /// behavior of the termination rule directly.
    #[cfg(test)]
    pub fn total_traverses(&self, board: &B) -> Result<u32, SearchError> {
        let (_, root) = self.run(board)?;
        Ok(root.sum_n)
    }
}

fn argmax_visits(visits: &[u32], rng: &mut SmallRng) -> usize {
    let max = visits.iter().copied().max().unwrap_or(0);
    let candidates: Vec<usize> = visits
        .iter()
        .enumerate()
        .filter(|(_, &n)| n == max)
        .map(|(i, _)| i)
        .collect();
    *candidates.choose(rng).unwrap()
}

/// `pi[a] = N[a]^(1/tau) / sum_b N[b]^(1/tau)`, sampled via a single uniform draw against
/// the cumulative distribution. Falls back to the last action if rounding leaves the draw
/// past the final bucket.
fn sample_by_temperature(visits: &[u32], temperature: f32, rng: &mut SmallRng) -> usize {
    let exponent = (1.0 / temperature) as f64;
    let weights: Vec<f64> = visits.iter().map(|&n| (n as f64).powf(exponent)).collect();
    let total: f64 = weights.iter().sum();
    let draw: f64 = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if draw < cumulative {
            return i;
        }
    }
    visits.len() - 1
}

fn q_values<B: Board>(root: &CacheNode<B>) -> Vec<f32> {
    (0..root.visits.len()).map(|a| root.q(a)).collect()
}

fn visits_normalized<B>(root: &CacheNode<B>) -> Vec<f32> {
    let sum_n = root.sum_n as f32;
    root.visits
        .iter()
        .map(|&n| if sum_n > 0.0 { n as f32 / sum_n } else { 0.0 })
        .collect()
}

impl<B: Board, V: ValueScorer<B>, P: PolicyScorer<B>> Searcher<B> for MctsSearcher<B, V, P> {
    fn search(&self, board: &B) -> Result<SearchOutcome<B>, SearchError> {
        let (chosen, root) = self.run(board)?;
        let per_action_scores = q_values(&root);
        let next_board = board.take_all_actions()[chosen].clone();
        Ok(SearchOutcome {
            action: board.actions()[chosen],
            next_board,
            score: per_action_scores[chosen],
            per_action_scores: Some(per_action_scores),
        })
    }
}

impl<B: Board, V: ValueScorer<B>, P: PolicyScorer<B>> PolicySearcher<B> for MctsSearcher<B, V, P> {
    fn search_with_policy(&self, board: &B) -> Result<PolicyOutcome<B>, SearchError> {
        let (chosen, root) = self.run(board)?;
        let policy = visits_normalized(&root);
        let next_board = board.take_all_actions()[chosen].clone();
        Ok(PolicyOutcome {
            action: board.actions()[chosen],
            next_board,
            score: root.q(chosen),
            policy,
        })
    }
}
