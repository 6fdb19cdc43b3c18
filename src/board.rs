//! The abstract board/action contract the search engines depend on.
//!
//! The search core never depends on Hive's actual rules (legal-move generation, hive
//! connectivity, beetle stacking, queen-encirclement detection), only on this trait.
//! Concrete implementations are expected to cache their [`Derived`] view and their
//! [`Board::take_all_actions`] result behind interior mutability (a `std::cell::OnceCell`
//! per board, the modern counterpart of the `RefCell<GroupData>` + "is this stale" flag
//! that `tiltak` uses for its own lazily-computed group connectivity in
//! `examples/MortenLohne-tiltak/src/board.rs`), so that repeated queries from MCTS
//! descents are O(1) after the first call.

use crate::types::{Action, Player};

/// The lazily-built view of a board: its legal actions and end-game status.
///
/// `actions` is never empty; [`Action::SKIP`] appears alone iff there is truly no other
/// legal move.
#[derive(Debug, Clone)]
pub struct Derived {
    pub actions: Vec<Action>,
    pub is_finished: bool,
    pub is_draw: bool,
    pub winner: Player,
}

impl Derived {
    pub fn unfinished(actions: Vec<Action>) -> Self {
        debug_assert!(!actions.is_empty());
        Derived {
            actions,
            is_finished: false,
            is_draw: false,
            winner: Player::Invalid,
        }
    }

    pub fn win(actions: Vec<Action>, winner: Player) -> Self {
        Derived {
            actions,
            is_finished: true,
            is_draw: false,
            winner,
        }
    }

    pub fn draw(actions: Vec<Action>) -> Self {
        Derived {
            actions,
            is_finished: true,
            is_draw: true,
            winner: Player::Invalid,
        }
    }
}

/// The game-independent board contract the search engines are written against.
///
/// Boards are treated as value-semantic: the search layer never mutates a board in
/// place. Implementors MUST guarantee `take_all_actions()[i] == act(actions()[i])` and a
/// stable action order for a given board (so derived policies and visit-count labels stay
/// meaningful across repeated queries).
pub trait Board: Clone {
    /// Idempotently populate (and cache) the derived view of this position.
    fn derived(&self) -> &Derived;

    /// Advance this board by `a`, without mutating `self`.
    fn act(&self, a: Action) -> Self;

    /// Cached successor boards, one per `actions()`, in the same order. Implementors
    /// MUST memoize this so repeated calls are O(1) after the first.
    fn take_all_actions(&self) -> &[Self]
    where
        Self: Sized;

    /// Plies elapsed since the start of the game.
    fn move_number(&self) -> u32;

    /// The player to move at this position.
    fn side_to_move(&self) -> Player;

    /// Finite, stably-ordered legal actions at this position.
    fn actions(&self) -> &[Action] {
        &self.derived().actions
    }

    fn is_finished(&self) -> bool {
        self.derived().is_finished
    }

    fn is_draw(&self) -> bool {
        self.derived().is_draw
    }

    /// The winning player, or [`Player::Invalid`] if unfinished or drawn.
    fn winner(&self) -> Player {
        self.derived().winner
    }

    /// Index of `a` in `actions()`, or `-1` if absent.
    fn find_action(&self, a: Action) -> i64 {
        self.actions()
            .iter()
            .position(|&candidate| candidate == a)
            .map(|i| i as i64)
            .unwrap_or(-1)
    }
}
