//! Concrete game-data shapes the search core consumes: players, pieces, board
//! coordinates and actions. The Hive rule engine that produces and interprets these
//! values (legal-move generation, hive connectivity, beetle stacking, queen-encirclement
//! detection) lives outside this crate; only the shapes are pinned here.

use std::fmt;

/// One of the two symbolic player identities, plus a sentinel for "no player".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
    /// "No player" (the winner of an unfinished or drawn game).
    Invalid,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
            Player::Invalid => Player::Invalid,
        }
    }
}

/// One of the five Hive piece types, plus a sentinel for "no piece".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Ant,
    Beetle,
    Grasshopper,
    Queen,
    Spider,
    None,
}

/// A hex cell address, in axial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub q: i8,
    pub r: i8,
}

impl Pos {
    pub const fn new(q: i8, r: i8) -> Self {
        Pos { q, r }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// A single Hive action: either placing or moving `piece` from `src` to `tgt`.
/// `SkipAction` (via [`Action::SKIP`]) represents "no legal move; pass".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub is_move: bool,
    pub piece: PieceType,
    pub src: Pos,
    pub tgt: Pos,
}

impl Action {
    /// The sentinel "pass" action. Appears alone in `Board::actions()` only when there
    /// is truly no other legal move.
    pub const SKIP: Action = Action {
        is_move: false,
        piece: PieceType::None,
        src: Pos::new(0, 0),
        tgt: Pos::new(0, 0),
    };

    pub fn is_skip(self) -> bool {
        self == Action::SKIP
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_skip() {
            write!(f, "skip")
        } else if self.is_move {
            write!(f, "{:?} {} -> {}", self.piece, self.src, self.tgt)
        } else {
            write!(f, "place {:?} at {}", self.piece, self.tgt)
        }
    }
}
