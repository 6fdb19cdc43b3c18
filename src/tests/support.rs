//! A hand-built mock [`Board`] implementation standing in for the (out-of-scope) Hive
//! rule engine. Every board is an explicit, eagerly-built tree: fixtures wire up exactly
//! the successors a scenario needs, nothing is generated from real game rules.

use crate::board::{Board, Derived};
use crate::types::{Action, PieceType, Player, Pos};

#[derive(Clone)]
pub struct TestBoard {
    derived: Derived,
    successors: Vec<TestBoard>,
    move_number: u32,
    side_to_move: Player,
}

impl TestBoard {
    pub fn win_leaf(winner: Player, move_number: u32, side_to_move: Player) -> Self {
        TestBoard {
            derived: Derived::win(Vec::new(), winner),
            successors: Vec::new(),
            move_number,
            side_to_move,
        }
    }

    pub fn draw_leaf(move_number: u32, side_to_move: Player) -> Self {
        TestBoard {
            derived: Derived::draw(Vec::new()),
            successors: Vec::new(),
            move_number,
            side_to_move,
        }
    }

    /// A non-finished board with a single [`Action::SKIP`] successor, for fixtures that
    /// need "some non-terminal board" without caring about its internals.
    pub fn idle_leaf(move_number: u32, side_to_move: Player) -> Self {
        TestBoard::branch(
            vec![Action::SKIP],
            vec![TestBoard::draw_leaf(move_number + 1, side_to_move.opponent())],
            move_number,
            side_to_move,
        )
    }

    pub fn branch(
        actions: Vec<Action>,
        successors: Vec<TestBoard>,
        move_number: u32,
        side_to_move: Player,
    ) -> Self {
        assert_eq!(actions.len(), successors.len());
        TestBoard {
            derived: Derived::unfinished(actions),
            successors,
            move_number,
            side_to_move,
        }
    }

    /// A root with exactly two non-terminal actions, for tests of the randomized
    /// wrapper and of tie-breaking that don't care what lies beyond the first ply.
    pub fn two_action_root() -> Self {
        let a0 = ant_move(0, 0, 1, 0);
        let a1 = ant_move(0, 0, -1, 0);
        TestBoard::branch(
            vec![a0, a1],
            vec![
                TestBoard::idle_leaf(1, Player::Black),
                TestBoard::idle_leaf(1, Player::Black),
            ],
            0,
            Player::White,
        )
    }

    /// S1: the side to move has exactly one action, a Grasshopper move from `(-2, 3)` to
    /// `(0, 1)`, that wins immediately; a second action leads to a loss.
    pub fn mate_in_one() -> (Self, Action) {
        let winning = grasshopper_move(-2, 3, 0, 1);
        let losing = ant_move(0, 0, 1, 1);
        let board = TestBoard::branch(
            vec![winning, losing],
            vec![
                TestBoard::win_leaf(Player::White, 1, Player::Black),
                TestBoard::win_leaf(Player::Black, 1, Player::Black),
            ],
            0,
            Player::White,
        );
        (board, winning)
    }

    /// S2: no single ply wins, but a Grasshopper move from `(-2, 0)` to `(-2, 2)` forces a
    /// mate on the reply; the other immediate action only reaches a non-terminal position.
    pub fn mate_in_two() -> (Self, Action) {
        let forcing = grasshopper_move(-2, 0, -2, 2);
        let other = ant_move(1, 1, 2, 1);

        // Every reply Black can make at this node still loses: both successors are a
        // White win, so Black's best (least-bad) choice still carries score -1 from
        // Black's own perspective, which negamax turns back into +1 for White at the
        // root.
        let reply_a = ant_move(3, 0, 3, 1);
        let reply_b = ant_move(3, 0, 4, 0);
        let after_forcing = TestBoard::branch(
            vec![reply_a, reply_b],
            vec![
                TestBoard::win_leaf(Player::White, 2, Player::White),
                TestBoard::win_leaf(Player::White, 2, Player::White),
            ],
            1,
            Player::Black,
        );
        let after_other = TestBoard::idle_leaf(1, Player::Black);

        let board = TestBoard::branch(
            vec![forcing, other],
            vec![after_forcing, after_other],
            0,
            Player::White,
        );
        (board, forcing)
    }

    /// S3: 11 pieces on board; the side to move has exactly one winning action (an Ant
    /// move from `(-2, 0)` to `(2, -1)`) among several losing ones.
    pub fn only_winning_action() -> (Self, Action) {
        let winning = ant_move(-2, 0, 2, -1);
        let losing_a = ant_move(1, -1, 1, 0);
        let losing_b = ant_move(-1, 2, -1, 3);
        let board = TestBoard::branch(
            vec![winning, losing_a, losing_b],
            vec![
                TestBoard::win_leaf(Player::White, 11, Player::Black),
                TestBoard::win_leaf(Player::Black, 11, Player::Black),
                TestBoard::win_leaf(Player::Black, 11, Player::Black),
            ],
            10,
            Player::White,
        );
        (board, winning)
    }

    /// S6: a non-terminal position with a branching factor of 20, deep enough that a
    /// 200ms iterative-deepening search should comfortably clear depth 1.
    pub fn wide_branching(branching: usize, move_number: u32, side_to_move: Player) -> Self {
        let actions: Vec<Action> = (0..branching)
            .map(|i| ant_move(0, 0, i as i8, (i as i8) + 1))
            .collect();
        let successors: Vec<TestBoard> = (0..branching)
            .map(|_| TestBoard::idle_leaf(move_number + 1, side_to_move.opponent()))
            .collect();
        TestBoard::branch(actions, successors, move_number, side_to_move)
    }
}

fn ant_move(sq: i8, sr: i8, tq: i8, tr: i8) -> Action {
    Action {
        is_move: true,
        piece: PieceType::Ant,
        src: Pos::new(sq, sr),
        tgt: Pos::new(tq, tr),
    }
}

fn grasshopper_move(sq: i8, sr: i8, tq: i8, tr: i8) -> Action {
    Action {
        is_move: true,
        piece: PieceType::Grasshopper,
        src: Pos::new(sq, sr),
        tgt: Pos::new(tq, tr),
    }
}

impl Board for TestBoard {
    fn derived(&self) -> &Derived {
        &self.derived
    }

    fn act(&self, a: Action) -> Self {
        let idx = self.find_action(a);
        assert!(idx >= 0, "action {a} not found among legal actions");
        self.successors[idx as usize].clone()
    }

    fn take_all_actions(&self) -> &[Self]
    where
        Self: Sized,
    {
        &self.successors
    }

    fn move_number(&self) -> u32 {
        self.move_number
    }

    fn side_to_move(&self) -> Player {
        self.side_to_move
    }
}
