use super::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::action::{move_index, reflection_table};

/// Cells reachable by some walk of at most three steps that never enters
/// `blocker`. Independent of the BFS used by the board.
fn walk_destinations(len: usize, from: Cell, walls: &Walls, blocker: Cell) -> Vec<Cell> {
    fn walk(len: usize, cell: Cell, walls: &Walls, blocker: Cell, left: u32, out: &mut Vec<Cell>) {
        if !out.contains(&cell) {
            out.push(cell);
        }
        if left == 0 {
            return;
        }
        for wall in Wall::ALL {
            if let Some(next) = walls.step(len, cell, wall) {
                if next != blocker {
                    walk(len, next, walls, blocker, left - 1, out);
                }
            }
        }
    }
    let mut out = Vec::new();
    walk(len, from, walls, blocker, 3, &mut out);
    out
}

fn brute_force_legal(board: &Board) -> Vec<u8> {
    if board.is_terminal() {
        return Vec::new();
    }
    let len = board.len();
    let walls = board.walls();
    let me = board.active_player();
    let here = board.position(me);
    let dests = walk_destinations(len, here, &walls, board.position(me.opponent()));

    let mut legal = Vec::new();
    for dest in dests {
        let dr = dest.row as i32 - here.row as i32;
        let dc = dest.col as i32 - here.col as i32;
        let index = move_index(dr, dc).unwrap();
        for wall in Wall::ALL {
            if !walls.blocks(len, dest, wall) {
                legal.push(encode(index, wall));
            }
        }
    }
    legal.sort_unstable();
    legal
}

/// Play uniformly random games, calling `check` before every move.
fn random_games(seed: u64, games: usize, mut check: impl FnMut(&Board, u8)) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    for game in 0..games {
        let len = 2 + game % 7;
        let mut board = Board::new(len).unwrap();
        while !board.is_terminal() {
            let actions = board.available_actions();
            let action = *actions.choose(&mut rng).unwrap();
            check(&board, action);
            board.do_action(action).unwrap();
        }
        check(&board, u8::MAX);
    }
}

#[test]
fn test_initial_state() {
    let board = Board::default();
    assert_eq!(board.len(), 7);
    assert_eq!(board.active_player(), Player::Blue);
    assert_eq!(board.position(Player::Blue), Cell::new(0, 0));
    assert_eq!(board.position(Player::Green), Cell::new(6, 6));
    assert_eq!(board.step_count(), 0);
    assert_eq!(board.walls(), Walls::NONE);
    assert!(!board.is_terminal());
    assert_eq!(board.outcome(), None);
}

#[test]
fn test_opening_legal_actions() {
    let board = Board::default();
    // Ten destinations with r + c <= 3, minus rim edges
    assert_eq!(board.num_available_actions(), 32);
    assert!(board.is_legal(50));
    assert!(!board.is_legal(48)); // wall above the top row
    assert!(!board.is_legal(0)); // three steps up
    assert!(!board.is_legal(100));
}

#[test]
fn test_opponent_blocks_movement() {
    let board = Board::new(2).unwrap();
    let actions = board.available_actions();
    // Three open cells with two interior edges each
    assert_eq!(actions.len(), 6);
    let onto_green = move_index(1, 1).unwrap();
    assert!(actions.iter().all(|&a| decode(a).unwrap().0 != onto_green));
}

#[test]
fn test_stay_and_wall_both_players() {
    let mut board = Board::default();
    board.do_action(50).unwrap();
    board.do_action(48).unwrap();

    let walls = board.walls();
    assert_eq!(walls.horizontal.count_ones(), 2);
    assert_eq!(walls.vertical, 0);
    assert_eq!(board.position(Player::Blue), Cell::new(0, 0));
    assert_eq!(board.position(Player::Green), Cell::new(6, 6));
    assert_eq!(board.step_count(), 2);
    assert_eq!(board.active_player(), Player::Blue);
}

#[test]
fn test_illegal_action_leaves_board_untouched() {
    let mut board = Board::default();
    let before = board;
    assert_eq!(
        board.do_action(48),
        Err(BoardError::IllegalAction { action: 48 })
    );
    assert_eq!(board.do_action(200), Err(BoardError::IllegalAction { action: 200 }));
    assert_eq!(board, before);

    // A wall cannot be placed twice on the same edge
    board.do_action(50).unwrap();
    board.do_action(48).unwrap();
    assert!(!board.is_legal(50));
}

#[test]
fn test_corner_enclosure_ends_game() {
    let mut board = Board::default();
    board.do_action(50).unwrap();
    board.do_action(48).unwrap();
    board.do_action(51).unwrap();

    assert!(board.is_terminal());
    assert_eq!(board.outcome(), Some(Outcome::Winner(Player::Green)));
    assert!(board.available_actions().is_empty());

    let (blue, green) = board.territory_sets();
    assert_eq!(blue.len(), 1);
    assert_eq!(green.len(), 48);
}

#[test]
fn test_split_board_draw() {
    let mut board = Board::new(2).unwrap();
    board.do_action(50).unwrap();
    assert!(!board.is_terminal());
    board.do_action(48).unwrap();
    assert_eq!(board.outcome(), Some(Outcome::Draw));
    assert_eq!(board.legal_mask(), 0);
}

#[test]
fn test_larger_region_wins() {
    let mut board = Board::new(3).unwrap();
    for action in [54, 48, 54] {
        board.do_action(action).unwrap();
        assert!(!board.is_terminal());
    }
    board.do_action(49).unwrap();
    assert_eq!(board.outcome(), Some(Outcome::Winner(Player::Blue)));
    let (blue, green) = board.territory_sets();
    assert_eq!((blue.len(), green.len()), (8, 1));
}

#[test]
fn test_clear_board_keeps_size() {
    let mut board = Board::new(5).unwrap();
    board.do_action(50).unwrap();
    board.clear_board();
    assert_eq!(board, Board::new(5).unwrap());
}

#[test]
fn test_legal_actions_match_brute_force() {
    random_games(7, 40, |board, _| {
        assert_eq!(board.available_actions(), brute_force_legal(board));
    });
}

#[test]
fn test_every_available_action_applies() {
    random_games(11, 30, |board, _| {
        for action in board.available_actions() {
            let mut next = board.copy();
            assert!(next.do_action(action).is_ok());
            assert_eq!(next.step_count(), board.step_count() + 1);
            assert_eq!(next.active_player(), board.active_player().opponent());
        }
    });
}

#[test]
fn test_copy_is_independent() {
    random_games(13, 20, |board, action| {
        if board.is_terminal() {
            return;
        }
        let original = *board;
        let mut copy = board.copy();
        copy.do_action(action).unwrap();
        assert_eq!(*board, original);
        assert_ne!(copy, original);
    });
}

#[test]
fn test_walls_only_accumulate() {
    random_games(17, 20, |board, action| {
        if board.is_terminal() {
            return;
        }
        let mut next = board.copy();
        next.do_action(action).unwrap();
        let (before, after) = (board.walls(), next.walls());
        assert_eq!(before.horizontal & !after.horizontal, 0);
        assert_eq!(before.vertical & !after.vertical, 0);
        assert_eq!(after.count(), before.count() + 1);
        assert_eq!(next.plane(7), board.plane(6));
    });
}

#[test]
fn test_terminal_boards_have_no_actions() {
    let mut terminals = 0;
    random_games(19, 30, |board, _| {
        if board.is_terminal() {
            terminals += 1;
            assert!(board.available_actions().is_empty());
            let mut probe = *board;
            for action in 0..NUM_ACTIONS as u8 {
                assert!(probe.do_action(action).is_err());
            }
        } else {
            assert!(board.num_available_actions() > 0);
        }
    });
    assert_eq!(terminals, 30);
}

#[test]
fn test_symmetry_round_trip() {
    let table = reflection_table();
    random_games(23, 30, |board, action| {
        let t = board.transposed();
        assert_eq!(t.transposed(), *board);
        assert_eq!(t.outcome(), board.outcome());
        if board.is_terminal() {
            return;
        }

        let reflected: Vec<u8> = board
            .available_actions()
            .into_iter()
            .map(|a| table[a as usize])
            .collect();
        let mut expected = t.available_actions();
        let mut reflected_sorted = reflected;
        reflected_sorted.sort_unstable();
        expected.sort_unstable();
        assert_eq!(reflected_sorted, expected);

        let mut after = board.copy();
        after.do_action(action).unwrap();
        let mut mirrored = t;
        mirrored.do_action(table[action as usize]).unwrap();
        assert_eq!(mirrored, after.transposed());
    });
}

#[test]
fn test_position_value_bounds() {
    let f = TerritoryFn::default();
    random_games(29, 20, |board, _| {
        let v = position_value(board, f);
        assert!((-1.0..=1.0).contains(&v), "value {} out of range", v);
        if let Some(outcome) = board.outcome() {
            assert_eq!(v, outcome.value_for(board.active_player()));
        }
    });
}

#[test]
fn test_record_replays_random_games() {
    let mut rng = ChaCha20Rng::seed_from_u64(31);
    for len in [3, 5, 7] {
        let mut board = Board::new(len).unwrap();
        let mut record = GameRecord::new(len);
        while !board.is_terminal() {
            let action = *board.available_actions().choose(&mut rng).unwrap();
            board.do_action(action).unwrap();
            record.push(action);
        }
        assert_eq!(record.replay().unwrap(), board);
        assert_eq!(record.notation().unwrap().len(), record.moves.len());
    }
}
