//! Reachability and territory evaluation over the wall graph.
//!
//! The same breadth-first flood fill backs three things:
//! - move generation (bounded to three hops, opponent blocks),
//! - termination and final scoring (unbounded, opponent ignored),
//! - the territory heuristic used by search and greedy agents.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::grid::{Cell, CellSet, Wall, Walls, MAX_BOARD_LEN};

/// Cells reachable from `from` through open edges.
///
/// `blocker` is a cell that may not be entered (the opponent during normal
/// play). `max_steps` bounds the number of hops; `None` floods the whole
/// component.
pub fn reachable(
    len: usize,
    from: Cell,
    walls: &Walls,
    blocker: Option<Cell>,
    max_steps: Option<u32>,
) -> CellSet {
    let mut visited = CellSet::EMPTY;
    visited.insert(from.index(len));
    let mut queue = VecDeque::from([(from, 0u32)]);

    while let Some((cell, depth)) = queue.pop_front() {
        if max_steps.is_some_and(|max| depth >= max) {
            continue;
        }
        for wall in Wall::ALL {
            let Some(next) = walls.step(len, cell, wall) else {
                continue;
            };
            let index = next.index(len);
            if visited.contains(index) || blocker == Some(next) {
                continue;
            }
            visited.insert(index);
            queue.push_back((next, depth + 1));
        }
    }

    visited
}

/// Whether `a` and `b` lie in the same component of the wall graph.
///
/// Stops as soon as `b` is found.
pub fn connected(len: usize, a: Cell, b: Cell, walls: &Walls) -> bool {
    if a == b {
        return true;
    }
    let target = b.index(len);
    let mut visited = CellSet::EMPTY;
    visited.insert(a.index(len));
    let mut queue = VecDeque::from([a]);

    while let Some(cell) = queue.pop_front() {
        for wall in Wall::ALL {
            let Some(next) = walls.step(len, cell, wall) else {
                continue;
            };
            let index = next.index(len);
            if index == target {
                return true;
            }
            if !visited.contains(index) {
                visited.insert(index);
                queue.push_back(next);
            }
        }
    }

    false
}

/// Hop distance from one cell to every cell of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    len: usize,
    dist: [i32; MAX_BOARD_LEN * MAX_BOARD_LEN],
}

impl DistanceMap {
    /// Distance to `cell`, or -1 if unreachable.
    #[inline]
    pub fn get(&self, cell: Cell) -> i32 {
        self.dist[cell.index(self.len)]
    }

    #[inline]
    pub fn at(&self, index: usize) -> i32 {
        self.dist[index]
    }

    /// All cells with a non-negative distance.
    pub fn reachable(&self) -> CellSet {
        (0..self.len * self.len)
            .filter(|&i| self.dist[i] >= 0)
            .fold(CellSet::EMPTY, |mut set, i| {
                set.insert(i);
                set
            })
    }

    /// Distances as a row-major grid.
    pub fn to_grid(&self) -> Vec<Vec<i32>> {
        (0..self.len)
            .map(|r| self.dist[r * self.len..(r + 1) * self.len].to_vec())
            .collect()
    }
}

/// BFS flood fill from `from` over the open wall graph.
///
/// The opponent is not an obstacle here: territory is measured as if each
/// player walked alone.
pub fn distance_map(len: usize, from: Cell, walls: &Walls) -> DistanceMap {
    let mut dist = [-1i32; MAX_BOARD_LEN * MAX_BOARD_LEN];
    dist[from.index(len)] = 0;
    let mut queue = VecDeque::from([from]);

    while let Some(cell) = queue.pop_front() {
        let here = dist[cell.index(len)];
        for wall in Wall::ALL {
            if let Some(next) = walls.step(len, cell, wall) {
                let slot = &mut dist[next.index(len)];
                if *slot < 0 {
                    *slot = here + 1;
                    queue.push_back(next);
                }
            }
        }
    }

    DistanceMap { len, dist }
}

/// Contested-cell ownership curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerritoryFn {
    /// `1 / (1 + exp(k * (mine - theirs) + b))`
    Sigmoid { k: f32, b: f32 },
    /// 1 if closer, 0.5 on a tie, 0 if farther.
    Step,
}

impl TerritoryFn {
    pub const DEFAULT_K: f32 = 2.0;
    pub const DEFAULT_B: f32 = 2.0;

    pub fn sigmoid(k: f32, b: f32) -> Self {
        TerritoryFn::Sigmoid { k, b }
    }
}

impl Default for TerritoryFn {
    fn default() -> Self {
        TerritoryFn::Sigmoid {
            k: Self::DEFAULT_K,
            b: Self::DEFAULT_B,
        }
    }
}

/// Estimated share of a cell owned by the player at `my_distance`.
pub fn cell_value(my_distance: i32, enemy_distance: i32, f: TerritoryFn) -> f32 {
    if my_distance == -1 {
        return 0.0;
    }
    if enemy_distance == -1 {
        return 1.0;
    }
    match f {
        TerritoryFn::Sigmoid { k, b } => {
            1.0 / (1.0 + (k * (my_distance - enemy_distance) as f32 + b).exp())
        }
        TerritoryFn::Step => match my_distance.cmp(&enemy_distance) {
            std::cmp::Ordering::Less => 1.0,
            std::cmp::Ordering::Equal => 0.5,
            std::cmp::Ordering::Greater => 0.0,
        },
    }
}

/// Heuristic value of `board` for the player to move, in `[-1, 1]`.
///
/// Terminal positions score their exact result. Otherwise the active
/// player's summed cell values minus the opponent's, normalized by the
/// number of cells at least one side can reach.
pub fn position_value(board: &Board, f: TerritoryFn) -> f32 {
    let me = board.active_player();
    if let Some(outcome) = board.outcome() {
        return outcome.value_for(me);
    }

    let len = board.len();
    let walls = board.walls();
    let mine = distance_map(len, board.position(me), &walls);
    let theirs = distance_map(len, board.position(me.opponent()), &walls);

    let mut my_terr = 0.0f32;
    let mut their_terr = 0.0f32;
    let mut contested = 0usize;
    for i in 0..len * len {
        let (d_me, d_them) = (mine.at(i), theirs.at(i));
        if d_me < 0 && d_them < 0 {
            continue;
        }
        contested += 1;
        my_terr += cell_value(d_me, d_them, f);
        their_terr += cell_value(d_them, d_me, f);
    }

    if contested == 0 {
        return 0.0;
    }
    (my_terr - their_terr) / contested as f32
}
