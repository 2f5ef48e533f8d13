//! Grid geometry: cell coordinates, bitboard cell sets and wall layers.
//!
//! Cells are indexed in row-major order (`row * len + col`) with row 0 at the
//! top. Every spatial layer of the board fits in a single `u64`, which caps the
//! side length at 8.

use serde::{Deserialize, Serialize};

/// Smallest supported board side.
pub const MIN_BOARD_LEN: usize = 2;
/// Largest supported board side (64 cells fill a `u64`).
pub const MAX_BOARD_LEN: usize = 8;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index of this cell on a board of side `len`.
    #[inline]
    pub const fn index(self, len: usize) -> usize {
        self.row * len + self.col
    }

    #[inline]
    pub const fn from_index(index: usize, len: usize) -> Self {
        Self {
            row: index / len,
            col: index % len,
        }
    }

    /// Cell displaced by `(dr, dc)`, or `None` if it falls off the board.
    pub fn offset(self, dr: i32, dc: i32, len: usize) -> Option<Cell> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if row < 0 || col < 0 || row >= len as i32 || col >= len as i32 {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }

    /// Transpose across the main diagonal.
    #[inline]
    pub const fn transposed(self) -> Self {
        Self {
            row: self.col,
            col: self.row,
        }
    }
}

/// A set of cells stored as a bitboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSet(u64);

impl CellSet {
    pub const EMPTY: CellSet = CellSet(0);

    #[inline]
    pub fn contains(self, index: usize) -> bool {
        (self.0 >> index) & 1 == 1
    }

    #[inline]
    pub fn insert(&mut self, index: usize) {
        self.0 |= 1u64 << index;
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the contained cell indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }

    /// Iterate over the contained cells as coordinates.
    pub fn cells(self, len: usize) -> impl Iterator<Item = Cell> {
        self.iter().map(move |i| Cell::from_index(i, len))
    }
}

/// Transpose a spatial bitboard across the main diagonal.
pub fn transpose_bits(bits: u64, len: usize) -> u64 {
    CellSet(bits)
        .cells(len)
        .fold(0u64, |acc, cell| acc | 1u64 << cell.transposed().index(len))
}

/// Edge of a cell on which a wall can stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Up, Wall::Left, Wall::Down, Wall::Right];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Wall> {
        match index {
            0 => Some(Wall::Up),
            1 => Some(Wall::Left),
            2 => Some(Wall::Down),
            3 => Some(Wall::Right),
            _ => None,
        }
    }

    /// Step taken when crossing this edge.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Wall::Up => (-1, 0),
            Wall::Left => (0, -1),
            Wall::Down => (1, 0),
            Wall::Right => (0, 1),
        }
    }

    /// The same edge after transposing the board.
    pub const fn transposed(self) -> Wall {
        match self {
            Wall::Up => Wall::Left,
            Wall::Left => Wall::Up,
            Wall::Down => Wall::Right,
            Wall::Right => Wall::Down,
        }
    }

    /// Single-letter form used in move notation.
    pub const fn letter(self) -> char {
        match self {
            Wall::Up => 'U',
            Wall::Left => 'L',
            Wall::Down => 'D',
            Wall::Right => 'R',
        }
    }

    pub fn from_letter(letter: char) -> Option<Wall> {
        match letter.to_ascii_uppercase() {
            'U' => Some(Wall::Up),
            'L' => Some(Wall::Left),
            'D' => Some(Wall::Down),
            'R' => Some(Wall::Right),
            _ => None,
        }
    }
}

/// One ply of wall occupancy.
///
/// A horizontal bit at `(r, c)` separates `(r, c)` from `(r + 1, c)`; a
/// vertical bit at `(r, c)` separates `(r, c)` from `(r, c + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Walls {
    pub horizontal: u64,
    pub vertical: u64,
}

/// Which wall layer an edge lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Horizontal,
    Vertical,
}

impl Walls {
    pub const NONE: Walls = Walls {
        horizontal: 0,
        vertical: 0,
    };

    /// Locate the layer bit for `wall` on `cell`, or `None` for the board rim.
    fn edge(len: usize, cell: Cell, wall: Wall) -> Option<(Layer, usize)> {
        match wall {
            Wall::Up if cell.row > 0 => {
                Some((Layer::Horizontal, Cell::new(cell.row - 1, cell.col).index(len)))
            }
            Wall::Left if cell.col > 0 => {
                Some((Layer::Vertical, Cell::new(cell.row, cell.col - 1).index(len)))
            }
            Wall::Down if cell.row + 1 < len => Some((Layer::Horizontal, cell.index(len))),
            Wall::Right if cell.col + 1 < len => Some((Layer::Vertical, cell.index(len))),
            _ => None,
        }
    }

    fn bits(&self, layer: Layer) -> u64 {
        match layer {
            Layer::Horizontal => self.horizontal,
            Layer::Vertical => self.vertical,
        }
    }

    /// Whether a wall stands on this edge of `cell`. The rim counts as a wall.
    pub fn blocks(&self, len: usize, cell: Cell, wall: Wall) -> bool {
        match Self::edge(len, cell, wall) {
            Some((layer, index)) => (self.bits(layer) >> index) & 1 == 1,
            None => true,
        }
    }

    /// Whether a new wall can be placed on this edge of `cell`.
    ///
    /// The edge must lie inside the board and be free. This is exactly the
    /// condition for the edge being passable.
    #[inline]
    pub fn placeable(&self, len: usize, cell: Cell, wall: Wall) -> bool {
        !self.blocks(len, cell, wall)
    }

    /// Neighbor reached by crossing `wall`, if the edge is open.
    pub fn step(&self, len: usize, cell: Cell, wall: Wall) -> Option<Cell> {
        if self.blocks(len, cell, wall) {
            return None;
        }
        let (dr, dc) = wall.delta();
        cell.offset(dr, dc, len)
    }

    /// Set the wall bit for this edge. Returns false for rim edges.
    pub fn place(&mut self, len: usize, cell: Cell, wall: Wall) -> bool {
        match Self::edge(len, cell, wall) {
            Some((Layer::Horizontal, index)) => {
                self.horizontal |= 1u64 << index;
                true
            }
            Some((Layer::Vertical, index)) => {
                self.vertical |= 1u64 << index;
                true
            }
            None => false,
        }
    }

    pub fn count(&self) -> u32 {
        self.horizontal.count_ones() + self.vertical.count_ones()
    }

    /// Reflect across the main diagonal: layers transpose and swap roles.
    pub fn transposed(&self, len: usize) -> Walls {
        Walls {
            horizontal: transpose_bits(self.vertical, len),
            vertical: transpose_bits(self.horizontal, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_roundtrip() {
        let cell = Cell::new(3, 5);
        assert_eq!(cell.index(7), 26);
        assert_eq!(Cell::from_index(26, 7), cell);
    }

    #[test]
    fn test_cell_offset_bounds() {
        let corner = Cell::new(0, 0);
        assert_eq!(corner.offset(-1, 0, 7), None);
        assert_eq!(corner.offset(0, 3, 7), Some(Cell::new(0, 3)));
        assert_eq!(Cell::new(6, 6).offset(1, 0, 7), None);
    }

    #[test]
    fn test_cell_set_iter() {
        let mut set = CellSet::EMPTY;
        set.insert(0);
        set.insert(9);
        set.insert(48);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 9, 48]);
        assert!(set.contains(9));
        assert!(!set.contains(10));
    }

    #[test]
    fn test_wall_edges_shared_between_neighbors() {
        let mut walls = Walls::NONE;
        assert!(walls.place(7, Cell::new(2, 3), Wall::Down));
        // The same edge seen from the cell below
        assert!(walls.blocks(7, Cell::new(3, 3), Wall::Up));
        assert!(!walls.blocks(7, Cell::new(3, 3), Wall::Left));

        assert!(walls.place(7, Cell::new(2, 3), Wall::Left));
        assert!(walls.blocks(7, Cell::new(2, 2), Wall::Right));
        assert_eq!(walls.count(), 2);
    }

    #[test]
    fn test_rim_is_not_placeable() {
        let walls = Walls::NONE;
        assert!(!walls.placeable(7, Cell::new(0, 0), Wall::Up));
        assert!(!walls.placeable(7, Cell::new(0, 0), Wall::Left));
        assert!(walls.placeable(7, Cell::new(0, 0), Wall::Down));
        assert!(!walls.placeable(7, Cell::new(6, 6), Wall::Right));
        let mut walls = walls;
        assert!(!walls.place(7, Cell::new(6, 6), Wall::Down));
    }

    #[test]
    fn test_transpose_swaps_layers() {
        let mut walls = Walls::NONE;
        walls.place(5, Cell::new(1, 3), Wall::Down);
        let t = walls.transposed(5);
        assert_eq!(t.horizontal, 0);
        assert!(t.blocks(5, Cell::new(3, 1), Wall::Right));
        assert_eq!(t.transposed(5), walls);
    }

    #[test]
    fn test_wall_letters() {
        for wall in Wall::ALL {
            assert_eq!(Wall::from_letter(wall.letter()), Some(wall));
            assert_eq!(Wall::from_index(wall.index()), Some(wall));
            assert_eq!(wall.transposed().transposed(), wall);
        }
        assert_eq!(Wall::from_letter('x'), None);
    }
}
