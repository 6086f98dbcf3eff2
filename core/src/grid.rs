//! Grid model: cells, walls and adjacency
//!
//! Cells are stored row-major and carry their own four wall flags. A passage
//! between two adjacent cells is open only when both facing flags are cleared;
//! the builder in `maze_gen` always clears them in pairs.
//!
//! Coordinates are `(x, y)` with `x` growing right and `y` growing down. The
//! entrance is the top-left cell, the exit the bottom-right one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate inside a maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The coordinate one step away in `dir`
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the maze's business, see `Maze::in_bounds`.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Position { x, y })
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction leading from `self` to an adjacent `other`
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.step(dir) == Some(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four movement directions
///
/// The numeric codes (0=up, 1=right, 2=down, 3=left) are what serialized
/// move lists use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        Direction::ALL.get(code as usize).copied()
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Reward item that can sit on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Coin,
}

/// A single maze cell with walls in four directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    walls: [bool; 4], // [UP, RIGHT, DOWN, LEFT]
    #[serde(skip)]
    pub(crate) visited: bool,
    pub item: Option<Item>,
}

impl Cell {
    pub(crate) fn new() -> Self {
        Self {
            walls: [true, true, true, true], // All walls present initially
            visited: false,
            item: None,
        }
    }

    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls[dir.index()]
    }

    pub(crate) fn open(&mut self, dir: Direction) {
        self.walls[dir.index()] = false;
    }

    pub fn top(&self) -> bool {
        self.has_wall(Direction::Up)
    }

    pub fn right(&self) -> bool {
        self.has_wall(Direction::Right)
    }

    pub fn bottom(&self) -> bool {
        self.has_wall(Direction::Down)
    }

    pub fn left(&self) -> bool {
        self.has_wall(Direction::Left)
    }

    /// True when at least one wall was carved away
    pub fn is_carved(&self) -> bool {
        self.walls.iter().any(|&w| !w)
    }
}

/// A finished, read-only maze
///
/// Only `MazeBuilder::build` produces values of this type, so every `Maze`
/// in circulation is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub(crate) fn into_parts(self) -> (usize, usize, Vec<Cell>) {
        (self.width, self.height, self.cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn entrance(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn exit(&self) -> Position {
        Position::new(self.width - 1, self.height - 1)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if self.in_bounds(pos) {
            self.cells.get(self.index(pos))
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every position, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Whether the wall shared by two adjacent cells is present
    ///
    /// Reads the flag on `a`'s side facing `b`. Pairs that are not
    /// 4-adjacent, or that fall outside the maze, count as walled.
    pub fn wall_between(&self, a: Position, b: Position) -> bool {
        debug_assert_eq!(a.manhattan(b), 1, "wall_between on non-adjacent cells");
        match (self.cell(a), a.direction_to(b)) {
            (Some(cell), Some(dir)) if self.in_bounds(b) => cell.has_wall(dir),
            _ => true,
        }
    }

    /// In-bounds 4-neighbours, ignoring walls
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| pos.step(dir))
            .filter(|&n| self.in_bounds(n))
            .collect()
    }

    /// Neighbours reachable through an open wall
    pub fn open_neighbors(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos)
            .into_iter()
            .filter(|&n| !self.wall_between(pos, n))
            .collect()
    }

    /// Number of carved passages, each shared edge counted once
    pub fn open_edge_count(&self) -> usize {
        self.positions()
            .map(|pos| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter_map(|dir| pos.step(dir))
                    .filter(|&n| self.in_bounds(n) && !self.wall_between(pos, n))
                    .count()
            })
            .sum()
    }

    /// Doubled-resolution view of the maze
    ///
    /// Creates a grid where:
    /// - 0 = wall
    /// - 1 = path (walkable cell or open passage)
    ///
    /// The grid is `(height*2 + 1)` rows by `(width*2 + 1)` columns and the
    /// cell at `(x, y)` sits at row `y*2+1`, column `x*2+1`.
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; self.width * 2 + 1]; self.height * 2 + 1];

        for pos in self.positions() {
            let cell = &self.cells[self.index(pos)];
            let gr = pos.y * 2 + 1;
            let gc = pos.x * 2 + 1;

            grid[gr][gc] = 1;

            if !cell.has_wall(Direction::Up) {
                grid[gr - 1][gc] = 1;
            }
            if !cell.has_wall(Direction::Down) {
                grid[gr + 1][gc] = 1;
            }
            if !cell.has_wall(Direction::Right) {
                grid[gr][gc + 1] = 1;
            }
            if !cell.has_wall(Direction::Left) {
                grid[gr][gc - 1] = 1;
            }
        }

        grid
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.to_binary_grid().iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                let glyph = match tile {
                    0 => '#',
                    _ if r % 2 == 1 && c % 2 == 1 => {
                        let pos = Position::new(c / 2, r / 2);
                        match self.cell(pos).and_then(|cell| cell.item) {
                            Some(Item::Coin) => '$',
                            None if pos == self.entrance() => 'S',
                            None if pos == self.exit() => 'E',
                            None => ' ',
                        }
                    }
                    _ => ' ',
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
