//! Maze generation using Recursive Backtracker algorithm
//!
//! Algorithm: Recursive Backtracker (DFS with backtracking)
//! 1. Start at (0, 0), mark as visited
//! 2. While stack is not empty:
//!    - Get unvisited neighbors of current cell
//!    - If neighbors exist:
//!      * Choose random neighbor
//!      * Remove wall between current and neighbor
//!      * Mark neighbor as visited, push current to stack
//!    - Else: backtrack (pop from stack)
//!
//! Walls live on the cells themselves, so a neighbour is one cell away. That
//! is the classic two-unit stride of the doubled grid (`Maze::to_binary_grid`)
//! expressed in cell coordinates; the doubled grid is only ever derived.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{MazeError, Result};
use crate::grid::{Cell, Direction, Maze, Position};
use crate::MAX_DIMENSION;

/// Round a requested side length up to the next odd number
///
/// Zero and anything above `MAX_DIMENSION` is rejected instead of clamped.
pub fn normalize_dimensions(width: usize, height: usize) -> Result<(usize, usize)> {
    let valid = |n: usize| (1..=MAX_DIMENSION).contains(&n);
    if !valid(width) || !valid(height) {
        return Err(MazeError::InvalidDimensions {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok((width | 1, height | 1))
}

/// Mutable maze under construction
///
/// Carving and item placement happen here; `build` freezes the result into
/// a `Maze` and clears the generation-only visited flags.
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MazeBuilder {
    /// Fully walled grid, dimensions forced odd
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let (width, height) = normalize_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::new(); width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    pub(crate) fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Open the passage between two adjacent cells on both sides
    ///
    /// Returns false, leaving the grid untouched, if the cells are not
    /// 4-adjacent or either lies outside the grid.
    pub fn carve(&mut self, a: Position, b: Position) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        let Some(dir) = a.direction_to(b) else {
            return false;
        };
        self.cell_mut(a).open(dir);
        self.cell_mut(b).open(dir.opposite());
        true
    }

    /// Carve a perfect maze over the whole grid with an explicit stack
    pub fn carve_backtracker<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut stack: Vec<Position> = Vec::with_capacity(self.width * self.height);
        let mut current = Position::new(0, 0);
        self.cell_mut(current).visited = true;
        let mut carved = 0usize;

        loop {
            let neighbors = self.unvisited_neighbors(current);

            if let Some(&(dir, next)) = neighbors.choose(rng) {
                self.cell_mut(current).open(dir);
                self.cell_mut(next).open(dir.opposite());
                self.cell_mut(next).visited = true;
                carved += 1;

                stack.push(current);
                current = next;
            } else {
                // Dead end: walk back until a cell with unvisited neighbours turns up
                match stack.pop() {
                    Some(prev) => current = prev,
                    None => break,
                }
            }
        }

        tracing::debug!(
            "Carved {} passages over {}x{} grid",
            carved,
            self.width,
            self.height
        );
    }

    /// Unvisited in-bounds neighbours with the direction leading to them
    fn unvisited_neighbors(&self, pos: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| pos.step(dir).map(|n| (dir, n)))
            .filter(|&(_, n)| self.in_bounds(n) && !self.cell(n).visited)
            .collect()
    }

    /// Reopen a finished maze for in-crate edits such as coin placement
    pub(crate) fn thaw(maze: Maze) -> Self {
        let (width, height, cells) = maze.into_parts();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Freeze into an immutable maze
    pub fn build(mut self) -> Maze {
        for cell in &mut self.cells {
            cell.visited = false;
        }
        Maze::from_cells(self.width, self.height, self.cells)
    }
}

/// Generate a perfect maze with the injected random source
///
/// # Arguments
/// * `width` - Number of cell columns, forced odd
/// * `height` - Number of cell rows, forced odd
/// * `rng` - Source of randomness; pass a seeded RNG for reproducible output
pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Result<Maze> {
    let mut builder = MazeBuilder::new(width, height)?;
    builder.carve_backtracker(rng);
    Ok(builder.build())
}

impl Maze {
    /// Generate a maze from a numeric seed
    ///
    /// Same seed and dimensions always give the same maze.
    pub fn generate_seeded(width: usize, height: usize, seed: u64) -> Result<Maze> {
        let mut rng = StdRng::seed_from_u64(seed);
        generate(width, height, &mut rng)
    }
}
