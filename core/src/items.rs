//! Coin placement
//!
//! Coins go only on carved cells off the solution path, one for every ten
//! candidates (rounded down), drawn without replacement. Keeping them off the
//! solution means collecting is a detour, never a side effect of the fastest
//! route.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Item, Maze, Position};
use crate::maze_gen::MazeBuilder;

/// One coin per this many candidate cells
pub const ITEM_DENSITY_DIVISOR: usize = 10;

/// Cells eligible to hold a coin
pub fn item_candidates(maze: &Maze, solution: &[Position]) -> Vec<Position> {
    let on_path: HashSet<Position> = solution.iter().copied().collect();
    maze.positions()
        .filter(|pos| !on_path.contains(pos))
        .filter(|&pos| maze.cell(pos).is_some_and(|cell| cell.is_carved()))
        .collect()
}

/// Scatter coins and return the re-frozen maze with the number placed
pub fn place_items<R: Rng + ?Sized>(
    maze: Maze,
    solution: &[Position],
    rng: &mut R,
) -> (Maze, usize) {
    let candidates = item_candidates(&maze, solution);
    let count = candidates.len() / ITEM_DENSITY_DIVISOR;

    let mut builder = MazeBuilder::thaw(maze);
    for &pos in candidates.choose_multiple(rng, count) {
        builder.cell_mut(pos).item = Some(Item::Coin);
    }

    tracing::debug!(
        "Placed {} coins over {} candidate cells",
        count,
        candidates.len()
    );

    (builder.build(), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::solve;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coins(maze: &Maze) -> Vec<Position> {
        maze.positions()
            .filter(|&p| maze.cell(p).unwrap().item.is_some())
            .collect()
    }

    #[test]
    fn test_no_coin_on_solution() {
        for seed in 0..10u64 {
            let maze = Maze::generate_seeded(23, 23, seed).unwrap();
            let solution = solve(&maze);
            let mut rng = StdRng::seed_from_u64(seed);
            let (maze, placed) = place_items(maze, &solution, &mut rng);

            let placed_at = coins(&maze);
            assert_eq!(placed_at.len(), placed);
            assert!(placed_at.iter().all(|p| !solution.contains(p)));
        }
    }

    #[test]
    fn test_count_is_tenth_of_candidates() {
        let maze = Maze::generate_seeded(31, 31, 8).unwrap();
        let solution = solve(&maze);
        // Every cell of a perfect maze is carved
        let candidates = item_candidates(&maze, &solution);
        assert_eq!(candidates.len(), 31 * 31 - solution.len());

        let mut rng = StdRng::seed_from_u64(8);
        let (_, placed) = place_items(maze, &solution, &mut rng);
        assert_eq!(placed, candidates.len() / 10);
    }

    #[test]
    fn test_uncarved_cells_are_skipped() {
        // 3x3 with a single corridor along the top row and down the right side
        let mut builder = MazeBuilder::new(3, 3).unwrap();
        builder.carve(Position::new(0, 0), Position::new(1, 0));
        builder.carve(Position::new(1, 0), Position::new(2, 0));
        builder.carve(Position::new(2, 0), Position::new(2, 1));
        builder.carve(Position::new(2, 1), Position::new(2, 2));
        let maze = builder.build();
        let solution = solve(&maze);

        assert!(item_candidates(&maze, &solution).is_empty());
    }

    #[test]
    fn test_placement_is_deterministic() {
        let maze = Maze::generate_seeded(17, 17, 5).unwrap();
        let solution = solve(&maze);

        let (a, _) = place_items(maze.clone(), &solution, &mut StdRng::seed_from_u64(1));
        let (b, _) = place_items(maze, &solution, &mut StdRng::seed_from_u64(1));
        assert_eq!(coins(&a), coins(&b));
    }
}
