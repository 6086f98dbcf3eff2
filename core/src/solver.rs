//! A* path solver over carved passages
//!
//! Edges are the open walls of the maze, every step costs 1 and the
//! heuristic is Manhattan distance to the goal, which never overestimates on
//! a 4-connected grid. Frontier ties on `f` fall back to insertion order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{Direction, Maze, Position};

/// Entrance-to-exit route, both ends included
///
/// Empty only when the maze is not connected.
pub fn solve(maze: &Maze) -> Vec<Position> {
    solve_from(maze, maze.entrance(), maze.exit())
}

/// Shortest route between two cells, both ends included
pub fn solve_from(maze: &Maze, start: Position, goal: Position) -> Vec<Position> {
    if !maze.in_bounds(start) || !maze.in_bounds(goal) {
        return Vec::new();
    }

    let cells = maze.width() * maze.height();
    let mut g_score = vec![usize::MAX; cells];
    let mut came_from: Vec<Option<Position>> = vec![None; cells];
    let mut closed = vec![false; cells];

    // (f, insertion order, position); Reverse turns the max-heap into a min-heap
    let mut open = BinaryHeap::new();
    let mut counter = 0u64;

    g_score[maze.index(start)] = 0;
    open.push(Reverse((start.manhattan(goal), counter, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal {
            let path = reconstruct(maze, &came_from, goal);
            tracing::debug!("Solved {} -> {} in {} steps", start, goal, path.len() - 1);
            return path;
        }

        let idx = maze.index(current);
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        let tentative = g_score[idx] + 1;
        for next in maze.open_neighbors(current) {
            let n_idx = maze.index(next);
            if tentative < g_score[n_idx] {
                g_score[n_idx] = tentative;
                came_from[n_idx] = Some(current);
                counter += 1;
                open.push(Reverse((tentative + next.manhattan(goal), counter, next)));
            }
        }
    }

    tracing::debug!("No path from {} to {}", start, goal);
    Vec::new()
}

fn reconstruct(maze: &Maze, came_from: &[Option<Position>], goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[maze.index(current)] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Directions walked along a path of adjacent positions
///
/// Stops at the first pair that is not adjacent.
pub fn directions_along(path: &[Position]) -> Vec<Direction> {
    path.windows(2)
        .map_while(|pair| pair[0].direction_to(pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze_gen::MazeBuilder;
    use std::collections::{HashSet, VecDeque};

    fn bfs_distance(maze: &Maze, start: Position, goal: Position) -> Option<usize> {
        let mut dist = vec![usize::MAX; maze.width() * maze.height()];
        let mut queue = VecDeque::from([start]);
        dist[maze.index(start)] = 0;

        while let Some(pos) = queue.pop_front() {
            if pos == goal {
                return Some(dist[maze.index(pos)]);
            }
            for next in maze.open_neighbors(pos) {
                if dist[maze.index(next)] == usize::MAX {
                    dist[maze.index(next)] = dist[maze.index(pos)] + 1;
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Comb maze: open top row, every column open top to bottom
    fn comb(side: usize) -> Maze {
        let mut builder = MazeBuilder::new(side, side).unwrap();
        for x in 0..side - 1 {
            builder.carve(Position::new(x, 0), Position::new(x + 1, 0));
        }
        for x in 0..side {
            for y in 0..side - 1 {
                builder.carve(Position::new(x, y), Position::new(x, y + 1));
            }
        }
        builder.build()
    }

    #[test]
    fn test_solution_endpoints_and_adjacency() {
        let maze = Maze::generate_seeded(17, 17, 31337).unwrap();
        let path = solve(&maze);

        assert_eq!(path.first(), Some(&maze.entrance()));
        assert_eq!(path.last(), Some(&maze.exit()));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
            assert!(!maze.wall_between(pair[0], pair[1]));
        }

        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn test_matches_bfs_length() {
        for seed in 0..20u64 {
            let maze = Maze::generate_seeded(23, 23, seed).unwrap();
            let path = solve(&maze);
            let expected = bfs_distance(&maze, maze.entrance(), maze.exit()).unwrap();
            assert_eq!(path.len() - 1, expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_easy_scenario() {
        let maze = Maze::generate_seeded(11, 11, 2024).unwrap();
        assert_eq!(maze.open_edge_count(), 120);

        let path = solve(&maze);
        assert!(path.len() - 1 >= 20);
    }

    #[test]
    fn test_exact_manhattan_route() {
        let maze = comb(11);
        let path = solve(&maze);
        assert_eq!(path.len() - 1, 20);
        assert_eq!(maze.open_edge_count(), 120);
    }

    #[test]
    fn test_unsolvable_returns_empty() {
        let mut builder = MazeBuilder::new(3, 3).unwrap();
        builder.carve(Position::new(0, 0), Position::new(1, 0));
        let maze = builder.build();
        assert!(solve(&maze).is_empty());
    }

    #[test]
    fn test_solve_from_midpoint() {
        let maze = comb(5);
        let path = solve_from(&maze, Position::new(2, 4), Position::new(4, 4));
        // Up the column, across the top, down the last column
        assert_eq!(path.len() - 1, 4 + 2 + 4);
        assert!(solve_from(&maze, Position::new(9, 9), maze.exit()).is_empty());
    }

    #[test]
    fn test_start_equals_goal() {
        let maze = comb(3);
        let p = Position::new(1, 1);
        assert_eq!(solve_from(&maze, p, p), vec![p]);
    }

    #[test]
    fn test_directions_along() {
        let path = [
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(0, 0),
        ];
        assert_eq!(
            directions_along(&path),
            vec![Direction::Right, Direction::Down, Direction::Left, Direction::Up]
        );
    }
}
