use host::{generate_level, load_moves, replay_moves, save_json, HostConfig};
use maze_core::{Difficulty, ScoringConfig};

/// The known maze seed for testing
const MAZE_SEED: u64 = 2918957128;

fn config(difficulty: Difficulty) -> HostConfig {
    HostConfig {
        difficulty,
        seed: Some(MAZE_SEED),
        ..HostConfig::default()
    }
}

#[test]
fn test_generated_level_shape() {
    let level = generate_level(&config(Difficulty::Easy)).expect("Maze generation failed");

    assert_eq!(level.seed, MAZE_SEED);
    assert_eq!((level.width, level.height), (11, 11));
    assert_eq!(level.grid.len(), 23);
    assert!(level.grid.iter().all(|row| row.len() == 23));

    // Start and end are paths, outer corners are walls
    assert_eq!(level.grid[1][1], 1);
    assert_eq!(level.grid[21][21], 1);
    assert_eq!(level.grid[0][0], 0);
    assert_eq!(level.grid[22][22], 0);

    assert_eq!(level.solution_moves.len() + 1, level.solution.len());
    assert!(level.solution_moves.len() >= 20);
    assert!(level.coins.iter().all(|c| !level.solution.contains(c)));
}

#[test]
fn test_generation_is_reproducible() {
    let a = generate_level(&config(Difficulty::Hard)).unwrap();
    let b = generate_level(&config(Difficulty::Hard)).unwrap();
    assert_eq!(a.grid, b.grid);
    assert_eq!(a.coins, b.coins);
}

#[test]
fn test_valid_solution_replay() {
    let cfg = config(Difficulty::Medium);
    let level = generate_level(&cfg).unwrap();

    let report = replay_moves(&cfg, &level.solution_moves).expect("Replay failed");

    assert!(report.reached_exit, "Solution should reach the exit");
    assert_eq!(report.moves_rejected, 0);
    assert_eq!(report.moves_accepted as usize, level.solution_moves.len());
    assert_eq!(report.items_collected, 0);

    let expected = ScoringConfig::default().score(
        &maze_core::RunSummary {
            elapsed_ms: report.elapsed_ms,
            moves: report.moves_accepted,
            items_collected: 0,
            running_score: 0,
            phase: maze_core::RunPhase::Won,
        },
        Difficulty::Medium,
    );
    assert_eq!(report.score, Some(expected));

    let win = report.win.expect("Win should be reported");
    assert_eq!(win.total_completed, 1);
    assert_eq!(win.best_time_ms, report.elapsed_ms);
}

#[test]
fn test_partial_solution() {
    let cfg = config(Difficulty::Easy);
    let level = generate_level(&cfg).unwrap();

    let half = &level.solution_moves[..level.solution_moves.len() / 2];
    let report = replay_moves(&cfg, half).unwrap();

    assert!(!report.reached_exit);
    assert_eq!(report.score, None);
    assert!(report.win.is_none());
}

#[test]
fn test_invalid_moves() {
    // Up and left from the entrance always hit the outer wall; 7 is not a direction
    let report = replay_moves(&config(Difficulty::Easy), &[0, 3, 0, 3, 7]).unwrap();

    assert!(!report.reached_exit);
    assert_eq!(report.moves_accepted, 0);
    assert_eq!(report.moves_rejected, 5);
    assert_eq!(report.elapsed_ms, 0);
}

#[test]
fn test_moves_after_exit_are_rejected() {
    let cfg = config(Difficulty::Easy);
    let level = generate_level(&cfg).unwrap();

    let mut moves = level.solution_moves.clone();
    moves.extend([0, 1, 2, 3]);
    let report = replay_moves(&cfg, &moves).unwrap();
    let clean = replay_moves(&cfg, &level.solution_moves).unwrap();

    assert!(report.reached_exit);
    assert_eq!(report.moves_rejected, 4);
    assert_eq!(report.score, clean.score);
    assert_eq!(report.elapsed_ms, clean.elapsed_ms);
}

#[test]
fn test_moves_file_round_trip() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("maze_moves_{}.json", std::process::id()));
    let path = path.to_str().unwrap();

    save_json(&vec![1u8, 2, 1, 2], path).unwrap();
    assert_eq!(load_moves(path).unwrap(), vec![1, 2, 1, 2]);

    save_json(&Vec::<u8>::new(), path).unwrap();
    assert!(load_moves(path).is_err());

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_config_file() {
    let path = std::env::temp_dir().join(format!("maze_config_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"difficulty": "expert", "seed": 42, "scoring": {"item_bonus": 75}}"#,
    )
    .unwrap();

    let config = HostConfig::load(&path).unwrap();
    assert_eq!(config.difficulty, Difficulty::Expert);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.scoring.item_bonus, 75);
    assert_eq!(config.scoring.easy, ScoringConfig::default().easy);
    assert_eq!(config.move_interval_ms(), host::DEFAULT_MOVE_INTERVAL_MS);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_file_rejects_huge_interval() {
    let path = std::env::temp_dir().join(format!("maze_interval_{}.json", std::process::id()));
    std::fs::write(&path, r#"{"seed": 42, "move_interval_ms": 18446744073709551615}"#).unwrap();

    let result = HostConfig::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(result.is_err());
}

#[test]
fn test_replay_rejects_out_of_range_config() {
    let huge_interval = HostConfig {
        move_interval_ms: Some(u64::MAX),
        ..config(Difficulty::Easy)
    };
    assert!(replay_moves(&huge_interval, &[1, 1, 2]).is_err());

    let mut huge_bonus = config(Difficulty::Expert);
    huge_bonus.scoring.item_bonus = u64::MAX / 2;
    assert!(replay_moves(&huge_bonus, &[1]).is_err());
}

#[test]
fn test_replay_at_max_interval() {
    let cfg = HostConfig {
        move_interval_ms: Some(host::MAX_MOVE_INTERVAL_MS),
        ..config(Difficulty::Easy)
    };
    let level = generate_level(&cfg).unwrap();
    let report = replay_moves(&cfg, &level.solution_moves).unwrap();
    assert!(report.reached_exit);
    assert!(report.score.is_some());
}
