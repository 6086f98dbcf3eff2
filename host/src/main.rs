use host::{generate_level, load_moves, replay_moves, save_json, HostConfig};
use maze_core::Difficulty;
use std::env;
use std::time::Instant;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let difficulty: Difficulty = args[2].parse().unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    });

    // Remaining arguments: flags plus positional values
    let (mut config, positional) = parse_options(&args[3..]).unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    });
    config.difficulty = difficulty;

    match command {
        "generate" => {
            let output_file = positional.first().map(|s| s.as_str());
            generate_command(&config, output_file);
        }

        "solve" => solve_command(&config),

        "replay" => {
            let Some(moves_file) = positional.first() else {
                eprintln!(
                    "Usage: {} replay <difficulty> <moves_file> [--seed <n>] [--config <file>]",
                    args[0]
                );
                eprintln!("Error: Missing required arguments");
                std::process::exit(1);
            };
            let output_file = positional.get(1).map(|s| s.as_str());
            replay_command(&config, moves_file, output_file);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

/// Split `--seed`/`--config` flags from positional arguments
///
/// `--config` is applied first so that `--seed` always wins over the file.
fn parse_options(args: &[String]) -> Result<(HostConfig, Vec<String>), Box<dyn std::error::Error>> {
    let mut config_file = None;
    let mut seed = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config requires a file path")?;
                config_file = Some(path.clone());
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed requires a value")?;
                let parsed: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid seed '{}'. Must be a positive integer.", value))?;
                seed = Some(parsed);
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut config = match config_file {
        Some(path) => HostConfig::load(&path)?,
        None => HostConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }

    Ok((config, positional))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> <difficulty> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate <difficulty> [--seed <n>] [--config <file>] [output_file]");
    eprintln!("      Generate a level and print it");
    eprintln!("      - output_file: Optional file to save the level (JSON)");
    eprintln!();
    eprintln!("  solve <difficulty> [--seed <n>] [--config <file>]");
    eprintln!("      Print the level with its solution as direction codes");
    eprintln!();
    eprintln!("  replay <difficulty> <moves_file> [--seed <n>] [--config <file>] [output_file]");
    eprintln!("      Play a JSON array of moves (0=up, 1=right, 2=down, 3=left) and score it");
    eprintln!("      - output_file: Optional file to save the replay report (JSON)");
    eprintln!();
    eprintln!("Difficulties: easy (11x11), medium (17x17), hard (23x23), expert (31x31)");
    eprintln!();
    eprintln!(
        "Without --seed the {} environment variable is used, else a random seed.",
        host::SEED_ENV_VAR
    );
    eprintln!("Set RUST_LOG=debug for generator and solver details.");
}

fn generate_command(config: &HostConfig, output_file: Option<&str>) {
    let start = Instant::now();

    match generate_level(config) {
        Ok(level) => {
            println!("{}", level.ascii);
            println!(
                "✅ Generated {} maze ({}x{}) in {:.2}ms",
                level.difficulty,
                level.width,
                level.height,
                start.elapsed().as_secs_f64() * 1000.0
            );
            println!("  Seed: {}", level.seed);
            println!("  Solution length: {} steps", level.solution_moves.len());
            println!("  Coins: {}", level.coins.len());

            if let Some(path) = output_file {
                match save_json(&level, path) {
                    Ok(_) => println!("💾 Level saved to: {}", path),
                    Err(e) => {
                        eprintln!("❌ Error saving level: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("❌ Error generating maze: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_command(config: &HostConfig) {
    match generate_level(config) {
        Ok(level) => {
            println!("{}", level.ascii);
            println!("  Seed: {}", level.seed);
            println!("  Solution ({} steps):", level.solution_moves.len());
            match serde_json::to_string(&level.solution_moves) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("❌ Error encoding solution: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("❌ Error generating maze: {}", e);
            std::process::exit(1);
        }
    }
}

fn replay_command(config: &HostConfig, moves_file: &str, output_file: Option<&str>) {
    let moves = match load_moves(moves_file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ Error loading moves: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 Loaded {} moves", moves.len());

    match replay_moves(config, &moves) {
        Ok(report) => {
            println!("  Seed: {}", report.seed);
            println!("  Reached exit: {}", if report.reached_exit { "Yes ✓" } else { "No ✗" });
            println!(
                "  Moves: {} accepted, {} rejected",
                report.moves_accepted, report.moves_rejected
            );
            println!("  Coins collected: {}", report.items_collected);
            println!("  Elapsed: {} ms", report.elapsed_ms);
            if let Some(score) = report.score {
                println!("🎊 Score: {}", score);
            }

            if let Some(path) = output_file {
                if let Err(e) = save_json(&report, path) {
                    eprintln!("❌ Error saving replay report: {}", e);
                    std::process::exit(1);
                }
                println!("💾 Replay report saved to: {}", path);
            }
        }
        Err(e) => {
            eprintln!("❌ Error replaying moves: {}", e);
            std::process::exit(1);
        }
    }
}
