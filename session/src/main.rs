use maze_core::{format_time, Direction, GameConfig, Maze};
use maze_session::render::{render_ascii, render_svg, Layout};
use maze_session::{generate_maze, GameController, MemoryTransport, SessionSnapshot};
use std::env;
use std::fs;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "generate-maze" => generate_maze_command(&args),
        "render" => render_command(&args),
        "solve" => solve_command(&args),
        "replay" => replay_command(&args),
        command => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate-maze <seed> [--size <W>x<H>] [output_file]");
    eprintln!("      Generate a maze, print it, and save its snapshot as JSON");
    eprintln!("      - output_file defaults to <seed>_maze.json");
    eprintln!();
    eprintln!("  render <seed> [output_file]");
    eprintln!("      Render the maze as SVG (defaults to <seed>_maze.svg)");
    eprintln!();
    eprintln!("  solve <seed>");
    eprintln!("      Print the shortest move list from start to goal as JSON");
    eprintln!();
    eprintln!("  replay <seed> <moves_file>");
    eprintln!("      Replay a JSON array of moves (\"up\", \"right\", \"down\", \"left\")");
    eprintln!("      and report whether they solve the maze");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. {} generate-maze 2918957128", program);
    eprintln!("  2. {} solve 2918957128 > moves.json", program);
    eprintln!("  3. {} replay 2918957128 moves.json", program);
}

fn parse_seed(args: &[String]) -> Result<u32, Box<dyn std::error::Error>> {
    let raw = args.get(2).ok_or("missing <seed> argument")?;
    raw.parse()
        .map_err(|_| format!("Invalid maze seed '{}'. Must be a non-negative integer.", raw).into())
}

fn parse_size(raw: &str) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let (w, h) = raw
        .split_once('x')
        .ok_or_else(|| format!("Invalid size '{}'. Expected <W>x<H>, e.g. 10x8", raw))?;
    Ok((w.parse()?, h.parse()?))
}

fn generate_maze_command(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let seed = parse_seed(args)?;
    let mut config = GameConfig::default();
    let mut output_file_idx = 3;

    if args.get(3).map(String::as_str) == Some("--size") {
        let raw = args.get(4).ok_or("--size requires a value like 10x8")?;
        let (width, height) = parse_size(raw)?;
        config.width = width;
        config.height = height;
        output_file_idx = 5;
    }

    let controller = GameController::with_seed(config, MemoryTransport::new(), seed)?;
    let session = controller.session();
    println!("📋 Maze {}x{} (seed {})", config.width, config.height, seed);
    println!();
    print!("{}", render_ascii(session.maze(), session.player()));
    println!();

    let default_filename = format!("{}_maze.json", seed);
    let file_to_save = args.get(output_file_idx).map(String::as_str).unwrap_or(&default_filename);
    save_snapshot(&controller.snapshot(), file_to_save)?;
    println!("💾 Maze saved to: {}", file_to_save);

    Ok(())
}

fn render_command(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let seed = parse_seed(args)?;
    let config = GameConfig::default();
    let maze = generate_maze(&config, seed)?;

    let default_filename = format!("{}_maze.svg", seed);
    let file_to_save = args.get(3).map(String::as_str).unwrap_or(&default_filename);
    fs::write(file_to_save, render_svg(&maze, maze.start(), Layout::from(config)))?;
    println!("💾 SVG saved to: {}", file_to_save);

    Ok(())
}

fn solve_command(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let seed = parse_seed(args)?;
    let maze = generate_maze(&GameConfig::default(), seed)?;
    let moves: Vec<&str> = solve(&maze)?.into_iter().map(Direction::name).collect();
    println!("{}", serde_json::to_string(&moves)?);
    Ok(())
}

fn solve(maze: &Maze) -> Result<Vec<Direction>, Box<dyn std::error::Error>> {
    maze.shortest_path(maze.start(), maze.goal())
        .ok_or_else(|| "maze has no route from start to goal".into())
}

fn replay_command(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let seed = parse_seed(args)?;
    let moves_file = args.get(3).ok_or("missing <moves_file> argument")?;
    let moves = load_moves(moves_file)?;

    let mut controller = GameController::with_seed(GameConfig::default(), MemoryTransport::new(), seed)?;
    println!("📦 Loaded {} moves", moves.len());

    let mut accepted = 0;
    for direction in &moves {
        if controller.session().game_won() {
            break;
        }
        if controller.move_player(*direction) {
            accepted += 1;
        }
    }

    let session = controller.session();
    println!("  Accepted moves: {} / {}", accepted, moves.len());
    println!("  Final position: ({}, {})", session.player().x, session.player().y);
    for message in controller.transport().sent() {
        println!("  Notification: {}", message);
    }

    if session.game_won() {
        println!("✅ Maze solved in {}", format_time(session.time_elapsed()));
        Ok(())
    } else {
        Err("moves do not reach the goal".into())
    }
}

fn save_snapshot(snapshot: &SessionSnapshot, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Largest moves file `replay` will read
const MAX_MOVES_FILE_BYTES: u64 = 10_000_000;

fn load_moves(path: &str) -> Result<Vec<Direction>, Box<dyn std::error::Error>> {
    // Checked before reading so an oversized file is never loaded
    if fs::metadata(path)?.len() > MAX_MOVES_FILE_BYTES {
        return Err("Moves file is too large (max 10MB)".into());
    }
    let json = fs::read_to_string(path)?;

    let names: Vec<String> = serde_json::from_str(&json)?;
    if names.is_empty() {
        return Err("Moves array is empty".into());
    }

    names
        .iter()
        .map(|name| {
            name.parse::<Direction>()
                .map_err(|e| -> Box<dyn std::error::Error> { format!("'{}': {}", name, e).into() })
        })
        .collect()
}
