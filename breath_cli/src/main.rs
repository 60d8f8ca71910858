use breath_core::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const BAR_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "Guided breathing exercise pacer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available exercises
    List {
        /// Category filter (all, calm, focus, sleep, energize, balance)
        #[arg(long)]
        category: Option<String>,
    },

    /// Show details of one exercise
    Show {
        /// Exercise id
        id: String,
    },

    /// Run a guided session in real time
    Run {
        /// Exercise id (defaults to session.default_exercise)
        id: Option<String>,

        /// Stop after this many full cycles instead of the recommended duration
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        cycles: Option<u64>,

        /// Override the tick interval in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },

    /// Apply a number of ticks instantly and print the resulting state
    Simulate {
        /// Exercise id
        id: String,

        /// Number of ticks to apply
        #[arg(long)]
        ticks: u64,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    breath_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::List { category } => cmd_list(&config, category.as_deref()),
        Commands::Show { id } => cmd_show(&config, &id),
        Commands::Run {
            id,
            cycles,
            interval_ms,
        } => {
            if let Some(ms) = interval_ms {
                config.ticker.interval_ms = ms;
            }
            let id = id.unwrap_or_else(|| config.session.default_exercise.clone());
            cmd_run(&config, &id, cycles)
        }
        Commands::Simulate { id, ticks, json } => cmd_simulate(&config, &id, ticks, json),
    }
}

fn cmd_list(config: &Config, category: Option<&str>) -> Result<()> {
    let engine = PacingEngine::manual_from_config(config)?;

    let exercises = match category {
        Some(tag) => engine.catalog().by_tag(tag),
        None => engine.list_exercises(None),
    };

    if exercises.is_empty() {
        println!("No exercises match that category.");
        return Ok(());
    }

    for exercise in exercises {
        println!(
            "  {:<14} {:<26} {:<9} {}",
            exercise.id,
            exercise.name,
            exercise.pattern(),
            exercise.category
        );
    }
    Ok(())
}

fn cmd_show(config: &Config, id: &str) -> Result<()> {
    let engine = PacingEngine::manual_from_config(config)?;
    let exercise = engine.catalog().find(id)?;
    let d = &exercise.durations;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", exercise.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", exercise.description);
    println!();
    println!("  Category:  {}", exercise.category);
    println!("  Inhale:    {}s", d.inhale);
    if let Some(hold) = d.hold1 {
        println!("  Hold:      {}s", hold);
    }
    println!("  Exhale:    {}s", d.exhale);
    if let Some(hold) = d.hold2 {
        println!("  Hold:      {}s", hold);
    }
    println!(
        "  Cycle:     {}s ({})",
        exercise.cycle_seconds(),
        exercise.pattern()
    );
    println!("  Suggested: {} min", exercise.recommended_minutes);

    if !exercise.benefits.is_empty() {
        println!();
        for benefit in &exercise.benefits {
            println!("  → {}", benefit);
        }
    }
    println!();
    Ok(())
}

fn cmd_run(config: &Config, id: &str, cycles: Option<u64>) -> Result<()> {
    let mut engine = PacingEngine::from_config(config)?;
    engine.select_exercise(id)?;

    let (name, recommended_seconds) = match engine.current_exercise() {
        Some(exercise) => (
            exercise.name.clone(),
            u64::from(exercise.recommended_minutes) * 60,
        ),
        None => return Err(Error::NoExerciseSelected),
    };

    println!("{}", name);
    match cycles {
        Some(n) => println!("Running {} cycle(s)\n", n),
        None => println!("Running for {}\n", format_clock(recommended_seconds)),
    }

    engine.start()?;
    print_tick_line(&engine);

    // A missing tick for this long means the ticker is gone
    let timeout = config.ticker.interval() * 5 + Duration::from_secs(1);

    loop {
        match engine.wait_for_tick(timeout) {
            None => {
                tracing::warn!("No tick received within {:?}, stopping", timeout);
                break;
            }
            Some(outcome) if !outcome.is_accepted() => continue,
            Some(_) => {}
        }

        print_tick_line(&engine);

        let snapshot = engine.snapshot();
        let done = match cycles {
            Some(n) => snapshot.cycle_count >= n,
            None => snapshot.total_elapsed >= recommended_seconds,
        };
        if done {
            break;
        }
    }

    engine.stop();
    let snapshot = engine.snapshot();
    println!(
        "\n✓ Session complete: {} cycle(s) in {}",
        snapshot.cycle_count,
        format_clock(snapshot.total_elapsed)
    );
    Ok(())
}

fn cmd_simulate(config: &Config, id: &str, ticks: u64, json: bool) -> Result<()> {
    let mut engine = PacingEngine::manual_from_config(config)?;
    engine.select_exercise(id)?;
    engine.start()?;

    for tick in 1..=ticks {
        if let Some(t) = engine.tick().transition() {
            if !json {
                println!(
                    "  tick {:>4}: {} -> {}{}",
                    tick,
                    t.from,
                    t.to,
                    if t.cycle_completed { "  (cycle complete)" } else { "" }
                );
            }
        }
    }

    let snapshot = engine.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!();
        println!("  Phase:     {}", snapshot.phase);
        println!("  Remaining: {}s", snapshot.time_remaining);
        println!("  Cycles:    {}", snapshot.cycle_count);
        println!("  Elapsed:   {}", format_clock(snapshot.total_elapsed));
        println!("  Size:      {:.1}", snapshot.visual_size);
    }
    Ok(())
}

fn print_tick_line(engine: &PacingEngine) {
    let snapshot = engine.snapshot();
    let fraction = engine.progress().fraction(snapshot.visual_size);
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let bar = "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled);

    println!(
        "{}  cycle {:>3}  {:<16} {:>2}s  {}",
        format_clock(snapshot.total_elapsed),
        snapshot.cycle_count,
        snapshot.phase.instruction(),
        snapshot.time_remaining,
        bar
    );
}
