//! Pokédex CLI
//!
//! Preview entrance cascades, spring releases and decorative loops, and
//! inspect catalog documents with the timing each entry would get.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::PokedexConfig;
use pokedex_animation::{
    AnimatedTimeline, AnimationScheduler, Interaction, InteractionEvent, MotionConfig,
    PeriodicMotion, SpringConfig, SpringMotion, SpringSolution,
};
use pokedex_core::{FetchTask, ImageSlot, JsonCatalog, LoadPhase, ScreenLoad, Vec2};

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pokédex motion preview and catalog inspector", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory containing pokedex.toml
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stagger window of every item in a list
    Stagger {
        /// Number of items in the list
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,

        /// Also sample every item at this shared timeline value
        #[arg(short, long)]
        at: Option<f32>,
    },

    /// Simulate a drag release and print the spring trajectory
    Spring {
        /// Release displacement in pixels
        #[arg(long, default_value = "20.0")]
        from: f32,

        /// Release velocity in pixels per second
        #[arg(long, default_value = "0.0")]
        velocity: f32,

        /// Override the configured damping ratio
        #[arg(long)]
        ratio: Option<f32>,

        /// Frames per second of the simulated driver
        #[arg(long, default_value = "60")]
        fps: u32,
    },

    /// Sample a decorative loop over one period
    Loop {
        #[arg(value_enum, default_value = "square")]
        kind: LoopKind,

        /// Number of samples
        #[arg(short, long, default_value = "8")]
        samples: usize,
    },

    /// Simulate hover and drag input on one card
    Card {
        /// Drag distance before release, in pixels
        #[arg(long, default_value = "20.0")]
        drag: f32,
    },

    /// Load a catalog document and show each entry with its entrance window
    Catalog {
        /// JSON catalog document (defaults to [catalog].path)
        path: Option<PathBuf>,

        /// Maximum number of entries (defaults to [catalog].limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum LoopKind {
    Float,
    Rotate,
    Square,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().without_time())
        .with(filter)
        .init();

    let config = PokedexConfig::load_from_dir(&cli.config)?;

    match cli.command {
        Commands::Stagger { count, at } => cmd_stagger(&config.motion, count, at),

        Commands::Spring {
            from,
            velocity,
            ratio,
            fps,
        } => cmd_spring(&config.motion, from, velocity, ratio, fps),

        Commands::Loop { kind, samples } => cmd_loop(&config.motion, kind, samples),

        Commands::Card { drag } => cmd_card(&config.motion, drag),

        Commands::Catalog { path, limit } => cmd_catalog(&config, path, limit),

        Commands::Config => cmd_config(&config),
    }
}

fn cmd_stagger(motion: &MotionConfig, count: usize, at: Option<f32>) -> Result<()> {
    let plan = motion.stagger_plan(count);
    let style = motion.entrance_style();

    info!(
        "{} items, span {:.2}, spread over {:.2} of {:.2}s",
        count,
        plan.span_fraction,
        plan.total_fraction,
        motion.list_duration_secs()
    );

    for (index, window) in plan.windows().enumerate() {
        match at {
            Some(t) => {
                let frame = plan.frame(index, t, &style);
                println!(
                    "{:>4}  {:.3} .. {:.3}  opacity {:.3}  offset {:>6.2}",
                    index, window.start, window.end, frame.opacity, frame.offset_y
                );
            }
            None => println!("{:>4}  {:.3} .. {:.3}", index, window.start, window.end),
        }
    }
    Ok(())
}

fn cmd_spring(
    motion: &MotionConfig,
    from: f32,
    velocity: f32,
    ratio: Option<f32>,
    fps: u32,
) -> Result<()> {
    if fps == 0 {
        anyhow::bail!("fps must be positive");
    }
    let config = match ratio {
        Some(ratio) => SpringConfig::with_damping_ratio(
            motion.spring.stiffness,
            ratio,
            motion.spring.mass,
        )?,
        None => motion.spring_config()?,
    };
    let rule = motion.settle_rule();
    let dt = 1.0 / fps as f32;

    info!(
        "Release from {} at {} px/s, {:?} (ratio {:.2})",
        from,
        velocity,
        config.regime(),
        config.damping_ratio()
    );

    let solution = SpringSolution::new(config, from, velocity, 0.0);
    let mut release = SpringMotion::release(config, from, velocity, 0.0, rule);
    let mut frame = 0u32;
    while !release.is_done() {
        let phase = release.advance(dt);
        frame += 1;
        println!(
            "{:>4}  t={:.3}  x={:>9.4}  v={:>10.4}  exact={:>9.4}  {:?}",
            frame,
            release.elapsed(),
            release.value(),
            release.velocity(),
            solution.value_at(release.elapsed()),
            phase
        );
    }

    info!(
        "{:?} after {} frames ({:.3}s)",
        release.phase(),
        frame,
        release.elapsed()
    );
    Ok(())
}

fn cmd_loop(motion: &MotionConfig, kind: LoopKind, samples: usize) -> Result<()> {
    if samples == 0 {
        anyhow::bail!("samples must be positive");
    }
    let mut periodic: PeriodicMotion = match kind {
        LoopKind::Float => motion.float_motion(),
        LoopKind::Rotate => motion.rotate_motion(),
        LoopKind::Square => motion.square_motion(),
    };
    let period = periodic.timeline().period_secs();
    let dt = period / samples as f32;

    periodic.set_active(true);
    for i in 0..=samples {
        let t = periodic.sample();
        println!(
            "{:>4}  v={:.3}  offset=({:>7.2}, {:>7.2})  rotation={:.3}",
            i,
            periodic.timeline().value(),
            t.offset.x,
            t.offset.y,
            t.rotation
        );
        periodic.advance(dt);
    }
    Ok(())
}

fn cmd_card(motion: &MotionConfig, drag: f32) -> Result<()> {
    let mut card = Interaction::new(motion.interaction_params()?);
    let dt = 1.0 / 60.0;

    let script = [
        InteractionEvent::PointerEnter,
        InteractionEvent::DragStart,
        InteractionEvent::DragUpdate(Vec2::new(drag / 2.0, 0.0)),
        InteractionEvent::DragUpdate(Vec2::new(drag / 2.0, 0.0)),
        InteractionEvent::DragEnd {
            velocity: Vec2::ZERO,
        },
        InteractionEvent::PointerExit,
    ];

    for event in script {
        card.handle(event);
        card.advance(dt);
        let t = card.transform();
        println!(
            "{:<32} {:<10} offset=({:>6.2}, {:>6.2}) scale={:.3}",
            format!("{event:?}"),
            card.state().name(),
            t.offset.x,
            t.offset.y,
            t.scale
        );
    }

    let mut frames = 0;
    while card.advance(dt) {
        frames += 1;
    }
    info!("Card back to {} after {} more frames", card.state().name(), frames);
    Ok(())
}

fn cmd_catalog(config: &PokedexConfig, path: Option<PathBuf>, limit: Option<usize>) -> Result<()> {
    let path = path
        .or_else(|| config.catalog.path.clone())
        .context("No catalog document given and [catalog].path is not set")?;
    let limit = limit.unwrap_or(config.catalog.limit);

    let source = JsonCatalog::from_path(&path)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut load = ScreenLoad::new();
    let ticket = load.begin();
    let task = FetchTask::spawn_on(runtime.handle(), source, limit);
    let result = runtime.block_on(task.join());
    load.complete(ticket, result);

    let entities = match load.phase() {
        LoadPhase::Loaded(list) => list,
        LoadPhase::Failed(message) => {
            warn!("Load failed, a retry prompt would be shown");
            anyhow::bail!("{}", message);
        }
        LoadPhase::Idle | LoadPhase::Loading => anyhow::bail!("Load did not complete"),
    };

    // Drive the list entrance the way a screen would, then report the windows
    let scheduler = AnimationScheduler::new();
    let entrance = AnimatedTimeline::new(scheduler.handle(), config.motion.list_duration_secs());
    entrance.start();
    let plan = config.motion.stagger_plan(entities.len());

    info!("Loaded {} entries from {}", entities.len(), path.display());
    for (index, pokemon) in entities.iter().enumerate() {
        let window = plan.window(index);
        let types: Vec<&str> = pokemon.types().iter().map(|t| t.name()).collect();
        let image = match ImageSlot::resolve(pokemon.image_url()) {
            ImageSlot::Remote(_) => "image",
            ImageSlot::Placeholder => "placeholder",
        };
        println!(
            "{:<6} {:<14} {:<18} {:<12} {:<20} {:.3} .. {:.3}",
            pokemon.display_number(),
            pokemon.display_name(),
            types.join("/"),
            image,
            pokemon.hero_tag(),
            window.start,
            window.end
        );
    }

    let mut frames = 0;
    while scheduler.advance(1.0 / 60.0) {
        frames += 1;
    }
    info!(
        "Entrance finished after {} frames (progress {:.2})",
        frames,
        entrance.progress()
    );
    Ok(())
}

fn cmd_config(config: &PokedexConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
