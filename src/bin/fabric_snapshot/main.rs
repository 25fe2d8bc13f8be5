// fabric-snapshot - Grow a fabric, let it settle, draw it
//
// Pipeline:
//   1. Load config (defaults, or a TOML file)
//   2. Build a bipyramid seed
//   3. Grow it with seeded genes
//   4. Iterate physics in chunks, logging progress
//   5. Rasterize a side view of the intervals in their stress colors
//
// Usage: cargo run --bin fabric-snapshot -- <out.png> [--ticks N] [--growth N] [--seed N] [--config path]

mod render;

use std::env;
use std::error::Error;
use std::process;

use fabric_engine::{Fabric, FabricConfig, Growth, SeededGenes};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SEED_CORNERS: u16 = 6;
const SEED_ALTITUDE: f32 = 1.0;
const TICK_CHUNK: u32 = 500;
const IMAGE_SIZE: u32 = 512;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <out.png> [--ticks N] [--growth N] [--seed N] [--config path]", args[0]);
        process::exit(1);
    }

    // Parse arguments
    let out_path = &args[1];
    let mut ticks = 5000u32;
    let mut growth_steps = 4u32;
    let mut seed: Option<u64> = None;
    let mut config_path: Option<&str> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => { ticks = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(5000); i += 2; }
            "--growth" => { growth_steps = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(4); i += 2; }
            "--seed" => { seed = args.get(i+1).and_then(|s| s.parse().ok()); i += 2; }
            "--config" => { config_path = args.get(i+1).map(String::as_str); i += 2; }
            _ => i += 1,
        }
    }

    let mut config = match config_path {
        Some(path) => FabricConfig::load(path)?,
        None => FabricConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    info!(out = %out_path, ticks, growth_steps, seed = config.seed, "snapshot");

    // Seed and grow
    let mut fabric = Fabric::new(&config);
    fabric.create_seed(SEED_CORNERS, SEED_ALTITUDE)?;
    let mut growth = Growth::new(&fabric, &[0, 2, 4])?;
    let mut genes = SeededGenes::new(config.seed);
    for step in 0..growth_steps {
        if !growth.step(&mut fabric, &mut genes)? || growth.is_exhausted() {
            info!(step, "growth ended early");
            break;
        }
    }
    fabric.centralize(SEED_ALTITUDE, 1.0);
    info!(
        joints = fabric.joint_count(),
        intervals = fabric.interval_count(),
        faces = fabric.face_count(),
        "grown"
    );

    // Settle
    let mut remaining = ticks;
    while remaining > 0 {
        let chunk = remaining.min(TICK_CHUNK);
        let max_phase = fabric.iterate(chunk);
        remaining -= chunk;
        info!(age = fabric.age(), max_phase, energy = fabric.kinetic_energy(), "iterated");
    }
    // Refresh exports even when no ticks were asked for.
    fabric.iterate(0);

    // Draw
    let count = fabric.interval_count() as usize;
    let lines = &fabric.arena().line_locations()[..count];
    let colors = &fabric.arena().line_colors()[..count];
    let mut view = render::SideView::fit(IMAGE_SIZE, IMAGE_SIZE, lines);
    view.draw_ground();
    view.draw_lines(lines, colors);
    view.into_image().save(out_path)?;

    info!(out = %out_path, "done");
    Ok(())
}
