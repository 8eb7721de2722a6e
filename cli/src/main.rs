//! # photon-cli
//!
//! A physically-based Monte Carlo path tracer that renders 3D scenes directly in your
//! terminal using Unicode braille patterns and ANSI true-color escape codes.
//!
//! ## Architecture
//!
//! - **Geometric primitives**: sphere, plane, box, mesh (BVH-accelerated above a triangle
//!   threshold)
//! - **Materials**: diffuse, reflective, dielectric, light, debug
//! - **Camera**: thin-lens model with configurable depth of field
//! - **Output modes**: braille (2×4 subpixel), true-color, half-block, ASCII
//!
//! `photon-engine` does the rendering on a worker pool; this binary polls its progress and
//! hands the finished pixel buffer to the terminal display module.

mod display;
mod presets;

use clap::Parser;
use display::{display_pixels, OutputMode, ToneMapOp};
use photon_engine::{Renderer, Scene};
use presets::ScenePreset;
use std::time::{Duration, Instant};
use tracing::info;

/// photon-cli — render 3D scenes in your terminal
#[derive(Parser, Debug)]
#[command(
    name = "photon-cli",
    version,
    about = "A terminal ray tracer written in Rust",
    after_help = "EXAMPLES:\n  \
                  photon-cli --scene showcase --mode halfblock\n  \
                  photon-cli --scene cornell --spp 200 --bounces 20\n  \
                  photon-cli --scene minimal --width 120 --height 60 --mode braille\n  \
                  photon-cli --scene stress --spp 10 --threads 8"
)]
struct Cli {
    /// Scene preset to render
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Showcase)]
    scene: ScenePreset,

    /// Output width in characters (actual pixel width depends on mode)
    #[arg(short = 'W', long, default_value_t = 120)]
    width: usize,

    /// Output height in characters
    #[arg(short = 'H', long, default_value_t = 60)]
    height: usize,

    /// Samples per pixel — higher values reduce noise at the cost of render time
    #[arg(long, default_value_t = 32)]
    spp: u32,

    /// Maximum ray bounce depth
    #[arg(long, default_value_t = 12)]
    bounces: u32,

    /// Terminal output encoding mode
    #[arg(short, long, value_enum, default_value_t = OutputMode::Halfblock)]
    mode: OutputMode,

    /// HDR tone mapping operator applied before gamma correction
    #[arg(long, value_enum, default_value_t = ToneMapOp::None)]
    tone_map: ToneMapOp,

    /// Disable gamma correction (output linear radiance values directly)
    #[arg(long)]
    no_gamma: bool,

    /// Worker thread count. Defaults to the number of available CPUs.
    #[arg(long)]
    threads: Option<usize>,

    /// Seed the renderer for bit-reproducible output across runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn print_header(scene_name: &str, cli: &Cli, threads: usize) {
    eprintln!();
    eprintln!("  photon-cli — terminal path tracer");
    eprintln!();
    eprintln!("  Scene:      {scene_name}");
    eprintln!("  Resolution: {}x{} ({:?})", cli.width, cli.height, cli.mode);
    eprintln!("  Samples:    {} spp", cli.spp);
    eprintln!("  Bounces:    {}", cli.bounces);
    eprintln!("  Threads:    {threads}");
    eprintln!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let threads = cli.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });

    let description = cli.scene.build();
    let scene_name = description.name;

    let camera = photon_engine::Camera::new(&description.camera_config);
    let scene = Scene::validate(
        camera,
        description.background,
        description.objects,
        cli.bounces,
        cli.spp,
        true,
    )
    .expect("built-in scene presets are always valid");

    print_header(scene_name, &cli, threads);

    let mut renderer = Renderer::new(cli.width, cli.height, threads).expect("valid dimensions");
    if let Some(seed) = cli.seed {
        renderer = renderer.with_seed(seed);
    }
    renderer.set_scene(scene).expect("renderer is idle");

    let t0 = Instant::now();
    renderer.start_render().expect("renderer is idle");

    while renderer.is_rendering() {
        std::thread::sleep(Duration::from_millis(100));
        eprint!("\r  Rendering: {:5.1}%", renderer.render_percentage());
    }
    renderer.wait_for_render_completion();
    let elapsed = t0.elapsed();
    eprintln!("\r  Rendering: 100.0%  ({:.2}s)          ", elapsed.as_secs_f64());

    let total_rays = cli.width as u64 * cli.height as u64 * cli.spp as u64;
    info!(
        elapsed_secs = elapsed.as_secs_f64(),
        total_rays, "render complete"
    );
    eprintln!(
        "  {:.2}M rays in {:.2}s ({:.2} Mrays/s)",
        total_rays as f64 / 1e6,
        elapsed.as_secs_f64(),
        total_rays as f64 / elapsed.as_secs_f64() / 1e6
    );
    eprintln!();

    let pixels = renderer.pixels();
    display_pixels(
        &pixels,
        cli.width,
        cli.height,
        cli.mode,
        cli.tone_map,
        !cli.no_gamma,
    );

    eprintln!();
    eprintln!("  Rendered with photon-cli v{}", env!("CARGO_PKG_VERSION"));
}
