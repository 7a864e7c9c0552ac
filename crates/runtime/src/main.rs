#![deny(clippy::all, clippy::pedantic)]
//! # Rollout Runtime
//!
//! Entry point for the demo binary. It wires the mock engine to the
//! environment adapter and rolls a uniform random policy through a few
//! episodes, logging per-episode returns. Pass `--dump-frames DIR` to
//! save the first rendered frame of every episode as a PNG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use engine::mock::{MockEngine, MockScene};
use engine::Frame;
use env::{Env, EnvConfig, SimEnv};

/// Roll random actions through the simulation-engine adapter.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scene locator handed to the engine
    #[arg(long, default_value = "mock://cartpole")]
    scene: String,

    /// Number of episodes to run
    #[arg(long, default_value_t = 3)]
    episodes: u32,

    /// Hard cap on adapter steps per episode
    #[arg(long, default_value_t = 200)]
    max_steps: u32,

    /// Consecutive engine sub-steps folded into one transition
    #[arg(long, default_value_t = 2)]
    action_repeat: u32,

    /// Observation image width in pixels
    #[arg(long, default_value_t = 64)]
    width: u32,

    /// Observation image height in pixels
    #[arg(long, default_value_t = 64)]
    height: u32,

    /// Camera id used for observations
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Engine seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Directory for first-frame PNG dumps (off when absent)
    #[arg(long)]
    dump_frames: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    if let Some(dir) = &args.dump_frames {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create frame directory {}", dir.display()))?;
    }

    let backend = MockEngine::new(&args.scene).with_scene(MockScene {
        width: args.width,
        height: args.height,
        ..MockScene::default()
    });
    let config = EnvConfig {
        locator: args.scene.clone(),
        action_repeat: args.action_repeat,
        width: args.width,
        height: args.height,
        camera: args.camera,
        seed: args.seed,
    };

    tracing::info!(scene = %args.scene, "launching environment adapter");
    let mut sim = SimEnv::launch(&backend, config)?;

    let action_dim = sim.action_space().len();
    let mut rng = fastrand::Rng::with_seed(args.seed);

    for episode in 0..args.episodes {
        let obs = sim.reset()?;
        if let Some(dir) = &args.dump_frames {
            save_frame(dir, episode, &obs.image)?;
        }

        let mut episode_return = 0.0_f32;
        let mut steps = 0_u32;
        for _ in 0..args.max_steps {
            let action: Vec<f32> = (0..action_dim).map(|_| rng.f32() * 2.0 - 1.0).collect();
            let transition = sim.step(&action)?;
            episode_return += transition.reward;
            steps += 1;
            if transition.done {
                break;
            }
        }
        tracing::info!(episode, steps, episode_return, "episode finished");
    }

    tracing::info!(episodes = args.episodes, "rollout complete");
    Ok(())
}

/// Writes one frame as a timestamped PNG under `dir`.
fn save_frame(dir: &Path, episode: u32, frame: &Frame) -> Result<()> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("episode_{episode}_{stamp}.png"));
    let image = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .context("frame byte length does not match its dimensions")?;
    image
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved first frame");
    Ok(())
}
