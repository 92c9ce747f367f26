//! # engine_app
//!
//! Runs the demo scene.
//!
//! ## Startup Sequence
//!
//! 1. Build the config: defaults, then `--config` JSON, then
//!    `HYDROGEN_PLUGIN_DIR`, then command-line flags.
//! 2. Load every script plugin in the plugin directory.
//! 3. Register the built-in scripts and build the demo scene.
//! 4. Run the frame loop, then stop every script.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use engine_app::{EngineConfig, FrameLoop, demo};
use engine_scene::SharedScene;
use engine_script::ScriptRegistry;

#[derive(Debug, Parser)]
#[command(name = "engine_app", about = "Run the Hydrogen demo scene")]
struct Args {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to load script plugins from.
    #[arg(long)]
    plugin_dir: Option<PathBuf>,

    /// Stop after this many frames (0 = run forever).
    #[arg(long)]
    ticks: Option<u64>,

    /// Target frames per second.
    #[arg(long)]
    tick_rate: Option<f64>,
}

impl Args {
    fn into_config(self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::new(),
        }
        .with_env();

        if let Some(dir) = self.plugin_dir {
            config = config.with_plugin_dir(dir);
        }
        if let Some(ticks) = self.ticks {
            config = config.with_max_ticks(ticks);
        }
        if let Some(rate) = self.tick_rate {
            config = config.with_tick_rate(rate);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let config = Args::parse().into_config()?;
    info!(?config, "engine starting");

    let mut registry = ScriptRegistry::new();
    match &config.plugin_dir {
        Some(dir) => {
            let loaded = registry
                .load_plugin_dir(dir)
                .with_context(|| format!("loading plugins from {}", dir.display()))?;
            info!(plugins = ?loaded, "plugins loaded");
        }
        None => warn!("no plugin directory configured, running built-in scripts only"),
    }
    demo::register_builtin_scripts(&mut registry)?;

    let scene = SharedScene::new();
    let tables = demo::build_scene(&scene)?;

    let mut frame_loop = FrameLoop::new(config, scene, registry);
    for table in tables {
        frame_loop.attach(table);
    }
    frame_loop.run();

    let stopped = frame_loop.shutdown();
    info!(stopped, "engine shut down");
    Ok(())
}
