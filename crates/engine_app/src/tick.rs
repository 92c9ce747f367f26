//! The frame loop.
//!
//! Each frame:
//!
//! 1. Drop script tables whose owner was destroyed, stopping their scripts.
//! 2. Instantiate script tables attached since the previous frame.
//! 3. Run as many fixed steps as the accumulated time allows.
//! 4. Run one variable-rate update.
//! 5. Advance the frame counter.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use engine_scene::SharedScene;
use engine_script::{NativeScripts, ScriptRegistry};

use crate::config::EngineConfig;

/// Upper bound on fixed steps per frame, so a long stall does not snowball.
pub const MAX_FIXED_STEPS: u32 = 8;

/// Drives scripts attached to the objects of one scene.
///
/// The loop owns the registry, so every factory and plugin must be registered
/// before it is built.
#[derive(Debug)]
pub struct FrameLoop {
    // Script tables are declared before the scene so their `stop` hooks run
    // while the scene is still alive.
    scripts: Vec<NativeScripts>,
    pending: Vec<NativeScripts>,
    scene: SharedScene,
    registry: ScriptRegistry,
    config: EngineConfig,
    frame: u64,
    accumulator: f64,
}

impl FrameLoop {
    /// Create a loop over `scene` using the scripts in `registry`.
    #[must_use]
    pub fn new(config: EngineConfig, scene: SharedScene, registry: ScriptRegistry) -> Self {
        Self {
            scripts: Vec::new(),
            pending: Vec::new(),
            scene,
            registry,
            config,
            frame: 0,
            accumulator: 0.0,
        }
    }

    /// Frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The scene being driven.
    #[must_use]
    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    /// The script registry.
    #[must_use]
    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// The loop configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Script tables that have been started.
    #[must_use]
    pub fn script_tables(&self) -> &[NativeScripts] {
        &self.scripts
    }

    /// Number of tables waiting for the next frame.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Queue a script table. Its scripts start at the beginning of the next
    /// frame.
    ///
    /// # Panics
    ///
    /// Panics if the table's owner does not belong to this loop's scene.
    pub fn attach(&mut self, scripts: NativeScripts) {
        assert!(
            scripts.owner().belongs_to(&self.scene),
            "script table for {} does not belong to {}",
            scripts.owner().entity(),
            self.scene.id()
        );
        debug!(owner = %scripts.owner().entity(), scripts = scripts.len(), "script table queued");
        self.pending.push(scripts);
    }

    fn prune_dead_owners(&mut self) {
        let before = self.scripts.len();
        // Dropping a table stops its remaining scripts.
        self.scripts.retain(|table| table.owner().is_valid());
        let removed = before - self.scripts.len();
        if removed > 0 {
            debug!(frame = self.frame, removed, "dropped script tables of destroyed objects");
        }
    }

    fn start_pending(&mut self) {
        for mut table in self.pending.drain(..) {
            let started = table.instantiate_all(&self.registry);
            debug!(
                owner = %table.owner().entity(),
                started,
                declared = table.len(),
                "script table started"
            );
            self.scripts.push(table);
        }
    }

    /// Run one frame that took `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.frame += 1;
        self.prune_dead_owners();
        self.start_pending();

        let fixed_dt = 1.0 / self.config.fixed_rate;
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= fixed_dt && steps < MAX_FIXED_STEPS {
            for table in &mut self.scripts {
                table.fixed_update_all(fixed_dt as f32, self.frame);
            }
            self.accumulator -= fixed_dt;
            steps += 1;
        }
        if self.accumulator >= fixed_dt {
            warn!(
                frame = self.frame,
                dropped_ms = (self.accumulator * 1000.0) as u64,
                "fixed update falling behind, dropping time"
            );
            self.accumulator %= fixed_dt;
        }

        for table in &mut self.scripts {
            table.update_all(dt as f32, self.frame);
        }

        debug!(
            frame = self.frame,
            dt,
            fixed_steps = steps,
            tables = self.scripts.len(),
            "frame complete"
        );
    }

    /// Run frames at the configured rate until `max_ticks` is reached, or
    /// forever when it is 0.
    pub fn run(&mut self) {
        let budget = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut ticks = 0u64;
        let mut last = Instant::now();
        let mut dt = budget.as_secs_f64();

        info!(
            tick_rate = self.config.tick_rate,
            fixed_rate = self.config.fixed_rate,
            max_ticks = self.config.max_ticks,
            "starting frame loop"
        );

        loop {
            let start = Instant::now();
            self.tick(dt);

            ticks += 1;
            if self.config.max_ticks > 0 && ticks >= self.config.max_ticks {
                info!(frames = ticks, "frame loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            } else {
                warn!(
                    frame = self.frame,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = budget.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }

            dt = last.elapsed().as_secs_f64();
            last = Instant::now();
        }
    }

    /// Stop every script, then release the scene.
    ///
    /// Returns the number of script instances stopped.
    pub fn shutdown(mut self) -> usize {
        let stopped = self
            .scripts
            .iter_mut()
            .chain(self.pending.iter_mut())
            .map(NativeScripts::destroy_all)
            .sum();
        info!(frames = self.frame, stopped, "frame loop shut down");
        stopped
    }
}
