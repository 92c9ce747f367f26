//! Jump script — hops its owner up and down.
//!
//! Build this crate and drop the resulting library into the engine's plugin
//! directory; it registers itself as `Jump`. The owner needs a
//! [`Transform3D`]; without one the script does nothing.
//!
//! Log events from the loaded library go to its own `tracing` dispatcher, not
//! the engine's; they show up when the crate is linked as an `rlib`.

use tracing::{debug, info};

use engine_render::{Transform3D, Vec3};
use engine_script::{Script, ScriptContext};

/// Upward speed at take-off, in world units per second.
const JUMP_SPEED: f32 = 4.0;

/// Downward acceleration, in world units per second².
const GRAVITY: f32 = 9.81;

/// Makes its owner jump whenever it is back on the ground.
#[derive(Debug, Default)]
pub struct JumpScript {
    /// Height the owner rests at, captured on start.
    ground: Option<f32>,
    /// Current vertical velocity.
    velocity: f32,
    /// Number of take-offs so far.
    jumps: u32,
}

impl JumpScript {
    /// Number of jumps started so far.
    #[must_use]
    pub fn jumps(&self) -> u32 {
        self.jumps
    }
}

impl Script for JumpScript {
    fn start(&mut self, ctx: &ScriptContext<'_>) {
        self.ground = ctx.owner.get_component::<Transform3D>().ok().map(|t| t.position.y);
        info!(owner = %ctx.owner.entity(), ground = ?self.ground, "jump script started");
    }

    fn fixed_update(&mut self, ctx: &ScriptContext<'_>) {
        let Some(ground) = self.ground else {
            return;
        };

        let moved = ctx.owner.with_component::<Transform3D, _>(|t| {
            if t.position.y <= ground && self.velocity <= 0.0 {
                t.position.y = ground;
                self.velocity = JUMP_SPEED;
                self.jumps += 1;
            }
            t.translate(Vec3::Y * self.velocity * ctx.dt);
            self.velocity -= GRAVITY * ctx.dt;
            if t.position.y < ground {
                t.position.y = ground;
            }
        });
        if moved.is_err() {
            self.ground = None;
        }
    }

    fn stop(&mut self, ctx: &ScriptContext<'_>) {
        debug!(owner = %ctx.owner.entity(), jumps = self.jumps, "jump script stopped");
    }
}

engine_script::export_script!(JumpScript, "Jump");
