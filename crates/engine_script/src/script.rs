//! The [`Script`] capability trait.
//!
//! Any type that implements the four lifecycle hooks is a script. Scripts do
//! not extend [`GameObject`]; they receive their owner through the
//! [`ScriptContext`] passed to every hook.

use std::any::Any;

use engine_scene::GameObject;

/// Per-call context handed to every script hook.
#[derive(Debug, Clone, Copy)]
pub struct ScriptContext<'a> {
    /// The game object the script is attached to.
    pub owner: &'a GameObject,
    /// Seconds since the previous call of the same hook. Zero for
    /// [`Script::start`] and [`Script::stop`].
    pub dt: f32,
    /// Frame counter of the driving loop.
    pub frame: u64,
}

impl<'a> ScriptContext<'a> {
    /// Build a context.
    #[must_use]
    pub fn new(owner: &'a GameObject, dt: f32, frame: u64) -> Self {
        Self { owner, dt, frame }
    }
}

/// Upcast helper so `dyn Script` can be downcast to its concrete type.
///
/// Implemented for every `'static` type; script authors never implement it.
pub trait AsAny: Any {
    /// `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// User-authored per-object behaviour.
///
/// Every hook has an empty default, so a script only implements what it
/// needs.
///
/// ```rust
/// use engine_script::{Script, ScriptContext};
///
/// #[derive(Default)]
/// struct Spinner {
///     elapsed: f32,
/// }
///
/// impl Script for Spinner {
///     fn update(&mut self, ctx: &ScriptContext<'_>) {
///         self.elapsed += ctx.dt;
///     }
/// }
/// ```
pub trait Script: AsAny {
    /// Called once, right after the instance is stored in its slot.
    fn start(&mut self, _ctx: &ScriptContext<'_>) {}

    /// Called once per rendered frame.
    fn update(&mut self, _ctx: &ScriptContext<'_>) {}

    /// Called at the fixed simulation rate, possibly several times per frame.
    fn fixed_update(&mut self, _ctx: &ScriptContext<'_>) {}

    /// Called exactly once before the instance is destroyed.
    fn stop(&mut self, _ctx: &ScriptContext<'_>) {}
}

impl dyn Script {
    /// Downcast to the concrete script type.
    #[must_use]
    pub fn downcast_ref<S: Script>(&self) -> Option<&S> {
        self.as_any().downcast_ref()
    }

    /// Downcast mutably to the concrete script type.
    pub fn downcast_mut<S: Script>(&mut self) -> Option<&mut S> {
        self.as_any_mut().downcast_mut()
    }
}
