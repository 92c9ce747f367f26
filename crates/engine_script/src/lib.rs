//! Native scripting for the Hydrogen engine core.
//!
//! Scripts are user types implementing [`Script`]. They are known to the
//! engine by name through a [`ScriptRegistry`], either registered in-process
//! or loaded from plugin libraries built with [`export_script!`]. A
//! [`NativeScripts`] table attaches named scripts to one game object and
//! drives their lifecycle hooks.
//!
//! ```rust
//! use engine_scene::SharedScene;
//! use engine_script::{NativeScripts, Script, ScriptContext, ScriptRegistry};
//!
//! #[derive(Default)]
//! struct Blink {
//!     frames: u64,
//! }
//!
//! impl Script for Blink {
//!     fn update(&mut self, ctx: &ScriptContext<'_>) {
//!         self.frames = ctx.frame;
//!     }
//! }
//!
//! let mut registry = ScriptRegistry::new();
//! registry.register_default::<Blink>("Blink").unwrap();
//!
//! let scene = SharedScene::new();
//! let mut scripts: NativeScripts = NativeScripts::new(scene.create_entity());
//! scripts.declare("Blink").unwrap();
//! scripts.instantiate_all(&registry);
//! scripts.update_all(0.016, 7);
//! assert_eq!(scripts.get::<Blink>(0).unwrap().frames, 7);
//! ```

pub mod error;
pub mod plugin;
pub mod registry;
pub mod script;
pub mod slots;

pub use error::ScriptError;
pub use plugin::PluginLibrary;
pub use registry::{ScriptFactory, ScriptInstance, ScriptRegistry, default_factory};
pub use script::{AsAny, Script, ScriptContext};
pub use slots::{MAX_SCRIPTS, NativeScripts, SlotState};

/// Export a script type from a plugin library.
///
/// Emits the `create_script` entry point the registry looks up. The optional
/// second argument also exports `script_name`, which overrides the name
/// derived from the library file.
///
/// ```rust,ignore
/// #[derive(Default)]
/// pub struct Jump;
///
/// impl engine_script::Script for Jump {}
///
/// engine_script::export_script!(Jump, "Jump");
/// ```
#[macro_export]
macro_rules! export_script {
    ($script:ty) => {
        #[unsafe(no_mangle)]
        pub fn create_script() -> ::std::boxed::Box<dyn $crate::Script> {
            ::std::boxed::Box::new(<$script as ::core::default::Default>::default())
        }
    };
    ($script:ty, $name:expr) => {
        $crate::export_script!($script);

        #[unsafe(no_mangle)]
        pub fn script_name() -> &'static str {
            $name
        }
    };
}
