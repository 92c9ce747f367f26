//! The scene the binary runs when no game is supplied.
//!
//! A textured crate lit by one white light. The crate carries a built-in
//! `Spin` script plus a `Jump` script, which exists only if the jump plugin
//! was loaded.

use engine_render::{Light, MeshRenderer, Quat, TextureRef, Transform3D, Vec3};
use engine_scene::{GameObject, SceneError, SharedScene};
use engine_script::{NativeScripts, Script, ScriptContext, ScriptError, ScriptRegistry};

/// Name of the built-in rotation script.
pub const SPIN: &str = "Spin";

/// Name of the plugin script the demo crate declares.
pub const JUMP: &str = "Jump";

/// Rotates its owner about the Y axis.
#[derive(Debug)]
pub struct Spin {
    /// Radians per second.
    pub speed: f32,
}

impl Default for Spin {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl Script for Spin {
    fn update(&mut self, ctx: &ScriptContext<'_>) {
        let turn = Quat::from_rotation_y(self.speed * ctx.dt);
        // The owner may have lost its transform; nothing to spin then.
        let _ = ctx.owner.with_component::<Transform3D, _>(|t| t.rotate(turn));
    }
}

/// Register the scripts compiled into the binary.
///
/// # Errors
///
/// Returns [`ScriptError::DuplicateRegistration`] if a plugin already claimed
/// one of their names.
pub fn register_builtin_scripts(registry: &mut ScriptRegistry) -> Result<(), ScriptError> {
    registry.register_default::<Spin>(SPIN)
}

/// Populate `scene` and return the script tables to attach.
///
/// # Errors
///
/// Returns [`DemoError`] if a component cannot be added or a script cannot
/// be declared.
pub fn build_scene(scene: &SharedScene) -> Result<Vec<NativeScripts>, DemoError> {
    let light = scene.create_entity();
    light.add_component(Light::white(Vec3::new(2.0, 4.0, 2.0)))?;

    let crate_object = spawn_crate(scene)?;
    let mut scripts = NativeScripts::new(crate_object);
    scripts.declare(SPIN)?;
    scripts.declare(JUMP)?;

    Ok(vec![scripts])
}

fn spawn_crate(scene: &SharedScene) -> Result<GameObject, SceneError> {
    let object = scene.create_entity();
    object.add_component(Transform3D::from_position(Vec3::new(0.0, 0.5, -3.0)))?;
    object.add_component(
        MeshRenderer::new("models/cube.obj").with_texture(TextureRef::new("textures/crate.png")),
    )?;
    Ok(object)
}

/// Errors raised while building the demo scene.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// A component could not be attached.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// A script could not be declared.
    #[error(transparent)]
    Script(#[from] ScriptError),
}
