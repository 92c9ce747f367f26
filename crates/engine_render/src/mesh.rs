//! Mesh renderer component.
//!
//! The per-entity draw data the renderer reads every frame: which mesh, which
//! texture, whether lighting applies, and the material's diffuse colour. GPU
//! handles are owned by the renderer; this component only names assets.

use engine_component::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A reference to a texture asset by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureRef(pub String);

impl TextureRef {
    /// Create a new texture reference.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The asset path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0
    }
}

/// Draw data for one mesh-bearing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRenderer {
    /// Path or identifier of the mesh asset.
    pub mesh: String,
    /// Diffuse texture, if the mesh is textured.
    pub texture: Option<TextureRef>,
    /// Whether the scene light affects this mesh.
    pub use_lighting: bool,
    /// Material diffuse colour (linear RGB).
    pub diffuse_color: Vec3,
}

impl MeshRenderer {
    /// An untextured, lit, white mesh.
    #[must_use]
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            texture: None,
            use_lighting: true,
            diffuse_color: Vec3::ONE,
        }
    }

    /// Attach a diffuse texture.
    #[must_use]
    pub fn with_texture(mut self, texture: TextureRef) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set the diffuse colour.
    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.diffuse_color = color;
        self
    }

    /// Render without lighting (flat diffuse colour).
    #[must_use]
    pub fn unlit(mut self) -> Self {
        self.use_lighting = false;
        self
    }

    /// Returns `true` if the renderer should sample a texture for this mesh.
    #[must_use]
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

impl Component for MeshRenderer {
    fn type_name() -> &'static str {
        "MeshRenderer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mesh = MeshRenderer::new("models/cube.obj");
        assert!(mesh.use_lighting);
        assert!(!mesh.has_texture());
        assert_eq!(mesh.diffuse_color, Vec3::ONE);
    }

    #[test]
    fn test_builders() {
        let mesh = MeshRenderer::new("models/cube.obj")
            .with_texture(TextureRef::new("textures/crate.png"))
            .with_color(Vec3::new(1.0, 0.0, 0.0))
            .unlit();
        assert!(mesh.has_texture());
        assert_eq!(mesh.texture.as_ref().map(TextureRef::path), Some("textures/crate.png"));
        assert!(!mesh.use_lighting);
    }

    #[test]
    fn test_json_shape() {
        let mesh = MeshRenderer::new("m").unlit();
        let json = serde_json::to_value(&mesh).unwrap();
        assert_eq!(json["mesh"], "m");
        assert_eq!(json["use_lighting"], false);
    }
}
