//! Point light component.
//!
//! Scenes usually hold a single light; the renderer picks the first one it
//! finds in the light storage.

use engine_component::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A point light with Phong-style colour terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// World-space position.
    pub position: Vec3,
    /// Diffuse colour.
    pub diffuse_color: Vec3,
    /// Ambient colour.
    pub ambient_color: Vec3,
    /// Specular colour.
    pub specular_color: Vec3,
}

impl Light {
    /// A white light at `position` with a dim ambient term.
    #[must_use]
    pub fn white(position: Vec3) -> Self {
        Self {
            position,
            diffuse_color: Vec3::ONE,
            ambient_color: Vec3::splat(0.1),
            specular_color: Vec3::ONE,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::white(Vec3::ZERO)
    }
}

impl Component for Light {
    fn type_name() -> &'static str {
        "Light"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_light() {
        let light = Light::white(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(light.position.y, 10.0);
        assert_eq!(light.diffuse_color, Vec3::ONE);
        assert!(light.ambient_color.x < light.diffuse_color.x);
    }
}
