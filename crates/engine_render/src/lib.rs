//! # engine_render
//!
//! Component types the renderer consumes every frame. The engine core only
//! produces and exposes this data; drawing it is the renderer's job.
//!
//! Re-exports [`glam`] for the vector and quaternion types the components are
//! built from.

pub mod light;
pub mod mesh;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

pub use light::Light;
pub use mesh::{MeshRenderer, TextureRef};
pub use transform::Transform3D;
