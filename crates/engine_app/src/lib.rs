//! # engine_app
//!
//! Drives a scene's scripts frame by frame. The binary wires configuration,
//! plugin loading and logging around a [`FrameLoop`]; the library exposes the
//! pieces so games and tests can drive the loop themselves.

pub mod config;
pub mod demo;
pub mod tick;

pub use config::{ConfigError, EngineConfig};
pub use tick::FrameLoop;
