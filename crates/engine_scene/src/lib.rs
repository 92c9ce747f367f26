//! # engine_scene
//!
//! A [`Scene`] is one loaded world: every entity it allocated plus one
//! component storage per component type. Gameplay code reaches it through
//! [`GameObject`] handles, which pair an entity with a weak back-reference to
//! the scene that owns it.
//!
//! ```rust
//! use engine_component::Component;
//! use engine_scene::SharedScene;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Score(u32);
//!
//! impl Component for Score {
//!     fn type_name() -> &'static str { "Score" }
//! }
//!
//! let scene = SharedScene::new();
//! let player = scene.create_entity();
//! player.add_component(Score(10)).unwrap();
//! player.with_component::<Score, _>(|s| s.0 += 5).unwrap();
//! assert_eq!(player.get_component::<Score>().unwrap(), Score(15));
//! ```

pub mod error;
pub mod game_object;
pub mod manager;
pub mod scene;

pub use error::SceneError;
pub use game_object::GameObject;
pub use manager::ComponentManager;
pub use scene::{Scene, SceneId, SharedScene};
