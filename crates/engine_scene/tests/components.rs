//! Component lifecycle through the public scene API, using the renderer's
//! component types.

use engine_render::{Light, MeshRenderer, TextureRef, Transform3D, Vec3};
use engine_scene::{SceneError, SharedScene};

fn crate_mesh() -> MeshRenderer {
    MeshRenderer::new("models/cube.obj").with_texture(TextureRef::new("textures/crate.png"))
}

#[test]
fn test_added_component_is_visible_until_removed() {
    let scene = SharedScene::new();
    let object = scene.create_entity();
    let transform = Transform3D::from_position(Vec3::new(0.0, 1.0, 0.0));

    object.add_component(transform).unwrap();
    assert!(object.has_component::<Transform3D>());
    assert_eq!(object.get_component::<Transform3D>(), Ok(transform));

    object.remove_component::<Transform3D>();
    assert!(!object.has_component::<Transform3D>());
}

#[test]
fn test_removing_absent_component_is_silent() {
    let scene = SharedScene::new();
    let object = scene.create_entity();
    assert_eq!(object.remove_component::<Light>(), None);
    assert!(!object.has_component::<Light>());
}

#[test]
fn test_destroy_clears_every_component_type() {
    let scene = SharedScene::new();
    let object = scene.create_entity();
    object.add_component(Transform3D::IDENTITY).unwrap();
    object.add_component(crate_mesh()).unwrap();
    object.add_component(Light::default()).unwrap();

    assert!(scene.destroy_entity(&object));

    let scene = scene.borrow();
    let manager = scene.components();
    assert!(!manager.has::<Transform3D>(object.entity()));
    assert!(!manager.has::<MeshRenderer>(object.entity()));
    assert!(!manager.has::<Light>(object.entity()));
    assert_eq!(manager.storage::<MeshRenderer>().map(|s| s.len()), Some(0));
}

#[test]
fn test_render_walk_skips_entities_without_a_transform() {
    let scene = SharedScene::new();

    let drawn = scene.create_entity();
    drawn.add_component(Transform3D::IDENTITY).unwrap();
    drawn.add_component(crate_mesh()).unwrap();

    let orphan = scene.create_entity();
    orphan.add_component(MeshRenderer::new("models/sphere.obj")).unwrap();

    let scene = scene.borrow();
    let meshes = scene.components().storage::<MeshRenderer>().unwrap();
    let visible: Vec<_> = meshes
        .iter()
        .filter(|(entity, _)| scene.has::<Transform3D>(*entity))
        .map(|(_, mesh)| mesh.mesh.as_str())
        .collect();
    assert_eq!(visible, vec!["models/cube.obj"]);
}

#[test]
fn test_overwrite_replaces_value() {
    let scene = SharedScene::new();
    let object = scene.create_entity();
    object.add_component(MeshRenderer::new("a")).unwrap();
    let previous = object.add_component(MeshRenderer::new("b")).unwrap();
    assert_eq!(previous.map(|m| m.mesh), Some("a".to_string()));
    assert_eq!(
        object.get_component::<MeshRenderer>().map(|m| m.mesh),
        Ok("b".to_string())
    );
}

#[test]
fn test_destroyed_handle_reports_dead_entity() {
    let scene = SharedScene::new();
    let object = scene.create_entity();
    object.destroy();
    assert_eq!(
        object.add_component(Light::default()),
        Err(SceneError::DeadEntity(object.entity()))
    );
}
