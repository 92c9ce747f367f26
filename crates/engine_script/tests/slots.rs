//! Script slots driving real scene objects.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use engine_component::Component;
use engine_render::{Transform3D, Vec3};
use engine_scene::SharedScene;
use engine_script::{NativeScripts, Script, ScriptContext, ScriptRegistry, SlotState};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(i32);

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

/// Moves its owner up by one unit per second.
#[derive(Default)]
struct Rise;

impl Script for Rise {
    fn update(&mut self, ctx: &ScriptContext<'_>) {
        ctx.owner
            .with_component::<Transform3D, _>(|t| t.translate(Vec3::Y * ctx.dt))
            .unwrap();
    }
}

/// Gives its owner health on start and takes it away on stop.
#[derive(Default)]
struct Vitals;

impl Script for Vitals {
    fn start(&mut self, ctx: &ScriptContext<'_>) {
        ctx.owner.add_component(Health(100)).unwrap();
    }

    fn fixed_update(&mut self, ctx: &ScriptContext<'_>) {
        ctx.owner.with_component::<Health, _>(|h| h.0 -= 1).unwrap();
    }

    fn stop(&mut self, ctx: &ScriptContext<'_>) {
        ctx.owner.remove_component::<Health>();
    }
}

fn registry() -> ScriptRegistry {
    let mut registry = ScriptRegistry::new();
    registry.register_default::<Rise>("Rise").unwrap();
    registry.register_default::<Vitals>("Vitals").unwrap();
    registry
}

#[test]
fn test_unknown_name_logs_one_error_and_skips_slot() {
    let errors = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));

    let scene = SharedScene::new();
    let object = scene.create_entity();
    object.add_component(Transform3D::IDENTITY).unwrap();

    let mut scripts: NativeScripts = NativeScripts::new(object.clone());
    scripts.declare("Rise").unwrap();
    scripts.declare("Ghost").unwrap();

    let created = tracing::subscriber::with_default(subscriber, || {
        scripts.instantiate_all(&registry())
    });

    assert_eq!(created, 1);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(scripts.state(0), SlotState::Instantiated);
    assert_eq!(scripts.state(1), SlotState::Registered);
    assert!(scripts.script(1).is_none());

    // The live script keeps running next to the empty slot.
    scripts.update_all(0.5, 1);
    let transform = object.get_component::<Transform3D>().unwrap();
    assert_eq!(transform.position, Vec3::new(0.0, 0.5, 0.0));
}

#[test]
fn test_scripts_mutate_owner_components() {
    let scene = SharedScene::new();
    let object = scene.create_entity();
    object.add_component(Transform3D::IDENTITY).unwrap();

    let mut scripts: NativeScripts = NativeScripts::new(object.clone());
    scripts.declare("Rise").unwrap();
    scripts.declare("Vitals").unwrap();
    assert_eq!(scripts.instantiate_all(&registry()), 2);
    assert_eq!(object.get_component::<Health>(), Ok(Health(100)));

    for frame in 1..=4 {
        scripts.fixed_update_all(0.02, frame);
        scripts.update_all(0.25, frame);
    }

    assert_eq!(object.get_component::<Health>(), Ok(Health(96)));
    let transform = object.get_component::<Transform3D>().unwrap();
    assert!((transform.position.y - 1.0).abs() < f32::EPSILON);

    assert_eq!(scripts.destroy_all(), 2);
    assert!(!object.has_component::<Health>());
}

#[test]
fn test_stop_runs_once_across_destroy_and_drop() {
    let scene = SharedScene::new();
    let object = scene.create_entity();

    {
        let mut scripts: NativeScripts<2> = NativeScripts::new(object.clone());
        scripts.declare("Vitals").unwrap();
        scripts.instantiate_all(&registry());
        assert!(object.has_component::<Health>());

        scripts.destroy_all();
        assert!(!object.has_component::<Health>());

        // A stop hook running again would find no Health to remove; put one
        // back to prove the drop does not touch it.
        object.add_component(Health(1)).unwrap();
    }

    assert_eq!(object.get_component::<Health>(), Ok(Health(1)));
}

#[test]
fn test_each_object_gets_its_own_instances() {
    let scene = SharedScene::new();
    let registry = registry();

    let mut tables: Vec<NativeScripts<4>> = (0..3)
        .map(|_| {
            let object = scene.create_entity();
            object.add_component(Transform3D::IDENTITY).unwrap();
            let mut scripts = NativeScripts::new(object);
            scripts.declare("Rise").unwrap();
            scripts
        })
        .collect();

    for scripts in &mut tables {
        assert_eq!(scripts.instantiate_all(&registry), 1);
    }
    tables[1].update_all(2.0, 1);

    let heights: Vec<f32> = tables
        .iter()
        .map(|s| s.owner().get_component::<Transform3D>().unwrap().position.y)
        .collect();
    assert_eq!(heights, vec![0.0, 2.0, 0.0]);
}
