use instant::{Duration, Instant};
use orbit_showcase::{
    animator::CameraOwnership,
    data_structures::{info::InfoTable, instance::Instance},
    pick::{normalize_pointer, resolve_click},
    scene::SceneContext,
    viewer::ClickOutcome,
};
use winit::dpi::PhysicalPosition;

use crate::common::test_utils::{
    approx, camera_at_origin, center, cube_model, cube_primitive, loaded, loaded_scenery, nested_cube_model, projection, showcase,
    VIEWPORT,
};

mod common;

#[test]
fn pointer_corners_map_to_device_coordinates() {
    assert_eq!(normalize_pointer(PhysicalPosition::new(0.0, 0.0), 800.0, 600.0), (-1.0, 1.0));
    assert_eq!(normalize_pointer(PhysicalPosition::new(800.0, 600.0), 800.0, 600.0), (1.0, -1.0));
    assert_eq!(normalize_pointer(PhysicalPosition::new(400.0, 300.0), 800.0, 600.0), (0.0, 0.0));
}

#[test]
fn center_click_hits_the_object_in_front_of_the_camera() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();

    let hit = resolve_click(center(), VIEWPORT, &camera_at_origin(), &projection(), &scene).unwrap();

    assert_eq!(hit.entity, "Sputnik");
    assert!(approx(hit.distance, 995.0), "distance {}", hit.distance);
    assert!(approx(hit.point.z, -995.0));
}

#[test]
fn corner_click_misses() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();

    let hit = resolve_click(PhysicalPosition::new(0.0, 0.0), VIEWPORT, &camera_at_origin(), &projection(), &scene);

    assert!(hit.is_none());
}

#[test]
fn nearest_hit_wins_regardless_of_registration_order() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene
        .register_asset(loaded("Voyager", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();
    scene
        .register_asset(loaded("Hubble", [0.0, 0.0, -300.0], 5.0, cube_model()))
        .unwrap();

    let hit = resolve_click(center(), VIEWPORT, &camera_at_origin(), &projection(), &scene).unwrap();

    assert_eq!(hit.entity, "Hubble");
    assert!(approx(hit.distance, 295.0));
}

#[test]
fn nested_mesh_resolves_to_the_registered_name() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene
        .register_asset(loaded("ISS", [0.0, 0.0, -500.0], 2.0, nested_cube_model()))
        .unwrap();

    let hit = resolve_click(center(), VIEWPORT, &camera_at_origin(), &projection(), &scene).unwrap();

    assert_eq!(hit.entity, "ISS");
    assert_ne!(Some(hit.node), scene.registry.get("ISS").map(|e| e.root));
}

#[test]
fn scenery_is_never_picked() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene.register_asset(loaded_scenery("Earth", [0.0, 0.0, -300.0], 100.0)).unwrap();
    scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();

    let hit = resolve_click(center(), VIEWPORT, &camera_at_origin(), &projection(), &scene).unwrap();

    assert_eq!(hit.entity, "Sputnik");
}

#[test]
fn click_on_satellite_opens_its_panel_and_starts_the_flight() {
    let mut showcase = showcase();
    showcase.on_asset_loaded(Ok(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    let mut camera = camera_at_origin();
    let now = Instant::now();

    let outcome = showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), now);

    assert_eq!(outcome, ClickOutcome::Activated("Sputnik".to_string()));
    assert_eq!(showcase.panel.current().map(|r| r.title), Some("Sputnik 1"));
    match showcase.animator.ownership() {
        CameraOwnership::Transitioning(transition) => {
            assert_eq!(transition.from, cgmath::Point3::new(0.0, 0.0, 0.0));
            assert_eq!(transition.to, cgmath::Point3::new(0.0, 0.0, -900.0));
            assert_eq!(transition.target, cgmath::Point3::new(0.0, 0.0, -1000.0));
        }
        CameraOwnership::Free => panic!("camera should be flying"),
    }
}

#[test]
fn click_without_info_record_changes_nothing() {
    let mut showcase = showcase();
    showcase.on_asset_loaded(Ok(loaded("Mystery", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    let mut camera = camera_at_origin();
    let before = camera.clone();

    let outcome = showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), Instant::now());

    assert_eq!(outcome, ClickOutcome::NoInfo("Mystery".to_string()));
    assert!(!showcase.panel.is_open());
    assert!(!showcase.animator.is_transitioning());
    assert_eq!(camera, before);
}

#[test]
fn click_on_empty_space_is_a_miss() {
    let mut showcase = showcase();
    showcase.on_asset_loaded(Ok(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    // Looking along +X, Sputnik is off to the side.
    let mut camera = orbit_showcase::camera::Camera::new([0.0, 0.0, 0.0], cgmath::Deg(0.0), cgmath::Deg(0.0));
    let before = camera.clone();

    let outcome = showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), Instant::now());

    assert_eq!(outcome, ClickOutcome::Miss);
    assert!(!showcase.panel.is_open());
    assert!(!showcase.animator.is_transitioning());
    assert_eq!(camera, before);
}

#[test]
fn hit_on_a_node_outside_the_registry_is_ignored() {
    let mut showcase = showcase();
    showcase.on_asset_loaded(Ok(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    let root = showcase.scene.registry.get("Sputnik").unwrap().root;
    // Attached after registration, in front of Sputnik (world z = -750).
    let stray = showcase
        .scene
        .graph
        .add_node(Some(root), Some("Stray".to_string()), Instance::placed([0.0, 0.0, 50.0], [1.0; 3]));
    showcase.scene.graph.node_mut(stray).unwrap().primitives = vec![cube_primitive(1.0)];
    showcase.scene.graph.update_world_transforms(root);
    assert!(showcase.scene.registry.entity_for_node(stray).is_none());

    let hit = resolve_click(center(), VIEWPORT, &camera_at_origin(), &projection(), &showcase.scene);
    assert!(hit.is_none());

    let mut camera = camera_at_origin();
    let before = camera.clone();
    let outcome = showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), Instant::now());

    assert_eq!(outcome, ClickOutcome::Miss);
    assert!(!showcase.panel.is_open());
    assert!(!showcase.animator.is_transitioning());
    assert_eq!(camera, before);
}

#[test]
fn second_activation_replaces_the_panel() {
    let mut showcase = showcase();
    showcase.on_asset_loaded(Ok(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    showcase.on_asset_loaded(Ok(loaded("Hubble", [0.0, 0.0, -300.0], 5.0, cube_model())));
    let mut camera = camera_at_origin();
    let now = Instant::now();

    showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), now);
    assert_eq!(showcase.panel.current().map(|r| r.title), Some("Hubble Space Telescope"));

    // Remove the nearer object from the line of sight by looking from the side.
    let mut side = orbit_showcase::camera::Camera::new([0.0, 0.0, -500.0], cgmath::Deg(-90.0), cgmath::Deg(0.0));
    let outcome = showcase.on_click(center(), VIEWPORT, &mut side, &projection(), now + Duration::from_millis(10));

    assert_eq!(outcome, ClickOutcome::Activated("Sputnik".to_string()));
    assert_eq!(showcase.panel.current().map(|r| r.title), Some("Sputnik 1"));
}

#[test]
fn panel_swallows_clicks_and_dismisses_from_its_control() {
    let mut showcase = showcase();
    showcase.on_asset_loaded(Ok(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    let mut camera = camera_at_origin();
    let now = Instant::now();
    showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), now);

    let layout = showcase.panel.layout(VIEWPORT.0, VIEWPORT.1).unwrap();
    let body = PhysicalPosition::new(
        (layout.panel.x + layout.panel.width / 2.0) as f64,
        (layout.panel.y + layout.panel.height / 2.0) as f64,
    );
    let dismiss = PhysicalPosition::new(
        (layout.dismiss.x + layout.dismiss.width / 2.0) as f64,
        (layout.dismiss.y + layout.dismiss.height / 2.0) as f64,
    );

    assert_eq!(
        showcase.on_click(body, VIEWPORT, &mut camera, &projection(), now),
        ClickOutcome::Consumed
    );
    assert!(showcase.panel.is_open());
    assert_eq!(
        showcase.on_click(dismiss, VIEWPORT, &mut camera, &projection(), now),
        ClickOutcome::Dismissed
    );
    assert!(!showcase.panel.is_open());
}

#[test]
fn failed_or_duplicate_loads_register_nothing() {
    let mut showcase = showcase();
    let error = orbit_showcase::resources::loader::LoadError::Malformed("truncated".to_string());

    assert_eq!(showcase.on_asset_loaded(Err(("ISS".to_string(), error))), None);
    assert!(showcase
        .on_asset_loaded(Ok(loaded("ISS", [0.0; 3], 1.0, cube_model())))
        .is_some());
    assert_eq!(
        showcase.on_asset_loaded(Ok(loaded("ISS", [10.0; 3], 1.0, cube_model()))),
        None
    );
    assert_eq!(showcase.scene.registry.len(), 1);
}

#[test]
fn earth_and_sputnik_scenario() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene
        .register_asset(loaded("Earth", [0.0, 0.0, 0.0], 100.0, cube_model()))
        .unwrap();
    scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model()))
        .unwrap();
    let camera = orbit_showcase::camera::Camera::new([0.0, 0.0, -500.0], cgmath::Deg(-90.0), cgmath::Deg(0.0));

    let through_sputnik = resolve_click(center(), VIEWPORT, &camera, &projection(), &scene);
    let empty_space = resolve_click(PhysicalPosition::new(20.0, 20.0), VIEWPORT, &camera, &projection(), &scene);

    assert_eq!(through_sputnik.map(|hit| hit.entity), Some("Sputnik".to_string()));
    assert!(empty_space.is_none());
}

#[test]
fn missing_sputnik_record_opens_no_panel() {
    let mut showcase = orbit_showcase::viewer::Showcase::new(
        InfoTable::default(),
        orbit_showcase::animator::CameraAnimator::default(),
        Duration::from_secs(2),
    );
    showcase.on_asset_loaded(Ok(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, cube_model())));
    let mut camera = camera_at_origin();

    for _ in 0..2 {
        let outcome = showcase.on_click(center(), VIEWPORT, &mut camera, &projection(), Instant::now());
        assert_eq!(outcome, ClickOutcome::NoInfo("Sputnik".to_string()));
        assert!(!showcase.panel.is_open());
        assert!(!showcase.animator.is_transitioning());
    }
}

#[test]
fn axis_parallel_ray_grazing_a_box_face_still_hits() {
    use cgmath::Vector3;
    use orbit_showcase::data_structures::model::{Aabb, Ray};

    let bounds = Aabb {
        min: Vector3::new(-1.0, -1.0, -1.0),
        max: Vector3::new(1.0, 1.0, 1.0),
    };
    // Origin lies exactly on the x = 1 slab plane with no x motion.
    let on_face = Ray::new(Vector3::new(1.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
    let outside = Ray::new(Vector3::new(2.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(bounds.intersect_ray(&on_face), Some(4.0));
    assert_eq!(bounds.intersect_ray(&outside), None);
}
