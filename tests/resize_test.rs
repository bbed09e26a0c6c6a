use instant::Duration;
use orbit_showcase::{
    camera::{CameraController, Projection},
    config::{LightSettings, OutlineSettings, ShowcaseConfig},
    context::sync_viewport,
    data_structures::info::InfoTable,
    pipelines::{fxaa::FxaaUniform, light::LightUniform, outline::OutlineUniform},
    render::collect_draws,
    scene::SceneContext,
};

use crate::common::test_utils::{cube_model, loaded, loaded_scenery, nested_cube_model};

mod common;

#[test]
fn viewport_changes_keep_projection_controller_and_fxaa_in_step() {
    let mut projection = Projection::new(800, 600, cgmath::Deg(60.0), 1.0, 1e6);
    let mut controller = CameraController::new(50.0, 0.15);
    let mut fxaa = FxaaUniform::for_size(800, 600);

    sync_viewport(1920, 1080, &mut projection, &mut controller, &mut fxaa);

    assert_eq!(projection.aspect, 1920.0 / 1080.0);
    assert_eq!(controller.view_half_size(), (960.0, 540.0));
    assert_eq!(fxaa.resolution(), [1.0 / 1920.0, 1.0 / 1080.0]);

    sync_viewport(640, 480, &mut projection, &mut controller, &mut fxaa);

    assert_eq!(projection.aspect, 640.0 / 480.0);
    assert_eq!(controller.view_half_size(), (320.0, 240.0));
    assert_eq!(fxaa.resolution(), [1.0 / 640.0, 1.0 / 480.0]);
}

#[test]
fn zero_sized_viewports_do_not_divide_by_zero() {
    let fxaa = FxaaUniform::for_size(0, 0);
    assert_eq!(fxaa.resolution(), [1.0, 1.0]);

    let projection = Projection::new(800, 0, cgmath::Deg(60.0), 1.0, 1e6);
    assert!(projection.aspect.is_finite());
}

#[test]
fn outline_defaults_and_texel_size() {
    let settings = OutlineSettings::default();
    assert_eq!(settings.edge_strength, 2.0);
    assert_eq!(settings.edge_thickness, 1.0);
    assert_eq!(settings.visible_edge_color, [1.0, 1.0, 1.0]);

    let mut uniform = OutlineUniform::new(&settings, 800, 600);
    assert_eq!(uniform.texel_size(), [1.0 / 800.0, 1.0 / 600.0]);
    uniform.set_size(1024, 768);
    assert_eq!(uniform.texel_size(), [1.0 / 1024.0, 1.0 / 768.0]);
}

#[test]
fn uniform_sizes_match_the_shader_layouts() {
    assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    assert_eq!(std::mem::size_of::<OutlineUniform>(), 32);
    assert_eq!(std::mem::size_of::<FxaaUniform>(), 16);
}

#[test]
fn light_intensities_are_divided_by_pi() {
    let light = LightUniform::from_settings(&LightSettings::default());
    let pi = std::f32::consts::PI;

    assert!(light.ambient().iter().all(|c| (c - 3.0 / pi).abs() < 1e-6));
    assert!(light.color().iter().all(|c| (c - 1.0 / pi).abs() < 1e-6));

    let [x, y, z] = light.direction();
    let length = (5.0f32 * 5.0 + 10.0 * 10.0 + 7.5 * 7.5).sqrt();
    assert!((x - 5.0 / length).abs() < 1e-6);
    assert!((y - 10.0 / length).abs() < 1e-6);
    assert!((z - 7.5 / length).abs() < 1e-6);
}

#[test]
fn light_at_the_origin_points_down_from_above() {
    let settings = LightSettings {
        directional_position: [0.0; 3],
        ..Default::default()
    };
    assert_eq!(LightUniform::from_settings(&settings).direction(), [0.0, 1.0, 0.0]);
}

#[test]
fn only_selectable_meshes_are_highlighted() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    scene
        .register_asset(loaded("Sputnik", [0.0, 0.0, -1000.0], 5.0, nested_cube_model()))
        .unwrap();
    scene.register_asset(loaded_scenery("Earth", [0.0; 3], 100.0)).unwrap();

    let draws = collect_draws(&scene);

    // Group and root nodes carry no mesh.
    assert_eq!(draws.len(), 2);
    let sputnik_mesh = &draws[0];
    assert!(sputnik_mesh.highlight);
    assert_eq!(sputnik_mesh.world.w.truncate(), cgmath::Vector3::new(0.0, 0.0, -1000.0));
    assert!(!draws[1].highlight);
}

#[test]
fn draws_grow_as_assets_arrive() {
    let mut scene = SceneContext::new(InfoTable::satellites());
    assert!(collect_draws(&scene).is_empty());

    scene
        .register_asset(loaded("Voyager", [0.0, 100.0, 1000.0], 3.0, cube_model()))
        .unwrap();
    let before = collect_draws(&scene);
    scene
        .register_asset(loaded("ISS", [1000.0, 300.0, 0.0], 2.0, cube_model()))
        .unwrap();
    let after = collect_draws(&scene);

    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
}

#[test]
fn default_configuration() {
    let config = ShowcaseConfig::default();

    assert_eq!(config.asset_root, "assets");
    assert_eq!(config.fly_to_duration, Duration::from_secs(2));
    assert_eq!(config.fly_to_standoff, cgmath::Vector3::new(0.0, 0.0, 100.0));
    assert_eq!(config.catalog.len(), 7);
    assert_eq!(config.catalog.iter().filter(|r| r.selectable).count(), 4);
    assert!(config.catalog.iter().all(|r| r.file_name == "scene.gltf"));
}

#[test]
fn instance_data_carries_the_highlight_flag() {
    use orbit_showcase::data_structures::instance::{Instance, InstanceRaw};

    let world = Instance::placed([1.0, 2.0, 3.0], [2.0; 3]).to_matrix();

    assert!(InstanceRaw::new(&world, true).is_highlighted());
    assert!(!InstanceRaw::new(&world, false).is_highlighted());
    assert_eq!(std::mem::size_of::<InstanceRaw>(), 26 * 4);
}
