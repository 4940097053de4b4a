use super::*;
use crate::consts::{BACKGROUND, TARGET_SIZE};
use crate::placeholder::placeholder_cube;

fn scene_with_cube() -> Scene {
    let mut scene = Scene::new(BACKGROUND);
    scene.attach_model(placeholder_cube(None, TARGET_SIZE));
    scene
}

#[test]
fn empty_scene_draws_nothing() {
    let scene = Scene::new(BACKGROUND);
    assert!(build_draw_list(&scene, &PerspectiveCamera::default(), 800.0, 600.0).is_empty());
}

#[test]
fn cube_in_front_of_camera_is_fully_listed() {
    let faces = build_draw_list(&scene_with_cube(), &PerspectiveCamera::default(), 800.0, 600.0);
    assert_eq!(faces.len(), 12);
    for face in &faces {
        for p in face.points {
            assert!((0.0..=800.0).contains(&p.x), "x out of view: {}", p.x);
            assert!((0.0..=600.0).contains(&p.y), "y out of view: {}", p.y);
        }
    }
}

#[test]
fn faces_are_sorted_back_to_front() {
    let faces = build_draw_list(&scene_with_cube(), &PerspectiveCamera::default(), 800.0, 600.0);
    assert!(faces.windows(2).all(|w| w[0].depth >= w[1].depth));
}

#[test]
fn model_behind_camera_is_skipped() {
    let mut scene = scene_with_cube();
    if let Some(mut cube) = scene.detach_model() {
        cube.translation = Vec3::new(10.0, 10.0, 10.0);
        scene.attach_model(cube);
    }
    assert!(build_draw_list(&scene, &PerspectiveCamera::default(), 800.0, 600.0).is_empty());
}

#[test]
fn lit_faces_are_brighter_than_ambient_only() {
    let faces = build_draw_list(&scene_with_cube(), &PerspectiveCamera::default(), 800.0, 600.0);
    let brightest = faces.iter().map(|f| f.color.to_unit().length()).fold(0.0_f32, f32::max);
    let ambient_only = (crate::consts::ACCENT.to_unit() * crate::consts::AMBIENT_COLOR.to_unit() * 0.8).length();
    assert!(brightest > ambient_only);
}

#[test]
fn point_light_falls_off_with_range() {
    let lights = [Light::Point { color: Rgb(0x00ff_ffff), intensity: 1.0, position: Vec3::new(0.0, 5.0, 0.0), range: 10.0 }];
    let near = incident_light(&lights, Vec3::new(0.0, 4.0, 0.0), Vec3::Y);
    let far = incident_light(&lights, Vec3::new(0.0, -4.0, 0.0), Vec3::Y);
    assert!(near.x > far.x);
    let outside = incident_light(&lights, Vec3::new(0.0, -6.0, 0.0), Vec3::Y);
    assert!(outside.x.abs() < 1e-6);
}
