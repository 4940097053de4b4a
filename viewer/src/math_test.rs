#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn empty_box_has_zero_size() {
    let aabb = Aabb::empty();
    assert!(aabb.is_empty());
    assert_eq!(aabb.size(), Vec3::ZERO);
    assert_eq!(aabb.max_dimension(), 0.0);
}

#[test]
fn from_points_tracks_extremes() {
    let aabb = Aabb::from_points([Vec3::new(-1.0, 2.0, 0.5), Vec3::new(3.0, -4.0, 0.0)]);
    assert_eq!(aabb.min, Vec3::new(-1.0, -4.0, 0.0));
    assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 0.5));
    assert_eq!(aabb.center(), Vec3::new(1.0, -1.0, 0.25));
    assert_eq!(aabb.max_dimension(), 6.0);
}

#[test]
fn union_ignores_empty_boxes() {
    let mut a = Aabb::from_points([Vec3::ZERO, Vec3::ONE]);
    a.union(&Aabb::empty());
    assert_eq!(a.max, Vec3::ONE);
    a.union(&Aabb::from_points([Vec3::splat(2.0)]));
    assert_eq!(a.max, Vec3::splat(2.0));
}

#[test]
fn transformed_applies_scale_and_translation() {
    let aabb = Aabb::from_points([Vec3::splat(-1.0), Vec3::splat(1.0)]);
    let m = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
    let t = aabb.transformed(&m);
    assert_eq!(t.min, Vec3::new(8.0, -2.0, -2.0));
    assert_eq!(t.max, Vec3::new(12.0, 2.0, 2.0));
}

#[test]
fn rgb_css_and_unit_round_trip() {
    let accent = Rgb(0x00f5_c10e);
    assert_eq!(accent.to_css(), "#f5c10e");
    let unit = accent.to_unit();
    assert_eq!(Rgb::from_unit(unit.x, unit.y, unit.z), accent);
}

#[test]
fn rgb_from_unit_clamps() {
    assert_eq!(Rgb::from_unit(2.0, -1.0, 1.0), Rgb(0x00ff_00ff));
}
