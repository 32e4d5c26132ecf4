use cgmath::{InnerSpace, Matrix4, Point3, Vector3, Vector4};
use zoo_ngin::sky::{SkyUniform, sphere};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn sphere_has_a_vertex_per_grid_point() {
    let (vertices, indices) = sphere(5.0, 64, 64);
    assert_eq!(vertices.len(), 65 * 65);
    assert_eq!(indices.len(), 6 * 64 * 64);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
}

#[test]
fn every_vertex_lies_on_the_radius() {
    let (vertices, _) = sphere(5.0, 32, 16);
    for vertex in &vertices {
        assert_close(Vector3::from(vertex.position).magnitude(), 5.0);
    }
}

#[test]
fn texture_coordinates_stay_off_the_border() {
    let sectors = 64;
    let (vertices, _) = sphere(5.0, sectors, 64);
    let pad = 0.5 / sectors as f32;

    let north_pole = vertices[0];
    assert_close(north_pole.position[0], 0.0);
    assert_close(north_pole.position[1], 5.0);
    assert_close(north_pole.position[2], 0.0);
    // u runs backwards along the row
    assert_close(north_pole.uv[0], 1.0 - pad);
    assert_close(vertices[sectors as usize].uv[0], pad);

    for vertex in &vertices {
        let [u, v] = vertex.uv;
        assert!((pad - 1e-6..=1.0 - pad + 1e-6).contains(&u), "u = {u}");
        assert!((0.001..=0.999).contains(&v), "v = {v}");
    }
}

#[test]
fn triangles_follow_the_grid() {
    let (_, indices) = sphere(1.0, 4, 2);
    // first quad of the first stack
    assert_eq!(&indices[..6], &[0, 5, 1, 5, 6, 1]);
}

#[test]
fn degenerate_resolution_is_clamped() {
    let (vertices, indices) = sphere(1.0, 0, 0);
    assert_eq!(vertices.len(), 4);
    assert_eq!(indices.len(), 6);
}

#[test]
fn dome_is_centred_and_turned_inside_out() {
    let uniform = SkyUniform::around(Point3::new(1.0, 2.0, 3.0), 500.0);
    let model = Matrix4::from(uniform.model);

    let moved = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert_close(moved.x, -499.0);
    assert_close(moved.y, 2.0);
    assert_close(moved.z, 3.0);

    let centre = model * Vector4::new(0.0, 0.0, 0.0, 1.0);
    assert_eq!(centre.truncate(), Vector3::new(1.0, 2.0, 3.0));
}
