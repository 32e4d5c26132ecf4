use std::path::{Path, PathBuf};

use zoo_ngin::{
    data_structures::model::ModelVertex,
    resources::{
        ModelFormat,
        mesh::{compute_normals, compute_tangents},
        gltf_buffers, gltf_image_data, resolve_beside, resolve_in,
        texture::linear_to_srgb_u8,
    },
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn asset_paths_are_relative_to_the_root() {
    assert_eq!(
        resolve_in(Path::new("assets"), "zoo/Zoo.gltf"),
        PathBuf::from("assets/zoo/Zoo.gltf")
    );
    assert_eq!(
        resolve_in(Path::new("assets"), "/srv/zoo/Zoo.gltf"),
        PathBuf::from("/srv/zoo/Zoo.gltf")
    );
}

#[test]
fn material_files_are_relative_to_the_model() {
    assert_eq!(
        resolve_beside(Path::new("assets/zoo/cube.obj"), "cube.mtl"),
        PathBuf::from("assets/zoo/cube.mtl")
    );
    assert_eq!(
        resolve_beside(Path::new("cube.obj"), "textures/stone.png"),
        PathBuf::from("textures/stone.png")
    );
}

/// 1x1 opaque red PNG.
const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

fn embedded_gltf() -> gltf::Gltf {
    let json = format!(
        r#"{{
            "asset": {{ "version": "2.0" }},
            "buffers": [
                {{ "byteLength": 4, "uri": "data:application/octet-stream;base64,AAECAw==" }}
            ],
            "images": [
                {{ "uri": "data:image/png;base64,{RED_PIXEL_PNG}" }}
            ]
        }}"#
    );
    gltf::Gltf::from_slice(json.as_bytes()).unwrap()
}

#[test]
fn embedded_buffers_are_decoded() {
    let gltf = embedded_gltf();
    let buffers = gltf_buffers(&gltf, Path::new("assets/animals/exported.gltf")).unwrap();
    assert_eq!(buffers.len(), 1);
    assert_eq!(buffers[0].0[..4], [0u8, 1, 2, 3]);
}

#[test]
fn embedded_images_are_decoded() {
    let gltf = embedded_gltf();
    let path = Path::new("assets/animals/exported.gltf");
    let buffers = gltf_buffers(&gltf, path).unwrap();
    let image = gltf
        .images()
        .next()
        .map(|image| gltf_image_data(path, image.source(), &buffers).unwrap())
        .unwrap();

    let rgba = image.to_rgba8();
    assert_eq!(rgba.dimensions(), (1, 1));
    assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn missing_buffer_files_are_errors() {
    let json = r#"{
        "asset": { "version": "2.0" },
        "buffers": [ { "byteLength": 4, "uri": "does_not_exist.bin" } ]
    }"#;
    let gltf = gltf::Gltf::from_slice(json.as_bytes()).unwrap();
    assert!(gltf_buffers(&gltf, Path::new("/nonexistent/model.gltf")).is_err());
}

#[test]
fn model_format_follows_the_extension() {
    assert_eq!(
        ModelFormat::from_path(Path::new("animals/bird/scene.GLB")).unwrap(),
        ModelFormat::Gltf
    );
    assert_eq!(
        ModelFormat::from_path(Path::new("zoo/Zoo.gltf")).unwrap(),
        ModelFormat::Gltf
    );
    assert_eq!(
        ModelFormat::from_path(Path::new("cube.obj")).unwrap(),
        ModelFormat::Obj
    );
    assert!(ModelFormat::from_path(Path::new("lion.fbx")).is_err());
    assert!(ModelFormat::from_path(Path::new("README")).is_err());
}

#[test]
fn base_colours_are_converted_to_srgb() {
    assert_eq!(linear_to_srgb_u8(0.0), 0);
    assert_eq!(linear_to_srgb_u8(1.0), 255);
    assert_eq!(linear_to_srgb_u8(0.5), 188);
    assert_eq!(linear_to_srgb_u8(-1.0), 0);
    assert_eq!(linear_to_srgb_u8(2.0), 255);
}

fn quad(uvs: [[f32; 2]; 4]) -> (Vec<ModelVertex>, Vec<u32>) {
    let positions = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];
    let vertices = positions
        .into_iter()
        .zip(uvs)
        .map(|(position, tex_coords)| ModelVertex {
            position,
            tex_coords,
            normal: [0.0, 0.0, 1.0],
            ..Default::default()
        })
        .collect();
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

#[test]
fn tangents_follow_the_uv_layout() {
    let (mut vertices, indices) = quad([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    compute_tangents(&mut vertices, &indices);

    for vertex in &vertices {
        let [tx, ty, tz] = vertex.tangent;
        assert_close(tx, 1.0);
        assert_close(ty, 0.0);
        assert_close(tz, 0.0);
        // flipped for wgpu's texture origin
        let [bx, by, bz] = vertex.bitangent;
        assert_close(bx, 0.0);
        assert_close(by, -1.0);
        assert_close(bz, 0.0);
    }
}

#[test]
fn degenerate_uvs_leave_tangents_empty() {
    let (mut vertices, indices) = quad([[0.5, 0.5]; 4]);
    compute_tangents(&mut vertices, &indices);
    assert!(vertices.iter().all(|v| v.tangent == [0.0; 3] && v.bitangent == [0.0; 3]));
}

#[test]
fn missing_normals_are_computed_from_the_faces() {
    let (mut vertices, indices) = quad([[0.0, 0.0]; 4]);
    vertices.iter_mut().for_each(|v| v.normal = [0.0; 3]);
    compute_normals(&mut vertices, &indices);

    for vertex in &vertices {
        assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
    }
}

#[test]
fn out_of_range_indices_are_skipped() {
    let (mut vertices, _) = quad([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    compute_tangents(&mut vertices, &[0, 1, 7]);
    compute_normals(&mut vertices, &[0, 1, 7]);
    assert!(vertices.iter().all(|v| v.tangent == [0.0; 3]));
}
