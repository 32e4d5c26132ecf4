use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::data_structures::model::{self, ModelVertex};

/**
 * Obj files (and some glTF exports) don't come with tangents and bitangents so
 * they have to be calculated from the UV layout for normal maps to work.
 *
 * Triangles whose UVs are degenerate contribute nothing; a vertex only touched
 * by such triangles keeps a zero tangent, which the shader treats as "no normal
 * map".
 */
pub fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in indices.chunks_exact(3) {
        let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let pos0: cgmath::Vector3<_> = v0.position.into();
        let pos1: cgmath::Vector3<_> = v1.position.into();
        let pos2: cgmath::Vector3<_> = v2.position.into();

        let uv0: cgmath::Vector2<_> = v0.tex_coords.into();
        let uv1: cgmath::Vector2<_> = v1.tex_coords.into();
        let uv2: cgmath::Vector2<_> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solves
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // We flip the bitangent to enable right-handed normal
        // maps with wgpu texture coordinate system
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [i0, i1, i2] {
            let v = &mut vertices[i];
            v.tangent = (tangent + cgmath::Vector3::from(v.tangent)).into();
            v.bitangent = (bitangent + cgmath::Vector3::from(v.bitangent)).into();
            triangles_included[i] += 1;
        }
    }

    // Average the tangents/bitangents
    for (v, n) in vertices.iter_mut().zip(triangles_included) {
        if n > 0 {
            let denom = 1.0 / n as f32;
            v.tangent = (cgmath::Vector3::from(v.tangent) * denom).into();
            v.bitangent = (cgmath::Vector3::from(v.bitangent) * denom).into();
        }
    }
}

/// Area weighted vertex normals for meshes exported without any.
pub fn compute_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut sums = vec![cgmath::Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    for c in indices.chunks_exact(3) {
        let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let p0: cgmath::Vector3<f32> = vertices[i0].position.into();
        let p1: cgmath::Vector3<f32> = vertices[i1].position.into();
        let p2: cgmath::Vector3<f32> = vertices[i2].position.into();
        // the cross product's length is twice the triangle area
        let face = (p1 - p0).cross(p2 - p0);
        for i in [i0, i1, i2] {
            sums[i] += face;
        }
    }
    for (v, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > 0.0 {
            v.normal = sum.normalize().into();
        }
    }
}

/// Vertices of a single-indexed OBJ mesh. OBJ UVs have their origin bottom left.
pub fn obj_vertices(mesh: &tobj::Mesh) -> Vec<ModelVertex> {
    (0..mesh.positions.len() / 3)
        .map(|i| ModelVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
            // We'll calculate these later
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        })
        .collect()
}

/// Creates vertex and index buffers for one mesh.
pub fn upload_mesh(
    device: &wgpu::Device,
    name: &str,
    vertices: &[ModelVertex],
    indices: &[u32],
    material: usize,
) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Vertex Buffer")),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Index Buffer")),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
        material,
    }
}

/// `fallback_material` is used for meshes without a material.
pub fn load_meshes(
    models: &[tobj::Model],
    device: &wgpu::Device,
    fallback_material: usize,
) -> Vec<model::Mesh> {
    models
        .iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .map(|m| {
            let mut vertices = obj_vertices(&m.mesh);
            if m.mesh.normals.is_empty() {
                compute_normals(&mut vertices, &m.mesh.indices);
            }
            compute_tangents(&mut vertices, &m.mesh.indices);
            upload_mesh(
                device,
                &m.name,
                &vertices,
                &m.mesh.indices,
                m.mesh.material_id.unwrap_or(fallback_material),
            )
        })
        .collect()
}
