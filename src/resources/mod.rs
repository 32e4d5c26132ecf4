//! Asset lookup and model import.
//!
//! Asset paths are relative to the asset root: the `ZOO_ASSETS` environment
//! variable if set, `./assets` otherwise. Paths referenced from inside a model
//! (buffers, images, material libraries) are resolved against the directory of
//! that model file.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use crate::{
    data_structures::{
        instance::Instance,
        model::{self, Material, ModelVertex},
        scene_graph::{ContainerNode, ModelNode, SceneNode},
        texture::Texture,
    },
    resources::texture::{
        diffuse_normal_layout, fallback_for, linear_to_srgb_u8, load_binary,
    },
};

pub mod mesh;
pub mod texture;

pub const ASSET_ROOT_VAR: &str = "ZOO_ASSETS";

pub fn asset_root() -> PathBuf {
    std::env::var_os(ASSET_ROOT_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./assets"))
}

/// `file_name` below the asset root, or as-is if it is absolute.
pub fn resolve_asset(file_name: &str) -> PathBuf {
    resolve_in(&asset_root(), file_name)
}

pub fn resolve_in(root: &Path, file_name: &str) -> PathBuf {
    let path = Path::new(file_name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// `file_name` as referenced from inside `referrer`, relative to the
/// referrer's directory.
pub fn resolve_beside(referrer: &Path, file_name: &str) -> PathBuf {
    resolve_in(model_dir(referrer), file_name)
}

fn model_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Gltf,
    Obj,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("gltf") | Some("glb") => Ok(Self::Gltf),
            Some("obj") => Ok(Self::Obj),
            Some(other) => bail!("unsupported model format .{other} ({})", path.display()),
            None => bail!("model path {} has no extension", path.display()),
        }
    }
}

/// Loads a model and prepares `amount` instances of every node in it.
pub async fn load_model(
    file_name: &str,
    amount: usize,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let path = resolve_asset(file_name);
    let node: Box<dyn SceneNode> = match ModelFormat::from_path(&path)? {
        ModelFormat::Gltf => load_model_gltf(&path, amount, device, queue).await?,
        ModelFormat::Obj => {
            let model = load_model_obj(&path, device, queue).await?;
            Box::new(ModelNode::from_model(amount, device, model))
        }
    };
    log::info!("Loaded {}", path.display());
    Ok(node)
}

pub async fn load_model_obj(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<model::Model> {
    let bind_group_layout = diffuse_normal_layout(device);

    let (mut materials, models) =
        texture::load_textures(path, queue, device, &bind_group_layout).await?;
    materials.push(Material::fallback(device, queue, &bind_group_layout));
    let meshes = mesh::load_meshes(&models, device, materials.len() - 1);
    if meshes.is_empty() {
        log::warn!("{} contains no triangles.", path.display());
    }

    Ok(model::Model { meshes, materials })
}

/// Reads every buffer of `gltf`: the binary chunk, files next to `path` and
/// base64 `data:` URIs.
pub fn gltf_buffers(gltf: &gltf::Gltf, path: &Path) -> anyhow::Result<Vec<gltf::buffer::Data>> {
    gltf::import_buffers(&gltf.document, Some(model_dir(path)), gltf.blob.clone())
        .with_context(|| format!("cannot load the buffers of {}", path.display()))
}

/// Decodes an image of the glTF file at `path`, wherever it is stored.
pub fn gltf_image_data(
    path: &Path,
    source: gltf::image::Source<'_>,
    buffers: &[gltf::buffer::Data],
) -> anyhow::Result<image::DynamicImage> {
    // `Data::from_source` indexes the buffers without checking
    if let gltf::image::Source::View { view, .. } = &source {
        let in_bounds = buffers
            .get(view.buffer().index())
            .is_some_and(|buffer| view.offset() + view.length() <= buffer.len());
        if !in_bounds {
            bail!("image view {} is out of bounds in {}", view.index(), path.display());
        }
    }
    let data = gltf::image::Data::from_source(source, Some(model_dir(path)), buffers)
        .with_context(|| format!("cannot load an image of {}", path.display()))?;
    pixels_to_image(data)
}

fn pixels_to_image(data: gltf::image::Data) -> anyhow::Result<image::DynamicImage> {
    use gltf::image::Format;
    use image::{DynamicImage, ImageBuffer};

    let gltf::image::Data {
        pixels,
        format,
        width,
        height,
    } = data;
    let image = match format {
        Format::R8 => ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        Format::R8G8 => ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageLumaA8),
        Format::R8G8B8 => ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        Format::R8G8B8A8 => {
            ImageBuffer::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
        }
        Format::R16 => ImageBuffer::from_raw(width, height, wide(&pixels))
            .map(DynamicImage::ImageLuma16),
        Format::R16G16 => ImageBuffer::from_raw(width, height, wide(&pixels))
            .map(DynamicImage::ImageLumaA16),
        Format::R16G16B16 => ImageBuffer::from_raw(width, height, wide(&pixels))
            .map(DynamicImage::ImageRgb16),
        Format::R16G16B16A16 => ImageBuffer::from_raw(width, height, wide(&pixels))
            .map(DynamicImage::ImageRgba16),
        other => bail!("unsupported pixel format {other:?}"),
    };
    image.with_context(|| format!("{width}x{height} image has the wrong number of pixels"))
}

/// 16 bit channels are stored as native endian byte pairs.
fn wide(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}

fn gltf_texture(
    path: &Path,
    image: gltf::Image<'_>,
    buffers: &[gltf::buffer::Data],
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Texture {
    let label = path.to_string_lossy();
    gltf_image_data(path, image.source(), buffers)
        .and_then(|img| Texture::from_image(device, queue, &img, Some(label.as_ref()), is_normal_map))
        .unwrap_or_else(|e| fallback_for(e, is_normal_map, device, queue))
}

pub async fn load_model_gltf(
    path: &Path,
    amount: usize,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let bytes = load_binary(path).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)
        .with_context(|| format!("cannot parse {}", path.display()))?;

    let buffer_data = gltf_buffers(&gltf, path)?;

    // Load materials
    let layout = diffuse_normal_layout(device);
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let pbr = material.pbr_metallic_roughness();
        let diffuse_texture = match pbr.base_color_texture() {
            Some(info) => {
                gltf_texture(path, info.texture().source(), &buffer_data, false, device, queue)
            }
            None => {
                let [r, g, b, a] = pbr.base_color_factor();
                Texture::solid(
                    device,
                    queue,
                    [
                        linear_to_srgb_u8(r),
                        linear_to_srgb_u8(g),
                        linear_to_srgb_u8(b),
                        (a.clamp(0.0, 1.0) * 255.0).round() as u8,
                    ],
                    material.name().unwrap_or("base colour"),
                )
            }
        };
        let normal_texture = match material.normal_texture() {
            Some(normal) => {
                gltf_texture(path, normal.texture().source(), &buffer_data, true, device, queue)
            }
            None => Texture::create_default_normal_map(1, 1, device, queue),
        };
        let name = material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} material {}", path.display(), materials.len()));
        materials.push(Material::new(
            device,
            &name,
            diffuse_texture,
            normal_texture,
            &layout,
        ));
    }
    materials.push(Material::fallback(device, queue, &layout));

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .with_context(|| format!("{} contains no scene", path.display()))?;

    let loader = GltfNodes {
        amount,
        buffers: &buffer_data,
        materials: &materials,
        device,
    };
    let mut models: Vec<Box<dyn SceneNode>> = scene.nodes().map(|node| loader.to_scene_node(node)).collect();

    let root_node = if models.len() == 1 {
        models.remove(0)
    } else {
        let mut root_node = ContainerNode::new(amount);
        root_node.children = models;
        Box::new(root_node)
    };

    Ok(root_node)
}

struct GltfNodes<'a> {
    amount: usize,
    buffers: &'a [gltf::buffer::Data],
    materials: &'a [Material],
    device: &'a wgpu::Device,
}

impl GltfNodes<'_> {
    fn to_scene_node(&self, node: gltf::scene::Node) -> Box<dyn SceneNode> {
        let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
            Some(mesh) => {
                let meshes = mesh
                    .primitives()
                    .filter_map(|primitive| self.primitive_mesh(&mesh, primitive))
                    .collect();
                let model = model::Model {
                    meshes,
                    materials: self.materials.to_vec(),
                };
                Box::new(ModelNode::from_model(self.amount, self.device, model))
            }
            None => Box::new(ContainerNode::new(self.amount)),
        };

        let (translation, [x, y, z, w], scale) = node.transform().decomposed();
        let local = Instance {
            position: translation.into(),
            rotation: cgmath::Quaternion::new(w, x, y, z),
            scale: scale.into(),
        };
        scene_node.set_local_transform_all(&mut |instance| *instance = local.clone());

        for child in node.children() {
            scene_node.add_child(self.to_scene_node(child));
        }
        scene_node
    }

    fn primitive_mesh(&self, mesh: &gltf::Mesh, primitive: gltf::Primitive) -> Option<model::Mesh> {
        let name = mesh.name().unwrap_or("unknown_mesh");
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("Skipping primitive of {name}: only triangle lists are supported.");
            return None;
        }
        let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(|data| &**data));

        let mut vertices: Vec<ModelVertex> = reader
            .read_positions()?
            .map(|position| ModelVertex {
                position,
                ..Default::default()
            })
            .collect();
        if let Some(normals) = reader.read_normals() {
            vertices
                .iter_mut()
                .zip(normals)
                .for_each(|(v, normal)| v.normal = normal);
        }
        if let Some(tex_coords) = reader.read_tex_coords(0) {
            vertices
                .iter_mut()
                .zip(tex_coords.into_f32())
                .for_each(|(v, uv)| v.tex_coords = uv);
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        if reader.read_normals().is_none() {
            mesh::compute_normals(&mut vertices, &indices);
        }
        match reader.read_tangents() {
            Some(tangents) => vertices.iter_mut().zip(tangents).for_each(|(v, tangent)| {
                // glTF stores the bitangent sign in w
                let tangent: cgmath::Vector4<f32> = tangent.into();
                let normal: cgmath::Vector3<f32> = v.normal.into();
                v.tangent = tangent.truncate().into();
                v.bitangent = (normal.cross(tangent.truncate()) * tangent.w).into();
            }),
            None => mesh::compute_tangents(&mut vertices, &indices),
        }

        let material = primitive
            .material()
            .index()
            .unwrap_or(self.materials.len() - 1);
        Some(mesh::upload_mesh(self.device, name, &vertices, &indices, material))
    }
}
