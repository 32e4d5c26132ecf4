use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use anyhow::Context;

use crate::{
    data_structures::{model, texture},
    resources::resolve_beside,
};

pub fn diffuse_normal_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Model texture_bind_group_layout"),
    })
}

pub async fn load_string(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}

pub async fn load_texture(
    path: &Path,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: Option<&str>,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(path).await?;
    texture::Texture::from_bytes(
        device,
        queue,
        &data,
        &path.to_string_lossy(),
        format,
        is_normal_map,
    )
}

/// Like [`load_texture`], but an unreadable image is replaced by the white
/// fallback (or the flat normal map) and reported with `log::error!`.
pub async fn load_texture_or_fallback(
    path: &Path,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: Option<&str>,
) -> texture::Texture {
    match load_texture(path, is_normal_map, device, queue, format).await {
        Ok(texture) => texture,
        Err(e) => fallback_for(e, is_normal_map, device, queue),
    }
}

pub(crate) fn fallback_for(
    error: anyhow::Error,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> texture::Texture {
    log::error!("Failed to load texture, using a fallback: {error:#}");
    if is_normal_map {
        texture::Texture::create_default_normal_map(1, 1, device, queue)
    } else {
        texture::Texture::fallback(device, queue)
    }
}

/// Converts a linear colour channel in `[0, 1]` to an 8 bit sRGB value.
pub fn linear_to_srgb_u8(channel: f32) -> u8 {
    let c = channel.clamp(0.0, 1.0);
    let srgb = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (srgb * 255.0).round() as u8
}

pub async fn load_textures(
    path: &Path,
    queue: &wgpu::Queue,
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<(Vec<model::Material>, Vec<tobj::Model>)> {
    let obj_text = load_string(path).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let mtl_path = resolve_beside(path, &p);
            async move {
                match load_string(&mtl_path).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::error!("{e:#}");
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await
    .with_context(|| format!("cannot parse {}", path.display()))?;

    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::error!(
            "Materials of {} could not be loaded ({e}); meshes are drawn plain white.",
            path.display()
        );
        Vec::new()
    });

    let mut materials = Vec::new();
    for m in obj_materials {
        let diffuse_texture = match (&m.diffuse_texture, m.diffuse) {
            (Some(file), _) => {
                load_texture_or_fallback(&resolve_beside(path, file), false, device, queue, None).await
            }
            (None, Some([r, g, b])) => texture::Texture::solid(
                device,
                queue,
                [
                    linear_to_srgb_u8(r),
                    linear_to_srgb_u8(g),
                    linear_to_srgb_u8(b),
                    255,
                ],
                &m.name,
            ),
            (None, None) => {
                log::error!(
                    "Material {} in {} references no texture.",
                    m.name,
                    path.display()
                );
                texture::Texture::fallback(device, queue)
            }
        };
        let normal_texture = match &m.normal_texture {
            Some(file) => {
                load_texture_or_fallback(&resolve_beside(path, file), true, device, queue, None).await
            }
            None => texture::Texture::create_default_normal_map(1, 1, device, queue),
        };
        materials.push(model::Material::new(
            device,
            &m.name,
            diffuse_texture,
            normal_texture,
            layout,
        ));
    }
    Ok((materials, models))
}
