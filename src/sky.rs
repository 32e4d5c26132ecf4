//! Skydome.
//!
//! A UV sphere textured with an equirectangular image. The dome is centred on
//! the camera every frame and scaled by a negative factor, so its inside faces
//! the viewer and it never gets closer when walking around.

use cgmath::{Matrix4, Point3, SquareMatrix};
use instant::Duration;
use wgpu::util::DeviceExt;

use crate::{
    config::SkyConfig,
    context::{Context, InitContext},
    data_structures::texture::{self, Texture},
    flow::{GraphicsFlow, Out},
    pipelines::sky::sky_bind_group_layout,
    render::{Flat, Render},
    resources::{resolve_asset, texture::load_binary},
    scene::ZooState,
    title::Stage,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl SkyVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<SkyVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/**
 * UV sphere with `(sectors + 1) * (stacks + 1)` vertices, starting at the north
 * pole, and `6 * sectors * stacks` indices.
 *
 * `u` runs backwards and keeps half a texel away from the image border so the
 * seam does not sample across the edge; `v` stays inside `[0.001, 0.999]` for the
 * same reason at the poles.
 */
pub fn sphere(radius: f32, sectors: u32, stacks: u32) -> (Vec<SkyVertex>, Vec<u32>) {
    let sectors = sectors.max(1);
    let stacks = stacks.max(1);
    let pi = std::f32::consts::PI;
    let pad = 0.5 / sectors as f32;

    let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);
    for i in 0..=stacks {
        let stack_angle = pi * i as f32 / stacks as f32;
        let y = stack_angle.cos();
        let sin_stack = stack_angle.sin();
        for j in 0..=sectors {
            let sector_angle = 2.0 * pi * j as f32 / sectors as f32;
            let x = sector_angle.cos() * sin_stack;
            let z = sector_angle.sin() * sin_stack;

            let u0 = j as f32 / sectors as f32;
            let u = 1.0 - (pad + u0 * (1.0 - 2.0 * pad));
            let v = (i as f32 / stacks as f32).clamp(0.001, 0.999);
            vertices.push(SkyVertex {
                position: [x * radius, y * radius, z * radius],
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((6 * sectors * stacks) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let first = i * (sectors + 1) + j;
            let second = first + sectors + 1;
            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }
    (vertices, indices)
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyUniform {
    pub model: [[f32; 4]; 4],
}

impl SkyUniform {
    /// `T(center) * S(-scale)`
    pub fn around(center: Point3<f32>, scale: f32) -> Self {
        let model = Matrix4::from_translation(cgmath::Vector3::new(center.x, center.y, center.z))
            * Matrix4::from_scale(-scale);
        Self {
            model: model.into(),
        }
    }
}

impl Default for SkyUniform {
    fn default() -> Self {
        Self {
            model: Matrix4::identity().into(),
        }
    }
}

/// GPU side of the dome.
pub struct SkyDome {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: usize,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pub scale: f32,
}

impl SkyDome {
    pub fn new(device: &wgpu::Device, config: &SkyConfig, sky_texture: &Texture) -> Self {
        let (vertices, indices) = sphere(config.radius, config.sectors, config.stacks);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sky Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SkyUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = sky_texture
            .sampler
            .clone()
            .unwrap_or_else(|| texture::create_default_sampler(device));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &sky_bind_group_layout(device),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sky_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("sky_bind_group"),
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len(),
            uniform_buffer,
            bind_group,
            scale: config.scale,
        }
    }

    /// Moves the dome onto `center`.
    pub fn follow(&self, queue: &wgpu::Queue, center: Point3<f32>) {
        let uniform = SkyUniform::around(center, self.scale);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn render(&self) -> Render<'_> {
        Render::Sky(Flat {
            vertex: &self.vertex_buffer,
            index: &self.index_buffer,
            group: &self.bind_group,
            amount: self.num_indices,
        })
    }
}

pub struct SkyFlow {
    dome: SkyDome,
}

impl SkyFlow {
    /// A missing or broken sky image is replaced by the white fallback.
    pub async fn new(ctx: &InitContext, config: &SkyConfig) -> anyhow::Result<Self> {
        let path = resolve_asset(&config.texture);
        let sky_texture = match load_binary(&path).await.and_then(|bytes| {
            Texture::sky_from_bytes(&ctx.device, &ctx.queue, &bytes, &path.to_string_lossy())
        }) {
            Ok(sky_texture) => {
                log::info!("Loaded sky {}", path.display());
                sky_texture
            }
            Err(e) => {
                log::error!("Cannot load the sky image, using a fallback: {e:#}");
                Texture::fallback(&ctx.device, &ctx.queue)
            }
        };
        Ok(Self {
            dome: SkyDome::new(&ctx.device, config, &sky_texture),
        })
    }
}

impl GraphicsFlow<ZooState> for SkyFlow {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut ZooState) -> Out {
        self.dome.follow(&ctx.queue, ctx.camera.camera.position);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _state: &mut ZooState, _dt: Duration) -> Out {
        self.dome.follow(&ctx.queue, ctx.camera.camera.position);
        Out::Empty
    }

    fn on_render(&self, state: &ZooState) -> Render<'_> {
        if state.stage != Stage::Zoo {
            return Render::None;
        }
        self.dome.render()
    }
}
