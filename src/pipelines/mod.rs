//! Render pipelines and the uniforms only they use.
//!
//! - `basic` draws lit, textured, instanced models
//! - `sky` draws the dome around the camera
//! - `light` owns the light uniform bound by `basic`

pub mod basic;
pub mod light;
pub mod sky;

/// All pipelines the engine batches into.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            sky: sky::mk_sky_pipeline(device, config, camera_bind_group_layout),
        }
    }
}
