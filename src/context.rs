//! The GPU and window context.
//!
//! [`Context`] owns the surface, device and queue together with everything
//! that depends on the surface size: the camera projection, the offscreen
//! targets of the post-processing chain and the passes bound to them.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{self, CameraController, CameraResources, Projection},
    config::ShowcaseConfig,
    data_structures::texture::Texture,
    pipelines::{
        basic::mk_model_pipeline,
        fxaa::{FxaaPass, FxaaUniform},
        light::{LightResources, LightUniform},
        outline::{OutlinePass, OutlineUniform},
        overlay::OverlayPass,
    },
    resources::texture::material_layout,
};

/**
 * Applies a new viewport size to the size-dependent state that lives on the
 * CPU: the projection's aspect ratio, the controller's cached half size and the
 * FXAA resolution. All three always change together.
 */
pub fn sync_viewport(
    width: u32,
    height: u32,
    projection: &mut Projection,
    controller: &mut CameraController,
    fxaa: &mut FxaaUniform,
) {
    projection.resize(width, height);
    controller.handle_resize(width, height);
    fxaa.set_size(width, height);
}

/// Offscreen targets of one frame: the scene pass writes colour, mask and
/// depth, the outline pass writes `outlined`, FXAA reads it into the surface.
#[derive(Debug)]
pub struct PostTargets {
    pub scene_color: Texture,
    pub mask: Texture,
    pub depth: Texture,
    pub outlined: Texture,
}

impl PostTargets {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let size = [width, height];
        Self {
            scene_color: Texture::create_render_target(device, size, format, "scene_color"),
            mask: Texture::create_render_target(device, size, Texture::MASK_FORMAT, "selection_mask"),
            depth: Texture::create_depth_texture(device, size, "depth_texture"),
            outlined: Texture::create_render_target(device, size, format, "outlined"),
        }
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub material_layout: wgpu::BindGroupLayout,
    pub model_pipeline: wgpu::RenderPipeline,
    pub targets: PostTargets,
    pub outline: OutlinePass,
    pub fxaa: FxaaPass,
    pub overlay: OverlayPass,
    #[cfg(feature = "ui")]
    pub text: crate::pipelines::text::PanelText,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &ShowcaseConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Could not open the GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are written in linear space and rely on an sRGB surface for encoding.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = camera::Camera::new(settings.camera_position, settings.camera_yaw, settings.camera_pitch);
        let mut projection = Projection::new(width, height, settings.fovy, settings.znear, settings.zfar);
        let mut controller = CameraController::new(settings.movement_speed, settings.look_speed);
        let mut fxaa_uniform = FxaaUniform::for_size(width, height);
        sync_viewport(width, height, &mut projection, &mut controller, &mut fxaa_uniform);
        let camera = CameraResources::new(&device, camera, controller, &projection);

        let light = LightResources::new(&device, LightUniform::from_settings(&settings.light));
        let material_layout = material_layout(&device);
        let model_pipeline = mk_model_pipeline(
            &device,
            config.format,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        let targets = PostTargets::new(&device, config.format, width, height);
        let outline = OutlinePass::new(
            &device,
            config.format,
            OutlineUniform::new(&settings.outline, width, height),
            &targets.scene_color,
            &targets.mask,
        );
        let fxaa = FxaaPass::new(&device, config.format, fxaa_uniform, &targets.outlined);
        let overlay = OverlayPass::new(&device, &config);
        #[cfg(feature = "ui")]
        let text = crate::pipelines::text::PanelText::new(&device, &queue, config.format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            material_layout,
            model_pipeline,
            targets,
            outline,
            fxaa,
            overlay,
            #[cfg(feature = "ui")]
            text,
            clear_colour: settings.clear_colour,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Resizes the surface and everything derived from its size. Zero sizes
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        sync_viewport(
            width,
            height,
            &mut self.projection,
            &mut self.camera.controller,
            &mut self.fxaa.uniform,
        );

        self.targets = PostTargets::new(&self.device, self.config.format, width, height);
        self.outline.resize(
            &self.device,
            &self.queue,
            width,
            height,
            &self.targets.scene_color,
            &self.targets.mask,
        );
        self.fxaa.rebind(&self.device, &self.queue, &self.targets.outlined);
        log::debug!("Resized to {}x{}", width, height);
        true
    }
}
