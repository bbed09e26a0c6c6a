//! Application event loop.
//!
//! [`run`] opens the window and drives the showcase until it is closed. The
//! event loop owns all scene state; asset loads run as async tasks and report
//! back through the winit [`EventLoopProxy`] as [`FlowEvent::AssetLoaded`].
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window events and forward input to the controller and the showcase
//! 2. Register assets whose loads completed since the last frame
//! 3. Advance the camera animator (wall clock) and the first-person controller (frame delta)
//! 4. Upload the camera and any newly registered meshes
//! 5. Render: scene pass, outline pass, FXAA pass, overlay pass
//! 6. Present frame

use std::{fmt::Debug, iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    animator::CameraAnimator,
    camera::CameraResources,
    config::ShowcaseConfig,
    context::Context,
    data_structures::info::InfoTable,
    render::SceneRenderer,
    resources::loader::{AssetLoader, LoadError, LoadedAsset},
    viewer::Showcase,
};

pub enum FlowEvent {
    /// The GPU context finished initializing (the web initializes asynchronously).
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    AssetLoaded(Result<LoadedAsset, (String, LoadError)>),
    #[allow(dead_code)]
    Exit,
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_arch = "wasm32")]
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::AssetLoaded(Ok(asset)) => f.debug_tuple("AssetLoaded").field(&asset.request.display_name).finish(),
            Self::AssetLoaded(Err((name, e))) => f.debug_tuple("AssetLoadFailed").field(name).field(e).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

/// GPU context, interaction state and GPU scene, bundled once the window exists.
#[derive(Debug)]
pub struct AppState {
    ctx: Context,
    showcase: Showcase,
    renderer: SceneRenderer,
    pointer: PhysicalPosition<f64>,
    is_surface_configured: bool,
    /// Panel title and viewport the overlay was last built for.
    overlay_for: Option<(Option<&'static str>, (u32, u32))>,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &ShowcaseConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        let animator = CameraAnimator::new(config.fly_to_standoff);
        Ok(Self {
            ctx,
            showcase: Showcase::new(InfoTable::satellites(), animator, config.fly_to_duration),
            renderer: SceneRenderer::new(),
            pointer: PhysicalPosition::new(0.0, 0.0),
            is_surface_configured: false,
            overlay_for: None,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn update(&mut self, now: Instant, dt: instant::Duration) {
        let CameraResources { camera, controller, .. } = &mut self.ctx.camera;
        self.showcase.on_update(now, dt, camera, controller);
        self.ctx.camera.write_to_buffer(&self.ctx.queue, &self.ctx.projection);
    }

    fn prepare_overlay(&mut self) {
        let size = self.ctx.size();
        let key = (self.showcase.panel.current().map(|r| r.title), size);
        if self.overlay_for == Some(key) {
            return;
        }
        let layout = self.showcase.panel.layout(size.0, size.1);
        let quads = layout.map(|l| l.quads().to_vec()).unwrap_or_default();
        self.ctx.overlay.prepare(&self.ctx.device, &quads, size.0, size.1);
        #[cfg(feature = "ui")]
        {
            let panel = self.showcase.panel.current().zip(layout);
            if let Err(e) = self
                .ctx
                .text
                .prepare(&self.ctx.device, &self.ctx.queue, panel, size.0, size.1)
            {
                log::error!("Could not lay out the panel text: {}", e);
            }
        }
        self.overlay_for = Some(key);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.renderer
            .sync(&self.ctx.device, &self.ctx.queue, &self.showcase.scene, &self.ctx.material_layout);
        self.prepare_overlay();

        let output = self.ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.ctx.targets.scene_color.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.ctx.targets.mask.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    }),
                ],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.targets.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.renderer.draw(
                &mut render_pass,
                &self.ctx.model_pipeline,
                &self.ctx.camera.bind_group,
                &self.ctx.light.bind_group,
            );
        }
        self.ctx.outline.draw(&mut encoder, &self.ctx.targets.outlined.view);
        self.ctx.fxaa.draw(&mut encoder, &view);
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.ctx.overlay.draw(&mut render_pass);
            #[cfg(feature = "ui")]
            if let Err(e) = self.ctx.text.draw(&mut render_pass) {
                log::error!("Could not draw the panel text: {}", e);
            }
        }
        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        #[cfg(feature = "ui")]
        self.ctx.text.trim();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    config: ShowcaseConfig,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: ShowcaseConfig) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            config,
            state: None,
            last_time: Instant::now(),
        })
    }

    /// Starts loading every catalog asset. Completions arrive as
    /// [`FlowEvent::AssetLoaded`] in whatever order they finish.
    fn spawn_loads(&self) {
        let loader = AssetLoader::new(self.config.asset_root.clone());
        for request in self.config.catalog.iter().cloned() {
            let loader = loader.clone();
            let proxy = self.proxy.clone();
            let load = async move {
                let name = request.display_name.clone();
                let result = loader.load(request).await.map_err(|e| (name.clone(), e));
                if proxy.send_event(FlowEvent::AssetLoaded(result)).is_err() {
                    log::warn!("Event loop closed before {} finished loading.", name);
                }
            };
            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(load);
            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(load);
        }
    }

    fn start(&mut self, mut state: AppState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        state.ctx.window.request_redraw();
        self.state = Some(state);
        self.last_time = Instant::now();
        self.spawn_loads();
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(self.config.window_title.clone());

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::error!("No element with id {} to render into.", CANVAS_ID),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window, &self.config)) {
                Ok(state) => self.start(state),
                Err(e) => {
                    log::error!("App initialization failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match AppState::new(window, &config).await {
                    Ok(state) => {
                        if proxy.send_event(FlowEvent::Initialized(Box::new(state))).is_err() {
                            log::error!("Event loop closed during initialization.");
                        }
                    }
                    Err(e) => {
                        log::error!("App initialization failed: {:#}", e);
                        let _ = proxy.send_event(FlowEvent::Exit);
                    }
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            FlowEvent::Initialized(state) => self.start(*state),
            FlowEvent::AssetLoaded(result) => match &mut self.state {
                Some(state) => {
                    state.showcase.on_asset_loaded(result);
                }
                None => log::warn!("Dropping {:?}: the app is not initialized.", FlowEvent::AssetLoaded(result)),
            },
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: winit::window::WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // general stuff
        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => state.pointer = position,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => state.showcase.on_escape(),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => match (button, button_state.is_pressed()) {
                (MouseButton::Left, true) => {
                    let viewport = state.ctx.size();
                    let outcome = state.showcase.on_click(
                        state.pointer,
                        viewport,
                        &mut state.ctx.camera.camera,
                        &state.ctx.projection,
                        Instant::now(),
                    );
                    log::debug!("Click at {:?}: {:?}", state.pointer, outcome);
                }
                (MouseButton::Right, pressed) => state.ctx.camera.controller.set_looking(pressed),
                _ => (),
            },
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_time);
                self.last_time = now;
                state.update(now, dt);

                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens the window and runs the showcase until it is closed.
pub fn run(config: ShowcaseConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).map_err(|e| anyhow::anyhow!("Could not initialize logger: {}", e))?;
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
