//! First-person camera, projection, controller and their GPU uniform.
//!
//! The camera stores a position plus yaw/pitch. Orientation can be set directly
//! (mouse look) or derived from a target point with [`Camera::look_at`], which
//! is what the fly-to animation does on every step.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::data_structures::model::Ray;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = std::f32::consts::FRAC_PI_2 - 0.0001;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Rotation around Y, measured from +X towards +Z. -90° looks down -Z.
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(position: V, yaw: Y, pitch: P) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(Vector3::unit_y()).normalize()
    }

    pub fn up(&self) -> Vector3<f32> {
        self.right().cross(self.forward())
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// Re-orients the camera towards `target`. A target at the camera position
    /// leaves the orientation unchanged.
    pub fn look_at(&mut self, target: Point3<f32>) {
        let dir = target - self.position;
        if dir.magnitude2() < f32::EPSILON {
            return;
        }
        let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();
        self.yaw = Rad(dir.z.atan2(dir.x));
        self.pitch = Rad(dir.y.atan2(horizontal).clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
    }

    /**
     * Builds the world-space ray that passes through the pixel at `pointer`.
     *
     * `width` and `height` are the current viewport size in physical pixels.
     */
    pub fn cast_ray_from_mouse(
        &self,
        pointer: PhysicalPosition<f64>,
        width: f32,
        height: f32,
        projection: &Projection,
    ) -> Ray {
        let (ndc_x, ndc_y) = crate::pick::normalize_pointer(pointer, width, height);
        let tan_half = (projection.fovy.0 / 2.0).tan();
        let direction = self.forward()
            + self.right() * (ndc_x * projection.aspect * tan_half)
            + self.up() * (ndc_y * tan_half);
        Ray::new(Vector3::new(self.position.x, self.position.y, self.position.z), direction)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * First-person controls: WASD/arrow keys move, R/F move up and down, and holding
 * the right mouse button turns the view. While looking, the turn rate follows
 * the pointer's offset from the viewport centre, so the controller caches half
 * the viewport size and must be told about resizes.
 */
#[derive(Debug, Clone)]
pub struct CameraController {
    pub movement_speed: f32,
    pub look_speed: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_left: f32,
    amount_right: f32,
    amount_up: f32,
    amount_down: f32,
    looking: bool,
    pointer: PhysicalPosition<f64>,
    view_half_x: f32,
    view_half_y: f32,
}

impl CameraController {
    pub fn new(movement_speed: f32, look_speed: f32) -> Self {
        Self {
            movement_speed,
            look_speed,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_left: 0.0,
            amount_right: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            looking: false,
            pointer: PhysicalPosition::new(0.0, 0.0),
            view_half_x: 0.0,
            view_half_y: 0.0,
        }
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.view_half_x = width as f32 / 2.0;
        self.view_half_y = height as f32 / 2.0;
    }

    pub fn view_half_size(&self) -> (f32, f32) {
        (self.view_half_x, self.view_half_y)
    }

    pub fn set_looking(&mut self, looking: bool) {
        self.looking = looking;
    }

    /// Returns whether the event was consumed.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = *position;
                false
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(*key, *state),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state.is_pressed() { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
            KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.amount_left = amount,
            KeyCode::KeyD | KeyCode::ArrowRight => self.amount_right = amount,
            KeyCode::KeyR => self.amount_up = amount,
            KeyCode::KeyF => self.amount_down = amount,
            _ => return false,
        }
        true
    }

    pub fn is_moving(&self) -> bool {
        self.amount_forward != self.amount_backward
            || self.amount_left != self.amount_right
            || self.amount_up != self.amount_down
    }

    /**
     * Advances the camera by `dt`.
     *
     * With `free == false` the fly-to animation owns the camera and all input
     * (movement and looking around) is ignored.
     */
    pub fn update(&mut self, camera: &mut Camera, dt: Duration, free: bool) {
        if !free {
            return;
        }
        let dt = dt.as_secs_f32();

        let forward = camera.forward();
        let right = camera.right();
        let step = self.movement_speed * dt;
        camera.position += forward * (self.amount_forward - self.amount_backward) * step;
        camera.position += right * (self.amount_right - self.amount_left) * step;
        camera.position.y += (self.amount_up - self.amount_down) * step;

        if self.looking {
            let offset_x = self.pointer.x as f32 - self.view_half_x;
            let offset_y = self.pointer.y as f32 - self.view_half_y;
            let look = self.look_speed * dt;
            camera.yaw += Rad((offset_x * look).to_radians());
            camera.pitch = Rad(
                (camera.pitch.0 - (offset_y * look).to_radians()).clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2),
            );
        }
    }
}

/// The camera and everything needed to feed it to the shaders.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: Camera, controller: CameraController, projection: &Projection) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
