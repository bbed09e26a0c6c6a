//! Timed fly-to transitions of the camera.
//!
//! [`CameraAnimator`] decides who may move the camera. While it is
//! [`CameraOwnership::Free`] the first-person controller moves the camera;
//! during a transition the animator writes position and orientation and all
//! controller input is ignored.

use cgmath::{Point3, Vector3};
use instant::{Duration, Instant};

use crate::camera::Camera;

/// Cubic ease-in-out on `t` in `[0, 1]`. Values outside are clamped.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Point3<f32>,
    pub to: Point3<f32>,
    pub target: Point3<f32>,
    pub started: Instant,
    pub duration: Duration,
}

impl Transition {
    /// Normalized progress at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn position_at(&self, now: Instant) -> Point3<f32> {
        let eased = ease_in_out_cubic(self.progress(now));
        self.from + (self.to - self.from) * eased
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraOwnership {
    #[default]
    Free,
    Transitioning(Transition),
}

#[derive(Debug, Clone)]
pub struct CameraAnimator {
    ownership: CameraOwnership,
    standoff: Vector3<f32>,
}

impl Default for CameraAnimator {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 100.0))
    }
}

impl CameraAnimator {
    pub fn new(standoff: Vector3<f32>) -> Self {
        Self {
            ownership: CameraOwnership::Free,
            standoff,
        }
    }

    pub fn with_standoff(mut self, standoff: Vector3<f32>) -> Self {
        self.standoff = standoff;
        self
    }

    pub fn standoff(&self) -> Vector3<f32> {
        self.standoff
    }

    pub fn ownership(&self) -> &CameraOwnership {
        &self.ownership
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.ownership, CameraOwnership::Transitioning(_))
    }

    /**
     * Starts moving the camera towards `target + standoff` over `duration`.
     *
     * The transition always starts at the camera's current position, so calling
     * this again mid-flight continues smoothly from wherever the camera is. A
     * zero duration moves and re-orients the camera immediately and leaves the
     * animator `Free`.
     */
    pub fn fly_to(&mut self, camera: &mut Camera, target: Point3<f32>, duration: Duration, now: Instant) {
        let transition = Transition {
            from: camera.position,
            to: target + self.standoff,
            target,
            started: now,
            duration,
        };
        log::debug!(
            "Flying from {:?} to {:?} in {:.2}s",
            transition.from,
            transition.to,
            duration.as_secs_f32()
        );
        if duration.is_zero() {
            camera.position = transition.to;
            camera.look_at(target);
            self.ownership = CameraOwnership::Free;
        } else {
            self.ownership = CameraOwnership::Transitioning(transition);
        }
    }

    /// Advances a running transition to `now`. Returns whether it finished on this call.
    pub fn update(&mut self, now: Instant, camera: &mut Camera) -> bool {
        let CameraOwnership::Transitioning(transition) = &self.ownership else {
            return false;
        };
        camera.position = transition.position_at(now);
        camera.look_at(transition.target);
        if transition.progress(now) >= 1.0 {
            self.ownership = CameraOwnership::Free;
            return true;
        }
        false
    }

    /// Hands the camera back to the controller where it currently is.
    pub fn cancel(&mut self) {
        if self.is_transitioning() {
            log::debug!("Camera transition cancelled");
        }
        self.ownership = CameraOwnership::Free;
    }
}
