//! Interaction logic of the showcase, independent of the GPU.
//!
//! [`Showcase`] glues the scene context, the info panel and the camera animator
//! together. The event loop in [`crate::flow`] forwards clicks, keys, load
//! completions and frame ticks to it; everything it decides can be exercised
//! without a window.

use instant::{Duration, Instant};
use winit::dpi::PhysicalPosition;

use crate::{
    animator::CameraAnimator,
    camera::{Camera, CameraController, Projection},
    data_structures::{info::InfoTable, scene_graph::NodeId},
    panel::InfoPanel,
    pick::{focus_point, resolve_click},
    resources::loader::{LoadError, LoadedAsset},
    scene::SceneContext,
};

/// What a left click ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click closed the open panel.
    Dismissed,
    /// The click landed on the panel and was swallowed.
    Consumed,
    /// Nothing selectable under the pointer.
    Miss,
    /// An entity was hit but has no info record.
    NoInfo(String),
    /// The camera flies to the entity and its panel is shown.
    Activated(String),
}

#[derive(Debug)]
pub struct Showcase {
    pub scene: SceneContext,
    pub panel: InfoPanel,
    pub animator: CameraAnimator,
    pub fly_to_duration: Duration,
}

impl Showcase {
    pub fn new(info: InfoTable, animator: CameraAnimator, fly_to_duration: Duration) -> Self {
        Self {
            scene: SceneContext::new(info),
            panel: InfoPanel::new(),
            animator,
            fly_to_duration,
        }
    }

    /// Registers a finished load, or logs why it failed. Returns the new root on success.
    pub fn on_asset_loaded(&mut self, result: Result<LoadedAsset, (String, LoadError)>) -> Option<NodeId> {
        match result {
            Ok(asset) => {
                let name = asset.request.display_name.clone();
                match self.scene.register_asset(asset) {
                    Ok(root) => Some(root),
                    Err(e) => {
                        log::error!("Could not register model {}: {}", name, e);
                        None
                    }
                }
            }
            Err((name, e)) => {
                log::error!("Error loading model {}: {}", name, e);
                None
            }
        }
    }

    /**
     * Handles a left click at `pointer`.
     *
     * An open panel gets the click first: its dismiss control closes it and any
     * other click on it is swallowed. Otherwise the click is picked against the
     * scene, and a hit with an info record starts the fly-to and opens the panel.
     */
    pub fn on_click(
        &mut self,
        pointer: PhysicalPosition<f64>,
        viewport: (u32, u32),
        camera: &mut Camera,
        projection: &Projection,
        now: Instant,
    ) -> ClickOutcome {
        let (width, height) = viewport;
        if self.panel.hits_dismiss(pointer, width, height) {
            self.panel.dismiss();
            return ClickOutcome::Dismissed;
        }
        if self.panel.hits_panel(pointer, width, height) {
            return ClickOutcome::Consumed;
        }

        let Some(hit) = resolve_click(pointer, viewport, camera, projection, &self.scene) else {
            log::debug!("No selectable object under {:?}", pointer);
            return ClickOutcome::Miss;
        };
        let Some(record) = self.scene.info.get(&hit.entity).cloned() else {
            log::warn!("No info record for {}, ignoring the click.", hit.entity);
            return ClickOutcome::NoInfo(hit.entity);
        };
        let Some(target) = focus_point(&self.scene, &hit.entity) else {
            log::warn!("Entity {} has no position in the scene graph.", hit.entity);
            return ClickOutcome::NoInfo(hit.entity);
        };

        self.animator.fly_to(camera, target, self.fly_to_duration, now);
        self.panel.show(record);
        ClickOutcome::Activated(hit.entity)
    }

    /// Escape: stop any transition where it is and close the panel.
    pub fn on_escape(&mut self) {
        self.animator.cancel();
        self.panel.dismiss();
    }

    /// Per-frame camera update: the animator first, then the controller, which
    /// only acts while the animator is not flying.
    pub fn on_update(&mut self, now: Instant, dt: Duration, camera: &mut Camera, controller: &mut CameraController) {
        if self.animator.update(now, camera) {
            log::debug!("Camera transition finished at {:?}", camera.position);
        }
        controller.update(camera, dt, !self.animator.is_transitioning());
    }
}
