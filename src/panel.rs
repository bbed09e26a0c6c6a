//! The info panel overlay.
//!
//! At most one panel is open. It is laid out in pixels against the current
//! viewport; the overlay pipeline draws its quads and, with the `ui` feature,
//! its text.

use winit::dpi::PhysicalPosition;

use crate::data_structures::info::InfoRecord;

const MARGIN: f32 = 20.0;
const MAX_WIDTH: f32 = 360.0;
const DISMISS_SIZE: f32 = 28.0;
const PADDING: f32 = 16.0;

pub const PANEL_COLOR: [f32; 4] = [0.05, 0.07, 0.12, 0.85];
pub const DISMISS_COLOR: [f32; 4] = [0.75, 0.2, 0.2, 0.95];

/// An axis-aligned rectangle in physical pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, point: PhysicalPosition<f64>) -> bool {
        let (px, py) = (point.x as f32, point.y as f32);
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub dismiss: Rect,
    /// Area the title, date and description are laid out in.
    pub text: Rect,
}

impl PanelLayout {
    /// The panel hugs the right edge of the viewport and spans most of its height.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let (width, height) = (width as f32, height as f32);
        let panel_width = MAX_WIDTH.min((width - 2.0 * MARGIN).max(DISMISS_SIZE + 2.0 * PADDING));
        let panel_height = (height - 2.0 * MARGIN).max(DISMISS_SIZE + 2.0 * PADDING);
        let panel = Rect {
            x: (width - MARGIN - panel_width).max(0.0),
            y: MARGIN.min(height),
            width: panel_width,
            height: panel_height,
        };
        let dismiss = Rect {
            x: panel.x + panel.width - PADDING / 2.0 - DISMISS_SIZE,
            y: panel.y + PADDING / 2.0,
            width: DISMISS_SIZE,
            height: DISMISS_SIZE,
        };
        let text = Rect {
            x: panel.x + PADDING,
            y: dismiss.y + dismiss.height + PADDING / 2.0,
            width: (panel.width - 2.0 * PADDING).max(0.0),
            height: (panel.height - DISMISS_SIZE - 2.0 * PADDING).max(0.0),
        };
        Self { panel, dismiss, text }
    }

    /// Filled rectangles to draw, back to front.
    pub fn quads(&self) -> [(Rect, [f32; 4]); 2] {
        [(self.panel, PANEL_COLOR), (self.dismiss, DISMISS_COLOR)]
    }
}

/// The panel body: title, date, a blank line, then the description.
pub fn panel_text(record: &InfoRecord) -> String {
    format!("{}\n{}\n\n{}", record.title, record.date, record.description)
}

#[derive(Debug, Default, Clone)]
pub struct InfoPanel {
    current: Option<InfoRecord>,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the panel for `record`, replacing any panel that is already open.
    ///
    /// Returns whether a previous panel was replaced.
    pub fn show(&mut self, record: InfoRecord) -> bool {
        log::info!("Showing info panel for {}", record.title);
        self.current.replace(record).is_some()
    }

    /// Closes the panel. Returns whether one was open.
    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&InfoRecord> {
        self.current.as_ref()
    }

    pub fn layout(&self, width: u32, height: u32) -> Option<PanelLayout> {
        self.current.as_ref().map(|_| PanelLayout::for_viewport(width, height))
    }

    /// Whether a click at `pointer` lands on the dismiss control of the open panel.
    pub fn hits_dismiss(&self, pointer: PhysicalPosition<f64>, width: u32, height: u32) -> bool {
        self.layout(width, height)
            .is_some_and(|layout| layout.dismiss.contains(pointer))
    }

    /// Whether a click at `pointer` lands anywhere on the open panel.
    pub fn hits_panel(&self, pointer: PhysicalPosition<f64>, width: u32, height: u32) -> bool {
        self.layout(width, height)
            .is_some_and(|layout| layout.panel.contains(pointer))
    }
}
