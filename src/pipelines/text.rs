//! Panel text, drawn with glyphon on top of the overlay quads.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache, TextArea, TextAtlas,
    TextBounds, TextRenderer, Viewport,
};

use crate::{
    data_structures::info::InfoRecord,
    panel::{panel_text, PanelLayout},
};

pub struct PanelText {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffer: Buffer,
    visible: bool,
}

impl std::fmt::Debug for PanelText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelText").field("visible", &self.visible).finish()
    }
}

impl PanelText {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let mut font_system = FontSystem::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer = TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        let buffer = Buffer::new(&mut font_system, Metrics::new(16.0, 22.0));
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            viewport,
            atlas,
            renderer,
            buffer,
            visible: false,
        }
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        panel: Option<(&InfoRecord, PanelLayout)>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        let Some((record, layout)) = panel else {
            self.visible = false;
            return Ok(());
        };
        let text = panel_text(record);
        self.buffer
            .set_size(&mut self.font_system, Some(layout.text.width), Some(layout.text.height));
        self.buffer.set_text(
            &mut self.font_system,
            &text,
            &Attrs::new().family(Family::SansSerif),
            Shaping::Advanced,
            None,
        );
        self.buffer.shape_until_scroll(&mut self.font_system, false);
        self.viewport.update(queue, Resolution { width, height });
        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            [TextArea {
                buffer: &self.buffer,
                left: layout.text.x,
                top: layout.text.y,
                scale: 1.0,
                bounds: TextBounds {
                    left: layout.text.x as i32,
                    top: layout.text.y as i32,
                    right: (layout.text.x + layout.text.width) as i32,
                    bottom: (layout.text.y + layout.text.height) as i32,
                },
                default_color: Color::rgb(255, 255, 255),
                custom_glyphs: &[],
            }],
            &mut self.swash_cache,
        )?;
        self.visible = true;
        Ok(())
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> anyhow::Result<()> {
        if self.visible {
            self.renderer.render(&self.atlas, &self.viewport, render_pass)?;
        }
        Ok(())
    }

    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
