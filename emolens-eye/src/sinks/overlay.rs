//! Bounding-box overlay drawn on top of the video

use crate::config::OverlayConfig;
use emolens_core::{BoundingBox, Color, FrameSummary, Palette};

/// Drawing surface for the per-frame overlay.
///
/// The overlay is stateless across ticks: every batch starts with
/// [`OverlaySink::clear`] so no box from a previous frame stays visible.
pub trait OverlaySink: Send {
    /// Match the surface to the stream's frame size. Called once on activation.
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn clear(&mut self);

    fn draw_box(&mut self, rect: &BoundingBox, color: Color);

    fn draw_label(&mut self, text: &str, position: (f32, f32), color: Color);
}

/// Turns a [`FrameSummary`] into draw calls
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    palette: Palette,
    label_offset: f32,
}

impl OverlayRenderer {
    pub fn new(palette: Palette, label_offset: f32) -> Self {
        Self {
            palette,
            label_offset,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Clear the surface, then draw one box and one caption per entity in the
    /// entity's dominant color
    pub fn render<S: OverlaySink + ?Sized>(&self, summary: &FrameSummary, sink: &mut S) {
        sink.clear();
        for entity in &summary.entities {
            let color = self.palette.color(entity.dominant);
            let rect = &entity.detection.bbox;
            sink.draw_box(rect, color);
            sink.draw_label(&entity.label(), rect.label_anchor(self.label_offset), color);
        }
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Box {
        rect: BoundingBox,
        color: Color,
    },
    Label {
        text: String,
        position: (f32, f32),
        color: Color,
    },
}

/// In-memory overlay surface holding the draw calls of the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    width: u32,
    height: u32,
    line_width: f32,
    font: String,
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::with_style(&OverlayConfig::default())
    }
}

impl OverlayState {
    pub fn with_style(style: &OverlayConfig) -> Self {
        Self {
            width: 0,
            height: 0,
            line_width: style.line_width,
            font: style.font.clone(),
            commands: Vec::new(),
            clears: 0,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    /// Draw calls since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// How many times the surface has been cleared
    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn boxes(&self) -> impl Iterator<Item = (&BoundingBox, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Box { rect, color } => Some((rect, *color)),
            DrawCommand::Label { .. } => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label { text, .. } => Some(text.as_str()),
            DrawCommand::Box { .. } => None,
        })
    }
}

impl OverlaySink for OverlayState {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn draw_box(&mut self, rect: &BoundingBox, color: Color) {
        self.commands.push(DrawCommand::Box { rect: *rect, color });
    }

    fn draw_label(&mut self, text: &str, position: (f32, f32), color: Color) {
        self.commands.push(DrawCommand::Label {
            text: text.to_string(),
            position,
            color,
        });
    }
}
