//! A surface that records draw calls instead of rasterizing them
//!
//! Used by the window viewer, which replays the commands each frame, and by
//! tests that inspect what the renderer drew.

use super::{Color, DrawContext, Point, Size, Stroke, Surface};

/// One recorded draw call, in logical pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { size: Size, color: Color },
    FillRect { origin: Point, size: Size, color: Color },
    FillPolygon { points: Vec<Point>, color: Color },
    FillCircle { center: Point, radius: f32, color: Color },
    StrokeCircle { center: Point, radius: f32, stroke: Stroke },
    StrokePath { points: Vec<Point>, stroke: Stroke },
}

/// In-memory surface holding the draw calls of the latest frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    client_size: Size,
    pixel_ratio: f32,
    attached: bool,
    has_context: bool,
    backing_size: (u32, u32),
    scale: f32,
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            client_size: Size::new(width, height),
            pixel_ratio: 1.0,
            attached: true,
            has_context: true,
            backing_size: (width as u32, height as u32),
            scale: 1.0,
            commands: Vec::new(),
            frames: 0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// A surface that was removed before the engine could bind to it
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    /// A surface that cannot hand out a 2D context
    pub fn without_context(mut self) -> Self {
        self.has_context = false;
        self
    }

    /// Change the on-screen size, as a window or layout change would
    pub fn set_client_size(&mut self, width: f32, height: f32) {
        self.client_size = Size::new(width, height);
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Commands drawn since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started with a clear
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }
}

impl DrawContext for RecordingSurface {
    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn clear(&mut self, size: Size, color: Color) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { size, color });
    }

    fn fill_rect(&mut self, origin: Point, size: Size, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn stroke_path(&mut self, points: &[Point], stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokePath {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }
}

impl Surface for RecordingSurface {
    type Context = Self;

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn client_size(&self) -> Size {
        self.client_size
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing_size = (width, height);
    }

    fn context(&mut self) -> Option<&mut Self> {
        if self.has_context {
            Some(self)
        } else {
            None
        }
    }
}
