//! Drawing surface abstraction and the renderer that paints the world onto it
//!
//! The engine only ever talks to a `Surface` (something with an on-screen
//! size and a backing buffer) and its `DrawContext` (something that can fill
//! and stroke shapes in logical pixels). Backends live alongside: a command
//! recorder and a terminal rasterizer.

pub mod ascii;
pub mod recording;
mod renderer;

pub use crate::simulation::{Color, Point, Size};
pub use ascii::AsciiSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{headlight_outline, palette, render, vehicle_outline};

/// Line style for outlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths; `None` draws a solid line
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, dash: f32, gap: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, gap]),
        }
    }
}

/// A 2D drawing context working in logical (pre-scale) pixels
pub trait DrawContext {
    /// Device pixels per logical pixel for everything drawn afterwards
    fn set_scale(&mut self, scale: f32);

    /// Wipe the whole surface and fill it with `color`
    fn clear(&mut self, size: Size, color: Color);

    fn fill_rect(&mut self, origin: Point, size: Size, color: Color);

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke);

    /// Stroke an open polyline through `points`
    fn stroke_path(&mut self, points: &[Point], stroke: &Stroke);
}

/// A drawable element the engine is bound to
pub trait Surface {
    type Context: DrawContext;

    /// False once the element is gone; the engine refuses to bind to it
    fn is_attached(&self) -> bool {
        true
    }

    /// On-screen size in logical pixels; zero while not laid out yet
    fn client_size(&self) -> Size;

    /// Device pixel density
    fn pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Resize the backing buffer, in device pixels
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// The 2D drawing context, if one can be obtained
    fn context(&mut self) -> Option<&mut Self::Context>;
}

/// Split a polyline into the visible segments of a dash pattern. The
/// pattern carries over from one segment to the next. Solid strokes come
/// back as one segment per edge.
pub fn dash_segments(points: &[Point], dash: Option<[f32; 2]>) -> Vec<(Point, Point)> {
    let edges = points.windows(2).map(|pair| (pair[0], pair[1]));
    let Some([on, off]) = dash.filter(|[on, off]| *on > 0.0 && *off >= 0.0) else {
        return edges.collect();
    };

    let period = on + off;
    let mut segments = Vec::new();
    let mut phase = 0.0_f32;

    for (start, end) in edges {
        let length = start.distance(&end);
        if length <= 0.0 {
            continue;
        }
        let along = |t: f32| {
            Point::new(
                start.x + (end.x - start.x) * t / length,
                start.y + (end.y - start.y) * t / length,
            )
        };

        let mut t = 0.0;
        while t < length {
            let offset = phase % period;
            if offset < on {
                let stop = (t + on - offset).min(length);
                segments.push((along(t), along(stop)));
                phase += stop - t;
                t = stop;
            } else {
                let stop = (t + period - offset).min(length);
                phase += stop - t;
                t = stop;
            }
        }
    }

    segments
}

/// Closed ring of points approximating a circle
pub fn circle_points(center: Point, radius: f32, segments: usize) -> Vec<Point> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// Horizontal scanlines `spacing` apart covering the inside of a polygon,
/// for backends that can only draw lines
pub fn hatch_lines(polygon: &[Point], spacing: f32) -> Vec<(Point, Point)> {
    if polygon.len() < 3 || spacing <= 0.0 {
        return Vec::new();
    }
    let min_y = polygon.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = polygon.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

    let mut lines = Vec::new();
    let mut y = min_y + spacing / 2.0;
    while y < max_y {
        let mut crossings: Vec<f32> = polygon
            .iter()
            .zip(polygon.iter().cycle().skip(1))
            .filter(|(a, b)| (a.y > y) != (b.y > y))
            .map(|(a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
            .collect();
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            lines.push((Point::new(pair[0], y), Point::new(pair[1], y)));
        }
        y += spacing;
    }
    lines
}

/// Corners of an axis-aligned rectangle, clockwise from the origin
pub fn rect_points(origin: Point, size: Size) -> [Point; 4] {
    [
        origin,
        Point::new(origin.x + size.width, origin.y),
        Point::new(origin.x + size.width, origin.y + size.height),
        Point::new(origin.x, origin.y + size.height),
    ]
}
