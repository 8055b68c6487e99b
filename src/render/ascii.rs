//! Terminal rasterizer
//!
//! Paints draw calls into a character grid so headless runs can print a
//! map of the world. Each cell covers a block of logical pixels; cells are
//! twice as tall as they are wide to match terminal glyphs.

use std::fmt;

use super::renderer::palette;
use super::{circle_points, dash_segments, Color, DrawContext, Point, Size, Stroke, Surface};
use crate::simulation::AI_VEHICLE_COLOR;

const CIRCLE_SEGMENTS: usize = 48;

/// Character grid surface
#[derive(Debug, Clone)]
pub struct AsciiSurface {
    /// Size reported to the engine, as requested by the caller
    client_size: Size,
    /// Logical size the grid covers; follows the engine's backing buffer
    size: Size,
    scale: f32,
    backing_size: (u32, u32),
    columns: usize,
    rows: usize,
    cells: Vec<Vec<char>>,
}

impl AsciiSurface {
    /// A grid `columns` wide covering a `width` x `height` logical surface.
    /// Non-positive dimensions are reported as unknown so the engine falls
    /// back to its default size.
    pub fn new(width: f32, height: f32, columns: usize) -> Self {
        let known = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let client_size = Size::new(known(width), known(height));
        let fallback = Size::default();
        let size = Size::new(
            if client_size.width > 0.0 { client_size.width } else { fallback.width },
            if client_size.height > 0.0 { client_size.height } else { fallback.height },
        );

        let mut surface = Self {
            client_size,
            size,
            scale: 1.0,
            backing_size: (size.width as u32, size.height as u32),
            columns: columns.max(1),
            rows: 1,
            cells: Vec::new(),
        };
        surface.layout_grid();
        surface
    }

    /// Re-derive the covered size from the backing buffer and rebuild the
    /// grid. Degenerate buffers keep the previous layout.
    fn relayout(&mut self) {
        let (width, height) = self.backing_size;
        if width == 0 || height == 0 || self.scale <= 0.0 {
            return;
        }
        self.size = Size::new(width as f32 / self.scale, height as f32 / self.scale);
        self.layout_grid();
    }

    fn layout_grid(&mut self) {
        let rows = (self.columns as f32 * self.size.height / self.size.width / 2.0).round();
        self.rows = rows.clamp(1.0, (self.columns * 4) as f32) as usize;
        self.cells = vec![vec![' '; self.columns]; self.rows];
    }

    /// Logical size the grid currently covers
    pub fn covered_size(&self) -> Size {
        self.size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Glyph at a grid cell, if inside the grid
    pub fn glyph(&self, column: usize, row: usize) -> Option<char> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    pub fn legend() -> &'static str {
        "Legend: A=AI vehicle, V=vehicle, o=pedestrian, #=building, %=construction, \
         .=road, x=waypoint, :=sensor, ~=predicted path"
    }

    fn cell_size(&self) -> (f32, f32) {
        (
            self.size.width / self.columns as f32,
            self.size.height / self.rows as f32,
        )
    }

    fn cell_center(&self, column: usize, row: usize) -> Point {
        let (cw, ch) = self.cell_size();
        Point::new((column as f32 + 0.5) * cw, (row as f32 + 0.5) * ch)
    }

    fn cell_at(&self, point: &Point) -> Option<(usize, usize)> {
        let (cw, ch) = self.cell_size();
        let column = (point.x / cw).floor();
        let row = (point.y / ch).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < self.columns && row < self.rows).then_some((column, row))
    }

    fn plot(&mut self, point: &Point, glyph: char) {
        if let Some((column, row)) = self.cell_at(point) {
            self.cells[row][column] = glyph;
        }
    }

    /// Set every cell whose center satisfies `inside`
    fn fill_where(&mut self, glyph: char, inside: impl Fn(&Point) -> bool) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                if inside(&self.cell_center(column, row)) {
                    self.cells[row][column] = glyph;
                }
            }
        }
    }

    fn stroke_segments(&mut self, segments: &[(Point, Point)], glyph: char) {
        let (cw, ch) = self.cell_size();
        let step = cw.min(ch) / 2.0;
        for (start, end) in segments {
            let length = start.distance(end);
            let samples = (length / step).ceil().max(1.0) as usize;
            for i in 0..=samples {
                let t = i as f32 / samples as f32;
                let point = Point::new(
                    start.x + (end.x - start.x) * t,
                    start.y + (end.y - start.y) * t,
                );
                self.plot(&point, glyph);
            }
        }
    }
}

fn rect_glyph(color: Color) -> Option<char> {
    if color.a < 128 {
        // Translucent washes leave the map readable
        None
    } else if color == palette::ROAD {
        Some('.')
    } else if color == palette::CONSTRUCTION {
        Some('%')
    } else {
        Some('#')
    }
}

fn polygon_glyph(color: Color) -> Option<char> {
    if color == palette::HEADLIGHT {
        None
    } else if color == AI_VEHICLE_COLOR {
        Some('A')
    } else {
        Some('V')
    }
}

fn circle_glyph(color: Color) -> char {
    if color == palette::PEDESTRIAN {
        'o'
    } else if color == palette::DECISION_POINT {
        'x'
    } else {
        '*'
    }
}

fn stroke_glyph(color: Color) -> char {
    if color == palette::ROAD_MARKING {
        '-'
    } else if color == palette::SENSOR_RADIUS {
        ':'
    } else if color == palette::PATH_PREDICTION {
        '~'
    } else if color == palette::RAIN {
        '/'
    } else {
        '+'
    }
}

/// Even-odd rule point-in-polygon test
fn contains(polygon: &[Point], point: &Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl DrawContext for AsciiSurface {
    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.relayout();
    }

    fn clear(&mut self, _size: Size, _color: Color) {
        for row in &mut self.cells {
            row.fill(' ');
        }
    }

    fn fill_rect(&mut self, origin: Point, size: Size, color: Color) {
        let Some(glyph) = rect_glyph(color) else {
            return;
        };
        self.fill_where(glyph, |p| {
            p.x >= origin.x
                && p.x < origin.x + size.width
                && p.y >= origin.y
                && p.y < origin.y + size.height
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let Some(glyph) = polygon_glyph(color) else {
            return;
        };
        self.fill_where(glyph, |p| contains(points, p));
        // Keep small shapes visible on coarse grids
        if !points.is_empty() {
            let sum = points
                .iter()
                .fold(Point::default(), |acc, p| Point::new(acc.x + p.x, acc.y + p.y));
            let n = points.len() as f32;
            self.plot(&Point::new(sum.x / n, sum.y / n), glyph);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        let glyph = circle_glyph(color);
        self.fill_where(glyph, |p| p.distance(&center) <= radius);
        self.plot(&center, glyph);
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        let ring = circle_points(center, radius, CIRCLE_SEGMENTS);
        let segments = dash_segments(&ring, stroke.dash);
        self.stroke_segments(&segments, stroke_glyph(stroke.color));
    }

    fn stroke_path(&mut self, points: &[Point], stroke: &Stroke) {
        let segments = dash_segments(points, stroke.dash);
        self.stroke_segments(&segments, stroke_glyph(stroke.color));
    }
}

impl Surface for AsciiSurface {
    type Context = Self;

    fn client_size(&self) -> Size {
        self.client_size
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing_size = (width, height);
        self.relayout();
    }

    fn context(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
