//! Systems that drive the engine from Bevy's clock and draw its output

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use super::components::{EngineResource, MetricsText, CIRCLE_SEGMENTS, FILL_SPACING};
use crate::render::{
    circle_points, dash_segments, hatch_lines, rect_points, Color as SimColor, DrawCommand, Point,
    Size,
};

/// System to run the pending engine frame at the current display time
pub fn drive_engine(time: Res<Time>, engine: Option<ResMut<EngineResource>>) {
    let Some(mut engine) = engine else {
        return;
    };
    if let Some(handle) = engine.0.pending_frame() {
        engine.0.run_frame(handle, time.elapsed_secs_f64() * 1000.0);
    }
}

/// System to replay the latest recorded frame as gizmo lines
pub fn draw_scene(mut gizmos: Gizmos, engine: Option<Res<EngineResource>>) {
    let Some(engine) = engine else {
        return;
    };
    let viewport = engine.0.viewport();
    let to_world = |p: Point| Vec2::new(p.x - viewport.width / 2.0, viewport.height / 2.0 - p.y);
    let mut line = |from: Point, to: Point, color: SimColor| {
        gizmos.line_2d(to_world(from), to_world(to), to_bevy(color));
    };

    for command in engine.0.surface().commands() {
        match command {
            // The clear color already paints the background
            DrawCommand::Clear { .. } => {}
            DrawCommand::FillRect {
                origin,
                size,
                color,
            } => {
                for (from, to) in hatch_lines(&rect_points(*origin, *size), FILL_SPACING) {
                    line(from, to, *color);
                }
            }
            DrawCommand::FillPolygon { points, color } => {
                for (from, to) in hatch_lines(points, FILL_SPACING) {
                    line(from, to, *color);
                }
                for (from, to) in dash_segments(&closed(points), None) {
                    line(from, to, *color);
                }
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                let ring = circle_points(*center, *radius, CIRCLE_SEGMENTS);
                for (from, to) in hatch_lines(&ring, FILL_SPACING) {
                    line(from, to, *color);
                }
                for (from, to) in dash_segments(&ring, None) {
                    line(from, to, *color);
                }
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                stroke,
            } => {
                let ring = circle_points(*center, *radius, CIRCLE_SEGMENTS * 2);
                for (from, to) in dash_segments(&ring, stroke.dash) {
                    line(from, to, stroke.color);
                }
            }
            DrawCommand::StrokePath { points, stroke } => {
                for (from, to) in dash_segments(points, stroke.dash) {
                    line(from, to, stroke.color);
                }
            }
        }
    }
}

fn closed(points: &[Point]) -> Vec<Point> {
    let mut ring = points.to_vec();
    if let Some(first) = points.first() {
        ring.push(*first);
    }
    ring
}

fn to_bevy(color: SimColor) -> Color {
    Color::srgba_u8(color.r, color.g, color.b, color.a)
}

/// System to refresh the metrics overlay
pub fn update_metrics_text(
    engine: Option<Res<EngineResource>>,
    mut text_query: Query<&mut Text, With<MetricsText>>,
) {
    let Some(engine) = engine else {
        return;
    };
    let state = engine.0.state();
    let metrics = &state.metrics;
    let scenario = state
        .preset()
        .map_or(state.scenario.as_str(), |preset| preset.name());

    for mut text in text_query.iter_mut() {
        **text = format!(
            "{status} | {scenario} | Weather: {weather}\n\
             Speed: {speed:.1}x | Density: {density}/10\n\
             FPS: {fps} | Processing: {processing:.1}ms | Memory: {memory}\n\
             Decisions/s: {decisions:.0} | Response: {response:.0}ms | Success: {success:.1}%\n\
             Near misses: {near_misses} | Collisions: {collisions} | Safety: {safety}\n\
             Avg speed: {avg_speed} | Flow: {flow:.0}% | Congestion: {congestion}",
            status = if state.is_running { "Running" } else { "Paused" },
            weather = state.weather,
            speed = state.speed,
            density = state.traffic_density,
            fps = metrics.fps,
            processing = metrics.processing_time,
            memory = metrics.memory_usage,
            decisions = metrics.decisions_per_second,
            response = metrics.avg_response_time,
            success = metrics.success_rate,
            near_misses = metrics.near_misses,
            collisions = metrics.collisions,
            safety = metrics.safety_score,
            avg_speed = metrics.avg_speed,
            flow = metrics.flow_rate,
            congestion = metrics.congestion_level,
        );
    }
}

/// System to follow window size changes
pub fn handle_window_resized(
    mut resized: MessageReader<WindowResized>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    engine: Option<ResMut<EngineResource>>,
) {
    let Some(mut engine) = engine else {
        resized.clear();
        return;
    };
    let Some(event) = resized.read().last() else {
        return;
    };
    let scale = window_query
        .single()
        .map_or(1.0, |window| window.scale_factor());

    let surface = engine.0.surface_mut();
    surface.set_client_size(event.width, event.height);
    surface.set_pixel_ratio(scale);
    engine.0.resize();
    engine.0.draw();

    let Size { width, height } = engine.0.viewport();
    debug!("Viewport is now {width}x{height}");
}
