//! Input handling systems

use bevy::prelude::*;

use super::components::EngineResource;
use crate::simulation::Scenario;

/// Speed change per key press
const SPEED_STEP: f32 = 0.1;

/// Map keyboard shortcuts onto the engine's control surface
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    engine: Option<ResMut<EngineResource>>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }

    let Some(mut engine) = engine else {
        return;
    };
    let engine = &mut engine.0;
    let mut changed = false;

    if keyboard.just_pressed(KeyCode::Space) {
        if engine.state().is_running {
            engine.pause();
        } else {
            engine.start();
        }
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        engine.reset();
        changed = true;
    }

    let scenario_keys = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
    ];
    for (key, scenario) in scenario_keys.into_iter().zip(Scenario::ALL) {
        if keyboard.just_pressed(key) {
            engine.load_scenario(scenario.id());
            changed = true;
        }
    }

    if keyboard.just_pressed(KeyCode::KeyW) {
        let weather = engine.state().weather.next();
        info!("Weather: {weather}");
        engine.set_weather(weather);
        changed = true;
    }

    let density = engine.state().traffic_density;
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        engine.set_traffic_density(density.saturating_add(1));
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        engine.set_traffic_density(density.saturating_sub(1));
        changed = true;
    }

    let speed = engine.state().speed;
    if keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        engine.set_speed(speed + SPEED_STEP);
    }
    if keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        engine.set_speed(speed - SPEED_STEP);
    }

    if keyboard.just_pressed(KeyCode::KeyS) {
        engine.toggle_sensor_radius();
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        engine.toggle_decision_points();
        changed = true;
    }
    if keyboard.just_pressed(KeyCode::KeyP) {
        engine.toggle_path_prediction();
        changed = true;
    }

    // A running engine redraws on its next frame anyway
    if changed && !engine.state().is_running {
        engine.draw();
    }
}
