use std::collections::VecDeque;

use glam::Vec2;
use orbitsim::engine::{Direction, HeldDirections, SimInput};
use sokol::app as sapp;

const KEY_COUNT: usize = 512;

/// Keys that pan the camera, two per direction.
const PAN_KEYS: [(sapp::Keycode, Direction); 8] = [
    (sapp::Keycode::W, Direction::Up),
    (sapp::Keycode::Up, Direction::Up),
    (sapp::Keycode::S, Direction::Down),
    (sapp::Keycode::Down, Direction::Down),
    (sapp::Keycode::A, Direction::Left),
    (sapp::Keycode::Left, Direction::Left),
    (sapp::Keycode::D, Direction::Right),
    (sapp::Keycode::Right, Direction::Right),
];

/// Turns raw sokol events into key state and queued simulation inputs.
pub struct InputManager {
    keys_down: [bool; KEY_COUNT],
    keys_pressed: [bool; KEY_COUNT],

    mouse_position: Vec2,

    events: VecDeque<SimInput>,
    quit_requested: bool,
}

/// Implementation for engine
impl InputManager {
    pub fn new() -> Self {
        Self {
            keys_down: [false; KEY_COUNT],
            keys_pressed: [false; KEY_COUNT],
            mouse_position: Vec2::ZERO,
            events: VecDeque::new(),
            quit_requested: false,
        }
    }

    pub fn new_frame(&mut self) {
        self.keys_pressed.fill(false);
    }

    pub fn handle_event(&mut self, event: &sapp::Event) {
        match event._type {
            sapp::EventType::KeyDown => self.handle_key_down(event.key_code, event.key_repeat),
            sapp::EventType::KeyUp => self.handle_key_up(event.key_code),
            sapp::EventType::MouseMove => self.handle_mouse_move(event.mouse_x, event.mouse_y),
            sapp::EventType::MouseDown => {
                self.handle_mouse_button_down(event.mouse_button, event.mouse_x, event.mouse_y)
            }
            sapp::EventType::MouseScroll => self.handle_mouse_wheel(event.scroll_y),
            sapp::EventType::Resized => self.events.push_back(SimInput::Resize(
                event.window_width as f64,
                event.window_height as f64,
            )),
            sapp::EventType::QuitRequested => self.quit_requested = true,
            // focus loss swallows key-up events
            sapp::EventType::Unfocused => self.keys_down.fill(false),
            _ => {}
        }
    }

    fn handle_key_down(&mut self, key: sapp::Keycode, repeat: bool) {
        let key_idx = key as usize;
        if key_idx >= KEY_COUNT {
            return;
        }
        if !self.keys_down[key_idx] {
            self.keys_pressed[key_idx] = true;
        }
        self.keys_down[key_idx] = true;

        if repeat {
            return;
        }
        match key {
            sapp::Keycode::Period => self.events.push_back(SimInput::WarpIn),
            sapp::Keycode::Comma => self.events.push_back(SimInput::WarpOut),
            sapp::Keycode::Q => self.quit_requested = true,
            _ => {}
        }
    }

    fn handle_key_up(&mut self, key: sapp::Keycode) {
        let key_idx = key as usize;
        if key_idx < KEY_COUNT {
            self.keys_down[key_idx] = false;
        }
    }

    fn handle_mouse_move(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Clicks use the coordinates carried by the button event; no move event
    /// may have arrived yet.
    fn handle_mouse_button_down(&mut self, button: sapp::Mousebutton, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
        if matches!(button, sapp::Mousebutton::Left) {
            self.events.push_back(SimInput::Click(self.mouse_position.as_dvec2()));
        }
    }

    fn handle_mouse_wheel(&mut self, delta: f32) {
        self.events.push_back(SimInput::Wheel(delta as f64));
    }
}

/// Public functions for Game interface
impl InputManager {
    pub fn is_key_down(&self, key: sapp::Keycode) -> bool {
        let key_idx = key as usize;
        key_idx < KEY_COUNT && self.keys_down[key_idx]
    }

    pub fn is_key_pressed(&self, key: sapp::Keycode) -> bool {
        let key_idx = key as usize;
        key_idx < KEY_COUNT && self.keys_pressed[key_idx]
    }

    /// Pan directions whose keys are currently down.
    pub fn held_directions(&self) -> HeldDirections {
        PAN_KEYS
            .iter()
            .filter(|(key, _)| self.is_key_down(*key))
            .map(|(_, direction)| *direction)
            .collect()
    }

    /// Queued inputs in arrival order; the queue is empty afterwards.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SimInput> + '_ {
        self.events.drain(..)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitsim::engine::{camera_velocity, Vector2D};

    fn key_down(key: sapp::Keycode) -> sapp::Event {
        sapp::Event {
            _type: sapp::EventType::KeyDown,
            key_code: key,
            ..Default::default()
        }
    }

    #[test]
    fn click_without_prior_move_uses_event_position() {
        let mut input = InputManager::new();
        input.handle_event(&sapp::Event {
            _type: sapp::EventType::MouseDown,
            mouse_x: 900.0,
            mouse_y: 300.0,
            mouse_button: sapp::Mousebutton::Left,
            ..Default::default()
        });
        let events: Vec<SimInput> = input.drain_events().collect();
        assert_eq!(events, vec![SimInput::Click(Vector2D::new(900.0, 300.0))]);
    }

    #[test]
    fn right_click_queues_nothing() {
        let mut input = InputManager::new();
        input.handle_event(&sapp::Event {
            _type: sapp::EventType::MouseDown,
            mouse_x: 10.0,
            mouse_y: 20.0,
            mouse_button: sapp::Mousebutton::Right,
            ..Default::default()
        });
        assert_eq!(input.drain_events().count(), 0);
    }

    #[test]
    fn opposing_pan_keys_cancel() {
        let mut input = InputManager::new();
        for key in [sapp::Keycode::W, sapp::Keycode::Up, sapp::Keycode::S] {
            input.handle_event(&key_down(key));
        }
        let held = input.held_directions();
        assert_eq!(held.len(), 2);
        assert!(held.contains(&Direction::Up) && held.contains(&Direction::Down));
        assert_eq!(camera_velocity(&held), Vector2D::ZERO);

        input.handle_event(&sapp::Event {
            _type: sapp::EventType::KeyUp,
            key_code: sapp::Keycode::S,
            ..Default::default()
        });
        assert_eq!(camera_velocity(&input.held_directions()), Vector2D::new(0.0, -1.0));
    }

    #[test]
    fn warp_keys_ignore_repeat() {
        let mut input = InputManager::new();
        input.handle_event(&key_down(sapp::Keycode::Period));
        input.handle_event(&sapp::Event {
            key_repeat: true,
            ..key_down(sapp::Keycode::Period)
        });
        input.handle_event(&key_down(sapp::Keycode::Comma));
        let events: Vec<SimInput> = input.drain_events().collect();
        assert_eq!(events, vec![SimInput::WarpIn, SimInput::WarpOut]);
    }
}
