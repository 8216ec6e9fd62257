//! iced input translated to viewport input

use iced::keyboard::{self, key::Named};
use iced::mouse::ScrollDelta;
use pageview_core::{InputEvent, Key, Modifiers};

/// Pixels per wheel line for touchpads that report pixel deltas
const PIXELS_PER_LINE: f32 = 20.0;

pub fn modifiers(modifiers: keyboard::Modifiers) -> Modifiers {
    Modifiers {
        control: modifiers.command(),
        shift: modifiers.shift(),
    }
}

pub fn key_event(key: &keyboard::Key, pressed: keyboard::Modifiers) -> Option<InputEvent> {
    let key = match key.as_ref() {
        keyboard::Key::Named(Named::ArrowUp) => Key::Up,
        keyboard::Key::Named(Named::ArrowDown) => Key::Down,
        keyboard::Key::Named(Named::ArrowLeft) => Key::Left,
        keyboard::Key::Named(Named::ArrowRight) => Key::Right,
        keyboard::Key::Named(Named::PageUp) => Key::PageUp,
        keyboard::Key::Named(Named::PageDown) => Key::PageDown,
        keyboard::Key::Named(Named::Home) => Key::Home,
        keyboard::Key::Named(Named::End) => Key::End,
        keyboard::Key::Character("+" | "=") => Key::Plus,
        keyboard::Key::Character("-") => Key::Minus,
        keyboard::Key::Character("0") => Key::Zero,
        _ => return None,
    };
    Some(InputEvent::Key {
        key,
        modifiers: modifiers(pressed),
    })
}

/// One event per scrolled axis, so a diagonal touchpad swipe moves both
pub fn wheel_events(delta: ScrollDelta, pressed: keyboard::Modifiers) -> Vec<InputEvent> {
    let (lines_x, lines_y) = match delta {
        ScrollDelta::Lines { x, y } => (x, y),
        ScrollDelta::Pixels { x, y } => (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE),
    };
    let modifiers = modifiers(pressed);
    let wheel = |lines_x, lines_y| InputEvent::Wheel {
        lines_x,
        lines_y,
        modifiers,
    };
    if lines_x != 0.0 && lines_y != 0.0 {
        vec![wheel(0.0, lines_y), wheel(lines_x, 0.0)]
    } else {
        vec![wheel(lines_x, lines_y)]
    }
}
