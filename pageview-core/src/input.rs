//! Keyboard and wheel input mapped to viewport commands

use crate::layout::ScrollRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Plus,
    Minus,
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        shift: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        shift: false,
    };
}

/// Raw input delivered by the host window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Wheel movement in lines; positive `lines_y` scrolls toward the top
    Wheel {
        lines_x: f32,
        lines_y: f32,
        modifiers: Modifiers,
    },
    Key { key: Key, modifiers: Modifiers },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ScrollBy { axis: Axis, delta: i32 },
    ScrollTo { axis: Axis, value: i32 },
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

/// Translate `event` given the current scroll ranges
pub fn command_for(
    event: &InputEvent,
    horizontal: &ScrollRange,
    vertical: &ScrollRange,
) -> Option<Command> {
    match *event {
        InputEvent::Wheel {
            lines_x,
            lines_y,
            modifiers,
        } => {
            if modifiers.control {
                return if lines_y > 0.0 {
                    Some(Command::ZoomIn)
                } else if lines_y < 0.0 {
                    Some(Command::ZoomOut)
                } else {
                    None
                };
            }
            // Shift turns a vertical wheel sideways
            let (lines_x, lines_y) = if modifiers.shift && lines_x == 0.0 {
                (lines_y, 0.0)
            } else {
                (lines_x, lines_y)
            };
            if lines_y != 0.0 {
                Some(Command::ScrollBy {
                    axis: Axis::Vertical,
                    delta: wheel_delta(lines_y, vertical),
                })
            } else if lines_x != 0.0 {
                Some(Command::ScrollBy {
                    axis: Axis::Horizontal,
                    delta: wheel_delta(lines_x, horizontal),
                })
            } else {
                None
            }
        }
        InputEvent::Key { key, modifiers } if modifiers.control => match key {
            Key::Plus => Some(Command::ZoomIn),
            Key::Minus => Some(Command::ZoomOut),
            Key::Zero => Some(Command::ResetZoom),
            _ => None,
        },
        InputEvent::Key { key, .. } => {
            let (axis, delta) = match key {
                Key::Up => (Axis::Vertical, -vertical.small_step),
                Key::Down => (Axis::Vertical, vertical.small_step),
                Key::Left => (Axis::Horizontal, -horizontal.small_step),
                Key::Right => (Axis::Horizontal, horizontal.small_step),
                Key::PageUp => (Axis::Vertical, -vertical.page_size),
                Key::PageDown => (Axis::Vertical, vertical.page_size),
                Key::Home => {
                    return Some(Command::ScrollTo {
                        axis: Axis::Vertical,
                        value: 0,
                    })
                }
                Key::End => {
                    return Some(Command::ScrollTo {
                        axis: Axis::Vertical,
                        value: vertical.max_value(),
                    })
                }
                Key::Plus | Key::Minus | Key::Zero => return None,
            };
            Some(Command::ScrollBy { axis, delta })
        }
    }
}

fn wheel_delta(lines: f32, range: &ScrollRange) -> i32 {
    (-lines * range.small_step as f32).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranges() -> (ScrollRange, ScrollRange) {
        let horizontal = ScrollRange {
            maximum: 1000,
            page_size: 400,
            small_step: 40,
            value: 0,
            visible: true,
        };
        let vertical = ScrollRange {
            maximum: 1800,
            page_size: 600,
            small_step: 60,
            value: 0,
            visible: true,
        };
        (horizontal, vertical)
    }

    fn map(event: InputEvent) -> Option<Command> {
        let (horizontal, vertical) = ranges();
        command_for(&event, &horizontal, &vertical)
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn arrows_and_wheel_scroll_a_small_step() {
        assert_eq!(
            map(key(Key::Down)),
            Some(Command::ScrollBy { axis: Axis::Vertical, delta: 60 })
        );
        assert_eq!(
            map(key(Key::Left)),
            Some(Command::ScrollBy { axis: Axis::Horizontal, delta: -40 })
        );
        assert_eq!(
            map(InputEvent::Wheel {
                lines_x: 0.0,
                lines_y: 1.0,
                modifiers: Modifiers::NONE
            }),
            Some(Command::ScrollBy { axis: Axis::Vertical, delta: -60 })
        );
    }

    #[test]
    fn page_keys_scroll_a_page() {
        assert_eq!(
            map(key(Key::PageDown)),
            Some(Command::ScrollBy { axis: Axis::Vertical, delta: 600 })
        );
        assert_eq!(
            map(key(Key::End)),
            Some(Command::ScrollTo { axis: Axis::Vertical, value: 1200 })
        );
        assert_eq!(
            map(key(Key::Home)),
            Some(Command::ScrollTo { axis: Axis::Vertical, value: 0 })
        );
    }

    #[test]
    fn control_turns_wheel_and_keys_into_zoom() {
        assert_eq!(
            map(InputEvent::Wheel {
                lines_x: 0.0,
                lines_y: -2.0,
                modifiers: Modifiers::CONTROL
            }),
            Some(Command::ZoomOut)
        );
        assert_eq!(
            map(InputEvent::Key {
                key: Key::Plus,
                modifiers: Modifiers::CONTROL
            }),
            Some(Command::ZoomIn)
        );
        assert_eq!(map(key(Key::Plus)), None);
    }

    #[test]
    fn shift_wheel_scrolls_sideways() {
        let modifiers = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            map(InputEvent::Wheel {
                lines_x: 0.0,
                lines_y: -1.0,
                modifiers
            }),
            Some(Command::ScrollBy { axis: Axis::Horizontal, delta: 40 })
        );
    }
}
