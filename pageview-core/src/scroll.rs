//! Scroll values and the blit-or-repaint decision
//!
//! A value change right after a relayout must repaint everything because the
//! page bitmaps changed underneath; later changes only translate the frame
//! already on screen. Range rewrites during a relayout bump the suspend
//! counter so the values they touch are not mistaken for user scrolling.

use crate::input::Axis;
use crate::layout::{Layout, ScrollRange};

/// How the host should bring the screen up to date after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEffect {
    None,
    /// Shift the current frame by `(dx, dy)` and repaint the exposed strips
    Blit { dx: i32, dy: i32 },
    Repaint,
}

impl ScrollEffect {
    /// Combine two effects that happen before the next present
    pub fn merge(self, other: ScrollEffect) -> ScrollEffect {
        match (self, other) {
            (ScrollEffect::None, effect) | (effect, ScrollEffect::None) => effect,
            (ScrollEffect::Blit { dx, dy }, ScrollEffect::Blit { dx: ox, dy: oy }) => {
                ScrollEffect::Blit {
                    dx: dx + ox,
                    dy: dy + oy,
                }
            }
            _ => ScrollEffect::Repaint,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    horizontal: ScrollRange,
    vertical: ScrollRange,
    suspended: u32,
    reset_pending: bool,
}

impl ScrollState {
    pub fn horizontal(&self) -> &ScrollRange {
        &self.horizontal
    }

    pub fn vertical(&self) -> &ScrollRange {
        &self.vertical
    }

    pub fn range(&self, axis: Axis) -> &ScrollRange {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    /// Install a new layout's ranges, keeping each axis at the same fraction
    /// of its extent
    pub fn apply_layout(&mut self, layout: &Layout) {
        let horizontal_ratio = self.horizontal.ratio();
        let vertical_ratio = self.vertical.ratio();

        self.suspended += 1;
        let old_horizontal = std::mem::replace(&mut self.horizontal, layout.horizontal);
        let old_vertical = std::mem::replace(&mut self.vertical, layout.vertical);
        let horizontal = self.horizontal.value_for_ratio(horizontal_ratio);
        let vertical = self.vertical.value_for_ratio(vertical_ratio);
        self.set_value(Axis::Horizontal, old_horizontal.value, horizontal);
        self.set_value(Axis::Vertical, old_vertical.value, vertical);
        self.suspended -= 1;

        self.reset_pending = true;
    }

    /// Move both axes back to the origin without treating it as scrolling
    pub fn rewind(&mut self) {
        self.suspended += 1;
        let (horizontal, vertical) = (self.horizontal.value, self.vertical.value);
        self.set_value(Axis::Horizontal, horizontal, 0);
        self.set_value(Axis::Vertical, vertical, 0);
        self.suspended -= 1;
        self.reset_pending = true;
    }

    pub fn scroll_to(&mut self, axis: Axis, value: i32) -> ScrollEffect {
        let range = self.range(axis);
        let (old, new) = (range.value, range.clamp(value));
        self.set_value(axis, old, new)
    }

    pub fn scroll_by(&mut self, axis: Axis, delta: i32) -> ScrollEffect {
        let value = self.range(axis).value.saturating_add(delta);
        self.scroll_to(axis, value)
    }

    fn set_value(&mut self, axis: Axis, old: i32, new: i32) -> ScrollEffect {
        match axis {
            Axis::Horizontal => self.horizontal.value = new,
            Axis::Vertical => self.vertical.value = new,
        }
        self.value_changed(axis, old, new)
    }

    fn value_changed(&mut self, axis: Axis, old: i32, new: i32) -> ScrollEffect {
        if self.suspended > 0 || old == new {
            return ScrollEffect::None;
        }
        if self.reset_pending {
            self.reset_pending = false;
            return ScrollEffect::Repaint;
        }
        let shift = old - new;
        match axis {
            Axis::Horizontal => ScrollEffect::Blit { dx: shift, dy: 0 },
            Axis::Vertical => ScrollEffect::Blit { dx: 0, dy: shift },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::geometry::{DocumentGeometry, Size};
    use crate::layout::Zoom;
    use pretty_assertions::assert_eq;

    fn layout(width: u32, height: u32) -> Layout {
        let geometry = DocumentGeometry::new(vec![Size::new(600.0, 800.0); 3]).unwrap();
        Layout::compute(width, height, &geometry, Zoom::default(), &ViewportConfig::default())
    }

    #[test]
    fn first_change_after_layout_repaints_then_blits() {
        let mut state = ScrollState::default();
        state.apply_layout(&layout(800, 600));

        assert_eq!(state.scroll_by(Axis::Vertical, 60), ScrollEffect::Repaint);
        assert_eq!(
            state.scroll_by(Axis::Vertical, 60),
            ScrollEffect::Blit { dx: 0, dy: -60 }
        );
        assert_eq!(state.vertical().value, 120);
    }

    #[test]
    fn values_clamp_and_no_op_changes_do_nothing() {
        let mut state = ScrollState::default();
        state.apply_layout(&layout(800, 600));
        state.scroll_to(Axis::Vertical, 5000);
        assert_eq!(state.vertical().value, 1200);
        assert_eq!(state.scroll_by(Axis::Vertical, 10), ScrollEffect::None);
        // no horizontal scrollbar, so no horizontal travel
        assert_eq!(state.scroll_by(Axis::Horizontal, 10), ScrollEffect::None);
    }

    #[test]
    fn relayout_keeps_relative_position() {
        let mut state = ScrollState::default();
        state.apply_layout(&layout(800, 600));
        state.scroll_to(Axis::Vertical, 900);
        let before = state.vertical().ratio();

        state.apply_layout(&layout(800, 900));

        assert!((state.vertical().ratio() - before).abs() < 0.01);
    }

    #[test]
    fn relayout_rearms_reset() {
        let mut state = ScrollState::default();
        state.apply_layout(&layout(800, 600));
        state.scroll_by(Axis::Vertical, 60);
        state.scroll_by(Axis::Vertical, 60);

        state.apply_layout(&layout(800, 500));

        assert_eq!(state.scroll_by(Axis::Vertical, 60), ScrollEffect::Repaint);
    }

    #[test]
    fn effects_merge() {
        let blit = ScrollEffect::Blit { dx: 0, dy: -10 };
        assert_eq!(
            blit.merge(ScrollEffect::Blit { dx: 5, dy: -10 }),
            ScrollEffect::Blit { dx: 5, dy: -20 }
        );
        assert_eq!(ScrollEffect::None.merge(blit), blit);
        assert_eq!(blit.merge(ScrollEffect::Repaint), ScrollEffect::Repaint);
    }
}
