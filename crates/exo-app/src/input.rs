//! Pointer tracking: turns raw mouse events into clicks, drags and zoom.
//!
//! A press that travels less than [`CLICK_SLOP`] pixels before release is a
//! click. Anything further becomes a drag, reported as rotate or pan deltas
//! bracketed by `DragStarted`/`DragEnded`.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Cursor travel in physical pixels that turns a press into a drag.
pub const CLICK_SLOP: f32 = 4.0;

/// Trackpad pixels per wheel notch.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// What the pointer did, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    DragStarted,
    /// Cursor delta in physical pixels.
    Rotate(Vec2),
    Pan(Vec2),
    DragEnded,
    /// Left press and release without moving; cursor position in physical pixels.
    Click(Vec2),
    /// Wheel notches, positive away from the user.
    Zoom(f32),
}

#[derive(Debug, Clone, Copy)]
struct Press {
    button: MouseButton,
    mode: DragMode,
    origin: Vec2,
    dragging: bool,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Vec2,
    shift_held: bool,
    press: Option<Press>,
    actions: Vec<PointerAction>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    /// Shift turns a left drag into a pan. Read when the button goes down.
    pub fn set_shift(&mut self, held: bool) {
        self.shift_held = held;
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        let delta = position - self.cursor;
        self.cursor = position;

        let Some(press) = self.press.as_mut() else {
            return;
        };
        if press.dragging {
            self.actions.push(motion(press.mode, delta));
        } else if position.distance(press.origin) > CLICK_SLOP {
            press.dragging = true;
            let travelled = position - press.origin;
            self.actions.push(PointerAction::DragStarted);
            self.actions.push(motion(press.mode, travelled));
        }
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.press.is_some() {
                    return;
                }
                let mode = match button {
                    MouseButton::Left if self.shift_held => DragMode::Pan,
                    MouseButton::Left => DragMode::Rotate,
                    MouseButton::Right => DragMode::Pan,
                    _ => return,
                };
                self.press = Some(Press {
                    button,
                    mode,
                    origin: self.cursor,
                    dragging: false,
                });
            }
            ElementState::Released => {
                let Some(press) = self.press else {
                    return;
                };
                if press.button != button {
                    return;
                }
                self.press = None;
                if press.dragging {
                    self.actions.push(PointerAction::DragEnded);
                } else if button == MouseButton::Left {
                    self.actions.push(PointerAction::Click(self.cursor));
                }
            }
        }
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        if notches != 0.0 {
            self.actions.push(PointerAction::Zoom(notches));
        }
    }

    /// Abandon any press, e.g. when the window loses focus mid-drag.
    pub fn cancel(&mut self) {
        if let Some(press) = self.press.take()
            && press.dragging
        {
            self.actions.push(PointerAction::DragEnded);
        }
    }

    /// Take every action recorded since the last call.
    pub fn drain_actions(&mut self) -> Vec<PointerAction> {
        std::mem::take(&mut self.actions)
    }
}

fn motion(mode: DragMode, delta: Vec2) -> PointerAction {
    match mode {
        DragMode::Rotate => PointerAction::Rotate(delta),
        DragMode::Pan => PointerAction::Pan(delta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn tracker_at(x: f64, y: f64) -> PointerTracker {
        let mut tracker = PointerTracker::new();
        tracker.on_cursor_moved(x, y);
        tracker
    }

    #[test]
    fn test_press_release_in_place_is_click() {
        let mut t = tracker_at(100.0, 50.0);
        t.on_button(MouseButton::Left, ElementState::Pressed);
        t.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(
            t.drain_actions(),
            vec![PointerAction::Click(Vec2::new(100.0, 50.0))]
        );
    }

    #[test]
    fn test_small_jitter_is_still_click() {
        let mut t = tracker_at(100.0, 100.0);
        t.on_button(MouseButton::Left, ElementState::Pressed);
        t.on_cursor_moved(102.0, 101.0);
        t.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(
            t.drain_actions(),
            vec![PointerAction::Click(Vec2::new(102.0, 101.0))]
        );
    }

    #[test]
    fn test_drag_rotates_and_suppresses_click() {
        let mut t = tracker_at(0.0, 0.0);
        t.on_button(MouseButton::Left, ElementState::Pressed);
        t.on_cursor_moved(10.0, 0.0);
        assert!(t.is_dragging());
        t.on_cursor_moved(15.0, 5.0);
        t.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(
            t.drain_actions(),
            vec![
                PointerAction::DragStarted,
                PointerAction::Rotate(Vec2::new(10.0, 0.0)),
                PointerAction::Rotate(Vec2::new(5.0, 5.0)),
                PointerAction::DragEnded,
            ]
        );
        assert!(!t.is_dragging());
    }

    #[test]
    fn test_right_and_shift_drag_pan() {
        let mut t = tracker_at(0.0, 0.0);
        t.on_button(MouseButton::Right, ElementState::Pressed);
        t.on_cursor_moved(0.0, 20.0);
        t.on_button(MouseButton::Right, ElementState::Released);
        let actions = t.drain_actions();
        assert_eq!(actions[1], PointerAction::Pan(Vec2::new(0.0, 20.0)));

        t.set_shift(true);
        t.on_button(MouseButton::Left, ElementState::Pressed);
        t.on_cursor_moved(8.0, 20.0);
        let actions = t.drain_actions();
        assert_eq!(actions[1], PointerAction::Pan(Vec2::new(8.0, 0.0)));
    }

    #[test]
    fn test_right_click_does_not_pick() {
        let mut t = tracker_at(5.0, 5.0);
        t.on_button(MouseButton::Right, ElementState::Pressed);
        t.on_button(MouseButton::Right, ElementState::Released);
        assert!(t.drain_actions().is_empty());
    }

    #[test]
    fn test_second_button_ignored_during_press() {
        let mut t = tracker_at(0.0, 0.0);
        t.on_button(MouseButton::Left, ElementState::Pressed);
        t.on_button(MouseButton::Right, ElementState::Pressed);
        t.on_button(MouseButton::Right, ElementState::Released);
        t.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(
            t.drain_actions(),
            vec![PointerAction::Click(Vec2::ZERO)]
        );
    }

    #[test]
    fn test_scroll_line_and_pixel() {
        let mut t = PointerTracker::new();
        t.on_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        t.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -20.0)));
        t.on_scroll(MouseScrollDelta::LineDelta(3.0, 0.0));
        assert_eq!(
            t.drain_actions(),
            vec![PointerAction::Zoom(2.0), PointerAction::Zoom(-0.5)]
        );
    }

    #[test]
    fn test_cancel_ends_drag() {
        let mut t = tracker_at(0.0, 0.0);
        t.on_button(MouseButton::Left, ElementState::Pressed);
        t.on_cursor_moved(50.0, 0.0);
        t.drain_actions();
        t.cancel();
        assert_eq!(t.drain_actions(), vec![PointerAction::DragEnded]);
        // A release after cancelling is not a click.
        t.on_button(MouseButton::Left, ElementState::Released);
        assert!(t.drain_actions().is_empty());
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut t = PointerTracker::new();
        t.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert_eq!(t.drain_actions().len(), 1);
        assert!(t.drain_actions().is_empty());
    }
}
