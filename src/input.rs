use crate::constants::{CLICK_MAX_TRAVEL_PX, PINCH_ZOOM_PER_PX, WHEEL_ZOOM_PER_UNIT};
use crate::effects::WaveKind;
use glam::Vec2;

/// Discrete input as delivered by the page. Coordinates are canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp(Vec2),
    /// Wheel delta in the browser's `deltaY` units (positive = scroll down).
    Wheel(f32),
    /// Change in distance between two touch points, in pixels.
    Pinch(f32),
    Key(char),
    Click,
    DoubleClick,
}

/// The single state mutation an input maps to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    BeginDrag(Vec2),
    Drag(Vec2),
    EndDrag,
    Zoom(f32),
    Trigger(WaveKind),
    ToggleAutoRotate,
    ToggleFullscreen,
}

#[inline]
pub fn action_for_key(key: char) -> Option<Command> {
    match key.to_ascii_lowercase() {
        'e' => Some(Command::Trigger(WaveKind::Emp)),
        's' => Some(Command::Trigger(WaveKind::Sound)),
        ' ' => Some(Command::ToggleAutoRotate),
        '\n' => Some(Command::ToggleFullscreen),
        _ => None,
    }
}

/// Pointer bookkeeping needed to tell a click from the end of a drag.
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerTracker {
    pub down: bool,
    origin: Vec2,
    travel: f32,
    last: Vec2,
    suppress_click: bool,
}

impl PointerTracker {
    /// Map one event to at most one command.
    pub fn map(&mut self, ev: InputEvent) -> Option<Command> {
        match ev {
            InputEvent::PointerDown(p) => {
                self.down = true;
                self.origin = p;
                self.last = p;
                self.travel = 0.0;
                self.suppress_click = false;
                Some(Command::BeginDrag(p))
            }
            InputEvent::PointerMove(p) => {
                if !self.down {
                    return None;
                }
                self.travel += p.distance(self.last);
                self.last = p;
                Some(Command::Drag(p))
            }
            InputEvent::PointerUp(_) => {
                if !self.down {
                    return None;
                }
                self.down = false;
                self.suppress_click = self.travel > CLICK_MAX_TRAVEL_PX;
                Some(Command::EndDrag)
            }
            InputEvent::Wheel(delta_y) => Some(Command::Zoom(-delta_y * WHEEL_ZOOM_PER_UNIT)),
            InputEvent::Pinch(delta_px) => Some(Command::Zoom(delta_px * PINCH_ZOOM_PER_PX)),
            InputEvent::Key(k) => action_for_key(k),
            InputEvent::Click => {
                // a click that ends a real drag is not a toggle
                if std::mem::take(&mut self.suppress_click) {
                    None
                } else {
                    Some(Command::ToggleAutoRotate)
                }
            }
            InputEvent::DoubleClick => Some(Command::ToggleFullscreen),
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }
}
