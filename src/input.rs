//! Turns raw device events into game intents.
//!
//! Keyboard, pointer swipes, d-pads, hats and analog sticks all end up as one
//! of four steering requests. The reversal guard is applied later by
//! [`Simulation::steer`](crate::sim::Simulation::steer), which knows the
//! committed direction.

use tracing::trace;

use crate::grid::Point;
use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Char(char),
    Other,
}

/// Face and d-pad buttons of a gamepad.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Start,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Other(u8),
}

impl Button {
    /// Maps a browser "standard gamepad" button index.
    pub fn from_web_index(index: u8) -> Self {
        match index {
            0 => Button::A,
            1 => Button::B,
            9 => Button::Start,
            12 => Button::DPadUp,
            13 => Button::DPadDown,
            14 => Button::DPadLeft,
            15 => Button::DPadRight,
            other => Button::Other(other),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    LeftX,
    LeftY,
    Other(u8),
}

/// Joystick hat position. Diagonals are reported but never steer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hat {
    Centered,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Every event the game reacts to. Pointer coordinates are play-field pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp,
    GamepadDPad(Direction),
    GamepadButton(Button),
    GamepadAxis { axis: Axis, value: i16 },
    GamepadHat(Hat),
    ControllerConnected(u32),
    ControllerDisconnected(u32),
    WindowClose,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Steer(Direction),
    Restart,
    TogglePause,
    Quit,
}

/// Implemented by hosts that track attached controllers.
pub trait ControllerHost {
    fn controller_connected(&mut self, id: u32);
    fn controller_disconnected(&mut self, id: u32);
}

impl InputEvent {
    /// Hands hot-plug events to `host`. Returns true when the event was one.
    pub fn route_hotplug(&self, host: &mut impl ControllerHost) -> bool {
        match *self {
            InputEvent::ControllerConnected(id) => host.controller_connected(id),
            InputEvent::ControllerDisconnected(id) => host.controller_disconnected(id),
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Debug)]
pub struct InputTranslator {
    swipe_threshold: i32,
    dead_zone: i16,
    swipe_anchor: Option<Point>,
}

impl InputTranslator {
    pub fn new(swipe_threshold: i32, dead_zone: i16) -> Self {
        InputTranslator { swipe_threshold, dead_zone, swipe_anchor: None }
    }

    pub fn translate(&mut self, event: &InputEvent) -> Option<Intent> {
        let intent = match *event {
            InputEvent::KeyDown(key) => key_intent(key),
            InputEvent::KeyUp(_) => None,
            InputEvent::PointerDown { x, y } => {
                self.swipe_anchor = Some(Point::new(x, y));
                None
            }
            InputEvent::PointerMove { x, y } => self.swipe(Point::new(x, y)).map(Intent::Steer),
            InputEvent::PointerUp => {
                self.swipe_anchor = None;
                None
            }
            InputEvent::GamepadDPad(Still) => None,
            InputEvent::GamepadDPad(dir) => Some(Intent::Steer(dir)),
            InputEvent::GamepadButton(button) => button_intent(button),
            InputEvent::GamepadAxis { axis, value } => self.stick(axis, value).map(Intent::Steer),
            InputEvent::GamepadHat(hat) => hat_direction(hat).map(Intent::Steer),
            InputEvent::ControllerConnected(_) | InputEvent::ControllerDisconnected(_) => None,
            InputEvent::WindowClose => Some(Intent::Quit),
        };

        if let Some(intent) = intent {
            trace!(?event, ?intent, "translated input");
        }
        intent
    }

    /// Classifies the drag from the anchor to `pos`. The dominant axis wins
    /// and must travel further than the threshold. A fired swipe re-anchors
    /// at `pos` so one continuous drag can turn more than once.
    fn swipe(&mut self, pos: Point) -> Option<Direction> {
        let anchor = self.swipe_anchor?;
        let (dx, dy) = (pos.x - anchor.x, pos.y - anchor.y);

        let dir = if dx.abs() > dy.abs() {
            if dx.abs() <= self.swipe_threshold {
                return None;
            }
            if dx > 0 { Right } else { Left }
        } else {
            if dy.abs() <= self.swipe_threshold {
                return None;
            }
            if dy > 0 { Down } else { Up }
        };

        self.swipe_anchor = Some(pos);
        Some(dir)
    }

    fn stick(&self, axis: Axis, value: i16) -> Option<Direction> {
        let (value, zone) = (i32::from(value), i32::from(self.dead_zone));
        let (negative, positive) = match axis {
            Axis::LeftX => (Left, Right),
            Axis::LeftY => (Up, Down),
            Axis::Other(_) => return None,
        };

        if value < -zone {
            Some(negative)
        } else if value > zone {
            Some(positive)
        } else {
            None
        }
    }
}

fn key_intent(key: Key) -> Option<Intent> {
    let intent = match key {
        Key::Up => Intent::Steer(Up),
        Key::Down => Intent::Steer(Down),
        Key::Left => Intent::Steer(Left),
        Key::Right => Intent::Steer(Right),
        Key::Enter => Intent::Restart,
        Key::Escape => Intent::TogglePause,
        Key::Char(c) => match c.to_ascii_lowercase() {
            'w' => Intent::Steer(Up),
            's' => Intent::Steer(Down),
            'a' => Intent::Steer(Left),
            'd' => Intent::Steer(Right),
            'r' => Intent::Restart,
            'p' => Intent::TogglePause,
            'q' => Intent::Quit,
            _ => return None,
        },
        Key::Other => return None,
    };
    Some(intent)
}

fn button_intent(button: Button) -> Option<Intent> {
    match button {
        Button::DPadUp => Some(Intent::Steer(Up)),
        Button::DPadDown => Some(Intent::Steer(Down)),
        Button::DPadLeft => Some(Intent::Steer(Left)),
        Button::DPadRight => Some(Intent::Steer(Right)),
        Button::A => Some(Intent::Restart),
        Button::Start => Some(Intent::TogglePause),
        Button::B | Button::Other(_) => None,
    }
}

fn hat_direction(hat: Hat) -> Option<Direction> {
    match hat {
        Hat::Up => Some(Up),
        Hat::Down => Some(Down),
        Hat::Left => Some(Left),
        Hat::Right => Some(Right),
        _ => None,
    }
}
