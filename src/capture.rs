use crate::pad_state::{AnalogStick, ButtonSet, DirectionalPad};
use gilrs::{Axis, Button as GilrsButton, EventType, GamepadId, Gilrs};
use thiserror::Error;
use tracing::{debug, info};

/// Answers "is this button held right now?".
pub trait ButtonProvider {
    fn is_button_pressed(&self, button: ButtonSet) -> bool;
}

/// Anything a [`ControllerPacket`](crate::packet::ControllerPacket) can be
/// captured from.
///
/// Stick values must stay within `[-1.0, 1.0]`; packet construction panics
/// otherwise.
pub trait CaptureSource: ButtonProvider {
    /// Pulls pending input. Called once before each packet is built.
    fn refresh(&mut self) {}

    fn dpad(&self) -> DirectionalPad;
    fn left_stick(&self) -> AnalogStick;
    fn right_stick(&self) -> AnalogStick;
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("gamepad backend unavailable: {0}")]
    Backend(String),
}

/// Per-axis tuning applied before values reach the packet.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSettings {
    pub deadzone_lstick: f32,
    pub deadzone_rstick: f32,
    pub invert_lx: bool,
    pub invert_ly: bool,
    pub invert_rx: bool,
    pub invert_ry: bool,
}

impl AxisSettings {
    fn inverted(&self, axis: Axis) -> bool {
        match axis {
            Axis::LeftStickX => self.invert_lx,
            Axis::LeftStickY => self.invert_ly,
            Axis::RightStickX => self.invert_rx,
            Axis::RightStickY => self.invert_ry,
            _ => false,
        }
    }

    fn deadzone(&self, axis: Axis) -> f32 {
        match axis {
            Axis::LeftStickX | Axis::LeftStickY => self.deadzone_lstick,
            Axis::RightStickX | Axis::RightStickY => self.deadzone_rstick,
            _ => 0.0,
        }
    }
}

/// Input state accumulated from gamepad events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadState {
    pub buttons: ButtonSet,
    pub dpad: DirectionalPad,
    pub left: AnalogStick,
    pub right: AnalogStick,
}

impl PadState {
    /// Applies dead zone and optional inversion to one stick axis, clamping the
    /// result into `[-1.0, 1.0]`. Returns `true` if the stored value changed.
    pub fn apply_axis(&mut self, axis: Axis, value: f32, inverted: bool, deadzone: f32) -> bool {
        let value = if value.is_nan() { 0.0 } else { value };
        let in_val = if inverted { -value } else { value };
        let adjusted = if in_val.abs() < deadzone {
            0.0
        } else {
            in_val.clamp(-1.0, 1.0)
        };

        macro_rules! update {
            ($field:expr) => {{
                if ($field - adjusted).abs() > f32::EPSILON {
                    $field = adjusted;
                    true
                } else {
                    false
                }
            }};
        }

        match axis {
            Axis::LeftStickX => update!(self.left.x),
            Axis::LeftStickY => update!(self.left.y),
            Axis::RightStickX => update!(self.right.x),
            Axis::RightStickY => update!(self.right.y),
            _ => false,
        }
    }

    /// Maps a gamepad button onto the Nintendo layout: the bottom face button
    /// is B, the right one A. Returns `false` for unmapped buttons.
    pub fn apply_button(&mut self, btn: GilrsButton, pressed: bool) -> bool {
        use GilrsButton::*;

        let button = match btn {
            South => ButtonSet::B,
            East => ButtonSet::A,
            North => ButtonSet::X,
            West => ButtonSet::Y,
            LeftTrigger => ButtonSet::L,
            RightTrigger => ButtonSet::R,
            LeftTrigger2 => ButtonSet::ZL,
            RightTrigger2 => ButtonSet::ZR,
            Select => ButtonSet::MINUS,
            Start => ButtonSet::PLUS,
            Mode => ButtonSet::HOME,
            C => ButtonSet::CAPTURE,
            LeftThumb => ButtonSet::LCLICK,
            RightThumb => ButtonSet::RCLICK,
            DPadUp => {
                self.dpad.up = pressed;
                return true;
            }
            DPadDown => {
                self.dpad.down = pressed;
                return true;
            }
            DPadLeft => {
                self.dpad.left = pressed;
                return true;
            }
            DPadRight => {
                self.dpad.right = pressed;
                return true;
            }
            _ => return false,
        };
        self.buttons.set(button, pressed);
        true
    }
}

impl ButtonProvider for PadState {
    fn is_button_pressed(&self, button: ButtonSet) -> bool {
        self.buttons.contains(button)
    }
}

impl CaptureSource for PadState {
    fn dpad(&self) -> DirectionalPad {
        self.dpad
    }

    fn left_stick(&self) -> AnalogStick {
        self.left
    }

    fn right_stick(&self) -> AnalogStick {
        self.right
    }
}

/// Capture source backed by the first connected gamepad.
///
/// If the active pad disconnects, the next connected one takes over and the
/// state resets to neutral.
pub struct GamepadCapture {
    gilrs: Gilrs,
    active_id: Option<GamepadId>,
    settings: AxisSettings,
    state: PadState,
}

impl GamepadCapture {
    pub fn new(settings: AxisSettings) -> Result<Self, CaptureError> {
        let gilrs = Gilrs::new().map_err(|e| CaptureError::Backend(e.to_string()))?;
        let active_id = gilrs.gamepads().next().map(|(id, _)| id);

        Ok(Self {
            gilrs,
            active_id,
            settings,
            state: PadState::default(),
        })
    }

    pub fn active_gamepad_name(&self) -> Option<String> {
        self.active_id
            .map(|id| self.gilrs.gamepad(id).name().to_string())
    }

    fn handle_event(&mut self, ev: gilrs::Event) {
        match ev.event {
            EventType::Connected => {
                if self.active_id.is_none() {
                    self.active_id = Some(ev.id);
                    info!(gamepad = ?ev.id, "gamepad connected");
                }
            }
            EventType::Disconnected => {
                if self.active_id == Some(ev.id) {
                    self.active_id = self.gilrs.gamepads().next().map(|(id, _)| id);
                    self.state = PadState::default();
                    info!(gamepad = ?ev.id, next = ?self.active_id, "active gamepad disconnected");
                }
            }
            _ if self.active_id != Some(ev.id) => {}
            EventType::AxisChanged(axis, value, _) => {
                let inverted = self.settings.inverted(axis);
                let deadzone = self.settings.deadzone(axis);
                self.state.apply_axis(axis, value, inverted, deadzone);
            }
            EventType::ButtonPressed(btn, _) => {
                if !self.state.apply_button(btn, true) {
                    debug!(?btn, "unmapped button");
                }
            }
            EventType::ButtonReleased(btn, _) => {
                self.state.apply_button(btn, false);
            }
            _ => {}
        }
    }
}

impl ButtonProvider for GamepadCapture {
    fn is_button_pressed(&self, button: ButtonSet) -> bool {
        self.state.is_button_pressed(button)
    }
}

impl CaptureSource for GamepadCapture {
    fn refresh(&mut self) {
        while let Some(ev) = self.gilrs.next_event() {
            self.handle_event(ev);
        }
    }

    fn dpad(&self) -> DirectionalPad {
        self.state.dpad
    }

    fn left_stick(&self) -> AnalogStick {
        self.state.left
    }

    fn right_stick(&self) -> AnalogStick {
        self.state.right
    }
}
