//! Keyboard snapshot consumed by the simulation.
//!
//! The host keeps a live `[bool; 256]` indexed by key code and copies it
//! once per tick; the copy is what travels down the update pipeline.

use nalgebra::Vector3;

pub const KEY_COUNT: usize = 256;

pub const KEY_SPACE: u8 = 32;
pub const KEY_LEFT: u8 = 37;
pub const KEY_UP: u8 = 38;
pub const KEY_RIGHT: u8 = 39;
pub const KEY_DOWN: u8 = 40;

/// Key code for an ASCII letter or digit (upper-case letters).
pub const fn key_code(c: char) -> u8 {
    (c as u8).to_ascii_uppercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySnapshot {
    keys: [bool; KEY_COUNT],
}

impl Default for KeySnapshot {
    fn default() -> Self {
        Self { keys: [false; KEY_COUNT] }
    }
}

impl KeySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pressed(codes: &[u8]) -> Self {
        let mut snapshot = Self::default();
        for &code in codes {
            snapshot.set(code, true);
        }
        snapshot
    }

    pub fn set(&mut self, code: u8, pressed: bool) {
        self.keys[code as usize] = pressed;
    }

    pub fn is_pressed(&self, code: u8) -> bool {
        self.keys[code as usize]
    }

    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// True if any movement binding is held.
    pub fn any_motion(&self) -> bool {
        BINDINGS
            .iter()
            .any(|b| b.direction.is_some() && b.codes.iter().any(|&c| self.is_pressed(c)))
    }
}

// ── Bindings ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Direction::Up => Vector3::new(0.0, 1.0, 0.0),
            Direction::Down => Vector3::new(0.0, -1.0, 0.0),
            Direction::Left => Vector3::new(-1.0, 0.0, 0.0),
            Direction::Right => Vector3::new(1.0, 0.0, 0.0),
        }
    }

    /// Bank sign applied around the y axis while moving sideways.
    pub fn tilt(self) -> Option<f32> {
        match self {
            Direction::Left => Some(-1.0),
            Direction::Right => Some(1.0),
            Direction::Up | Direction::Down => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct KeyBinding {
    pub codes: &'static [u8],
    /// `None` marks the reserved key: read but moves nothing.
    pub direction: Option<Direction>,
}

pub const BINDINGS: [KeyBinding; 5] = [
    KeyBinding { codes: &[key_code('W'), KEY_UP], direction: Some(Direction::Up) },
    KeyBinding { codes: &[key_code('S'), KEY_DOWN], direction: Some(Direction::Down) },
    KeyBinding { codes: &[key_code('A'), KEY_LEFT], direction: Some(Direction::Left) },
    KeyBinding { codes: &[key_code('D'), KEY_RIGHT], direction: Some(Direction::Right) },
    KeyBinding { codes: &[key_code('X')], direction: None },
];

/// Start / acknowledge key.
pub const START_KEY: u8 = KEY_SPACE;
