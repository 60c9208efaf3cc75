use bitflags::bitflags;
use nalgebra_glm::Vec2;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Physical keys the demo can query. Layout follows a full-size keyboard,
/// row by row.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum Key {
    Escape, F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    Grave, One, Two, Three, Four, Five, Six, Seven, Eight, Nine, Zero, Minus, Equal, Backspace,
    Tab, Q, W, E, R, T, Y, U, I, O, P, LeftBracket, RightBracket, Backslash,
    CapsLock, A, S, D, F, G, H, J, K, L, Semicolon, Apostrophe, Enter,
    LeftShift, Z, X, C, V, B, N, M, Comma, Period, Slash, RightShift,
    LeftCtrl, LeftSuper, LeftAlt, Space, RightAlt, RightSuper, Menu, RightCtrl,

    Insert, Delete, Home, End, PageUp, PageDown,
    PrintScreen, ScrollLock, Pause,

    Up, Down, Left, Right,

    NumLock, NumpadDivide, NumpadMultiply, NumpadSubtract,
    Numpad7, Numpad8, Numpad9, NumpadAdd,
    Numpad4, Numpad5, Numpad6,
    Numpad1, Numpad2, Numpad3, NumpadEnter,
    Numpad0, NumpadDecimal,
}

#[rustfmt::skip]
impl From<Key> for glfw::Key {
    fn from(key: Key) -> Self {
        use glfw::Key as G;
        match key {
            Key::Escape => G::Escape,
            Key::F1 => G::F1,   Key::F2 => G::F2,   Key::F3 => G::F3,   Key::F4 => G::F4,
            Key::F5 => G::F5,   Key::F6 => G::F6,   Key::F7 => G::F7,   Key::F8 => G::F8,
            Key::F9 => G::F9,   Key::F10 => G::F10, Key::F11 => G::F11, Key::F12 => G::F12,

            Key::Grave => G::GraveAccent,
            Key::One => G::Num1,   Key::Two => G::Num2,   Key::Three => G::Num3,
            Key::Four => G::Num4,  Key::Five => G::Num5,  Key::Six => G::Num6,
            Key::Seven => G::Num7, Key::Eight => G::Num8, Key::Nine => G::Num9,
            Key::Zero => G::Num0,
            Key::Minus => G::Minus,
            Key::Equal => G::Equal,
            Key::Backspace => G::Backspace,

            Key::Tab => G::Tab,
            Key::Q => G::Q, Key::W => G::W, Key::E => G::E, Key::R => G::R, Key::T => G::T,
            Key::Y => G::Y, Key::U => G::U, Key::I => G::I, Key::O => G::O, Key::P => G::P,
            Key::LeftBracket => G::LeftBracket,
            Key::RightBracket => G::RightBracket,
            Key::Backslash => G::Backslash,

            Key::CapsLock => G::CapsLock,
            Key::A => G::A, Key::S => G::S, Key::D => G::D, Key::F => G::F, Key::G => G::G,
            Key::H => G::H, Key::J => G::J, Key::K => G::K, Key::L => G::L,
            Key::Semicolon => G::Semicolon,
            Key::Apostrophe => G::Apostrophe,
            Key::Enter => G::Enter,

            Key::LeftShift => G::LeftShift,
            Key::Z => G::Z, Key::X => G::X, Key::C => G::C, Key::V => G::V, Key::B => G::B,
            Key::N => G::N, Key::M => G::M,
            Key::Comma => G::Comma,
            Key::Period => G::Period,
            Key::Slash => G::Slash,
            Key::RightShift => G::RightShift,

            Key::LeftCtrl => G::LeftControl,
            Key::LeftSuper => G::LeftSuper,
            Key::LeftAlt => G::LeftAlt,
            Key::Space => G::Space,
            Key::RightAlt => G::RightAlt,
            Key::RightSuper => G::RightSuper,
            Key::Menu => G::Menu,
            Key::RightCtrl => G::RightControl,

            Key::Insert => G::Insert,
            Key::Delete => G::Delete,
            Key::Home => G::Home,
            Key::End => G::End,
            Key::PageUp => G::PageUp,
            Key::PageDown => G::PageDown,

            Key::PrintScreen => G::PrintScreen,
            Key::ScrollLock => G::ScrollLock,
            Key::Pause => G::Pause,

            Key::Up => G::Up,
            Key::Down => G::Down,
            Key::Left => G::Left,
            Key::Right => G::Right,

            Key::NumLock => G::NumLock,
            Key::NumpadDivide => G::KpDivide,
            Key::NumpadMultiply => G::KpMultiply,
            Key::NumpadSubtract => G::KpSubtract,
            Key::NumpadAdd => G::KpAdd,
            Key::NumpadEnter => G::KpEnter,
            Key::NumpadDecimal => G::KpDecimal,
            Key::Numpad0 => G::Kp0, Key::Numpad1 => G::Kp1, Key::Numpad2 => G::Kp2,
            Key::Numpad3 => G::Kp3, Key::Numpad4 => G::Kp4, Key::Numpad5 => G::Kp5,
            Key::Numpad6 => G::Kp6, Key::Numpad7 => G::Kp7, Key::Numpad8 => G::Kp8,
            Key::Numpad9 => G::Kp9,
        }
    }
}

bitflags! {
    /// Movement keys held during the current frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MoveInput: u8 {
        const FORWARD = 1 << 0;
        const BACK    = 1 << 1;
        const LEFT    = 1 << 2;
        const RIGHT   = 1 << 3;
    }
}

impl MoveInput {
    /// Planar direction in the floor's XY plane, not normalized. Forward is +Y.
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::zeros();
        if self.contains(MoveInput::FORWARD) {
            dir.y += 1.0;
        }
        if self.contains(MoveInput::BACK) {
            dir.y -= 1.0;
        }
        if self.contains(MoveInput::RIGHT) {
            dir.x += 1.0;
        }
        if self.contains(MoveInput::LEFT) {
            dir.x -= 1.0;
        }
        dir
    }
}

/// Keys bound to each action. Every action accepts several keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Vec<Key>,
    pub back: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub quit: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![Key::W, Key::Up],
            back: vec![Key::S, Key::Down],
            left: vec![Key::A, Key::Left],
            right: vec![Key::D, Key::Right],
            quit: vec![Key::Escape],
        }
    }
}

impl KeyBindings {
    /// Collects the movement flags using `is_pressed` as the key query.
    pub fn move_input(&self, is_pressed: impl Fn(Key) -> bool) -> MoveInput {
        let any = |keys: &[Key]| keys.iter().any(|key| is_pressed(*key));

        let mut input = MoveInput::empty();
        input.set(MoveInput::FORWARD, any(&self.forward));
        input.set(MoveInput::BACK, any(&self.back));
        input.set(MoveInput::LEFT, any(&self.left));
        input.set(MoveInput::RIGHT, any(&self.right));
        input
    }

    pub fn quit_requested(&self, is_pressed: impl Fn(Key) -> bool) -> bool {
        self.quit.iter().any(|key| is_pressed(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, str::FromStr};
    use strum::IntoEnumIterator;

    #[test]
    fn every_key_maps_to_a_distinct_glfw_key() {
        let mapped: HashSet<i32> = Key::iter().map(|key| glfw::Key::from(key) as i32).collect();
        assert_eq!(mapped.len(), Key::iter().count());
    }

    #[test]
    fn keys_parse_from_their_names() {
        assert_eq!(Key::from_str("W").unwrap(), Key::W);
        assert_eq!(Key::from_str("NumpadEnter").unwrap(), Key::NumpadEnter);
        assert!(Key::from_str("Hyper").is_err());
        let name: &'static str = Key::LeftCtrl.into();
        assert_eq!(name, "LeftCtrl");
    }

    #[test]
    fn opposing_directions_cancel() {
        let input = MoveInput::FORWARD | MoveInput::BACK | MoveInput::RIGHT;
        assert_eq!(input.direction(), Vec2::new(1.0, 0.0));
        assert_eq!(MoveInput::empty().direction(), Vec2::zeros());
    }

    #[test]
    fn bindings_collect_held_keys() {
        let bindings = KeyBindings::default();
        let held = [Key::Up, Key::A];
        let input = bindings.move_input(|key| held.contains(&key));
        assert_eq!(input, MoveInput::FORWARD | MoveInput::LEFT);
        assert!(!bindings.quit_requested(|key| held.contains(&key)));
        assert!(bindings.quit_requested(|key| key == Key::Escape));
    }

    #[test]
    fn bindings_deserialize_from_key_names() {
        let bindings: KeyBindings = serde_json::from_str(r#"{ "quit": ["Q"] }"#).unwrap();
        assert_eq!(bindings.quit, vec![Key::Q]);
        assert_eq!(bindings.forward, vec![Key::W, Key::Up]);
    }
}
