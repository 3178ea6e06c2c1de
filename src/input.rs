/// Identifier for a physical keyboard key the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    /// Letter keys, stored upper case.
    Character(char),
}

/// Identifier for a mouse button in DOM numbering (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// One of the four walking directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

impl Movement {
    pub const ALL: [Movement; 4] = [Self::Forward, Self::Backward, Self::Left, Self::Right];

    /// WASD bindings.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Character('W') => Some(Self::Forward),
            KeyCode::Character('S') => Some(Self::Backward),
            KeyCode::Character('A') => Some(Self::Left),
            KeyCode::Character('D') => Some(Self::Right),
            _ => None,
        }
    }
}

/// Held state of the movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key transition. Returns false for keys that are not movement keys.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match Movement::from_key(key) {
            Some(movement) => {
                *self.flag_mut(movement) = pressed;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, movement: Movement) -> bool {
        match movement {
            Movement::Forward => self.forward,
            Movement::Backward => self.backward,
            Movement::Left => self.left,
            Movement::Right => self.right,
        }
    }

    /// Iterates over the directions currently held.
    pub fn active(&self) -> impl Iterator<Item = Movement> + '_ {
        Movement::ALL
            .into_iter()
            .filter(move |movement| self.is_active(*movement))
    }

    fn flag_mut(&mut self, movement: Movement) -> &mut bool {
        match movement {
            Movement::Forward => &mut self.forward,
            Movement::Backward => &mut self.backward,
            Movement::Left => &mut self.left,
            Movement::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_held_between_down_and_up() {
        let mut state = MovementState::new();
        let w = KeyCode::Character('W');
        assert!(!state.forward);
        assert!(state.set_key(w, true));
        assert!(state.forward);
        // OS key repeat re-sends key-down
        state.set_key(w, true);
        assert!(state.forward);
        state.set_key(w, false);
        assert!(!state.forward);
    }

    #[test]
    fn flags_are_independent() {
        let mut state = MovementState::new();
        state.set_key(KeyCode::Character('A'), true);
        state.set_key(KeyCode::Character('D'), true);
        state.set_key(KeyCode::Character('A'), false);
        assert_eq!(state.active().collect::<Vec<_>>(), vec![Movement::Right]);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut state = MovementState::new();
        assert!(!state.set_key(KeyCode::Escape, true));
        assert!(!state.set_key(KeyCode::Character('Q'), true));
        assert_eq!(state.active().count(), 0);
    }
}
