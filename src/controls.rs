//! Logical controls shared by the game core and the terminal input layer.

/// One of the two hardcoded keyboard layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlScheme {
    /// Arrow keys, Space to shoot, Enter to confirm
    Arrows,
    /// WASD, Shift to shoot
    Wasd,
}

impl ControlScheme {
    pub fn index(self) -> usize {
        match self {
            ControlScheme::Arrows => 0,
            ControlScheme::Wasd => 1,
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ControlScheme::Arrows => "←/→ choose, ENTER/SPACE confirm",
            ControlScheme::Wasd => "A/D choose, SHIFT confirm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Confirm,
}

/// A logical key: an action within a control scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub scheme: ControlScheme,
    pub action: Action,
}

impl Binding {
    pub const fn new(scheme: ControlScheme, action: Action) -> Self {
        Self { scheme, action }
    }
}

/// Discrete input, drained once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Binding),
    Released(Binding),
    Quit,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub confirm: bool,
}

impl KeyState {
    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Up => self.up = held,
            Action::Down => self.down = held,
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Shoot => self.shoot = held,
            Action::Confirm => self.confirm = held,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Shoot => self.shoot,
            Action::Confirm => self.confirm,
        }
    }

    /// Movement direction as (dx, dy), each in -1..=1
    pub fn direction(&self) -> (i32, i32) {
        let dx = i32::from(self.right) - i32::from(self.left);
        let dy = i32::from(self.down) - i32::from(self.up);
        (dx, dy)
    }
}

/// Held-key state for both control schemes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeldKeys {
    schemes: [KeyState; 2],
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheme(&self, scheme: ControlScheme) -> &KeyState {
        &self.schemes[scheme.index()]
    }

    pub fn set(&mut self, binding: Binding, held: bool) {
        self.schemes[binding.scheme.index()].set(binding.action, held);
    }

    pub fn is_held(&self, binding: Binding) -> bool {
        self.scheme(binding.scheme).is_held(binding.action)
    }

    pub fn clear(&mut self) {
        self.schemes = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_cancels_opposites() {
        let keys = KeyState {
            left: true,
            right: true,
            up: true,
            ..KeyState::default()
        };
        assert_eq!(keys.direction(), (0, -1));
    }

    #[test]
    fn test_held_keys_are_per_scheme() {
        let mut held = HeldKeys::new();
        held.set(Binding::new(ControlScheme::Wasd, Action::Left), true);
        assert!(held.scheme(ControlScheme::Wasd).left);
        assert!(!held.scheme(ControlScheme::Arrows).left);

        held.clear();
        assert!(!held.is_held(Binding::new(ControlScheme::Wasd, Action::Left)));
    }
}
