use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode,
};

use crate::controls::{Action, Binding, ControlScheme, HeldKeys, InputEvent};

/// Without release reports, a key counts as released this long after its
/// first press if the terminal has not started auto-repeating it. It has to
/// outlast the terminal's auto-repeat delay, so a second tap inside it is
/// indistinguishable from a repeat and does not produce a new press.
const FIRST_REPEAT_GRACE: Duration = Duration::from_millis(550);
/// ...and this long after the latest auto-repeat
const REPEAT_GRACE: Duration = Duration::from_millis(120);

/// What a physical key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMapping {
    Quit,
    Bound(Binding),
}

/// Translate a crossterm key into a game binding
pub fn map_key(key: &KeyEvent) -> Option<KeyMapping> {
    use Action::*;
    use ControlScheme::*;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(KeyMapping::Quit);
    }
    let binding = match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Some(KeyMapping::Quit),

        KeyCode::Up => Binding::new(Arrows, Up),
        KeyCode::Down => Binding::new(Arrows, Down),
        KeyCode::Left => Binding::new(Arrows, Left),
        KeyCode::Right => Binding::new(Arrows, Right),
        KeyCode::Char(' ') => Binding::new(Arrows, Shoot),
        KeyCode::Enter => Binding::new(Arrows, Confirm),

        KeyCode::Char('w') | KeyCode::Char('W') => Binding::new(Wasd, Up),
        KeyCode::Char('s') | KeyCode::Char('S') => Binding::new(Wasd, Down),
        KeyCode::Char('a') | KeyCode::Char('A') => Binding::new(Wasd, Left),
        KeyCode::Char('d') | KeyCode::Char('D') => Binding::new(Wasd, Right),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            Binding::new(Wasd, Shoot)
        }
        _ => return None,
    };
    Some(KeyMapping::Bound(binding))
}

#[derive(Debug, Clone, Copy)]
struct HeldSince {
    last_seen: Instant,
    repeating: bool,
}

/// Polls the terminal, keeps held-key state and queues discrete events
pub struct InputManager {
    held: HeldKeys,
    events: Vec<InputEvent>,
    /// False when the terminal never sends key releases
    reports_releases: bool,
    timestamps: HashMap<Binding, HeldSince>,
}

impl InputManager {
    pub fn new(reports_releases: bool) -> Self {
        Self {
            held: HeldKeys::new(),
            events: Vec::new(),
            reports_releases,
            timestamps: HashMap::new(),
        }
    }

    pub fn held(&self) -> &HeldKeys {
        &self.held
    }

    /// Drain every pending terminal event without blocking
    pub fn poll_events(&mut self) {
        loop {
            let event = match event::poll(Duration::ZERO).and_then(|ready| {
                if ready { event::read().map(Some) } else { Ok(None) }
            }) {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(err) => {
                    // stdin is gone, e.g. the terminal hung up
                    log::warn!("input stream closed: {err}");
                    self.events.push(InputEvent::Quit);
                    break;
                }
            };
            self.handle_event(event, Instant::now());
        }
        self.expire_stale_keys(Instant::now());
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key_event(key, now),
            Event::FocusLost => self.release_all(),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        let Some(mapping) = map_key(&key) else {
            return;
        };
        let binding = match mapping {
            KeyMapping::Quit => {
                if key.kind == KeyEventKind::Press {
                    self.events.push(InputEvent::Quit);
                }
                return;
            }
            KeyMapping::Bound(binding) => binding,
        };

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if self.held.is_held(binding) {
                    // Auto-repeat; without release reports it arrives as a press
                    if let Some(since) = self.timestamps.get_mut(&binding) {
                        since.last_seen = now;
                        since.repeating = true;
                    }
                    return;
                }
                self.held.set(binding, true);
                self.timestamps.insert(
                    binding,
                    HeldSince {
                        last_seen: now,
                        repeating: false,
                    },
                );
                self.events.push(InputEvent::Pressed(binding));
            }
            KeyEventKind::Release => self.release(binding),
        }
    }

    fn release(&mut self, binding: Binding) {
        self.timestamps.remove(&binding);
        if self.held.is_held(binding) {
            self.held.set(binding, false);
            self.events.push(InputEvent::Released(binding));
        }
    }

    fn release_all(&mut self) {
        let bindings: Vec<Binding> = self.timestamps.keys().copied().collect();
        for binding in bindings {
            self.release(binding);
        }
    }

    /// Emit synthetic releases for keys the terminal stopped repeating
    pub fn expire_stale_keys(&mut self, now: Instant) {
        if self.reports_releases {
            return;
        }
        let stale: Vec<Binding> = self
            .timestamps
            .iter()
            .filter(|(_, since)| {
                let grace = if since.repeating {
                    REPEAT_GRACE
                } else {
                    FIRST_REPEAT_GRACE
                };
                now.duration_since(since.last_seen) > grace
            })
            .map(|(binding, _)| *binding)
            .collect();
        for binding in stale {
            self.release(binding);
        }
    }

    /// Discrete events since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    const SPACE: Binding = Binding::new(ControlScheme::Arrows, Action::Shoot);
    const KEY_A: Binding = Binding::new(ControlScheme::Wasd, Action::Left);

    #[test]
    fn test_key_mapping() {
        let map = |code| map_key(&KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(map(KeyCode::Esc), Some(KeyMapping::Quit));
        assert_eq!(map(KeyCode::Char('q')), Some(KeyMapping::Quit));
        assert_eq!(
            map(KeyCode::Enter),
            Some(KeyMapping::Bound(Binding::new(ControlScheme::Arrows, Action::Confirm)))
        );
        assert_eq!(map(KeyCode::Char('A')), Some(KeyMapping::Bound(KEY_A)));
        assert_eq!(
            map(KeyCode::Modifier(ModifierKeyCode::RightShift)),
            Some(KeyMapping::Bound(Binding::new(ControlScheme::Wasd, Action::Shoot)))
        );
        assert_eq!(map(KeyCode::Char('x')), None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(KeyMapping::Quit));
        assert_eq!(map(KeyCode::Char('c')), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press), now);
        input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Repeat), now);
        assert!(input.held().is_held(SPACE));

        input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Release), now);
        assert!(!input.held().is_held(SPACE));
        assert_eq!(
            input.take_events(),
            vec![InputEvent::Pressed(SPACE), InputEvent::Released(SPACE)]
        );
        assert!(input.take_events().is_empty());
    }

    #[test]
    fn test_quit_only_on_press() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Esc, KeyEventKind::Press), now);
        input.handle_event(key(KeyCode::Esc, KeyEventKind::Release), now);
        assert_eq!(input.take_events(), vec![InputEvent::Quit]);
    }

    #[test]
    fn test_repeated_press_without_release_reports_is_one_press() {
        let mut input = InputManager::new(false);
        let start = Instant::now();
        input.handle_event(key(KeyCode::Char('a'), KeyEventKind::Press), start);
        input.handle_event(
            key(KeyCode::Char('a'), KeyEventKind::Press),
            start + Duration::from_millis(400),
        );
        input.expire_stale_keys(start + Duration::from_millis(450));
        assert!(input.held().is_held(KEY_A));
        assert_eq!(input.take_events(), vec![InputEvent::Pressed(KEY_A)]);
    }

    #[test]
    fn test_taps_inside_the_grace_merge_without_release_reports() {
        let mut input = InputManager::new(false);
        let start = Instant::now();
        let tap = |input: &mut InputManager, at: u64| {
            let now = start + Duration::from_millis(at);
            input.expire_stale_keys(now);
            input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press), now);
        };

        // A second tap 250ms later reads like the start of auto-repeat
        tap(&mut input, 0);
        tap(&mut input, 250);
        assert_eq!(input.take_events(), vec![InputEvent::Pressed(SPACE)]);

        // Once the key has gone quiet the next tap is a fresh press
        tap(&mut input, 1_500);
        assert_eq!(
            input.take_events(),
            vec![InputEvent::Released(SPACE), InputEvent::Pressed(SPACE)]
        );
    }

    #[test]
    fn test_stale_keys_are_released() {
        let mut input = InputManager::new(false);
        let start = Instant::now();
        input.handle_event(key(KeyCode::Char('a'), KeyEventKind::Press), start);
        input.expire_stale_keys(start + Duration::from_millis(500));
        assert!(input.held().is_held(KEY_A));
        input.expire_stale_keys(start + Duration::from_millis(600));
        assert!(!input.held().is_held(KEY_A));
        assert_eq!(
            input.take_events(),
            vec![InputEvent::Pressed(KEY_A), InputEvent::Released(KEY_A)]
        );
    }

    #[test]
    fn test_repeating_keys_expire_sooner() {
        let mut input = InputManager::new(false);
        let start = Instant::now();
        input.handle_event(key(KeyCode::Char('a'), KeyEventKind::Press), start);
        let repeat = start + Duration::from_millis(300);
        input.handle_event(key(KeyCode::Char('a'), KeyEventKind::Press), repeat);
        input.expire_stale_keys(repeat + Duration::from_millis(200));
        assert!(!input.held().is_held(KEY_A));
    }

    #[test]
    fn test_no_expiry_when_terminal_reports_releases() {
        let mut input = InputManager::new(true);
        let start = Instant::now();
        input.handle_event(key(KeyCode::Char('a'), KeyEventKind::Press), start);
        input.expire_stale_keys(start + Duration::from_secs(10));
        assert!(input.held().is_held(KEY_A));
    }

    #[test]
    fn test_focus_lost_releases_everything() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Char('a'), KeyEventKind::Press), now);
        input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press), now);
        input.take_events();

        input.handle_event(Event::FocusLost, now);
        assert_eq!(input.held(), &HeldKeys::new());
        assert_eq!(input.take_events().len(), 2);
    }
}
