//! Menu flow around the rounds: player count, ship choice, play, game over.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::controls::{Action, Binding, ControlScheme, HeldKeys, InputEvent};
use crate::entities::{PlayerSlot, ShipId};
use crate::world::{PlayerCount, RoundStatus, World};

/// Whether the application should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Cycles one player's selection through the ships still available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipPicker {
    pub slot: PlayerSlot,
    pub options: Vec<ShipId>,
    pub selected: usize,
    ship_count: u8,
}

impl ShipPicker {
    /// None when every ship is excluded
    pub fn new(slot: PlayerSlot, ship_count: u8, excluded: &[ShipId]) -> Option<Self> {
        let options: Vec<ShipId> = (0..ship_count)
            .map(ShipId)
            .filter(|ship| !excluded.contains(ship))
            .collect();
        if options.is_empty() {
            return None;
        }
        Some(Self {
            slot,
            options,
            selected: 0,
            ship_count,
        })
    }

    pub fn current(&self) -> ShipId {
        self.options[self.selected]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + self.options.len() - 1) % self.options.len();
    }

    /// Every ship in number order, paired with whether this player may take it
    pub fn ships(&self) -> impl Iterator<Item = (ShipId, bool)> + '_ {
        (0..self.ship_count)
            .map(ShipId)
            .map(|ship| (ship, self.options.contains(&ship)))
    }

    /// The key that locks in the selection for this picker's player
    fn is_confirm(&self, binding: Binding) -> bool {
        match self.slot.scheme() {
            ControlScheme::Arrows => {
                binding.scheme == ControlScheme::Arrows
                    && matches!(binding.action, Action::Confirm | Action::Shoot)
            }
            ControlScheme::Wasd => binding == Binding::new(ControlScheme::Wasd, Action::Shoot),
        }
    }
}

/// Shown when two players are asked for on a terminal that cannot see Shift
pub const TWO_PLAYER_NOTICE: &str =
    "2 PLAYERS needs a terminal that reports key releases (player 2 fires with Shift)";

pub enum Screen {
    ChoosePlayerCount {
        selected: PlayerCount,
        notice: Option<&'static str>,
    },
    ChooseShip {
        count: PlayerCount,
        picker: ShipPicker,
        /// Ships locked in by earlier players
        picks: Vec<ShipId>,
    },
    Playing(World),
    GameOver(World),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::ChoosePlayerCount {
            selected: PlayerCount::One,
            notice: None,
        }
    }
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::ChoosePlayerCount { .. } => "choose player count",
            Screen::ChooseShip { .. } => "choose ship",
            Screen::Playing(_) => "playing",
            Screen::GameOver(_) => "game over",
        }
    }
}

/// Enter or Space on the arrow scheme
fn is_menu_confirm(binding: Binding) -> bool {
    binding.scheme == ControlScheme::Arrows
        && matches!(binding.action, Action::Confirm | Action::Shoot)
}

fn slot_for(scheme: ControlScheme) -> PlayerSlot {
    match scheme {
        ControlScheme::Arrows => PlayerSlot::One,
        ControlScheme::Wasd => PlayerSlot::Two,
    }
}

pub struct Session {
    config: GameConfig,
    /// Seeds each round's world
    rng: StdRng,
    screen: Screen,
    rounds_played: u32,
    /// Player 2's fire key is a bare Shift, which only enhanced terminals report
    two_players_allowed: bool,
}

impl Session {
    /// `keyboard_enhanced` is whether the terminal reports bare modifier keys
    pub fn new(config: GameConfig, keyboard_enhanced: bool) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            screen: Screen::default(),
            rounds_played: 0,
            two_players_allowed: keyboard_enhanced,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Apply one discrete input event
    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        if event == InputEvent::Quit {
            log::info!("quit requested on {} screen", self.screen.name());
            return Flow::Quit;
        }

        let screen = std::mem::take(&mut self.screen);
        let before = screen.name();
        self.screen = match (screen, event) {
            (Screen::ChoosePlayerCount { selected, notice }, InputEvent::Pressed(binding)) => {
                self.on_player_count_key(selected, notice, binding)
            }
            (
                Screen::ChooseShip {
                    count,
                    picker,
                    picks,
                },
                InputEvent::Pressed(binding),
            ) => self.on_ship_key(count, picker, picks, binding),
            (Screen::Playing(mut world), event) => {
                match event {
                    InputEvent::Pressed(Binding {
                        scheme,
                        action: Action::Shoot,
                    }) => world.press_trigger(slot_for(scheme)),
                    InputEvent::Released(Binding {
                        scheme,
                        action: Action::Shoot,
                    }) => world.release_trigger(slot_for(scheme)),
                    _ => {}
                }
                Screen::Playing(world)
            }
            (Screen::GameOver(world), InputEvent::Pressed(binding)) => {
                if is_menu_confirm(binding) {
                    Screen::default()
                } else {
                    Screen::GameOver(world)
                }
            }
            (screen, _) => screen,
        };

        if self.screen.name() != before {
            log::info!("{} -> {}", before, self.screen.name());
        }
        Flow::Continue
    }

    fn on_player_count_key(
        &mut self,
        selected: PlayerCount,
        notice: Option<&'static str>,
        binding: Binding,
    ) -> Screen {
        match binding.action {
            Action::Left => Screen::ChoosePlayerCount {
                selected: PlayerCount::One,
                notice: None,
            },
            Action::Right if !self.two_players_allowed => {
                log::warn!("two players refused: the terminal cannot report Shift");
                Screen::ChoosePlayerCount {
                    selected: PlayerCount::One,
                    notice: Some(TWO_PLAYER_NOTICE),
                }
            }
            Action::Right => Screen::ChoosePlayerCount {
                selected: PlayerCount::Two,
                notice: None,
            },
            _ if is_menu_confirm(binding) => self.start_ship_choice(selected, PlayerSlot::One, Vec::new()),
            _ => Screen::ChoosePlayerCount { selected, notice },
        }
    }

    fn on_ship_key(
        &mut self,
        count: PlayerCount,
        mut picker: ShipPicker,
        mut picks: Vec<ShipId>,
        binding: Binding,
    ) -> Screen {
        if binding.scheme == picker.slot.scheme() {
            match binding.action {
                Action::Left => picker.previous(),
                Action::Right => picker.next(),
                _ => {}
            }
        }
        if !picker.is_confirm(binding) {
            return Screen::ChooseShip {
                count,
                picker,
                picks,
            };
        }

        log::info!(
            "player {} picked ship {}",
            picker.slot.number(),
            picker.current().number()
        );
        picks.push(picker.current());
        if picks.len() < count.get() {
            return self.start_ship_choice(count, picker.slot.other(), picks);
        }
        self.start_round(&picks)
    }

    fn start_ship_choice(
        &mut self,
        count: PlayerCount,
        slot: PlayerSlot,
        picks: Vec<ShipId>,
    ) -> Screen {
        match ShipPicker::new(slot, self.config.ship_count, &picks) {
            Some(picker) => Screen::ChooseShip {
                count,
                picker,
                picks,
            },
            None => {
                log::warn!("no ship left for player {}", slot.number());
                Screen::default()
            }
        }
    }

    fn start_round(&mut self, picks: &[ShipId]) -> Screen {
        self.rounds_played += 1;
        let rng = StdRng::seed_from_u64(self.rng.random());
        Screen::Playing(World::new(&self.config, picks, rng))
    }

    /// Advance one fixed tick
    pub fn tick(&mut self, held: &HeldKeys) {
        self.screen = match std::mem::take(&mut self.screen) {
            Screen::Playing(mut world) => {
                if world.tick(held) == RoundStatus::Over {
                    log::info!("game over, final score {}", world.score);
                    Screen::GameOver(world)
                } else {
                    Screen::Playing(world)
                }
            }
            Screen::GameOver(mut world) => {
                world.advance_background();
                Screen::GameOver(world)
            }
            screen => screen,
        };
    }
}
