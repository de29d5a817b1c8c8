use super::bullet::Bullet;
use super::{Bounds, ShipId, Sprite, TickContext};
use crate::assets::AssetKey;
use crate::config::{Field, consts};
use crate::controls::ControlScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// Player 1 plays with the arrow keys, player 2 with WASD
    pub fn scheme(self) -> ControlScheme {
        match self {
            PlayerSlot::One => ControlScheme::Arrows,
            PlayerSlot::Two => ControlScheme::Wasd,
        }
    }

    /// Top-left corner of this slot's spawn (and revival) position
    pub fn spawn_point(self, field: Field) -> (i32, i32) {
        let (center_x, _) = field.center();
        let spawn_center_x = match self {
            PlayerSlot::One => center_x - consts::SPAWN_OFFSET_X,
            PlayerSlot::Two => center_x + consts::SPAWN_OFFSET_X,
        };
        let bottom = field.height - consts::SPAWN_MARGIN_BOTTOM;
        (
            spawn_center_x - consts::PLAYER_SIZE / 2,
            bottom - consts::PLAYER_SIZE,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub slot: PlayerSlot,
    pub ship: ShipId,
    pub x: i32,
    pub y: i32,
    pub speed: i32,
    pub health: u8,
    pub max_health: u8,
    pub invulnerable_timer: u32,
    pub invulnerable_duration: u32,
    pub scheme: ControlScheme,
    /// Set on a shoot press, cleared on release; one bullet per press
    pub shoot_pressed: bool,
}

impl Player {
    pub fn new(slot: PlayerSlot, ship: ShipId, field: Field) -> Self {
        let (x, y) = slot.spawn_point(field);
        Self {
            slot,
            ship,
            x,
            y,
            speed: consts::PLAYER_SPEED,
            health: consts::PLAYER_MAX_HEALTH,
            max_health: consts::PLAYER_MAX_HEALTH,
            invulnerable_timer: 0,
            invulnerable_duration: consts::INVULNERABLE_TICKS,
            scheme: slot.scheme(),
            shoot_pressed: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    /// Cosmetic flicker while invulnerable; has no effect on collisions
    pub fn is_translucent(&self) -> bool {
        self.is_invulnerable()
            && self.invulnerable_timer % (consts::BLINK_HALF_PERIOD * 2) >= consts::BLINK_HALF_PERIOD
    }

    /// Returns true if the hit landed (the player was not invulnerable)
    pub fn take_damage(&mut self) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.invulnerable_timer = self.invulnerable_duration;
        true
    }

    pub fn heal(&mut self) {
        if self.health < self.max_health {
            self.health += 1;
        }
    }

    /// Bring a dead player back with one health at its spawn point
    pub fn revive(&mut self, field: Field) {
        let (x, y) = self.slot.spawn_point(field);
        self.x = x;
        self.y = y;
        self.health = 1;
        self.shoot_pressed = false;
    }

    /// Handles a shoot press edge; returns a bullet unless the trigger is still down
    pub fn press_trigger(&mut self) -> Option<Bullet> {
        if !self.is_alive() || self.shoot_pressed {
            return None;
        }
        self.shoot_pressed = true;
        let bounds = self.bounds();
        Some(Bullet::new(bounds.center_x(), bounds.top()))
    }

    pub fn release_trigger(&mut self) {
        self.shoot_pressed = false;
    }

    pub fn asset(&self) -> AssetKey {
        AssetKey::Ship(self.ship)
    }
}

impl Sprite for Player {
    fn advance(&mut self, ctx: &mut TickContext<'_>) {
        let (dx, dy) = ctx.held.scheme(self.scheme).direction();
        if dx != 0 || dy != 0 {
            // Normalize so diagonals are not faster than straight moves
            let length = ((dx * dx + dy * dy) as f32).sqrt();
            self.x += (dx as f32 / length * self.speed as f32) as i32;
            self.y += (dy as f32 / length * self.speed as f32) as i32;
        }
        self.x = self.x.clamp(0, (ctx.field.width - consts::PLAYER_SIZE).max(0));
        self.y = self.y.clamp(0, (ctx.field.height - consts::PLAYER_SIZE).max(0));

        if self.invulnerable_timer > 0 {
            self.invulnerable_timer -= 1;
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, consts::PLAYER_SIZE, consts::PLAYER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{Action, Binding, HeldKeys};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn advance_with(player: &mut Player, held: &HeldKeys) {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = TickContext {
            field: Field::default(),
            held,
            rng: &mut rng,
        };
        player.advance(&mut ctx);
    }

    fn holding(scheme: ControlScheme, actions: &[Action]) -> HeldKeys {
        let mut held = HeldKeys::new();
        for action in actions {
            held.set(Binding::new(scheme, *action), true);
        }
        held
    }

    #[test]
    fn test_player_new() {
        let player = Player::new(PlayerSlot::One, ShipId(2), Field::default());
        assert_eq!(player.health, 5);
        assert_eq!(player.max_health, 5);
        assert_eq!(player.speed, 8);
        assert_eq!(player.invulnerable_timer, 0);
        assert_eq!(player.scheme, ControlScheme::Arrows);
        assert_eq!(player.bounds().center_x(), 683 - 80);
        assert_eq!(player.bounds().bottom(), 768 - 10);
    }

    #[test]
    fn test_player_two_spawns_right_of_center() {
        let player = Player::new(PlayerSlot::Two, ShipId(0), Field::default());
        assert_eq!(player.bounds().center_x(), 683 + 80);
        assert_eq!(player.scheme, ControlScheme::Wasd);
    }

    #[test]
    fn test_player_moves_with_own_scheme_only() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        let start_x = player.x;

        advance_with(&mut player, &holding(ControlScheme::Wasd, &[Action::Left]));
        assert_eq!(player.x, start_x);

        advance_with(&mut player, &holding(ControlScheme::Arrows, &[Action::Left]));
        assert_eq!(player.x, start_x - 8);
    }

    #[test]
    fn test_player_diagonal_is_normalized() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        player.x = 500;
        player.y = 300;
        advance_with(
            &mut player,
            &holding(ControlScheme::Arrows, &[Action::Right, Action::Up]),
        );
        // 8 / sqrt(2) truncated
        assert_eq!(player.x, 505);
        assert_eq!(player.y, 295);
    }

    #[test]
    fn test_player_clamped_to_field() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        player.x = 3;
        player.y = 2;
        advance_with(
            &mut player,
            &holding(ControlScheme::Arrows, &[Action::Left, Action::Up]),
        );
        assert_eq!(player.x, 0);
        assert_eq!(player.y, 0);

        player.x = 1366 - 64;
        advance_with(&mut player, &holding(ControlScheme::Arrows, &[Action::Right]));
        assert_eq!(player.x, 1366 - 64);
    }

    #[test]
    fn test_take_damage_starts_invulnerability() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        assert!(player.take_damage());
        assert_eq!(player.health, 4);
        assert_eq!(player.invulnerable_timer, 120);

        // Second hit inside the window is ignored
        assert!(!player.take_damage());
        assert_eq!(player.health, 4);
    }

    #[test]
    fn test_invulnerability_expires() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        player.take_damage();
        let held = HeldKeys::new();
        for _ in 0..120 {
            advance_with(&mut player, &held);
        }
        assert!(!player.is_invulnerable());
        assert!(player.take_damage());
        assert_eq!(player.health, 3);
    }

    #[test]
    fn test_translucent_flicker() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        assert!(!player.is_translucent());
        player.invulnerable_timer = 119;
        assert!(player.is_translucent());
        player.invulnerable_timer = 114;
        assert!(!player.is_translucent());
        player.invulnerable_timer = 5;
        assert!(player.is_translucent());
    }

    #[test]
    fn test_heal_is_capped() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        player.heal();
        assert_eq!(player.health, 5);
        player.health = 3;
        player.heal();
        assert_eq!(player.health, 4);
    }

    #[test]
    fn test_one_bullet_per_press() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        let bullet = player.press_trigger().expect("first press fires");
        assert_eq!(bullet.bounds().bottom(), player.y);
        assert_eq!(bullet.bounds().center_x(), player.bounds().center_x());

        // Repeated presses while held do nothing
        assert!(player.press_trigger().is_none());
        assert!(player.press_trigger().is_none());

        player.release_trigger();
        assert!(player.press_trigger().is_some());
    }

    #[test]
    fn test_dead_player_cannot_fire() {
        let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
        player.health = 0;
        assert!(player.press_trigger().is_none());
    }

    #[test]
    fn test_revive_returns_to_spawn() {
        let field = Field::default();
        let mut player = Player::new(PlayerSlot::Two, ShipId(0), field);
        player.x = 10;
        player.y = 10;
        player.health = 0;
        player.shoot_pressed = true;
        player.revive(field);
        assert_eq!(player.health, 1);
        assert_eq!((player.x, player.y), PlayerSlot::Two.spawn_point(field));
        assert!(!player.shoot_pressed);
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_action() -> impl Strategy<Value = Action> {
            prop::sample::select(vec![Action::Up, Action::Down, Action::Left, Action::Right])
        }

        proptest! {
            #[test]
            fn test_player_stays_in_field(
                moves in prop::collection::vec(prop::collection::vec(arb_action(), 0..3), 0..300)
            ) {
                let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
                for actions in moves {
                    advance_with(&mut player, &holding(ControlScheme::Arrows, &actions));
                    prop_assert!(player.x >= 0 && player.x <= 1366 - 64);
                    prop_assert!(player.y >= 0 && player.y <= 768 - 64);
                }
            }

            #[test]
            fn test_player_health_stays_in_range(
                events in prop::collection::vec(0u8..3, 0..200)
            ) {
                let mut player = Player::new(PlayerSlot::One, ShipId(0), Field::default());
                let held = HeldKeys::new();
                for event in events {
                    match event {
                        0 => { player.take_damage(); }
                        1 => player.heal(),
                        _ => advance_with(&mut player, &held),
                    }
                    prop_assert!(player.health <= player.max_health);
                    prop_assert!(player.invulnerable_timer <= player.invulnerable_duration);
                }
            }
        }
    }
}
