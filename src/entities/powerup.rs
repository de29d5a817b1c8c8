use rand::Rng;

use super::{Bounds, Sprite, TickContext};
use crate::assets::AssetKey;
use crate::config::{Field, consts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    /// Heals the collector, or revives a fallen teammate
    Health,
    /// Clears every enemy on screen
    Bomb,
}

impl PowerupKind {
    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Health => "health",
            PowerupKind::Bomb => "bomb",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub x: i32,
    pub y: i32,
    pub speed: i32,
}

impl Powerup {
    pub fn new(kind: PowerupKind, x: i32, y: i32, speed: i32) -> Self {
        Self { kind, x, y, speed }
    }

    /// A powerup dropping in from above the field at a random column
    pub fn spawn(kind: PowerupKind, rng: &mut impl Rng, field: Field) -> Self {
        let (margin, y) = match kind {
            PowerupKind::Health => (consts::HEALTH_SPAWN_MARGIN, consts::HEALTH_SPAWN_Y),
            PowerupKind::Bomb => (consts::BOMB_SPAWN_MARGIN, consts::BOMB_SPAWN_Y),
        };
        let x = rng.random_range(0..=(field.width - margin).max(0));
        let speed = rng.random_range(consts::POWERUP_MIN_SPEED..=consts::POWERUP_MAX_SPEED);
        Self::new(kind, x, y, speed)
    }

    /// Fully below the bottom of the field
    pub fn is_out_of_bounds(&self, field: Field) -> bool {
        self.bounds().top() > field.height
    }

    pub fn asset(&self) -> AssetKey {
        match self.kind {
            PowerupKind::Health => AssetKey::HealthPickup,
            PowerupKind::Bomb => AssetKey::BombPickup,
        }
    }
}

impl Sprite for Powerup {
    fn advance(&mut self, _ctx: &mut TickContext<'_>) {
        self.y += self.speed;
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, consts::POWERUP_SIZE, consts::POWERUP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_health_spawn_position() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let powerup = Powerup::spawn(PowerupKind::Health, &mut rng, Field::default());
            assert_eq!(powerup.y, -25);
            assert!((0..=1366 - 25).contains(&powerup.x));
            assert!((1..=3).contains(&powerup.speed));
        }
    }

    #[test]
    fn test_bomb_spawn_position() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..50 {
            let powerup = Powerup::spawn(PowerupKind::Bomb, &mut rng, Field::default());
            assert_eq!(powerup.y, -64);
            assert!((0..=1366 - 64).contains(&powerup.x));
        }
    }

    #[test]
    fn test_out_of_bounds_below_field() {
        let field = Field::default();
        let mut powerup = Powerup::new(PowerupKind::Bomb, 10, 768, 2);
        assert!(!powerup.is_out_of_bounds(field));
        powerup.y = 769;
        assert!(powerup.is_out_of_bounds(field));
    }

    #[test]
    fn test_asset_by_kind() {
        assert_eq!(
            Powerup::new(PowerupKind::Health, 0, 0, 1).asset(),
            AssetKey::HealthPickup
        );
        assert_eq!(
            Powerup::new(PowerupKind::Bomb, 0, 0, 1).asset(),
            AssetKey::BombPickup
        );
    }
}
