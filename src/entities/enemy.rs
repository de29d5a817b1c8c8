use rand::Rng;

use super::{Bounds, ShipId, Sprite, TickContext};
use crate::assets::AssetKey;
use crate::config::{Field, consts};

#[derive(Debug, Clone)]
pub struct Enemy {
    /// Drawn upside down; never one of the players' ships
    pub ship: ShipId,
    pub x: i32,
    pub y: i32,
    pub speed: i32,
}

impl Enemy {
    pub fn new(ship: ShipId, x: i32, y: i32, speed: i32) -> Self {
        Self { ship, x, y, speed }
    }

    /// A fresh enemy above the field using one of `ships` (must not be empty)
    pub fn spawn(rng: &mut impl Rng, field: Field, ships: &[ShipId]) -> Self {
        let ship = ships[rng.random_range(0..ships.len())];
        let mut enemy = Self::new(ship, 0, 0, 0);
        enemy.place_above_field(rng, field);
        enemy
    }

    fn place_above_field(&mut self, rng: &mut impl Rng, field: Field) {
        let max_x = (field.width - consts::ENEMY_SPAWN_MARGIN).max(0);
        self.x = rng.random_range(0..=max_x);
        self.y = consts::ENEMY_SPAWN_Y;
        self.speed = rng.random_range(consts::ENEMY_MIN_SPEED..=consts::ENEMY_MAX_SPEED);
    }

    pub fn has_left_field(&self, field: Field) -> bool {
        self.bounds().top() > field.height
    }

    pub fn asset(&self) -> AssetKey {
        AssetKey::Ship(self.ship)
    }
}

impl Sprite for Enemy {
    /// Falls straight down; leaving the bottom recycles it to the top instead of removing it
    fn advance(&mut self, ctx: &mut TickContext<'_>) {
        self.y += self.speed;
        if self.has_left_field(ctx.field) {
            self.place_above_field(ctx.rng, ctx.field);
        }
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, consts::ENEMY_SIZE, consts::ENEMY_SIZE)
    }
}
