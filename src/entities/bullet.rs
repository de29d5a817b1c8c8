use super::{Bounds, Sprite, TickContext};
use crate::assets::AssetKey;
use crate::config::consts;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
    pub velocity_y: i32,
}

impl Bullet {
    /// Bullet centred on `center_x` with its bottom edge at `bottom`
    pub fn new(center_x: i32, bottom: i32) -> Self {
        Self {
            x: center_x - consts::BULLET_SIZE / 2,
            y: bottom - consts::BULLET_SIZE,
            velocity_y: consts::BULLET_SPEED,
        }
    }

    /// Fully above the top of the field
    pub fn is_out_of_bounds(&self) -> bool {
        self.bounds().bottom() < 0
    }

    pub fn asset(&self) -> AssetKey {
        AssetKey::Projectile
    }
}

impl Sprite for Bullet {
    fn advance(&mut self, _ctx: &mut TickContext<'_>) {
        self.y += self.velocity_y;
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, consts::BULLET_SIZE, consts::BULLET_SIZE)
    }
}
