use rand::Rng;

use super::{Bounds, Sprite, TickContext};
use crate::config::{Field, consts};

/// Background particle. Never removed: it wraps back to the top instead.
#[derive(Debug, Clone)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub size: u8,
    pub color: (u8, u8, u8),
}

impl Star {
    /// A star anywhere on the field
    pub fn scattered(rng: &mut impl Rng, field: Field) -> Self {
        let mut star = Self {
            x: 0.0,
            y: rng.random_range(0..field.height.max(1)) as f32,
            speed: 0.0,
            size: 1,
            color: (255, 255, 255),
        };
        star.reroll(rng, field);
        star
    }

    /// New column, speed, size and colour
    fn reroll(&mut self, rng: &mut impl Rng, field: Field) {
        self.x = rng.random_range(0..field.width.max(1)) as f32;
        self.speed = rng.random_range(consts::STAR_MIN_SPEED..consts::STAR_MAX_SPEED);
        self.size = rng.random_range(1..=2);
        self.color = (
            rng.random_range(180..=255),
            rng.random_range(180..=255),
            rng.random_range(180..=255),
        );
    }
}

impl Sprite for Star {
    fn advance(&mut self, ctx: &mut TickContext<'_>) {
        self.y += self.speed;
        if self.y > ctx.field.height as f32 {
            self.y = 0.0;
            self.reroll(ctx.rng, ctx.field);
        }
    }

    fn bounds(&self) -> Bounds {
        let size = i32::from(self.size);
        Bounds::new(self.x as i32, self.y as i32, size, size)
    }
}
