use super::{Bounds, Sprite, TickContext};
use crate::config::consts;

/// Expanding ripple shown when a bomb goes off. Purely visual.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: f32,
    pub max_radius: f32,
    pub growth: f32,
}

/// One ring of the ripple effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub radius: f32,
    pub color: (u8, u8, u8),
}

impl Explosion {
    pub fn new(center_x: i32, center_y: i32) -> Self {
        Self {
            center_x,
            center_y,
            radius: 0.0,
            max_radius: consts::EXPLOSION_MAX_RADIUS,
            growth: consts::EXPLOSION_GROWTH,
        }
    }

    /// Opacity falls linearly from 255 at radius 0 to 0 at the max radius
    pub fn alpha(&self) -> u8 {
        (255.0 - self.radius / self.max_radius * 255.0).clamp(0.0, 255.0) as u8
    }

    pub fn is_finished(&self) -> bool {
        self.radius > self.max_radius
    }

    /// Concentric rings, outermost first; rings with no radius left are skipped
    pub fn ripples(&self) -> Vec<Ripple> {
        let alpha = i32::from(self.alpha());
        (0..consts::EXPLOSION_RING_COUNT)
            .filter_map(|i| {
                let radius = self.radius - i as f32 * consts::EXPLOSION_RING_GAP;
                if radius <= 0.0 {
                    return None;
                }
                let intensity = (alpha - i as i32 * 50).max(0);
                let green = (200 + intensity).min(255) as u8;
                Some(Ripple {
                    radius,
                    color: (255, green, 0),
                })
            })
            .collect()
    }
}

impl Sprite for Explosion {
    fn advance(&mut self, _ctx: &mut TickContext<'_>) {
        self.radius += self.growth;
    }

    fn bounds(&self) -> Bounds {
        let r = self.radius.ceil() as i32;
        Bounds::new(self.center_x - r, self.center_y - r, r * 2, r * 2)
    }
}
