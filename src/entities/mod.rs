mod bounds;
mod bullet;
mod enemy;
mod explosion;
mod player;
mod powerup;
mod star;

use rand::rngs::StdRng;

use crate::config::Field;
use crate::controls::HeldKeys;

// Re-export all public types
pub use bounds::Bounds;
pub use bullet::Bullet;
pub use enemy::Enemy;
pub use explosion::Explosion;
pub use player::{Player, PlayerSlot};
pub use powerup::{Powerup, PowerupKind};
pub use star::Star;

/// Zero-based index into the ship sprite set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipId(pub u8);

impl ShipId {
    /// Ship number as shown to players and used in asset file names
    pub fn number(self) -> u8 {
        self.0 + 1
    }
}

/// Everything an entity may consult while advancing one tick
pub struct TickContext<'a> {
    pub field: Field,
    pub held: &'a HeldKeys,
    pub rng: &'a mut StdRng,
}

/// Common capability of every drawable, collidable game object.
pub trait Sprite {
    /// Advance one tick. Removal from the owning collection is decided by the owner.
    fn advance(&mut self, ctx: &mut TickContext<'_>);

    /// Axis-aligned box in world pixels
    fn bounds(&self) -> Bounds;
}
