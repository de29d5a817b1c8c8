//! The playing field: every live entity, the score and the per-tick update.

mod collision;
mod spawn;

use rand::rngs::StdRng;

use crate::config::{Field, GameConfig, consts};
use crate::controls::HeldKeys;
use crate::entities::{
    Bullet, Enemy, Explosion, Player, PlayerSlot, Powerup, ShipId, Sprite, Star, TickContext,
};

pub use spawn::SpawnTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCount {
    One,
    Two,
}

impl PlayerCount {
    pub fn get(self) -> usize {
        match self {
            PlayerCount::One => 1,
            PlayerCount::Two => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Ongoing,
    /// Every player is out of health
    Over,
}

pub struct World {
    pub field: Field,
    pub mode: PlayerCount,
    /// Indexed by `PlayerSlot::index`; dead players stay here for revival
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<Powerup>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub score: u32,
    pub health_timer: SpawnTimer,
    pub bomb_timer: SpawnTimer,
    pub frame_count: u64,
    /// Ships enemies may use: every ship no player picked
    enemy_ships: Vec<ShipId>,
    rng: StdRng,
}

impl World {
    /// Start a round with one player per entry in `picks` (one or two)
    pub fn new(config: &GameConfig, picks: &[ShipId], rng: StdRng) -> Self {
        let mode = if picks.len() >= 2 {
            PlayerCount::Two
        } else {
            PlayerCount::One
        };
        let players = [PlayerSlot::One, PlayerSlot::Two]
            .into_iter()
            .zip(picks.iter())
            .map(|(slot, ship)| Player::new(slot, *ship, config.field))
            .collect();

        let mut enemy_ships: Vec<ShipId> = (0..config.ship_count)
            .map(ShipId)
            .filter(|ship| !picks.contains(ship))
            .collect();
        if enemy_ships.is_empty() {
            log::warn!("players picked every ship; enemies will reuse them");
            enemy_ships = (0..config.ship_count.max(1)).map(ShipId).collect();
        }

        let mut world = Self {
            field: config.field,
            mode,
            players,
            enemies: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            explosions: Vec::new(),
            stars: Vec::new(),
            score: 0,
            health_timer: SpawnTimer::health(),
            bomb_timer: SpawnTimer::bomb(),
            frame_count: 0,
            enemy_ships,
            rng,
        };
        let stars = (0..consts::STAR_COUNT)
            .map(|_| Star::scattered(&mut world.rng, world.field))
            .collect();
        world.stars = stars;
        world.spawn_enemies(consts::ENEMY_COUNT);
        log::info!(
            "round started: {} player(s), ships {:?}",
            world.mode.get(),
            picks.iter().map(|s| s.number()).collect::<Vec<_>>()
        );
        world
    }

    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub fn enemy_ships(&self) -> &[ShipId] {
        &self.enemy_ships
    }

    /// True once every player is out of health
    pub fn is_round_over(&self) -> bool {
        self.players.iter().all(|p| !p.is_alive())
    }

    /// Shoot press edge for `slot`
    pub fn press_trigger(&mut self, slot: PlayerSlot) {
        let Some(player) = self.players.get_mut(slot.index()) else {
            return;
        };
        if let Some(bullet) = player.press_trigger() {
            self.bullets.push(bullet);
        }
    }

    pub fn release_trigger(&mut self, slot: PlayerSlot) {
        if let Some(player) = self.players.get_mut(slot.index()) {
            player.release_trigger();
        }
    }

    /// Advance every entity, resolve collisions, then run the spawn timers.
    pub fn tick(&mut self, held: &HeldKeys) -> RoundStatus {
        self.frame_count += 1;
        self.advance_entities(held);

        if self.resolve_collisions() == RoundStatus::Over {
            log::info!("round over after {} ticks, score {}", self.frame_count, self.score);
            return RoundStatus::Over;
        }

        self.run_spawn_timers();
        RoundStatus::Ongoing
    }

    /// Only the background keeps moving, e.g. behind the game over screen
    pub fn advance_background(&mut self) {
        let held = HeldKeys::new();
        let mut ctx = TickContext {
            field: self.field,
            held: &held,
            rng: &mut self.rng,
        };
        for star in &mut self.stars {
            star.advance(&mut ctx);
        }
    }

    fn advance_entities(&mut self, held: &HeldKeys) {
        let mut ctx = TickContext {
            field: self.field,
            held,
            rng: &mut self.rng,
        };

        for star in &mut self.stars {
            star.advance(&mut ctx);
        }
        for player in self.players.iter_mut().filter(|p| p.is_alive()) {
            player.advance(&mut ctx);
        }
        for enemy in &mut self.enemies {
            enemy.advance(&mut ctx);
        }
        for bullet in &mut self.bullets {
            bullet.advance(&mut ctx);
        }
        for powerup in &mut self.powerups {
            powerup.advance(&mut ctx);
        }
        for explosion in &mut self.explosions {
            explosion.advance(&mut ctx);
        }

        let field = self.field;
        self.bullets.retain(|b| !b.is_out_of_bounds());
        self.powerups.retain(|p| !p.is_out_of_bounds(field));
        self.explosions.retain(|e| !e.is_finished());
    }
}
