use rand::Rng;

use super::World;
use crate::config::consts;
use crate::entities::{Enemy, Powerup, PowerupKind};

/// Counts ticks and, every `interval` ticks, rolls `percent` out of 100 to
/// decide whether something spawns. A failed roll still restarts the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnTimer {
    pub counter: u32,
    pub interval: u32,
    pub percent: u32,
}

impl SpawnTimer {
    pub fn new(interval: u32, percent: u32) -> Self {
        Self {
            counter: 0,
            interval,
            percent,
        }
    }

    pub fn health() -> Self {
        Self::new(consts::HEALTH_SPAWN_INTERVAL, consts::HEALTH_SPAWN_PERCENT)
    }

    pub fn bomb() -> Self {
        Self::new(consts::BOMB_SPAWN_INTERVAL, consts::BOMB_SPAWN_PERCENT)
    }

    /// Count one tick; true if a spawn should happen now
    pub fn tick(&mut self, rng: &mut impl Rng) -> bool {
        self.counter += 1;
        if self.counter < self.interval {
            return false;
        }
        self.counter = 0;
        rng.random_range(1..=100) <= self.percent
    }
}

impl World {
    pub(super) fn spawn_enemies(&mut self, count: usize) {
        for _ in 0..count {
            let enemy = Enemy::spawn(&mut self.rng, self.field, &self.enemy_ships);
            self.enemies.push(enemy);
        }
    }

    pub(super) fn run_spawn_timers(&mut self) {
        if self.health_timer.tick(&mut self.rng) {
            self.spawn_powerup(PowerupKind::Health);
        }
        if self.bomb_timer.tick(&mut self.rng) {
            self.spawn_powerup(PowerupKind::Bomb);
        }
    }

    fn spawn_powerup(&mut self, kind: PowerupKind) {
        let powerup = Powerup::spawn(kind, &mut self.rng, self.field);
        log::debug!("{} powerup dropping at x={}", kind.name(), powerup.x);
        self.powerups.push(powerup);
    }
}
