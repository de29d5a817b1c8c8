use super::{PlayerCount, RoundStatus, World};
use crate::config::consts;
use crate::entities::{Explosion, PowerupKind, Sprite};

impl World {
    /// Resolve every interaction for this tick. The step order is fixed so
    /// entities destroyed by an earlier step take no part in later ones.
    pub fn resolve_collisions(&mut self) -> RoundStatus {
        self.collide_bullets_with_enemies();
        self.collide_enemies_with_players();

        if self.is_round_over() {
            return RoundStatus::Over;
        }

        self.collect_health_powerups();
        self.collect_bomb_powerups();
        RoundStatus::Ongoing
    }

    /// Each enemy touched by a bullet is destroyed along with every bullet
    /// touching it, scores one point and is replaced by a new enemy.
    /// Returns the number of enemies destroyed.
    pub fn collide_bullets_with_enemies(&mut self) -> usize {
        let mut spent = vec![false; self.bullets.len()];
        let bullets = &self.bullets;
        let mut killed = 0;

        self.enemies.retain(|enemy| {
            let bounds = enemy.bounds();
            let mut hit = false;
            for (idx, bullet) in bullets.iter().enumerate() {
                if !spent[idx] && bullet.bounds().overlaps(&bounds) {
                    spent[idx] = true;
                    hit = true;
                }
            }
            if hit {
                killed += 1;
            }
            !hit
        });

        if killed == 0 {
            return 0;
        }

        let mut spent = spent.into_iter();
        self.bullets.retain(|_| !spent.next().unwrap_or(false));
        self.score += killed as u32;
        self.spawn_enemies(killed);
        log::debug!("shot down {} enemy(s), score {}", killed, self.score);
        killed
    }

    /// Enemies ram living players. The enemy survives; the player loses one
    /// health unless invulnerable and leaves play at zero.
    pub fn collide_enemies_with_players(&mut self) {
        for player in self.players.iter_mut().filter(|p| p.is_alive()) {
            let bounds = player.bounds();
            for enemy in &self.enemies {
                if !enemy.bounds().overlaps(&bounds) || !player.take_damage() {
                    continue;
                }
                log::debug!("player {} hit, health {}", player.slot.number(), player.health);
                if !player.is_alive() {
                    log::info!("player {} destroyed", player.slot.number());
                    break;
                }
            }
        }
    }

    /// Health pickups heal the collector, or in a two player round revive a
    /// dead teammate when the collector is already at full health.
    pub fn collect_health_powerups(&mut self) {
        for idx in 0..self.players.len() {
            let collected = self.take_powerups(idx, PowerupKind::Health);
            for _ in 0..collected {
                self.apply_health_pickup(idx);
            }
        }
    }

    fn apply_health_pickup(&mut self, idx: usize) {
        let collector = &self.players[idx];
        let at_full_health = collector.health == collector.max_health;
        let teammate = collector.slot.other().index();

        if self.mode == PlayerCount::Two && at_full_health {
            let field = self.field;
            if let Some(friend) = self.players.get_mut(teammate) {
                if !friend.is_alive() {
                    friend.revive(field);
                    log::info!(
                        "player {} revived by player {}",
                        friend.slot.number(),
                        idx + 1
                    );
                }
            }
            return;
        }

        self.players[idx].heal();
    }

    /// Bomb pickups clear the field: two points per enemy, then a fresh wave.
    pub fn collect_bomb_powerups(&mut self) {
        for idx in 0..self.players.len() {
            let collected = self.take_powerups(idx, PowerupKind::Bomb);
            for _ in 0..collected {
                self.detonate_bomb();
            }
        }
    }

    fn detonate_bomb(&mut self) {
        let (center_x, center_y) = self.field.center();
        self.explosions.push(Explosion::new(center_x, center_y));

        let cleared = self.enemies.len();
        self.enemies.clear();
        self.score += cleared as u32 * consts::BOMB_POINTS_PER_ENEMY;
        self.spawn_enemies(consts::BOMB_RESPAWN_COUNT);
        log::info!("bomb cleared {} enemy(s), score {}", cleared, self.score);
    }

    /// Remove every powerup of `kind` touching the living player at `idx`;
    /// returns how many were removed.
    fn take_powerups(&mut self, idx: usize, kind: PowerupKind) -> usize {
        let player = &self.players[idx];
        if !player.is_alive() {
            return 0;
        }
        let bounds = player.bounds();
        let before = self.powerups.len();
        self.powerups
            .retain(|p| p.kind != kind || !p.bounds().overlaps(&bounds));
        let collected = before - self.powerups.len();
        if collected > 0 {
            log::debug!(
                "player {} picked up {} {} powerup(s)",
                idx + 1,
                collected,
                kind.name()
            );
        }
        collected
    }
}
