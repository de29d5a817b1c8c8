use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Game rule constants
pub mod consts {
    /// Default play field size in world pixels
    pub const FIELD_WIDTH: i32 = 1366;
    pub const FIELD_HEIGHT: i32 = 768;

    pub const TARGET_FPS: u32 = 60;

    /// Number of selectable ships (asset keys ship1..ship5)
    pub const SHIP_COUNT: u8 = 5;

    pub const PLAYER_SIZE: i32 = 64;
    pub const PLAYER_SPEED: i32 = 8;
    pub const PLAYER_MAX_HEALTH: u8 = 5;
    pub const INVULNERABLE_TICKS: u32 = 120;
    /// Translucency flicker half-period while invulnerable
    pub const BLINK_HALF_PERIOD: u32 = 5;
    /// Horizontal offset of each player's spawn point from the field centre
    pub const SPAWN_OFFSET_X: i32 = 80;
    /// Gap between a freshly spawned player and the field bottom
    pub const SPAWN_MARGIN_BOTTOM: i32 = 10;

    pub const ENEMY_SIZE: i32 = 64;
    pub const ENEMY_COUNT: usize = 5;
    pub const ENEMY_MIN_SPEED: i32 = 2;
    pub const ENEMY_MAX_SPEED: i32 = 6;
    pub const ENEMY_SPAWN_Y: i32 = -30;
    /// Enemies spawn with x in [0, width - ENEMY_SPAWN_MARGIN]
    pub const ENEMY_SPAWN_MARGIN: i32 = 30;

    pub const BULLET_SIZE: i32 = 12;
    pub const BULLET_SPEED: i32 = -10;

    pub const POWERUP_SIZE: i32 = 64;
    pub const POWERUP_MIN_SPEED: i32 = 1;
    pub const POWERUP_MAX_SPEED: i32 = 3;
    pub const HEALTH_SPAWN_INTERVAL: u32 = 600;
    pub const HEALTH_SPAWN_PERCENT: u32 = 30;
    pub const HEALTH_SPAWN_Y: i32 = -25;
    pub const HEALTH_SPAWN_MARGIN: i32 = 25;
    pub const BOMB_SPAWN_INTERVAL: u32 = 900;
    pub const BOMB_SPAWN_PERCENT: u32 = 15;
    pub const BOMB_SPAWN_Y: i32 = -64;
    pub const BOMB_SPAWN_MARGIN: i32 = 64;
    /// Score awarded per enemy cleared by a bomb
    pub const BOMB_POINTS_PER_ENEMY: u32 = 2;
    /// Enemies spawned after a bomb clears the field
    pub const BOMB_RESPAWN_COUNT: usize = 5;

    pub const EXPLOSION_MAX_RADIUS: f32 = 300.0;
    pub const EXPLOSION_GROWTH: f32 = 8.0;
    pub const EXPLOSION_RING_COUNT: usize = 3;
    pub const EXPLOSION_RING_GAP: f32 = 20.0;

    pub const STAR_COUNT: usize = 80;
    pub const STAR_MIN_SPEED: f32 = 0.5;
    pub const STAR_MAX_SPEED: f32 = 2.0;
}

/// Command line options
#[derive(Debug, Parser)]
#[command(name = "space-raiders", version, about)]
pub struct Cli {
    /// Directory containing ships/, health/, powerups/ and projectiles/
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Simulation and render rate in ticks per second
    #[arg(long, default_value_t = consts::TARGET_FPS, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log output is written
    #[arg(long, default_value = "space-raiders.log")]
    pub log_file: PathBuf,

    /// Play field width in world pixels
    #[arg(long, default_value_t = consts::FIELD_WIDTH, value_parser = clap::value_parser!(i32).range(320..))]
    pub field_width: i32,

    /// Play field height in world pixels
    #[arg(long, default_value_t = consts::FIELD_HEIGHT, value_parser = clap::value_parser!(i32).range(240..))]
    pub field_height: i32,
}

/// Play field dimensions in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub width: i32,
    pub height: i32,
}

impl Field {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT)
    }
}

/// Runtime configuration, built once at startup and handed to every component.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub field: Field,
    pub fps: u32,
    pub seed: Option<u64>,
    pub asset_dir: PathBuf,
    pub ship_count: u8,
}

impl GameConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: Field::default(),
            fps: consts::TARGET_FPS,
            seed: None,
            asset_dir: PathBuf::from("."),
            ship_count: consts::SHIP_COUNT,
        }
    }
}

impl From<&Cli> for GameConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            field: Field::new(cli.field_width, cli.field_height),
            fps: cli.fps,
            seed: cli.seed,
            asset_dir: cli.assets.clone(),
            ship_count: consts::SHIP_COUNT,
        }
    }
}
