// Library exports for testing
pub use app::App;
pub use assets::{AssetKey, Assets};
pub use config::{Cli, Field, GameConfig, consts};
pub use controls::{Action, Binding, ControlScheme, HeldKeys, InputEvent};
pub use entities::{
    Bounds, Bullet, Enemy, Explosion, Player, PlayerSlot, Powerup, PowerupKind, ShipId, Sprite,
    Star,
};
pub use session::{Flow, Screen, Session, ShipPicker};
pub use world::{PlayerCount, RoundStatus, SpawnTimer, World};

pub mod app;
pub mod assets;
pub mod config;
pub mod controls;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod session;
pub mod world;
