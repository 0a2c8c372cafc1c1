//! Bricker - a brick-breaker gameplay core
//!
//! Core modules:
//! - `sim`: Gameplay rules (entities, collision effects, orchestration)
//! - `engine`: Narrow capability interface to the host engine, plus the
//!   headless reference host
//! - `config`: Startup arguments
//!
//! The host engine owns rendering, input polling, collision detection and
//! the window; this crate owns everything that happens as a *consequence*
//! of those - brick effects, lives, pucks, paddles, the camera rules.

pub mod config;
pub mod engine;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use engine::{Engine, EntityId, HeadlessEngine, Key, Layer};
pub use sim::{BrickEffect, Game};

/// Game configuration constants
pub mod consts {
    /// Width of the left/right border walls
    pub const BORDER_WIDTH: f32 = 10.0;
    /// Top border height as a fraction of the window height
    pub const UPPER_BORDER_FRACTION: f32 = 0.1;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 400.0;
    /// The user paddle sits this far above the bottom edge
    pub const PADDLE_BOTTOM_MARGIN: f32 = 30.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_SPEED: f32 = 100.0;
    /// Puck size relative to the main ball
    pub const PUCK_SCALE: f32 = 0.75;

    /// Brick grid layout
    pub const BRICK_HEIGHT: f32 = 15.0;
    pub const ROW_MARGIN: f32 = 3.0;
    pub const BRICK_BORDER_MARGIN: f32 = 5.0;

    /// Hearts and the health bar
    pub const HEART_SIZE: f32 = 15.0;
    pub const FALLING_HEART_SPEED: f32 = 100.0;
    pub const HEALTH_BAR_BOTTOM_MARGIN: f32 = 20.0;

    /// Lives
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 4;

    /// Ball hits a secondary paddle absorbs before it despawns
    pub const SECONDARY_PADDLE_MAX_HITS: u32 = 4;
    /// Main-ball collisions before an active follow camera resets
    pub const CAMERA_RESET_HITS: u32 = 4;
    /// Follow-camera zoom factor
    pub const CAMERA_ZOOM: f32 = 1.2;

    /// Brick grid defaults (overridable from the command line)
    pub const DEFAULT_NUM_ROWS: u32 = 7;
    pub const DEFAULT_BRICKS_PER_ROW: u32 = 8;

    /// Window defaults for the headless host
    pub const DEFAULT_WINDOW_WIDTH: f32 = 700.0;
    pub const DEFAULT_WINDOW_HEIGHT: f32 = 500.0;

    /// Asset paths, resolved by the host engine
    pub const BALL_IMAGE: &str = "assets/ball.png";
    pub const PUCK_IMAGE: &str = "assets/mockBall.png";
    pub const PADDLE_IMAGE: &str = "assets/paddle.png";
    pub const BRICK_IMAGE: &str = "assets/brick.png";
    pub const HEART_IMAGE: &str = "assets/heart.png";
    pub const BACKGROUND_IMAGE: &str = "assets/DARK_BG2_small.jpeg";
    pub const BOUNCE_SOUND: &str = "assets/blop.wav";
}
