//! Gameplay rules module
//!
//! All game rules live here. The module is deterministic given the injected
//! RNG seed and a host engine:
//! - One seeded RNG owned by the orchestrator, threaded into every draw
//! - No rendering, input polling or collision detection - those arrive
//!   through the [`Engine`](crate::engine::Engine) trait and the
//!   collision-enter callback
//! - Entity-collection membership is mutated only by the orchestrator

pub mod effects;
pub mod game;
pub mod state;

pub use effects::BrickEffect;
pub use game::{Game, PendingEvent, LOSE_MESSAGE, PLAY_AGAIN_MESSAGE, WIN_MESSAGE};
pub use state::{Ball, Border, Brick, HealthBar, Heart, LivesColor, LivesReadout, Paddle};
