//! Game orchestration
//!
//! [`Game`] owns every entity, the remaining-brick count, the lives, the
//! seeded RNG and the deferred-event queue. Entities and effects request
//! changes through it; it is the only place entity-collection membership is
//! mutated, so a collision callback can never edit a collection the host is
//! iterating.
//!
//! Frame order, driven by the host: collision-enter callbacks first, then
//! one [`Game::update`] pass.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::{self, BrickEffect};
use super::state::{Ball, Border, Brick, HealthBar, Heart, Paddle};
use crate::config::GameConfig;
use crate::consts::*;
use crate::engine::{Engine, EntityId, Key, Layer, RenderableHandle, SoundHandle};

pub const WIN_MESSAGE: &str = "You win!";
pub const LOSE_MESSAGE: &str = "You Lose!";
pub const PLAY_AGAIN_MESSAGE: &str = " Play again?";

/// Intent recorded during a collision pass and applied on the next update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingEvent {
    /// The user paddle touched a falling heart.
    HeartCaught { heart: EntityId },
}

/// What an entity id refers to, for collision routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    MainBall,
    Puck,
    Brick,
    UserPaddle,
    SecondaryPaddle,
    FallingHeart,
    Border,
    HeartIcon,
    Readout,
    Background,
}

struct Assets {
    ball: RenderableHandle,
    puck: RenderableHandle,
    paddle: RenderableHandle,
    brick: RenderableHandle,
    heart: RenderableHandle,
    bounce: SoundHandle,
}

/// The gameplay orchestrator.
pub struct Game<E: Engine> {
    engine: E,
    config: GameConfig,
    rng: Pcg32,
    play_area: Vec2,
    next_id: u32,
    assets: Assets,
    bricks_remaining: u32,
    bricks: Vec<Brick>,
    main_ball: Ball,
    pucks: Vec<Ball>,
    falling_hearts: Vec<Heart>,
    user_paddle: Paddle,
    secondary_paddle: Option<Paddle>,
    borders: Vec<Border>,
    background: EntityId,
    health_bar: HealthBar,
    pending: Vec<PendingEvent>,
}

fn alloc(next_id: &mut u32) -> EntityId {
    let id = EntityId(*next_id);
    *next_id += 1;
    id
}

fn launch_from_center(ball: &mut Ball, area: Vec2, rng: &mut Pcg32) {
    ball.pos = area * 0.5;
    let mut vel = Vec2::splat(BALL_SPEED);
    if rng.random::<bool>() {
        vel.x = -vel.x;
    }
    if rng.random::<bool>() {
        vel.y = -vel.y;
    }
    ball.vel = vel;
}

impl<E: Engine> Game<E> {
    /// Build a fresh level: background, borders, brick grid, main ball,
    /// user paddle and health bar, all registered with the engine.
    pub fn new(mut engine: E, config: GameConfig, seed: u64) -> Self {
        let play_area = engine.play_area();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut next_id = 1u32;

        let assets = Assets {
            ball: engine.load_image(BALL_IMAGE, true),
            puck: engine.load_image(PUCK_IMAGE, true),
            paddle: engine.load_image(PADDLE_IMAGE, false),
            brick: engine.load_image(BRICK_IMAGE, false),
            heart: engine.load_image(HEART_IMAGE, true),
            bounce: engine.load_sound(BOUNCE_SOUND),
        };
        let _background_image = engine.load_image(BACKGROUND_IMAGE, false);

        let background = alloc(&mut next_id);
        engine.add_entity(background, Layer::Background);

        let mut main_ball = Ball::new(
            alloc(&mut next_id),
            Vec2::ZERO,
            Vec2::splat(BALL_SIZE),
            assets.ball,
            assets.bounce,
            false,
        );
        launch_from_center(&mut main_ball, play_area, &mut rng);
        engine.add_entity(main_ball.id, Layer::Default);

        let user_paddle = Paddle::new(
            alloc(&mut next_id),
            Vec2::new(play_area.x / 2.0, play_area.y - PADDLE_BOTTOM_MARGIN),
            assets.paddle,
        );
        engine.add_entity(user_paddle.id, Layer::Default);

        let top_height = play_area.y * UPPER_BORDER_FRACTION;
        let borders = vec![
            Border {
                id: alloc(&mut next_id),
                pos: Vec2::new(BORDER_WIDTH / 2.0, play_area.y / 2.0),
                size: Vec2::new(BORDER_WIDTH, play_area.y),
            },
            Border {
                id: alloc(&mut next_id),
                pos: Vec2::new(play_area.x - BORDER_WIDTH / 2.0, play_area.y / 2.0),
                size: Vec2::new(BORDER_WIDTH, play_area.y),
            },
            Border {
                id: alloc(&mut next_id),
                pos: Vec2::new(play_area.x / 2.0, top_height / 2.0),
                size: Vec2::new(play_area.x, top_height),
            },
        ];
        for border in &borders {
            engine.add_entity(border.id, Layer::Default);
        }

        let bricks = Self::build_brick_grid(&mut engine, &config, play_area, &mut next_id, &assets);
        let bricks_remaining = bricks.len() as u32;

        let readout_id = alloc(&mut next_id);
        let mut health_bar = HealthBar::new(
            Vec2::new(BORDER_WIDTH, play_area.y - HEALTH_BAR_BOTTOM_MARGIN),
            Vec2::splat(HEART_SIZE),
            MAX_LIVES,
            readout_id,
            assets.heart,
        );
        engine.add_entity(readout_id, Layer::Ui);
        for _ in 0..STARTING_LIVES {
            let id = alloc(&mut next_id);
            if health_bar.add_heart(id) {
                engine.add_entity(id, Layer::Ui);
            }
        }

        log::info!(
            "level ready: {} bricks, {} lives",
            bricks_remaining,
            health_bar.cur_lives()
        );

        Self {
            engine,
            config,
            rng,
            play_area,
            next_id,
            assets,
            bricks_remaining,
            bricks,
            main_ball,
            pucks: Vec::new(),
            falling_hearts: Vec::new(),
            user_paddle,
            secondary_paddle: None,
            borders,
            background,
            health_bar,
            pending: Vec::new(),
        }
    }

    /// Lay the brick rows out between the borders, with a 10% gap between
    /// neighboring bricks.
    fn build_brick_grid(
        engine: &mut E,
        config: &GameConfig,
        play_area: Vec2,
        next_id: &mut u32,
        assets: &Assets,
    ) -> Vec<Brick> {
        let usable = play_area.x - 2.0 * (BORDER_WIDTH + BRICK_BORDER_MARGIN);
        let mut brick_len = usable / config.bricks_per_row as f32;
        let gap = brick_len * 0.1;
        brick_len -= gap;

        let mut bricks = Vec::with_capacity(config.total_bricks() as usize);
        for row in 1..=config.num_rows {
            let y = row as f32 * (BRICK_HEIGHT + ROW_MARGIN);
            let mut x = BORDER_WIDTH + BRICK_BORDER_MARGIN;
            for _ in 0..config.bricks_per_row {
                let brick = Brick {
                    id: alloc(next_id),
                    pos: Vec2::new(x + brick_len / 2.0, y + BRICK_HEIGHT / 2.0),
                    size: Vec2::new(brick_len, BRICK_HEIGHT),
                    image: assets.brick,
                };
                engine.add_entity(brick.id, Layer::Default);
                bricks.push(brick);
                x += brick_len + gap;
            }
        }
        bricks
    }

    fn alloc_id(&mut self) -> EntityId {
        alloc(&mut self.next_id)
    }

    fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if id == self.main_ball.id {
            Some(EntityKind::MainBall)
        } else if self.pucks.iter().any(|b| b.id == id) {
            Some(EntityKind::Puck)
        } else if self.bricks.iter().any(|b| b.id == id) {
            Some(EntityKind::Brick)
        } else if id == self.user_paddle.id {
            Some(EntityKind::UserPaddle)
        } else if self.secondary_paddle.as_ref().is_some_and(|p| p.id == id) {
            Some(EntityKind::SecondaryPaddle)
        } else if self.falling_hearts.iter().any(|h| h.id == id) {
            Some(EntityKind::FallingHeart)
        } else if self.borders.iter().any(|b| b.id == id) {
            Some(EntityKind::Border)
        } else if self.health_bar.has_icon(id) {
            Some(EntityKind::HeartIcon)
        } else if id == self.health_bar.readout().id {
            Some(EntityKind::Readout)
        } else if id == self.background {
            Some(EntityKind::Background)
        } else {
            None
        }
    }

    /// Collision filter the host consults before reporting a contact:
    /// falling hearts collide only with the user paddle, and UI/background
    /// entities never collide.
    pub fn should_collide(&self, a: EntityId, b: EntityId) -> bool {
        let (Some(kind_a), Some(kind_b)) = (self.kind_of(a), self.kind_of(b)) else {
            return false;
        };
        let inert = |kind: EntityKind| {
            matches!(
                kind,
                EntityKind::HeartIcon | EntityKind::Readout | EntityKind::Background
            )
        };
        if inert(kind_a) || inert(kind_b) {
            return false;
        }
        if kind_a == EntityKind::FallingHeart {
            return kind_b == EntityKind::UserPaddle;
        }
        if kind_b == EntityKind::FallingHeart {
            return kind_a == EntityKind::UserPaddle;
        }
        true
    }

    /// Engine callback: `this` started colliding with `other`. `normal` is
    /// the collision surface normal on `this`'s side. Called once per
    /// involved entity, before the frame's `update`.
    pub fn on_collision_enter(&mut self, this: EntityId, other: EntityId, normal: Vec2) {
        match self.kind_of(this) {
            Some(EntityKind::MainBall | EntityKind::Puck) => self.ball_collision(this, normal),
            Some(EntityKind::Brick) => self.brick_collision(this, other),
            Some(EntityKind::UserPaddle) => self.user_paddle_collision(other),
            Some(EntityKind::SecondaryPaddle) => self.secondary_paddle_collision(other),
            _ => {}
        }
    }

    fn ball_collision(&mut self, id: EntityId, normal: Vec2) {
        let sound = if self.main_ball.id == id {
            self.main_ball.bounce(normal);
            Some(self.main_ball.sound)
        } else if let Some(puck) = self.pucks.iter_mut().find(|p| p.id == id) {
            puck.bounce(normal);
            Some(puck.sound)
        } else {
            None
        };
        if let Some(sound) = sound {
            self.engine.play_sound(sound);
        }
    }

    fn brick_collision(&mut self, brick: EntityId, other: EntityId) {
        let Some(origin) = self.bricks.iter().find(|b| b.id == brick).map(|b| b.pos) else {
            return;
        };
        // Duplicate delivery: the engine already dropped the brick.
        if !self.remove_object(brick) {
            return;
        }
        if let Some(effect) = effects::roll(&mut self.rng) {
            log::debug!("brick effect: {effect:?}");
            self.apply_effect(effect, origin, other);
        }
    }

    fn user_paddle_collision(&mut self, other: EntityId) {
        if self.kind_of(other) == Some(EntityKind::FallingHeart) {
            self.pending.push(PendingEvent::HeartCaught { heart: other });
        }
    }

    fn secondary_paddle_collision(&mut self, other: EntityId) {
        if !matches!(
            self.kind_of(other),
            Some(EntityKind::MainBall | EntityKind::Puck)
        ) {
            return;
        }
        if let Some(paddle) = self.secondary_paddle.as_mut() {
            paddle.count_ball_hit();
        }
    }

    /// Apply one rolled effect. `origin` is the destroyed brick's center,
    /// `other` the object that hit it.
    pub fn apply_effect(&mut self, effect: BrickEffect, origin: Vec2, other: EntityId) {
        match effect {
            BrickEffect::FallingHeart => self.spawn_falling_heart(origin),
            BrickEffect::ExtraPucks => self.spawn_pucks(origin),
            BrickEffect::CameraFollow => self.follow_main_ball(other),
            BrickEffect::SecondaryPaddle => self.spawn_secondary_paddle(),
            BrickEffect::DoubleBehavior => {
                for sub in effects::expand_double(&mut self.rng) {
                    self.apply_effect(sub, origin, other);
                }
            }
        }
    }

    /// Spawn the two extra pucks a brick can release, launched at random
    /// angles over the downward half-circle.
    pub fn spawn_pucks(&mut self, origin: Vec2) {
        for _ in 0..2 {
            let id = self.alloc_id();
            let mut puck = Ball::new(
                id,
                origin,
                Vec2::splat(BALL_SIZE * PUCK_SCALE),
                self.assets.puck,
                self.assets.bounce,
                true,
            );
            let angle = self.rng.random_range(0.0..std::f32::consts::PI);
            puck.vel = Vec2::new(angle.cos(), angle.sin()) * BALL_SPEED;
            self.engine.add_entity(id, Layer::Default);
            self.pucks.push(puck);
        }
    }

    /// Spawn a heart that falls straight down from `origin`.
    pub fn spawn_falling_heart(&mut self, origin: Vec2) {
        let id = self.alloc_id();
        let heart = Heart::falling(id, origin, Vec2::splat(HEART_SIZE), self.assets.heart);
        self.engine.add_entity(id, Layer::Default);
        self.falling_hearts.push(heart);
    }

    /// Engage the follow camera on the main ball and zero its collision
    /// counter. No-op for pucks or while a camera is already active.
    pub fn follow_main_ball(&mut self, target: EntityId) {
        if target != self.main_ball.id || self.engine.is_camera_active() {
            return;
        }
        self.engine.set_follow_camera(self.main_ball.id, CAMERA_ZOOM);
        self.main_ball.collisions = 0;
        log::debug!("camera following main ball");
    }

    /// Spawn the secondary paddle at the window center. At most one exists
    /// at a time; re-triggering while present is a no-op.
    pub fn spawn_secondary_paddle(&mut self) {
        if self.secondary_paddle.is_some() {
            return;
        }
        let id = self.alloc_id();
        let paddle = Paddle::new(id, self.play_area * 0.5, self.assets.paddle);
        self.engine.add_entity(id, Layer::Default);
        self.secondary_paddle = Some(paddle);
        log::debug!("secondary paddle spawned");
    }

    /// Remove an entity, routing to the right layer and keeping the brick
    /// count in sync. Returns `false` if the engine no longer knows the
    /// entity, in which case nothing is touched.
    pub fn remove_object(&mut self, id: EntityId) -> bool {
        let layer = match self.kind_of(id) {
            Some(EntityKind::HeartIcon | EntityKind::Readout) => Layer::Ui,
            Some(EntityKind::Background) => Layer::Background,
            _ => Layer::Default,
        };
        if !self.engine.remove_entity(id, layer) {
            return false;
        }
        if let Some(i) = self.bricks.iter().position(|b| b.id == id) {
            self.bricks.remove(i);
            self.bricks_remaining = self.bricks_remaining.saturating_sub(1);
        } else if let Some(i) = self.pucks.iter().position(|b| b.id == id) {
            self.pucks.remove(i);
        } else if let Some(i) = self.falling_hearts.iter().position(|h| h.id == id) {
            self.falling_hearts.remove(i);
        }
        true
    }

    /// Advance one frame: entity motion and the off-screen sweep, then the
    /// ordered rule pass - end check, secondary-paddle expiry, heart catch,
    /// camera reset.
    pub fn update(&mut self, dt: f32) {
        self.move_entities(dt);
        self.sweep_off_screen();
        self.check_game_end();
        self.expire_secondary_paddle();
        self.drain_pending();
        self.reset_camera_when_settled();
    }

    fn move_entities(&mut self, dt: f32) {
        let left = self.engine.is_key_pressed(Key::Left);
        let right = self.engine.is_key_pressed(Key::Right);
        self.user_paddle.drive(left, right, self.play_area, dt);
        if let Some(paddle) = self.secondary_paddle.as_mut() {
            paddle.drive(left, right, self.play_area, dt);
        }

        self.main_ball.pos += self.main_ball.vel * dt;
        for puck in &mut self.pucks {
            puck.pos += puck.vel * dt;
        }
        for heart in &mut self.falling_hearts {
            heart.pos += heart.vel * dt;
        }
    }

    fn sweep_off_screen(&mut self) {
        let area = self.play_area;
        let mut gone: Vec<EntityId> = self
            .pucks
            .iter()
            .filter(|p| p.remove_when_below && p.below(area))
            .map(|p| p.id)
            .collect();
        gone.extend(
            self.falling_hearts
                .iter()
                .filter(|h| h.remove_when_below && h.below(area))
                .map(|h| h.id),
        );
        for id in gone {
            self.remove_object(id);
        }
    }

    fn check_game_end(&mut self) {
        let won = self.bricks_remaining == 0 || self.engine.is_key_pressed(Key::W);
        if self.main_ball.below(self.play_area) {
            self.lose_life();
        }
        if self.health_bar.cur_lives() == 0 || won {
            let message = if self.health_bar.cur_lives() == 0 {
                LOSE_MESSAGE
            } else {
                WIN_MESSAGE
            };
            log::info!("game over: {message}");
            let prompt = format!("{message}{PLAY_AGAIN_MESSAGE}");
            if self.engine.prompt_yes_no(&prompt) {
                self.reset();
            } else {
                self.engine.close_session();
            }
        }
    }

    /// Main ball left the play area: spend a life, drop the matching icon
    /// and relaunch from the center with fresh random directions.
    fn lose_life(&mut self) {
        if self.health_bar.cur_lives() == 0 {
            return;
        }
        if let Some(icon) = self.health_bar.decrease_cur_lives() {
            self.engine.remove_entity(icon.id, Layer::Ui);
        }
        log::info!("life lost, {} remaining", self.health_bar.cur_lives());
        launch_from_center(&mut self.main_ball, self.play_area, &mut self.rng);
    }

    fn expire_secondary_paddle(&mut self) {
        let expired = match &self.secondary_paddle {
            Some(paddle) if paddle.ball_hits >= SECONDARY_PADDLE_MAX_HITS => Some(paddle.id),
            _ => None,
        };
        if let Some(id) = expired {
            self.secondary_paddle = None;
            self.remove_object(id);
            log::debug!("secondary paddle expired");
        }
    }

    /// Drain the intents recorded during the collision pass. A heart
    /// reported twice is consumed once: the engine removal flag gates the
    /// life gain.
    fn drain_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for event in pending {
            match event {
                PendingEvent::HeartCaught { heart } => {
                    if !self.remove_object(heart) {
                        continue;
                    }
                    // Capacity-exceeded is silently ignored.
                    if self.health_bar.is_full() {
                        continue;
                    }
                    let id = self.alloc_id();
                    if self.health_bar.add_heart(id) {
                        self.engine.add_entity(id, Layer::Ui);
                        log::info!("heart caught, {} lives", self.health_bar.cur_lives());
                    }
                }
            }
        }
    }

    fn reset_camera_when_settled(&mut self) {
        if self.engine.is_camera_active() && self.main_ball.collisions >= CAMERA_RESET_HITS {
            self.engine.clear_camera();
            self.main_ball.collisions = 0;
            log::debug!("camera reset");
        }
    }

    /// Restore the brick count and ask the host to restart the session.
    /// The host rebuilds the `Game` after a restart.
    fn reset(&mut self) {
        self.bricks_remaining = self.config.total_bricks();
        self.engine.restart_session();
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn bricks_remaining(&self) -> u32 {
        self.bricks_remaining
    }

    pub fn lives(&self) -> u32 {
        self.health_bar.cur_lives()
    }

    pub fn health_bar(&self) -> &HealthBar {
        &self.health_bar
    }

    pub fn main_ball(&self) -> &Ball {
        &self.main_ball
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn pucks(&self) -> &[Ball] {
        &self.pucks
    }

    pub fn falling_hearts(&self) -> &[Heart] {
        &self.falling_hearts
    }

    pub fn user_paddle(&self) -> &Paddle {
        &self.user_paddle
    }

    pub fn secondary_paddle(&self) -> Option<&Paddle> {
        self.secondary_paddle.as_ref()
    }

    pub fn borders(&self) -> &[Border] {
        &self.borders
    }
}
