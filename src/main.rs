//! Bricker entry point
//!
//! Runs the gameplay core headless against the in-crate host engine: the
//! host detects contacts with a naive AABB sweep and feeds them back as
//! collision-enter events, an autopilot tracks the ball, and the process
//! ends at the first declined restart prompt (the scripted answer) or at
//! the frame cap.

use std::collections::HashSet;
use std::process;

use glam::Vec2;
use rand::Rng;

use bricker::config::GameConfig;
use bricker::consts::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use bricker::engine::{EntityId, HeadlessEngine, Key};
use bricker::sim::Game;

const FRAME_DT: f32 = 1.0 / 60.0;
/// Hard stop so the headless demo always terminates.
const MAX_FRAMES: u32 = 20_000;

fn main() {
    env_logger::init();

    let config = match GameConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bricker: {err}");
            process::exit(2);
        }
    };

    let mut seed_rng = rand::rng();
    let mut game = new_game(&mut seed_rng, config);
    // Accept the first restart prompt so the demo plays two rounds; later
    // prompts fall back to "no" and end the session.
    game.engine_mut().queue_answer(true);
    let mut touching: HashSet<(EntityId, EntityId)> = HashSet::new();

    for frame in 0..MAX_FRAMES {
        drive_autopilot(&mut game);
        deliver_collisions(&mut game, &mut touching);
        game.update(FRAME_DT);

        if game.engine().is_closed() {
            log::info!("session closed after {frame} frames");
            return;
        }
        if game.engine().restarts() > 0 {
            log::info!("restarting level");
            game = new_game(&mut seed_rng, config);
            touching.clear();
        }
    }
    log::info!("frame cap reached, exiting");
}

fn new_game(seed_rng: &mut impl Rng, config: GameConfig) -> Game<HeadlessEngine> {
    let engine = HeadlessEngine::new(Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
    Game::new(engine, config, seed_rng.random())
}

/// Chase the main ball with the user paddle.
fn drive_autopilot(game: &mut Game<HeadlessEngine>) {
    let target = game.main_ball().pos.x;
    let paddle = game.user_paddle().pos.x;
    let engine = game.engine_mut();
    engine.release(Key::Left);
    engine.release(Key::Right);
    if target < paddle - 4.0 {
        engine.press(Key::Left);
    } else if target > paddle + 4.0 {
        engine.press(Key::Right);
    }
}

#[derive(Clone, Copy)]
struct Aabb {
    id: EntityId,
    pos: Vec2,
    size: Vec2,
}

/// Overlap test between two centered boxes. Returns the collision normal on
/// `a`'s side, along the axis of least penetration.
fn overlap(a: &Aabb, b: &Aabb) -> Option<Vec2> {
    let delta = b.pos - a.pos;
    let extent = (a.size + b.size) * 0.5;
    let ox = extent.x - delta.x.abs();
    let oy = extent.y - delta.y.abs();
    if ox <= 0.0 || oy <= 0.0 {
        return None;
    }
    Some(if ox < oy {
        Vec2::new(if delta.x > 0.0 { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if delta.y > 0.0 { -1.0 } else { 1.0 })
    })
}

/// Host-side collision pass: report *newly* overlapping pairs to the core,
/// each side once, mirroring an engine's collision-enter callbacks.
fn deliver_collisions(game: &mut Game<HeadlessEngine>, touching: &mut HashSet<(EntityId, EntityId)>) {
    let mut movers: Vec<Aabb> = Vec::new();
    let ball = game.main_ball();
    movers.push(Aabb {
        id: ball.id,
        pos: ball.pos,
        size: ball.size,
    });
    movers.extend(game.pucks().iter().map(|p| Aabb {
        id: p.id,
        pos: p.pos,
        size: p.size,
    }));
    movers.extend(game.falling_hearts().iter().map(|h| Aabb {
        id: h.id,
        pos: h.pos,
        size: h.size,
    }));

    let mut obstacles: Vec<Aabb> = Vec::new();
    obstacles.extend(game.bricks().iter().map(|b| Aabb {
        id: b.id,
        pos: b.pos,
        size: b.size,
    }));
    obstacles.extend(game.borders().iter().map(|b| Aabb {
        id: b.id,
        pos: b.pos,
        size: b.size,
    }));
    let paddle = game.user_paddle();
    obstacles.push(Aabb {
        id: paddle.id,
        pos: paddle.pos,
        size: paddle.size,
    });
    if let Some(paddle) = game.secondary_paddle() {
        obstacles.push(Aabb {
            id: paddle.id,
            pos: paddle.pos,
            size: paddle.size,
        });
    }

    let mut current: HashSet<(EntityId, EntityId)> = HashSet::new();
    let mut contacts: Vec<(EntityId, EntityId, Vec2)> = Vec::new();
    for mover in &movers {
        for obstacle in &obstacles {
            if !game.should_collide(mover.id, obstacle.id) {
                continue;
            }
            if let Some(normal) = overlap(mover, obstacle) {
                current.insert((mover.id, obstacle.id));
                if !touching.contains(&(mover.id, obstacle.id)) {
                    contacts.push((mover.id, obstacle.id, normal));
                }
            }
        }
    }
    *touching = current;

    for (mover, obstacle, normal) in contacts {
        game.on_collision_enter(mover, obstacle, normal);
        game.on_collision_enter(obstacle, mover, -normal);
    }
}
