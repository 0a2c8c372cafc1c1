//! Whole-orchestrator scenario tests, driven the way a host engine would
//! drive the core: collision-enter callbacks first, then one update per
//! frame.

use glam::Vec2;

use bricker::config::GameConfig;
use bricker::consts::*;
use bricker::engine::{Engine, EntityId, HeadlessEngine, Key, Layer};
use bricker::sim::{BrickEffect, Game, LOSE_MESSAGE, WIN_MESSAGE};

const DT: f32 = 1.0 / 60.0;

fn new_game(seed: u64) -> Game<HeadlessEngine> {
    let engine = HeadlessEngine::new(Vec2::new(700.0, 500.0));
    Game::new(engine, GameConfig::default(), seed)
}

/// A game whose main ball starts moving downward, so it will exit the play
/// area if nothing intervenes.
fn new_game_with_falling_ball() -> Game<HeadlessEngine> {
    (0u64..)
        .map(new_game)
        .find(|game| game.main_ball().vel.y > 0.0)
        .unwrap()
}

/// Deliver both sides of a ball/brick contact, as the engine would.
fn hit_brick(game: &mut Game<HeadlessEngine>, brick: EntityId) {
    let ball = game.main_ball().id;
    game.on_collision_enter(ball, brick, Vec2::new(0.0, 1.0));
    game.on_collision_enter(brick, ball, Vec2::new(0.0, -1.0));
}

#[test]
fn brick_removal_is_idempotent() {
    let mut game = new_game(11);
    let brick = game.bricks()[0].id;
    let before = game.bricks_remaining();

    assert!(game.remove_object(brick));
    assert!(!game.remove_object(brick));
    assert_eq!(game.bricks_remaining(), before - 1);
}

#[test]
fn duplicate_brick_collision_fires_once() {
    let mut game = new_game(12);
    let brick = game.bricks()[0].id;

    hit_brick(&mut game, brick);
    let after_first = game.bricks_remaining();
    hit_brick(&mut game, brick);

    assert_eq!(after_first, 55);
    assert_eq!(game.bricks_remaining(), 55);
}

#[test]
fn destroying_every_brick_wins_on_that_frame() {
    let mut game = new_game(13);
    let bricks: Vec<EntityId> = game.bricks().iter().map(|b| b.id).collect();
    assert_eq!(bricks.len(), 56);

    for brick in bricks {
        hit_brick(&mut game, brick);
    }
    assert_eq!(game.bricks_remaining(), 0);

    game.update(DT);
    let prompts = game.engine().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with(WIN_MESSAGE));
    // The scripted answer defaults to "no", which ends the session.
    assert!(game.engine().is_closed());
}

#[test]
fn accepted_restart_resets_the_brick_count() {
    let mut game = new_game(14);
    game.engine_mut().queue_answer(true);

    let bricks: Vec<EntityId> = game.bricks().iter().map(|b| b.id).collect();
    for brick in bricks {
        hit_brick(&mut game, brick);
    }
    game.update(DT);

    assert_eq!(game.engine().restarts(), 1);
    assert!(!game.engine().is_closed());
    assert_eq!(game.bricks_remaining(), 56);
}

#[test]
fn win_key_wins_immediately() {
    let mut game = new_game(15);
    game.engine_mut().press(Key::W);
    game.update(DT);

    assert!(game.engine().prompts()[0].starts_with(WIN_MESSAGE));
}

#[test]
fn main_ball_exit_costs_a_life_and_relaunches() {
    let mut game = new_game_with_falling_ball();
    let lost_icon = game.health_bar().heart_id(2).unwrap();
    assert_eq!(game.lives(), 3);

    for _ in 0..400 {
        game.update(DT);
        if game.lives() < 3 {
            break;
        }
    }

    assert_eq!(game.lives(), 2);
    assert_eq!(game.health_bar().icon_count(), 2);
    assert!(!game.engine().is_registered(lost_icon, Layer::Ui));
    // Re-centered with fixed speed and fresh random directions.
    assert_eq!(game.main_ball().pos, Vec2::new(350.0, 250.0));
    assert_eq!(game.main_ball().vel.x.abs(), BALL_SPEED);
    assert_eq!(game.main_ball().vel.y.abs(), BALL_SPEED);
    // No prompt while lives remain.
    assert!(game.engine().prompts().is_empty());
}

#[test]
fn running_out_of_lives_prompts_and_closes() {
    // A relaunched ball that points up never comes back (nothing reflects
    // it without a host), so scan seeds for one whose three relaunch draws
    // all send the ball down. Each game is fully deterministic per seed.
    let game = (0u64..200)
        .find_map(|seed| {
            let mut game = new_game(seed);
            for _ in 0..2_000 {
                game.update(DT);
                if game.engine().is_closed() {
                    return Some(game);
                }
            }
            None
        })
        .expect("some seed loses all three lives unassisted");

    assert_eq!(game.lives(), 0);
    assert_eq!(game.engine().prompts().len(), 1);
    assert!(game.engine().prompts()[0].starts_with(LOSE_MESSAGE));
}

#[test]
fn secondary_paddle_expires_after_fourth_hit() {
    let mut game = new_game(16);
    game.spawn_secondary_paddle();
    let paddle = game.secondary_paddle().unwrap().id;
    let ball = game.main_ball().id;

    for _ in 0..3 {
        game.on_collision_enter(paddle, ball, Vec2::new(0.0, -1.0));
    }
    game.update(DT);
    assert!(game.secondary_paddle().is_some(), "three hits must not expire");

    game.on_collision_enter(paddle, ball, Vec2::new(0.0, -1.0));
    assert_eq!(game.secondary_paddle().unwrap().ball_hits, 4);
    game.update(DT);

    assert!(game.secondary_paddle().is_none());
    assert!(!game.engine().is_registered(paddle, Layer::Default));

    // A fifth contact against the removed paddle is a no-op.
    game.on_collision_enter(paddle, ball, Vec2::new(0.0, -1.0));
    assert!(game.secondary_paddle().is_none());
}

#[test]
fn secondary_paddle_hit_counter_saturates() {
    let mut game = new_game(17);
    game.spawn_secondary_paddle();
    let paddle = game.secondary_paddle().unwrap().id;
    let ball = game.main_ball().id;

    // A same-frame burst cannot push the counter past the threshold.
    for _ in 0..6 {
        game.on_collision_enter(paddle, ball, Vec2::new(0.0, -1.0));
    }
    assert_eq!(game.secondary_paddle().unwrap().ball_hits, 4);
}

#[test]
fn camera_clears_after_four_ball_collisions() {
    let mut game = new_game(18);
    let ball = game.main_ball().id;
    let border = game.borders()[0].id;

    game.apply_effect(BrickEffect::CameraFollow, Vec2::ZERO, ball);
    assert_eq!(game.engine().camera_target(), Some(ball));
    assert_eq!(game.main_ball().collisions, 0);

    for _ in 0..3 {
        game.on_collision_enter(ball, border, Vec2::new(1.0, 0.0));
    }
    game.update(DT);
    assert!(game.engine().is_camera_active(), "three hits must not reset");

    game.on_collision_enter(ball, border, Vec2::new(1.0, 0.0));
    game.update(DT);

    assert!(!game.engine().is_camera_active());
    assert_eq!(game.main_ball().collisions, 0);
}

#[test]
fn caught_heart_adds_a_life_once() {
    let mut game = new_game(19);
    game.spawn_falling_heart(Vec2::new(350.0, 460.0));
    let heart = game.falling_hearts()[0].id;
    let paddle = game.user_paddle().id;

    // The engine can report the same contact twice in one pass.
    game.on_collision_enter(paddle, heart, Vec2::new(0.0, -1.0));
    game.on_collision_enter(paddle, heart, Vec2::new(0.0, -1.0));
    game.update(DT);

    assert!(game.falling_hearts().is_empty());
    assert!(!game.engine().is_registered(heart, Layer::Default));
    assert_eq!(game.lives(), 4);
    assert_eq!(game.health_bar().icon_count(), 4);
}

#[test]
fn heart_caught_at_full_health_is_ignored() {
    let mut game = new_game(20);
    let paddle = game.user_paddle().id;

    // Fill up to the maximum first.
    game.spawn_falling_heart(Vec2::new(350.0, 460.0));
    let first = game.falling_hearts()[0].id;
    game.on_collision_enter(paddle, first, Vec2::new(0.0, -1.0));
    game.update(DT);
    assert_eq!(game.lives(), MAX_LIVES);

    game.spawn_falling_heart(Vec2::new(350.0, 460.0));
    let second = game.falling_hearts()[0].id;
    game.on_collision_enter(paddle, second, Vec2::new(0.0, -1.0));
    game.update(DT);

    // The heart is consumed either way; the life gain is silently dropped.
    assert!(game.falling_hearts().is_empty());
    assert_eq!(game.lives(), MAX_LIVES);
    assert_eq!(game.health_bar().icon_count(), MAX_LIVES as usize);
}

#[test]
fn pucks_and_hearts_below_the_window_are_dropped() {
    let mut game = new_game(21);
    game.spawn_pucks(Vec2::new(350.0, 600.0));
    game.spawn_falling_heart(Vec2::new(350.0, 600.0));
    let puck = game.pucks()[0].id;

    game.update(DT);

    assert!(game.pucks().is_empty());
    assert!(game.falling_hearts().is_empty());
    assert!(!game.engine().is_registered(puck, Layer::Default));
}

#[test]
fn main_ball_is_never_dropped_off_screen() {
    let mut game = new_game_with_falling_ball();
    let ball = game.main_ball().id;

    for _ in 0..400 {
        game.update(DT);
        if game.lives() < 3 {
            break;
        }
    }

    // The exit spent a life but the ball entity survived.
    assert!(game.engine().is_registered(ball, Layer::Default));
}

#[test]
fn held_keys_drive_both_paddles() {
    let mut game = new_game(22);
    game.spawn_secondary_paddle();
    game.engine_mut().press(Key::Left);

    for _ in 0..240 {
        game.update(DT);
    }

    assert_eq!(game.user_paddle().left_edge(), BORDER_WIDTH);
    assert_eq!(game.secondary_paddle().unwrap().left_edge(), BORDER_WIDTH);
}
