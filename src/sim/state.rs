//! Game entities and their local behavior
//!
//! Cross-entity rules (spawning, removal, lives bookkeeping, camera) live in
//! [`game`](super::game); this module holds the data each entity owns and
//! the behavior that touches only that data.

use glam::Vec2;

use crate::consts::*;
use crate::engine::{EntityId, RenderableHandle, SoundHandle};

/// Reflect a velocity about a collision surface normal.
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// A destructible brick. Destroyed on first contact; the engine removal
/// flag guards against duplicate collision delivery.
#[derive(Debug, Clone)]
pub struct Brick {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub image: RenderableHandle,
}

/// Main ball or puck.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: EntityId,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Collisions since the last reset; gates the follow-camera reset for
    /// the main ball.
    pub collisions: u32,
    /// Pucks are dropped once they fall below the play area. The main ball
    /// never is - its exit feeds the loss check instead.
    pub remove_when_below: bool,
    pub image: RenderableHandle,
    pub sound: SoundHandle,
}

impl Ball {
    pub fn new(
        id: EntityId,
        pos: Vec2,
        size: Vec2,
        image: RenderableHandle,
        sound: SoundHandle,
        remove_when_below: bool,
    ) -> Self {
        Self {
            id,
            pos,
            size,
            vel: Vec2::ZERO,
            collisions: 0,
            remove_when_below,
            image,
            sound,
        }
    }

    /// Reflect off a surface and count the contact.
    pub fn bounce(&mut self, normal: Vec2) {
        self.vel = reflect(self.vel, normal);
        self.collisions += 1;
    }

    /// True once the center has left the play area below.
    pub fn below(&self, area: Vec2) -> bool {
        self.pos.y > area.y
    }
}

/// Health-bar icon or falling pickup.
#[derive(Debug, Clone)]
pub struct Heart {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub remove_when_below: bool,
    pub image: RenderableHandle,
}

impl Heart {
    /// Static UI icon for the health bar. Never moves, never collides.
    pub fn icon(id: EntityId, pos: Vec2, size: Vec2, image: RenderableHandle) -> Self {
        Self {
            id,
            pos,
            size,
            vel: Vec2::ZERO,
            remove_when_below: false,
            image,
        }
    }

    /// Falling pickup released by a brick. Collides only with the user
    /// paddle and is dropped below the play area.
    pub fn falling(id: EntityId, pos: Vec2, size: Vec2, image: RenderableHandle) -> Self {
        Self {
            id,
            pos,
            size,
            vel: Vec2::new(0.0, FALLING_HEART_SPEED),
            remove_when_below: true,
            image,
        }
    }

    pub fn below(&self, area: Vec2) -> bool {
        self.pos.y > area.y
    }
}

/// Static play-area wall (left, right or top).
#[derive(Debug, Clone)]
pub struct Border {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

/// User or secondary paddle.
#[derive(Debug, Clone)]
pub struct Paddle {
    pub id: EntityId,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Ball contacts absorbed so far (meaningful for the secondary paddle
    /// only); saturates at the despawn threshold.
    pub ball_hits: u32,
    pub image: RenderableHandle,
}

impl Paddle {
    pub fn new(id: EntityId, center: Vec2, image: RenderableHandle) -> Self {
        Self {
            id,
            pos: center,
            size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            vel: Vec2::ZERO,
            ball_hits: 0,
            image,
        }
    }

    /// Drive horizontally from the held keys for one frame and clamp to the
    /// inner borders. Opposite keys cancel; velocity is zeroed whenever a
    /// border stops the paddle.
    pub fn drive(&mut self, left: bool, right: bool, area: Vec2, dt: f32) {
        let dir = (right as i32 - left as i32) as f32;
        self.vel = Vec2::new(dir * PADDLE_SPEED, 0.0);
        self.pos.x += self.vel.x * dt;

        let half = self.size.x / 2.0;
        if self.pos.x - half < BORDER_WIDTH {
            self.pos.x = BORDER_WIDTH + half;
            self.vel = Vec2::ZERO;
        } else if self.pos.x + half > area.x - BORDER_WIDTH {
            self.pos.x = area.x - BORDER_WIDTH - half;
            self.vel = Vec2::ZERO;
        }
    }

    /// Count a ball contact, saturating at the despawn threshold.
    pub fn count_ball_hit(&mut self) {
        if self.ball_hits < SECONDARY_PADDLE_MAX_HITS {
            self.ball_hits += 1;
        }
    }

    pub fn left_edge(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Readout color by remaining lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivesColor {
    Green,
    Yellow,
    Red,
}

impl LivesColor {
    pub fn for_lives(lives: u32) -> Self {
        match lives {
            n if n >= 3 => LivesColor::Green,
            2 => LivesColor::Yellow,
            _ => LivesColor::Red,
        }
    }
}

/// Numeric lives display.
#[derive(Debug, Clone)]
pub struct LivesReadout {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub text: String,
    pub color: LivesColor,
}

impl LivesReadout {
    fn refresh(&mut self, lives: u32) {
        self.text = lives.to_string();
        self.color = LivesColor::for_lives(lives);
    }
}

/// Heart-icon row plus the numeric readout.
///
/// `cur_lives` is the single source of truth; slot `i` holds an icon iff
/// `i < cur_lives`.
#[derive(Debug, Clone)]
pub struct HealthBar {
    pos: Vec2,
    icon_size: Vec2,
    slots: Vec<Option<Heart>>,
    cur_lives: u32,
    max_lives: u32,
    readout: LivesReadout,
    heart_image: RenderableHandle,
}

impl HealthBar {
    pub fn new(
        pos: Vec2,
        icon_size: Vec2,
        max_lives: u32,
        readout_id: EntityId,
        heart_image: RenderableHandle,
    ) -> Self {
        let readout = LivesReadout {
            id: readout_id,
            pos: pos + Vec2::new(icon_size.x + 5.0, 0.0),
            size: icon_size,
            text: "0".to_string(),
            color: LivesColor::for_lives(0),
        };
        Self {
            pos,
            icon_size,
            slots: vec![None; max_lives as usize],
            cur_lives: 0,
            max_lives,
            readout,
            heart_image,
        }
    }

    /// Add one life. Fails (`false`) at capacity; otherwise places an icon
    /// at the index-derived position and refreshes the readout. Registering
    /// the new icon entity with the engine's UI layer is the caller's job.
    pub fn add_heart(&mut self, id: EntityId) -> bool {
        if self.cur_lives >= self.max_lives {
            return false;
        }
        let index = self.cur_lives as usize;
        let pos = self.icon_pos(index);
        self.slots[index] = Some(Heart::icon(id, pos, self.icon_size, self.heart_image));
        self.cur_lives += 1;
        self.readout.refresh(self.cur_lives);
        true
    }

    /// Drop one life, refresh the readout, and hand back the orphaned icon
    /// so the caller can deregister its entity. No-op at zero.
    pub fn decrease_cur_lives(&mut self) -> Option<Heart> {
        if self.cur_lives == 0 {
            return None;
        }
        self.cur_lives -= 1;
        self.readout.refresh(self.cur_lives);
        self.slots[self.cur_lives as usize].take()
    }

    fn icon_pos(&self, index: usize) -> Vec2 {
        Vec2::new((index as f32 + 2.0) * (self.icon_size.x + 5.0), self.pos.y)
    }

    pub fn cur_lives(&self) -> u32 {
        self.cur_lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn is_full(&self) -> bool {
        self.cur_lives >= self.max_lives
    }

    pub fn icon_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn heart_id(&self, index: usize) -> Option<EntityId> {
        self.slots.get(index)?.as_ref().map(|heart| heart.id)
    }

    pub fn has_icon(&self, id: EntityId) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|heart| heart.id == id)
    }

    pub fn readout(&self) -> &LivesReadout {
        &self.readout
    }
}
