//! Host-engine capability interface
//!
//! The gameplay core never renders, polls the keyboard, or detects
//! collisions itself; it drives a host engine through the narrow [`Engine`]
//! trait, and the host reports collision-enter events back into the core.
//! [`HeadlessEngine`] is the in-crate host used by the binary's demo loop
//! and by the test suite.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

/// Identifier of an entity registered with the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Engine-side render/collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Default,
    Ui,
}

/// Keys the core polls through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Instant-win key
    W,
}

/// Opaque handle to a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderableHandle(pub u32);

/// Opaque handle to a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundHandle(pub u32);

/// Capabilities the gameplay core consumes from the host engine.
///
/// Strategies and entities never talk to a concrete engine type; everything
/// routes through this trait so a recording host can stand in for the real
/// one in tests.
pub trait Engine {
    /// Register an entity on the given layer.
    fn add_entity(&mut self, id: EntityId, layer: Layer);

    /// Remove an entity. Returns `false` if it was not present (already
    /// removed); callers must check the flag before adjusting any counter
    /// that tracks the entity.
    fn remove_entity(&mut self, id: EntityId, layer: Layer) -> bool;

    fn load_image(&mut self, path: &str, transparent: bool) -> RenderableHandle;
    fn load_sound(&mut self, path: &str) -> SoundHandle;
    fn play_sound(&mut self, sound: SoundHandle);

    fn is_key_pressed(&self, key: Key) -> bool;

    fn set_follow_camera(&mut self, target: EntityId, zoom: f32);
    fn clear_camera(&mut self);
    fn is_camera_active(&self) -> bool;

    /// Width and height of the visible play area.
    fn play_area(&self) -> Vec2;

    /// Modal yes/no dialog; blocks until answered.
    fn prompt_yes_no(&mut self, message: &str) -> bool;

    fn close_session(&mut self);
    fn restart_session(&mut self);
}

/// Recording engine with no window behind it.
///
/// Entity membership, camera state, prompts and sounds are tracked so tests
/// can assert on them; prompt answers are scripted through a queue (default
/// answer: no).
#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    play_area: Vec2,
    members: HashSet<(EntityId, Layer)>,
    pressed: HashSet<Key>,
    camera: Option<(EntityId, f32)>,
    prompts: Vec<String>,
    answers: VecDeque<bool>,
    closed: bool,
    restarts: u32,
    sounds_played: u32,
    next_handle: u32,
}

impl HeadlessEngine {
    pub fn new(play_area: Vec2) -> Self {
        Self {
            play_area,
            members: HashSet::new(),
            pressed: HashSet::new(),
            camera: None,
            prompts: Vec::new(),
            answers: VecDeque::new(),
            closed: false,
            restarts: 0,
            sounds_played: 0,
            next_handle: 0,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Script the answer to the next unanswered prompt.
    pub fn queue_answer(&mut self, answer: bool) {
        self.answers.push_back(answer);
    }

    /// Messages shown so far, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn is_registered(&self, id: EntityId, layer: Layer) -> bool {
        self.members.contains(&(id, layer))
    }

    pub fn registered_count(&self, layer: Layer) -> usize {
        self.members.iter().filter(|(_, l)| *l == layer).count()
    }

    pub fn camera_target(&self) -> Option<EntityId> {
        self.camera.map(|(target, _)| target)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn sounds_played(&self) -> u32 {
        self.sounds_played
    }
}

impl Engine for HeadlessEngine {
    fn add_entity(&mut self, id: EntityId, layer: Layer) {
        self.members.insert((id, layer));
    }

    fn remove_entity(&mut self, id: EntityId, layer: Layer) -> bool {
        self.members.remove(&(id, layer))
    }

    fn load_image(&mut self, _path: &str, _transparent: bool) -> RenderableHandle {
        let handle = RenderableHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn load_sound(&mut self, _path: &str) -> SoundHandle {
        let handle = SoundHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn play_sound(&mut self, _sound: SoundHandle) {
        self.sounds_played += 1;
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn set_follow_camera(&mut self, target: EntityId, zoom: f32) {
        self.camera = Some((target, zoom));
    }

    fn clear_camera(&mut self) {
        self.camera = None;
    }

    fn is_camera_active(&self) -> bool {
        self.camera.is_some()
    }

    fn play_area(&self) -> Vec2 {
        self.play_area
    }

    fn prompt_yes_no(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn close_session(&mut self) {
        self.closed = true;
    }

    fn restart_session(&mut self) {
        self.restarts += 1;
    }
}
