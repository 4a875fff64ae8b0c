//! Player-related components.

use bevy::prelude::*;

use crate::core::{
    Animatable, AnimationFrame, AnimationKind, Character, EntityState, EntityTag, PlayerTuning,
};

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Last frame of the run-up before the run cycle starts looping.
const RUN_FRAME_LIMIT: u32 = 5;
/// Frame the crouch animation settles on.
const CROUCH_FRAME_LIMIT: u32 = 3;

/// Horizontal movement request from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
}

/// Movement state machine and animation cursor for the player.
#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub jumping: bool,
    pub running: bool,
    pub crouching: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Direction shots are fired in
    pub facing_right: bool,
    /// Direction the sprite faces
    pub last_direction_left: bool,
    pub jump_velocity: i32,
    initial_jump_velocity: i32,
    gravity: i32,
    running_speed: i32,
    animation: AnimationKind,
    frame: u32,
    run_started: bool,
    run_looping: bool,
    crouch_started: bool,
    crouch_holding: bool,
    /// Shots asked for since the last projectile tick
    pending_shots: u32,
}

impl PlayerController {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            jumping: false,
            running: false,
            crouching: false,
            moving_left: false,
            moving_right: false,
            facing_right: true,
            last_direction_left: false,
            jump_velocity: tuning.jump_velocity,
            initial_jump_velocity: tuning.jump_velocity,
            gravity: tuning.gravity,
            running_speed: tuning.running_speed,
            animation: AnimationKind::Still,
            frame: 0,
            run_started: false,
            run_looping: false,
            crouch_started: false,
            crouch_holding: false,
            pending_shots: 0,
        }
    }

    /// Queue a shot for the next projectile tick.
    pub fn request_shot(&mut self) {
        self.pending_shots += 1;
    }

    /// Hand over every queued shot, leaving the queue empty.
    pub fn take_shots(&mut self) -> u32 {
        std::mem::take(&mut self.pending_shots)
    }

    /// Speed for this tick: running speed while running, base speed otherwise.
    pub fn current_speed(&self, base_speed: i32) -> i32 {
        if self.running {
            self.running_speed
        } else {
            base_speed
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving_left || self.moving_right
    }

    /// Set every intent flag at once.
    pub fn set_intent(&mut self, heading: Option<Heading>, running: bool, crouching: bool) {
        self.stop_moving_left();
        self.stop_moving_right();
        match heading {
            Some(Heading::Left) => self.start_moving_left(),
            Some(Heading::Right) => self.start_moving_right(),
            None => {}
        }

        if running {
            self.start_running();
        } else {
            self.stop_running();
        }

        if crouching {
            self.start_crouching();
        } else {
            self.stop_crouching();
        }
    }

    pub fn start_moving_left(&mut self) {
        self.moving_left = true;
        self.facing_right = false;
    }

    pub fn start_moving_right(&mut self) {
        self.moving_right = true;
        self.facing_right = true;
    }

    pub fn stop_moving_left(&mut self) {
        self.moving_left = false;
    }

    pub fn stop_moving_right(&mut self) {
        self.moving_right = false;
    }

    pub fn start_running(&mut self) {
        self.running = true;
    }

    /// Stop running. The next run starts again from the run-up frames.
    pub fn stop_running(&mut self) {
        self.running = false;
        self.run_started = false;
    }

    pub fn start_crouching(&mut self) {
        self.crouching = true;
    }

    pub fn stop_crouching(&mut self) {
        self.crouching = false;
        self.crouch_started = false;
    }

    /// Start a jump. Returns false (and does nothing) while already airborne
    /// or crouching.
    pub fn jump(&mut self) -> bool {
        if self.jumping || self.crouching {
            return false;
        }
        self.jumping = true;
        self.jump_velocity = self.initial_jump_velocity;
        self.animation = AnimationKind::Jump;
        self.frame = 0;
        true
    }

    /// Shift right by `amount` pixels, as the scroll coupling does before the
    /// map starts scrolling.
    pub fn move_right(&mut self, body: &mut EntityState, amount: i32) {
        body.position.x += amount;
        self.moving_right = true;
        self.moving_left = false;
        self.last_direction_left = false;
    }

    /// Shift left by `amount` pixels, never past the left edge of the map.
    pub fn move_left(&mut self, body: &mut EntityState, amount: i32) {
        body.position.x = (body.position.x - amount).max(0);
        self.moving_left = true;
        self.moving_right = false;
        self.last_direction_left = true;
    }

    /// Advance position and animation by one logic tick.
    pub fn tick(&mut self, body: &mut EntityState, character: &Character) {
        let ground = character.ground_level;
        self.move_horizontally(body, character.speed);

        if self.jumping {
            self.apply_jump(body, ground);
        } else if self.crouching {
            self.animate_crouching();
        } else if self.is_moving() {
            if self.running {
                self.animate_running();
            } else {
                self.advance(AnimationKind::Walk);
            }
        } else {
            self.advance(AnimationKind::Still);
        }

        if !self.jumping && body.position.y < ground {
            body.position.y = (body.position.y + self.gravity).min(ground);
        }
    }

    fn move_horizontally(&mut self, body: &mut EntityState, base_speed: i32) {
        let speed = self.current_speed(base_speed);
        if self.moving_left {
            body.position.x = (body.position.x - speed).max(0);
            self.last_direction_left = true;
        } else if self.moving_right {
            body.position.x += speed;
            self.last_direction_left = false;
        }
    }

    fn apply_jump(&mut self, body: &mut EntityState, ground: i32) {
        body.position.y -= self.jump_velocity;
        self.jump_velocity -= self.gravity;

        if body.position.y >= ground {
            body.position.y = ground;
            self.jumping = false;
            self.jump_velocity = self.initial_jump_velocity;
            self.animation = AnimationKind::Still;
            self.frame = 0;
        } else {
            self.advance(AnimationKind::Jump);
        }
    }

    /// Step a looping animation by one frame.
    fn advance(&mut self, kind: AnimationKind) {
        self.animation = kind;
        self.frame = (self.frame + 1) % kind.frame_count();
    }

    /// Run-up frames play once, then the tail of the strip loops.
    fn animate_running(&mut self) {
        let count = AnimationKind::Run.frame_count();
        self.animation = AnimationKind::Run;

        if !self.run_started {
            self.frame = 0;
            self.run_started = true;
            self.run_looping = false;
        }

        self.frame = (self.frame + 1) % count;
        if self.run_looping {
            if self.frame <= RUN_FRAME_LIMIT {
                self.frame = RUN_FRAME_LIMIT + 1;
            }
        } else if self.frame == RUN_FRAME_LIMIT {
            self.run_looping = true;
        }
    }

    /// Crouch down over a few frames, then hold the last one.
    fn animate_crouching(&mut self) {
        let count = AnimationKind::Crouch.frame_count();
        self.animation = AnimationKind::Crouch;

        if !self.crouch_started {
            self.frame = 0;
            self.crouch_started = true;
            self.crouch_holding = false;
        }

        if self.crouch_holding {
            self.frame = CROUCH_FRAME_LIMIT;
        } else {
            self.frame = (self.frame + 1) % count;
            if self.frame == CROUCH_FRAME_LIMIT {
                self.crouch_holding = true;
            }
        }
    }
}

impl Animatable for PlayerController {
    fn animation(&self) -> AnimationFrame {
        AnimationFrame {
            kind: self.animation,
            facing_right: !self.last_direction_left,
            index: self.frame,
        }
    }
}

/// Everything the simulation needs for a player, without visuals.
pub fn player_bundle(tuning: &PlayerTuning) -> impl Bundle {
    (
        Player,
        Name::new("Player"),
        EntityState::new(
            EntityTag::Player,
            IVec2::new(tuning.spawn.0, tuning.spawn.1),
            IVec2::new(tuning.size.0, tuning.size.1),
        ),
        Character::new(tuning.max_health, tuning.speed, tuning.ground_level),
        PlayerController::new(tuning),
    )
}
