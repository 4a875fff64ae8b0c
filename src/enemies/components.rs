//! Enemy-related components.

use bevy::prelude::*;

use crate::combat::Projectile;
use crate::core::{Animatable, AnimationFrame, AnimationKind, Character, EntityState, EntityTag, Positioned};

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// AI state machine for enemy behavior.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiState {
    /// Walking towards the right patrol limit.
    #[default]
    PatrollingRight,
    /// Standing at the right limit before turning back.
    Waiting,
    /// Walking towards the left patrol limit.
    PatrollingLeft,
    /// Closing in on the player while the attack cools down.
    Chasing,
    /// Locked in the attack animation.
    Attack,
}

/// Enemy tuning loaded from RON data files. Durations are in logic ticks.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct EnemyStats {
    pub attack_range: i32,
    pub wait_ticks: u32,
    pub cooldown_ticks: u32,
    /// Added to base speed while chasing
    pub chase_bonus: i32,
    /// Patrol extends this far left of the spawn point
    pub patrol_back: i32,
    /// Patrol extends this far right of the spawn point
    pub patrol_ahead: i32,
    pub walk_frames: u32,
    /// Walk animation wraps back to this frame
    pub walk_loop_start: u32,
    pub attack_frames: u32,
    pub damage: i32,
    /// Pixels per logic tick
    pub bullet_speed: f32,
    pub bullet_size: IVec2,
    /// Bullets leave this far into the sprite
    pub muzzle_x: i32,
    /// Extra gap behind the muzzle when firing left
    pub muzzle_gap: i32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            attack_range: 500,
            wait_ticks: 40,
            cooldown_ticks: 100,
            chase_bonus: 10,
            patrol_back: 100,
            patrol_ahead: 200,
            walk_frames: AnimationKind::Patrol.frame_count(),
            walk_loop_start: 4,
            attack_frames: AnimationKind::Attack.frame_count(),
            damage: 17,
            bullet_speed: 50.0,
            bullet_size: IVec2::new(23, 11),
            muzzle_x: 40,
            muzzle_gap: 10,
        }
    }
}

/// Per-enemy AI state: patrol bounds, timers and animation progress.
#[derive(Component, Clone, Debug)]
pub struct EnemyBrain {
    pub state: AiState,
    pub frame: u32,
    pub moving_right: bool,
    pub left_limit: i32,
    pub right_limit: i32,
    pub wait_remaining: u32,
    pub cooldown_remaining: u32,
    /// Direction of the target when the current attack started
    aim_right: bool,
    /// The current attack has already fired its bullet
    fired: bool,
}

impl EnemyBrain {
    pub fn new(spawn_x: i32, stats: &EnemyStats) -> Self {
        Self {
            state: AiState::PatrollingRight,
            frame: 0,
            moving_right: true,
            left_limit: spawn_x - stats.patrol_back,
            right_limit: spawn_x + stats.patrol_ahead,
            wait_remaining: 0,
            cooldown_remaining: 0,
            aim_right: true,
            fired: false,
        }
    }

    pub fn cooldown_active(&self) -> bool {
        self.cooldown_remaining > 0
    }

    fn enter(&mut self, state: AiState) {
        if self.state != state {
            self.state = state;
            self.frame = 0;
        }
    }

    /// Count down the attack cooldown. Expiry releases the attack lock.
    pub fn tick_timers(&mut self, character: &mut Character) {
        if self.cooldown_remaining == 0 {
            return;
        }
        self.cooldown_remaining -= 1;
        if self.cooldown_remaining == 0 {
            character.attacking = false;
            self.fired = false;
        }
    }

    /// Pick this tick's behaviour and move.
    ///
    /// `target_x` is `None` when there is no live player, which counts as out
    /// of range.
    pub fn think(
        &mut self,
        body: &mut EntityState,
        character: &mut Character,
        stats: &EnemyStats,
        target_x: Option<i32>,
    ) {
        if self.state == AiState::Attack {
            return;
        }

        let in_range = target_x
            .map(|x| (x - body.position.x).abs() <= stats.attack_range)
            .unwrap_or(false);

        match target_x {
            Some(x) if in_range && !self.cooldown_active() && !character.attacking => {
                self.enter(AiState::Attack);
                self.aim_right = x > body.position.x;
                self.cooldown_remaining = stats.cooldown_ticks;
                self.fired = false;
                character.attacking = true;
            }
            Some(x) if in_range => {
                if !character.attacking {
                    self.chase(body, character.speed + stats.chase_bonus, x);
                }
            }
            _ => {
                character.attacking = false;
                self.cooldown_remaining = 0;
                self.patrol(body, character.speed, stats);
            }
        }
    }

    fn chase(&mut self, body: &mut EntityState, speed: i32, target_x: i32) {
        self.enter(AiState::Chasing);
        self.moving_right = target_x > body.position.x;
        body.position.x += if self.moving_right { speed } else { -speed };
    }

    fn patrol(&mut self, body: &mut EntityState, speed: i32, stats: &EnemyStats) {
        if self.state == AiState::Waiting {
            self.wait_remaining = self.wait_remaining.saturating_sub(1);
            if self.wait_remaining == 0 {
                self.enter(AiState::PatrollingLeft);
            }
            return;
        }

        if self.moving_right {
            self.enter(AiState::PatrollingRight);
            body.position.x += speed;
            if body.position.x >= self.right_limit {
                self.enter(AiState::Waiting);
                self.wait_remaining = stats.wait_ticks;
                self.moving_right = false;
            }
        } else {
            self.enter(AiState::PatrollingLeft);
            body.position.x -= speed;
            if body.position.x <= self.left_limit {
                self.enter(AiState::PatrollingRight);
                self.moving_right = true;
            }
        }
    }

    /// Step the animation. Returns true on the attack frame that fires.
    pub fn animate(&mut self, character: &mut Character, stats: &EnemyStats) -> bool {
        match self.state {
            AiState::Waiting => false,
            AiState::Attack => {
                self.frame += 1;
                let fire = self.frame == stats.attack_frames / 2 && !self.fired;
                if fire {
                    self.fired = true;
                }
                if self.frame >= stats.attack_frames {
                    self.enter(AiState::Chasing);
                    character.attacking = false;
                }
                fire
            }
            _ => {
                self.frame += 1;
                if self.frame >= stats.walk_frames {
                    self.frame = stats.walk_loop_start;
                }
                false
            }
        }
    }
}

impl Animatable for EnemyBrain {
    fn animation(&self) -> AnimationFrame {
        let (kind, facing_right) = match self.state {
            AiState::Attack => (AnimationKind::Attack, self.aim_right),
            _ => (AnimationKind::Patrol, self.moving_right),
        };
        AnimationFrame {
            kind,
            facing_right,
            index: self.frame,
        }
    }
}

/// An enemy's single bullet slot, reused for every shot.
#[derive(Component, Clone, Debug)]
pub struct EnemyGun {
    pub slot: Projectile,
}

impl EnemyGun {
    pub fn new(stats: &EnemyStats) -> Self {
        Self {
            slot: Projectile::idle(EntityTag::EnemyShot, stats.bullet_size),
        }
    }

    pub fn in_flight(&self) -> bool {
        self.slot.body.active
    }

    /// Place the bullet at the muzzle, aimed at `target_x`.
    ///
    /// A bullet still in flight is recalled and fired again.
    pub fn fire(&mut self, shooter: &EntityState, target_x: i32, stats: &EnemyStats) {
        let shooting_right = target_x > shooter.position.x;
        let size = stats.bullet_size;
        let muzzle_x = shooter.position.x + stats.muzzle_x;
        let x = if shooting_right {
            muzzle_x
        } else {
            muzzle_x - size.x - stats.muzzle_gap
        };
        let y = shooter.position.y + shooter.size.y / 3 - size.y / 2;

        self.slot = Projectile::new(
            EntityTag::EnemyShot,
            IVec2::new(x, y).as_vec2(),
            size,
            shooting_right,
            stats.bullet_speed,
            stats.damage,
        );
    }

    /// Advance the bullet. Returns true when it hit `target`.
    ///
    /// The bullet is retired when it leaves `[0, map_width]` or hits.
    pub fn update<P: Positioned>(&mut self, map_width: i32, target: Option<&P>) -> bool {
        if !self.in_flight() {
            return false;
        }
        self.slot.advance();

        let x = self.slot.position().x;
        if x < 0 || x > map_width {
            self.slot.retire();
            return false;
        }

        if target.is_some_and(|target| self.slot.overlaps(target)) {
            self.slot.retire();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: i32) -> (EntityState, Character, EnemyStats, EnemyBrain) {
        let stats = EnemyStats::default();
        (
            EntityState::new(EntityTag::Enemy, IVec2::new(x, 445), IVec2::new(80, 103)),
            Character::new(100, 5, 445),
            stats.clone(),
            EnemyBrain::new(x, &stats),
        )
    }

    #[test]
    fn patrol_waits_at_right_limit_then_turns_back() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);
        assert_eq!((brain.left_limit, brain.right_limit), (900, 1200));

        for _ in 0..39 {
            brain.think(&mut body, &mut character, &stats, None);
        }
        assert_eq!(brain.state, AiState::PatrollingRight);
        assert_eq!(body.position.x, 1195);

        brain.think(&mut body, &mut character, &stats, None);
        assert_eq!(body.position.x, 1200);
        assert_eq!(brain.state, AiState::Waiting);

        for _ in 0..39 {
            brain.think(&mut body, &mut character, &stats, None);
        }
        assert_eq!(brain.state, AiState::Waiting);
        assert_eq!(body.position.x, 1200);

        brain.think(&mut body, &mut character, &stats, None);
        assert_eq!(brain.state, AiState::PatrollingLeft);

        brain.think(&mut body, &mut character, &stats, None);
        assert_eq!(body.position.x, 1195);
    }

    #[test]
    fn patrol_turns_right_at_left_limit() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);
        brain.moving_right = false;
        body.position.x = 905;

        brain.think(&mut body, &mut character, &stats, None);

        assert_eq!(body.position.x, 900);
        assert_eq!(brain.state, AiState::PatrollingRight);
        assert!(brain.moving_right);
    }

    #[test]
    fn target_in_range_starts_an_attack() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);

        brain.think(&mut body, &mut character, &stats, Some(700));

        assert_eq!(brain.state, AiState::Attack);
        assert!(character.attacking);
        assert_eq!(brain.cooldown_remaining, 100);
        assert!(!brain.animation().facing_right);
        assert_eq!(body.position.x, 1000);
    }

    #[test]
    fn attack_fires_once_at_midpoint_then_chases() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);
        brain.think(&mut body, &mut character, &stats, Some(1300));

        let fired: Vec<bool> = (0..10)
            .map(|_| brain.animate(&mut character, &stats))
            .collect();

        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[4]);
        assert_eq!(brain.state, AiState::Chasing);
        assert_eq!(brain.frame, 0);
        assert!(!character.attacking);
    }

    #[test]
    fn cooldown_makes_the_enemy_chase() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);
        brain.think(&mut body, &mut character, &stats, Some(1300));
        for _ in 0..10 {
            brain.animate(&mut character, &stats);
        }

        brain.think(&mut body, &mut character, &stats, Some(1300));

        assert_eq!(brain.state, AiState::Chasing);
        assert_eq!(body.position.x, 1015);
        assert!(brain.moving_right);
    }

    #[test]
    fn attack_resumes_after_cooldown() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);
        brain.think(&mut body, &mut character, &stats, Some(1300));
        for _ in 0..10 {
            brain.animate(&mut character, &stats);
        }
        for _ in 0..100 {
            brain.tick_timers(&mut character);
        }
        assert!(!brain.cooldown_active());

        brain.think(&mut body, &mut character, &stats, Some(1300));
        assert_eq!(brain.state, AiState::Attack);
    }

    #[test]
    fn losing_the_target_resumes_patrol() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);
        brain.think(&mut body, &mut character, &stats, Some(700));
        for _ in 0..10 {
            brain.animate(&mut character, &stats);
        }

        brain.think(&mut body, &mut character, &stats, Some(0));

        assert_eq!(brain.state, AiState::PatrollingRight);
        assert!(!brain.cooldown_active());
        assert!(!character.attacking);
        assert_eq!(body.position.x, 1005);
    }

    #[test]
    fn missing_target_counts_as_out_of_range() {
        let (mut body, mut character, stats, mut brain) = enemy_at(1000);

        brain.think(&mut body, &mut character, &stats, None);

        assert_eq!(brain.state, AiState::PatrollingRight);
    }

    #[test]
    fn walk_animation_wraps_to_loop_start() {
        let (_, mut character, stats, mut brain) = enemy_at(1000);

        let frames: Vec<u32> = (0..10)
            .map(|_| {
                brain.animate(&mut character, &stats);
                brain.frame
            })
            .collect();

        assert_eq!(frames, vec![1, 2, 3, 4, 5, 6, 7, 4, 5, 6]);
    }

    #[test]
    fn waiting_does_not_animate() {
        let (_, mut character, stats, mut brain) = enemy_at(1000);
        brain.state = AiState::Waiting;
        brain.frame = 2;

        brain.animate(&mut character, &stats);

        assert_eq!(brain.frame, 2);
    }

    #[test]
    fn bullet_leaves_the_muzzle_towards_the_target() {
        let (body, _, stats, _) = enemy_at(1000);
        let mut gun = EnemyGun::new(&stats);
        assert!(!gun.in_flight());

        gun.fire(&body, 1400, &stats);
        assert!(gun.in_flight());
        assert_eq!(gun.slot.position(), IVec2::new(1040, 474));
        assert!(gun.slot.moving_right);

        gun.fire(&body, 600, &stats);
        assert_eq!(gun.slot.position(), IVec2::new(1007, 474));
        assert!(!gun.slot.moving_right);
    }

    #[test]
    fn bullet_hits_the_target_once() {
        let (body, _, stats, _) = enemy_at(1000);
        let target = EntityState::new(EntityTag::Player, IVec2::new(1100, 400), IVec2::new(70, 120));
        let mut gun = EnemyGun::new(&stats);
        gun.fire(&body, 1100, &stats);

        assert!(gun.update(10000, Some(&target)));
        assert!(!gun.in_flight());
        assert!(!gun.update(10000, Some(&target)));
    }

    #[test]
    fn bullet_is_retired_past_the_map_edge() {
        let (body, _, stats, _) = enemy_at(20);
        let mut gun = EnemyGun::new(&stats);
        gun.fire(&body, 0, &stats);

        assert!(!gun.update::<EntityState>(10000, None));
        assert!(!gun.in_flight());
    }
}
