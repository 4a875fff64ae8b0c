//! Fixed-cadence simulation schedules and the driver that interleaves them.
//!
//! Game logic runs in [`LogicTick`] (20 Hz by default) and projectiles in
//! [`ProjectileTick`] (60 Hz). Both are plain Bevy schedules run from a single
//! exclusive system, so every tick is atomic and runs to completion before the
//! next one starts.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

use super::config::LoopTiming;
use super::session::LevelSession;

/// Slow clock: movement, AI, damage, presentation.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicTick;

/// Fast clock: player projectile flight and hits.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectileTick;

/// Ordering inside [`LogicTick`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicSet {
    /// Level clock
    Clock,
    /// Player movement and map scrolling
    Movement,
    /// Level-complete detection
    Progress,
    /// Enemy AI and enemy bullets
    Enemies,
    /// Player kinematics and animation
    Player,
    /// Damage application and deaths
    Damage,
    /// Screen positions, HUD and health bars
    Present,
    /// Renderer snapshot
    Snapshot,
}

/// Ordering inside [`ProjectileTick`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectileSet {
    /// Turn fire requests into projectiles
    Spawn,
    /// Move, collide and retire projectiles
    Flight,
    /// Damage application and deaths
    Damage,
    /// Renderer snapshot
    Snapshot,
}

/// Which schedule is due next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStep {
    Logic,
    Projectile,
}

/// Accumulates frame time and hands out due ticks in timestamp order.
#[derive(Resource, Debug, Clone)]
pub struct SimulationClock {
    logic_hz: f64,
    projectile_hz: f64,
    max_frame_time: f64,
    now: f64,
    pub logic_ticks: u64,
    pub projectile_ticks: u64,
}

impl SimulationClock {
    const EPSILON: f64 = 1e-9;

    pub fn new(timing: &LoopTiming) -> Self {
        Self {
            logic_hz: timing.logic_hz.max(1.0),
            projectile_hz: timing.projectile_hz.max(1.0),
            max_frame_time: timing.max_frame_time.max(0.0),
            now: 0.0,
            logic_ticks: 0,
            projectile_ticks: 0,
        }
    }

    /// Seconds of simulated time covered by one logic tick.
    pub fn logic_step_secs(&self) -> f32 {
        (1.0 / self.logic_hz) as f32
    }

    fn next_logic(&self) -> f64 {
        (self.logic_ticks + 1) as f64 / self.logic_hz
    }

    fn next_projectile(&self) -> f64 {
        (self.projectile_ticks + 1) as f64 / self.projectile_hz
    }

    /// Advance by a frame of `delta` seconds and return the ticks that became
    /// due, earliest first. When both clocks are due at the same instant the
    /// logic tick goes first.
    pub fn advance(&mut self, delta: f64) -> Vec<SimStep> {
        self.now += delta.clamp(0.0, self.max_frame_time);

        let mut steps = Vec::new();
        loop {
            let logic_at = self.next_logic();
            let projectile_at = self.next_projectile();
            let due = self.now + Self::EPSILON;

            if logic_at <= due && logic_at <= projectile_at + Self::EPSILON {
                self.logic_ticks += 1;
                steps.push(SimStep::Logic);
            } else if projectile_at <= due {
                self.projectile_ticks += 1;
                steps.push(SimStep::Projectile);
            } else {
                break;
            }
        }
        steps
    }
}

/// Configure both simulation schedules.
pub fn setup_simulation_schedules(app: &mut App) {
    app.init_schedule(LogicTick)
        .init_schedule(ProjectileTick)
        .configure_sets(
            LogicTick,
            (
                LogicSet::Clock,
                LogicSet::Movement,
                LogicSet::Progress,
                LogicSet::Enemies,
                LogicSet::Player,
                LogicSet::Damage,
                LogicSet::Present,
                LogicSet::Snapshot,
            )
                .chain(),
        )
        .configure_sets(
            ProjectileTick,
            (
                ProjectileSet::Spawn,
                ProjectileSet::Flight,
                ProjectileSet::Damage,
                ProjectileSet::Snapshot,
            )
                .chain(),
        )
        .add_systems(LogicTick, advance_level_clock.in_set(LogicSet::Clock));
}

/// Run every simulation tick that fell due during this frame.
///
/// Stops as soon as the level has ended so nothing moves after the final
/// score is latched.
pub fn drive_simulation(world: &mut World) {
    let delta = world.resource::<Time>().delta_secs_f64();
    let steps = world.resource_mut::<SimulationClock>().advance(delta);

    for step in steps {
        if world.resource::<LevelSession>().is_finished() {
            break;
        }
        match step {
            SimStep::Logic => world.run_schedule(LogicTick),
            SimStep::Projectile => world.run_schedule(ProjectileTick),
        }
    }
}

/// Count simulated time on the level clock.
fn advance_level_clock(clock: Res<SimulationClock>, mut session: ResMut<LevelSession>) {
    session.elapsed += clock.logic_step_secs();
}
