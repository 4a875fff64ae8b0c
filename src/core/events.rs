//! Global events used for cross-system communication.
//!
//! The simulation never calls other subsystems directly. Enemies and
//! projectiles send [`DamageEvent`]s, the damage system turns lethal hits into
//! [`DeathEvent`]s, and anything the player would hear goes out as an
//! [`AudioCueEvent`].

use bevy::prelude::*;

use super::states::GameOutcome;

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    pub amount: i32,
}

/// Sent once when a character drops below its survival threshold.
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that dealt the final hit (if any)
    pub killed_by: Option<Entity>,
}

/// Sound effects the simulation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    PlayerFired,
    EnemyFired,
}

/// Fire-and-forget request to play a sound.
#[derive(Event, Debug, Clone, Copy)]
pub struct AudioCueEvent(pub AudioCue);

/// Sent exactly once when the level ends, carrying the final score.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameEndedEvent {
    pub outcome: GameOutcome,
    pub final_score: u32,
}
