//! Core plugin that sets up game states, events, the simulation clocks and
//! level lifecycle.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

use super::config::GameConfig;
use super::events::*;
use super::schedule::*;
use super::session::LevelSession;
use super::states::*;

/// Runs once each time a fresh level begins.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LevelStart;

/// Ordering inside [`LevelStart`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelSet {
    /// Reset resources left over from a previous run
    Reset,
    /// Spawn level entities
    Spawn,
    /// Attach extras (health bars, HUD) to what was spawned
    Decorate,
}

/// Marker for everything that belongs to the level in progress.
#[derive(Component, Debug, Default)]
pub struct LevelEntity;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, etc.)
/// - Global events (DamageEvent, DeathEvent, etc.)
/// - The logic and projectile schedules and the driver that runs them
/// - Level start and teardown
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        setup_simulation_schedules(app);

        app
            // Initialize game states
            .init_state::<GameState>()

            // Resources
            .init_resource::<GameConfig>()
            .init_resource::<LevelSession>()
            .insert_resource(SimulationClock::new(&GameConfig::default().timing))

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<AudioCueEvent>()
            .add_event::<GameEndedEvent>()

            // Level lifecycle
            .init_schedule(LevelStart)
            .configure_sets(LevelStart, (LevelSet::Reset, LevelSet::Spawn, LevelSet::Decorate).chain())
            .add_systems(LevelStart, reset_session.in_set(LevelSet::Reset))
            .add_systems(
                OnTransition {
                    exited: GameState::MainMenu,
                    entered: GameState::InGame,
                },
                start_level,
            )
            .add_systems(
                OnTransition {
                    exited: GameState::GameOver,
                    entered: GameState::InGame,
                },
                start_level,
            )
            .add_systems(OnExit(GameState::GameOver), despawn_level)
            .add_systems(
                OnTransition {
                    exited: GameState::Paused,
                    entered: GameState::MainMenu,
                },
                despawn_level,
            )
            // A level that failed to build goes straight back to the menu
            .add_systems(
                OnTransition {
                    exited: GameState::InGame,
                    entered: GameState::MainMenu,
                },
                despawn_level,
            )

            // Loading state - read data files, then show the menu
            .add_systems(
                OnEnter(GameState::Loading),
                (load_game_config, transition_to_main_menu).chain(),
            )

            // Simulation runs only during active gameplay
            .add_systems(
                Update,
                drive_simulation.run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                Update,
                enter_game_over
                    .after(drive_simulation)
                    .run_if(in_state(GameState::InGame)),
            )

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            );
    }
}

/// Replace the default config with the one on disk.
fn load_game_config(mut commands: Commands) {
    let config = GameConfig::load();
    commands.insert_resource(SimulationClock::new(&config.timing));
    commands.insert_resource(config);
}

/// Move to the main menu once data files are loaded.
fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Build a fresh level.
pub fn start_level(world: &mut World) {
    world.run_schedule(LevelStart);
}

/// Fresh score, clock and tick counters for a new level.
fn reset_session(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(LevelSession::default());
    commands.insert_resource(SimulationClock::new(&config.timing));
}

/// Remove every entity that belongs to the finished level.
fn despawn_level(mut commands: Commands, query: Query<Entity, With<LevelEntity>>) {
    let mut count = 0;
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
        count += 1;
    }
    info!("Level torn down ({} entities)", count);
}

/// Leave gameplay once the level has ended.
fn enter_game_over(
    mut ended_events: EventReader<GameEndedEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in ended_events.read() {
        match event.outcome {
            GameOutcome::LevelComplete => {
                info!("Level complete! Final score: {}", event.final_score)
            }
            GameOutcome::PlayerDied => {
                info!("Player died! Final score: {}", event.final_score)
            }
        }
        next_state.set(GameState::GameOver);
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
