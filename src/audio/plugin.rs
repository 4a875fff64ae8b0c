//! Sound plugin - plays [`AudioCueEvent`]s and loops the level music.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioApp, AudioChannel, AudioControl, AudioPlugin, AudioSource};

use crate::core::{drive_simulation, AudioCue, AudioCueEvent, GameState, LevelSet, LevelStart};

const PLAYER_SHOT_SOUND: &str = "sounds/ShootPlayer1.wav";
const ENEMY_SHOT_SOUND: &str = "sounds/ShootEnemy1.wav";
const BACKGROUND_MUSIC: &str = "sounds/Background.wav";

/// Channel for the looping level music, kept apart from effects.
#[derive(Resource)]
pub struct MusicChannel;

/// Asset path of the effect played for a cue.
pub fn sound_path(cue: AudioCue) -> &'static str {
    match cue {
        AudioCue::PlayerFired => PLAYER_SHOT_SOUND,
        AudioCue::EnemyFired => ENEMY_SHOT_SOUND,
    }
}

/// Handles to every sound the game plays.
#[derive(Resource)]
pub struct SoundLibrary {
    pub player_shot: Handle<AudioSource>,
    pub enemy_shot: Handle<AudioSource>,
    pub background: Handle<AudioSource>,
}

impl SoundLibrary {
    pub fn effect(&self, cue: AudioCue) -> &Handle<AudioSource> {
        match cue {
            AudioCue::PlayerFired => &self.player_shot,
            AudioCue::EnemyFired => &self.enemy_shot,
        }
    }
}

/// Sound plugin - routes audio cues to kira.
pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .add_audio_channel::<MusicChannel>()
            .add_systems(Startup, load_sounds)
            .add_systems(LevelStart, start_music.in_set(LevelSet::Spawn))
            .add_systems(OnEnter(GameState::Paused), pause_music)
            .add_systems(OnExit(GameState::Paused), resume_music)
            .add_systems(OnEnter(GameState::GameOver), stop_music)
            .add_systems(OnEnter(GameState::MainMenu), stop_music)
            .add_systems(
                Update,
                play_audio_cues
                    .after(drive_simulation)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

fn load_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundLibrary {
        player_shot: asset_server.load(sound_path(AudioCue::PlayerFired)),
        enemy_shot: asset_server.load(sound_path(AudioCue::EnemyFired)),
        background: asset_server.load(BACKGROUND_MUSIC),
    });
}

/// Whether a sound can be played. Failed loads are reported and skipped.
fn is_playable(asset_server: &AssetServer, handle: &Handle<AudioSource>) -> bool {
    match asset_server.load_state(handle) {
        LoadState::Failed(e) => {
            warn!("Skipping sound that failed to load: {}", e);
            false
        }
        _ => true,
    }
}

/// Play the effect for every cue sent this frame.
fn play_audio_cues(
    mut cues: EventReader<AudioCueEvent>,
    library: Option<Res<SoundLibrary>>,
    asset_server: Res<AssetServer>,
    audio: Res<Audio>,
) {
    let Some(library) = library else {
        cues.clear();
        return;
    };

    for AudioCueEvent(cue) in cues.read() {
        let handle = library.effect(*cue);
        if is_playable(&asset_server, handle) {
            audio.play(handle.clone());
        }
    }
}

fn start_music(
    library: Option<Res<SoundLibrary>>,
    asset_server: Res<AssetServer>,
    music: Res<AudioChannel<MusicChannel>>,
) {
    let Some(library) = library else {
        warn!("Sound library not loaded, level starts without music");
        return;
    };
    if !is_playable(&asset_server, &library.background) {
        return;
    }
    music.stop();
    music.play(library.background.clone()).looped();
}

fn pause_music(music: Res<AudioChannel<MusicChannel>>) {
    music.pause();
}

fn resume_music(music: Res<AudioChannel<MusicChannel>>) {
    music.resume();
}

fn stop_music(music: Res<AudioChannel<MusicChannel>>) {
    music.stop();
}
