//! Rebel Assault - Entry Point
//!
//! Controls:
//! - Left/Right arrows: Move
//! - Shift: Run
//! - Space: Jump
//! - Down arrow: Crouch
//! - Z: Shoot
//! - Escape: Pause/Unpause

use bevy::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins; audio goes through kira instead
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Rebel Assault".to_string(),
                        resolution: (1500.0, 600.0).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::audio::AudioPlugin>(),
        )

        // Our game plugin
        .add_plugins(rebel_assault::RebelAssaultPlugin)

        .run();
}
