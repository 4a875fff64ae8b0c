//! Rendering plugin - render snapshot and sprite placement.

use bevy::prelude::*;

use super::snapshot::{build_render_frame, RenderFrame};
use super::sprites::apply_render_frame;
use crate::core::{drive_simulation, LogicSet, LogicTick, ProjectileSet, ProjectileTick};

/// Rendering plugin - publishes the render frame and places sprites from it.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderFrame>()
            .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
            .add_systems(LogicTick, build_render_frame.in_set(LogicSet::Snapshot))
            .add_systems(
                ProjectileTick,
                build_render_frame.in_set(ProjectileSet::Snapshot),
            )
            .add_systems(Update, apply_render_frame.after(drive_simulation));
    }
}
