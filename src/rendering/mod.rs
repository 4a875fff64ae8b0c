//! Rendering module - the pull-based render frame and a sprite renderer for it.

mod plugin;
mod snapshot;
mod sprites;

pub use plugin::RenderingPlugin;
pub use snapshot::{build_render_frame, RenderFrame, SpriteSnapshot};
pub use sprites::{screen_to_translation, EnemyBulletSprite, SpriteLayer};
