//! Camera module - map scrolling and world-to-screen mapping.

mod plugin;
mod scroll;

pub use plugin::CameraPlugin;
pub use scroll::MapScroll;
