#![allow(clippy::collapsible_if)]
#![allow(clippy::new_without_default)]

// Heads-up display for a 3D game client: a live terrain minimap, waypoint
// markers/labels/beacons and small stat panels. The host owns the frame
// loop, the world and the persisted stores, and calls HudRenderer::tick()
// and HudRenderer::render() every tick/frame.

pub mod log;
pub mod utils;
pub mod engine;
pub mod render;
pub mod world;
pub mod minimap;
pub mod projector;
pub mod waypoint;
pub mod hud;

pub use hud::{FrameContext, HudFrameStats, HudRenderer, config::HudConfigs};
