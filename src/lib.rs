//! Globe effect layer: drones circling a globe, EMP and sound waves that
//! knock them out, impact markers from a live hit feed, and an orbit camera.
//!
//! Everything outside the `wasm32` modules runs against the [`render::Renderer`]
//! trait, so the whole simulation is testable with [`render::HeadlessRenderer`].

pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod cooldown;
pub mod effects;
pub mod error;
pub mod feed;
pub mod frame;
pub mod input;
pub mod render;
pub mod scene;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod overlay;

pub use config::SceneConfig;
pub use frame::FrameDriver;
pub use scene::Simulation;
